//! Plain GraphQL objects and inputs, converted to and from domain documents

use async_graphql::{Enum, InputObject, SimpleObject};

use dashboard_core::domain::federation::{Dependency, FileLocation, Metadata, Remote};
use dashboard_core::domain::metrics::MetricValue;
use dashboard_core::domain::settings::{
    SiteSettings, Token, TrackedSettings, TrackedUrl, TrackedUrlVariant, Webhook,
    WebhookEventType,
};
use dashboard_core::domain::users::User;

use super::scalars::Date;

#[derive(SimpleObject)]
pub struct DashboardInfo {
    pub version_management_enabled: bool,
}

#[derive(SimpleObject, Clone)]
#[graphql(name = "Metadata")]
pub struct MetadataObject {
    pub name: String,
    pub value: String,
}

impl From<Metadata> for MetadataObject {
    fn from(m: Metadata) -> Self {
        Self {
            name: m.name,
            value: m.value,
        }
    }
}

pub fn metadata_objects(metadata: &[Metadata]) -> Vec<MetadataObject> {
    metadata.iter().cloned().map(MetadataObject::from).collect()
}

#[derive(SimpleObject)]
#[graphql(name = "Remote")]
pub struct RemoteObject {
    pub internal_name: String,
    pub name: String,
}

impl From<Remote> for RemoteObject {
    fn from(r: Remote) -> Self {
        Self {
            internal_name: r.internal_name,
            name: r.name,
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "Dependency")]
pub struct DependencyObject {
    pub name: String,
    #[graphql(name = "type")]
    pub kind: String,
    pub version: String,
}

impl From<Dependency> for DependencyObject {
    fn from(d: Dependency) -> Self {
        Self {
            name: d.name,
            kind: d.kind,
            version: d.version,
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "FileLocation")]
pub struct FileLocationObject {
    pub file: String,
    pub url: Option<String>,
}

impl From<FileLocation> for FileLocationObject {
    fn from(f: FileLocation) -> Self {
        Self {
            file: f.file,
            url: f.url,
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "TrackedURLVariant")]
pub struct TrackedUrlVariantObject {
    pub name: String,
    pub search: String,
    pub new: bool,
}

#[derive(SimpleObject)]
#[graphql(name = "TrackedURL")]
pub struct TrackedUrlObject {
    pub url: String,
    pub metadata: Vec<MetadataObject>,
    pub variants: Vec<TrackedUrlVariantObject>,
}

impl From<TrackedUrl> for TrackedUrlObject {
    fn from(t: TrackedUrl) -> Self {
        Self {
            url: t.url,
            metadata: t.metadata.into_iter().map(MetadataObject::from).collect(),
            variants: t
                .variants
                .into_iter()
                .map(|v| TrackedUrlVariantObject {
                    name: v.name,
                    search: v.search,
                    new: v.new,
                })
                .collect(),
        }
    }
}

fn tracked_url_objects(settings: TrackedSettings) -> Option<Vec<TrackedUrlObject>> {
    settings
        .tracked_urls
        .map(|urls| urls.into_iter().map(TrackedUrlObject::from).collect())
}

#[derive(SimpleObject)]
#[graphql(name = "GroupSettings")]
pub struct GroupSettingsObject {
    #[graphql(name = "trackedURLs")]
    pub tracked_urls: Option<Vec<TrackedUrlObject>>,
}

impl From<TrackedSettings> for GroupSettingsObject {
    fn from(settings: TrackedSettings) -> Self {
        Self {
            tracked_urls: tracked_url_objects(settings),
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "ApplicationSettings")]
pub struct ApplicationSettingsObject {
    #[graphql(name = "trackedURLs")]
    pub tracked_urls: Option<Vec<TrackedUrlObject>>,
}

impl From<TrackedSettings> for ApplicationSettingsObject {
    fn from(settings: TrackedSettings) -> Self {
        Self {
            tracked_urls: tracked_url_objects(settings),
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(name = "WebhookEventType", rename_items = "camelCase")]
pub enum WebhookEventTypeGql {
    UpdateApplication,
    DeleteApplication,
    UpdateApplicationVersion,
    DeleteApplicationVersion,
}

impl From<WebhookEventType> for WebhookEventTypeGql {
    fn from(event: WebhookEventType) -> Self {
        match event {
            WebhookEventType::UpdateApplication => Self::UpdateApplication,
            WebhookEventType::DeleteApplication => Self::DeleteApplication,
            WebhookEventType::UpdateApplicationVersion => Self::UpdateApplicationVersion,
            WebhookEventType::DeleteApplicationVersion => Self::DeleteApplicationVersion,
        }
    }
}

impl From<WebhookEventTypeGql> for WebhookEventType {
    fn from(event: WebhookEventTypeGql) -> Self {
        match event {
            WebhookEventTypeGql::UpdateApplication => Self::UpdateApplication,
            WebhookEventTypeGql::DeleteApplication => Self::DeleteApplication,
            WebhookEventTypeGql::UpdateApplicationVersion => Self::UpdateApplicationVersion,
            WebhookEventTypeGql::DeleteApplicationVersion => Self::DeleteApplicationVersion,
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "Webhook")]
pub struct WebhookObject {
    pub event: WebhookEventTypeGql,
    pub url: String,
}

#[derive(SimpleObject)]
#[graphql(name = "Token")]
pub struct TokenObject {
    pub key: String,
    pub value: String,
}

#[derive(SimpleObject)]
#[graphql(name = "SiteSettings")]
pub struct SiteSettingsObject {
    pub webhooks: Vec<WebhookObject>,
    pub tokens: Vec<TokenObject>,
}

impl From<SiteSettings> for SiteSettingsObject {
    fn from(settings: SiteSettings) -> Self {
        Self {
            webhooks: settings
                .webhooks
                .into_iter()
                .map(|w| WebhookObject {
                    event: w.event.into(),
                    url: w.url,
                })
                .collect(),
            tokens: settings
                .tokens
                .into_iter()
                .map(|t| TokenObject {
                    key: t.key,
                    value: t.value,
                })
                .collect(),
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "MetricValue")]
pub struct MetricValueObject {
    pub id: String,
    #[graphql(name = "type")]
    pub kind: String,
    pub name: String,
    pub date: Date,
    pub value: f64,
    pub url: Option<String>,
    pub q1: Option<f64>,
    pub q2: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
    pub min: Option<f64>,
}

impl From<MetricValue> for MetricValueObject {
    fn from(m: MetricValue) -> Self {
        Self {
            id: m.id,
            kind: m.kind.as_str().to_string(),
            name: m.name,
            date: Date(m.date),
            value: m.value,
            url: m.url,
            q1: m.stats.q1,
            q2: m.stats.q2,
            q3: m.stats.q3,
            max: m.stats.max,
            min: m.stats.min,
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "User")]
pub struct UserObject {
    pub id: String,
    pub email: String,
    /// Empty for users stored without a name
    pub name: String,
    pub groups: Option<Vec<String>>,
    pub default_group: String,
}

impl From<User> for UserObject {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name.unwrap_or_default(),
            groups: u.groups,
            default_group: u.default_group.unwrap_or_default(),
        }
    }
}

// Inputs

#[derive(InputObject)]
pub struct MetadataInput {
    pub name: String,
    pub value: String,
}

#[derive(InputObject)]
#[graphql(name = "TrackedURLVariantInput")]
pub struct TrackedUrlVariantInput {
    pub name: String,
    #[graphql(default)]
    pub search: String,
    #[graphql(default)]
    pub new: bool,
}

#[derive(InputObject)]
#[graphql(name = "TrackedURLInput")]
pub struct TrackedUrlInput {
    pub url: String,
    #[graphql(default)]
    pub metadata: Vec<MetadataInput>,
    #[graphql(default)]
    pub variants: Vec<TrackedUrlVariantInput>,
}

impl From<TrackedUrlInput> for TrackedUrl {
    fn from(input: TrackedUrlInput) -> Self {
        Self {
            url: input.url,
            metadata: input
                .metadata
                .into_iter()
                .map(|m| Metadata::new(m.name, m.value))
                .collect(),
            variants: input
                .variants
                .into_iter()
                .map(|v| TrackedUrlVariant {
                    name: v.name,
                    search: v.search,
                    new: v.new,
                })
                .collect(),
        }
    }
}

#[derive(InputObject)]
pub struct GroupSettingsInput {
    #[graphql(name = "trackedURLs")]
    pub tracked_urls: Option<Vec<TrackedUrlInput>>,
}

#[derive(InputObject)]
pub struct ApplicationSettingsInput {
    #[graphql(name = "trackedURLs")]
    pub tracked_urls: Option<Vec<TrackedUrlInput>>,
}

fn tracked_settings(urls: Option<Vec<TrackedUrlInput>>) -> TrackedSettings {
    TrackedSettings {
        tracked_urls: urls.map(|urls| urls.into_iter().map(TrackedUrl::from).collect()),
    }
}

impl From<GroupSettingsInput> for TrackedSettings {
    fn from(input: GroupSettingsInput) -> Self {
        tracked_settings(input.tracked_urls)
    }
}

impl From<ApplicationSettingsInput> for TrackedSettings {
    fn from(input: ApplicationSettingsInput) -> Self {
        tracked_settings(input.tracked_urls)
    }
}

#[derive(InputObject)]
pub struct WebhookInput {
    pub event: WebhookEventTypeGql,
    pub url: String,
}

#[derive(InputObject)]
pub struct TokenInput {
    pub key: String,
    pub value: String,
}

#[derive(InputObject)]
pub struct SiteSettingsInput {
    #[graphql(default)]
    pub webhooks: Vec<WebhookInput>,
    #[graphql(default)]
    pub tokens: Vec<TokenInput>,
}

impl From<SiteSettingsInput> for SiteSettings {
    fn from(input: SiteSettingsInput) -> Self {
        Self {
            webhooks: input
                .webhooks
                .into_iter()
                .map(|w| Webhook {
                    event: w.event.into(),
                    url: w.url,
                })
                .collect(),
            tokens: input
                .tokens
                .into_iter()
                .map(|t| Token {
                    key: t.key,
                    value: t.value,
                })
                .collect(),
        }
    }
}

#[derive(InputObject)]
pub struct UserInput {
    pub email: String,
    pub name: String,
    pub groups: Option<Vec<String>>,
    pub default_group: String,
}

impl From<UserInput> for User {
    fn from(input: UserInput) -> Self {
        User::with_email(
            input.email,
            Some(input.name),
            input.groups,
            Some(input.default_group),
        )
    }
}
