//! Federation documents: groups, applications and the versions they publish

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::settings::TrackedSettings;

/// Free-form name/value pair attached to groups, applications, modules and tracked URLs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
    pub value: String,
}

impl Metadata {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A group of applications, usually one per product or team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub metadata: Vec<Metadata>,
    #[serde(default)]
    pub settings: Option<TrackedSettings>,
    /// Stored revision, bumped by every successful update
    #[serde(skip)]
    pub revision: u64,
}

impl Group {
    /// Create a group whose id is its name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            metadata: Vec::new(),
            settings: None,
            revision: 0,
        }
    }
}

/// A federated application. Group membership is the denormalized group name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub name: String,
    pub group: String,
    #[serde(default)]
    pub metadata: Vec<Metadata>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub settings: Option<TrackedSettings>,
    #[serde(default)]
    pub overrides: Vec<ApplicationOverride>,
    #[serde(skip)]
    pub revision: u64,
}

impl Application {
    pub fn new(id: impl Into<String>, name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            group: group.into(),
            metadata: Vec::new(),
            tags: Vec::new(),
            settings: None,
            overrides: Vec::new(),
            revision: 0,
        }
    }

    pub fn belongs_to(&self, group: &str) -> bool {
        self.group == group
    }

    /// Pin `remote` to `version`, or drop the pin when `version` is `None`.
    pub fn set_remote_override(&mut self, remote: &str, version: Option<String>) {
        self.overrides.retain(|o| o.application != remote);
        if let Some(version) = version {
            self.overrides.push(ApplicationOverride {
                application: remote.to_string(),
                version,
                name: remote.to_string(),
            });
        }
    }
}

/// Application-level pin of a remote application to a specific version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationOverride {
    /// Id of the overridden (remote) application
    pub application: String,
    pub version: String,
    pub name: String,
}

/// Identity of an application version
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionKey {
    pub application_id: String,
    pub environment: String,
    pub version: String,
}

/// One published build of an application in one environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationVersion {
    pub application_id: String,
    pub environment: String,
    #[serde(default)]
    pub version: String,
    #[serde(default = "Utc::now")]
    pub posted: DateTime<Utc>,
    #[serde(default)]
    pub latest: bool,
    pub remote: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    #[serde(default)]
    pub remotes: Vec<Remote>,
    #[serde(default)]
    pub overrides: Vec<Override>,
    #[serde(default)]
    pub modules: Vec<Module>,
    #[serde(default)]
    pub consumes: Vec<Consume>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

impl ApplicationVersion {
    pub fn new(
        application_id: impl Into<String>,
        environment: impl Into<String>,
        version: impl Into<String>,
        remote: impl Into<String>,
    ) -> Self {
        Self {
            application_id: application_id.into(),
            environment: environment.into(),
            version: version.into(),
            posted: Utc::now(),
            latest: false,
            remote: remote.into(),
            metadata: None,
            remotes: Vec::new(),
            overrides: Vec::new(),
            modules: Vec::new(),
            consumes: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn key(&self) -> VersionKey {
        VersionKey {
            application_id: self.application_id.clone(),
            environment: self.environment.clone(),
            version: self.version.clone(),
        }
    }

    /// Same application and environment
    pub fn is_sibling_of(&self, other: &ApplicationVersion) -> bool {
        self.application_id == other.application_id && self.environment == other.environment
    }

    /// Modules with exactly this name, or all modules when no name is given
    pub fn modules_named(&self, name: Option<&str>) -> Vec<Module> {
        match name {
            Some(name) => self
                .modules
                .iter()
                .filter(|m| m.name == name)
                .cloned()
                .collect(),
            None => self.modules.clone(),
        }
    }
}

/// A module federation remote exposed by a version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Remote {
    #[serde(default)]
    pub internal_name: String,
    pub name: String,
}

/// A package dependency of a version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub version: String,
}

/// A module exposed by an application version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: String,
    #[serde(alias = "applicationID")]
    pub application_id: String,
    pub name: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub requires: Vec<String>,
    #[serde(default)]
    pub metadata: Vec<Metadata>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Source location where a module is consumed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLocation {
    pub file: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// One application consuming a module of another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consume {
    #[serde(alias = "consumingApplicationID")]
    pub consuming_application_id: String,
    #[serde(default, alias = "applicationID")]
    pub application_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub used_in: Vec<FileLocation>,
}

impl Consume {
    pub fn targets(&self, application_id: &str, module_name: &str) -> bool {
        self.application_id.as_deref() == Some(application_id) && self.name == module_name
    }
}

/// Version-level override of a module or dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Override {
    pub id: String,
    #[serde(default, alias = "application", alias = "applicationID")]
    pub application_id: String,
    #[serde(default)]
    pub version: Option<String>,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(name: &str) -> Module {
        Module {
            id: format!("app:{}", name),
            application_id: "app".to_string(),
            name: name.to_string(),
            file: None,
            requires: vec![],
            metadata: vec![],
            tags: vec![],
        }
    }

    #[test]
    fn test_modules_named_filters_exactly() {
        let mut version =
            ApplicationVersion::new("app", "development", "1.0.0", "http://a/remoteEntry.js");
        version.modules = vec![module("Header"), module("HeaderBar"), module("Footer")];

        let headers = version.modules_named(Some("Header"));
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0].name, "Header");

        assert_eq!(version.modules_named(None).len(), 3);
        assert!(version.modules_named(Some("header")).is_empty());
    }

    #[test]
    fn test_set_remote_override_replaces_and_removes() {
        let mut app = Application::new("shell", "shell", "default");
        app.set_remote_override("nav", Some("1.0.0".to_string()));
        app.set_remote_override("nav", Some("1.1.0".to_string()));
        assert_eq!(app.overrides.len(), 1);
        assert_eq!(app.overrides[0].version, "1.1.0");

        app.set_remote_override("nav", None);
        assert!(app.overrides.is_empty());
    }

    #[test]
    fn test_consume_accepts_legacy_id_casing() {
        let consume: Consume = serde_json::from_value(serde_json::json!({
            "consumingApplicationID": "shell",
            "applicationID": "nav",
            "name": "Header",
            "usedIn": [{ "file": "src/App.jsx" }]
        }))
        .unwrap();

        assert_eq!(consume.consuming_application_id, "shell");
        assert!(consume.targets("nav", "Header"));
    }

    #[test]
    fn test_revision_not_serialized() {
        let mut group = Group::new("default");
        group.revision = 7;
        let json = serde_json::to_value(&group).unwrap();
        assert!(json.get("revision").is_none());
        assert_eq!(json["id"], "default");
    }
}
