//! GraphQL schema for the dashboard UI

pub mod errors;
pub mod mutation;
pub mod nodes;
pub mod query;
pub mod scalars;
pub mod types;

use async_graphql::{Context, EmptySubscription, Schema};

use crate::presentation::auth::RequestSession;
use crate::presentation::services::DashboardServices;

pub use mutation::MutationRoot;
pub use query::QueryRoot;

pub type DashboardSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(services: DashboardServices) -> DashboardSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(services)
        .finish()
}

pub(crate) fn services<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a DashboardServices> {
    ctx.data::<DashboardServices>()
}

/// Actor of the current request as resolved by the auth gate
pub(crate) fn actor<'a>(ctx: &Context<'a>) -> &'a str {
    ctx.data_opt::<RequestSession>()
        .map(RequestSession::actor)
        .unwrap_or("unknown")
}
