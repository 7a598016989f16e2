use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{Extension, extract::State, http::StatusCode};

use crate::presentation::auth::RequestSession;

use super::DashboardState;

/// GET|POST /api/graphql
pub async fn graphql_handler(
    State(state): State<DashboardState>,
    session: Option<Extension<RequestSession>>,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = request.into_inner();
    if let Some(Extension(session)) = session {
        request = request.data(session);
    }
    state.schema.execute(request).await.into()
}

/// OPTIONS /api/graphql always answers 200
pub async fn graphql_options() -> StatusCode {
    StatusCode::OK
}
