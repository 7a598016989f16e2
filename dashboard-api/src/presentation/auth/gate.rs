//! Request authorization gate in front of the GraphQL and ingest routes

use axum::{
    extract::{Query, Request, State},
    http::{HeaderMap, Method, StatusCode, Uri, header},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use std::collections::HashMap;
use std::sync::Arc;

use dashboard_core::config::RuntimeMode;
use dashboard_core::domain::auth::SessionUser;
use dashboard_core::domain::settings::ISiteSettingsRepository;
use dashboard_core::infrastructure::auth::{InternalToken, SessionService, TokenMatcher};

/// Outcome of the gate, forwarded into GraphQL request data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestSession {
    pub user: Option<SessionUser>,
    /// No tokens are configured, so nothing was checked
    pub no_auth: bool,
    /// A shared or internal token matched
    pub via_token: bool,
}

impl RequestSession {
    /// Who performed the request, for audit logs; never a token value
    pub fn actor(&self) -> &str {
        match &self.user {
            Some(user) => &user.email,
            None if self.via_token => "token",
            None if self.no_auth => "anonymous",
            None => "unknown",
        }
    }
}

#[derive(Clone)]
pub struct AuthGateState {
    pub mode: RuntimeMode,
    pub session_cookie: String,
    pub session_service: SessionService,
    pub site_settings: Arc<dyn ISiteSettingsRepository>,
    pub internal_token: Option<InternalToken>,
}

/// Tokens presented by a request: the `token` query parameter, then the
/// `Authorization` header as `Bearer <t>`, `Token <t>` or a bare value
pub fn presented_tokens(headers: &HeaderMap, uri: &Uri) -> Vec<String> {
    let mut tokens = Vec::new();

    if let Ok(Query(params)) = Query::<HashMap<String, String>>::try_from_uri(uri)
        && let Some(token) = params.get("token")
    {
        tokens.push(token.clone());
    }

    if let Some(auth) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        let auth = auth.trim();
        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("Token "))
            .unwrap_or(auth)
            .trim();
        if !token.is_empty() {
            tokens.push(token.to_string());
        }
    }

    tokens
}

/// Decide whether a request may proceed
pub fn authorize(
    matcher: &TokenMatcher,
    presented: &[String],
    user: Option<SessionUser>,
) -> Option<RequestSession> {
    if matcher.is_empty() {
        return Some(RequestSession {
            user,
            no_auth: true,
            via_token: false,
        });
    }

    let via_token = presented.iter().any(|t| matcher.matches(t));
    if via_token || user.is_some() {
        Some(RequestSession {
            user,
            no_auth: false,
            via_token,
        })
    } else {
        None
    }
}

fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookies = headers.get(header::COOKIE).and_then(|v| v.to_str().ok())?;
    let prefix = format!("{}=", name);

    cookies
        .split(';')
        .map(|s| s.trim())
        .find(|s| s.starts_with(&prefix))?
        .strip_prefix(&prefix)
        .map(|s| s.to_string())
}

fn session_user(state: &AuthGateState, headers: &HeaderMap) -> Option<SessionUser> {
    if !state.mode.is_production() {
        return None;
    }

    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().strip_prefix("Bearer "))
        .map(|s| s.trim().to_string());

    extract_cookie(headers, &state.session_cookie)
        .into_iter()
        .chain(bearer)
        .find_map(|token| match state.session_service.validate(&token) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid session token");
                None
            }
        })
}

pub fn unauthorized_response() -> Response {
    let body = serde_json::json!({
        "errors": [{
            "message": "Unauthorized",
            "extensions": { "code": "UNAUTHENTICATED" }
        }]
    });
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

pub async fn auth_gate_middleware(
    State(state): State<Arc<AuthGateState>>,
    mut request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS {
        return next.run(request).await;
    }

    let settings = match state.site_settings.get().await {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load site settings for auth");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let matcher = TokenMatcher::new(&settings, state.internal_token.clone());
    let presented = presented_tokens(request.headers(), request.uri());
    let user = session_user(&state, request.headers());

    match authorize(&matcher, &presented, user) {
        Some(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        None => {
            tracing::warn!(path = %request.uri().path(), "Rejected unauthenticated request");
            unauthorized_response()
        }
    }
}
