//! Application setup and wiring

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use tokio_util::sync::CancellationToken;

use dashboard_api::presentation::auth::AuthGateState;
use dashboard_api::{DashboardServices, DashboardState, create_router};
use dashboard_core::Config;
use dashboard_core::application::WebhookNotifier;
use dashboard_core::infrastructure::Repositories;
use dashboard_core::infrastructure::auth::{InternalToken, SessionService};
use dashboard_core::infrastructure::network::{IpAllowList, local_address};
use dashboard_core::infrastructure::webhooks::HttpWebhookDispatcher;

/// Handle returned from create_app for graceful shutdown coordination
pub struct AppHandle {
    pub router: Router,
    pub shutdown_token: CancellationToken,
    /// Accepted by the auth gate for service-to-service calls
    pub internal_token: InternalToken,
}

/// Create the application router and return an AppHandle for shutdown coordination
pub async fn create_app(
    config: Config,
) -> Result<AppHandle, Box<dyn std::error::Error + Send + Sync>> {
    let startup_time = Instant::now();
    let shutdown_token = CancellationToken::new();

    let repositories = Repositories::connect(&config.database).await.map_err(|e| {
        tracing::error!("Failed to initialize persistence driver: {}", e);
        e
    })?;
    tracing::info!(driver = ?config.database.driver, "Persistence driver ready");

    let notifier = if config.webhooks.enabled {
        let dispatcher = HttpWebhookDispatcher::new(Duration::from_secs(
            config.webhooks.timeout_seconds,
        ));
        WebhookNotifier::new(repositories.site_settings.clone(), Arc::new(dispatcher))
    } else {
        tracing::info!("Webhook delivery disabled");
        WebhookNotifier::disabled(repositories.site_settings.clone())
    };

    let internal_token = InternalToken::generate();

    let own_address = local_address();
    let ip_allowlist = IpAllowList::with_local(&config.server.ip_allowlist, own_address)?
        .with_trusted_proxies(&config.server.trusted_proxies)?;
    if let Some(addr) = own_address {
        tracing::debug!(address = %addr, "Detected local address");
    }

    let auth_gate = AuthGateState {
        mode: config.server.mode,
        session_cookie: config.auth.session_cookie.clone(),
        session_service: SessionService::new(
            config.auth.session_secret.clone(),
            config.auth.session_ttl_hours,
        ),
        site_settings: repositories.site_settings.clone(),
        internal_token: Some(internal_token.clone()),
    };

    let services = DashboardServices::new(&config, repositories, notifier);
    let state = DashboardState::new(Arc::new(config), services, auth_gate, ip_allowlist);
    let router = create_router(state);

    tracing::info!(
        startup_ms = startup_time.elapsed().as_millis(),
        "Application initialized"
    );

    Ok(AppHandle {
        router,
        shutdown_token,
        internal_token,
    })
}
