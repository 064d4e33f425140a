use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use axum::routing::get;
use axum::Router;
use tracing::info;

use crate::cache::token_cache::TokenCache;
use crate::config::settings::SettingsConfig;
use crate::config::types::ServiceConfig;
use crate::grocery::client::GroceryClient;
use crate::observability::metrics::{get_metrics, Metrics};
use crate::observability::routes::MetricsState;
use crate::server::handlers;
use crate::sources::oauth2::ClientCredentialsIssuer;
use crate::storage::{build_store, ProductStore};

pub type Grocery = GroceryClient<ClientCredentialsIssuer>;

#[derive(Clone)]
pub struct AppState {
    pub metrics_state: MetricsState,
    pub grocery: Arc<Grocery>,
    pub store: ProductStore,
    pub search_limit: u32,
}

impl AppState {
    pub fn new(metrics: &Metrics, grocery: Grocery, store: ProductStore, search_limit: u32) -> Self {
        Self {
            metrics_state: MetricsState::new(metrics.registry.clone()),
            grocery: Arc::new(grocery),
            store,
            search_limit,
        }
    }

    /// Wire the token cache, grocery client and product store from config.
    pub async fn from_config(service_config: &ServiceConfig) -> Result<Self> {
        let issuer = ClientCredentialsIssuer::from_config(&service_config.issuer)?;
        let tokens = TokenCache::with_system_clock(
            issuer,
            service_config.issuer.credentials(),
            service_config.cache_settings(),
        )?;
        let grocery = GroceryClient::new(&service_config.api, tokens)?;
        let store = build_store(&service_config.storage);
        info!("product store: {}", store.name());
        Ok(Self::new(get_metrics().await, grocery, store, service_config.api.search_limit))
    }
}

pub fn router(state: AppState, settings_config: &SettingsConfig) -> Router {
    Router::new()
        .route("/products", get(handlers::get_products).post(handlers::post_products))
        .route("/locations", get(handlers::get_location))
        .route("/health", get(handlers::health))
        .merge(state.metrics_state.router(&settings_config.metrics))
        .with_state(state)
}

/// Serve until `shutdown` resolves.
pub async fn start(
    settings_config: &SettingsConfig,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let metrics = get_metrics().await;
    let app = router(state, settings_config);

    let bind_addr = &settings_config.server.host;
    let port = &settings_config.server.port;
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", bind_addr, port)).await?;
    info!("listening on {}", listener.local_addr()?);
    metrics.up.set(1);
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    metrics.up.set(0);

    Ok(())
}
