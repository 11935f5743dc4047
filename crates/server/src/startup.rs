use std::{future::Future, net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use configs::AppConfig;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::catalog::{CatalogService, LiveSearch};
use service::recipes::RecipeSearch;
use service::storage::FileSlot;

use crate::errors::StartupError;
use crate::routes;
use crate::state::{AppState, UiSettings};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

// An upload bigger than the slot quota can never be saved; leave headroom for the text fields.
fn upload_limit(quota_bytes: usize) -> usize {
    quota_bytes.saturating_add(64 * 1024)
}

/// Open the durable slot, rehydrate the catalog and prepare recipe search.
pub async fn build_state(cfg: &AppConfig) -> Result<AppState, StartupError> {
    common::env::ensure_env(&cfg.ui.frontend_dir, &cfg.storage.data_dir).await?;

    let slot = FileSlot::open(&cfg.storage.data_dir, &cfg.storage.slot)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?
        .with_quota(cfg.storage.quota_bytes);
    info!(event = "slot_open", path = %slot.path().display(), quota = cfg.storage.quota_bytes, "catalog slot ready");

    let catalog = CatalogService::open_with_ttl(Arc::new(slot), cfg.ui.notice_ttl_ms).await;
    info!(event = "catalog_loaded", count = catalog.len().await, "catalog rehydrated");
    let live = LiveSearch::new(Arc::clone(&catalog), Duration::from_millis(cfg.ui.search_debounce_ms));

    let recipes = RecipeSearch::from_config(&cfg.recipes, cfg.ui.notice_ttl_ms)
        .await
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

    Ok(AppState {
        catalog,
        live,
        recipes: Arc::new(recipes),
        frontend_dir: cfg.ui.frontend_dir.clone(),
        upload_limit: upload_limit(cfg.storage.quota_bytes),
        ui: UiSettings {
            notice_ttl_ms: cfg.ui.notice_ttl_ms,
            search_debounce_ms: cfg.ui.search_debounce_ms,
        },
    })
}

pub fn build_app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

/// Load config from the environment and serve until the process is killed.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = AppConfig::load_or_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    serve(cfg, std::future::pending()).await
}

/// Serve `cfg` until `shutdown` resolves, then drain in-flight requests.
pub async fn serve<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = build_state(&cfg).await?;
    let app = build_app(state);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!(event = "drained", "in-flight requests finished");
    Ok(())
}
