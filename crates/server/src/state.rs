use std::sync::Arc;

use serde::Serialize;

use service::catalog::{CatalogService, LiveSearch};
use service::recipes::RecipeSearch;
use service::storage::FileSlot;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService<FileSlot>>,
    pub live: Arc<LiveSearch<FileSlot>>,
    pub recipes: Arc<RecipeSearch>,
    pub frontend_dir: String,
    /// Largest accepted form upload in bytes.
    pub upload_limit: usize,
    pub ui: UiSettings,
}

/// Client timing knobs handed to the frontend.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct UiSettings {
    pub notice_ttl_ms: u64,
    pub search_debounce_ms: u64,
}
