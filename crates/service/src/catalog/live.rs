//! Search-as-you-type over the catalog.
//!
//! Keystrokes go through a `Debouncer`; only the query that stays unchanged
//! for the debounce interval is searched, and its view is published on a
//! `watch` channel.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use super::service::CatalogService;
use super::view::CatalogView;
use crate::debounce::Debouncer;
use crate::storage::DurableSlot;

/// Latest settled search. `runs` counts searches actually executed.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct LiveResult {
    pub query: String,
    pub runs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<CatalogView>,
}

pub struct LiveSearch<S: DurableSlot> {
    catalog: Arc<CatalogService<S>>,
    debouncer: Debouncer,
    latest: watch::Sender<LiveResult>,
}

impl<S: DurableSlot + 'static> LiveSearch<S> {
    pub fn new(catalog: Arc<CatalogService<S>>, wait: Duration) -> Arc<Self> {
        let (latest, _) = watch::channel(LiveResult::default());
        Arc::new(Self { catalog, debouncer: Debouncer::new(wait), latest })
    }

    /// Record a keystroke. Restarts the timer; a pending search is dropped.
    pub fn input(self: &Arc<Self>, query: impl Into<String>) {
        let query = query.into();
        let this = Arc::clone(self);
        self.debouncer.call(async move {
            let view = this.catalog.search(&query).await;
            debug!(query = %query, cards = view.cards.len(), "live search settled");
            this.latest.send_modify(|r| {
                r.runs += 1;
                r.query = query;
                r.view = Some(view);
            });
        });
    }

    pub fn latest(&self) -> LiveResult {
        self.latest.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LiveResult> {
        self.latest.subscribe()
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}
