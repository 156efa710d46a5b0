//! Shared state for the API server.
//!
//! The store handle and the event hub are constructed once at bootstrap and
//! injected into every handler through axum's `State` extractor; nothing is
//! process-global, so tests can build isolated instances.

use crate::db::Store;
use crate::events::EventHub;

/// Dependencies every handler needs. Clone is cheap — both members are
/// Arc-backed.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub hub: EventHub,
}

impl AppState {
    pub fn new(store: Store, hub: EventHub) -> Self {
        Self { store, hub }
    }
}
