//! Application state shared by all handlers.

use std::sync::Arc;

use crate::content::ContentLibrary;
use crate::session::SessionRegistry;
use crate::store::ProgressStore;

/// Progress store shared across all learners
pub type SharedStore = Arc<dyn ProgressStore>;

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,

    /// Topic decks, loaded once at startup
    pub library: Arc<ContentLibrary>,

    /// Live review sessions
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(store: SharedStore, library: ContentLibrary) -> Self {
        Self {
            store,
            library: Arc::new(library),
            sessions: SessionRegistry::new(),
        }
    }
}
