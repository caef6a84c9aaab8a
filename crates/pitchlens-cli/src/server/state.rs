//! Application state for the web server.

use std::sync::Arc;
use tokio::sync::RwLock;

use pitchlens::{Analyzer, RecordStore, Session};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Uploaded player and goalkeeper tables.
    pub store: Arc<RwLock<RecordStore>>,
    /// Analyses performed since the server started (or was cleared).
    pub session: Arc<RwLock<Session>>,
    /// Analyzer wrapping the inference client.
    pub analyzer: Arc<Analyzer>,
}

impl AppState {
    /// Create new application state with empty tables.
    pub fn new(analyzer: Analyzer) -> Self {
        Self {
            store: Arc::new(RwLock::new(RecordStore::new())),
            session: Arc::new(RwLock::new(Session::new())),
            analyzer: Arc::new(analyzer),
        }
    }
}
