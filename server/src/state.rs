use std::sync::Arc;

use crate::auth::SessionStore;
use crate::store::DataStore;

/// Shared handles passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DataStore>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn DataStore>, sessions: SessionStore) -> Self {
        Self {
            store,
            sessions: Arc::new(sessions),
        }
    }
}
