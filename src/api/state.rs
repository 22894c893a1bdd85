use std::sync::Arc;

use crate::{
    config::Config,
    services::Recommender,
    store::{MemoryTableStore, TableStore},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TableStore>,
    pub recommender: Arc<Recommender>,
}

impl AppState {
    pub fn new(store: Arc<dyn TableStore>, recommender: Recommender) -> Self {
        Self {
            store,
            recommender: Arc::new(recommender),
        }
    }

    pub fn from_config(store: Arc<dyn TableStore>, config: &Config) -> Self {
        Self::new(store, Recommender::from_config(config))
    }

    /// Empty in-memory tables with default settings
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTableStore::new()), Recommender::default())
    }
}
