use std::sync::Arc;

use crate::config::Config;
use crate::database::{ProductStore, UserStore};
use crate::services::product_service::ImageHosts;

/// Shared per-app data handed to every handler through `web::Data`
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub products: Arc<dyn ProductStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(users: Arc<dyn UserStore>, products: Arc<dyn ProductStore>, config: Config) -> Self {
        Self {
            users,
            products,
            config: Arc::new(config),
        }
    }

    pub fn image_hosts(&self) -> ImageHosts<'_> {
        ImageHosts {
            public_url: &self.config.public_url,
            legacy_hosts: &self.config.legacy_image_hosts,
        }
    }
}

#[cfg(test)]
impl AppState {
    /// In-memory state shared by the handler tests
    pub fn in_memory() -> Self {
        let store = Arc::new(crate::database::MemoryStore::new());
        Self::new(store.clone(), store, Config::for_tests())
    }
}
