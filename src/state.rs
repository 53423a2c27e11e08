//! Shared application state for all routes.

use std::sync::Arc;

use mongodb::Database;

use crate::resources::ResourceCatalog;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    /// Immutable allow-list, built once at startup from configuration.
    pub catalog: Arc<ResourceCatalog>,
}

impl AppState {
    pub fn new(db: Database, catalog: ResourceCatalog) -> Self {
        AppState {
            db,
            catalog: Arc::new(catalog),
        }
    }
}
