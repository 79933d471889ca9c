pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::search::SearchService;
use crate::store::PlatformStore;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PlatformStore>,
    pub search: Arc<SearchService>,
}

impl AppState {
    pub fn new(store: Arc<dyn PlatformStore>, search: Arc<SearchService>) -> Self {
        Self { store, search }
    }
}
