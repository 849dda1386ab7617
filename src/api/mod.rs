pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::resilience::ResilientDirectory;
use crate::transport::HttpDirectoryTransport;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<ResilientDirectory<HttpDirectoryTransport>>,
}

impl AppState {
    pub fn new(directory: Arc<ResilientDirectory<HttpDirectoryTransport>>) -> Self {
        Self { directory }
    }
}
