use std::sync::Arc;

use crate::config::Config;
use crate::service::JobSearchService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Catalog, runner and results directory. Shared read-only across requests.
    pub service: Arc<JobSearchService>,
}
