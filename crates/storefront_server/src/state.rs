//! Shared handler state.

use crate::CatalogService;
use std::sync::Arc;
use storefront_core::PageLimits;
use storefront_interface::Health;

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Catalog operations
    pub service: CatalogService,
    /// Page size limits for list endpoints
    pub limits: PageLimits,
    /// Store liveness probe
    pub health: Arc<dyn Health>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service", &self.service)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Bundle the service with its limits and health probe.
    pub fn new(service: CatalogService, limits: PageLimits, health: Arc<dyn Health>) -> Self {
        Self {
            service,
            limits,
            health,
        }
    }
}
