//! Application state shared by all handlers.

use std::sync::Arc;
use userbook_config::PaginationConfig;
use userbook_core::HealthCheck;
use userbook_service::UserService;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    pub pagination: PaginationConfig,
    /// Checks run by the readiness probe.
    pub health_checks: Vec<Arc<dyn HealthCheck>>,
}

impl AppState {
    /// Creates state around a user service with default pagination and no health checks.
    pub fn new(user_service: Arc<dyn UserService>) -> Self {
        Self {
            user_service,
            pagination: PaginationConfig::default(),
            health_checks: Vec::new(),
        }
    }

    /// Sets the pagination bounds for list endpoints.
    #[must_use]
    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    /// Registers a readiness check.
    #[must_use]
    pub fn with_health_check(mut self, check: Arc<dyn HealthCheck>) -> Self {
        self.health_checks.push(check);
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("pagination", &self.pagination)
            .field(
                "health_checks",
                &self.health_checks.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}
