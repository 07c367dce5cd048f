//! Application assembly.

use crate::startup::{print_startup_info, shutdown_signal};
use axum::Router;
use std::sync::Arc;
use tracing::info;
use userbook_config::AppConfig;
use userbook_core::{HealthCheck, UserbookError, UserbookResult};
use userbook_repository::{create_pool, DatabasePool, MySqlUserRepository, UserRepository};
use userbook_rest::{create_router, AppState};
use userbook_security::{PasswordHasher, PasswordHasherInterface};
use userbook_service::UserServiceImpl;

/// Builds the HTTP router over any user repository.
///
/// The service receives the repository through its constructor; nothing is
/// looked up at runtime.
pub fn build_router(
    config: &AppConfig,
    repository: Arc<dyn UserRepository>,
    health_checks: Vec<Arc<dyn HealthCheck>>,
) -> Router {
    let user_service = Arc::new(UserServiceImpl::new(repository));

    let state = health_checks.into_iter().fold(
        AppState::new(user_service).with_pagination(config.pagination),
        AppState::with_health_check,
    );

    create_router(state, &config.server)
}

/// Creates the password hasher configured for this deployment.
pub fn password_hasher(config: &AppConfig) -> Arc<dyn PasswordHasherInterface> {
    Arc::new(PasswordHasher::with_cost(config.security.password_hash_cost))
}

/// A fully wired server, ready to accept connections.
pub struct Application {
    config: AppConfig,
    pool: Arc<DatabasePool>,
    router: Router,
}

impl Application {
    /// Connects to the database, applies migrations when enabled and wires
    /// the layers together.
    pub async fn build(config: AppConfig) -> UserbookResult<Self> {
        let pool = create_pool(&config.database).await?;

        if config.database.run_migrations {
            pool.run_migrations().await?;
        } else {
            info!("Skipping migrations (database.run_migrations = false)");
        }

        let repository: Arc<dyn UserRepository> = Arc::new(MySqlUserRepository::new(
            Arc::clone(&pool),
            password_hasher(&config),
        ));
        let health_check: Arc<dyn HealthCheck> = pool.clone();
        let router = build_router(&config, repository, vec![health_check]);

        Ok(Self {
            config,
            pool,
            router,
        })
    }

    /// Serves requests until a shutdown signal arrives, then closes the pool.
    pub async fn run(self) -> UserbookResult<()> {
        let addr = self.config.server.addr();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| UserbookError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

        print_startup_info(&addr);

        let served = axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| UserbookError::Internal(format!("Server error: {}", e)));

        self.pool.close().await;
        info!("Server shutdown complete");
        served
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("addr", &self.config.server.addr())
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;
    use userbook_config::PaginationConfig;
    use userbook_repository::memory::InMemoryUserRepository;

    fn in_memory(config: &AppConfig) -> Arc<dyn UserRepository> {
        Arc::new(InMemoryUserRepository::new(password_hasher(config)))
    }

    #[tokio::test]
    async fn test_router_serves_users_and_health() {
        let mut config = AppConfig::default();
        config.security.password_hash_cost = 1;
        let router = build_router(&config, in_memory(&config), Vec::new());

        for uri in ["/health", "/live", "/ready", "/v1/users"] {
            let response = router
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "GET {}", uri);
        }
    }

    #[tokio::test]
    async fn test_router_uses_configured_pagination() {
        let mut config = AppConfig::default();
        config.pagination = PaginationConfig {
            per_page_default: 5,
            per_page_max: 5,
        };
        let router = build_router(&config, in_memory(&config), Vec::new());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/v1/users?per_page=6")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
