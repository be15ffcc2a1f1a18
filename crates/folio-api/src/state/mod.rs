//! Application state
//!
//! Holds the shared state for the Axum application: the service context,
//! the configuration and the Redis pool used by readiness checks.

use std::sync::Arc;

use folio_cache::RedisPool;
use folio_common::{AppConfig, IdentityVerifier};
use folio_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    config: Arc<AppConfig>,
    /// `None` when Redis is not configured
    redis_pool: Option<RedisPool>,
}

impl AppState {
    pub fn new(service_context: ServiceContext, config: AppConfig) -> Self {
        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
            redis_pool: None,
        }
    }

    pub fn with_redis(mut self, pool: RedisPool) -> Self {
        self.redis_pool = Some(pool);
        self
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn redis_pool(&self) -> Option<&RedisPool> {
        self.redis_pool.as_ref()
    }

    /// Identity token verifier from the service context
    pub fn identity(&self) -> &IdentityVerifier {
        self.service_context.identity()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &self.service_context)
            .field("redis", &self.redis_pool.is_some())
            .finish_non_exhaustive()
    }
}
