//! # folio-common
//!
//! Shared utilities including configuration, error handling, identity tokens, and telemetry.

pub mod config;
pub mod error;
pub mod identity;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    AppConfig, AppSettings, AuthorizationConfig, CommentsConfig, ConfigError, CorsConfig,
    DatabaseConfig, Environment, IdentityConfig, InvitesConfig, RateLimitConfig,
    ReactionsConfig, RedisConfig, ServerConfig, StoreBackend, StoreConfig,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use identity::{IdentityClaims, IdentityError, IdentityVerifier};
pub use telemetry::{
    init_tracing, init_tracing_with_config, try_init_tracing, try_init_tracing_with_config,
    TracingConfig, TracingError,
};
