//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, AuthorizationConfig, CommentsConfig, ConfigError, CorsConfig,
    DatabaseConfig, Environment, IdentityConfig, InvitesConfig, RateLimitConfig,
    ReactionsConfig, RedisConfig, ServerConfig, StoreBackend, StoreConfig,
};
