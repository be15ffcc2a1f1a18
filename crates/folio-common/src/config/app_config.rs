//! Application configuration structs
//!
//! Loads configuration from environment variables, optionally seeded from a
//! `.env` file.

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub store: StoreConfig,
    /// Absent when running a single instance without Redis
    pub redis: Option<RedisConfig>,
    pub identity: IdentityConfig,
    pub authorization: AuthorizationConfig,
    pub comments: CommentsConfig,
    pub reactions: ReactionsConfig,
    pub invites: InvitesConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" | "dev" => Ok(Self::Development),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Which repository implementation backs the services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store backend '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Required when the backend is Postgres
    pub database: Option<DatabaseConfig>,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

/// Identity token verification
#[derive(Clone, Deserialize)]
pub struct IdentityConfig {
    pub secret: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    #[serde(default = "default_identity_leeway_secs")]
    pub leeway_secs: u64,
}

impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("leeway_secs", &self.leeway_secs)
            .finish_non_exhaustive()
    }
}

/// Who counts as an admin besides the stored allow-list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorizationConfig {
    /// e.g. `example.org`; verified e-mails at this domain are admins
    pub admin_email_domain: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentsConfig {
    #[serde(default = "default_comment_max_length")]
    pub max_length: usize,
    #[serde(default = "default_visible_threads")]
    pub visible_threads: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReactionsConfig {
    #[serde(default = "default_reaction_cooldown_ms")]
    pub cooldown_ms: u64,
}

impl ReactionsConfig {
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

/// Invite-card enrichment lookups
#[derive(Debug, Clone, Deserialize)]
pub struct InvitesConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_invite_api_base")]
    pub api_base: String,
    #[serde(default = "default_invite_timeout_ms")]
    pub timeout_ms: u64,
}

impl InvitesConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "folio".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_body_limit_bytes() -> usize {
    1024 * 1024
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    2
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_identity_leeway_secs() -> u64 {
    60
}

fn default_comment_max_length() -> usize {
    2000
}

fn default_visible_threads() -> usize {
    2
}

fn default_reaction_cooldown_ms() -> u64 {
    500
}

fn default_true() -> bool {
    true
}

fn default_invite_api_base() -> String {
    "https://discord.com/api/v9".to_string()
}

fn default_invite_timeout_ms() -> u64 {
    3000
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

/// Reads variables through a lookup function so tests need not touch the
/// process environment
struct Vars<F> {
    lookup: F,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::MissingVar(key))
    }

    fn parse_or<T: FromStr>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            Some(raw) => raw
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidValue(key, e.to_string())),
            None => Ok(default),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    ///
    /// # Errors
    /// Returns an error if required variables are missing or malformed
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup };

        let backend: StoreBackend = vars.parse_or("STORE_BACKEND", StoreBackend::default())?;
        let database = match vars.get("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: vars
                    .parse_or("DATABASE_MAX_CONNECTIONS", default_max_connections())?,
                min_connections: vars
                    .parse_or("DATABASE_MIN_CONNECTIONS", default_min_connections())?,
            }),
            None if backend == StoreBackend::Postgres => {
                return Err(ConfigError::MissingVar("DATABASE_URL"))
            }
            None => None,
        };

        let redis = match vars.get("REDIS_URL") {
            Some(url) => Some(RedisConfig {
                url,
                max_connections: vars
                    .parse_or("REDIS_MAX_CONNECTIONS", default_redis_max_connections())?,
            }),
            None => None,
        };

        Ok(Self {
            app: AppSettings {
                name: vars.get("APP_NAME").unwrap_or_else(default_app_name),
                env: vars.parse_or("APP_ENV", Environment::default())?,
            },
            server: ServerConfig {
                host: vars.get("SERVER_HOST").unwrap_or_else(default_host),
                port: vars.parse_or("SERVER_PORT", default_port())?,
                request_timeout_secs: vars
                    .parse_or("SERVER_REQUEST_TIMEOUT_SECS", default_request_timeout_secs())?,
                body_limit_bytes: vars
                    .parse_or("SERVER_BODY_LIMIT_BYTES", default_body_limit_bytes())?,
            },
            store: StoreConfig { backend, database },
            redis,
            identity: IdentityConfig {
                secret: vars.required("IDENTITY_TOKEN_SECRET")?,
                issuer: vars.get("IDENTITY_TOKEN_ISSUER"),
                audience: vars.get("IDENTITY_TOKEN_AUDIENCE"),
                leeway_secs: vars
                    .parse_or("IDENTITY_TOKEN_LEEWAY_SECS", default_identity_leeway_secs())?,
            },
            authorization: AuthorizationConfig {
                admin_email_domain: vars.get("ADMIN_EMAIL_DOMAIN"),
            },
            comments: CommentsConfig {
                max_length: vars.parse_or("COMMENT_MAX_LENGTH", default_comment_max_length())?,
                visible_threads: vars
                    .parse_or("COMMENT_VISIBLE_THREADS", default_visible_threads())?,
            },
            reactions: ReactionsConfig {
                cooldown_ms: vars
                    .parse_or("REACTION_COOLDOWN_MS", default_reaction_cooldown_ms())?,
            },
            invites: InvitesConfig {
                enabled: vars.parse_or("INVITE_LOOKUP_ENABLED", default_true())?,
                api_base: vars
                    .get("INVITE_API_BASE")
                    .map(|base| base.trim_end_matches('/').to_string())
                    .unwrap_or_else(default_invite_api_base),
                timeout_ms: vars.parse_or("INVITE_TIMEOUT_MS", default_invite_timeout_ms())?,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: vars
                    .parse_or("RATE_LIMIT_REQUESTS_PER_SECOND", default_requests_per_second())?,
                burst: vars.parse_or("RATE_LIMIT_BURST", default_burst())?,
            },
            cors: CorsConfig {
                allowed_origins: vars
                    .get("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|o| !o.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        })
    }

    /// Configuration for tests and local runs: in-memory store, no Redis,
    /// no outbound invite lookups
    #[must_use]
    pub fn for_memory(identity_secret: &str) -> Self {
        Self {
            app: AppSettings {
                name: default_app_name(),
                env: Environment::Development,
            },
            server: ServerConfig {
                host: default_host(),
                port: 0,
                request_timeout_secs: default_request_timeout_secs(),
                body_limit_bytes: default_body_limit_bytes(),
            },
            store: StoreConfig {
                backend: StoreBackend::Memory,
                database: None,
            },
            redis: None,
            identity: IdentityConfig {
                secret: identity_secret.to_string(),
                issuer: None,
                audience: None,
                leeway_secs: default_identity_leeway_secs(),
            },
            authorization: AuthorizationConfig::default(),
            comments: CommentsConfig {
                max_length: default_comment_max_length(),
                visible_threads: default_visible_threads(),
            },
            reactions: ReactionsConfig {
                cooldown_ms: default_reaction_cooldown_ms(),
            },
            invites: InvitesConfig {
                enabled: false,
                api_base: default_invite_api_base(),
                timeout_ms: default_invite_timeout_ms(),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: default_requests_per_second(),
                burst: default_burst(),
            },
            cors: CorsConfig {
                allowed_origins: Vec::new(),
            },
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
