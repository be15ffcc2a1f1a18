//! Chat invite enrichment
//!
//! Resolves an invite code to the server's name and artwork through the
//! public invites endpoint. Results are cached for the process lifetime.

use std::sync::Arc;

use dashmap::DashMap;
use folio_common::{AppError, InvitesConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::error::{ServiceError, ServiceResult};

const MAX_CODE_LEN: usize = 64;

/// Server details behind an invite code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteDetails {
    pub code: String,
    pub guild_name: Option<String>,
    pub icon_url: Option<String>,
    pub banner_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InvitePayload {
    guild: Option<GuildPayload>,
}

#[derive(Debug, Deserialize)]
struct GuildPayload {
    id: String,
    name: Option<String>,
    icon: Option<String>,
    banner: Option<String>,
}

impl InviteDetails {
    fn from_payload(code: &str, payload: InvitePayload) -> Self {
        let Some(guild) = payload.guild else {
            return Self {
                code: code.to_string(),
                guild_name: None,
                icon_url: None,
                banner_url: None,
            };
        };
        Self {
            code: code.to_string(),
            icon_url: guild
                .icon
                .as_deref()
                .map(|icon| format!("https://cdn.discordapp.com/icons/{}/{icon}.png?size=128", guild.id)),
            banner_url: guild.banner.as_deref().map(|banner| {
                format!("https://cdn.discordapp.com/banners/{}/{banner}.jpg?size=1024", guild.id)
            }),
            guild_name: guild.name,
        }
    }
}

/// Invite codes are short slugs of letters, digits, `-` and `_`
pub fn is_valid_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= MAX_CODE_LEN
        && code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Cached invite resolver; clones share the cache and HTTP client
#[derive(Clone)]
pub struct InviteLookup {
    client: reqwest::Client,
    api_base: String,
    cache: Arc<DashMap<String, InviteDetails>>,
}

impl InviteLookup {
    pub fn new(config: &InvitesConfig) -> ServiceResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ServiceError::internal(format!("invite client: {e}")))?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            cache: Arc::new(DashMap::new()),
        })
    }

    pub fn cached(&self, code: &str) -> Option<InviteDetails> {
        self.cache.get(code).map(|entry| entry.value().clone())
    }

    /// Resolve an invite, from cache when possible
    #[instrument(skip(self))]
    pub async fn lookup(&self, code: &str) -> ServiceResult<InviteDetails> {
        if !is_valid_code(code) {
            return Err(ServiceError::validation(format!("invalid invite code: {code}")));
        }
        if let Some(details) = self.cached(code) {
            return Ok(details);
        }

        let response = self
            .client
            .get(format!("{}/invites/{code}", self.api_base))
            .send()
            .await
            .map_err(|e| AppError::ExternalService(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ServiceError::not_found("Invite", code));
        }
        if !status.is_success() {
            return Err(AppError::ExternalService(format!("invite lookup returned {status}")).into());
        }

        let payload: InvitePayload = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(e.to_string()))?;
        let details = InviteDetails::from_payload(code, payload);
        self.cache.insert(code.to_string(), details.clone());
        debug!(code, guild = ?details.guild_name, "Invite resolved");
        Ok(details)
    }

    /// Resolve codes in the background; failures are only logged
    pub fn prefetch(&self, codes: Vec<String>) {
        let pending: Vec<String> = codes
            .into_iter()
            .filter(|code| !self.cache.contains_key(code))
            .collect();
        if pending.is_empty() {
            return;
        }

        let lookup = self.clone();
        tokio::spawn(async move {
            for code in pending {
                if let Err(e) = lookup.lookup(&code).await {
                    debug!(code = %code, error = %e, "Invite prefetch failed");
                }
            }
        });
    }
}

impl std::fmt::Debug for InviteLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InviteLookup")
            .field("api_base", &self.api_base)
            .field("cached", &self.cache.len())
            .finish()
    }
}
