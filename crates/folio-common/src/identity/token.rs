//! Identity tokens
//!
//! Sessions are established by an external identity provider which hands the
//! browser a signed token (HS256). The server only verifies tokens and turns
//! their claims into an [`Identity`]; issuing exists for tests and local tooling.

use chrono::{Duration, Utc};
use folio_core::{Identity, UserId};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::IdentityConfig;

/// Claims carried by an identity token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Provider user id
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl IdentityClaims {
    /// Convert into a domain identity
    ///
    /// # Errors
    /// Returns `InvalidSubject` if `sub` is not a valid user id
    pub fn into_identity(self) -> Result<Identity, IdentityError> {
        let uid = UserId::parse(self.sub.as_str())
            .map_err(|_| IdentityError::InvalidSubject(self.sub.clone()))?;
        Ok(Identity {
            uid,
            display_name: self.name,
            photo_url: self.picture,
            email: self.email,
            email_verified: self.email_verified,
        })
    }
}

/// Identity token errors
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("identity token expired")]
    Expired,

    #[error("invalid identity token: {0}")]
    Invalid(String),

    #[error("identity token subject is not a valid user id: {0}")]
    InvalidSubject(String),

    #[error("failed to sign identity token: {0}")]
    Signing(String),
}

/// Verifies identity tokens against the shared secret
#[derive(Clone)]
pub struct IdentityVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: Option<String>,
    audience: Option<String>,
}

impl IdentityVerifier {
    #[must_use]
    pub fn new(config: &IdentityConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway_secs;
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        }
    }

    /// Decode and validate a token
    ///
    /// # Errors
    /// Returns `Expired` or `Invalid` when the token does not verify
    pub fn decode(&self, token: &str) -> Result<IdentityClaims, IdentityError> {
        decode::<IdentityClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => IdentityError::Expired,
                _ => IdentityError::Invalid(e.to_string()),
            })
    }

    /// Verify a token and return the identity it carries
    ///
    /// # Errors
    /// Returns an error if the token is invalid, expired or names a bad subject
    pub fn verify(&self, token: &str) -> Result<Identity, IdentityError> {
        self.decode(token)?.into_identity()
    }

    /// Sign a token for `identity`, valid for `ttl`
    ///
    /// # Errors
    /// Returns `Signing` if encoding fails
    pub fn issue(&self, identity: &Identity, ttl: Duration) -> Result<String, IdentityError> {
        let now = Utc::now();
        let claims = IdentityClaims {
            sub: identity.uid.to_string(),
            name: identity.display_name.clone(),
            picture: identity.photo_url.clone(),
            email: identity.email.clone(),
            email_verified: identity.email_verified,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| IdentityError::Signing(e.to_string()))
    }
}

impl std::fmt::Debug for IdentityVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityVerifier")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}
