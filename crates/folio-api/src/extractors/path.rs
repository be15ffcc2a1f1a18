//! Path parameter extractors
//!
//! Identifiers are validated while deserializing, so a malformed target or
//! comment id is rejected before any handler runs.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use folio_core::{CommentId, ReactionKind, TargetId};
use serde::{de::DeserializeOwned, Deserialize};

use crate::response::ApiError;

/// Path extractor rendering failures as `INVALID_PATH_PARAMETER`
#[derive(Debug, Clone)]
pub struct ParsedPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ParsedPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(inner) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.body_text()))?;

        Ok(ParsedPath(inner))
    }
}

#[derive(Debug, Deserialize)]
pub struct TargetPath {
    pub target_id: TargetId,
}

#[derive(Debug, Deserialize)]
pub struct CommentIdPath {
    pub comment_id: CommentId,
}

/// `/targets/:target_id/reactions/:kind`
#[derive(Debug, Deserialize)]
pub struct ReactionPath {
    pub target_id: TargetId,
    kind: String,
}

impl ReactionPath {
    /// Kinds are matched case-insensitively
    pub fn kind(&self) -> Result<ReactionKind, ApiError> {
        self.kind
            .parse()
            .map_err(|_| ApiError::invalid_path(format!("Unknown reaction kind: {}", self.kind)))
    }
}
