//! Reaction entity <-> model mappers

use folio_core::{DomainError, ReactionChoice, ReactionKind, ReactionTally, TargetId, UserId};

use super::comment::corrupt_row;
use crate::models::{ReactionChoiceModel, ReactionTallyModel};

pub(crate) fn parse_kind(kind: Option<&str>) -> Result<Option<ReactionKind>, DomainError> {
    kind.map(str::parse::<ReactionKind>)
        .transpose()
        .map_err(corrupt_row)
}

impl TryFrom<ReactionChoiceModel> for ReactionChoice {
    type Error = DomainError;

    fn try_from(model: ReactionChoiceModel) -> Result<Self, Self::Error> {
        Ok(ReactionChoice {
            kind: parse_kind(model.kind.as_deref())?,
            target_id: TargetId::parse(model.target_id).map_err(corrupt_row)?,
            user_id: UserId::parse(model.user_id).map_err(corrupt_row)?,
            updated_at: model.updated_at,
        })
    }
}

impl TryFrom<ReactionTallyModel> for ReactionTally {
    type Error = DomainError;

    fn try_from(model: ReactionTallyModel) -> Result<Self, Self::Error> {
        // CHECK constraints keep the counters non-negative
        let count = |n: i64| u64::try_from(n).unwrap_or(0);
        Ok(ReactionTally {
            target_id: TargetId::parse(model.target_id).map_err(corrupt_row)?,
            like: count(model.like_count),
            dislike: count(model.dislike_count),
            heart: count(model.heart_count),
        })
    }
}
