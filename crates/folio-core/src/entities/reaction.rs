//! Reactions - per-user exclusive choice and the aggregate tally per target
//!
//! Each (target, user) pair holds at most one active reaction kind. The tally
//! is a cache of how many choices are currently set to each kind and is only
//! ever moved by the delta computed in [`ReactionTransition::resolve`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::{TargetId, UserId};

/// The three mutually exclusive reaction kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Dislike,
    Heart,
}

impl ReactionKind {
    pub const ALL: [ReactionKind; 3] = [Self::Like, Self::Dislike, Self::Heart];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
            Self::Heart => "heart",
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "like" => Ok(Self::Like),
            "dislike" => Ok(Self::Dislike),
            "heart" => Ok(Self::Heart),
            other => Err(DomainError::ValidationError(format!(
                "unknown reaction kind: {other}"
            ))),
        }
    }
}

/// A user's current reaction on a target. `kind == None` is the tombstone
/// left behind when the user un-reacts; the record is never deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionChoice {
    pub target_id: TargetId,
    pub user_id: UserId,
    pub kind: Option<ReactionKind>,
    pub updated_at: DateTime<Utc>,
}

/// Signed per-kind change to apply to a tally in one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TallyDelta {
    pub like: i64,
    pub dislike: i64,
    pub heart: i64,
}

impl TallyDelta {
    pub fn get(&self, kind: ReactionKind) -> i64 {
        match kind {
            ReactionKind::Like => self.like,
            ReactionKind::Dislike => self.dislike,
            ReactionKind::Heart => self.heart,
        }
    }

    fn bump(&mut self, kind: ReactionKind, by: i64) {
        match kind {
            ReactionKind::Like => self.like += by,
            ReactionKind::Dislike => self.dislike += by,
            ReactionKind::Heart => self.heart += by,
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.like == 0 && self.dislike == 0 && self.heart == 0
    }
}

/// Aggregate counters for a target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionTally {
    pub target_id: TargetId,
    pub like: u64,
    pub dislike: u64,
    pub heart: u64,
}

impl ReactionTally {
    /// A target nobody has reacted to yet
    pub fn empty(target_id: TargetId) -> Self {
        Self {
            target_id,
            like: 0,
            dislike: 0,
            heart: 0,
        }
    }

    pub fn count(&self, kind: ReactionKind) -> u64 {
        match kind {
            ReactionKind::Like => self.like,
            ReactionKind::Dislike => self.dislike,
            ReactionKind::Heart => self.heart,
        }
    }

    pub fn total(&self) -> u64 {
        self.like + self.dislike + self.heart
    }

    /// Apply a delta; counters saturate at zero
    pub fn apply(&mut self, delta: TallyDelta) {
        fn shift(count: u64, by: i64) -> u64 {
            if by >= 0 {
                count.saturating_add(by.unsigned_abs())
            } else {
                count.saturating_sub(by.unsigned_abs())
            }
        }
        self.like = shift(self.like, delta.like);
        self.dislike = shift(self.dislike, delta.dislike);
        self.heart = shift(self.heart, delta.heart);
    }
}

/// Result of a user clicking a reaction kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionTransition {
    pub previous: Option<ReactionKind>,
    pub next: Option<ReactionKind>,
    pub delta: TallyDelta,
}

impl ReactionTransition {
    /// Compute the next choice and the combined tally delta.
    ///
    /// - unset → X: +1 X
    /// - X → X: -1 X, choice cleared
    /// - X → Y: -1 X and +1 Y in a single delta
    pub fn resolve(current: Option<ReactionKind>, requested: ReactionKind) -> Self {
        let mut delta = TallyDelta::default();
        let next = match current {
            Some(previous) if previous == requested => {
                delta.bump(previous, -1);
                None
            }
            Some(previous) => {
                delta.bump(previous, -1);
                delta.bump(requested, 1);
                Some(requested)
            }
            None => {
                delta.bump(requested, 1);
                Some(requested)
            }
        };
        Self {
            previous: current,
            next,
            delta,
        }
    }

    /// True when the request cleared the user's reaction
    #[inline]
    pub fn is_toggle_off(&self) -> bool {
        self.previous.is_some() && self.next.is_none()
    }
}

/// What an atomic apply wrote to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionOutcome {
    pub transition: ReactionTransition,
    pub choice: ReactionChoice,
    pub tally: ReactionTally,
}
