//! Comment tree assembly
//!
//! Turns a flat snapshot of comments into parent threads. Parents are ordered
//! pinned first, then newest first; replies under a parent read oldest first.
//! The store gives no ordering guarantee, so this runs on every snapshot.

use std::collections::HashMap;

use crate::entities::Comment;
use crate::value_objects::CommentId;

/// Default number of parent threads shown before "show all"
pub const DEFAULT_VISIBLE_THREADS: usize = 2;

/// A top-level comment with its ordered replies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentThread {
    pub parent: Comment,
    pub replies: Vec<Comment>,
}

/// Assemble threads from a flat snapshot.
///
/// Replies whose parent is absent from the snapshot (or is itself a reply)
/// are dropped.
pub fn assemble_tree(raw: Vec<Comment>) -> Vec<CommentThread> {
    let (mut parents, replies): (Vec<Comment>, Vec<Comment>) =
        raw.into_iter().partition(|c| !c.is_reply());

    // Stable sort: equal keys keep snapshot order
    parents.sort_by(|a, b| {
        b.pinned
            .cmp(&a.pinned)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });

    let mut by_parent: HashMap<CommentId, Vec<Comment>> = HashMap::new();
    for reply in replies {
        if let Some(parent_id) = reply.parent_id {
            by_parent.entry(parent_id).or_default().push(reply);
        }
    }

    parents
        .into_iter()
        .map(|parent| {
            let mut replies = by_parent.remove(&parent.id).unwrap_or_default();
            replies.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            CommentThread { parent, replies }
        })
        .collect()
}

/// Presentation window over assembled threads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleWindow {
    pub limit: usize,
    pub expanded: bool,
}

impl Default for VisibleWindow {
    fn default() -> Self {
        Self {
            limit: DEFAULT_VISIBLE_THREADS,
            expanded: false,
        }
    }
}

/// Threads the viewer sees plus how many are behind "show all"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowedThreads {
    pub visible: Vec<CommentThread>,
    pub hidden: usize,
}

impl VisibleWindow {
    pub fn new(limit: usize, expanded: bool) -> Self {
        Self { limit, expanded }
    }

    pub fn apply(&self, mut threads: Vec<CommentThread>) -> WindowedThreads {
        if self.expanded || threads.len() <= self.limit {
            return WindowedThreads {
                visible: threads,
                hidden: 0,
            };
        }
        let hidden = threads.len() - self.limit;
        threads.truncate(self.limit);
        WindowedThreads {
            visible: threads,
            hidden,
        }
    }
}
