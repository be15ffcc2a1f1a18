//! Domain events

mod domain_event;

pub use domain_event::{
    AdminListChangedEvent, CommentCreatedEvent, CommentDeletedEvent, CommentPinnedEvent,
    DomainEvent, ReactionChangedEvent, WatchTopic,
};
