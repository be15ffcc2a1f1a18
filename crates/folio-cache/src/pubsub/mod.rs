//! Redis Pub/Sub module.
//!
//! Carries serialized [`folio_core::DomainEvent`]s between server instances.

mod channels;
mod publisher;
mod subscriber;

pub use channels::{PubSubChannel, EVENTS_CHANNEL, TARGET_CHANNEL_PREFIX};
pub use publisher::Publisher;
pub use subscriber::{
    ReceivedEvent, Subscriber, SubscriberBuilder, SubscriberConfig, SubscriberError,
    SubscriberResult,
};
