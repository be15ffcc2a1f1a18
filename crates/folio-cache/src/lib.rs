//! # folio-cache
//!
//! Redis plumbing shared by every server instance.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Pub/Sub**: Domain events fanned out so watchers on any instance see
//!   writes made on another
//!
//! ## Example
//!
//! ```ignore
//! use folio_cache::{Publisher, RedisPool, RedisPoolConfig, SubscriberBuilder, PubSubChannel};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let publisher = Publisher::new(pool);
//! publisher.publish_event(&event).await?;
//!
//! let subscriber = SubscriberBuilder::new()
//!     .redis_url("redis://127.0.0.1:6379")
//!     .subscribe(PubSubChannel::events())
//!     .build()
//!     .await?;
//! let mut rx = subscriber.receiver();
//! ```

pub mod pool;
pub mod pubsub;

pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};

pub use pubsub::{
    PubSubChannel, Publisher, ReceivedEvent, Subscriber, SubscriberBuilder, SubscriberConfig,
    SubscriberError, SubscriberResult, EVENTS_CHANNEL, TARGET_CHANNEL_PREFIX,
};
