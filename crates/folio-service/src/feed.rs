//! Change feed
//!
//! Every successful write emits a [`DomainEvent`]. Watchers on this instance
//! listen on a local broadcast channel. With Redis configured, events are
//! published to Redis only and come back through the subscriber bridge, so
//! local and remote writes reach watchers along the same path. If the bridge
//! falls behind Redis it raises a resync, and every watcher reloads.

use std::sync::Arc;

use folio_cache::{PubSubChannel, Publisher, RedisPool, Subscriber, SubscriberBuilder};
use folio_core::DomainEvent;
use parking_lot::Mutex;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Default capacity of the local broadcast channel
pub const DEFAULT_FEED_CAPACITY: usize = 1024;

struct Bridge {
    subscriber: Subscriber,
    task: JoinHandle<()>,
}

struct Inner {
    local: broadcast::Sender<DomainEvent>,
    resync: Arc<watch::Sender<u64>>,
    publisher: Option<Publisher>,
    bridge: Mutex<Option<Bridge>>,
}

/// Fan-out of domain events to live watchers; clones share the channel
#[derive(Clone)]
pub struct ChangeFeed {
    inner: Arc<Inner>,
}

impl ChangeFeed {
    /// Feed that only reaches watchers on this instance
    pub fn local(capacity: usize) -> Self {
        let (local, _) = broadcast::channel(capacity);
        Self {
            inner: Arc::new(Inner {
                local,
                resync: Arc::new(watch::channel(0).0),
                publisher: None,
                bridge: Mutex::new(None),
            }),
        }
    }

    /// Feed shared with every instance connected to the same Redis
    pub async fn with_redis(
        pool: RedisPool,
        redis_url: &str,
        capacity: usize,
    ) -> Result<Self, folio_cache::SubscriberError> {
        let (local, _) = broadcast::channel(capacity);

        let subscriber = SubscriberBuilder::new()
            .redis_url(redis_url)
            .broadcast_buffer(capacity)
            .subscribe(PubSubChannel::events())
            .build()
            .await?;

        let mut received = subscriber.receiver();
        let forward = local.clone();
        let resync = Arc::new(watch::channel(0).0);
        let lagged = Arc::clone(&resync);
        let task = tokio::spawn(async move {
            loop {
                match received.recv().await {
                    Ok(message) => {
                        if let Some(event) = message.event {
                            let _ = forward.send(event);
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Change feed bridge lagged behind Redis, resyncing watchers");
                        bump(&lagged);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        info!("Change feed bridged through Redis");

        Ok(Self {
            inner: Arc::new(Inner {
                local,
                resync,
                publisher: Some(Publisher::new(pool)),
                bridge: Mutex::new(Some(Bridge { subscriber, task })),
            }),
        })
    }

    /// Publish an event. Never fails: a Redis outage degrades to local-only
    /// delivery.
    pub async fn publish(&self, event: DomainEvent) {
        if let Some(publisher) = &self.inner.publisher {
            match publisher.publish_event(&event).await {
                Ok(_) => return,
                Err(e) => {
                    warn!(error = %e, event_type = event.event_type(), "Redis publish failed, delivering locally");
                }
            }
        }
        self.send_local(event);
    }

    fn send_local(&self, event: DomainEvent) {
        let event_type = event.event_type();
        // Err only means nobody is watching right now
        let receivers = self.inner.local.send(event).unwrap_or(0);
        debug!(event_type, receivers, "Change feed event");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.inner.local.subscribe()
    }

    /// Changes whenever watchers must reload regardless of topic
    pub fn subscribe_resync(&self) -> watch::Receiver<u64> {
        self.inner.resync.subscribe()
    }

    /// Tell every watcher that events may have been missed
    pub fn request_resync(&self) {
        bump(&self.inner.resync);
    }

    pub fn is_bridged(&self) -> bool {
        self.inner.publisher.is_some()
    }

    /// Stop the Redis bridge; local delivery keeps working
    pub async fn shutdown(&self) {
        let bridge = self.inner.bridge.lock().take();
        if let Some(bridge) = bridge {
            if let Err(e) = bridge.subscriber.shutdown().await {
                debug!(error = %e, "Subscriber already stopped");
            }
            bridge.task.abort();
            info!("Change feed bridge stopped");
        }
    }
}

fn bump(resync: &watch::Sender<u64>) {
    resync.send_modify(|round| *round = round.wrapping_add(1));
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::local(DEFAULT_FEED_CAPACITY)
    }
}

impl std::fmt::Debug for ChangeFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeFeed")
            .field("bridged", &self.is_bridged())
            .field("receivers", &self.inner.local.receiver_count())
            .finish()
    }
}
