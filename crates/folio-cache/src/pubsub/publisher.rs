//! Redis Pub/Sub publisher.

use folio_core::DomainEvent;
use redis::AsyncCommands;

use crate::pool::{RedisPool, RedisResult};
use crate::pubsub::PubSubChannel;

/// Channels an event is published on: the firehose, plus its target channel
/// when the event belongs to one
pub(crate) fn channels_for(event: &DomainEvent) -> Vec<PubSubChannel> {
    let mut channels = vec![PubSubChannel::events()];
    if let Some(target_id) = event.target_id() {
        channels.push(PubSubChannel::target(target_id.clone()));
    }
    channels
}

/// Redis Pub/Sub publisher
#[derive(Clone, Debug)]
pub struct Publisher {
    pool: RedisPool,
}

impl Publisher {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Publish a raw payload; returns the number of receivers
    pub async fn publish_raw(&self, channel: &PubSubChannel, message: &str) -> RedisResult<u32> {
        let mut conn = self.pool.get().await?;
        let channel_name = channel.name();

        let receivers: u32 = conn.publish(&channel_name, message).await?;

        tracing::debug!(
            channel = %channel_name,
            receivers = receivers,
            "Published raw message"
        );

        Ok(receivers)
    }

    /// Serialize a domain event and publish it to every channel it belongs on
    pub async fn publish_event(&self, event: &DomainEvent) -> RedisResult<u32> {
        let payload = serde_json::to_string(event)?;
        let channels = channels_for(event);
        let mut conn = self.pool.get().await?;
        let mut total_receivers = 0;

        for channel in &channels {
            let receivers: u32 = conn.publish(channel.name(), &payload).await?;
            total_receivers += receivers;
        }

        tracing::debug!(
            event_type = event.event_type(),
            channels = channels.len(),
            total_receivers = total_receivers,
            "Published domain event"
        );

        Ok(total_receivers)
    }
}
