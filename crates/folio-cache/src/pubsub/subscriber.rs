//! Redis Pub/Sub subscriber.
//!
//! Holds one dedicated pub/sub connection, re-subscribes after reconnecting
//! and fans received events out over a tokio broadcast channel.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use folio_core::DomainEvent;
use futures_util::StreamExt;
use rand::Rng;
use redis::Client;
use tokio::sync::{broadcast, mpsc, RwLock};

use crate::pool::redact_url;
use crate::pubsub::PubSubChannel;

#[derive(Debug, thiserror::Error)]
pub enum SubscriberError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Channel closed")]
    ChannelClosed,
}

pub type SubscriberResult<T> = Result<T, SubscriberError>;

/// Message received from Pub/Sub
#[derive(Debug, Clone)]
pub struct ReceivedEvent {
    pub channel: PubSubChannel,
    /// Parsed event; `None` when the payload is not a domain event
    pub event: Option<DomainEvent>,
    pub payload: String,
}

impl ReceivedEvent {
    fn from_redis(channel_name: &str, payload: String) -> Self {
        let channel = PubSubChannel::parse(channel_name);
        let event = match serde_json::from_str(&payload) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::warn!(channel = %channel_name, error = %e, "Ignoring undecodable payload");
                None
            }
        };

        Self {
            channel,
            event,
            payload,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    pub redis_url: String,
    /// Capacity of the local broadcast channel
    pub broadcast_buffer: usize,
    /// First reconnect delay; doubles per failed attempt
    pub reconnect_delay_ms: u64,
    pub max_reconnect_delay_ms: u64,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            broadcast_buffer: 1024,
            reconnect_delay_ms: 1000,
            max_reconnect_delay_ms: 30_000,
        }
    }
}

/// Delay before reconnect attempt `attempt` (0-based): exponential, capped,
/// plus up to half the base delay of random jitter
pub(crate) fn reconnect_delay(config: &SubscriberConfig, attempt: u32) -> Duration {
    let exp = config
        .reconnect_delay_ms
        .saturating_mul(1u64 << attempt.min(16))
        .min(config.max_reconnect_delay_ms);
    let jitter = rand::thread_rng().gen_range(0..=config.reconnect_delay_ms / 2);
    Duration::from_millis(exp.saturating_add(jitter))
}

/// Redis Pub/Sub subscriber
pub struct Subscriber {
    subscribed: Arc<RwLock<HashSet<String>>>,
    broadcast_tx: broadcast::Sender<ReceivedEvent>,
    control_tx: mpsc::Sender<SubscriberCommand>,
}

impl std::fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriber")
            .field("receivers", &self.broadcast_tx.receiver_count())
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
enum SubscriberCommand {
    Subscribe(Vec<String>),
    Unsubscribe(Vec<String>),
    Shutdown,
}

impl Subscriber {
    /// Create a subscriber and start its background listener
    pub fn new(config: SubscriberConfig) -> Self {
        let (broadcast_tx, _) = broadcast::channel(config.broadcast_buffer);
        let (control_tx, control_rx) = mpsc::channel(32);
        let subscribed = Arc::new(RwLock::new(HashSet::new()));

        tokio::spawn(Self::listener_loop(
            config,
            subscribed.clone(),
            broadcast_tx.clone(),
            control_rx,
        ));

        Self {
            subscribed,
            broadcast_tx,
            control_tx,
        }
    }

    async fn listener_loop(
        config: SubscriberConfig,
        subscribed: Arc<RwLock<HashSet<String>>>,
        broadcast_tx: broadcast::Sender<ReceivedEvent>,
        mut control_rx: mpsc::Receiver<SubscriberCommand>,
    ) {
        let mut attempt = 0u32;
        loop {
            match Self::run_listener(
                &config,
                &subscribed,
                &broadcast_tx,
                &mut control_rx,
                &mut attempt,
            )
            .await
            {
                Ok(true) => {
                    tracing::info!("Subscriber shutting down");
                    break;
                }
                Ok(false) => {}
                Err(e) => {
                    let delay = reconnect_delay(&config, attempt);
                    attempt = attempt.saturating_add(1);
                    tracing::error!(
                        error = %e,
                        attempt = attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Subscriber error, reconnecting"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Run until error or shutdown. `Ok(true)` means stop for good.
    async fn run_listener(
        config: &SubscriberConfig,
        subscribed: &Arc<RwLock<HashSet<String>>>,
        broadcast_tx: &broadcast::Sender<ReceivedEvent>,
        control_rx: &mut mpsc::Receiver<SubscriberCommand>,
        attempt: &mut u32,
    ) -> SubscriberResult<bool> {
        let client = Client::open(config.redis_url.as_str())?;
        let mut pubsub = client.get_async_pubsub().await?;

        {
            let channels = subscribed.read().await;
            for channel in channels.iter() {
                pubsub.subscribe(channel).await?;
            }
        }

        *attempt = 0;
        tracing::info!(url = %redact_url(&config.redis_url), "Subscriber connected to Redis");

        let mut stream = pubsub.on_message();

        loop {
            tokio::select! {
                msg = stream.next() => {
                    let Some(msg) = msg else {
                        tracing::warn!("Pub/Sub stream ended");
                        return Ok(false);
                    };
                    let channel_name = msg.get_channel_name().to_string();
                    let payload: String = msg.get_payload().unwrap_or_default();
                    tracing::trace!(channel = %channel_name, "Received Pub/Sub message");

                    // No local receivers is not an error
                    let _ = broadcast_tx.send(ReceivedEvent::from_redis(&channel_name, payload));
                }

                cmd = control_rx.recv() => {
                    match cmd {
                        Some(SubscriberCommand::Subscribe(channels)) => {
                            drop(stream);
                            for channel in &channels {
                                if let Err(e) = pubsub.subscribe(channel).await {
                                    tracing::error!(channel = %channel, error = %e, "Failed to subscribe");
                                } else {
                                    subscribed.write().await.insert(channel.clone());
                                    tracing::debug!(channel = %channel, "Subscribed to channel");
                                }
                            }
                            stream = pubsub.on_message();
                        }
                        Some(SubscriberCommand::Unsubscribe(channels)) => {
                            drop(stream);
                            for channel in &channels {
                                if let Err(e) = pubsub.unsubscribe(channel).await {
                                    tracing::error!(channel = %channel, error = %e, "Failed to unsubscribe");
                                } else {
                                    subscribed.write().await.remove(channel);
                                    tracing::debug!(channel = %channel, "Unsubscribed from channel");
                                }
                            }
                            stream = pubsub.on_message();
                        }
                        Some(SubscriberCommand::Shutdown) | None => return Ok(true),
                    }
                }
            }
        }
    }

    pub async fn subscribe(&self, channels: &[PubSubChannel]) -> SubscriberResult<()> {
        let names = channels.iter().map(PubSubChannel::name).collect();
        self.control_tx
            .send(SubscriberCommand::Subscribe(names))
            .await
            .map_err(|_| SubscriberError::ChannelClosed)
    }

    pub async fn unsubscribe(&self, channels: &[PubSubChannel]) -> SubscriberResult<()> {
        let names = channels.iter().map(PubSubChannel::name).collect();
        self.control_tx
            .send(SubscriberCommand::Unsubscribe(names))
            .await
            .map_err(|_| SubscriberError::ChannelClosed)
    }

    #[must_use]
    pub fn receiver(&self) -> broadcast::Receiver<ReceivedEvent> {
        self.broadcast_tx.subscribe()
    }

    pub async fn subscribed_channels(&self) -> Vec<String> {
        self.subscribed.read().await.iter().cloned().collect()
    }

    pub async fn shutdown(&self) -> SubscriberResult<()> {
        self.control_tx
            .send(SubscriberCommand::Shutdown)
            .await
            .map_err(|_| SubscriberError::ChannelClosed)
    }
}

/// Builder for [`Subscriber`]
#[derive(Debug, Default)]
pub struct SubscriberBuilder {
    config: SubscriberConfig,
    initial_channels: Vec<PubSubChannel>,
}

impl SubscriberBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn redis_url(mut self, url: impl Into<String>) -> Self {
        self.config.redis_url = url.into();
        self
    }

    #[must_use]
    pub fn broadcast_buffer(mut self, size: usize) -> Self {
        self.config.broadcast_buffer = size;
        self
    }

    #[must_use]
    pub fn reconnect_delay_ms(mut self, delay: u64) -> Self {
        self.config.reconnect_delay_ms = delay;
        self
    }

    #[must_use]
    pub fn max_reconnect_delay_ms(mut self, delay: u64) -> Self {
        self.config.max_reconnect_delay_ms = delay;
        self
    }

    #[must_use]
    pub fn subscribe(mut self, channel: PubSubChannel) -> Self {
        self.initial_channels.push(channel);
        self
    }

    /// Start the subscriber. Connection failures are retried in the
    /// background, so this only fails if the listener task is gone.
    pub async fn build(self) -> SubscriberResult<Subscriber> {
        let subscriber = Subscriber::new(self.config);

        if !self.initial_channels.is_empty() {
            subscriber.subscribe(&self.initial_channels).await?;
        }

        Ok(subscriber)
    }
}
