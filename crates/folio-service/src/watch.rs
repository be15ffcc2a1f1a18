//! Live watches
//!
//! A [`WatchRegistry`] belongs to one view (one websocket connection) and
//! keys its watches by container id. Each watch runs a task that loads a full
//! snapshot, delivers it, and reloads whenever the change feed reports an
//! event affecting the watched topic. Watching a container again releases
//! the previous watch first, so a container never has two live tasks.
//!
//! Deliveries go to the paired [`WatchEvents`] receiver, which drops
//! anything produced by a generation that has since been released.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use folio_core::{DomainEvent, Identity, WatchTopic};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::{broadcast, mpsc, watch, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::dto::{CommentsSnapshot, ReactionState};
use crate::services::{CommentService, ReactionService, ServiceContext, ServiceResult};

/// Deliveries buffered per view before watch tasks wait
const WATCH_BUFFER: usize = 64;

/// Full state of one watched topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "topic", content = "data", rename_all = "snake_case")]
pub enum WatchSnapshot {
    Comments(CommentsSnapshot),
    Reactions(ReactionState),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WatchPayload {
    Snapshot { snapshot: WatchSnapshot },
    /// The snapshot could not be loaded; the watch has ended
    Failed { code: String, message: String },
}

/// One delivery for one container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchEvent {
    pub container_id: String,
    pub generation: u64,
    #[serde(flatten)]
    pub payload: WatchPayload,
}

/// Container id to its live generation
type LiveGenerations = Arc<DashMap<String, u64>>;

struct Watch {
    generation: u64,
    topic: WatchTopic,
    expanded: Arc<AtomicBool>,
    refresh: Arc<Notify>,
    task: JoinHandle<()>,
}

/// Watches of one view
pub struct WatchRegistry {
    ctx: ServiceContext,
    viewer: Arc<RwLock<Option<Identity>>>,
    watches: HashMap<String, Watch>,
    live: LiveGenerations,
    next_generation: u64,
    sender: mpsc::Sender<WatchEvent>,
}

impl WatchRegistry {
    pub fn new(ctx: ServiceContext, viewer: Option<Identity>) -> (Self, WatchEvents) {
        let (sender, receiver) = mpsc::channel(WATCH_BUFFER);
        let live = LiveGenerations::default();
        let registry = Self {
            ctx,
            viewer: Arc::new(RwLock::new(viewer)),
            watches: HashMap::new(),
            live: Arc::clone(&live),
            next_generation: 0,
            sender,
        };
        (registry, WatchEvents { receiver, live })
    }

    /// Start watching `topic` in `container_id`, replacing whatever the
    /// container watched before. Returns the new generation.
    pub fn watch(&mut self, container_id: impl Into<String>, topic: WatchTopic) -> u64 {
        let container_id = container_id.into();
        let expanded = self
            .watches
            .get(&container_id)
            .filter(|previous| previous.topic == topic)
            .is_some_and(|previous| previous.expanded.load(Ordering::SeqCst));
        self.release(&container_id);

        self.next_generation += 1;
        let generation = self.next_generation;
        self.live.insert(container_id.clone(), generation);

        let expanded = Arc::new(AtomicBool::new(expanded));
        let refresh = Arc::new(Notify::new());
        let task = WatchTask {
            ctx: self.ctx.clone(),
            container_id: container_id.clone(),
            generation,
            topic: topic.clone(),
            viewer: Arc::clone(&self.viewer),
            expanded: Arc::clone(&expanded),
            refresh: Arc::clone(&refresh),
            sender: self.sender.clone(),
            // Subscribed before the first load so no write slips in between
            events: self.ctx.feed().subscribe(),
            resync: self.ctx.feed().subscribe_resync(),
        };

        debug!(container_id = %container_id, generation, ?topic, "Watch started");
        self.watches.insert(
            container_id,
            Watch {
                generation,
                topic,
                expanded,
                refresh,
                task: tokio::spawn(task.run()),
            },
        );
        generation
    }

    /// Stop watching a container. Returns false if it was not watched.
    pub fn unwatch(&mut self, container_id: &str) -> bool {
        let released = self.release(container_id);
        if released {
            debug!(container_id, "Watch released");
        }
        released
    }

    /// Show all threads of a comment container, or go back to the first few.
    /// Returns false if the container is not watched.
    pub fn set_expanded(&mut self, container_id: &str, expanded: bool) -> bool {
        let Some(watch) = self.watches.get(container_id) else {
            return false;
        };
        if watch.expanded.swap(expanded, Ordering::SeqCst) != expanded {
            watch.refresh.notify_one();
        }
        true
    }

    /// Switch the viewer (sign in, sign out). Every watch reloads since
    /// per-viewer flags and choices change.
    pub fn identify(&mut self, viewer: Option<Identity>) {
        *self.viewer.write() = viewer;
        for watch in self.watches.values() {
            watch.refresh.notify_one();
        }
    }

    pub fn viewer(&self) -> Option<Identity> {
        self.viewer.read().clone()
    }

    /// Containers with a running watch
    pub fn active(&self) -> Vec<&str> {
        self.watches
            .iter()
            .filter(|(_, watch)| !watch.task.is_finished())
            .map(|(container_id, _)| container_id.as_str())
            .collect()
    }

    /// Generation currently live for a container
    pub fn generation(&self, container_id: &str) -> Option<u64> {
        self.watches.get(container_id).map(|watch| watch.generation)
    }

    /// Release every watch
    pub fn dispose(&mut self) {
        let containers: Vec<String> = self.watches.keys().cloned().collect();
        for container_id in containers {
            self.release(&container_id);
        }
    }

    fn release(&mut self, container_id: &str) -> bool {
        // Unpublish the generation first; queued deliveries are dropped by the receiver
        self.live.remove(container_id);
        match self.watches.remove(container_id) {
            Some(watch) => {
                watch.task.abort();
                true
            }
            None => false,
        }
    }
}

impl Drop for WatchRegistry {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for WatchRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchRegistry")
            .field("watches", &self.watches.len())
            .field("next_generation", &self.next_generation)
            .finish_non_exhaustive()
    }
}

/// Receiving side of a [`WatchRegistry`]
pub struct WatchEvents {
    receiver: mpsc::Receiver<WatchEvent>,
    live: LiveGenerations,
}

impl WatchEvents {
    /// Next delivery of a live watch. `None` once the registry and all its
    /// watches are gone.
    pub async fn recv(&mut self) -> Option<WatchEvent> {
        loop {
            let event = self.receiver.recv().await?;
            if self.is_live(&event) {
                return Some(event);
            }
            debug!(
                container_id = %event.container_id,
                generation = event.generation,
                "Dropped delivery of released watch"
            );
        }
    }

    fn is_live(&self, event: &WatchEvent) -> bool {
        self.live
            .get(&event.container_id)
            .is_some_and(|generation| *generation == event.generation)
    }
}

struct WatchTask {
    ctx: ServiceContext,
    container_id: String,
    generation: u64,
    topic: WatchTopic,
    viewer: Arc<RwLock<Option<Identity>>>,
    expanded: Arc<AtomicBool>,
    refresh: Arc<Notify>,
    sender: mpsc::Sender<WatchEvent>,
    events: broadcast::Receiver<DomainEvent>,
    resync: watch::Receiver<u64>,
}

impl WatchTask {
    async fn run(mut self) {
        loop {
            let payload = match self.load().await {
                Ok(snapshot) => WatchPayload::Snapshot { snapshot },
                Err(e) => {
                    warn!(
                        container_id = %self.container_id,
                        error = %e,
                        "Watch snapshot failed"
                    );
                    WatchPayload::Failed {
                        code: e.error_code().to_string(),
                        message: e.to_string(),
                    }
                }
            };
            let failed = matches!(payload, WatchPayload::Failed { .. });

            let event = WatchEvent {
                container_id: self.container_id.clone(),
                generation: self.generation,
                payload,
            };
            if self.sender.send(event).await.is_err() || failed {
                return;
            }

            if !self.wait_for_change().await {
                return;
            }
        }
    }

    /// Block until the snapshot is stale. False when the feed is gone.
    async fn wait_for_change(&mut self) -> bool {
        loop {
            tokio::select! {
                () = self.refresh.notified() => return true,
                Ok(()) = self.resync.changed() => return true,
                received = self.events.recv() => match received {
                    Ok(event) if event.affects(&self.topic) => return true,
                    Ok(_) => {}
                    // Missed events may have touched the topic
                    Err(broadcast::error::RecvError::Lagged(_)) => return true,
                    Err(broadcast::error::RecvError::Closed) => return false,
                },
            }
        }
    }

    async fn load(&self) -> ServiceResult<WatchSnapshot> {
        let viewer = self.viewer.read().clone();
        match &self.topic {
            WatchTopic::Comments { target_id } => {
                let service = CommentService::new(&self.ctx);
                let window = service.window(self.expanded.load(Ordering::SeqCst));
                service
                    .snapshot(target_id, viewer.as_ref(), window)
                    .await
                    .map(WatchSnapshot::Comments)
            }
            WatchTopic::Reactions { target_id } => ReactionService::new(&self.ctx)
                .state(target_id, viewer.as_ref())
                .await
                .map(WatchSnapshot::Reactions),
        }
    }
}
