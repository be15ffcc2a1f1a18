//! Re-entrancy guard for reactions
//!
//! A (target, user) pair may have one reaction request in flight. After it
//! completes the pair stays closed for a cooldown, which absorbs
//! double-clicks before they reach the store.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use folio_core::{TargetId, UserId};

type GuardKey = (TargetId, UserId);

/// Entries beyond this count trigger a sweep of expired cooldowns
const SWEEP_THRESHOLD: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GuardState {
    InFlight,
    CoolingDown { until: Instant },
}

/// Shared per-(target, user) request gate
#[derive(Debug, Clone)]
pub struct ReactionGuard {
    entries: Arc<DashMap<GuardKey, GuardState>>,
    cooldown: Duration,
}

impl ReactionGuard {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            cooldown,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Claim the pair. `None` while another request is in flight or the
    /// previous one is still cooling down.
    pub fn try_acquire(&self, target_id: &TargetId, user_id: &UserId) -> Option<GuardPermit> {
        if self.entries.len() > SWEEP_THRESHOLD {
            self.sweep();
        }

        let key = (target_id.clone(), user_id.clone());
        let now = Instant::now();
        match self.entries.entry(key.clone()) {
            Entry::Vacant(vacant) => {
                vacant.insert(GuardState::InFlight);
            }
            Entry::Occupied(mut occupied) => match *occupied.get() {
                GuardState::InFlight => return None,
                GuardState::CoolingDown { until } if now < until => return None,
                GuardState::CoolingDown { .. } => {
                    occupied.insert(GuardState::InFlight);
                }
            },
        }

        Some(GuardPermit {
            entries: Arc::clone(&self.entries),
            key: Some(key),
            cooldown: self.cooldown,
        })
    }

    /// Number of pairs currently tracked
    pub fn tracked(&self) -> usize {
        self.entries.len()
    }

    fn sweep(&self) {
        let now = Instant::now();
        self.entries.retain(|_, state| match state {
            GuardState::InFlight => true,
            GuardState::CoolingDown { until } => *until > now,
        });
    }
}

impl Default for ReactionGuard {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

/// Held while a reaction request runs; dropping it starts the cooldown
#[derive(Debug)]
pub struct GuardPermit {
    entries: Arc<DashMap<GuardKey, GuardState>>,
    key: Option<GuardKey>,
    cooldown: Duration,
}

impl Drop for GuardPermit {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            if self.cooldown.is_zero() {
                self.entries.remove(&key);
            } else {
                let until = Instant::now() + self.cooldown;
                self.entries.insert(key, GuardState::CoolingDown { until });
            }
        }
    }
}
