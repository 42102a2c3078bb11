//! In-memory messaging provider.
//!
//! Provides [`InMemoryMessaging`] for in-process testing: topics are plain
//! vectors of retained messages, delivery is synchronous on the
//! publisher's thread, and subscription close failures can be injected
//! deterministically.

#![allow(clippy::significant_drop_tightening)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use courier_core::StatusMessage;
use tracing::debug;

use crate::error::{MessagingError, MessagingResult};
use crate::provider::{MessagingProvider, ResetPosition, StatusHandler, Subscription};

// -----------------------------------------------------------------------------
// Fault Configuration
// -----------------------------------------------------------------------------

/// Fault configuration for the in-memory provider.
#[derive(Debug, Clone, Default)]
pub struct MessagingFaultConfig {
    /// Probability of close operations failing (0.0 - 1.0).
    pub close_fail_rate: f64,
    /// Force next close to fail (one-shot).
    pub force_close_fail: bool,
    /// Force next subscribe to fail (one-shot).
    pub force_subscribe_fail: bool,
}

impl MessagingFaultConfig {
    /// No faults (all operations succeed).
    #[must_use]
    pub const fn none() -> Self {
        Self {
            close_fail_rate: 0.0,
            force_close_fail: false,
            force_subscribe_fail: false,
        }
    }

    /// Builder: set close fail rate.
    #[must_use]
    pub const fn with_close_fail_rate(mut self, rate: f64) -> Self {
        self.close_fail_rate = rate;
        self
    }
}

// -----------------------------------------------------------------------------
// Shared State
// -----------------------------------------------------------------------------

/// A registered handler on a topic.
struct SubscriberEntry {
    /// Subscription identity, matched on close.
    id: u64,
    /// The handler receiving deliveries.
    handler: Arc<dyn StatusHandler>,
}

/// Per-topic retained messages and live subscribers.
#[derive(Default)]
struct TopicState {
    /// Every message ever published, in publish order.
    retained: Vec<StatusMessage>,
    /// Live subscriptions.
    subscribers: Vec<SubscriberEntry>,
}

/// State shared between provider clones and subscription handles.
struct Shared {
    /// Topic name to retained messages and subscribers.
    topics: Mutex<HashMap<String, TopicState>>,
    /// Fault configuration.
    fault_config: Mutex<MessagingFaultConfig>,
    /// Subscription ID generator.
    next_subscription_id: AtomicU64,
    /// RNG seed for deterministic faults.
    seed: u64,
    /// Operation counter for deterministic RNG.
    counter: AtomicU64,
}

impl Shared {
    /// Deterministic fault decision using the `(seed + counter) * M` hash.
    fn should_inject_fault(&self, rate: f64) -> bool {
        if rate <= 0.0 {
            return false;
        }
        if rate >= 1.0 {
            return true;
        }
        let counter = self.counter.fetch_add(1, Ordering::Relaxed);
        let hash = self
            .seed
            .wrapping_add(counter)
            .wrapping_mul(0x9e37_79b9_7f4a_7c15);
        #[allow(clippy::cast_precision_loss)]
        let normalized = (hash as f64) / (u64::MAX as f64);
        normalized < rate
    }
}

// -----------------------------------------------------------------------------
// In-Memory Provider
// -----------------------------------------------------------------------------

/// In-memory messaging provider for in-process tests.
///
/// Topics retain every published message, so a subscription created with
/// [`ResetPosition::Earliest`] replays the full backlog before receiving
/// live records - the same contract a journal-backed provider gives a
/// restarting consumer. Delivery is synchronous on the publisher's thread:
/// concurrent publishers exercise handlers concurrently.
///
/// Clones share state via `Arc` for multi-handle testing.
#[derive(Clone)]
pub struct InMemoryMessaging {
    inner: Arc<Shared>,
}

impl InMemoryMessaging {
    /// Creates a new provider with no faults.
    #[must_use]
    pub fn new() -> Self {
        Self::with_faults(0, MessagingFaultConfig::none())
    }

    /// Creates a provider with deterministic fault injection.
    #[must_use]
    pub fn with_faults(seed: u64, config: MessagingFaultConfig) -> Self {
        Self {
            inner: Arc::new(Shared {
                topics: Mutex::new(HashMap::new()),
                fault_config: Mutex::new(config),
                next_subscription_id: AtomicU64::new(1),
                seed,
                counter: AtomicU64::new(0),
            }),
        }
    }

    /// Returns fault config for modification.
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn fault_config(&self) -> std::sync::MutexGuard<'_, MessagingFaultConfig> {
        self.inner
            .fault_config
            .lock()
            .expect("fault config lock poisoned")
    }

    /// Publishes a message on `topic`, delivering it synchronously to
    /// every live subscriber and retaining it for future subscribers.
    ///
    /// # Panics
    ///
    /// Panics if the topic mutex is poisoned.
    pub fn publish(&self, topic: &str, message: StatusMessage) {
        let handlers: Vec<Arc<dyn StatusHandler>> = {
            let mut topics = self.inner.topics.lock().expect("topics lock poisoned");
            let state = topics.entry(topic.to_string()).or_default();
            state.retained.push(message.clone());
            state
                .subscribers
                .iter()
                .map(|entry| Arc::clone(&entry.handler))
                .collect()
        };

        // Deliver outside the lock so handlers may publish re-entrantly and
        // concurrent publishers reach handlers concurrently.
        for handler in handlers {
            handler.on_status(message.clone());
        }
    }

    /// Returns the number of live subscribers on `topic` (for assertions
    /// in tests).
    ///
    /// # Panics
    ///
    /// Panics if the topic mutex is poisoned.
    #[must_use]
    pub fn subscriber_count(&self, topic: &str) -> usize {
        let topics = self.inner.topics.lock().expect("topics lock poisoned");
        topics.get(topic).map_or(0, |state| state.subscribers.len())
    }

    /// Returns the number of retained messages on `topic` (for assertions
    /// in tests).
    ///
    /// # Panics
    ///
    /// Panics if the topic mutex is poisoned.
    #[must_use]
    pub fn retained_count(&self, topic: &str) -> usize {
        let topics = self.inner.topics.lock().expect("topics lock poisoned");
        topics.get(topic).map_or(0, |state| state.retained.len())
    }
}

impl Default for InMemoryMessaging {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryMessaging {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryMessaging").finish_non_exhaustive()
    }
}

#[async_trait]
impl MessagingProvider for InMemoryMessaging {
    async fn subscribe(
        &self,
        topic: &str,
        reset: ResetPosition,
        handler: Arc<dyn StatusHandler>,
    ) -> MessagingResult<Box<dyn Subscription>> {
        // Check for forced failure.
        {
            let mut config = self.inner.fault_config.lock().expect("lock poisoned");
            if config.force_subscribe_fail {
                config.force_subscribe_fail = false;
                return Err(MessagingError::Io {
                    operation: "subscribe",
                    message: "simulated failure (forced)".into(),
                });
            }
        }

        let id = self.inner.next_subscription_id.fetch_add(1, Ordering::Relaxed);

        // Snapshot the backlog and register under one lock acquisition so
        // no record is both replayed and delivered live.
        let backlog: Vec<StatusMessage> = {
            let mut topics = self.inner.topics.lock().expect("topics lock poisoned");
            let state = topics.entry(topic.to_string()).or_default();
            let backlog = match reset {
                ResetPosition::Earliest => state.retained.clone(),
                ResetPosition::Latest => Vec::new(),
            };
            state.subscribers.push(SubscriberEntry {
                id,
                handler: Arc::clone(&handler),
            });
            backlog
        };

        debug!(topic, subscription = id, replay = backlog.len(), "Subscribed");

        // Replay outside the lock. Records published while the backlog
        // replays may interleave with it; the stream is unordered anyway.
        for message in backlog {
            handler.on_status(message);
        }

        Ok(Box::new(InMemorySubscription {
            shared: Arc::clone(&self.inner),
            topic: topic.to_string(),
            id,
            closed: false,
        }))
    }
}

// -----------------------------------------------------------------------------
// Subscription Handle
// -----------------------------------------------------------------------------

/// Handle on an in-memory subscription.
struct InMemorySubscription {
    shared: Arc<Shared>,
    topic: String,
    id: u64,
    closed: bool,
}

#[async_trait]
impl Subscription for InMemorySubscription {
    async fn close(&mut self) -> MessagingResult<()> {
        if self.closed {
            return Ok(());
        }

        // Check for forced failure.
        {
            let mut config = self.shared.fault_config.lock().expect("lock poisoned");
            if config.force_close_fail {
                config.force_close_fail = false;
                return Err(MessagingError::CloseFailed {
                    topic: self.topic.clone(),
                    message: "simulated failure (forced)".into(),
                });
            }
        }

        // Check for probabilistic failure.
        let close_fail_rate = self.shared.fault_config.lock().expect("lock").close_fail_rate;
        if self.shared.should_inject_fault(close_fail_rate) {
            return Err(MessagingError::CloseFailed {
                topic: self.topic.clone(),
                message: "simulated failure (random)".into(),
            });
        }

        let mut topics = self.shared.topics.lock().expect("topics lock poisoned");
        if let Some(state) = topics.get_mut(&self.topic) {
            state.subscribers.retain(|entry| entry.id != self.id);
        }
        self.closed = true;

        debug!(topic = %self.topic, subscription = self.id, "Closed subscription");
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
