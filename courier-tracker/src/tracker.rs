//! Status tracker for package delivery confirmation.
//!
//! The tracker consumes the status topic and answers point queries of
//! "effective status for `(agent, offset)`". Three properties hold at once:
//!
//! - Status records arrive asynchronously and out of order across agents.
//! - Every explicit report is kept per `(agent, offset)`; a later report
//!   for the same pair overwrites the earlier one.
//! - A single global low-water-mark - the lowest offset seen in any status
//!   record, from any agent - separates "not yet known" from "can no
//!   longer be reported". An offset strictly below it will never receive
//!   its own report, so the tracker infers the package was imported in an
//!   earlier cycle whose acknowledgment was dropped or superseded.
//!
//! The low-water-mark is agent-agnostic on purpose: the precondition
//! question is "can a status for this offset still arrive from any
//! source", and any agent's traffic narrows that answer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use courier_core::{AgentId, Offset, PackageStatus, StatusMessage};
use courier_messaging::{
    MessagingProvider, ResetPosition, StatusHandler, Subscription, Topics,
};
use dashmap::DashMap;
use tracing::{debug, info};

use crate::error::TrackerResult;

/// Sentinel for "no status record observed yet" (conceptually +infinity).
const LOW_WATER_MARK_UNKNOWN: u64 = u64::MAX;

// -----------------------------------------------------------------------------
// Tracker State
// -----------------------------------------------------------------------------

/// Shared tracker state, written by delivery threads and read by query
/// threads.
struct TrackerState {
    /// Lowest offset seen in any status record. Never increases.
    low_water_mark: AtomicU64,
    /// Explicit statuses per agent, keyed by package offset.
    /// Agent maps are created lazily on first sight and never removed.
    per_agent: DashMap<AgentId, DashMap<Offset, PackageStatus>>,
}

impl TrackerState {
    fn new() -> Self {
        Self {
            low_water_mark: AtomicU64::new(LOW_WATER_MARK_UNKNOWN),
            per_agent: DashMap::new(),
        }
    }

    /// Lowers the low-water-mark to `offset` if it is the lowest seen.
    ///
    /// Compare-and-swap retry loop: delivery may use several threads, and
    /// a plain read-modify-write could lose the minimum between them.
    fn observe_offset(&self, offset: Offset) {
        let candidate = offset.get();
        let mut current = self.low_water_mark.load(Ordering::Relaxed);
        while candidate < current {
            match self.low_water_mark.compare_exchange_weak(
                current,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(observed) => current = observed,
            }
        }
    }

    /// Returns the low-water-mark, or `None` while no record has arrived.
    fn low_water_mark(&self) -> Option<Offset> {
        let raw = self.low_water_mark.load(Ordering::Acquire);
        if raw == LOW_WATER_MARK_UNKNOWN {
            None
        } else {
            Some(Offset::new(raw))
        }
    }

    /// Returns true if a status for `offset` can no longer arrive: the
    /// stream has demonstrably progressed past it.
    fn can_no_longer_arrive(&self, offset: Offset) -> bool {
        self.low_water_mark()
            .is_some_and(|lowest| offset < lowest)
    }

    /// Effective status for `(agent, offset)`: the explicit record if one
    /// exists, the inferred terminal status if the offset is provably
    /// stale, `None` while the answer is still pending.
    fn effective_status(&self, agent: &AgentId, offset: Offset) -> Option<PackageStatus> {
        if let Some(statuses) = self.per_agent.get(agent) {
            if let Some(status) = statuses.get(&offset) {
                return Some(*status);
            }
        }
        if self.can_no_longer_arrive(offset) {
            info!(
                agent = %agent,
                offset = %offset,
                "Considering package imported as its status can no longer arrive"
            );
            return Some(PackageStatus::Imported);
        }
        None
    }
}

impl StatusHandler for TrackerState {
    fn on_status(&self, message: StatusMessage) {
        self.observe_offset(message.offset);
        // TODO: reject stale overwrites once status records carry a revision.
        self.per_agent
            .entry(message.sub_agent.clone())
            .or_default()
            .insert(message.offset, message.status);
        debug!(
            agent = %message.sub_agent,
            offset = %message.offset,
            status = %message.status,
            "Recorded package status"
        );
    }
}

// -----------------------------------------------------------------------------
// Status Tracker
// -----------------------------------------------------------------------------

/// Tracks delivery confirmations reported on the status topic.
///
/// # Design
///
/// The tracker is passive: the messaging provider pushes one callback per
/// delivered record, and precondition logic queries [`status`]
/// synchronously from arbitrary threads. State accumulates for the process
/// lifetime; there is no eviction.
///
/// # Thread Safety
///
/// Writes go through a lock-free compare-and-swap for the low-water-mark
/// and sharded concurrent maps with atomic get-or-create for the per-agent
/// records, so a writer never blocks a reader for an unbounded time.
///
/// [`status`]: StatusTracker::status
pub struct StatusTracker {
    /// State shared with the subscription handler.
    state: Arc<TrackerState>,
    /// The inbound status-topic subscription, released by [`close`].
    ///
    /// [`close`]: StatusTracker::close
    subscription: Box<dyn Subscription>,
}

impl StatusTracker {
    /// Creates a tracker bound to the status topic for its lifetime.
    ///
    /// Subscribes from the earliest retained record: tracker state is
    /// memory-only, so a restart rebuilds it from the full stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider rejects the subscription.
    pub async fn new(provider: &dyn MessagingProvider, topics: &Topics) -> TrackerResult<Self> {
        let state = Arc::new(TrackerState::new());
        let handler: Arc<dyn StatusHandler> = state.clone();
        let subscription = provider
            .subscribe(topics.status_topic(), ResetPosition::Earliest, handler)
            .await?;

        info!(topic = topics.status_topic(), "Status tracker subscribed");
        Ok(Self {
            state,
            subscription,
        })
    }

    /// Returns the effective status for the package at `offset` as
    /// reported by `agent`.
    ///
    /// - The explicitly recorded status, if one was observed.
    /// - `Some(Imported)` if no record exists but the offset is strictly
    ///   below the low-water-mark: its status can no longer arrive, so
    ///   absence plus staleness counts as implicit success.
    /// - `None` while the answer is still unknown. Callers treat this as
    ///   "not yet confirmed" and re-check later; it is not an error.
    #[must_use]
    pub fn status(&self, agent: &AgentId, offset: Offset) -> Option<PackageStatus> {
        self.state.effective_status(agent, offset)
    }

    /// Returns the lowest offset observed across all status records, or
    /// `None` while no record has arrived.
    #[must_use]
    pub fn low_water_mark(&self) -> Option<Offset> {
        self.state.low_water_mark()
    }

    /// Releases the status-topic subscription.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails to release the inbound
    /// stream; the failure is surfaced, never swallowed.
    pub async fn close(mut self) -> TrackerResult<()> {
        self.subscription.close().await?;
        Ok(())
    }
}

impl std::fmt::Debug for StatusTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusTracker")
            .field("low_water_mark", &self.state.low_water_mark())
            .field("agents", &self.state.per_agent.len())
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
