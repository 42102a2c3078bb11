//! Per-subscriber readiness flags.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use dashmap::DashMap;

use courier_core::SubscriberId;

/// Shared readiness flags gating whether a subscriber may begin
/// processing.
///
/// Flags are created lazily with initial value `false`, exactly once per
/// subscriber even under concurrent first access. Every caller holding a
/// handle for the same subscriber sees the same cell, so a toggle from
/// one is visible to all.
#[derive(Debug, Default)]
pub struct ReadinessStore {
    /// Readiness cells keyed by subscriber.
    flags: DashMap<SubscriberId, Arc<AtomicBool>>,
}

impl ReadinessStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            flags: DashMap::new(),
        }
    }

    /// Returns the shared readiness cell for `subscriber`, creating it
    /// with value `false` on first access.
    #[must_use]
    pub fn ready_flag(&self, subscriber: &SubscriberId) -> Arc<AtomicBool> {
        Arc::clone(
            &self
                .flags
                .entry(subscriber.clone())
                .or_insert_with(|| Arc::new(AtomicBool::new(false))),
        )
    }
}
