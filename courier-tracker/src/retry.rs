//! Per-entry retry counter.

use dashmap::DashMap;

use courier_core::EntryId;

/// Counts delivery attempts per queue entry.
///
/// Retry/backoff logic reads the count to decide whether a failed package
/// delivery should be retried or abandoned. Keys are independent; absent
/// keys read as zero.
#[derive(Debug, Default)]
pub struct RetryCounter {
    /// Attempt counts keyed by entry.
    counts: DashMap<EntryId, u32>,
}

impl RetryCounter {
    /// Creates an empty counter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            counts: DashMap::new(),
        }
    }

    /// Returns the retry count for `entry`, zero if never increased.
    #[must_use]
    pub fn get(&self, entry: &EntryId) -> u32 {
        self.counts.get(entry).map_or(0, |count| *count)
    }

    /// Increments the retry count for `entry`.
    ///
    /// Same-key increments from concurrent callers are applied under the
    /// entry's shard lock, so none are lost.
    pub fn increase(&self, entry: &EntryId) {
        let mut count = self.counts.entry(entry.clone()).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Resets the retry count for `entry` to zero.
    pub fn clear(&self, entry: &EntryId) {
        self.counts.remove(entry);
    }
}
