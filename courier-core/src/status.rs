//! Package-status types for Courier.
//!
//! A status message is the decoded form of one record on the status topic:
//! a sub-agent's report about the package at a given offset. Offsets are
//! assigned by the upstream journal per partition, but status messages are
//! NOT delivered to Courier in offset order - sub-agents report
//! independently and delivery jitter reorders them.

use std::fmt;

use crate::types::AgentId;

/// Offset in a journal/topic partition.
///
/// The primary ordering and identity key for package events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Offset(u64);

impl Offset {
    /// Creates an offset from a raw value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw offset value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns the next offset.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Offset {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

/// Outcome a sub-agent reports for a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageStatus {
    /// The package was imported successfully. Terminal.
    Imported,
    /// The package was removed from the sub-agent's queue without import.
    Removed,
    /// Removing the package failed after exhausting retries.
    RemoveFailed,
    /// Importing the package failed.
    ImportFailed,
}

impl fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Imported => "imported",
            Self::Removed => "removed",
            Self::RemoveFailed => "remove_failed",
            Self::ImportFailed => "import_failed",
        };
        write!(f, "{name}")
    }
}

/// A decoded status record delivered from the status topic.
///
/// The `offset` is the package's offset in the package journal, not the
/// position of the status record itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// Offset of the package this status confirms.
    pub offset: Offset,
    /// The sub-agent reporting the status.
    pub sub_agent: AgentId,
    /// The reported outcome.
    pub status: PackageStatus,
}

impl StatusMessage {
    /// Creates a new status message.
    #[must_use]
    pub fn new(offset: Offset, sub_agent: AgentId, status: PackageStatus) -> Self {
        Self {
            offset,
            sub_agent,
            status,
        }
    }
}
