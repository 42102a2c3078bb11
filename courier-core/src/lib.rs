//! Courier Core - Strongly-typed identifiers and the package-status data
//! model for Courier.
//!
//! Courier tracks delivery confirmations for a journal-based content
//! distribution system. This crate provides the types shared by the
//! messaging seam and the tracker: named identifiers for agents and
//! subscribers, the `Offset` position type, and the decoded status message.
//! It performs no I/O and owns no wire format - decoding happens in the
//! upstream messaging collaborator.
//!
//! # Design Principles
//!
//! - **Strongly-typed IDs**: Prevent mixing up an agent name with a
//!   subscriber name
//! - **Explicit types**: Use u32/u64, not usize
//! - **No unsafe code**: Safety > Performance

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod status;
mod types;

pub use status::{Offset, PackageStatus, StatusMessage};
pub use types::{AgentId, EntryId, SubscriberId};
