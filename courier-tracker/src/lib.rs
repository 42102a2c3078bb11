//! Delivery-confirmation tracking for Courier.
//!
//! This crate answers the question that gates replication preconditions:
//! "has the package at offset O been confirmed by sub-agent A?" - including
//! packages whose confirmation will never arrive because the status stream
//! has already advanced past them.
//!
//! # Overview
//!
//! - [`StatusTracker`]: consumes the status topic through a
//!   [`MessagingProvider`] subscription and serves point queries per
//!   `(agent, offset)`. Explicit reports win; for offsets older than the
//!   lowest offset ever observed, the tracker infers that the package was
//!   imported, because its status can no longer arrive.
//! - [`RetryCounter`]: per-entry retry counts for retry/backoff decisions.
//! - [`ReadinessStore`]: per-subscriber readiness flags gating whether a
//!   subscriber may begin processing.
//!
//! All three are passive, concurrency-safe data structures: delivery
//! threads push events in, arbitrary caller threads query, and nothing
//! blocks for an unbounded time.
//!
//! # Example
//!
//! ```ignore
//! use courier_core::{AgentId, Offset};
//! use courier_messaging::{InMemoryMessaging, Topics};
//! use courier_tracker::StatusTracker;
//!
//! let provider = InMemoryMessaging::new();
//! let tracker = StatusTracker::new(&provider, &Topics::default()).await?;
//!
//! // Precondition check for a pending package.
//! let confirmed = tracker.status(&AgentId::new("publish-1"), Offset::new(42));
//!
//! // Teardown releases the status subscription.
//! tracker.close().await?;
//! ```
//!
//! [`MessagingProvider`]: courier_messaging::MessagingProvider

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod error;
mod ready;
mod retry;
mod tracker;

pub use error::{TrackerError, TrackerResult};
pub use ready::ReadinessStore;
pub use retry::RetryCounter;
pub use tracker::StatusTracker;
