//! Status-topic messaging abstraction for Courier.
//!
//! This crate defines the seam between Courier's in-memory trackers and the
//! journal transport that delivers status records: a provider trait for
//! registering a push handler on a topic, a subscription handle for
//! releasing it, and topic configuration.
//!
//! # Overview
//!
//! The tracker never polls. A [`MessagingProvider`] owns topic resolution,
//! deserialization, and the delivery loop; Courier registers a
//! [`StatusHandler`] and receives already-decoded [`StatusMessage`]s, one
//! callback per record, until the [`Subscription`] is closed. Providers
//! guarantee at-least-once delivery starting from the earliest retained
//! record when a subscription is created with [`ResetPosition::Earliest`].
//!
//! # Testing
//!
//! [`InMemoryMessaging`] is the in-process provider used by tests: it
//! retains published messages per topic, replays the backlog to earliest
//! subscribers, delivers synchronously on the publisher's thread, and
//! injects deterministic close failures via [`MessagingFaultConfig`]:
//!
//! ```ignore
//! use courier_messaging::{InMemoryMessaging, MessagingFaultConfig};
//!
//! // Provider whose next subscription close fails.
//! let provider = InMemoryMessaging::new();
//! provider.fault_config().force_close_fail = true;
//! ```
//!
//! [`StatusMessage`]: courier_core::StatusMessage

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod error;
mod memory;
mod provider;
mod topics;

pub use error::{MessagingError, MessagingResult};
pub use memory::{InMemoryMessaging, MessagingFaultConfig};
pub use provider::{MessagingProvider, ResetPosition, StatusHandler, Subscription};
pub use topics::Topics;
