//! Provider trait abstraction for status-topic delivery.
//!
//! This module defines the traits separating Courier from the concrete
//! journal transport, allowing different implementations for production
//! and for in-process tests.
//!
//! # Design
//!
//! The traits abstract the core delivery operations:
//! - Registering a push handler on a topic
//! - Releasing the subscription when the owner shuts down
//!
//! Production code binds a broker-backed provider; tests use
//! [`InMemoryMessaging`](crate::InMemoryMessaging).

use std::sync::Arc;

use async_trait::async_trait;
use courier_core::StatusMessage;

use crate::error::MessagingResult;

/// Where a new subscription starts in the retained stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetPosition {
    /// Replay from the earliest retained record, then continue live.
    ///
    /// This is what the tracker uses: its state is memory-only, so a
    /// restart must rebuild it from the full retained stream.
    #[default]
    Earliest,
    /// Skip the backlog and deliver only records published after the
    /// subscription was created.
    Latest,
}

/// Push handler invoked once per delivered status record.
///
/// Implementations must be cheap and non-blocking: the provider calls
/// `on_status` from its own delivery threads (possibly more than one over
/// the subscription's lifetime), and a slow handler stalls delivery for
/// every other handler on the topic.
pub trait StatusHandler: Send + Sync {
    /// Handles one decoded status record.
    fn on_status(&self, message: StatusMessage);
}

/// Handle on an active subscription.
///
/// Dropping the handle without closing it leaks the registration in
/// providers that cannot observe drops; owners call [`close`] during
/// teardown and propagate its error.
///
/// [`close`]: Subscription::close
#[async_trait]
pub trait Subscription: Send + Sync {
    /// Releases the subscription.
    ///
    /// Idempotent: closing an already-released subscription is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails to release the underlying
    /// stream. Callers must surface this as a resource-release failure,
    /// not swallow it.
    async fn close(&mut self) -> MessagingResult<()>;
}

/// Provider of status-topic subscriptions.
///
/// The provider owns topic resolution, record deserialization, and the
/// delivery loop. Courier depends only on this trait, never on a concrete
/// transport.
///
/// # Implementation Notes
///
/// Implementations must be `Send + Sync` so a single provider can serve
/// subscriptions created from different tasks.
#[async_trait]
pub trait MessagingProvider: Send + Sync {
    /// Registers `handler` for every record on `topic`.
    ///
    /// With [`ResetPosition::Earliest`] the handler first receives the
    /// retained backlog (at-least-once), then live records, in delivery
    /// order per publisher.
    ///
    /// # Errors
    ///
    /// Returns an error if the topic cannot be resolved or the underlying
    /// transport rejects the subscription.
    async fn subscribe(
        &self,
        topic: &str,
        reset: ResetPosition,
        handler: Arc<dyn StatusHandler>,
    ) -> MessagingResult<Box<dyn Subscription>>;
}
