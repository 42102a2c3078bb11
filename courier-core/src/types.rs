//! Strongly-typed name identifiers for Courier entities.
//!
//! Agents and subscribers are identified by names assigned upstream, so
//! these IDs wrap shared strings rather than integers. Explicit types
//! prevent bugs from mixing up an agent name with a subscriber name.

use std::fmt;
use std::sync::Arc;

/// Macro to generate strongly-typed name wrappers.
///
/// Each name type wraps an `Arc<str>` and provides:
/// - Type safety (can't mix `AgentId` with `SubscriberId`)
/// - Cheap clones, usable as concurrent-map keys
/// - Debug/Display formatting
macro_rules! define_name {
    ($name:ident, $prefix:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(Arc<str>);

        impl $name {
            /// Creates a new ID from a name.
            #[must_use]
            pub fn new(name: impl Into<Arc<str>>) -> Self {
                Self(name.into())
            }

            /// Returns the name as a string slice.
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $prefix, self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(name: &str) -> Self {
                Self::new(name)
            }
        }

        impl From<String> for $name {
            fn from(name: String) -> Self {
                Self::new(name)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }
    };
}

// Status reporting.
define_name!(
    AgentId,
    "agent",
    "Name of a downstream sub-agent reporting package statuses."
);

// Subscriber lifecycle.
define_name!(
    SubscriberId,
    "subscriber",
    "Name of a subscriber process gated by the readiness store."
);

// Retry bookkeeping.
define_name!(
    EntryId,
    "entry",
    "Opaque identifier for a queue entry tracked by the retry counter."
);
