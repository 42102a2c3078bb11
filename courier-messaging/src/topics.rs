//! Topic configuration.

/// Names of the journal topics Courier consumes.
///
/// One `Topics` value is built from deployment configuration and handed to
/// every component that subscribes. Only the status topic matters to the
/// tracking family; package and command topics belong to other parts of the
/// system and are resolved by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    /// Topic carrying per-package status records from sub-agents.
    status: String,
}

impl Topics {
    /// Default name of the status topic.
    pub const DEFAULT_STATUS_TOPIC: &'static str = "courier_status";

    /// Creates topic configuration with default names.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: Self::DEFAULT_STATUS_TOPIC.to_string(),
        }
    }

    /// Overrides the status topic name.
    #[must_use]
    pub fn with_status_topic(mut self, name: impl Into<String>) -> Self {
        self.status = name.into();
        self
    }

    /// Returns the status topic name.
    #[must_use]
    pub fn status_topic(&self) -> &str {
        &self.status
    }
}

impl Default for Topics {
    fn default() -> Self {
        Self::new()
    }
}
