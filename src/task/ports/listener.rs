//! Task listener port.

use crate::task::domain::Task;
use std::fmt;

/// Lifecycle events delivered to a [`TaskListener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskEvent {
    /// A task was created.
    Create,
    /// A task was completed.
    Complete,
    /// A task's fields or participants changed.
    Update,
    /// A task was closed by the due-task sweep.
    Timeout,
    /// A task was rejected back to its parent step.
    Reject,
}

impl TaskEvent {
    /// Returns the event name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Complete => "complete",
            Self::Update => "update",
            Self::Timeout => "timeout",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for TaskEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives lifecycle events after the triggering transition has committed.
///
/// Delivery is fire-and-forget: the listener cannot fail or veto the
/// transition.
pub trait TaskListener: Send + Sync {
    /// Handles one event for the given task snapshot.
    fn notify(&self, event: TaskEvent, task: &Task);
}
