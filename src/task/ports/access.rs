//! Access strategy port.

use crate::task::domain::TaskActor;
use async_trait::async_trait;

/// Decides whether an identity is among a task's current participants.
///
/// Participant entries may denote roles or departments, so membership
/// resolution belongs to the host environment.
#[async_trait]
pub trait TaskAccessStrategy: Send + Sync {
    /// Returns whether `identity` may act given `participants`.
    async fn is_allowed(&self, identity: &str, participants: &[TaskActor]) -> bool;
}
