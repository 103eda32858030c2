//! Membership-based access strategy.

use crate::task::{
    domain::{ActorKind, TaskActor},
    ports::TaskAccessStrategy,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

/// Resolves participants against a static membership table.
///
/// User entries match the identity directly. Role and department entries
/// match when the identity has been registered as a member.
#[derive(Debug, Clone, Default)]
pub struct MembershipAccessStrategy {
    memberships: HashMap<String, HashSet<(ActorKind, String)>>,
}

impl MembershipAccessStrategy {
    /// Creates a strategy with no group memberships.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `identity` as holding `role_id`.
    #[must_use]
    pub fn with_role(self, identity: impl Into<String>, role_id: impl Into<String>) -> Self {
        self.with_member(identity.into(), ActorKind::Role, role_id.into())
    }

    /// Registers `identity` as belonging to `department_id`.
    #[must_use]
    pub fn with_department(
        self,
        identity: impl Into<String>,
        department_id: impl Into<String>,
    ) -> Self {
        self.with_member(identity.into(), ActorKind::Department, department_id.into())
    }

    fn with_member(mut self, identity: String, kind: ActorKind, group_id: String) -> Self {
        self.memberships
            .entry(identity)
            .or_default()
            .insert((kind, group_id));
        self
    }

    fn matches(&self, identity: &str, row: &TaskActor) -> bool {
        match row.actor.kind() {
            ActorKind::User => row.actor_id() == identity,
            kind @ (ActorKind::Role | ActorKind::Department) => self
                .memberships
                .get(identity)
                .is_some_and(|groups| groups.contains(&(kind, row.actor_id().to_owned()))),
        }
    }
}

#[async_trait]
impl TaskAccessStrategy for MembershipAccessStrategy {
    async fn is_allowed(&self, identity: &str, participants: &[TaskActor]) -> bool {
        participants.iter().any(|row| self.matches(identity, row))
    }
}
