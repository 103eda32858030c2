//! Identities, participant descriptors, and participant rows.

use super::{ActorKind, InstanceId, TaskDomainError, TaskId, TenantId};
use serde::{Deserialize, Serialize};

/// An already-authenticated identity acting on the engine.
///
/// The identifier may be empty; access control treats that as "unknown" and
/// denies it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    id: String,
    name: String,
}

impl Identity {
    /// Creates an identity from its identifier and display name.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether the identifier is blank.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.id.trim().is_empty()
    }
}

/// Participant descriptor: a user, role, or department eligible to act.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    id: String,
    name: String,
    kind: ActorKind,
}

impl Actor {
    /// Creates a participant descriptor.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ActorKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }

    /// Creates a user participant.
    #[must_use]
    pub fn user(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, ActorKind::User)
    }

    /// Creates a role participant.
    #[must_use]
    pub fn role(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, ActorKind::Role)
    }

    /// Creates a department participant.
    #[must_use]
    pub fn department(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, ActorKind::Department)
    }

    /// Returns the participant identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns what the entry denotes.
    #[must_use]
    pub const fn kind(&self) -> ActorKind {
        self.kind
    }

    /// The identity a user participant acts as.
    #[must_use]
    pub fn as_identity(&self) -> Identity {
        Identity::new(self.id.clone(), self.name.clone())
    }

    /// Checks the descriptor can be attached to a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyActorId`] when the identifier is blank.
    pub fn validate(&self) -> Result<(), TaskDomainError> {
        if self.id.trim().is_empty() {
            return Err(TaskDomainError::EmptyActorId);
        }
        Ok(())
    }
}

/// A participant currently attached to an active task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskActor {
    /// Tenant tag.
    pub tenant_id: Option<TenantId>,
    /// Owning instance.
    pub instance_id: InstanceId,
    /// Owning active task.
    pub task_id: TaskId,
    /// Participant descriptor.
    pub actor: Actor,
}

impl TaskActor {
    /// Attaches `actor` to a task.
    #[must_use]
    pub const fn new(
        tenant_id: Option<TenantId>,
        instance_id: InstanceId,
        task_id: TaskId,
        actor: Actor,
    ) -> Self {
        Self {
            tenant_id,
            instance_id,
            task_id,
            actor,
        }
    }

    /// Returns the participant identifier.
    #[must_use]
    pub fn actor_id(&self) -> &str {
        self.actor.id()
    }

    /// Reinstates an archived participant onto a freshly restored task.
    #[must_use]
    pub fn restore(archived: &HisTaskActor, task_id: TaskId) -> Self {
        Self {
            tenant_id: archived.tenant_id.clone(),
            instance_id: archived.instance_id,
            task_id,
            actor: archived.actor.clone(),
        }
    }
}

/// Archived snapshot of a [`TaskActor`], keyed by the terminal task id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HisTaskActor {
    /// Tenant tag.
    pub tenant_id: Option<TenantId>,
    /// Owning instance.
    pub instance_id: InstanceId,
    /// Owning history record.
    pub task_id: TaskId,
    /// Participant descriptor.
    pub actor: Actor,
}

impl HisTaskActor {
    /// Returns the participant identifier.
    #[must_use]
    pub fn actor_id(&self) -> &str {
        self.actor.id()
    }
}

impl From<TaskActor> for HisTaskActor {
    fn from(row: TaskActor) -> Self {
        Self {
            tenant_id: row.tenant_id,
            instance_id: row.instance_id,
            task_id: row.task_id,
            actor: row.actor,
        }
    }
}
