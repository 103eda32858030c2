//! Process instances and carbon-copy notices.

use super::{Actor, Identity, InstanceId, TaskId, TenantId, Variables};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// One running process. Created and archived by the surrounding process
/// layer; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    id: InstanceId,
    process_id: String,
    creator: Identity,
    variables: Variables,
    expire_time: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl Instance {
    /// Starts a new instance of `process_id`.
    #[must_use]
    pub fn new(process_id: impl Into<String>, creator: Identity, clock: &impl Clock) -> Self {
        Self {
            id: InstanceId::new(),
            process_id: process_id.into(),
            creator,
            variables: Variables::new(),
            expire_time: None,
            created_at: clock.utc(),
        }
    }

    /// Sets the instance variables.
    #[must_use]
    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    /// Sets the instance deadline.
    #[must_use]
    pub fn with_expire_time(mut self, expire_time: DateTime<Utc>) -> Self {
        self.expire_time = Some(expire_time);
        self
    }

    /// Returns the instance identifier.
    #[must_use]
    pub const fn id(&self) -> InstanceId {
        self.id
    }

    /// Returns the process definition identifier.
    #[must_use]
    pub fn process_id(&self) -> &str {
        &self.process_id
    }

    /// Returns the identity that started the instance.
    #[must_use]
    pub const fn creator(&self) -> &Identity {
        &self.creator
    }

    /// Returns the instance variables.
    #[must_use]
    pub const fn variables(&self) -> &Variables {
        &self.variables
    }

    /// Returns the instance deadline, if any.
    #[must_use]
    pub const fn expire_time(&self) -> Option<DateTime<Utc>> {
        self.expire_time
    }

    /// Returns the start time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A carbon-copy notice. Informs one recipient; never transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCc {
    /// Tenant tag.
    pub tenant_id: Option<TenantId>,
    /// Owning instance.
    pub instance_id: InstanceId,
    /// Task whose completion reached the notification node.
    pub parent_task_id: Option<TaskId>,
    /// Notification node name.
    pub task_name: String,
    /// Human-readable name.
    pub display_name: String,
    /// Recipient.
    pub actor: Actor,
    /// Identity whose action reached the node.
    pub creator: Identity,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}
