//! Active and historical task records.
//!
//! [`Task`] and [`HisTask`] share one base field set, [`TaskRecord`]. A history
//! record adds a [`Disposition`]; the two shapes are connected only through
//! [`Task::into_historical`] and [`Task::from_historical`].

use super::{Identity, InstanceId, ParticipationType, TaskId, TaskType, TenantId, TerminalState};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Serialized variable payload carried by tasks and instances.
pub type Variables = serde_json::Map<String, serde_json::Value>;

/// Field set shared by active tasks and their history records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Tenant tag.
    pub tenant_id: Option<TenantId>,
    /// Owning instance.
    pub instance_id: InstanceId,
    /// Task whose completion spawned this one; `None` for root tasks.
    pub parent_task_id: Option<TaskId>,
    /// Node name the task was produced by.
    pub task_name: String,
    /// Human-readable name.
    pub display_name: String,
    /// Kind of work.
    pub task_type: TaskType,
    /// Participation strategy.
    pub participation: ParticipationType,
    /// Variable payload.
    pub variables: Variables,
    /// Identity that transferred or delegated the task, if any.
    pub assignor: Option<Identity>,
    /// Expected completion time.
    pub expire_time: Option<DateTime<Utc>>,
    /// Next reminder time.
    pub remind_time: Option<DateTime<Utc>>,
    /// Number of reminders already sent.
    pub remind_repeat: u32,
    /// Whether a participant has opened the task.
    pub read: bool,
    /// Identity that created the task; `None` leaves the task open to anyone.
    pub creator: Option<Identity>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl TaskRecord {
    /// Creates a record with empty payload and no scheduling.
    #[must_use]
    pub fn new(
        instance_id: InstanceId,
        task_name: impl Into<String>,
        task_type: TaskType,
        created_at: DateTime<Utc>,
    ) -> Self {
        let name = task_name.into();
        Self {
            tenant_id: None,
            instance_id,
            parent_task_id: None,
            display_name: name.clone(),
            task_name: name,
            task_type,
            participation: ParticipationType::Direct,
            variables: Variables::new(),
            assignor: None,
            expire_time: None,
            remind_time: None,
            remind_repeat: 0,
            read: false,
            creator: None,
            created_at,
        }
    }

    /// Field-by-field copy used whenever a new task is derived from an
    /// existing record. Assignor and read flag are not carried over.
    fn derive(&self, creator: Option<Identity>, created_at: DateTime<Utc>) -> Self {
        Self {
            tenant_id: self.tenant_id.clone(),
            instance_id: self.instance_id,
            parent_task_id: self.parent_task_id,
            task_name: self.task_name.clone(),
            display_name: self.display_name.clone(),
            task_type: self.task_type,
            participation: self.participation,
            variables: self.variables.clone(),
            assignor: None,
            expire_time: self.expire_time,
            remind_time: self.remind_time,
            remind_repeat: self.remind_repeat,
            read: false,
            creator,
            created_at,
        }
    }
}

/// A pending unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    record: TaskRecord,
}

impl Task {
    /// Creates a task with a fresh identifier.
    #[must_use]
    pub fn new(record: TaskRecord) -> Self {
        Self {
            id: TaskId::new(),
            record,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub const fn from_persisted(id: TaskId, record: TaskRecord) -> Self {
        Self { id, record }
    }

    /// Derives a sibling task: same fields, fresh id, fresh creation time.
    #[must_use]
    pub fn duplicate(&self, creator: Option<Identity>, clock: &impl Clock) -> Self {
        Self::new(self.record.derive(creator, clock.utc()))
    }

    /// Reconstructs a live task from an archived snapshot.
    ///
    /// The result has a fresh id and creation time; `creator` replaces the
    /// archived creator when given.
    #[must_use]
    pub fn from_historical(
        history: &HisTask,
        creator: Option<Identity>,
        clock: &impl Clock,
    ) -> Self {
        let restored_creator = creator.or_else(|| history.record.creator.clone());
        Self::new(history.record.derive(restored_creator, clock.utc()))
    }

    /// Moves the task into its terminal shape.
    #[must_use]
    pub fn into_historical(self, disposition: Disposition) -> HisTask {
        HisTask {
            id: self.id,
            record: self.record,
            disposition,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the shared field set.
    #[must_use]
    pub const fn record(&self) -> &TaskRecord {
        &self.record
    }

    /// Returns the shared field set for in-place edits.
    pub fn record_mut(&mut self) -> &mut TaskRecord {
        &mut self.record
    }

    /// Returns the owning instance.
    #[must_use]
    pub const fn instance_id(&self) -> InstanceId {
        self.record.instance_id
    }

    /// Returns the parent task, if any.
    #[must_use]
    pub const fn parent_task_id(&self) -> Option<TaskId> {
        self.record.parent_task_id
    }

    /// Returns the node name.
    #[must_use]
    pub fn task_name(&self) -> &str {
        &self.record.task_name
    }

    /// Returns the task type.
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        self.record.task_type
    }

    /// Returns the participation strategy.
    #[must_use]
    pub const fn participation(&self) -> ParticipationType {
        self.record.participation
    }

    /// Returns the creator, if any.
    #[must_use]
    pub const fn creator(&self) -> Option<&Identity> {
        self.record.creator.as_ref()
    }

    /// Returns the variable payload.
    #[must_use]
    pub const fn variables(&self) -> &Variables {
        &self.record.variables
    }

    /// Merges `variables` into the payload, later keys winning.
    pub fn merge_variables(&mut self, variables: &Variables) {
        for (key, value) in variables {
            self.record.variables.insert(key.clone(), value.clone());
        }
    }

    /// Stamps a transfer or delegation.
    pub fn reassign(&mut self, task_type: TaskType, assignor: Identity) {
        self.record.task_type = task_type;
        self.record.assignor = Some(assignor);
    }

    /// Returns whether the expire or remind time has passed at `now`.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        let passed = |at: Option<DateTime<Utc>>| at.is_some_and(|time| time <= now);
        passed(self.record.expire_time) || passed(self.record.remind_time)
    }
}

/// How and when a task left the active store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disposition {
    /// Terminal state.
    pub state: TerminalState,
    /// Time of the terminal transition.
    pub finished_at: DateTime<Utc>,
    /// Identity that caused the transition; `None` for sweeps.
    pub decider: Option<Identity>,
}

impl Disposition {
    /// Creates a disposition stamped with the current clock time.
    #[must_use]
    pub fn now(state: TerminalState, decider: Option<Identity>, clock: &impl Clock) -> Self {
        Self {
            state,
            finished_at: clock.utc(),
            decider,
        }
    }
}

/// Immutable terminal record of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HisTask {
    id: TaskId,
    record: TaskRecord,
    disposition: Disposition,
}

impl HisTask {
    /// Reconstructs a history record from persisted storage.
    #[must_use]
    pub const fn from_persisted(id: TaskId, record: TaskRecord, disposition: Disposition) -> Self {
        Self {
            id,
            record,
            disposition,
        }
    }

    /// Returns the identifier the task had while active.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the shared field set.
    #[must_use]
    pub const fn record(&self) -> &TaskRecord {
        &self.record
    }

    /// Returns the terminal disposition.
    #[must_use]
    pub const fn disposition(&self) -> &Disposition {
        &self.disposition
    }

    /// Returns the terminal state.
    #[must_use]
    pub const fn terminal_state(&self) -> TerminalState {
        self.disposition.state
    }

    /// Returns the owning instance.
    #[must_use]
    pub const fn instance_id(&self) -> InstanceId {
        self.record.instance_id
    }

    /// Returns the parent task, if any.
    #[must_use]
    pub const fn parent_task_id(&self) -> Option<TaskId> {
        self.record.parent_task_id
    }

    /// Returns the node name.
    #[must_use]
    pub fn task_name(&self) -> &str {
        &self.record.task_name
    }

    /// Returns the participation strategy.
    #[must_use]
    pub const fn participation(&self) -> ParticipationType {
        self.record.participation
    }

    /// Identity that put the record into history: the decider, or the
    /// creator when nobody decided (sweeps).
    #[must_use]
    pub fn originator(&self) -> Option<&Identity> {
        self.disposition
            .decider
            .as_ref()
            .or(self.record.creator.as_ref())
    }

    /// Returns whether `identity` put this record into history.
    #[must_use]
    pub fn originated_by(&self, identity: &Identity) -> bool {
        self.originator()
            .is_some_and(|originator| originator.id() == identity.id())
    }
}
