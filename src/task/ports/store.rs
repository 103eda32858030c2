//! Store port for active tasks, history records, participants, and notices.

use crate::task::domain::{
    HisTask, HisTaskActor, Instance, InstanceId, Task, TaskActor, TaskCc, TaskId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Durable access to the active and historical task stores.
///
/// Reads are plain queries. Every mutation goes through [`TaskStore::commit`],
/// which applies a whole [`ChangeSet`] or nothing.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Finds an active task.
    async fn find_task(&self, id: TaskId) -> TaskStoreResult<Option<Task>>;

    /// Finds a history record.
    async fn find_his_task(&self, id: TaskId) -> TaskStoreResult<Option<HisTask>>;

    /// Finds a running instance. Archived instances are not returned.
    async fn find_instance(&self, id: InstanceId) -> TaskStoreResult<Option<Instance>>;

    /// Lists participants attached to an active task.
    async fn list_actors_by_task(&self, task_id: TaskId) -> TaskStoreResult<Vec<TaskActor>>;

    /// Lists participants attached to any of the given active tasks.
    async fn list_actors_by_tasks(&self, task_ids: &[TaskId]) -> TaskStoreResult<Vec<TaskActor>>;

    /// Lists archived participants of a history record.
    async fn list_his_actors_by_task(&self, task_id: TaskId)
    -> TaskStoreResult<Vec<HisTaskActor>>;

    /// Lists active tasks of an instance, oldest first.
    async fn list_tasks_by_instance(&self, instance_id: InstanceId) -> TaskStoreResult<Vec<Task>>;

    /// Lists active tasks whose parent is any of `parent_ids`.
    async fn list_tasks_by_parents(&self, parent_ids: &[TaskId]) -> TaskStoreResult<Vec<Task>>;

    /// Lists history records of an instance, oldest first.
    async fn list_his_tasks_by_instance(
        &self,
        instance_id: InstanceId,
    ) -> TaskStoreResult<Vec<HisTask>>;

    /// Lists active tasks whose expire or remind time is at or before `now`.
    async fn list_due_tasks(&self, now: DateTime<Utc>) -> TaskStoreResult<Vec<Task>>;

    /// Lists carbon-copy notices of an instance.
    async fn list_ccs_by_instance(&self, instance_id: InstanceId) -> TaskStoreResult<Vec<TaskCc>>;

    /// Applies every operation in `changes`, in order, as one atomic unit.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::TaskNotFound`] when an update, archive, or
    /// delete targets an active task that no longer exists, which is how a
    /// second concurrent terminal transition on the same task is refused.
    /// Returns [`TaskStoreError::Conflict`] when an update or archive finds
    /// the stored task different from the snapshot it was staged against.
    /// Nothing is written when any operation fails.
    async fn commit(&self, changes: ChangeSet) -> TaskStoreResult<()>;
}

/// One row-level write inside a [`ChangeSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    /// Insert an active task.
    InsertTask(Task),
    /// Overwrite an active task, provided it still equals `expected`.
    UpdateTask {
        /// Snapshot the update was computed from.
        expected: Task,
        /// Replacement row.
        task: Task,
    },
    /// Delete an existing active task.
    DeleteTask(TaskId),
    /// Attach a participant to an active task.
    InsertActor(TaskActor),
    /// Detach one participant from an active task.
    DeleteActor {
        /// Owning task.
        task_id: TaskId,
        /// Participant identifier.
        actor_id: String,
    },
    /// Detach every participant of an active task.
    DeleteActorsByTask(TaskId),
    /// Move an active task to history, provided it still equals `expected`.
    ///
    /// Every participant attached at commit time is archived with it.
    ArchiveTask {
        /// Snapshot the history record was computed from.
        expected: Task,
        /// History record replacing the active task.
        history: HisTask,
    },
    /// Insert a history record.
    InsertHisTask(HisTask),
    /// Insert an archived participant.
    InsertHisActor(HisTaskActor),
    /// Insert a carbon-copy notice.
    InsertCc(TaskCc),
    /// Delete every history record and archived participant of an instance.
    DeleteHistoryByInstance(InstanceId),
    /// Delete every active task and participant of an instance.
    DeleteTasksByInstance(InstanceId),
}

/// Ordered batch of writes applied atomically by [`TaskStore::commit`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    ops: Vec<StoreOp>,
}

impl ChangeSet {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one operation.
    pub fn push(&mut self, op: StoreOp) -> &mut Self {
        self.ops.push(op);
        self
    }

    /// Appends a task insert followed by its participants.
    pub fn insert_task(
        &mut self,
        task: Task,
        actors: impl IntoIterator<Item = TaskActor>,
    ) -> &mut Self {
        self.ops.push(StoreOp::InsertTask(task));
        self.ops.extend(actors.into_iter().map(StoreOp::InsertActor));
        self
    }

    /// Appends an update of `expected` to `task`.
    pub fn update_task(&mut self, expected: Task, task: Task) -> &mut Self {
        self.ops.push(StoreOp::UpdateTask { expected, task });
        self
    }

    /// Appends the active-to-terminal move of `expected` as `history`.
    ///
    /// The store copies the participants attached at commit time, so rows
    /// added after the caller read them are archived too.
    pub fn archive(&mut self, expected: Task, history: HisTask) -> &mut Self {
        self.ops.push(StoreOp::ArchiveTask { expected, history });
        self
    }

    /// Appends deletion of an active task and its participants.
    pub fn discard_task(&mut self, task_id: TaskId) -> &mut Self {
        self.ops.push(StoreOp::DeleteActorsByTask(task_id));
        self.ops.push(StoreOp::DeleteTask(task_id));
        self
    }

    /// Appends replacement of every participant of a task by `actors`.
    pub fn replace_actors(
        &mut self,
        task_id: TaskId,
        actors: impl IntoIterator<Item = TaskActor>,
    ) -> &mut Self {
        self.ops.push(StoreOp::DeleteActorsByTask(task_id));
        self.ops.extend(actors.into_iter().map(StoreOp::InsertActor));
        self
    }

    /// Returns the queued operations.
    #[must_use]
    pub fn ops(&self) -> &[StoreOp] {
        &self.ops
    }

    /// Returns whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Consumes the change set into its operations.
    #[must_use]
    pub fn into_ops(self) -> Vec<StoreOp> {
        self.ops
    }
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// An insert reused an identifier that is already taken.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// An update, archive, or delete targeted an active task that does not
    /// exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The stored task no longer matches the snapshot a write was staged
    /// against.
    #[error("task {0} was modified concurrently")]
    Conflict(TaskId),

    /// An archived participant referenced a missing history record.
    #[error("history record not found: {0}")]
    HistoryNotFound(TaskId),

    /// The change set would leave an id both active and historical.
    #[error("task {0} would be both active and historical")]
    DisjointnessViolation(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
