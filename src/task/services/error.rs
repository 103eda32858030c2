//! Service-level errors for task lifecycle operations.

use crate::task::{
    domain::{InstanceId, TaskDomainError, TaskId},
    ports::TaskStoreError,
};
use std::fmt;
use thiserror::Error;

/// Record a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingRecord {
    /// Active task.
    Task(TaskId),
    /// History record.
    History(TaskId),
}

impl fmt::Display for MissingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task(id) => write!(f, "task {id}"),
            Self::History(id) => write!(f, "history record {id}"),
        }
    }
}

/// Structurally illegal requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidTaskState {
    /// Reject was requested on a task without a parent step.
    #[error("task {0} has no previous step to reject to")]
    RootTask(TaskId),
    /// No active downstream task of the history record remains.
    #[error(
        "downstream tasks of {0} have completed or never existed; it is no longer withdrawable"
    )]
    NotWithdrawable(TaskId),
    /// The removal set covers every current participant.
    #[error("cannot remove every participant of task {0}")]
    LastParticipants(TaskId),
    /// A sequential task would end up with more than one participant.
    #[error("sequential task {0} holds exactly one participant at a time")]
    SequentialOverflow(TaskId),
    /// The task does not use sequential participation.
    #[error("task {0} is not sequential")]
    NotSequential(TaskId),
    /// The owning instance is no longer running.
    #[error("instance {0} has ended")]
    InstanceEnded(InstanceId),
    /// Resume is switched off in the engine configuration.
    #[error("resuming history records is disabled")]
    ResumeDisabled,
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Malformed input, rejected before any store access.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),
    /// A referenced record does not exist.
    #[error("{0} not found")]
    NotFound(MissingRecord),
    /// The acting identity is not authorized.
    #[error("identity '{identity}' may not {action} task {task_id}")]
    PermissionDenied {
        /// Acting identity.
        identity: String,
        /// Attempted operation.
        action: &'static str,
        /// Target task or history record.
        task_id: TaskId,
    },
    /// The request is structurally illegal.
    #[error(transparent)]
    InvalidState(#[from] InvalidTaskState),
    /// The task changed between load and commit. Reload and retry.
    #[error("task {0} was modified concurrently")]
    Conflict(TaskId),
    /// Store operation failed.
    #[error(transparent)]
    Store(TaskStoreError),
}

impl From<TaskStoreError> for TaskLifecycleError {
    fn from(err: TaskStoreError) -> Self {
        match err {
            TaskStoreError::TaskNotFound(id) => Self::NotFound(MissingRecord::Task(id)),
            TaskStoreError::HistoryNotFound(id) => Self::NotFound(MissingRecord::History(id)),
            TaskStoreError::Conflict(id) => Self::Conflict(id),
            other => Self::Store(other),
        }
    }
}

/// Result type for task lifecycle operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;
