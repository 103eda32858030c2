//! Error types for task domain validation and code parsing.

use thiserror::Error;

/// Errors returned while constructing or validating domain task values.
///
/// Every variant is a malformed-input failure and is raised before any store
/// access takes place.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The participation type code is not one of the known strategies.
    #[error("illegal participation type code {0}")]
    UnknownParticipationType(i16),

    /// The task type code is not recognized.
    #[error("illegal task type code {0}")]
    UnknownTaskType(i16),

    /// The terminal state code is not recognized.
    #[error("illegal terminal state code {0}")]
    UnknownTerminalState(i16),

    /// The actor kind code is not recognized.
    #[error("illegal actor kind code {0}")]
    UnknownActorKind(i16),

    /// The node kind code is not recognized.
    #[error("illegal node kind code {0}")]
    UnknownNodeKind(i16),

    /// A strategy that needs participants was given none.
    #[error("participants must not be empty for {0} tasks")]
    EmptyParticipants(&'static str),

    /// A participant descriptor has a blank identifier.
    #[error("participant identifier must not be empty")]
    EmptyActorId,

    /// A node or task name is blank.
    #[error("task name must not be empty")]
    EmptyTaskName,

    /// More participants were supplied than the engine accepts.
    #[error("{count} participants exceed the configured limit of {limit}")]
    TooManyParticipants {
        /// Number of participants supplied.
        count: usize,
        /// Configured maximum.
        limit: usize,
    },
}
