//! Small closed sets of persisted codes.
//!
//! Every code is a checked value type: the only way in from a raw integer is
//! the `TryFrom<i16>` factory, which rejects anything outside the set.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fan-out/fan-in strategy governing how participants attach to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipationType {
    /// One task, every supplied actor attached, first completion closes it.
    Direct,
    /// One task, exactly one actor attached at a time.
    Sequential,
    /// One task per actor, siblings complete independently.
    AllRequired,
    /// One task, every supplied actor attached, first completer wins.
    AnyOf,
}

impl ParticipationType {
    /// Returns the persisted code.
    #[must_use]
    pub const fn code(self) -> i16 {
        match self {
            Self::Direct => 0,
            Self::Sequential => 1,
            Self::AllRequired => 2,
            Self::AnyOf => 3,
        }
    }

    /// Returns the canonical label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Sequential => "sequential",
            Self::AllRequired => "all_required",
            Self::AnyOf => "any_of",
        }
    }

    /// Returns whether the strategy refuses an empty participant list.
    #[must_use]
    pub const fn requires_participants(self) -> bool {
        !matches!(self, Self::Direct)
    }
}

impl TryFrom<i16> for ParticipationType {
    type Error = TaskDomainError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Direct),
            1 => Ok(Self::Sequential),
            2 => Ok(Self::AllRequired),
            3 => Ok(Self::AnyOf),
            other => Err(TaskDomainError::UnknownParticipationType(other)),
        }
    }
}

impl fmt::Display for ParticipationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of work a task represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Task held by the process initiator.
    Major,
    /// Ordinary approval step.
    Approval,
    /// Carbon-copy notice.
    CarbonCopy,
    /// Approval step on a conditional branch.
    Conditional,
    /// Task handed over to another actor for good.
    Transfer,
    /// Task lent to another actor; the assignor gets it back afterwards.
    Delegate,
}

impl TaskType {
    /// Returns the persisted code.
    #[must_use]
    pub const fn code(self) -> i16 {
        match self {
            Self::Major => 0,
            Self::Approval => 1,
            Self::CarbonCopy => 2,
            Self::Conditional => 3,
            Self::Transfer => 4,
            Self::Delegate => 5,
        }
    }

    /// Returns the canonical label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Approval => "approval",
            Self::CarbonCopy => "carbon_copy",
            Self::Conditional => "conditional",
            Self::Transfer => "transfer",
            Self::Delegate => "delegate",
        }
    }
}

impl TryFrom<i16> for TaskType {
    type Error = TaskDomainError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Major),
            1 => Ok(Self::Approval),
            2 => Ok(Self::CarbonCopy),
            3 => Ok(Self::Conditional),
            4 => Ok(Self::Transfer),
            5 => Ok(Self::Delegate),
            other => Err(TaskDomainError::UnknownTaskType(other)),
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final disposition of an archived task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalState {
    /// Completed by a participant.
    Finished,
    /// Closed by the due-task sweep.
    TimedOut,
    /// Closed because its instance was terminated.
    Terminated,
    /// Sent back to the previous step.
    Rejected,
}

impl TerminalState {
    /// Returns the persisted code. `0` is reserved for "active" and never
    /// appears on a history record.
    #[must_use]
    pub const fn code(self) -> i16 {
        match self {
            Self::Finished => 1,
            Self::TimedOut => 2,
            Self::Terminated => 3,
            Self::Rejected => 4,
        }
    }

    /// Returns the canonical label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Finished => "finished",
            Self::TimedOut => "timed_out",
            Self::Terminated => "terminated",
            Self::Rejected => "rejected",
        }
    }
}

impl TryFrom<i16> for TerminalState {
    type Error = TaskDomainError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Finished),
            2 => Ok(Self::TimedOut),
            3 => Ok(Self::Terminated),
            4 => Ok(Self::Rejected),
            other => Err(TaskDomainError::UnknownTerminalState(other)),
        }
    }
}

impl fmt::Display for TerminalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a participant entry denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    /// An individual identity.
    User,
    /// Everyone holding a role.
    Role,
    /// Everyone in an organizational unit.
    Department,
}

impl ActorKind {
    /// Returns the persisted code.
    #[must_use]
    pub const fn code(self) -> i16 {
        match self {
            Self::User => 0,
            Self::Role => 1,
            Self::Department => 2,
        }
    }

    /// Returns the canonical label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Role => "role",
            Self::Department => "department",
        }
    }
}

impl TryFrom<i16> for ActorKind {
    type Error = TaskDomainError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::User),
            1 => Ok(Self::Role),
            2 => Ok(Self::Department),
            other => Err(TaskDomainError::UnknownActorKind(other)),
        }
    }
}

/// Process node types the engine knows how to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Start node held by the initiator.
    Initiator,
    /// Approval node producing blocking tasks.
    Approval,
    /// Notification node producing carbon-copy notices.
    CarbonCopy,
    /// Approval node reached through an already-selected branch.
    ConditionalApproval,
}

impl NodeKind {
    /// Returns the persisted code.
    #[must_use]
    pub const fn code(self) -> i16 {
        match self {
            Self::Initiator => 0,
            Self::Approval => 1,
            Self::CarbonCopy => 2,
            Self::ConditionalApproval => 3,
        }
    }

    /// Task type stamped on tasks produced by this node.
    #[must_use]
    pub const fn task_type(self) -> TaskType {
        match self {
            Self::Initiator => TaskType::Major,
            Self::Approval => TaskType::Approval,
            Self::CarbonCopy => TaskType::CarbonCopy,
            Self::ConditionalApproval => TaskType::Conditional,
        }
    }
}

impl TryFrom<i16> for NodeKind {
    type Error = TaskDomainError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Initiator),
            1 => Ok(Self::Approval),
            2 => Ok(Self::CarbonCopy),
            3 => Ok(Self::ConditionalApproval),
            other => Err(TaskDomainError::UnknownNodeKind(other)),
        }
    }
}
