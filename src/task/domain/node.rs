//! Process node descriptors consumed by task creation.
//!
//! Nodes are produced by the process-model layer; this crate does not parse
//! any graph format.

use super::{Actor, NodeKind, ParticipationType, TaskDomainError};
use chrono::Duration;

/// One node of a process graph, as far as task creation needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeModel {
    name: String,
    kind: NodeKind,
    participation: ParticipationType,
    participants: Vec<Actor>,
    expire_after: Option<Duration>,
    remind_after: Option<Duration>,
    child: Option<Box<NodeModel>>,
}

impl NodeModel {
    /// Creates a node with no participants and direct participation.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTaskName`] when `name` is blank.
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Result<Self, TaskDomainError> {
        let raw: String = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTaskName);
        }
        Ok(Self {
            name: trimmed.to_owned(),
            kind,
            participation: ParticipationType::Direct,
            participants: Vec::new(),
            expire_after: None,
            remind_after: None,
            child: None,
        })
    }

    /// Creates a node from persisted kind and participation codes.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the name is blank or either code is
    /// outside its set.
    pub fn from_codes(
        name: impl Into<String>,
        kind_code: i16,
        participation_code: i16,
    ) -> Result<Self, TaskDomainError> {
        let kind = NodeKind::try_from(kind_code)?;
        let participation = ParticipationType::try_from(participation_code)?;
        Ok(Self::new(name, kind)?.with_participation(participation))
    }

    /// Sets the participation strategy.
    #[must_use]
    pub fn with_participation(mut self, participation: ParticipationType) -> Self {
        self.participation = participation;
        self
    }

    /// Sets the participant list.
    #[must_use]
    pub fn with_participants(mut self, participants: impl IntoIterator<Item = Actor>) -> Self {
        self.participants = participants.into_iter().collect();
        self
    }

    /// Gives produced tasks an expire time this long after creation.
    #[must_use]
    pub fn with_expire_after(mut self, expire_after: Duration) -> Self {
        self.expire_after = Some(expire_after);
        self
    }

    /// Gives produced tasks a remind time this long after creation.
    #[must_use]
    pub fn with_remind_after(mut self, remind_after: Duration) -> Self {
        self.remind_after = Some(remind_after);
        self
    }

    /// Sets the successor node.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.child = Some(Box::new(child));
        self
    }

    /// Returns the node name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the node kind.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns the participation strategy.
    #[must_use]
    pub const fn participation(&self) -> ParticipationType {
        self.participation
    }

    /// Returns the participant descriptors.
    #[must_use]
    pub fn participants(&self) -> &[Actor] {
        &self.participants
    }

    /// Returns the expire offset, if any.
    #[must_use]
    pub const fn expire_after(&self) -> Option<Duration> {
        self.expire_after
    }

    /// Returns the remind offset, if any.
    #[must_use]
    pub const fn remind_after(&self) -> Option<Duration> {
        self.remind_after
    }

    /// Returns the successor node, if any.
    #[must_use]
    pub fn child(&self) -> Option<&Self> {
        self.child.as_deref()
    }
}
