//! Per-invocation execution context handed in by the process layer.

use super::{Actor, Identity, Instance, Task, Variables};

/// Everything task creation needs to know about the current step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    instance: Instance,
    task: Option<Task>,
    identity: Identity,
    variables: Variables,
    next_actor: Option<Actor>,
}

impl Execution {
    /// Creates a context for `identity` acting on `instance`.
    #[must_use]
    pub fn new(instance: Instance, identity: Identity) -> Self {
        Self {
            instance,
            task: None,
            identity,
            variables: Variables::new(),
            next_actor: None,
        }
    }

    /// Sets the task whose completion triggered this step.
    #[must_use]
    pub fn with_task(mut self, task: Task) -> Self {
        self.task = Some(task);
        self
    }

    /// Sets the variable payload.
    #[must_use]
    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    /// Pre-selects the next actor for sequential participation.
    #[must_use]
    pub fn with_next_actor(mut self, actor: Actor) -> Self {
        self.next_actor = Some(actor);
        self
    }

    /// Returns the instance.
    #[must_use]
    pub const fn instance(&self) -> &Instance {
        &self.instance
    }

    /// Returns the finishing task, if any.
    #[must_use]
    pub const fn task(&self) -> Option<&Task> {
        self.task.as_ref()
    }

    /// Returns the triggering identity.
    #[must_use]
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Returns the variable payload.
    #[must_use]
    pub const fn variables(&self) -> &Variables {
        &self.variables
    }

    /// Returns the pre-selected next actor, if any.
    #[must_use]
    pub const fn next_actor(&self) -> Option<&Actor> {
        self.next_actor.as_ref()
    }
}
