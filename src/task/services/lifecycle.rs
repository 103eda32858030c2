//! Task lifecycle engine: completion, timeout, claiming, reassignment, and
//! participant management.

use super::{
    config::EngineConfig,
    error::{InvalidTaskState, MissingRecord, TaskLifecycleError, TaskLifecycleResult},
};
use crate::task::{
    domain::{
        Actor, Disposition, HisTask, HisTaskActor, Identity, InstanceId, ParticipationType, Task,
        TaskActor, TaskCc, TaskDomainError, TaskId, TaskType, TerminalState, Variables,
    },
    ports::{
        ChangeSet, StoreOp, TaskAccessStrategy, TaskEvent, TaskListener, TaskStore,
        TaskStoreError,
    },
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Reload attempts a due-task timeout makes when the task keeps changing.
const TIMEOUT_ATTEMPTS: usize = 3;

/// How a reassignment hands a task over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentKind {
    /// The new actor owns the task from now on.
    Transfer,
    /// The new actor works the task on behalf of the assignor.
    Delegate,
}

impl AssignmentKind {
    /// Task type stamped on the reassigned task.
    #[must_use]
    pub const fn task_type(self) -> TaskType {
        match self {
            Self::Transfer => TaskType::Transfer,
            Self::Delegate => TaskType::Delegate,
        }
    }

    const fn action(self) -> &'static str {
        match self {
            Self::Transfer => "transfer",
            Self::Delegate => "delegate",
        }
    }
}

/// Field edits applied by [`TaskLifecycleEngine::update_task`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    display_name: Option<String>,
    expire_time: Option<DateTime<Utc>>,
    remind_time: Option<DateTime<Utc>>,
    remind_repeat: Option<u32>,
    variables: Variables,
}

impl TaskUpdate {
    /// Creates an update that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Sets the expected completion time.
    #[must_use]
    pub fn with_expire_time(mut self, expire_time: DateTime<Utc>) -> Self {
        self.expire_time = Some(expire_time);
        self
    }

    /// Sets the next reminder time.
    #[must_use]
    pub fn with_remind_time(mut self, remind_time: DateTime<Utc>) -> Self {
        self.remind_time = Some(remind_time);
        self
    }

    /// Sets the number of reminders already sent.
    #[must_use]
    pub fn with_remind_repeat(mut self, remind_repeat: u32) -> Self {
        self.remind_repeat = Some(remind_repeat);
        self
    }

    /// Sets variables merged into the task payload.
    #[must_use]
    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    fn apply_to(self, task: &mut Task) {
        task.merge_variables(&self.variables);
        let record = task.record_mut();
        if let Some(display_name) = self.display_name {
            record.display_name = display_name;
        }
        if let Some(expire_time) = self.expire_time {
            record.expire_time = Some(expire_time);
        }
        if let Some(remind_time) = self.remind_time {
            record.remind_time = Some(remind_time);
        }
        if let Some(remind_repeat) = self.remind_repeat {
            record.remind_repeat = remind_repeat;
        }
    }
}

/// Orchestrates every state transition of tasks, history records, and their
/// participants.
///
/// Each operation stages its writes in one [`ChangeSet`] and commits it
/// atomically; listeners hear about a transition only after the commit.
pub struct TaskLifecycleEngine<S, A, C>
where
    S: TaskStore,
    A: TaskAccessStrategy,
    C: Clock + Send + Sync,
{
    pub(super) store: Arc<S>,
    access: Arc<A>,
    pub(super) clock: Arc<C>,
    listener: Option<Arc<dyn TaskListener>>,
    pub(super) config: EngineConfig,
}

impl<S, A, C> Clone for TaskLifecycleEngine<S, A, C>
where
    S: TaskStore,
    A: TaskAccessStrategy,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            access: Arc::clone(&self.access),
            clock: Arc::clone(&self.clock),
            listener: self.listener.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S, A, C> TaskLifecycleEngine<S, A, C>
where
    S: TaskStore,
    A: TaskAccessStrategy,
    C: Clock + Send + Sync,
{
    /// Creates an engine with the default configuration and no listener.
    #[must_use]
    pub fn new(store: Arc<S>, access: Arc<A>, clock: Arc<C>) -> Self {
        Self {
            store,
            access,
            clock,
            listener: None,
            config: EngineConfig::default(),
        }
    }

    /// Registers the lifecycle event listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn TaskListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Replaces the engine configuration.
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns whether `identity` may act on `task`.
    ///
    /// A task without a creator is open to anyone. Otherwise a blank identity
    /// is refused, a task without participants is open, and the access
    /// strategy decides the rest.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when the participant lookup fails.
    pub async fn is_allowed(&self, task: &Task, identity: &str) -> TaskLifecycleResult<bool> {
        if task.creator().is_none() {
            return Ok(true);
        }
        if identity.trim().is_empty() {
            return Ok(false);
        }
        let actors = self.store.list_actors_by_task(task.id()).await?;
        if actors.is_empty() {
            return Ok(true);
        }
        Ok(self.access.is_allowed(identity, &actors).await)
    }

    /// Completes a task as `identity`.
    ///
    /// `variables` are merged into the task payload before it is archived.
    /// Returns the pre-transition snapshot with the merged payload.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task is not active,
    /// which includes losing a race with another terminal transition, and
    /// [`TaskLifecycleError::PermissionDenied`] when `identity` is not a
    /// participant.
    pub async fn complete(
        &self,
        task_id: TaskId,
        identity: &Identity,
        variables: &Variables,
    ) -> TaskLifecycleResult<Task> {
        let task = self.load_task(task_id).await?;
        let (snapshot, changes) = self
            .stage_finish(task, identity, variables, TerminalState::Finished, "complete")
            .await?;
        self.store.commit(changes).await?;
        info!(
            task_id = %task_id,
            identity = identity.id(),
            "task completed"
        );
        self.notify(TaskEvent::Complete, &snapshot);
        Ok(snapshot)
    }

    /// Closes a task on behalf of the due-task sweep.
    ///
    /// Returns `Ok(None)` when the task is no longer active. A concurrent
    /// field update makes the sweep reload the task and try again.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when persistence fails, and
    /// [`TaskLifecycleError::Conflict`] when the task kept changing across
    /// every attempt.
    pub async fn timeout(&self, task_id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        for _ in 0..TIMEOUT_ATTEMPTS {
            let Some(task) = self.store.find_task(task_id).await? else {
                debug!(task_id = %task_id, "timeout skipped, task no longer active");
                return Ok(None);
            };
            let disposition = Disposition::now(TerminalState::TimedOut, None, &*self.clock);
            let mut changes = ChangeSet::new();
            changes.archive(task.clone(), task.clone().into_historical(disposition));
            match self.store.commit(changes).await {
                Ok(()) => {
                    info!(task_id = %task_id, "task timed out");
                    self.notify(TaskEvent::Timeout, &task);
                    return Ok(Some(task));
                }
                Err(TaskStoreError::TaskNotFound(_)) => {
                    debug!(task_id = %task_id, "timeout lost a race with another transition");
                    return Ok(None);
                }
                Err(TaskStoreError::Conflict(_)) => {
                    debug!(task_id = %task_id, "task changed under timeout, reloading");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(TaskLifecycleError::Conflict(task_id))
    }

    /// Lists active tasks whose expire or remind time has passed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when the lookup fails.
    pub async fn due_tasks(&self) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.store.list_due_tasks(self.clock.utc()).await?)
    }

    /// Takes sole ownership of a task shared by several participants.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::PermissionDenied`] when `actor` is not
    /// currently allowed on the task.
    pub async fn claim(&self, task_id: TaskId, actor: Actor) -> TaskLifecycleResult<Task> {
        actor.validate()?;
        let task = self.load_task(task_id).await?;
        if !self.is_allowed(&task, actor.id()).await? {
            return Err(self.denied(actor.id(), "claim", task_id));
        }
        let mut changes = ChangeSet::new();
        changes.replace_actors(task_id, [attach(&task, actor.clone())]);
        self.store.commit(changes).await?;
        info!(task_id = %task_id, actor = actor.id(), "task claimed");
        self.notify(TaskEvent::Update, &task);
        Ok(task)
    }

    /// Reassigns a task from one participant to another.
    ///
    /// The task is stamped with the assignment kind and `from` as assignor;
    /// every current participant is replaced by `to`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::PermissionDenied`] when `from` is not a
    /// current participant, and [`TaskLifecycleError::Conflict`] when the
    /// task changed before the reassignment was committed.
    pub async fn assignee_task(
        &self,
        task_id: TaskId,
        kind: AssignmentKind,
        from: &Actor,
        to: Actor,
    ) -> TaskLifecycleResult<Task> {
        to.validate()?;
        let stored = self.load_task(task_id).await?;
        let actors = self.store.list_actors_by_task(task_id).await?;
        if !actors.iter().any(|row| row.actor_id() == from.id()) {
            return Err(self.denied(from.id(), kind.action(), task_id));
        }
        let mut task = stored.clone();
        task.reassign(kind.task_type(), from.as_identity());
        let mut changes = ChangeSet::new();
        changes
            .update_task(stored, task.clone())
            .replace_actors(task_id, [attach(&task, to.clone())]);
        self.store.commit(changes).await?;
        info!(
            task_id = %task_id,
            from = from.id(),
            to = to.id(),
            kind = kind.action(),
            "task reassigned"
        );
        self.notify(TaskEvent::Update, &task);
        Ok(task)
    }

    /// Hands a task over to `to` for good.
    ///
    /// # Errors
    ///
    /// See [`Self::assignee_task`].
    pub async fn transfer(
        &self,
        task_id: TaskId,
        from: &Actor,
        to: Actor,
    ) -> TaskLifecycleResult<Task> {
        self.assignee_task(task_id, AssignmentKind::Transfer, from, to)
            .await
    }

    /// Lends a task to `to` on behalf of `from`.
    ///
    /// # Errors
    ///
    /// See [`Self::assignee_task`].
    pub async fn delegate(
        &self,
        task_id: TaskId,
        from: &Actor,
        to: Actor,
    ) -> TaskLifecycleResult<Task> {
        self.assignee_task(task_id, AssignmentKind::Delegate, from, to)
            .await
    }

    /// Adds participants to a task and switches it to `participation`.
    ///
    /// Actors already attached are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Validation`] for an empty or oversized
    /// list, [`InvalidTaskState::SequentialOverflow`] when a sequential
    /// task would hold more than one participant, and
    /// [`TaskLifecycleError::Conflict`] when the task changed concurrently.
    pub async fn add_actors(
        &self,
        task_id: TaskId,
        participation: ParticipationType,
        actors: Vec<Actor>,
    ) -> TaskLifecycleResult<Task> {
        if actors.is_empty() {
            return Err(TaskDomainError::EmptyParticipants(participation.as_str()).into());
        }
        self.validate_participants(participation, &actors)?;
        let stored = self.load_task(task_id).await?;
        let current = self.store.list_actors_by_task(task_id).await?;
        let mut seen: HashSet<String> = current
            .iter()
            .map(|row| row.actor_id().to_owned())
            .collect();
        let added: Vec<Actor> = actors
            .into_iter()
            .filter(|actor| seen.insert(actor.id().to_owned()))
            .collect();
        if participation == ParticipationType::Sequential && seen.len() > 1 {
            return Err(InvalidTaskState::SequentialOverflow(task_id).into());
        }
        if seen.len() > self.config.max_participants {
            return Err(TaskDomainError::TooManyParticipants {
                count: seen.len(),
                limit: self.config.max_participants,
            }
            .into());
        }

        let mut task = stored.clone();
        task.record_mut().participation = participation;
        let mut changes = ChangeSet::new();
        changes.update_task(stored, task.clone());
        for actor in added {
            changes.push(StoreOp::InsertActor(attach(&task, actor)));
        }
        self.store.commit(changes).await?;
        info!(task_id = %task_id, participation = %participation, "participants added");
        self.notify(TaskEvent::Update, &task);
        Ok(task)
    }

    /// Detaches participants from a task.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTaskState::LastParticipants`] when no participant
    /// would remain.
    pub async fn remove_actors(
        &self,
        task_id: TaskId,
        actor_ids: &[String],
    ) -> TaskLifecycleResult<Task> {
        let task = self.load_task(task_id).await?;
        let current = self.store.list_actors_by_task(task_id).await?;
        let (removed, remaining): (Vec<TaskActor>, Vec<TaskActor>) = current
            .into_iter()
            .partition(|row| actor_ids.iter().any(|id| id == row.actor_id()));
        if remaining.is_empty() {
            return Err(InvalidTaskState::LastParticipants(task_id).into());
        }
        if removed.is_empty() {
            return Ok(task);
        }
        let mut changes = ChangeSet::new();
        for row in &removed {
            changes.push(StoreOp::DeleteActor {
                task_id,
                actor_id: row.actor_id().to_owned(),
            });
        }
        self.store.commit(changes).await?;
        info!(task_id = %task_id, removed = removed.len(), "participants removed");
        self.notify(TaskEvent::Update, &task);
        Ok(task)
    }

    /// Hands a sequential task to the next participant in line.
    ///
    /// `identity` must currently hold the task; its single participant is
    /// replaced by `next_actor` and `variables` are merged into the payload.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTaskState::NotSequential`] for other strategies and
    /// [`TaskLifecycleError::PermissionDenied`] when `identity` does not hold
    /// the task, and [`TaskLifecycleError::Conflict`] when the task changed
    /// concurrently.
    pub async fn advance_sequential(
        &self,
        task_id: TaskId,
        identity: &Identity,
        next_actor: Actor,
        variables: &Variables,
    ) -> TaskLifecycleResult<Task> {
        next_actor.validate()?;
        let stored = self.load_task(task_id).await?;
        if stored.participation() != ParticipationType::Sequential {
            return Err(InvalidTaskState::NotSequential(task_id).into());
        }
        if !self.is_allowed(&stored, identity.id()).await? {
            return Err(self.denied(identity.id(), "advance", task_id));
        }
        let mut task = stored.clone();
        task.merge_variables(variables);
        let mut changes = ChangeSet::new();
        changes
            .update_task(stored, task.clone())
            .replace_actors(task_id, [attach(&task, next_actor.clone())]);
        self.store.commit(changes).await?;
        info!(
            task_id = %task_id,
            from = identity.id(),
            to = next_actor.id(),
            "sequential task advanced"
        );
        self.notify(TaskEvent::Update, &task);
        Ok(task)
    }

    /// Marks a task as read when `actor` is one of its participants.
    ///
    /// Returns whether the flag was set.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task is not active,
    /// and [`TaskLifecycleError::Conflict`] when it changed concurrently.
    pub async fn read_task(&self, task_id: TaskId, actor: &Actor) -> TaskLifecycleResult<bool> {
        let stored = self.load_task(task_id).await?;
        let actors = self.store.list_actors_by_task(task_id).await?;
        if !actors.iter().any(|row| row.actor_id() == actor.id()) {
            return Ok(false);
        }
        if !stored.record().read {
            let mut task = stored.clone();
            task.record_mut().read = true;
            let mut changes = ChangeSet::new();
            changes.update_task(stored, task);
            self.store.commit(changes).await?;
            debug!(task_id = %task_id, actor = actor.id(), "task marked read");
        }
        Ok(true)
    }

    /// Applies field edits to an active task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task is not active,
    /// and [`TaskLifecycleError::Conflict`] when another write landed between
    /// load and commit; nothing is written in that case.
    pub async fn update_task(
        &self,
        task_id: TaskId,
        update: TaskUpdate,
    ) -> TaskLifecycleResult<Task> {
        let stored = self.load_task(task_id).await?;
        let mut task = stored.clone();
        update.apply_to(&mut task);
        let mut changes = ChangeSet::new();
        changes.update_task(stored, task.clone());
        self.store.commit(changes).await?;
        debug!(task_id = %task_id, "task updated");
        self.notify(TaskEvent::Update, &task);
        Ok(task)
    }

    /// Spawns a follow-up task from an active one.
    ///
    /// The new task copies the source fields, takes `task_type`, points at the
    /// source as its parent, and is assigned sequentially to the first of
    /// `actors`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Validation`] when `actors` is empty or
    /// malformed.
    pub async fn create_new_task(
        &self,
        task_id: TaskId,
        task_type: TaskType,
        actors: Vec<Actor>,
    ) -> TaskLifecycleResult<Task> {
        self.validate_participants(ParticipationType::Sequential, &actors)?;
        let source = self.load_task(task_id).await?;
        let first = actors
            .into_iter()
            .next()
            .ok_or(TaskDomainError::EmptyParticipants(
                ParticipationType::Sequential.as_str(),
            ))?;
        let mut task = source.duplicate(source.creator().cloned(), &*self.clock);
        {
            let record = task.record_mut();
            record.task_type = task_type;
            record.parent_task_id = Some(task_id);
            record.participation = ParticipationType::Sequential;
        }
        let mut changes = ChangeSet::new();
        changes.insert_task(task.clone(), [attach(&task, first)]);
        self.store.commit(changes).await?;
        info!(task_id = %task.id(), source = %task_id, "follow-up task created");
        self.notify(TaskEvent::Create, &task);
        Ok(task)
    }

    /// Closes every active task of an instance as terminated by `identity`.
    ///
    /// No listener events are emitted. Returns the new history records.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when a task was closed
    /// concurrently and [`TaskLifecycleError::Conflict`] when one was
    /// modified; nothing is written in either case.
    pub async fn terminate_by_instance(
        &self,
        instance_id: InstanceId,
        identity: &Identity,
    ) -> TaskLifecycleResult<Vec<HisTask>> {
        let tasks = self.store.list_tasks_by_instance(instance_id).await?;
        if tasks.is_empty() {
            return Ok(Vec::new());
        }
        let mut changes = ChangeSet::new();
        let mut archived = Vec::with_capacity(tasks.len());
        for task in tasks {
            let disposition = Disposition::now(
                TerminalState::Terminated,
                Some(identity.clone()),
                &*self.clock,
            );
            let history = task.clone().into_historical(disposition);
            changes.archive(task, history.clone());
            archived.push(history);
        }
        self.store.commit(changes).await?;
        info!(
            instance_id = %instance_id,
            identity = identity.id(),
            closed = archived.len(),
            "instance tasks terminated"
        );
        Ok(archived)
    }

    /// Deletes every task and history record of an instance.
    ///
    /// Carbon-copy notices are kept.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when persistence fails.
    pub async fn cascade_remove_by_instance(
        &self,
        instance_id: InstanceId,
    ) -> TaskLifecycleResult<()> {
        let mut changes = ChangeSet::new();
        changes
            .push(StoreOp::DeleteHistoryByInstance(instance_id))
            .push(StoreOp::DeleteTasksByInstance(instance_id));
        self.store.commit(changes).await?;
        info!(instance_id = %instance_id, "instance tasks removed");
        Ok(())
    }

    /// Lists active tasks of an instance, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when the lookup fails.
    pub async fn active_tasks(&self, instance_id: InstanceId) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.store.list_tasks_by_instance(instance_id).await?)
    }

    /// Lists history records of an instance, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when the lookup fails.
    pub async fn historic_tasks(
        &self,
        instance_id: InstanceId,
    ) -> TaskLifecycleResult<Vec<HisTask>> {
        Ok(self.store.list_his_tasks_by_instance(instance_id).await?)
    }

    /// Lists the participants of an active task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when the lookup fails.
    pub async fn task_actors(&self, task_id: TaskId) -> TaskLifecycleResult<Vec<TaskActor>> {
        Ok(self.store.list_actors_by_task(task_id).await?)
    }

    /// Lists the archived participants of a history record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when the lookup fails.
    pub async fn his_task_actors(
        &self,
        task_id: TaskId,
    ) -> TaskLifecycleResult<Vec<HisTaskActor>> {
        Ok(self.store.list_his_actors_by_task(task_id).await?)
    }

    /// Lists carbon-copy notices of an instance.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when the lookup fails.
    pub async fn carbon_copies(&self, instance_id: InstanceId) -> TaskLifecycleResult<Vec<TaskCc>> {
        Ok(self.store.list_ccs_by_instance(instance_id).await?)
    }

    /// Authorizes `identity`, merges `variables`, and stages the archive of
    /// `task` in `state`. Returns the snapshot and the staged writes.
    pub(super) async fn stage_finish(
        &self,
        mut task: Task,
        identity: &Identity,
        variables: &Variables,
        state: TerminalState,
        action: &'static str,
    ) -> TaskLifecycleResult<(Task, ChangeSet)> {
        let task_id = task.id();
        let stored = task.clone();
        task.merge_variables(variables);
        if !self.is_allowed(&task, identity.id()).await? {
            return Err(self.denied(identity.id(), action, task_id));
        }
        let disposition = Disposition::now(state, Some(identity.clone()), &*self.clock);
        let mut changes = ChangeSet::new();
        changes.archive(stored, task.clone().into_historical(disposition));
        Ok((task, changes))
    }

    pub(super) async fn load_task(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.store
            .find_task(task_id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(MissingRecord::Task(task_id)))
    }

    pub(super) async fn load_history(&self, task_id: TaskId) -> TaskLifecycleResult<HisTask> {
        self.store
            .find_his_task(task_id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(MissingRecord::History(task_id)))
    }

    pub(super) fn validate_participants(
        &self,
        participation: ParticipationType,
        actors: &[Actor],
    ) -> Result<(), TaskDomainError> {
        if participation.requires_participants() && actors.is_empty() {
            return Err(TaskDomainError::EmptyParticipants(participation.as_str()));
        }
        if actors.len() > self.config.max_participants {
            return Err(TaskDomainError::TooManyParticipants {
                count: actors.len(),
                limit: self.config.max_participants,
            });
        }
        actors.iter().try_for_each(Actor::validate)
    }

    pub(super) fn denied(
        &self,
        identity: &str,
        action: &'static str,
        task_id: TaskId,
    ) -> TaskLifecycleError {
        warn!(task_id = %task_id, identity, action, "permission denied");
        TaskLifecycleError::PermissionDenied {
            identity: identity.to_owned(),
            action,
            task_id,
        }
    }

    pub(super) fn notify(&self, event: TaskEvent, task: &Task) {
        if let Some(listener) = &self.listener {
            listener.notify(event, task);
        }
    }
}

/// Builds the participant row attaching `actor` to `task`.
pub(super) fn attach(task: &Task, actor: Actor) -> TaskActor {
    TaskActor::new(
        task.record().tenant_id.clone(),
        task.instance_id(),
        task.id(),
        actor,
    )
}
