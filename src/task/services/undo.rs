//! Reject, withdraw, reclaim, and resume.
//!
//! All four reinstate a history record as a fresh active task. They differ in
//! what they clear away first and in who is allowed to ask.

use super::{
    error::{InvalidTaskState, TaskLifecycleResult},
    lifecycle::{TaskLifecycleEngine, attach},
};
use crate::task::{
    domain::{
        Actor, HisTask, Identity, InstanceId, ParticipationType, Task, TaskActor, TaskId,
        TerminalState, Variables,
    },
    ports::{ChangeSet, TaskAccessStrategy, TaskEvent, TaskStore},
};
use mockable::Clock;
use tracing::{info, warn};

/// Where the active tasks downstream of a history record live.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Downstream {
    /// Tasks spawned directly by the record.
    ChildrenOf(TaskId),
    /// Tasks spawned by any sibling of the record: same instance, node name,
    /// and parent.
    SiblingsOf {
        instance_id: InstanceId,
        task_name: String,
        parent_task_id: Option<TaskId>,
    },
}

impl Downstream {
    fn of(history: &HisTask) -> Self {
        match history.participation() {
            ParticipationType::AllRequired => Self::ChildrenOf(history.id()),
            ParticipationType::Direct
            | ParticipationType::Sequential
            | ParticipationType::AnyOf => Self::SiblingsOf {
                instance_id: history.instance_id(),
                task_name: history.task_name().to_owned(),
                parent_task_id: history.parent_task_id(),
            },
        }
    }
}

impl<S, A, C> TaskLifecycleEngine<S, A, C>
where
    S: TaskStore,
    A: TaskAccessStrategy,
    C: Clock + Send + Sync,
{
    /// Sends a task back to the step that spawned it.
    ///
    /// The task is archived as rejected by `identity` and its parent history
    /// record is reinstated, in one commit. Returns the reinstated task.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTaskState::RootTask`] for a task without a parent,
    /// and [`super::TaskLifecycleError::PermissionDenied`] when `identity` is
    /// not a participant.
    pub async fn reject(
        &self,
        task_id: TaskId,
        identity: &Identity,
        variables: &Variables,
    ) -> TaskLifecycleResult<Task> {
        let task = self.load_task(task_id).await?;
        let parent_id = task
            .parent_task_id()
            .ok_or(InvalidTaskState::RootTask(task_id))?;
        let (snapshot, mut changes) = self
            .stage_finish(task, identity, variables, TerminalState::Rejected, "reject")
            .await?;
        let restored = self.stage_undo(parent_id, identity, &mut changes).await?;
        self.store.commit(changes).await?;
        info!(
            task_id = %task_id,
            restored = %restored.id(),
            identity = identity.id(),
            "task rejected"
        );
        self.notify(TaskEvent::Reject, &snapshot);
        self.notify(TaskEvent::Create, &restored);
        Ok(restored)
    }

    /// Pulls a completed task back while its downstream work is still open.
    ///
    /// Every active downstream task is discarded and the history record is
    /// reinstated.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTaskState::NotWithdrawable`] when no downstream task
    /// remains active.
    pub async fn withdraw(
        &self,
        history_id: TaskId,
        identity: &Identity,
    ) -> TaskLifecycleResult<Task> {
        let history = self.load_history(history_id).await?;
        let targets = self.downstream_tasks(&history).await?;
        if targets.is_empty() {
            warn!(task_id = %history_id, "nothing left to withdraw");
            return Err(InvalidTaskState::NotWithdrawable(history_id).into());
        }
        let mut changes = ChangeSet::new();
        for target in &targets {
            changes.discard_task(target.id());
        }
        let restored = self.stage_undo(history_id, identity, &mut changes).await?;
        self.store.commit(changes).await?;
        info!(
            task_id = %history_id,
            restored = %restored.id(),
            discarded = targets.len(),
            "task withdrawn"
        );
        self.notify(TaskEvent::Create, &restored);
        Ok(restored)
    }

    /// Takes a task back after it moved on, discarding every active task of
    /// the instance.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskLifecycleError::PermissionDenied`] unless
    /// `identity` put the record into history.
    pub async fn reclaim(
        &self,
        history_id: TaskId,
        identity: &Identity,
    ) -> TaskLifecycleResult<Task> {
        let history = self.load_history(history_id).await?;
        if !history.originated_by(identity) {
            return Err(self.denied(identity.id(), "reclaim", history_id));
        }
        let active = self.store.list_tasks_by_instance(history.instance_id()).await?;
        let mut changes = ChangeSet::new();
        for task in &active {
            changes.discard_task(task.id());
        }
        let restored = self.stage_undo(history_id, identity, &mut changes).await?;
        self.store.commit(changes).await?;
        info!(
            task_id = %history_id,
            restored = %restored.id(),
            discarded = active.len(),
            "task reclaimed"
        );
        self.notify(TaskEvent::Create, &restored);
        Ok(restored)
    }

    /// Revives an archived task for `actor` while the instance still runs.
    ///
    /// Other active tasks are left alone, so siblings may already have moved
    /// past the revived step.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTaskState::ResumeDisabled`] when switched off,
    /// [`super::TaskLifecycleError::PermissionDenied`] unless `actor` put the
    /// record into history, and [`InvalidTaskState::InstanceEnded`] when the
    /// instance is no longer running.
    pub async fn resume(&self, history_id: TaskId, actor: Actor) -> TaskLifecycleResult<Task> {
        if !self.config.allow_resume {
            return Err(InvalidTaskState::ResumeDisabled.into());
        }
        actor.validate()?;
        let history = self.load_history(history_id).await?;
        if !history.originated_by(&actor.as_identity()) {
            return Err(self.denied(actor.id(), "resume", history_id));
        }
        let instance_id = history.instance_id();
        if self.store.find_instance(instance_id).await?.is_none() {
            return Err(InvalidTaskState::InstanceEnded(instance_id).into());
        }
        let task = Task::from_historical(&history, None, &*self.clock);
        let mut changes = ChangeSet::new();
        changes.insert_task(task.clone(), [attach(&task, actor.clone())]);
        self.store.commit(changes).await?;
        warn!(
            task_id = %history_id,
            restored = %task.id(),
            actor = actor.id(),
            "task resumed alongside any progressed siblings"
        );
        self.notify(TaskEvent::Create, &task);
        Ok(task)
    }

    /// Stages reinstatement of a history record as a new active task created
    /// by `identity`, with the archived participants attached.
    async fn stage_undo(
        &self,
        history_id: TaskId,
        identity: &Identity,
        changes: &mut ChangeSet,
    ) -> TaskLifecycleResult<Task> {
        let history = self.load_history(history_id).await?;
        let archived = self.store.list_his_actors_by_task(history_id).await?;
        let task = Task::from_historical(&history, Some(identity.clone()), &*self.clock);
        let rows: Vec<TaskActor> = archived
            .iter()
            .map(|row| TaskActor::restore(row, task.id()))
            .collect();
        changes.insert_task(task.clone(), rows);
        Ok(task)
    }

    async fn downstream_tasks(&self, history: &HisTask) -> TaskLifecycleResult<Vec<Task>> {
        match Downstream::of(history) {
            Downstream::ChildrenOf(id) => Ok(self.store.list_tasks_by_parents(&[id]).await?),
            Downstream::SiblingsOf {
                instance_id,
                task_name,
                parent_task_id,
            } => {
                let siblings: Vec<TaskId> = self
                    .store
                    .list_his_tasks_by_instance(instance_id)
                    .await?
                    .iter()
                    .filter(|record| {
                        record.task_name() == task_name
                            && record.parent_task_id() == parent_task_id
                    })
                    .map(HisTask::id)
                    .collect();
                if siblings.is_empty() {
                    return Ok(Vec::new());
                }
                Ok(self.store.list_tasks_by_parents(&siblings).await?)
            }
        }
    }
}
