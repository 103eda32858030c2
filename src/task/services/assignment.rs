//! Task creation for process nodes.
//!
//! The node kind picks between blocking tasks and carbon-copy notices; the
//! participation strategy then decides how many tasks a node yields and who
//! is attached to each.

use super::{
    error::TaskLifecycleResult,
    lifecycle::{TaskLifecycleEngine, attach},
};
use crate::task::{
    domain::{
        Actor, Execution, NodeKind, NodeModel, ParticipationType, Task, TaskCc, TaskDomainError,
        TaskRecord,
    },
    ports::{ChangeSet, StoreOp, TaskAccessStrategy, TaskEvent, TaskStore},
};
use mockable::Clock;
use tracing::info;

impl<S, A, C> TaskLifecycleEngine<S, A, C>
where
    S: TaskStore,
    A: TaskAccessStrategy,
    C: Clock + Send + Sync,
{
    /// Creates the tasks a node yields for `execution`.
    ///
    /// Carbon-copy nodes write one notice per participant and hand over to
    /// their child node, even when they list nobody; the tasks created for
    /// the child are returned. Every
    /// write of one call commits together, and a `create` event follows for
    /// each returned task.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskLifecycleError::Validation`] when a strategy that
    /// needs participants gets none, or a participant is malformed.
    pub async fn create_tasks_for_node(
        &self,
        node: &NodeModel,
        execution: &Execution,
    ) -> TaskLifecycleResult<Vec<Task>> {
        let mut changes = ChangeSet::new();
        let mut created = Vec::new();
        let mut current = Some(node);
        while let Some(step) = current {
            match step.kind() {
                NodeKind::CarbonCopy => {
                    self.stage_carbon_copies(step, execution, &mut changes)?;
                    current = step.child();
                }
                NodeKind::Initiator | NodeKind::Approval | NodeKind::ConditionalApproval => {
                    created = self.stage_tasks(step, execution, &mut changes)?;
                    current = None;
                }
            }
        }
        if changes.is_empty() {
            return Ok(created);
        }
        self.store.commit(changes).await?;
        info!(
            instance_id = %execution.instance().id(),
            node = node.name(),
            created = created.len(),
            "tasks created for node"
        );
        for task in &created {
            self.notify(TaskEvent::Create, task);
        }
        Ok(created)
    }

    fn stage_tasks(
        &self,
        node: &NodeModel,
        execution: &Execution,
        changes: &mut ChangeSet,
    ) -> TaskLifecycleResult<Vec<Task>> {
        let participation = node.participation();
        let actors = node.participants();
        self.validate_participants(participation, actors)?;
        let template = self.base_task(node, execution);

        let tasks = match participation {
            ParticipationType::Direct | ParticipationType::AnyOf => {
                let rows: Vec<_> = actors
                    .iter()
                    .map(|actor| attach(&template, actor.clone()))
                    .collect();
                changes.insert_task(template.clone(), rows);
                vec![template]
            }
            ParticipationType::Sequential => {
                let first = next_in_line(execution, actors)?;
                changes.insert_task(template.clone(), [attach(&template, first)]);
                vec![template]
            }
            ParticipationType::AllRequired => actors
                .iter()
                .map(|actor| {
                    let task = template.duplicate(template.creator().cloned(), &*self.clock);
                    changes.insert_task(task.clone(), [attach(&task, actor.clone())]);
                    task
                })
                .collect(),
        };
        Ok(tasks)
    }

    fn stage_carbon_copies(
        &self,
        node: &NodeModel,
        execution: &Execution,
        changes: &mut ChangeSet,
    ) -> TaskLifecycleResult<()> {
        let actors = node.participants();
        if actors.len() > self.config.max_participants {
            return Err(TaskDomainError::TooManyParticipants {
                count: actors.len(),
                limit: self.config.max_participants,
            }
            .into());
        }
        actors.iter().try_for_each(Actor::validate)?;
        let now = self.clock.utc();
        for actor in actors {
            changes.push(StoreOp::InsertCc(TaskCc {
                tenant_id: self.config.tenant_id.clone(),
                instance_id: execution.instance().id(),
                parent_task_id: execution.task().map(Task::id),
                task_name: node.name().to_owned(),
                display_name: node.name().to_owned(),
                actor: actor.clone(),
                creator: execution.identity().clone(),
                created_at: now,
            }));
        }
        Ok(())
    }

    fn base_task(&self, node: &NodeModel, execution: &Execution) -> Task {
        let now = self.clock.utc();
        let mut record = TaskRecord::new(
            execution.instance().id(),
            node.name(),
            node.kind().task_type(),
            now,
        );
        record.tenant_id = self.config.tenant_id.clone();
        record.parent_task_id = execution.task().map(Task::id);
        record.participation = node.participation();
        record.variables = execution.variables().clone();
        record.creator = Some(execution.identity().clone());
        record.expire_time = node.expire_after().map(|offset| now + offset);
        record.remind_time = node.remind_after().map(|offset| now + offset);
        Task::new(record)
    }
}

/// The single participant of a sequential task: the actor chosen by the
/// caller, else the first listed.
fn next_in_line(execution: &Execution, actors: &[Actor]) -> TaskLifecycleResult<Actor> {
    let chosen = execution
        .next_actor()
        .or_else(|| actors.first())
        .cloned()
        .ok_or(TaskDomainError::EmptyParticipants(
            ParticipationType::Sequential.as_str(),
        ))?;
    chosen.validate()?;
    Ok(chosen)
}
