//! In-memory task store for tests and embedded use.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{HisTask, HisTaskActor, Instance, InstanceId, Task, TaskActor, TaskCc, TaskId},
    ports::{ChangeSet, StoreOp, TaskStore, TaskStoreError, TaskStoreResult},
};

/// Thread-safe in-memory task store.
///
/// A commit stages every operation on a copy of the state and swaps it in
/// only when all of them succeed.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<StoreState>>,
}

#[derive(Debug, Clone, Default)]
struct StoreState {
    tasks: HashMap<TaskId, Task>,
    actors: Vec<TaskActor>,
    his_tasks: HashMap<TaskId, HisTask>,
    his_actors: Vec<HisTaskActor>,
    ccs: Vec<TaskCc>,
    instances: HashMap<InstanceId, Instance>,
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a running instance, as the process layer would on start.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the lock is poisoned.
    pub fn register_instance(&self, instance: Instance) -> TaskStoreResult<()> {
        let mut state = self.write()?;
        state.instances.insert(instance.id(), instance);
        Ok(())
    }

    /// Archives an instance so it no longer counts as running.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the lock is poisoned.
    pub fn close_instance(&self, id: InstanceId) -> TaskStoreResult<Option<Instance>> {
        let mut state = self.write()?;
        Ok(state.instances.remove(&id))
    }

    fn read(&self) -> TaskStoreResult<RwLockReadGuard<'_, StoreState>> {
        self.state.read().map_err(|err| {
            TaskStoreError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskStoreResult<RwLockWriteGuard<'_, StoreState>> {
        self.state.write().map_err(|err| {
            TaskStoreError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

impl StoreState {
    fn apply(&mut self, op: StoreOp) -> TaskStoreResult<()> {
        match op {
            StoreOp::InsertTask(task) => {
                let id = task.id();
                if self.tasks.contains_key(&id) || self.his_tasks.contains_key(&id) {
                    return Err(TaskStoreError::DuplicateTask(id));
                }
                self.tasks.insert(id, task);
            }
            StoreOp::UpdateTask { expected, task } => {
                self.check_unchanged(&expected)?;
                self.tasks.insert(task.id(), task);
            }
            StoreOp::ArchiveTask { expected, history } => {
                let id = history.id();
                self.check_unchanged(&expected)?;
                if self.his_tasks.contains_key(&id) {
                    return Err(TaskStoreError::DuplicateTask(id));
                }
                self.tasks.remove(&id);
                let (moved, kept): (Vec<TaskActor>, Vec<TaskActor>) =
                    std::mem::take(&mut self.actors)
                        .into_iter()
                        .partition(|row| row.task_id == id);
                self.actors = kept;
                self.his_actors.extend(moved.into_iter().map(HisTaskActor::from));
                self.his_tasks.insert(id, history);
            }
            StoreOp::DeleteTask(id) => {
                self.tasks
                    .remove(&id)
                    .ok_or(TaskStoreError::TaskNotFound(id))?;
            }
            StoreOp::InsertActor(actor) => {
                if !self.tasks.contains_key(&actor.task_id) {
                    return Err(TaskStoreError::TaskNotFound(actor.task_id));
                }
                self.actors.push(actor);
            }
            StoreOp::DeleteActor { task_id, actor_id } => {
                self.actors
                    .retain(|row| !(row.task_id == task_id && row.actor_id() == actor_id));
            }
            StoreOp::DeleteActorsByTask(task_id) => {
                self.actors.retain(|row| row.task_id != task_id);
            }
            StoreOp::InsertHisTask(history) => {
                let id = history.id();
                if self.his_tasks.contains_key(&id) {
                    return Err(TaskStoreError::DuplicateTask(id));
                }
                self.his_tasks.insert(id, history);
            }
            StoreOp::InsertHisActor(actor) => {
                if !self.his_tasks.contains_key(&actor.task_id) {
                    return Err(TaskStoreError::HistoryNotFound(actor.task_id));
                }
                self.his_actors.push(actor);
            }
            StoreOp::InsertCc(cc) => self.ccs.push(cc),
            StoreOp::DeleteHistoryByInstance(instance_id) => {
                let ids: HashSet<TaskId> = self
                    .his_tasks
                    .values()
                    .filter(|history| history.instance_id() == instance_id)
                    .map(HisTask::id)
                    .collect();
                self.his_actors.retain(|row| !ids.contains(&row.task_id));
                self.his_tasks.retain(|id, _| !ids.contains(id));
            }
            StoreOp::DeleteTasksByInstance(instance_id) => {
                let ids: HashSet<TaskId> = self
                    .tasks
                    .values()
                    .filter(|task| task.instance_id() == instance_id)
                    .map(Task::id)
                    .collect();
                self.actors.retain(|row| !ids.contains(&row.task_id));
                self.tasks.retain(|id, _| !ids.contains(id));
            }
        }
        Ok(())
    }

    fn check_unchanged(&self, expected: &Task) -> TaskStoreResult<()> {
        let id = expected.id();
        match self.tasks.get(&id) {
            None => Err(TaskStoreError::TaskNotFound(id)),
            Some(live) if live != expected => Err(TaskStoreError::Conflict(id)),
            Some(_) => Ok(()),
        }
    }

    fn check_disjoint(&self) -> TaskStoreResult<()> {
        match self.tasks.keys().find(|id| self.his_tasks.contains_key(id)) {
            Some(id) => Err(TaskStoreError::DisjointnessViolation(*id)),
            None => Ok(()),
        }
    }
}

fn oldest_first(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by(|a, b| (a.record().created_at, a.id()).cmp(&(b.record().created_at, b.id())));
    tasks
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn find_task(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_his_task(&self, id: TaskId) -> TaskStoreResult<Option<HisTask>> {
        let state = self.read()?;
        Ok(state.his_tasks.get(&id).cloned())
    }

    async fn find_instance(&self, id: InstanceId) -> TaskStoreResult<Option<Instance>> {
        let state = self.read()?;
        Ok(state.instances.get(&id).cloned())
    }

    async fn list_actors_by_task(&self, task_id: TaskId) -> TaskStoreResult<Vec<TaskActor>> {
        let state = self.read()?;
        Ok(state
            .actors
            .iter()
            .filter(|row| row.task_id == task_id)
            .cloned()
            .collect())
    }

    async fn list_actors_by_tasks(&self, task_ids: &[TaskId]) -> TaskStoreResult<Vec<TaskActor>> {
        let state = self.read()?;
        Ok(state
            .actors
            .iter()
            .filter(|row| task_ids.contains(&row.task_id))
            .cloned()
            .collect())
    }

    async fn list_his_actors_by_task(
        &self,
        task_id: TaskId,
    ) -> TaskStoreResult<Vec<HisTaskActor>> {
        let state = self.read()?;
        Ok(state
            .his_actors
            .iter()
            .filter(|row| row.task_id == task_id)
            .cloned()
            .collect())
    }

    async fn list_tasks_by_instance(&self, instance_id: InstanceId) -> TaskStoreResult<Vec<Task>> {
        let state = self.read()?;
        let tasks = state
            .tasks
            .values()
            .filter(|task| task.instance_id() == instance_id)
            .cloned()
            .collect();
        Ok(oldest_first(tasks))
    }

    async fn list_tasks_by_parents(&self, parent_ids: &[TaskId]) -> TaskStoreResult<Vec<Task>> {
        let state = self.read()?;
        let tasks = state
            .tasks
            .values()
            .filter(|task| {
                task.parent_task_id()
                    .is_some_and(|parent| parent_ids.contains(&parent))
            })
            .cloned()
            .collect();
        Ok(oldest_first(tasks))
    }

    async fn list_his_tasks_by_instance(
        &self,
        instance_id: InstanceId,
    ) -> TaskStoreResult<Vec<HisTask>> {
        let state = self.read()?;
        let mut records: Vec<HisTask> = state
            .his_tasks
            .values()
            .filter(|history| history.instance_id() == instance_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            (a.disposition().finished_at, a.id()).cmp(&(b.disposition().finished_at, b.id()))
        });
        Ok(records)
    }

    async fn list_due_tasks(&self, now: DateTime<Utc>) -> TaskStoreResult<Vec<Task>> {
        let state = self.read()?;
        let tasks = state
            .tasks
            .values()
            .filter(|task| task.is_due(now))
            .cloned()
            .collect();
        Ok(oldest_first(tasks))
    }

    async fn list_ccs_by_instance(&self, instance_id: InstanceId) -> TaskStoreResult<Vec<TaskCc>> {
        let state = self.read()?;
        Ok(state
            .ccs
            .iter()
            .filter(|cc| cc.instance_id == instance_id)
            .cloned()
            .collect())
    }

    async fn commit(&self, changes: ChangeSet) -> TaskStoreResult<()> {
        let mut state = self.write()?;
        let mut staged = state.clone();
        for op in changes.into_ops() {
            staged.apply(op)?;
        }
        staged.check_disjoint()?;
        *state = staged;
        Ok(())
    }
}
