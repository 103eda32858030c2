//! Shared test helpers for in-memory engine integration tests.

use std::sync::Arc;

use signoff::task::{
    adapters::{MembershipAccessStrategy, TracingTaskListener, memory::InMemoryTaskStore},
    domain::{Actor, Execution, Identity, Instance, NodeKind, NodeModel, ParticipationType, Task},
    services::TaskLifecycleEngine,
};
use mockable::DefaultClock;
use rstest::fixture;

/// Engine type used across integration tests.
pub type TestEngine =
    TaskLifecycleEngine<InMemoryTaskStore, MembershipAccessStrategy, DefaultClock>;

/// A running expense-claim instance with its engine and store.
pub struct Workflow {
    pub store: Arc<InMemoryTaskStore>,
    pub engine: TestEngine,
    pub instance: Instance,
}

impl Workflow {
    /// Execution context for the first node of the instance.
    #[must_use]
    pub fn start(&self) -> Execution {
        Execution::new(self.instance.clone(), self.instance.creator().clone())
    }

    /// Execution context for the node after `task`, entered by `who` and
    /// carrying the task's variables forward.
    #[must_use]
    pub fn after(&self, task: &Task, who: &str) -> Execution {
        Execution::new(self.instance.clone(), person(who))
            .with_task(task.clone())
            .with_variables(task.variables().clone())
    }
}

/// Provides an engine over a fresh store with one registered instance.
///
/// # Panics
///
/// Panics if the instance cannot be registered.
#[fixture]
pub fn workflow() -> Workflow {
    let store = Arc::new(InMemoryTaskStore::new());
    let access = Arc::new(
        MembershipAccessStrategy::new()
            .with_role("hank", "finance")
            .with_department("ivy", "audit"),
    );
    let engine = TaskLifecycleEngine::new(Arc::clone(&store), access, Arc::new(DefaultClock))
        .with_listener(Arc::new(TracingTaskListener));
    let instance = Instance::new("expense-claim", person("alice"), &DefaultClock);
    store
        .register_instance(instance.clone())
        .expect("instance should register");
    Workflow {
        store,
        engine,
        instance,
    }
}

/// Identity for a lowercase user id.
#[must_use]
pub fn person(id: &str) -> Identity {
    Identity::new(id, id.to_uppercase())
}

/// User participant for a lowercase user id.
#[must_use]
pub fn user(id: &str) -> Actor {
    Actor::user(id, id.to_uppercase())
}

/// Approval node over user participants.
///
/// # Panics
///
/// Panics if `name` is blank.
#[must_use]
pub fn node(name: &str, participation: ParticipationType, actors: &[&str]) -> NodeModel {
    NodeModel::new(name, NodeKind::Approval)
        .expect("valid node name")
        .with_participation(participation)
        .with_participants(actors.iter().map(|id| user(id)))
}

/// Completes `task` as `who` with no extra variables.
///
/// # Errors
///
/// Returns an error when the engine refuses the completion.
pub async fn complete(engine: &TestEngine, task: &Task, who: &str) -> Result<Task, eyre::Report> {
    Ok(engine
        .complete(task.id(), &person(who), &serde_json::Map::new())
        .await?)
}

impl Workflow {
    /// Returns whether `task_id` is absent from the active store.
    ///
    /// # Errors
    ///
    /// Returns an error when the store lookup fails.
    pub async fn store_has_no(
        &self,
        task_id: signoff::task::domain::TaskId,
    ) -> Result<bool, eyre::Report> {
        use signoff::task::ports::TaskStore;
        Ok(self.store.find_task(task_id).await?.is_none())
    }
}
