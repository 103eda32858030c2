//! Shared fixtures for engine tests.

use std::sync::{Arc, Mutex};

use crate::task::{
    adapters::{MembershipAccessStrategy, memory::InMemoryTaskStore},
    domain::{
        Actor, Execution, Identity, Instance, NodeKind, NodeModel, ParticipationType, Task, TaskId,
    },
    ports::{TaskEvent, TaskListener},
    services::TaskLifecycleEngine,
};
use mockable::DefaultClock;
use rstest::fixture;

pub(super) type TestEngine =
    TaskLifecycleEngine<InMemoryTaskStore, MembershipAccessStrategy, DefaultClock>;

/// Listener that remembers every event it hears.
#[derive(Debug, Default)]
pub(super) struct RecordingListener {
    events: Mutex<Vec<(TaskEvent, TaskId)>>,
}

impl RecordingListener {
    pub(super) fn events(&self) -> Vec<(TaskEvent, TaskId)> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub(super) fn count(&self, event: TaskEvent) -> usize {
        self.events()
            .iter()
            .filter(|(seen, _)| *seen == event)
            .count()
    }
}

impl TaskListener for RecordingListener {
    fn notify(&self, event: TaskEvent, task: &Task) {
        if let Ok(mut events) = self.events.lock() {
            events.push((event, task.id()));
        }
    }
}

pub(super) struct Harness {
    pub(super) store: Arc<InMemoryTaskStore>,
    pub(super) engine: TestEngine,
    pub(super) listener: Arc<RecordingListener>,
    pub(super) instance: Instance,
    pub(super) initiator: Identity,
}

impl Harness {
    pub(super) fn execution(&self) -> Execution {
        Execution::new(self.instance.clone(), self.initiator.clone())
    }

    pub(super) fn execution_after(&self, task: &Task, identity: &Identity) -> Execution {
        Execution::new(self.instance.clone(), identity.clone()).with_task(task.clone())
    }

    /// Creates the tasks of `node` for the initiator and returns them.
    pub(super) async fn start(&self, node: &NodeModel) -> Vec<Task> {
        self.engine
            .create_tasks_for_node(node, &self.execution())
            .await
            .expect("node tasks should be created")
    }
}

#[fixture]
pub(super) fn harness() -> Harness {
    let store = Arc::new(InMemoryTaskStore::new());
    let access = Arc::new(MembershipAccessStrategy::new().with_role("carol", "finance"));
    let listener = Arc::new(RecordingListener::default());
    let initiator = Identity::new("alice", "Alice");
    let instance = Instance::new("expense-claim", initiator.clone(), &DefaultClock);
    store
        .register_instance(instance.clone())
        .expect("instance should register");
    let engine = TaskLifecycleEngine::new(Arc::clone(&store), access, Arc::new(DefaultClock))
        .with_listener(Arc::clone(&listener) as Arc<dyn TaskListener>);
    Harness {
        store,
        engine,
        listener,
        instance,
        initiator,
    }
}

pub(super) fn user(id: &str) -> Actor {
    Actor::user(id, id.to_uppercase())
}

pub(super) fn identity(id: &str) -> Identity {
    Identity::new(id, id.to_uppercase())
}

pub(super) fn approval(
    name: &str,
    participation: ParticipationType,
    actors: &[&str],
) -> NodeModel {
    NodeModel::new(name, NodeKind::Approval)
        .expect("valid node name")
        .with_participation(participation)
        .with_participants(actors.iter().map(|id| user(id)))
}
