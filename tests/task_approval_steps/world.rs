//! Shared world state for approval lifecycle BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use signoff::task::{
    adapters::{MembershipAccessStrategy, TracingTaskListener, memory::InMemoryTaskStore},
    domain::{Identity, Instance, Task},
    services::{TaskLifecycleEngine, TaskLifecycleError},
};

/// Engine type used by the BDD world.
pub type TestEngine =
    TaskLifecycleEngine<InMemoryTaskStore, MembershipAccessStrategy, DefaultClock>;

/// Scenario world for approval lifecycle behaviour tests.
pub struct ApprovalWorld {
    pub store: Arc<InMemoryTaskStore>,
    pub engine: TestEngine,
    pub instance: Option<Instance>,
    pub submission: Option<Task>,
    pub review: Option<Task>,
    pub last_error: Option<TaskLifecycleError>,
}

impl ApprovalWorld {
    /// Creates a world with an empty store.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryTaskStore::new());
        let engine = TaskLifecycleEngine::new(
            Arc::clone(&store),
            Arc::new(MembershipAccessStrategy::new()),
            Arc::new(DefaultClock),
        )
        .with_listener(Arc::new(TracingTaskListener));
        Self {
            store,
            engine,
            instance: None,
            submission: None,
            review: None,
            last_error: None,
        }
    }

    /// Returns the review task created in the background.
    ///
    /// # Errors
    ///
    /// Returns an error when no review step has been set up.
    pub fn review(&self) -> Result<&Task, eyre::Report> {
        self.review
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing review task in scenario world"))
    }

    /// Returns the completed submission task.
    ///
    /// # Errors
    ///
    /// Returns an error when no submission has been made.
    pub fn submission(&self) -> Result<&Task, eyre::Report> {
        self.submission
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing submission in scenario world"))
    }

    /// Returns the running instance.
    ///
    /// # Errors
    ///
    /// Returns an error when no instance has been started.
    pub fn instance(&self) -> Result<&Instance, eyre::Report> {
        self.instance
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing instance in scenario world"))
    }

    /// Stores the outcome of an engine call, keeping only the error.
    pub fn record<T>(&mut self, result: Result<T, TaskLifecycleError>) {
        self.last_error = result.err();
    }
}

impl Default for ApprovalWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ApprovalWorld {
    ApprovalWorld::default()
}

/// Identity for a lowercase user id.
#[must_use]
pub fn person(id: &str) -> Identity {
    Identity::new(id, id.to_uppercase())
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
