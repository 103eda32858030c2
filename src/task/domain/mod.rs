//! Domain model for the task lifecycle.
//!
//! Active tasks, their history records, participants, and the node and
//! execution descriptors task creation consumes. Nothing here touches a store.

mod actor;
mod codes;
mod error;
mod execution;
mod ids;
mod instance;
mod node;
mod task;

pub use actor::{Actor, HisTaskActor, Identity, TaskActor};
pub use codes::{ActorKind, NodeKind, ParticipationType, TaskType, TerminalState};
pub use error::TaskDomainError;
pub use execution::Execution;
pub use ids::{InstanceId, TaskId, TenantId};
pub use instance::{Instance, TaskCc};
pub use node::NodeModel;
pub use task::{Disposition, HisTask, Task, TaskRecord, Variables};
