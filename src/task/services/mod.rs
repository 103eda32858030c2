//! Application services for task lifecycle orchestration.

mod assignment;
mod config;
mod error;
mod lifecycle;
mod undo;

pub use config::EngineConfig;
pub use error::{InvalidTaskState, MissingRecord, TaskLifecycleError, TaskLifecycleResult};
pub use lifecycle::{AssignmentKind, TaskLifecycleEngine, TaskUpdate};
