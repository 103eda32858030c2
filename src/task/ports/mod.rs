//! Port contracts for the task lifecycle engine.
//!
//! Ports define infrastructure-agnostic interfaces injected into the engine.

pub mod access;
pub mod listener;
pub mod store;

pub use access::TaskAccessStrategy;
pub use listener::{TaskEvent, TaskListener};
pub use store::{ChangeSet, StoreOp, TaskStore, TaskStoreError, TaskStoreResult};
