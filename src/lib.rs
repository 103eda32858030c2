//! Signoff: task lifecycle engine for approval workflows.
//!
//! A running process instance pauses at human-interaction nodes. This crate
//! turns such a node into tasks held by participants and drives each task to
//! a terminal state, keeping an immutable history of what happened.
//!
//! # Architecture
//!
//! Signoff follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage, access control, and
//!   lifecycle notifications
//! - **Adapters**: Concrete implementations of ports (in-memory store,
//!   membership-based access, tracing listener)
//!
//! # Modules
//!
//! - [`task`]: Task creation, terminal transitions, and undo operations

pub mod task;
