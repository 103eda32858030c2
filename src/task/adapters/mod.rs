//! Adapter implementations for task lifecycle ports.

pub mod access;
pub mod listener;
pub mod memory;

pub use access::MembershipAccessStrategy;
pub use listener::TracingTaskListener;
