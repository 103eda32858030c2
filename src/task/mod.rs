//! Task lifecycle management for signoff.
//!
//! This module owns every runtime transition of approval work items: creating
//! tasks for process nodes, completing and timing them out, reassigning and
//! claiming them, managing participants, and the undo family (reject,
//! withdraw, reclaim, resume). The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
