//! Listener that turns lifecycle events into log lines.

use crate::task::{
    domain::Task,
    ports::{TaskEvent, TaskListener},
};
use tracing::info;

/// Logs every lifecycle event through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTaskListener;

impl TaskListener for TracingTaskListener {
    fn notify(&self, event: TaskEvent, task: &Task) {
        info!(
            event = %event,
            task_id = %task.id(),
            instance_id = %task.instance_id(),
            task_name = task.task_name(),
            task_type = %task.task_type(),
            "task lifecycle event"
        );
    }
}
