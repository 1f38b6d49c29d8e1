//! Dependency resolution.
//!
//! A task may run only when every declared prerequisite has completed.
//! Resolution fails closed: a dependency id that maps to no known task
//! counts as unsatisfied, so the dependent task stays queued.

use crate::core::task::{Task, TaskStatus};
use crate::scheduler::queue::TaskTable;

/// True iff every dependency of `task` exists and has completed.
pub fn is_satisfied(task: &Task, table: &TaskTable) -> bool {
    task.dependencies.iter().all(|dep_id| {
        table
            .get(dep_id)
            .map(|dep| dep.status == TaskStatus::Completed)
            .unwrap_or(false)
    })
}
