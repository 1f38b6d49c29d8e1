//! Owned task store with a priority-ordered admission index.
//!
//! Tasks live in an arena keyed by id; the queue itself is a sorted index
//! of `(priority desc, submission seq asc)` keys. Callers never touch the
//! raw collections, so every mutation goes through the table's methods.

use crate::core::task::{Task, TaskId, TaskStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sort key for one queued task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QueueKey {
    priority: u8,
    seq: u64,
    id: TaskId,
}

/// Read filters for queue inspection.
///
/// `status` matches on the variant only, so any `Failed` task matches a
/// `Failed` filter regardless of its error message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueFilter {
    pub status: Option<TaskStatus>,
    pub task_type: Option<String>,
    pub min_priority: Option<u8>,
}

/// Arena of tasks plus the sorted admission index.
#[derive(Debug, Default)]
pub struct TaskTable {
    tasks: HashMap<TaskId, Task>,
    order: Vec<QueueKey>,
    next_seq: u64,
}

impl TaskTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a task, assigning its submission sequence number and
    /// re-sorting the index (priority descending, earlier submissions
    /// first on ties).
    pub fn insert(&mut self, mut task: Task) -> Task {
        task.seq = self.next_seq;
        self.next_seq += 1;

        self.order.push(QueueKey {
            priority: task.priority,
            seq: task.seq,
            id: task.id,
        });
        self.order
            .sort_by(|a, b| b.priority.cmp(&a.priority).then(a.seq.cmp(&b.seq)));

        let stored = task.clone();
        self.tasks.insert(task.id, task);
        stored
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn get_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.get_mut(id)
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.tasks.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids of tasks still waiting for admission (`Scheduled` or
    /// `WaitingDependencies`), highest priority first.
    pub fn candidates(&self) -> Vec<TaskId> {
        self.order
            .iter()
            .filter(|key| {
                self.tasks
                    .get(&key.id)
                    .map(|task| task.is_pending())
                    .unwrap_or(false)
            })
            .map(|key| key.id)
            .collect()
    }

    /// Filtered, priority-sorted clones for read-only inspection.
    pub fn filtered(&self, filter: &QueueFilter) -> Vec<Task> {
        self.order
            .iter()
            .filter_map(|key| self.tasks.get(&key.id))
            .filter(|task| {
                if let Some(ref status) = filter.status {
                    if std::mem::discriminant(&task.status) != std::mem::discriminant(status) {
                        return false;
                    }
                }
                if let Some(ref task_type) = filter.task_type {
                    if &task.task_type != task_type {
                        return false;
                    }
                }
                if let Some(min) = filter.min_priority {
                    if task.priority < min {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect()
    }
}
