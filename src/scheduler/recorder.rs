//! Per-type execution history and aggregate statistics.
//!
//! Each task type keeps its most recent execution samples (oldest dropped
//! beyond the retention limit) so operators can watch success rates and
//! resource behavior per type.

use crate::core::resources::ResourceVector;
use crate::core::task::{Task, TaskId, TaskOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// One recorded execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSample {
    pub task_id: TaskId,
    pub priority: u8,
    pub execution_time_ms: u64,
    pub success: bool,
    pub resource_usage: ResourceVector,
    pub timestamp: DateTime<Utc>,
}

/// Aggregate statistics for one task type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeStats {
    pub count: usize,
    pub success_rate: f64,
    pub avg_execution_time_ms: f64,
    /// Average of the summed resource requirements per execution.
    pub avg_resource_usage: f64,
    pub last_execution: Option<DateTime<Utc>>,
}

/// Bounded per-type execution history.
#[derive(Debug)]
pub struct PerformanceRecorder {
    history: HashMap<String, VecDeque<PerformanceSample>>,
    limit: usize,
}

impl PerformanceRecorder {
    pub fn new(limit: usize) -> Self {
        Self {
            history: HashMap::new(),
            limit,
        }
    }

    /// Append an execution sample for the task's type, dropping the oldest
    /// entry once the retention limit is reached.
    pub fn record(&mut self, task: &Task, outcome: &TaskOutcome) {
        let sample = PerformanceSample {
            task_id: task.id,
            priority: task.priority,
            execution_time_ms: outcome.execution_time_ms,
            success: outcome.success,
            resource_usage: task.resource_requirements,
            timestamp: Utc::now(),
        };

        let entries = self.history.entry(task.task_type.clone()).or_default();
        entries.push_back(sample);
        while entries.len() > self.limit {
            entries.pop_front();
        }
    }

    /// Samples recorded for one task type, oldest first.
    pub fn history(&self, task_type: &str) -> Option<&VecDeque<PerformanceSample>> {
        self.history.get(task_type)
    }

    /// Aggregate statistics for one task type, if anything was recorded.
    pub fn stats(&self, task_type: &str) -> Option<TypeStats> {
        let entries = self.history.get(task_type)?;
        if entries.is_empty() {
            return None;
        }

        let count = entries.len();
        let successful = entries.iter().filter(|s| s.success).count();
        let total_time: u64 = entries.iter().map(|s| s.execution_time_ms).sum();
        let total_usage: u64 = entries.iter().map(|s| s.resource_usage.total() as u64).sum();

        Some(TypeStats {
            count,
            success_rate: successful as f64 / count as f64,
            avg_execution_time_ms: total_time as f64 / count as f64,
            avg_resource_usage: total_usage as f64 / count as f64,
            last_execution: entries.back().map(|s| s.timestamp),
        })
    }

    /// Statistics for every task type with recorded history.
    pub fn all_stats(&self) -> HashMap<String, TypeStats> {
        self.history
            .keys()
            .filter_map(|task_type| {
                self.stats(task_type)
                    .map(|stats| (task_type.clone(), stats))
            })
            .collect()
    }
}
