//! Task data model for the scheduling engine.
//!
//! Tasks are the atomic units of work admitted by the scheduler. Each task
//! carries its computed priority, estimated resource cost, dependencies,
//! lifecycle status, and timing.

use crate::core::resources::ResourceVector;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a scheduled task.
///
/// Uses UUID v4 for generation and provides a short form display
/// for human-readable output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub Uuid);

impl TaskId {
    /// Create a new unique task identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Return first 8 characters of the UUID for display.
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Client-declared urgency tier.
///
/// The tier contributes the base score of the computed priority; it never
/// orders tasks on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityTier {
    Critical,
    High,
    Medium,
    Low,
    Background,
}

impl PriorityTier {
    /// Base score contributed to the computed priority.
    pub fn weight(&self) -> i64 {
        match self {
            PriorityTier::Critical => 10,
            PriorityTier::High => 8,
            PriorityTier::Medium => 5,
            PriorityTier::Low => 2,
            PriorityTier::Background => 1,
        }
    }
}

impl Default for PriorityTier {
    fn default() -> Self {
        Self::Medium
    }
}

impl std::fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PriorityTier::Critical => "critical",
            PriorityTier::High => "high",
            PriorityTier::Medium => "medium",
            PriorityTier::Low => "low",
            PriorityTier::Background => "background",
        };
        write!(f, "{}", s)
    }
}

/// Task status in its lifecycle.
///
/// The lifecycle is strictly forward:
/// `scheduled → (waiting_dependencies) → running → completed | failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum TaskStatus {
    /// Admissible as soon as resources and the concurrency cap allow.
    Scheduled,
    /// Blocked until every dependency task has completed.
    WaitingDependencies,
    /// Currently executing; its resource cost is allocated from the pool.
    Running,
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Failed {
        /// Error message describing the failure.
        error: String,
    },
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Scheduled
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Scheduled => write!(f, "scheduled"),
            TaskStatus::WaitingDependencies => write!(f, "waiting_dependencies"),
            TaskStatus::Running => write!(f, "running"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed { error } => write!(f, "failed: {}", error),
        }
    }
}

/// Result of a single task execution, produced by the handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutcome {
    /// Whether the handler considers the execution successful.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Handler-specific payload.
    pub details: serde_json::Value,
    /// Wall-clock execution time in milliseconds.
    pub execution_time_ms: u64,
}

impl TaskOutcome {
    /// Create a successful outcome with the given message.
    pub fn success(message: &str, details: serde_json::Value, execution_time_ms: u64) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            details,
            execution_time_ms,
        }
    }

    /// Create a failed outcome carrying an error message.
    pub fn failure(message: &str, execution_time_ms: u64) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            details: serde_json::Value::Null,
            execution_time_ms,
        }
    }
}

/// A single scheduled task.
///
/// Priority and resource requirements are computed once, at submission
/// time, and never recomputed on subsequent ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier for this task.
    pub id: TaskId,
    /// Type key into the profile and handler tables.
    pub task_type: String,
    /// Client-declared urgency tier.
    pub tier: PriorityTier,
    /// Computed priority, 1..=100. Immutable after submission.
    pub priority: u8,
    /// Estimated resource cost per dimension, each 0..=100.
    pub resource_requirements: ResourceVector,
    /// Estimated execution duration in milliseconds. Informational only.
    pub estimated_duration_ms: u64,
    /// Tasks that must complete before this one may run.
    pub dependencies: Vec<TaskId>,
    /// Optional absolute deadline. Only affects pre-admission priority.
    pub deadline: Option<DateTime<Utc>>,
    /// Current lifecycle status.
    pub status: TaskStatus,
    /// When the task was submitted.
    pub scheduled_at: DateTime<Utc>,
    /// When the task started execution.
    pub started_at: Option<DateTime<Utc>>,
    /// When the task finished (success or failure).
    pub completed_at: Option<DateTime<Utc>>,
    /// Handler outcome, populated on the terminal transition.
    pub result: Option<TaskOutcome>,
    /// Error message when the handler itself failed.
    pub error: Option<String>,
    /// Submission sequence number, used for stable priority tie-break.
    pub seq: u64,
}

impl Task {
    /// Create a new task with computed scheduling attributes.
    ///
    /// The task starts in `Scheduled` status with the submission timestamp
    /// set. The sequence number is assigned when the task enters the queue.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        task_type: &str,
        tier: PriorityTier,
        priority: u8,
        resource_requirements: ResourceVector,
        estimated_duration_ms: u64,
        dependencies: Vec<TaskId>,
        deadline: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: TaskId::new(),
            task_type: task_type.to_string(),
            tier,
            priority,
            resource_requirements,
            estimated_duration_ms,
            dependencies,
            deadline,
            status: TaskStatus::Scheduled,
            scheduled_at: Utc::now(),
            started_at: None,
            completed_at: None,
            result: None,
            error: None,
            seq: 0,
        }
    }

    /// Place the task behind its unmet dependencies.
    pub fn mark_waiting(&mut self) {
        self.status = TaskStatus::WaitingDependencies;
    }

    /// Start the task execution.
    ///
    /// Transitions status to Running and records the start time.
    pub fn start(&mut self) {
        self.status = TaskStatus::Running;
        self.started_at = Some(Utc::now());
    }

    /// Finish the task with the handler's outcome.
    ///
    /// Transitions to Completed or Failed depending on `outcome.success`
    /// and records the completion time. The outcome is stored either way.
    pub fn finish(&mut self, outcome: TaskOutcome) {
        self.status = if outcome.success {
            TaskStatus::Completed
        } else {
            TaskStatus::Failed {
                error: outcome.message.clone(),
            }
        };
        self.completed_at = Some(Utc::now());
        self.result = Some(outcome);
    }

    /// Mark the task as failed when the handler itself errored or panicked.
    ///
    /// Transitions status to Failed and records the completion time.
    pub fn fail(&mut self, error: &str) {
        self.status = TaskStatus::Failed {
            error: error.to_string(),
        };
        self.completed_at = Some(Utc::now());
        self.error = Some(error.to_string());
    }

    /// Check if the task is in a terminal state (Completed or Failed).
    pub fn is_finished(&self) -> bool {
        matches!(
            self.status,
            TaskStatus::Completed | TaskStatus::Failed { .. }
        )
    }

    /// Check if the task is still waiting for admission.
    pub fn is_pending(&self) -> bool {
        matches!(
            self.status,
            TaskStatus::Scheduled | TaskStatus::WaitingDependencies
        )
    }
}
