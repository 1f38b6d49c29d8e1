//! # taskwheel
//!
//! Priority-based task scheduling with resource-constrained admission
//! control. Tasks are submitted with a type, an urgency tier, optional
//! dependencies and deadline; the engine computes an integer priority and
//! a four-dimension resource cost, and a periodically ticking admission
//! controller starts tasks in priority order subject to a concurrency cap
//! and a shared resource budget. Execution is delegated to pluggable
//! async handlers registered per task type.
//!
//! ```text
//!  schedule_task ──► priority + resource/duration estimation
//!        │
//!        ▼
//!    TaskTable (priority queue, stable tie-break)
//!        │                        ┌──────────────┐
//!   tick │  admission pass ─────► │ ResourcePool │
//!        ▼                        └──────────────┘
//!    dispatch ──► TaskHandler (per type, async)
//!        │
//!        ▼
//!  release + PerformanceRecorder
//! ```
//!
//! The engine is embedded and in-memory: persistence, RPC exposure, and
//! the business logic inside a task are collaborator concerns.

pub mod config;
pub mod core;
pub mod error;
pub mod log;
pub mod scheduler;

pub use config::SchedulerConfig;
pub use crate::core::profile::{Multipliers, TypeProfile, TypeProfiles};
pub use crate::core::resources::{PoolSnapshot, ResourceKind, ResourceVector};
pub use crate::core::task::{PriorityTier, Task, TaskId, TaskOutcome, TaskStatus};
pub use error::{Error, Result};
pub use scheduler::{
    handler_fn, QueueFilter, Scheduler, SchedulerStatus, TaskHandler, TaskSpec, TypeStats,
};
