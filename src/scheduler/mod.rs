//! Admission control, dispatch, and queue coordination.
//!
//! - `queue`: the owned task store and priority index
//! - `deps`: dependency satisfaction checks
//! - `handler`: the pluggable execution seam
//! - `recorder`: per-type execution history
//! - `core`: the scheduler itself (submission, tick loop, admission, dispatch)

pub mod core;
pub mod deps;
pub mod handler;
pub mod queue;
pub mod recorder;

pub use self::core::{Scheduler, SchedulerStatus, TaskSpec};
pub use handler::{handler_fn, GenericHandler, HandlerRegistry, TaskHandler};
pub use queue::QueueFilter;
pub use recorder::{PerformanceSample, TypeStats};
