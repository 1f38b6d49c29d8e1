//! Test fixtures for integration tests.
//!
//! Provides helpers for:
//! - Building schedulers with fast tick intervals
//! - Deterministic gate-controlled handlers
//! - Polling for task state transitions

use std::sync::Arc;
use taskwheel::scheduler::TaskHandler;
use taskwheel::{handler_fn, Scheduler, SchedulerConfig, TaskId, TaskOutcome, TaskStatus};
use tokio::sync::Notify;

/// Scheduler with a fast tick and the built-in type profiles.
pub fn test_scheduler(max_concurrent: usize) -> Scheduler {
    Scheduler::new(SchedulerConfig {
        max_concurrent_tasks: max_concurrent,
        tick_interval_ms: 20,
        history_limit: 100,
    })
}

/// Handler that blocks until the gate is notified, then succeeds.
///
/// `Notify` stores a permit when nobody is waiting yet, so notifying
/// before the handler reaches the gate is safe.
pub fn gated_handler(gate: Arc<Notify>) -> Arc<dyn TaskHandler> {
    handler_fn(move |task| {
        let gate = Arc::clone(&gate);
        Box::pin(async move {
            gate.notified().await;
            Ok(TaskOutcome::success(
                &format!("{} done", task.task_type),
                serde_json::Value::Null,
                1,
            ))
        })
    })
}

/// Handler that succeeds immediately.
pub fn instant_handler() -> Arc<dyn TaskHandler> {
    handler_fn(|task| {
        Box::pin(async move {
            Ok(TaskOutcome::success(
                &format!("{} done", task.task_type),
                serde_json::json!({"instant": true}),
                1,
            ))
        })
    })
}

/// Poll until the task reaches a terminal state.
pub async fn wait_finished(scheduler: &Scheduler, id: &TaskId) {
    for _ in 0..400 {
        if let Some(task) = scheduler.task(id).await {
            if task.is_finished() {
                return;
            }
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    panic!("task {} never finished", id);
}

/// Poll until the task is observed running.
pub async fn wait_running(scheduler: &Scheduler, id: &TaskId) {
    for _ in 0..400 {
        if let Some(task) = scheduler.task(id).await {
            if task.status == TaskStatus::Running {
                return;
            }
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    panic!("task {} never started running", id);
}
