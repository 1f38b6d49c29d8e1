//! Pluggable task handlers.
//!
//! The scheduler owns admission timing and resource bookkeeping; handlers
//! own the business logic executed inside a task. Handlers are registered
//! by task type; unregistered types fall back to a generic handler.

use crate::core::task::{Task, TaskOutcome};
use crate::Result;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Arc;

/// Business logic for one task type.
///
/// A handler returning `Err` (or panicking) is converted by the dispatcher
/// into a failed task outcome; it never propagates to the admission
/// controller.
#[async_trait]
pub trait TaskHandler: Send + Sync {
    async fn run(&self, task: &Task) -> Result<TaskOutcome>;
}

/// Adapter turning an async closure into a [`TaskHandler`].
pub struct FnHandler<F>
where
    F: Fn(Task) -> BoxFuture<'static, Result<TaskOutcome>> + Send + Sync,
{
    f: F,
}

#[async_trait]
impl<F> TaskHandler for FnHandler<F>
where
    F: Fn(Task) -> BoxFuture<'static, Result<TaskOutcome>> + Send + Sync,
{
    async fn run(&self, task: &Task) -> Result<TaskOutcome> {
        (self.f)(task.clone()).await
    }
}

/// Wrap an async closure as a shareable handler.
pub fn handler_fn<F>(f: F) -> Arc<dyn TaskHandler>
where
    F: Fn(Task) -> BoxFuture<'static, Result<TaskOutcome>> + Send + Sync + 'static,
{
    Arc::new(FnHandler { f })
}

/// Fallback handler for types with no registration.
///
/// Succeeds immediately with a descriptive outcome; real deployments
/// register their own handlers per type.
pub struct GenericHandler;

#[async_trait]
impl TaskHandler for GenericHandler {
    async fn run(&self, task: &Task) -> Result<TaskOutcome> {
        Ok(TaskOutcome::success(
            "Generic task completed",
            serde_json::json!({
                "task_type": task.task_type,
                "processed": true,
            }),
            0,
        ))
    }
}

/// Type-keyed handler registry with a generic fallback.
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn TaskHandler>>,
    fallback: Arc<dyn TaskHandler>,
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            fallback: Arc::new(GenericHandler),
        }
    }

    /// Register or replace the handler for a task type.
    pub fn register(&mut self, task_type: &str, handler: Arc<dyn TaskHandler>) {
        self.handlers.insert(task_type.to_string(), handler);
    }

    /// Handler for a task type, or the generic fallback.
    pub fn resolve(&self, task_type: &str) -> Arc<dyn TaskHandler> {
        self.handlers
            .get(task_type)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.fallback))
    }

    pub fn is_registered(&self, task_type: &str) -> bool {
        self.handlers.contains_key(task_type)
    }
}
