//! The admission controller and its tick loop.
//!
//! A single periodically-ticking control plane scans the queue in priority
//! order and admits tasks into execution while respecting the concurrency
//! cap and the shared resource budget. Admitted tasks execute on their own
//! spawned futures and may complete at any time, including mid-tick;
//! admission and completion bookkeeping are serialized behind one state
//! lock so a release can be neither lost nor double-applied.

use crate::config::SchedulerConfig;
use crate::core::priority::compute_priority;
use crate::core::profile::TypeProfiles;
use crate::core::resources::{PoolSnapshot, ResourcePool};
use crate::core::task::{PriorityTier, Task, TaskId, TaskOutcome, TaskStatus};
use crate::scheduler::deps;
use crate::scheduler::handler::{HandlerRegistry, TaskHandler};
use crate::scheduler::queue::{QueueFilter, TaskTable};
use crate::scheduler::recorder::{PerformanceRecorder, TypeStats};
use crate::{twlog, twlog_debug, twlog_error, twlog_warn, Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

/// Submission request for a new task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Type key into the profile and handler tables. Must be non-empty.
    pub task_type: String,
    /// Declared urgency tier.
    #[serde(default)]
    pub tier: PriorityTier,
    /// Tasks that must complete before this one may run.
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
    /// Optional absolute deadline.
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    /// Duration scaling factor, default 1.0.
    #[serde(default = "default_complexity")]
    pub complexity: f64,
}

fn default_complexity() -> f64 {
    1.0
}

impl TaskSpec {
    pub fn new(task_type: &str) -> Self {
        Self {
            task_type: task_type.to_string(),
            tier: PriorityTier::default(),
            dependencies: Vec::new(),
            deadline: None,
            complexity: 1.0,
        }
    }

    pub fn with_tier(mut self, tier: PriorityTier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_dependencies(mut self, dependencies: Vec<TaskId>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_complexity(mut self, complexity: f64) -> Self {
        self.complexity = complexity;
        self
    }
}

/// Point-in-time view of the scheduler for monitoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerStatus {
    pub running: bool,
    pub last_run: Option<DateTime<Utc>>,
    pub next_run: Option<DateTime<Utc>>,
    pub current_tasks: usize,
    pub max_concurrent_tasks: usize,
    pub queue_length: usize,
    pub resource_pools: PoolSnapshot,
    pub performance: HashMap<String, TypeStats>,
}

/// State mutated by both the admission pass and completion callbacks.
/// Everything here lives behind one lock.
struct Inner {
    table: TaskTable,
    pool: ResourcePool,
    current_tasks: usize,
    recorder: PerformanceRecorder,
    last_run: Option<DateTime<Utc>>,
    next_run: Option<DateTime<Utc>>,
}

/// What the dispatcher observed from the handler.
enum DispatchResult {
    /// Handler produced an outcome (which may itself report failure).
    Outcome(TaskOutcome),
    /// Handler returned an error or panicked.
    HandlerError(String),
}

/// Priority-based task scheduler with resource-constrained admission.
///
/// # Example
///
/// ```ignore
/// use taskwheel::{Scheduler, SchedulerConfig, TaskSpec};
///
/// let scheduler = Scheduler::new(SchedulerConfig::default());
/// let task = scheduler.schedule_task(TaskSpec::new("security_scan")).await?;
/// scheduler.start().await?;
/// ```
#[derive(Clone)]
pub struct Scheduler {
    config: SchedulerConfig,
    profiles: Arc<TypeProfiles>,
    inner: Arc<Mutex<Inner>>,
    registry: Arc<RwLock<HandlerRegistry>>,
    running: Arc<AtomicBool>,
    tick_in_flight: Arc<AtomicBool>,
    cancel: Arc<Mutex<Option<CancellationToken>>>,
}

impl Scheduler {
    /// Create a scheduler with the built-in type profiles.
    pub fn new(config: SchedulerConfig) -> Self {
        Self::with_profiles(config, TypeProfiles::builtin())
    }

    /// Create a scheduler with a custom profile registry.
    pub fn with_profiles(config: SchedulerConfig, profiles: TypeProfiles) -> Self {
        let inner = Inner {
            table: TaskTable::new(),
            pool: ResourcePool::new(),
            current_tasks: 0,
            recorder: PerformanceRecorder::new(config.history_limit),
            last_run: None,
            next_run: None,
        };
        Self {
            config,
            profiles: Arc::new(profiles),
            inner: Arc::new(Mutex::new(inner)),
            registry: Arc::new(RwLock::new(HandlerRegistry::new())),
            running: Arc::new(AtomicBool::new(false)),
            tick_in_flight: Arc::new(AtomicBool::new(false)),
            cancel: Arc::new(Mutex::new(None)),
        }
    }

    /// Register the handler invoked for tasks of the given type.
    pub async fn register_handler(&self, task_type: &str, handler: Arc<dyn TaskHandler>) {
        self.registry.write().await.register(task_type, handler);
    }

    /// Submit a task for scheduling.
    ///
    /// Computes priority, resource requirements, and estimated duration,
    /// resolves the initial status against declared dependencies, and
    /// inserts the task into the priority queue. Returns the fully
    /// populated task record.
    pub async fn schedule_task(&self, spec: TaskSpec) -> Result<Task> {
        if spec.task_type.trim().is_empty() {
            return Err(Error::Validation("task type must not be empty".to_string()));
        }

        let now = Utc::now();
        let requirements = self.profiles.estimate_requirements(&spec.task_type);
        let estimated_duration_ms = self
            .profiles
            .estimate_duration_ms(&spec.task_type, spec.complexity);
        let priority = compute_priority(
            spec.tier,
            spec.deadline,
            self.profiles.weight(&spec.task_type),
            &requirements,
            now,
        );

        let mut task = Task::new(
            &spec.task_type,
            spec.tier,
            priority,
            requirements,
            estimated_duration_ms,
            spec.dependencies,
            spec.deadline,
        );

        let mut inner = self.inner.lock().await;
        if inner.pool.is_infeasible(&task.resource_requirements) {
            // Accepted anyway (best-effort policy), but it can never be
            // admitted, so make the stuck-task risk visible.
            twlog_warn!(
                "task {} ({}) requires more than total pool capacity and will never run",
                task.id.short(),
                task.task_type
            );
        }
        if !task.dependencies.is_empty() && !deps::is_satisfied(&task, &inner.table) {
            task.mark_waiting();
        }
        let stored = inner.table.insert(task);

        twlog!(
            "Task scheduled: {} type={} priority={} status={}",
            stored.id.short(),
            stored.task_type,
            stored.priority,
            stored.status
        );
        Ok(stored)
    }

    /// Read-only view of the queue, priority-sorted, optionally filtered.
    pub async fn task_queue(&self, filter: QueueFilter) -> Vec<Task> {
        self.inner.lock().await.table.filtered(&filter)
    }

    /// Clone of a single task record.
    pub async fn task(&self, id: &TaskId) -> Option<Task> {
        self.inner.lock().await.table.get(id).cloned()
    }

    /// Point-in-time status snapshot.
    pub async fn status(&self) -> SchedulerStatus {
        let inner = self.inner.lock().await;
        SchedulerStatus {
            running: self.running.load(Ordering::SeqCst),
            last_run: inner.last_run,
            next_run: inner.next_run,
            current_tasks: inner.current_tasks,
            max_concurrent_tasks: self.config.max_concurrent_tasks,
            queue_length: inner.table.len(),
            resource_pools: inner.pool.snapshot(),
            performance: inner.recorder.all_stats(),
        }
    }

    /// Whether the tick loop is active.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start the periodic tick loop.
    ///
    /// Queue and pool state are untouched; only tick execution begins.
    pub async fn start(&self) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(Error::AlreadyRunning);
        }

        let token = CancellationToken::new();
        *self.cancel.lock().await = Some(token.clone());
        {
            let mut inner = self.inner.lock().await;
            inner.next_run =
                Some(Utc::now() + chrono::Duration::milliseconds(self.config.tick_interval_ms as i64));
        }

        let scheduler = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(scheduler.config.tick_interval());
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first interval tick completes immediately; consume it so
            // the loop waits a full period before the first admission pass.
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        if let Ok(admitted) = scheduler.run_tick().await {
                            if admitted > 0 {
                                twlog_debug!("tick admitted {} tasks", admitted);
                            }
                        }
                    }
                }
            }
        });

        twlog!("Scheduler started (tick every {}ms)", self.config.tick_interval_ms);
        Ok(())
    }

    /// Stop the tick loop without clearing queue or pool state.
    ///
    /// In-flight task executions are unaffected and still release their
    /// resources on completion.
    pub async fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(token) = self.cancel.lock().await.take() {
            token.cancel();
        }
        self.inner.lock().await.next_run = None;
        twlog!("Scheduler stopped");
    }

    /// Stop and start the tick loop.
    pub async fn restart(&self) -> Result<()> {
        self.stop().await;
        self.start().await?;
        twlog!("Scheduler restarted");
        Ok(())
    }

    /// Run a single admission pass.
    ///
    /// Skips (returning 0) if a previous pass is still executing, so
    /// control-plane scans never overlap. Returns the number of tasks
    /// admitted. Public so embedders and tests can drive admission
    /// deterministically without waiting on the interval.
    pub async fn run_tick(&self) -> Result<usize> {
        if self.tick_in_flight.swap(true, Ordering::SeqCst) {
            twlog_debug!("tick skipped: previous admission pass still running");
            return Ok(0);
        }
        let admitted = self.admission_pass().await;
        self.tick_in_flight.store(false, Ordering::SeqCst);
        Ok(admitted)
    }

    /// The admission scan: iterate admissible candidates in priority
    /// order, admitting while the concurrency cap and every resource
    /// dimension allow.
    async fn admission_pass(&self) -> usize {
        let now = Utc::now();
        let mut inner = self.inner.lock().await;

        let candidates: Vec<TaskId> = inner
            .table
            .candidates()
            .into_iter()
            .filter(|id| match inner.table.get(id) {
                Some(task) => match task.status {
                    TaskStatus::Scheduled => true,
                    TaskStatus::WaitingDependencies => deps::is_satisfied(task, &inner.table),
                    _ => false,
                },
                None => false,
            })
            .collect();

        let mut admitted = 0;
        for id in candidates {
            if inner.current_tasks >= self.config.max_concurrent_tasks {
                break;
            }
            let requirements = match inner.table.get(&id) {
                Some(task) => task.resource_requirements,
                None => continue,
            };
            if !inner.pool.can_allocate(&requirements) {
                continue;
            }

            inner.pool.allocate(&requirements);
            inner.current_tasks += 1;
            let snapshot = match inner.table.get_mut(&id) {
                Some(task) => {
                    task.start();
                    task.clone()
                }
                None => {
                    // Candidate vanished between scans; undo the admission.
                    inner.pool.release(&requirements);
                    inner.current_tasks -= 1;
                    continue;
                }
            };

            twlog!(
                "Task admitted: {} type={} priority={} ({}/{} running)",
                snapshot.id.short(),
                snapshot.task_type,
                snapshot.priority,
                inner.current_tasks,
                self.config.max_concurrent_tasks
            );
            self.spawn_dispatch(snapshot);
            admitted += 1;
        }

        inner.last_run = Some(now);
        inner.next_run =
            Some(now + chrono::Duration::milliseconds(self.config.tick_interval_ms as i64));
        admitted
    }

    /// Run the handler for an admitted task on its own future.
    ///
    /// The tick never waits on this. Whatever the handler does — succeed,
    /// report failure, error, or panic — the completion step releases the
    /// task's resources, decrements the running count, and records the
    /// outcome exactly once.
    fn spawn_dispatch(&self, task: Task) {
        let inner = Arc::clone(&self.inner);
        let registry = Arc::clone(&self.registry);

        tokio::spawn(async move {
            let id = task.id;
            let requirements = task.resource_requirements;
            let handler = registry.read().await.resolve(&task.task_type);

            let started = std::time::Instant::now();
            let run_task = task.clone();
            let joined = tokio::spawn(async move { handler.run(&run_task).await }).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            let result = match joined {
                Ok(Ok(mut outcome)) => {
                    if outcome.execution_time_ms == 0 {
                        outcome.execution_time_ms = elapsed_ms;
                    }
                    DispatchResult::Outcome(outcome)
                }
                Ok(Err(err)) => DispatchResult::HandlerError(err.to_string()),
                Err(join_err) => {
                    DispatchResult::HandlerError(format!("handler panicked: {}", join_err))
                }
            };

            let record_outcome = match &result {
                DispatchResult::Outcome(outcome) => outcome.clone(),
                DispatchResult::HandlerError(message) => {
                    twlog_error!(
                        "Task handler failed: {} type={}: {}",
                        id.short(),
                        task.task_type,
                        message
                    );
                    TaskOutcome::failure(message, elapsed_ms)
                }
            };

            let mut inner = inner.lock().await;
            if let Some(stored) = inner.table.get_mut(&id) {
                match result {
                    DispatchResult::Outcome(outcome) => stored.finish(outcome),
                    DispatchResult::HandlerError(message) => stored.fail(&message),
                }
            }
            inner.pool.release(&requirements);
            inner.current_tasks = inner.current_tasks.saturating_sub(1);
            inner.recorder.record(&task, &record_outcome);

            twlog!(
                "Task finished: {} type={} success={} in {}ms",
                id.short(),
                task.task_type,
                record_outcome.success,
                record_outcome.execution_time_ms
            );
        });
    }
}
