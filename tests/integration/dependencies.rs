//! Dependency gating across ticks.

use std::sync::Arc;
use taskwheel::{TaskId, TaskSpec, TaskStatus};
use tokio::sync::Notify;

use crate::fixtures::{gated_handler, instant_handler, test_scheduler, wait_finished};

/// Scenario B: T2 depends on T1. No tick may admit T2 before T1
/// completes; once T1 is completed, the next tick runs T2.
#[tokio::test]
async fn test_dependent_task_waits_for_completion() {
    let scheduler = test_scheduler(20);
    let gate = Arc::new(Notify::new());
    scheduler
        .register_handler("backup", gated_handler(Arc::clone(&gate)))
        .await;
    scheduler
        .register_handler("cleanup", instant_handler())
        .await;

    let t1 = scheduler
        .schedule_task(TaskSpec::new("backup"))
        .await
        .unwrap();
    let t2 = scheduler
        .schedule_task(TaskSpec::new("cleanup").with_dependencies(vec![t1.id]))
        .await
        .unwrap();
    assert_eq!(t2.status, TaskStatus::WaitingDependencies);

    // T1 is admitted and runs; several ticks pass while it holds the gate
    scheduler.run_tick().await.unwrap();
    for _ in 0..3 {
        scheduler.run_tick().await.unwrap();
        assert_eq!(
            scheduler.task(&t2.id).await.unwrap().status,
            TaskStatus::WaitingDependencies,
            "T2 must never be admitted while T1 is incomplete"
        );
    }

    gate.notify_one();
    wait_finished(&scheduler, &t1.id).await;
    assert_eq!(
        scheduler.task(&t1.id).await.unwrap().status,
        TaskStatus::Completed
    );

    scheduler.run_tick().await.unwrap();
    wait_finished(&scheduler, &t2.id).await;
    assert_eq!(
        scheduler.task(&t2.id).await.unwrap().status,
        TaskStatus::Completed
    );
}

/// A failed dependency never satisfies its dependents.
#[tokio::test]
async fn test_failed_dependency_keeps_dependent_waiting() {
    let scheduler = test_scheduler(20);
    scheduler
        .register_handler(
            "backup",
            taskwheel::handler_fn(|_task| {
                Box::pin(async {
                    Ok(taskwheel::TaskOutcome::failure("volume offline", 1))
                })
            }),
        )
        .await;

    let t1 = scheduler
        .schedule_task(TaskSpec::new("backup"))
        .await
        .unwrap();
    let t2 = scheduler
        .schedule_task(TaskSpec::new("cleanup").with_dependencies(vec![t1.id]))
        .await
        .unwrap();

    scheduler.run_tick().await.unwrap();
    wait_finished(&scheduler, &t1.id).await;
    assert!(matches!(
        scheduler.task(&t1.id).await.unwrap().status,
        TaskStatus::Failed { .. }
    ));

    for _ in 0..3 {
        scheduler.run_tick().await.unwrap();
    }
    assert_eq!(
        scheduler.task(&t2.id).await.unwrap().status,
        TaskStatus::WaitingDependencies
    );
}

/// A dependency id that maps to no known task fails closed: the dependent
/// stays in waiting_dependencies indefinitely.
#[tokio::test]
async fn test_unknown_dependency_fails_closed() {
    let scheduler = test_scheduler(20);
    let task = scheduler
        .schedule_task(TaskSpec::new("cleanup").with_dependencies(vec![TaskId::new()]))
        .await
        .unwrap();
    assert_eq!(task.status, TaskStatus::WaitingDependencies);

    for _ in 0..3 {
        scheduler.run_tick().await.unwrap();
        assert_eq!(
            scheduler.task(&task.id).await.unwrap().status,
            TaskStatus::WaitingDependencies
        );
    }
}

/// A chain A → B → C completes strictly in order.
#[tokio::test]
async fn test_dependency_chain_runs_in_order() {
    let scheduler = test_scheduler(20);
    scheduler
        .register_handler("monitoring", instant_handler())
        .await;

    let a = scheduler
        .schedule_task(TaskSpec::new("monitoring"))
        .await
        .unwrap();
    let b = scheduler
        .schedule_task(TaskSpec::new("monitoring").with_dependencies(vec![a.id]))
        .await
        .unwrap();
    let c = scheduler
        .schedule_task(TaskSpec::new("monitoring").with_dependencies(vec![b.id]))
        .await
        .unwrap();

    for id in [a.id, b.id, c.id] {
        scheduler.run_tick().await.unwrap();
        wait_finished(&scheduler, &id).await;
    }

    let a_done = scheduler.task(&a.id).await.unwrap();
    let b_done = scheduler.task(&b.id).await.unwrap();
    let c_done = scheduler.task(&c.id).await.unwrap();
    assert!(a_done.completed_at.unwrap() <= b_done.started_at.unwrap());
    assert!(b_done.completed_at.unwrap() <= c_done.started_at.unwrap());
}
