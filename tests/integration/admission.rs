//! Admission ordering, priority scoring, and concurrency cap tests.

use std::sync::Arc;
use taskwheel::{PriorityTier, QueueFilter, TaskSpec, TaskStatus};
use tokio::sync::Notify;

use crate::fixtures::{gated_handler, instant_handler, test_scheduler, wait_finished};

/// Scenario: a security scan with no deadline and default tier.
/// Given maxConcurrentTasks = 20 and an empty pool
/// When the task is submitted
/// Then priority = tier(5) + type weight(15) + resource score(5) and the
/// requirements follow the security_scan profile.
#[tokio::test]
async fn test_security_scan_priority_and_requirements() {
    let scheduler = test_scheduler(20);
    let task = scheduler
        .schedule_task(TaskSpec::new("security_scan"))
        .await
        .unwrap();

    assert_eq!(task.priority, 25);
    assert!((1..=100).contains(&task.priority));
    assert_eq!(task.resource_requirements.cpu, 20);
    assert_eq!(task.resource_requirements.memory, 15);
    assert_eq!(task.resource_requirements.network, 5);
    assert_eq!(task.resource_requirements.storage, 6);
    assert!(task.resource_requirements.cpu <= 100);
}

/// Every computed priority and requirement stays in its documented range
/// across tiers and types, including unknown types.
#[tokio::test]
async fn test_priority_and_requirements_bounds() {
    let scheduler = test_scheduler(20);
    let tiers = [
        PriorityTier::Critical,
        PriorityTier::High,
        PriorityTier::Medium,
        PriorityTier::Low,
        PriorityTier::Background,
    ];
    let types = [
        "security_scan",
        "backup",
        "monitoring",
        "analytics",
        "cleanup",
        "reporting",
        "maintenance",
        "never_registered",
    ];

    for tier in tiers {
        for task_type in types {
            let task = scheduler
                .schedule_task(TaskSpec::new(task_type).with_tier(tier))
                .await
                .unwrap();
            assert!(
                (1..=100).contains(&task.priority),
                "priority {} out of range for {} {:?}",
                task.priority,
                task_type,
                tier
            );
            for value in [
                task.resource_requirements.cpu,
                task.resource_requirements.memory,
                task.resource_requirements.network,
                task.resource_requirements.storage,
            ] {
                assert!(value <= 100);
            }
        }
    }
}

/// Scenario D: with maxConcurrentTasks = 1 and two feasible tasks of
/// different priority, only the higher-priority one is admitted per tick;
/// the second runs only after the first completes.
#[tokio::test]
async fn test_single_slot_admits_by_priority() {
    let scheduler = test_scheduler(1);
    let gate = Arc::new(Notify::new());
    scheduler
        .register_handler("cleanup", gated_handler(Arc::clone(&gate)))
        .await;
    scheduler
        .register_handler("security_scan", gated_handler(Arc::clone(&gate)))
        .await;

    let low = scheduler
        .schedule_task(TaskSpec::new("cleanup"))
        .await
        .unwrap();
    let high = scheduler
        .schedule_task(TaskSpec::new("security_scan"))
        .await
        .unwrap();
    assert!(high.priority > low.priority);

    let admitted = scheduler.run_tick().await.unwrap();
    assert_eq!(admitted, 1);
    assert_eq!(
        scheduler.task(&high.id).await.unwrap().status,
        TaskStatus::Running
    );
    assert_eq!(
        scheduler.task(&low.id).await.unwrap().status,
        TaskStatus::Scheduled
    );

    // Cap is saturated: another tick admits nothing
    assert_eq!(scheduler.run_tick().await.unwrap(), 0);
    assert_eq!(scheduler.status().await.current_tasks, 1);

    gate.notify_one();
    wait_finished(&scheduler, &high.id).await;
    assert_eq!(scheduler.status().await.current_tasks, 0);

    let admitted = scheduler.run_tick().await.unwrap();
    assert_eq!(admitted, 1);
    gate.notify_one();
    wait_finished(&scheduler, &low.id).await;
}

/// Tie-break: equal priorities are admitted in submission order in every
/// tick where both are candidates.
#[tokio::test]
async fn test_equal_priority_tie_break_is_submission_order() {
    let scheduler = test_scheduler(1);
    let gate = Arc::new(Notify::new());
    scheduler
        .register_handler("backup", gated_handler(Arc::clone(&gate)))
        .await;

    let first = scheduler
        .schedule_task(TaskSpec::new("backup"))
        .await
        .unwrap();
    let second = scheduler
        .schedule_task(TaskSpec::new("backup"))
        .await
        .unwrap();
    assert_eq!(first.priority, second.priority);

    scheduler.run_tick().await.unwrap();
    assert_eq!(
        scheduler.task(&first.id).await.unwrap().status,
        TaskStatus::Running
    );
    assert_eq!(
        scheduler.task(&second.id).await.unwrap().status,
        TaskStatus::Scheduled
    );

    gate.notify_one();
    wait_finished(&scheduler, &first.id).await;
    scheduler.run_tick().await.unwrap();
    gate.notify_one();
    wait_finished(&scheduler, &second.id).await;

    let first_done = scheduler.task(&first.id).await.unwrap();
    let second_done = scheduler.task(&second.id).await.unwrap();
    assert!(first_done.started_at.unwrap() <= second_done.started_at.unwrap());
}

/// The concurrency cap holds even with many feasible light tasks.
#[tokio::test]
async fn test_cap_limits_admissions_per_tick() {
    let scheduler = test_scheduler(3);
    let gate = Arc::new(Notify::new());
    scheduler
        .register_handler("monitoring", gated_handler(Arc::clone(&gate)))
        .await;

    let mut ids = Vec::new();
    for _ in 0..6 {
        let task = scheduler
            .schedule_task(TaskSpec::new("monitoring"))
            .await
            .unwrap();
        ids.push(task.id);
    }

    let admitted = scheduler.run_tick().await.unwrap();
    assert_eq!(admitted, 3);
    let status = scheduler.status().await;
    assert_eq!(status.current_tasks, 3);
    assert!(status.current_tasks <= status.max_concurrent_tasks);

    let running = scheduler
        .task_queue(QueueFilter {
            status: Some(TaskStatus::Running),
            ..Default::default()
        })
        .await;
    assert_eq!(running.len(), 3);

    for _ in 0..6 {
        gate.notify_one();
    }
    for id in &ids[..3] {
        wait_finished(&scheduler, id).await;
    }
}

/// Performance stats accumulate per type as tasks finish.
#[tokio::test]
async fn test_performance_history_accumulates() {
    let scheduler = test_scheduler(20);
    scheduler
        .register_handler("reporting", instant_handler())
        .await;

    let mut ids = Vec::new();
    for _ in 0..3 {
        let task = scheduler
            .schedule_task(TaskSpec::new("reporting"))
            .await
            .unwrap();
        ids.push(task.id);
    }
    scheduler.run_tick().await.unwrap();
    for id in &ids {
        wait_finished(&scheduler, id).await;
    }

    let status = scheduler.status().await;
    let stats = &status.performance["reporting"];
    assert_eq!(stats.count, 3);
    assert!((stats.success_rate - 1.0).abs() < f64::EPSILON);
    assert!(stats.last_execution.is_some());
}
