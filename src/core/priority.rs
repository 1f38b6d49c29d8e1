//! Priority scoring.
//!
//! A task's priority is a single integer in 1..=100 combining the declared
//! urgency tier, deadline pressure, type importance, and resource
//! parsimony. The caller supplies `now` so deadline scoring stays
//! deterministic under test.

use crate::core::resources::ResourceVector;
use crate::core::task::PriorityTier;
use chrono::{DateTime, Utc};

/// Additional score for tasks approaching their deadline.
///
/// Past-due deadlines score as the most urgent bucket.
pub fn deadline_bonus(deadline: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let hours_remaining = (deadline - now).num_seconds() as f64 / 3600.0;
    if hours_remaining < 1.0 {
        20
    } else if hours_remaining < 6.0 {
        15
    } else if hours_remaining < 24.0 {
        10
    } else if hours_remaining < 72.0 {
        5
    } else {
        0
    }
}

/// Score favoring tasks that request less of the shared budget.
///
/// `(100 - total requirements) / 10`, clamped to 0..=10.
pub fn resource_score(requirements: &ResourceVector) -> i64 {
    let remaining = 100 - requirements.total() as i64;
    (remaining / 10).clamp(0, 10)
}

/// Compute the admission priority for a task.
///
/// Pure and deterministic given its inputs; the wall-clock deadline
/// comparison is the only time-dependent term.
pub fn compute_priority(
    tier: PriorityTier,
    deadline: Option<DateTime<Utc>>,
    type_weight: i64,
    requirements: &ResourceVector,
    now: DateTime<Utc>,
) -> u8 {
    let mut priority = tier.weight();
    if let Some(deadline) = deadline {
        priority += deadline_bonus(deadline, now);
    }
    priority += type_weight;
    priority += resource_score(requirements);
    priority.clamp(1, 100) as u8
}
