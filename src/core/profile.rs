//! Per-type scheduling profiles.
//!
//! A profile bundles everything the scheduler knows about a task type: its
//! importance weight for priority scoring, its resource cost multipliers,
//! and its base execution duration. Profiles are immutable data registered
//! at startup, so new task types are data additions, not code additions.
//! Unknown types fall back to a neutral profile.

use crate::core::resources::ResourceVector;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Baseline resource cost before the per-type multiplier, in percent.
const BASE_CPU: f64 = 10.0;
const BASE_MEMORY: f64 = 10.0;
const BASE_NETWORK: f64 = 5.0;
const BASE_STORAGE: f64 = 5.0;

/// Base duration for types without a profile: one minute.
const DEFAULT_DURATION_MS: u64 = 60_000;

/// Importance weight for types without a profile.
const DEFAULT_WEIGHT: i64 = 5;

/// Per-dimension multipliers applied to the baseline resource cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Multipliers {
    pub cpu: f64,
    pub memory: f64,
    pub network: f64,
    pub storage: f64,
}

impl Multipliers {
    pub fn new(cpu: f64, memory: f64, network: f64, storage: f64) -> Self {
        Self {
            cpu,
            memory,
            network,
            storage,
        }
    }

    /// Neutral multipliers: baseline cost unchanged.
    pub fn neutral() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }
}

/// Everything the scheduler knows about one task type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TypeProfile {
    /// Contribution to the computed priority score.
    pub weight: i64,
    /// Resource cost multipliers over the baseline.
    pub multipliers: Multipliers,
    /// Base execution duration in milliseconds, before complexity scaling.
    pub base_duration_ms: u64,
}

impl TypeProfile {
    pub fn new(weight: i64, multipliers: Multipliers, base_duration_ms: u64) -> Self {
        Self {
            weight,
            multipliers,
            base_duration_ms,
        }
    }

    /// Fallback profile for unknown task types.
    pub fn neutral() -> Self {
        Self::new(DEFAULT_WEIGHT, Multipliers::neutral(), DEFAULT_DURATION_MS)
    }
}

/// Registry of type profiles with a neutral fallback.
#[derive(Debug, Clone)]
pub struct TypeProfiles {
    profiles: HashMap<String, TypeProfile>,
    fallback: TypeProfile,
}

impl Default for TypeProfiles {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TypeProfiles {
    /// Registry with no registered types; everything uses the fallback.
    pub fn empty() -> Self {
        Self {
            profiles: HashMap::new(),
            fallback: TypeProfile::neutral(),
        }
    }

    /// Registry pre-populated with the built-in operations task types.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(
            "security_scan",
            TypeProfile::new(15, Multipliers::new(2.0, 1.5, 1.0, 1.2), 300_000),
        );
        registry.register(
            "backup",
            TypeProfile::new(12, Multipliers::new(1.0, 1.0, 2.0, 3.0), 600_000),
        );
        registry.register(
            "monitoring",
            TypeProfile::new(10, Multipliers::new(0.5, 0.5, 0.5, 0.5), 30_000),
        );
        registry.register(
            "analytics",
            TypeProfile::new(8, Multipliers::new(1.5, 2.0, 1.0, 1.5), 180_000),
        );
        registry.register(
            "cleanup",
            TypeProfile::new(6, Multipliers::new(0.8, 0.8, 0.5, 1.0), 120_000),
        );
        registry.register(
            "reporting",
            TypeProfile::new(4, Multipliers::new(1.2, 1.2, 0.8, 1.0), 90_000),
        );
        registry.register(
            "maintenance",
            TypeProfile::new(3, Multipliers::new(1.0, 1.0, 0.5, 0.8), 240_000),
        );
        registry
    }

    /// Register or replace the profile for a task type.
    pub fn register(&mut self, task_type: &str, profile: TypeProfile) {
        self.profiles.insert(task_type.to_string(), profile);
    }

    /// Profile for a task type, or the neutral fallback.
    pub fn get(&self, task_type: &str) -> &TypeProfile {
        self.profiles.get(task_type).unwrap_or(&self.fallback)
    }

    /// Priority weight for a task type.
    pub fn weight(&self, task_type: &str) -> i64 {
        self.get(task_type).weight
    }

    /// Estimated resource cost for a task type.
    ///
    /// Baseline cost per dimension times the type multiplier, rounded and
    /// clamped to 0..=100.
    pub fn estimate_requirements(&self, task_type: &str) -> ResourceVector {
        let m = self.get(task_type).multipliers;
        ResourceVector::new(
            (BASE_CPU * m.cpu).round() as u32,
            (BASE_MEMORY * m.memory).round() as u32,
            (BASE_NETWORK * m.network).round() as u32,
            (BASE_STORAGE * m.storage).round() as u32,
        )
    }

    /// Estimated execution duration for a task type, scaled by complexity.
    pub fn estimate_duration_ms(&self, task_type: &str, complexity: f64) -> u64 {
        let base = self.get(task_type).base_duration_ms as f64;
        (base * complexity).round() as u64
    }
}
