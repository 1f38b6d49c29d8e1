//! Core data model and pure scheduling calculators.
//!
//! Everything here is synchronous and free of shared state: the task
//! model, resource vectors and pool arithmetic, per-type profiles, and
//! priority scoring. The async coordination lives in `crate::scheduler`.

pub mod priority;
pub mod profile;
pub mod resources;
pub mod task;
