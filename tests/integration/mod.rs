//! Integration test suite for taskwheel.
//!
//! These tests exercise the scheduler end to end: submission, admission
//! ticks, dependency gating, resource saturation, and performance
//! recording. They use deterministic gate-controlled handlers instead of
//! timing-based fakes, so they are safe to run in CI.
//!
//! # Test Categories
//!
//! - `admission`: priority scoring, concurrency cap, tie-break ordering
//! - `dependencies`: dependency gating across ticks
//! - `saturation`: resource pool exhaustion and release

mod fixtures;

mod admission;
mod dependencies;
