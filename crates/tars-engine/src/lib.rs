//! Assessment engine for TARS.
//!
//! Owns the per-tick loop: activation handshake, contact scan, defense
//! condition evaluation, change detection, event logging, escalation
//! notification, and IFF broadcast. Completely headless; the host drives
//! `AssessmentEngine::tick` on its own cadence.

pub mod engine;
pub mod report;
pub mod scripted;
pub mod systems;

pub use engine::{AssessmentEngine, TickInput};
pub use tars_assess as assess;
pub use tars_core as core;

#[cfg(test)]
mod tests;
