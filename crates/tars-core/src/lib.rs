//! Core types and definitions for the TARS threat assessment system.
//!
//! This crate defines the vocabulary shared across all other crates:
//! contact snapshots, defense conditions, configuration, event records,
//! broadcast payloads, and constants. It has no dependency on any host
//! environment or runtime framework.

pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod types;
