//! Threat scoring model for TARS.
//!
//! Implements the clamped factor curves, the per-contact scoring model,
//! the weapon capability abstraction, the interfaces consumed from the
//! host (threat detection, capacity and damage monitors), and IFF encoding.

pub mod context;
pub mod curve;
pub mod iff;
pub mod source;
pub mod threat;
pub mod weapon;

pub use tars_core as core;
