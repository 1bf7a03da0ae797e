//! Stages of one assessment tick.
//!
//! Each stage is a plain function or a small state holder operating on the
//! tick's freshly built contact set. Only the engine carries state between ticks.

pub mod broadcast;
pub mod defcon;
pub mod display;
pub mod event_log;
pub mod fingerprint;
pub mod notify;
pub mod scan;
