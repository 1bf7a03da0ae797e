//! Per-tick assessment result handed back to the host.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tars_assess::threat::Threat;
use tars_core::enums::DefenseCondition;

use crate::systems::defcon::OverrideReason;

/// How far a tick got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickStatus {
    /// Full assessment ran and was committed.
    Assessed,
    /// The threat-detection source is not active; nothing was assessed.
    Degraded,
    /// The source failed mid-tick; partial results were discarded.
    Abandoned,
}

/// Everything the host needs to display and act on one tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub timestamp: DateTime<Utc>,
    pub status: TickStatus,
    pub condition: DefenseCondition,
    /// Sum of every surviving contact's aggregate score.
    pub aggregate: f64,
    pub override_reason: Option<OverrideReason>,
    /// Surviving contacts, ordered by entity id.
    pub contacts: Vec<Threat>,
    /// Whether this tick appended an event record.
    pub logged: bool,
    pub broadcasts: usize,
    pub weapons_registered: usize,
}

impl TickReport {
    /// Calm, empty report for a tick that did not assess anything.
    pub fn idle(tick: u64, timestamp: DateTime<Utc>, status: TickStatus, weapons: usize) -> Self {
        Self {
            tick,
            timestamp,
            status,
            condition: DefenseCondition::Calm,
            aggregate: 0.0,
            override_reason: None,
            contacts: Vec::new(),
            logged: false,
            broadcasts: 0,
            weapons_registered: weapons,
        }
    }

    pub fn is_assessed(&self) -> bool {
        self.status == TickStatus::Assessed
    }
}
