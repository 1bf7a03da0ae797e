//! Event-log records and escalation notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::DefenseCondition;
use crate::types::EntityId;

/// One contact as captured in an event record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedContact {
    pub id: EntityId,
    pub name: String,
    pub score: f64,
    /// Range from the observer at the time of the record (meters).
    pub distance: f64,
    pub offense_rating: f64,
}

impl LoggedContact {
    /// One-line summary: `name :: score (distance m, rating o/r)`.
    pub fn summary(&self) -> String {
        format!(
            "{} :: {:.3} ({:.0}m, {:.3} o/r)",
            self.name, self.score, self.distance, self.offense_rating
        )
    }
}

/// A material change in posture or contact set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub timestamp: DateTime<Utc>,
    pub condition: DefenseCondition,
    /// Aggregate threat level at the time of the record.
    pub score: f64,
    pub contacts: Vec<LoggedContact>,
}

impl EventRecord {
    /// Header line: `<timestamp>: >>> LEVEL <n> (<score>) <<<`.
    pub fn header_line(&self) -> String {
        format!(
            "{}: >>> {} ({:.3}) <<<",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.condition,
            self.score
        )
    }
}

/// Notification delivered to each downstream listener when a record is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationNotice {
    pub condition: DefenseCondition,
    /// Opaque `LEVEL_<n>` token.
    pub token: String,
}

impl EscalationNotice {
    pub fn new(condition: DefenseCondition) -> Self {
        Self {
            condition,
            token: condition.token(),
        }
    }
}
