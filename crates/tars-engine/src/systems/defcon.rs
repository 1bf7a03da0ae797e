//! Defense-condition evaluation.
//!
//! The condition is a pure function of three per-tick inputs: the capacity
//! sample, the cumulative hull damage sample, and the aggregate threat level.
//! Either override forces `Critical`. Otherwise the aggregate is banded by
//! exclusive lower bounds tested most-severe-first. The only use of the
//! previous condition is the optional hysteresis margin when relaxing.

use serde::{Deserialize, Serialize};
use tracing::warn;

use tars_core::config::{DefconThresholds, ThreatConfig};
use tars_core::enums::DefenseCondition;

/// Monitor readings taken once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorSamples {
    /// Integer defensive capacity, `None` when no capacity monitor is attached.
    pub capacity: Option<i64>,
    pub damage: f64,
}

/// Why an override forced the most severe condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OverrideReason {
    /// Defensive capacity strictly decreased since the last sample.
    CapacityLoss { was: i64, now: i64 },
    /// Cumulative hull damage rose by more than the configured epsilon.
    HullDamage { delta: f64 },
}

/// Outcome of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefconDecision {
    pub condition: DefenseCondition,
    pub override_reason: Option<OverrideReason>,
}

/// Monitor samples carried between ticks.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefconTracker {
    last_capacity: Option<i64>,
    last_damage: Option<f64>,
}

impl DefconTracker {
    /// Evaluate without mutating; call [`DefconTracker::commit`] once the tick completes.
    pub fn assess(
        &self,
        samples: &MonitorSamples,
        aggregate: f64,
        config: &ThreatConfig,
        previous: Option<DefenseCondition>,
    ) -> DefconDecision {
        if let Some(reason) = self.check_overrides(samples, config) {
            warn!(?reason, "override forcing most severe condition");
            return DefconDecision {
                condition: DefenseCondition::Critical,
                override_reason: Some(reason),
            };
        }

        let raw = band_for(aggregate, &config.thresholds);
        let condition = match previous {
            Some(prev) => apply_hysteresis(raw, prev, aggregate, &config.thresholds, config.hysteresis),
            None => raw,
        };
        DefconDecision {
            condition,
            override_reason: None,
        }
    }

    fn check_overrides(&self, samples: &MonitorSamples, config: &ThreatConfig) -> Option<OverrideReason> {
        if let (Some(was), Some(now)) = (self.last_capacity, samples.capacity) {
            if now < was {
                return Some(OverrideReason::CapacityLoss { was, now });
            }
        }

        if let Some(last) = self.last_damage {
            let delta = samples.damage - last;
            if delta > config.damage_epsilon {
                return Some(OverrideReason::HullDamage { delta });
            }
        }

        None
    }

    /// Record this tick's samples as the baseline for the next.
    pub fn commit(&mut self, samples: &MonitorSamples) {
        if samples.capacity.is_some() {
            self.last_capacity = samples.capacity;
        }
        if samples.damage.is_finite() {
            self.last_damage = Some(samples.damage);
        }
    }

    pub fn last_capacity(&self) -> Option<i64> {
        self.last_capacity
    }

    pub fn last_damage(&self) -> Option<f64> {
        self.last_damage
    }
}

/// Map an aggregate threat level to its band. A value exactly on a bound
/// falls into the calmer band.
pub fn band_for(aggregate: f64, thresholds: &DefconThresholds) -> DefenseCondition {
    if aggregate > thresholds.critical {
        DefenseCondition::Critical
    } else if aggregate > thresholds.high {
        DefenseCondition::High
    } else if aggregate > thresholds.elevated {
        DefenseCondition::Elevated
    } else if aggregate > thresholds.mild {
        DefenseCondition::Mild
    } else {
        DefenseCondition::Calm
    }
}

/// Hold a more severe previous condition while the aggregate stays within
/// `margin` of that band's lower bound. Escalation is never delayed.
pub fn apply_hysteresis(
    raw: DefenseCondition,
    previous: DefenseCondition,
    aggregate: f64,
    thresholds: &DefconThresholds,
    margin: f64,
) -> DefenseCondition {
    if margin <= 0.0 || !previous.is_more_severe_than(raw) {
        return raw;
    }
    DefenseCondition::ALL
        .into_iter()
        .filter(|c| *c >= previous && *c < raw)
        .find(|c| {
            thresholds
                .lower_bound(*c)
                .is_some_and(|bound| aggregate > bound - margin)
        })
        .unwrap_or(raw)
}
