//! Strongly typed tuning configuration.
//!
//! Every tunable of the scoring model lives here with a documented default.
//! Values are accepted as given and repaired by [`ThreatConfig::sanitized`],
//! which never fails: out-of-range entries are clamped to the nearest sane value.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::*;
use crate::enums::{DefenseCondition, ScoringMode};
use crate::error::ConfigError;

/// Bounds and shape of one clamped power curve.
///
/// `near` is the full-threat end for range-like quantities (distance, approach)
/// and the no-threat end for speed. The curve exponent biases the shape between.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveBounds {
    pub near: f64,
    pub far: f64,
    pub curve: f64,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl CurveBounds {
    pub const fn new(near: f64, far: f64, curve: f64) -> Self {
        Self {
            near,
            far,
            curve,
            weight: 1.0,
        }
    }

    /// Clamp to `[0, ceiling]`, keep at least `CURVE_MIN_SPAN` between bounds,
    /// and repair non-finite values.
    pub fn sanitized(self, ceiling: f64) -> Self {
        let far = finite_or(self.far, ceiling).clamp(CURVE_MIN_SPAN, ceiling);
        let near = finite_or(self.near, 0.0).clamp(0.0, far - CURVE_MIN_SPAN);
        Self {
            near,
            far,
            curve: sanitize_exponent(self.curve),
            weight: sanitize_weight(self.weight),
        }
    }
}

/// Offense-rating curve: 0 maps to 0, `max` and above map to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OffenseCurve {
    pub max: f64,
    pub curve: f64,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl Default for OffenseCurve {
    fn default() -> Self {
        Self {
            max: OFFENSE_RATING_MAX,
            curve: 1.0,
            weight: 1.0,
        }
    }
}

/// DPS-ratio curve applied to `effective / own optimal`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DpsCurve {
    pub curve: f64,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl Default for DpsCurve {
    fn default() -> Self {
        Self {
            curve: 1.0,
            weight: 1.0,
        }
    }
}

/// The read-only slice of configuration a contact needs to score itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub distance: CurveBounds,
    pub speed: CurveBounds,
    pub approach: CurveBounds,
    pub offense: OffenseCurve,
    pub dps: DpsCurve,
    pub intercept_weight: f64,
    pub mode: ScoringMode,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            distance: CurveBounds::new(DISTANCE_NEAR, DISTANCE_FAR, 1.0),
            speed: CurveBounds::new(SPEED_SLOW, SPEED_FAST, 1.0),
            approach: CurveBounds::new(APPROACH_NEAR, APPROACH_FAR, 1.0),
            offense: OffenseCurve::default(),
            dps: DpsCurve::default(),
            intercept_weight: 1.0,
            mode: ScoringMode::default(),
        }
    }
}

impl ScoringConfig {
    pub fn sanitized(self) -> Self {
        Self {
            distance: self.distance.sanitized(DISTANCE_CEILING),
            speed: self.speed.sanitized(SPEED_CEILING),
            approach: self.approach.sanitized(DISTANCE_CEILING),
            offense: OffenseCurve {
                max: finite_or(self.offense.max, OFFENSE_RATING_MAX)
                    .clamp(CURVE_MIN_SPAN, OFFENSE_RATING_CEILING),
                curve: sanitize_exponent(self.offense.curve),
                weight: sanitize_weight(self.offense.weight),
            },
            dps: DpsCurve {
                curve: sanitize_exponent(self.dps.curve),
                weight: sanitize_weight(self.dps.weight),
            },
            intercept_weight: sanitize_weight(self.intercept_weight),
            mode: self.mode,
        }
    }
}

/// Exclusive lower bounds of the aggregate-score bands, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefconThresholds {
    pub critical: f64,
    pub high: f64,
    pub elevated: f64,
    pub mild: f64,
}

impl Default for DefconThresholds {
    fn default() -> Self {
        Self {
            critical: THRESHOLD_CRITICAL,
            high: THRESHOLD_HIGH,
            elevated: THRESHOLD_ELEVATED,
            mild: THRESHOLD_MILD,
        }
    }
}

impl DefconThresholds {
    /// Force the thresholds to be non-negative and strictly descending.
    pub fn sanitized(self) -> Self {
        let mild = finite_or(self.mild, THRESHOLD_MILD).max(0.0);
        let elevated = finite_or(self.elevated, THRESHOLD_ELEVATED).max(mild + THRESHOLD_MIN_GAP);
        let high = finite_or(self.high, THRESHOLD_HIGH).max(elevated + THRESHOLD_MIN_GAP);
        let critical = finite_or(self.critical, THRESHOLD_CRITICAL).max(high + THRESHOLD_MIN_GAP);
        Self {
            critical,
            high,
            elevated,
            mild,
        }
    }

    /// Lower bound of the band a condition occupies, `None` for the calm band.
    pub fn lower_bound(&self, condition: DefenseCondition) -> Option<f64> {
        match condition {
            DefenseCondition::Critical => Some(self.critical),
            DefenseCondition::High => Some(self.high),
            DefenseCondition::Elevated => Some(self.elevated),
            DefenseCondition::Mild => Some(self.mild),
            DefenseCondition::Calm => None,
        }
    }
}

/// Complete configuration of the assessment loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatConfig {
    pub scoring: ScoringConfig,
    /// Contacts farther than this never enter scoring (meters).
    pub max_detection_distance: f64,
    pub thresholds: DefconThresholds,
    /// Score margin the aggregate must clear below a band's bound before relaxing out of it.
    pub hysteresis: f64,
    /// Minimum cumulative-damage increase that triggers the hull-damage override.
    pub damage_epsilon: f64,
    pub log_capacity: usize,
    pub broadcast_channel: String,
}

impl Default for ThreatConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            max_detection_distance: MAX_DETECTION_DISTANCE,
            thresholds: DefconThresholds::default(),
            hysteresis: 0.0,
            damage_epsilon: DAMAGE_EPSILON,
            log_capacity: EVENT_LOG_CAPACITY,
            broadcast_channel: IFF_CHANNEL.to_string(),
        }
    }
}

impl ThreatConfig {
    /// Parse a (possibly partial) JSON configuration. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Return a copy with every tunable clamped into its sane range.
    pub fn sanitized(&self) -> Self {
        let sanitized = Self {
            scoring: self.scoring.sanitized(),
            max_detection_distance: finite_or(self.max_detection_distance, MAX_DETECTION_DISTANCE)
                .clamp(0.0, MAX_DETECTION_DISTANCE),
            thresholds: self.thresholds.sanitized(),
            hysteresis: finite_or(self.hysteresis, 0.0).clamp(0.0, HYSTERESIS_MAX),
            damage_epsilon: finite_or(self.damage_epsilon, DAMAGE_EPSILON).max(0.0),
            log_capacity: self.log_capacity.clamp(1, EVENT_LOG_CAPACITY),
            broadcast_channel: if self.broadcast_channel.is_empty() {
                IFF_CHANNEL.to_string()
            } else {
                self.broadcast_channel.clone()
            },
        };
        if sanitized != *self {
            debug!("threat config adjusted into sane ranges");
        }
        sanitized
    }
}

fn default_weight() -> f64 {
    1.0
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

fn sanitize_exponent(curve: f64) -> f64 {
    if curve.is_finite() && curve > 0.0 {
        curve.clamp(CURVE_EXPONENT_MIN, CURVE_EXPONENT_MAX)
    } else {
        1.0
    }
}

fn sanitize_weight(weight: f64) -> f64 {
    finite_or(weight, 1.0).clamp(0.0, WEIGHT_MAX)
}
