//! Per-contact scoring model.
//!
//! A `Threat` owns one contact snapshot, its raw offense rating, and the
//! observer position by value. Every factor is derived on access; nothing
//! is cached, so a `Threat` is always consistent with its inputs.
//!
//! Closest approach assumes linear, non-accelerating motion along the
//! current velocity for the whole projection horizon. That is a known
//! approximation of the model, not a defect.

use std::fmt::Write as _;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use tars_core::config::ScoringConfig;
use tars_core::enums::{ContactKind, InterceptBearing, Relationship, ScoringMode};
use tars_core::events::LoggedContact;
use tars_core::types::{ContactSnapshot, EntityId};

use crate::curve;
use crate::weapon::{weapons_targeting, Weapon};

/// Individual terms of a contact's aggregate score.
///
/// A term is `None` when its input is undefined for this contact; undefined
/// terms are omitted from the total rather than counted as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub speed: Option<f64>,
    pub distance: Option<f64>,
    pub approach: Option<f64>,
    /// Intercept factor remapped from [-1, 1] to [0, 1].
    pub intercept: Option<f64>,
    /// Offense-rating or DPS-ratio term, depending on the scoring mode.
    pub capability: Option<f64>,
    pub total: f64,
}

/// One scored contact for the current tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threat {
    snapshot: ContactSnapshot,
    offense_rating: f64,
    observer: DVec3,
    effective_dps: f64,
    own_optimal_dps: f64,
    config: ScoringConfig,
}

impl Threat {
    /// The scoring configuration is sanitized here, so any `ScoringConfig`
    /// yields factors in range.
    pub fn new(
        snapshot: ContactSnapshot,
        offense_rating: f64,
        observer: DVec3,
        config: ScoringConfig,
    ) -> Self {
        Self {
            snapshot,
            offense_rating,
            observer,
            effective_dps: 0.0,
            own_optimal_dps: 0.0,
            config: config.sanitized(),
        }
    }

    /// Attach the DPS readings used by the DPS-ratio term and the noise filter.
    pub fn with_dps(mut self, effective_dps: f64, own_optimal_dps: f64) -> Self {
        self.effective_dps = effective_dps;
        self.own_optimal_dps = own_optimal_dps;
        self
    }

    pub fn snapshot(&self) -> &ContactSnapshot {
        &self.snapshot
    }

    pub fn id(&self) -> EntityId {
        self.snapshot.id
    }

    pub fn name(&self) -> &str {
        &self.snapshot.name
    }

    pub fn relationship(&self) -> Relationship {
        self.snapshot.relationship
    }

    pub fn kind(&self) -> ContactKind {
        self.snapshot.kind
    }

    pub fn position(&self) -> DVec3 {
        self.snapshot.position
    }

    pub fn velocity(&self) -> DVec3 {
        self.snapshot.velocity
    }

    pub fn observer(&self) -> DVec3 {
        self.observer
    }

    pub fn offense_rating(&self) -> f64 {
        self.offense_rating
    }

    pub fn effective_dps(&self) -> f64 {
        self.effective_dps
    }

    pub fn own_optimal_dps(&self) -> f64 {
        self.own_optimal_dps
    }

    /// A contact with neither offensive output nor a rating cannot contribute.
    pub fn is_noise(&self) -> bool {
        self.effective_dps == 0.0 && self.offense_rating == 0.0
    }

    /// Range from the observer (meters).
    pub fn distance(&self) -> f64 {
        self.snapshot.position.distance(self.observer)
    }

    /// Speed magnitude (m/s).
    pub fn speed(&self) -> f64 {
        self.snapshot.velocity.length()
    }

    fn is_moving(&self) -> bool {
        let speed = self.speed();
        speed.is_finite() && speed > 0.0
    }

    /// Cosine between the velocity direction and the direction toward the observer.
    ///
    /// Closing contacts score positive, diverging negative. Exactly 0.0 when the
    /// velocity (or the direction to the observer) is degenerate.
    pub fn intercept_factor(&self) -> f64 {
        if !self.is_moving() {
            return 0.0;
        }
        let heading = self.snapshot.velocity.normalize_or_zero();
        let to_observer = (self.observer - self.snapshot.position).normalize_or_zero();
        let f = heading.dot(to_observer);
        if f.is_finite() {
            f.clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }

    /// Named trajectory classification for display.
    pub fn intercept_bearing(&self) -> InterceptBearing {
        InterceptBearing::classify(self.speed(), self.intercept_factor())
    }

    /// Point on the current velocity line nearest the observer.
    pub fn intercept_point(&self) -> Option<DVec3> {
        if !self.is_moving() {
            return None;
        }
        let heading = self.snapshot.velocity.normalize_or_zero();
        let point =
            self.snapshot.position + heading * self.distance() * self.intercept_factor();
        point.is_finite().then_some(point)
    }

    /// Predicted distance between the observer and the contact at closest approach.
    pub fn closest_approach(&self) -> Option<f64> {
        self.intercept_point()
            .map(|p| p.distance(self.observer))
            .filter(|d| d.is_finite())
    }

    pub fn distance_factor(&self) -> f64 {
        curve::falling(self.distance(), &self.config.distance)
    }

    pub fn speed_factor(&self) -> f64 {
        curve::rising(self.speed(), &self.config.speed)
    }

    /// `None` when the contact has no projected closest approach.
    pub fn approach_factor(&self) -> Option<f64> {
        self.closest_approach()
            .map(|d| curve::falling(d, &self.config.approach))
    }

    pub fn offense_factor(&self) -> f64 {
        let offense = &self.config.offense;
        curve::ratio(self.offense_rating, offense.max, offense.curve)
    }

    /// Effective DPS relative to our own optimal DPS, `None` if our own is unknown.
    pub fn dps_factor(&self) -> Option<f64> {
        if !(self.own_optimal_dps.is_finite() && self.own_optimal_dps > 0.0) {
            return None;
        }
        Some(curve::ratio(
            self.effective_dps,
            self.own_optimal_dps,
            self.config.dps.curve,
        ))
    }

    /// All terms of the aggregate score.
    pub fn breakdown(&self) -> ScoreBreakdown {
        let cfg = &self.config;
        let moving = self.is_moving();
        let distance = self.distance();

        let speed = moving.then(|| self.speed_factor() * cfg.speed.weight);
        let distance =
            (distance > 0.0).then(|| self.distance_factor() * cfg.distance.weight);
        let approach = self.approach_factor().map(|f| f * cfg.approach.weight);
        let intercept =
            moving.then(|| (self.intercept_factor() + 1.0) / 2.0 * cfg.intercept_weight);
        let capability = match cfg.mode {
            ScoringMode::OffenseRating => Some(self.offense_factor() * cfg.offense.weight),
            ScoringMode::DpsRatio => self.dps_factor().map(|f| f * cfg.dps.weight),
        };

        let total = [speed, distance, approach, intercept, capability]
            .into_iter()
            .flatten()
            .sum();

        ScoreBreakdown {
            speed,
            distance,
            approach,
            intercept,
            capability,
            total,
        }
    }

    /// Sum of every defined factor term.
    pub fn aggregate_score(&self) -> f64 {
        self.breakdown().total
    }

    /// Snapshot of this contact for the event log.
    pub fn to_logged(&self) -> LoggedContact {
        LoggedContact {
            id: self.id(),
            name: self.snapshot.name.clone(),
            score: self.aggregate_score(),
            distance: self.distance(),
            offense_rating: self.offense_rating,
        }
    }

    /// One-line summary: `name :: score (distance m, rating o/r)`.
    pub fn summary(&self) -> String {
        self.to_logged().summary()
    }

    /// Multi-line report with the factor breakdown and the weapons engaging this contact.
    pub fn detail_report(&self, weapons: &[Box<dyn Weapon>]) -> String {
        let b = self.breakdown();
        let mut out = String::new();
        let _ = writeln!(out, "---------------------------");
        let _ = writeln!(
            out,
            "Name: {} [{}] :: {:.3}",
            self.name(),
            self.kind(),
            b.total
        );
        let _ = writeln!(out, " -> Distance: {:.0} meters", self.distance());
        if self.is_moving() {
            let _ = writeln!(out, " -> Speed: {:.0} m/s", self.speed());
            let _ = writeln!(
                out,
                " -> Intercept: {} ({:.3})",
                self.intercept_bearing(),
                self.intercept_factor()
            );
            if self.intercept_factor() > 0.0 {
                if let Some(approach) = self.closest_approach() {
                    let _ = writeln!(out, " -> Closest approach: {approach:.0} meters");
                }
            }
        }
        let _ = writeln!(out, " -> Factors:");
        let _ = writeln!(
            out,
            "   - Effective DPS: {:.3} (vs {:.0})",
            self.effective_dps, self.own_optimal_dps
        );
        if let Some(dps) = self.dps_factor() {
            let _ = writeln!(out, "   - DPS Factor: {dps:.3}");
        }
        let _ = writeln!(
            out,
            "   - Offensive Rating: {:.3}  (OffRat: {:.3})",
            self.offense_factor(),
            self.offense_rating
        );
        let _ = writeln!(out, "   - Distance Factor: {:.3}", self.distance_factor());
        let _ = writeln!(out, "   - Speed Factor: {:.3}", self.speed_factor());
        if let Some(approach) = self.approach_factor() {
            let _ = writeln!(out, "   - Approach Factor: {approach:.3}");
        }

        let engaged_by = weapons_targeting(weapons, self.id());
        if !engaged_by.is_empty() {
            let _ = writeln!(out, " -> Targeted by:");
            for name in engaged_by {
                let _ = writeln!(out, "   - {name}");
            }
        }
        out
    }
}
