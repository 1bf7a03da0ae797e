//! Contact scan: turns the source's raw ratings into this tick's scored contact set.

use std::collections::BTreeMap;

use glam::DVec3;
use tracing::{debug, trace};

use tars_assess::context::AssessmentContext;
use tars_assess::source::ThreatSource;
use tars_assess::threat::Threat;
use tars_core::config::ThreatConfig;
use tars_core::error::SourceError;
use tars_core::types::EntityId;

/// Surviving contacts for one tick, keyed by identity. Rebuilt from scratch every tick.
pub type ContactSet = BTreeMap<EntityId, Threat>;

/// Query the source and build the tick's contact set.
///
/// Skips empty records and contacts beyond the outer sensing radius, then drops
/// contacts with neither effective DPS nor an offense rating.
pub fn run(
    source: &dyn ThreatSource,
    ctx: &AssessmentContext,
    config: &ThreatConfig,
    observer: DVec3,
) -> Result<ContactSet, SourceError> {
    let raw = source.sorted_threats(ctx.observer)?;
    let own_optimal_dps = source.optimal_dps(ctx.own_grid);

    let mut contacts = ContactSet::new();
    for (snapshot, rating) in raw {
        if snapshot.is_empty() {
            continue;
        }

        let range = snapshot.range_to(observer);
        if range.is_nan() || range > config.max_detection_distance {
            trace!(id = snapshot.id, range, "contact outside sensing radius");
            continue;
        }

        let rating = if rating.is_finite() { rating } else { 0.0 };
        let effective_dps = source.effective_dps(snapshot.id);
        let threat = Threat::new(snapshot, rating, observer, config.scoring)
            .with_dps(effective_dps, own_optimal_dps);

        if threat.is_noise() {
            trace!(id = threat.id(), "contact has no offensive capability");
            continue;
        }

        debug!(
            id = threat.id(),
            name = threat.name(),
            score = threat.aggregate_score(),
            "contact scored"
        );
        contacts.entry(threat.id()).or_insert(threat);
    }

    Ok(contacts)
}

/// Sum of every contact's aggregate score.
pub fn aggregate(contacts: &ContactSet) -> f64 {
    contacts.values().map(Threat::aggregate_score).sum()
}
