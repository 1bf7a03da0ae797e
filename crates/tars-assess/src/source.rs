//! Interfaces consumed from the host environment.
//!
//! The threat-detection source is an external capability that may be absent;
//! the capacity monitor is optional; the damage monitor is always provided.
//! All calls are synchronous queries against already-computed host state.

use std::cell::Cell;

use tars_core::error::SourceError;
use tars_core::types::{ContactSnapshot, DeviceHandle, EntityId, ObserverHandle};

/// External threat-detection capability.
pub trait ThreatSource {
    /// One-time capability handshake. `Ok(false)` or an error both mean "not present".
    fn activate(&self, owner: ObserverHandle) -> Result<bool, SourceError>;

    /// Contacts visible to `observer` with their raw offense ratings.
    /// Ordering is not significant; identities are unique within one call.
    fn sorted_threats(
        &self,
        observer: ObserverHandle,
    ) -> Result<Vec<(ContactSnapshot, f64)>, SourceError>;

    /// DPS the contact can currently bring to bear.
    fn effective_dps(&self, contact: EntityId) -> f64;

    /// Best-case DPS of an entity (used with our own grid as the reference).
    fn optimal_dps(&self, entity: EntityId) -> f64;

    /// What a managed weapon device is targeting in the given slot.
    fn weapon_target(
        &self,
        device: DeviceHandle,
        slot: u32,
    ) -> Result<Option<ContactSnapshot>, SourceError>;
}

/// Shield-like defensive capacity.
pub trait CapacityMonitor {
    /// Current charge as a fraction of maximum, 0.0..=1.0.
    fn current_capacity_fraction(&self) -> f64;
    fn max_capacity(&self) -> f64;

    /// Integer capacity sample used for change detection.
    fn capacity_sample(&self) -> i64 {
        let value = self.current_capacity_fraction() * self.max_capacity();
        if value.is_finite() {
            value.floor() as i64
        } else {
            0
        }
    }
}

/// Cumulative hull damage to date.
pub trait DamageMonitor {
    fn cumulative_damage(&self) -> f64;
}

/// Sum per-block damage into a cumulative scalar, ignoring non-finite and negative entries.
pub fn total_block_damage(blocks: impl IntoIterator<Item = f64>) -> f64 {
    blocks
        .into_iter()
        .filter(|d| d.is_finite() && *d > 0.0)
        .sum()
}

/// Host-fed damage reading. The host writes the latest total; the engine samples it.
#[derive(Debug, Default)]
pub struct DamageGauge {
    total: Cell<f64>,
}

impl DamageGauge {
    pub fn new(total: f64) -> Self {
        Self {
            total: Cell::new(total),
        }
    }

    pub fn set(&self, total: f64) {
        self.total.set(total);
    }

    /// Replace the reading with the sum of the given per-block damage values.
    pub fn set_from_blocks(&self, blocks: impl IntoIterator<Item = f64>) {
        self.total.set(total_block_damage(blocks));
    }
}

impl DamageMonitor for DamageGauge {
    fn cumulative_damage(&self) -> f64 {
        self.total.get()
    }
}

/// Host-fed capacity reading.
#[derive(Debug)]
pub struct CapacityGauge {
    fraction: Cell<f64>,
    max: f64,
}

impl CapacityGauge {
    pub fn new(max: f64) -> Self {
        Self {
            fraction: Cell::new(1.0),
            max,
        }
    }

    pub fn set_fraction(&self, fraction: f64) {
        self.fraction.set(fraction.clamp(0.0, 1.0));
    }
}

impl CapacityMonitor for CapacityGauge {
    fn current_capacity_fraction(&self) -> f64 {
        self.fraction.get()
    }

    fn max_capacity(&self) -> f64 {
        self.max
    }
}
