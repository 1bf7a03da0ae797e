//! Fundamental identity, geometry, and contact types.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::IFF_FLAGS_NEUTRAL;
use crate::enums::{ContactKind, Relationship};

/// Opaque numeric identity of a detected entity. Zero marks an empty record.
pub type EntityId = i64;

/// Handle to the sensing platform that owns this assessment loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObserverHandle(pub EntityId);

/// Handle to a weapon device managed by the threat-detection source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceHandle(pub EntityId);

/// One detected entity as reported by the threat-detection source for a single tick.
///
/// Snapshots are built fresh every scan and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactSnapshot {
    pub id: EntityId,
    pub name: String,
    /// World position (meters).
    pub position: DVec3,
    /// World velocity (m/s).
    pub velocity: DVec3,
    #[serde(default)]
    pub relationship: Relationship,
    #[serde(default)]
    pub kind: ContactKind,
}

impl ContactSnapshot {
    pub fn new(id: EntityId, name: impl Into<String>, position: DVec3, velocity: DVec3) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            velocity,
            relationship: Relationship::default(),
            kind: ContactKind::default(),
        }
    }

    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationship = relationship;
        self
    }

    pub fn with_kind(mut self, kind: ContactKind) -> Self {
        self.kind = kind;
        self
    }

    /// The empty marker the source uses for "no entity".
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether this record is the source's empty/invalid marker.
    pub fn is_empty(&self) -> bool {
        self.id == 0
    }

    /// Speed magnitude (m/s).
    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Range from an observer position (meters).
    pub fn range_to(&self, observer: DVec3) -> f64 {
        self.position.distance(observer)
    }
}

/// Compact friend-or-foe payload broadcast to allied consumers.
///
/// `radius_squared` is reserved for collision-avoidance consumers and is
/// always emitted as 0.0 by this system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IffTuple {
    pub flags: u8,
    pub id: EntityId,
    pub position: DVec3,
    pub radius_squared: f64,
}

impl Default for IffTuple {
    fn default() -> Self {
        Self {
            flags: IFF_FLAGS_NEUTRAL,
            id: 0,
            position: DVec3::ZERO,
            radius_squared: 0.0,
        }
    }
}

impl IffTuple {
    pub fn has_flag(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }
}
