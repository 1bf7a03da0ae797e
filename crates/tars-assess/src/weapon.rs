//! Weapon capability abstraction.
//!
//! Callers query "is this device engaging, and what" without knowing whether
//! the device is a native turret or one managed by the threat-detection source.

use std::rc::Rc;

use tracing::debug;

use tars_core::types::{ContactSnapshot, DeviceHandle, EntityId};

use crate::context::AssessmentContext;
use crate::source::ThreatSource;

/// Read-only targeting queries against a live weapon device.
pub trait Weapon {
    fn display_name(&self) -> String;

    /// Whether the device currently has a live target.
    fn has_target(&self) -> bool;

    fn current_target(&self) -> Option<ContactSnapshot>;

    /// Whether the device is live and engaging the given contact.
    fn is_targeting(&self, contact: EntityId) -> bool {
        self.has_target()
            && self
                .current_target()
                .is_some_and(|target| !target.is_empty() && target.id == contact)
    }
}

/// State exposed by a native turret block.
pub trait TurretDevice {
    fn display_name(&self) -> String;
    fn is_working(&self) -> bool;
    fn is_shooting(&self) -> bool;
    fn targeted_entity(&self) -> Option<ContactSnapshot>;
}

/// A native turret, queried through its own working/shooting state.
pub struct StandardTurret<D> {
    device: D,
}

impl<D: TurretDevice> StandardTurret<D> {
    pub fn new(device: D) -> Self {
        Self { device }
    }
}

impl<D: TurretDevice> Weapon for StandardTurret<D> {
    fn display_name(&self) -> String {
        self.device.display_name()
    }

    fn has_target(&self) -> bool {
        self.device.is_working() && self.device.is_shooting()
    }

    fn current_target(&self) -> Option<ContactSnapshot> {
        self.device
            .targeted_entity()
            .filter(|target| !target.is_empty())
    }
}

/// A turret managed by the threat-detection source, queried via its per-device lookup.
///
/// Fails closed: a missing source or a failed lookup reads as "no target".
pub struct ManagedTurret {
    name: String,
    device: DeviceHandle,
    slot: u32,
    source: Option<Rc<dyn ThreatSource>>,
}

impl ManagedTurret {
    pub fn new(ctx: &AssessmentContext, device: DeviceHandle, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            device,
            slot: 0,
            source: ctx.source().cloned(),
        }
    }

    pub fn with_slot(mut self, slot: u32) -> Self {
        self.slot = slot;
        self
    }

    fn lookup(&self) -> Option<ContactSnapshot> {
        let source = self.source.as_ref()?;
        match source.weapon_target(self.device, self.slot) {
            Ok(target) => target.filter(|t| !t.is_empty()),
            Err(e) => {
                debug!(device = ?self.device, error = %e, "weapon target lookup failed");
                None
            }
        }
    }
}

impl Weapon for ManagedTurret {
    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn has_target(&self) -> bool {
        self.lookup().is_some()
    }

    fn current_target(&self) -> Option<ContactSnapshot> {
        self.lookup()
    }
}

/// Names of the weapons currently targeting a contact.
pub fn weapons_targeting(weapons: &[Box<dyn Weapon>], contact: EntityId) -> Vec<String> {
    weapons
        .iter()
        .filter(|w| w.is_targeting(contact))
        .map(|w| w.display_name())
        .collect()
}
