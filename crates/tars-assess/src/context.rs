//! Explicitly constructed handle bundle shared by the engine and weapons.

use std::rc::Rc;

use tars_core::types::{EntityId, ObserverHandle};

use crate::source::{CapacityMonitor, DamageMonitor, ThreatSource};

/// Everything the assessment loop needs from the host, resolved once at startup.
#[derive(Clone)]
pub struct AssessmentContext {
    /// The sensing platform running this loop.
    pub observer: ObserverHandle,
    /// Our own grid, used as the reference for optimal DPS.
    pub own_grid: EntityId,
    source: Option<Rc<dyn ThreatSource>>,
    capacity: Option<Rc<dyn CapacityMonitor>>,
    damage: Rc<dyn DamageMonitor>,
}

impl AssessmentContext {
    pub fn new(observer: ObserverHandle, own_grid: EntityId, damage: Rc<dyn DamageMonitor>) -> Self {
        Self {
            observer,
            own_grid,
            source: None,
            capacity: None,
            damage,
        }
    }

    pub fn with_source(mut self, source: Rc<dyn ThreatSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_capacity(mut self, capacity: Rc<dyn CapacityMonitor>) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn source(&self) -> Option<&Rc<dyn ThreatSource>> {
        self.source.as_ref()
    }

    pub fn capacity(&self) -> Option<&Rc<dyn CapacityMonitor>> {
        self.capacity.as_ref()
    }

    pub fn damage(&self) -> &Rc<dyn DamageMonitor> {
        &self.damage
    }
}
