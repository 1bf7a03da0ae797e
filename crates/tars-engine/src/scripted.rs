//! Scripted in-memory threat-detection source and scenario playback.
//!
//! Used for headless testing and the replay tool: a scenario is a list of
//! frames, one per tick, each describing what the source reports and what
//! the host monitors read.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use chrono::{DateTime, Duration, Utc};
use glam::DVec3;
use serde::{Deserialize, Serialize};

use tars_assess::context::AssessmentContext;
use tars_assess::source::{CapacityGauge, DamageGauge, ThreatSource};
use tars_assess::weapon::ManagedTurret;
use tars_core::config::ThreatConfig;
use tars_core::constants::TICK_INTERVAL_MS;
use tars_core::error::SourceError;
use tars_core::types::{ContactSnapshot, DeviceHandle, EntityId, IffTuple, ObserverHandle};

use crate::engine::{AssessmentEngine, TickInput};
use crate::report::TickReport;

/// One contact as reported by the scripted source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedContact {
    pub contact: ContactSnapshot,
    /// Raw offense rating.
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub effective_dps: f64,
}

/// What the source and monitors report for one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedFrame {
    #[serde(default)]
    pub contacts: Vec<ScriptedContact>,
    /// Cumulative hull damage; carries over from the previous frame when absent.
    #[serde(default)]
    pub hull_damage: Option<f64>,
    /// Shield charge fraction; carries over when absent.
    #[serde(default)]
    pub capacity_fraction: Option<f64>,
    /// When false the source fails the threat query for this tick.
    #[serde(default = "default_true")]
    pub available: bool,
    /// Device targets for managed turrets, by device id.
    #[serde(default)]
    pub weapon_targets: HashMap<EntityId, EntityId>,
}

impl Default for ScriptedFrame {
    fn default() -> Self {
        Self {
            contacts: Vec::new(),
            hull_damage: None,
            capacity_fraction: None,
            available: true,
            weapon_targets: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// A threat-detection source that replays host-provided frames.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    frame: RefCell<ScriptedFrame>,
    own_optimal_dps: f64,
    failed_activations: Cell<u32>,
}

impl ScriptedSource {
    pub fn new(own_optimal_dps: f64) -> Self {
        Self {
            own_optimal_dps,
            ..Self::default()
        }
    }

    /// Refuse the first `count` activation attempts.
    pub fn with_failed_activations(self, count: u32) -> Self {
        self.failed_activations.set(count);
        self
    }

    pub fn set_frame(&self, frame: ScriptedFrame) {
        *self.frame.borrow_mut() = frame;
    }
}

impl ThreatSource for ScriptedSource {
    fn activate(&self, _owner: ObserverHandle) -> Result<bool, SourceError> {
        let remaining = self.failed_activations.get();
        if remaining > 0 {
            self.failed_activations.set(remaining - 1);
            return Err(SourceError::Handshake {
                reason: "capability not loaded".into(),
            });
        }
        Ok(true)
    }

    fn sorted_threats(
        &self,
        _observer: ObserverHandle,
    ) -> Result<Vec<(ContactSnapshot, f64)>, SourceError> {
        let frame = self.frame.borrow();
        if !frame.available {
            return Err(SourceError::Query {
                reason: "scripted outage".into(),
            });
        }
        Ok(frame
            .contacts
            .iter()
            .map(|c| (c.contact.clone(), c.rating))
            .collect())
    }

    fn effective_dps(&self, contact: EntityId) -> f64 {
        self.frame
            .borrow()
            .contacts
            .iter()
            .find(|c| c.contact.id == contact)
            .map_or(0.0, |c| c.effective_dps)
    }

    fn optimal_dps(&self, _entity: EntityId) -> f64 {
        self.own_optimal_dps
    }

    fn weapon_target(
        &self,
        device: DeviceHandle,
        _slot: u32,
    ) -> Result<Option<ContactSnapshot>, SourceError> {
        let frame = self.frame.borrow();
        let Some(target_id) = frame.weapon_targets.get(&device.0) else {
            return Ok(None);
        };
        Ok(frame
            .contacts
            .iter()
            .find(|c| c.contact.id == *target_id)
            .map(|c| c.contact.clone()))
    }
}

/// A complete scripted run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    /// Sensing platform position (fixed for the run).
    #[serde(default)]
    pub observer: DVec3,
    #[serde(default)]
    pub own_optimal_dps: f64,
    /// Shield capacity; no capacity monitor is attached when absent.
    #[serde(default)]
    pub capacity_max: Option<f64>,
    #[serde(default)]
    pub failed_activations: u32,
    /// Managed turrets as `(device id, display name)`.
    #[serde(default)]
    pub turrets: Vec<(EntityId, String)>,
    pub frames: Vec<ScriptedFrame>,
}

/// Result of playing a scenario.
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub reports: Vec<TickReport>,
    pub broadcasts: Vec<(String, IffTuple)>,
    pub log_text: String,
    pub status_text: String,
}

/// Play every frame of a scenario through a fresh engine.
pub fn run_scenario(scenario: &Scenario, config: ThreatConfig, start: DateTime<Utc>) -> ScenarioOutcome {
    let source = Rc::new(
        ScriptedSource::new(scenario.own_optimal_dps)
            .with_failed_activations(scenario.failed_activations),
    );
    let damage = Rc::new(DamageGauge::default());
    let mut ctx = AssessmentContext::new(ObserverHandle(1), 1, damage.clone()).with_source(source.clone());
    let capacity = scenario.capacity_max.map(|max| Rc::new(CapacityGauge::new(max)));
    if let Some(gauge) = &capacity {
        ctx = ctx.with_capacity(gauge.clone());
    }

    let mut engine = AssessmentEngine::new(ctx, config);
    for (device, name) in &scenario.turrets {
        let turret = ManagedTurret::new(engine.context(), DeviceHandle(*device), name.clone());
        engine.register_weapon(Box::new(turret));
    }

    let mut broadcasts = Vec::new();
    let mut reports = Vec::with_capacity(scenario.frames.len());
    let mut status_text = String::new();
    for (i, frame) in scenario.frames.iter().enumerate() {
        if let Some(total) = frame.hull_damage {
            damage.set(total);
        }
        if let (Some(gauge), Some(fraction)) = (&capacity, frame.capacity_fraction) {
            gauge.set_fraction(fraction);
        }
        source.set_frame(frame.clone());

        let timestamp = start + Duration::milliseconds(TICK_INTERVAL_MS * i as i64);
        let report = engine.tick(&TickInput::new(timestamp, scenario.observer), &mut broadcasts);
        status_text = engine.status_text(&report);
        reports.push(report);
    }

    ScenarioOutcome {
        reports,
        broadcasts,
        log_text: engine.event_log().render_text(),
        status_text,
    }
}
