//! Assessment engine: the per-tick decision loop.
//!
//! `AssessmentEngine` owns the only state carried across ticks: the activation
//! latch, the previous condition and fingerprint, the monitor baselines, and
//! the event log. Everything else is rebuilt from scratch each tick. A tick
//! that cannot complete commits nothing.

use chrono::{DateTime, Utc};
use glam::DVec3;
use tracing::{debug, info, warn};

use tars_assess::context::AssessmentContext;
use tars_assess::weapon::Weapon;
use tars_core::config::ThreatConfig;
use tars_core::enums::DefenseCondition;
use tars_core::events::{EscalationNotice, EventRecord};

use crate::report::{TickReport, TickStatus};
use crate::systems;
use crate::systems::broadcast::BroadcastSink;
use crate::systems::defcon::{DefconTracker, MonitorSamples};
use crate::systems::event_log::EventLog;
use crate::systems::notify::EscalationListener;

/// Host-supplied inputs for one tick.
#[derive(Debug, Clone, Copy)]
pub struct TickInput {
    pub timestamp: DateTime<Utc>,
    /// Current world position of the sensing platform.
    pub observer_position: DVec3,
}

impl TickInput {
    pub fn new(timestamp: DateTime<Utc>, observer_position: DVec3) -> Self {
        Self {
            timestamp,
            observer_position,
        }
    }
}

/// The assessment engine. Ticks must be serialized by the host.
pub struct AssessmentEngine {
    ctx: AssessmentContext,
    config: ThreatConfig,
    weapons: Vec<Box<dyn Weapon>>,
    listeners: Vec<Box<dyn EscalationListener>>,
    active: bool,
    tick: u64,
    tracker: DefconTracker,
    log: EventLog,
    last_condition: Option<DefenseCondition>,
    last_fingerprint: Option<u64>,
}

impl AssessmentEngine {
    /// Create an engine. The configuration is sanitized once here.
    pub fn new(ctx: AssessmentContext, config: ThreatConfig) -> Self {
        let config = config.sanitized();
        let log = EventLog::new(config.log_capacity);
        Self {
            ctx,
            config,
            weapons: Vec::new(),
            listeners: Vec::new(),
            active: false,
            tick: 0,
            tracker: DefconTracker::default(),
            log,
            last_condition: None,
            last_fingerprint: None,
        }
    }

    pub fn register_weapon(&mut self, weapon: Box<dyn Weapon>) {
        self.weapons.push(weapon);
    }

    pub fn register_listener(&mut self, listener: Box<dyn EscalationListener>) {
        self.listeners.push(listener);
    }

    pub fn context(&self) -> &AssessmentContext {
        &self.ctx
    }

    pub fn config(&self) -> &ThreatConfig {
        &self.config
    }

    pub fn weapons(&self) -> &[Box<dyn Weapon>] {
        &self.weapons
    }

    pub fn event_log(&self) -> &EventLog {
        &self.log
    }

    /// Whether the threat-detection handshake has succeeded.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Condition of the last committed tick.
    pub fn current_condition(&self) -> Option<DefenseCondition> {
        self.last_condition
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    /// Render the status panel for a report produced by this engine.
    pub fn status_text(&self, report: &TickReport) -> String {
        systems::display::render(report, &self.weapons)
    }

    /// Run one full assessment tick.
    pub fn tick(&mut self, input: &TickInput, sink: &mut dyn BroadcastSink) -> TickReport {
        self.tick += 1;
        let weapons = self.weapons.len();

        if !self.ensure_active() {
            return TickReport::idle(self.tick, input.timestamp, TickStatus::Degraded, weapons);
        }
        let Some(source) = self.ctx.source().cloned() else {
            return TickReport::idle(self.tick, input.timestamp, TickStatus::Degraded, weapons);
        };

        // Step 1: Scan and score contacts
        let contacts = match systems::scan::run(
            source.as_ref(),
            &self.ctx,
            &self.config,
            input.observer_position,
        ) {
            Ok(contacts) => contacts,
            Err(e) => {
                warn!(error = %e, "threat scan failed, abandoning tick");
                return TickReport::idle(self.tick, input.timestamp, TickStatus::Abandoned, weapons);
            }
        };
        let aggregate = systems::scan::aggregate(&contacts);

        // Step 2: Sample monitors and derive the condition
        let samples = MonitorSamples {
            capacity: self.ctx.capacity().map(|c| c.capacity_sample()),
            damage: self.ctx.damage().cumulative_damage(),
        };
        let decision = self
            .tracker
            .assess(&samples, aggregate, &self.config, self.last_condition);

        // Step 3: Change detection and event log
        let fingerprint = systems::fingerprint::of_contacts(&contacts);
        let changed = self.last_fingerprint != Some(fingerprint)
            || self.last_condition != Some(decision.condition);
        if changed {
            if self.last_condition != Some(decision.condition) {
                info!(
                    from = ?self.last_condition.map(DefenseCondition::level),
                    to = decision.condition.level(),
                    aggregate,
                    "defense condition changed"
                );
            }
            self.log.push(EventRecord {
                timestamp: input.timestamp,
                condition: decision.condition,
                score: aggregate,
                contacts: contacts.values().map(|t| t.to_logged()).collect(),
            });
            let notice = EscalationNotice::new(decision.condition);
            let delivered = systems::notify::dispatch(&mut self.listeners, &notice);
            debug!(token = %notice.token, delivered, "event logged");
        }

        // Step 4: Broadcast IFF tuples
        let broadcasts = systems::broadcast::run(
            &contacts,
            &self.weapons,
            &self.config.broadcast_channel,
            sink,
        );

        // Step 5: Commit carried state
        self.tracker.commit(&samples);
        self.last_condition = Some(decision.condition);
        self.last_fingerprint = Some(fingerprint);

        TickReport {
            tick: self.tick,
            timestamp: input.timestamp,
            status: TickStatus::Assessed,
            condition: decision.condition,
            aggregate,
            override_reason: decision.override_reason,
            contacts: contacts.into_values().collect(),
            logged: changed,
            broadcasts,
            weapons_registered: weapons,
        }
    }

    /// Attempt the handshake until it succeeds once. Failures are not fatal.
    fn ensure_active(&mut self) -> bool {
        if self.active {
            return true;
        }
        let Some(source) = self.ctx.source() else {
            debug!("no threat-detection source attached");
            return false;
        };
        match source.activate(self.ctx.observer) {
            Ok(true) => {
                info!(observer = ?self.ctx.observer, "threat-detection source activated");
                self.active = true;
            }
            Ok(false) => debug!("threat-detection source not present"),
            Err(e) => warn!(error = %e, "threat-detection activation failed"),
        }
        self.active
    }
}
