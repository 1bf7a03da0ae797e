#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chrono::{DateTime, Duration, TimeZone, Utc};
    use glam::DVec3;
    use proptest::prelude::*;

    use tars_assess::context::AssessmentContext;
    use tars_assess::source::{CapacityGauge, DamageGauge};
    use tars_assess::weapon::{ManagedTurret, StandardTurret, TurretDevice};
    use tars_core::config::{DefconThresholds, ThreatConfig};
    use tars_core::constants::*;
    use tars_core::enums::*;
    use tars_core::error::ListenerError;
    use tars_core::events::{EventRecord, LoggedContact};
    use tars_core::types::{ContactSnapshot, DeviceHandle, EntityId, IffTuple, ObserverHandle};

    use crate::engine::{AssessmentEngine, TickInput};
    use crate::report::{TickReport, TickStatus};
    use crate::scripted::{ScriptedContact, ScriptedFrame, ScriptedSource};
    use crate::systems::defcon::{apply_hysteresis, band_for, OverrideReason};
    use crate::systems::event_log::EventLog;
    use crate::systems::fingerprint;
    use crate::systems::notify::HookListener;

    struct Harness {
        engine: AssessmentEngine,
        source: Rc<ScriptedSource>,
        damage: Rc<DamageGauge>,
        capacity: Rc<CapacityGauge>,
        broadcasts: Vec<(String, IffTuple)>,
        clock: DateTime<Utc>,
    }

    impl Harness {
        fn new(config: ThreatConfig) -> Self {
            Self::with_source(ScriptedSource::new(1000.0), config)
        }

        fn with_source(source: ScriptedSource, config: ThreatConfig) -> Self {
            let source = Rc::new(source);
            let damage = Rc::new(DamageGauge::default());
            let capacity = Rc::new(CapacityGauge::new(100.0));
            let ctx = AssessmentContext::new(ObserverHandle(1), 1, damage.clone())
                .with_source(source.clone())
                .with_capacity(capacity.clone());
            Self {
                engine: AssessmentEngine::new(ctx, config),
                source,
                damage,
                capacity,
                broadcasts: Vec::new(),
                clock: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            }
        }

        fn tick(&mut self, frame: ScriptedFrame) -> TickReport {
            self.source.set_frame(frame);
            self.clock += Duration::seconds(1);
            self.engine
                .tick(&TickInput::new(self.clock, DVec3::ZERO), &mut self.broadcasts)
        }
    }

    fn scripted(id: EntityId, position: DVec3, velocity: DVec3, rating: f64) -> ScriptedContact {
        ScriptedContact {
            contact: ContactSnapshot::new(id, format!("Contact-{id}"), position, velocity)
                .with_relationship(Relationship::Hostile)
                .with_kind(ContactKind::LargePlatform),
            rating,
            effective_dps: 0.0,
        }
    }

    fn frame(contacts: Vec<ScriptedContact>) -> ScriptedFrame {
        ScriptedFrame {
            contacts,
            ..ScriptedFrame::default()
        }
    }

    fn stationary(id: EntityId, range: f64, rating: f64) -> ScriptedContact {
        scripted(id, DVec3::new(range, 0.0, 0.0), DVec3::ZERO, rating)
    }

    // ---- Activation ----

    #[test]
    fn test_missing_source_degrades() {
        let ctx = AssessmentContext::new(ObserverHandle(1), 1, Rc::new(DamageGauge::default()));
        let mut engine = AssessmentEngine::new(ctx, ThreatConfig::default());
        let mut sink = Vec::new();
        let report = engine.tick(&TickInput::new(Utc::now(), DVec3::ZERO), &mut sink);
        assert_eq!(report.status, TickStatus::Degraded);
        assert_eq!(report.condition, DefenseCondition::Calm);
        assert!(report.contacts.is_empty());
        assert!(sink.is_empty());
        assert!(engine.event_log().is_empty());
        assert_eq!(engine.current_condition(), None);
    }

    #[test]
    fn test_activation_retried_until_success() {
        let mut h = Harness::with_source(
            ScriptedSource::new(1000.0).with_failed_activations(2),
            ThreatConfig::default(),
        );
        let f = frame(vec![stationary(1, 4000.0, 0.5)]);
        assert_eq!(h.tick(f.clone()).status, TickStatus::Degraded);
        assert!(!h.engine.is_active());
        assert_eq!(h.tick(f.clone()).status, TickStatus::Degraded);
        let report = h.tick(f);
        assert_eq!(report.status, TickStatus::Assessed);
        assert!(h.engine.is_active());
        assert_eq!(report.contacts.len(), 1);
    }

    #[test]
    fn test_degraded_tick_ignores_damage_overrides() {
        let mut h = Harness::with_source(
            ScriptedSource::new(1000.0).with_failed_activations(1),
            ThreatConfig::default(),
        );
        h.damage.set(500.0);
        let report = h.tick(frame(vec![]));
        assert_eq!(report.status, TickStatus::Degraded);
        assert_eq!(report.condition, DefenseCondition::Calm);
        assert!(report.override_reason.is_none());
    }

    // ---- End-to-end scoring ----

    #[test]
    fn test_single_stationary_contact_is_mild() {
        let mut h = Harness::new(ThreatConfig::default());
        let report = h.tick(frame(vec![stationary(1, 4000.0, 0.5)]));

        assert_eq!(report.status, TickStatus::Assessed);
        assert_eq!(report.contacts.len(), 1);
        let expected = (1.0 - 3750.0 / 7250.0) + 0.5 / 75.0;
        assert!((report.aggregate - expected).abs() < 1e-9);
        assert!((report.aggregate - 0.49).abs() < 0.01);
        assert_eq!(report.condition, DefenseCondition::Mild);
        assert!(report.logged);
        assert_eq!(report.broadcasts, 1);
        assert_eq!(h.broadcasts.len(), 1);
        assert_eq!(h.broadcasts[0].0, IFF_CHANNEL);
        assert_eq!(h.broadcasts[0].1.flags, 9);
        assert_eq!(h.broadcasts[0].1.radius_squared, 0.0);
    }

    #[test]
    fn test_aggregate_sums_contacts() {
        let mut h = Harness::new(ThreatConfig::default());
        // Two head-on fast closers at 1000 m, fully rated.
        let closer = |id| scripted(id, DVec3::new(0.0, 1000.0, 0.0), DVec3::new(0.0, -300.0, 0.0), 75.0);
        let report = h.tick(frame(vec![closer(1), closer(2)]));
        let each = report.contacts[0].aggregate_score();
        assert!(each > 4.5);
        assert!((report.aggregate - 2.0 * each).abs() < 1e-9);
        assert_eq!(report.condition, DefenseCondition::Critical);
    }

    #[test]
    fn test_contacts_beyond_sensing_radius_excluded() {
        let mut h = Harness::new(ThreatConfig::default());
        let report = h.tick(frame(vec![stationary(1, MAX_DETECTION_DISTANCE + 1.0, 100.0)]));
        assert!(report.contacts.is_empty());
        assert_eq!(report.aggregate, 0.0);
        assert_eq!(report.condition, DefenseCondition::Calm);
        assert_eq!(report.broadcasts, 0);
    }

    #[test]
    fn test_noise_and_empty_contacts_filtered() {
        let mut h = Harness::new(ThreatConfig::default());
        let mut armed_unrated = stationary(2, 2000.0, 0.0);
        armed_unrated.effective_dps = 40.0;
        let empty = ScriptedContact {
            contact: ContactSnapshot::empty(),
            rating: 10.0,
            effective_dps: 10.0,
        };
        let report = h.tick(frame(vec![stationary(1, 2000.0, 0.0), armed_unrated, empty]));
        let ids: Vec<EntityId> = report.contacts.iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec![2]);
    }

    // ---- Overrides ----

    #[test]
    fn test_capacity_loss_forces_critical() {
        let mut h = Harness::new(ThreatConfig::default());
        h.capacity.set_fraction(1.0);
        let first = h.tick(frame(vec![]));
        assert_eq!(first.condition, DefenseCondition::Calm);

        h.capacity.set_fraction(0.8);
        let report = h.tick(frame(vec![]));
        assert_eq!(report.aggregate, 0.0);
        assert_eq!(report.condition, DefenseCondition::Critical);
        assert_eq!(
            report.override_reason,
            Some(OverrideReason::CapacityLoss { was: 100, now: 80 })
        );

        // Holding steady releases the override.
        let steady = h.tick(frame(vec![]));
        assert_eq!(steady.condition, DefenseCondition::Calm);

        // Recharging is not a loss.
        h.capacity.set_fraction(0.9);
        assert_eq!(h.tick(frame(vec![])).condition, DefenseCondition::Calm);
    }

    #[test]
    fn test_hull_damage_forces_critical() {
        let mut h = Harness::new(ThreatConfig::default());
        // Pre-existing damage is the baseline, not new damage.
        h.damage.set(250.0);
        assert_eq!(h.tick(frame(vec![])).condition, DefenseCondition::Calm);

        // Below epsilon.
        h.damage.set(250.05);
        assert_eq!(h.tick(frame(vec![])).condition, DefenseCondition::Calm);

        h.damage.set(260.0);
        let report = h.tick(frame(vec![]));
        assert_eq!(report.condition, DefenseCondition::Critical);
        assert!(matches!(
            report.override_reason,
            Some(OverrideReason::HullDamage { delta }) if (delta - 9.95).abs() < 1e-6
        ));
    }

    #[test]
    fn test_without_capacity_monitor_only_hull_override_fires() {
        let source = Rc::new(ScriptedSource::new(1000.0));
        let damage = Rc::new(DamageGauge::default());
        let ctx = AssessmentContext::new(ObserverHandle(1), 1, damage.clone()).with_source(source.clone());
        let mut engine = AssessmentEngine::new(ctx, ThreatConfig::default());
        let mut sink = Vec::new();
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let mut reports = Vec::new();
        for i in 0..4 {
            source.set_frame(frame(vec![stationary(1, 4000.0, 0.5)]));
            reports.push(engine.tick(&TickInput::new(at + Duration::seconds(i), DVec3::ZERO), &mut sink));
        }
        assert!(reports.iter().all(|r| r.status == TickStatus::Assessed));
        assert!(reports.iter().all(|r| r.override_reason.is_none()));
        assert!(reports.iter().all(|r| r.condition == DefenseCondition::Mild));

        damage.set(5.0);
        let hit = engine.tick(&TickInput::new(at + Duration::seconds(10), DVec3::ZERO), &mut sink);
        assert_eq!(hit.condition, DefenseCondition::Critical);
        assert!(matches!(hit.override_reason, Some(OverrideReason::HullDamage { .. })));
        assert!(!matches!(hit.override_reason, Some(OverrideReason::CapacityLoss { .. })));
    }

    // ---- Banding ----

    #[test]
    fn test_band_exclusive_lower_bounds() {
        let t = DefconThresholds::default();
        assert_eq!(band_for(5.0, &t), DefenseCondition::High);
        assert_eq!(band_for(5.0001, &t), DefenseCondition::Critical);
        assert_eq!(band_for(3.0, &t), DefenseCondition::Elevated);
        assert_eq!(band_for(3.0001, &t), DefenseCondition::High);
        assert_eq!(band_for(1.0, &t), DefenseCondition::Mild);
        assert_eq!(band_for(0.05, &t), DefenseCondition::Calm);
        assert_eq!(band_for(0.0, &t), DefenseCondition::Calm);
        assert_eq!(band_for(f64::NAN, &t), DefenseCondition::Calm);
    }

    #[test]
    fn test_hysteresis_holds_severe_band() {
        let t = DefconThresholds::default();
        // Just under the High bound stays High with a 0.2 margin.
        assert_eq!(
            apply_hysteresis(DefenseCondition::Elevated, DefenseCondition::High, 2.9, &t, 0.2),
            DefenseCondition::High
        );
        // Well under relaxes.
        assert_eq!(
            apply_hysteresis(DefenseCondition::Elevated, DefenseCondition::High, 2.5, &t, 0.2),
            DefenseCondition::Elevated
        );
        // Escalation is immediate.
        assert_eq!(
            apply_hysteresis(DefenseCondition::Critical, DefenseCondition::Mild, 6.0, &t, 0.2),
            DefenseCondition::Critical
        );
        // Zero margin is a pure function.
        assert_eq!(
            apply_hysteresis(DefenseCondition::Elevated, DefenseCondition::High, 2.99, &t, 0.0),
            DefenseCondition::Elevated
        );
    }

    #[test]
    fn test_engine_applies_hysteresis() {
        let config = ThreatConfig {
            hysteresis: 0.1,
            ..ThreatConfig::default()
        };
        let mut h = Harness::new(config);
        assert_eq!(h.tick(frame(vec![stationary(1, 4000.0, 0.5)])).condition, DefenseCondition::Mild);
        // An empty sky is within 0.1 of the Mild bound (0.05), so Mild holds.
        assert_eq!(h.tick(frame(vec![])).condition, DefenseCondition::Mild);

        let mut pure = Harness::new(ThreatConfig::default());
        pure.tick(frame(vec![stationary(1, 4000.0, 0.5)]));
        assert_eq!(pure.tick(frame(vec![])).condition, DefenseCondition::Calm);
    }

    // ---- Change detection and logging ----

    #[test]
    fn test_identical_ticks_do_not_relog() {
        let mut h = Harness::new(ThreatConfig::default());
        let f = frame(vec![stationary(1, 4000.0, 0.5), stationary(2, 6000.0, 2.0)]);
        assert!(h.tick(f.clone()).logged);
        assert!(!h.tick(f.clone()).logged);
        assert!(!h.tick(f).logged);
        assert_eq!(h.engine.event_log().len(), 1);

        // Changing one contact's score changes the fingerprint.
        let changed = frame(vec![stationary(1, 4000.0, 0.5), stationary(2, 6000.0, 9.0)]);
        let report = h.tick(changed);
        assert!(report.logged);
        assert_eq!(report.condition, DefenseCondition::Mild);
        assert_eq!(h.engine.event_log().len(), 2);
    }

    #[test]
    fn test_event_record_contents() {
        let mut h = Harness::new(ThreatConfig::default());
        h.tick(frame(vec![stationary(7, 4000.0, 0.5)]));
        let record = h.engine.event_log().latest().unwrap();
        assert_eq!(record.condition, DefenseCondition::Mild);
        assert_eq!(record.contacts.len(), 1);
        assert_eq!(record.contacts[0].id, 7);
        let text = h.engine.event_log().render_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], EVENT_LOG_SEPARATOR);
        assert!(lines[1].ends_with(">>> LEVEL 4 (0.489) <<<"));
        assert_eq!(lines[2], "  > Contact-7 :: 0.489 (4000m, 0.500 o/r)");
    }

    #[test]
    fn test_abandoned_tick_commits_nothing() {
        let mut h = Harness::new(ThreatConfig::default());
        let f = frame(vec![stationary(1, 4000.0, 0.5)]);
        assert!(h.tick(f.clone()).logged);

        h.damage.set(1000.0);
        let outage = ScriptedFrame {
            available: false,
            ..f.clone()
        };
        let report = h.tick(outage);
        assert_eq!(report.status, TickStatus::Abandoned);
        assert_eq!(report.condition, DefenseCondition::Calm);
        assert_eq!(h.engine.current_condition(), Some(DefenseCondition::Mild));
        assert_eq!(h.engine.event_log().len(), 1);

        // The damage baseline was not advanced by the abandoned tick.
        let next = h.tick(f);
        assert_eq!(next.condition, DefenseCondition::Critical);
    }

    #[test]
    fn test_log_is_bounded() {
        let mut log = EventLog::default();
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        for i in 0..150 {
            log.push(EventRecord {
                timestamp: at + Duration::seconds(i),
                condition: DefenseCondition::Mild,
                score: i as f64,
                contacts: vec![],
            });
        }
        assert_eq!(log.len(), EVENT_LOG_CAPACITY);
        assert_eq!(log.latest().unwrap().score, 149.0);
        assert_eq!(log.records().last().unwrap().score, 50.0);
        assert!(log.render_text().lines().count() <= EVENT_LOG_CAPACITY);
    }

    #[test]
    fn test_log_text_truncated_to_capacity_lines() {
        let mut log = EventLog::new(5);
        let contact = LoggedContact {
            id: 1,
            name: "A".into(),
            score: 1.0,
            distance: 10.0,
            offense_rating: 1.0,
        };
        log.push(EventRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            condition: DefenseCondition::High,
            score: 3.5,
            contacts: vec![contact; 10],
        });
        assert_eq!(log.render_text().lines().count(), 5);
    }

    // ---- Notification ----

    #[test]
    fn test_listeners_receive_level_tokens() {
        let mut h = Harness::new(ThreatConfig::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        h.engine.register_listener(Box::new(HookListener::new("alarm", move |n| {
            sink.borrow_mut().push(n.token.clone());
            Ok(())
        })));
        h.engine.register_listener(Box::new(HookListener::new("broken", |n| {
            Err(ListenerError {
                listener: "broken".into(),
                token: n.token.clone(),
                reason: "offline".into(),
            })
        })));

        let f = frame(vec![stationary(1, 4000.0, 0.5)]);
        h.tick(f.clone());
        h.tick(f);
        h.tick(frame(vec![]));
        assert_eq!(*seen.borrow(), vec!["LEVEL_4".to_string(), "LEVEL_5".to_string()]);
    }

    // ---- Broadcast ----

    #[test]
    fn test_locked_flag_from_managed_turret() {
        let mut h = Harness::new(ThreatConfig::default());
        let turret = ManagedTurret::new(h.engine.context(), DeviceHandle(500), "Railgun");
        h.engine.register_weapon(Box::new(turret));

        let mut f = frame(vec![stationary(1, 3000.0, 5.0), stationary(2, 3500.0, 5.0)]);
        f.weapon_targets.insert(500, 2);
        h.tick(f);

        let flags: Vec<(EntityId, u8)> = h.broadcasts.iter().map(|(_, t)| (t.id, t.flags)).collect();
        assert_eq!(flags, vec![(1, 9), (2, 9 | IFF_FLAG_LOCKED)]);
    }

    struct AimedTurret {
        shooting: bool,
        target: ContactSnapshot,
    }

    impl TurretDevice for AimedTurret {
        fn display_name(&self) -> String {
            "Interior Turret".into()
        }
        fn is_working(&self) -> bool {
            true
        }
        fn is_shooting(&self) -> bool {
            self.shooting
        }
        fn targeted_entity(&self) -> Option<ContactSnapshot> {
            Some(self.target.clone())
        }
    }

    #[test]
    fn test_locked_flag_requires_engaging_turret() {
        let target = stationary(1, 3000.0, 5.0);
        let mut idle = Harness::new(ThreatConfig::default());
        idle.engine.register_weapon(Box::new(StandardTurret::new(AimedTurret {
            shooting: false,
            target: target.contact.clone(),
        })));
        idle.tick(frame(vec![target.clone()]));
        assert_eq!(idle.broadcasts[0].1.flags & IFF_FLAG_LOCKED, 0);

        let mut firing = Harness::new(ThreatConfig::default());
        firing.engine.register_weapon(Box::new(StandardTurret::new(AimedTurret {
            shooting: true,
            target: target.contact.clone(),
        })));
        firing.tick(frame(vec![target]));
        assert_ne!(firing.broadcasts[0].1.flags & IFF_FLAG_LOCKED, 0);
    }

    #[test]
    fn test_custom_broadcast_channel() {
        let config = ThreatConfig {
            broadcast_channel: "IFF_ALT".into(),
            ..ThreatConfig::default()
        };
        let mut h = Harness::new(config);
        h.tick(frame(vec![stationary(1, 3000.0, 5.0)]));
        assert_eq!(h.broadcasts[0].0, "IFF_ALT");
    }

    // ---- Display ----

    #[test]
    fn test_status_text() {
        let mut h = Harness::new(ThreatConfig::default());
        let report = h.tick(frame(vec![]));
        let text = h.engine.status_text(&report);
        assert!(text.starts_with(">>>> LEVEL 5 <<<<"));
        assert!(text.contains("Error: No turrets registered."));
        assert!(text.contains("No Viable Threats Detected."));

        let report = h.tick(frame(vec![stationary(3, 4000.0, 0.5)]));
        let text = h.engine.status_text(&report);
        assert!(text.starts_with(">>>> LEVEL 4 <<<<"));
        assert!(text.contains("Name: Contact-3 [LargePlatform]"));
    }

    // ---- Fingerprint ----

    proptest! {
        #[test]
        fn prop_fingerprint_order_independent(
            entries in proptest::collection::vec((1i64..1000, 0.0f64..20.0), 0..12),
        ) {
            let mut reversed = entries.clone();
            reversed.reverse();
            prop_assert_eq!(fingerprint::of_entries(entries), fingerprint::of_entries(reversed));
        }

        #[test]
        fn prop_log_never_exceeds_capacity(pushes in 0usize..300) {
            let mut log = EventLog::default();
            let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            for i in 0..pushes {
                log.push(EventRecord {
                    timestamp: at,
                    condition: DefenseCondition::Calm,
                    score: i as f64,
                    contacts: vec![],
                });
            }
            prop_assert!(log.len() <= EVENT_LOG_CAPACITY);
            prop_assert_eq!(log.len(), pushes.min(EVENT_LOG_CAPACITY));
        }
    }
}
