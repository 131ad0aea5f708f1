//! Tests for the engine, detectors, log aggregation and export.

use chrono::{DateTime, Utc};
use glam::DVec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use perimeter_core::commands::OperatorCommand;
use perimeter_core::components::{CrossingState, EntityTag};
use perimeter_core::constants::*;
use perimeter_core::enums::*;
use perimeter_core::environment::*;
use perimeter_core::events::{CueEvent, LogEntry};
use perimeter_core::state::{EntityView, ThreatView};
use perimeter_core::types::GeoPoint;

use crate::alerts::{AlarmLatch, LogBook, LogFilter};
use crate::config::SimConfig;
use crate::detector::*;
use crate::engine::SimulationEngine;
use crate::export::{to_csv, to_json, ExportFormat, ExportRow};
use crate::random::{RandomSource, SequenceRandom};
use crate::schedule::IntervalTimer;
use crate::world_setup::{generate_threat, severity_from_draw};

/// Engine with no background spawning beyond the first threat.
fn quiet_config() -> SimConfig {
    SimConfig {
        spawn_interval_ms: 10_000_000,
        ..Default::default()
    }
}

fn scripted(values: Vec<f64>, config: SimConfig) -> SimulationEngine {
    SimulationEngine::with_random(config, Box::new(SequenceRandom::new(values)))
}

fn threat(engine: &SimulationEngine, id: u32) -> ThreatView {
    engine
        .active_entities()
        .into_iter()
        .find_map(|v| match v {
            EntityView::Threat(t) if t.id == id => Some(t),
            _ => None,
        })
        .expect("threat should exist")
}

fn run_ticks(engine: &mut SimulationEngine, n: usize) -> Vec<LogEntry> {
    let mut logs = Vec::new();
    for _ in 0..n {
        logs.extend(engine.tick().new_logs);
    }
    logs
}

fn entry(id: u64, kind: LogKind, severity: LogSeverity, message: &str) -> LogEntry {
    LogEntry {
        id,
        timestamp: DateTime::<Utc>::default(),
        kind,
        source_entity_id: None,
        sensor_kind: None,
        severity,
        message: message.to_string(),
    }
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = SimulationEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    });
    let mut engine_b = SimulationEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    });
    engine_a.queue_command(OperatorCommand::Start);
    engine_b.queue_command(OperatorCommand::Start);

    for _ in 0..1500 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = SimulationEngine::new(SimConfig {
        seed: 111,
        ..Default::default()
    });
    let mut engine_b = SimulationEngine::new(SimConfig {
        seed: 222,
        ..Default::default()
    });
    engine_a.start();
    engine_b.start();

    let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
    let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
    assert_ne!(json_a, json_b, "Different seeds should place the first threat differently");
}

// ---- Threat generation ----

#[test]
fn test_generated_threats_on_spawn_band_heading_home() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let base = BASE_POSITION;
    let r = LASER_RING_RADIUS;
    for _ in 0..200 {
        let seed = generate_threat(base, r, &mut rng, (APPROACH_FRACTION_MIN, APPROACH_FRACTION_MAX));
        let d = seed.position.planar_distance_to(&base);
        assert!(d >= 1.5 * r - 1e-12 && d <= 3.0 * r + 1e-12, "spawn distance {d}");

        // Velocity is parallel to, and points along, the line to the base
        let to_base = seed.position.delta_to(&base).as_vec();
        let v = seed.velocity.as_vec();
        assert!(to_base.perp_dot(v).abs() < 1e-15);
        assert!(to_base.dot(v) > 0.0);
        let fraction = v.length() / to_base.length();
        assert!((APPROACH_FRACTION_MIN..APPROACH_FRACTION_MAX).contains(&fraction));
    }
}

#[test]
fn test_scripted_threat_draws() {
    let mut rng = SequenceRandom::constant(1.0 / 3.0);
    let seed = generate_threat(BASE_POSITION, 0.003, &mut rng, (0.004, 0.012));
    assert!((seed.position.planar_distance_to(&BASE_POSITION) - 0.006).abs() < 1e-12);
    assert_eq!(seed.kind, ThreatKind::Vehicle);
    assert_eq!(seed.severity, Severity::Low);
}

#[test]
fn test_severity_split() {
    assert_eq!(severity_from_draw(0.0), Severity::Low);
    assert_eq!(severity_from_draw(0.69), Severity::Low);
    assert_eq!(severity_from_draw(0.7), Severity::Medium);
    assert_eq!(severity_from_draw(0.89), Severity::Medium);
    assert_eq!(severity_from_draw(0.9), Severity::High);
    assert_eq!(severity_from_draw(0.999), Severity::High);
}

#[test]
fn test_sequence_random_cycles() {
    let mut rng = SequenceRandom::new(vec![0.1, 0.2]);
    let draws: Vec<f64> = (0..5).map(|_| rng.next_f64()).collect();
    assert_eq!(draws, vec![0.1, 0.2, 0.1, 0.2, 0.1]);
    assert_eq!(SequenceRandom::new(Vec::new()).next_f64(), 0.0);
    assert_eq!(SequenceRandom::constant(0.999).index(5), 4);
}

// ---- Threat lifecycle ----

#[test]
fn test_threat_at_twice_radius_is_assessed_and_frozen() {
    let mut engine = scripted(vec![1.0 / 3.0], quiet_config());
    engine.start();
    engine.tick();

    let start = threat(&engine, 1);
    assert!((start.distance_deg - 2.0 * 0.003).abs() < 1e-12);
    assert_eq!(start.phase, ThreatPhase::Spawned);

    let mut assessed = None;
    for _ in 0..1000 {
        engine.tick();
        let t = threat(&engine, 1);
        if t.phase == ThreatPhase::Assessed {
            assessed = Some(t);
            break;
        }
        assert_ne!(t.phase, ThreatPhase::Expired);
    }
    let assessed = assessed.expect("threat should reach the site");
    assert_eq!(assessed.resolution, Some(Resolution::ReachedSite));
    assert!(assessed.distance_deg < 0.3 * 0.003);

    run_ticks(&mut engine, 50);
    let later = threat(&engine, 1);
    assert_eq!(later.position, assessed.position);
    assert_eq!(later.phase, ThreatPhase::Assessed);

    // Crossed every ring on the way in, once each, outermost first
    let breaches = engine.logs(LogFilter::Kind(LogKind::PerimeterBreach));
    let sensors: Vec<_> = breaches.iter().map(|e| e.sensor_kind).collect();
    assert_eq!(
        sensors,
        vec![Some(SensorKind::Radar), Some(SensorKind::Fiber), Some(SensorKind::Laser)]
    );
    assert!(breaches.iter().all(|e| e.source_entity_id == Some(1)));
    assert!(later.detected);
    assert_eq!(later.detected_by, Some(SensorKind::Laser));
    // Low severity never raises the alarm
    assert!(!engine.alarm_active());
}

#[test]
fn test_ring_breach_fires_once_while_inside() {
    let mut engine = scripted(vec![1.0 / 3.0], quiet_config());
    engine.start();
    let logs = run_ticks(&mut engine, 600);
    let laser: Vec<_> = logs
        .iter()
        .filter(|e| e.sensor_kind == Some(SensorKind::Laser))
        .collect();
    assert_eq!(laser.len(), 1);
}

#[test]
fn test_jump_inward_fires_every_ring_in_one_tick() {
    // distance, angle, kind, severity (high), fraction
    let mut engine = scripted(vec![1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0, 0.95, 1.0 / 3.0], quiet_config());
    engine.start();
    // First motion step records "outside" for every ring
    run_ticks(&mut engine, 5);
    assert!(engine.logs(LogFilter::All).is_empty());

    engine.move_entity(1, BASE_POSITION.lat, BASE_POSITION.lng);
    let mut snapshot = engine.tick();
    while snapshot.new_logs.is_empty() && snapshot.time.tick < 20 {
        snapshot = engine.tick();
    }
    assert_eq!(snapshot.new_logs.len(), 3);
    assert!(snapshot.new_logs.iter().all(|e| e.kind == LogKind::PerimeterBreach));
    assert!(snapshot.alarm_active);
    assert!(snapshot
        .cues
        .iter()
        .any(|c| matches!(c, CueEvent::Alarm { entity_id: 1, severity: Severity::High })));
    assert_eq!(engine.logs(LogFilter::Alerts).len(), 3);

    // Landing on the base also assesses it on the same step
    assert_eq!(threat(&engine, 1).phase, ThreatPhase::Assessed);
}

#[test]
fn test_inactive_sensor_tracks_state_silently() {
    let mut engine = scripted(vec![1.0 / 3.0], quiet_config());
    engine.update_sensor(
        SensorKind::Fiber,
        SensorPatch {
            status: Some(SensorStatus::Standby),
            ..Default::default()
        },
    );
    engine.start();
    run_ticks(&mut engine, 5);
    engine.move_entity(1, BASE_POSITION.lat, BASE_POSITION.lng);
    run_ticks(&mut engine, 10);

    let breaches = engine.logs(LogFilter::Kind(LogKind::PerimeterBreach));
    let sensors: Vec<_> = breaches.iter().filter_map(|e| e.sensor_kind).collect();
    assert_eq!(sensors, vec![SensorKind::Radar, SensorKind::Laser]);
}

#[test]
fn test_active_cap() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let ids: Vec<_> = (0..7).map(|_| engine.spawn_threat()).collect();
    assert_eq!(ids.iter().filter(|id| id.is_some()).count(), MAX_ACTIVE_THREATS);
    assert_eq!(ids[5], None);
    assert_eq!(ids[6], None);

    // Figures do not count, assessed threats free a slot
    engine.place_entity(FigureKind::Car, 10.0, 10.0);
    assert_eq!(engine.spawn_threat(), None);
    engine.assess_threat(1, Resolution::Dismissed);
    assert!(engine.spawn_threat().is_some());
}

#[test]
fn test_assess_threat_freezes() {
    let mut engine = SimulationEngine::new(quiet_config());
    engine.start();
    run_ticks(&mut engine, 10);
    engine.assess_threat(1, Resolution::Investigating);
    let frozen = threat(&engine, 1);
    assert_eq!(frozen.resolution, Some(Resolution::Investigating));
    run_ticks(&mut engine, 20);
    assert_eq!(threat(&engine, 1).position, frozen.position);

    // Already assessed: resolution is not overwritten
    engine.assess_threat(1, Resolution::Dismissed);
    assert_eq!(threat(&engine, 1).resolution, Some(Resolution::Investigating));
}

#[test]
fn test_ttl_expiry_and_cleanup() {
    let mut engine = SimulationEngine::new(SimConfig {
        threat_ttl_ms: 2_000,
        cleanup_interval_ms: 3_000,
        ..quiet_config()
    });
    engine.start();
    run_ticks(&mut engine, 21);
    let expired = threat(&engine, 1);
    assert_eq!(expired.phase, ThreatPhase::Expired);

    run_ticks(&mut engine, 5);
    assert_eq!(threat(&engine, 1).position, expired.position);

    run_ticks(&mut engine, 10);
    assert!(engine.active_entities().is_empty());
}

#[test]
fn test_reset_disarms_timers() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.start();
    run_ticks(&mut engine, 10);
    assert!(engine.timers_armed());
    engine.update_environment(EnvironmentPatch {
        weather: Some(Weather::Rain),
        ..Default::default()
    });

    engine.reset_all();
    assert!(!engine.timers_armed());
    assert_eq!(engine.phase(), SimPhase::Idle);
    assert!(engine.active_entities().is_empty());
    assert!(engine.logs(LogFilter::All).is_empty());
    assert!(!engine.alarm_active());
    // Environment survives a reset
    assert_eq!(engine.environment().weather, Weather::Rain);

    // Well past the spawn interval
    run_ticks(&mut engine, 700);
    assert!(engine.active_entities().is_empty());

    engine.start();
    assert_eq!(engine.active_entities().len(), 1);
}

#[test]
fn test_pause_stops_clock() {
    let mut engine = SimulationEngine::new(quiet_config());
    engine.start();
    run_ticks(&mut engine, 10);
    engine.pause();
    let time = engine.time();
    let before = threat(&engine, 1);
    run_ticks(&mut engine, 100);
    assert_eq!(engine.time(), time);
    assert_eq!(threat(&engine, 1).position, before.position);

    engine.queue_command(OperatorCommand::Resume);
    run_ticks(&mut engine, 10);
    assert_eq!(engine.phase(), SimPhase::Running);
    assert!(engine.time().tick > time.tick);
}

#[test]
fn test_unknown_ids_are_ignored() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.move_entity(99, 1.0, 2.0);
    engine.remove_entity(99);
    engine.assess_threat(99, Resolution::Dismissed);
    assert!(engine.active_entities().is_empty());
}

// ---- Beam grid ----

fn deer_engine() -> (SimulationEngine, u32) {
    let mut engine = SimulationEngine::new(SimConfig {
        max_active_threats: 0,
        ..Default::default()
    });
    let id = engine.place_entity(FigureKind::Deer, 350.0, 150.0);
    (engine, id)
}

#[test]
fn test_beam_pass_fires_once() {
    let (mut engine, id) = deer_engine();
    engine.move_entity(id, 450.0, 150.0);
    let crossings = engine.logs(LogFilter::Kind(LogKind::LaserCrossing));
    assert_eq!(crossings.len(), 1);
    // Deer spans y 150..230: beams at 160 and 220
    assert!(crossings[0].message.contains("beams 2, 3"), "{}", crossings[0].message);
    assert_eq!(crossings[0].severity, LogSeverity::Medium);

    // Already past the line
    engine.move_entity(id, 500.0, 150.0);
    assert_eq!(engine.logs(LogFilter::Kind(LogKind::LaserCrossing)).len(), 1);
}

#[test]
fn test_beam_oscillation_fires_each_pass() {
    let (mut engine, id) = deer_engine();
    for x in [390.0, 410.0, 390.0, 410.0] {
        engine.move_entity(id, x, 150.0);
    }
    assert_eq!(engine.logs(LogFilter::Kind(LogKind::LaserCrossing)).len(), 2);
}

#[test]
fn test_beam_cues_and_alarm() {
    let (mut engine, id) = deer_engine();
    engine.start();
    engine.move_entity(id, 450.0, 150.0);
    let snapshot = engine.tick();
    assert!(snapshot.alarm_active);
    assert!(snapshot
        .cues
        .iter()
        .any(|c| matches!(c, CueEvent::LaserTone { beams, .. } if beams == &vec![2, 3])));

    // Dwell is 5 s on the simulation clock
    let mut cleared = false;
    for _ in 0..60 {
        let s = engine.tick();
        if s.cues.contains(&CueEvent::AlarmCleared) {
            cleared = true;
            assert!(!s.alarm_active);
            break;
        }
    }
    assert!(cleared);
}

#[test]
fn test_beam_alarm_clears_without_start() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let id = engine.place_entity(FigureKind::Deer, 350.0, 90.0);
    engine.move_entity(id, 450.0, 90.0);
    assert!(engine.alarm_active());

    let mut cleared = false;
    for _ in 0..60 {
        if engine.tick().cues.contains(&CueEvent::AlarmCleared) {
            cleared = true;
            break;
        }
    }
    assert!(cleared);
    assert!(!engine.alarm_active());
    // Simulation clock stays put while idle
    assert_eq!(engine.phase(), SimPhase::Idle);
    assert_eq!(engine.time().elapsed_ms, 0);
    assert!(engine.clock_ms() >= ALARM_DWELL_MS);

    engine.move_entity(id, 350.0, 90.0);
    run_ticks(&mut engine, 10);
    engine.move_entity(id, 450.0, 90.0);
    let crossings = engine.logs(LogFilter::Kind(LogKind::LaserCrossing));
    assert_eq!(crossings.len(), 2);
    assert!(crossings[0].timestamp > crossings[1].timestamp);
}

#[test]
fn test_figure_tracks_beam_line_side() {
    let (mut engine, id) = deer_engine();
    let side = |engine: &SimulationEngine| {
        engine
            .world()
            .query::<(&EntityTag, &CrossingState)>()
            .iter()
            .find(|(_, (tag, _))| tag.id == id)
            .map(|(_, (_, state))| state.inside)
            .expect("figure should exist")
    };
    assert_eq!(side(&engine), None);
    engine.move_entity(id, 450.0, 150.0);
    assert_eq!(side(&engine), Some(true));
    engine.move_entity(id, 300.0, 150.0);
    assert_eq!(side(&engine), Some(false));
}

#[test]
fn test_low_severity_figure_does_not_alarm() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let id = engine.place_entity(FigureKind::Rabbit, 300.0, 90.0);
    engine.move_entity(id, 420.0, 90.0);
    assert_eq!(engine.logs(LogFilter::All).len(), 1);
    assert!(!engine.alarm_active());
}

#[test]
fn test_standby_laser_suppresses_beam_events() {
    let (mut engine, id) = deer_engine();
    engine.update_sensor(
        SensorKind::Laser,
        SensorPatch {
            status: Some(SensorStatus::Standby),
            ..Default::default()
        },
    );
    engine.move_entity(id, 450.0, 150.0);
    assert!(engine.logs(LogFilter::Kind(LogKind::LaserCrossing)).is_empty());
}

#[test]
fn test_beam_grid_detector() {
    let grid = BeamGrid::default();
    let mut state = CrossingState::default();
    let sample = MotionSample {
        previous: DVec2::new(350.0, 150.0),
        current: DVec2::new(450.0, 150.0),
        extent: DVec2::new(60.0, 80.0),
        speed_factor: 15.0,
    };
    match grid.evaluate(&sample, &mut state) {
        Some(Crossing::Beams { beams, speed }) => {
            assert_eq!(beams, vec![2, 3]);
            assert!((speed - 150.0).abs() < 1e-9);
        }
        other => panic!("expected beams, got {other:?}"),
    }

    // Landing exactly on the line counts
    let onto = MotionSample {
        previous: DVec2::new(399.0, 95.0),
        current: DVec2::new(400.0, 95.0),
        ..sample
    };
    assert!(matches!(grid.evaluate(&onto, &mut state), Some(Crossing::Beams { ref beams, .. }) if beams == &vec![1, 2]));

    // Span misses every beam
    let high = MotionSample {
        previous: DVec2::new(350.0, 10.0),
        current: DVec2::new(450.0, 10.0),
        extent: DVec2::new(30.0, 20.0),
        ..sample
    };
    assert_eq!(grid.evaluate(&high, &mut state), None);

    // Right to left never fires
    let back = MotionSample {
        previous: DVec2::new(450.0, 150.0),
        current: DVec2::new(350.0, 150.0),
        ..sample
    };
    assert_eq!(grid.evaluate(&back, &mut state), None);

    let empty = BeamGrid {
        line_x: 400.0,
        beams: Vec::new(),
    };
    assert_eq!(empty.evaluate(&sample, &mut state), None);
}

#[test]
fn test_ring_detector_edges() {
    let ring = RingPerimeter {
        sensor: SensorKind::Laser,
        center: BASE_POSITION,
        radius: 0.003,
    };
    let inside = GeoPoint::new(BASE_POSITION.lat + 0.001, BASE_POSITION.lng);
    let outside = GeoPoint::new(BASE_POSITION.lat + 0.004, BASE_POSITION.lng);

    // First evaluation only records
    let mut state = CrossingState::default();
    assert_eq!(ring.evaluate(&MotionSample::geo(inside, inside), &mut state), None);
    assert_eq!(state.inside, Some(true));

    let mut state = CrossingState::default();
    assert_eq!(ring.evaluate(&MotionSample::geo(outside, outside), &mut state), None);
    assert_eq!(
        ring.evaluate(&MotionSample::geo(outside, inside), &mut state),
        Some(Crossing::Entered)
    );
    assert_eq!(ring.evaluate(&MotionSample::geo(inside, inside), &mut state), None);
    // Leaving is silent, re-entering fires again
    assert_eq!(ring.evaluate(&MotionSample::geo(inside, outside), &mut state), None);
    assert_eq!(
        ring.evaluate(&MotionSample::geo(outside, inside), &mut state),
        Some(Crossing::Entered)
    );
}

// ---- Log and alarm ----

#[test]
fn test_log_cap_keeps_newest() {
    let mut book = LogBook::new(8, DateTime::<Utc>::default());
    for i in 0..20 {
        let patch = EnvironmentPatch {
            temperature: Some(i as f64),
            ..Default::default()
        };
        book.record_environment_change(&patch, i * 100);
    }
    let entries = book.list(LogFilter::All);
    assert_eq!(entries.len(), 8);
    let ids: Vec<u64> = entries.iter().map(|e| e.id).collect();
    assert_eq!(ids, (13..=20).rev().collect::<Vec<u64>>());
}

#[test]
fn test_log_capacity_clamped() {
    assert_eq!(LogBook::new(1000, DateTime::<Utc>::default()).capacity(), MAX_LOG_CAPACITY);
    assert_eq!(LogBook::new(2, DateTime::<Utc>::default()).capacity(), MIN_LOG_CAPACITY);
}

#[test]
fn test_log_timestamps_follow_sim_clock() {
    let epoch: DateTime<Utc> = "2024-05-01T12:00:00Z".parse().unwrap();
    let mut book = LogBook::new(10, epoch);
    let e = book.record_sensor_change(SensorKind::Camera, &SensorPatch::default(), 2_500);
    assert_eq!(e.timestamp.to_rfc3339(), "2024-05-01T12:00:02.500+00:00");
    assert_eq!(e.sensor_kind, Some(SensorKind::Camera));
    assert_eq!(e.severity, LogSeverity::Info);
}

#[test]
fn test_log_filters() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.update_environment(EnvironmentPatch {
        weather: Some(Weather::Fog),
        ..Default::default()
    });
    engine.update_sensor(
        SensorKind::Camera,
        SensorPatch {
            sensitivity: Some(Sensitivity::High),
            ..Default::default()
        },
    );
    let bear = engine.place_entity(FigureKind::Bear, 380.0, 100.0);
    engine.move_entity(bear, 420.0, 100.0);
    let rabbit = engine.place_entity(FigureKind::Rabbit, 380.0, 150.0);
    engine.move_entity(rabbit, 420.0, 150.0);

    assert_eq!(engine.logs(LogFilter::All).len(), 4);
    assert_eq!(engine.logs(LogFilter::System).len(), 2);
    let alerts = engine.logs(LogFilter::Alerts);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].source_entity_id, Some(bear));
    assert_eq!(engine.logs(LogFilter::Kind(LogKind::LaserCrossing)).len(), 2);
    assert_eq!(engine.logs(LogFilter::Kind(LogKind::SensorConfigChange)).len(), 1);

    engine.clear_logs();
    assert!(engine.logs(LogFilter::All).is_empty());
    // Entries recorded before the clear do not resurface in the next snapshot
    assert!(engine.tick().new_logs.is_empty());
}

#[test]
fn test_environment_update_logs_applied_patch() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let env = engine.update_environment(EnvironmentPatch {
        temperature: Some(80.0),
        ..Default::default()
    });
    assert_eq!(env.temperature, 50.0);
    let logs = engine.logs(LogFilter::Kind(LogKind::EnvironmentChange));
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].message, r#"{"temperature":50.0}"#);

    // Nothing to apply, nothing logged
    engine.update_environment(EnvironmentPatch::default());
    assert_eq!(engine.logs(LogFilter::All).len(), 1);

    engine.update_environment(EnvironmentPatch {
        weather: Some(Weather::Fog),
        ..Default::default()
    });
    let p = engine.sensor_priorities();
    assert_eq!((p.radar, p.fiber, p.laser, p.camera), (Priority::High, Priority::High, Priority::Medium, Priority::Low));
    assert!((engine.effective_ranges().laser - 35.0).abs() < 1e-9);
    assert!(engine.warnings()[0].starts_with("Fog"));
    assert!(engine.effectiveness().camera < 1.0);
}

#[test]
fn test_alarm_latch_dwell_and_retrigger() {
    let mut alarm = AlarmLatch::new(5_000);
    assert!(!alarm.is_active());
    alarm.trigger(1_000);
    assert!(!alarm.update(5_999));
    alarm.trigger(4_000);
    // Original deadline passed, retrigger holds it
    assert!(!alarm.update(6_500));
    assert!(alarm.is_active());
    assert!(alarm.update(9_000));
    assert!(!alarm.is_active());
    // Falling edge only once
    assert!(!alarm.update(10_000));

    assert!(AlarmLatch::should_trigger(Severity::Medium));
    assert!(!AlarmLatch::should_trigger(Severity::Low));
}

// ---- Timers ----

#[test]
fn test_interval_timer() {
    let mut timer = IntervalTimer::new(500);
    assert!(!timer.poll(10_000));
    timer.arm(0);
    assert!(!timer.poll(499));
    assert!(timer.poll(500));
    assert!(!timer.poll(999));
    assert!(timer.poll(1_000));
    timer.disarm();
    assert!(!timer.poll(1_500));
}

// ---- Commands ----

#[test]
fn test_commands_apply_at_tick_boundary() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_commands([
        OperatorCommand::PlaceEntity {
            kind: FigureKind::Soldier,
            x: 390.0,
            y: 300.0,
        },
        OperatorCommand::MoveEntity {
            id: 1,
            x: 410.0,
            y: 300.0,
        },
    ]);
    assert!(engine.active_entities().is_empty());

    let snapshot = engine.tick();
    assert_eq!(snapshot.entities.len(), 1);
    assert_eq!(snapshot.new_logs.len(), 1);
    assert_eq!(snapshot.new_logs[0].severity, LogSeverity::High);

    engine.queue_command(OperatorCommand::RemoveEntity { id: 1 });
    assert!(engine.tick().entities.is_empty());
}

// ---- Export ----

#[test]
fn test_csv_and_json_exports_agree() {
    let mut breach = entry(2, LogKind::PerimeterBreach, LogSeverity::High, r#"Breach at "Zone A", sector 2"#);
    breach.source_entity_id = Some(4);
    breach.sensor_kind = Some(SensorKind::Fiber);
    let entries = vec![breach, entry(1, LogKind::EnvironmentChange, LogSeverity::Info, r#"{"weather":"fog"}"#)];

    let csv_bytes = to_csv(&entries).unwrap();
    let text = String::from_utf8(csv_bytes.clone()).unwrap();
    assert!(text.starts_with("\"id\",\"timestamp\""), "{text}");
    assert!(text.contains(r#""Breach at ""Zone A"", sector 2""#), "{text}");

    let mut reader = csv::Reader::from_reader(csv_bytes.as_slice());
    let from_csv: Vec<ExportRow> = reader.deserialize().collect::<Result<_, _>>().unwrap();
    let from_json: Vec<ExportRow> = serde_json::from_slice(&to_json(&entries).unwrap()).unwrap();

    assert_eq!(from_csv, from_json);
    assert_eq!(from_csv.len(), 2);
    assert_eq!(from_csv[0].message, r#"Breach at "Zone A", sector 2"#);
    assert_eq!(from_csv[0].sensor_kind, Some(SensorKind::Fiber));
    assert_eq!(from_csv[1].source_entity_id, None);
}

#[test]
fn test_engine_export() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.update_environment(EnvironmentPatch {
        wind_speed: Some(70.0),
        ..Default::default()
    });
    let json = engine.export_logs(ExportFormat::Json).unwrap();
    let rows: Vec<ExportRow> = serde_json::from_slice(&json).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind, LogKind::EnvironmentChange);
    assert_eq!(rows[0].timestamp, "1970-01-01T00:00:00.000Z");

    let empty = SimulationEngine::new(SimConfig::default());
    let csv_bytes = empty.export_logs(ExportFormat::Csv).unwrap();
    let mut reader = csv::Reader::from_reader(csv_bytes.as_slice());
    let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
    assert_eq!(
        headers,
        ["id", "timestamp", "kind", "source_entity_id", "sensor_kind", "severity", "message"]
    );
    assert_eq!(reader.records().count(), 0);
}
