//! Simulation engine.
//!
//! `SimulationEngine` owns the hecs world, the timers, the random source,
//! the environment model and the log. It applies operator commands at tick
//! boundaries, runs the timer-driven systems, and produces `SimSnapshot`s.
//! Headless and single-threaded, so every test constructs its own.

use std::collections::VecDeque;

use glam::DVec2;
use hecs::{Entity, World};
use tracing::{debug, info};

use perimeter_core::commands::OperatorCommand;
use perimeter_core::components::{Figure, GeoTrack, Threat, ThreatProfile};
use perimeter_core::enums::*;
use perimeter_core::environment::*;
use perimeter_core::events::{CrossingDetail, CrossingEvent, CueEvent, LogEntry};
use perimeter_core::state::{EntityView, SimSnapshot};
use perimeter_core::types::{GeoPoint, SimTime};
use perimeter_environment::{EnvironmentModel, SensorPriorities};

use crate::alerts::{AlarmLatch, LogBook, LogFilter};
use crate::config::SimConfig;
use crate::detector::{site_rings, BeamGrid, RingPerimeter};
use crate::error::SimResult;
use crate::export::{self, ExportFormat};
use crate::random::{self, RandomSource};
use crate::schedule::{TimerId, TimerSet};
use crate::systems;
use crate::world_setup;

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    config: SimConfig,
    world: World,
    time: SimTime,
    /// Advances on every tick whatever the phase. Stamps log entries and
    /// times the alarm dwell.
    clock: SimTime,
    phase: SimPhase,
    rng: Box<dyn RandomSource>,
    timers: TimerSet,
    next_entity_id: u32,
    command_queue: VecDeque<OperatorCommand>,
    despawn_buffer: Vec<Entity>,

    environment: EnvironmentModel,
    rings: [RingPerimeter; 3],
    beam_grid: BeamGrid,

    log: LogBook,
    alarm: AlarmLatch,
    /// Entries recorded since the last snapshot, oldest first.
    pending_logs: Vec<LogEntry>,
    cues: Vec<CueEvent>,
}

impl SimulationEngine {
    /// Create an engine with a ChaCha8 source seeded from the config.
    pub fn new(config: SimConfig) -> Self {
        let rng = random::seeded(config.seed);
        Self::with_random(config, rng)
    }

    /// Create an engine drawing from the given source.
    pub fn with_random(config: SimConfig, rng: Box<dyn RandomSource>) -> Self {
        let rings = site_rings(
            config.base_position,
            config.laser_ring_radius,
            config.fiber_ring_radius,
            config.radar_ring_radius,
        );
        Self {
            world: World::new(),
            time: SimTime::default(),
            clock: SimTime::default(),
            phase: SimPhase::Idle,
            rng,
            timers: TimerSet::new(&config),
            next_entity_id: 1,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            environment: EnvironmentModel::new(config.environment, SensorSuite::with_defaults()),
            rings,
            beam_grid: BeamGrid::default(),
            log: LogBook::new(config.log_capacity, config.epoch),
            alarm: AlarmLatch::new(config.alarm_dwell_ms),
            pending_logs: Vec::new(),
            cues: Vec::new(),
            config,
        }
    }

    /// Queue an operator command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: OperatorCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = OperatorCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance one base tick and return the resulting snapshot. The
    /// simulation clock and timers only advance while running.
    pub fn tick(&mut self) -> SimSnapshot {
        self.process_commands();

        self.clock.advance();
        if self.phase == SimPhase::Running {
            self.time.advance();
            self.run_systems();
        }

        if self.alarm.update(self.clock.elapsed_ms) {
            debug!("alarm cleared");
            self.cues.push(CueEvent::AlarmCleared);
        }

        let mut new_logs = std::mem::take(&mut self.pending_logs);
        new_logs.reverse();
        let cues = std::mem::take(&mut self.cues);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            self.config.base_position,
            &self.environment,
            self.alarm.is_active(),
            new_logs,
            cues,
        )
    }

    // ---- Run control ----

    /// Arm the timers and spawn the first threat. From `Paused` this
    /// resumes; while running it does nothing.
    pub fn start(&mut self) {
        match self.phase {
            SimPhase::Running => {}
            SimPhase::Paused => self.resume(),
            SimPhase::Idle => {
                info!(seed = self.config.seed, "simulation started");
                self.phase = SimPhase::Running;
                self.timers.arm_all(self.time.elapsed_ms);
                self.spawn_threat();
            }
        }
    }

    pub fn pause(&mut self) {
        if self.phase == SimPhase::Running {
            info!(tick = self.time.tick, "simulation paused");
            self.phase = SimPhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == SimPhase::Paused {
            info!(tick = self.time.tick, "simulation resumed");
            self.phase = SimPhase::Running;
        }
    }

    /// Disarm every timer, then drop all entities, log entries and the
    /// alarm. Environment and sensor settings are kept.
    pub fn reset_all(&mut self) {
        self.timers.disarm_all();
        self.world.clear();
        self.log.clear();
        self.alarm.reset();
        self.pending_logs.clear();
        self.cues.clear();
        self.phase = SimPhase::Idle;
        info!(tick = self.time.tick, "simulation reset");
    }

    // ---- Entities ----

    /// Spawn a threat on the spawn band. `None` at capacity.
    pub fn spawn_threat(&mut self) -> Option<u32> {
        systems::spawner::run(
            &mut self.world,
            self.rng.as_mut(),
            &self.config,
            &mut self.next_entity_id,
            self.time.elapsed_ms,
        )
    }

    /// Place a figure with its reference point at (x, y).
    pub fn place_entity(&mut self, kind: FigureKind, x: f64, y: f64) -> u32 {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        world_setup::place_figure(&mut self.world, id, self.time.elapsed_ms, kind, DVec2::new(x, y));
        debug!(id, ?kind, x, y, "figure placed");
        id
    }

    /// Relocate an entity. Figures are checked against the beam grid
    /// immediately; a live threat takes `x` as latitude and `y` as
    /// longitude and is checked against the rings on its next motion step.
    /// Unknown ids and frozen threats are ignored.
    pub fn move_entity(&mut self, id: u32, x: f64, y: f64) {
        let Some(entity) = world_setup::find_entity(&self.world, id) else {
            return;
        };

        if self.world.satisfies::<&Figure>(entity).unwrap_or(false) {
            let moved = systems::perimeter::move_figure(
                &mut self.world,
                &self.beam_grid,
                self.environment.sensors(),
                entity,
                DVec2::new(x, y),
            );
            if let Some(Some(event)) = moved {
                self.record_crossing(event);
            }
            return;
        }

        if let Ok((_threat, profile, track)) =
            self.world.query_one_mut::<(&Threat, &ThreatProfile, &mut GeoTrack)>(entity)
        {
            if profile.is_live() {
                track.position = GeoPoint::new(x, y);
            }
        }
    }

    pub fn remove_entity(&mut self, id: u32) {
        if let Some(entity) = world_setup::find_entity(&self.world, id) {
            let _ = self.world.despawn(entity);
            debug!(id, "entity removed");
        }
    }

    /// Resolve a live threat. It stops moving and raises nothing further.
    pub fn assess_threat(&mut self, id: u32, resolution: Resolution) {
        let Some(entity) = world_setup::find_entity(&self.world, id) else {
            return;
        };
        if let Ok(profile) = self.world.query_one_mut::<&mut ThreatProfile>(entity) {
            if profile.is_live() {
                profile.phase = ThreatPhase::Assessed;
                profile.resolution = Some(resolution);
                info!(id, ?resolution, "threat assessed");
            }
        }
    }

    /// Every entity, sorted by id.
    pub fn active_entities(&self) -> Vec<EntityView> {
        systems::snapshot::build_entities(&self.world, self.config.base_position, self.time.elapsed_ms)
    }

    // ---- Environment and sensors ----

    /// Merge a partial update. Non-empty updates are logged.
    pub fn update_environment(&mut self, patch: EnvironmentPatch) -> Environment {
        if let Some(applied) = self.environment.update_environment(&patch) {
            let entry = self.log.record_environment_change(&applied, self.clock.elapsed_ms);
            info!(message = %entry.message, "environment changed");
            self.pending_logs.push(entry);
        }
        *self.environment.environment()
    }

    pub fn environment(&self) -> Environment {
        *self.environment.environment()
    }

    pub fn sensor_priorities(&self) -> SensorPriorities {
        *self.environment.priorities()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.environment.warnings().to_vec()
    }

    pub fn effectiveness(&self) -> SensorTable<f64> {
        *self.environment.effectiveness()
    }

    pub fn effective_ranges(&self) -> SensorTable<f64> {
        *self.environment.effective_ranges()
    }

    /// Merge a sensor update. Non-empty updates are logged.
    pub fn update_sensor(&mut self, sensor: SensorKind, patch: SensorPatch) -> SensorConfig {
        if let Some(applied) = self.environment.update_sensor(sensor, &patch) {
            let entry = self.log.record_sensor_change(sensor, &applied, self.clock.elapsed_ms);
            info!(%sensor, message = %entry.message, "sensor configuration changed");
            self.pending_logs.push(entry);
        }
        self.environment.sensor(sensor)
    }

    pub fn sensors(&self) -> SensorSuite {
        *self.environment.sensors()
    }

    // ---- Log and alarm ----

    /// Log entries matching `filter`, newest first.
    pub fn logs(&self, filter: LogFilter) -> Vec<LogEntry> {
        self.log.list(filter)
    }

    pub fn alarm_active(&self) -> bool {
        self.alarm.is_active()
    }

    pub fn clear_logs(&mut self) {
        self.log.clear();
        self.pending_logs.clear();
    }

    /// Export the whole log, newest first.
    pub fn export_logs(&self, format: ExportFormat) -> SimResult<Vec<u8>> {
        let entries = self.log.list(LogFilter::All);
        export::export(&entries, format)
    }

    // ---- Accessors ----

    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Milliseconds of ticks since construction, paused or not.
    pub fn clock_ms(&self) -> u64 {
        self.clock.elapsed_ms
    }

    pub fn time_scale(&self) -> f64 {
        self.config.time_scale
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Read-only access to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// True while any timer would still fire.
    pub fn timers_armed(&self) -> bool {
        self.timers.any_armed()
    }

    // ---- Internals ----

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: OperatorCommand) {
        match command {
            OperatorCommand::Start => self.start(),
            OperatorCommand::Pause => self.pause(),
            OperatorCommand::Resume => self.resume(),
            OperatorCommand::ResetAll => self.reset_all(),
            OperatorCommand::SpawnThreat => {
                self.spawn_threat();
            }
            OperatorCommand::PlaceEntity { kind, x, y } => {
                self.place_entity(kind, x, y);
            }
            OperatorCommand::MoveEntity { id, x, y } => self.move_entity(id, x, y),
            OperatorCommand::RemoveEntity { id } => self.remove_entity(id),
            OperatorCommand::AssessThreat { id, resolution } => self.assess_threat(id, resolution),
            OperatorCommand::UpdateEnvironment { patch } => {
                self.update_environment(patch);
            }
            OperatorCommand::UpdateSensor { sensor, patch } => {
                self.update_sensor(sensor, patch);
            }
            OperatorCommand::ClearLogs => self.clear_logs(),
        }
    }

    /// Log a crossing, emit its cue, and raise the alarm unless low.
    fn record_crossing(&mut self, event: CrossingEvent) {
        let now = self.clock.elapsed_ms;
        let entry = self.log.record_crossing(&event, now);
        self.pending_logs.push(entry);

        if let CrossingDetail::Beams { beams, .. } = &event.detail {
            self.cues.push(CueEvent::LaserTone {
                entity_id: event.entity_id,
                beams: beams.clone(),
            });
        }
        if AlarmLatch::should_trigger(event.severity) {
            self.alarm.trigger(now);
            self.cues.push(CueEvent::Alarm {
                entity_id: event.entity_id,
                severity: event.severity,
            });
        }
    }

    /// Run whichever timers are due, in order.
    fn run_systems(&mut self) {
        let now = self.time.elapsed_ms;
        for timer in self.timers.due(now) {
            match timer {
                TimerId::Motion => {
                    let moved = systems::movement::run(&mut self.world, &self.config, now);
                    for step in moved.iter().filter(|m| m.reached_site) {
                        debug!(?step.entity, "threat reached site");
                    }
                    let events = systems::perimeter::run(
                        &mut self.world,
                        &self.rings,
                        self.environment.sensors(),
                        &moved,
                    );
                    for event in events {
                        self.record_crossing(event);
                    }
                }
                TimerId::Spawn => {
                    self.spawn_threat();
                }
                TimerId::Cleanup => {
                    let removed = systems::cleanup::run(
                        &mut self.world,
                        &mut self.despawn_buffer,
                        self.config.threat_ttl_ms,
                        now,
                    );
                    if !removed.is_empty() {
                        debug!(?removed, "expired threats dropped");
                    }
                }
            }
        }
    }
}
