//! Loop thread: runs the simulation engine at the base tick rate.
//!
//! The engine is created inside the thread and owned by it. Commands arrive
//! over an `mpsc` channel and are applied at the next tick boundary.
//! Snapshots go to the collaborator sink and to the shared latest-snapshot
//! slot. Dropping the handle shuts the loop down and joins the thread.

use std::io;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use perimeter_core::commands::OperatorCommand;
use perimeter_core::constants::TICK_RATE;
use perimeter_sim::{SimConfig, SimulationEngine};

use crate::sink::{self, CollaboratorSink};
use crate::state::{LoopCommand, SharedSnapshot};

/// Nominal duration of one tick at 1x speed.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Owner of the loop thread.
pub struct GameLoopHandle {
    tx: mpsc::Sender<LoopCommand>,
    thread: Option<JoinHandle<SimulationEngine>>,
}

impl GameLoopHandle {
    /// Forward an operator command. Returns false once the loop has stopped.
    pub fn send(&self, command: OperatorCommand) -> bool {
        self.tx.send(LoopCommand::Operator(command)).is_ok()
    }

    /// Stop the loop and take back the engine. `None` if the loop thread
    /// panicked.
    pub fn shutdown(mut self) -> Option<SimulationEngine> {
        self.stop()
    }

    fn stop(&mut self) -> Option<SimulationEngine> {
        let thread = self.thread.take()?;
        let _ = self.tx.send(LoopCommand::Shutdown);
        match thread.join() {
            Ok(engine) => Some(engine),
            Err(_) => {
                warn!("loop thread panicked");
                None
            }
        }
    }
}

impl Drop for GameLoopHandle {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

/// Spawn the loop thread.
pub fn spawn_game_loop(
    config: SimConfig,
    sink: Box<dyn CollaboratorSink>,
    latest_snapshot: SharedSnapshot,
) -> io::Result<GameLoopHandle> {
    let (tx, rx) = mpsc::channel::<LoopCommand>();

    let thread = std::thread::Builder::new()
        .name("perimeter-loop".into())
        .spawn(move || run_game_loop(config, sink, rx, &latest_snapshot))?;

    Ok(GameLoopHandle {
        tx,
        thread: Some(thread),
    })
}

/// Tick duration after applying the time scale. Non-positive scales run at
/// 1x.
pub fn scaled_tick_duration(time_scale: f64) -> Duration {
    if time_scale > 0.001 {
        TICK_DURATION.div_f64(time_scale)
    } else {
        TICK_DURATION
    }
}

/// Runs until Shutdown or channel disconnect, then returns the engine.
fn run_game_loop(
    config: SimConfig,
    mut sink: Box<dyn CollaboratorSink>,
    rx: mpsc::Receiver<LoopCommand>,
    latest_snapshot: &SharedSnapshot,
) -> SimulationEngine {
    info!(seed = config.seed, time_scale = config.time_scale, "loop started");
    let mut engine = SimulationEngine::new(config);
    let tick_duration = scaled_tick_duration(engine.time_scale());
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain pending commands
        loop {
            match rx.try_recv() {
                Ok(LoopCommand::Operator(command)) => engine.queue_command(command),
                Ok(LoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    info!(tick = engine.time().tick, "loop stopped");
                    return engine;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick
        let snapshot = engine.tick();

        // 3. Collaborators
        sink::deliver(sink.as_mut(), &snapshot);

        // 4. Latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 5. Sleep until the next tick
        next_tick_time += tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > tick_duration * 2 {
            // Too far behind, skip ahead instead of catching up
            debug!("loop behind schedule, resetting deadline");
            next_tick_time = now;
        }
    }
}
