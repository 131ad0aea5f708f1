//! Collaborator sinks: where snapshots and cues go after each tick.
//!
//! A failing sink never stops the loop; the loop logs the error and moves
//! on.

use std::sync::mpsc;

use anyhow::{anyhow, Result};
use tracing::{info, warn};

use perimeter_core::events::CueEvent;
use perimeter_core::state::SimSnapshot;

pub trait CollaboratorSink: Send {
    /// Called once per tick with the fresh snapshot.
    fn on_snapshot(&mut self, snapshot: &SimSnapshot) -> Result<()>;

    /// Called for each cue in the snapshot, in order.
    fn on_cue(&mut self, _cue: &CueEvent) -> Result<()> {
        Ok(())
    }
}

/// Deliver one tick to a sink, swallowing failures.
pub fn deliver(sink: &mut dyn CollaboratorSink, snapshot: &SimSnapshot) {
    if let Err(e) = sink.on_snapshot(snapshot) {
        warn!(tick = snapshot.time.tick, "snapshot sink failed: {e:#}");
    }
    for cue in &snapshot.cues {
        if let Err(e) = sink.on_cue(cue) {
            warn!(tick = snapshot.time.tick, ?cue, "cue sink failed: {e:#}");
        }
    }
}

/// Writes new log entries and cues to the tracing subscriber.
#[derive(Debug, Default)]
pub struct TracingSink;

impl CollaboratorSink for TracingSink {
    fn on_snapshot(&mut self, snapshot: &SimSnapshot) -> Result<()> {
        // new_logs is newest first
        for entry in snapshot.new_logs.iter().rev() {
            info!(
                id = entry.id,
                kind = ?entry.kind,
                severity = ?entry.severity,
                "{}",
                entry.message
            );
        }
        Ok(())
    }

    fn on_cue(&mut self, cue: &CueEvent) -> Result<()> {
        match cue {
            CueEvent::LaserTone { entity_id, beams } => info!(entity_id, ?beams, "laser tone"),
            CueEvent::Alarm { entity_id, severity } => warn!(entity_id, ?severity, "ALARM"),
            CueEvent::AlarmCleared => info!("alarm cleared"),
        }
        Ok(())
    }
}

/// Forwards snapshots over a channel. Fails once the receiver is gone.
#[derive(Debug)]
pub struct ChannelSink {
    tx: mpsc::Sender<SimSnapshot>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::Receiver<SimSnapshot>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }
}

impl CollaboratorSink for ChannelSink {
    fn on_snapshot(&mut self, snapshot: &SimSnapshot) -> Result<()> {
        self.tx
            .send(snapshot.clone())
            .map_err(|_| anyhow!("snapshot receiver disconnected"))
    }
}

/// Fans out to several sinks. Each failure is reported separately.
#[derive(Default)]
pub struct SinkSet {
    sinks: Vec<Box<dyn CollaboratorSink>>,
}

impl SinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl CollaboratorSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }
}

impl CollaboratorSink for SinkSet {
    fn on_snapshot(&mut self, snapshot: &SimSnapshot) -> Result<()> {
        for sink in &mut self.sinks {
            deliver(sink.as_mut(), snapshot);
        }
        Ok(())
    }
}
