//! Simulation-clock interval timers.
//!
//! Timers are driven by elapsed simulation milliseconds, so pausing the
//! clock pauses every timer. A disarmed timer never fires.

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerId {
    Motion,
    Spawn,
    Cleanup,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IntervalTimer {
    pub interval_ms: u64,
    /// `None` while disarmed.
    next_due_ms: Option<u64>,
}

impl IntervalTimer {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            next_due_ms: None,
        }
    }

    /// First firing one interval after `now_ms`.
    pub fn arm(&mut self, now_ms: u64) {
        self.next_due_ms = Some(now_ms + self.interval_ms);
    }

    pub fn disarm(&mut self) {
        self.next_due_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due_ms.is_some()
    }

    /// Fires at most once per call; the next deadline keeps the original
    /// phase.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.next_due_ms {
            Some(due) if now_ms >= due => {
                self.next_due_ms = Some(due + self.interval_ms);
                true
            }
            _ => false,
        }
    }
}

/// The engine's timers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSet {
    motion: IntervalTimer,
    spawn: IntervalTimer,
    cleanup: IntervalTimer,
}

impl TimerSet {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            motion: IntervalTimer::new(config.motion_interval_ms),
            spawn: IntervalTimer::new(config.spawn_interval_ms),
            cleanup: IntervalTimer::new(config.cleanup_interval_ms),
        }
    }

    pub fn arm_all(&mut self, now_ms: u64) {
        self.motion.arm(now_ms);
        self.spawn.arm(now_ms);
        self.cleanup.arm(now_ms);
    }

    pub fn disarm_all(&mut self) {
        self.motion.disarm();
        self.spawn.disarm();
        self.cleanup.disarm();
    }

    pub fn any_armed(&self) -> bool {
        self.motion.is_armed() || self.spawn.is_armed() || self.cleanup.is_armed()
    }

    /// Timers due at `now_ms`, in processing order.
    pub fn due(&mut self, now_ms: u64) -> Vec<TimerId> {
        let mut due = Vec::with_capacity(3);
        if self.motion.poll(now_ms) {
            due.push(TimerId::Motion);
        }
        if self.spawn.poll(now_ms) {
            due.push(TimerId::Spawn);
        }
        if self.cleanup.poll(now_ms) {
            due.push(TimerId::Cleanup);
        }
        due
    }
}
