//! Alert/log aggregation and the alarm latch.
//!
//! The log is newest-first and capped; the oldest entries fall off
//! silently. The aggregator does not deduplicate.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use perimeter_core::constants::{MAX_LOG_CAPACITY, MIN_LOG_CAPACITY};
use perimeter_core::enums::*;
use perimeter_core::environment::{EnvironmentPatch, SensorPatch};
use perimeter_core::events::{CrossingDetail, CrossingEvent, LogEntry};

/// Read-time log filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "kind")]
pub enum LogFilter {
    #[default]
    All,
    /// Environment and sensor configuration changes.
    System,
    /// High-severity entries.
    Alerts,
    Kind(LogKind),
}

impl LogFilter {
    pub fn matches(&self, entry: &LogEntry) -> bool {
        match self {
            Self::All => true,
            Self::System => entry.kind.is_system(),
            Self::Alerts => entry.severity == LogSeverity::High,
            Self::Kind(kind) => entry.kind == *kind,
        }
    }
}

/// Human-readable line for a crossing.
pub fn crossing_message(event: &CrossingEvent) -> String {
    match &event.detail {
        CrossingDetail::Beams { figure, beams, speed } => {
            let list = beams.iter().map(|b| b.to_string()).collect::<Vec<_>>().join(", ");
            format!(
                "{} crossed laser beam{} {} at speed {:.1}",
                figure.label(),
                if beams.len() == 1 { "" } else { "s" },
                list,
                speed
            )
        }
        CrossingDetail::Ring { threat, position } => format!(
            "{} threat breached {} perimeter at ({:.6}, {:.6})",
            threat.label(),
            event.sensor,
            position.lat,
            position.lng
        ),
    }
}

#[derive(Debug, Clone)]
pub struct LogBook {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    next_id: u64,
    epoch: DateTime<Utc>,
}

impl LogBook {
    /// `capacity` is clamped to the accepted range.
    pub fn new(capacity: usize, epoch: DateTime<Utc>) -> Self {
        let capacity = capacity.clamp(MIN_LOG_CAPACITY, MAX_LOG_CAPACITY);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_id: 1,
            epoch,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn timestamp(&self, now_ms: u64) -> DateTime<Utc> {
        self.epoch + Duration::milliseconds(now_ms as i64)
    }

    fn push(
        &mut self,
        now_ms: u64,
        kind: LogKind,
        source_entity_id: Option<u32>,
        sensor_kind: Option<SensorKind>,
        severity: LogSeverity,
        message: String,
    ) -> LogEntry {
        let entry = LogEntry {
            id: self.next_id,
            timestamp: self.timestamp(now_ms),
            kind,
            source_entity_id,
            sensor_kind,
            severity,
            message,
        };
        self.next_id += 1;
        self.entries.push_front(entry.clone());
        self.entries.truncate(self.capacity);
        entry
    }

    pub fn record_crossing(&mut self, event: &CrossingEvent, now_ms: u64) -> LogEntry {
        let kind = match event.detail {
            CrossingDetail::Beams { .. } => LogKind::LaserCrossing,
            CrossingDetail::Ring { .. } => LogKind::PerimeterBreach,
        };
        self.push(
            now_ms,
            kind,
            Some(event.entity_id),
            Some(event.sensor),
            event.severity.into(),
            crossing_message(event),
        )
    }

    /// The message is the applied patch as JSON.
    pub fn record_environment_change(&mut self, applied: &EnvironmentPatch, now_ms: u64) -> LogEntry {
        let message = serde_json::to_string(applied).unwrap_or_else(|_| format!("{applied:?}"));
        self.push(now_ms, LogKind::EnvironmentChange, None, None, LogSeverity::Info, message)
    }

    pub fn record_sensor_change(&mut self, sensor: SensorKind, applied: &SensorPatch, now_ms: u64) -> LogEntry {
        let patch = serde_json::to_string(applied).unwrap_or_else(|_| format!("{applied:?}"));
        self.push(
            now_ms,
            LogKind::SensorConfigChange,
            None,
            Some(sensor),
            LogSeverity::Info,
            format!("{sensor} updated: {patch}"),
        )
    }

    /// Matching entries, newest first.
    pub fn list(&self, filter: LogFilter) -> Vec<LogEntry> {
        self.entries.iter().filter(|e| filter.matches(e)).cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Drop all entries. Ids keep increasing.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Timed alarm. Active until `until_ms`; each trigger pushes the deadline
/// out by the dwell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmLatch {
    pub dwell_ms: u64,
    until_ms: Option<u64>,
}

impl AlarmLatch {
    pub fn new(dwell_ms: u64) -> Self {
        Self {
            dwell_ms,
            until_ms: None,
        }
    }

    /// Crossings of low severity never raise the alarm.
    pub fn should_trigger(severity: Severity) -> bool {
        severity != Severity::Low
    }

    pub fn trigger(&mut self, now_ms: u64) {
        self.until_ms = Some(now_ms + self.dwell_ms);
    }

    pub fn is_active(&self) -> bool {
        self.until_ms.is_some()
    }

    /// Release the latch once the dwell has elapsed. Returns true on the
    /// falling edge.
    pub fn update(&mut self, now_ms: u64) -> bool {
        match self.until_ms {
            Some(until) if now_ms >= until => {
                self.until_ms = None;
                true
            }
            _ => false,
        }
    }

    pub fn reset(&mut self) {
        self.until_ms = None;
    }
}
