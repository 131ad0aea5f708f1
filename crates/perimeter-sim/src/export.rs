//! Log export to CSV and JSON.

use chrono::SecondsFormat;
use csv::{QuoteStyle, WriterBuilder};
use serde::{Deserialize, Serialize};

use perimeter_core::enums::{LogKind, LogSeverity, SensorKind};
use perimeter_core::events::LogEntry;

use crate::error::SimResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

/// Flat row shared by both formats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub id: u64,
    /// RFC 3339, millisecond precision, `Z` suffix.
    pub timestamp: String,
    pub kind: LogKind,
    pub source_entity_id: Option<u32>,
    pub sensor_kind: Option<SensorKind>,
    pub severity: LogSeverity,
    pub message: String,
}

impl From<&LogEntry> for ExportRow {
    fn from(entry: &LogEntry) -> Self {
        Self {
            id: entry.id,
            timestamp: entry.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            kind: entry.kind,
            source_entity_id: entry.source_entity_id,
            sensor_kind: entry.sensor_kind,
            severity: entry.severity,
            message: entry.message.clone(),
        }
    }
}

const CSV_HEADER: [&str; 7] = [
    "id",
    "timestamp",
    "kind",
    "source_entity_id",
    "sensor_kind",
    "severity",
    "message",
];

/// Header row, then one row per entry. Non-numeric fields are quoted.
pub fn to_csv(entries: &[LogEntry]) -> SimResult<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::NonNumeric)
        .from_writer(Vec::new());
    // serialize only emits the header alongside the first row
    if entries.is_empty() {
        writer.write_record(CSV_HEADER)?;
    }
    for entry in entries {
        writer.serialize(ExportRow::from(entry))?;
    }
    writer.flush()?;
    Ok(writer.into_inner().map_err(|e| e.into_error())?)
}

/// Pretty-printed JSON array of rows.
pub fn to_json(entries: &[LogEntry]) -> SimResult<Vec<u8>> {
    let rows: Vec<ExportRow> = entries.iter().map(ExportRow::from).collect();
    Ok(serde_json::to_vec_pretty(&rows)?)
}

pub fn export(entries: &[LogEntry], format: ExportFormat) -> SimResult<Vec<u8>> {
    match format {
        ExportFormat::Csv => to_csv(entries),
        ExportFormat::Json => to_json(entries),
    }
}
