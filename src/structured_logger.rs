//! Structured JSONL logger for cycle and stage-machine activity.
//!
//! Machine-parseable log with monotonic sequence numbers, UTC timestamps,
//! and a session ID for correlation. One line per event, flushed as it is
//! written so a crash never loses settled history.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::domain::types::Generation;
use crate::stage_machine::{StageCommand, StageEvent};

/// Structured JSONL logger.
pub struct StructuredLogger {
    session_id: String,
    seq: AtomicU64,
    log_file: Mutex<File>,
}

/// A single log entry in JSONL format.
#[derive(Serialize, serde::Deserialize)]
pub struct LogEntry {
    /// Monotonic sequence number, unique across the session.
    pub seq: u64,
    /// ISO 8601 timestamp with microseconds.
    pub ts: String,
    /// Session ID.
    pub session_id: String,
    /// Component that emitted the entry.
    pub component: String,
    /// Structured event data.
    pub event: Value,
}

impl StructuredLogger {
    /// Creates a logger writing to `<logs_dir>/events.jsonl`.
    ///
    /// # Errors
    ///
    /// Returns an error if the logs directory cannot be created or the log
    /// file cannot be opened.
    pub fn new(session_id: &str, logs_dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(logs_dir)?;
        let log_path = logs_dir.join("events.jsonl");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        Ok(Self {
            session_id: session_id.to_string(),
            seq: AtomicU64::new(0),
            log_file: Mutex::new(file),
        })
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Logs a structured event. Thread-safe; failures to write are ignored
    /// rather than allowed to take down the caller.
    pub fn log(&self, component: &str, event: impl Serialize) {
        let entry = LogEntry {
            seq: self.next_seq(),
            ts: Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            session_id: self.session_id.clone(),
            component: component.to_string(),
            event: serde_json::to_value(event).unwrap_or(Value::Null),
        };

        if let Ok(mut file) = self.log_file.lock() {
            if let Ok(line) = serde_json::to_string(&entry) {
                let _ = writeln!(file, "{}", line);
                let _ = file.flush();
            }
        }
    }

    /// Logs the start of an aggregation cycle.
    pub fn log_cycle_started(&self, generation: Generation) {
        self.log(
            "Aggregator",
            serde_json::json!({
                "type": "CycleStarted",
                "generation": generation
            }),
        );
    }

    /// Logs a settled, published cycle.
    pub fn log_cycle_settled(&self, generation: Generation, failed_domains: usize) {
        self.log(
            "Aggregator",
            serde_json::json!({
                "type": "CycleSettled",
                "generation": generation,
                "failed_domains": failed_domains
            }),
        );
    }

    /// Logs a cycle discarded for being superseded.
    pub fn log_cycle_discarded(&self, stale: Generation, current: Generation) {
        self.log(
            "Aggregator",
            serde_json::json!({
                "type": "CycleDiscarded",
                "stale_generation": stale,
                "current_generation": current
            }),
        );
    }

    /// Logs a stage machine command.
    pub fn log_stage_command(&self, command: &StageCommand) {
        self.log(
            "StageMachine",
            serde_json::json!({
                "type": "StageCommand",
                "command": command
            }),
        );
    }

    /// Logs a stage machine event.
    pub fn log_stage_event(&self, event: &StageEvent) {
        self.log(
            "StageMachine",
            serde_json::json!({
                "type": "StageEvent",
                "event": event
            }),
        );
    }
}

#[cfg(test)]
#[path = "tests/structured_logger_tests.rs"]
mod structured_logger_tests;
