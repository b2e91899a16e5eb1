//! Decision log record and sink trait

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("log io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("log serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("log sink authentication failed: {0}")]
    Auth(String),

    #[error("log sink request failed: {0}")]
    Http(String),

    #[error("log sink misconfigured: {0}")]
    Config(String),
}

/// One scored decision (timestamp, verdict, score)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub cheating: bool,
    pub confidence: f32,
}

impl LogRecord {
    pub fn new(cheating: bool, confidence: f32) -> Self {
        Self {
            timestamp: Local::now(),
            cheating,
            confidence,
        }
    }

    /// Timestamp in `YYYY-MM-DD HH:MM:SS.ffffff` form
    pub fn timestamp_string(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
    }
}

/// Append-only destination for decision records.
///
/// Called from the blocking pool, so implementations may block.
pub trait LogSink: Send + Sync {
    fn append(&self, record: &LogRecord) -> Result<(), SinkError>;

    fn name(&self) -> &'static str;
}

/// Discards every record
#[derive(Debug, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn append(&self, _record: &LogRecord) -> Result<(), SinkError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "none"
    }
}
