//! Telemetry Module
//!
//! Append-only decision log. One `LogRecord` per successfully scored
//! request, written to whichever `LogSink` the config selects.
//!
//! ## Structure
//! - `record.rs` - LogRecord, LogSink trait, NoopSink
//! - `recorder.rs` - Append-only JSONL writer
//! - `sheets.rs` - Google Sheets row appender

pub mod record;
pub mod recorder;
pub mod sheets;

use std::sync::Arc;

pub use record::{LogRecord, LogSink, NoopSink, SinkError};
pub use recorder::JsonlSink;
pub use sheets::SheetsSink;

use crate::config::{Config, LogSinkKind};

/// Build the sink selected by `DECISION_LOG`
pub fn build_sink(config: &Config) -> Result<Arc<dyn LogSink>, SinkError> {
    let sink: Arc<dyn LogSink> = match config.log_sink {
        LogSinkKind::Jsonl => Arc::new(JsonlSink::new(config.log_dir.clone())?),
        LogSinkKind::Sheets => {
            let sheet_id = config.sheet_id.clone()
                .ok_or_else(|| SinkError::Config("SHEET_ID is not set".to_string()))?;
            Arc::new(SheetsSink::from_key_file(
                &config.credentials_path,
                sheet_id,
                config.sheet_range.clone(),
            )?)
        }
        LogSinkKind::Disabled => Arc::new(NoopSink),
    };

    tracing::info!("Decision log sink: {}", sink.name());
    Ok(sink)
}
