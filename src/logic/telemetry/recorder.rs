//! Decision Recorder
//!
//! Append-only JSONL writer for decision records.
//! One line per record, flushed on every append.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use parking_lot::Mutex;

use super::record::{LogRecord, LogSink, SinkError};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Maximum file size before rotation (50 MB)
const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Log file extension
const LOG_EXT: &str = ".jsonl";

// ============================================================================
// RECORDER
// ============================================================================

struct Inner {
    writer: BufWriter<File>,
    current_file: PathBuf,
    current_size: u64,
}

/// Append-only JSONL sink
pub struct JsonlSink {
    base_dir: PathBuf,
    max_file_size: u64,
    inner: Mutex<Inner>,
}

impl JsonlSink {
    /// Create a new recorder in the given directory
    pub fn new(base_dir: PathBuf) -> Result<Self, SinkError> {
        Self::with_max_size(base_dir, MAX_FILE_SIZE)
    }

    fn with_max_size(base_dir: PathBuf, max_file_size: u64) -> Result<Self, SinkError> {
        std::fs::create_dir_all(&base_dir)?;
        let (current_file, file, current_size) = Self::open_new_file(&base_dir)?;

        Ok(Self {
            base_dir,
            max_file_size,
            inner: Mutex::new(Inner {
                writer: BufWriter::new(file),
                current_file,
                current_size,
            }),
        })
    }

    /// Open a log file named after the current second, appending if it exists
    fn open_new_file(base_dir: &Path) -> std::io::Result<(PathBuf, File, u64)> {
        let filename = format!("decisions_{}{}", Utc::now().format("%Y_%m_%d_%H%M%S"), LOG_EXT);
        let file_path = base_dir.join(filename);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)?;
        let size = file.metadata()?.len();

        tracing::info!("Opened decision log: {}", file_path.display());
        Ok((file_path, file, size))
    }

    /// Rotate to a new file
    fn rotate(&self, inner: &mut Inner) -> std::io::Result<()> {
        inner.writer.flush()?;

        let (new_path, new_file, size) = Self::open_new_file(&self.base_dir)?;
        if new_path == inner.current_file {
            // Same second as the full file; keep writing rather than spin
            return Ok(());
        }

        tracing::info!(
            "Rotated from {} to {}",
            inner.current_file.display(),
            new_path.display()
        );
        inner.writer = BufWriter::new(new_file);
        inner.current_file = new_path;
        inner.current_size = size;

        Ok(())
    }

    /// Get current log file path
    #[cfg(test)]
    pub fn current_file(&self) -> PathBuf {
        self.inner.lock().current_file.clone()
    }
}

impl LogSink for JsonlSink {
    fn append(&self, record: &LogRecord) -> Result<(), SinkError> {
        let line = serde_json::to_string(record)?;
        let bytes = line.as_bytes();

        let mut inner = self.inner.lock();

        if inner.current_size + bytes.len() as u64 > self.max_file_size {
            self.rotate(&mut inner)?;
        }

        inner.writer.write_all(bytes)?;
        inner.writer.write_all(b"\n")?;
        inner.current_size += bytes.len() as u64 + 1;

        // Flush for durability
        inner.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "jsonl"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_records(file_path: &Path) -> Result<Vec<LogRecord>, SinkError> {
        let content = std::fs::read_to_string(file_path)?;
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(SinkError::from))
            .collect()
    }

    #[test]
    fn test_append_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonlSink::new(dir.path().join("logs")).unwrap();

        let first = LogRecord::new(true, 0.73);
        let second = LogRecord::new(false, 0.12);
        sink.append(&first).unwrap();
        sink.append(&second).unwrap();

        let records = read_records(&sink.current_file()).unwrap();
        assert_eq!(records, vec![first, second]);
    }

    #[test]
    fn test_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonlSink::new(dir.path().to_path_buf()).unwrap();

        for i in 0..5 {
            sink.append(&LogRecord::new(i % 2 == 0, i as f32 / 10.0)).unwrap();
        }

        let content = std::fs::read_to_string(sink.current_file()).unwrap();
        assert_eq!(content.lines().count(), 5);
        assert!(content.lines().all(|l| l.contains("\"cheating\"") && l.contains("\"confidence\"")));
    }

    #[test]
    fn test_rotation_never_loses_records() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonlSink::with_max_size(dir.path().to_path_buf(), 64).unwrap();

        for _ in 0..4 {
            sink.append(&LogRecord::new(true, 0.9)).unwrap();
        }

        let total: usize = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| read_records(&entry.unwrap().path()).unwrap().len())
            .sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn test_name() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(JsonlSink::new(dir.path().to_path_buf()).unwrap().name(), "jsonl");
    }
}
