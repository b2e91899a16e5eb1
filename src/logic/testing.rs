//! Test doubles shared across modules

use std::io::Cursor;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use ndarray::Array2;
use parking_lot::Mutex;

use crate::logic::image::InputTensor;
use crate::logic::model::{InferenceError, Model};
use crate::logic::telemetry::{LogRecord, LogSink, SinkError};

/// Encode an image as a `data:` URI payload
pub fn encode_image(image: &DynamicImage, format: ImageFormat) -> String {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, format).unwrap();
    let mime = format.to_mime_type();
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes.into_inner()))
}

/// Gradient PNG payload of the given size
pub fn png_payload(width: u32, height: u32) -> String {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    encode_image(&DynamicImage::ImageRgb8(img), ImageFormat::Png)
}

/// Model returning a fixed output and recording what it saw
pub struct StubModel {
    output: Array2<f32>,
    seen: Mutex<Vec<Vec<usize>>>,
}

impl StubModel {
    pub fn new(score: f32) -> Self {
        Self::with_output(Array2::from_elem((1, 1), score))
    }

    pub fn with_output(output: Array2<f32>) -> Self {
        Self { output, seen: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().len()
    }

    pub fn last_shape(&self) -> Option<Vec<usize>> {
        self.seen.lock().last().cloned()
    }
}

impl Model for StubModel {
    fn predict(&self, input: &InputTensor) -> Result<Array2<f32>, InferenceError> {
        self.seen.lock().push(input.shape().to_vec());
        Ok(self.output.clone())
    }

    fn name(&self) -> String {
        "stub".to_string()
    }
}

/// Model whose every run faults
pub struct FailingModel;

impl Model for FailingModel {
    fn predict(&self, _input: &InputTensor) -> Result<Array2<f32>, InferenceError> {
        Err(InferenceError::Runtime("session crashed".to_string()))
    }

    fn name(&self) -> String {
        "failing".to_string()
    }
}

/// Model that panics mid-run
pub struct PanickingModel;

impl Model for PanickingModel {
    fn predict(&self, _input: &InputTensor) -> Result<Array2<f32>, InferenceError> {
        panic!("model exploded")
    }

    fn name(&self) -> String {
        "panicking".to_string()
    }
}

/// In-memory sink
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    /// Appends run detached from the response, so poll until they land
    pub async fn wait_for(&self, count: usize) -> Vec<LogRecord> {
        for _ in 0..200 {
            let records = self.records();
            if records.len() >= count {
                return records;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.records()
    }
}

impl LogSink for MemorySink {
    fn append(&self, record: &LogRecord) -> Result<(), SinkError> {
        self.records.lock().push(record.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Sink that blocks every append until the paired sender releases it
pub struct GatedSink {
    gate: Mutex<Receiver<()>>,
    inner: MemorySink,
}

impl GatedSink {
    pub fn new() -> (Self, Sender<()>) {
        let (tx, rx) = mpsc::channel();
        let sink = Self { gate: Mutex::new(rx), inner: MemorySink::default() };
        (sink, tx)
    }

    pub async fn wait_for(&self, count: usize) -> Vec<LogRecord> {
        self.inner.wait_for(count).await
    }
}

impl LogSink for GatedSink {
    fn append(&self, record: &LogRecord) -> Result<(), SinkError> {
        let _ = self.gate.lock().recv();
        self.inner.append(record)
    }

    fn name(&self) -> &'static str {
        "gated"
    }
}

/// Sink whose backend is unreachable
pub struct FailingSink;

impl LogSink for FailingSink {
    fn append(&self, _record: &LogRecord) -> Result<(), SinkError> {
        Err(SinkError::Http("connection refused".to_string()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}
