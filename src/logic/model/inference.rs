//! Inference Engine - ONNX Runtime Integration
//!
//! Loads the exported classifier once at startup and runs it per request.

use std::path::{Path, PathBuf};

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;

use crate::logic::image::InputTensor;

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Fault while running the classifier
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("inference failed: {0}")]
    Runtime(String),

    #[error("model returned no output values")]
    EmptyOutput,

    #[error("expected a single score per input, model returned {rows}x{cols} values")]
    UnexpectedOutputShape { rows: usize, cols: usize },

    #[error("model returned a non-finite score ({0})")]
    NonFiniteScore(f32),
}

/// Fault while acquiring or loading the model at startup
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("model not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("model download failed: {0}")]
    Download(String),

    #[error("model checksum mismatch: expected {expected}, got {actual}")]
    Checksum { expected: String, actual: String },

    #[error("model io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to load model: {0}")]
    Runtime(String),
}

// ============================================================================
// MODEL TRAIT
// ============================================================================

/// A loaded classifier.
///
/// Implementations are shared read-only across concurrent requests.
/// Output is (batch, outputs-per-input).
pub trait Model: Send + Sync {
    fn predict(&self, input: &InputTensor) -> Result<Array2<f32>, InferenceError>;

    /// Human readable identity for health checks
    fn name(&self) -> String;
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

/// Model metadata
#[derive(Debug, Clone, Serialize)]
pub struct ModelMetadata {
    pub model_path: PathBuf,
    pub input_name: String,
    pub output_name: String,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

/// ONNX Runtime backed classifier
pub struct OnnxModel {
    // run() needs exclusive access to the session
    session: Mutex<Session>,
    metadata: ModelMetadata,
}

impl OnnxModel {
    /// Load ONNX model from file
    pub fn load(model_path: &Path) -> Result<Self, ModelLoadError> {
        tracing::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(ModelLoadError::NotFound(model_path.to_path_buf()));
        }

        let session = Session::builder()
            .map_err(|e| ModelLoadError::Runtime(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ModelLoadError::Runtime(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| ModelLoadError::Runtime(format!("Failed to load model: {}", e)))?;

        let input_name = session.inputs.first()
            .map(|i| i.name.clone())
            .ok_or_else(|| ModelLoadError::Runtime("No input defined".to_string()))?;
        let output_name = session.outputs.first()
            .map(|o| o.name.clone())
            .ok_or_else(|| ModelLoadError::Runtime("No output defined".to_string()))?;

        tracing::info!(
            input = %input_name,
            output = %output_name,
            "ONNX model loaded successfully"
        );

        Ok(Self {
            session: Mutex::new(session),
            metadata: ModelMetadata {
                model_path: model_path.to_path_buf(),
                input_name,
                output_name,
                loaded_at: chrono::Utc::now(),
            },
        })
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

impl Model for OnnxModel {
    fn predict(&self, input: &InputTensor) -> Result<Array2<f32>, InferenceError> {
        let input_tensor = Value::from_array(input.view().to_owned())
            .map_err(|e| InferenceError::Runtime(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session.run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Runtime(e.to_string()))?;

        let output = outputs.get(self.metadata.output_name.as_str())
            .ok_or(InferenceError::EmptyOutput)?;

        let (_, data) = output.try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Runtime(format!("Extract error: {}", e)))?;

        // One input per run, so every value belongs to row 0
        Array2::from_shape_vec((1, data.len()), data.to_vec())
            .map_err(|e| InferenceError::Runtime(format!("Array error: {}", e)))
    }

    fn name(&self) -> String {
        self.metadata.model_path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_model() {
        let err = OnnxModel::load(Path::new("/nonexistent/best_model.onnx")).err().unwrap();
        assert!(matches!(err, ModelLoadError::NotFound(_)));
        assert!(err.to_string().contains("best_model.onnx"));
    }

    #[test]
    fn test_error_messages() {
        let err = InferenceError::UnexpectedOutputShape { rows: 1, cols: 2 };
        assert_eq!(
            err.to_string(),
            "expected a single score per input, model returned 1x2 values"
        );
        assert_eq!(
            InferenceError::Runtime("boom".into()).to_string(),
            "inference failed: boom"
        );
    }
}
