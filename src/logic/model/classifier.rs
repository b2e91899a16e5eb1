//! Classifier Adapter
//!
//! Reads the positive-class probability (element `[0][0]`) out of a
//! single-output sigmoid model.

use std::sync::Arc;

use super::inference::{InferenceError, Model};
use crate::logic::image::InputTensor;

#[derive(Clone)]
pub struct ClassifierAdapter {
    model: Arc<dyn Model>,
}

impl ClassifierAdapter {
    pub fn new(model: Arc<dyn Model>) -> Self {
        Self { model }
    }

    /// Score one input. Multi-output models are rejected rather than
    /// guessing which column is the positive class.
    pub fn score(&self, input: &InputTensor) -> Result<f32, InferenceError> {
        let output = self.model.predict(input)?;

        let (rows, cols) = output.dim();
        if rows == 0 || cols == 0 {
            return Err(InferenceError::EmptyOutput);
        }
        if cols != 1 {
            return Err(InferenceError::UnexpectedOutputShape { rows, cols });
        }

        let score = output[[0, 0]];
        if !score.is_finite() {
            return Err(InferenceError::NonFiniteScore(score));
        }

        Ok(score)
    }

    pub fn model_name(&self) -> String {
        self.model.name()
    }
}
