//! Model Module - classifier loading, inference and decision policy
//!
//! `inference` owns the ONNX Runtime session behind the `Model` trait,
//! `classifier` turns raw model output into a score, `threshold` turns
//! a score into a verdict and `download` fetches the model at startup.

pub mod inference;
pub mod classifier;
pub mod threshold;
pub mod download;

pub use inference::{InferenceError, Model, ModelLoadError, OnnxModel};
pub use classifier::ClassifierAdapter;
pub use threshold::DecisionPolicy;
pub use download::ensure_model;
