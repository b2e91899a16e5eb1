//! Central Configuration Constants
//!
//! Single source of truth for model geometry and configuration defaults.

/// Spatial size (height and width) the classifier consumes
pub const IMG_SIZE: u32 = 224;

/// Color channels per pixel in the model input
pub const CHANNELS: usize = 3;

/// Score above which a frame is flagged as cheating
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// Default server port
pub const DEFAULT_PORT: u16 = 5000;

/// Default bind host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default model location
pub const DEFAULT_MODEL_PATH: &str = "best_model.onnx";

/// Default JSONL decision log directory
pub const DEFAULT_LOG_DIR: &str = "decision_logs";

/// Default service-account key file for the Sheets sink
pub const DEFAULT_CREDENTIALS_PATH: &str = "credentials.json";

/// Default Sheets range rows are appended to
pub const DEFAULT_SHEET_RANGE: &str = "Sheet1";

/// Max JSON body size (base64 frames are large)
pub const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Error message for a request without an `image` field
pub const NO_IMAGE_MESSAGE: &str = "No image provided";

/// Error message for an `image` field that is present but `null`
pub const NULL_IMAGE_MESSAGE: &str = "image must be a string, got null";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
