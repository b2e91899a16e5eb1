//! Configuration module

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::{
    DEFAULT_BODY_LIMIT, DEFAULT_CREDENTIALS_PATH, DEFAULT_HOST, DEFAULT_LOG_DIR,
    DEFAULT_MODEL_PATH, DEFAULT_PORT, DEFAULT_SHEET_RANGE, DEFAULT_THRESHOLD,
};
use crate::logic::image::ChannelOrder;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0} must be set when {1}")]
    Missing(&'static str, &'static str),
}

/// Where decision records are appended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSinkKind {
    Jsonl,
    Sheets,
    Disabled,
}

impl FromStr for LogSinkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jsonl" => Ok(Self::Jsonl),
            "sheets" => Ok(Self::Sheets),
            "none" => Ok(Self::Disabled),
            other => Err(format!("expected jsonl, sheets or none, got {other}")),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind host
    pub host: String,

    /// Server port
    pub port: u16,

    /// ONNX model file
    pub model_path: PathBuf,

    /// Download source used when `model_path` is missing
    pub model_url: Option<String>,

    /// Expected hex SHA-256 of the model file
    pub model_sha256: Option<String>,

    /// Decision threshold (0.0 - 1.0)
    pub threshold: f32,

    /// Channel order fed to the model
    pub channel_order: ChannelOrder,

    /// Max request body size in bytes
    pub body_limit: usize,

    /// Decision log backend
    pub log_sink: LogSinkKind,

    /// JSONL sink directory
    pub log_dir: PathBuf,

    /// Service-account key for the Sheets sink
    pub credentials_path: PathBuf,

    /// Target spreadsheet id
    pub sheet_id: Option<String>,

    /// A1 range rows are appended to
    pub sheet_range: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let threshold: f32 = parse_or(&var, "DECISION_THRESHOLD", DEFAULT_THRESHOLD)?;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::Invalid {
                var: "DECISION_THRESHOLD",
                value: threshold.to_string(),
                reason: "must be within 0.0..=1.0".to_string(),
            });
        }

        let config = Self {
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(&var, "PORT", DEFAULT_PORT)?,
            model_path: var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
            model_url: var("MODEL_URL"),
            model_sha256: var("MODEL_SHA256").map(|s| s.trim().to_ascii_lowercase()),
            threshold,
            channel_order: parse_or(&var, "CHANNEL_ORDER", ChannelOrder::Bgr)?,
            body_limit: parse_or(&var, "BODY_LIMIT_BYTES", DEFAULT_BODY_LIMIT)?,
            log_sink: parse_or(&var, "DECISION_LOG", LogSinkKind::Jsonl)?,
            log_dir: var("DECISION_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR)),
            credentials_path: var("GOOGLE_CREDENTIALS")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_PATH)),
            sheet_id: var("SHEET_ID"),
            sheet_range: var("SHEET_RANGE").unwrap_or_else(|| DEFAULT_SHEET_RANGE.to_string()),
        };

        if config.log_sink == LogSinkKind::Sheets && config.sheet_id.is_none() {
            return Err(ConfigError::Missing("SHEET_ID", "DECISION_LOG=sheets"));
        }

        Ok(config)
    }

    /// Socket address string to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T, F>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => Ok(value),
            Err(e) => Err(ConfigError::Invalid {
                var: key,
                reason: e.to_string(),
                value: raw,
            }),
        },
        None => Ok(default),
    }
}
