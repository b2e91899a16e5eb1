//! Core logic: image handling, model inference, decision logging

pub mod image;
pub mod model;
pub mod pipeline;
pub mod telemetry;

#[cfg(test)]
pub mod testing;
