//! Image Module - payload decoding and model input preparation
//!
//! `decode` turns a data-URI style payload into a pixel grid,
//! `preprocess` turns that grid into the fixed-shape model tensor.

pub mod types;
pub mod decode;
pub mod preprocess;

pub use types::{ChannelOrder, InputTensor, PixelGrid};
pub use decode::{decode, DecodeError};
pub use preprocess::normalize;
