//! Image Decoder
//!
//! `<metadata>,<base64-body>` payload -> 3-channel pixel grid.

use base64::{engine::general_purpose::STANDARD, Engine};
use image::DynamicImage;
use thiserror::Error;

use super::types::PixelGrid;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("image payload has no ',' separating metadata from data")]
    MissingSeparator,

    #[error("invalid base64 image data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("could not decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("decoded image has no pixels")]
    EmptyImage,
}

/// Decode a data-URI style payload into a pixel grid.
///
/// The base64 body is the second comma-separated field; anything after
/// a further comma is ignored. ASCII whitespace inside the body is
/// ignored. Alpha is dropped and greyscale is expanded to three channels.
pub fn decode(payload: &str) -> Result<PixelGrid, DecodeError> {
    let body = payload
        .split(',')
        .nth(1)
        .ok_or(DecodeError::MissingSeparator)?;

    let body: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(body.as_bytes())?;

    let image = image::load_from_memory(&bytes)?;
    tracing::trace!(color = ?image.color(), "decoded {} byte image", bytes.len());

    into_grid(image)
}

fn into_grid(image: DynamicImage) -> Result<PixelGrid, DecodeError> {
    PixelGrid::new(image.to_rgb8()).ok_or(DecodeError::EmptyImage)
}
