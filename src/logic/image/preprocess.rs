//! Preprocessor
//!
//! Pixel grid -> (1, 224, 224, 3) float tensor in [0, 1].

use image::imageops::{self, FilterType};
use ndarray::Array4;

use crate::constants::{CHANNELS, IMG_SIZE};
use super::types::{ChannelOrder, InputTensor, PixelGrid};

/// Resize to `IMG_SIZE` x `IMG_SIZE`, scale samples by 1/255 and add the
/// batch axis. Non-square inputs are stretched, never cropped.
pub fn normalize(grid: &PixelGrid, order: ChannelOrder) -> InputTensor {
    let resized = imageops::resize(grid.as_image(), IMG_SIZE, IMG_SIZE, FilterType::Triangle);
    let channels = order.source_indices();
    let size = IMG_SIZE as usize;

    let array = Array4::from_shape_fn((1, size, size, CHANNELS), |(_, y, x, c)| {
        let pixel = resized.get_pixel(x as u32, y as u32);
        pixel.0[channels[c]] as f32 / 255.0
    });

    InputTensor::from_array(array)
}
