//! Image pipeline data types

use std::fmt;
use std::str::FromStr;

use image::RgbImage;
use ndarray::{Array4, ArrayView4};

/// Decoded raster image, (height, width, 3) samples in codec (RGB) order
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid(RgbImage);

impl PixelGrid {
    /// Wrap a decoded image. Returns `None` for an image without pixels.
    pub fn new(image: RgbImage) -> Option<Self> {
        if image.width() == 0 || image.height() == 0 {
            return None;
        }
        Some(Self(image))
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn as_image(&self) -> &RgbImage {
        &self.0
    }
}

/// Batched, resized, normalized model input of shape (1, H, W, 3)
#[derive(Debug, Clone, PartialEq)]
pub struct InputTensor(Array4<f32>);

impl InputTensor {
    pub(crate) fn from_array(array: Array4<f32>) -> Self {
        Self(array)
    }

    pub fn shape(&self) -> &[usize] {
        self.0.shape()
    }

    pub fn view(&self) -> ArrayView4<'_, f32> {
        self.0.view()
    }
}

/// Channel order of the last tensor axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    /// Blue, green, red: what OpenCV-style decoders hand to the model
    #[default]
    Bgr,
    /// Red, green, blue: codec order
    Rgb,
}

impl ChannelOrder {
    /// Source channel index for each tensor channel
    pub fn source_indices(self) -> [usize; 3] {
        match self {
            ChannelOrder::Bgr => [2, 1, 0],
            ChannelOrder::Rgb => [0, 1, 2],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChannelOrder::Bgr => "bgr",
            ChannelOrder::Rgb => "rgb",
        }
    }
}

impl fmt::Display for ChannelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bgr" => Ok(Self::Bgr),
            "rgb" => Ok(Self::Rgb),
            other => Err(format!("expected bgr or rgb, got {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_grid_rejects_empty_image() {
        assert!(PixelGrid::new(RgbImage::new(0, 10)).is_none());
        assert!(PixelGrid::new(RgbImage::new(10, 0)).is_none());

        let grid = PixelGrid::new(RgbImage::new(4, 3)).unwrap();
        assert_eq!((grid.width(), grid.height()), (4, 3));
    }

    #[test]
    fn test_channel_order_parse() {
        assert_eq!("BGR".parse::<ChannelOrder>(), Ok(ChannelOrder::Bgr));
        assert_eq!(" rgb ".parse::<ChannelOrder>(), Ok(ChannelOrder::Rgb));
        assert!("hsv".parse::<ChannelOrder>().is_err());
        assert_eq!(ChannelOrder::default(), ChannelOrder::Bgr);
    }
}
