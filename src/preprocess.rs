use clap::ValueEnum;
use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::Array4;

use crate::error::PredictError;

/// Side length of the square network input.
pub const INPUT_SIZE: u32 = 299;
pub const CHANNELS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    #[default]
    CatmullRom,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// How 8-bit pixel values are mapped to network inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Normalization {
    /// `x / 255`, range [0, 1].
    #[default]
    Unit,
    /// `x / 127.5 - 1`, range [-1, 1].
    Xception,
}

impl Normalization {
    #[inline]
    fn apply(self, value: u8) -> f32 {
        match self {
            Normalization::Unit => value as f32 / 255.0,
            Normalization::Xception => value as f32 / 127.5 - 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Preprocessor {
    pub size: u32,
    pub filter: ResizeFilter,
    pub normalization: Normalization,
}

impl Preprocessor {
    pub fn new(filter: ResizeFilter, normalization: Normalization) -> Self {
        Self {
            size: INPUT_SIZE,
            filter,
            normalization,
        }
    }

    /// Decodes raw upload bytes into an NHWC tensor of shape `(1, size, size, 3)`.
    pub fn preprocess(&self, bytes: &[u8]) -> Result<Array4<f32>, PredictError> {
        let image = decode_rgb(bytes)?;
        Ok(self.to_tensor(&image))
    }

    pub fn to_tensor(&self, image: &RgbImage) -> Array4<f32> {
        let resized = imageops::resize(image, self.size, self.size, self.filter.into());
        let side = self.size as usize;

        Array4::from_shape_fn((1, side, side, CHANNELS), |(_, y, x, c)| {
            self.normalization
                .apply(resized.get_pixel(x as u32, y as u32)[c])
        })
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(ResizeFilter::default(), Normalization::default())
    }
}

fn decode_rgb(bytes: &[u8]) -> Result<RgbImage, PredictError> {
    let image = image::load_from_memory(bytes).map_err(|e| {
        tracing::debug!(error = %e, "Image decode failed");
        PredictError::InvalidImage
    })?;
    Ok(image.to_rgb8())
}
