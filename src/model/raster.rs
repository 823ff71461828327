//! Rendered page bitmaps.

use base64::Engine;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::error::{Error, Result};

/// A rendered page: a row-major, 8-bit-per-channel pixel buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    channels: u8,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Wrap a pixel buffer.
    ///
    /// `channels` must be 1 (gray), 3 (RGB) or 4 (RGBA), and `pixels` must
    /// hold exactly `width * height * channels` bytes.
    pub fn new(width: u32, height: u32, channels: u8, pixels: Vec<u8>) -> Result<Self> {
        if !matches!(channels, 1 | 3 | 4) {
            return Err(Error::InvalidImage(format!(
                "unsupported channel count {}",
                channels
            )));
        }

        let expected = width as usize * height as usize * channels as usize;
        if pixels.len() != expected {
            return Err(Error::InvalidImage(format!(
                "{}x{}x{} image needs {} bytes, got {}",
                width,
                height,
                channels,
                expected,
                pixels.len()
            )));
        }

        Ok(Self {
            width,
            height,
            channels,
            pixels,
        })
    }

    /// Wrap an RGB buffer.
    pub fn rgb(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        Self::new(width, height, 3, pixels)
    }

    /// A white RGB image.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            channels: 3,
            pixels: vec![0xFF; width as usize * height as usize * 3],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channels per pixel.
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Raw pixel data.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume the image and return its pixel data.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    fn color_type(&self) -> ExtendedColorType {
        match self.channels {
            1 => ExtendedColorType::L8,
            4 => ExtendedColorType::Rgba8,
            _ => ExtendedColorType::Rgb8,
        }
    }

    /// Encode as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        PngEncoder::new(&mut buf).write_image(
            &self.pixels,
            self.width,
            self.height,
            self.color_type(),
        )?;
        Ok(buf)
    }

    /// Encode as a `data:image/png;base64,...` URL, the form multimodal chat
    /// APIs accept for inline images.
    pub fn to_data_url(&self) -> Result<String> {
        let png = self.to_png()?;
        Ok(format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(png)
        ))
    }
}

// Pixel buffers are large; keep debug output to the dimensions.
impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &self.channels)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}
