use crate::constants::{DEFAULT_EFFORT, MAX_EFFORT};
use crate::error::{ConvertError, Result};
use crate::validation::{CompressionLevel, RunConfig};
use image::DynamicImage;
use webp::{Encoder, WebPConfig};

/// Codec parameters derived from a run configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderOptions {
    pub quality: u8,
    /// Always emit WebP regardless of the input format. Output naming and
    /// collisions are handled by the worker, not the codec.
    pub force: bool,
    pub lossless: bool,
    pub near_lossless: bool,
    pub min_size: bool,
    pub mixed: bool,
    pub effort: u8,
}

impl EncoderOptions {
    /// Maps quality, compression level and the minimal switch onto encoder settings.
    ///
    /// Minimal mode ignores the compression level entirely.
    pub fn build(quality: u8, compression: CompressionLevel, minimal: bool) -> Self {
        let mut options = Self {
            quality,
            force: true,
            lossless: false,
            near_lossless: false,
            min_size: false,
            mixed: false,
            effort: DEFAULT_EFFORT,
        };

        if minimal {
            options.min_size = true;
            options.mixed = true;
            options.effort = MAX_EFFORT;
        } else {
            match compression {
                CompressionLevel::Lossy => options.lossless = false,
                CompressionLevel::NearLossless => options.near_lossless = true,
                CompressionLevel::Lossless => options.lossless = true,
            }
        }

        options
    }

    pub fn from_config(config: &RunConfig) -> Self {
        Self::build(config.quality, config.compression, config.minimal)
    }

    /// Short label used in verbose output.
    pub fn describe(&self) -> String {
        let mode = if self.min_size {
            "minimal"
        } else if self.lossless {
            "lossless"
        } else if self.near_lossless {
            "near-lossless"
        } else {
            "lossy"
        };
        format!("{} q={} effort={}", mode, self.quality, self.effort)
    }

    fn bitstreams(&self) -> Vec<Bitstream> {
        if self.mixed {
            vec![Bitstream::Lossy, Bitstream::Lossless]
        } else if self.lossless || self.near_lossless {
            vec![Bitstream::Lossless]
        } else {
            vec![Bitstream::Lossy]
        }
    }

    fn webp_config(&self, bitstream: Bitstream) -> Result<WebPConfig> {
        let mut config = WebPConfig::new()
            .map_err(|_| ConvertError::Encode("failed to initialise libwebp config".to_string()))?;
        config.quality = self.quality as f32;
        config.method = self.effort.min(MAX_EFFORT) as i32;

        if bitstream == Bitstream::Lossless {
            config.lossless = 1;
            // libwebp treats 100 as "no preprocessing"
            config.near_lossless = if self.near_lossless {
                self.quality as i32
            } else {
                100
            };
        } else {
            config.lossless = 0;
        }

        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bitstream {
    Lossy,
    Lossless,
}

/// Encodes an image into a WebP byte stream.
///
/// With `mixed` set both a lossy and a lossless bitstream are produced;
/// `min_size` keeps whichever is smaller.
pub fn encode(img: &DynamicImage, options: &EncoderOptions) -> Result<Vec<u8>> {
    let (width, height) = (img.width(), img.height());
    let pixels;
    let encoder = if img.color().has_alpha() {
        pixels = img.to_rgba8().into_raw();
        Encoder::from_rgba(&pixels, width, height)
    } else {
        pixels = img.to_rgb8().into_raw();
        Encoder::from_rgb(&pixels, width, height)
    };

    let mut best: Option<Vec<u8>> = None;
    for bitstream in options.bitstreams() {
        let config = options.webp_config(bitstream)?;
        let memory = encoder
            .encode_advanced(&config)
            .map_err(|e| ConvertError::Encode(format!("{:?}", e)))?;
        let bytes = memory.to_vec();

        best = match best {
            None => Some(bytes),
            Some(current) if options.min_size && bytes.len() < current.len() => Some(bytes),
            keep => keep,
        };
    }

    best.ok_or_else(|| ConvertError::Encode("no bitstream selected".to_string()))
}
