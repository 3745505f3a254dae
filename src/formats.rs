//! Content-based image format detection
//!
//! File extensions are not trusted: a text file renamed to `.jpg` must be
//! reported as unsupported before any decoding is attempted.

use crate::constants::PROBE_HEADER_LEN;
use crate::error::Result;
use image::ImageFormat;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Sniffs the leading bytes of a file and returns its image format, if any.
pub fn probe_format(path: &Path) -> Result<Option<ImageFormat>> {
    let mut header = Vec::with_capacity(PROBE_HEADER_LEN);
    File::open(path)?
        .take(PROBE_HEADER_LEN as u64)
        .read_to_end(&mut header)?;

    Ok(image::guess_format(&header).ok().filter(is_decodable))
}

/// Formats the enabled `image` decoders can actually read.
fn is_decodable(format: &ImageFormat) -> bool {
    format.reading_enabled()
}

pub fn format_name(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "JPEG",
        ImageFormat::Png => "PNG",
        ImageFormat::WebP => "WebP",
        ImageFormat::Gif => "GIF",
        ImageFormat::Bmp => "BMP",
        ImageFormat::Tiff => "TIFF",
        _ => "image",
    }
}
