use crate::cli::Args;
use crate::constants::{DEFAULT_COMPRESSION_LEVEL, DEFAULT_QUALITY, MAX_QUALITY, MIN_QUALITY};
use crate::error::{ConvertError, Result};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    File,
    Directory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    Lossy,
    NearLossless,
    Lossless,
}

impl CompressionLevel {
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(CompressionLevel::Lossy),
            2 => Some(CompressionLevel::NearLossless),
            3 => Some(CompressionLevel::Lossless),
            _ => None,
        }
    }

    pub fn level(&self) -> u8 {
        match self {
            CompressionLevel::Lossy => 1,
            CompressionLevel::NearLossless => 2,
            CompressionLevel::Lossless => 3,
        }
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompressionLevel::Lossy => "lossy",
            CompressionLevel::NearLossless => "near-lossless",
            CompressionLevel::Lossless => "lossless",
        };
        write!(f, "{}", name)
    }
}

/// Validated settings for one conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub input_type: InputType,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub quality: u8,
    pub compression: CompressionLevel,
    pub minimal: bool,
}

impl RunConfig {
    /// Turns raw flag values into a run configuration.
    ///
    /// Input mode and paths are checked strictly. Quality and compression level
    /// fall back to their defaults with a warning.
    pub fn from_args(args: &Args) -> Result<Self> {
        let (input_type, input_path) = match (&args.input, &args.directory) {
            (Some(_), Some(_)) => return Err(ConvertError::ConflictingInputModes),
            (Some(file), None) => (InputType::File, resolve_existing(file, "file")?),
            (None, Some(dir)) => {
                let path = resolve_existing(dir, "directory")?;
                if !path.is_dir() {
                    return Err(ConvertError::InputNotDirectory(path));
                }
                (InputType::Directory, path)
            }
            (None, None) => return Err(ConvertError::MissingInputMode),
        };

        let output_path = match &args.output {
            Some(output) => {
                let resolved = absolute(Path::new(output))?;
                if !resolved.is_dir() {
                    return Err(ConvertError::OutputNotFound(resolved));
                }
                resolved
            }
            None => default_output_dir(input_type, &input_path),
        };

        let quality = parse_quality(&args.quality).unwrap_or_else(|| {
            warn!(
                "Warning: Invalid image quality parameter, using default value {}",
                DEFAULT_QUALITY
            );
            DEFAULT_QUALITY
        });

        let compression = parse_compression_level(&args.lossless).unwrap_or_else(|| {
            warn!(
                "Warning: Invalid compression level parameter, using default value {}",
                DEFAULT_COMPRESSION_LEVEL
            );
            CompressionLevel::Lossy
        });

        Ok(Self {
            input_type,
            input_path,
            output_path,
            quality,
            compression,
            minimal: parse_minimal(&args.minimal),
        })
    }
}

/// Accepts an integer in `1..=100`; anything else is `None`.
///
/// Only the leading integer is read, so `"12.5"` is 12 and `"42abc"` is 42.
pub fn parse_quality(raw: &str) -> Option<u8> {
    leading_integer(raw)
        .filter(|q| (MIN_QUALITY as i64..=MAX_QUALITY as i64).contains(q))
        .map(|q| q as u8)
}

pub fn parse_compression_level(raw: &str) -> Option<CompressionLevel> {
    leading_integer(raw)
        .and_then(|level| u8::try_from(level).ok())
        .and_then(CompressionLevel::from_level)
}

/// Reads an optional sign followed by decimal digits from the start of `raw`,
/// after leading whitespace. Trailing characters are ignored. `None` when no
/// digit follows the sign or the value does not fit an `i64`.
fn leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    let value = rest[..digits_end].parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}

/// Only the literal `true` enables minimal mode.
pub fn parse_minimal(raw: &str) -> bool {
    raw == "true"
}

fn resolve_existing(raw: &str, kind: &'static str) -> Result<PathBuf> {
    let path = absolute(Path::new(raw))?;
    if !path.exists() {
        return Err(ConvertError::InputNotFound { kind, path });
    }
    Ok(path)
}

fn default_output_dir(input_type: InputType, input_path: &Path) -> PathBuf {
    match input_type {
        InputType::File => input_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| input_path.to_path_buf()),
        InputType::Directory => input_path.to_path_buf(),
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
