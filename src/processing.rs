use crate::constants::{OUTPUT_EXTENSION, OUTPUT_SUFFIX, WEBP_MAX_DIMENSION};
use crate::encoder::{encode, EncoderOptions};
use crate::error::{ConvertError, Result};
use crate::formats::{format_name, probe_format};
use crate::utils::{calculate_compression_ratio, format_file_size};
use image::{DynamicImage, ImageDecoder, ImageReader};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Outcome of converting one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub source: PathBuf,
    pub outcome: ConversionOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    Converted {
        output: PathBuf,
        original_size: u64,
        webp_size: u64,
    },
    Failed {
        reason: String,
    },
}

impl ConversionResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ConversionOutcome::Converted { .. })
    }

    pub fn output(&self) -> Option<&Path> {
        match &self.outcome {
            ConversionOutcome::Converted { output, .. } => Some(output),
            ConversionOutcome::Failed { .. } => None,
        }
    }
}

/// Converts one file into a WebP next to the other outputs in `output_dir`.
///
/// Failures are reported and folded into the result; they never abort a batch.
pub fn convert_file(
    input_path: &Path,
    output_dir: &Path,
    options: &EncoderOptions,
) -> ConversionResult {
    let source_name = display_name(input_path);

    let outcome = match try_convert(input_path, output_dir, options) {
        Ok((output, original_size, webp_size)) => {
            info!(
                "{} Conversion successful: {} -> {}",
                crate::constants::SUCCESS_PREFIX,
                source_name,
                display_name(&output)
            );
            verbose!(
                "{} -> {} ({:.1}% smaller)",
                format_file_size(original_size),
                format_file_size(webp_size),
                calculate_compression_ratio(original_size, webp_size)
            );
            ConversionOutcome::Converted {
                output,
                original_size,
                webp_size,
            }
        }
        Err(e) => {
            error!("Conversion failed [{}]: {}", source_name, e);
            ConversionOutcome::Failed {
                reason: e.to_string(),
            }
        }
    };

    ConversionResult {
        source: input_path.to_path_buf(),
        outcome,
    }
}

fn try_convert(
    input_path: &Path,
    output_dir: &Path,
    options: &EncoderOptions,
) -> Result<(PathBuf, u64, u64)> {
    let format = probe_format(input_path)?
        .ok_or_else(|| ConvertError::UnsupportedFormat(display_name(input_path)))?;
    verbose!("{}: detected {}", display_name(input_path), format_name(format));

    let original_size = fs::metadata(input_path)?.len();
    let (img, orientation) = load_oriented(input_path)?;
    verbose!("EXIF orientation {}, encoding {}", orientation, options.describe());

    if img.width() > WEBP_MAX_DIMENSION || img.height() > WEBP_MAX_DIMENSION {
        return Err(ConvertError::InvalidDimensions(
            img.width(),
            img.height(),
            WEBP_MAX_DIMENSION,
        ));
    }

    let bytes = encode(&img, options)?;
    let output = write_unique(input_path, output_dir, &bytes)?;

    Ok((output, original_size, bytes.len() as u64))
}

/// Decodes an image and bakes its EXIF orientation into the pixels.
///
/// Returns the image together with the raw orientation value that was read
/// (1 when the file has none).
pub fn load_oriented(input_path: &Path) -> Result<(DynamicImage, u8)> {
    let mut decoder = ImageReader::open(input_path)?
        .with_guessed_format()?
        .into_decoder()?;
    let orientation = decoder.orientation()?.to_exif();
    let img = DynamicImage::from_decoder(decoder)?;

    Ok((apply_orientation(img, orientation), orientation))
}

/// Rotates for EXIF orientations 6, 8 and 3. Mirrored orientations are left
/// as decoded.
pub fn apply_orientation(img: DynamicImage, orientation: u8) -> DynamicImage {
    match orientation {
        6 => img.rotate90(),
        8 => img.rotate270(),
        3 => img.rotate180(),
        _ => img,
    }
}

/// Picks `<stem>-generated.webp`, or `<stem>-generated<N>.webp` with the
/// first free N starting at 1.
pub fn unique_output_path(input_path: &Path, output_dir: &Path) -> Result<PathBuf> {
    let base_name = output_base_name(input_path)?;
    let mut candidate = output_dir.join(format!("{}.{}", base_name, OUTPUT_EXTENSION));
    let mut counter = 1u32;

    while candidate.exists() {
        candidate = output_dir.join(format!("{}{}.{}", base_name, counter, OUTPUT_EXTENSION));
        counter += 1;
    }

    Ok(candidate)
}

fn output_base_name(input_path: &Path) -> Result<String> {
    let stem = input_path
        .file_stem()
        .ok_or_else(|| ConvertError::InvalidFileName(input_path.to_path_buf()))?;
    Ok(format!("{}{}", stem.to_string_lossy(), OUTPUT_SUFFIX))
}

/// Writes the encoded bytes under a fresh name. `create_new` closes the gap
/// between picking a name and creating the file; a name taken in that gap
/// sends the loop on to the next free one.
fn write_unique(input_path: &Path, output_dir: &Path, bytes: &[u8]) -> Result<PathBuf> {
    loop {
        let candidate = unique_output_path(input_path, output_dir)?;
        let mut open = OpenOptions::new();
        open.write(true).create_new(true);

        match open.open(&candidate) {
            Ok(mut file) => {
                file.write_all(bytes)?;
                return Ok(candidate);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::CompressionLevel;
    use image::{GenericImageView, Rgb, RgbImage};
    use std::fs::File;
    use tempfile::TempDir;

    fn lossy() -> EncoderOptions {
        EncoderOptions::build(80, CompressionLevel::Lossy, false)
    }

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(width, height, Rgb([200, 100, 50]))
            .save_with_format(&path, image::ImageFormat::Png)
            .unwrap();
        path
    }

    #[test]
    fn test_unique_output_path_first_free() {
        let temp_dir = TempDir::new().unwrap();
        let result = unique_output_path(Path::new("photo.jpg"), temp_dir.path()).unwrap();
        assert_eq!(result, temp_dir.path().join("photo-generated.webp"));
    }

    #[test]
    fn test_unique_output_path_counts_up() {
        let temp_dir = TempDir::new().unwrap();
        let input = Path::new("/somewhere/photo.jpg");

        File::create(temp_dir.path().join("photo-generated.webp")).unwrap();
        assert_eq!(
            unique_output_path(input, temp_dir.path()).unwrap(),
            temp_dir.path().join("photo-generated1.webp")
        );

        File::create(temp_dir.path().join("photo-generated1.webp")).unwrap();
        assert_eq!(
            unique_output_path(input, temp_dir.path()).unwrap(),
            temp_dir.path().join("photo-generated2.webp")
        );
    }

    #[test]
    fn test_unique_output_path_without_stem() {
        let result = unique_output_path(Path::new("/"), Path::new("/tmp"));
        assert!(matches!(result, Err(ConvertError::InvalidFileName(_))));
    }

    #[test]
    fn test_apply_orientation() {
        let img = DynamicImage::new_rgb8(4, 2);
        assert_eq!(apply_orientation(img.clone(), 1).dimensions(), (4, 2));
        assert_eq!(apply_orientation(img.clone(), 6).dimensions(), (2, 4));
        assert_eq!(apply_orientation(img.clone(), 8).dimensions(), (2, 4));
        assert_eq!(apply_orientation(img.clone(), 3).dimensions(), (4, 2));
        assert_eq!(apply_orientation(img, 2).dimensions(), (4, 2));
    }

    #[test]
    fn test_apply_orientation_directions() {
        let mut src = RgbImage::new(2, 1);
        src.put_pixel(0, 0, Rgb([255, 0, 0]));
        src.put_pixel(1, 0, Rgb([0, 0, 255]));
        let img = DynamicImage::ImageRgb8(src);

        // clockwise: the left pixel ends up on top
        let cw = apply_orientation(img.clone(), 6).to_rgb8();
        assert_eq!(cw.get_pixel(0, 0), &Rgb([255, 0, 0]));
        assert_eq!(cw.get_pixel(0, 1), &Rgb([0, 0, 255]));

        let ccw = apply_orientation(img, 8).to_rgb8();
        assert_eq!(ccw.get_pixel(0, 0), &Rgb([0, 0, 255]));
        assert_eq!(ccw.get_pixel(0, 1), &Rgb([255, 0, 0]));
    }

    #[test]
    fn test_convert_file_success() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_png(temp_dir.path(), "photo.png", 8, 6);

        let result = convert_file(&input, temp_dir.path(), &lossy());
        assert!(result.is_success());
        let output = result.output().unwrap();
        assert_eq!(output, temp_dir.path().join("photo-generated.webp"));

        let decoded = image::open(output).unwrap();
        assert_eq!(decoded.dimensions(), (8, 6));
    }

    #[test]
    fn test_convert_file_never_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_png(temp_dir.path(), "photo.png", 4, 4);

        let first = convert_file(&input, temp_dir.path(), &lossy());
        let second = convert_file(&input, temp_dir.path(), &lossy());
        let third = convert_file(&input, temp_dir.path(), &lossy());

        assert_eq!(first.output().unwrap(), temp_dir.path().join("photo-generated.webp"));
        assert_eq!(second.output().unwrap(), temp_dir.path().join("photo-generated1.webp"));
        assert_eq!(third.output().unwrap(), temp_dir.path().join("photo-generated2.webp"));
    }

    #[test]
    fn test_write_unique_leaves_existing_outputs_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let taken = temp_dir.path().join("photo-generated.webp");
        fs::write(&taken, b"earlier output").unwrap();

        let written = write_unique(Path::new("photo.jpg"), temp_dir.path(), b"new").unwrap();
        assert_eq!(written, temp_dir.path().join("photo-generated1.webp"));
        assert_eq!(fs::read(&taken).unwrap(), b"earlier output");
        assert_eq!(fs::read(&written).unwrap(), b"new");
    }

    #[test]
    fn test_convert_file_rejects_non_image() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("fake.jpg");
        fs::write(&input, b"this is a text file").unwrap();

        let result = convert_file(&input, temp_dir.path(), &lossy());
        assert!(!result.is_success());
        match result.outcome {
            ConversionOutcome::Failed { reason } => {
                assert!(reason.contains("fake.jpg"));
                assert!(reason.contains("not a supported image type"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(!temp_dir.path().join("fake-generated.webp").exists());
    }

    #[test]
    fn test_convert_file_missing_input_is_a_failure_not_a_panic() {
        let temp_dir = TempDir::new().unwrap();
        let result = convert_file(&temp_dir.path().join("gone.png"), temp_dir.path(), &lossy());
        assert!(!result.is_success());
    }

    #[test]
    fn test_convert_file_truncated_image() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_png(temp_dir.path(), "cut.png", 32, 32);
        let bytes = fs::read(&input).unwrap();
        fs::write(&input, &bytes[..bytes.len() / 2]).unwrap();

        let result = convert_file(&input, temp_dir.path(), &lossy());
        assert!(!result.is_success());
    }

    #[test]
    fn test_load_oriented_without_exif() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_png(temp_dir.path(), "plain.png", 5, 3);
        let (img, orientation) = load_oriented(&input).unwrap();
        assert_eq!(orientation, 1);
        assert_eq!(img.dimensions(), (5, 3));
    }
}
