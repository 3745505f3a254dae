use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Walkdir error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Only one of -i/--input or -d/--directory parameters can be used")]
    ConflictingInputModes,

    #[error("Must provide -i/--input or -d/--directory parameter")]
    MissingInputMode,

    #[error("Specified {kind} does not exist: {}", .path.display())]
    InputNotFound { kind: &'static str, path: PathBuf },

    #[error("Specified input path is not a directory: {}", .0.display())]
    InputNotDirectory(PathBuf),

    #[error("Specified output path does not exist or is not a directory: {}", .0.display())]
    OutputNotFound(PathBuf),

    #[error("File {0} is not a supported image type")]
    UnsupportedFormat(String),

    #[error("Invalid image dimensions: {0}x{1}. Maximum allowed: {2}x{2}")]
    InvalidDimensions(u32, u32, u32),

    #[error("WebP encoding failed: {0}")]
    Encode(String),

    #[error("Invalid file name: {}", .0.display())]
    InvalidFileName(PathBuf),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
