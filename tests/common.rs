#![allow(dead_code)]

use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, Rgb, RgbImage};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

/// Small opaque gradient, wider than tall so rotations are observable.
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 20) as u8, (y * 40) as u8, 128])
    })
}

pub fn create_png(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    gradient(8, 4)
        .save_with_format(&path, ImageFormat::Png)
        .unwrap();
    path
}

pub fn create_fake_image(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    File::create(&path)
        .unwrap()
        .write_all(b"not an image, just text with an image extension")
        .unwrap();
    path
}

/// Baseline JPEG with an APP1 EXIF segment carrying only the orientation tag.
pub fn create_jpeg_with_orientation(dir: &Path, name: &str, orientation: u16) -> PathBuf {
    let img = gradient(8, 4);
    let mut encoded = Vec::new();
    JpegEncoder::new_with_quality(&mut encoded, 95)
        .encode_image(&img)
        .unwrap();
    assert_eq!(&encoded[0..2], &[0xFF, 0xD8]);

    let mut exif = Vec::new();
    exif.extend_from_slice(b"Exif\0\0");
    // big-endian TIFF header, first IFD at offset 8
    exif.extend_from_slice(&[b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08]);
    exif.extend_from_slice(&1u16.to_be_bytes());
    // tag 0x0112 (Orientation), type SHORT, count 1, value left-aligned
    exif.extend_from_slice(&0x0112u16.to_be_bytes());
    exif.extend_from_slice(&3u16.to_be_bytes());
    exif.extend_from_slice(&1u32.to_be_bytes());
    exif.extend_from_slice(&orientation.to_be_bytes());
    exif.extend_from_slice(&[0x00, 0x00]);
    exif.extend_from_slice(&0u32.to_be_bytes());

    let mut jpeg = Vec::with_capacity(encoded.len() + exif.len() + 4);
    jpeg.extend_from_slice(&[0xFF, 0xD8, 0xFF, 0xE1]);
    jpeg.extend_from_slice(&((exif.len() + 2) as u16).to_be_bytes());
    jpeg.extend_from_slice(&exif);
    jpeg.extend_from_slice(&encoded[2..]);

    let path = dir.join(name);
    fs::write(&path, jpeg).unwrap();
    path
}

/// Three files spread over two subdirectories.
pub fn create_nested_directory_structure(root: &Path) -> Vec<PathBuf> {
    let first = root.join("first");
    let second = root.join("second").join("deeper");
    fs::create_dir_all(&first).unwrap();
    fs::create_dir_all(&second).unwrap();

    vec![
        create_png(root, "top.png"),
        create_png(&first, "middle.png"),
        create_png(&second, "bottom.png"),
    ]
}

pub fn create_test_output_directory(temp_dir: &Path) -> PathBuf {
    let output_dir = temp_dir.join("output");
    fs::create_dir(&output_dir).unwrap();
    output_dir
}
