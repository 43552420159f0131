//! PNG encoding and decoding for canvases, tiles and source images

use crate::io::error::{MosaicError, Result, file_system_error};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbImage};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Lossless PNG compression effort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PngCompression {
    /// Fastest encoding, largest files
    Fast,
    /// Encoder default balance
    #[default]
    Default,
    /// Smallest files, slowest encoding
    Best,
}

impl PngCompression {
    const fn codec_settings(self) -> CompressionType {
        match self {
            Self::Fast => CompressionType::Fast,
            Self::Default => CompressionType::Default,
            Self::Best => CompressionType::Best,
        }
    }
}

/// Encode an RGB image as PNG bytes
///
/// # Errors
///
/// Returns an error if the encoder rejects the image
pub fn encode_png(image: &RgbImage, compression: PngCompression) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new_with_quality(&mut bytes, compression.codec_settings(), FilterType::Adaptive)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| MosaicError::ImageExport {
            path: "<memory>".into(),
            source: e,
        })?;
    Ok(bytes)
}

/// Write an RGB image as a PNG file, creating parent directories as needed
///
/// Existing files are overwritten.
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The file cannot be created
/// - Encoding fails
pub fn save_png(image: &RgbImage, path: &Path, compression: PngCompression) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(file_system_error(parent, "create directory"))?;
    }

    let file = File::create(path).map_err(file_system_error(path, "create file"))?;
    let mut writer = BufWriter::new(file);
    PngEncoder::new_with_quality(
        &mut writer,
        compression.codec_settings(),
        FilterType::Adaptive,
    )
    .write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgb8,
    )
    .map_err(|e| MosaicError::ImageExport {
        path: path.to_path_buf(),
        source: e,
    })?;
    writer.flush().map_err(file_system_error(path, "write file"))
}

/// Decode image bytes of any supported format
///
/// # Errors
///
/// Returns `ImageLoad` naming `reference` if the bytes cannot be decoded
pub fn decode_image(bytes: &[u8], reference: &str) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| MosaicError::ImageLoad {
        path: reference.into(),
        source: e,
    })
}

/// Load an image file from disk
///
/// # Errors
///
/// Returns `ImageLoad` if the file is missing or cannot be decoded
pub fn open_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|e| MosaicError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })
}
