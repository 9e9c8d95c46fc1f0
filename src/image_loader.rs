//! Decoding captured text fragments into RGB rasters
//!
//! Screenshots arrive either as files on disk, as encoded bytes straight
//! from the capture tool (usually PNG), or as an already-decoded RGB
//! buffer. All three paths produce an [`image::RgbImage`], the raster type
//! every estimator reads from. Alpha is dropped during conversion.
//!
//! This is the only fatal path of the crate: a missing or undecodable image
//! halts evaluation, everything downstream contains its own failures.

use crate::error::{AnalysisError, Result};
use image::{ImageReader, RgbImage};
use log::info;
use std::path::Path;

/// Supported capture formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG image
    Png,
    /// JPEG image
    Jpeg,
    /// WebP image
    WebP,
    /// BMP image
    Bmp,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<ImageFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            "bmp" => Some(ImageFormat::Bmp),
            _ => None,
        }
    }
}

/// Load a captured image from disk as an RGB raster
///
/// # Errors
///
/// Returns `AnalysisError::ImageLoadError` if the file cannot be opened,
/// its extension is not a supported format, or decoding fails.
pub fn load_image(path: &Path) -> Result<RgbImage> {
    if ImageFormat::from_extension(path).is_none() {
        return Err(AnalysisError::ImageLoadError {
            message: format!("Unknown image format for file: {}", path.display()),
            source: None,
        });
    }

    let reader = ImageReader::open(path).map_err(|e| {
        AnalysisError::image_load(format!("Failed to open image file: {}", path.display()), e)
    })?;

    let decoded = reader.decode().map_err(|e| {
        AnalysisError::image_load(format!("Failed to decode image: {}", path.display()), e)
    })?;

    let rgb = decoded.to_rgb8();
    ensure_non_empty(&rgb)?;
    info!(
        "Loaded capture {} ({}x{})",
        path.display(),
        rgb.width(),
        rgb.height()
    );
    Ok(rgb)
}

/// Decode an encoded capture (PNG, JPEG, ...) held in memory
pub fn load_from_bytes(bytes: &[u8]) -> Result<RgbImage> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| AnalysisError::image_load("Failed to decode in-memory capture", e))?;
    let rgb = decoded.to_rgb8();
    ensure_non_empty(&rgb)?;
    Ok(rgb)
}

/// Wrap a tightly packed RGB byte buffer (row-major, 3 bytes per pixel)
///
/// # Errors
///
/// Returns `AnalysisError::InvalidParameter` if the buffer length is not
/// `width * height * 3` or either dimension is zero.
pub fn from_raw_rgb(width: u32, height: u32, data: Vec<u8>) -> Result<RgbImage> {
    let expected = width as usize * height as usize * 3;
    if data.len() != expected {
        return Err(AnalysisError::invalid_parameter(
            "data.len()",
            format!("{} (expected {} for {}x{})", data.len(), expected, width, height),
        ));
    }

    let rgb = RgbImage::from_raw(width, height, data).ok_or_else(|| {
        AnalysisError::invalid_parameter("dimensions", format!("{}x{}", width, height))
    })?;
    ensure_non_empty(&rgb)?;
    Ok(rgb)
}

fn ensure_non_empty(image: &RgbImage) -> Result<()> {
    if image.width() == 0 || image.height() == 0 {
        return Err(AnalysisError::ImageLoadError {
            message: format!("Image has zero area ({}x{})", image.width(), image.height()),
            source: None,
        });
    }
    Ok(())
}
