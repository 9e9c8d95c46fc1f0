//! Pixel distance and text masking
//!
//! Text pixels are classified purely by Euclidean RGB distance to the
//! declared foreground color. The threshold is supplied by each estimator.

use super::conversion::{to_array, ColorRgb};
use image::{Rgb, RgbImage};

/// Euclidean distance between two RGB triples
#[inline]
pub fn distance(a: [u8; 3], b: [u8; 3]) -> f64 {
    let dr = a[0] as f64 - b[0] as f64;
    let dg = a[1] as f64 - b[1] as f64;
    let db = a[2] as f64 - b[2] as f64;
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Euclidean distance between two colors
#[inline]
pub fn color_distance(a: ColorRgb, b: ColorRgb) -> f64 {
    distance(to_array(a), to_array(b))
}

/// True iff the pixel lies within `threshold` of the foreground color
#[inline]
pub fn is_foreground(pixel: &Rgb<u8>, foreground: ColorRgb, threshold: f64) -> bool {
    distance(pixel.0, to_array(foreground)) <= threshold
}

/// Background test, the exact complement of [`is_foreground`]
#[inline]
pub fn is_background(pixel: &Rgb<u8>, foreground: ColorRgb, threshold: f64) -> bool {
    !is_foreground(pixel, foreground, threshold)
}

/// Boolean text mask with the same dimensions as its source image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMask {
    width: u32,
    height: u32,
    text: Vec<bool>,
}

impl TextMask {
    /// Classify every pixel of `image` against the foreground color
    pub fn new(image: &RgbImage, foreground: ColorRgb, threshold: f64) -> Self {
        let text = image
            .pixels()
            .map(|pixel| is_foreground(pixel, foreground, threshold))
            .collect();

        Self {
            width: image.width(),
            height: image.height(),
            text,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the pixel at (x, y) was classified as text
    #[inline]
    pub fn is_text(&self, x: u32, y: u32) -> bool {
        self.text[(y as usize) * (self.width as usize) + x as usize]
    }

    /// Number of pixels classified as text
    pub fn text_count(&self) -> usize {
        self.text.iter().filter(|&&t| t).count()
    }

    /// Number of pixels classified as background
    pub fn background_count(&self) -> usize {
        self.text.len() - self.text_count()
    }

    /// Background pixels of `image` in row-major order
    ///
    /// `image` must be the image the mask was built from.
    pub fn background_pixels(&self, image: &RgbImage) -> Vec<[u8; 3]> {
        debug_assert_eq!(image.dimensions(), (self.width, self.height));
        image
            .pixels()
            .zip(self.text.iter())
            .filter(|(_, &is_text)| !is_text)
            .map(|(pixel, _)| pixel.0)
            .collect()
    }
}
