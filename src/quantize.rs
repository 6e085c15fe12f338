// src/quantize.rs - Gray-tone quantization of 8-bit intensities

use image::GrayImage;

use crate::errors::{HaralickError, Result};

/// A grid of gray-tone values in [0, g-1], same dimensions as the source image
#[derive(Debug, Clone)]
pub struct GrayToneGrid {
    width: usize,
    height: usize,
    gray_tones: usize,
    data: Vec<u16>,
}

impl GrayToneGrid {
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of gray-tones g this grid was quantized to
    #[inline]
    pub fn gray_tones(&self) -> usize {
        self.gray_tones
    }

    /// Gray-tone value at (x, y)
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> usize {
        self.data[y * self.width + x] as usize
    }
}

/// Largest accepted g. Tones are stored as u16, and g beyond this would also
/// mean a count matrix of over 2^32 cells.
pub const MAX_GRAY_TONES: usize = 65536;

/// Remap an 8-bit grayscale image to g gray-tone bins.
///
/// `bin = floor(intensity / (256 / g))`; since intensity <= 255 the result is
/// always within [0, g-1].
pub fn quantize(image: &GrayImage, gray_tones: usize) -> Result<GrayToneGrid> {
    if gray_tones < 2 {
        return Err(HaralickError::Config(format!(
            "gray_tones must be >= 2, got {}",
            gray_tones
        )));
    }
    if gray_tones > MAX_GRAY_TONES {
        return Err(HaralickError::Config(format!(
            "gray_tones must be <= {}, got {}",
            MAX_GRAY_TONES, gray_tones
        )));
    }

    let (width, height) = image.dimensions();
    let bin_width = 256.0 / gray_tones as f64;

    let data = image
        .as_raw()
        .iter()
        .map(|&intensity| (intensity as f64 / bin_width) as u16)
        .collect();

    Ok(GrayToneGrid {
        width: width as usize,
        height: height as usize,
        gray_tones,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_image(width: u32, height: u32, intensity: u8) -> GrayImage {
        GrayImage::from_pixel(width, height, image::Luma([intensity]))
    }

    #[test]
    fn rejects_too_few_gray_tones() {
        let img = solid_image(4, 4, 128);
        assert!(matches!(quantize(&img, 1), Err(HaralickError::Config(_))));
        assert!(matches!(quantize(&img, 0), Err(HaralickError::Config(_))));
    }

    #[test]
    fn bins_cover_full_intensity_range() {
        let img = GrayImage::from_fn(256, 1, |x, _| image::Luma([x as u8]));
        let grid = quantize(&img, 4).unwrap();

        // bin_width = 64: 0..=63 -> 0, 64..=127 -> 1, 128..=191 -> 2, 192..=255 -> 3
        assert_eq!(grid.get(0, 0), 0);
        assert_eq!(grid.get(63, 0), 0);
        assert_eq!(grid.get(64, 0), 1);
        assert_eq!(grid.get(128, 0), 2);
        assert_eq!(grid.get(255, 0), 3);
    }

    #[test]
    fn top_intensity_maps_to_top_bin() {
        for g in [2, 3, 8, 256] {
            let grid = quantize(&solid_image(2, 2, 255), g).unwrap();
            assert_eq!(grid.get(0, 0), g - 1);
        }
    }

    #[test]
    fn rejects_gray_tones_beyond_tone_storage() {
        let img = solid_image(2, 2, 255);
        assert!(matches!(
            quantize(&img, MAX_GRAY_TONES + 1),
            Err(HaralickError::Config(_))
        ));

        // Large but in-range g still bins correctly: bin_width = 0.25,
        // 255 / 0.25 = 1020
        let grid = quantize(&img, 1024).unwrap();
        assert_eq!(grid.get(0, 0), 1020);
        let grid = quantize(&img, MAX_GRAY_TONES).unwrap();
        assert_eq!(grid.get(0, 0), 65280);
    }

    #[test]
    fn preserves_dimensions() {
        let grid = quantize(&solid_image(5, 3, 10), 8).unwrap();
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.gray_tones(), 8);
    }
}
