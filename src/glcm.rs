// src/glcm.rs - Gray-tone spatial-dependence matrices (GLCM)

use crate::errors::{HaralickError, Result};
use crate::quantize::GrayToneGrid;

/// The four pixel-adjacency directions at distance d
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Deg0,
    Deg45,
    Deg90,
    Deg135,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Deg0,
        Direction::Deg45,
        Direction::Deg90,
        Direction::Deg135,
    ];

    /// Angle in degrees, for messages and debugging
    pub fn degrees(self) -> u32 {
        match self {
            Direction::Deg0 => 0,
            Direction::Deg45 => 45,
            Direction::Deg90 => 90,
            Direction::Deg135 => 135,
        }
    }

    /// Whether the offset (dx, dy) from a reference pixel to a neighbor
    /// belongs to this direction at distance d.
    #[inline]
    fn matches(self, dx: isize, dy: isize, d: isize) -> bool {
        match self {
            Direction::Deg0 => dx == 0 && dy.abs() == d,
            Direction::Deg45 => (dx == d && dy == -d) || (dx == -d && dy == d),
            Direction::Deg90 => dx.abs() == d && dy == 0,
            Direction::Deg135 => (dx == d && dy == d) || (dx == -d && dy == -d),
        }
    }
}

/// One direction's co-occurrence counts plus its total pair count R.
///
/// Indexing is [neighbor][reference]: a pair with reference tone j and
/// neighbor tone i increments entry (i, j). The matrix is not symmetric in
/// general and the row/column semantics must stay aligned with the marginal
/// computations downstream.
#[derive(Debug, Clone)]
pub struct CountMatrix {
    gray_tones: usize,
    counts: Vec<u64>,
    total: u64,
}

impl CountMatrix {
    fn new(gray_tones: usize) -> Self {
        Self {
            gray_tones,
            counts: vec![0; gray_tones * gray_tones],
            total: 0,
        }
    }

    #[inline]
    fn increment(&mut self, neighbor_tone: usize, reference_tone: usize) {
        self.counts[neighbor_tone * self.gray_tones + reference_tone] += 1;
        self.total += 1;
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> u64 {
        self.counts[i * self.gray_tones + j]
    }

    /// Total pair count R for this direction
    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Divide every entry by R to obtain the joint probability matrix.
    ///
    /// R = 0 means the image held no pixel pair at this direction's offset
    /// (image too small relative to d); that is surfaced as a degenerate-input
    /// error instead of dividing by zero.
    pub fn normalize(&self, direction: Direction) -> Result<ProbabilityMatrix> {
        if self.total == 0 {
            return Err(HaralickError::DegenerateInput(format!(
                "no pixel pairs at {} degrees; image too small for the configured distance",
                direction.degrees()
            )));
        }

        let r = self.total as f64;
        let probabilities = self.counts.iter().map(|&c| c as f64 / r).collect();

        Ok(ProbabilityMatrix {
            gray_tones: self.gray_tones,
            probabilities,
        })
    }
}

/// A normalized g x g gray-tone spatial-dependence matrix; entries sum to 1
#[derive(Debug, Clone)]
pub struct ProbabilityMatrix {
    gray_tones: usize,
    probabilities: Vec<f64>,
}

impl ProbabilityMatrix {
    #[inline]
    pub fn gray_tones(&self) -> usize {
        self.gray_tones
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.probabilities[i * self.gray_tones + j]
    }

    /// Flat view of all entries, row-major
    #[inline]
    pub fn entries(&self) -> &[f64] {
        &self.probabilities
    }
}

/// Build the four directional count matrices for a gray-tone grid.
///
/// Every pixel (m, n) is scanned against the square window
/// [m-d, m+d] x [n-d, n+d] clipped to the image; each in-window pixel (k, l)
/// whose offset matches a direction increments that direction's entry
/// (tone(k, l), tone(m, n)). Boundary pixels contribute fewer pairs; there is
/// no wraparound.
pub fn build_count_matrices(grid: &GrayToneGrid, distance: usize) -> Result<[CountMatrix; 4]> {
    if distance < 1 {
        return Err(HaralickError::Config(format!(
            "distance must be >= 1, got {}",
            distance
        )));
    }

    let g = grid.gray_tones();
    let width = grid.width() as isize;
    let height = grid.height() as isize;
    let d = distance as isize;

    let mut matrices = [
        CountMatrix::new(g),
        CountMatrix::new(g),
        CountMatrix::new(g),
        CountMatrix::new(g),
    ];

    for m in 0..width {
        for n in 0..height {
            let reference = grid.get(m as usize, n as usize);

            for k in (m - d).max(0)..(m + d + 1).min(width) {
                for l in (n - d).max(0)..(n + d + 1).min(height) {
                    let (dx, dy) = (k - m, l - n);

                    for (idx, direction) in Direction::ALL.iter().enumerate() {
                        if direction.matches(dx, dy, d) {
                            let neighbor = grid.get(k as usize, l as usize);
                            matrices[idx].increment(neighbor, reference);
                        }
                    }
                }
            }
        }
    }

    Ok(matrices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantize::quantize;
    use assert_approx_eq::assert_approx_eq;
    use image::GrayImage;

    fn checkerboard(size: u32) -> GrayImage {
        GrayImage::from_fn(size, size, |x, y| {
            image::Luma([if (x + y) % 2 == 0 { 0 } else { 255 }])
        })
    }

    #[test]
    fn pair_counts_on_square_image() {
        let img = GrayImage::from_pixel(4, 4, image::Luma([128]));
        let grid = quantize(&img, 4).unwrap();
        let matrices = build_count_matrices(&grid, 1).unwrap();

        // 4x4 image, d=1: 24 ordered pairs along each axis, 18 per diagonal
        assert_eq!(matrices[0].total(), 24);
        assert_eq!(matrices[1].total(), 18);
        assert_eq!(matrices[2].total(), 24);
        assert_eq!(matrices[3].total(), 18);
    }

    #[test]
    fn uniform_image_concentrates_on_one_cell() {
        // Intensity 128 with g=4 maps to tone 2
        let img = GrayImage::from_pixel(4, 4, image::Luma([128]));
        let grid = quantize(&img, 4).unwrap();
        let matrices = build_count_matrices(&grid, 1).unwrap();

        for (idx, direction) in Direction::ALL.iter().enumerate() {
            let p = matrices[idx].normalize(*direction).unwrap();
            assert_approx_eq!(p.get(2, 2), 1.0, 1e-12);

            let sum: f64 = p.entries().iter().sum();
            assert_approx_eq!(sum, 1.0, 1e-9);
        }
    }

    #[test]
    fn checkerboard_axes_are_off_diagonal() {
        let grid = quantize(&checkerboard(4), 2).unwrap();
        let matrices = build_count_matrices(&grid, 1).unwrap();

        // Axis-aligned neighbors always differ in tone
        for idx in [0, 2] {
            let p = matrices[idx].normalize(Direction::ALL[idx]).unwrap();
            assert_approx_eq!(p.get(0, 0), 0.0, 1e-12);
            assert_approx_eq!(p.get(1, 1), 0.0, 1e-12);
            assert_approx_eq!(p.get(0, 1) + p.get(1, 0), 1.0, 1e-9);
        }

        // Diagonal neighbors always share a tone
        for idx in [1, 3] {
            let p = matrices[idx].normalize(Direction::ALL[idx]).unwrap();
            assert_approx_eq!(p.get(0, 1), 0.0, 1e-12);
            assert_approx_eq!(p.get(1, 0), 0.0, 1e-12);
            assert_approx_eq!(p.get(0, 0) + p.get(1, 1), 1.0, 1e-9);
        }
    }

    #[test]
    fn asymmetric_indexing_is_neighbor_then_reference() {
        // Two-pixel column: tone 0 above tone 3. With d=1 the 0-degree matrix
        // holds one pair per ordering, at (neighbor, reference).
        let img = GrayImage::from_fn(1, 2, |_, y| image::Luma([if y == 0 { 0 } else { 255 }]));
        let grid = quantize(&img, 4).unwrap();
        let matrices = build_count_matrices(&grid, 1).unwrap();

        assert_eq!(matrices[0].total(), 2);
        assert_eq!(matrices[0].get(3, 0), 1);
        assert_eq!(matrices[0].get(0, 3), 1);
    }

    #[test]
    fn degenerate_direction_is_an_error() {
        // 1x1 image has no pairs in any direction
        let img = GrayImage::from_pixel(1, 1, image::Luma([42]));
        let grid = quantize(&img, 4).unwrap();
        let matrices = build_count_matrices(&grid, 1).unwrap();

        for (idx, direction) in Direction::ALL.iter().enumerate() {
            assert_eq!(matrices[idx].total(), 0);
            assert!(matches!(
                matrices[idx].normalize(*direction),
                Err(HaralickError::DegenerateInput(_))
            ));
        }
    }

    #[test]
    fn zero_distance_is_a_config_error() {
        let img = GrayImage::from_pixel(4, 4, image::Luma([128]));
        let grid = quantize(&img, 4).unwrap();
        assert!(matches!(
            build_count_matrices(&grid, 0),
            Err(HaralickError::Config(_))
        ));
    }
}
