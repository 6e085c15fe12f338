// src/features.rs - The 14 Haralick textural features of one direction

use nalgebra::DMatrix;

use crate::errors::{HaralickError, Result};
use crate::glcm::ProbabilityMatrix;
use crate::statistics::{entropy, hxy1, hxy2, sample_variance, DirectionStats};

pub const FEATURE_COUNT: usize = 14;

/// The 14 features f1..f14 of one direction, addressable by feature index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Value of feature `number` (1-based, f1..f14)
    #[inline]
    pub fn feature(&self, number: usize) -> f64 {
        self.values[number - 1]
    }
}

/// Compute all 14 features for one direction.
///
/// f8 feeds f7, and f9 feeds f12 and f13, so those are evaluated in that
/// order. Gray-tone indices are 1-based inside the formulas, matching the
/// classical definitions.
pub fn compute_features(matrix: &ProbabilityMatrix, stats: &DirectionStats) -> Result<FeatureVector> {
    let g = matrix.gray_tones();

    let f1 = angular_second_moment(matrix);
    let f2 = contrast(&stats.p_diff);
    let f3 = correlation(matrix, stats);
    let f4 = sum_of_squares(matrix, stats.grand_mean);
    let f5 = inverse_difference_moment(matrix);
    let f6 = sum_average(&stats.p_sum);
    let f8 = entropy(&stats.p_sum);
    let f7 = sum_variance(&stats.p_sum, f8);
    let f9 = entropy(matrix.entries());
    let f10 = sample_variance(&stats.p_diff);
    let f11 = entropy(&stats.p_diff);
    let f12 = info_correlation_1(matrix, stats, f9);
    let f13 = info_correlation_2(stats, f9);
    let f14 = maximal_correlation_coefficient(matrix, stats, g)?;

    Ok(FeatureVector {
        values: [f1, f2, f3, f4, f5, f6, f7, f8, f9, f10, f11, f12, f13, f14],
    })
}

/// f1: sum of squared probabilities
fn angular_second_moment(matrix: &ProbabilityMatrix) -> f64 {
    matrix.entries().iter().map(|&p| p * p).sum()
}

/// f2: sum over k of k^2 * p_{x-y}(k)
fn contrast(p_diff: &[f64]) -> f64 {
    p_diff
        .iter()
        .enumerate()
        .map(|(k, &p)| (k * k) as f64 * p)
        .sum()
}

/// f3: the mux*muy term is subtracted once per cell (g^2 times in total),
/// matching the reference output rather than the textbook formula
fn correlation(matrix: &ProbabilityMatrix, stats: &DirectionStats) -> f64 {
    let g = matrix.gray_tones();
    let mut sum = 0.0;

    for i in 1..=g {
        for j in 1..=g {
            sum += (i * j) as f64 * matrix.get(i - 1, j - 1) - stats.mu_x * stats.mu_y;
        }
    }

    sum / (stats.std_x * stats.std_y)
}

/// f4: sum over (i, j) of (i - grandmu)^2 * p(i, j), i 1-based
fn sum_of_squares(matrix: &ProbabilityMatrix, grand_mean: f64) -> f64 {
    let g = matrix.gray_tones();
    let mut sum = 0.0;

    for i in 1..=g {
        for j in 1..=g {
            sum += (i as f64 - grand_mean).powi(2) * matrix.get(i - 1, j - 1);
        }
    }

    sum
}

/// f5: sum of p(i, j) / (1 + (i - j)^2)
fn inverse_difference_moment(matrix: &ProbabilityMatrix) -> f64 {
    let g = matrix.gray_tones();
    let mut sum = 0.0;

    for i in 0..g {
        for j in 0..g {
            let diff = i as f64 - j as f64;
            sum += matrix.get(i, j) / (1.0 + diff * diff);
        }
    }

    sum
}

/// f6: sum over k in [2, 2g] of k * p_{x+y}(k)
fn sum_average(p_sum: &[f64]) -> f64 {
    p_sum
        .iter()
        .enumerate()
        .map(|(idx, &p)| (idx + 2) as f64 * p)
        .sum()
}

/// f7: sum over k in [2, 2g] of (k - f8)^2 * p_{x+y}(k)
fn sum_variance(p_sum: &[f64], f8: f64) -> f64 {
    p_sum
        .iter()
        .enumerate()
        .map(|(idx, &p)| ((idx + 2) as f64 - f8).powi(2) * p)
        .sum()
}

/// f12: (f9 - HXY1) / max(HX, HY)
fn info_correlation_1(matrix: &ProbabilityMatrix, stats: &DirectionStats, f9: f64) -> f64 {
    let hx = entropy(&stats.px);
    let hy = entropy(&stats.py);

    (f9 - hxy1(matrix, stats)) / hx.max(hy)
}

/// f13: sqrt(1 - e^(-2 * (HXY2 - f9)))
fn info_correlation_2(stats: &DirectionStats, f9: f64) -> f64 {
    (1.0 - (-2.0 * (hxy2(stats) - f9)).exp()).sqrt()
}

/// f14: square root of the second-largest eigenvalue of Q, where
/// Q(i,j) = sum_k p(i,k) * p(j,k) / (px(i) * py(k)) over nonzero products.
///
/// Q is not symmetric in general, so the eigensolver may report complex
/// conjugate pairs; the feature is defined on the real parts. One occurrence
/// of the maximum is removed before taking the maximum of the remainder.
fn maximal_correlation_coefficient(
    matrix: &ProbabilityMatrix,
    stats: &DirectionStats,
    g: usize,
) -> Result<f64> {
    let q = DMatrix::from_fn(g, g, |i, j| {
        let mut sum = 0.0;
        for k in 0..g {
            let product = matrix.get(i, k) * matrix.get(j, k);
            if product != 0.0 {
                sum += product / (stats.px[i] * stats.py[k]);
            }
        }
        sum
    });

    let mut eigenvalues: Vec<f64> = q.complex_eigenvalues().iter().map(|ev| ev.re).collect();

    if eigenvalues.len() < 2 {
        return Err(HaralickError::DegenerateInput(
            "eigen spectrum too small for a second-largest eigenvalue".to_string(),
        ));
    }

    let max_idx = eigenvalues
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(idx, _)| idx)
        .ok_or_else(|| HaralickError::Other("empty eigenvalue list".to_string()))?;
    eigenvalues.swap_remove(max_idx);

    let second_largest = eigenvalues.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    Ok(second_largest.sqrt())
}
