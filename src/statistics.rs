// src/statistics.rs - Marginal distributions and statistical moments of a
// normalized gray-tone spatial-dependence matrix

use crate::glcm::ProbabilityMatrix;

/// Per-direction statistics derived from one probability matrix.
///
/// All vectors are precomputed once; the feature engine reads them without
/// touching the matrix again except for the joint sums.
#[derive(Debug, Clone)]
pub struct DirectionStats {
    /// Average of all matrix entries. In faithful mode this is accumulated
    /// from the 0-degree matrix for every direction, replicating the
    /// reference implementation.
    pub grand_mean: f64,

    /// Mean of the row-mean vector (a mean of means, not probability-weighted)
    pub mu_x: f64,
    /// Mean of the column-mean vector
    pub mu_y: f64,

    /// sqrt of the sample variance of the per-row standard deviations.
    /// A nested variance-of-variances; replicated exactly because f3 depends
    /// on it.
    pub std_x: f64,
    /// sqrt of the sample variance of the per-column standard deviations
    pub std_y: f64,

    /// Marginal distribution p_x: row sums of the probability matrix
    pub px: Vec<f64>,
    /// Marginal distribution p_y: column sums of the probability matrix
    pub py: Vec<f64>,

    /// p_{x-y}(k) for k in [0, g-1]
    pub p_diff: Vec<f64>,
    /// p_{x+y}(k) for k in [2, 2g], stored at index k - 2
    pub p_sum: Vec<f64>,
}

impl DirectionStats {
    /// Compute the statistics of `matrix`. `grand_mean_source` is the matrix
    /// the grand mean accumulates over (the 0-degree matrix in faithful mode,
    /// `matrix` itself in corrected mode).
    pub fn compute(matrix: &ProbabilityMatrix, grand_mean_source: &ProbabilityMatrix) -> Self {
        let g = matrix.gray_tones();
        let gf = g as f64;

        let grand_mean = grand_mean_source.entries().iter().sum::<f64>() / (gf * gf);

        let mut px = vec![0.0; g];
        let mut py = vec![0.0; g];
        let mut p_diff = vec![0.0; g];
        let mut p_sum = vec![0.0; 2 * g - 1];

        for i in 0..g {
            for j in 0..g {
                let p = matrix.get(i, j);
                px[i] += p;
                py[j] += p;
                p_diff[i.abs_diff(j)] += p;
                // 1-indexed tone sum i+j runs over [2, 2g]
                p_sum[i + j] += p;
            }
        }

        let mu_x = px.iter().map(|&row_sum| row_sum / gf).sum::<f64>() / gf;
        let mu_y = py.iter().map(|&col_sum| col_sum / gf).sum::<f64>() / gf;

        // Per-row and per-column standard deviations, then a second sample
        // variance over those vectors
        let row_stds: Vec<f64> = (0..g)
            .map(|i| {
                let row: Vec<f64> = (0..g).map(|j| matrix.get(i, j)).collect();
                sample_variance(&row).sqrt()
            })
            .collect();
        let col_stds: Vec<f64> = (0..g)
            .map(|j| {
                let col: Vec<f64> = (0..g).map(|i| matrix.get(i, j)).collect();
                sample_variance(&col).sqrt()
            })
            .collect();

        let std_x = sample_variance(&row_stds).sqrt();
        let std_y = sample_variance(&col_stds).sqrt();

        DirectionStats {
            grand_mean,
            mu_x,
            mu_y,
            std_x,
            std_y,
            px,
            py,
            p_diff,
            p_sum,
        }
    }
}

/// Sample variance (divisor n-1) of a vector; 0 if fewer than two elements
pub fn sample_variance(data: &[f64]) -> f64 {
    if data.len() <= 1 {
        return 0.0;
    }

    let mean = data.iter().sum::<f64>() / data.len() as f64;
    let sum_of_squares: f64 = data.iter().map(|&v| (v - mean).powi(2)).sum();

    sum_of_squares / (data.len() - 1) as f64
}

/// Entropy of a vector: -sum(v * log10(v)) over nonzero entries.
///
/// Base-10 logarithms throughout, diverging from the base-2 convention of the
/// literature; preserved for output compatibility with the reference tool.
pub fn entropy(data: &[f64]) -> f64 {
    let mut entropy = 0.0;
    for &v in data {
        if v != 0.0 {
            entropy += v * v.log10();
        }
    }
    -entropy
}

/// HXY1 = -sum_{i,j} p(i,j) * log10(px(i) * py(j)) over entries with
/// p(i,j) != 0
pub fn hxy1(matrix: &ProbabilityMatrix, stats: &DirectionStats) -> f64 {
    let g = matrix.gray_tones();
    let mut sum = 0.0;

    for i in 0..g {
        for j in 0..g {
            let p = matrix.get(i, j);
            if p != 0.0 {
                sum += p * (stats.px[i] * stats.py[j]).log10();
            }
        }
    }

    -sum
}

/// HXY2 = -sum_{i,j} px(i)*py(j) * log10(px(i)*py(j)) over nonzero products
pub fn hxy2(stats: &DirectionStats) -> f64 {
    let g = stats.px.len();
    let mut sum = 0.0;

    for i in 0..g {
        for j in 0..g {
            let product = stats.px[i] * stats.py[j];
            if product != 0.0 {
                sum += product * product.log10();
            }
        }
    }

    -sum
}
