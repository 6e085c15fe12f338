// src/config.rs - Configuration for the Haralick GLCM extractor

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{HaralickError, Result};

/// Configuration for HaralickGLCM
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub input_path: String,
    pub output_dir: String,

    /// Number of gray-tones g (quantization bins), g >= 2
    #[serde(default = "default_gray_tones")]
    pub gray_tones: usize,

    /// Co-occurrence offset distance d, d >= 1
    #[serde(default = "default_distance")]
    pub distance: usize,

    /// Optional list of [g, d] parameter variations; each variation produces
    /// its own CSV file. When absent, the single (gray_tones, distance) pair
    /// is used.
    #[serde(default)]
    pub variations: Option<Vec<[usize; 2]>>,

    /// Whether the grand mean replicates the reference accumulation (all four
    /// directions read the 0-degree matrix) or each direction reads its own.
    #[serde(default = "default_grand_mean_mode")]
    pub grand_mean_mode: GrandMeanMode,

    #[serde(default = "default_parallel")]
    pub use_parallel: bool,
}

/// Grand mean computation mode.
///
/// The reference implementation accumulates only the 0-degree probability
/// matrix into all four directional grand means. FAITHFUL reproduces that for
/// output comparability; CORRECTED sums each direction's own matrix. The two
/// agree whenever every direction has pairs, because each probability matrix
/// sums to 1.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum GrandMeanMode {
    Faithful,
    Corrected,
}

fn default_gray_tones() -> usize {
    8
}

fn default_distance() -> usize {
    1
}

fn default_grand_mean_mode() -> GrandMeanMode {
    GrandMeanMode::Faithful
}

fn default_parallel() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            HaralickError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            HaralickError::Config(format!("Failed to parse config file '{}': {}", path.display(), e))
        })?;

        Ok(config)
    }

    /// Create default configuration
    pub fn default() -> Self {
        Self {
            input_path: "./input".to_string(),
            output_dir: "./output".to_string(),
            gray_tones: 8,
            distance: 1,
            variations: None,
            grand_mean_mode: GrandMeanMode::Faithful,
            use_parallel: true,
        }
    }

    /// The effective list of (g, d) parameter pairs to extract
    pub fn effective_variations(&self) -> Vec<(usize, usize)> {
        match &self.variations {
            Some(list) if !list.is_empty() => list.iter().map(|v| (v[0], v[1])).collect(),
            _ => vec![(self.gray_tones, self.distance)],
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        // Check input path exists
        let input_path = PathBuf::from(&self.input_path);
        if !input_path.exists() {
            return Err(HaralickError::InvalidPath(input_path));
        }

        for (g, d) in self.effective_variations() {
            if g < 2 {
                return Err(HaralickError::Config(format!(
                    "gray_tones must be >= 2, got {}",
                    g
                )));
            }
            if g > crate::quantize::MAX_GRAY_TONES {
                return Err(HaralickError::Config(format!(
                    "gray_tones must be <= {}, got {}",
                    crate::quantize::MAX_GRAY_TONES,
                    g
                )));
            }
            if d < 1 {
                return Err(HaralickError::Config(format!(
                    "distance must be >= 1, got {}",
                    d
                )));
            }
        }

        // Create the output directory if it doesn't exist
        fs::create_dir_all(&self.output_dir).map_err(HaralickError::Io)?;

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            HaralickError::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content).map_err(HaralickError::Io)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_variations_falls_back_to_single_pair() {
        let mut config = Config::default();
        config.gray_tones = 16;
        config.distance = 2;
        assert_eq!(config.effective_variations(), vec![(16, 2)]);

        config.variations = Some(vec![[4, 1], [8, 2]]);
        assert_eq!(config.effective_variations(), vec![(4, 1), (8, 2)]);
    }

    #[test]
    fn parse_minimal_toml() {
        let config: Config = toml::from_str(
            r#"
            input_path = "./images"
            output_dir = "./out"
            "#,
        )
        .unwrap();

        assert_eq!(config.gray_tones, 8);
        assert_eq!(config.distance, 1);
        assert_eq!(config.grand_mean_mode, GrandMeanMode::Faithful);
        assert!(config.use_parallel);
    }

    #[test]
    fn parse_grand_mean_mode() {
        let config: Config = toml::from_str(
            r#"
            input_path = "./images"
            output_dir = "./out"
            grand_mean_mode = "CORRECTED"
            "#,
        )
        .unwrap();

        assert_eq!(config.grand_mean_mode, GrandMeanMode::Corrected);
    }
}
