// src/lib.rs - Library interface for HaralickGLCM

pub mod config;
pub mod errors;
pub mod features;
pub mod glcm;
pub mod image_io;
pub mod output;
pub mod pipeline;
pub mod quantize;
pub mod statistics;

// Re-export commonly used types and functions
pub use errors::{HaralickError, Result};
pub use config::{Config, GrandMeanMode};
pub use pipeline::{extract_texture_features, process_image, GlcmParams, TextureSummary};
pub use image_io::{load_image, InputImage};

// Re-export the core building blocks
pub use quantize::{quantize, GrayToneGrid};
pub use glcm::{build_count_matrices, CountMatrix, Direction, ProbabilityMatrix};
pub use statistics::DirectionStats;
pub use features::{compute_features, FeatureVector, FEATURE_COUNT};

// Re-export CSV output helpers
pub use output::{variation_csv_name, write_texture_csv, TextureRow};
