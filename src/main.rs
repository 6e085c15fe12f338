mod config;
mod errors;
mod features;
mod glcm;
mod image_io;
mod output;
mod pipeline;
mod quantize;
mod statistics;

use std::path::{Path, PathBuf};
use std::time::Instant;
use clap::Parser;
use rayon::prelude::*;

use config::Config;
use errors::{HaralickError, Result};
use image_io::{get_image_files_in_dir, load_image};
use output::{write_texture_csv, TextureRow};
use pipeline::{process_image, GlcmParams};

/// Command-line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about = "HaralickGLCM - Texture Feature Extraction")]
struct Args {
    /// Path to input file or directory
    #[clap(short, long)]
    input: Option<String>,

    /// Path to output directory
    #[clap(short, long)]
    output: Option<String>,

    /// Path to configuration file
    #[clap(short, long, default_value = "config.toml")]
    config: String,

    /// Number of gray-tones g (overwrites config)
    #[clap(short, long)]
    gray_tones: Option<usize>,

    /// Offset distance d (overwrites config)
    #[clap(short, long)]
    distance: Option<usize>,
}

/// Main function
fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // Load configuration, falling back to defaults when no file is present
    let mut config = if Path::new(&args.config).exists() {
        Config::from_file(&args.config)?
    } else {
        Config::default()
    };

    // Override config with command-line arguments
    if let Some(input) = args.input {
        config.input_path = input;
    }

    if let Some(output) = args.output {
        config.output_dir = output;
    }

    if let Some(gray_tones) = args.gray_tones {
        config.gray_tones = gray_tones;
        config.variations = None;
    }

    if let Some(distance) = args.distance {
        config.distance = distance;
        config.variations = None;
    }

    // Validate configuration
    config.validate()?;

    // Start timing
    let start_time = Instant::now();

    let input_path = PathBuf::from(&config.input_path);

    let image_files = if input_path.is_file() {
        vec![input_path]
    } else if input_path.is_dir() {
        println!("Processing directory: {}", input_path.display());
        get_image_files_in_dir(&input_path)?
    } else {
        return Err(HaralickError::InvalidPath(input_path));
    };

    println!("Found {} image files", image_files.len());

    for (gray_tones, distance) in config.effective_variations() {
        let params = GlcmParams::new(gray_tones, distance, config.grand_mean_mode);
        println!("Extracting with g={}, d={}", gray_tones, distance);

        let rows = if config.use_parallel {
            extract_rows_parallel(&image_files, &params)
        } else {
            extract_rows_sequential(&image_files, &params)
        };

        let csv_path = write_texture_csv(&rows, &config.output_dir, gray_tones, distance)?;
        println!("Wrote {} rows to {}", rows.len(), csv_path.display());
    }

    // Report elapsed time
    let elapsed = start_time.elapsed();
    println!("Extraction completed in {:.2} seconds", elapsed.as_secs_f64());

    Ok(())
}

/// Process files in parallel; a failed file is reported and skipped
fn extract_rows_parallel(files: &[PathBuf], params: &GlcmParams) -> Vec<TextureRow> {
    files
        .par_iter()
        .filter_map(|path| extract_row(path, params))
        .collect()
}

/// Process files sequentially; a failed file is reported and skipped
fn extract_rows_sequential(files: &[PathBuf], params: &GlcmParams) -> Vec<TextureRow> {
    files
        .iter()
        .filter_map(|path| extract_row(path, params))
        .collect()
}

fn extract_row(path: &Path, params: &GlcmParams) -> Option<TextureRow> {
    println!("Processing: {}", path.display());

    let input_image = match load_image(path) {
        Ok(input_image) => input_image,
        Err(e) => {
            eprintln!("Error loading {}: {}", path.display(), e);
            return None;
        }
    };

    match process_image(&input_image, params) {
        Ok((filename, summary)) => Some(TextureRow { filename, summary }),
        Err(e) => {
            eprintln!("Error processing {}: {}", path.display(), e);
            None
        }
    }
}
