use std::fs;
use std::path::{Path, PathBuf};
use csv::Writer;

use crate::errors::{HaralickError, Result};
use crate::features::FEATURE_COUNT;
use crate::pipeline::TextureSummary;

/// One output row: an image's file name and its 28-value texture summary
pub struct TextureRow {
    pub filename: String,
    pub summary: TextureSummary,
}

/// CSV file name for a (g, d) variation, e.g. "8g1d_glcm.csv"
pub fn variation_csv_name(gray_tones: usize, distance: usize) -> String {
    format!("{}g{}d_glcm.csv", gray_tones, distance)
}

/// Write one variation's texture rows to CSV.
///
/// Header is `filename, m_f1..m_f14, r_f1..r_f14`; one row per image, keyed
/// by the file name rather than the full path.
pub fn write_texture_csv<P: AsRef<Path>>(
    rows: &[TextureRow],
    output_dir: P,
    gray_tones: usize,
    distance: usize,
) -> Result<PathBuf> {
    let output_path = output_dir
        .as_ref()
        .join(variation_csv_name(gray_tones, distance));

    // Create directory if it doesn't exist
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).map_err(HaralickError::Io)?;
    }

    let mut writer = Writer::from_path(&output_path).map_err(HaralickError::CsvOutput)?;

    let mut header = vec!["filename".to_string()];
    for feature in 1..=FEATURE_COUNT {
        header.push(format!("m_f{}", feature));
    }
    for feature in 1..=FEATURE_COUNT {
        header.push(format!("r_f{}", feature));
    }
    writer.write_record(&header).map_err(HaralickError::CsvOutput)?;

    for row in rows {
        let mut record = vec![row.filename.clone()];
        record.extend(row.summary.mean.iter().map(|v| v.to_string()));
        record.extend(row.summary.range.iter().map(|v| v.to_string()));
        writer.write_record(&record).map_err(HaralickError::CsvOutput)?;
    }

    writer
        .flush()
        .map_err(|e| HaralickError::CsvOutput(csv::Error::from(e)))?;

    Ok(output_path)
}
