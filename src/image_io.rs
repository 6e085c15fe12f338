use std::path::{Path, PathBuf};
use std::fs;
use image::GrayImage;

use crate::errors::{HaralickError, Result};

/// File extensions accepted by the batch driver
const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "jfif", "bmp", "tif", "tiff", "gif"];

/// Represents an input image with its metadata
pub struct InputImage {
    pub image: GrayImage,
    pub path: PathBuf,
    pub filename: String,
}

/// Get all supported image files from a directory (recursively)
pub fn get_image_files_in_dir<P: AsRef<Path>>(dir_path: P) -> Result<Vec<PathBuf>> {
    let dir_path = dir_path.as_ref();

    if !dir_path.exists() {
        return Err(HaralickError::InvalidPath(dir_path.to_path_buf()));
    }

    if !dir_path.is_dir() {
        return Err(HaralickError::Config(format!(
            "{} is not a directory", dir_path.display()
        )));
    }

    let mut image_files = Vec::new();
    find_image_files_recursive(dir_path, &mut image_files)?;

    Ok(image_files)
}

/// Helper function to recursively search for supported image files
fn find_image_files_recursive(dir_path: &Path, result: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir_path).map_err(HaralickError::Io)?;

    for entry in entries {
        let entry = entry.map_err(HaralickError::Io)?;
        let path = entry.path();

        if path.is_dir() {
            // Recursively search subdirectories
            find_image_files_recursive(&path, result)?;
        } else if path.is_file() {
            if let Some(ext) = path.extension() {
                let ext = ext.to_ascii_lowercase();
                if IMAGE_EXTENSIONS.iter().any(|e| ext == *e) {
                    result.push(path);
                }
            }
        }
    }

    Ok(())
}

/// Load an image and convert it to 8-bit grayscale.
///
/// Color conversion uses the image crate's luma weighting; the extractor core
/// only ever sees the finished grayscale grid.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<InputImage> {
    let path = path.as_ref();

    // Key column of the output CSV is the file name, not the full path
    let filename = path.file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| HaralickError::InvalidPath(path.to_path_buf()))?
        .to_string();

    // Decode by content so mislabelled extensions (e.g. .jfif) still load
    let img = image::io::Reader::open(path)
        .map_err(HaralickError::Io)?
        .with_guessed_format()
        .map_err(HaralickError::Io)?
        .decode()
        .map_err(HaralickError::Image)?;

    let gray_img = img.to_luma8();

    Ok(InputImage {
        image: gray_img,
        path: path.to_path_buf(),
        filename,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_directory() {
        let result = get_image_files_in_dir("/nonexistent/haralick/input");
        assert!(matches!(result, Err(HaralickError::InvalidPath(_))));
    }
}
