//! Bitmap directory ingestion
//!
//! Each image file holds one letter. Dark pixels become `1` features, light
//! ones `0`, and the class is read from the file name: the first character
//! after the first `_` (`sample_a.bmp`, `017_Q.png`).

use crate::dataset::{Dataset, Sample};
use crate::error::{NetworkError, Result};
use image::RgbImage;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Number of letter classes, `a` to `z`.
pub const LETTER_CLASSES: usize = 26;

/// Class index of the letter a file name carries (`a` = 0, case-insensitive).
pub fn label_from_file_name(name: &str) -> Result<usize> {
    let (_, tail) = name
        .split_once('_')
        .ok_or_else(|| NetworkError::Label(format!("no '_' in file name {:?}", name)))?;
    let letter = tail
        .chars()
        .next()
        .filter(char::is_ascii_alphabetic)
        .ok_or_else(|| NetworkError::Label(format!("no letter after '_' in {:?}", name)))?;
    Ok((letter.to_ascii_lowercase() as u8 - b'a') as usize)
}

/// Flatten a bitmap row by row: a pixel with a red channel of 0 is ink (`1`),
/// anything else is background (`0`).
pub fn binarize(image: &RgbImage) -> Vec<u8> {
    let (width, height) = image.dimensions();
    let mut bits = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            bits.push(u8::from(image.get_pixel(x, y)[0] == 0));
        }
    }
    bits
}

/// Decode one image file into a sample plus its `(width, height)`.
pub fn load_file(path: &Path) -> Result<(Sample, (u32, u32))> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| NetworkError::Label(format!("unreadable file name {}", path.display())))?;
    let class = label_from_file_name(name)?;
    let image = image::open(path)?.to_rgb8();
    let dimensions = image.dimensions();
    let sample = Sample::with_class(binarize(&image), class, LETTER_CLASSES)?;
    Ok((sample, dimensions))
}

/// Load every image in `dir`, in file name order.
///
/// All bitmaps must share the dimensions of the first one. Subdirectories are
/// skipped.
pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Dataset> {
    let dir = dir.as_ref();
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            paths.push(path);
        } else {
            warn!("skipping non-file entry {}", path.display());
        }
    }
    paths.sort();

    let mut samples = Vec::with_capacity(paths.len());
    let mut expected: Option<(u32, u32)> = None;
    for path in &paths {
        let (sample, dimensions) = load_file(path)?;
        match expected {
            None => expected = Some(dimensions),
            Some(first) if first != dimensions => {
                return Err(NetworkError::InvalidShape {
                    op: "loader::load_dir",
                    expected: (first.1 as usize, first.0 as usize),
                    actual: (dimensions.1 as usize, dimensions.0 as usize),
                });
            }
            Some(_) => {}
        }
        samples.push(sample);
    }

    debug!("loaded {} bitmaps from {}", samples.len(), dir.display());
    Dataset::new(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_label_from_file_name() {
        assert_eq!(label_from_file_name("img_a.bmp").unwrap(), 0);
        assert_eq!(label_from_file_name("042_Q.png").unwrap(), 16);
        assert_eq!(label_from_file_name("x_z_extra.bmp").unwrap(), 25);
    }

    #[test]
    fn test_label_from_file_name_rejects() {
        assert!(label_from_file_name("noletter.bmp").is_err());
        assert!(label_from_file_name("img_1.bmp").is_err());
        assert!(label_from_file_name("img_.bmp").is_err());
    }

    #[test]
    fn test_binarize_row_major() {
        let mut img = RgbImage::from_pixel(3, 2, Rgb([255, 255, 255]));
        img.put_pixel(1, 0, Rgb([0, 0, 0]));
        img.put_pixel(2, 1, Rgb([0, 40, 40]));
        assert_eq!(binarize(&img), vec![0, 1, 0, 0, 0, 1]);
    }
}
