//! Tests for bitmap loading
//!
//! This file covers:
//! - Decoding PNG and BMP letters into binary features
//! - File name labels and directory ordering
//! - Dimension, name and decoding errors
//! - Training end to end on loaded letters

use image::{Rgb, RgbImage};
use letter_perceptron::config::Hyperparameters;
use letter_perceptron::loader::{load_dir, load_file, LETTER_CLASSES};
use letter_perceptron::{Network, NetworkError};
use std::fs;
use std::path::Path;

const INK: Rgb<u8> = Rgb([0, 0, 0]);
const PAPER: Rgb<u8> = Rgb([255, 255, 255]);

const LETTER_A: [&str; 5] = ["..#..", ".#.#.", "#####", "#...#", "#...#"];
const LETTER_B: [&str; 5] = ["####.", "#...#", "####.", "#...#", "####."];
const LETTER_C: [&str; 5] = [".####", "#....", "#....", "#....", ".####"];

fn render(rows: &[&str]) -> RgbImage {
    let height = rows.len() as u32;
    let width = rows[0].len() as u32;
    let mut img = RgbImage::from_pixel(width, height, PAPER);
    for (y, row) in rows.iter().enumerate() {
        for (x, c) in row.chars().enumerate() {
            if c == '#' {
                img.put_pixel(x as u32, y as u32, INK);
            }
        }
    }
    img
}

fn bits(rows: &[&str]) -> Vec<f64> {
    rows.iter()
        .flat_map(|row| row.chars().map(|c| if c == '#' { 1.0 } else { 0.0 }))
        .collect()
}

fn write_letters(dir: &Path) {
    render(&LETTER_A).save(dir.join("00_a.png")).unwrap();
    render(&LETTER_B).save(dir.join("01_b.png")).unwrap();
    render(&LETTER_C).save(dir.join("02_C.png")).unwrap();
}

// ============================================================================
// Decoding
// ============================================================================

mod decoding_tests {
    use super::*;

    #[test]
    fn test_load_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample_a.png");
        render(&LETTER_A).save(&path).unwrap();

        let (sample, dimensions) = load_file(&path).unwrap();
        assert_eq!(dimensions, (5, 5));
        assert_eq!(sample.features(), bits(&LETTER_A).as_slice());
        assert_eq!(sample.class(), 0);
        assert_eq!(sample.label().len(), LETTER_CLASSES);
    }

    #[test]
    fn test_load_bmp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x_B.bmp");
        render(&LETTER_B).save(&path).unwrap();

        let (sample, _) = load_file(&path).unwrap();
        assert_eq!(sample.features(), bits(&LETTER_B).as_slice());
        assert_eq!(sample.class(), 1);
    }

    #[test]
    fn test_colored_ink_without_red_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("0_z.png");
        let mut img = RgbImage::from_pixel(2, 2, PAPER);
        img.put_pixel(0, 0, Rgb([0, 0, 255]));
        img.put_pixel(1, 1, Rgb([1, 0, 0]));
        img.save(&path).unwrap();

        let (sample, _) = load_file(&path).unwrap();
        assert_eq!(sample.features(), &[1.0, 0.0, 0.0, 0.0]);
        assert_eq!(sample.class(), 25);
    }
}

// ============================================================================
// Directories
// ============================================================================

mod directory_tests {
    use super::*;

    #[test]
    fn test_load_dir_sorted_by_name() {
        let dir = tempfile::tempdir().unwrap();
        write_letters(dir.path());
        fs::create_dir(dir.path().join("nested")).unwrap();

        let data = load_dir(dir.path()).unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data.feature_len(), Some(25));
        assert_eq!(data.class_count(), Some(LETTER_CLASSES));

        let classes: Vec<usize> = data.samples().iter().map(|s| s.class()).collect();
        assert_eq!(classes, vec![0, 1, 2]);
        assert_eq!(data.samples()[2].features(), bits(&LETTER_C).as_slice());
    }

    #[test]
    fn test_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let data = load_dir(dir.path()).unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dir(dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, NetworkError::Io(_)));
    }

    #[test]
    fn test_dimension_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        write_letters(dir.path());
        RgbImage::from_pixel(6, 5, PAPER)
            .save(dir.path().join("03_d.png"))
            .unwrap();

        let err = load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidShape { .. }));
    }

    #[test]
    fn test_unlabeled_file_name() {
        let dir = tempfile::tempdir().unwrap();
        write_letters(dir.path());
        render(&LETTER_A).save(dir.path().join("extra.png")).unwrap();

        let err = load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, NetworkError::Label(_)));
    }

    #[test]
    fn test_undecodable_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes_a.txt"), "not an image").unwrap();

        let err = load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, NetworkError::Image(_)));
    }
}

// ============================================================================
// End to end
// ============================================================================

mod end_to_end_tests {
    use super::*;

    fn train_letters(batch_size: usize, seed: u64) {
        let dir = tempfile::tempdir().unwrap();
        write_letters(dir.path());
        let mut data = load_dir(dir.path()).unwrap();

        let mut net = Network::new(
            &[25, 12, LETTER_CLASSES],
            Hyperparameters::new(200, batch_size, 2.0),
            Some(seed),
        )
        .unwrap();
        let reports = net.train(&mut data, None).unwrap();

        let last = reports.last().unwrap();
        assert_eq!((last.correct, last.total), (3, 3));
        assert_eq!(net.classify(&bits(&LETTER_A)).unwrap(), 0);
        assert_eq!(net.classify(&bits(&LETTER_B)).unwrap(), 1);
        assert_eq!(net.classify(&bits(&LETTER_C)).unwrap(), 2);
    }

    #[test]
    fn test_learns_three_letters_full_batch() {
        train_letters(3, 5);
    }

    #[test]
    fn test_learns_three_letters_single_sample_batches() {
        train_letters(1, 2024);
    }
}
