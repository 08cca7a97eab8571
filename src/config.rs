//! Configuration structures for training
//!
//! Network shape and training hyperparameters can be given in code or read
//! from a JSON file. Every entry point validates before a network is built.

use crate::error::{NetworkError, Result};
use crate::utils::Exponential;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Hyperparameters of the mini-batch training loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hyperparameters {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
}

impl Hyperparameters {
    pub fn new(epochs: usize, batch_size: usize, learning_rate: f64) -> Self {
        Self {
            epochs,
            batch_size,
            learning_rate,
        }
    }

    /// Reject zero epochs, zero batch size and non-positive or non-finite
    /// learning rates.
    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(NetworkError::Configuration(
                "epochs must be positive".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(NetworkError::Configuration(
                "batch_size must be positive".to_string(),
            ));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(NetworkError::Configuration(format!(
                "learning_rate must be a positive number, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

/// Layer widths: at least two entries, none of them zero.
pub fn validate_sizes(sizes: &[usize]) -> Result<()> {
    if sizes.len() < 2 {
        return Err(NetworkError::Configuration(format!(
            "a network needs at least 2 layer sizes, got {}",
            sizes.len()
        )));
    }
    if let Some(pos) = sizes.iter().position(|&s| s == 0) {
        return Err(NetworkError::Configuration(format!(
            "layer {} has size 0",
            pos
        )));
    }
    Ok(())
}

/// Full training configuration, as read from JSON.
///
/// Missing fields take the defaults of the reference letter run:
/// a `4096 → 104 → 26` network trained for 300 epochs with batches of 10 at
/// learning rate 0.2.
///
/// # Example
///
/// ```json
/// {
///   "sizes": [4096, 104, 26],
///   "epochs": 300,
///   "batch_size": 10,
///   "learning_rate": 0.2,
///   "seed": 42,
///   "exponential": "fast"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Layer widths, input first: `[F, hidden..., C]`
    pub sizes: Vec<usize>,

    pub epochs: usize,

    /// Samples per parameter update; leftovers past the last full batch are skipped
    pub batch_size: usize,

    pub learning_rate: f64,

    /// Seed for initialization and shuffling; time-based when absent
    pub seed: Option<u64>,

    /// Exponential behind the sigmoid: "exact" or "fast"
    pub exponential: Exponential,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            sizes: vec![4096, 104, 26],
            epochs: 300,
            batch_size: 10,
            learning_rate: 0.2,
            seed: None,
            exponential: Exponential::Exact,
        }
    }
}

impl TrainingConfig {
    pub fn hyperparameters(&self) -> Hyperparameters {
        Hyperparameters::new(self.epochs, self.batch_size, self.learning_rate)
    }

    pub fn validate(&self) -> Result<()> {
        validate_sizes(&self.sizes)?;
        self.hyperparameters().validate()
    }
}

/// Parse and validate a configuration from a JSON string.
pub fn parse_config(contents: &str) -> Result<TrainingConfig> {
    let config: TrainingConfig = serde_json::from_str(contents)?;
    config.validate()?;
    Ok(config)
}

/// Loads a training configuration from a JSON file.
///
/// # Examples
///
/// ```no_run
/// use letter_perceptron::config::load_config;
///
/// let cfg = load_config("config/letters.json").unwrap();
/// assert_eq!(cfg.sizes, vec![4096, 104, 26]);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<TrainingConfig> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}
