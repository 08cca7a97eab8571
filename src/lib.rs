//! Letter Perceptron
//!
//! A multilayer perceptron trained with mini-batch stochastic gradient
//! descent and back-propagation to classify binary letter bitmaps into 26
//! classes.
//!
//! # Modules
//!
//! - `utils`: math kernel (matrix primitives, sigmoid, fast exponential) and RNG
//! - `layers`: dense sigmoid layer with its gradient buffers
//! - `optimizers`: Optimizer trait and the SGD step used by the layers
//! - `network`: forward pass, back-propagation, training loop, evaluation
//! - `dataset`: labeled samples, shuffling and batching
//! - `loader`: bitmap directory ingestion
//! - `config`: training configuration structures
//! - `error`: crate error type

pub mod config;
pub mod dataset;
pub mod error;
pub mod layers;
pub mod loader;
pub mod network;
pub mod optimizers;
pub mod utils;

pub use dataset::{Dataset, Sample};
pub use error::{NetworkError, Result};
pub use network::{EpochReport, Evaluation, Network};
