//! Shared utilities for the training engine
//!
//! This module provides the math kernel (matrix primitives and the sigmoid
//! family) and the seeded random number generator used for initialization
//! and shuffling.

pub mod activations;
pub mod linalg;
pub mod rng;

pub use activations::{fast_exp, sigmoid, sigmoid_derivative, Exponential};
pub use linalg::{add, hadamard, mat_vec, outer, subtract, transpose, Matrix};
pub use rng::SimpleRng;
