//! Optimizer abstractions for parameter updates
//!
//! Optimizers define how accumulated gradients move the parameters. The
//! engine only uses vanilla gradient descent: `w = w - step * gradient`,
//! where the step already folds in the mini-batch averaging.

pub mod sgd;

pub use sgd::SGD;

/// Core trait for parameter optimizers.
///
/// # Example
///
/// ```
/// use letter_perceptron::optimizers::{Optimizer, SGD};
///
/// let mut optimizer = SGD::new(0.5);
/// let mut weights = vec![1.0, 2.0];
/// optimizer.update(&mut weights, &[0.5, -0.5]).unwrap();
/// assert_eq!(weights, vec![0.75, 2.25]);
/// ```
pub trait Optimizer {
    /// Update parameters in place using gradients.
    ///
    /// Fails with `InvalidShape` if `parameters` and `gradients` differ in
    /// length; no parameter is touched in that case.
    fn update(&mut self, parameters: &mut [f64], gradients: &[f64]) -> crate::Result<()>;

    /// Step size applied to each gradient.
    fn learning_rate(&self) -> f64;
}
