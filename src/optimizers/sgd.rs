//! Stochastic Gradient Descent (SGD) optimizer implementation
//!
//! Vanilla gradient descent with no momentum or adaptive rates:
//! `parameter = parameter - learning_rate * gradient`

use crate::error::NetworkError;
use crate::optimizers::Optimizer;
use crate::Result;

/// Stochastic Gradient Descent optimizer.
///
/// `w = w - η * ∇L/∂w`
///
/// For mini-batch training the layer builds it with `η = learning_rate /
/// batch_size` and feeds it the summed batch gradient, which is the same as
/// stepping along the batch-average gradient.
#[derive(Debug, Clone, Copy)]
pub struct SGD {
    learning_rate: f64,
}

impl SGD {
    pub fn new(learning_rate: f64) -> Self {
        Self { learning_rate }
    }

    /// Step for a mini-batch: the learning rate divided by the batch size.
    pub fn for_batch(learning_rate: f64, batch_size: usize) -> Self {
        Self::new(learning_rate / batch_size as f64)
    }
}

impl Optimizer for SGD {
    fn update(&mut self, parameters: &mut [f64], gradients: &[f64]) -> Result<()> {
        if parameters.len() != gradients.len() {
            return Err(NetworkError::vec_shape(
                "SGD::update",
                parameters.len(),
                gradients.len(),
            ));
        }

        for (param, grad) in parameters.iter_mut().zip(gradients) {
            *param -= self.learning_rate * grad;
        }
        Ok(())
    }

    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }
}
