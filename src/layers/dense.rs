//! Dense (fully connected) sigmoid layer
//!
//! A layer holds its learnable parameters together with the buffers that
//! back-propagation writes into: the values recorded by the last forward pass,
//! the per-sample gradient and the mini-batch accumulator.

use crate::error::{NetworkError, Result};
use crate::optimizers::{Optimizer, SGD};
use crate::utils::{add, mat_vec, sigmoid, transpose, Exponential, Matrix, SimpleRng};

/// Parameters are drawn uniformly from `[-INIT_LIMIT, INIT_LIMIT]`.
pub const INIT_LIMIT: f64 = 1.1;

/// Weight matrix of a non-input layer and its two gradient buffers.
///
/// Kept together so that every buffer is allocated with the shape of
/// `weights` and none of them can exist without the others.
#[derive(Debug, Clone)]
struct WeightState {
    weights: Matrix,
    accum: Matrix,
    sample: Matrix,
}

/// One layer of the network.
///
/// Layer 0 is the input layer: it only carries activations (the feature
/// vector of the last recorded pass) and never receives gradients. Every
/// other layer owns a `size × input_size` weight matrix.
///
/// # Example
///
/// ```
/// use letter_perceptron::layers::DenseLayer;
/// use letter_perceptron::utils::SimpleRng;
///
/// let mut rng = SimpleRng::new(42);
/// let layer = DenseLayer::new(&[784, 30, 26], 1, &mut rng).unwrap();
/// assert_eq!(layer.size(), 30);
/// assert_eq!(layer.input_size(), Some(784));
/// ```
#[derive(Debug, Clone)]
pub struct DenseLayer {
    index: usize,
    activations: Vec<f64>,
    biases: Vec<f64>,
    z: Vec<f64>,
    bias_accum: Vec<f64>,
    bias_sample: Vec<f64>,
    weights: Option<WeightState>,
}

impl DenseLayer {
    /// Create layer `index` of a network shaped by `sizes`.
    ///
    /// Biases are sampled first, then the weights in row-major order; each
    /// value is independent and uniform in `[-1.1, 1.1]`. Gradient buffers
    /// start zeroed.
    pub fn new(sizes: &[usize], index: usize, rng: &mut SimpleRng) -> Result<Self> {
        let size = *sizes.get(index).ok_or_else(|| {
            NetworkError::Configuration(format!(
                "layer index {} out of range for {} sizes",
                index,
                sizes.len()
            ))
        })?;

        let biases = (0..size)
            .map(|_| rng.gen_range_f64(-INIT_LIMIT, INIT_LIMIT))
            .collect();

        let weights = if index > 0 {
            let fan_in = sizes[index - 1];
            let mut weights = Matrix::zeros(size, fan_in);
            for value in weights.as_mut_slice() {
                *value = rng.gen_range_f64(-INIT_LIMIT, INIT_LIMIT);
            }
            Some(WeightState {
                weights,
                accum: Matrix::zeros(size, fan_in),
                sample: Matrix::zeros(size, fan_in),
            })
        } else {
            None
        };

        Ok(Self {
            index,
            activations: vec![0.0; size],
            biases,
            z: vec![0.0; size],
            bias_accum: vec![0.0; size],
            bias_sample: vec![0.0; size],
            weights,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of units in this layer.
    pub fn size(&self) -> usize {
        self.activations.len()
    }

    /// Width of the previous layer, `None` for the input layer.
    pub fn input_size(&self) -> Option<usize> {
        self.weights.as_ref().map(|w| w.weights.cols())
    }

    pub fn is_input(&self) -> bool {
        self.weights.is_none()
    }

    pub fn weights(&self) -> Option<&Matrix> {
        self.weights.as_ref().map(|w| &w.weights)
    }

    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    pub fn activations(&self) -> &[f64] {
        &self.activations
    }

    /// Pre-activations of the last recorded forward pass.
    pub fn z(&self) -> &[f64] {
        &self.z
    }

    pub fn weight_gradient_accum(&self) -> Option<&Matrix> {
        self.weights.as_ref().map(|w| &w.accum)
    }

    pub fn bias_gradient_accum(&self) -> &[f64] {
        &self.bias_accum
    }

    pub fn weight_gradient_sample(&self) -> Option<&Matrix> {
        self.weights.as_ref().map(|w| &w.sample)
    }

    pub fn bias_gradient_sample(&self) -> &[f64] {
        &self.bias_sample
    }

    /// Trainable parameters: weights plus biases (input layer has none).
    pub fn parameter_count(&self) -> usize {
        self.weights
            .as_ref()
            .map_or(0, |w| w.weights.as_slice().len() + self.biases.len())
    }

    /// Replace weights and biases, keeping their shapes.
    pub fn set_parameters(&mut self, weights: Matrix, biases: Vec<f64>) -> Result<()> {
        let state = self.weights.as_mut().ok_or_else(|| {
            NetworkError::Configuration("the input layer has no parameters".to_string())
        })?;
        if weights.shape() != state.weights.shape() {
            return Err(NetworkError::InvalidShape {
                op: "DenseLayer::set_parameters",
                expected: state.weights.shape(),
                actual: weights.shape(),
            });
        }
        if biases.len() != self.biases.len() {
            return Err(NetworkError::vec_shape(
                "DenseLayer::set_parameters",
                self.biases.len(),
                biases.len(),
            ));
        }
        state.weights = weights;
        self.biases = biases;
        Ok(())
    }

    /// Pre-activations and sigmoid activations for `input`:
    /// `z = W·input + b`, `a = sigmoid(z)`.
    pub fn forward(&self, input: &[f64], exp: Exponential) -> Result<(Vec<f64>, Vec<f64>)> {
        let state = self.weights.as_ref().ok_or_else(|| {
            NetworkError::Configuration("the input layer has no forward transform".to_string())
        })?;
        let z = add(mat_vec(&state.weights, input)?, &self.biases)?;
        let activations = sigmoid(&z, exp);
        Ok((z, activations))
    }

    /// Carry an error signal back through this layer's weights: `Wᵗ·delta`.
    pub fn backpropagate(&self, delta: &[f64]) -> Result<Vec<f64>> {
        let state = self.weights.as_ref().ok_or_else(|| {
            NetworkError::Configuration("the input layer has no weights".to_string())
        })?;
        mat_vec(&transpose(&state.weights), delta)
    }

    pub(crate) fn record_input(&mut self, features: &[f64]) {
        self.activations.copy_from_slice(features);
    }

    pub(crate) fn record(&mut self, z: Vec<f64>, activations: Vec<f64>) {
        self.z = z;
        self.activations = activations;
    }

    /// Store this sample's gradient: `delta` for the biases and
    /// `outer(delta, previous activations)` for the weights.
    pub(crate) fn set_sample_gradient(&mut self, delta: Vec<f64>, weight_grad: Matrix) -> Result<()> {
        let state = self.weights.as_mut().ok_or_else(|| {
            NetworkError::Configuration("the input layer takes no gradient".to_string())
        })?;
        if weight_grad.shape() != state.sample.shape() {
            return Err(NetworkError::InvalidShape {
                op: "DenseLayer::set_sample_gradient",
                expected: state.sample.shape(),
                actual: weight_grad.shape(),
            });
        }
        if delta.len() != self.bias_sample.len() {
            return Err(NetworkError::vec_shape(
                "DenseLayer::set_sample_gradient",
                self.bias_sample.len(),
                delta.len(),
            ));
        }
        state.sample = weight_grad;
        self.bias_sample = delta;
        Ok(())
    }

    /// Zero the mini-batch accumulators. No-op for the input layer.
    pub fn reset_batch_gradients(&mut self) {
        if let Some(state) = self.weights.as_mut() {
            state.accum.fill_zero();
            self.bias_accum.iter_mut().for_each(|v| *v = 0.0);
        }
    }

    /// Add the current per-sample gradient into the accumulators.
    pub fn accumulate_sample_gradient(&mut self) -> Result<()> {
        if let Some(state) = self.weights.as_mut() {
            state.accum.add_assign(&state.sample)?;
            for (acc, g) in self.bias_accum.iter_mut().zip(&self.bias_sample) {
                *acc += g;
            }
        }
        Ok(())
    }

    /// `param -= (learning_rate / batch_size) * accumulated gradient` for
    /// every weight and bias.
    pub fn apply_update(&mut self, batch_size: usize, learning_rate: f64) -> Result<()> {
        if batch_size == 0 {
            return Err(NetworkError::Configuration(
                "batch size must be positive".to_string(),
            ));
        }
        let Some(state) = self.weights.as_mut() else {
            return Ok(());
        };
        let mut optimizer = SGD::for_batch(learning_rate, batch_size);
        optimizer.update(state.weights.as_mut_slice(), state.accum.as_slice())?;
        optimizer.update(&mut self.biases, &self.bias_accum)?;
        Ok(())
    }
}
