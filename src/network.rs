//! Multilayer perceptron: forward pass, back-propagation and mini-batch SGD
//!
//! The network owns its layers and its random source. Training is strictly
//! sequential: every mini-batch update is fully applied before the next batch
//! reads the parameters.

use crate::config::{validate_sizes, Hyperparameters, TrainingConfig};
use crate::dataset::{Dataset, Sample};
use crate::error::{NetworkError, Result};
use crate::layers::DenseLayer;
use crate::utils::{hadamard, outer, sigmoid_derivative, subtract, Exponential, SimpleRng};
use tracing::{debug, info};

/// Outcome of classifying a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub correct: usize,
    pub total: usize,
}

impl Evaluation {
    /// `correct / total`, or 0 for an empty dataset.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

/// Result of one completed training epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochReport {
    pub epoch: usize,
    pub correct: usize,
    pub total: usize,
    pub accuracy: f64,
}

/// Fully connected feed-forward network with sigmoid units.
///
/// # Example
///
/// ```
/// use letter_perceptron::config::Hyperparameters;
/// use letter_perceptron::network::Network;
///
/// let net = Network::new(&[3, 4, 2], Hyperparameters::new(10, 2, 0.5), Some(1)).unwrap();
/// let out = net.predict(&[1.0, 0.0, 1.0]).unwrap();
/// assert_eq!(out.len(), 2);
/// assert!(out.iter().all(|&p| p > 0.0 && p < 1.0));
/// ```
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<DenseLayer>,
    hyperparameters: Hyperparameters,
    exponential: Exponential,
    rng: SimpleRng,
}

impl Network {
    /// Build a network with layer widths `sizes` (`[F, hidden..., C]`).
    ///
    /// With `seed = None` the random source is seeded from the clock.
    pub fn new(sizes: &[usize], hyperparameters: Hyperparameters, seed: Option<u64>) -> Result<Self> {
        validate_sizes(sizes)?;
        hyperparameters.validate()?;

        let mut rng = seed.map_or_else(SimpleRng::from_time, SimpleRng::new);
        let layers = (0..sizes.len())
            .map(|index| DenseLayer::new(sizes, index, &mut rng))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            layers,
            hyperparameters,
            exponential: Exponential::default(),
            rng,
        })
    }

    pub fn from_config(config: &TrainingConfig) -> Result<Self> {
        config.validate()?;
        let network = Self::new(&config.sizes, config.hyperparameters(), config.seed)?;
        Ok(network.with_exponential(config.exponential))
    }

    /// Select the exponential used by every sigmoid evaluation.
    pub fn with_exponential(mut self, exponential: Exponential) -> Self {
        self.exponential = exponential;
        self
    }

    pub fn exponential(&self) -> Exponential {
        self.exponential
    }

    pub fn hyperparameters(&self) -> Hyperparameters {
        self.hyperparameters
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    /// Mutable access to one layer, e.g. to install fixed parameters.
    pub fn layer_mut(&mut self, index: usize) -> Option<&mut DenseLayer> {
        self.layers.get_mut(index)
    }

    pub fn sizes(&self) -> Vec<usize> {
        self.layers.iter().map(DenseLayer::size).collect()
    }

    pub fn input_size(&self) -> usize {
        self.layers[0].size()
    }

    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].size()
    }

    fn check_input(&self, features: &[f64]) -> Result<()> {
        if features.len() != self.input_size() {
            return Err(NetworkError::vec_shape(
                "Network::predict",
                self.input_size(),
                features.len(),
            ));
        }
        Ok(())
    }

    fn check_dataset(&self, data: &Dataset) -> Result<()> {
        let widths = (data.feature_len(), data.class_count());
        match widths {
            (None, None) => Ok(()),
            (Some(f), Some(c)) if f == self.input_size() && c == self.output_size() => Ok(()),
            (f, c) => Err(NetworkError::Configuration(format!(
                "dataset with {:?} features and {:?} classes does not fit a {:?} network",
                f,
                c,
                self.sizes()
            ))),
        }
    }

    /// Output activations for one feature vector.
    ///
    /// A vector of independent sigmoids, not a probability distribution.
    /// Nothing is recorded in the layers.
    pub fn predict(&self, features: &[f64]) -> Result<Vec<f64>> {
        self.check_input(features)?;
        let mut activations = features.to_vec();
        for layer in &self.layers[1..] {
            let (_, next) = layer.forward(&activations, self.exponential)?;
            activations = next;
        }
        Ok(activations)
    }

    /// Predicted class: index of the largest output, first one on ties.
    pub fn classify(&self, features: &[f64]) -> Result<usize> {
        Ok(argmax(&self.predict(features)?))
    }

    // Forward pass that keeps every layer's z and activations.
    fn forward_recorded(&mut self, features: &[f64]) -> Result<()> {
        self.check_input(features)?;
        self.layers[0].record_input(features);
        for l in 1..self.layers.len() {
            let (done, rest) = self.layers.split_at_mut(l);
            let (z, activations) = rest[0].forward(done[l - 1].activations(), self.exponential)?;
            rest[0].record(z, activations);
        }
        debug_assert!(
            self.layers[self.layers.len() - 1]
                .activations()
                .iter()
                .all(|a| a.is_finite()),
            "non-finite network output"
        );
        Ok(())
    }

    /// Compute every layer's per-sample gradient for one labeled input.
    ///
    /// The loss is the squared error through the sigmoid output, so the output
    /// error is `(a - y) ⊙ σ'(z)`; each hidden layer's error is
    /// `(Wᵗ_{l+1} · δ_{l+1}) ⊙ σ'(z_l)`. The input layer is left untouched.
    pub fn backprop(&mut self, features: &[f64], label: &[u8]) -> Result<()> {
        self.forward_recorded(features)?;

        let exp = self.exponential;
        let last = self.layers.len() - 1;
        let output = &self.layers[last];
        let error = subtract(output.activations(), label)?;
        let mut delta = hadamard(&error, &sigmoid_derivative(output.z().to_vec(), exp))?;

        for l in (1..=last).rev() {
            if l < last {
                let back = self.layers[l + 1].backpropagate(&delta)?;
                let slope = sigmoid_derivative(self.layers[l].z().to_vec(), exp);
                delta = hadamard(&back, &slope)?;
            }
            let weight_grad = outer(&delta, self.layers[l - 1].activations());
            self.layers[l].set_sample_gradient(delta.clone(), weight_grad)?;
        }
        Ok(())
    }

    /// One mini-batch step: reset the accumulators, back-propagate and
    /// accumulate every sample, then move each layer along the average
    /// gradient.
    pub fn train_batch(&mut self, batch: &[Sample]) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        for layer in &mut self.layers {
            layer.reset_batch_gradients();
        }
        for sample in batch {
            self.backprop(sample.features(), sample.label())?;
            for layer in &mut self.layers[1..] {
                layer.accumulate_sample_gradient()?;
            }
        }
        let learning_rate = self.hyperparameters.learning_rate;
        for layer in &mut self.layers[1..] {
            layer.apply_update(batch.len(), learning_rate)?;
        }
        Ok(())
    }

    /// Run the configured number of epochs and report accuracy after each.
    ///
    /// Every epoch shuffles `training` in place and walks it in
    /// `len / batch_size` contiguous batches. When `batch_size` does not
    /// divide the dataset size, the samples past the last full batch are
    /// dropped for that epoch (a different subset each time, since the order
    /// is reshuffled). Accuracy is measured on `evaluation`, or on `training`
    /// when no evaluation set is given.
    pub fn train(&mut self, training: &mut Dataset, evaluation: Option<&Dataset>) -> Result<Vec<EpochReport>> {
        self.check_dataset(training)?;
        if let Some(eval) = evaluation {
            self.check_dataset(eval)?;
        }

        let Hyperparameters {
            epochs, batch_size, ..
        } = self.hyperparameters;
        if batch_size > training.len() {
            return Err(NetworkError::Configuration(format!(
                "batch_size {} exceeds training set size {}",
                batch_size,
                training.len()
            )));
        }

        let batches = training.len() / batch_size;
        let dropped = training.remainder(batch_size);
        if dropped > 0 {
            debug!(
                "{} of {} samples fall outside the last full batch and are skipped each epoch",
                dropped,
                training.len()
            );
        }

        let mut reports = Vec::with_capacity(epochs);
        for epoch in 0..epochs {
            training.shuffle(&mut self.rng);
            for j in 0..batches {
                self.train_batch(training.batch(j * batch_size, batch_size)?)?;
            }

            let result = self.evaluate(evaluation.unwrap_or(&*training))?;
            let report = EpochReport {
                epoch,
                correct: result.correct,
                total: result.total,
                accuracy: result.accuracy(),
            };
            info!(
                "Epoch {}: right/total {}/{} acc {:.4}",
                report.epoch, report.correct, report.total, report.accuracy
            );
            reports.push(report);
        }
        Ok(reports)
    }

    /// Count samples whose predicted class matches the label's class.
    pub fn evaluate(&self, data: &Dataset) -> Result<Evaluation> {
        let mut correct = 0;
        for sample in data.samples() {
            if self.classify(sample.features())? == sample.class() {
                correct += 1;
            }
        }
        Ok(Evaluation {
            correct,
            total: data.len(),
        })
    }
}

/// Index of the largest value; the first one wins on ties.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}
