//! Labeled samples and the dataset the training loop draws batches from

use crate::error::{NetworkError, Result};
use crate::utils::SimpleRng;

/// One labeled bitmap: binary features and a one-hot class label.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    features: Vec<f64>,
    label: Vec<u8>,
}

impl Sample {
    /// Build a sample from a flattened bitmap and a one-hot label.
    ///
    /// Every feature must be `0` or `1` and the label must contain exactly
    /// one `1`.
    pub fn new(features: Vec<u8>, label: Vec<u8>) -> Result<Self> {
        if let Some(bad) = features.iter().find(|&&f| f > 1) {
            return Err(NetworkError::InvalidSample(format!(
                "feature value {} is not binary",
                bad
            )));
        }
        let ones = label.iter().filter(|&&v| v == 1).count();
        if ones != 1 || label.iter().any(|&v| v > 1) {
            return Err(NetworkError::InvalidSample(format!(
                "label {:?} is not one-hot",
                label
            )));
        }
        Ok(Self {
            features: features.into_iter().map(f64::from).collect(),
            label,
        })
    }

    /// Build a sample whose label is class `class` out of `classes`.
    pub fn with_class(features: Vec<u8>, class: usize, classes: usize) -> Result<Self> {
        if class >= classes {
            return Err(NetworkError::InvalidSample(format!(
                "class {} out of range for {} classes",
                class, classes
            )));
        }
        let mut label = vec![0u8; classes];
        label[class] = 1;
        Self::new(features, label)
    }

    pub fn features(&self) -> &[f64] {
        &self.features
    }

    pub fn label(&self) -> &[u8] {
        &self.label
    }

    /// Index of the single `1` in the label.
    pub fn class(&self) -> usize {
        argmax_u8(&self.label)
    }
}

// First maximum wins.
fn argmax_u8(values: &[u8]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// Ordered collection of samples sharing one feature length and class count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    samples: Vec<Sample>,
}

impl Dataset {
    /// Wrap samples; all of them must agree on feature and label length.
    pub fn new(samples: Vec<Sample>) -> Result<Self> {
        if let Some(first) = samples.first() {
            let (f, c) = (first.features.len(), first.label.len());
            for (i, s) in samples.iter().enumerate() {
                if s.features.len() != f || s.label.len() != c {
                    return Err(NetworkError::InvalidSample(format!(
                        "sample {} has {} features and {} classes, expected {} and {}",
                        i,
                        s.features.len(),
                        s.label.len(),
                        f,
                        c
                    )));
                }
            }
        }
        Ok(Self { samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Feature length F, `None` when empty.
    pub fn feature_len(&self) -> Option<usize> {
        self.samples.first().map(|s| s.features.len())
    }

    /// Class count C, `None` when empty.
    pub fn class_count(&self) -> Option<usize> {
        self.samples.first().map(|s| s.label.len())
    }

    /// Permute the samples in place (Fisher-Yates).
    pub fn shuffle(&mut self, rng: &mut SimpleRng) {
        rng.shuffle(&mut self.samples);
    }

    /// Contiguous range `start..start + count`.
    pub fn batch(&self, start: usize, count: usize) -> Result<&[Sample]> {
        let end = start
            .checked_add(count)
            .filter(|&end| end <= self.samples.len())
            .ok_or(NetworkError::InvalidShape {
                op: "Dataset::batch",
                expected: (self.samples.len(), 1),
                actual: (start.saturating_add(count), 1),
            })?;
        Ok(&self.samples[start..end])
    }

    /// Samples left over after cutting `len / batch_size` full batches.
    pub fn remainder(&self, batch_size: usize) -> usize {
        self.samples.len() % batch_size.max(1)
    }
}
