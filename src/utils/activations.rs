//! Logistic sigmoid and the exponential it is built on
//!
//! The sigmoid is the only activation used by the network. Its exponential is
//! pluggable: the exact `f64::exp` or a bit-level approximation that trades
//! accuracy for speed.

use serde::Deserialize;

// Schraudolph constants: 2^20 / ln 2 and 1023 * 2^20 minus the RMS adjustment.
const EXP_A: f64 = 1_512_775.0;
const EXP_C: f64 = 1_072_632_447.0;
// Inputs outside this range push the upper word out of the positive finite doubles.
const FAST_EXP_MIN: f64 = -708.0;
const FAST_EXP_MAX: f64 = 709.0;

/// Which exponential the sigmoid evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exponential {
    /// `f64::exp`.
    #[default]
    Exact,
    /// [`fast_exp`]: roughly 4% relative error, considerably cheaper.
    Fast,
}

impl Exponential {
    /// Evaluate `e^x` with the selected strategy.
    #[inline]
    pub fn eval(self, x: f64) -> f64 {
        match self {
            Exponential::Exact => x.exp(),
            Exponential::Fast => fast_exp(x),
        }
    }
}

/// Approximate `e^x` by writing a linear transform of `x` straight into the
/// upper 32 bits of an IEEE-754 double (Schraudolph, 1999).
///
/// The maximum relative error is just under 4%; through the sigmoid it is
/// about 0.01 absolute. Select
/// [`Exponential::Exact`] when the exact curve matters (gradient checks,
/// reference outputs).
///
/// `x` is clamped to `[-708, 709]`, so the result is always a positive finite
/// double.
#[inline]
pub fn fast_exp(x: f64) -> f64 {
    let x = x.clamp(FAST_EXP_MIN, FAST_EXP_MAX);
    let upper = (EXP_A * x + EXP_C) as i64;
    f64::from_bits((upper as u64) << 32)
}

#[inline]
fn sigmoid_scalar(z: f64, exp: Exponential) -> f64 {
    1.0 / (1.0 + exp.eval(-z))
}

/// Elementwise logistic sigmoid: `s[i] = 1 / (1 + exp(-z[i]))`.
pub fn sigmoid(z: &[f64], exp: Exponential) -> Vec<f64> {
    z.iter().map(|&v| sigmoid_scalar(v, exp)).collect()
}

/// Elementwise sigmoid derivative `s * (1 - s)` with `s = sigmoid(z)`.
///
/// Takes `z` by value and overwrites it with the result.
pub fn sigmoid_derivative(mut z: Vec<f64>, exp: Exponential) -> Vec<f64> {
    for value in z.iter_mut() {
        let s = sigmoid_scalar(*value, exp);
        *value = s * (1.0 - s);
    }
    z
}
