//! Layer representation for the network
//!
//! Every layer is fully connected and uses the logistic sigmoid.

pub mod dense;

pub use dense::DenseLayer;
