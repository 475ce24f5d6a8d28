//! Approximate Q-learning with a neural network
//!
//! [`DqnAgent`] replaces the action-value table with a [`NeuralNetwork`]
//! that maps an encoded state to one value per action position. A game
//! integration supplies the encoding through [`DqnCodec`].
//!
//! ## Learning step
//!
//! ```text
//! target        = r + γ max(predict(s'))
//! target_vector = predict(s) with position index(a) replaced by target
//! train([encode(s)], [target_vector], 1 iteration)
//! ```
//!
//! The max is taken over every output position of `s'`, legal or not.
//!
//! [`NeuralNetwork`]: crate::neural::NeuralNetwork
//! [`DqnCodec`]: crate::ports::DqnCodec

pub mod agent;

use ndarray::Array2;

pub use agent::{DqnAgent, DqnAgentConfig};

/// A `(1, size)` row vector with a single 1.0 at `index`.
///
/// An `index` outside `0..size` yields the all-zero vector.
pub fn onehot(index: usize, size: usize) -> Array2<f64> {
    let mut vector = Array2::zeros((1, size));
    if index < size {
        vector[[0, index]] = 1.0;
    }
    vector
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_onehot() {
        let vector = onehot(2, 4);
        assert_eq!(vector.dim(), (1, 4));
        assert_eq!(vector.row(0).to_vec(), vec![0.0, 0.0, 1.0, 0.0]);
        assert_eq!(onehot(9, 3).sum(), 0.0);
    }
}
