//! Function approximation for action values
//!
//! A deliberately small two-layer feed-forward network: sigmoid hidden layer,
//! identity output layer, no biases, trained by single-sample stochastic
//! gradient descent on squared error. It stands in for the action-value
//! table when the state space is too large to enumerate.

pub mod network;

pub use network::{NetworkConfig, NeuralNetwork};
