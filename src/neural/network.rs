//! Two-layer feed-forward network with hand-written backpropagation

use ndarray::{Array2, ArrayView2};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

fn default_learning_rate() -> f64 {
    0.1
}

fn default_initial_scale() -> f64 {
    0.01
}

fn default_cost_sample_step() -> usize {
    100
}

/// Shape and training hyperparameters of a [`NeuralNetwork`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Input layer width (I)
    pub input_size: usize,
    /// Hidden layer width (H)
    pub hidden_size: usize,
    /// Output layer width (O)
    pub output_size: usize,
    /// Step size for gradient descent
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    /// Standard deviation of the zero-mean normal used for initial weights
    #[serde(default = "default_initial_scale")]
    pub initial_scale: f64,
    /// Total cost is sampled every this many training iterations
    #[serde(default = "default_cost_sample_step")]
    pub cost_sample_step: usize,
}

impl NetworkConfig {
    /// Configuration with the default learning rate (0.1) and initial scale (0.01)
    pub fn new(input_size: usize, hidden_size: usize, output_size: usize) -> Self {
        Self {
            input_size,
            hidden_size,
            output_size,
            learning_rate: default_learning_rate(),
            initial_scale: default_initial_scale(),
            cost_sample_step: default_cost_sample_step(),
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_initial_scale(mut self, initial_scale: f64) -> Self {
        self.initial_scale = initial_scale;
        self
    }

    pub fn with_cost_sample_step(mut self, cost_sample_step: usize) -> Self {
        self.cost_sample_step = cost_sample_step;
        self
    }

    /// Check that every size is positive and every rate is finite.
    pub fn validate(&self) -> Result<()> {
        if self.input_size == 0 || self.hidden_size == 0 || self.output_size == 0 {
            return Err(Error::config(format!(
                "network layers must be non-empty (got {}x{}x{})",
                self.input_size, self.hidden_size, self.output_size
            )));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::config(format!(
                "learning rate {} must be positive and finite",
                self.learning_rate
            )));
        }
        if !self.initial_scale.is_finite() || self.initial_scale < 0.0 {
            return Err(Error::config(format!(
                "initial scale {} must be non-negative and finite",
                self.initial_scale
            )));
        }
        if self.cost_sample_step == 0 {
            return Err(Error::config("cost sample step must be at least 1"));
        }
        Ok(())
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn sigmoid_derivative(x: f64) -> f64 {
    let s = sigmoid(x);
    s * (1.0 - s)
}

/// Intermediate layers of one forward pass, kept for backpropagation
struct ForwardPass {
    /// input . W_in, shape (1, H)
    hidden_linear: Array2<f64>,
    /// sigmoid(hidden_linear), shape (1, H)
    hidden: Array2<f64>,
    /// hidden . W_out, shape (1, O)
    output: Array2<f64>,
}

/// Feed-forward network `input -> sigmoid hidden -> linear output`
///
/// Weights are owned by the network and mutated in place by every
/// training step. Inputs and outputs are row vectors of shape `(1, I)` and
/// `(1, O)`; anything else is rejected with [`Error::ShapeMismatch`].
///
/// # Examples
///
/// ```
/// use ndarray::Array2;
/// use rand::{SeedableRng, rngs::StdRng};
/// use turn_learner::neural::{NetworkConfig, NeuralNetwork};
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let network = NeuralNetwork::new(NetworkConfig::new(5, 3, 2), &mut rng).unwrap();
/// let output = network.predict(&Array2::ones((1, 5))).unwrap();
/// assert_eq!(output.dim(), (1, 2));
/// ```
#[derive(Debug, Clone)]
pub struct NeuralNetwork {
    config: NetworkConfig,
    /// Input to hidden weights, (I, H)
    weights_01: Array2<f64>,
    /// Hidden to output weights, (H, O)
    weights_12: Array2<f64>,
}

impl NeuralNetwork {
    /// Create a network with weights drawn from `Normal(0, initial_scale)`.
    pub fn new<R: Rng + ?Sized>(config: NetworkConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let normal = Normal::new(0.0, config.initial_scale)
            .map_err(|e| Error::config(format!("initial scale {}: {e}", config.initial_scale)))?;

        let weights_01 = Array2::from_shape_simple_fn((config.input_size, config.hidden_size), || {
            normal.sample(rng)
        });
        let weights_12 =
            Array2::from_shape_simple_fn((config.hidden_size, config.output_size), || {
                normal.sample(rng)
            });

        Ok(Self {
            config,
            weights_01,
            weights_12,
        })
    }

    /// Rebuild a network from existing weight matrices.
    ///
    /// The layer sizes are taken from the matrices, which must agree on the
    /// hidden dimension.
    pub fn from_weights(
        weights_01: Array2<f64>,
        weights_12: Array2<f64>,
        learning_rate: f64,
    ) -> Result<Self> {
        let (input_size, hidden_size) = weights_01.dim();
        let (hidden_rows, output_size) = weights_12.dim();
        if hidden_rows != hidden_size {
            return Err(Error::ShapeMismatch {
                operand: "hidden-to-output weights",
                expected: (hidden_size, output_size),
                got: (hidden_rows, output_size),
            });
        }
        let config = NetworkConfig::new(input_size, hidden_size, output_size)
            .with_learning_rate(learning_rate);
        config.validate()?;
        Ok(Self {
            config,
            weights_01,
            weights_12,
        })
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn input_size(&self) -> usize {
        self.config.input_size
    }

    pub fn hidden_size(&self) -> usize {
        self.config.hidden_size
    }

    pub fn output_size(&self) -> usize {
        self.config.output_size
    }

    pub fn learning_rate(&self) -> f64 {
        self.config.learning_rate
    }

    /// Input to hidden weights, shape (I, H)
    pub fn weights_input_hidden(&self) -> ArrayView2<'_, f64> {
        self.weights_01.view()
    }

    /// Hidden to output weights, shape (H, O)
    pub fn weights_hidden_output(&self) -> ArrayView2<'_, f64> {
        self.weights_12.view()
    }

    /// Forward pass: `sigmoid(input . W_in) . W_out`.
    ///
    /// `input` must have shape `(1, I)`; the result has shape `(1, O)`.
    pub fn predict(&self, input: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_input(input)?;
        Ok(self.forward(input).output)
    }

    /// Sum of squared errors of the current predictions over all pairs.
    pub fn calculate_total_cost(
        &self,
        input_vectors: &[Array2<f64>],
        targets: &[Array2<f64>],
    ) -> Result<f64> {
        check_batch_lengths(input_vectors, targets)?;
        input_vectors
            .iter()
            .zip(targets)
            .try_fold(0.0, |total, (input, target)| {
                self.check_target(target)?;
                let error = self.predict(input)? - target;
                Ok(total + error.mapv(|e| e * e).sum())
            })
    }

    /// Run `num_iterations` single-sample gradient descent steps.
    ///
    /// Each step samples one `(input, target)` pair uniformly with
    /// replacement. The total cost over the batch is recorded every
    /// `cost_sample_step` iterations, starting with iteration 0, and the
    /// recorded costs are returned.
    ///
    /// # Errors
    ///
    /// Fails before touching any weight if the batch is empty, the two
    /// slices differ in length, or any vector has the wrong shape.
    pub fn train<R: Rng + ?Sized>(
        &mut self,
        input_vectors: &[Array2<f64>],
        targets: &[Array2<f64>],
        num_iterations: usize,
        rng: &mut R,
    ) -> Result<Vec<f64>> {
        check_batch_lengths(input_vectors, targets)?;
        if input_vectors.is_empty() {
            return Err(Error::EmptyBatch);
        }
        for (input, target) in input_vectors.iter().zip(targets) {
            self.check_input(input)?;
            self.check_target(target)?;
        }

        let mut total_costs = Vec::new();
        for iteration in 0..num_iterations {
            let index = rng.random_range(0..input_vectors.len());
            let (grad_01, grad_12) = self.gradients(&input_vectors[index], &targets[index]);
            self.weights_01.scaled_add(-self.config.learning_rate, &grad_01);
            self.weights_12.scaled_add(-self.config.learning_rate, &grad_12);

            if iteration % self.config.cost_sample_step == 0 {
                total_costs.push(self.calculate_total_cost(input_vectors, targets)?);
            }
        }
        Ok(total_costs)
    }

    fn forward(&self, input: &Array2<f64>) -> ForwardPass {
        let hidden_linear = input.dot(&self.weights_01);
        let hidden = hidden_linear.mapv(sigmoid);
        let output = hidden.dot(&self.weights_12);
        ForwardPass {
            hidden_linear,
            hidden,
            output,
        }
    }

    /// Gradients of the squared error for one pair, as `(dW_in, dW_out)`.
    ///
    /// Shapes must already have been checked.
    fn gradients(&self, input: &Array2<f64>, target: &Array2<f64>) -> (Array2<f64>, Array2<f64>) {
        let pass = self.forward(input);

        // Identity output layer: the output error is the gradient at the output.
        let output_error = &pass.output - target; // (1, O)
        let grad_12 = pass.hidden.t().dot(&output_error); // (H, 1) . (1, O)

        let hidden_error = output_error.dot(&self.weights_12.t()); // (1, O) . (O, H)
        let hidden_delta = hidden_error * pass.hidden_linear.mapv(sigmoid_derivative);
        let grad_01 = input.t().dot(&hidden_delta); // (I, 1) . (1, H)

        (grad_01, grad_12)
    }

    fn check_input(&self, input: &Array2<f64>) -> Result<()> {
        check_shape("input vector", input, (1, self.config.input_size))
    }

    fn check_target(&self, target: &Array2<f64>) -> Result<()> {
        check_shape("target vector", target, (1, self.config.output_size))
    }
}

fn check_shape(operand: &'static str, array: &Array2<f64>, expected: (usize, usize)) -> Result<()> {
    let got = array.dim();
    if got != expected {
        return Err(Error::ShapeMismatch {
            operand,
            expected,
            got,
        });
    }
    Ok(())
}

fn check_batch_lengths(input_vectors: &[Array2<f64>], targets: &[Array2<f64>]) -> Result<()> {
    if input_vectors.len() != targets.len() {
        return Err(Error::BatchLengthMismatch {
            inputs: input_vectors.len(),
            targets: targets.len(),
        });
    }
    Ok(())
}
