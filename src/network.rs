use ndarray::{Array1, Array2, ArrayView1};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::NetworkError;

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Derivative of the sigmoid, taking the already activated value.
pub fn sigmoid_derivative(activated: f64) -> f64 {
    activated * (1.0 - activated)
}

/// How `backward` updates the input-to-hidden weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateRule {
    /// Row `i` of the first `hidden_size` rows is shifted as a whole by
    /// `input[i] * hidden_delta[i] * learning_rate`. Requires
    /// `input_size >= hidden_size`; rows past `hidden_size` never move.
    #[default]
    Literal,
    /// True gradient step: `w[j][i] += input[j] * hidden_delta[i] * learning_rate`.
    Corrected,
}

/// Single hidden layer, scalar output, sigmoid everywhere, no biases.
///
/// `forward` caches the activations that the following `backward` reads, so
/// both take `&mut self`.
#[derive(Debug, Clone)]
pub struct Network {
    input_size: usize,
    hidden_size: usize,
    output_size: usize,
    update_rule: UpdateRule,

    weights_input_hidden: Array2<f64>, // [input_size, hidden_size]
    weights_hidden_output: Array1<f64>,

    hidden_layer_input: Array1<f64>,
    hidden_layer_output: Array1<f64>,
    output_layer_input: f64,
    output: f64,
    has_forward: bool,
}

impl Network {
    pub fn new_with_seed(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        seed: u64,
    ) -> Result<Self, NetworkError> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::new_with_rng(input_size, hidden_size, output_size, &mut rng)
    }

    /// Draws every weight independently from `[0, 1)`.
    pub fn new_with_rng<R: Rng + ?Sized>(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        rng: &mut R,
    ) -> Result<Self, NetworkError> {
        if input_size == 0 || hidden_size == 0 {
            return Err(NetworkError::InvalidConfig(format!(
                "layer sizes must be > 0, got input {input_size} and hidden {hidden_size}"
            )));
        }
        if output_size != 1 {
            log::warn!(
                "output size {output_size} is stored but only a single output unit is computed"
            );
        }

        let die = Uniform::new(0.0, 1.0);
        let weights_input_hidden =
            Array2::from_shape_simple_fn((input_size, hidden_size), || die.sample(&mut *rng));
        let weights_hidden_output =
            Array1::from_shape_simple_fn(hidden_size, || die.sample(&mut *rng));

        log::debug!("initialized {input_size}x{hidden_size}x{output_size} network");

        Ok(Self::with_weights(
            weights_input_hidden,
            weights_hidden_output,
            output_size,
        ))
    }

    /// Builds a single-output network from explicit weights.
    ///
    /// Like the random constructors, it starts with `Literal` when
    /// `input_size >= hidden_size` and with `Corrected` otherwise.
    pub fn from_weights(
        weights_input_hidden: Array2<f64>,
        weights_hidden_output: Array1<f64>,
    ) -> Result<Self, NetworkError> {
        let (input_size, hidden_size) = weights_input_hidden.dim();

        if input_size == 0 || hidden_size == 0 {
            return Err(NetworkError::InvalidConfig(
                "weight matrix must not be empty".to_owned(),
            ));
        }
        if weights_hidden_output.len() != hidden_size {
            return Err(NetworkError::InvalidConfig(format!(
                "hidden-output weights have length {}, expected {hidden_size}",
                weights_hidden_output.len()
            )));
        }

        Ok(Self::with_weights(
            weights_input_hidden,
            weights_hidden_output,
            1,
        ))
    }

    fn with_weights(
        weights_input_hidden: Array2<f64>,
        weights_hidden_output: Array1<f64>,
        output_size: usize,
    ) -> Self {
        let (input_size, hidden_size) = weights_input_hidden.dim();
        let update_rule = if input_size >= hidden_size {
            UpdateRule::Literal
        } else {
            UpdateRule::Corrected
        };

        Self {
            input_size,
            hidden_size,
            output_size,
            update_rule,
            weights_input_hidden,
            weights_hidden_output,
            hidden_layer_input: Array1::zeros(hidden_size),
            hidden_layer_output: Array1::zeros(hidden_size),
            output_layer_input: 0.0,
            output: 0.0,
            has_forward: false,
        }
    }

    pub fn with_update_rule(mut self, update_rule: UpdateRule) -> Result<Self, NetworkError> {
        self.update_rule = update_rule;
        self.check_update_rule()?;
        Ok(self)
    }

    fn check_update_rule(&self) -> Result<(), NetworkError> {
        if self.update_rule == UpdateRule::Literal && self.input_size < self.hidden_size {
            return Err(NetworkError::InvalidConfig(format!(
                "literal update rule needs input size ({}) >= hidden size ({})",
                self.input_size, self.hidden_size
            )));
        }
        Ok(())
    }

    fn check_shape(&self, input: &[f64]) -> Result<(), NetworkError> {
        if input.len() != self.input_size {
            return Err(NetworkError::InputShape {
                expected: self.input_size,
                found: input.len(),
            });
        }
        Ok(())
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    pub fn update_rule(&self) -> UpdateRule {
        self.update_rule
    }

    pub fn weights_input_hidden(&self) -> &Array2<f64> {
        &self.weights_input_hidden
    }

    pub fn weights_hidden_output(&self) -> &Array1<f64> {
        &self.weights_hidden_output
    }

    /// Output of the most recent forward pass, 0 before the first one.
    pub fn output(&self) -> f64 {
        self.output
    }

    pub fn forward(&mut self, input: &[f64]) -> Result<f64, NetworkError> {
        self.check_shape(input)?;

        self.hidden_layer_input = ArrayView1::from(input).dot(&self.weights_input_hidden);
        self.hidden_layer_output = self.hidden_layer_input.mapv(sigmoid);

        self.output_layer_input = self.hidden_layer_output.dot(&self.weights_hidden_output);
        self.output = sigmoid(self.output_layer_input);
        self.has_forward = true;

        Ok(self.output)
    }

    /// One gradient step on `(target - output)^2`, using the activations of
    /// the last `forward`.
    pub fn backward(
        &mut self,
        input: &[f64],
        target: f64,
        learning_rate: f64,
    ) -> Result<(), NetworkError> {
        self.check_shape(input)?;
        if !self.has_forward {
            return Err(NetworkError::NoForwardPass);
        }

        let output_error = target - self.output;
        let output_delta = output_error * sigmoid_derivative(self.output);

        let hidden_error = &self.weights_hidden_output * output_delta;
        let hidden_delta = hidden_error * &self.hidden_layer_output.mapv(sigmoid_derivative);

        self.weights_hidden_output
            .scaled_add(output_delta * learning_rate, &self.hidden_layer_output);

        match self.update_rule {
            UpdateRule::Literal => {
                for (i, mut row) in self
                    .weights_input_hidden
                    .rows_mut()
                    .into_iter()
                    .enumerate()
                    .take(self.hidden_size)
                {
                    row += input[i] * hidden_delta[i] * learning_rate;
                }
            }
            UpdateRule::Corrected => {
                for (mut row, &value) in self.weights_input_hidden.rows_mut().into_iter().zip(input)
                {
                    row.scaled_add(value * learning_rate, &hidden_delta);
                }
            }
        }

        Ok(())
    }

    /// Squared error of the cached output.
    pub fn loss(&self, target: f64) -> f64 {
        (target - self.output).powi(2)
    }

    pub fn predict(&mut self, input: &[f64]) -> Result<f64, NetworkError> {
        let output = self.forward(input)?;

        Ok(if output > 0.5 { 1.0 } else { 0.0 })
    }
}
