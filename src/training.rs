//! Online training loop over a fixed number of epochs.

use log::info;

use crate::error::{NetworkError, TrainingError};
use crate::features::{z_score_normalize, Sample};
use crate::network::{Network, UpdateRule};

/// Gradient steps taken per sample in every epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackwardPasses {
    Single,
    /// A second step after the loss is recorded, which doubles the
    /// effective learning rate.
    #[default]
    Double,
}

/// Configuration for a training run.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    /// Hidden units; `None` uses the input size.
    pub hidden_size: Option<usize>,
    pub output_size: usize,
    pub passes: BackwardPasses,
    pub update_rule: UpdateRule,
    /// Seed for weight initialization; `None` draws from entropy.
    pub seed: Option<u64>,
    /// Whether features are z-score normalized before training.
    pub normalize: bool,
    /// Whether to log the mean loss after every epoch.
    pub verbose: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 10,
            learning_rate: 0.1,
            hidden_size: None,
            output_size: 1,
            passes: BackwardPasses::Double,
            update_rule: UpdateRule::Literal,
            seed: None,
            normalize: false,
            verbose: true,
        }
    }
}

impl TrainingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn hidden_size(mut self, hidden_size: usize) -> Self {
        self.hidden_size = Some(hidden_size);
        self
    }

    pub fn output_size(mut self, output_size: usize) -> Self {
        self.output_size = output_size;
        self
    }

    pub fn passes(mut self, passes: BackwardPasses) -> Self {
        self.passes = passes;
        self
    }

    pub fn update_rule(mut self, update_rule: UpdateRule) -> Self {
        self.update_rule = update_rule;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Applies the configured preprocessing to `samples`.
    pub fn prepare_samples(&self, samples: Vec<Sample>) -> Vec<Sample> {
        if self.normalize {
            z_score_normalize(&samples)
        } else {
            samples
        }
    }

    /// Creates the freshly initialized network this configuration trains.
    pub fn build_network(&self, input_size: usize) -> Result<Network, NetworkError> {
        let hidden_size = self.hidden_size.unwrap_or(input_size);

        let network = match self.seed {
            Some(seed) => Network::new_with_seed(input_size, hidden_size, self.output_size, seed),
            None => Network::new_with_rng(
                input_size,
                hidden_size,
                self.output_size,
                &mut rand::thread_rng(),
            ),
        }?;

        network.with_update_rule(self.update_rule)
    }
}

/// Mean loss of every epoch, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingReport {
    pub epoch_losses: Vec<f64>,
}

impl TrainingReport {
    pub fn final_loss(&self) -> Option<f64> {
        self.epoch_losses.last().copied()
    }
}

pub fn mean_loss(losses: &[f64]) -> Option<f64> {
    if losses.is_empty() {
        return None;
    }

    Some(losses.iter().sum::<f64>() / losses.len() as f64)
}

/// Runs `config.epochs` passes over `samples` in order, one sample at a time.
///
/// The loss of each sample is taken from the forward pass that preceded its
/// updates.
pub fn train(
    network: &mut Network,
    samples: &[Sample],
    config: &TrainingConfig,
) -> Result<TrainingReport, TrainingError> {
    if samples.is_empty() {
        return Err(TrainingError::EmptyDataset);
    }

    let mut report = TrainingReport {
        epoch_losses: Vec::with_capacity(config.epochs),
    };

    for epoch in 0..config.epochs {
        let mut loss_table = Vec::with_capacity(samples.len());

        for sample in samples {
            network.forward(&sample.features)?;
            network.backward(&sample.features, sample.target, config.learning_rate)?;
            loss_table.push(network.loss(sample.target));

            if config.passes == BackwardPasses::Double {
                network.backward(&sample.features, sample.target, config.learning_rate)?;
            }
        }

        let epoch_loss = mean_loss(&loss_table).unwrap_or_default();
        if config.verbose {
            info!("Epoch: {epoch} Loss: {epoch_loss:.6}");
        }
        report.epoch_losses.push(epoch_loss);
    }

    Ok(report)
}

/// Mean squared error of the network on `samples`, without updating weights.
pub fn evaluate(network: &mut Network, samples: &[Sample]) -> Result<f64, TrainingError> {
    let mut losses = Vec::with_capacity(samples.len());

    for sample in samples {
        network.forward(&sample.features)?;
        losses.push(network.loss(sample.target));
    }

    mean_loss(&losses).ok_or(TrainingError::EmptyDataset)
}

/// Fraction of samples whose thresholded prediction equals the target.
pub fn accuracy(network: &mut Network, samples: &[Sample]) -> Result<f64, TrainingError> {
    if samples.is_empty() {
        return Err(TrainingError::EmptyDataset);
    }

    let mut correct_predictions = 0;
    for sample in samples {
        let prediction = network.predict(&sample.features)?;

        #[allow(clippy::float_cmp)]
        if prediction == sample.target {
            correct_predictions += 1;
        }
    }

    Ok(correct_predictions as f64 / samples.len() as f64)
}
