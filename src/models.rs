use crate::core::activations::Activation;
use crate::core::layers::{HiddenLayer, InputLayer, Layer, SoftmaxLayer};
use crate::core::losses::Loss;
use crate::core::regularization::Regularizer;
use crate::error::{NNError, Result};
use crate::utils::{argmax, one_hot};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Per-epoch training curves. Each entry pairs an epoch index with that
/// epoch's mean metric.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct History {
    pub train_loss: Vec<(usize, f64)>,
    pub train_accuracy: Vec<(usize, f64)>,
    pub val_loss: Vec<(usize, f64)>,
    pub val_accuracy: Vec<(usize, f64)>,
}

impl History {
    pub fn clear(&mut self) {
        self.train_loss.clear();
        self.train_accuracy.clear();
        self.val_loss.clear();
        self.val_accuracy.clear();
    }
}

#[derive(Debug, Clone)]
pub struct Network {
    pub layers: Vec<Layer>,
    pub loss: Loss,
    pub regularizer: Regularizer,
    pub learning_rate: f64,
    pub batch_size: usize,
    pub history: History,
}

impl Network {
    pub fn new(
        loss: Loss,
        learning_rate: f64,
        batch_size: usize,
        regularizer: Regularizer,
    ) -> Result<Self> {
        if batch_size == 0 {
            return Err(NNError::InvalidBatchSize(batch_size));
        }
        Ok(Self {
            layers: Vec::new(),
            loss,
            regularizer,
            learning_rate,
            batch_size,
            history: History::default(),
        })
    }

    pub fn builder() -> NetworkBuilder {
        NetworkBuilder::new()
    }

    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn summary(&self) {
        let mut total_param = 0;
        let mut res = "\nModel Network\n".to_string();
        res.push_str("-------------------------------------------------------------\n");
        res.push_str("Layer (Type)\t\t Output shape\t\t No.of params\n");
        for layer in self.layers.iter() {
            let params = layer.parameter_count();
            total_param += params;
            res.push_str(&format!(
                "{}\t\t\t  (None, {})\t\t  {}\n",
                layer.kind(),
                layer.size(),
                params
            ));
        }
        res.push_str("-------------------------------------------------------------\n");
        res.push_str(&format!("Total params: {}\n", total_param));
        res.push_str(&format!(
            "Loss: {:?}, learning rate: {}, batch size: {}, regularizer: {:?}\n",
            self.loss, self.learning_rate, self.batch_size, self.regularizer
        ));
        println!("{}", res);
    }

    /// Runs one sample through every layer in order.
    pub fn forward_pass(&mut self, x: &Array1<f64>) -> Result<Array1<f64>> {
        let mut output = x.clone();
        for layer in self.layers.iter_mut() {
            output = layer.forward_pass(&output)?;
        }
        Ok(output)
    }

    /// Propagates the loss gradient from the last layer back to the first,
    /// letting trainable layers accumulate their contributions.
    pub fn backward_pass(&mut self, loss_gradient: &Array1<f64>) -> Result<()> {
        let mut gradient = loss_gradient.clone();
        for layer in self.layers.iter_mut().rev() {
            gradient = layer.backward_pass(&gradient)?;
        }
        Ok(())
    }

    fn update_parameters(&mut self) {
        let fallback_rate = self.learning_rate;
        for layer in self
            .layers
            .iter_mut()
            .filter(|layer| layer.has_trainable_parameters())
        {
            layer.update_parameters(fallback_rate);
        }
    }

    fn regularization_penalty(&self) -> f64 {
        self.layers
            .iter()
            .filter_map(Layer::weights)
            .map(|w| self.regularizer.penalty(w))
            .sum()
    }

    /// Trains with batched gradient descent. Samples are processed one at a
    /// time; parameters change once per full batch. The batch counter runs
    /// across epochs, so a batch can straddle an epoch boundary, and leftover
    /// contributions simply wait for the next fit call or stay unapplied.
    ///
    /// The recorded history is reset at the start of every call.
    pub fn fit(
        &mut self,
        x_train: &[Array1<f64>],
        y_train: &[Array1<f64>],
        validation: Option<(&[Array1<f64>], &[Array1<f64>])>,
        epochs: usize,
        verbose: bool,
    ) -> Result<()> {
        if self.layers.is_empty() {
            return Err(NNError::EmptyNetwork);
        }
        if x_train.is_empty() {
            return Err(NNError::EmptyDataset("training set is empty".to_string()));
        }
        if x_train.len() != y_train.len() {
            return Err(NNError::InvalidInputShape(format!(
                "{} training samples but {} labels",
                x_train.len(),
                y_train.len()
            )));
        }
        if let Some((x_val, y_val)) = validation {
            if x_val.is_empty() {
                return Err(NNError::EmptyDataset("validation set is empty".to_string()));
            }
            if x_val.len() != y_val.len() {
                return Err(NNError::InvalidInputShape(format!(
                    "{} validation samples but {} labels",
                    x_val.len(),
                    y_val.len()
                )));
            }
        }

        self.history.clear();

        let mut samples_seen = 0usize;
        for epoch in 0..epochs {
            let mut aggregated_loss = 0.0;
            let mut num_correct = 0usize;

            for (x, y) in x_train.iter().zip(y_train.iter()) {
                let y_hat = self.forward_pass(x)?;
                aggregated_loss += self.loss.evaluate(&y_hat, y)? + self.regularization_penalty();
                if is_correct(&y_hat, y) {
                    num_correct += 1;
                }

                let loss_gradient = self.loss.gradient(&y_hat, y)?;
                self.backward_pass(&loss_gradient)?;

                samples_seen += 1;
                if samples_seen % self.batch_size == 0 {
                    self.update_parameters();
                }
            }

            let train_loss = aggregated_loss / x_train.len() as f64;
            let train_accuracy = num_correct as f64 / x_train.len() as f64;
            self.history.train_loss.push((epoch, train_loss));
            self.history.train_accuracy.push((epoch, train_accuracy));

            let mut val_stats = None;
            if let Some((x_val, y_val)) = validation {
                let (val_loss, val_accuracy, correct_by_class) =
                    self.validation_pass(x_val, y_val)?;
                self.history.val_loss.push((epoch, val_loss));
                self.history.val_accuracy.push((epoch, val_accuracy));
                val_stats = Some((val_loss, val_accuracy, correct_by_class));
            }

            if verbose {
                let report = epoch_report(
                    epoch,
                    train_loss,
                    train_accuracy,
                    val_stats.as_ref().map(|(l, a, c)| (*l, *a, c.as_slice())),
                );
                println!("{}", report);
            }
        }
        Ok(())
    }

    /// Mean loss and accuracy over a held-out set. Leaves parameters and
    /// gradient buffers untouched.
    pub fn evaluate(&mut self, x: &[Array1<f64>], y: &[Array1<f64>]) -> Result<(f64, f64)> {
        if self.layers.is_empty() {
            return Err(NNError::EmptyNetwork);
        }
        if x.is_empty() {
            return Err(NNError::EmptyDataset("evaluation set is empty".to_string()));
        }
        if x.len() != y.len() {
            return Err(NNError::InvalidInputShape(format!(
                "{} samples but {} labels",
                x.len(),
                y.len()
            )));
        }
        let (loss, accuracy, _) = self.validation_pass(x, y)?;
        Ok((loss, accuracy))
    }

    fn validation_pass(
        &mut self,
        x_val: &[Array1<f64>],
        y_val: &[Array1<f64>],
    ) -> Result<(f64, f64, Vec<usize>)> {
        let num_classes = self.layers.last().map(|layer| layer.size()).unwrap_or(0);
        let mut correct_by_class = vec![0usize; num_classes];
        let mut aggregated_loss = 0.0;
        let mut num_correct = 0usize;

        for (x, y) in x_val.iter().zip(y_val.iter()) {
            let y_hat = self.forward_pass(x)?;
            aggregated_loss += self.loss.evaluate(&y_hat, y)? + self.regularization_penalty();
            if is_correct(&y_hat, y) {
                num_correct += 1;
                correct_by_class[argmax(&y_hat)] += 1;
            }
        }

        Ok((
            aggregated_loss / x_val.len() as f64,
            num_correct as f64 / x_val.len() as f64,
            correct_by_class,
        ))
    }

    /// Forward pass collapsed to a one-hot vector at the most probable class.
    pub fn predict(&mut self, x: &Array1<f64>) -> Result<Array1<f64>> {
        let y_hat = self.forward_pass(x)?;
        Ok(one_hot(argmax(&y_hat), y_hat.len()))
    }
}

fn is_correct(y_hat: &Array1<f64>, y: &Array1<f64>) -> bool {
    one_hot(argmax(y_hat), y_hat.len()) == *y
}

fn epoch_report(
    epoch: usize,
    train_loss: f64,
    train_accuracy: f64,
    validation: Option<(f64, f64, &[usize])>,
) -> String {
    let mut res = format!("\nEpoch {}\n", epoch);
    res.push_str("-------------------------------------------------------------\n");
    res.push_str(&format!(
        "train loss: {:.4}\t\t train accuracy: {:.2}%\n",
        train_loss,
        100.0 * train_accuracy
    ));
    if let Some((val_loss, val_accuracy, correct_by_class)) = validation {
        res.push_str(&format!(
            "val loss:   {:.4}\t\t val accuracy:   {:.2}%\n",
            val_loss,
            100.0 * val_accuracy
        ));
        res.push_str(&format!(
            "correct validation guesses by class: {:?}\n",
            correct_by_class
        ));
    }
    res.push_str("-------------------------------------------------------------");
    res
}

enum LayerSpec {
    Input {
        size: usize,
    },
    Hidden {
        input_size: usize,
        output_size: usize,
        activation: Activation,
        learning_rate: Option<f64>,
        weight_range: (f64, f64),
        bias_range: (f64, f64),
    },
    Softmax {
        size: usize,
    },
}

/// Assembles a validated [`Network`]. Layer parameters are sampled from a
/// single seedable generator, so equal seeds build identical networks.
pub struct NetworkBuilder {
    specs: Vec<LayerSpec>,
    loss: Loss,
    regularizer: Regularizer,
    learning_rate: f64,
    batch_size: usize,
    seed: Option<u64>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self {
            specs: Vec::new(),
            loss: Loss::CrossEntropy,
            regularizer: Regularizer::None,
            learning_rate: 0.001,
            batch_size: 32,
            seed: None,
        }
    }

    pub fn input(mut self, size: usize) -> Self {
        self.specs.push(LayerSpec::Input { size });
        self
    }

    /// Fully connected layer with the default parameter ranges: weights
    /// uniform in `[-1, 1)`, biases uniform in `[0, 1)`.
    pub fn hidden(self, input_size: usize, output_size: usize, activation: Activation) -> Self {
        self.hidden_with(
            input_size,
            output_size,
            activation,
            None,
            (-1.0, 1.0),
            (0.0, 1.0),
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn hidden_with(
        mut self,
        input_size: usize,
        output_size: usize,
        activation: Activation,
        learning_rate: Option<f64>,
        weight_range: (f64, f64),
        bias_range: (f64, f64),
    ) -> Self {
        self.specs.push(LayerSpec::Hidden {
            input_size,
            output_size,
            activation,
            learning_rate,
            weight_range,
            bias_range,
        });
        self
    }

    pub fn softmax(mut self, size: usize) -> Self {
        self.specs.push(LayerSpec::Softmax { size });
        self
    }

    pub fn loss(mut self, loss: Loss) -> Self {
        self.loss = loss;
        self
    }

    pub fn regularizer(mut self, regularizer: Regularizer) -> Self {
        self.regularizer = regularizer;
        self
    }

    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<Network> {
        if self.specs.is_empty() {
            return Err(NNError::EmptyNetwork);
        }
        if !matches!(self.specs.first(), Some(LayerSpec::Input { .. })) {
            return Err(NNError::InvalidLayerConfiguration(
                "Network must start with an input layer".to_string(),
            ));
        }
        if !matches!(self.specs.last(), Some(LayerSpec::Softmax { .. })) {
            return Err(NNError::InvalidLayerConfiguration(
                "Network must end with a softmax layer".to_string(),
            ));
        }

        let mut rng: StdRng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut layers = Vec::with_capacity(self.specs.len());
        let mut width: Option<usize> = None;
        for spec in &self.specs {
            let layer = match spec {
                LayerSpec::Input { size } => {
                    if width.is_some() {
                        return Err(NNError::InvalidLayerConfiguration(
                            "Input layer is only allowed at the start".to_string(),
                        ));
                    }
                    Layer::Input(InputLayer::new(*size)?)
                }
                LayerSpec::Hidden {
                    input_size,
                    output_size,
                    activation,
                    learning_rate,
                    weight_range,
                    bias_range,
                } => {
                    if let Some(expected) = width {
                        if *input_size != expected {
                            return Err(NNError::InvalidLayerConfiguration(format!(
                                "Layer expects input of size {} but the previous layer produces {}",
                                input_size, expected
                            )));
                        }
                    }
                    Layer::Hidden(HiddenLayer::new(
                        *input_size,
                        *output_size,
                        *activation,
                        *learning_rate,
                        *weight_range,
                        *bias_range,
                        &mut rng,
                    )?)
                }
                LayerSpec::Softmax { size } => {
                    if let Some(expected) = width {
                        if *size != expected {
                            return Err(NNError::InvalidLayerConfiguration(format!(
                                "Softmax expects input of size {} but the previous layer produces {}",
                                size, expected
                            )));
                        }
                    }
                    Layer::Softmax(SoftmaxLayer::new(*size)?)
                }
            };
            width = Some(layer.size());
            layers.push(layer);
        }

        let mut network = Network::new(
            self.loss,
            self.learning_rate,
            self.batch_size,
            self.regularizer,
        )?;
        network.layers = layers;
        Ok(network)
    }
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_rejects_incompatible_widths() {
        let result = Network::builder()
            .input(2)
            .hidden(3, 4, Activation::Relu)
            .softmax(4)
            .build();
        assert!(matches!(
            result,
            Err(NNError::InvalidLayerConfiguration(_))
        ));
    }

    #[test]
    fn builder_requires_input_first_and_softmax_last() {
        let no_input = Network::builder()
            .hidden(2, 2, Activation::Relu)
            .softmax(2)
            .build();
        assert!(no_input.is_err());

        let no_softmax = Network::builder()
            .input(2)
            .hidden(2, 2, Activation::Relu)
            .build();
        assert!(no_softmax.is_err());
    }

    #[test]
    fn builder_rejects_empty_stack_and_zero_batch() {
        assert!(matches!(
            Network::builder().build(),
            Err(NNError::EmptyNetwork)
        ));
        assert!(matches!(
            Network::builder()
                .input(2)
                .hidden(2, 2, Activation::Relu)
                .softmax(2)
                .batch_size(0)
                .build(),
            Err(NNError::InvalidBatchSize(0))
        ));
    }

    #[test]
    fn equal_seeds_build_identical_parameters() {
        let build = || {
            Network::builder()
                .input(3)
                .hidden(3, 5, Activation::Tanh)
                .hidden(5, 2, Activation::Linear)
                .softmax(2)
                .seed(99)
                .build()
                .unwrap()
        };
        let a = build();
        let b = build();
        for (left, right) in a.layers.iter().zip(b.layers.iter()) {
            if let (Layer::Hidden(l), Layer::Hidden(r)) = (left, right) {
                assert_eq!(l.w, r.w);
                assert_eq!(l.b, r.b);
            }
        }
    }

    #[test]
    fn fit_rejects_degenerate_inputs() {
        let mut network = Network::builder()
            .input(2)
            .hidden(2, 2, Activation::Relu)
            .softmax(2)
            .seed(1)
            .build()
            .unwrap();

        let x: Vec<ndarray::Array1<f64>> = vec![];
        let y: Vec<ndarray::Array1<f64>> = vec![];
        assert!(matches!(
            network.fit(&x, &y, None, 1, false),
            Err(NNError::EmptyDataset(_))
        ));

        let x = vec![ndarray::arr1(&[0.0, 1.0])];
        assert!(matches!(
            network.fit(&x, &y, None, 1, false),
            Err(NNError::InvalidInputShape(_))
        ));
    }
}
