use crate::core::activations::Activation;
use crate::core::layers::{HiddenLayer, InputLayer, Layer, SoftmaxLayer};
use crate::core::losses::Loss;
use crate::core::regularization::Regularizer;
use crate::error::{NNError, Result};
use crate::models::{History, Network};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};

/// Bump when the snapshot layout changes. Loading refuses other versions.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable stand-in for one layer. Parameters are stored flat in
/// row-major order next to their dimensions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum LayerDescriptor {
    Input {
        size: usize,
    },
    Hidden {
        input_size: usize,
        output_size: usize,
        activation: Activation,
        learning_rate: Option<f64>,
        weights: Vec<f64>,
        biases: Vec<f64>,
    },
    Softmax {
        size: usize,
    },
}

/// Everything needed to rebuild a trained network, minus transient state:
/// stored inputs, outputs and pending gradient contributions stay behind.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NetworkSnapshot {
    pub version: u32,
    pub layers: Vec<LayerDescriptor>,
    pub loss: Loss,
    pub regularizer: Regularizer,
    pub learning_rate: f64,
    pub batch_size: usize,
    pub history: History,
}

impl Network {
    pub fn snapshot(&self) -> NetworkSnapshot {
        let layers = self
            .layers
            .iter()
            .map(|layer| match layer {
                Layer::Input(input) => LayerDescriptor::Input { size: input.size },
                Layer::Hidden(hidden) => LayerDescriptor::Hidden {
                    input_size: hidden.input_size(),
                    output_size: hidden.output_size(),
                    activation: hidden.activation,
                    learning_rate: hidden.learning_rate,
                    weights: hidden.w.iter().copied().collect(),
                    biases: hidden.b.iter().copied().collect(),
                },
                Layer::Softmax(softmax) => LayerDescriptor::Softmax { size: softmax.size },
            })
            .collect();

        NetworkSnapshot {
            version: SNAPSHOT_VERSION,
            layers,
            loss: self.loss,
            regularizer: self.regularizer,
            learning_rate: self.learning_rate,
            batch_size: self.batch_size,
            history: self.history.clone(),
        }
    }

    pub fn from_snapshot(snapshot: NetworkSnapshot) -> Result<Network> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(NNError::ModelLoadError(format!(
                "Snapshot version {} doesn't match supported version {}",
                snapshot.version, SNAPSHOT_VERSION
            )));
        }

        let mut network = Network::new(
            snapshot.loss,
            snapshot.learning_rate,
            snapshot.batch_size,
            snapshot.regularizer,
        )?;
        network.history = snapshot.history;

        for descriptor in snapshot.layers {
            let layer = match descriptor {
                LayerDescriptor::Input { size } => Layer::Input(InputLayer::new(size)?),
                LayerDescriptor::Hidden {
                    input_size,
                    output_size,
                    activation,
                    learning_rate,
                    weights,
                    biases,
                } => {
                    if weights.len() != input_size * output_size || biases.len() != output_size {
                        return Err(NNError::ModelLoadError(format!(
                            "Hidden layer expects {} weights and {} biases, snapshot holds {} and {}",
                            input_size * output_size,
                            output_size,
                            weights.len(),
                            biases.len()
                        )));
                    }
                    let w = Array2::from_shape_vec((input_size, output_size), weights)?;
                    let b = Array1::from_vec(biases);
                    Layer::Hidden(HiddenLayer::with_parameters(
                        w,
                        b,
                        activation,
                        learning_rate,
                    )?)
                }
                LayerDescriptor::Softmax { size } => Layer::Softmax(SoftmaxLayer::new(size)?),
            };
            network.add_layer(layer);
        }

        Ok(network)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let encoded: Vec<u8> =
            bincode::serialize(&self.snapshot()).map_err(NNError::SerializationError)?;

        File::create(path)
            .map_err(NNError::IoError)?
            .write_all(&encoded)
            .map_err(NNError::IoError)?;

        Ok(())
    }

    pub fn load(path: &str) -> Result<Network> {
        let mut buffer = Vec::new();

        File::open(path)
            .map_err(NNError::IoError)?
            .read_to_end(&mut buffer)
            .map_err(NNError::IoError)?;

        let snapshot: NetworkSnapshot =
            bincode::deserialize(&buffer).map_err(NNError::SerializationError)?;

        Network::from_snapshot(snapshot)
    }
}
