pub use serde::{Deserialize, Serialize};
pub use std::fs::File;
pub use std::io::{Read, Write};

pub use ndarray::*;
pub use ndarray_rand::rand_distr::Uniform;
pub use ndarray_rand::RandomExt;

pub use crate::error::*;
pub use crate::models::{History, Network, NetworkBuilder};

// Internal re-exports
pub use crate::core::{
    write_history_to_csv, Activation, HiddenLayer, InputLayer, Layer, Loss, Normalization,
    Regularizer, SoftmaxLayer,
};
pub use crate::data::{DataGenerator, Dataset};
pub use crate::persist::{LayerDescriptor, NetworkSnapshot, SNAPSHOT_VERSION};
pub use crate::utils::{argmax, one_hot};
