extern crate plotters;

pub mod core;
pub mod data;
pub mod error;
pub mod models;
pub mod persist;
pub mod prelude;
pub mod utils;

// Re-export types
pub use crate::core::{
    Activation, HiddenLayer, InputLayer, Layer, Loss, Regularizer, SoftmaxLayer,
};
pub use crate::models::{History, Network, NetworkBuilder};

pub mod plot {
    pub mod plot_dataset;
    pub mod plot_history;
}
