// src/core.rs
pub mod activations;
pub mod layers;
pub mod losses;
pub mod normalization;
pub mod output;
pub mod regularization;

// Re-export commonly used items
pub use activations::Activation;
pub use layers::{HiddenLayer, InputLayer, Layer, SoftmaxLayer};
pub use losses::Loss;
pub use normalization::Normalization;
pub use output::write_history_to_csv;
pub use regularization::Regularizer;
