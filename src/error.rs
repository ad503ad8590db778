use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum NNError {
    // Model related errors
    InvalidLayerConfiguration(String),
    LayerShapeMismatch(String),
    EmptyNetwork,

    // Training related errors
    InvalidInputShape(String),
    EmptyDataset(String),
    InvalidBatchSize(usize),

    // Dataset generation errors
    InvalidDataConfiguration(String),

    // Computation errors
    ComputationError(String),

    // File operations
    ModelLoadError(String),

    IoError(std::io::Error),
    SerializationError(Box<bincode::ErrorKind>),

    ShapeError(ndarray::ShapeError),
}

impl fmt::Display for NNError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NNError::InvalidLayerConfiguration(msg) => {
                write!(f, "Invalid layer configuration: {}", msg)
            }
            NNError::LayerShapeMismatch(msg) => write!(f, "Layer shape mismatch: {}", msg),
            NNError::EmptyNetwork => write!(f, "Network has no layers"),
            NNError::InvalidInputShape(msg) => write!(f, "Invalid input shape: {}", msg),
            NNError::EmptyDataset(msg) => write!(f, "Empty dataset: {}", msg),
            NNError::InvalidBatchSize(size) => {
                write!(f, "Invalid batch size: {} (must be at least 1)", size)
            }
            NNError::InvalidDataConfiguration(msg) => {
                write!(f, "Invalid data configuration: {}", msg)
            }
            NNError::ComputationError(msg) => write!(f, "Computation error: {}", msg),
            NNError::ModelLoadError(msg) => write!(f, "Failed to load model: {}", msg),
            NNError::IoError(err) => write!(f, "I/O error: {}", err),
            NNError::SerializationError(err) => write!(f, "Serialization error: {}", err),
            NNError::ShapeError(err) => write!(f, "Shape error: {}", err),
        }
    }
}

impl From<std::io::Error> for NNError {
    fn from(err: std::io::Error) -> NNError {
        NNError::IoError(err)
    }
}

impl From<Box<bincode::ErrorKind>> for NNError {
    fn from(err: Box<bincode::ErrorKind>) -> NNError {
        NNError::SerializationError(err)
    }
}

impl From<ndarray::ShapeError> for NNError {
    fn from(err: ndarray::ShapeError) -> NNError {
        NNError::ShapeError(err)
    }
}

impl Error for NNError {}

pub type Result<T> = std::result::Result<T, NNError>;
