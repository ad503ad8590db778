use crate::error::{NNError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

const EPSILON: f64 = 1e-15;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loss {
    CrossEntropy,
    Mse,
}

impl Loss {
    /// Scalar loss for a single prediction against its one-hot target.
    pub fn evaluate(&self, y_hat: &Array1<f64>, y: &Array1<f64>) -> Result<f64> {
        check_shapes(y_hat, y)?;
        Ok(match self {
            Loss::CrossEntropy => {
                // Avoid log(0)
                let y_hat_safe = y_hat.mapv(|x| x.max(EPSILON).min(1.0 - EPSILON));
                -(y * &y_hat_safe.mapv(|p| p.ln())).sum()
            }
            Loss::Mse => (y_hat - y).mapv(|d| d.powi(2)).mean().unwrap(),
        })
    }

    /// Gradient of the loss with respect to the prediction.
    pub fn gradient(&self, y_hat: &Array1<f64>, y: &Array1<f64>) -> Result<Array1<f64>> {
        check_shapes(y_hat, y)?;
        Ok(match self {
            Loss::CrossEntropy => {
                // Avoid division by zero
                let y_hat_safe = y_hat.mapv(|x| x.max(EPSILON).min(1.0 - EPSILON));
                -(y / &y_hat_safe)
            }
            Loss::Mse => {
                let n = y.len() as f64;
                (y_hat - y).mapv(|d| 2.0 * d / n)
            }
        })
    }
}

fn check_shapes(y_hat: &Array1<f64>, y: &Array1<f64>) -> Result<()> {
    if y_hat.len() != y.len() {
        return Err(NNError::LayerShapeMismatch(format!(
            "Prediction length {} doesn't match target length {}",
            y_hat.len(),
            y.len()
        )));
    }
    Ok(())
}
