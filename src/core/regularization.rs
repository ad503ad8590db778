use ndarray::Array2;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum Regularizer {
    None,
    L1(f64),
    L2(f64),
}

impl Regularizer {
    /// Penalty contributed by one weight matrix to the reported loss.
    pub fn penalty(&self, weights: &Array2<f64>) -> f64 {
        match self {
            Regularizer::L1(lambda) => lambda * weights.mapv(|x| x.abs()).sum(),
            Regularizer::L2(lambda) => 0.5 * lambda * weights.mapv(|x| x.powi(2)).sum(),
            Regularizer::None => 0.0,
        }
    }
}

impl Default for Regularizer {
    fn default() -> Self {
        Regularizer::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::arr2;

    #[test]
    fn penalties_match_hand_computed_values() {
        let w = arr2(&[[1.0, -2.0], [3.0, -4.0]]);
        assert_relative_eq!(Regularizer::None.penalty(&w), 0.0);
        assert_relative_eq!(Regularizer::L1(0.1).penalty(&w), 1.0, epsilon = 1e-12);
        assert_relative_eq!(Regularizer::L2(0.1).penalty(&w), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn zero_coefficient_contributes_nothing() {
        let w = arr2(&[[5.0, -5.0]]);
        assert_eq!(Regularizer::L1(0.0).penalty(&w), 0.0);
        assert_eq!(Regularizer::L2(0.0).penalty(&w), 0.0);
    }
}
