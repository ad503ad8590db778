use ndarray::Array1;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Linear,
    Relu,
    Sigmoid,
    Tanh,
}

impl Activation {
    pub fn apply(&self, z: Array1<f64>) -> Array1<f64> {
        match self {
            Self::Linear => z,
            Self::Relu => relu_forward(z),
            Self::Sigmoid => sigmoid_forward(z),
            Self::Tanh => tanh_forward(z),
        }
    }

    /// Elementwise derivative expressed through the stored post-activation
    /// output, so the pre-activation sum never needs to be kept around.
    pub fn gradient(&self, output: &Array1<f64>) -> Array1<f64> {
        match self {
            Self::Linear => Array1::ones(output.len()),
            Self::Relu => relu_gradient(output),
            Self::Sigmoid => sigmoid_gradient(output),
            Self::Tanh => tanh_gradient(output),
        }
    }
}

fn sigmoid_forward(z: Array1<f64>) -> Array1<f64> {
    z.mapv(|z| 1.0 / (1.0 + (-z).exp()))
}

fn sigmoid_gradient(output: &Array1<f64>) -> Array1<f64> {
    output.mapv(|y| y * (1.0 - y))
}

fn relu_forward(z: Array1<f64>) -> Array1<f64> {
    z.mapv(|z| if z >= 0.0 { z } else { 0.0 })
}

fn relu_gradient(output: &Array1<f64>) -> Array1<f64> {
    output.mapv(|y| if y > 0.0 { 1.0 } else { 0.0 })
}

fn tanh_forward(z: Array1<f64>) -> Array1<f64> {
    z.mapv(|z| z.tanh())
}

fn tanh_gradient(output: &Array1<f64>) -> Array1<f64> {
    output.mapv(|y| 1.0 - y * y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::arr1;

    #[test]
    fn relu_clamps_negative_inputs() {
        let out = Activation::Relu.apply(arr1(&[-2.0, 0.0, 3.5]));
        assert_eq!(out, arr1(&[0.0, 0.0, 3.5]));
    }

    #[test]
    fn sigmoid_gradient_matches_closed_form() {
        let z = arr1(&[0.0, 1.0, -1.0]);
        let out = Activation::Sigmoid.apply(z.clone());
        let grad = Activation::Sigmoid.gradient(&out);
        for (g, z) in grad.iter().zip(z.iter()) {
            let s = 1.0 / (1.0 + (-z).exp());
            assert_relative_eq!(*g, s * (1.0 - s), epsilon = 1e-12);
        }
    }

    #[test]
    fn tanh_gradient_matches_closed_form() {
        let z = arr1(&[0.0, 0.5, -2.0]);
        let out = Activation::Tanh.apply(z.clone());
        let grad = Activation::Tanh.gradient(&out);
        for (g, z) in grad.iter().zip(z.iter()) {
            assert_relative_eq!(*g, 1.0 - z.tanh().powi(2), epsilon = 1e-12);
        }
    }

    #[test]
    fn linear_gradient_is_all_ones() {
        let out = Activation::Linear.apply(arr1(&[4.0, -7.0]));
        assert_eq!(Activation::Linear.gradient(&out), arr1(&[1.0, 1.0]));
    }
}
