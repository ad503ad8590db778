use crate::core::activations::Activation;
use crate::error::{NNError, Result};
use crate::utils::{uniform_array1, uniform_array2};
use ndarray::{Array1, Array2, Axis};
use rand::Rng;

/// A processing stage of the network. The set of variants is closed, so
/// selecting layers by role is a plain `match` rather than a type check.
#[derive(Debug, Clone)]
pub enum Layer {
    Input(InputLayer),
    Hidden(HiddenLayer),
    Softmax(SoftmaxLayer),
}

impl Layer {
    pub fn forward_pass(&mut self, x: &Array1<f64>) -> Result<Array1<f64>> {
        match self {
            Layer::Input(layer) => layer.forward_pass(x),
            Layer::Hidden(layer) => layer.forward_pass(x),
            Layer::Softmax(layer) => layer.forward_pass(x),
        }
    }

    pub fn backward_pass(&mut self, upstream: &Array1<f64>) -> Result<Array1<f64>> {
        match self {
            Layer::Input(layer) => layer.backward_pass(upstream),
            Layer::Hidden(layer) => layer.backward_pass(upstream),
            Layer::Softmax(layer) => layer.backward_pass(upstream),
        }
    }

    /// True for layers that hold weights and biases adjusted by training.
    pub fn has_trainable_parameters(&self) -> bool {
        matches!(self, Layer::Hidden(_))
    }

    /// Applies and clears any accumulated gradients. A no-op for layers
    /// without trainable parameters.
    pub fn update_parameters(&mut self, fallback_rate: f64) {
        if let Layer::Hidden(layer) = self {
            layer.update_parameters(fallback_rate);
        }
    }

    pub fn weights(&self) -> Option<&Array2<f64>> {
        match self {
            Layer::Hidden(layer) => Some(&layer.w),
            _ => None,
        }
    }

    /// Output width of the layer.
    pub fn size(&self) -> usize {
        match self {
            Layer::Input(layer) => layer.size,
            Layer::Hidden(layer) => layer.output_size(),
            Layer::Softmax(layer) => layer.size,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Layer::Input(_) => "Input",
            Layer::Hidden(_) => "Hidden",
            Layer::Softmax(_) => "Softmax",
        }
    }

    pub fn parameter_count(&self) -> usize {
        match self {
            Layer::Hidden(layer) => layer.w.len() + layer.b.len(),
            _ => 0,
        }
    }
}

/// Identity stage marking the network entry. Carries no parameters.
#[derive(Debug, Clone)]
pub struct InputLayer {
    pub size: usize,
}

impl InputLayer {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(NNError::InvalidLayerConfiguration(
                "Layer dimensions must be greater than 0".to_string(),
            ));
        }
        Ok(Self { size })
    }

    pub fn forward_pass(&self, x: &Array1<f64>) -> Result<Array1<f64>> {
        Ok(x.clone())
    }

    pub fn backward_pass(&self, upstream: &Array1<f64>) -> Result<Array1<f64>> {
        Ok(upstream.clone())
    }
}

/// Fully connected layer: `output = activation(x · w + b)`.
///
/// Weights are laid out `(input_size, output_size)`. Per-sample gradient
/// contributions pile up in `w_gradients`/`b_gradients` until
/// `update_parameters` consumes them.
#[derive(Debug, Clone)]
pub struct HiddenLayer {
    pub w: Array2<f64>,
    pub b: Array1<f64>,
    pub activation: Activation,
    /// Overrides the network-wide learning rate when set.
    pub learning_rate: Option<f64>,
    pub w_gradients: Vec<Array2<f64>>,
    pub b_gradients: Vec<Array1<f64>>,
    input: Option<Array1<f64>>,
    output: Option<Array1<f64>>,
}

impl HiddenLayer {
    #[allow(clippy::too_many_arguments)]
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        learning_rate: Option<f64>,
        weight_range: (f64, f64),
        bias_range: (f64, f64),
        rng: &mut R,
    ) -> Result<Self> {
        if input_size == 0 || output_size == 0 {
            return Err(NNError::InvalidLayerConfiguration(
                "Layer dimensions must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            w: uniform_array2((input_size, output_size), weight_range, rng),
            b: uniform_array1(output_size, bias_range, rng),
            activation,
            learning_rate,
            w_gradients: Vec::new(),
            b_gradients: Vec::new(),
            input: None,
            output: None,
        })
    }

    /// Builds a layer around existing parameters, e.g. restored from disk.
    pub fn with_parameters(
        w: Array2<f64>,
        b: Array1<f64>,
        activation: Activation,
        learning_rate: Option<f64>,
    ) -> Result<Self> {
        if w.nrows() == 0 || w.ncols() == 0 {
            return Err(NNError::InvalidLayerConfiguration(
                "Layer dimensions must be greater than 0".to_string(),
            ));
        }
        if b.len() != w.ncols() {
            return Err(NNError::InvalidLayerConfiguration(format!(
                "Bias length {} doesn't match output size {}",
                b.len(),
                w.ncols()
            )));
        }
        Ok(Self {
            w,
            b,
            activation,
            learning_rate,
            w_gradients: Vec::new(),
            b_gradients: Vec::new(),
            input: None,
            output: None,
        })
    }

    pub fn input_size(&self) -> usize {
        self.w.nrows()
    }

    pub fn output_size(&self) -> usize {
        self.w.ncols()
    }

    pub fn forward_pass(&mut self, x: &Array1<f64>) -> Result<Array1<f64>> {
        if x.len() != self.input_size() {
            return Err(NNError::LayerShapeMismatch(format!(
                "Expected input of length {}, got {}",
                self.input_size(),
                x.len()
            )));
        }
        let z = x.dot(&self.w) + &self.b;
        let output = self.activation.apply(z);
        self.input = Some(x.clone());
        self.output = Some(output.clone());
        Ok(output)
    }

    /// Consumes the state stored by the preceding forward pass to append one
    /// gradient contribution per buffer, and returns the loss gradient with
    /// respect to this layer's input.
    pub fn backward_pass(&mut self, upstream: &Array1<f64>) -> Result<Array1<f64>> {
        if upstream.len() != self.output_size() {
            return Err(NNError::LayerShapeMismatch(format!(
                "Expected upstream gradient of length {}, got {}",
                self.output_size(),
                upstream.len()
            )));
        }
        let (input, output) = match (&self.input, &self.output) {
            (Some(input), Some(output)) => (input, output),
            _ => {
                return Err(NNError::ComputationError(
                    "backward_pass called before forward_pass".to_string(),
                ))
            }
        };

        // delta = upstream ⊙ activation'(output)
        let delta = upstream * &self.activation.gradient(output);
        let dw = input
            .view()
            .insert_axis(Axis(1))
            .dot(&delta.view().insert_axis(Axis(0)));
        let downstream = delta.dot(&self.w.t());

        self.w_gradients.push(dw);
        self.b_gradients.push(delta);
        Ok(downstream)
    }

    /// Takes one gradient step using the summed buffered contributions, then
    /// clears both buffers. Empty buffers make this a no-op.
    pub fn update_parameters(&mut self, fallback_rate: f64) {
        if self.w_gradients.is_empty() {
            return;
        }
        let rate = self.learning_rate.unwrap_or(fallback_rate);

        let mut w_sum = Array2::<f64>::zeros(self.w.raw_dim());
        for dw in &self.w_gradients {
            w_sum += dw;
        }
        let mut b_sum = Array1::<f64>::zeros(self.b.raw_dim());
        for db in &self.b_gradients {
            b_sum += db;
        }

        self.w -= &(w_sum * rate);
        self.b -= &(b_sum * rate);
        self.w_gradients.clear();
        self.b_gradients.clear();
    }
}

/// Normalizes raw scores into a probability distribution over classes.
#[derive(Debug, Clone)]
pub struct SoftmaxLayer {
    pub size: usize,
    output: Option<Array1<f64>>,
}

impl SoftmaxLayer {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(NNError::InvalidLayerConfiguration(
                "Layer dimensions must be greater than 0".to_string(),
            ));
        }
        Ok(Self { size, output: None })
    }

    pub fn forward_pass(&mut self, x: &Array1<f64>) -> Result<Array1<f64>> {
        // Shift by the maximum so large scores don't overflow exp
        let max = x.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
        let exp = x.mapv(|v| (v - max).exp());
        let sum = exp.sum();
        let output = exp / sum;
        self.output = Some(output.clone());
        Ok(output)
    }

    /// Routes the upstream gradient through the full softmax Jacobian
    /// `J[i][j] = out[i] * (δ_ij - out[j])` built from the stored output.
    pub fn backward_pass(&mut self, upstream: &Array1<f64>) -> Result<Array1<f64>> {
        let output = match &self.output {
            Some(output) => output,
            None => {
                return Err(NNError::ComputationError(
                    "backward_pass called before forward_pass".to_string(),
                ))
            }
        };
        if upstream.len() != output.len() {
            return Err(NNError::LayerShapeMismatch(format!(
                "Expected upstream gradient of length {}, got {}",
                output.len(),
                upstream.len()
            )));
        }
        let n = output.len();
        let jacobian = Array2::from_shape_fn((n, n), |(i, j)| {
            if i == j {
                output[i] * (1.0 - output[j])
            } else {
                -output[i] * output[j]
            }
        });
        Ok(upstream.dot(&jacobian))
    }
}
