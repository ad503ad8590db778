use crate::core::normalization::Normalization;
use crate::error::{NNError, Result};
use crate::utils::one_hot;
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fmt;

/// Labelled samples split into train, validation and test partitions.
/// Labels are one-hot vectors, one slot per class.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub x_train: Vec<Array1<f64>>,
    pub y_train: Vec<Array1<f64>>,
    pub x_val: Vec<Array1<f64>>,
    pub y_val: Vec<Array1<f64>>,
    pub x_test: Vec<Array1<f64>>,
    pub y_test: Vec<Array1<f64>>,
}

impl Dataset {
    pub fn num_features(&self) -> usize {
        self.x_train.first().map(|x| x.len()).unwrap_or(0)
    }

    pub fn num_classes(&self) -> usize {
        self.y_train.first().map(|y| y.len()).unwrap_or(0)
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut res = "\nDataset\n".to_string();
        res.push_str("-------------------------------------------------------------\n");
        res.push_str("Partition\t\t Samples\n");
        res.push_str(&format!("train\t\t\t  {}\n", self.x_train.len()));
        res.push_str(&format!("validation\t\t  {}\n", self.x_val.len()));
        res.push_str(&format!("test\t\t\t  {}\n", self.x_test.len()));
        res.push_str("-------------------------------------------------------------\n");
        res.push_str(&format!(
            "Features: {}, classes: {}",
            self.num_features(),
            self.num_classes()
        ));
        write!(f, "{}", res)
    }
}

/// Draws point clouds around one center per class, shuffles them and splits
/// the result into partitions. Equal seeds produce equal datasets.
#[derive(Debug, Clone)]
pub struct DataGenerator {
    pub centers: Vec<Array1<f64>>,
    pub samples_per_class: usize,
    pub spread: f64,
    pub val_fraction: f64,
    pub test_fraction: f64,
    pub seed: u64,
    pub normalize: bool,
}

impl DataGenerator {
    pub fn new(centers: Vec<Array1<f64>>, samples_per_class: usize, spread: f64) -> Self {
        Self {
            centers,
            samples_per_class,
            spread,
            val_fraction: 0.2,
            test_fraction: 0.1,
            seed: 0,
            normalize: false,
        }
    }

    pub fn with_split(mut self, val_fraction: f64, test_fraction: f64) -> Self {
        self.val_fraction = val_fraction;
        self.test_fraction = test_fraction;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Rescale every feature into `[0, 1]` using the global value range.
    pub fn normalized(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn generate(&self) -> Result<Dataset> {
        if self.centers.is_empty() {
            return Err(NNError::InvalidDataConfiguration(
                "at least one cluster center is required".to_string(),
            ));
        }
        if self.samples_per_class == 0 {
            return Err(NNError::InvalidDataConfiguration(
                "samples_per_class must be at least 1".to_string(),
            ));
        }
        if self.spread < 0.0 {
            return Err(NNError::InvalidDataConfiguration(
                "spread must not be negative".to_string(),
            ));
        }
        let num_features = self.centers[0].len();
        if num_features == 0 {
            return Err(NNError::InvalidDataConfiguration(
                "cluster centers must have at least one feature".to_string(),
            ));
        }
        if self.centers.iter().any(|c| c.len() != num_features) {
            return Err(NNError::InvalidDataConfiguration(
                "all cluster centers must share one dimension".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.val_fraction)
            || !(0.0..1.0).contains(&self.test_fraction)
            || self.val_fraction + self.test_fraction >= 1.0
        {
            return Err(NNError::InvalidDataConfiguration(
                "partition fractions must lie in [0, 1) and sum to less than 1".to_string(),
            ));
        }

        let num_classes = self.centers.len();
        let total = num_classes * self.samples_per_class;
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut samples: Vec<(Array1<f64>, Array1<f64>)> = Vec::with_capacity(total);
        for (class, center) in self.centers.iter().enumerate() {
            for _ in 0..self.samples_per_class {
                let x = center.mapv(|c| c + rng.gen_range(-self.spread..=self.spread));
                samples.push((x, one_hot(class, num_classes)));
            }
        }
        samples.shuffle(&mut rng);

        if self.normalize {
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            for (x, _) in &samples {
                for &v in x.iter() {
                    min = min.min(v);
                    max = max.max(v);
                }
            }
            for (x, _) in samples.iter_mut() {
                x.to_unity(min, max);
            }
        }

        let val_len = (total as f64 * self.val_fraction).round() as usize;
        let test_len = (total as f64 * self.test_fraction).round() as usize;
        let train_len = total
            .checked_sub(val_len + test_len)
            .filter(|len| *len > 0)
            .ok_or_else(|| {
                NNError::EmptyDataset("train partition is empty after splitting".to_string())
            })?;

        let mut dataset = Dataset {
            x_train: Vec::with_capacity(train_len),
            y_train: Vec::with_capacity(train_len),
            x_val: Vec::with_capacity(val_len),
            y_val: Vec::with_capacity(val_len),
            x_test: Vec::with_capacity(test_len),
            y_test: Vec::with_capacity(test_len),
        };
        for (i, (x, y)) in samples.into_iter().enumerate() {
            if i < train_len {
                dataset.x_train.push(x);
                dataset.y_train.push(y);
            } else if i < train_len + val_len {
                dataset.x_val.push(x);
                dataset.y_val.push(y);
            } else {
                dataset.x_test.push(x);
                dataset.y_test.push(y);
            }
        }
        Ok(dataset)
    }
}
