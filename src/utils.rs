use ndarray::{Array1, Array2};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::Rng;

/// Samples a matrix with entries drawn uniformly from `[low, high)`.
///
/// A zero-width range yields a constant matrix instead of panicking.
pub fn uniform_array2<R: Rng + ?Sized>(
    shape: (usize, usize),
    (low, high): (f64, f64),
    rng: &mut R,
) -> Array2<f64> {
    if (high - low).abs() < f64::EPSILON {
        return Array2::from_elem(shape, low);
    }
    Array2::random_using(shape, Uniform::new(low, high), rng)
}

/// Samples a vector with entries drawn uniformly from `[low, high)`.
pub fn uniform_array1<R: Rng + ?Sized>(
    len: usize,
    (low, high): (f64, f64),
    rng: &mut R,
) -> Array1<f64> {
    if (high - low).abs() < f64::EPSILON {
        return Array1::from_elem(len, low);
    }
    Array1::random_using(len, Uniform::new(low, high), rng)
}

/// Index of the largest entry. Ties resolve to the earliest index.
pub fn argmax(values: &Array1<f64>) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// One-hot vector of length `len` with a single 1.0 at `index`.
pub fn one_hot(index: usize, len: usize) -> Array1<f64> {
    let mut encoded = Array1::zeros(len);
    encoded[index] = 1.0;
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn argmax_picks_first_of_equal_maxima() {
        assert_eq!(argmax(&arr1(&[0.1, 0.7, 0.7, 0.2])), 1);
        assert_eq!(argmax(&arr1(&[-3.0, -1.0, -2.0])), 1);
    }

    #[test]
    fn one_hot_has_single_unit_entry() {
        let encoded = one_hot(2, 4);
        assert_eq!(encoded, arr1(&[0.0, 0.0, 1.0, 0.0]));
    }

    #[test]
    fn uniform_sampling_respects_range_and_seed() {
        let mut rng = StdRng::seed_from_u64(3);
        let w = uniform_array2((4, 3), (-1.0, 1.0), &mut rng);
        assert!(w.iter().all(|&v| (-1.0..1.0).contains(&v)));

        let mut rng_again = StdRng::seed_from_u64(3);
        let w_again = uniform_array2((4, 3), (-1.0, 1.0), &mut rng_again);
        assert_eq!(w, w_again);
    }

    #[test]
    fn zero_width_range_yields_constant_array() {
        let mut rng = StdRng::seed_from_u64(3);
        let b = uniform_array1(5, (0.0, 0.0), &mut rng);
        assert!(b.iter().all(|&v| v == 0.0));
    }
}
