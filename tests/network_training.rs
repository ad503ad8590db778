use ndarray::{arr1, Array1, Array2};
use rkn::{Activation, Layer, Network, Regularizer};

/// Four points in the plane, two tight groups, one-hot labels.
fn separable_data() -> (Vec<Array1<f64>>, Vec<Array1<f64>>) {
    let x = vec![
        arr1(&[0.0, 0.0]),
        arr1(&[0.1, 0.1]),
        arr1(&[0.9, 0.9]),
        arr1(&[1.0, 1.0]),
    ];
    let y = vec![
        arr1(&[1.0, 0.0]),
        arr1(&[1.0, 0.0]),
        arr1(&[0.0, 1.0]),
        arr1(&[0.0, 1.0]),
    ];
    (x, y)
}

fn small_network(batch_size: usize, seed: u64) -> Network {
    Network::builder()
        .input(2)
        .hidden(2, 4, Activation::Relu)
        .hidden(4, 2, Activation::Linear)
        .softmax(2)
        .learning_rate(0.05)
        .batch_size(batch_size)
        .seed(seed)
        .build()
        .unwrap()
}

/// Pending gradient contributions per trainable layer, front to back.
fn pending_contributions(network: &Network) -> Vec<usize> {
    network
        .layers
        .iter()
        .filter_map(|layer| match layer {
            Layer::Hidden(hidden) => Some(hidden.w_gradients.len()),
            _ => None,
        })
        .collect()
}

fn hidden_parameters(network: &Network) -> Vec<(Array2<f64>, Array1<f64>)> {
    network
        .layers
        .iter()
        .filter_map(|layer| match layer {
            Layer::Hidden(hidden) => Some((hidden.w.clone(), hidden.b.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn partial_batches_leave_parameters_untouched() {
    let (x, y) = separable_data();
    let mut network = small_network(8, 3);
    let before = hidden_parameters(&network);

    network.fit(&x[..3], &y[..3], None, 1, false).unwrap();

    assert_eq!(hidden_parameters(&network), before);
    assert_eq!(pending_contributions(&network), vec![3, 3]);
}

#[test]
fn full_batches_trigger_updates_and_clear_buffers() {
    let (x, y) = separable_data();
    let mut network = small_network(4, 7);
    let before = hidden_parameters(&network);

    // 8 samples at batch size 4: updates after samples 4 and 8
    network.fit(&x, &y, None, 2, false).unwrap();

    assert_eq!(pending_contributions(&network), vec![0, 0]);
    assert_ne!(hidden_parameters(&network), before);
}

#[test]
fn eight_samples_in_one_epoch_consume_two_batches() {
    let (x, y) = separable_data();
    let x8: Vec<Array1<f64>> = x.iter().cloned().cycle().take(8).collect();
    let y8: Vec<Array1<f64>> = y.iter().cloned().cycle().take(8).collect();
    let mut network = small_network(4, 9);
    let before = hidden_parameters(&network);

    network.fit(&x8, &y8, None, 1, false).unwrap();

    assert_eq!(pending_contributions(&network), vec![0, 0]);
    assert_ne!(hidden_parameters(&network), before);
}

#[test]
fn batches_straddle_epoch_boundaries() {
    let (x, y) = separable_data();
    let mut network = small_network(3, 5);

    // 8 samples at batch size 3: updates after samples 3 and 6, the
    // seventh and eighth contributions stay buffered
    network.fit(&x, &y, None, 2, false).unwrap();

    assert_eq!(pending_contributions(&network), vec![2, 2]);
}

#[test]
fn zero_coefficient_regularizers_match_no_regularizer() {
    let (x, y) = separable_data();
    let run = |regularizer: Regularizer| {
        let mut network = Network::builder()
            .input(2)
            .hidden(2, 4, Activation::Relu)
            .hidden(4, 2, Activation::Linear)
            .softmax(2)
            .regularizer(regularizer)
            .learning_rate(0.05)
            .batch_size(2)
            .seed(11)
            .build()
            .unwrap();
        network.fit(&x, &y, None, 3, false).unwrap();
        network.history
    };

    let baseline = run(Regularizer::None);
    assert_eq!(baseline, run(Regularizer::L2(0.0)));
    assert_eq!(baseline, run(Regularizer::L1(0.0)));
}

#[test]
fn predictions_are_one_hot() {
    let mut network = small_network(4, 13);
    let prediction = network.predict(&arr1(&[0.4, 0.6])).unwrap();

    assert_eq!(prediction.len(), 2);
    assert_eq!(prediction.iter().filter(|&&v| v == 1.0).count(), 1);
    assert_eq!(prediction.iter().filter(|&&v| v == 0.0).count(), 1);
}

#[test]
fn training_does_not_degrade_on_separable_clusters() {
    let (x, y) = separable_data();
    let mut network = Network::builder()
        .input(2)
        .hidden(2, 6, Activation::Tanh)
        .hidden(6, 2, Activation::Linear)
        .softmax(2)
        .learning_rate(0.05)
        .batch_size(4)
        .seed(21)
        .build()
        .unwrap();

    network.fit(&x, &y, Some((&x, &y)), 50, false).unwrap();

    let history = &network.history;
    assert_eq!(history.train_loss.len(), 50);
    assert_eq!(history.train_accuracy.len(), 50);
    assert_eq!(history.val_loss.len(), 50);
    assert_eq!(history.val_accuracy.len(), 50);

    let first_accuracy = history.train_accuracy.first().unwrap().1;
    let last_accuracy = history.train_accuracy.last().unwrap().1;
    assert!(last_accuracy >= first_accuracy);
    assert!(last_accuracy >= 0.5);

    let first_loss = history.train_loss.first().unwrap().1;
    let last_loss = history.train_loss.last().unwrap().1;
    assert!(last_loss <= first_loss);
}

#[test]
fn history_resets_between_fit_calls() {
    let (x, y) = separable_data();
    let mut network = small_network(2, 31);

    network.fit(&x, &y, None, 3, false).unwrap();
    assert_eq!(network.history.train_loss.len(), 3);

    network.fit(&x, &y, None, 2, false).unwrap();
    assert_eq!(network.history.train_loss.len(), 2);
    assert!(network.history.val_loss.is_empty());

    let epochs: Vec<usize> = network.history.train_loss.iter().map(|&(e, _)| e).collect();
    assert_eq!(epochs, vec![0, 1]);
}

#[test]
fn mismatched_validation_sets_are_rejected() {
    let (x, y) = separable_data();
    let mut network = small_network(2, 37);
    assert!(network
        .fit(&x, &y, Some((&x[..2], &y[..1])), 1, false)
        .is_err());
}
