use ndarray::arr1;
use rkn::error::NNError;
use rkn::persist::{LayerDescriptor, SNAPSHOT_VERSION};
use rkn::{Activation, Layer, Loss, Network, Regularizer};
use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

/// Short training run that leaves a couple of gradient contributions
/// buffered, so reloading can prove transient state is dropped.
fn trained_network() -> Network {
    let mut network = Network::builder()
        .input(2)
        .hidden(2, 3, Activation::Sigmoid)
        .hidden(3, 2, Activation::Linear)
        .softmax(2)
        .loss(Loss::CrossEntropy)
        .regularizer(Regularizer::L2(0.01))
        .learning_rate(0.05)
        .batch_size(3)
        .seed(8)
        .build()
        .unwrap();

    let x = vec![arr1(&[0.0, 0.0]), arr1(&[1.0, 1.0])];
    let y = vec![arr1(&[1.0, 0.0]), arr1(&[0.0, 1.0])];
    // 8 samples at batch size 3: two contributions stay buffered
    network.fit(&x, &y, None, 4, false).unwrap();
    network
}

fn temp_model_path(tag: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    env::temp_dir()
        .join(format!("rkn_{}_{}.model", tag, nanos))
        .to_string_lossy()
        .into_owned()
}

#[test]
fn save_then_load_restores_parameters_and_history() {
    let mut network = trained_network();
    let path = temp_model_path("round_trip");
    network.save(&path).unwrap();
    let mut restored = Network::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(restored.history, network.history);
    assert_eq!(restored.loss, network.loss);
    assert_eq!(restored.regularizer, network.regularizer);
    assert_eq!(restored.learning_rate, network.learning_rate);
    assert_eq!(restored.batch_size, network.batch_size);

    for (left, right) in network.layers.iter().zip(restored.layers.iter()) {
        match (left, right) {
            (Layer::Input(l), Layer::Input(r)) => assert_eq!(l.size, r.size),
            (Layer::Hidden(l), Layer::Hidden(r)) => {
                assert_eq!(l.w, r.w);
                assert_eq!(l.b, r.b);
                assert_eq!(l.activation, r.activation);
                assert_eq!(l.learning_rate, r.learning_rate);
                assert!(!l.w_gradients.is_empty());
                assert!(r.w_gradients.is_empty());
                assert!(r.b_gradients.is_empty());
            }
            (Layer::Softmax(l), Layer::Softmax(r)) => assert_eq!(l.size, r.size),
            _ => panic!("layer kinds diverge after reload"),
        }
    }

    let sample = arr1(&[0.25, 0.75]);
    assert_eq!(
        network.predict(&sample).unwrap(),
        restored.predict(&sample).unwrap()
    );
}

#[test]
fn foreign_snapshot_versions_are_rejected() {
    let network = trained_network();
    let mut snapshot = network.snapshot();
    snapshot.version = SNAPSHOT_VERSION + 1;
    assert!(matches!(
        Network::from_snapshot(snapshot),
        Err(NNError::ModelLoadError(_))
    ));
}

#[test]
fn truncated_parameter_blocks_are_rejected() {
    let network = trained_network();
    let mut snapshot = network.snapshot();
    let truncated = snapshot.layers.iter_mut().find_map(|descriptor| {
        if let LayerDescriptor::Hidden { weights, .. } = descriptor {
            weights.pop();
            Some(())
        } else {
            None
        }
    });
    assert!(truncated.is_some());
    assert!(matches!(
        Network::from_snapshot(snapshot),
        Err(NNError::ModelLoadError(_))
    ));
}

#[test]
fn loading_a_missing_file_is_an_io_error() {
    let path = temp_model_path("missing");
    assert!(matches!(
        Network::load(&path),
        Err(NNError::IoError(_))
    ));
}
