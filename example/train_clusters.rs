use rkn::plot::{plot_dataset, plot_history};
use rkn::prelude::*;

fn main() -> Result<()> {
    // Two well separated clusters on the plane, one per class
    let generator = DataGenerator::new(vec![arr1(&[0.25, 0.25]), arr1(&[0.75, 0.75])], 100, 0.18)
        .with_split(0.2, 0.1)
        .with_seed(17);
    let dataset = generator.generate()?;
    println!("{}", dataset);

    let mut network = Network::builder()
        .input(2)
        .hidden(2, 8, Activation::Relu)
        .hidden(8, 2, Activation::Linear)
        .softmax(2)
        .loss(Loss::CrossEntropy)
        .regularizer(Regularizer::L2(0.001))
        .learning_rate(0.05)
        .batch_size(8)
        .seed(42)
        .build()?;

    network.summary();

    network.fit(
        &dataset.x_train,
        &dataset.y_train,
        Some((&dataset.x_val, &dataset.y_val)),
        60,
        true,
    )?;

    println!("Evaluation...");
    let (test_loss, test_accuracy) = network.evaluate(&dataset.x_test, &dataset.y_test)?;
    println!(
        "Test loss: {:.4}, test accuracy: {:.2}%",
        test_loss,
        100.0 * test_accuracy
    );

    write_history_to_csv(&network.history, "history.csv").unwrap();
    plot_history::plot_loss(&network.history, "loss.png").unwrap();
    plot_history::plot_accuracy(&network.history, "accuracy.png").unwrap();
    plot_dataset::plot_classes(&dataset.x_train, &dataset.y_train, "clusters.png").unwrap();

    network.save("./clusters.model")?;
    let mut restored = Network::load("./clusters.model")?;

    let sample = &dataset.x_test[0];
    println!("Prediction for the first test sample: {}", network.predict(sample)?);
    println!("Same sample after reloading:          {}", restored.predict(sample)?);

    Ok(())
}
