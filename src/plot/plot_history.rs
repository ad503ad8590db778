use crate::models::History;
use plotters::prelude::*;

pub fn plot_loss(history: &History, filename: &str) -> Result<(), Box<dyn std::error::Error>> {
    if history.train_loss.is_empty() {
        return Err("training history is empty, fit the network first".into());
    }

    let root = BitMapBackend::new(filename, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let epochs = history.train_loss.len();

    // Find min and max values for y-axis scaling
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for &(_, loss) in history.train_loss.iter().chain(history.val_loss.iter()) {
        y_min = y_min.min(loss);
        y_max = y_max.max(loss);
    }
    if (y_max - y_min).abs() < f64::EPSILON {
        y_max = y_min + 1.0;
    }

    let mut chart = ChartBuilder::on(&root)
        .caption("Loss over Epochs", ("sans-serif", 30).into_font())
        .margin(5)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0..epochs, y_min..y_max)?;

    chart.configure_mesh().x_desc("Epoch").y_desc("Loss").draw()?;

    chart
        .draw_series(LineSeries::new(
            history.train_loss.iter().map(|&(epoch, loss)| (epoch, loss)),
            &BLUE,
        ))?
        .label("Training Loss")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    if !history.val_loss.is_empty() {
        chart
            .draw_series(LineSeries::new(
                history.val_loss.iter().map(|&(epoch, loss)| (epoch, loss)),
                &RED,
            ))?
            .label("Validation Loss")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));
    }

    // Draw the legend
    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    println!("Loss plot has been saved as '{}'", filename);

    Ok(())
}

pub fn plot_accuracy(history: &History, filename: &str) -> Result<(), Box<dyn std::error::Error>> {
    if history.train_accuracy.is_empty() {
        return Err("training history is empty, fit the network first".into());
    }

    let root = BitMapBackend::new(filename, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let epochs = history.train_accuracy.len();

    let mut chart = ChartBuilder::on(&root)
        .caption("Accuracy over Epochs", ("sans-serif", 30).into_font())
        .margin(5)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0..epochs, 0.0..1.05)?;

    chart
        .configure_mesh()
        .x_desc("Epoch")
        .y_desc("Accuracy")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            history
                .train_accuracy
                .iter()
                .map(|&(epoch, accuracy)| (epoch, accuracy)),
            &BLUE,
        ))?
        .label("Training Accuracy")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    if !history.val_accuracy.is_empty() {
        chart
            .draw_series(LineSeries::new(
                history
                    .val_accuracy
                    .iter()
                    .map(|&(epoch, accuracy)| (epoch, accuracy)),
                &RED,
            ))?
            .label("Validation Accuracy")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));
    }

    // Draw the legend
    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    println!("Accuracy plot has been saved as '{}'", filename);

    Ok(())
}
