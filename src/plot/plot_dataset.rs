use crate::utils::argmax;
use ndarray::Array1;
use plotters::prelude::*;

/// Scatter plot of labelled samples in the plane of the first two features,
/// one color per class.
pub fn plot_classes(
    inputs: &[Array1<f64>],
    labels: &[Array1<f64>],
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if inputs.is_empty() || inputs.len() != labels.len() {
        return Err("plot_classes needs one label per sample".into());
    }
    if inputs[0].len() < 2 {
        return Err("plot_classes needs at least two features per sample".into());
    }
    let num_classes = labels[0].len();

    let root = BitMapBackend::new(filename, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    // Find bounds for x1 and x2
    let x1_min = inputs.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min);
    let x1_max = inputs.iter().map(|p| p[0]).fold(f64::NEG_INFINITY, f64::max);
    let x2_min = inputs.iter().map(|p| p[1]).fold(f64::INFINITY, f64::min);
    let x2_max = inputs.iter().map(|p| p[1]).fold(f64::NEG_INFINITY, f64::max);

    // Add some padding to the bounds
    let padding = 0.1;
    let x1_range = (x1_min - padding)..(x1_max + padding);
    let x2_range = (x2_min - padding)..(x2_max + padding);

    let mut chart = ChartBuilder::on(&root)
        .caption("Labelled Samples by Class", ("sans-serif", 30).into_font())
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(x1_range, x2_range)?;

    chart.configure_mesh().x_desc("x₁").y_desc("x₂").draw()?;

    // Create color gradient
    let color_gradient = colorous::VIRIDIS;

    for class in 0..num_classes {
        let normalized_value = if num_classes > 1 {
            class as f64 / (num_classes - 1) as f64
        } else {
            0.0
        };
        let color = color_gradient.eval_continuous(normalized_value);
        let rgb_color = RGBColor(color.r, color.g, color.b);

        chart
            .draw_series(PointSeries::of_element(
                inputs
                    .iter()
                    .zip(labels.iter())
                    .filter(|(_, y)| argmax(y) == class)
                    .map(|(x, _)| (x[0], x[1])),
                4,
                &rgb_color,
                &|c, s, st| {
                    return EmptyElement::at(c) + Circle::new((0, 0), s, st.filled());
                },
            ))?
            .label(format!("Class {}", class))
            .legend(move |(x, y)| Circle::new((x + 10, y), 4, rgb_color.filled()));
    }

    // Draw the legend
    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    println!("Dataset plot has been saved as '{}'", filename);

    Ok(())
}
