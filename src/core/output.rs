use crate::models::History;
use csv::Writer;
use std::error::Error;

/// Writes one CSV row per epoch. Validation columns stay empty when the
/// history holds no validation series.
pub fn write_history_to_csv(history: &History, file_path: &str) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_path(file_path)?;

    wtr.write_record([
        "epoch",
        "train_loss",
        "train_accuracy",
        "val_loss",
        "val_accuracy",
    ])?;

    for (i, &(epoch, train_loss)) in history.train_loss.iter().enumerate() {
        let record = vec![
            epoch.to_string(),
            train_loss.to_string(),
            series_entry(&history.train_accuracy, i),
            series_entry(&history.val_loss, i),
            series_entry(&history.val_accuracy, i),
        ];
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

fn series_entry(series: &[(usize, f64)], index: usize) -> String {
    series
        .get(index)
        .map(|(_, value)| value.to_string())
        .unwrap_or_default()
}
