//! CSV export of prepared matrices
//!
//! One row per date, one column per feature plus the horizon target.
//! Rows are written chronologically so repeated runs produce identical files.

use std::fs::File;
use std::path::Path;

use crate::dataset::HorizonDataset;
use crate::error::Result;

/// Write a horizon dataset as `date,<features...>,<target>`
pub fn write_dataset(path: &Path, dataset: &HorizonDataset) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);

    let mut header = vec!["date".to_string()];
    header.extend(dataset.feature_names.iter().cloned());
    header.push(dataset.target_name.clone());
    writer.write_record(&header)?;

    for (i, date) in dataset.dates.iter().enumerate() {
        let mut record = Vec::with_capacity(header.len());
        record.push(date.format("%Y-%m-%d").to_string());
        for j in 0..dataset.n_features() {
            record.push(dataset.x[[i, j]].to_string());
        }
        record.push(dataset.y[i].to_string());
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
