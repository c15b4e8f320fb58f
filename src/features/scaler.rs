//! Fitted standardization artifact
//!
//! Scaling parameters are fitted on training rows only and persisted as JSON
//! so the identical transform can be re-applied at inference time. Reloading
//! an artifact reproduces the parameters exactly.

use std::fs::File;
use std::ops::Range;
use std::path::Path;

use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Scale parameters for one feature column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnScale {
    pub name: String,
    pub mean: f64,
    pub std: f64,
}

/// Z-score scaler fitted on a training window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub columns: Vec<ColumnScale>,
}

impl StandardScaler {
    /// Fit per-column mean and population std over `rows` of `x`
    pub fn fit(x: &Array2<f64>, names: &[String], rows: Range<usize>) -> Result<Self> {
        if names.len() != x.ncols() {
            return Err(PipelineError::Config(format!(
                "scaler fit: {} names for {} columns",
                names.len(),
                x.ncols()
            )));
        }
        if rows.is_empty() || rows.end > x.nrows() {
            return Err(PipelineError::Config(format!(
                "scaler fit: row range {}..{} outside matrix of {} rows",
                rows.start,
                rows.end,
                x.nrows()
            )));
        }

        let columns = names
            .iter()
            .enumerate()
            .map(|(j, name)| {
                let col = x.slice(s![rows.clone(), j]);
                let mean = col.mean().unwrap_or(0.0);
                let std = col.std(0.0);
                ColumnScale {
                    name: name.clone(),
                    mean,
                    std,
                }
            })
            .collect();

        Ok(Self { columns })
    }

    /// Apply `(x - mean) / std` column-wise; constant columns pass through
    pub fn transform(&self, x: &mut Array2<f64>, names: &[String]) -> Result<()> {
        let scaler_names: Vec<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        let given: Vec<&str> = names.iter().map(|n| n.as_str()).collect();
        if scaler_names != given {
            return Err(PipelineError::Config(format!(
                "scaler applied to mismatched columns: fitted on {:?}, given {:?}",
                scaler_names, given
            )));
        }

        for (j, scale) in self.columns.iter().enumerate() {
            if scale.std > 0.0 {
                let mut col = x.column_mut(j);
                col.mapv_inplace(|v| (v - scale.mean) / scale.std);
            }
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}
