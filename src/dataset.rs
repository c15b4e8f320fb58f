//! Model matrix construction: autoregressive lags and multi-horizon targets
//!
//! The builder assembles the feature-complete row set (with AR lags of the
//! target appended), re-verifies the zero-lookahead invariant on every row,
//! and pairs each row with the target value h business days ahead for each
//! configured horizon. Rows without a valid future value are dropped, never
//! imputed.

use chrono::NaiveDate;
use ndarray::{Array1, Array2, Axis};
use tracing::{debug, warn};

use crate::data::panel::Panel;
use crate::error::{PipelineError, Result};
use crate::features::engine::FeatureMatrix;
use crate::split::Splits;

/// Feature-complete rows ready for scaling and target pairing
#[derive(Debug, Clone)]
pub struct ModelFrame {
    /// Panel row index of each frame row
    pub panel_rows: Vec<usize>,
    pub dates: Vec<NaiveDate>,
    pub x: Array2<f64>,
    pub feature_names: Vec<String>,
}

impl ModelFrame {
    pub fn n_rows(&self) -> usize {
        self.panel_rows.len()
    }
}

/// One prepared matrix: features paired with the h-day-ahead target
#[derive(Debug, Clone)]
pub struct HorizonDataset {
    pub horizon: usize,
    pub dates: Vec<NaiveDate>,
    pub x: Array2<f64>,
    pub y: Array1<f64>,
    pub feature_names: Vec<String>,
    pub target_name: String,
}

impl HorizonDataset {
    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// Partition by the split's boundary dates
    ///
    /// Horizon datasets drop tail rows, so partitions are cut by date rather
    /// than by the original row ranges; a partition can come out empty.
    pub fn partition(&self, splits: &Splits) -> (HorizonDataset, HorizonDataset, HorizonDataset) {
        let mut train = Vec::new();
        let mut validation = Vec::new();
        let mut test = Vec::new();
        for (i, date) in self.dates.iter().enumerate() {
            if *date <= splits.train_end {
                train.push(i);
            } else if *date <= splits.validation_end {
                validation.push(i);
            } else {
                test.push(i);
            }
        }
        (self.subset(&train), self.subset(&validation), self.subset(&test))
    }

    fn subset(&self, rows: &[usize]) -> HorizonDataset {
        HorizonDataset {
            horizon: self.horizon,
            dates: rows.iter().map(|&i| self.dates[i]).collect(),
            x: self.x.select(Axis(0), rows),
            y: self.y.select(Axis(0), rows),
            feature_names: self.feature_names.clone(),
            target_name: self.target_name.clone(),
        }
    }
}

/// Builds model frames and per-horizon datasets from a panel + features
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    target: String,
    horizons: Vec<usize>,
    ar_order: usize,
}

impl DatasetBuilder {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            horizons: vec![1, 5, 10, 20],
            ar_order: 5,
        }
    }

    pub fn horizons(mut self, horizons: Vec<usize>) -> Self {
        self.horizons = horizons;
        self
    }

    pub fn ar_order(mut self, ar_order: usize) -> Self {
        self.ar_order = ar_order;
        self
    }

    /// Assemble the feature-complete frame with AR lag columns appended
    ///
    /// A row survives when every feature has a value, the target has values
    /// for lags 1..=ar_order, and every feature's as-of date passes the
    /// lookahead re-check against the row date.
    pub fn assemble_frame(&self, matrix: &FeatureMatrix, panel: &Panel) -> Result<ModelFrame> {
        if matrix.dates != panel.dates() {
            return Err(PipelineError::Alignment {
                series: "<features>".to_string(),
                reason: "feature matrix and panel run on different calendars".to_string(),
            });
        }
        let target = panel.column(&self.target).ok_or_else(|| PipelineError::Alignment {
            series: self.target.clone(),
            reason: "target column missing from panel".to_string(),
        })?;

        let n = panel.n_rows();
        let mut rows = Vec::new();
        for i in 0..n {
            let features_ready = matrix.columns.iter().all(|c| c.values[i].is_some());
            let lags_ready = i >= self.ar_order
                && (1..=self.ar_order).all(|k| target[i - k].is_some());
            if features_ready && lags_ready {
                rows.push(i);
            }
        }
        if rows.is_empty() {
            return Err(PipelineError::InsufficientHistory {
                feature: "<frame>".to_string(),
                needed: self.ar_order + 1,
                available: n,
            });
        }

        // Lookahead re-check: no surviving cell may have been computed from
        // data newer than its row date.
        for &i in &rows {
            let row_date = matrix.dates[i];
            for column in &matrix.columns {
                if let Some(as_of) = column.as_of[i] {
                    if as_of > row_date {
                        return Err(PipelineError::Alignment {
                            series: column.name.clone(),
                            reason: format!(
                                "lookahead: value for {row_date} computed as of {as_of}"
                            ),
                        });
                    }
                }
            }
        }

        let mut feature_names: Vec<String> =
            matrix.columns.iter().map(|c| c.name.clone()).collect();
        for k in 1..=self.ar_order {
            feature_names.push(format!("{}_lag{}", self.target, k));
        }

        let n_cols = feature_names.len();
        let mut data = Vec::with_capacity(rows.len() * n_cols);
        for &i in &rows {
            for column in &matrix.columns {
                data.push(column.values[i].unwrap_or(f64::NAN));
            }
            for k in 1..=self.ar_order {
                data.push(target[i - k].unwrap_or(f64::NAN));
            }
        }
        let x = Array2::from_shape_vec((rows.len(), n_cols), data)
            .map_err(|err| PipelineError::Config(format!("frame shape: {err}")))?;

        debug!(
            "assembled frame: {} rows x {} columns ({} AR lags)",
            rows.len(),
            n_cols,
            self.ar_order
        );
        Ok(ModelFrame {
            dates: rows.iter().map(|&i| matrix.dates[i]).collect(),
            panel_rows: rows,
            x,
            feature_names,
        })
    }

    /// Pair frame rows with the h-day-ahead target for every horizon
    pub fn build_horizons(&self, frame: &ModelFrame, panel: &Panel) -> Result<Vec<HorizonDataset>> {
        let target = panel.column(&self.target).ok_or_else(|| PipelineError::Alignment {
            series: self.target.clone(),
            reason: "target column missing from panel".to_string(),
        })?;
        let n = panel.n_rows();

        let mut datasets = Vec::with_capacity(self.horizons.len());
        for &horizon in &self.horizons {
            let mut keep = Vec::new();
            let mut y = Vec::new();
            for (j, &i) in frame.panel_rows.iter().enumerate() {
                let future = i + horizon;
                if future < n {
                    if let Some(value) = target[future] {
                        keep.push(j);
                        y.push(value);
                    }
                }
            }

            if keep.is_empty() {
                warn!(
                    "horizon {}: no row has a valid future target, skipped",
                    horizon
                );
                continue;
            }

            datasets.push(HorizonDataset {
                horizon,
                dates: keep.iter().map(|&j| frame.dates[j]).collect(),
                x: frame.x.select(Axis(0), &keep),
                y: Array1::from_vec(y),
                feature_names: frame.feature_names.clone(),
                target_name: format!("{}_h{}", self.target, horizon),
            });
        }

        if datasets.is_empty() {
            return Err(PipelineError::Config(
                "no horizon produced any target rows".to_string(),
            ));
        }
        Ok(datasets)
    }
}
