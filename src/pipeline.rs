//! End-to-end pipeline
//!
//! Wires the stages together under one explicit configuration object:
//! load -> align -> features -> split -> scale -> horizon matrices -> export.
//! A run either completes or fails outright; there is no partial resume.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::align::build_panel;
use crate::calendar::BusinessCalendar;
use crate::data::loader::{load_source, SourceConfig};
use crate::dataset::DatasetBuilder;
use crate::error::Result;
use crate::export::write_dataset;
use crate::features::catalog::{default_catalog, FeatureCatalog};
use crate::features::engine::FeatureEngine;
use crate::features::scaler::StandardScaler;
use crate::split::{SplitBuilder, SplitSpec, Splits};

/// Full configuration for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// First calendar date (inclusive)
    pub start: NaiveDate,
    /// Last calendar date (inclusive)
    pub end: NaiveDate,
    pub sources: Vec<SourceConfig>,
    /// Feature catalog JSON; the built-in catalog when omitted
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    /// Panel column to forecast
    pub target: String,
    #[serde(default = "default_horizons")]
    pub horizons: Vec<usize>,
    /// Autoregressive lags of the target added as features
    #[serde(default = "default_ar_order")]
    pub ar_order: usize,
    pub split: SplitSpec,
    pub output_dir: PathBuf,
}

fn default_horizons() -> Vec<usize> {
    vec![1, 5, 10, 20]
}

fn default_ar_order() -> usize {
    5
}

impl PipelineConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}

/// Realized split boundaries, persisted next to the matrices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitSummary {
    pub train_rows: usize,
    pub validation_rows: usize,
    pub test_rows: usize,
    pub train_end: NaiveDate,
    pub validation_end: NaiveDate,
}

impl SplitSummary {
    fn from_splits(splits: &Splits) -> Self {
        Self {
            train_rows: splits.train.len(),
            validation_rows: splits.validation.len(),
            test_rows: splits.test.len(),
            train_end: splits.train_end,
            validation_end: splits.validation_end,
        }
    }
}

/// What a completed run produced
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub series_loaded: usize,
    pub entries_skipped: usize,
    pub series_aligned: usize,
    pub features_requested: usize,
    pub features_built: usize,
    pub frame_rows: usize,
    pub split: SplitSummary,
    pub artifacts: Vec<PathBuf>,
}

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<RunReport> {
        let config = &self.config;
        let calendar = BusinessCalendar::new(config.start, config.end)?;
        info!(
            "calendar: {} business days from {} to {}",
            calendar.len(),
            calendar.start(),
            calendar.end()
        );

        // Load every source, pairing each series with its publication lag
        let mut inputs = Vec::new();
        let mut entries_skipped = 0;
        for source in &config.sources {
            let loaded = load_source(source)?;
            info!(
                "{}: {} series, {} entries skipped",
                source.path.display(),
                loaded.series.len(),
                loaded.skipped
            );
            entries_skipped += loaded.skipped;
            inputs.extend(
                loaded
                    .series
                    .into_iter()
                    .map(|series| (series, source.publication_lag)),
            );
        }
        let series_loaded = inputs.len();

        let panel = build_panel(&inputs, &calendar)?;
        let series_aligned = panel.n_columns();

        // Features
        let catalog = match &config.catalog {
            Some(path) => FeatureCatalog::from_file(path)?,
            None => default_catalog(),
        };
        let features_requested = catalog.len();
        let engine = FeatureEngine::new(catalog);
        let matrix = engine.compute(&panel)?;
        let features_built = matrix.n_features();

        // Feature-complete frame with AR lags, lookahead re-checked
        let builder = DatasetBuilder::new(&config.target)
            .horizons(config.horizons.clone())
            .ar_order(config.ar_order);
        let mut frame = builder.assemble_frame(&matrix, &panel)?;

        // Chronological split, then scale with training rows only
        let splits = SplitBuilder::build(&config.split, &frame.dates)?;
        let scaler = StandardScaler::fit(&frame.x, &frame.feature_names, splits.train.clone())?;
        scaler.transform(&mut frame.x, &frame.feature_names)?;

        let datasets = builder.build_horizons(&frame, &panel)?;

        // Persist artifacts
        fs::create_dir_all(&config.output_dir)?;
        let mut artifacts = Vec::new();
        for dataset in &datasets {
            let path = config
                .output_dir
                .join(format!("matrix_h{}.csv", dataset.horizon));
            write_dataset(&path, dataset)?;
            info!(
                "wrote {} ({} rows x {} features)",
                path.display(),
                dataset.n_samples(),
                dataset.n_features()
            );
            artifacts.push(path);
        }

        let scaler_path = config.output_dir.join("scaler.json");
        scaler.save(&scaler_path)?;
        artifacts.push(scaler_path);

        let summary = SplitSummary::from_splits(&splits);
        let splits_path = config.output_dir.join("splits.json");
        serde_json::to_writer_pretty(File::create(&splits_path)?, &summary)?;
        artifacts.push(splits_path);

        info!(
            "run complete: {} horizons, {} frame rows (train {}, validation {}, test {})",
            datasets.len(),
            frame.n_rows(),
            summary.train_rows,
            summary.validation_rows,
            summary.test_rows
        );

        Ok(RunReport {
            series_loaded,
            entries_skipped,
            series_aligned,
            features_requested,
            features_built,
            frame_rows: frame.n_rows(),
            split: summary,
            artifacts,
        })
    }
}
