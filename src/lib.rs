//! # freight_ml - Freight Rate Forecasting Pipeline
//!
//! A leakage-safe data pipeline for multi-horizon forecasting of dry-bulk
//! freight rates. It covers the workflow up to (but not including) model
//! fitting:
//!
//! - Loading heterogeneous market files (daily bunker prices, weekly Baltic
//!   Exchange indices, BFA forward curves, monthly Clarksons series)
//! - Aligning them to a business-day calendar with publication-lag
//!   discipline, so no value is visible before its real-world release
//! - Deriving term-structure, cost and supply/demand features from a
//!   configurable catalog
//! - Building lagged feature matrices with multi-horizon targets
//!   (1, 5, 10 and 20 business days ahead)
//! - Splitting chronologically and persisting matrices plus fitted scalers

pub mod align;
pub mod calendar;
pub mod data;
pub mod dataset;
pub mod error;
pub mod export;
pub mod features;
pub mod pipeline;
pub mod split;

pub use align::{align_series, build_panel};
pub use calendar::BusinessCalendar;
pub use data::loader::{load_source, LoadedSource, SourceConfig};
pub use data::panel::Panel;
pub use data::series::{Frequency, Observation, Series, SourceKind};
pub use dataset::{DatasetBuilder, HorizonDataset, ModelFrame};
pub use error::{PipelineError, Result};
pub use features::catalog::{default_catalog, FeatureCatalog, FeatureSpec, Transform};
pub use features::engine::{FeatureEngine, FeatureMatrix};
pub use features::scaler::StandardScaler;
pub use pipeline::{Pipeline, PipelineConfig, RunReport};
pub use split::{SplitBuilder, SplitSpec, Splits};
