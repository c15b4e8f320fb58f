//! Feature engineering: transform primitives, the external catalog, the
//! engine that evaluates it, and the fitted scaler artifact

pub mod catalog;
pub mod engine;
pub mod scaler;
pub mod transforms;

pub use catalog::{default_catalog, FeatureCatalog, FeatureSpec, Transform};
pub use engine::{FeatureColumn, FeatureEngine, FeatureMatrix};
pub use scaler::{ColumnScale, StandardScaler};
