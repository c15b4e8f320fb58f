//! Feature catalog
//!
//! The set of engineered features is configuration data, not engine code: a
//! catalog is a JSON list of named transform specs over panel columns. The
//! engine understands the closed `Transform` set and nothing else.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A transform over one or two panel columns
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "transform", rename_all = "snake_case")]
pub enum Transform {
    RollingMean { input: String, window: usize },
    RollingStd { input: String, window: usize },
    Spread { left: String, right: String },
    Ratio { left: String, right: String },
    LogReturn { input: String, period: usize },
    Momentum { input: String, period: usize },
    CurveSlope { near: String, far: String, tenor_gap: f64 },
}

impl Transform {
    /// Rows of history required before the first value exists (inclusive of
    /// the feature date itself)
    pub fn min_history(&self) -> usize {
        match self {
            Transform::RollingMean { window, .. } | Transform::RollingStd { window, .. } => *window,
            Transform::LogReturn { period, .. } | Transform::Momentum { period, .. } => period + 1,
            Transform::Spread { .. } | Transform::Ratio { .. } | Transform::CurveSlope { .. } => 1,
        }
    }

    /// Panel columns this transform reads
    pub fn inputs(&self) -> Vec<&str> {
        match self {
            Transform::RollingMean { input, .. }
            | Transform::RollingStd { input, .. }
            | Transform::LogReturn { input, .. }
            | Transform::Momentum { input, .. } => vec![input],
            Transform::Spread { left, right } | Transform::Ratio { left, right } => {
                vec![left, right]
            }
            Transform::CurveSlope { near, far, .. } => vec![near, far],
        }
    }
}

/// A named feature definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub name: String,
    #[serde(flatten)]
    pub transform: Transform,
}

/// Ordered collection of feature definitions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCatalog {
    pub features: Vec<FeatureSpec>,
}

impl FeatureCatalog {
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Built-in catalog over the standard dry-bulk source columns
///
/// Covers the three feature families: cost (bunker), term structure (BFA
/// curve vs. spot) and supply/demand (Clarksons fleet figures).
pub fn default_catalog() -> FeatureCatalog {
    use Transform::*;

    let features = vec![
        FeatureSpec {
            name: "fuel_spread_rdam".to_string(),
            transform: Spread {
                left: "vlsfo_rotterdam".to_string(),
                right: "hsfo_rotterdam".to_string(),
            },
        },
        FeatureSpec {
            name: "vlsfo_ma10".to_string(),
            transform: RollingMean {
                input: "vlsfo_rotterdam".to_string(),
                window: 10,
            },
        },
        FeatureSpec {
            name: "vlsfo_logret5".to_string(),
            transform: LogReturn {
                input: "vlsfo_rotterdam".to_string(),
                period: 5,
            },
        },
        FeatureSpec {
            name: "bdi_ma20".to_string(),
            transform: RollingMean {
                input: "bdi".to_string(),
                window: 20,
            },
        },
        FeatureSpec {
            name: "bdi_vol20".to_string(),
            transform: RollingStd {
                input: "bdi".to_string(),
                window: 20,
            },
        },
        FeatureSpec {
            name: "bdi_mom5".to_string(),
            transform: Momentum {
                input: "bdi".to_string(),
                period: 5,
            },
        },
        FeatureSpec {
            name: "p4tc_mom5".to_string(),
            transform: Momentum {
                input: "p4tc".to_string(),
                period: 5,
            },
        },
        FeatureSpec {
            name: "bfa_p4tc_basis".to_string(),
            transform: Spread {
                left: "bfa_p4tc_1q".to_string(),
                right: "p4tc".to_string(),
            },
        },
        FeatureSpec {
            name: "bfa_p4tc_slope".to_string(),
            transform: CurveSlope {
                near: "bfa_p4tc_1q".to_string(),
                far: "bfa_p4tc_2q".to_string(),
                tenor_gap: 1.0,
            },
        },
        FeatureSpec {
            name: "orderbook_fleet_ratio".to_string(),
            transform: Ratio {
                left: "orderbook_dwt".to_string(),
                right: "fleet_dwt".to_string(),
            },
        },
    ];

    FeatureCatalog { features }
}
