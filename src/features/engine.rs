//! Catalog-driven feature computation
//!
//! Turns a panel into derived feature columns. Each value is computed only
//! from panel rows at or before its date, and every computed cell records
//! the as-of date it was derived from so the dataset builder can re-verify
//! the zero-lookahead invariant.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::data::panel::Panel;
use crate::error::{PipelineError, Result};
use crate::features::catalog::{FeatureCatalog, FeatureSpec, Transform};
use crate::features::transforms;

/// One derived column with per-row as-of dates
#[derive(Debug, Clone)]
pub struct FeatureColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
    /// Newest panel date that entered each computed value
    pub as_of: Vec<Option<NaiveDate>>,
}

/// All derived columns over the panel's calendar
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<FeatureColumn>,
}

impl FeatureMatrix {
    pub fn n_rows(&self) -> usize {
        self.dates.len()
    }

    pub fn n_features(&self) -> usize {
        self.columns.len()
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Rows where every feature has a value
    pub fn complete_rows(&self) -> Vec<usize> {
        (0..self.n_rows())
            .filter(|&i| self.columns.iter().all(|c| c.values[i].is_some()))
            .collect()
    }
}

/// Computes a feature catalog over a panel
pub struct FeatureEngine {
    catalog: FeatureCatalog,
}

impl FeatureEngine {
    pub fn new(catalog: FeatureCatalog) -> Self {
        Self { catalog }
    }

    /// Compute every catalog feature
    ///
    /// Features with no computable row (`InsufficientHistoryError`) or with
    /// inputs missing from the panel are excluded with a logged cause; the
    /// call fails only when nothing can be computed at all.
    pub fn compute(&self, panel: &Panel) -> Result<FeatureMatrix> {
        let mut columns = Vec::new();
        let mut excluded = 0usize;

        for spec in &self.catalog.features {
            match compute_feature(spec, panel) {
                Ok(column) => columns.push(column),
                Err(
                    err @ (PipelineError::InsufficientHistory { .. }
                    | PipelineError::Alignment { .. }),
                ) => {
                    warn!("excluding feature '{}': {}", spec.name, err);
                    excluded += 1;
                }
                Err(err) => return Err(err),
            }
        }

        if columns.is_empty() {
            return Err(PipelineError::Config(
                "no feature in the catalog could be computed".to_string(),
            ));
        }

        info!(
            "computed {} features over {} rows ({} excluded)",
            columns.len(),
            panel.n_rows(),
            excluded
        );
        Ok(FeatureMatrix {
            dates: panel.dates().to_vec(),
            columns,
        })
    }
}

fn compute_feature(spec: &FeatureSpec, panel: &Panel) -> Result<FeatureColumn> {
    let values = match &spec.transform {
        Transform::RollingMean { input, window } => {
            transforms::rolling_mean(input_column(panel, &spec.name, input)?, *window)
        }
        Transform::RollingStd { input, window } => {
            transforms::rolling_std(input_column(panel, &spec.name, input)?, *window)
        }
        Transform::Spread { left, right } => transforms::spread(
            input_column(panel, &spec.name, left)?,
            input_column(panel, &spec.name, right)?,
        ),
        Transform::Ratio { left, right } => transforms::ratio(
            input_column(panel, &spec.name, left)?,
            input_column(panel, &spec.name, right)?,
        ),
        Transform::LogReturn { input, period } => {
            transforms::log_return(input_column(panel, &spec.name, input)?, *period)
        }
        Transform::Momentum { input, period } => {
            transforms::momentum(input_column(panel, &spec.name, input)?, *period)
        }
        Transform::CurveSlope {
            near,
            far,
            tenor_gap,
        } => transforms::curve_slope(
            input_column(panel, &spec.name, near)?,
            input_column(panel, &spec.name, far)?,
            *tenor_gap,
        ),
    };

    if values.iter().all(|v| v.is_none()) {
        return Err(PipelineError::InsufficientHistory {
            feature: spec.name.clone(),
            needed: spec.transform.min_history(),
            available: panel.n_rows(),
        });
    }

    let as_of = values
        .iter()
        .enumerate()
        .map(|(i, v)| v.map(|_| panel.dates()[i]))
        .collect();

    Ok(FeatureColumn {
        name: spec.name.clone(),
        values,
        as_of,
    })
}

fn input_column<'a>(panel: &'a Panel, feature: &str, name: &str) -> Result<&'a [Option<f64>]> {
    panel.column(name).ok_or_else(|| PipelineError::Alignment {
        series: feature.to_string(),
        reason: format!("input column '{name}' missing from panel"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::catalog::{FeatureCatalog, FeatureSpec, Transform};
    use chrono::NaiveDate;

    fn panel(n: usize) -> Panel {
        let dates = (0..n)
            .map(|i| NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64))
            .collect();
        let mut panel = Panel::new(dates);
        panel
            .push_column("bdi", (0..n).map(|i| Some(1500.0 + i as f64)).collect())
            .unwrap();
        panel
            .push_column("p4tc", (0..n).map(|i| Some(14000.0 + i as f64)).collect())
            .unwrap();
        panel
    }

    fn spec(name: &str, transform: Transform) -> FeatureSpec {
        FeatureSpec {
            name: name.to_string(),
            transform,
        }
    }

    #[test]
    fn test_insufficient_history_raises_and_excludes() {
        // 20-day rolling window over a 10-row panel
        let panel = panel(10);
        let rolling = spec(
            "bdi_ma20",
            Transform::RollingMean {
                input: "bdi".to_string(),
                window: 20,
            },
        );

        let err = compute_feature(&rolling, &panel).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InsufficientHistory {
                needed: 20,
                available: 10,
                ..
            }
        ));

        // alongside a computable feature, the engine drops it from the matrix
        let engine = FeatureEngine::new(FeatureCatalog {
            features: vec![
                rolling,
                spec(
                    "basis",
                    Transform::Spread {
                        left: "p4tc".to_string(),
                        right: "bdi".to_string(),
                    },
                ),
            ],
        });
        let matrix = engine.compute(&panel).unwrap();
        assert_eq!(matrix.names(), vec!["basis"]);
    }

    #[test]
    fn test_unknown_input_is_excluded() {
        let panel = panel(10);
        let engine = FeatureEngine::new(FeatureCatalog {
            features: vec![
                spec(
                    "ghost",
                    Transform::Momentum {
                        input: "c5tc".to_string(),
                        period: 1,
                    },
                ),
                spec(
                    "bdi_mom1",
                    Transform::Momentum {
                        input: "bdi".to_string(),
                        period: 1,
                    },
                ),
            ],
        });
        let matrix = engine.compute(&panel).unwrap();
        assert_eq!(matrix.names(), vec!["bdi_mom1"]);
    }

    #[test]
    fn test_nothing_computable_is_fatal() {
        let panel = panel(5);
        let engine = FeatureEngine::new(FeatureCatalog {
            features: vec![spec(
                "bdi_ma20",
                Transform::RollingMean {
                    input: "bdi".to_string(),
                    window: 20,
                },
            )],
        });
        assert!(engine.compute(&panel).is_err());
    }

    #[test]
    fn test_as_of_matches_row_dates() {
        let panel = panel(6);
        let column = compute_feature(
            &spec(
                "bdi_mom2",
                Transform::Momentum {
                    input: "bdi".to_string(),
                    period: 2,
                },
            ),
            &panel,
        )
        .unwrap();

        assert_eq!(column.values[1], None);
        assert_eq!(column.as_of[1], None);
        assert_eq!(column.values[2], Some(2.0));
        assert_eq!(column.as_of[2], Some(panel.dates()[2]));
    }

    #[test]
    fn test_complete_rows() {
        let panel = panel(6);
        let engine = FeatureEngine::new(FeatureCatalog {
            features: vec![
                spec(
                    "bdi_mom2",
                    Transform::Momentum {
                        input: "bdi".to_string(),
                        period: 2,
                    },
                ),
                spec(
                    "basis",
                    Transform::Spread {
                        left: "p4tc".to_string(),
                        right: "bdi".to_string(),
                    },
                ),
            ],
        });
        let matrix = engine.compute(&panel).unwrap();
        assert_eq!(matrix.complete_rows(), vec![2, 3, 4, 5]);
    }
}
