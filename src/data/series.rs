//! Core data types for raw market series
//!
//! A `Series` is a named, date-indexed scalar sequence produced by a source
//! loader. Its index is strictly increasing; native frequency is detected
//! from the spacing of its observations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{PipelineError, Result};

/// Closed set of supported raw data sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Daily bunker fuel prices (VLSFO, HSFO, MGO per port)
    Bunker,
    /// Baltic Exchange route and index assessments
    BalticIndex,
    /// Baltic Forward Assessment curves, one column per tenor
    BfaCurve,
    /// Monthly Clarksons supply/demand series
    Clarksons,
}

/// Native observation frequency of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    /// Detect frequency from the modal gap between consecutive dates
    ///
    /// Returns `None` for fewer than two observations or a modal gap that
    /// matches no supported frequency.
    pub fn detect(dates: &[NaiveDate]) -> Option<Frequency> {
        if dates.len() < 2 {
            return None;
        }

        let mut gap_counts: HashMap<i64, usize> = HashMap::new();
        for pair in dates.windows(2) {
            let gap = (pair[1] - pair[0]).num_days();
            *gap_counts.entry(gap).or_insert(0) += 1;
        }

        // Modal gap; ties resolve to the smallest gap for determinism
        let mut gaps: Vec<(i64, usize)> = gap_counts.into_iter().collect();
        gaps.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        let modal = gaps[0].0;

        match modal {
            1..=3 => Some(Frequency::Daily),
            4..=10 => Some(Frequency::Weekly),
            11..=45 => Some(Frequency::Monthly),
            _ => None,
        }
    }
}

/// A single dated data point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

/// A named time-indexed scalar sequence from one source
#[derive(Debug, Clone)]
pub struct Series {
    id: String,
    source: SourceKind,
    unit: String,
    observations: Vec<Observation>,
}

impl Series {
    /// Create a series, enforcing a strictly increasing date index
    pub fn new(
        id: impl Into<String>,
        source: SourceKind,
        unit: impl Into<String>,
        observations: Vec<Observation>,
    ) -> Result<Self> {
        let id = id.into();
        for pair in observations.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(PipelineError::Alignment {
                    series: id,
                    reason: format!(
                        "date index not strictly increasing at {}",
                        pair[1].date
                    ),
                });
            }
        }
        Ok(Self {
            id,
            source,
            unit: unit.into(),
            observations,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> SourceKind {
        self.source
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|o| o.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.date)
    }

    /// Detected native frequency
    pub fn frequency(&self) -> Result<Frequency> {
        Frequency::detect(&self.dates()).ok_or_else(|| PipelineError::Alignment {
            series: self.id.clone(),
            reason: format!(
                "cannot detect native frequency from {} observations",
                self.observations.len()
            ),
        })
    }

    fn dates(&self) -> Vec<NaiveDate> {
        self.observations.iter().map(|o| o.date).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn obs(dates: &[NaiveDate]) -> Vec<Observation> {
        dates
            .iter()
            .map(|d| Observation {
                date: *d,
                value: 1.0,
            })
            .collect()
    }

    #[test]
    fn test_detect_daily() {
        // consecutive business days, weekend gap of 3 stays in the daily band
        let dates: Vec<NaiveDate> = vec![
            date(2024, 1, 1),
            date(2024, 1, 2),
            date(2024, 1, 3),
            date(2024, 1, 4),
            date(2024, 1, 5),
            date(2024, 1, 8),
        ];
        assert_eq!(Frequency::detect(&dates), Some(Frequency::Daily));
    }

    #[test]
    fn test_detect_weekly() {
        let dates = vec![
            date(2024, 1, 5),
            date(2024, 1, 12),
            date(2024, 1, 19),
            date(2024, 1, 26),
        ];
        assert_eq!(Frequency::detect(&dates), Some(Frequency::Weekly));
    }

    #[test]
    fn test_detect_monthly() {
        let dates = vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)];
        assert_eq!(Frequency::detect(&dates), Some(Frequency::Monthly));
    }

    #[test]
    fn test_detect_needs_two_observations() {
        assert_eq!(Frequency::detect(&[date(2024, 1, 1)]), None);
    }

    #[test]
    fn test_detect_rejects_sparse_gaps() {
        let dates = vec![date(2024, 1, 1), date(2024, 6, 1), date(2024, 11, 1)];
        assert_eq!(Frequency::detect(&dates), None);
    }

    #[test]
    fn test_series_rejects_duplicate_dates() {
        let result = Series::new(
            "bdi",
            SourceKind::BalticIndex,
            "index",
            obs(&[date(2024, 1, 5), date(2024, 1, 5)]),
        );
        assert!(matches!(result, Err(PipelineError::Alignment { .. })));
    }

    #[test]
    fn test_series_frequency_errors_on_single_observation() {
        let series = Series::new(
            "bdi",
            SourceKind::BalticIndex,
            "index",
            obs(&[date(2024, 1, 5)]),
        )
        .unwrap();
        assert!(series.frequency().is_err());
    }
}
