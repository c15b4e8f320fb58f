//! Chronological train/validation/test splits
//!
//! Rows are partitioned strictly in time order; any shuffling or overlap
//! would leak future information into training. Boundary problems are fatal.

use std::ops::Range;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// How to place the two split boundaries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SplitSpec {
    /// Row-count fractions for train and validation; the rest is test
    Fractions { train: f64, validation: f64 },
    /// Explicit boundary dates (inclusive ends of train and validation)
    Dates {
        train_end: NaiveDate,
        validation_end: NaiveDate,
    },
}

/// Disjoint, time-ordered row ranges plus their realized boundary dates
#[derive(Debug, Clone, PartialEq)]
pub struct Splits {
    pub train: Range<usize>,
    pub validation: Range<usize>,
    pub test: Range<usize>,
    /// Last date in the train partition
    pub train_end: NaiveDate,
    /// Last date in the validation partition
    pub validation_end: NaiveDate,
}

pub struct SplitBuilder;

impl SplitBuilder {
    /// Build a three-way split over chronologically ordered row dates
    pub fn build(spec: &SplitSpec, dates: &[NaiveDate]) -> Result<Splits> {
        if dates.is_empty() {
            return Err(PipelineError::InvalidSplit {
                reason: "no rows to split".to_string(),
            });
        }
        if dates.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(PipelineError::InvalidSplit {
                reason: "rows are not in strict chronological order".to_string(),
            });
        }

        let n = dates.len();
        let (train_len, validation_len) = match spec {
            SplitSpec::Fractions { train, validation } => {
                if !(0.0..1.0).contains(train)
                    || !(0.0..1.0).contains(validation)
                    || train + validation >= 1.0
                {
                    return Err(PipelineError::InvalidSplit {
                        reason: format!(
                            "fractions train={train} validation={validation} must each be in (0, 1) and sum below 1"
                        ),
                    });
                }
                let train_len = (n as f64 * train).floor() as usize;
                let validation_len = (n as f64 * validation).floor() as usize;
                (train_len, validation_len)
            }
            SplitSpec::Dates {
                train_end,
                validation_end,
            } => {
                if validation_end <= train_end {
                    return Err(PipelineError::InvalidSplit {
                        reason: format!(
                            "boundaries not monotonic: train_end {train_end} >= validation_end {validation_end}"
                        ),
                    });
                }
                let train_len = dates.partition_point(|d| d <= train_end);
                let validation_len = dates.partition_point(|d| d <= validation_end) - train_len;
                (train_len, validation_len)
            }
        };

        let test_len = n - train_len - validation_len;
        if train_len == 0 || validation_len == 0 || test_len == 0 {
            return Err(PipelineError::InvalidSplit {
                reason: format!(
                    "empty partition: train={train_len}, validation={validation_len}, test={test_len}"
                ),
            });
        }

        let train = 0..train_len;
        let validation = train_len..train_len + validation_len;
        let test = train_len + validation_len..n;

        Ok(Splits {
            train_end: dates[train.end - 1],
            validation_end: dates[validation.end - 1],
            train,
            validation,
            test,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dates(n: usize) -> Vec<NaiveDate> {
        (0..n)
            .map(|i| date(2024, 1, 1) + chrono::Duration::days(i as i64))
            .collect()
    }

    #[test]
    fn test_fraction_split_is_chronological() {
        let dates = dates(10);
        let splits =
            SplitBuilder::build(&SplitSpec::Fractions { train: 0.6, validation: 0.2 }, &dates)
                .unwrap();

        assert_eq!(splits.train, 0..6);
        assert_eq!(splits.validation, 6..8);
        assert_eq!(splits.test, 8..10);

        // train entirely precedes validation entirely precedes test
        let max_train = dates[splits.train.end - 1];
        let min_validation = dates[splits.validation.start];
        let max_validation = dates[splits.validation.end - 1];
        let min_test = dates[splits.test.start];
        assert!(max_train < min_validation);
        assert!(max_validation < min_test);

        assert_eq!(splits.train_end, date(2024, 1, 6));
        assert_eq!(splits.validation_end, date(2024, 1, 8));
    }

    #[test]
    fn test_date_split() {
        let dates = dates(10);
        let splits = SplitBuilder::build(
            &SplitSpec::Dates {
                train_end: date(2024, 1, 5),
                validation_end: date(2024, 1, 8),
            },
            &dates,
        )
        .unwrap();

        assert_eq!(splits.train, 0..5);
        assert_eq!(splits.validation, 5..8);
        assert_eq!(splits.test, 8..10);
    }

    #[test]
    fn test_non_monotonic_boundaries_fail() {
        let result = SplitBuilder::build(
            &SplitSpec::Dates {
                train_end: date(2024, 1, 8),
                validation_end: date(2024, 1, 5),
            },
            &dates(10),
        );
        assert!(matches!(result, Err(PipelineError::InvalidSplit { .. })));
    }

    #[test]
    fn test_empty_partition_fails() {
        // everything before validation_end leaves an empty test set
        let result = SplitBuilder::build(
            &SplitSpec::Dates {
                train_end: date(2024, 1, 5),
                validation_end: date(2024, 1, 20),
            },
            &dates(10),
        );
        assert!(matches!(result, Err(PipelineError::InvalidSplit { .. })));

        let result = SplitBuilder::build(
            &SplitSpec::Fractions { train: 0.95, validation: 0.04 },
            &dates(10),
        );
        assert!(matches!(result, Err(PipelineError::InvalidSplit { .. })));
    }

    #[test]
    fn test_bad_fractions_fail() {
        let result = SplitBuilder::build(
            &SplitSpec::Fractions { train: 0.7, validation: 0.4 },
            &dates(10),
        );
        assert!(matches!(result, Err(PipelineError::InvalidSplit { .. })));
    }

    #[test]
    fn test_unsorted_rows_fail() {
        let mut unsorted = dates(5);
        unsorted.swap(1, 3);
        let result = SplitBuilder::build(
            &SplitSpec::Fractions { train: 0.5, validation: 0.3 },
            &unsorted,
        );
        assert!(matches!(result, Err(PipelineError::InvalidSplit { .. })));
    }
}
