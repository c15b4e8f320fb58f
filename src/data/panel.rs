//! Aligned business-day panel
//!
//! A `Panel` maps every date of the canonical calendar to one value slot per
//! series. Missing values are explicit `None`; column order is insertion
//! order, which the pipeline keeps deterministic.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::error::{PipelineError, Result};

#[derive(Debug, Clone)]
pub struct Panel {
    dates: Vec<NaiveDate>,
    names: Vec<String>,
    columns: Vec<Vec<Option<f64>>>,
    index: HashMap<String, usize>,
}

impl Panel {
    /// Create an empty panel over a calendar's dates
    pub fn new(dates: Vec<NaiveDate>) -> Self {
        Self {
            dates,
            names: Vec::new(),
            columns: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Append a column; its length must match the calendar
    pub fn push_column(&mut self, name: &str, values: Vec<Option<f64>>) -> Result<()> {
        if values.len() != self.dates.len() {
            return Err(PipelineError::Alignment {
                series: name.to_string(),
                reason: format!(
                    "column has {} rows, calendar has {}",
                    values.len(),
                    self.dates.len()
                ),
            });
        }
        if self.index.contains_key(name) {
            return Err(PipelineError::Alignment {
                series: name.to_string(),
                reason: "duplicate column name".to_string(),
            });
        }
        self.index.insert(name.to_string(), self.columns.len());
        self.names.push(name.to_string());
        self.columns.push(values);
        Ok(())
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn n_rows(&self) -> usize {
        self.dates.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.index.get(name).map(|&i| self.columns[i].as_slice())
    }

    pub fn value(&self, name: &str, row: usize) -> Option<f64> {
        self.column(name).and_then(|col| col.get(row).copied().flatten())
    }

    /// Fraction of non-missing values in a column
    pub fn coverage(&self, name: &str) -> Option<f64> {
        self.column(name).map(|col| {
            if col.is_empty() {
                0.0
            } else {
                col.iter().filter(|v| v.is_some()).count() as f64 / col.len() as f64
            }
        })
    }
}
