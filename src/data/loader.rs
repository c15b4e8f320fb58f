//! Source loaders
//!
//! One handler per raw source type. Every loader reads a wide CSV (date
//! column first, one value column per series), skips rows with unparseable
//! dates and cells with non-numeric values, and returns validated `Series`.
//! Skipped entries are logged with their cause and counted; only an
//! unreadable file or a broken header aborts the load.

use std::fs::File;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::data::series::{Observation, Series, SourceKind};
use crate::error::{PipelineError, Result};

/// Configuration for one raw input file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub path: PathBuf,
    /// Business days between a data point's as-of date and its release
    #[serde(default)]
    pub publication_lag: usize,
    #[serde(default)]
    pub unit: Option<String>,
}

/// Result of loading one source file
#[derive(Debug)]
pub struct LoadedSource {
    pub series: Vec<Series>,
    /// Rows and cells excluded for parse failures
    pub skipped: usize,
}

/// Load a source file, dispatching on its kind
pub fn load_source(config: &SourceConfig) -> Result<LoadedSource> {
    match config.kind {
        SourceKind::Bunker => load_bunker(config),
        SourceKind::BalticIndex => load_baltic(config),
        SourceKind::BfaCurve => load_bfa(config),
        SourceKind::Clarksons => load_clarksons(config),
    }
}

/// Daily bunker prices, ISO dates, one column per fuel grade/port
fn load_bunker(config: &SourceConfig) -> Result<LoadedSource> {
    read_wide_table(config, parse_iso_date)
}

/// Baltic Exchange assessments, ISO dates, one column per route/index
fn load_baltic(config: &SourceConfig) -> Result<LoadedSource> {
    read_wide_table(config, parse_iso_date)
}

/// BFA forward curves, ISO dates, one column per tenor (column order kept)
fn load_bfa(config: &SourceConfig) -> Result<LoadedSource> {
    read_wide_table(config, parse_iso_date)
}

/// Monthly Clarksons series with `Mon-YY` period labels mapped to month end
fn load_clarksons(config: &SourceConfig) -> Result<LoadedSource> {
    read_wide_table(config, parse_month_label)
}

fn read_wide_table(
    config: &SourceConfig,
    parse_date: fn(&str) -> Option<NaiveDate>,
) -> Result<LoadedSource> {
    let path = &config.path;
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader.headers()?.clone();
    if headers.len() < 2 {
        return Err(PipelineError::Parse {
            path: path.display().to_string(),
            line: 1,
            reason: "expected a date column and at least one value column".to_string(),
        });
    }
    let names: Vec<String> = headers.iter().skip(1).map(|h| h.trim().to_string()).collect();

    let mut columns: Vec<Vec<Observation>> = vec![Vec::new(); names.len()];
    let mut skipped = 0usize;

    for (row_idx, record) in reader.records().enumerate() {
        let line = row_idx + 2;
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                warn!("{}: line {}: unreadable row ({}), skipped", path.display(), line, err);
                skipped += 1;
                continue;
            }
        };

        let raw_date = record.get(0).unwrap_or("").trim();
        let date = match parse_date(raw_date) {
            Some(date) => date,
            None => {
                warn!(
                    "{}: line {}: unparseable date '{}', row skipped",
                    path.display(),
                    line,
                    raw_date
                );
                skipped += 1;
                continue;
            }
        };

        for (col, name) in names.iter().enumerate() {
            let cell = record.get(col + 1).unwrap_or("").trim();
            if cell.is_empty() {
                continue; // missing, not malformed
            }
            // Clarksons exports quote values with thousands separators
            let cleaned = cell.replace(',', "");
            match cleaned.parse::<f64>() {
                Ok(value) if value.is_finite() => {
                    columns[col].push(Observation { date, value });
                }
                _ => {
                    warn!(
                        "{}: line {}: non-numeric value '{}' in column '{}', cell skipped",
                        path.display(),
                        line,
                        cell,
                        name
                    );
                    skipped += 1;
                }
            }
        }
    }

    let unit = config.unit.clone().unwrap_or_else(|| "index".to_string());
    let mut series = Vec::new();
    for (name, mut observations) in names.into_iter().zip(columns) {
        if observations.is_empty() {
            warn!(
                "{}: column '{}' has no valid observations, dropped",
                path.display(),
                name
            );
            continue;
        }

        observations.sort_by_key(|o| o.date);
        let mut deduped: Vec<Observation> = Vec::with_capacity(observations.len());
        for obs in observations {
            match deduped.last() {
                Some(prev) if prev.date == obs.date => {
                    warn!(
                        "{}: duplicate date {} in column '{}', keeping first",
                        path.display(),
                        obs.date,
                        name
                    );
                    skipped += 1;
                }
                _ => deduped.push(obs),
            }
        }

        series.push(Series::new(name, config.kind, unit.clone(), deduped)?);
    }

    debug!(
        "{}: loaded {} series, skipped {} entries",
        path.display(),
        series.len(),
        skipped
    );
    Ok(LoadedSource { series, skipped })
}

fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Parse a `Mon-YY` (or `Mon-YYYY`) period label to the month-end date
fn parse_month_label(s: &str) -> Option<NaiveDate> {
    let (mon, yr) = s.split_once('-')?;
    let month = match mon.to_ascii_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    let year: i32 = yr.parse().ok()?;
    let year = if year < 100 { 2000 + year } else { year };
    month_end(year, month)
}

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}
