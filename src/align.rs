//! Frequency normalization with publication-lag discipline
//!
//! Maps heterogeneous-frequency series onto the canonical business-day
//! calendar. A value becomes visible only once its publication lag has
//! elapsed, and is forward-filled until the next observation becomes
//! visible. Dates before a series' first visible observation stay missing;
//! nothing is ever backfilled.

use tracing::{debug, warn};

use crate::calendar::{add_business_days, next_business_day_on_or_after, BusinessCalendar};
use crate::data::panel::Panel;
use crate::data::series::Series;
use crate::error::{PipelineError, Result};

/// Align one series to the calendar
///
/// `publication_lag` is in business days: an observation dated `d` becomes
/// visible on the `lag`-th business day after `d` (weekend as-of dates roll
/// forward to the next business day first).
pub fn align_series(
    series: &Series,
    publication_lag: usize,
    calendar: &BusinessCalendar,
) -> Result<Vec<Option<f64>>> {
    let frequency = series.frequency()?;
    debug!(
        "aligning '{}' ({:?}, lag {}bd, {} observations)",
        series.id(),
        frequency,
        publication_lag,
        series.len()
    );

    // Visibility position per observation; positions are nondecreasing
    // because the date index is strictly increasing and the lag constant.
    let mut events: Vec<(usize, f64)> = Vec::new();
    for obs in series.observations() {
        let visible = add_business_days(next_business_day_on_or_after(obs.date), publication_lag);
        let Some(position) = calendar.position_on_or_after(visible) else {
            // visible only after the calendar ends; later observations too
            break;
        };
        match events.last_mut() {
            // several pre-calendar observations collapse onto one slot;
            // the most recently published one wins
            Some(last) if last.0 == position => last.1 = obs.value,
            _ => events.push((position, obs.value)),
        }
    }

    if events.is_empty() {
        return Err(PipelineError::Alignment {
            series: series.id().to_string(),
            reason: "no observation becomes visible within the calendar".to_string(),
        });
    }

    let mut values = vec![None; calendar.len()];
    for (i, &(position, value)) in events.iter().enumerate() {
        let fill_end = events.get(i + 1).map(|e| e.0).unwrap_or(calendar.len());
        for slot in position..fill_end {
            values[slot] = Some(value);
        }
    }

    Ok(values)
}

/// Merge series into a panel, excluding the ones that cannot be aligned
///
/// Each input pairs a series with its publication lag. Alignment failures
/// are logged and the series dropped; the panel itself fails only when no
/// series survives.
pub fn build_panel(inputs: &[(Series, usize)], calendar: &BusinessCalendar) -> Result<Panel> {
    let mut panel = Panel::new(calendar.days().to_vec());

    for (series, publication_lag) in inputs {
        match align_series(series, *publication_lag, calendar) {
            Ok(values) => panel.push_column(series.id(), values)?,
            Err(err @ PipelineError::Alignment { .. }) => {
                warn!("excluding series from panel: {}", err);
            }
            Err(err) => return Err(err),
        }
    }

    if panel.n_columns() == 0 {
        return Err(PipelineError::Alignment {
            series: "<panel>".to_string(),
            reason: "no series could be aligned to the calendar".to_string(),
        });
    }

    debug!(
        "panel built: {} columns x {} business days",
        panel.n_columns(),
        panel.n_rows()
    );
    Ok(panel)
}
