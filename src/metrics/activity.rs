//! Activity aggregation
//!
//! Weekly and monthly rollups over daily activity records, plus the
//! stride-based estimates used when only a step count is known.

use crate::types::{ActivityEntry, MonthlySummary, WaterEntry};
use chrono::{Datelike, Duration, NaiveDate};

/// Stride length as a fraction of body height
pub const STRIDE_HEIGHT_RATIO: f64 = 0.415;

/// Stride length used when no height is configured (meters)
pub const DEFAULT_STRIDE_M: f64 = 0.762;

/// Rough energy cost of one step (kcal)
pub const CALORIES_PER_STEP: f64 = 0.04;

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Mon-Sun bucket index of `date` within the week containing `today`,
/// or `None` when the date falls outside that week
fn week_index(date: NaiveDate, start: NaiveDate) -> Option<usize> {
    let offset = date.signed_duration_since(start).num_days();
    (0..7).contains(&offset).then_some(offset as usize)
}

/// Mon-Sun step buckets for the week containing `today`
pub fn weekly_steps(entries: &[ActivityEntry], today: NaiveDate) -> [u32; 7] {
    let start = week_start(today);
    let mut week = [0u32; 7];
    for entry in entries {
        if let Some(index) = week_index(entry.date, start) {
            week[index] = entry.steps;
        }
    }
    week
}

/// Mon-Sun intake buckets (ml) for the week containing `today`
pub fn weekly_intake(entries: &[WaterEntry], today: NaiveDate) -> [u32; 7] {
    let start = week_start(today);
    let mut week = [0u32; 7];
    for entry in entries {
        if let Some(index) = week_index(entry.date, start) {
            week[index] = entry.total_intake_ml;
        }
    }
    week
}

/// Highest single-day bucket of a week
pub fn max_steps(week: &[u32; 7]) -> u32 {
    week.iter().copied().max().unwrap_or(0)
}

/// Days with any recorded movement in the trailing 7 days ending at `today`
pub fn active_days_last_7(entries: &[ActivityEntry], today: NaiveDate) -> u32 {
    let from = today - Duration::days(6);
    entries
        .iter()
        .filter(|e| e.date >= from && e.date <= today)
        .filter(|e| e.steps > 0 || e.duration_minutes > 0)
        .count() as u32
}

/// Rollup of all entries in a calendar month
pub fn monthly_summary(entries: &[ActivityEntry], year: i32, month: u32) -> MonthlySummary {
    let in_month: Vec<&ActivityEntry> = entries
        .iter()
        .filter(|e| e.date.year() == year && e.date.month() == month)
        .collect();

    let logged_days = in_month.len() as u32;
    let active_days = in_month.iter().filter(|e| e.steps > 0).count() as u32;
    let total_steps: u64 = in_month.iter().map(|e| u64::from(e.steps)).sum();
    let total_distance_km: f64 = in_month.iter().map(|e| e.distance_km).sum();
    let total_calories: u64 = in_month.iter().map(|e| u64::from(e.calories)).sum();

    let average_steps = if logged_days == 0 {
        0
    } else {
        (total_steps as f64 / f64::from(logged_days)).round() as u32
    };

    MonthlySummary {
        year,
        month,
        logged_days,
        active_days,
        total_steps,
        average_steps,
        total_distance_km,
        total_calories,
    }
}

/// Distance estimate from a step count and the user's height.
///
/// Falls back to [`DEFAULT_STRIDE_M`] when no height is configured.
pub fn estimated_distance_km(steps: u32, height_cm: Option<f64>) -> f64 {
    let stride_m = height_cm.map_or(DEFAULT_STRIDE_M, |h| h / 100.0 * STRIDE_HEIGHT_RATIO);
    f64::from(steps) * stride_m / 1000.0
}

/// Calorie estimate from a step count
pub fn estimated_calories(steps: u32) -> u32 {
    (f64::from(steps) * CALORIES_PER_STEP).round() as u32
}
