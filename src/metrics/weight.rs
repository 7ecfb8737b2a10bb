//! Weight metrics
//!
//! Trend classification and goal-distance projection over the most recent
//! measurements, in chronological order.

use crate::metrics::stats;
use crate::types::{Computed, WeightDirection, WeightEntry, WeightTrend};

/// Measurements considered for the trend window
pub const TREND_WINDOW: usize = 7;

/// Measurements required before a trend is produced
pub const MIN_TREND_ENTRIES: usize = 3;

/// Mean change per entry below this band classifies as stable (kg)
pub const DIRECTION_BAND_KG: f64 = 0.1;

/// Projections beyond this horizon are suppressed (days)
pub const MAX_PREDICTION_DAYS: f64 = 365.0;

/// Trend over the last [`TREND_WINDOW`] measurements.
///
/// Average change is `(last - first) / window_len`; direction classifies at
/// ±[`DIRECTION_BAND_KG`]. Consistency penalizes the window's variance
/// (10 points per kg²). The days-to-goal projection divides the remaining
/// distance by the average change and is suppressed when the rate is zero,
/// the horizon exceeds [`MAX_PREDICTION_DAYS`], or no goal is set.
pub fn weight_trend(entries: &[WeightEntry], goal_kg: Option<f64>) -> Computed<WeightTrend> {
    if entries.len() < MIN_TREND_ENTRIES {
        return Computed::Insufficient;
    }

    let start = entries.len().saturating_sub(TREND_WINDOW);
    let window: Vec<f64> = entries[start..].iter().map(|e| e.weight_kg).collect();

    let (Some(&first), Some(&last)) = (window.first(), window.last()) else {
        return Computed::Insufficient;
    };

    let average_change = (last - first) / window.len() as f64;

    let direction = if average_change > DIRECTION_BAND_KG {
        WeightDirection::Increasing
    } else if average_change < -DIRECTION_BAND_KG {
        WeightDirection::Decreasing
    } else {
        WeightDirection::Stable
    };

    let consistency = match stats::variance(&window) {
        Some(v) => (100.0 - v * 10.0).clamp(0.0, 100.0),
        None => 0.0,
    };

    let days_to_goal = goal_kg.and_then(|goal| {
        if average_change == 0.0 {
            return None;
        }
        let days = ((last - goal) / average_change).abs();
        if days > MAX_PREDICTION_DAYS {
            return None;
        }
        Some(days.round() as u32)
    });

    Computed::Value(WeightTrend {
        direction,
        average_change_kg: average_change,
        consistency,
        days_to_goal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn make_entries(weights: &[f64]) -> Vec<WeightEntry> {
        weights
            .iter()
            .enumerate()
            .map(|(i, &weight_kg)| WeightEntry {
                id: Uuid::new_v4(),
                date: NaiveDate::from_ymd_opt(2024, 3, 1 + i as u32).unwrap(),
                weight_kg,
            })
            .collect()
    }

    #[test]
    fn test_insufficient_below_three_entries() {
        let entries = make_entries(&[80.0, 79.8]);
        assert!(weight_trend(&entries, Some(75.0)).is_insufficient());
    }

    #[test]
    fn test_decreasing_trend_with_prediction() {
        // 0.2 kg lost per day over 7 entries
        let entries = make_entries(&[80.0, 79.8, 79.6, 79.4, 79.2, 79.0, 78.8]);
        let trend = weight_trend(&entries, Some(77.0)).value().unwrap();

        assert_eq!(trend.direction, WeightDirection::Decreasing);
        // (78.8 - 80.0) / 7
        assert!((trend.average_change_kg - (-1.2 / 7.0)).abs() < 1e-9);
        // 1.8 kg to go at ~0.171 kg per entry: roughly ten days out
        let days = trend.days_to_goal.unwrap();
        assert!((10..=11).contains(&days));
    }

    #[test]
    fn test_increasing_trend() {
        let entries = make_entries(&[70.0, 70.5, 71.0, 71.5, 72.0]);
        let trend = weight_trend(&entries, None).value().unwrap();
        assert_eq!(trend.direction, WeightDirection::Increasing);
        assert_eq!(trend.days_to_goal, None);
    }

    #[test]
    fn test_stable_trend_inside_band() {
        let entries = make_entries(&[80.0, 80.1, 79.9, 80.0, 80.1]);
        let trend = weight_trend(&entries, Some(75.0)).value().unwrap();
        assert_eq!(trend.direction, WeightDirection::Stable);
    }

    #[test]
    fn test_flat_series_suppresses_prediction() {
        let entries = make_entries(&[80.0, 80.0, 80.0, 80.0]);
        let trend = weight_trend(&entries, Some(75.0)).value().unwrap();
        assert_eq!(trend.average_change_kg, 0.0);
        assert_eq!(trend.days_to_goal, None);
    }

    #[test]
    fn test_distant_goal_suppresses_prediction() {
        // ~0.03 kg per entry toward a goal 20 kg away: over a year out
        let entries = make_entries(&[90.0, 89.97, 89.94, 89.91, 89.88, 89.85, 89.8]);
        let trend = weight_trend(&entries, Some(70.0)).value().unwrap();
        assert_eq!(trend.direction, WeightDirection::Stable);
        assert_eq!(trend.days_to_goal, None);
    }

    #[test]
    fn test_window_limited_to_last_seven() {
        // Early spike outside the window must not affect the trend
        let entries = make_entries(&[100.0, 80.0, 80.0, 80.0, 80.0, 80.0, 80.0, 80.0]);
        let trend = weight_trend(&entries, None).value().unwrap();
        assert_eq!(trend.direction, WeightDirection::Stable);
        assert_eq!(trend.consistency, 100.0);
    }

    #[test]
    fn test_consistency_penalizes_variance() {
        let steady = make_entries(&[80.0, 80.0, 80.0, 80.0]);
        let noisy = make_entries(&[76.0, 84.0, 75.0, 85.0]);

        let steady_score = weight_trend(&steady, None).value().unwrap().consistency;
        let noisy_score = weight_trend(&noisy, None).value().unwrap().consistency;

        assert_eq!(steady_score, 100.0);
        assert!(noisy_score < steady_score);
    }
}
