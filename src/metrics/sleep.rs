//! Sleep metrics
//!
//! Streak, consistency, trend, and optimal-bedtime computations over sleep
//! records sorted newest-first.

use crate::metrics::stats;
use crate::types::{Computed, SleepEntry, SleepTrend, TrendDirection};
use chrono::{NaiveTime, Timelike};
use std::f64::consts::TAU;

/// Hours of sleep that count as a "good night"
pub const GOOD_NIGHT_HOURS: f64 = 7.0;

/// Quality rating (1-10) from which a night informs the bedtime estimate
pub const HIGH_QUALITY_THRESHOLD: u8 = 8;

/// Window of most recent entries scored for consistency
pub const CONSISTENCY_WINDOW: usize = 7;

/// Entries required before consistency or bedtime estimates are produced
pub const MIN_HISTORY_ENTRIES: usize = 3;

/// High-quality nights sampled for the bedtime estimate
pub const BEDTIME_SAMPLE: usize = 5;

/// Window-mean differences below this band classify as stable (hours)
pub const TREND_STABLE_BAND_HOURS: f64 = 0.2;

const MINUTES_PER_DAY: f64 = 1440.0;

/// Consecutive good nights ending at the latest recorded entry.
///
/// Walks newest-first, requiring exactly one calendar day between
/// consecutive accepted entries. Same-day duplicates are skipped without
/// breaking the run; a gap of more than one day or a night under
/// [`GOOD_NIGHT_HOURS`] terminates it. The streak anchors to the latest
/// entry rather than the current date, so a stale history can still report
/// a streak of 1.
pub fn sleep_streak(entries: &[SleepEntry]) -> u32 {
    let mut streak = 0u32;
    let mut last_accepted = None;

    for entry in entries {
        match last_accepted {
            None => {
                if entry.hours < GOOD_NIGHT_HOURS {
                    break;
                }
                streak = 1;
                last_accepted = Some(entry.date);
            }
            Some(prev) => {
                let gap = prev.signed_duration_since(entry.date).num_days();
                if gap == 0 {
                    // Duplicate entry for an already-counted day
                    continue;
                }
                if gap != 1 || entry.hours < GOOD_NIGHT_HOURS {
                    break;
                }
                streak += 1;
                last_accepted = Some(entry.date);
            }
        }
    }

    streak
}

/// Regularity of sleep duration over the most recent entries, 0-100.
///
/// Scores the standard deviation of the last [`CONSISTENCY_WINDOW`] entries
/// with a linear penalty: an hour of deviation costs 20 points, so ~5 hours
/// of deviation zeroes the score.
pub fn consistency_score(entries: &[SleepEntry]) -> Computed<f64> {
    let window: Vec<f64> = entries
        .iter()
        .take(CONSISTENCY_WINDOW)
        .map(|e| e.hours)
        .collect();

    if window.len() < MIN_HISTORY_ENTRIES {
        return Computed::Insufficient;
    }

    match stats::std_dev(&window) {
        Some(sd) => Computed::Value((100.0 - sd * 20.0).clamp(0.0, 100.0)),
        None => Computed::Insufficient,
    }
}

/// Direction of sleep duration: mean of the 3 most recent entries vs the
/// mean of the 3 before them.
///
/// Either window being empty yields a stable trend with zero change, as does
/// a mean difference inside [`TREND_STABLE_BAND_HOURS`].
pub fn sleep_trend(entries: &[SleepEntry]) -> SleepTrend {
    let recent: Vec<f64> = entries.iter().take(3).map(|e| e.hours).collect();
    let prior: Vec<f64> = entries.iter().skip(3).take(3).map(|e| e.hours).collect();

    let (Some(recent_mean), Some(prior_mean)) = (stats::mean(&recent), stats::mean(&prior)) else {
        return SleepTrend::stable();
    };

    let delta = recent_mean - prior_mean;
    if delta.abs() < TREND_STABLE_BAND_HOURS {
        return SleepTrend::stable();
    }

    SleepTrend {
        direction: if delta > 0.0 {
            TrendDirection::Up
        } else {
            TrendDirection::Down
        },
        change_hours: delta.abs(),
    }
}

/// Suggested bedtime from the most recent high-quality nights.
///
/// Samples up to [`BEDTIME_SAMPLE`] entries with quality at or above
/// [`HIGH_QUALITY_THRESHOLD`]; returns `None` with fewer than
/// [`MIN_HISTORY_ENTRIES`] total entries or no qualifying nights. Bedtimes
/// are averaged as a circular quantity so times straddling midnight (23:45,
/// 00:15) land near midnight instead of midday.
pub fn optimal_bedtime(entries: &[SleepEntry]) -> Option<NaiveTime> {
    if entries.len() < MIN_HISTORY_ENTRIES {
        return None;
    }

    let samples: Vec<f64> = entries
        .iter()
        .filter(|e| e.quality >= HIGH_QUALITY_THRESHOLD)
        .take(BEDTIME_SAMPLE)
        .map(|e| minutes_since_midnight(e.bedtime))
        .collect();

    if samples.is_empty() {
        return None;
    }

    let minutes = circular_mean_minutes(&samples);
    let rounded = (minutes.round() as u32) % MINUTES_PER_DAY as u32;
    NaiveTime::from_hms_opt(rounded / 60, rounded % 60, 0)
}

/// Hours between bedtime and wake time, crossing midnight when needed.
///
/// A wake time at or before the bedtime is read as the next day.
pub fn hours_between(bedtime: NaiveTime, wake_time: NaiveTime) -> f64 {
    let mut minutes = wake_time.signed_duration_since(bedtime).num_minutes();
    if minutes <= 0 {
        minutes += MINUTES_PER_DAY as i64;
    }
    minutes as f64 / 60.0
}

fn minutes_since_midnight(time: NaiveTime) -> f64 {
    f64::from(time.hour() * 60 + time.minute())
}

/// Circular mean over minutes-since-midnight via unit-vector averaging.
fn circular_mean_minutes(samples: &[f64]) -> f64 {
    let mut sin_sum = 0.0;
    let mut cos_sum = 0.0;
    for minutes in samples {
        let angle = minutes / MINUTES_PER_DAY * TAU;
        sin_sum += angle.sin();
        cos_sum += angle.cos();
    }

    // Antipodal samples cancel out; fall back to the plain mean
    if sin_sum.abs() < 1e-9 && cos_sum.abs() < 1e-9 {
        return samples.iter().sum::<f64>() / samples.len() as f64;
    }

    (sin_sum.atan2(cos_sum) / TAU * MINUTES_PER_DAY).rem_euclid(MINUTES_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn make_entry(day: u32, hours: f64) -> SleepEntry {
        SleepEntry {
            id: Uuid::new_v4(),
            date: date(day),
            hours,
            quality: 7,
            bedtime: time(23, 0),
            wake_time: time(7, 0),
        }
    }

    fn make_quality_entry(day: u32, quality: u8, bedtime: NaiveTime) -> SleepEntry {
        SleepEntry {
            quality,
            bedtime,
            ..make_entry(day, 8.0)
        }
    }

    #[test]
    fn test_streak_counts_consecutive_good_nights() {
        // Gap between day 19 and day 17 breaks the run at 2
        let entries = vec![
            make_entry(20, 8.0),
            make_entry(19, 7.5),
            make_entry(17, 9.0),
        ];
        assert_eq!(sleep_streak(&entries), 2);
    }

    #[test]
    fn test_streak_zero_for_single_bad_night() {
        let entries = vec![make_entry(20, 6.0)];
        assert_eq!(sleep_streak(&entries), 0);
    }

    #[test]
    fn test_streak_single_good_night() {
        let entries = vec![make_entry(20, 7.0)];
        assert_eq!(sleep_streak(&entries), 1);
    }

    #[test]
    fn test_streak_skips_same_day_duplicate() {
        let entries = vec![
            make_entry(20, 8.0),
            make_entry(20, 7.2),
            make_entry(19, 7.5),
        ];
        assert_eq!(sleep_streak(&entries), 2);
    }

    #[test]
    fn test_streak_breaks_on_short_night() {
        let entries = vec![
            make_entry(20, 8.0),
            make_entry(19, 5.0),
            make_entry(18, 9.0),
        ];
        assert_eq!(sleep_streak(&entries), 1);
    }

    #[test]
    fn test_streak_empty_history() {
        assert_eq!(sleep_streak(&[]), 0);
    }

    #[test]
    fn test_consistency_identical_nights_scores_100() {
        let entries: Vec<SleepEntry> = (14..21).map(|d| make_entry(d, 7.5)).collect();
        assert_eq!(consistency_score(&entries), Computed::Value(100.0));
    }

    #[test]
    fn test_consistency_wide_variance_scores_low() {
        // Alternating 4h and 10h nights: stddev 3, score 100 - 60 = 40
        let entries: Vec<SleepEntry> = (14..20)
            .map(|d| make_entry(d, if d % 2 == 0 { 4.0 } else { 10.0 }))
            .collect();
        let score = consistency_score(&entries).value().unwrap();
        assert!(score < 50.0);
        assert!(score >= 0.0);
    }

    #[test]
    fn test_consistency_insufficient_below_three_entries() {
        let entries = vec![make_entry(20, 8.0), make_entry(19, 8.0)];
        assert!(consistency_score(&entries).is_insufficient());
    }

    #[test]
    fn test_consistency_clamped_at_zero() {
        // Extreme spread drives the raw score negative; it must clamp to 0
        let entries = vec![
            make_entry(20, 0.5),
            make_entry(19, 23.0),
            make_entry(18, 0.5),
            make_entry(17, 23.0),
        ];
        assert_eq!(consistency_score(&entries), Computed::Value(0.0));
    }

    #[test]
    fn test_trend_up() {
        let entries = vec![
            make_entry(20, 8.0),
            make_entry(19, 8.0),
            make_entry(18, 8.0),
            make_entry(17, 6.0),
            make_entry(16, 6.0),
            make_entry(15, 6.0),
        ];
        let trend = sleep_trend(&entries);
        assert_eq!(trend.direction, TrendDirection::Up);
        assert!((trend.change_hours - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_trend_stable_within_band() {
        let entries = vec![
            make_entry(20, 7.6),
            make_entry(19, 7.5),
            make_entry(18, 7.5),
            make_entry(17, 7.5),
            make_entry(16, 7.5),
            make_entry(15, 7.5),
        ];
        let trend = sleep_trend(&entries);
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert_eq!(trend.change_hours, 0.0);
    }

    #[test]
    fn test_trend_down() {
        let entries = vec![
            make_entry(20, 6.0),
            make_entry(19, 6.5),
            make_entry(18, 6.1),
            make_entry(17, 8.0),
            make_entry(16, 7.9),
            make_entry(15, 8.1),
        ];
        let trend = sleep_trend(&entries);
        assert_eq!(trend.direction, TrendDirection::Down);
        assert!(trend.change_hours > 0.0);
    }

    #[test]
    fn test_trend_stable_with_short_history() {
        let entries = vec![make_entry(20, 8.0), make_entry(19, 6.0)];
        assert_eq!(sleep_trend(&entries), SleepTrend::stable());
    }

    #[test]
    fn test_bedtime_requires_history() {
        let entries = vec![
            make_quality_entry(20, 9, time(22, 30)),
            make_quality_entry(19, 9, time(22, 30)),
        ];
        assert_eq!(optimal_bedtime(&entries), None);
    }

    #[test]
    fn test_bedtime_requires_high_quality_nights() {
        let entries = vec![
            make_quality_entry(20, 5, time(22, 30)),
            make_quality_entry(19, 6, time(22, 30)),
            make_quality_entry(18, 7, time(22, 30)),
        ];
        assert_eq!(optimal_bedtime(&entries), None);
    }

    #[test]
    fn test_bedtime_average_of_identical_times() {
        let entries = vec![
            make_quality_entry(20, 9, time(22, 30)),
            make_quality_entry(19, 8, time(22, 30)),
            make_quality_entry(18, 10, time(22, 30)),
        ];
        assert_eq!(optimal_bedtime(&entries), Some(time(22, 30)));
    }

    #[test]
    fn test_bedtime_handles_midnight_wraparound() {
        // 23:45 and 00:15 straddle midnight; the estimate must land at
        // 00:00, not midday
        let entries = vec![
            make_quality_entry(20, 9, time(23, 45)),
            make_quality_entry(19, 9, time(0, 15)),
            make_quality_entry(18, 9, time(23, 45)),
            make_quality_entry(17, 9, time(0, 15)),
        ];
        assert_eq!(optimal_bedtime(&entries), Some(time(0, 0)));
    }

    #[test]
    fn test_hours_between_same_day() {
        assert!((hours_between(time(13, 0), time(21, 30)) - 8.5).abs() < 1e-9);
    }

    #[test]
    fn test_hours_between_across_midnight() {
        assert!((hours_between(time(23, 30), time(7, 0)) - 7.5).abs() < 1e-9);
    }
}
