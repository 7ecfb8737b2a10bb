//! Dashboard snapshot encoding
//!
//! Assembles every derived value into the single payload the display layer
//! reads. Snapshots are recomputed from confirmed store state on each
//! request; nothing here is cached or mutated.

use crate::achievements::{self, AchievementInputs};
use crate::error::TrackerError;
use crate::metrics::{activity, progress, sleep, water, weight};
use crate::types::{
    ActivityEntry, ActivitySection, DashboardSnapshot, SleepEntry, SleepSection, SnapshotProducer,
    UserPreferences, WaterEntry, WaterSection, WeightEntry, WeightSection,
};
use crate::{PRODUCER_NAME, VITALIS_VERSION};
use chrono::{Datelike, NaiveDate, Utc};
use uuid::Uuid;

/// Current snapshot schema version
pub const SNAPSHOT_VERSION: &str = "1.0.0";

/// Snapshot encoder producing the dashboard payload
pub struct SnapshotEncoder {
    instance_id: String,
}

impl Default for SnapshotEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Encode the full dashboard snapshot for `today`
    pub fn encode(
        &self,
        preferences: &UserPreferences,
        activities: &[ActivityEntry],
        waters: &[WaterEntry],
        sleeps: &[SleepEntry],
        weights: &[WeightEntry],
        today: NaiveDate,
    ) -> DashboardSnapshot {
        let producer = SnapshotProducer {
            name: PRODUCER_NAME.to_string(),
            version: VITALIS_VERSION.to_string(),
            instance_id: self.instance_id.clone(),
        };

        let activity_section = build_activity_section(preferences, activities, today);
        let water_section = build_water_section(preferences, waters, today);
        let sleep_section = build_sleep_section(preferences, sleeps);
        let weight_section = build_weight_section(preferences, weights);

        let achievements = achievements::evaluate(&AchievementInputs {
            best_day_steps: activity_section.best_day_steps,
            water_goal_met_days: water_section.goal_met_days,
            sleep_streak_nights: sleep_section.streak_nights,
            current_weight_kg: weight_section.current_kg,
            weight_goal_kg: preferences.weight_goal_kg,
            active_days_last_7: activity_section.active_days_last_7,
        });

        DashboardSnapshot {
            snapshot_version: SNAPSHOT_VERSION.to_string(),
            producer,
            generated_at_utc: Utc::now().to_rfc3339(),
            date: today,
            preferences: preferences.clone(),
            activity: activity_section,
            water: water_section,
            sleep: sleep_section,
            weight: weight_section,
            achievements,
        }
    }

    /// Encode to pretty-printed JSON
    pub fn encode_to_json(
        &self,
        preferences: &UserPreferences,
        activities: &[ActivityEntry],
        waters: &[WaterEntry],
        sleeps: &[SleepEntry],
        weights: &[WeightEntry],
        today: NaiveDate,
    ) -> Result<String, TrackerError> {
        let snapshot = self.encode(preferences, activities, waters, sleeps, weights, today);
        serde_json::to_string_pretty(&snapshot).map_err(TrackerError::JsonError)
    }
}

fn build_activity_section(
    preferences: &UserPreferences,
    activities: &[ActivityEntry],
    today: NaiveDate,
) -> ActivitySection {
    let today_entry = activities
        .iter()
        .find(|e| e.date == today)
        .cloned()
        .unwrap_or_else(|| ActivityEntry::empty(today));

    let weekly_steps = activity::weekly_steps(activities, today);
    let best_day_steps = activity::max_steps(&weekly_steps);

    ActivitySection {
        progress_pct: progress::goal_progress(
            f64::from(today_entry.steps),
            f64::from(preferences.steps_goal),
        ),
        weekly_steps,
        best_day_steps,
        active_days_last_7: activity::active_days_last_7(activities, today),
        month: activity::monthly_summary(activities, today.year(), today.month()),
        today: today_entry,
    }
}

fn build_water_section(
    preferences: &UserPreferences,
    waters: &[WaterEntry],
    today: NaiveDate,
) -> WaterSection {
    let today_entry = waters
        .iter()
        .find(|e| e.date == today)
        .cloned()
        .unwrap_or_else(|| WaterEntry::empty(today, preferences.water_goal_ml));

    // The goal stamped on today's row wins over preferences
    let daily_goal_ml = today_entry.daily_goal_ml;
    let weekly_intake_ml = activity::weekly_intake(waters, today);
    let today_index = today.weekday().num_days_from_monday() as usize;

    WaterSection {
        progress_pct: progress::goal_progress(
            f64::from(today_entry.total_intake_ml),
            f64::from(daily_goal_ml),
        ),
        weekly_intake_ml,
        streak_days: water::weekly_streak(&weekly_intake_ml, daily_goal_ml, today_index),
        average_daily_ml: water::average_daily(&weekly_intake_ml),
        goal_met_days: water::goal_met_days(&weekly_intake_ml, daily_goal_ml),
        today: today_entry,
    }
}

fn build_sleep_section(preferences: &UserPreferences, sleeps: &[SleepEntry]) -> SleepSection {
    // Metrics walk newest-first
    let newest_first: Vec<SleepEntry> = sleeps.iter().rev().cloned().collect();
    let last_night = newest_first.first().cloned();

    let progress_pct = last_night.as_ref().map_or(0, |entry| {
        progress::goal_progress(entry.hours, preferences.sleep_goal_hours)
    });

    SleepSection {
        progress_pct,
        streak_nights: sleep::sleep_streak(&newest_first),
        consistency: sleep::consistency_score(&newest_first),
        trend: sleep::sleep_trend(&newest_first),
        optimal_bedtime: sleep::optimal_bedtime(&newest_first),
        last_night,
    }
}

fn build_weight_section(preferences: &UserPreferences, weights: &[WeightEntry]) -> WeightSection {
    WeightSection {
        current_kg: weights.last().map(|e| e.weight_kg),
        goal_kg: preferences.weight_goal_kg,
        trend: weight::weight_trend(weights, preferences.weight_goal_kg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AchievementKind, ActivityType, Computed, WaterSubEntry};
    use chrono::NaiveTime;
    use pretty_assertions::assert_eq;

    fn date(day: u32) -> NaiveDate {
        // 2024-03-20 is a Wednesday
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn make_activity(day: u32, steps: u32) -> ActivityEntry {
        ActivityEntry {
            date: date(day),
            steps,
            distance_km: 0.0,
            calories: 0,
            duration_minutes: 30,
            activity_type: ActivityType::Walking,
        }
    }

    fn make_water(day: u32, total: u32) -> WaterEntry {
        WaterEntry {
            date: date(day),
            total_intake_ml: total,
            daily_goal_ml: 2_000,
            entries: vec![WaterSubEntry {
                time: time(9, 0),
                amount_ml: total,
                date: date(day),
            }],
        }
    }

    fn make_sleep(day: u32, hours: f64) -> SleepEntry {
        SleepEntry {
            id: Uuid::new_v4(),
            date: date(day),
            hours,
            quality: 8,
            bedtime: time(23, 0),
            wake_time: time(7, 0),
        }
    }

    #[test]
    fn test_snapshot_sections_populated() {
        let prefs = UserPreferences::default();
        let activities = vec![make_activity(18, 12_000), make_activity(20, 5_000)];
        let waters = vec![make_water(19, 2_500), make_water(20, 1_000)];
        let sleeps = vec![make_sleep(18, 8.0), make_sleep(19, 7.5), make_sleep(20, 8.0)];
        let weights: Vec<WeightEntry> = Vec::new();

        let encoder = SnapshotEncoder::new();
        let snapshot = encoder.encode(&prefs, &activities, &waters, &sleeps, &weights, date(20));

        assert_eq!(snapshot.snapshot_version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.producer.name, "vitalis");
        assert_eq!(snapshot.date, date(20));

        // Wednesday with 5000 steps of a 10000 goal
        assert_eq!(snapshot.activity.today.steps, 5_000);
        assert_eq!(snapshot.activity.progress_pct, 50);
        assert_eq!(snapshot.activity.best_day_steps, 12_000);

        // 1000 ml of 2000 today; only today at/under goal so streak 0
        assert_eq!(snapshot.water.progress_pct, 50);
        assert_eq!(snapshot.water.streak_days, 0);
        assert_eq!(snapshot.water.goal_met_days, 1);

        // Three consecutive good nights
        assert_eq!(snapshot.sleep.streak_nights, 3);
        assert_eq!(snapshot.sleep.progress_pct, 100);

        assert!(snapshot.weight.trend.is_insufficient());
        assert_eq!(snapshot.achievements.len(), 5);
    }

    #[test]
    fn test_snapshot_empty_store_defaults() {
        let prefs = UserPreferences::default();
        let encoder = SnapshotEncoder::new();
        let snapshot = encoder.encode(&prefs, &[], &[], &[], &[], date(20));

        assert_eq!(snapshot.activity.today.steps, 0);
        assert_eq!(snapshot.activity.progress_pct, 0);
        assert_eq!(snapshot.water.today.daily_goal_ml, 2_000);
        assert_eq!(snapshot.sleep.streak_nights, 0);
        assert!(snapshot.sleep.last_night.is_none());
        assert_eq!(snapshot.sleep.consistency, Computed::Insufficient);
        assert!(snapshot.weight.current_kg.is_none());
        assert!(!snapshot.achievements.iter().any(|a| a.earned));
    }

    #[test]
    fn test_snapshot_progress_clamped() {
        let prefs = UserPreferences::default();
        let activities = vec![make_activity(20, 25_000)];
        let encoder = SnapshotEncoder::new();
        let snapshot = encoder.encode(&prefs, &activities, &[], &[], &[], date(20));

        assert_eq!(snapshot.activity.progress_pct, 100);
    }

    #[test]
    fn test_snapshot_step_master_from_weekly_max() {
        let prefs = UserPreferences::default();
        // Monday hit 10k; today (Wednesday) did not
        let activities = vec![make_activity(18, 10_500), make_activity(20, 2_000)];
        let encoder = SnapshotEncoder::new();
        let snapshot = encoder.encode(&prefs, &activities, &[], &[], &[], date(20));

        let step_master = snapshot
            .achievements
            .iter()
            .find(|a| a.kind == AchievementKind::StepMaster)
            .unwrap();
        assert!(step_master.earned);
        assert_eq!(step_master.progress, 100);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let prefs = UserPreferences::default();
        let encoder = SnapshotEncoder::with_instance_id("fixed-instance".to_string());
        let json = encoder
            .encode_to_json(&prefs, &[], &[], &[], &[], date(20))
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["snapshot_version"], "1.0.0");
        assert_eq!(value["producer"]["instance_id"], "fixed-instance");
        assert_eq!(value["date"], "2024-03-20");
        assert_eq!(value["sleep"]["consistency"]["status"], "insufficient");
        assert_eq!(value["achievements"].as_array().unwrap().len(), 5);
    }
}
