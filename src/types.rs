//! Core types for the Vitalis engine
//!
//! This module defines the record types persisted per user and per calendar
//! day, the preferences singleton, and the derived-value structures handed
//! to the display layer.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of activity recorded for a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Walking,
    Running,
    Cycling,
    Hiking,
    Swimming,
    Gym,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Walking => "walking",
            ActivityType::Running => "running",
            ActivityType::Cycling => "cycling",
            ActivityType::Hiking => "hiking",
            ActivityType::Swimming => "swimming",
            ActivityType::Gym => "gym",
        }
    }
}

impl std::str::FromStr for ActivityType {
    type Err = crate::error::TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "walking" => Ok(ActivityType::Walking),
            "running" => Ok(ActivityType::Running),
            "cycling" => Ok(ActivityType::Cycling),
            "hiking" => Ok(ActivityType::Hiking),
            "swimming" => Ok(ActivityType::Swimming),
            "gym" => Ok(ActivityType::Gym),
            other => Err(crate::error::TrackerError::UnknownActivityType(
                other.to_string(),
            )),
        }
    }
}

/// Daily activity record - one per user per calendar day, upsert semantics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Calendar day this entry represents
    pub date: NaiveDate,
    /// Step count for the day
    pub steps: u32,
    /// Distance covered (km)
    pub distance_km: f64,
    /// Calories burned
    pub calories: u32,
    /// Active duration (minutes)
    pub duration_minutes: u32,
    /// Kind of activity
    pub activity_type: ActivityType,
}

impl ActivityEntry {
    /// Empty entry for a day, created on first access
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            steps: 0,
            distance_km: 0.0,
            calories: 0,
            duration_minutes: 0,
            activity_type: ActivityType::Walking,
        }
    }
}

/// A single logged drink within a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterSubEntry {
    /// Time of day the drink was logged
    pub time: NaiveTime,
    /// Amount (ml)
    pub amount_ml: u32,
    /// Calendar day the drink belongs to
    pub date: NaiveDate,
}

/// Daily water record - one per user per calendar day
///
/// Sub-entries are append-only within the day; "undo last" truncates the
/// newest sub-entry and subtracts its amount from the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterEntry {
    /// Calendar day this entry represents
    pub date: NaiveDate,
    /// Total intake for the day (ml)
    pub total_intake_ml: u32,
    /// Daily goal in effect for this day (ml)
    pub daily_goal_ml: u32,
    /// Individual drinks, in logging order
    pub entries: Vec<WaterSubEntry>,
}

impl WaterEntry {
    /// Empty entry for a day, carrying the goal in effect
    pub fn empty(date: NaiveDate, daily_goal_ml: u32) -> Self {
        Self {
            date,
            total_intake_ml: 0,
            daily_goal_ml,
            entries: Vec::new(),
        }
    }
}

/// Nightly sleep record - one conceptual entry per date, keyed by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepEntry {
    pub id: Uuid,
    /// Calendar day the night is attributed to (wake day)
    pub date: NaiveDate,
    /// Hours slept
    pub hours: f64,
    /// Subjective quality, 1-10
    pub quality: u8,
    /// Time the user went to bed
    pub bedtime: NaiveTime,
    /// Time the user woke up
    pub wake_time: NaiveTime,
}

/// Weight measurement - append-only, multiple entries per day allowed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub id: Uuid,
    /// Calendar day the measurement was taken
    pub date: NaiveDate,
    /// Body weight (kg)
    pub weight_kg: f64,
}

/// Per-user goals and body parameters (singleton)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Daily step goal
    pub steps_goal: u32,
    /// Daily water goal (ml)
    pub water_goal_ml: u32,
    /// Nightly sleep goal (hours)
    pub sleep_goal_hours: f64,
    /// Target body weight (kg)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_goal_kg: Option<f64>,
    /// Body height (cm), used for stride-based distance estimates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            steps_goal: 10_000,
            water_goal_ml: 2_000,
            sleep_goal_hours: 8.0,
            weight_goal_kg: None,
            height_cm: None,
        }
    }
}

/// Result of a metric that needs a minimum amount of history.
///
/// Distinguishes "no signal yet" from a genuinely low score, so the display
/// layer never confuses an empty history with a worst-possible value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Computed<T> {
    Insufficient,
    Value(T),
}

impl<T> Computed<T> {
    /// The computed value, if the history was sufficient
    pub fn value(self) -> Option<T> {
        match self {
            Computed::Insufficient => None,
            Computed::Value(v) => Some(v),
        }
    }

    pub fn value_or(self, default: T) -> T {
        match self {
            Computed::Insufficient => default,
            Computed::Value(v) => v,
        }
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, Computed::Insufficient)
    }
}

/// Short-term direction of a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

/// Sleep duration trend: recent window vs the prior window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepTrend {
    pub direction: TrendDirection,
    /// Absolute difference of window means (hours); 0 when stable
    pub change_hours: f64,
}

impl SleepTrend {
    pub fn stable() -> Self {
        Self {
            direction: TrendDirection::Stable,
            change_hours: 0.0,
        }
    }
}

/// Direction of the weight series over the trend window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightDirection {
    Increasing,
    Decreasing,
    Stable,
}

/// Weight trend over the most recent entries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightTrend {
    pub direction: WeightDirection,
    /// Mean change per entry across the window (kg)
    pub average_change_kg: f64,
    /// 0-100, higher when the window varies less
    pub consistency: f64,
    /// Projected days until the goal weight at the current rate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_to_goal: Option<u32>,
}

/// Month-level activity rollup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    /// Days in the month with a record
    pub logged_days: u32,
    /// Days in the month with a non-zero step count
    pub active_days: u32,
    pub total_steps: u64,
    /// Mean steps across logged days, rounded
    pub average_steps: u32,
    pub total_distance_km: f64,
    pub total_calories: u64,
}

/// Fixed achievement catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    StepMaster,
    HydrationHero,
    SleepChampion,
    GoalCrusher,
    WeekWarrior,
}

impl AchievementKind {
    pub fn title(&self) -> &'static str {
        match self {
            AchievementKind::StepMaster => "Step Master",
            AchievementKind::HydrationHero => "Hydration Hero",
            AchievementKind::SleepChampion => "Sleep Champion",
            AchievementKind::GoalCrusher => "Goal Crusher",
            AchievementKind::WeekWarrior => "Week Warrior",
        }
    }
}

/// Evaluation of a single achievement against current aggregates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AchievementStatus {
    pub kind: AchievementKind,
    pub earned: bool,
    /// 0-100; 100 once earned
    pub progress: u8,
}

/// Snapshot producer metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Activity section of the dashboard snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySection {
    /// Today's entry; an empty entry when nothing was logged yet
    pub today: ActivityEntry,
    /// Steps vs goal, 0-100
    pub progress_pct: u8,
    /// Mon-Sun step buckets for the current week
    pub weekly_steps: [u32; 7],
    /// Highest single-day step count this week
    pub best_day_steps: u32,
    /// Days with any activity in the trailing 7 days
    pub active_days_last_7: u32,
    /// Rollup for the month containing today
    pub month: MonthlySummary,
}

/// Water section of the dashboard snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterSection {
    pub today: WaterEntry,
    /// Intake vs goal, 0-100
    pub progress_pct: u8,
    /// Mon-Sun intake buckets for the current week (ml)
    pub weekly_intake_ml: [u32; 7],
    /// Consecutive goal-met days ending today within the current week
    pub streak_days: u32,
    /// Mean intake across days with data, rounded (ml)
    pub average_daily_ml: u32,
    /// Days this week at or above the daily goal
    pub goal_met_days: u32,
}

/// Sleep section of the dashboard snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepSection {
    /// Most recent recorded night, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_night: Option<SleepEntry>,
    /// Latest night's hours vs goal, 0-100
    pub progress_pct: u8,
    /// Consecutive good nights ending at the latest entry
    pub streak_nights: u32,
    /// Regularity of recent sleep duration
    pub consistency: Computed<f64>,
    pub trend: SleepTrend,
    /// Suggested bedtime from recent high-quality nights
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimal_bedtime: Option<NaiveTime>,
}

/// Weight section of the dashboard snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightSection {
    /// Most recent measurement (kg)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_kg: Option<f64>,
    pub trend: Computed<WeightTrend>,
}

/// Complete derived-value payload consumed by the display layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub snapshot_version: String,
    pub producer: SnapshotProducer,
    /// When this snapshot was computed
    pub generated_at_utc: String,
    /// The "today" the snapshot was computed for
    pub date: NaiveDate,
    pub preferences: UserPreferences,
    pub activity: ActivitySection,
    pub water: WaterSection,
    pub sleep: SleepSection,
    pub weight: WeightSection,
    pub achievements: Vec<AchievementStatus>,
}
