//! Achievement evaluation
//!
//! Pure mapping from current aggregates to the fixed achievement catalogue.
//! Progress for a not-yet-earned achievement is a simple ratio against its
//! threshold, clamped to 100.

use crate::metrics::progress::goal_progress;
use crate::types::{AchievementKind, AchievementStatus};

/// Steps in a single day for Step Master
pub const STEP_MASTER_STEPS: u32 = 10_000;

/// Goal-met days in a week for Hydration Hero
pub const HYDRATION_DAYS: u32 = 7;

/// Consecutive good nights for Sleep Champion
pub const SLEEP_STREAK_NIGHTS: u32 = 5;

/// Distance from the weight goal that counts as reached (kg)
pub const WEIGHT_GOAL_BAND_KG: f64 = 0.5;

/// Active days in the trailing week for Week Warrior
pub const ACTIVE_DAYS_PER_WEEK: u32 = 5;

/// Aggregates the evaluator consumes, already derived from the record store
#[derive(Debug, Clone, Default)]
pub struct AchievementInputs {
    /// Highest single-day step count this week
    pub best_day_steps: u32,
    /// Days this week at or above the water goal
    pub water_goal_met_days: u32,
    /// Consecutive good sleep nights ending at the latest entry
    pub sleep_streak_nights: u32,
    /// Most recent weight measurement (kg)
    pub current_weight_kg: Option<f64>,
    /// Target weight (kg)
    pub weight_goal_kg: Option<f64>,
    /// Days with any activity in the trailing 7 days
    pub active_days_last_7: u32,
}

/// Evaluate every achievement against the given aggregates
pub fn evaluate(inputs: &AchievementInputs) -> Vec<AchievementStatus> {
    vec![
        threshold_status(
            AchievementKind::StepMaster,
            f64::from(inputs.best_day_steps),
            f64::from(STEP_MASTER_STEPS),
        ),
        threshold_status(
            AchievementKind::HydrationHero,
            f64::from(inputs.water_goal_met_days),
            f64::from(HYDRATION_DAYS),
        ),
        threshold_status(
            AchievementKind::SleepChampion,
            f64::from(inputs.sleep_streak_nights),
            f64::from(SLEEP_STREAK_NIGHTS),
        ),
        goal_crusher_status(inputs.current_weight_kg, inputs.weight_goal_kg),
        threshold_status(
            AchievementKind::WeekWarrior,
            f64::from(inputs.active_days_last_7),
            f64::from(ACTIVE_DAYS_PER_WEEK),
        ),
    ]
}

/// Earned once `value` reaches `threshold`; progress is the clamped ratio
fn threshold_status(kind: AchievementKind, value: f64, threshold: f64) -> AchievementStatus {
    AchievementStatus {
        kind,
        earned: value >= threshold,
        progress: goal_progress(value, threshold),
    }
}

/// Earned within [`WEIGHT_GOAL_BAND_KG`] of the goal; progress is the
/// closeness ratio `band / distance`, clamped. No goal or no measurement
/// yields zero progress.
fn goal_crusher_status(current_kg: Option<f64>, goal_kg: Option<f64>) -> AchievementStatus {
    let kind = AchievementKind::GoalCrusher;

    let (Some(current), Some(goal)) = (current_kg, goal_kg) else {
        return AchievementStatus {
            kind,
            earned: false,
            progress: 0,
        };
    };

    let distance = (current - goal).abs();
    if distance <= WEIGHT_GOAL_BAND_KG {
        return AchievementStatus {
            kind,
            earned: true,
            progress: 100,
        };
    }

    AchievementStatus {
        kind,
        earned: false,
        progress: goal_progress(WEIGHT_GOAL_BAND_KG, distance),
    }
}
