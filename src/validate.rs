//! Input validation
//!
//! Every user-supplied value is checked here before any write reaches the
//! record store. Out-of-range input is rejected locally with a typed error;
//! nothing is clamped silently.

use crate::error::TrackerError;
use crate::types::UserPreferences;

/// Upper bound on a single day's step count
pub const MAX_DAILY_STEPS: u32 = 200_000;

/// Upper bound on a single logged drink (ml)
pub const MAX_DRINK_ML: u32 = 5_000;

/// Upper bound on a daily water goal (ml)
pub const MAX_WATER_GOAL_ML: u32 = 20_000;

/// Bounds on a body weight measurement (kg)
pub const MIN_WEIGHT_KG: f64 = 20.0;
pub const MAX_WEIGHT_KG: f64 = 500.0;

/// Bounds on body height (cm)
pub const MIN_HEIGHT_CM: f64 = 50.0;
pub const MAX_HEIGHT_CM: f64 = 280.0;

pub fn steps(count: u32) -> Result<(), TrackerError> {
    if count > MAX_DAILY_STEPS {
        return Err(TrackerError::invalid(
            "steps",
            format!("{count} exceeds the daily maximum of {MAX_DAILY_STEPS}"),
        ));
    }
    Ok(())
}

pub fn steps_goal(goal: u32) -> Result<(), TrackerError> {
    if goal == 0 || goal > MAX_DAILY_STEPS {
        return Err(TrackerError::invalid(
            "steps_goal",
            format!("must be between 1 and {MAX_DAILY_STEPS}, got {goal}"),
        ));
    }
    Ok(())
}

pub fn drink_amount(amount_ml: u32) -> Result<(), TrackerError> {
    if amount_ml == 0 || amount_ml > MAX_DRINK_ML {
        return Err(TrackerError::invalid(
            "amount_ml",
            format!("must be between 1 and {MAX_DRINK_ML} ml, got {amount_ml}"),
        ));
    }
    Ok(())
}

pub fn water_goal(goal_ml: u32) -> Result<(), TrackerError> {
    if goal_ml == 0 || goal_ml > MAX_WATER_GOAL_ML {
        return Err(TrackerError::invalid(
            "water_goal_ml",
            format!("must be between 1 and {MAX_WATER_GOAL_ML} ml, got {goal_ml}"),
        ));
    }
    Ok(())
}

pub fn sleep_hours(hours: f64) -> Result<(), TrackerError> {
    if !hours.is_finite() || !(0.0..=24.0).contains(&hours) {
        return Err(TrackerError::invalid(
            "hours",
            format!("must be between 0 and 24, got {hours}"),
        ));
    }
    Ok(())
}

pub fn sleep_goal(hours: f64) -> Result<(), TrackerError> {
    if !hours.is_finite() || !(1.0..=24.0).contains(&hours) {
        return Err(TrackerError::invalid(
            "sleep_goal_hours",
            format!("must be between 1 and 24, got {hours}"),
        ));
    }
    Ok(())
}

pub fn sleep_quality(quality: u8) -> Result<(), TrackerError> {
    if !(1..=10).contains(&quality) {
        return Err(TrackerError::invalid(
            "quality",
            format!("must be between 1 and 10, got {quality}"),
        ));
    }
    Ok(())
}

pub fn weight_kg(weight: f64) -> Result<(), TrackerError> {
    if !weight.is_finite() || !(MIN_WEIGHT_KG..=MAX_WEIGHT_KG).contains(&weight) {
        return Err(TrackerError::invalid(
            "weight_kg",
            format!("must be between {MIN_WEIGHT_KG} and {MAX_WEIGHT_KG} kg, got {weight}"),
        ));
    }
    Ok(())
}

pub fn height_cm(height: f64) -> Result<(), TrackerError> {
    if !height.is_finite() || !(MIN_HEIGHT_CM..=MAX_HEIGHT_CM).contains(&height) {
        return Err(TrackerError::invalid(
            "height_cm",
            format!("must be between {MIN_HEIGHT_CM} and {MAX_HEIGHT_CM} cm, got {height}"),
        ));
    }
    Ok(())
}

/// Validate a full preferences record before it replaces the singleton
pub fn preferences(prefs: &UserPreferences) -> Result<(), TrackerError> {
    steps_goal(prefs.steps_goal)?;
    water_goal(prefs.water_goal_ml)?;
    sleep_goal(prefs.sleep_goal_hours)?;
    if let Some(goal) = prefs.weight_goal_kg {
        weight_kg(goal)?;
    }
    if let Some(height) = prefs.height_cm {
        height_cm(height)?;
    }
    Ok(())
}
