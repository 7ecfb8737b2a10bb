//! Goal-progress arithmetic
//!
//! One contract used uniformly for steps, water, and sleep-vs-goal displays.

/// Percentage of `goal` reached by `value`, rounded and clamped to 0-100.
///
/// Fails safe: returns 0 when the goal is zero or negative, so a missing or
/// unset goal can never divide by zero or report phantom progress.
pub fn goal_progress(value: f64, goal: f64) -> u8 {
    if goal <= 0.0 || !value.is_finite() {
        return 0;
    }
    (value / goal * 100.0).round().clamp(0.0, 100.0) as u8
}
