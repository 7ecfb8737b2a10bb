//! Water metrics
//!
//! Weekly rollup computations over Mon-Sun intake buckets.

/// Consecutive goal-met days ending today, within the current week.
///
/// Walks backward from `today_index` (0 = Monday) through the week buckets,
/// counting days at or above the goal, and stops at the first shortfall or
/// the Monday boundary. Fails safe: a zero goal yields no streak.
pub fn weekly_streak(week: &[u32; 7], daily_goal_ml: u32, today_index: usize) -> u32 {
    if daily_goal_ml == 0 || today_index >= week.len() {
        return 0;
    }

    let mut streak = 0u32;
    for index in (0..=today_index).rev() {
        if week[index] < daily_goal_ml {
            break;
        }
        streak += 1;
    }
    streak
}

/// Mean intake across days that have any data, rounded to the nearest ml.
///
/// Days with zero intake are excluded from the denominator; a week with no
/// data averages to 0.
pub fn average_daily(week: &[u32; 7]) -> u32 {
    let days_with_data = week.iter().filter(|&&amount| amount > 0).count();
    if days_with_data == 0 {
        return 0;
    }
    let total: u64 = week.iter().map(|&amount| u64::from(amount)).sum();
    (total as f64 / days_with_data as f64).round() as u32
}

/// Days in the week at or above the daily goal
pub fn goal_met_days(week: &[u32; 7], daily_goal_ml: u32) -> u32 {
    if daily_goal_ml == 0 {
        return 0;
    }
    week.iter().filter(|&&amount| amount >= daily_goal_ml).count() as u32
}
