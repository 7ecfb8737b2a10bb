//! Record persistence
//!
//! [`RecordStore`] is the seam to the external row-store collaborator:
//! activity, water, and sleep rows upsert by calendar date, weight rows are
//! append-only, and preferences are a singleton. [`MemoryStore`] implements
//! the contract in memory and round-trips through JSON, which is also how
//! the CLI persists a store between invocations.

use crate::error::TrackerError;
use crate::types::{ActivityEntry, SleepEntry, UserPreferences, WaterEntry, WeightEntry};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Contract with the external row-store
///
/// Collections are returned in chronological order (weight in insertion
/// order). A failed operation must leave previously returned data valid;
/// callers keep their in-memory state on error.
pub trait RecordStore {
    fn activity(&self, date: NaiveDate) -> Result<Option<ActivityEntry>, TrackerError>;
    fn activities(&self) -> Result<Vec<ActivityEntry>, TrackerError>;
    fn upsert_activity(&mut self, entry: ActivityEntry) -> Result<(), TrackerError>;

    fn water(&self, date: NaiveDate) -> Result<Option<WaterEntry>, TrackerError>;
    fn waters(&self) -> Result<Vec<WaterEntry>, TrackerError>;
    fn upsert_water(&mut self, entry: WaterEntry) -> Result<(), TrackerError>;

    fn sleep(&self, date: NaiveDate) -> Result<Option<SleepEntry>, TrackerError>;
    fn sleeps(&self) -> Result<Vec<SleepEntry>, TrackerError>;
    fn upsert_sleep(&mut self, entry: SleepEntry) -> Result<(), TrackerError>;

    fn weights(&self) -> Result<Vec<WeightEntry>, TrackerError>;
    fn append_weight(&mut self, entry: WeightEntry) -> Result<(), TrackerError>;

    /// Preferences singleton; defaults when never written
    fn preferences(&self) -> Result<UserPreferences, TrackerError>;
    fn put_preferences(&mut self, prefs: UserPreferences) -> Result<(), TrackerError>;

    /// Clear every record collection; preferences survive
    fn reset_statistics(&mut self) -> Result<(), TrackerError>;
}

/// In-memory record store
///
/// Date-keyed maps give the per-(user, date) upsert semantics directly;
/// the ordered map keeps chronological iteration for rollups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    activity: BTreeMap<NaiveDate, ActivityEntry>,
    water: BTreeMap<NaiveDate, WaterEntry>,
    sleep: BTreeMap<NaiveDate, SleepEntry>,
    weight: Vec<WeightEntry>,
    preferences: Option<UserPreferences>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the store to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Total number of records across all collections
    pub fn record_count(&self) -> usize {
        self.activity.len() + self.water.len() + self.sleep.len() + self.weight.len()
    }

    pub fn has_preferences(&self) -> bool {
        self.preferences.is_some()
    }
}

impl RecordStore for MemoryStore {
    fn activity(&self, date: NaiveDate) -> Result<Option<ActivityEntry>, TrackerError> {
        Ok(self.activity.get(&date).cloned())
    }

    fn activities(&self) -> Result<Vec<ActivityEntry>, TrackerError> {
        Ok(self.activity.values().cloned().collect())
    }

    fn upsert_activity(&mut self, entry: ActivityEntry) -> Result<(), TrackerError> {
        self.activity.insert(entry.date, entry);
        Ok(())
    }

    fn water(&self, date: NaiveDate) -> Result<Option<WaterEntry>, TrackerError> {
        Ok(self.water.get(&date).cloned())
    }

    fn waters(&self) -> Result<Vec<WaterEntry>, TrackerError> {
        Ok(self.water.values().cloned().collect())
    }

    fn upsert_water(&mut self, entry: WaterEntry) -> Result<(), TrackerError> {
        self.water.insert(entry.date, entry);
        Ok(())
    }

    fn sleep(&self, date: NaiveDate) -> Result<Option<SleepEntry>, TrackerError> {
        Ok(self.sleep.get(&date).cloned())
    }

    fn sleeps(&self) -> Result<Vec<SleepEntry>, TrackerError> {
        Ok(self.sleep.values().cloned().collect())
    }

    fn upsert_sleep(&mut self, entry: SleepEntry) -> Result<(), TrackerError> {
        self.sleep.insert(entry.date, entry);
        Ok(())
    }

    fn weights(&self) -> Result<Vec<WeightEntry>, TrackerError> {
        Ok(self.weight.clone())
    }

    fn append_weight(&mut self, entry: WeightEntry) -> Result<(), TrackerError> {
        self.weight.push(entry);
        Ok(())
    }

    fn preferences(&self) -> Result<UserPreferences, TrackerError> {
        Ok(self.preferences.clone().unwrap_or_default())
    }

    fn put_preferences(&mut self, prefs: UserPreferences) -> Result<(), TrackerError> {
        self.preferences = Some(prefs);
        Ok(())
    }

    fn reset_statistics(&mut self) -> Result<(), TrackerError> {
        self.activity.clear();
        self.water.clear();
        self.sleep.clear();
        self.weight.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActivityType;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn make_activity(day: u32, steps: u32) -> ActivityEntry {
        ActivityEntry {
            date: date(day),
            steps,
            distance_km: 0.0,
            calories: 0,
            duration_minutes: 0,
            activity_type: ActivityType::Walking,
        }
    }

    #[test]
    fn test_upsert_replaces_same_date() {
        let mut store = MemoryStore::new();
        store.upsert_activity(make_activity(20, 1_000)).unwrap();
        store.upsert_activity(make_activity(20, 5_000)).unwrap();

        let entry = store.activity(date(20)).unwrap().unwrap();
        assert_eq!(entry.steps, 5_000);
        assert_eq!(store.activities().unwrap().len(), 1);
    }

    #[test]
    fn test_activities_chronological() {
        let mut store = MemoryStore::new();
        store.upsert_activity(make_activity(20, 1)).unwrap();
        store.upsert_activity(make_activity(18, 2)).unwrap();
        store.upsert_activity(make_activity(19, 3)).unwrap();

        let dates: Vec<NaiveDate> = store
            .activities()
            .unwrap()
            .iter()
            .map(|e| e.date)
            .collect();
        assert_eq!(dates, vec![date(18), date(19), date(20)]);
    }

    #[test]
    fn test_weight_appends_allow_same_day() {
        let mut store = MemoryStore::new();
        for weight_kg in [80.0, 79.5] {
            store
                .append_weight(WeightEntry {
                    id: Uuid::new_v4(),
                    date: date(20),
                    weight_kg,
                })
                .unwrap();
        }
        let weights = store.weights().unwrap();
        assert_eq!(weights.len(), 2);
        assert_eq!(weights[0].weight_kg, 80.0);
        assert_eq!(weights[1].weight_kg, 79.5);
    }

    #[test]
    fn test_preferences_default_when_absent() {
        let store = MemoryStore::new();
        assert_eq!(store.preferences().unwrap(), UserPreferences::default());
    }

    #[test]
    fn test_reset_keeps_preferences() {
        let mut store = MemoryStore::new();
        store.upsert_activity(make_activity(20, 1_000)).unwrap();
        store
            .put_preferences(UserPreferences {
                steps_goal: 12_000,
                ..Default::default()
            })
            .unwrap();

        store.reset_statistics().unwrap();

        assert_eq!(store.record_count(), 0);
        assert_eq!(store.preferences().unwrap().steps_goal, 12_000);
    }

    #[test]
    fn test_json_round_trip() {
        let mut store = MemoryStore::new();
        store.upsert_activity(make_activity(20, 7_500)).unwrap();

        let json = store.to_json().unwrap();
        let loaded = MemoryStore::from_json(&json).unwrap();

        assert_eq!(
            loaded.activity(date(20)).unwrap().unwrap().steps,
            7_500
        );
    }
}
