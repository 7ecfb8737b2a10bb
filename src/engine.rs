//! Engine orchestration
//!
//! [`TrackerEngine`] is the write/read surface over a [`RecordStore`]:
//! it validates input, applies upsert-by-date semantics, keeps derived
//! activity fields coherent, publishes change events after confirmed
//! writes, and recomputes the dashboard snapshot on read.
//!
//! Failed writes leave prior state untouched: nothing is mutated before the
//! store confirms, so there is no rollback path.

use crate::error::TrackerError;
use crate::events::{ChangeEvent, ChangeNotifier};
use crate::metrics::{activity as activity_metrics, sleep as sleep_metrics};
use crate::snapshot::SnapshotEncoder;
use crate::store::{MemoryStore, RecordStore};
use crate::types::{
    ActivityEntry, DashboardSnapshot, SleepEntry, UserPreferences, WaterEntry, WaterSubEntry,
    WeightEntry,
};
use crate::validate;
use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

/// Stateful engine over a record store
pub struct TrackerEngine<S: RecordStore> {
    store: S,
    notifier: ChangeNotifier,
    encoder: SnapshotEncoder,
}

impl TrackerEngine<MemoryStore> {
    /// Engine over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }
}

impl<S: RecordStore> TrackerEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            notifier: ChangeNotifier::new(),
            encoder: SnapshotEncoder::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Subscription registry for change events
    pub fn notifier_mut(&mut self) -> &mut ChangeNotifier {
        &mut self.notifier
    }

    pub fn preferences(&self) -> Result<UserPreferences, TrackerError> {
        self.store.preferences()
    }

    /// Replace the preferences singleton
    pub fn update_preferences(&mut self, prefs: UserPreferences) -> Result<(), TrackerError> {
        validate::preferences(&prefs)?;
        self.store.put_preferences(prefs)?;
        self.notifier.emit(&ChangeEvent::PreferencesUpdated);
        Ok(())
    }

    /// The activity entry for a day, created empty on first access
    pub fn activity_for(&mut self, date: NaiveDate) -> Result<ActivityEntry, TrackerError> {
        if let Some(entry) = self.store.activity(date)? {
            return Ok(entry);
        }
        let entry = ActivityEntry::empty(date);
        self.store.upsert_activity(entry.clone())?;
        self.notifier.emit(&ChangeEvent::ActivityChanged(date));
        Ok(entry)
    }

    /// Set the day's step count, re-deriving distance and calories
    pub fn set_steps(&mut self, date: NaiveDate, steps: u32) -> Result<ActivityEntry, TrackerError> {
        validate::steps(steps)?;
        let height_cm = self.store.preferences()?.height_cm;

        let mut entry = self
            .store
            .activity(date)?
            .unwrap_or_else(|| ActivityEntry::empty(date));
        entry.steps = steps;
        entry.distance_km = activity_metrics::estimated_distance_km(steps, height_cm);
        entry.calories = activity_metrics::estimated_calories(steps);

        self.store.upsert_activity(entry.clone())?;
        self.notifier.emit(&ChangeEvent::ActivityChanged(date));
        Ok(entry)
    }

    /// Add (or, with a negative delta, remove) steps, saturating at zero
    pub fn add_steps(&mut self, date: NaiveDate, delta: i32) -> Result<ActivityEntry, TrackerError> {
        let current = self.store.activity(date)?.map_or(0, |e| e.steps);
        let updated = if delta >= 0 {
            current.saturating_add(delta as u32)
        } else {
            current.saturating_sub(delta.unsigned_abs())
        };
        self.set_steps(date, updated)
    }

    /// Full upsert of a day's activity record
    pub fn log_activity(&mut self, entry: ActivityEntry) -> Result<(), TrackerError> {
        validate::steps(entry.steps)?;
        let date = entry.date;
        self.store.upsert_activity(entry)?;
        self.notifier.emit(&ChangeEvent::ActivityChanged(date));
        Ok(())
    }

    /// Append a drink to the day, updating the running total
    pub fn add_water(
        &mut self,
        date: NaiveDate,
        time: NaiveTime,
        amount_ml: u32,
    ) -> Result<WaterEntry, TrackerError> {
        validate::drink_amount(amount_ml)?;
        let goal_ml = self.store.preferences()?.water_goal_ml;

        let mut entry = self
            .store
            .water(date)?
            .unwrap_or_else(|| WaterEntry::empty(date, goal_ml));
        entry.entries.push(WaterSubEntry {
            time,
            amount_ml,
            date,
        });
        entry.total_intake_ml = entry.total_intake_ml.saturating_add(amount_ml);

        self.store.upsert_water(entry.clone())?;
        self.notifier.emit(&ChangeEvent::WaterChanged(date));
        Ok(entry)
    }

    /// Remove the most recent drink of the day; returns it when present
    pub fn undo_last_water(
        &mut self,
        date: NaiveDate,
    ) -> Result<Option<WaterSubEntry>, TrackerError> {
        let Some(mut entry) = self.store.water(date)? else {
            return Ok(None);
        };
        let Some(removed) = entry.entries.pop() else {
            return Ok(None);
        };
        entry.total_intake_ml = entry.total_intake_ml.saturating_sub(removed.amount_ml);

        self.store.upsert_water(entry)?;
        self.notifier.emit(&ChangeEvent::WaterChanged(date));
        Ok(Some(removed))
    }

    /// Change the daily water goal: preferences and today's row together
    pub fn set_water_goal(&mut self, today: NaiveDate, goal_ml: u32) -> Result<(), TrackerError> {
        validate::water_goal(goal_ml)?;

        let mut prefs = self.store.preferences()?;
        prefs.water_goal_ml = goal_ml;
        self.store.put_preferences(prefs)?;

        if let Some(mut entry) = self.store.water(today)? {
            entry.daily_goal_ml = goal_ml;
            self.store.upsert_water(entry)?;
            self.notifier.emit(&ChangeEvent::WaterChanged(today));
        }
        self.notifier.emit(&ChangeEvent::PreferencesUpdated);
        Ok(())
    }

    /// Upsert the night attributed to `date`, preserving an existing id.
    ///
    /// When `hours` is absent it is derived from bedtime and wake time,
    /// crossing midnight when needed.
    pub fn log_sleep(
        &mut self,
        date: NaiveDate,
        hours: Option<f64>,
        quality: u8,
        bedtime: NaiveTime,
        wake_time: NaiveTime,
    ) -> Result<SleepEntry, TrackerError> {
        let hours = hours.unwrap_or_else(|| sleep_metrics::hours_between(bedtime, wake_time));
        validate::sleep_hours(hours)?;
        validate::sleep_quality(quality)?;

        let id = self
            .store
            .sleep(date)?
            .map_or_else(Uuid::new_v4, |existing| existing.id);

        let entry = SleepEntry {
            id,
            date,
            hours,
            quality,
            bedtime,
            wake_time,
        };
        self.store.upsert_sleep(entry.clone())?;
        self.notifier.emit(&ChangeEvent::SleepChanged(date));
        Ok(entry)
    }

    /// Append a weight measurement
    pub fn add_weight(&mut self, date: NaiveDate, weight_kg: f64) -> Result<WeightEntry, TrackerError> {
        validate::weight_kg(weight_kg)?;

        let entry = WeightEntry {
            id: Uuid::new_v4(),
            date,
            weight_kg,
        };
        self.store.append_weight(entry.clone())?;
        self.notifier.emit(&ChangeEvent::WeightAdded(date));
        Ok(entry)
    }

    /// Clear every record collection; preferences survive
    pub fn reset_statistics(&mut self) -> Result<(), TrackerError> {
        self.store.reset_statistics()?;
        self.notifier.emit(&ChangeEvent::StatisticsReset);
        Ok(())
    }

    /// Recompute the dashboard snapshot for `today` from confirmed state
    pub fn dashboard(&self, today: NaiveDate) -> Result<DashboardSnapshot, TrackerError> {
        let preferences = self.store.preferences()?;
        let activities = self.store.activities()?;
        let waters = self.store.waters()?;
        let sleeps = self.store.sleeps()?;
        let weights = self.store.weights()?;

        Ok(self.encoder.encode(
            &preferences,
            &activities,
            &waters,
            &sleeps,
            &weights,
            today,
        ))
    }
}
