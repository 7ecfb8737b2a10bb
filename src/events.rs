//! Change notification channel
//!
//! Writes through the engine publish a [`ChangeEvent`] to explicitly
//! registered subscribers. This replaces an ambient application-wide
//! broadcast: every subscriber is registered and removed through this
//! channel, and delivery is synchronous on the writing call.

use chrono::NaiveDate;

/// What changed in the record store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    ActivityChanged(NaiveDate),
    WaterChanged(NaiveDate),
    SleepChanged(NaiveDate),
    WeightAdded(NaiveDate),
    PreferencesUpdated,
    StatisticsReset,
}

/// Handle returned by [`ChangeNotifier::subscribe`], used to unsubscribe
pub type SubscriptionId = u64;

/// Registry of change subscribers
#[derive(Default)]
pub struct ChangeNotifier {
    subscribers: Vec<(SubscriptionId, Box<dyn Fn(&ChangeEvent)>)>,
    next_id: SubscriptionId,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber; it is invoked on every subsequent event
    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: Fn(&ChangeEvent) + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Remove a subscriber; returns false when the id is unknown
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    /// Deliver an event to every subscriber, in subscription order
    pub fn emit(&self, event: &ChangeEvent) {
        for (_, subscriber) in &self.subscribers {
            subscriber(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_subscribers_receive_events() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = ChangeNotifier::new();

        let sink = Rc::clone(&seen);
        notifier.subscribe(move |event| sink.borrow_mut().push(*event));

        notifier.emit(&ChangeEvent::PreferencesUpdated);
        notifier.emit(&ChangeEvent::StatisticsReset);

        assert_eq!(
            *seen.borrow(),
            vec![ChangeEvent::PreferencesUpdated, ChangeEvent::StatisticsReset]
        );
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let seen = Rc::new(RefCell::new(0u32));
        let mut notifier = ChangeNotifier::new();

        let sink = Rc::clone(&seen);
        let id = notifier.subscribe(move |_| *sink.borrow_mut() += 1);

        notifier.emit(&ChangeEvent::PreferencesUpdated);
        assert!(notifier.unsubscribe(id));
        notifier.emit(&ChangeEvent::PreferencesUpdated);

        assert_eq!(*seen.borrow(), 1);
        assert!(!notifier.unsubscribe(id));
    }

    #[test]
    fn test_multiple_subscribers() {
        let mut notifier = ChangeNotifier::new();
        let first = Rc::new(RefCell::new(0u32));
        let second = Rc::new(RefCell::new(0u32));

        let sink = Rc::clone(&first);
        notifier.subscribe(move |_| *sink.borrow_mut() += 1);
        let sink = Rc::clone(&second);
        notifier.subscribe(move |_| *sink.borrow_mut() += 1);

        notifier.emit(&ChangeEvent::StatisticsReset);

        assert_eq!(*first.borrow(), 1);
        assert_eq!(*second.borrow(), 1);
        assert_eq!(notifier.subscriber_count(), 2);
    }
}
