//! Warning and error notifications
//!
//! Other components subscribe a callback to a channel and are called
//! synchronously, on the logging thread, whenever a warning or error is logged.

use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, RwLock};

use uuid::Uuid;

use super::format::Severity;

/// Notification channel. There is no channel for plain logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Warning,
    Error,
}

impl Channel {
    /// Channel a severity publishes to, if any
    pub fn for_severity(severity: Severity) -> Option<Channel> {
        match severity {
            Severity::Info => None,
            Severity::Warning => Some(Channel::Warning),
            Severity::Error => Some(Channel::Error),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Warning => f.write_str("warning"),
            Channel::Error => f.write_str("error"),
        }
    }
}

/// Handle identifying a subscription, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

type Callback = Arc<dyn Fn(&str) + Send + Sync>;

/// Per-channel ordered subscriber lists
#[derive(Default)]
pub struct NotificationBus {
    /// Channel entries are created on first subscription
    channels: RwLock<HashMap<Channel, Vec<(SubscriptionId, Callback)>>>,
}

impl fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationBus")
            .field("warning_subscribers", &self.subscriber_count(Channel::Warning))
            .field("error_subscribers", &self.subscriber_count(Channel::Error))
            .finish()
    }
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback; callbacks run in subscription order
    pub fn subscribe<F>(&self, channel: Channel, callback: F) -> SubscriptionId
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let id = SubscriptionId(Uuid::new_v4());
        let mut channels = self
            .channels
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        channels
            .entry(channel)
            .or_default()
            .push((id, Arc::new(callback)));
        id
    }

    /// Remove a subscription. Returns false if it was not subscribed.
    pub fn unsubscribe(&self, channel: Channel, id: SubscriptionId) -> bool {
        let mut channels = self
            .channels
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match channels.get_mut(&channel) {
            Some(subscribers) => {
                let before = subscribers.len();
                subscribers.retain(|(existing, _)| *existing != id);
                subscribers.len() != before
            }
            None => false,
        }
    }

    /// Number of callbacks subscribed to a channel
    pub fn subscriber_count(&self, channel: Channel) -> usize {
        self.channels
            .read()
            .map(|channels| channels.get(&channel).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    /// Call every subscriber of `channel` with `message`
    ///
    /// A panicking callback is reported and skipped; the rest still run.
    /// Returns how many callbacks completed normally.
    pub fn publish(&self, channel: Channel, message: &str) -> usize {
        // Snapshot so callbacks can (un)subscribe without deadlocking
        let subscribers: Vec<Callback> = {
            let channels = self
                .channels
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            channels
                .get(&channel)
                .map(|subs| subs.iter().map(|(_, callback)| Arc::clone(callback)).collect())
                .unwrap_or_default()
        };

        let mut delivered = 0;
        for callback in subscribers {
            match panic::catch_unwind(AssertUnwindSafe(|| callback(message))) {
                Ok(()) => delivered += 1,
                Err(payload) => {
                    tracing::warn!(
                        "{} notification subscriber panicked: {}",
                        channel,
                        panic_message(payload.as_ref())
                    );
                }
            }
        }
        delivered
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) + Send + Sync + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |message: &str| sink.lock().unwrap().push(message.to_string()))
    }

    #[test]
    fn test_channel_for_severity() {
        assert_eq!(Channel::for_severity(Severity::Info), None);
        assert_eq!(Channel::for_severity(Severity::Warning), Some(Channel::Warning));
        assert_eq!(Channel::for_severity(Severity::Error), Some(Channel::Error));
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = NotificationBus::new();
        assert_eq!(bus.publish(Channel::Error, "nobody listens"), 0);
        assert_eq!(bus.subscriber_count(Channel::Error), 0);
    }

    #[test]
    fn test_publish_reaches_only_its_channel() {
        let bus = NotificationBus::new();
        let (warnings, on_warning) = recorder();
        let (errors, on_error) = recorder();
        bus.subscribe(Channel::Warning, on_warning);
        bus.subscribe(Channel::Error, on_error);

        assert_eq!(bus.publish(Channel::Warning, "disk low"), 1);

        assert_eq!(*warnings.lock().unwrap(), vec!["disk low".to_string()]);
        assert!(errors.lock().unwrap().is_empty());
    }

    #[test]
    fn test_subscribers_run_in_subscription_order() {
        let bus = NotificationBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for index in 0..5 {
            let order = Arc::clone(&order);
            bus.subscribe(Channel::Error, move |_| order.lock().unwrap().push(index));
        }

        bus.publish(Channel::Error, "x");
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_unsubscribe() {
        let bus = NotificationBus::new();
        let (seen, callback) = recorder();
        let id = bus.subscribe(Channel::Warning, callback);

        assert!(bus.unsubscribe(Channel::Warning, id));
        assert!(!bus.unsubscribe(Channel::Warning, id));
        assert!(!bus.unsubscribe(Channel::Error, id));

        bus.publish(Channel::Warning, "ignored");
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(bus.subscriber_count(Channel::Warning), 0);
    }

    #[test]
    fn test_panicking_subscriber_does_not_stop_others() {
        let bus = NotificationBus::new();
        let (before, first) = recorder();
        let (after, last) = recorder();

        bus.subscribe(Channel::Error, first);
        bus.subscribe(Channel::Error, |_| panic!("subscriber failure"));
        bus.subscribe(Channel::Error, last);

        assert_eq!(bus.publish(Channel::Error, "boom"), 2);
        assert_eq!(before.lock().unwrap().len(), 1);
        assert_eq!(after.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_subscriber_may_subscribe_during_publish() {
        let bus = Arc::new(NotificationBus::new());
        let inner_bus = Arc::clone(&bus);

        bus.subscribe(Channel::Warning, move |_| {
            inner_bus.subscribe(Channel::Warning, |_| {});
        });

        assert_eq!(bus.publish(Channel::Warning, "grow"), 1);
        assert_eq!(bus.subscriber_count(Channel::Warning), 2);
    }
}
