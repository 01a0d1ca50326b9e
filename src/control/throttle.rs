use log::{debug, error, info};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

use crate::drivers::Notifier;
use crate::models::Metric;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    Suppressed,
}

/// Per-category rate limit for outbound alerts.
///
/// Suppressed alerts are dropped, not queued. The window is claimed before
/// dispatch, so concurrent callers for one category dispatch at most once.
#[derive(Debug, Default)]
pub struct AlertThrottle {
    last_sent: Mutex<HashMap<Metric, Instant>>,
}

impl AlertThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claim the window for `category` if it is open.
    pub fn try_acquire(&self, category: Metric, window: Duration) -> bool {
        let now = Instant::now();
        let mut last_sent = self
            .last_sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        match last_sent.get(&category) {
            Some(sent_at) if now.duration_since(*sent_at) < window => false,
            _ => {
                last_sent.insert(category, now);
                true
            }
        }
    }

    /// Send `message` unless another alert of this category went out within `window`.
    ///
    /// A failed dispatch still consumes the window; it is logged, not retried.
    pub async fn try_send<N: Notifier>(
        &self,
        notifier: &N,
        category: Metric,
        message: &str,
        window: Duration,
    ) -> SendOutcome {
        if !self.try_acquire(category, window) {
            debug!("{} alert suppressed: {}", category.name(), message);
            return SendOutcome::Suppressed;
        }

        match notifier.send(message).await {
            Ok(()) => info!("Sent {} alert: {}", category.name(), message),
            Err(e) => error!("{} alert not delivered: {}", category.name(), e),
        }
        SendOutcome::Sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotificationError;
    use std::sync::Arc;

    #[derive(Default)]
    struct CountingNotifier {
        sent: Mutex<Vec<String>>,
    }

    impl Notifier for CountingNotifier {
        async fn send(&self, text: &str) -> Result<(), NotificationError> {
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    const WINDOW: Duration = Duration::from_secs(1800);

    #[tokio::test(start_paused = true)]
    async fn second_alert_within_window_is_dropped() {
        let throttle = AlertThrottle::new();
        let notifier = CountingNotifier::default();

        let first = throttle
            .try_send(&notifier, Metric::Temperature, "cold", WINDOW)
            .await;
        tokio::time::advance(Duration::from_secs(60)).await;
        let second = throttle
            .try_send(&notifier, Metric::Temperature, "still cold", WINDOW)
            .await;

        assert_eq!(first, SendOutcome::Sent);
        assert_eq!(second, SendOutcome::Suppressed);
        assert_eq!(*notifier.sent.lock().unwrap(), vec!["cold".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn window_reopens_after_it_elapses() {
        let throttle = AlertThrottle::new();
        let notifier = CountingNotifier::default();

        throttle
            .try_send(&notifier, Metric::Humidity, "dry", WINDOW)
            .await;
        tokio::time::advance(WINDOW).await;
        let again = throttle
            .try_send(&notifier, Metric::Humidity, "dry again", WINDOW)
            .await;

        assert_eq!(again, SendOutcome::Sent);
        assert_eq!(notifier.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn categories_are_throttled_independently() {
        let throttle = AlertThrottle::new();
        let notifier = CountingNotifier::default();

        let t = throttle
            .try_send(&notifier, Metric::Temperature, "hot", WINDOW)
            .await;
        let h = throttle
            .try_send(&notifier, Metric::Humidity, "wet", WINDOW)
            .await;

        assert_eq!((t, h), (SendOutcome::Sent, SendOutcome::Sent));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_callers_dispatch_once() {
        let throttle = Arc::new(AlertThrottle::new());
        let notifier = Arc::new(CountingNotifier::default());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let throttle = Arc::clone(&throttle);
                let notifier = Arc::clone(&notifier);
                tokio::spawn(async move {
                    throttle
                        .try_send(&*notifier, Metric::Temperature, &format!("alert {}", i), WINDOW)
                        .await
                })
            })
            .collect();

        let mut sent = 0;
        for handle in handles {
            if handle.await.unwrap() == SendOutcome::Sent {
                sent += 1;
            }
        }
        assert_eq!(sent, 1);
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);
    }
}
