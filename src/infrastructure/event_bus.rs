use crate::domain::events::{EventListener, MarketEvent};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Event bus carrying pipeline and countdown events to presentation listeners.
///
/// Passed by reference into whatever publishes or subscribes; there is no
/// global instance.
pub struct EventBus {
    listeners: Arc<RwLock<Vec<Arc<dyn EventListener>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Subscribe a listener to events
    pub async fn subscribe(&self, listener: Arc<dyn EventListener>) {
        self.listeners.write().await.push(listener);
    }

    /// Publish an event to all listeners
    pub async fn publish(&self, event: MarketEvent) {
        let listeners = self.listeners.read().await;
        for listener in listeners.iter() {
            listener.on_event(&event);
        }
    }

    /// Get count of subscribers (for testing)
    pub async fn subscriber_count(&self) -> usize {
        self.listeners.read().await.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            listeners: Arc::clone(&self.listeners),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::LoggingListener;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingListener {
        count: Arc<AtomicUsize>,
    }

    impl EventListener for CountingListener {
        fn on_event(&self, _event: &MarketEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_event_bus_subscribe() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count().await, 0);

        bus.subscribe(Arc::new(LoggingListener)).await;
        assert_eq!(bus.subscriber_count().await, 1);

        bus.subscribe(Arc::new(LoggingListener)).await;
        assert_eq!(bus.subscriber_count().await, 2);
    }

    #[tokio::test]
    async fn test_event_bus_publish() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));

        bus.subscribe(Arc::new(CountingListener {
            count: Arc::clone(&count),
        }))
        .await;

        let event = MarketEvent::CountdownTick {
            progress_percent: 50,
            remaining: "00:30:00".to_string(),
        };

        bus.publish(event).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_event_bus_multiple_listeners() {
        let bus = EventBus::new();

        let count1 = Arc::new(AtomicUsize::new(0));
        let count2 = Arc::new(AtomicUsize::new(0));

        bus.subscribe(Arc::new(CountingListener {
            count: Arc::clone(&count1),
        }))
        .await;
        bus.subscribe(Arc::new(CountingListener {
            count: Arc::clone(&count2),
        }))
        .await;

        let event = MarketEvent::SnapshotFailed {
            reason: "test".to_string(),
        };

        bus.publish(event).await;

        assert_eq!(count1.load(Ordering::SeqCst), 1);
        assert_eq!(count2.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_event_bus_clone() {
        let bus1 = EventBus::new();
        let bus2 = bus1.clone();

        bus1.subscribe(Arc::new(LoggingListener)).await;

        // Clone should share the same listeners
        assert_eq!(bus2.subscriber_count().await, 1);
    }
}
