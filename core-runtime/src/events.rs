//! # Event Bus System
//!
//! Broadcast channel used to surface core activity to host code, built on
//! `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! - **EventBus**: Cloneable publisher over a broadcast channel
//! - **EventStream**: Receiver wrapper with optional filtering
//!
//! The bus is generic over its payload so each core crate can publish its
//! own strongly-typed event enum (the playback core publishes `PlayerEvent`).
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::EventBus;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let bus: EventBus<String> = EventBus::new(16);
//! let mut subscriber = bus.subscribe();
//!
//! bus.emit("state changed".to_string()).ok();
//! assert_eq!(subscriber.recv().await.unwrap(), "state changed");
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: Subscriber was too slow and missed `n` events.
//!   Non-fatal; the subscriber keeps receiving newer events.
//! - **`RecvError::Closed`**: All senders have been dropped. Treat as shutdown.
//!
//! Publishing with no subscribers returns an error the publisher is free to
//! ignore; the playback core never treats it as a failure.

use std::fmt;
use tokio::sync::broadcast;

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// Subscribers that fall further behind than this receive `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

/// Central event bus for publishing and subscribing to events.
///
/// - Multiple producers (clone the `EventBus`)
/// - Multiple consumers (each `subscribe()` creates a new receiver)
/// - Non-blocking sends (events are cloned for each subscriber)
pub struct EventBus<E> {
    sender: broadcast::Sender<E>,
}

impl<E: Clone> EventBus<E> {
    /// Creates a new event bus buffering at most `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an error
    /// when nobody is listening.
    pub fn emit(&self, event: E) -> Result<usize, SendError<E>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<E> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<E: Clone> Default for EventBus<E> {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.sender.receiver_count())
            .finish()
    }
}

/// Type alias for event filter functions.
type EventFilter<E> = Box<dyn Fn(&E) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with optional filtering.
pub struct EventStream<E> {
    receiver: Receiver<E>,
    filter: Option<EventFilter<E>>,
}

impl<E: Clone> EventStream<E> {
    /// Creates a new event stream from a receiver.
    pub fn new(receiver: Receiver<E>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` are returned by `recv()`/`try_recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &E) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<E, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without waiting.
    ///
    /// Returns `None` if no matching events are currently available.
    pub fn try_recv(&mut self) -> Option<Result<E, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }

    /// Drains every matching event currently buffered.
    pub fn drain(&mut self) -> Vec<E> {
        let mut events = Vec::new();
        while let Some(Ok(event)) = self.try_recv() {
            events.push(event);
        }
        events
    }
}

impl<E> fmt::Debug for EventStream<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum TestEvent {
        State(&'static str),
        Progress(u64),
    }

    #[tokio::test]
    async fn test_event_bus_subscription() {
        let bus: EventBus<TestEvent> = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);

        let _sub1 = bus.subscribe();
        let _sub2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn test_event_emission_no_subscribers() {
        let bus = EventBus::new(10);
        assert!(bus.emit(TestEvent::State("idle")).is_err());
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(10);
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        assert_eq!(bus.emit(TestEvent::State("playing")).unwrap(), 2);

        assert_eq!(sub1.recv().await.unwrap(), TestEvent::State("playing"));
        assert_eq!(sub2.recv().await.unwrap(), TestEvent::State("playing"));
    }

    #[tokio::test]
    async fn test_event_stream_with_filter() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe())
            .filter(|event| matches!(event, TestEvent::State(_)));

        bus.emit(TestEvent::Progress(5)).ok();
        bus.emit(TestEvent::State("buffering")).ok();

        assert_eq!(stream.recv().await.unwrap(), TestEvent::State("buffering"));
    }

    #[tokio::test]
    async fn test_lagged_subscriber() {
        let bus = EventBus::new(2);
        let mut sub = bus.subscribe();

        for i in 0..5 {
            bus.emit(TestEvent::Progress(i)).ok();
        }

        assert!(matches!(sub.recv().await, Err(RecvError::Lagged(_))));
    }

    #[tokio::test]
    async fn test_try_recv_empty_and_drain() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe());
        assert!(stream.try_recv().is_none());

        bus.emit(TestEvent::State("loading")).ok();
        bus.emit(TestEvent::Progress(1)).ok();

        assert_eq!(
            stream.drain(),
            vec![TestEvent::State("loading"), TestEvent::Progress(1)]
        );
        assert!(stream.try_recv().is_none());
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let bus: EventBus<TestEvent> = EventBus::new(0);
        let _sub = bus.subscribe();
        assert!(bus.emit(TestEvent::Progress(0)).is_ok());
    }
}
