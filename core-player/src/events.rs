//! # Player Event System
//!
//! Delivers playback notifications to subscribers using
//! `tokio::sync::broadcast`, so emission never blocks the controller and slow
//! subscribers never stall fast ones.
//!
//! ## Delivery Order
//!
//! Per track identity, subscribers observe zero or more
//! [`PlayerEvent::PositionChanged`] followed by exactly one of
//! [`PlayerEvent::FinishedPlaying`] or [`PlayerEvent::StoppedPlaying`]. No
//! position is delivered for an identity after its terminal event.
//!
//! ## Error Handling
//!
//! `tokio::sync::broadcast` produces two receive errors:
//!
//! - `RecvError::Lagged(n)`: the subscriber fell behind by `n` events.
//!   Non-fatal; the subscriber keeps receiving newer events.
//! - `RecvError::Closed`: all senders are gone. Treat as shutdown.

use crate::traits::TrackPosition;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// Balances memory usage with the ability to absorb bursts of events.
/// Subscribers that cannot keep up receive `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Event Types
// ============================================================================

/// Notifications emitted by the playback controller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PlayerEvent {
    /// The track finished playing on its own.
    FinishedPlaying {
        /// Identity of the track that finished.
        track_id: String,
    },
    /// The track stopped playing but was not finished.
    StoppedPlaying {
        /// Identity of the track that was stopped.
        track_id: String,
    },
    /// The position in the current track changed.
    PositionChanged {
        /// Identity of the track whose position changed.
        track_id: String,
        /// Snapshot of duration and current offset.
        position: TrackPosition,
    },
}

impl PlayerEvent {
    /// Event type as a string, for filtering and logging.
    pub fn event_type(&self) -> &str {
        match self {
            PlayerEvent::FinishedPlaying { .. } => "FinishedPlaying",
            PlayerEvent::StoppedPlaying { .. } => "StoppedPlaying",
            PlayerEvent::PositionChanged { .. } => "PositionChanged",
        }
    }

    /// The track identity carried by this event.
    pub fn track_id(&self) -> &str {
        match self {
            PlayerEvent::FinishedPlaying { track_id }
            | PlayerEvent::StoppedPlaying { track_id }
            | PlayerEvent::PositionChanged { track_id, .. } => track_id,
        }
    }

    /// Returns `true` for the per-track terminal events.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PlayerEvent::FinishedPlaying { .. } | PlayerEvent::StoppedPlaying { .. }
        )
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central bus for publishing and subscribing to player events.
///
/// Uses `tokio::sync::broadcast` internally, which provides:
/// - Multiple producers (clone the `EventBus`)
/// - Multiple consumers (each `subscribe()` creates a new receiver)
/// - Non-blocking sends (events are cloned per subscriber)
/// - Lagging detection for slow subscribers
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<PlayerEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer capacity.
    ///
    /// A subscriber that falls behind by more than `capacity` events receives
    /// `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an error
    /// if there are none.
    pub fn emit(&self, event: PlayerEvent) -> Result<usize, SendError<PlayerEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber receiving all future events.
    ///
    /// Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<PlayerEvent> {
        self.sender.subscribe()
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

/// Type alias for event filter functions.
type EventFilter = Box<dyn Fn(&PlayerEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with optional filtering.
pub struct EventStream {
    receiver: Receiver<PlayerEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    /// Creates a new event stream from a receiver.
    pub fn new(receiver: Receiver<PlayerEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Adds a filter; only matching events are returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&PlayerEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n`
    /// events, and `RecvError::Closed` when all senders are dropped.
    pub async fn recv(&mut self) -> Result<PlayerEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;

            let Some(filter) = &self.filter else {
                return Ok(event);
            };

            if filter(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive a matching event without blocking.
    ///
    /// Returns `None` if no matching event is currently available.
    pub fn try_recv(&mut self) -> Option<Result<PlayerEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    let Some(filter) = &self.filter else {
                        return Some(Ok(event));
                    };

                    if filter(&event) {
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
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
