//! Event system for session notifications.
//!
//! ## Learning: Observer Pattern in Rust
//!
//! Rust's ownership model makes traditional observer patterns tricky.
//! We use `tokio::sync::broadcast` instead: events are values, every
//! subscriber gets its own copy, and nobody holds a reference into the
//! controller.

use runpad_piston::ExecutionOutcome;
use tokio::sync::broadcast;

use crate::catalog::LanguageId;
use crate::theme::Theme;

/// Things the UI may want to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The current language changed
    LanguageChanged(LanguageId),
    /// The theme changed (already persisted)
    ThemeChanged(Theme),
    /// The source text was replaced by the controller
    SourceChanged,
    /// Saved code for a language was discarded
    CodeReset(LanguageId),

    /// A run was submitted
    RunStarted { seq: u64 },
    /// A run resolved and its outcome was applied
    RunFinished { seq: u64, outcome: ExecutionOutcome },
    /// A run resolved after a newer one was issued and was dropped
    RunDiscarded { seq: u64 },
    /// A run was abandoned by its caller before it resolved
    RunCancelled { seq: u64 },
}

/// Event bus for broadcasting session events.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    pub fn new() -> Self {
        // Capacity of 256 events in the buffer
        let (sender, _) = broadcast::channel(256);
        Self { sender }
    }

    /// Emits an event to all subscribers.
    pub fn emit(&self, event: SessionEvent) {
        // No receivers is fine
        let _ = self.sender.send(event);
    }

    /// Subscribes to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper for processing events asynchronously.
///
/// ## Example
///
/// ```ignore
/// let mut handler = EventHandler::new(session.subscribe());
///
/// tokio::spawn(async move {
///     while let Some(event) = handler.next().await {
///         if let SessionEvent::RunFinished { outcome, .. } = event {
///             render(outcome);
///         }
///     }
/// });
/// ```
pub struct EventHandler {
    receiver: broadcast::Receiver<SessionEvent>,
}

impl EventHandler {
    pub fn new(receiver: broadcast::Receiver<SessionEvent>) -> Self {
        Self { receiver }
    }

    /// Waits for the next event. Returns `None` once the bus is gone.
    pub async fn next(&mut self) -> Option<SessionEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Event handler lagged, missed {} events", n);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
