//! Domain event bus
//!
//! Services emit events after a write commits. The logging listener turns
//! them into structured `tracing` records; other listeners (reminder mailers,
//! analytics) can subscribe the same way.

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, trace};

/// Events emitted by services
#[derive(Debug, Clone, PartialEq)]
pub enum GenmaveEvent {
    SurveySubmitted {
        user_id: String,
        compass_id: String,
        clarity_score: u8,
    },

    ChallengeStarted {
        user_id: String,
        id: String,
        skill_id: String,
    },
    ChallengeAbandoned {
        user_id: String,
        id: String,
        skill_id: String,
        current_day: u8,
    },
    ChallengeDayCompleted {
        user_id: String,
        id: String,
        day: u8,
    },
    ChallengeCompleted {
        user_id: String,
        id: String,
        skill_id: String,
        feedback: String,
    },

    JournalSaved {
        user_id: String,
        id: String,
        created: bool,
    },
    JournalDeleted {
        user_id: String,
        id: String,
    },

    SettingsUpdated {
        user_id: String,
    },
    AccountErased {
        user_id: String,
        rows: usize,
    },
}

/// Trait for event listeners
pub trait EventListener: Send + Sync {
    fn on_event(&self, event: &GenmaveEvent);
}

/// Event bus for broadcasting domain events
pub struct EventBus {
    sender: broadcast::Sender<GenmaveEvent>,
}

impl EventBus {
    /// Create a new event bus with default capacity
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Emit an event to all subscribers
    pub fn emit(&self, event: GenmaveEvent) {
        trace!(event = ?event, "Emitting event");
        // No subscribers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GenmaveEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Logging event listener for audit trails
pub struct LoggingEventListener;

impl EventListener for LoggingEventListener {
    fn on_event(&self, event: &GenmaveEvent) {
        match event {
            GenmaveEvent::SurveySubmitted {
                user_id,
                compass_id,
                clarity_score,
            } => {
                info!(user_id = %user_id, compass_id = %compass_id, clarity_score, "Survey submitted");
            }
            GenmaveEvent::ChallengeStarted { user_id, id, skill_id } => {
                info!(user_id = %user_id, id = %id, skill_id = %skill_id, "Challenge started");
            }
            GenmaveEvent::ChallengeAbandoned {
                user_id,
                id,
                skill_id,
                current_day,
            } => {
                info!(user_id = %user_id, id = %id, skill_id = %skill_id, current_day, "Challenge abandoned");
            }
            GenmaveEvent::ChallengeDayCompleted { user_id, id, day } => {
                debug!(user_id = %user_id, id = %id, day, "Challenge day completed");
            }
            GenmaveEvent::ChallengeCompleted {
                user_id,
                id,
                skill_id,
                feedback,
            } => {
                info!(user_id = %user_id, id = %id, skill_id = %skill_id, feedback = %feedback, "Challenge completed");
            }
            GenmaveEvent::AccountErased { user_id, rows } => {
                info!(user_id = %user_id, rows, "Account erased");
            }
            _ => {
                trace!(event = ?event, "Event");
            }
        }
    }
}

/// Spawn a background task that logs all events
pub fn spawn_logging_listener(event_bus: Arc<EventBus>) -> tokio::task::JoinHandle<()> {
    let mut receiver = event_bus.subscribe();
    let listener = LoggingEventListener;

    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => listener.on_event(&event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    debug!(skipped = n, "Event listener lagged, skipped events");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("Event bus closed, stopping listener");
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{timeout, Duration};

    #[tokio::test]
    async fn test_event_bus_emit_receive() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.emit(GenmaveEvent::JournalDeleted {
            user_id: "u1".into(),
            id: "j1".into(),
        });

        let event = timeout(Duration::from_millis(100), rx.recv()).await.unwrap().unwrap();
        assert_eq!(
            event,
            GenmaveEvent::JournalDeleted {
                user_id: "u1".into(),
                id: "j1".into()
            }
        );
    }

    #[tokio::test]
    async fn test_emit_without_subscribers() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(), 0);
        bus.emit(GenmaveEvent::SettingsUpdated { user_id: "u1".into() });
    }

    #[tokio::test]
    async fn test_logging_listener_stops_when_bus_dropped() {
        let bus = Arc::new(EventBus::new());
        let handle = spawn_logging_listener(bus.clone());
        bus.emit(GenmaveEvent::AccountErased {
            user_id: "u1".into(),
            rows: 3,
        });
        drop(bus);
        timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
    }
}
