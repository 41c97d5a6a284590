use crate::group::ReleaseGroup;
use serde::Serialize;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Cancelled,
    Completed,
}

/// Structured event for the external notification bus. Fire-and-forget:
/// no acknowledgement, no ordering guarantee.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub kind: EventKind,
    pub message: String,
    pub group: serde_json::Value,
}

impl Notification {
    pub fn cancelled(message: impl Into<String>, group: &ReleaseGroup) -> Self {
        Self::new(EventKind::Cancelled, message, group)
    }

    pub fn completed(message: impl Into<String>, group: &ReleaseGroup) -> Self {
        Self::new(EventKind::Completed, message, group)
    }

    fn new(kind: EventKind, message: impl Into<String>, group: &ReleaseGroup) -> Self {
        Self {
            kind,
            message: message.into(),
            group: serde_json::to_value(group).unwrap_or(serde_json::Value::Null),
        }
    }
}

pub trait NotificationBus {
    fn publish(&self, event: Notification);
}

/// Bus that logs each event as a structured line; stands in for the real
/// transport when none is wired up.
#[derive(Debug, Default)]
pub struct TracingBus;

impl NotificationBus for TracingBus {
    fn publish(&self, event: Notification) {
        match serde_json::to_string(&event) {
            Ok(payload) => tracing::info!(target: "reelsort::events", "{payload}"),
            Err(e) => tracing::warn!("failed to serialize notification: {e}"),
        }
    }
}

/// Bus that records events for inspection in tests.
#[derive(Debug, Default)]
pub struct RecordingBus {
    events: Mutex<Vec<Notification>>,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Notification> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl NotificationBus for RecordingBus {
    fn publish(&self, event: Notification) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event);
        }
    }
}
