//! Ship events and the requests they raise toward the interface.

use hecs::Entity;
use serde::{Deserialize, Serialize};
use starward_logic::events::ShipEventType;

use crate::content::Conversation;

/// Something happened to a ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipEvent {
    /// Ship that caused the event, if any.
    pub actor: Option<Entity>,
    pub target: Entity,
    pub kind: ShipEventType,
}

impl ShipEvent {
    pub fn new(actor: Option<Entity>, target: Entity, kind: ShipEventType) -> Self {
        Self {
            actor,
            target,
            kind,
        }
    }
}

/// A panel the interface should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiRequest {
    Dialog(String),
    Conversation(Conversation),
}

/// Pending panels, oldest first.
#[derive(Debug, Clone, Default)]
pub struct UiStack {
    requests: Vec<UiRequest>,
}

impl UiStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, request: UiRequest) {
        self.requests.push(request);
    }

    pub fn requests(&self) -> &[UiRequest] {
        &self.requests
    }

    /// Take every pending request.
    pub fn drain(&mut self) -> Vec<UiRequest> {
        std::mem::take(&mut self.requests)
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// Flight log shown to the player.
#[derive(Debug, Clone, Default)]
pub struct Messages {
    lines: Vec<String>,
}

impl Messages {
    pub fn add(&mut self, message: impl Into<String>) {
        self.lines.push(message.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn contains(&self, message: &str) -> bool {
        self.lines.iter().any(|line| line == message)
    }
}
