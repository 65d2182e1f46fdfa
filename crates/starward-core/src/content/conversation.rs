//! Conversations shown when a mission NPC completes its objective.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use starward_logic::format;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationDef {
    #[serde(default)]
    pub name: String,
    pub paragraphs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub paragraphs: Vec<String>,
}

impl Conversation {
    pub fn new(paragraphs: Vec<String>) -> Self {
        Self { paragraphs }
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.iter().all(|p| p.is_empty())
    }

    /// A copy with every `<key>` substituted.
    pub fn substitute(&self, subs: &BTreeMap<String, String>) -> Conversation {
        Conversation {
            paragraphs: self
                .paragraphs
                .iter()
                .map(|p| format::replace(p, subs))
                .collect(),
        }
    }
}
