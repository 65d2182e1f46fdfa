//! Mission templates: a named group of NPCs.

use serde::{Deserialize, Serialize};

use super::npc::{NpcDefinition, NpcTemplate};
use super::Content;
use crate::error::ContentError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionDef {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub npcs: Vec<NpcDefinition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MissionTemplate {
    pub name: String,
    pub description: String,
    pub npcs: Vec<NpcTemplate>,
}

impl MissionTemplate {
    pub fn load(def: &MissionDef, content: &Content) -> Result<Self, ContentError> {
        Ok(Self {
            name: def.name.clone(),
            description: def.description.clone(),
            npcs: def
                .npcs
                .iter()
                .map(|npc| NpcTemplate::load(npc, content))
                .collect::<Result<_, _>>()?,
        })
    }
}
