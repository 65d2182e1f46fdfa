//! Game content: the galaxy, catalogs, and mission templates.
//!
//! Everything here is loaded once from a JSON document and never changes
//! during play. Loading resolves every name to an id so later lookups cannot
//! fail.

mod conversation;
mod galaxy;
mod government;
mod location;
mod mission;
mod npc;
mod outfits;
mod ships;

pub use conversation::*;
pub use galaxy::*;
pub use government::*;
pub use location::*;
pub use mission::*;
pub use npc::*;
pub use outfits::*;
pub use ships::*;

use std::collections::HashMap;

use log::info;
use serde::{Deserialize, Serialize};

use crate::components::GovernmentId;
use crate::error::ContentError;

/// Top-level content document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentDef {
    pub governments: Vec<GovernmentDef>,
    /// Government of the player's ships, and of NPCs that name none.
    pub player_government: String,
    pub systems: Vec<SystemDef>,
    pub planets: Vec<PlanetDef>,
    pub outfits: Vec<OutfitDef>,
    pub ships: Vec<ShipModelDef>,
    pub fleets: Vec<FleetDef>,
    pub conversations: Vec<ConversationDef>,
    pub missions: Vec<MissionDef>,
}

#[derive(Debug, Clone, Default)]
pub struct Content {
    pub governments: Governments,
    pub player_government: GovernmentId,
    pub galaxy: Galaxy,
    pub outfits: OutfitCatalog,
    pub ships: ShipCatalog,
    pub fleets: HashMap<String, Fleet>,
    pub conversations: HashMap<String, Conversation>,
    pub missions: HashMap<String, MissionTemplate>,
}

impl Content {
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let def: ContentDef = serde_json::from_str(json)?;
        Self::from_def(&def)
    }

    pub fn from_def(def: &ContentDef) -> Result<Self, ContentError> {
        let governments = Governments::build(&def.governments)?;
        let player_government = governments.require(&def.player_government)?;
        let galaxy = Galaxy::build(&def.systems, &def.planets, &governments)?;
        let outfits = OutfitCatalog::build(&def.outfits)?;
        let ships = ShipCatalog::build(&def.ships, &outfits)?;

        let mut fleets = HashMap::new();
        for fleet in &def.fleets {
            let resolved = Fleet::resolve(fleet, &ships, &governments)?;
            if fleets.insert(fleet.name.clone(), resolved).is_some() {
                return Err(ContentError::Duplicate {
                    kind: "fleet",
                    name: fleet.name.clone(),
                });
            }
        }

        let conversations = def
            .conversations
            .iter()
            .map(|c| (c.name.clone(), Conversation::new(c.paragraphs.clone())))
            .collect();

        let mut content = Content {
            governments,
            player_government,
            galaxy,
            outfits,
            ships,
            fleets,
            conversations,
            missions: HashMap::new(),
        };

        // Missions are loaded last; their NPCs refer to everything above.
        for mission in &def.missions {
            let template = MissionTemplate::load(mission, &content)?;
            content.missions.insert(mission.name.clone(), template);
        }

        info!(
            "Loaded content: {} systems, {} outfits, {} ship models, {} fleets, {} missions",
            content.galaxy.systems().count(),
            content.outfits.len(),
            content.ships.len(),
            content.fleets.len(),
            content.missions.len()
        );
        Ok(content)
    }

    pub fn resolve_filter(&self, def: &LocationFilterDef) -> Result<LocationFilter, ContentError> {
        LocationFilter::resolve(def, &self.galaxy, &self.governments)
    }

    pub fn mission(&self, name: &str) -> Result<&MissionTemplate, ContentError> {
        self.missions
            .get(name)
            .ok_or_else(|| ContentError::NoMission(name.to_string()))
    }
}
