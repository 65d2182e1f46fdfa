//! Accepted missions and the NPCs they own.

use std::collections::BTreeMap;

use hecs::World;
use rand::Rng;
use starward_logic::format;

use super::events::{Messages, ShipEvent, UiStack};
use super::instantiate::{instantiate_npc, MissionEnds};
use super::npc::{Npc, NpcTransition};
use crate::components::SystemId;
use crate::content::{Content, MissionTemplate};

#[derive(Debug, Clone)]
pub struct Mission {
    name: String,
    description: String,
    ends: MissionEnds,
    npcs: Vec<Npc>,
    visible: bool,
}

impl Mission {
    /// Instantiate every NPC of `template`.
    ///
    /// `<origin>`, `<system>` and `<planet>` are available to NPC text, as is
    /// `<npc>` once the first NPC with ships has been placed.
    pub fn instantiate(
        template: &MissionTemplate,
        world: &mut World,
        content: &Content,
        ends: MissionEnds,
        rng: &mut impl Rng,
    ) -> Self {
        let galaxy = &content.galaxy;
        let mut subs = BTreeMap::new();
        subs.insert("<origin>".to_string(), galaxy.system_name(ends.origin).to_string());
        subs.insert(
            "<planet>".to_string(),
            galaxy.planet_name(ends.destination).to_string(),
        );
        if let Some(system) = galaxy.planet_system(ends.destination) {
            subs.insert("<system>".to_string(), galaxy.system_name(system).to_string());
        }

        let mut npcs = Vec::with_capacity(template.npcs.len());
        for npc in &template.npcs {
            npcs.push(instantiate_npc(npc, world, content, ends, &mut subs, rng));
        }

        Self {
            name: template.name.clone(),
            description: format::replace(&template.description, &subs),
            ends,
            npcs,
            visible: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn ends(&self) -> MissionEnds {
        self.ends
    }

    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Pass an event to every NPC.
    pub fn do_event(
        &mut self,
        event: &ShipEvent,
        world: &World,
        player_system: Option<SystemId>,
        ui: &mut UiStack,
        messages: &mut Messages,
    ) -> Vec<NpcTransition> {
        let visible = self.visible;
        self.npcs
            .iter_mut()
            .map(|npc| npc.do_event(event, world, player_system, Some(&mut *ui), messages, visible))
            .collect()
    }

    pub fn has_failed(&self, world: &World) -> bool {
        self.npcs.iter().any(|npc| npc.has_failed(world))
    }

    /// Whether every NPC objective is met.
    pub fn npcs_succeeded(&self, world: &World, player_system: Option<SystemId>) -> bool {
        self.npcs
            .iter()
            .all(|npc| npc.has_succeeded(world, player_system))
    }

    pub fn is_left_behind(&self, world: &World, player_system: Option<SystemId>) -> bool {
        self.npcs
            .iter()
            .any(|npc| npc.is_left_behind(world, player_system))
    }
}
