//! Engine - main entry point tying content, the ship world, and the player together

use std::collections::{HashMap, VecDeque};

use hecs::{Entity, World};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use starward_logic::events::ShipEventType;

use crate::components::*;
use crate::config::EngineConfig;
use crate::content::Content;
use crate::error::ContentError;
use crate::player::Player;
use crate::systems::ships::{self, spawn_ship};
use crate::systems::*;

/// Owns every ship, the loaded content, the player, and the one random
/// source all rolls draw from.
pub struct Engine {
    /// ECS world containing all ships
    pub world: World,
    pub content: Content,
    pub config: EngineConfig,
    pub player: Player,
    /// Panels waiting to be shown
    pub ui: UiStack,
    /// Flight log
    pub messages: Messages,
    /// Standing with each government. Starts at zero.
    pub reputation: HashMap<GovernmentId, f64>,
    /// Recent events handled, oldest first, up to `config.event_history`
    pub event_log: VecDeque<ShipEvent>,
    pub(crate) rng: StdRng,
}

impl Engine {
    pub fn new(content: Content, config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let player = Player::new(content.player_government);
        Self {
            world: World::new(),
            content,
            config,
            player,
            ui: UiStack::new(),
            messages: Messages::default(),
            reputation: HashMap::new(),
            event_log: VecDeque::new(),
            rng,
        }
    }

    /// Spawn a ship for the player in `system`. The first one becomes the flagship.
    pub fn spawn_player_ship(
        &mut self,
        model: &str,
        name: &str,
        system: SystemId,
    ) -> Result<Entity, ContentError> {
        let model = self.content.ships.require(model)?;
        let ship = spawn_ship(
            &mut self.world,
            &self.content.outfits,
            model,
            name,
            Owner::Player,
            self.player.government,
        );
        if let Ok(mut location) = self.world.get::<&mut Location>(ship) {
            *location = Location::in_system(system);
        }
        self.player.add_ship(ship);
        if self.player.system.is_none() {
            self.player.system = Some(system);
        }
        Ok(ship)
    }

    /// Spawn a free-flying NPC ship.
    pub fn spawn_ship(
        &mut self,
        model: &str,
        name: &str,
        government: &str,
        system: SystemId,
    ) -> Result<Entity, ContentError> {
        let model = self.content.ships.require(model)?;
        let government = self.content.governments.require(government)?;
        let ship = spawn_ship(
            &mut self.world,
            &self.content.outfits,
            model,
            name,
            Owner::Npc,
            government,
        );
        if let Ok(mut location) = self.world.get::<&mut Location>(ship) {
            *location = Location::in_system(system);
        }
        Ok(ship)
    }

    /// Accept a mission, instantiating its NPCs. Returns its index in the
    /// player's mission list.
    pub fn accept_mission(
        &mut self,
        name: &str,
        origin: SystemId,
        destination: PlanetId,
    ) -> Result<usize, ContentError> {
        let template = self.content.mission(name)?;
        let mission = Mission::instantiate(
            template,
            &mut self.world,
            &self.content,
            MissionEnds {
                origin,
                destination,
            },
            &mut self.rng,
        );
        info!("Accepted mission \"{}\"", name);
        self.player.missions.push(mission);
        Ok(self.player.missions.len() - 1)
    }

    /// Board `victim` with the flagship. Reports the boarding to missions
    /// before the encounter opens.
    pub fn board(&mut self, victim: Entity) -> Option<BoardingEncounter> {
        let flagship = self.player.flagship?;
        self.handle_event(ShipEvent::new(Some(flagship), victim, ShipEventType::BOARD));
        BoardingEncounter::new(self, victim)
    }

    /// Route an event to every mission.
    pub fn handle_event(&mut self, event: ShipEvent) {
        debug!(
            "Ship event {:?} on {}",
            event.kind,
            ships::name(&self.world, event.target)
        );
        self.event_log.push_back(event);
        while self.event_log.len() > self.config.event_history {
            self.event_log.pop_front();
        }
        let player_system = self.player.system;
        for mission in &mut self.player.missions {
            mission.do_event(
                &event,
                &self.world,
                player_system,
                &mut self.ui,
                &mut self.messages,
            );
        }
    }

    /// Lower the player's standing with `government` for `count` instances
    /// of an event. Only captures carry a penalty.
    pub fn offend(&mut self, government: GovernmentId, kind: ShipEventType, count: u32) {
        if !kind.contains(ShipEventType::CAPTURE) || count == 0 {
            return;
        }
        let penalty = self
            .content
            .governments
            .get(government)
            .and_then(|g| g.capture_penalty)
            .unwrap_or(self.config.capture_penalty);
        let standing = self.reputation.entry(government).or_insert(0.0);
        *standing -= penalty * count as f64;
        info!(
            "{} offended: reputation now {:.2}",
            self.content.governments.name(government),
            *standing
        );
    }

    pub fn reputation(&self, government: GovernmentId) -> f64 {
        self.reputation.get(&government).copied().unwrap_or(0.0)
    }

    /// Move the player (and their flagship) to another system.
    pub fn travel_to(&mut self, system: SystemId) {
        self.player.system = Some(system);
        if let Some(flagship) = self.player.flagship {
            if let Ok(mut location) = self.world.get::<&mut Location>(flagship) {
                location.system = Some(system);
            }
        }
    }
}
