//! Mission NPC state tracking.
//!
//! An [`Npc`] is an instantiated template: a set of ships plus the record of
//! every event that has happened to each of them. Success and failure are
//! computed from those records on demand. Failure latches: once an NPC has
//! failed it stays failed even if a later event would have satisfied it.
//!
//! A ship captured by the player keeps living in the world under its new
//! owner; the NPC only remembers that it was captured and treats it as gone.

use std::collections::HashMap;

use hecs::{Entity, World};
use log::{debug, info};
use starward_logic::events::{Conditions, ShipEventType};

use super::events::{Messages, ShipEvent, UiRequest, UiStack};
use super::ships;
use crate::components::*;
use crate::content::Conversation;

pub const MISSION_FAILED: &str = "Mission failed.";

/// What the NPC knows about one of its ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackedStatus {
    Active,
    /// Taken by someone; the entity now belongs to the captor.
    CapturedElsewhere,
    /// Landed for good.
    Landed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipRecord {
    pub actions: ShipEventType,
    pub status: TrackedStatus,
    /// Where the ship was when last seen by this NPC.
    pub last_system: Option<SystemId>,
}

impl ShipRecord {
    pub fn new(actions: ShipEventType, last_system: Option<SystemId>) -> Self {
        Self {
            actions,
            status: TrackedStatus::Active,
            last_system,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NpcStatus {
    InProgress,
    Succeeded,
    Failed,
    /// The player has lost track of ships they were meant to accompany.
    LeftBehind,
}

/// Change caused by a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NpcTransition {
    None,
    Failed,
    Succeeded,
}

#[derive(Debug, Clone, Default)]
pub struct Npc {
    pub(crate) conditions: Conditions,
    pub(crate) government: GovernmentId,
    pub(crate) personality: Personality,
    pub(crate) system: Option<SystemId>,
    /// System of the mission's destination planet.
    pub(crate) destination: Option<SystemId>,
    pub(crate) waypoints: Vec<SystemId>,
    pub(crate) patrol: bool,
    pub(crate) stopovers: Vec<PlanetId>,
    pub(crate) visit: bool,
    pub(crate) dialog: String,
    pub(crate) conversation: Option<Conversation>,
    pub(crate) ships: Vec<Entity>,
    pub(crate) records: HashMap<Entity, ShipRecord>,
    pub(crate) failed: bool,
}

impl Npc {
    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }

    pub fn government(&self) -> GovernmentId {
        self.government
    }

    pub fn personality(&self) -> &Personality {
        &self.personality
    }

    /// System the ships were placed in.
    pub fn system(&self) -> Option<SystemId> {
        self.system
    }

    pub fn waypoints(&self) -> &[SystemId] {
        &self.waypoints
    }

    pub fn is_patrol(&self) -> bool {
        self.patrol
    }

    pub fn stopovers(&self) -> &[PlanetId] {
        &self.stopovers
    }

    pub fn dialog(&self) -> &str {
        &self.dialog
    }

    pub fn conversation(&self) -> Option<&Conversation> {
        self.conversation.as_ref()
    }

    /// Ships still tracked. Landed ships drop out of this list.
    pub fn ships(&self) -> &[Entity] {
        &self.ships
    }

    pub fn record(&self, ship: Entity) -> Option<&ShipRecord> {
        self.records.get(&ship)
    }

    pub fn actions(&self, ship: Entity) -> ShipEventType {
        self.records
            .get(&ship)
            .map(|record| record.actions)
            .unwrap_or_default()
    }

    fn ship_system(&self, world: &World, ship: Entity) -> Option<SystemId> {
        let record = self.records.get(&ship);
        match record.map(|r| r.status) {
            Some(TrackedStatus::Active) | None => {
                ships::effective_system(world, ship).or(record.and_then(|r| r.last_system))
            }
            Some(_) => record.and_then(|r| r.last_system),
        }
    }

    fn is_captured_or_disabled(&self, world: &World, ship: Entity) -> bool {
        let captured = self.records.get(&ship).is_some_and(|record| {
            record.status == TrackedStatus::CapturedElsewhere
                || record.actions.contains(ShipEventType::CAPTURE)
        });
        captured || ships::status(world, ship).is_disabled()
    }

    /// Apply an event. Events about ships this NPC does not track are ignored.
    ///
    /// A newly failed NPC posts "Mission failed." when `visible`. A newly
    /// succeeded one pushes its conversation, or failing that its dialog,
    /// onto `ui` when one is given.
    pub fn do_event(
        &mut self,
        event: &ShipEvent,
        world: &World,
        player_system: Option<SystemId>,
        ui: Option<&mut UiStack>,
        messages: &mut Messages,
        visible: bool,
    ) -> NpcTransition {
        let target = event.target;
        if !self.ships.contains(&target) {
            return NpcTransition::None;
        }

        let mut kind = event.kind;
        let seen_in = ships::effective_system(world, target);
        {
            let record = self
                .records
                .entry(target)
                .or_insert_with(|| ShipRecord::new(ShipEventType::empty(), seen_in));
            if seen_in.is_some() {
                record.last_system = seen_in;
            }
            if kind.contains(ShipEventType::CAPTURE) {
                record.status = TrackedStatus::CapturedElsewhere;
                kind |= ShipEventType::DESTROY;
            }
        }

        let had_succeeded = self.has_succeeded(world, player_system);
        let had_failed = self.has_failed(world);

        self.add_actions(target, kind, seen_in);
        for carried in ships::carried_ships(world, target) {
            let system = ships::effective_system(world, carried);
            self.add_actions(carried, kind, system);
        }
        if self.evaluate_failure(world) {
            self.failed = true;
        }

        let mut transition = NpcTransition::None;
        if self.failed && !had_failed {
            transition = NpcTransition::Failed;
            info!("Mission NPC failed after {:?} on {}", kind, ships::name(world, target));
            if visible {
                messages.add(MISSION_FAILED);
            }
        } else if !had_succeeded && self.has_succeeded(world, player_system) {
            transition = NpcTransition::Succeeded;
            info!("Mission NPC succeeded after {:?} on {}", kind, ships::name(world, target));
            if let Some(ui) = ui {
                match &self.conversation {
                    Some(conversation) if !conversation.is_empty() => {
                        ui.push(UiRequest::Conversation(conversation.clone()));
                    }
                    _ if !self.dialog.is_empty() => {
                        ui.push(UiRequest::Dialog(self.dialog.clone()));
                    }
                    _ => {}
                }
            }
        }

        if kind.contains(ShipEventType::LAND) {
            if let Some(record) = self.records.get_mut(&target) {
                record.status = TrackedStatus::Landed;
            }
            self.ships.retain(|&ship| ship != target);
            debug!("Mission ship {:?} landed and is no longer tracked", target);
        }

        transition
    }

    fn add_actions(&mut self, ship: Entity, kind: ShipEventType, seen_in: Option<SystemId>) {
        self.records
            .entry(ship)
            .or_insert_with(|| ShipRecord::new(ShipEventType::empty(), seen_in))
            .actions |= kind;
    }

    fn evaluate_failure(&self, world: &World) -> bool {
        let conditions = &self.conditions;
        self.records.iter().any(|(&ship, record)| {
            if conditions.violated_by(record.actions) {
                return true;
            }
            if !record.actions.contains(ShipEventType::LAND) || self.visit {
                return false;
            }
            match self.ship_system(world, ship) {
                Some(system) => {
                    let at_destination = Some(system) == self.destination;
                    (conditions.must_accompany && !at_destination)
                        || (conditions.must_evade && at_destination)
                }
                None => false,
            }
        })
    }

    /// Whether any ship has suffered a forbidden event, or can no longer
    /// meet its objective.
    pub fn has_failed(&self, world: &World) -> bool {
        self.failed || self.evaluate_failure(world)
    }

    /// Whether every tracked ship meets the objective.
    ///
    /// For "evade" every ship must be elsewhere, captured, or disabled; for
    /// "accompany" every ship must be here and flying. On top of that every
    /// ship must have accumulated all the required events.
    pub fn has_succeeded(&self, world: &World, player_system: Option<SystemId>) -> bool {
        if self.has_failed(world) {
            return false;
        }

        let conditions = &self.conditions;
        if conditions.must_evade || conditions.must_accompany {
            for &ship in &self.ships {
                let system = self.ship_system(world, ship);
                let is_here = system.is_none() || system == player_system;
                let with_player = is_here && !self.is_captured_or_disabled(world, ship);
                if with_player != conditions.must_accompany {
                    return false;
                }
            }
        }

        self.ships
            .iter()
            .all(|&ship| conditions.satisfied_by(self.actions(ship)))
    }

    /// Whether the player has abandoned ships they were meant to accompany.
    pub fn is_left_behind(&self, world: &World, player_system: Option<SystemId>) -> bool {
        if self.has_failed(world) {
            return true;
        }
        if !self.conditions.must_accompany {
            return false;
        }
        self.ships.iter().any(|&ship| {
            self.is_captured_or_disabled(world, ship)
                || self.ship_system(world, ship) != player_system
        })
    }

    pub fn status(&self, world: &World, player_system: Option<SystemId>) -> NpcStatus {
        if self.has_failed(world) {
            NpcStatus::Failed
        } else if self.has_succeeded(world, player_system) {
            NpcStatus::Succeeded
        } else if self.is_left_behind(world, player_system) {
            NpcStatus::LeftBehind
        } else {
            NpcStatus::InProgress
        }
    }
}
