//! The player: their fleet, location, accepted missions and conditions.

use std::collections::BTreeMap;

use hecs::Entity;

use crate::components::{GovernmentId, SystemId};
use crate::systems::Mission;

/// Condition set once the player has learned to salvage efficiently.
pub const MECHANIC: &str = "mechanic";

#[derive(Debug, Default)]
pub struct Player {
    pub flagship: Option<Entity>,
    pub ships: Vec<Entity>,
    pub system: Option<SystemId>,
    pub government: GovernmentId,
    pub missions: Vec<Mission>,
    /// Named counters earned through play, such as skills.
    pub conditions: BTreeMap<String, i64>,
    pub dead: bool,
}

impl Player {
    pub fn new(government: GovernmentId) -> Self {
        Self {
            government,
            ..Default::default()
        }
    }

    /// Add a ship to the player's fleet. The first ship becomes the flagship.
    pub fn add_ship(&mut self, ship: Entity) {
        if !self.ships.contains(&ship) {
            self.ships.push(ship);
        }
        if self.flagship.is_none() {
            self.flagship = Some(ship);
        }
    }

    /// Value of a condition. Unset conditions are zero.
    pub fn condition(&self, name: &str) -> i64 {
        self.conditions.get(name).copied().unwrap_or(0)
    }

    pub fn owns(&self, ship: Entity) -> bool {
        self.ships.contains(&ship)
    }
}
