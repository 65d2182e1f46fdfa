//! Ship components: identity, crew, hull, loadout, fuel, location, bays.

use std::collections::{BTreeMap, BTreeSet};

use hecs::Entity;
use serde::{Deserialize, Serialize};

use super::common::{Attributes, GovernmentId, OutfitId, PlanetId, SystemId};

/// Fraction of maximum hull below which a ship is disabled.
pub const DISABLED_HULL_FRACTION: f64 = 0.15;

/// Hull repaired on capture, as a multiple of the disabled threshold.
pub const CAPTURE_REPAIR_FACTOR: f64 = 1.5;

/// Name and model of a ship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipIdentity {
    pub name: String,
    pub model: String,
}

impl ShipIdentity {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Crew currently aboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crew {
    pub count: u32,
}

/// Hull integrity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hull {
    pub current: f64,
    pub maximum: f64,
}

impl Hull {
    pub fn full(maximum: f64) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    /// Hull below which the ship is disabled.
    pub fn minimum(&self) -> f64 {
        self.maximum * DISABLED_HULL_FRACTION
    }

    /// Patch the hull to just above the disabled threshold, never lowering it.
    pub fn repair_for_capture(&mut self) {
        let patched = self.minimum() * CAPTURE_REPAIR_FACTOR;
        self.current = self.current.max(patched).min(self.maximum);
    }
}

/// Whether a ship is still flying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipStatus {
    #[default]
    Active,
    Disabled,
    Destroyed,
    /// Landed for good; the ship has left play.
    Landed,
}

impl ShipStatus {
    /// Disabled or worse: the ship cannot move on its own.
    pub fn is_disabled(&self) -> bool {
        matches!(self, ShipStatus::Disabled | ShipStatus::Destroyed)
    }
}

/// Who controls a ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Npc,
}

/// The government a ship flies for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allegiance(pub GovernmentId);

/// How a ship appeared in its system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arrival {
    /// Already present when the player arrives.
    #[default]
    Placed,
    /// Jumping in from a neighbouring system.
    Entering { from: Option<SystemId> },
}

/// Where a ship is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// `None` for a ship that is not in any system (e.g. carried in a bay).
    pub system: Option<SystemId>,
    pub planet: Option<PlanetId>,
    pub arrival: Arrival,
}

impl Location {
    pub fn in_system(system: SystemId) -> Self {
        Self {
            system: Some(system),
            ..Default::default()
        }
    }
}

/// Installed outfits and the attributes they add up to, together with the
/// hull's base attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Loadout {
    pub outfits: BTreeMap<OutfitId, u32>,
    pub attributes: Attributes,
}

impl Loadout {
    pub fn with_base(attributes: Attributes) -> Self {
        Self {
            outfits: BTreeMap::new(),
            attributes,
        }
    }

    pub fn count(&self, outfit: OutfitId) -> u32 {
        self.outfits.get(&outfit).copied().unwrap_or(0)
    }

    pub fn attribute(&self, name: &str) -> f64 {
        self.attributes.get(name)
    }

    /// Install `count` copies. Capacity is the caller's concern.
    pub fn install(&mut self, outfit: OutfitId, outfit_attributes: &Attributes, count: u32) {
        if count == 0 {
            return;
        }
        *self.outfits.entry(outfit).or_insert(0) += count;
        self.attributes.add_scaled(outfit_attributes, count as f64);
    }

    /// Uninstall up to `count` copies, returning how many were removed.
    pub fn uninstall(
        &mut self,
        outfit: OutfitId,
        outfit_attributes: &Attributes,
        count: u32,
    ) -> u32 {
        let installed = self.count(outfit);
        let removed = installed.min(count);
        if removed == 0 {
            return 0;
        }
        if removed == installed {
            self.outfits.remove(&outfit);
        } else {
            self.outfits.insert(outfit, installed - removed);
        }
        self.attributes.add_scaled(outfit_attributes, -(removed as f64));
        removed
    }
}

/// Jump fuel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Fuel {
    pub current: f64,
    pub capacity: f64,
    /// Fuel used by one hyperspace jump.
    pub jump_cost: f64,
}

impl Fuel {
    pub fn full(capacity: f64, jump_cost: f64) -> Self {
        Self {
            current: capacity,
            capacity,
            jump_cost,
        }
    }

    pub fn jumps_remaining(&self) -> u32 {
        if self.jump_cost <= 0.0 {
            return if self.capacity > 0.0 { u32::MAX } else { 0 };
        }
        (self.current / self.jump_cost).floor() as u32
    }

    /// Fuel needed to be able to make one more jump.
    pub fn jump_fuel_missing(&self) -> f64 {
        (self.jump_cost - self.current).max(0.0)
    }

    /// Whether this ship can give `other` enough fuel for one jump and still
    /// make a jump itself.
    pub fn can_refuel(&self, other: &Fuel) -> bool {
        self.current - other.jump_fuel_missing() >= self.jump_cost
    }
}

/// Ships carried in this ship's bays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bays {
    pub capacity: u32,
    pub carried: Vec<Entity>,
}

impl Bays {
    pub fn has_room(&self) -> bool {
        (self.carried.len() as u32) < self.capacity
    }
}

/// Marks a ship that can ride in a carrier's bay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Carried {
    pub carrier: Entity,
}

/// Systems to travel through and planets to stop at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    pub waypoints: Vec<SystemId>,
    pub patrol: bool,
    pub stopovers: Vec<PlanetId>,
}

/// Behaviour keywords.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personality {
    flags: BTreeSet<String>,
}

impl Personality {
    /// Keywords the AI understands.
    pub const KNOWN: &'static [&'static str] = &[
        "pacifist", "forbearing", "timid", "disables", "plunders", "heroic", "staying",
        "entering", "nemesis", "surveillance", "uninterested", "waiting", "derelict",
        "fleeing", "escort", "frugal", "coward", "vindictive", "swarming", "lingering",
        "daring", "secretive", "ramming", "mining", "harvests", "appeasing", "mute",
        "opportunistic", "merciful", "target", "marked", "launching",
    ];

    pub fn from_flags<'a>(flags: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            flags: flags.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn has(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    /// Jumps into its system instead of starting there.
    pub fn is_entering(&self) -> bool {
        self.has("entering")
    }

    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(String::as_str)
    }
}

/// Marks a ship that belongs to a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Special;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_repair_never_lowers_hull() {
        let mut hull = Hull {
            current: 10.0,
            maximum: 1000.0,
        };
        hull.repair_for_capture();
        assert_eq!(hull.current, 225.0);

        let mut healthy = Hull::full(1000.0);
        healthy.repair_for_capture();
        assert_eq!(healthy.current, 1000.0);
    }

    #[test]
    fn test_loadout_install_and_uninstall() {
        let mut attrs = Attributes::new();
        attrs.set("outfit space", -5.0);
        let mut base = Attributes::new();
        base.set("outfit space", 20.0);
        let mut loadout = Loadout::with_base(base);

        loadout.install(OutfitId(3), &attrs, 2);
        assert_eq!(loadout.count(OutfitId(3)), 2);
        assert_eq!(loadout.attribute("outfit space"), 10.0);

        assert_eq!(loadout.uninstall(OutfitId(3), &attrs, 5), 2);
        assert_eq!(loadout.count(OutfitId(3)), 0);
        assert_eq!(loadout.attribute("outfit space"), 20.0);
    }

    #[test]
    fn test_fuel_refuel_check() {
        let donor = Fuel {
            current: 250.0,
            capacity: 400.0,
            jump_cost: 100.0,
        };
        let stranded = Fuel {
            current: 20.0,
            capacity: 300.0,
            jump_cost: 100.0,
        };
        assert_eq!(stranded.jumps_remaining(), 0);
        assert_eq!(stranded.jump_fuel_missing(), 80.0);
        assert!(donor.can_refuel(&stranded));

        let poor = Fuel {
            current: 150.0,
            ..donor
        };
        assert!(!poor.can_refuel(&stranded));
    }
}
