//! The plunder ledger: everything a boarding party can carry off.
//!
//! The ledger mirrors the victim's cargo and plunderable outfits, priced and
//! sorted by value per ton. Taking or salvaging updates the ledger and both
//! ships together so the listing never drifts from what is actually aboard.

use std::collections::BTreeSet;

use hecs::{Entity, World};
use log::debug;
use rand::Rng;
use starward_logic::plunder::{
    merge_outfit_listings, roll_salvage, sort_plunder, InstalledStack, Plunder,
};

use crate::components::*;
use crate::content::{Content, Outfit};

/// Result of breaking down one outfit.
#[derive(Debug, Clone, PartialEq)]
pub struct SalvageOutcome {
    pub salvaged: OutfitId,
    pub yields: Vec<(OutfitId, u32)>,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct PlunderLedger {
    items: Vec<Plunder<OutfitId>>,
}

/// Second-hand value of one outfit.
pub fn unit_value(outfit: &Outfit, depreciation: f64) -> i64 {
    (outfit.cost as f64 * depreciation).round() as i64
}

fn outfit_plunder(outfit: &Outfit, count: u32, depreciation: f64) -> Plunder<OutfitId> {
    Plunder::outfit(
        outfit.id,
        outfit.name.clone(),
        count,
        unit_value(outfit, depreciation),
        outfit.mass,
    )
}

/// Whether any outfit installed on `ship` fires `ammo`.
pub fn is_ammo_for(world: &World, content: &Content, ship: Entity, ammo: OutfitId) -> bool {
    world.get::<&Loadout>(ship).is_ok_and(|loadout| {
        loadout
            .outfits
            .keys()
            .filter_map(|&id| content.outfits.get(id))
            .any(|outfit| outfit.ammo == Some(ammo))
    })
}

/// Ammunition used by `ship`'s installed weapons.
pub fn used_ammo(world: &World, content: &Content, ship: Entity) -> BTreeSet<OutfitId> {
    world
        .get::<&Loadout>(ship)
        .map(|loadout| {
            loadout
                .outfits
                .keys()
                .filter_map(|&id| content.outfits.get(id))
                .filter_map(|outfit| outfit.ammo)
                .collect()
        })
        .unwrap_or_default()
}

/// How many copies of `outfit` could be installed on `ship`, up to `count`.
pub fn installable(world: &World, ship: Entity, outfit: &Outfit, count: u32) -> u32 {
    world
        .get::<&Loadout>(ship)
        .map(|loadout| loadout.attributes.can_add(&outfit.attributes, count))
        .unwrap_or(0)
}

impl PlunderLedger {
    /// List the victim's commodities at `market` prices and its plunderable outfits.
    pub fn for_victim(
        world: &World,
        content: &Content,
        victim: Entity,
        market: Option<SystemId>,
        depreciation: f64,
    ) -> Self {
        let market = market.and_then(|id| content.galaxy.system(id));
        let mut items = Vec::new();

        let cargo_outfits: Vec<(OutfitId, u32)> = match world.get::<&CargoHold>(victim) {
            Ok(cargo) => {
                for (name, count) in cargo.commodities() {
                    let price = market.map(|s| s.trade_price(name)).unwrap_or(0);
                    items.push(Plunder::commodity(name, count, price));
                }
                cargo.outfits().collect()
            }
            Err(_) => Vec::new(),
        };

        let installed: Vec<InstalledStack<OutfitId>> = world
            .get::<&Loadout>(victim)
            .map(|loadout| {
                loadout
                    .outfits
                    .iter()
                    .map(|(&key, &count)| InstalledStack {
                        key,
                        count,
                        unplunderable: content
                            .outfits
                            .get(key)
                            .is_some_and(|outfit| outfit.is_unplunderable()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        for (id, count) in merge_outfit_listings(&installed, &cargo_outfits) {
            if let Some(outfit) = content.outfits.get(id) {
                items.push(outfit_plunder(outfit, count, depreciation));
            }
        }

        sort_plunder(&mut items);
        Self { items }
    }

    pub fn items(&self) -> &[Plunder<OutfitId>] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Plunder<OutfitId>> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether at least one unit fits: in the cargo hold, or installed as
    /// ammunition for one of `you`'s weapons.
    pub fn can_take(&self, index: usize, world: &World, content: &Content, you: Entity) -> bool {
        let Some(item) = self.items.get(index) else {
            return false;
        };
        let free = world.get::<&CargoHold>(you).map(|c| c.free()).unwrap_or(0.0);
        if item.unit_mass() <= free {
            return true;
        }
        match item.outfit_key().and_then(|id| content.outfits.get(id)) {
            Some(outfit) => {
                is_ammo_for(world, content, you, outfit.id)
                    && installable(world, you, outfit, 1) > 0
            }
            None => false,
        }
    }

    /// Whether the item is an outfit `you` knows how to break down.
    pub fn can_salvage(&self, index: usize, world: &World, content: &Content, you: Entity) -> bool {
        let Some(outfit) = self
            .items
            .get(index)
            .and_then(|item| item.outfit_key())
            .and_then(|id| content.outfits.get(id))
        else {
            return false;
        };
        world
            .get::<&Loadout>(you)
            .is_ok_and(|loadout| outfit.can_be_salvaged_by(&loadout.attributes))
    }

    /// Move as much of an item as fits from `victim` to `you`.
    ///
    /// Outfits listed in `used_ammo` are installed first as far as capacity
    /// allows; the rest go into the cargo hold. The victim gives up cargo
    /// copies before installed ones. Returns the number of units moved.
    pub fn take(
        &mut self,
        index: usize,
        world: &World,
        content: &Content,
        you: Entity,
        victim: Entity,
        used_ammo: &BTreeSet<OutfitId>,
    ) -> u32 {
        let Some(item) = self.items.get(index) else {
            return 0;
        };
        let count = item.count();

        let taken = match item.outfit_key().and_then(|id| content.outfits.get(id)) {
            Some(outfit) => take_outfit(world, outfit, count, you, victim, used_ammo),
            None => take_commodity(world, item.name(), count, you, victim),
        };

        if taken >= count {
            self.items.remove(index);
        } else {
            self.items[index].take(taken);
        }
        sort_plunder(&mut self.items);
        taken
    }

    /// Break one unit of an outfit down into components.
    ///
    /// The components are stowed in the victim's hold regardless of its free
    /// space and merged into the ledger, where they can be taken like any
    /// other outfit. A mechanic recovers one extra unit of any component
    /// that rolled short of its maximum.
    #[allow(clippy::too_many_arguments)]
    pub fn salvage(
        &mut self,
        index: usize,
        world: &World,
        content: &Content,
        you: Entity,
        victim: Entity,
        depreciation: f64,
        has_mechanic: bool,
        rng: &mut impl Rng,
    ) -> Option<SalvageOutcome> {
        if !self.can_salvage(index, world, content, you) {
            return None;
        }
        let outfit = self.items[index]
            .outfit_key()
            .and_then(|id| content.outfits.get(id))?;
        let tools = world
            .get::<&Loadout>(you)
            .map(|loadout| loadout.attributes.clone())
            .unwrap_or_default();

        if self.items[index].count() <= 1 {
            self.items.remove(index);
        } else {
            self.items[index].take(1);
        }
        let from_cargo = world
            .get::<&mut CargoHold>(victim)
            .map(|mut cargo| cargo.remove_outfit(outfit.id, outfit.mass, 1))
            .unwrap_or(0);
        if from_cargo == 0 {
            if let Ok(mut loadout) = world.get::<&mut Loadout>(victim) {
                loadout.uninstall(outfit.id, &outfit.attributes, 1);
            }
        }

        let yields = roll_salvage(&outfit.salvage_components(&tools), has_mechanic, rng);

        if let Ok(mut cargo) = world.get::<&mut CargoHold>(victim) {
            let capacity = cargo.capacity();
            cargo.set_capacity(None);
            for &(id, count) in &yields {
                let mass = content.outfits.get(id).map(|o| o.mass).unwrap_or(0.0);
                cargo.add_outfit(id, mass, count);
            }
            cargo.set_capacity(capacity);
        }

        for &(id, count) in &yields {
            match self.items.iter_mut().find(|p| p.outfit_key() == Some(id)) {
                Some(existing) => existing.add(count),
                None => {
                    if let Some(component) = content.outfits.get(id) {
                        self.items.push(outfit_plunder(component, count, depreciation));
                    }
                }
            }
        }
        sort_plunder(&mut self.items);

        let message = salvage_message(content, outfit, &yields);
        debug!("{}", message);
        Some(SalvageOutcome {
            salvaged: outfit.id,
            yields,
            message,
        })
    }
}

fn take_outfit(
    world: &World,
    outfit: &Outfit,
    count: u32,
    you: Entity,
    victim: Entity,
    used_ammo: &BTreeSet<OutfitId>,
) -> u32 {
    let mut taken = 0;
    if used_ammo.contains(&outfit.id) {
        taken = installable(world, you, outfit, count);
        if let Ok(mut loadout) = world.get::<&mut Loadout>(you) {
            loadout.install(outfit.id, &outfit.attributes, taken);
        }
    }
    if let Ok(mut cargo) = world.get::<&mut CargoHold>(you) {
        taken += cargo.add_outfit(outfit.id, outfit.mass, count - taken);
    }

    let from_cargo = world
        .get::<&mut CargoHold>(victim)
        .map(|mut cargo| cargo.remove_outfit(outfit.id, outfit.mass, taken))
        .unwrap_or(0);
    if taken > from_cargo {
        if let Ok(mut loadout) = world.get::<&mut Loadout>(victim) {
            loadout.uninstall(outfit.id, &outfit.attributes, taken - from_cargo);
        }
    }
    taken
}

fn take_commodity(world: &World, name: &str, count: u32, you: Entity, victim: Entity) -> u32 {
    let free = world.get::<&CargoHold>(you).map(|c| c.free()).unwrap_or(0.0);
    let room = if free.is_infinite() {
        count
    } else {
        count.min(free.max(0.0).floor() as u32)
    };
    let removed = world
        .get::<&mut CargoHold>(victim)
        .map(|mut cargo| cargo.remove_commodity(name, room))
        .unwrap_or(0);
    world
        .get::<&mut CargoHold>(you)
        .map(|mut cargo| cargo.add_commodity(name, removed))
        .unwrap_or(0)
}

fn salvage_message(content: &Content, outfit: &Outfit, yields: &[(OutfitId, u32)]) -> String {
    if yields.is_empty() {
        return format!("You salvaged 1 {} into nothing of value.", outfit.name);
    }
    let mut lines: Vec<(&str, u32)> = yields
        .iter()
        .filter_map(|&(id, count)| {
            content
                .outfits
                .get(id)
                .map(|component| (component.display_name(count), count))
        })
        .collect();
    lines.sort_by(|a, b| a.0.cmp(b.0));

    let mut message = format!("You salvaged 1 {} into:", outfit.name);
    for (name, count) in lines {
        message.push_str(&format!("\n\t{} {}", count, name));
    }
    message
}
