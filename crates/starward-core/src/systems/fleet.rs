//! Fleet spawning and placement.

use hecs::{Entity, World};
use rand::seq::SliceRandom;
use rand::Rng;

use super::ships::{load_into_bay, spawn_ship};
use crate::components::*;
use crate::content::{Fleet, Galaxy, OutfitCatalog};

/// Spawn one randomly chosen variant of `fleet`.
///
/// Ships that can ride in a bay are loaded into the first carrier of the
/// group with room; the rest fly free. Returns every spawned ship, carried
/// ones included.
pub fn spawn_fleet(
    world: &mut World,
    outfits: &OutfitCatalog,
    fleet: &Fleet,
    default_government: GovernmentId,
    rng: &mut impl Rng,
) -> Vec<Entity> {
    let Some(variant) = fleet.choose_variant(rng) else {
        return Vec::new();
    };
    let government = fleet.government.unwrap_or(default_government);

    let mut spawned = Vec::with_capacity(variant.ships.len());
    for (i, model) in variant.ships.iter().enumerate() {
        let name = fleet
            .names
            .get(i)
            .cloned()
            .unwrap_or_else(|| format!("{} {}", model.name, i + 1));
        let ship = spawn_ship(world, outfits, model, name, Owner::Npc, government);
        if let Ok(mut personality) = world.get::<&mut Personality>(ship) {
            *personality = fleet.personality.clone();
        }
        spawned.push((ship, model.carried));
    }

    let carriers: Vec<Entity> = spawned
        .iter()
        .filter(|(ship, _)| world.get::<&Bays>(*ship).is_ok_and(|b| b.capacity > 0))
        .map(|(ship, _)| *ship)
        .collect();
    for &(ship, carried) in &spawned {
        if !carried {
            continue;
        }
        for &carrier in &carriers {
            if carrier != ship && load_into_bay(world, carrier, ship) {
                break;
            }
        }
    }

    spawned.into_iter().map(|(ship, _)| ship).collect()
}

/// Put a ship in `system`, either already present or jumping in from a
/// random neighbour. Ships riding in a bay stay where they are.
pub fn place_ship(
    world: &World,
    galaxy: &Galaxy,
    ship: Entity,
    system: SystemId,
    entering: bool,
    rng: &mut impl Rng,
) {
    if world.get::<&Carried>(ship).is_ok() {
        return;
    }
    let arrival = if entering {
        let from = galaxy
            .system(system)
            .and_then(|s| s.links.choose(rng).copied());
        Arrival::Entering { from }
    } else {
        Arrival::Placed
    };
    if let Ok(mut location) = world.get::<&mut Location>(ship) {
        *location = Location {
            system: Some(system),
            planet: None,
            arrival,
        };
    }
}
