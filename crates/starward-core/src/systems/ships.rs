//! Ship operations that span several components: spawning, capture,
//! ownership transfer, refuelling, and hand-to-hand weapon tallies.

use hecs::{Entity, World};
use log::debug;

use crate::components::*;
use crate::content::{OutfitCatalog, ShipModel};

/// Spawn a ship of `model` with a full hull, full tanks, and its required crew.
pub fn spawn_ship(
    world: &mut World,
    outfits: &OutfitCatalog,
    model: &ShipModel,
    name: impl Into<String>,
    owner: Owner,
    government: GovernmentId,
) -> Entity {
    let mut loadout = Loadout::with_base(model.base.clone());
    for &(id, count) in &model.outfits {
        if let Some(outfit) = outfits.get(id) {
            loadout.install(id, &outfit.attributes, count);
        }
    }
    let attributes = &loadout.attributes;
    let crew = Crew {
        count: attributes.get("required crew").max(0.0) as u32,
    };
    let hull = Hull::full(attributes.get("hull"));
    let cargo = CargoHold::new(attributes.get("cargo space"));
    let fuel = Fuel::full(attributes.get("fuel capacity"), attributes.get("jump fuel"));
    let bays = Bays {
        capacity: model.bays,
        carried: Vec::new(),
    };

    let entity = world.spawn((
        ShipIdentity::new(name, model.name.clone()),
        crew,
        hull,
        cargo,
        fuel,
        bays,
        loadout,
        Location::default(),
        ShipStatus::Active,
        owner,
        Allegiance(government),
        Personality::default(),
        Navigation::default(),
    ));
    debug!("Spawned {} ({:?})", model.name, entity);
    entity
}

pub fn name(world: &World, ship: Entity) -> String {
    world
        .get::<&ShipIdentity>(ship)
        .map(|identity| identity.name.clone())
        .unwrap_or_default()
}

pub fn crew(world: &World, ship: Entity) -> u32 {
    world.get::<&Crew>(ship).map(|c| c.count).unwrap_or(0)
}

pub fn set_crew(world: &World, ship: Entity, count: u32) {
    if let Ok(mut crew) = world.get::<&mut Crew>(ship) {
        crew.count = count;
    }
}

pub fn attribute(world: &World, ship: Entity, name: &str) -> f64 {
    world
        .get::<&Loadout>(ship)
        .map(|loadout| loadout.attribute(name))
        .unwrap_or(0.0)
}

pub fn required_crew(world: &World, ship: Entity) -> u32 {
    attribute(world, ship, "required crew").max(0.0) as u32
}

/// Chance the ship blows itself up when boarders break in.
pub fn self_destruct_chance(world: &World, ship: Entity) -> f64 {
    attribute(world, ship, "self destruct").clamp(0.0, 1.0)
}

pub fn is_capturable(world: &World, ship: Entity) -> bool {
    attribute(world, ship, "uncapturable") == 0.0
}

pub fn status(world: &World, ship: Entity) -> ShipStatus {
    world
        .get::<&ShipStatus>(ship)
        .map(|status| *status)
        .unwrap_or(ShipStatus::Destroyed)
}

pub fn set_status(world: &World, ship: Entity, status: ShipStatus) {
    if let Ok(mut current) = world.get::<&mut ShipStatus>(ship) {
        *current = status;
    }
}

pub fn system(world: &World, ship: Entity) -> Option<SystemId> {
    world.get::<&Location>(ship).ok().and_then(|l| l.system)
}

/// The system a ship is in, following a carried ship to its carrier.
pub fn effective_system(world: &World, ship: Entity) -> Option<SystemId> {
    match world.get::<&Carried>(ship).map(|c| c.carrier) {
        Ok(carrier) if carrier != ship => system(world, carrier),
        _ => system(world, ship),
    }
}

pub fn owner(world: &World, ship: Entity) -> Option<Owner> {
    world.get::<&Owner>(ship).map(|owner| *owner).ok()
}

pub fn government(world: &World, ship: Entity) -> Option<GovernmentId> {
    world.get::<&Allegiance>(ship).map(|a| a.0).ok()
}

pub fn carried_ships(world: &World, ship: Entity) -> Vec<Entity> {
    world
        .get::<&Bays>(ship)
        .map(|bays| bays.carried.clone())
        .unwrap_or_default()
}

/// Hand a single ship to a new owner flying for `government`. Ships in its
/// bays are left alone.
pub fn transfer_ownership(world: &World, ship: Entity, owner: Owner, government: GovernmentId) {
    if let Ok(mut current) = world.get::<&mut Owner>(ship) {
        *current = owner;
    }
    if let Ok(mut allegiance) = world.get::<&mut Allegiance>(ship) {
        allegiance.0 = government;
    }
}

/// Put `ship` in one of `carrier`'s free bays. Returns false if there is no room.
pub fn load_into_bay(world: &mut World, carrier: Entity, ship: Entity) -> bool {
    {
        let Ok(mut bays) = world.get::<&mut Bays>(carrier) else {
            return false;
        };
        if !bays.has_room() {
            return false;
        }
        bays.carried.push(ship);
    }
    if let Ok(mut location) = world.get::<&mut Location>(ship) {
        *location = Location::default();
    }
    let inserted = world.insert_one(ship, Carried { carrier });
    debug_assert!(inserted.is_ok(), "loaded ship must exist");
    true
}

/// A ship has just been taken by `capturer`'s crew.
///
/// The hull is patched to just above the disabled threshold, the ship joins
/// the capturer's side, and the capturer lends it enough crew to fly,
/// sharing crew in proportion to need when there are not enough to go
/// around. Ships in its bays are captured with it.
pub fn was_captured(world: &mut World, ship: Entity, capturer: Entity) {
    let new_owner = owner(world, capturer).unwrap_or(Owner::Player);
    let new_government = government(world, capturer).unwrap_or_default();
    let new_personality = world
        .get::<&Personality>(capturer)
        .map(|p| (*p).clone())
        .unwrap_or_default();

    if let Ok(mut hull) = world.get::<&mut Hull>(ship) {
        hull.repair_for_capture();
    }
    set_status(world, ship, ShipStatus::Active);
    transfer_ownership(world, ship, new_owner, new_government);
    if let Ok(mut personality) = world.get::<&mut Personality>(ship) {
        *personality = new_personality;
    }
    if let Ok(mut navigation) = world.get::<&mut Navigation>(ship) {
        *navigation = Navigation::default();
    }
    let _ = world.remove_one::<Special>(ship);

    let ship_crew = crew(world, ship) as i64;
    let ship_required = required_crew(world, ship) as i64;
    let capturer_crew = crew(world, capturer) as i64;
    let total_required = required_crew(world, capturer) as i64 + ship_required;

    let mut transfer = ship_required - ship_crew;
    if transfer > 0 {
        if total_required > capturer_crew + ship_crew {
            let floor = if ship_crew == 0 { 1 } else { 0 };
            transfer = (capturer_crew * transfer / total_required).max(floor);
        }
        let transfer = transfer.min(capturer_crew).max(0);
        set_crew(world, capturer, (capturer_crew - transfer) as u32);
        set_crew(world, ship, (ship_crew + transfer) as u32);
    }

    for carried in carried_ships(world, ship) {
        was_captured(world, carried, capturer);
    }
}

/// Move up to `amount` fuel from one ship to another, limited by what the
/// donor has and what the recipient can hold.
pub fn transfer_fuel(world: &World, from: Entity, to: Entity, amount: f64) -> f64 {
    let available = world.get::<&Fuel>(from).map(|f| f.current).unwrap_or(0.0);
    let room = world
        .get::<&Fuel>(to)
        .map(|f| (f.capacity - f.current).max(0.0))
        .unwrap_or(0.0);
    let moved = amount.min(available).min(room).max(0.0);
    if moved > 0.0 {
        if let Ok(mut fuel) = world.get::<&mut Fuel>(from) {
            fuel.current -= moved;
        }
        if let Ok(mut fuel) = world.get::<&mut Fuel>(to) {
            fuel.current += moved;
        }
    }
    moved
}

/// Hand-to-hand weapons installed on a ship, as `(power, count)` pairs for
/// attacking and for defending.
pub fn capture_weapons(
    world: &World,
    outfits: &OutfitCatalog,
    ship: Entity,
) -> (Vec<(f64, u32)>, Vec<(f64, u32)>) {
    let mut attack = Vec::new();
    let mut defense = Vec::new();
    if let Ok(loadout) = world.get::<&Loadout>(ship) {
        for (&id, &count) in &loadout.outfits {
            let Some(outfit) = outfits.get(id) else {
                continue;
            };
            if outfit.capture_attack() > 0.0 {
                attack.push((outfit.capture_attack(), count));
            }
            if outfit.capture_defense() > 0.0 {
                defense.push((outfit.capture_defense(), count));
            }
        }
    }
    (attack, defense)
}
