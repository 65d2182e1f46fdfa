//! Turning NPC templates into ships in the world.
//!
//! Location filters in a path are resolved one at a time, each relative to
//! the point chosen before it (the mission origin for the first). A filter
//! never picks a point already on the path, and a filter that matches
//! nothing is skipped.

use std::collections::BTreeMap;

use hecs::{Entity, World};
use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use starward_logic::events::ShipEventType;
use starward_logic::format;

use super::fleet::{place_ship, spawn_fleet};
use super::npc::{Npc, ShipRecord};
use super::ships::{self, spawn_ship};
use crate::components::*;
use crate::content::{Content, LocationFilter, NpcTemplate, Route, SpawnSystem};

/// Substitution key for the name of an NPC's first ship.
pub const NPC_KEY: &str = "<npc>";

/// Where a mission starts and ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissionEnds {
    pub origin: SystemId,
    pub destination: PlanetId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NoMatch;

fn resolve_chain<T: Copy>(
    filters: &[LocationFilter],
    origin: SystemId,
    anchor_of: impl Fn(T) -> Option<SystemId>,
    mut pick: impl FnMut(&LocationFilter, SystemId, &[T]) -> Result<T, NoMatch>,
) -> Vec<T> {
    filters.iter().fold(Vec::new(), |mut chosen, filter| {
        let anchor = chosen.last().and_then(|&p| anchor_of(p)).unwrap_or(origin);
        match pick(filter, anchor, &chosen) {
            Ok(point) => chosen.push(point),
            Err(NoMatch) => warn!("NPC location filter matched nothing; skipping it"),
        }
        chosen
    })
}

/// Systems matching `filter` from `anchor`, excluding those already chosen.
fn pick_system(
    content: &Content,
    filter: &LocationFilter,
    anchor: SystemId,
    chosen: &[SystemId],
    rng: &mut impl Rng,
) -> Result<SystemId, NoMatch> {
    let galaxy = &content.galaxy;
    let candidates: Vec<SystemId> = galaxy
        .systems()
        .filter(|s| !s.name.is_empty() && !chosen.contains(&s.id))
        .filter(|s| filter.matches_system(galaxy, s, anchor))
        .map(|s| s.id)
        .collect();
    candidates.choose(rng).copied().ok_or(NoMatch)
}

/// Landable, non-wormhole planets matching `filter` from `anchor`.
fn pick_planet(
    content: &Content,
    filter: &LocationFilter,
    anchor: SystemId,
    chosen: &[PlanetId],
    rng: &mut impl Rng,
) -> Result<PlanetId, NoMatch> {
    let galaxy = &content.galaxy;
    let candidates: Vec<PlanetId> = galaxy
        .planets()
        .filter(|p| !p.name.is_empty() && p.can_land && !p.wormhole)
        .filter(|p| !chosen.contains(&p.id))
        .filter(|p| filter.matches_planet(galaxy, p, anchor))
        .map(|p| p.id)
        .collect();
    candidates.choose(rng).copied().ok_or(NoMatch)
}

/// Instantiate `template` for a mission running between `ends`.
///
/// Spawns the template's ships and fleets, places them, and records `<npc>`
/// in `subs` as the first ship's name before substituting the dialog and
/// conversation text.
pub fn instantiate_npc(
    template: &NpcTemplate,
    world: &mut World,
    content: &Content,
    ends: MissionEnds,
    subs: &mut BTreeMap<String, String>,
    rng: &mut impl Rng,
) -> Npc {
    let galaxy = &content.galaxy;
    let origin = ends.origin;
    let destination = galaxy.planet_system(ends.destination);
    let government = template.government.unwrap_or(content.player_government);

    let system = match &template.system {
        SpawnSystem::Origin => origin,
        SpawnSystem::Destination => destination.unwrap_or(origin),
        SpawnSystem::Named(system) => *system,
        SpawnSystem::Filter(filter) => match pick_system(content, filter, origin, &[], rng) {
            Ok(system) => system,
            Err(NoMatch) => {
                warn!("NPC system filter matched nothing; starting at the mission origin");
                origin
            }
        },
    };

    let waypoints = match &template.waypoints {
        Route::None => Vec::new(),
        Route::Auto if template.patrol => {
            std::iter::once(origin).chain(destination).collect()
        }
        Route::Auto => destination.into_iter().collect(),
        Route::Explicit(list) => list.clone(),
        Route::Filters(filters) => resolve_chain(filters, origin, Some, |filter, anchor, chosen| {
            pick_system(content, filter, anchor, chosen, &mut *rng)
        }),
    };

    let stopovers = match &template.stopovers {
        Route::None => Vec::new(),
        Route::Auto => vec![ends.destination],
        Route::Explicit(list) => list.clone(),
        Route::Filters(filters) => resolve_chain(
            filters,
            origin,
            |planet| galaxy.planet_system(planet),
            |filter, anchor, chosen| pick_planet(content, filter, anchor, chosen, &mut *rng),
        ),
    };

    let mut spawned: Vec<(Entity, ShipEventType)> = Vec::new();
    for ship in &template.ships {
        let entity = spawn_ship(
            world,
            &content.outfits,
            &ship.model,
            ship.name.clone(),
            Owner::Npc,
            government,
        );
        spawned.push((entity, ship.actions));
    }
    for fleet in &template.fleets {
        for entity in spawn_fleet(world, &content.outfits, fleet, government, rng) {
            spawned.push((entity, ShipEventType::empty()));
        }
    }

    let entering = template.personality.is_entering();
    let navigation = Navigation {
        waypoints: waypoints.clone(),
        patrol: template.patrol,
        stopovers: stopovers.clone(),
    };
    for &(entity, _) in &spawned {
        let inserted = world.insert(
            entity,
            (
                Allegiance(government),
                template.personality.clone(),
                navigation.clone(),
                Special,
            ),
        );
        debug_assert!(inserted.is_ok(), "mission ship was just spawned");
        place_ship(world, galaxy, entity, system, entering, rng);
    }

    if let Some(&(first, _)) = spawned.first() {
        subs.insert(NPC_KEY.to_string(), ships::name(world, first));
    }

    let records = spawned
        .iter()
        .map(|&(entity, actions)| {
            (entity, ShipRecord::new(actions, ships::effective_system(world, entity)))
        })
        .collect();

    debug!(
        "Instantiated NPC with {} ships in {}",
        spawned.len(),
        galaxy.system_name(system)
    );

    Npc {
        conditions: template.conditions,
        government,
        personality: template.personality.clone(),
        system: Some(system),
        destination,
        waypoints,
        patrol: template.patrol,
        stopovers,
        visit: template.visit,
        dialog: format::replace(&template.dialog, subs),
        conversation: template.conversation.as_ref().map(|c| c.substitute(subs)),
        ships: spawned.into_iter().map(|(entity, _)| entity).collect(),
        records,
        failed: false,
    }
}
