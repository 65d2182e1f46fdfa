//! NPC definitions and the templates they resolve into.
//!
//! A definition is what content authors write. Loading it validates names,
//! folds triggers into [`Conditions`], and turns the several ways of
//! specifying a path into a single [`Route`]. Malformed but recoverable parts
//! are logged and dropped; references to things that do not exist are errors.

use log::warn;
use serde::{Deserialize, Serialize};
use starward_logic::events::{Conditions, ShipEventType};

use super::conversation::{Conversation, ConversationDef};
use super::location::{LocationFilter, LocationFilterDef};
use super::ships::{Fleet, FleetDef, ShipModel, ShipModelDef};
use super::Content;
use crate::components::{GovernmentId, Personality, PlanetId, SystemId};
use crate::error::ContentError;

/// Separator between dialog paragraphs.
pub const PARAGRAPH_BREAK: &str = "\n\t";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcDefinition {
    /// Trigger keywords: "kill", "save", "board", "accompany", ...
    pub triggers: Vec<String>,
    /// Raw success mask. Replaces whatever the triggers give.
    pub succeed: Option<u32>,
    /// Raw failure mask. Replaces whatever the triggers give.
    pub fail: Option<u32>,
    pub system: Option<SystemSpec>,
    pub waypoints: Option<PathDef>,
    /// Like `waypoints`, but the ships keep cycling through them.
    pub patrol: Option<PathDef>,
    pub stopovers: Option<PathDef>,
    /// Like `stopovers`, but landing there is not the end of the trip.
    pub visit: Option<PathDef>,
    pub government: Option<String>,
    pub personality: Vec<String>,
    pub dialog: Vec<String>,
    pub conversation: Option<ConversationRef>,
    pub ships: Vec<NpcShipDef>,
    pub fleets: Vec<NpcFleetDef>,
}

/// Where the NPC's ships appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SystemSpec {
    /// A system name, or the word `destination`.
    Named(String),
    Filter(LocationFilterDef),
}

/// A travel plan as written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathDef {
    /// `true` asks for an automatic path.
    Auto(bool),
    Named(Vec<String>),
    Filters(Vec<LocationFilterDef>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConversationRef {
    Stock(String),
    Inline(ConversationDef),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcShipDef {
    pub name: String,
    /// Stock model name.
    #[serde(default)]
    pub model: Option<String>,
    /// A one-off hull defined in place.
    #[serde(default)]
    pub inline: Option<ShipModelDef>,
    /// Events that already happened to this ship.
    #[serde(default)]
    pub actions: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NpcFleetDef {
    Stock(String),
    Inline(FleetDef),
}

/// Where a template's ships spawn.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SpawnSystem {
    #[default]
    Origin,
    Destination,
    Named(SystemId),
    Filter(LocationFilter),
}

/// A resolved travel plan.
#[derive(Debug, Clone, PartialEq)]
pub enum Route<T> {
    None,
    /// Derived from the mission's origin and destination.
    Auto,
    Explicit(Vec<T>),
    /// Resolved one by one at instantiation.
    Filters(Vec<LocationFilter>),
}

impl<T> Default for Route<T> {
    fn default() -> Self {
        Route::None
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateShip {
    pub name: String,
    pub model: ShipModel,
    pub actions: ShipEventType,
}

/// A loaded NPC, ready to be instantiated by a mission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NpcTemplate {
    pub conditions: Conditions,
    pub system: SpawnSystem,
    pub waypoints: Route<SystemId>,
    pub patrol: bool,
    pub stopovers: Route<PlanetId>,
    pub visit: bool,
    pub government: Option<GovernmentId>,
    pub personality: Personality,
    pub dialog: String,
    pub conversation: Option<Conversation>,
    pub ships: Vec<TemplateShip>,
    pub fleets: Vec<Fleet>,
}

impl NpcTemplate {
    pub fn load(def: &NpcDefinition, content: &Content) -> Result<Self, ContentError> {
        let (mut conditions, unknown) =
            Conditions::from_tokens(def.triggers.iter().map(String::as_str));
        for token in unknown {
            warn!("Skipping unrecognized NPC trigger \"{}\"", token);
        }
        if let Some(raw) = def.succeed {
            conditions.succeed_if = ShipEventType::from_raw(raw);
        }
        if let Some(raw) = def.fail {
            conditions.fail_if = ShipEventType::from_raw(raw);
        }

        let system = match &def.system {
            None => SpawnSystem::Origin,
            Some(SystemSpec::Named(name)) if name == "destination" => SpawnSystem::Destination,
            Some(SystemSpec::Named(name)) => {
                SpawnSystem::Named(content.galaxy.require_system(name)?)
            }
            Some(SystemSpec::Filter(filter)) => {
                SpawnSystem::Filter(content.resolve_filter(filter)?)
            }
        };

        if def.waypoints.is_some() && def.patrol.is_some() {
            warn!("NPC has both waypoints and a patrol; using the patrol");
        }
        let system_named = |name: &str| content.galaxy.require_system(name);
        let (waypoints, patrol) = match (&def.patrol, &def.waypoints) {
            (Some(path), _) => {
                let route = load_route(path, "patrol waypoint", true, content, system_named)?;
                (route, true)
            }
            (None, Some(path)) => {
                let route = load_route(path, "waypoint", false, content, system_named)?;
                (route, false)
            }
            (None, None) => (Route::None, false),
        };

        if def.stopovers.is_some() && def.visit.is_some() {
            warn!("NPC has both stopovers and visits; using the visits");
        }
        let planet_named = |name: &str| content.galaxy.require_planet(name);
        let (stopovers, visit) = match (&def.visit, &def.stopovers) {
            (Some(path), _) => (load_route(path, "visit", false, content, planet_named)?, true),
            (None, Some(path)) => {
                let route = load_route(path, "stopover", false, content, planet_named)?;
                (route, false)
            }
            (None, None) => (Route::None, false),
        };

        let government = def
            .government
            .as_deref()
            .map(|name| content.governments.require(name))
            .transpose()?;

        for flag in &def.personality {
            if !Personality::KNOWN.contains(&flag.as_str()) {
                warn!("Unrecognized NPC personality \"{}\"", flag);
            }
        }
        let personality = Personality::from_flags(def.personality.iter().map(String::as_str));

        let conversation = match &def.conversation {
            None => None,
            Some(ConversationRef::Stock(name)) => Some(
                content
                    .conversations
                    .get(name)
                    .cloned()
                    .ok_or_else(|| ContentError::unknown("conversation", name))?,
            ),
            Some(ConversationRef::Inline(inline)) => {
                Some(Conversation::new(inline.paragraphs.clone()))
            }
        };

        let mut ships = Vec::with_capacity(def.ships.len());
        for ship in &def.ships {
            let model = match (&ship.model, &ship.inline) {
                (Some(name), None) => content.ships.require(name)?.clone(),
                (None, Some(inline)) => ShipModel::resolve(inline, &content.outfits)?,
                _ => {
                    warn!(
                        "Skipping NPC ship \"{}\": it needs exactly one of a model or an inline definition",
                        ship.name
                    );
                    continue;
                }
            };
            ships.push(TemplateShip {
                name: ship.name.clone(),
                model,
                actions: ShipEventType::from_raw(ship.actions),
            });
        }

        let fleets = def
            .fleets
            .iter()
            .map(|fleet| match fleet {
                NpcFleetDef::Stock(name) => content
                    .fleets
                    .get(name)
                    .cloned()
                    .ok_or_else(|| ContentError::unknown("fleet", name)),
                NpcFleetDef::Inline(inline) => {
                    Fleet::resolve(inline, &content.ships, &content.governments)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            conditions,
            system,
            waypoints,
            patrol,
            stopovers,
            visit,
            government,
            personality,
            dialog: def.dialog.join(PARAGRAPH_BREAK),
            conversation,
            ships,
            fleets,
        })
    }
}

fn load_route<T>(
    path: &PathDef,
    what: &str,
    patrol: bool,
    content: &Content,
    lookup: impl Fn(&str) -> Result<T, ContentError>,
) -> Result<Route<T>, ContentError> {
    let route = match path {
        PathDef::Auto(true) => Route::Auto,
        PathDef::Auto(false) => Route::None,
        PathDef::Named(names) if names.is_empty() => Route::Auto,
        PathDef::Named(names) => {
            if patrol && names.len() < 2 {
                warn!("Skipping {} specification: a patrol needs at least two systems", what);
                return Ok(Route::Explicit(Vec::new()));
            }
            Route::Explicit(names.iter().map(|name| lookup(name)).collect::<Result<_, _>>()?)
        }
        PathDef::Filters(filters) => {
            let mut resolved = Vec::with_capacity(filters.len());
            for filter in filters {
                if filter.is_empty() {
                    warn!("Skipping invalid {} specification", what);
                    continue;
                }
                resolved.push(content.resolve_filter(filter)?);
            }
            if patrol && resolved.len() < 2 {
                warn!("Skipping {} specification: a patrol needs at least two systems", what);
                resolved.clear();
            }
            Route::Filters(resolved)
        }
    };
    Ok(route)
}
