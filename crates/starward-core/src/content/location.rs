//! Location filters: predicates over systems and planets.
//!
//! A filter can name systems or planets outright, require a government or a
//! set of attributes, and restrict the jump distance from a centre. The centre
//! is either a named system or, if none is given, the origin supplied at match
//! time, so the same filter can be chained from point to point.

use serde::{Deserialize, Serialize};

use super::galaxy::{Galaxy, Planet, StarSystem};
use super::government::Governments;
use crate::components::{GovernmentId, PlanetId, SystemId};
use crate::error::ContentError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationFilterDef {
    pub systems: Vec<String>,
    pub planets: Vec<String>,
    pub governments: Vec<String>,
    pub attributes: Vec<String>,
    pub near: Option<String>,
    pub distance: Option<DistanceDef>,
}

impl LocationFilterDef {
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
            && self.planets.is_empty()
            && self.governments.is_empty()
            && self.attributes.is_empty()
            && self.near.is_none()
            && self.distance.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceDef {
    #[serde(default)]
    pub min: u32,
    pub max: u32,
}

/// A resolved filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationFilter {
    systems: Vec<SystemId>,
    planets: Vec<PlanetId>,
    governments: Vec<GovernmentId>,
    attributes: Vec<String>,
    near: Option<SystemId>,
    distance: Option<(u32, u32)>,
}

impl LocationFilter {
    pub fn resolve(
        def: &LocationFilterDef,
        galaxy: &Galaxy,
        governments: &Governments,
    ) -> Result<Self, ContentError> {
        Ok(Self {
            systems: def
                .systems
                .iter()
                .map(|name| galaxy.require_system(name))
                .collect::<Result<_, _>>()?,
            planets: def
                .planets
                .iter()
                .map(|name| galaxy.require_planet(name))
                .collect::<Result<_, _>>()?,
            governments: def
                .governments
                .iter()
                .map(|name| governments.require(name))
                .collect::<Result<_, _>>()?,
            attributes: def.attributes.clone(),
            near: def
                .near
                .as_deref()
                .map(|name| galaxy.require_system(name))
                .transpose()?,
            distance: def.distance.map(|d| (d.min, d.max)),
        })
    }

    /// Filters a single named system.
    pub fn system(system: SystemId) -> Self {
        Self {
            systems: vec![system],
            ..Default::default()
        }
    }

    /// Restrict the jump distance from the match origin.
    pub fn within(mut self, min: u32, max: u32) -> Self {
        self.distance = Some((min, max));
        self
    }

    pub fn with_government(mut self, government: GovernmentId) -> Self {
        self.governments.push(government);
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether `system` matches, measuring distance from `origin` unless the
    /// filter names its own centre.
    pub fn matches_system(&self, galaxy: &Galaxy, system: &StarSystem, origin: SystemId) -> bool {
        if !self.planets.is_empty() && !system.planets.iter().any(|p| self.planets.contains(p)) {
            return false;
        }
        if !self
            .attributes
            .iter()
            .all(|attribute| system.attributes.contains(attribute))
        {
            return false;
        }
        self.matches_system_common(galaxy, system, origin)
    }

    /// Whether `planet` matches. The system-level criteria apply to the
    /// system the planet orbits in; attributes apply to the planet itself.
    pub fn matches_planet(&self, galaxy: &Galaxy, planet: &Planet, origin: SystemId) -> bool {
        if !self.planets.is_empty() && !self.planets.contains(&planet.id) {
            return false;
        }
        if !self
            .attributes
            .iter()
            .all(|attribute| planet.attributes.contains(attribute))
        {
            return false;
        }
        match planet.system.and_then(|id| galaxy.system(id)) {
            Some(system) => self.matches_system_common(galaxy, system, origin),
            None => false,
        }
    }

    fn matches_system_common(
        &self,
        galaxy: &Galaxy,
        system: &StarSystem,
        origin: SystemId,
    ) -> bool {
        if !self.systems.is_empty() && !self.systems.contains(&system.id) {
            return false;
        }
        if !self.governments.is_empty()
            && !system
                .government
                .is_some_and(|government| self.governments.contains(&government))
        {
            return false;
        }
        if let Some((min, max)) = self.distance {
            let centre = self.near.unwrap_or(origin);
            match galaxy.jumps(centre, system.id) {
                Some(jumps) if jumps >= min && jumps <= max => {}
                _ => return false,
            }
        }
        true
    }
}
