//! Star systems, planets and the hyperspace link graph.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::government::Governments;
use crate::components::{GovernmentId, PlanetId, SystemId};
use crate::error::ContentError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemDef {
    pub name: String,
    #[serde(default)]
    pub government: Option<String>,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub links: Vec<String>,
    /// Commodity prices.
    #[serde(default)]
    pub trade: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanetDef {
    pub name: String,
    #[serde(default)]
    pub system: Option<String>,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default = "default_true")]
    pub can_land: bool,
    #[serde(default)]
    pub wormhole: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone)]
pub struct StarSystem {
    pub id: SystemId,
    pub name: String,
    pub government: Option<GovernmentId>,
    pub attributes: BTreeSet<String>,
    pub links: Vec<SystemId>,
    pub planets: Vec<PlanetId>,
    pub trade: BTreeMap<String, i64>,
}

impl StarSystem {
    /// Local price of a commodity, zero if it is not traded here.
    pub fn trade_price(&self, commodity: &str) -> i64 {
        self.trade.get(commodity).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct Planet {
    pub id: PlanetId,
    pub name: String,
    pub system: Option<SystemId>,
    pub attributes: BTreeSet<String>,
    pub can_land: bool,
    pub wormhole: bool,
}

/// The map.
#[derive(Debug, Clone, Default)]
pub struct Galaxy {
    systems: Vec<StarSystem>,
    planets: Vec<Planet>,
    system_index: HashMap<String, SystemId>,
    planet_index: HashMap<String, PlanetId>,
}

impl Galaxy {
    pub fn build(
        systems: &[SystemDef],
        planets: &[PlanetDef],
        governments: &Governments,
    ) -> Result<Self, ContentError> {
        let mut galaxy = Galaxy::default();

        for def in systems {
            let id = SystemId(galaxy.systems.len() as u32);
            if galaxy.system_index.insert(def.name.clone(), id).is_some() {
                return Err(ContentError::Duplicate {
                    kind: "system",
                    name: def.name.clone(),
                });
            }
            let government = def
                .government
                .as_deref()
                .map(|name| governments.require(name))
                .transpose()?;
            galaxy.systems.push(StarSystem {
                id,
                name: def.name.clone(),
                government,
                attributes: def.attributes.iter().cloned().collect(),
                links: Vec::new(),
                planets: Vec::new(),
                trade: def.trade.clone(),
            });
        }

        // Links are symmetric even if only one side lists them.
        for def in systems {
            let from = galaxy.require_system(&def.name)?;
            for link in &def.links {
                let to = galaxy.require_system(link)?;
                galaxy.link(from, to);
                galaxy.link(to, from);
            }
        }

        for def in planets {
            let id = PlanetId(galaxy.planets.len() as u32);
            if galaxy.planet_index.insert(def.name.clone(), id).is_some() {
                return Err(ContentError::Duplicate {
                    kind: "planet",
                    name: def.name.clone(),
                });
            }
            let system = def
                .system
                .as_deref()
                .map(|name| galaxy.require_system(name))
                .transpose()?;
            if let Some(system) = system {
                galaxy.systems[system.0 as usize].planets.push(id);
            }
            galaxy.planets.push(Planet {
                id,
                name: def.name.clone(),
                system,
                attributes: def.attributes.iter().cloned().collect(),
                can_land: def.can_land,
                wormhole: def.wormhole,
            });
        }

        Ok(galaxy)
    }

    fn link(&mut self, from: SystemId, to: SystemId) {
        let links = &mut self.systems[from.0 as usize].links;
        if from != to && !links.contains(&to) {
            links.push(to);
        }
    }

    pub fn system(&self, id: SystemId) -> Option<&StarSystem> {
        self.systems.get(id.0 as usize)
    }

    pub fn planet(&self, id: PlanetId) -> Option<&Planet> {
        self.planets.get(id.0 as usize)
    }

    pub fn system_id(&self, name: &str) -> Option<SystemId> {
        self.system_index.get(name).copied()
    }

    pub fn planet_id(&self, name: &str) -> Option<PlanetId> {
        self.planet_index.get(name).copied()
    }

    pub fn require_system(&self, name: &str) -> Result<SystemId, ContentError> {
        self.system_id(name)
            .ok_or_else(|| ContentError::unknown("system", name))
    }

    pub fn require_planet(&self, name: &str) -> Result<PlanetId, ContentError> {
        self.planet_id(name)
            .ok_or_else(|| ContentError::unknown("planet", name))
    }

    pub fn systems(&self) -> impl Iterator<Item = &StarSystem> {
        self.systems.iter()
    }

    pub fn planets(&self) -> impl Iterator<Item = &Planet> {
        self.planets.iter()
    }

    pub fn system_name(&self, id: SystemId) -> &str {
        self.system(id).map(|s| s.name.as_str()).unwrap_or("")
    }

    pub fn planet_name(&self, id: PlanetId) -> &str {
        self.planet(id).map(|p| p.name.as_str()).unwrap_or("")
    }

    /// System a planet orbits in.
    pub fn planet_system(&self, id: PlanetId) -> Option<SystemId> {
        self.planet(id).and_then(|p| p.system)
    }

    /// Number of jumps between two systems, `None` if unreachable.
    pub fn jumps(&self, from: SystemId, to: SystemId) -> Option<u32> {
        if from == to {
            return Some(0);
        }
        let mut visited = HashSet::new();
        let mut queue: VecDeque<(SystemId, u32)> = VecDeque::new();
        visited.insert(from);
        queue.push_back((from, 0));

        while let Some((current, depth)) = queue.pop_front() {
            let Some(system) = self.system(current) else {
                continue;
            };
            for &next in &system.links {
                if next == to {
                    return Some(depth + 1);
                }
                if visited.insert(next) {
                    queue.push_back((next, depth + 1));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system(name: &str, links: &[&str]) -> SystemDef {
        SystemDef {
            name: name.into(),
            government: None,
            attributes: vec![],
            links: links.iter().map(|s| s.to_string()).collect(),
            trade: BTreeMap::new(),
        }
    }

    #[test]
    fn test_links_are_symmetric_and_jumps_counted() {
        let systems = vec![
            system("A", &["B"]),
            system("B", &["C"]),
            system("C", &[]),
            system("D", &[]),
        ];
        let galaxy = Galaxy::build(&systems, &[], &Governments::default()).unwrap();
        let a = galaxy.system_id("A").unwrap();
        let c = galaxy.system_id("C").unwrap();
        let d = galaxy.system_id("D").unwrap();
        assert_eq!(galaxy.jumps(a, c), Some(2));
        assert_eq!(galaxy.jumps(c, a), Some(2));
        assert_eq!(galaxy.jumps(a, a), Some(0));
        assert_eq!(galaxy.jumps(a, d), None);
    }

    #[test]
    fn test_unknown_link_is_an_error() {
        let systems = vec![system("A", &["Nowhere"])];
        let err = Galaxy::build(&systems, &[], &Governments::default()).unwrap_err();
        assert!(matches!(err, ContentError::Unknown { kind: "system", .. }));
    }
}
