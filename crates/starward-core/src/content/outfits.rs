//! Outfit catalog.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::components::{Attributes, OutfitId};
use crate::error::ContentError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutfitDef {
    pub name: String,
    #[serde(default)]
    pub plural: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub cost: i64,
    #[serde(default)]
    pub mass: f64,
    /// Outfit this one consumes as ammunition.
    #[serde(default)]
    pub ammo: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, f64>,
    #[serde(default)]
    pub salvage: Vec<SalvageDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalvageDef {
    /// Ship attribute needed to use this group. Empty means anyone can.
    #[serde(default)]
    pub requires: String,
    /// Outfit name to maximum units recovered.
    pub yields: BTreeMap<String, u32>,
}

/// One way of breaking an outfit down.
#[derive(Debug, Clone, PartialEq)]
pub struct SalvageGroup {
    pub requires: Option<String>,
    pub yields: Vec<(OutfitId, u32)>,
}

impl SalvageGroup {
    pub fn usable_by(&self, ship: &Attributes) -> bool {
        match &self.requires {
            None => true,
            Some(attribute) => ship.get(attribute) != 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outfit {
    pub id: OutfitId,
    pub name: String,
    pub plural: String,
    pub category: String,
    pub cost: i64,
    pub mass: f64,
    pub ammo: Option<OutfitId>,
    pub attributes: Attributes,
    pub salvage: Vec<SalvageGroup>,
}

impl Outfit {
    pub fn display_name(&self, count: u32) -> &str {
        if count == 1 {
            &self.name
        } else {
            &self.plural
        }
    }

    /// Installed copies cannot be taken in a boarding.
    pub fn is_unplunderable(&self) -> bool {
        self.attributes.get("unplunderable") > 0.0
    }

    /// Hand-to-hand weapon power when attacking.
    pub fn capture_attack(&self) -> f64 {
        self.attributes.get("capture attack")
    }

    /// Hand-to-hand weapon power when defending.
    pub fn capture_defense(&self) -> f64 {
        self.attributes.get("capture defense")
    }

    /// Whether a ship with `ship` attributes can salvage this outfit at all.
    pub fn can_be_salvaged_by(&self, ship: &Attributes) -> bool {
        self.salvage.iter().any(|group| group.usable_by(ship))
    }

    /// Maximum yields of every salvage group the ship can use.
    pub fn salvage_components(&self, ship: &Attributes) -> Vec<(OutfitId, u32)> {
        self.salvage
            .iter()
            .filter(|group| group.usable_by(ship))
            .flat_map(|group| group.yields.iter().copied())
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct OutfitCatalog {
    outfits: Vec<Outfit>,
    by_name: HashMap<String, OutfitId>,
}

impl OutfitCatalog {
    pub fn build(defs: &[OutfitDef]) -> Result<Self, ContentError> {
        let mut catalog = Self::default();
        for (i, def) in defs.iter().enumerate() {
            if catalog.by_name.insert(def.name.clone(), OutfitId(i as u32)).is_some() {
                return Err(ContentError::Duplicate {
                    kind: "outfit",
                    name: def.name.clone(),
                });
            }
        }

        // Second pass: ammunition and salvage refer to other outfits.
        for (i, def) in defs.iter().enumerate() {
            let ammo = def
                .ammo
                .as_deref()
                .map(|name| catalog.require(name))
                .transpose()?;
            let salvage = def
                .salvage
                .iter()
                .map(|group| {
                    let yields = group
                        .yields
                        .iter()
                        .map(|(name, &max)| Ok((catalog.require(name)?, max)))
                        .collect::<Result<Vec<_>, ContentError>>()?;
                    Ok(SalvageGroup {
                        requires: (!group.requires.is_empty()).then(|| group.requires.clone()),
                        yields,
                    })
                })
                .collect::<Result<Vec<_>, ContentError>>()?;
            catalog.outfits.push(Outfit {
                id: OutfitId(i as u32),
                name: def.name.clone(),
                plural: def.plural.clone().unwrap_or_else(|| format!("{}s", def.name)),
                category: def.category.clone(),
                cost: def.cost,
                mass: def.mass,
                ammo,
                attributes: def.attributes.iter().map(|(k, v)| (k.clone(), *v)).collect(),
                salvage,
            });
        }
        Ok(catalog)
    }

    pub fn get(&self, id: OutfitId) -> Option<&Outfit> {
        self.outfits.get(id.0 as usize)
    }

    pub fn id(&self, name: &str) -> Option<OutfitId> {
        self.by_name.get(name).copied()
    }

    pub fn require(&self, name: &str) -> Result<OutfitId, ContentError> {
        self.id(name).ok_or_else(|| ContentError::unknown("outfit", name))
    }

    pub fn by_name(&self, name: &str) -> Option<&Outfit> {
        self.id(name).and_then(|id| self.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Outfit> {
        self.outfits.iter()
    }

    pub fn len(&self) -> usize {
        self.outfits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outfits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(name: &str) -> OutfitDef {
        OutfitDef {
            name: name.into(),
            plural: None,
            category: String::new(),
            cost: 100,
            mass: 1.0,
            ammo: None,
            attributes: BTreeMap::new(),
            salvage: vec![],
        }
    }

    #[test]
    fn test_salvage_groups_gate_on_attribute() {
        let mut reactor = def("Reactor");
        reactor.salvage = vec![
            SalvageDef {
                requires: String::new(),
                yields: [("Scrap".to_string(), 2)].into_iter().collect(),
            },
            SalvageDef {
                requires: "salvage tools".into(),
                yields: [("Cell".to_string(), 1)].into_iter().collect(),
            },
        ];
        let catalog = OutfitCatalog::build(&[reactor, def("Scrap"), def("Cell")]).unwrap();
        let reactor = catalog.by_name("Reactor").unwrap();
        let scrap = catalog.id("Scrap").unwrap();
        let cell = catalog.id("Cell").unwrap();

        let plain = Attributes::new();
        assert!(reactor.can_be_salvaged_by(&plain));
        assert_eq!(reactor.salvage_components(&plain), vec![(scrap, 2)]);

        let mut tooled = Attributes::new();
        tooled.set("salvage tools", 1.0);
        assert_eq!(reactor.salvage_components(&tooled), vec![(scrap, 2), (cell, 1)]);
    }

    #[test]
    fn test_default_plural_and_unknown_ammo() {
        let catalog = OutfitCatalog::build(&[def("Laser")]).unwrap();
        assert_eq!(catalog.by_name("Laser").unwrap().display_name(3), "Lasers");

        let mut launcher = def("Launcher");
        launcher.ammo = Some("Missing".into());
        assert!(OutfitCatalog::build(&[launcher]).is_err());
    }
}
