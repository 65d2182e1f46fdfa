//! Ship models and fleets.

use std::collections::{BTreeMap, HashMap};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::government::Governments;
use super::outfits::OutfitCatalog;
use crate::components::{Attributes, GovernmentId, OutfitId, Personality};
use crate::error::ContentError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipModelDef {
    pub model: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, f64>,
    #[serde(default)]
    pub outfits: BTreeMap<String, u32>,
    /// Number of fighter bays.
    #[serde(default)]
    pub bays: u32,
    /// Whether this model can ride in a bay.
    #[serde(default)]
    pub carried: bool,
}

/// A hull design plus its stock loadout.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipModel {
    pub name: String,
    pub category: String,
    pub base: Attributes,
    pub outfits: Vec<(OutfitId, u32)>,
    pub bays: u32,
    pub carried: bool,
}

impl ShipModel {
    pub fn resolve(def: &ShipModelDef, outfits: &OutfitCatalog) -> Result<Self, ContentError> {
        Ok(Self {
            name: def.model.clone(),
            category: def.category.clone(),
            base: def.attributes.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            outfits: def
                .outfits
                .iter()
                .map(|(name, &count)| Ok((outfits.require(name)?, count)))
                .collect::<Result<_, ContentError>>()?,
            bays: def.bays,
            carried: def.carried,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShipCatalog {
    models: Vec<ShipModel>,
    by_name: HashMap<String, usize>,
}

impl ShipCatalog {
    pub fn build(defs: &[ShipModelDef], outfits: &OutfitCatalog) -> Result<Self, ContentError> {
        let mut catalog = Self::default();
        for def in defs {
            if catalog.by_name.insert(def.model.clone(), catalog.models.len()).is_some() {
                return Err(ContentError::Duplicate {
                    kind: "ship model",
                    name: def.model.clone(),
                });
            }
            catalog.models.push(ShipModel::resolve(def, outfits)?);
        }
        Ok(catalog)
    }

    pub fn get(&self, name: &str) -> Option<&ShipModel> {
        self.by_name.get(name).map(|&i| &self.models[i])
    }

    pub fn require(&self, name: &str) -> Result<&ShipModel, ContentError> {
        self.get(name)
            .ok_or_else(|| ContentError::unknown("ship model", name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShipModel> {
        self.models.iter()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetDef {
    pub name: String,
    #[serde(default)]
    pub government: Option<String>,
    /// Names given to spawned ships, in order.
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub personality: Vec<String>,
    pub variants: Vec<VariantDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantDef {
    #[serde(default = "default_weight")]
    pub weight: u32,
    pub ships: Vec<String>,
}

fn default_weight() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq)]
pub struct FleetVariant {
    pub weight: u32,
    pub ships: Vec<ShipModel>,
}

/// A weighted choice of ship groups flying together.
#[derive(Debug, Clone, PartialEq)]
pub struct Fleet {
    pub name: String,
    pub government: Option<GovernmentId>,
    pub names: Vec<String>,
    pub personality: Personality,
    pub variants: Vec<FleetVariant>,
}

impl Fleet {
    pub fn resolve(
        def: &FleetDef,
        ships: &ShipCatalog,
        governments: &Governments,
    ) -> Result<Self, ContentError> {
        if def.variants.iter().all(|v| v.weight == 0 || v.ships.is_empty()) {
            return Err(ContentError::EmptyFleet(def.name.clone()));
        }
        Ok(Self {
            name: def.name.clone(),
            government: def
                .government
                .as_deref()
                .map(|name| governments.require(name))
                .transpose()?,
            names: def.names.clone(),
            personality: Personality::from_flags(def.personality.iter().map(String::as_str)),
            variants: def
                .variants
                .iter()
                .map(|variant| {
                    Ok(FleetVariant {
                        weight: variant.weight,
                        ships: variant
                            .ships
                            .iter()
                            .map(|name| ships.require(name).cloned())
                            .collect::<Result<_, ContentError>>()?,
                    })
                })
                .collect::<Result<_, ContentError>>()?,
        })
    }

    /// Pick a variant by weight.
    pub fn choose_variant(&self, rng: &mut impl Rng) -> Option<&FleetVariant> {
        let total: u32 = self.variants.iter().map(|v| v.weight).sum();
        if total == 0 {
            return None;
        }
        let mut roll = rng.gen_range(0..total);
        for variant in &self.variants {
            if roll < variant.weight {
                return Some(variant);
            }
            roll -= variant.weight;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn model(name: &str) -> ShipModelDef {
        ShipModelDef {
            model: name.into(),
            category: String::new(),
            attributes: BTreeMap::new(),
            outfits: BTreeMap::new(),
            bays: 0,
            carried: false,
        }
    }

    #[test]
    fn test_weighted_variant_never_picks_zero_weight() {
        let ships =
            ShipCatalog::build(&[model("A"), model("B")], &OutfitCatalog::default()).unwrap();
        let def = FleetDef {
            name: "Mixed".into(),
            government: None,
            names: vec![],
            personality: vec![],
            variants: vec![
                VariantDef {
                    weight: 0,
                    ships: vec!["A".into()],
                },
                VariantDef {
                    weight: 3,
                    ships: vec!["B".into()],
                },
            ],
        };
        let fleet = Fleet::resolve(&def, &ships, &Governments::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let variant = fleet.choose_variant(&mut rng).unwrap();
            assert_eq!(variant.ships[0].name, "B");
        }
    }

    #[test]
    fn test_fleet_without_ships_is_rejected() {
        let def = FleetDef {
            name: "Ghosts".into(),
            government: None,
            names: vec![],
            personality: vec![],
            variants: vec![],
        };
        let result = Fleet::resolve(&def, &ShipCatalog::default(), &Governments::default());
        assert!(matches!(result, Err(ContentError::EmptyFleet(_))));
    }
}
