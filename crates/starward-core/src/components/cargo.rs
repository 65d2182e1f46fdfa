//! Cargo hold: commodities by name and outfits by id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::common::OutfitId;

/// Cargo bay contents. Commodities weigh one ton per unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CargoHold {
    /// `None` means unlimited.
    capacity: Option<f64>,
    used: f64,
    commodities: BTreeMap<String, u32>,
    outfits: BTreeMap<OutfitId, u32>,
}

impl CargoHold {
    pub fn new(capacity: f64) -> Self {
        Self {
            capacity: Some(capacity),
            ..Default::default()
        }
    }

    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn capacity(&self) -> Option<f64> {
        self.capacity
    }

    pub fn set_capacity(&mut self, capacity: Option<f64>) {
        self.capacity = capacity;
    }

    pub fn used(&self) -> f64 {
        self.used
    }

    /// Free tons. Infinite for an unlimited hold; may be negative if the
    /// capacity shrank below what is stored.
    pub fn free(&self) -> f64 {
        match self.capacity {
            Some(capacity) => capacity - self.used,
            None => f64::INFINITY,
        }
    }

    pub fn commodity(&self, name: &str) -> u32 {
        self.commodities.get(name).copied().unwrap_or(0)
    }

    pub fn outfit(&self, outfit: OutfitId) -> u32 {
        self.outfits.get(&outfit).copied().unwrap_or(0)
    }

    pub fn commodities(&self) -> impl Iterator<Item = (&str, u32)> {
        self.commodities.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Outfits in cargo, sorted by id.
    pub fn outfits(&self) -> impl Iterator<Item = (OutfitId, u32)> + '_ {
        self.outfits.iter().map(|(k, v)| (*k, *v))
    }

    /// Add up to `count` tons of a commodity, returning how many fit.
    pub fn add_commodity(&mut self, name: &str, count: u32) -> u32 {
        let added = self.fit(1.0, count);
        if added > 0 {
            *self.commodities.entry(name.to_string()).or_insert(0) += added;
            self.used += added as f64;
        }
        added
    }

    /// Remove up to `count` tons of a commodity, returning how many were removed.
    pub fn remove_commodity(&mut self, name: &str, count: u32) -> u32 {
        let stored = self.commodity(name);
        let removed = stored.min(count);
        if removed == stored {
            self.commodities.remove(name);
        } else {
            self.commodities.insert(name.to_string(), stored - removed);
        }
        self.used -= removed as f64;
        removed
    }

    /// Add up to `count` outfits of `mass` tons each, returning how many fit.
    pub fn add_outfit(&mut self, outfit: OutfitId, mass: f64, count: u32) -> u32 {
        let added = self.fit(mass, count);
        if added > 0 {
            *self.outfits.entry(outfit).or_insert(0) += added;
            self.used += mass * added as f64;
        }
        added
    }

    pub fn remove_outfit(&mut self, outfit: OutfitId, mass: f64, count: u32) -> u32 {
        let stored = self.outfit(outfit);
        let removed = stored.min(count);
        if removed == 0 {
            return 0;
        }
        if removed == stored {
            self.outfits.remove(&outfit);
        } else {
            self.outfits.insert(outfit, stored - removed);
        }
        self.used -= mass * removed as f64;
        removed
    }

    fn fit(&self, mass: f64, count: u32) -> u32 {
        if mass <= 0.0 {
            return count;
        }
        let free = self.free();
        if free.is_infinite() {
            return count;
        }
        let room = ((free / mass) + 1e-9).floor().max(0.0);
        count.min(room.min(u32::MAX as f64) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commodities_limited_by_space() {
        let mut hold = CargoHold::new(10.0);
        assert_eq!(hold.add_commodity("Food", 7), 7);
        assert_eq!(hold.add_commodity("Metal", 7), 3);
        assert_eq!(hold.free(), 0.0);
        assert_eq!(hold.remove_commodity("Food", 100), 7);
        assert_eq!(hold.commodity("Food"), 0);
        assert_eq!(hold.free(), 7.0);
    }

    #[test]
    fn test_outfit_mass_accounting() {
        let mut hold = CargoHold::new(10.0);
        assert_eq!(hold.add_outfit(OutfitId(1), 4.0, 3), 2);
        assert_eq!(hold.used(), 8.0);
        assert_eq!(hold.add_outfit(OutfitId(2), 0.0, 50), 50);
        assert_eq!(hold.remove_outfit(OutfitId(1), 4.0, 1), 1);
        assert_eq!(hold.outfit(OutfitId(1)), 1);
        assert_eq!(hold.free(), 6.0);
    }

    #[test]
    fn test_unlimited_hold_accepts_everything() {
        let mut hold = CargoHold::new(1.0);
        hold.set_capacity(None);
        assert_eq!(hold.add_outfit(OutfitId(1), 50.0, 4), 4);
        hold.set_capacity(Some(1.0));
        assert!(hold.free() < 0.0);
        assert_eq!(hold.add_commodity("Food", 1), 0);
    }
}
