//! Identifiers and attribute maps shared by components and content.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Index of a star system in the galaxy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SystemId(pub u32);

/// Index of a planet in the galaxy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlanetId(pub u32);

/// Index of an outfit in the outfit catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OutfitId(pub u32);

/// Index of a government.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GovernmentId(pub u32);

/// Named numeric attributes of a ship or outfit ("cargo space", "required crew", ...).
///
/// Missing attributes read as zero. Zeroed entries are dropped so that
/// `is_empty` means "no attributes at all".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, f64>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> f64 {
        self.0.get(name).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        if value == 0.0 {
            self.0.remove(&name);
        } else {
            self.0.insert(name, value);
        }
    }

    /// Add `scale` copies of another attribute set.
    pub fn add_scaled(&mut self, other: &Attributes, scale: f64) {
        for (name, value) in &other.0 {
            let sum = self.get(name) + value * scale;
            self.set(name.clone(), sum);
        }
    }

    /// How many copies of something with `needs` attributes fit, up to `count`.
    ///
    /// Every negative attribute in `needs` consumes capacity from the
    /// matching attribute here.
    pub fn can_add(&self, needs: &Attributes, count: u32) -> u32 {
        let mut fits = count;
        for (name, &value) in &needs.0 {
            if value >= 0.0 {
                continue;
            }
            let available = self.get(name).max(0.0);
            let copies = (available / -value + 1e-9).floor();
            fits = fits.min(copies.min(u32::MAX as f64) as u32);
        }
        fits
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, f64)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        let mut attributes = Attributes::new();
        for (name, value) in iter {
            attributes.set(name, value);
        }
        attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, f64)]) -> Attributes {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_missing_attribute_is_zero() {
        let a = attrs(&[("hull", 100.0)]);
        assert_eq!(a.get("hull"), 100.0);
        assert_eq!(a.get("shields"), 0.0);
    }

    #[test]
    fn test_add_scaled_drops_zeroes() {
        let mut ship = attrs(&[("outfit space", 20.0)]);
        ship.add_scaled(&attrs(&[("outfit space", -10.0)]), 2.0);
        assert!(ship.is_empty());
    }

    #[test]
    fn test_can_add_limited_by_capacity() {
        let ship = attrs(&[("missile capacity", 7.0), ("outfit space", 100.0)]);
        let rocket = attrs(&[("missile capacity", -2.0)]);
        assert_eq!(ship.can_add(&rocket, 10), 3);
        assert_eq!(ship.can_add(&rocket, 1), 1);
        let freebie = attrs(&[("energy", 3.0)]);
        assert_eq!(ship.can_add(&freebie, 10), 10);
    }
}
