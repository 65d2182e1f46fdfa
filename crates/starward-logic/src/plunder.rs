//! Plunder items and their ordering.
//!
//! A plunder item is either a commodity (one ton per unit, identified by
//! name) or an outfit (identified by its catalog key). Lists of plunder are
//! always kept sorted by value per ton, most valuable first.

use std::cmp::Ordering;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::format;

/// One line of takeable cargo or equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plunder<K> {
    name: String,
    outfit: Option<K>,
    count: u32,
    unit_value: i64,
    unit_mass: f64,
    size: String,
    value: String,
}

impl<K: Copy + PartialEq> Plunder<K> {
    /// A commodity. Commodities come in units of one ton.
    pub fn commodity(name: impl Into<String>, count: u32, unit_value: i64) -> Self {
        let mut plunder = Self {
            name: name.into(),
            outfit: None,
            count,
            unit_value,
            unit_mass: 1.0,
            size: String::new(),
            value: String::new(),
        };
        plunder.update_strings();
        plunder
    }

    /// An outfit, either installed or stored in cargo.
    pub fn outfit(
        key: K,
        name: impl Into<String>,
        count: u32,
        unit_value: i64,
        unit_mass: f64,
    ) -> Self {
        let mut plunder = Self {
            name: name.into(),
            outfit: Some(key),
            count,
            unit_value,
            unit_mass,
            size: String::new(),
            value: String::new(),
        };
        plunder.update_strings();
        plunder
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The outfit key, or `None` for a commodity.
    pub fn outfit_key(&self) -> Option<K> {
        self.outfit
    }

    /// Units not yet taken. At zero the item leaves the list.
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn unit_value(&self) -> i64 {
        self.unit_value
    }

    pub fn unit_mass(&self) -> f64 {
        self.unit_mass
    }

    /// Mass column: `"<count> x <unit mass>"` for outfits, the bare count for
    /// commodities, the unit mass alone for a single outfit.
    pub fn size(&self) -> &str {
        &self.size
    }

    /// Total value as credits.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Sort key. Infinite for massless items with any value, zero for
    /// massless items worth nothing.
    pub fn value_per_ton(&self) -> f64 {
        if self.unit_mass == 0.0 && self.unit_value == 0 {
            return 0.0;
        }
        self.unit_value as f64 / self.unit_mass
    }

    /// Same outfit, or a commodity with the same name.
    pub fn is_same_item(&self, other: &Self) -> bool {
        match self.outfit {
            Some(key) => other.outfit == Some(key),
            None => other.outfit.is_none() && self.name == other.name,
        }
    }

    /// Remove up to `count` units.
    pub fn take(&mut self, count: u32) {
        self.count = self.count.saturating_sub(count);
        self.update_strings();
    }

    /// Add `count` more units, e.g. from salvage.
    pub fn add(&mut self, count: u32) {
        self.count += count;
        self.update_strings();
    }

    fn update_strings(&mut self) {
        self.size = match self.outfit {
            None => self.count.to_string(),
            Some(_) if self.count == 1 => format::number(self.unit_mass),
            Some(_) => format!("{} x {}", self.count, format::number(self.unit_mass)),
        };
        self.value = format::credits(self.unit_value.saturating_mul(self.count as i64));
    }
}

/// Most valuable per ton first.
pub fn compare_value_per_ton<K: Copy + PartialEq>(a: &Plunder<K>, b: &Plunder<K>) -> Ordering {
    b.value_per_ton().total_cmp(&a.value_per_ton())
}

/// Sort a plunder list by value per ton, descending.
pub fn sort_plunder<K: Copy + PartialEq>(list: &mut [Plunder<K>]) {
    list.sort_by(compare_value_per_ton);
}

/// Whether a list is in plunder order.
pub fn is_sorted<K: Copy + PartialEq>(list: &[Plunder<K>]) -> bool {
    list.windows(2)
        .all(|w| compare_value_per_ton(&w[0], &w[1]) != Ordering::Greater)
}

/// One outfit stack installed on a ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstalledStack<K> {
    pub key: K,
    pub count: u32,
    /// Installed copies of this outfit cannot be removed in a boarding.
    pub unplunderable: bool,
}

/// Merge-join installed outfits and cargo-bay outfits, both sorted by key.
///
/// When an outfit appears in both, the counts are summed; installed copies of
/// unplunderable outfits contribute nothing, cargo copies always count.
/// Outfits with no takeable units are omitted.
pub fn merge_outfit_listings<K: Ord + Copy>(
    installed: &[InstalledStack<K>],
    cargo: &[(K, u32)],
) -> Vec<(K, u32)> {
    let mut merged = Vec::with_capacity(installed.len() + cargo.len());
    let mut sit = installed.iter().peekable();
    let mut cit = cargo.iter().peekable();

    loop {
        let (key, count) = match (sit.peek(), cit.peek()) {
            (None, None) => break,
            (Some(s), None) => {
                let entry = (s.key, installed_count(s));
                sit.next();
                entry
            }
            (None, Some(&&(key, count))) => {
                cit.next();
                (key, count)
            }
            (Some(s), Some(&&(ckey, ccount))) => match s.key.cmp(&ckey) {
                Ordering::Less => {
                    let key = s.key;
                    let count = installed_count(s);
                    sit.next();
                    (key, count)
                }
                Ordering::Greater => {
                    cit.next();
                    (ckey, ccount)
                }
                Ordering::Equal => {
                    let count = installed_count(s) + ccount;
                    sit.next();
                    cit.next();
                    (ckey, count)
                }
            },
        };
        if count > 0 {
            merged.push((key, count));
        }
    }
    merged
}

fn installed_count<K>(stack: &InstalledStack<K>) -> u32 {
    if stack.unplunderable {
        0
    } else {
        stack.count
    }
}

/// Roll the yield of salvaging one outfit.
///
/// Each component draws uniformly from `0..=max`. A mechanic adds one unit to
/// any roll that fell short of the maximum. Components yielding nothing are
/// dropped and repeated keys are combined.
pub fn roll_salvage<K: Copy + PartialEq>(
    components: &[(K, u32)],
    has_mechanic: bool,
    rng: &mut impl Rng,
) -> Vec<(K, u32)> {
    let mut results: Vec<(K, u32)> = Vec::new();
    for &(key, max) in components {
        let mut count = rng.gen_range(0..=max);
        if has_mechanic && count < max {
            count += 1;
        }
        if count == 0 {
            continue;
        }
        match results.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing += count,
            None => results.push((key, count)),
        }
    }
    results
}
