//! Hand-to-hand capture odds.
//!
//! Boarding combat is a sequence of rounds in which one side loses a single
//! crew member, with probability proportional to each side's power. Power
//! depends on how many crew are left, so both the power curves and the
//! resulting odds are computed once per encounter for every crew count up to
//! the ships' current complement and then looked up.
//!
//! ```
//! use starward_logic::capture_odds::{crew_power, CaptureOdds};
//!
//! let attacker = crew_power(&[(3.0, 2)], 4, 1.0);
//! let defender = crew_power(&[], 3, 2.0);
//! let odds = CaptureOdds::new(attacker, defender);
//! assert!(odds.odds(4, 3) > 0.0 && odds.odds(4, 3) < 1.0);
//! assert_eq!(odds.odds(4, 0), 1.0);
//! ```

use serde::{Deserialize, Serialize};

/// Default power contributed by each attacking crew member.
pub const ATTACKING_CREW_POWER: f64 = 1.0;

/// Default power contributed by each defending crew member. Defenders know
/// the layout of their own ship.
pub const DEFENDING_CREW_POWER: f64 = 2.0;

/// Cumulative power for every crew count, `power[n - 1]` being the total power
/// of `n` crew.
///
/// `weapons` lists `(power per weapon, number installed)`. Each crew member
/// wields at most one weapon, the best ones first.
pub fn crew_power(weapons: &[(f64, u32)], crew: u32, per_crew: f64) -> Vec<f64> {
    if crew == 0 {
        return Vec::new();
    }

    let mut power: Vec<f64> = weapons
        .iter()
        .filter(|(value, count)| *value > 0.0 && *count > 0)
        .flat_map(|&(value, count)| std::iter::repeat(value).take(count as usize))
        .collect();
    power.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    power.resize(crew as usize, 0.0);

    let mut total = 0.0;
    for slot in power.iter_mut() {
        total += *slot + per_crew;
        *slot = total;
    }
    power
}

/// Precomputed capture odds and expected casualties for one direction of
/// attack (one ship attacking, the other defending).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptureOdds {
    power_a: Vec<f64>,
    power_d: Vec<f64>,
    capture: Vec<f64>,
    casualties_a: Vec<f64>,
    casualties_d: Vec<f64>,
}

impl CaptureOdds {
    /// Build the tables from the attacker's and defender's power curves.
    pub fn new(attacker_power: Vec<f64>, defender_power: Vec<f64>) -> Self {
        let mut odds = Self {
            power_a: attacker_power,
            power_d: defender_power,
            ..Default::default()
        };
        odds.calculate();
        odds
    }

    /// Probability that `attacking` crew eventually capture a ship defended by
    /// `defending` crew, if both sides fight to the end.
    pub fn odds(&self, attacking: u32, defending: u32) -> f64 {
        if defending == 0 {
            return 1.0;
        }
        if attacking < 2 {
            return 0.0;
        }
        self.index(attacking, defending)
            .map(|i| self.capture[i])
            .unwrap_or(0.0)
    }

    /// Expected number of attacking crew lost.
    pub fn attacker_casualties(&self, attacking: u32, defending: u32) -> f64 {
        if attacking < 2 || defending == 0 {
            return 0.0;
        }
        self.index(attacking, defending)
            .map(|i| self.casualties_a[i])
            .unwrap_or(0.0)
    }

    /// Expected number of defending crew lost.
    pub fn defender_casualties(&self, attacking: u32, defending: u32) -> f64 {
        if attacking < 2 || defending == 0 {
            return 0.0;
        }
        self.index(attacking, defending)
            .map(|i| self.casualties_d[i])
            .unwrap_or(0.0)
    }

    /// Total attacking power of `crew` crew members. Zero outside the table.
    pub fn attacker_power(&self, crew: u32) -> f64 {
        lookup(&self.power_a, crew)
    }

    /// Total defending power of `crew` crew members. Zero outside the table.
    pub fn defender_power(&self, crew: u32) -> f64 {
        lookup(&self.power_d, crew)
    }

    fn index(&self, attacking: u32, defending: u32) -> Option<usize> {
        let (a, d) = (attacking as usize, defending as usize);
        if a < 2 || a > self.power_a.len() || d < 1 || d > self.power_d.len() {
            return None;
        }
        Some((a - 2) * self.power_d.len() + (d - 1))
    }

    fn calculate(&mut self) {
        if self.power_d.is_empty() || self.power_a.len() < 2 {
            return;
        }

        // Row `a` (attacker crew) starts at 2: with a single crew member left
        // the attacker can never take the ship.
        let up = self.power_d.len();
        let size = up * (self.power_a.len() - 1);
        self.capture = vec![0.0; size];
        self.casualties_a = vec![0.0; size];
        self.casualties_d = vec![0.0; size];

        let mut index = 0;
        for a in 2..=self.power_a.len() {
            let ap = self.power_a[a - 1];
            for d in 1..=up {
                let dp = self.power_d[d - 1];
                let total = ap + dp;
                // Probability the attacker wins this round.
                let p = if total > 0.0 { ap / total } else { 0.0 };

                let mut odds = p;
                let mut att_casualties = 1.0 - p;
                let mut def_casualties = p;
                if d > 1 {
                    odds *= self.capture[index - 1];
                    att_casualties += p * self.casualties_a[index - 1];
                    def_casualties += p * self.casualties_d[index - 1];
                }
                if a > 2 {
                    odds += (1.0 - p) * self.capture[index - up];
                    att_casualties += (1.0 - p) * self.casualties_a[index - up];
                    def_casualties += (1.0 - p) * self.casualties_d[index - up];
                }
                self.capture[index] = odds;
                self.casualties_a[index] = att_casualties;
                self.casualties_d[index] = def_casualties;
                index += 1;
            }
        }
    }
}

fn lookup(power: &[f64], crew: u32) -> f64 {
    match (crew as usize).checked_sub(1) {
        Some(i) if i < power.len() => power[i],
        _ => 0.0,
    }
}
