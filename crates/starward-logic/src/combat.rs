//! Hand-to-hand combat resolution between a boarding party and a victim crew.
//!
//! The resolver itself is stateless apart from the two precomputed odds
//! tables: one for the boarder attacking the victim, one for the victim
//! attacking the boarder. Crew counts live with the caller and are mutated
//! in place by [`CaptureResolver::resolve_action`].
//!
//! Each action resolves `max(1, start_crew / 5)` rounds. In a round the loser
//! is drawn with probability proportional to the other side's power:
//!
//! ```text
//! total = your_power + enemy_power
//! roll  = uniform[0, 1) * total
//! roll >= your_power  => you lose one crew
//! otherwise           => they lose one crew
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::capture_odds::CaptureOdds;

/// Odds above which the defenders choose to attack rather than hold.
pub const ENEMY_ATTACK_THRESHOLD: f64 = 0.5;

/// Crew per extra round resolved in a single action.
pub const CREW_PER_ROUND: u32 = 5;

/// Which side of the fight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// The boarding (player) ship.
    Boarder,
    /// The ship being boarded.
    Victim,
}

/// What each side does in an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stance {
    pub you_attack: bool,
    pub enemy_attacks: bool,
}

impl Stance {
    /// Neither side attacks: both retreat and combat ends.
    pub fn is_mutual_retreat(&self) -> bool {
        !self.you_attack && !self.enemy_attacks
    }
}

/// Casualties from one action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub rounds: u32,
    pub your_casualties: u32,
    pub enemy_casualties: u32,
}

/// Values shown to the player while deciding whether to fight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatReport {
    pub your_attack: f64,
    pub your_defense: f64,
    pub enemy_attack: f64,
    pub enemy_defense: f64,
    /// Capture odds. Before combat starts this also folds in the victim's
    /// self-destruct chance, as an estimate only.
    pub attack_odds: f64,
    pub attack_casualties: f64,
    /// Odds of fending off an enemy attack.
    pub defense_odds: f64,
    pub defense_casualties: f64,
}

/// Number of rounds resolved per player action.
pub fn rounds_per_action(your_start_crew: u32) -> u32 {
    (your_start_crew / CREW_PER_ROUND).max(1)
}

/// Resolve a single round. Returns the side that loses a crew member, or
/// `None` if neither side has any power (no winner can be determined).
pub fn resolve_round(your_power: f64, enemy_power: f64, rng: &mut impl Rng) -> Option<Side> {
    let total = your_power + enemy_power;
    if total.is_nan() || total <= 0.0 {
        return None;
    }
    if rng.gen::<f64>() * total >= your_power {
        Some(Side::Boarder)
    } else {
        Some(Side::Victim)
    }
}

/// One uniform draw against the victim's self-destruct probability.
pub fn self_destructs(probability: f64, rng: &mut impl Rng) -> bool {
    rng.gen::<f64>() < probability
}

/// Attack odds as displayed: discounted by the self-destruct chance until
/// capture combat has started. This is a separate estimate from the actual
/// roll made when capture begins.
pub fn displayed_attack_odds(odds: f64, self_destruct: f64, is_capturing: bool) -> f64 {
    if is_capturing {
        odds
    } else {
        odds * (1.0 - self_destruct)
    }
}

/// The pair of odds tables driving one boarding encounter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptureResolver {
    /// Boarder attacking, victim defending.
    attack: CaptureOdds,
    /// Victim attacking, boarder defending.
    defense: CaptureOdds,
}

impl CaptureResolver {
    pub fn new(attack: CaptureOdds, defense: CaptureOdds) -> Self {
        Self { attack, defense }
    }

    pub fn attack_odds(&self) -> &CaptureOdds {
        &self.attack
    }

    pub fn defense_odds(&self) -> &CaptureOdds {
        &self.defense
    }

    /// Decide both sides' stance for an action.
    ///
    /// The boarder can only attack with more than one crew unless the victim
    /// needs no crew at all. The defenders attack when their own odds of
    /// taking your ship are good, except that holding on the very first
    /// action lets the boarder withdraw in peace.
    pub fn stance(
        &self,
        wants_attack: bool,
        your_crew: u32,
        enemy_crew: u32,
        victim_required_crew: u32,
        is_first_action: bool,
    ) -> Stance {
        let you_attack = wants_attack && (your_crew > 1 || victim_required_crew == 0);
        let mut enemy_attacks = self.defense.odds(enemy_crew, your_crew) > ENEMY_ATTACK_THRESHOLD;
        if is_first_action && !you_attack {
            enemy_attacks = false;
        }
        Stance {
            you_attack,
            enemy_attacks,
        }
    }

    /// Resolve the rounds of one action, removing crew from either side.
    ///
    /// Stops early once either side is out of crew or no winner can be
    /// determined for a round.
    pub fn resolve_action(
        &self,
        stance: Stance,
        your_crew: &mut u32,
        enemy_crew: &mut u32,
        rng: &mut impl Rng,
    ) -> ActionResult {
        let your_start = *your_crew;
        let enemy_start = *enemy_crew;
        let mut result = ActionResult::default();

        for _ in 0..rounds_per_action(your_start) {
            if *your_crew == 0 || *enemy_crew == 0 {
                break;
            }

            let your_power = if stance.you_attack {
                self.attack.attacker_power(*your_crew)
            } else {
                self.defense.defender_power(*your_crew)
            };
            let enemy_power = if stance.enemy_attacks {
                self.defense.attacker_power(*enemy_crew)
            } else {
                self.attack.defender_power(*enemy_crew)
            };

            match resolve_round(your_power, enemy_power, rng) {
                Some(Side::Boarder) => *your_crew -= 1,
                Some(Side::Victim) => *enemy_crew -= 1,
                None => break,
            }
            result.rounds += 1;
        }

        result.your_casualties = your_start - *your_crew;
        result.enemy_casualties = enemy_start - *enemy_crew;
        result
    }

    /// Build the displayed combat figures for the current crew counts.
    pub fn report(
        &self,
        your_crew: u32,
        enemy_crew: u32,
        self_destruct: f64,
        is_capturing: bool,
    ) -> CombatReport {
        CombatReport {
            your_attack: self.attack.attacker_power(your_crew),
            your_defense: self.defense.defender_power(your_crew),
            enemy_attack: self.defense.attacker_power(enemy_crew),
            enemy_defense: self.attack.defender_power(enemy_crew),
            attack_odds: displayed_attack_odds(
                self.attack.odds(your_crew, enemy_crew),
                self_destruct,
                is_capturing,
            ),
            attack_casualties: self.attack.attacker_casualties(your_crew, enemy_crew),
            defense_odds: 1.0 - self.defense.odds(enemy_crew, your_crew),
            defense_casualties: self.defense.defender_casualties(enemy_crew, your_crew),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture_odds::crew_power;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn resolver(your_crew: u32, enemy_crew: u32) -> CaptureResolver {
        let attack = CaptureOdds::new(
            crew_power(&[], your_crew, 1.0),
            crew_power(&[], enemy_crew, 2.0),
        );
        let defense = CaptureOdds::new(
            crew_power(&[], enemy_crew, 1.0),
            crew_power(&[], your_crew, 2.0),
        );
        CaptureResolver::new(attack, defense)
    }

    #[test]
    fn test_rounds_per_action() {
        assert_eq!(rounds_per_action(0), 1);
        assert_eq!(rounds_per_action(4), 1);
        assert_eq!(rounds_per_action(5), 1);
        assert_eq!(rounds_per_action(12), 2);
        assert_eq!(rounds_per_action(50), 10);
    }

    #[test]
    fn test_round_without_power_has_no_loser() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(resolve_round(0.0, 0.0, &mut rng), None);
    }

    #[test]
    fn test_round_with_one_sided_power() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..100 {
            assert_eq!(resolve_round(5.0, 0.0, &mut rng), Some(Side::Victim));
            assert_eq!(resolve_round(0.0, 5.0, &mut rng), Some(Side::Boarder));
        }
    }

    #[test]
    fn test_self_destruct_probability_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            assert!(!self_destructs(0.0, &mut rng));
            assert!(self_destructs(1.0, &mut rng));
        }
    }

    #[test]
    fn test_displayed_odds_discount_only_before_combat() {
        assert!((displayed_attack_odds(0.8, 0.25, false) - 0.6).abs() < 1e-12);
        assert!((displayed_attack_odds(0.8, 0.25, true) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_first_action_defend_forces_enemy_to_hold() {
        // A strong victim would normally attack.
        let resolver = resolver(3, 30);
        let first = resolver.stance(false, 3, 30, 5, true);
        assert!(first.is_mutual_retreat());
        let later = resolver.stance(false, 3, 30, 5, false);
        assert!(later.enemy_attacks);
    }

    #[test]
    fn test_single_crew_cannot_attack_crewed_ship() {
        let resolver = resolver(1, 4);
        assert!(!resolver.stance(true, 1, 4, 2, false).you_attack);
        assert!(resolver.stance(true, 1, 4, 0, false).you_attack);
    }

    #[test]
    fn test_resolve_action_stops_when_victim_has_no_crew() {
        let resolver = resolver(5, 1);
        let mut rng = StdRng::seed_from_u64(4);
        let mut yours = 5;
        let mut theirs = 0;
        let stance = Stance {
            you_attack: true,
            enemy_attacks: false,
        };
        let result = resolver.resolve_action(stance, &mut yours, &mut theirs, &mut rng);
        assert_eq!(result.rounds, 0);
        assert_eq!(yours, 5);
    }

    #[test]
    fn test_repeated_actions_always_terminate() {
        for seed in 0..50 {
            let resolver = resolver(12, 9);
            let mut rng = StdRng::seed_from_u64(seed);
            let (mut yours, mut theirs) = (12, 9);
            let stance = Stance {
                you_attack: true,
                enemy_attacks: true,
            };
            let mut actions = 0;
            while yours > 0 && theirs > 0 {
                let result = resolver.resolve_action(stance, &mut yours, &mut theirs, &mut rng);
                assert!(result.rounds > 0);
                assert_eq!(result.your_casualties + result.enemy_casualties, result.rounds);
                actions += 1;
                assert!(actions < 100);
            }
        }
    }

    #[test]
    fn test_report_uses_both_tables() {
        let resolver = resolver(6, 4);
        let report = resolver.report(6, 4, 0.5, false);
        assert_eq!(report.your_attack, 6.0);
        assert_eq!(report.your_defense, 12.0);
        assert_eq!(report.enemy_attack, 4.0);
        assert_eq!(report.enemy_defense, 8.0);
        let raw = resolver.attack_odds().odds(6, 4);
        assert!((report.attack_odds - raw * 0.5).abs() < 1e-12);
        let capturing = resolver.report(6, 4, 0.5, true);
        assert!((capturing.attack_odds - raw).abs() < 1e-12);
    }
}
