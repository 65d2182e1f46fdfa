//! Ship-event flags and the NPC trigger vocabulary.
//!
//! Every notable thing that can happen to a ship (it is boarded, scanned,
//! captured, lands, ...) is a single bit. Missions accumulate these bits per
//! ship and compare the result against their success and failure masks, so
//! the vocabulary is closed and fixed.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Set of ship-event kinds.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ShipEventType: u32 {
        const ASSIST = 1 << 0;
        const DISABLE = 1 << 1;
        const BOARD = 1 << 2;
        const CAPTURE = 1 << 3;
        const DESTROY = 1 << 4;
        const SCAN_CARGO = 1 << 5;
        const SCAN_OUTFITS = 1 << 6;
        /// The ship landed for good and leaves play.
        const LAND = 1 << 7;
    }
}

impl ShipEventType {
    /// Events after which the ship can no longer do anything for a mission.
    pub const REMOVED: ShipEventType = ShipEventType::DESTROY.union(ShipEventType::LAND);

    /// Build a mask from a raw integer, dropping unknown bits.
    pub fn from_raw(bits: u32) -> Self {
        Self::from_bits_truncate(bits)
    }
}

/// One keyword from an NPC definition's trigger list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The listed event must happen to every ship.
    Succeed(ShipEventType),
    /// The listed event must never happen to any ship.
    Fail(ShipEventType),
    /// Every ship must be left behind.
    Evade,
    /// Every ship must travel with the player.
    Accompany,
}

impl Trigger {
    /// Parse a trigger keyword. Returns `None` for unknown words.
    pub fn parse(token: &str) -> Option<Self> {
        let trigger = match token {
            "save" => Trigger::Fail(ShipEventType::DESTROY),
            "kill" => Trigger::Succeed(ShipEventType::DESTROY),
            "board" => Trigger::Succeed(ShipEventType::BOARD),
            "assist" => Trigger::Succeed(ShipEventType::ASSIST),
            "disable" => Trigger::Succeed(ShipEventType::DISABLE),
            "scan cargo" => Trigger::Succeed(ShipEventType::SCAN_CARGO),
            "scan outfits" => Trigger::Succeed(ShipEventType::SCAN_OUTFITS),
            "land" => Trigger::Succeed(ShipEventType::LAND),
            "evade" => Trigger::Evade,
            "accompany" => Trigger::Accompany,
            _ => return None,
        };
        Some(trigger)
    }
}

/// Success/failure conditions folded out of a trigger list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conditions {
    pub succeed_if: ShipEventType,
    pub fail_if: ShipEventType,
    pub must_evade: bool,
    pub must_accompany: bool,
}

impl Conditions {
    /// Apply one trigger.
    pub fn apply(&mut self, trigger: Trigger) {
        match trigger {
            Trigger::Succeed(kind) => self.succeed_if |= kind,
            Trigger::Fail(kind) => self.fail_if |= kind,
            Trigger::Evade => self.must_evade = true,
            Trigger::Accompany => self.must_accompany = true,
        }
    }

    /// Fold a list of keywords, returning the words that were not understood.
    pub fn from_tokens<'a>(tokens: impl IntoIterator<Item = &'a str>) -> (Self, Vec<&'a str>) {
        let mut conditions = Self::default();
        let mut unknown = Vec::new();
        for token in tokens {
            match Trigger::parse(token) {
                Some(trigger) => conditions.apply(trigger),
                None => unknown.push(token),
            }
        }
        (conditions, unknown)
    }

    /// Whether any of the accumulated `actions` are forbidden, or a required
    /// action can no longer happen because the ship left play first.
    pub fn violated_by(&self, actions: ShipEventType) -> bool {
        if actions.intersects(self.fail_if) {
            return true;
        }
        let missing = self.succeed_if.difference(actions);
        !missing.is_empty() && actions.intersects(ShipEventType::REMOVED)
    }

    /// Whether `actions` contains every required event.
    pub fn satisfied_by(&self, actions: ShipEventType) -> bool {
        actions.contains(self.succeed_if)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_keywords() {
        assert_eq!(
            Trigger::parse("save"),
            Some(Trigger::Fail(ShipEventType::DESTROY))
        );
        assert_eq!(
            Trigger::parse("scan outfits"),
            Some(Trigger::Succeed(ShipEventType::SCAN_OUTFITS))
        );
        assert_eq!(Trigger::parse("evade"), Some(Trigger::Evade));
        assert_eq!(Trigger::parse("dance"), None);
    }

    #[test]
    fn test_conditions_from_tokens() {
        let (conditions, unknown) = Conditions::from_tokens(["kill", "board", "save", "juggle"]);
        assert_eq!(
            conditions.succeed_if,
            ShipEventType::DESTROY | ShipEventType::BOARD
        );
        assert_eq!(conditions.fail_if, ShipEventType::DESTROY);
        assert_eq!(unknown, vec!["juggle"]);
    }

    #[test]
    fn test_violated_when_removed_before_requirement() {
        let conditions = Conditions {
            succeed_if: ShipEventType::BOARD,
            ..Default::default()
        };
        assert!(!conditions.violated_by(ShipEventType::SCAN_CARGO));
        assert!(conditions.violated_by(ShipEventType::DESTROY));
        assert!(conditions.violated_by(ShipEventType::LAND));
        // Boarded first, then destroyed: the requirement was already met.
        assert!(!conditions.violated_by(ShipEventType::BOARD | ShipEventType::DESTROY));
    }

    #[test]
    fn test_satisfied_requires_all_bits() {
        let conditions = Conditions {
            succeed_if: ShipEventType::BOARD | ShipEventType::SCAN_CARGO,
            ..Default::default()
        };
        assert!(!conditions.satisfied_by(ShipEventType::BOARD));
        assert!(conditions.satisfied_by(
            ShipEventType::BOARD | ShipEventType::SCAN_CARGO | ShipEventType::ASSIST
        ));
    }

    #[test]
    fn test_from_raw_drops_unknown_bits() {
        let mask = ShipEventType::from_raw(0xFFFF_0004);
        assert_eq!(mask, ShipEventType::BOARD);
    }
}
