//! Boarding encounters.
//!
//! Boarding a disabled ship opens an encounter with two phases. While
//! plundering, the player picks items from the [`PlunderLedger`] to take or
//! salvage. Starting a capture breaks into the ship and switches to
//! hand-to-hand combat, resolved action by action until one crew is gone or
//! both sides stand down. The player cannot leave mid-combat.

use std::collections::BTreeSet;

use hecs::Entity;
use log::info;
use starward_logic::capture_odds::{crew_power, CaptureOdds};
use starward_logic::combat::{self, ActionResult, CaptureResolver, CombatReport, Stance};
use starward_logic::events::ShipEventType;
use starward_logic::format;

use super::events::{ShipEvent, UiRequest};
use super::ledger::{self, PlunderLedger, SalvageOutcome};
use super::ships;
use crate::components::*;
use crate::engine::Engine;
use crate::player::MECHANIC;

pub const COMBAT_BEGINS: &str = "The airlock blasts open. Combat has begun!";
pub const COMBAT_HINT: &str = "(It will end if you both choose to \"defend.\")";
pub const RETREAT: &str = "You retreat to your ships. Combat ends.";
pub const PLAYER_KILLED: &str = "You have been killed. Your ship is lost.";
pub const CAPTURED: &str = "You have succeeded in capturing this ship.";
pub const NOT_CAPTURABLE: &str = "This is not a ship that you can capture.";
pub const SELF_DESTRUCT: &str = "The moment you blast through the airlock, a series of explosions \
    rocks the enemy ship. They appear to have set off their self-destruct sequence...";

/// What happened when the player tried to start a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStart {
    NotAllowed,
    /// The victim blew itself up; the encounter is over.
    SelfDestructed,
    Started,
}

/// How combat stands after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatOutcome {
    Continuing,
    Retreated,
    Captured,
    PlayerKilled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionOutcome {
    pub stance: Stance,
    pub result: ActionResult,
    pub outcome: CombatOutcome,
}

/// Capture estimate lines of the boarding report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureEstimate {
    pub attack_odds: String,
    pub attack_casualties: String,
    pub defense_odds: String,
    pub defense_casualties: String,
}

/// Figures shown on the boarding screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardingReport {
    pub cargo_free: String,
    pub your_crew: String,
    pub your_attack: String,
    pub your_defense: String,
    pub enemy_crew: String,
    pub enemy_attack: String,
    pub enemy_defense: String,
    /// Only for a ship that can be captured.
    pub capture: Option<CaptureEstimate>,
}

#[derive(Debug)]
pub struct BoardingEncounter {
    you: Entity,
    victim: Entity,
    ledger: PlunderLedger,
    selected: usize,
    resolver: CaptureResolver,
    used_ammo: BTreeSet<OutfitId>,
    is_capturing: bool,
    is_first_action: bool,
    player_died: bool,
    closed: bool,
    messages: Vec<String>,
}

impl BoardingEncounter {
    /// Open an encounter between the player's flagship and `victim`.
    /// Returns `None` if the player has no flagship.
    pub fn new(engine: &Engine, victim: Entity) -> Option<Self> {
        let you = engine.player.flagship?;
        Some(Self::between(engine, you, victim))
    }

    /// Open an encounter between two specific ships.
    pub fn between(engine: &Engine, you: Entity, victim: Entity) -> Self {
        let world = &engine.world;
        let content = &engine.content;
        let config = &engine.config;

        let your_crew = ships::crew(world, you);
        let victim_crew = ships::crew(world, victim);
        let (your_attack, your_defense) = ships::capture_weapons(world, &content.outfits, you);
        let (their_attack, their_defense) = ships::capture_weapons(world, &content.outfits, victim);

        let attack = CaptureOdds::new(
            crew_power(&your_attack, your_crew, config.attacking_crew_power),
            crew_power(&their_defense, victim_crew, config.defending_crew_power),
        );
        let defense = CaptureOdds::new(
            crew_power(&their_attack, victim_crew, config.attacking_crew_power),
            crew_power(&your_defense, your_crew, config.defending_crew_power),
        );

        Self {
            you,
            victim,
            ledger: PlunderLedger::for_victim(
                world,
                content,
                victim,
                engine.player.system,
                config.depreciation,
            ),
            selected: 0,
            resolver: CaptureResolver::new(attack, defense),
            used_ammo: ledger::used_ammo(world, content, you),
            is_capturing: false,
            is_first_action: true,
            player_died: false,
            closed: false,
            messages: Vec::new(),
        }
    }

    pub fn you(&self) -> Entity {
        self.you
    }

    pub fn victim(&self) -> Entity {
        self.victim
    }

    pub fn ledger(&self) -> &PlunderLedger {
        &self.ledger
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Select a plunder line. Out-of-range selections are ignored.
    pub fn select(&mut self, index: usize) {
        if index < self.ledger.len() {
            self.selected = index;
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn is_capturing(&self) -> bool {
        self.is_capturing
    }

    pub fn player_died(&self) -> bool {
        self.player_died
    }

    /// The encounter has ended and nothing more can be done.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn can_exit(&self) -> bool {
        !self.is_capturing
    }

    pub fn can_attack(&self) -> bool {
        self.is_capturing && !self.closed
    }

    fn is_yours(engine: &Engine, ship: Entity) -> bool {
        ships::owner(&engine.world, ship) == Some(Owner::Player)
    }

    /// Plundering is possible while neither ship has changed hands and no
    /// fight is in progress.
    fn can_plunder(&self, engine: &Engine) -> bool {
        !self.closed
            && !self.is_capturing
            && !self.player_died
            && Self::is_yours(engine, self.you)
            && !Self::is_yours(engine, self.victim)
    }

    pub fn can_take(&self, engine: &Engine) -> bool {
        self.can_plunder(engine)
            && self
                .ledger
                .can_take(self.selected, &engine.world, &engine.content, self.you)
    }

    pub fn can_salvage(&self, engine: &Engine) -> bool {
        self.can_plunder(engine)
            && self
                .ledger
                .can_salvage(self.selected, &engine.world, &engine.content, self.you)
    }

    pub fn can_capture(&self, engine: &Engine) -> bool {
        if !self.can_plunder(engine) || !ships::is_capturable(&engine.world, self.victim) {
            return false;
        }
        ships::required_crew(&engine.world, self.victim) == 0
            || ships::crew(&engine.world, self.you) > 1
    }

    /// Take as much of the selected item as fits. Returns the units moved.
    pub fn take(&mut self, engine: &mut Engine) -> u32 {
        if !self.can_take(engine) {
            return 0;
        }
        let taken = self.ledger.take(
            self.selected,
            &engine.world,
            &engine.content,
            self.you,
            self.victim,
            &self.used_ammo,
        );
        self.clamp_selection();
        taken
    }

    /// Break down one unit of the selected outfit and show what it yielded.
    pub fn salvage(&mut self, engine: &mut Engine) -> Option<SalvageOutcome> {
        if !self.can_salvage(engine) {
            return None;
        }
        let outcome = self.ledger.salvage(
            self.selected,
            &engine.world,
            &engine.content,
            self.you,
            self.victim,
            engine.config.depreciation,
            engine.player.condition(MECHANIC) > 0,
            &mut engine.rng,
        )?;
        engine.ui.push(UiRequest::Dialog(outcome.message.clone()));
        self.clamp_selection();
        Some(outcome)
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.ledger.len().saturating_sub(1));
    }

    /// Break into the victim's ship. The victim may self-destruct instead.
    pub fn begin_capture(&mut self, engine: &mut Engine) -> CaptureStart {
        if !self.can_capture(engine) {
            if !self.closed
                && !self.is_capturing
                && !ships::is_capturable(&engine.world, self.victim)
            {
                self.push_message(engine, NOT_CAPTURABLE.to_string());
            }
            return CaptureStart::NotAllowed;
        }

        let chance = ships::self_destruct_chance(&engine.world, self.victim);
        if combat::self_destructs(chance, &mut engine.rng) {
            info!("{} self-destructed when boarded", ships::name(&engine.world, self.victim));
            ships::set_status(&engine.world, self.victim, ShipStatus::Destroyed);
            self.closed = true;
            engine.ui.push(UiRequest::Dialog(SELF_DESTRUCT.to_string()));
            engine.handle_event(ShipEvent::new(
                Some(self.you),
                self.victim,
                ShipEventType::DESTROY,
            ));
            return CaptureStart::SelfDestructed;
        }

        self.is_capturing = true;
        self.push_message(engine, COMBAT_BEGINS.to_string());
        self.push_message(engine, COMBAT_HINT.to_string());
        CaptureStart::Started
    }

    /// Resolve one combat action: attack if `attack`, otherwise defend.
    pub fn act(&mut self, engine: &mut Engine, attack: bool) -> Option<ActionOutcome> {
        if !self.can_attack() {
            return None;
        }

        let mut your_crew = ships::crew(&engine.world, self.you);
        let mut enemy_crew = ships::crew(&engine.world, self.victim);
        let stance = self.resolver.stance(
            attack,
            your_crew,
            enemy_crew,
            ships::required_crew(&engine.world, self.victim),
            self.is_first_action,
        );
        self.is_first_action = false;

        if stance.is_mutual_retreat() {
            self.is_capturing = false;
            self.push_message(engine, RETREAT.to_string());
            return Some(ActionOutcome {
                stance,
                result: ActionResult::default(),
                outcome: CombatOutcome::Retreated,
            });
        }

        let result =
            self.resolver
                .resolve_action(stance, &mut your_crew, &mut enemy_crew, &mut engine.rng);
        ships::set_crew(&engine.world, self.you, your_crew);
        ships::set_crew(&engine.world, self.victim, enemy_crew);

        let mut message = String::from(if stance.you_attack {
            "You attack. "
        } else {
            "You defend. "
        });
        message.push_str(&casualty_text(result));
        self.push_message(engine, message.trim_end().to_string());

        let outcome = if your_crew == 0 {
            self.lose_flagship(engine);
            CombatOutcome::PlayerKilled
        } else if enemy_crew == 0 {
            self.capture(engine);
            CombatOutcome::Captured
        } else {
            CombatOutcome::Continuing
        };

        Some(ActionOutcome {
            stance,
            result,
            outcome,
        })
    }

    fn lose_flagship(&mut self, engine: &mut Engine) {
        self.push_message(engine, PLAYER_KILLED.to_string());
        ships::was_captured(&mut engine.world, self.you, self.victim);
        self.player_died = true;
        self.is_capturing = false;
        info!("Player killed boarding {}", ships::name(&engine.world, self.victim));
    }

    fn capture(&mut self, engine: &mut Engine) {
        self.push_message(engine, CAPTURED.to_string());
        self.is_capturing = false;

        if let Some(government) = ships::government(&engine.world, self.victim) {
            let required = ships::required_crew(&engine.world, self.victim);
            engine.offend(government, ShipEventType::CAPTURE, required);
        }

        ships::was_captured(&mut engine.world, self.victim, self.you);

        let victim_fuel = engine.world.get::<&Fuel>(self.victim).map(|f| *f).ok();
        let your_fuel = engine.world.get::<&Fuel>(self.you).map(|f| *f).ok();
        if let (Some(theirs), Some(yours)) = (victim_fuel, your_fuel) {
            if theirs.jumps_remaining() == 0 && yours.can_refuel(&theirs) {
                ships::transfer_fuel(
                    &engine.world,
                    self.you,
                    self.victim,
                    theirs.jump_fuel_missing(),
                );
            }
        }

        engine.player.add_ship(self.victim);
        for carried in ships::carried_ships(&engine.world, self.victim) {
            engine.player.add_ship(carried);
            engine.handle_event(ShipEvent::new(
                Some(self.you),
                carried,
                ShipEventType::CAPTURE,
            ));
        }
        info!("Captured {}", ships::name(&engine.world, self.victim));
        engine.handle_event(ShipEvent::new(
            Some(self.you),
            self.victim,
            ShipEventType::CAPTURE,
        ));
    }

    /// Leave the encounter. Refused while combat is under way.
    pub fn exit(&mut self, engine: &mut Engine) -> bool {
        if !self.can_exit() {
            return false;
        }
        if self.player_died {
            engine.player.dead = true;
        }
        self.closed = true;
        true
    }

    /// Current combat figures.
    pub fn combat_report(&self, engine: &Engine) -> CombatReport {
        self.resolver.report(
            ships::crew(&engine.world, self.you),
            ships::crew(&engine.world, self.victim),
            ships::self_destruct_chance(&engine.world, self.victim),
            self.is_capturing,
        )
    }

    /// The figures formatted for display.
    pub fn report(&self, engine: &Engine) -> BoardingReport {
        let world = &engine.world;
        let numbers = self.combat_report(engine);
        let cargo_free = world
            .get::<&CargoHold>(self.you)
            .map(|cargo| cargo.free())
            .unwrap_or(0.0);

        let capture = (ships::is_capturable(world, self.victim)
            && !Self::is_yours(engine, self.victim))
        .then(|| CaptureEstimate {
            attack_odds: percent(numbers.attack_odds),
            attack_casualties: format::round1(numbers.attack_casualties),
            defense_odds: percent(numbers.defense_odds),
            defense_casualties: format::round1(numbers.defense_casualties),
        });

        BoardingReport {
            cargo_free: format::number(cargo_free),
            your_crew: ships::crew(world, self.you).to_string(),
            your_attack: format::round1(numbers.your_attack),
            your_defense: format::round1(numbers.your_defense),
            enemy_crew: ships::crew(world, self.victim).to_string(),
            enemy_attack: format::round1(numbers.enemy_attack),
            enemy_defense: format::round1(numbers.enemy_defense),
            capture,
        }
    }

    fn push_message(&mut self, engine: &Engine, message: String) {
        self.messages.push(message);
        let keep = engine.config.message_history;
        if self.messages.len() > keep {
            let excess = self.messages.len() - keep;
            self.messages.drain(..excess);
        }
    }
}

fn casualty_text(result: ActionResult) -> String {
    match (result.your_casualties, result.enemy_casualties) {
        (0, 0) => String::new(),
        (yours, 0) => format!("You lose {} crew.", yours),
        (0, theirs) => format!("They lose {} crew.", theirs),
        (yours, theirs) => format!("You lose {} crew; they lose {}.", yours, theirs),
    }
}

fn percent(odds: f64) -> String {
    format!("{}%", format::round1(100.0 * odds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_casualty_text() {
        let result = |yours, theirs| ActionResult {
            rounds: yours + theirs,
            your_casualties: yours,
            enemy_casualties: theirs,
        };
        assert_eq!(casualty_text(result(0, 0)), "");
        assert_eq!(casualty_text(result(2, 0)), "You lose 2 crew.");
        assert_eq!(casualty_text(result(0, 3)), "They lose 3 crew.");
        assert_eq!(casualty_text(result(1, 4)), "You lose 1 crew; they lose 4.");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0.625), "62.5%");
        assert_eq!(percent(1.0), "100.0%");
    }
}
