//! Integration tests for boarding: plunder listing, taking, salvage, and
//! hand-to-hand capture.
//!
//! Every test loads the shared content file and seeds the engine, so combat
//! rolls are reproducible.

use hecs::Entity;
use starward_core::player::MECHANIC;
use starward_core::prelude::*;
use starward_logic::plunder::is_sorted;
use starward_core::systems::{
    ships, CaptureStart, CombatOutcome, UiRequest, CAPTURED, COMBAT_BEGINS, COMBAT_HINT,
    NOT_CAPTURABLE, PLAYER_KILLED, RETREAT, SELF_DESTRUCT,
};

const CONTENT: &str = include_str!("../../../data/content.json");

// ── Helpers ────────────────────────────────────────────────────────────

fn engine_with_seed(seed: u64) -> Engine {
    let content = Content::from_json(CONTENT).expect("content should load");
    Engine::new(content, EngineConfig::default().with_seed(seed))
}

/// A Falcon flagship and a disabled pirate ship of `victim_model`, both in Sol.
fn setup(seed: u64, victim_model: &str) -> (Engine, Entity, Entity) {
    setup_with_flagship(seed, "Falcon", victim_model)
}

fn setup_with_flagship(
    seed: u64,
    flagship_model: &str,
    victim_model: &str,
) -> (Engine, Entity, Entity) {
    setup_in(engine_with_seed(seed), flagship_model, victim_model)
}

fn setup_in(
    mut engine: Engine,
    flagship_model: &str,
    victim_model: &str,
) -> (Engine, Entity, Entity) {
    let sol = engine.content.galaxy.system_id("Sol").unwrap();
    let flagship = engine
        .spawn_player_ship(flagship_model, "Resolute", sol)
        .unwrap();
    let victim = engine.spawn_ship(victim_model, "Target", "Pirate", sol).unwrap();
    ships::set_status(&engine.world, victim, ShipStatus::Disabled);
    (engine, flagship, victim)
}

fn index_of(boarding: &BoardingEncounter, name: &str) -> usize {
    boarding
        .ledger()
        .items()
        .iter()
        .position(|item| item.name() == name)
        .unwrap_or_else(|| panic!("{name} should be listed"))
}

/// The shared content plus worthless massless foil and a spread of spare parts.
fn engine_with_spare_parts(seed: u64) -> Engine {
    let mut value: serde_json::Value = serde_json::from_str(CONTENT).unwrap();
    let outfits = value["outfits"].as_array_mut().unwrap();
    for i in 0..3 {
        outfits.push(serde_json::json!({ "name": format!("Foil {i}"), "cost": 0, "mass": 0 }));
    }
    for i in 0..30 {
        outfits.push(serde_json::json!({
            "name": format!("Part {i}"),
            "cost": (i % 7) * 400,
            "mass": 1 + i % 4,
        }));
    }
    let content = Content::from_json(&value.to_string()).expect("content should load");
    Engine::new(content, EngineConfig::default().with_seed(seed))
}

fn outfit_id(engine: &Engine, name: &str) -> OutfitId {
    engine.content.outfits.id(name).unwrap()
}

// ── Plunder listing ────────────────────────────────────────────────────

#[test]
fn listing_is_sorted_and_skips_unplunderable_outfits() {
    let (mut engine, _, victim) = setup(1, "Freighter");
    {
        let mut cargo = engine.world.get::<&mut CargoHold>(victim).unwrap();
        cargo.add_commodity("Food", 10);
        cargo.add_commodity("Medical", 5);
    }
    let boarding = engine.board(victim).unwrap();

    let names: Vec<_> = boarding.ledger().items().iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["Medical", "Shield Generator", "Food"]);

    let medical = &boarding.ledger().items()[0];
    assert_eq!(medical.value(), "4,500");
    let shield = &boarding.ledger().items()[1];
    assert_eq!(shield.size(), "15");
    assert_eq!(shield.value(), "7,500");
}

#[test]
fn boarding_is_reported_as_an_event() {
    let (mut engine, flagship, victim) = setup(2, "Sparrow");
    engine.board(victim).unwrap();
    let event = engine.event_log.back().unwrap();
    assert_eq!(event.kind, ShipEventType::BOARD);
    assert_eq!(event.actor, Some(flagship));
    assert_eq!(event.target, victim);
}

#[test]
fn worthless_massless_outfits_keep_a_long_listing_sorted() {
    for seed in 0..50 {
        let engine = engine_with_spare_parts(seed);
        let (mut engine, _, victim) = setup_in(engine, "Falcon", "Freighter");
        let stowed: Vec<String> = (0..3)
            .map(|i| format!("Foil {i}"))
            .chain((0..30).map(|i| format!("Part {i}")))
            .collect();
        for name in &stowed {
            let id = outfit_id(&engine, name);
            let mass = engine.content.outfits.get(id).unwrap().mass;
            let mut cargo = engine.world.get::<&mut CargoHold>(victim).unwrap();
            assert_eq!(cargo.add_outfit(id, mass, 1), 1);
        }

        let mut boarding = engine.board(victim).unwrap();
        assert!(boarding.ledger().items().len() > 20);
        assert!(is_sorted(boarding.ledger().items()));

        boarding.select(index_of(&boarding, "Foil 1"));
        assert_eq!(boarding.take(&mut engine), 1);
        assert!(is_sorted(boarding.ledger().items()));
    }
}

#[test]
fn event_log_keeps_only_recent_events() {
    let content = Content::from_json(CONTENT).unwrap();
    let config = EngineConfig {
        event_history: 2,
        ..EngineConfig::default().with_seed(8)
    };
    let engine = Engine::new(content, config);
    let (mut engine, flagship, victim) = setup_in(engine, "Falcon", "Sparrow");
    for kind in [
        ShipEventType::SCAN_CARGO,
        ShipEventType::SCAN_OUTFITS,
        ShipEventType::ASSIST,
        ShipEventType::DISABLE,
    ] {
        engine.handle_event(ShipEvent::new(Some(flagship), victim, kind));
    }
    let kinds: Vec<_> = engine.event_log.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![ShipEventType::ASSIST, ShipEventType::DISABLE]);
}

// ── Taking ─────────────────────────────────────────────────────────────

#[test]
fn commodities_are_limited_by_free_cargo() {
    let (mut engine, flagship, victim) = setup(3, "Freighter");
    engine
        .world
        .get::<&mut CargoHold>(victim)
        .unwrap()
        .add_commodity("Food", 80);
    let mut boarding = engine.board(victim).unwrap();
    boarding.select(index_of(&boarding, "Food"));

    assert!(boarding.can_take(&engine));
    assert_eq!(boarding.take(&mut engine), 50);

    let food = &boarding.ledger().items()[index_of(&boarding, "Food")];
    assert_eq!(food.count(), 30);
    assert_eq!(engine.world.get::<&CargoHold>(flagship).unwrap().free(), 0.0);
    assert_eq!(engine.world.get::<&CargoHold>(victim).unwrap().commodity("Food"), 30);
    assert!(!boarding.can_take(&engine));
}

#[test]
fn ammunition_is_installed_before_filling_cargo() {
    let (mut engine, flagship, victim) = setup(4, "Sparrow");
    let rocket = outfit_id(&engine, "Heavy Rocket");
    let mut boarding = engine.board(victim).unwrap();
    boarding.select(index_of(&boarding, "Heavy Rocket"));

    assert_eq!(boarding.take(&mut engine), 6);
    assert_eq!(engine.world.get::<&Loadout>(flagship).unwrap().count(rocket), 10);
    assert_eq!(engine.world.get::<&CargoHold>(flagship).unwrap().outfit(rocket), 1);
    assert_eq!(engine.world.get::<&Loadout>(victim).unwrap().count(rocket), 0);
    assert!(boarding
        .ledger()
        .items()
        .iter()
        .all(|item| item.name() != "Heavy Rocket"));
}

#[test]
fn ammunition_can_be_taken_with_a_full_hold() {
    let (mut engine, flagship, victim) = setup(5, "Sparrow");
    engine
        .world
        .get::<&mut CargoHold>(flagship)
        .unwrap()
        .add_commodity("Metal", 50);
    let mut boarding = engine.board(victim).unwrap();
    boarding.select(index_of(&boarding, "Heavy Rocket"));

    assert!(boarding.can_take(&engine));
    assert_eq!(boarding.take(&mut engine), 5);
    let remaining = index_of(&boarding, "Heavy Rocket");
    assert_eq!(boarding.ledger().items()[remaining].count(), 1);
    boarding.select(remaining);
    assert!(!boarding.can_take(&engine));
}

// ── Salvage ────────────────────────────────────────────────────────────

#[test]
fn salvage_replaces_the_outfit_with_components() {
    let (mut engine, _, victim) = setup(6, "Sparrow");
    let reactor = outfit_id(&engine, "Fusion Reactor");
    let mut boarding = engine.board(victim).unwrap();
    boarding.select(index_of(&boarding, "Fusion Reactor"));
    assert!(boarding.can_salvage(&engine));

    let outcome = boarding.salvage(&mut engine).unwrap();
    assert_eq!(outcome.salvaged, reactor);
    assert!(outcome
        .message
        .starts_with("You salvaged 1 Fusion Reactor into"));
    assert_eq!(
        engine.ui.requests().last(),
        Some(&UiRequest::Dialog(outcome.message.clone()))
    );

    assert_eq!(engine.world.get::<&Loadout>(victim).unwrap().count(reactor), 0);
    let items = boarding.ledger().items();
    assert!(items.iter().all(|item| item.name() != "Fusion Reactor"));
    for &(id, count) in &outcome.yields {
        assert_eq!(engine.world.get::<&CargoHold>(victim).unwrap().outfit(id), count);
        let listed = items
            .iter()
            .find(|item| item.outfit_key() == Some(id))
            .expect("salvaged components are listed");
        assert_eq!(listed.count(), count);
    }
    assert!(starward_logic::plunder::is_sorted(items));
}

#[test]
fn salvage_requires_the_right_tools() {
    let (mut engine, _, victim) = setup_with_flagship(7, "Sparrow", "Freighter");
    let mut boarding = engine.board(victim).unwrap();
    boarding.select(index_of(&boarding, "Shield Generator"));
    assert!(!boarding.can_salvage(&engine));
    assert!(boarding.salvage(&mut engine).is_none());

    let (mut engine, _, victim) = setup(7, "Freighter");
    let mut boarding = engine.board(victim).unwrap();
    boarding.select(index_of(&boarding, "Shield Generator"));
    assert!(boarding.can_salvage(&engine));
}

#[test]
fn mechanic_recovers_every_component() {
    for seed in 0..20 {
        let (mut engine, _, victim) = setup(seed, "Freighter");
        engine.player.conditions.insert(MECHANIC.to_string(), 1);
        let scrap = outfit_id(&engine, "Scrap Metal");
        let cell = outfit_id(&engine, "Power Cell");
        let mut boarding = engine.board(victim).unwrap();
        boarding.select(index_of(&boarding, "Shield Generator"));

        let outcome = boarding.salvage(&mut engine).unwrap();
        let count = |id: OutfitId| {
            outcome
                .yields
                .iter()
                .find(|&&(key, _)| key == id)
                .map_or(0, |&(_, count)| count)
        };
        assert!((1..=3).contains(&count(scrap)));
        assert_eq!(count(cell), 1);
    }
}

// ── Capture ────────────────────────────────────────────────────────────

#[test]
fn ownership_transfer_leaves_bay_ships_to_the_capture() {
    let (mut engine, flagship, carrier) = setup(12, "Carrier");
    let sol = engine.content.galaxy.system_id("Sol").unwrap();
    let fighter = engine.spawn_ship("Fighter", "Wasp", "Pirate", sol).unwrap();
    assert!(ships::load_into_bay(&mut engine.world, carrier, fighter));
    let pirate = ships::government(&engine.world, carrier).unwrap();
    let escort = engine.player.government;

    ships::transfer_ownership(&engine.world, carrier, Owner::Player, escort);
    assert_eq!(ships::owner(&engine.world, carrier), Some(Owner::Player));
    assert_eq!(ships::government(&engine.world, carrier), Some(escort));
    assert_eq!(ships::owner(&engine.world, fighter), Some(Owner::Npc));
    assert_eq!(ships::government(&engine.world, fighter), Some(pirate));

    ships::was_captured(&mut engine.world, carrier, flagship);
    assert_eq!(ships::owner(&engine.world, fighter), Some(Owner::Player));
    assert_eq!(ships::government(&engine.world, fighter), Some(escort));
}

#[test]
fn crewless_ship_is_captured_without_a_round() {
    let (mut engine, flagship, victim) = setup(8, "Sparrow");
    ships::set_crew(&engine.world, flagship, 5);
    ships::set_crew(&engine.world, victim, 0);
    let pirate = engine.content.governments.id("Pirate").unwrap();

    let mut boarding = engine.board(victim).unwrap();
    assert_eq!(boarding.begin_capture(&mut engine), CaptureStart::Started);
    assert_eq!(boarding.messages(), &[COMBAT_BEGINS.to_string(), COMBAT_HINT.to_string()]);

    let action = boarding.act(&mut engine, true).unwrap();
    assert_eq!(action.result.rounds, 0);
    assert_eq!(action.outcome, CombatOutcome::Captured);
    assert_eq!(boarding.messages().last().map(String::as_str), Some(CAPTURED));

    assert_eq!(ships::owner(&engine.world, victim), Some(Owner::Player));
    assert!(engine.player.owns(victim));
    assert_eq!(ships::crew(&engine.world, victim), 1);
    assert_eq!(ships::crew(&engine.world, flagship), 4);
    assert!((engine.reputation(pirate) + 0.5).abs() < 1e-9);

    let last = engine.event_log.back().unwrap();
    assert_eq!(last.kind, ShipEventType::CAPTURE);
    assert_eq!(last.target, victim);
    assert!(boarding.can_exit());
}

#[test]
fn stranded_capture_is_refuelled() {
    let (mut engine, flagship, victim) = setup(9, "Sparrow");
    ships::set_crew(&engine.world, flagship, 5);
    ships::set_crew(&engine.world, victim, 0);
    engine.world.get::<&mut Fuel>(victim).unwrap().current = 20.0;

    let mut boarding = engine.board(victim).unwrap();
    boarding.begin_capture(&mut engine);
    boarding.act(&mut engine, true);

    assert_eq!(engine.world.get::<&Fuel>(victim).unwrap().current, 100.0);
    assert_eq!(engine.world.get::<&Fuel>(flagship).unwrap().current, 420.0);
}

#[test]
fn certain_self_destruct_ends_the_encounter() {
    let (mut engine, _, victim) = setup(10, "Warship");
    engine
        .world
        .get::<&mut Loadout>(victim)
        .unwrap()
        .attributes
        .set("self destruct", 1.0);

    let mut boarding = engine.board(victim).unwrap();
    assert_eq!(boarding.begin_capture(&mut engine), CaptureStart::SelfDestructed);
    assert!(boarding.is_closed());
    assert!(!boarding.can_attack());
    assert_eq!(ships::status(&engine.world, victim), ShipStatus::Destroyed);
    assert_eq!(
        engine.ui.requests().last(),
        Some(&UiRequest::Dialog(SELF_DESTRUCT.to_string()))
    );
    assert_eq!(engine.event_log.back().unwrap().kind, ShipEventType::DESTROY);
}

#[test]
fn uncapturable_ship_refuses_capture() {
    let (mut engine, _, victim) = setup(11, "Drone");
    let mut boarding = engine.board(victim).unwrap();
    assert!(!boarding.can_capture(&engine));
    assert_eq!(boarding.begin_capture(&mut engine), CaptureStart::NotAllowed);
    assert_eq!(boarding.messages(), &[NOT_CAPTURABLE.to_string()]);
    assert!(boarding.report(&engine).capture.is_none());
}

#[test]
fn lone_crew_member_cannot_capture() {
    let (mut engine, flagship, victim) = setup(12, "Sparrow");
    ships::set_crew(&engine.world, flagship, 1);
    let mut boarding = engine.board(victim).unwrap();
    assert!(!boarding.can_capture(&engine));
    assert_eq!(boarding.begin_capture(&mut engine), CaptureStart::NotAllowed);
    assert!(boarding.messages().is_empty());
}

#[test]
fn defending_first_means_both_sides_withdraw() {
    let (mut engine, _, victim) = setup(13, "Sparrow");
    let mut boarding = engine.board(victim).unwrap();
    boarding.begin_capture(&mut engine);
    assert!(!boarding.can_exit());
    assert!(!boarding.exit(&mut engine));
    assert!(!boarding.can_take(&engine));

    let action = boarding.act(&mut engine, false).unwrap();
    assert_eq!(action.outcome, CombatOutcome::Retreated);
    assert!(action.stance.is_mutual_retreat());
    assert_eq!(boarding.messages().last().map(String::as_str), Some(RETREAT));
    assert!(boarding.can_exit());
    assert!(boarding.act(&mut engine, true).is_none());
}

#[test]
fn hopeless_fight_loses_the_flagship() {
    let (mut engine, flagship, victim) = setup(14, "Warship");
    ships::set_crew(&engine.world, flagship, 2);
    ships::set_crew(&engine.world, victim, 20);
    engine
        .world
        .get::<&mut Loadout>(victim)
        .unwrap()
        .attributes
        .set("self destruct", 0.0);

    let mut boarding = engine.board(victim).unwrap();
    assert_eq!(boarding.begin_capture(&mut engine), CaptureStart::Started);

    let mut last = None;
    let mut actions = 0;
    while boarding.can_attack() {
        let before = (
            ships::crew(&engine.world, flagship),
            ships::crew(&engine.world, victim),
        );
        let action = boarding.act(&mut engine, true).unwrap();
        if action.outcome == CombatOutcome::Continuing {
            assert_eq!(
                before.0 - action.result.your_casualties,
                ships::crew(&engine.world, flagship)
            );
            assert_eq!(
                before.1 - action.result.enemy_casualties,
                ships::crew(&engine.world, victim)
            );
        }
        assert!(boarding.messages().len() <= 5);
        last = Some(action.outcome);
        actions += 1;
        assert!(actions < 1000, "combat should terminate");
    }

    assert_eq!(last, Some(CombatOutcome::PlayerKilled));
    assert!(boarding.player_died());
    assert_eq!(boarding.messages().last().map(String::as_str), Some(PLAYER_KILLED));
    assert_eq!(ships::owner(&engine.world, flagship), Some(Owner::Npc));
    assert!(boarding.exit(&mut engine));
    assert!(engine.player.dead);
}

#[test]
fn long_fights_keep_only_recent_messages() {
    let (mut engine, flagship, victim) = setup(15, "Warship");
    ships::set_crew(&engine.world, flagship, 14);
    engine
        .world
        .get::<&mut Loadout>(victim)
        .unwrap()
        .attributes
        .set("self destruct", 0.0);

    let mut boarding = engine.board(victim).unwrap();
    boarding.begin_capture(&mut engine);
    let mut actions = 0;
    while boarding.can_attack() {
        boarding.act(&mut engine, true);
        assert!(boarding.messages().len() <= engine.config.message_history);
        actions += 1;
        assert!(actions < 1000);
    }
    assert!(!boarding.is_capturing());
}

// ── Report ─────────────────────────────────────────────────────────────

#[test]
fn report_shows_capture_estimate_for_capturable_ship() {
    let (mut engine, _, victim) = setup(16, "Sparrow");
    let boarding = engine.board(victim).unwrap();
    let report = boarding.report(&engine);

    assert_eq!(report.your_crew, "4");
    assert_eq!(report.enemy_crew, "1");
    assert_eq!(report.cargo_free, "50");
    // Four crew, each with a rifle: 4 * (1.5 + 1.0).
    assert_eq!(report.your_attack, "10.0");
    let estimate = report.capture.expect("pirate ship can be captured");
    assert!(estimate.attack_odds.ends_with('%'));
    assert!(estimate.defense_odds.ends_with('%'));
}
