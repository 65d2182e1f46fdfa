//! Starward Headless Simulation Harness
//!
//! Loads content, runs boarding encounters and mission NPC lifecycles
//! entirely in-process, and checks the results against the rules they are
//! meant to follow.
//!
//! Usage:
//!   cargo run -p starward-simtest
//!   cargo run -p starward-simtest -- --verbose --seed 7 -n 5000
//!
//! `STARWARD_CONTENT` may point at another content file; only the content
//! checks use it; the scenario checks always run on the bundled file.

use std::time::Instant;

use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use starward_core::prelude::*;
use starward_core::systems::{ships, CaptureStart, CombatOutcome, UiRequest, MISSION_FAILED};
use starward_logic::capture_odds::{crew_power, CaptureOdds};
use starward_logic::combat::{resolve_round, Side};
use starward_logic::plunder::is_sorted;

const CONTENT_JSON: &str = include_str!("../../../data/content.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

struct Options {
    verbose: bool,
    seed: u64,
    trials: u32,
}

impl Options {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut options = Options {
            verbose: false,
            seed: 7,
            trials: 2000,
        };
        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--verbose" | "-v" => options.verbose = true,
                "--seed" => {
                    i += 1;
                    match args.get(i).and_then(|s| s.parse().ok()) {
                        Some(seed) => options.seed = seed,
                        None => warn!("--seed needs a number"),
                    }
                }
                "-n" => {
                    i += 1;
                    match args.get(i).and_then(|s| s.parse().ok()) {
                        Some(trials) => options.trials = trials,
                        None => warn!("-n needs a number"),
                    }
                }
                other => warn!("Ignoring unknown argument {}", other),
            }
            i += 1;
        }
        options
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let options = Options::from_args();
    println!("=== Starward Simulation Harness ===\n");
    info!("seed {}, {} trials", options.seed, options.trials);

    let mut results = Vec::new();

    // 1. Content loading and instantiation
    results.extend(validate_content(&options));

    // 2. Capture odds against simulated fights
    results.extend(validate_capture_odds(&options));

    // 3. Boarding: plunder and capture
    results.extend(validate_boarding(&options));

    // 4. Mission NPC lifecycle
    results.extend(validate_npc_lifecycle(&options));

    // 5. Timing
    results.extend(measure_timing(&options));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || options.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn bundled_engine(seed: u64) -> Option<Engine> {
    let content = Content::from_json(CONTENT_JSON).ok()?;
    let mut engine = Engine::new(content, EngineConfig::default().with_seed(seed));
    let sol = engine.content.galaxy.system_id("Sol")?;
    engine.spawn_player_ship("Falcon", "Resolute", sol).ok()?;
    Some(engine)
}

// ── 1. Content ──────────────────────────────────────────────────────────

fn validate_content(options: &Options) -> Vec<TestResult> {
    println!("--- Content ---");
    let mut results = Vec::new();

    let (source, text) = match std::env::var("STARWARD_CONTENT") {
        Ok(path) => match std::fs::read_to_string(&path) {
            Ok(text) => (path, text),
            Err(e) => {
                results.push(TestResult::new(
                    "content_read",
                    false,
                    format!("{}: {}", path, e),
                ));
                return results;
            }
        },
        Err(_) => ("bundled content".to_string(), CONTENT_JSON.to_string()),
    };

    let content = match Content::from_json(&text) {
        Ok(content) => content,
        Err(e) => {
            results.push(TestResult::new("content_parse", false, format!("{}: {}", source, e)));
            return results;
        }
    };
    results.push(TestResult::new(
        "content_parse",
        true,
        format!(
            "{}: {} systems, {} outfits, {} ship models, {} missions",
            source,
            content.galaxy.systems().count(),
            content.outfits.len(),
            content.ships.len(),
            content.missions.len()
        ),
    ));

    // Links must run both ways
    let galaxy = &content.galaxy;
    let one_way: Vec<String> = galaxy
        .systems()
        .flat_map(|s| {
            s.links
                .iter()
                .filter(|&&link| {
                    galaxy
                        .system(link)
                        .is_some_and(|other| !other.links.contains(&s.id))
                })
                .map(move |&link| format!("{} -> {}", s.name, galaxy.system_name(link)))
        })
        .collect();
    results.push(TestResult::new(
        "content_symmetric_links",
        one_way.is_empty(),
        if one_way.is_empty() {
            "every link runs both ways".to_string()
        } else {
            one_way.join(", ")
        },
    ));

    // Every mission instantiates from the first system to the first landable planet
    let origin = content.galaxy.systems().next().map(|s| s.id);
    let destination = content
        .galaxy
        .planets()
        .find(|p| p.can_land && !p.wormhole)
        .map(|p| p.id);
    let (Some(origin), Some(destination)) = (origin, destination) else {
        results.push(TestResult::new(
            "content_missions_instantiate",
            false,
            "no system or landable planet to run missions between",
        ));
        return results;
    };

    let mut names: Vec<String> = content.missions.keys().cloned().collect();
    names.sort();
    let mut engine = Engine::new(content, EngineConfig::default().with_seed(options.seed));
    engine.player.system = Some(origin);
    let mut failures = Vec::new();
    let mut ship_count = 0;
    for name in &names {
        match engine.accept_mission(name, origin, destination) {
            Ok(index) => {
                let mission = &engine.player.missions[index];
                ship_count += mission.npcs().iter().map(|n| n.ships().len()).sum::<usize>();
                if mission.description().contains("<npc>") {
                    failures.push(format!("{}: <npc> left unsubstituted", name));
                }
            }
            Err(e) => failures.push(format!("{}: {}", name, e)),
        }
    }
    results.push(TestResult::new(
        "content_missions_instantiate",
        failures.is_empty(),
        if failures.is_empty() {
            format!("{} missions, {} NPC ships", names.len(), ship_count)
        } else {
            failures.join("; ")
        },
    ));

    results
}

// ── 2. Capture Odds ─────────────────────────────────────────────────────

/// Fight to the end one round at a time, the attacker always attacking.
fn simulate_capture(odds: &CaptureOdds, attackers: u32, defenders: u32, rng: &mut StdRng) -> bool {
    let (mut a, mut d) = (attackers, defenders);
    while a >= 2 && d > 0 {
        match resolve_round(odds.attacker_power(a), odds.defender_power(d), rng) {
            Some(Side::Boarder) => a -= 1,
            Some(Side::Victim) => d -= 1,
            None => return false,
        }
    }
    d == 0
}

fn validate_capture_odds(options: &Options) -> Vec<TestResult> {
    println!("--- Capture Odds ---");
    let mut results = Vec::new();

    let odds = CaptureOdds::new(
        crew_power(&[(1.5, 6)], 12, 1.0),
        crew_power(&[(1.0, 4)], 8, 2.0),
    );

    // Bounds and monotonicity
    let mut in_bounds = true;
    let mut monotonic = true;
    for d in 1..=8 {
        let mut last = 0.0;
        for a in 2..=12 {
            let p = odds.odds(a, d);
            in_bounds &= (0.0..=1.0).contains(&p);
            monotonic &= p + 1e-12 >= last;
            last = p;
        }
    }
    results.push(TestResult::new(
        "odds_bounded",
        in_bounds,
        "every table entry lies in [0, 1]",
    ));
    results.push(TestResult::new(
        "odds_monotonic",
        monotonic,
        "more attackers never lowers the odds",
    ));

    // Table against simulation
    let mut rng = StdRng::seed_from_u64(options.seed);
    let trials = options.trials.max(1);
    let tolerance = 2.0 / (trials as f64).sqrt();
    for (a, d) in [(12u32, 8u32), (6, 4), (3, 2)] {
        let wins = (0..trials)
            .filter(|_| simulate_capture(&odds, a, d, &mut rng))
            .count();
        let observed = wins as f64 / trials as f64;
        let expected = odds.odds(a, d);
        results.push(TestResult::new(
            &format!("odds_match_simulation_{}v{}", a, d),
            (observed - expected).abs() <= tolerance,
            format!(
                "table {:.3}, simulated {:.3} over {} fights (tolerance {:.3})",
                expected, observed, trials, tolerance
            ),
        ));
    }

    results
}

// ── 3. Boarding ─────────────────────────────────────────────────────────

fn validate_boarding(options: &Options) -> Vec<TestResult> {
    println!("--- Boarding ---");
    let mut results = Vec::new();

    let Some(mut engine) = bundled_engine(options.seed) else {
        results.push(TestResult::new("boarding_setup", false, "bundled content failed to load"));
        return results;
    };
    let Some(sol) = engine.content.galaxy.system_id("Sol") else {
        return results;
    };
    let Ok(victim) = engine.spawn_ship("Sparrow", "Cutthroat", "Pirate", sol) else {
        results.push(TestResult::new("boarding_setup", false, "cannot spawn a Sparrow"));
        return results;
    };
    ships::set_status(&engine.world, victim, ShipStatus::Disabled);
    if let Ok(mut cargo) = engine.world.get::<&mut CargoHold>(victim) {
        cargo.add_commodity("Medical", 4);
        cargo.add_commodity("Food", 12);
    }

    let Some(mut boarding) = engine.board(victim) else {
        results.push(TestResult::new("boarding_setup", false, "player has no flagship"));
        return results;
    };

    results.push(TestResult::new(
        "boarding_ledger_sorted",
        is_sorted(boarding.ledger().items()),
        format!("{} items listed by value per ton", boarding.ledger().len()),
    ));

    // Take everything that fits, salvaging what can be salvaged first
    let mut salvaged = 0;
    let mut taken = 0;
    let mut guard = 0;
    while !boarding.ledger().is_empty() && guard < 100 {
        guard += 1;
        boarding.select(0);
        if boarding.can_salvage(&engine) && boarding.salvage(&mut engine).is_some() {
            salvaged += 1;
            continue;
        }
        let moved = boarding.take(&mut engine);
        if moved == 0 {
            break;
        }
        taken += moved;
    }
    let dialogs = engine
        .ui
        .requests()
        .iter()
        .filter(|r| matches!(r, UiRequest::Dialog(_)))
        .count();
    results.push(TestResult::new(
        "boarding_plunder",
        taken > 0 && dialogs == salvaged && is_sorted(boarding.ledger().items()),
        format!("{} units taken, {} outfits salvaged", taken, salvaged),
    ));

    // Capture fights always end, across many seeds
    let mut outcomes = [0usize; 4];
    let mut stuck = 0;
    let mut trimmed = true;
    for seed in 0..50u64 {
        let Some(mut engine) = bundled_engine(options.seed.wrapping_add(seed)) else {
            continue;
        };
        let Ok(victim) = engine.spawn_ship("Warship", "Bastion", "Pirate", sol) else {
            continue;
        };
        if let Ok(mut loadout) = engine.world.get::<&mut Loadout>(victim) {
            loadout.attributes.set("self destruct", 0.0);
        }
        if let Some(flagship) = engine.player.flagship {
            ships::set_crew(&engine.world, flagship, 12);
        }
        let Some(mut boarding) = engine.board(victim) else {
            continue;
        };
        if boarding.begin_capture(&mut engine) != CaptureStart::Started {
            continue;
        }
        let mut actions = 0;
        let mut last = CombatOutcome::Continuing;
        while boarding.can_attack() && actions < 500 {
            if let Some(outcome) = boarding.act(&mut engine, true) {
                last = outcome.outcome;
            }
            trimmed &= boarding.messages().len() <= engine.config.message_history;
            actions += 1;
        }
        if boarding.can_attack() {
            stuck += 1;
        }
        let slot = match last {
            CombatOutcome::Continuing => 0,
            CombatOutcome::Retreated => 1,
            CombatOutcome::Captured => 2,
            CombatOutcome::PlayerKilled => 3,
        };
        outcomes[slot] += 1;
    }
    results.push(TestResult::new(
        "boarding_combat_terminates",
        stuck == 0,
        format!(
            "50 fights: {} captured, {} killed, {} retreated",
            outcomes[2], outcomes[3], outcomes[1]
        ),
    ));
    results.push(TestResult::new(
        "boarding_messages_trimmed",
        trimmed,
        format!("never more than {} combat messages", EngineConfig::default().message_history),
    ));

    results
}

// ── 4. NPC Lifecycle ────────────────────────────────────────────────────

fn validate_npc_lifecycle(options: &Options) -> Vec<TestResult> {
    println!("--- NPC Lifecycle ---");
    let mut results = Vec::new();

    let Some(mut engine) = bundled_engine(options.seed) else {
        results.push(TestResult::new("npc_setup", false, "bundled content failed to load"));
        return results;
    };
    let (Some(sol), Some(earth)) = (
        engine.content.galaxy.system_id("Sol"),
        engine.content.galaxy.planet_id("Earth"),
    ) else {
        return results;
    };

    // Kill objective met by destroying every raider
    match engine.accept_mission("Pirate Hunt", sol, earth) {
        Ok(index) => {
            let targets = engine.player.missions[index].npcs()[0].ships().to_vec();
            for &ship in &targets {
                let actor = engine.player.flagship;
                engine.handle_event(ShipEvent::new(actor, ship, ShipEventType::DESTROY));
            }
            let succeeded =
                engine.player.missions[index].npcs_succeeded(&engine.world, engine.player.system);
            results.push(TestResult::new(
                "npc_kill_objective",
                succeeded,
                format!("{} raiders destroyed", targets.len()),
            ));
        }
        Err(e) => results.push(TestResult::new("npc_kill_objective", false, e.to_string())),
    }

    // Failure sticks once reached
    match engine.accept_mission("Capture the Raider", sol, earth) {
        Ok(index) => {
            let target = engine.player.missions[index].npcs()[0].ships()[0];
            engine.handle_event(ShipEvent::new(None, target, ShipEventType::DESTROY));
            let failed_first = engine.player.missions[index].has_failed(&engine.world);
            let actor = engine.player.flagship;
            engine.handle_event(ShipEvent::new(actor, target, ShipEventType::BOARD));
            let failed_after = engine.player.missions[index].has_failed(&engine.world);
            results.push(TestResult::new(
                "npc_failure_latches",
                failed_first && failed_after && engine.messages.contains(MISSION_FAILED),
                "destroyed before boarding: failed, and still failed after boarding",
            ));
        }
        Err(e) => results.push(TestResult::new("npc_failure_latches", false, e.to_string())),
    }

    // Escorts must be accompanied
    match engine.accept_mission("Convoy Escort", sol, earth) {
        Ok(index) => {
            let here = engine.player.missions[index].npcs()[0].status(&engine.world, Some(sol));
            let vega = engine.content.galaxy.system_id("Vega");
            let away = engine.player.missions[index].npcs()[0].status(&engine.world, vega);
            results.push(TestResult::new(
                "npc_accompany",
                here == NpcStatus::Succeeded && away == NpcStatus::LeftBehind,
                format!("with player: {:?}, elsewhere: {:?}", here, away),
            ));
        }
        Err(e) => results.push(TestResult::new("npc_accompany", false, e.to_string())),
    }

    results
}

// ── 5. Timing ───────────────────────────────────────────────────────────

fn measure_timing(options: &Options) -> Vec<TestResult> {
    println!("--- Timing ---");
    let mut results = Vec::new();

    let Some(mut engine) = bundled_engine(options.seed) else {
        return results;
    };
    let (Some(sol), Some(earth)) = (
        engine.content.galaxy.system_id("Sol"),
        engine.content.galaxy.planet_id("Earth"),
    ) else {
        return results;
    };
    let mut names: Vec<String> = engine.content.missions.keys().cloned().collect();
    names.sort();

    let rounds = 100;
    let start = Instant::now();
    for _ in 0..rounds {
        for name in &names {
            let _ = engine.accept_mission(name, sol, earth);
        }
    }
    let elapsed = start.elapsed();
    let per_mission = elapsed.as_secs_f64() * 1e6 / (rounds * names.len().max(1)) as f64;
    results.push(TestResult::new(
        "timing_instantiate",
        true,
        format!("{:.1} µs per mission ({} ships in world)", per_mission, engine.world.len()),
    ));

    let start = Instant::now();
    let odds = CaptureOdds::new(crew_power(&[(1.5, 200)], 400, 1.0), crew_power(&[], 400, 2.0));
    results.push(TestResult::new(
        "timing_capture_table",
        odds.odds(400, 400) > 0.0,
        format!("400 x 400 table built in {:.2} ms", start.elapsed().as_secs_f64() * 1e3),
    ));

    results
}
