//! Integration tests for loading content definitions.

use serde_json::{json, Value};
use starward_core::content::ContentDef;
use starward_core::prelude::*;

const CONTENT: &str = include_str!("../../../data/content.json");

// ── Helpers ────────────────────────────────────────────────────────────

fn base() -> Value {
    serde_json::from_str(CONTENT).unwrap()
}

fn load(value: &Value) -> Result<Content, ContentError> {
    Content::from_json(&value.to_string())
}

fn push(value: &mut Value, section: &str, item: Value) {
    value[section].as_array_mut().unwrap().push(item);
}

// ── Shared content ─────────────────────────────────────────────────────

#[test]
fn shared_content_loads() {
    let content = Content::from_json(CONTENT).unwrap();
    assert_eq!(content.galaxy.systems().count(), 6);
    assert_eq!(content.missions.len(), 7);
    assert!(content.fleets.contains_key("Pirate Raiders"));
    assert_eq!(
        content.governments.name(content.player_government),
        "Escort"
    );
    assert!(content.mission("Convoy Escort").is_ok());
    assert!(matches!(
        content.mission("Grand Tour"),
        Err(ContentError::NoMission(_))
    ));
}

#[test]
fn links_are_symmetric() {
    let content = Content::from_json(CONTENT).unwrap();
    let galaxy = &content.galaxy;
    for system in galaxy.systems() {
        for &link in &system.links {
            assert!(
                galaxy.system(link).unwrap().links.contains(&system.id),
                "{} -> {}",
                system.name,
                galaxy.system_name(link)
            );
        }
    }
    let sol = galaxy.system_id("Sol").unwrap();
    let deneb = galaxy.system_id("Deneb").unwrap();
    assert_eq!(galaxy.jumps(sol, deneb), Some(3));
}

#[test]
fn empty_document_needs_a_player_government() {
    assert!(matches!(
        Content::from_def(&ContentDef::default()),
        Err(ContentError::Unknown { kind: "government", .. })
    ));
}

// ── Load errors ────────────────────────────────────────────────────────

#[test]
fn malformed_json_is_reported() {
    assert!(matches!(
        Content::from_json("{\"systems\": 3}"),
        Err(ContentError::Json(_))
    ));
}

#[test]
fn duplicate_government_is_rejected() {
    let mut value = base();
    push(&mut value, "governments", json!({"name": "Pirate"}));
    assert!(matches!(
        load(&value),
        Err(ContentError::Duplicate { kind: "government", .. })
    ));
}

#[test]
fn ship_with_unknown_outfit_is_rejected() {
    let mut value = base();
    push(
        &mut value,
        "ships",
        json!({"model": "Junker", "attributes": {"hull": 10}, "outfits": {"Antimatter Core": 1}}),
    );
    assert!(load(&value).is_err());
}

#[test]
fn fleet_without_variants_is_rejected() {
    let mut value = base();
    push(&mut value, "fleets", json!({"name": "Nobody Home", "variants": []}));
    assert!(matches!(load(&value), Err(ContentError::EmptyFleet(_))));
}

#[test]
fn mission_npc_with_unknown_model_is_rejected() {
    let mut value = base();
    push(
        &mut value,
        "missions",
        json!({
            "name": "Broken",
            "npcs": [{"ships": [{"name": "Ghost", "model": "Dreadnought"}]}]
        }),
    );
    assert!(matches!(
        load(&value),
        Err(ContentError::Unknown { kind: "ship model", .. })
    ));
}

#[test]
fn npc_ship_without_a_model_is_skipped() {
    let mut value = base();
    push(
        &mut value,
        "missions",
        json!({
            "name": "Sparse",
            "npcs": [{"ships": [{"name": "Nothing"}, {"name": "Something", "model": "Sparrow"}]}]
        }),
    );
    let content = load(&value).unwrap();
    let template = content.mission("Sparse").unwrap();
    assert_eq!(template.npcs[0].ships.len(), 1);
    assert_eq!(template.npcs[0].ships[0].name, "Something");
}
