//! Starward Core - boarding and mission NPC engine
//!
//! Ships are records in a `hecs` world, addressed by stable [`hecs::Entity`]
//! handles. Content (galaxy, outfits, ship models, fleets, NPC templates) is
//! loaded once from JSON definitions; missions instantiate NPC templates into
//! concrete ships and then track them through ship events.
//!
//! # Architecture
//!
//! - **Components**: plain data attached to ship entities (crew, hull, cargo, loadout, ...)
//! - **Content**: immutable catalogs and templates resolved from definitions
//! - **Systems**: boarding encounters, the plunder ledger, NPC instantiation and state tracking
//! - **Engine**: owns the world, content, shared RNG, player, and UI request stack
//!
//! # Example
//!
//! ```rust,no_run
//! use starward_core::prelude::*;
//!
//! let content = Content::from_json(include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/content.json"))).unwrap();
//! let mut engine = Engine::new(content, EngineConfig::default());
//! let sol = engine.content.galaxy.system_id("Sol").unwrap();
//! engine.spawn_player_ship("Falcon", "Resolute", sol).unwrap();
//! let pirate = engine.spawn_ship("Sparrow", "Cutthroat", "Pirate", sol).unwrap();
//!
//! let mut boarding = engine.board(pirate).unwrap();
//! if boarding.can_capture(&engine) {
//!     boarding.begin_capture(&mut engine);
//!     while boarding.can_attack() {
//!         boarding.act(&mut engine, true);
//!     }
//! }
//! ```

pub mod components;
pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod player;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::EngineConfig;
    pub use crate::content::Content;
    pub use crate::engine::Engine;
    pub use crate::error::ContentError;
    pub use crate::player::Player;
    pub use crate::systems::{BoardingEncounter, Mission, MissionEnds, Npc, NpcStatus, ShipEvent};
    pub use starward_logic::events::ShipEventType;
}
