//! Systems that operate on ship entities.

mod boarding;
mod events;
mod fleet;
mod instantiate;
mod ledger;
mod mission;
mod npc;
pub mod ships;

pub use boarding::*;
pub use events::*;
pub use fleet::*;
pub use instantiate::*;
pub use ledger::*;
pub use mission::*;
pub use npc::*;

