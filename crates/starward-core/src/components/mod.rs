//! Component definitions for ship entities.
//!
//! Components are pure data structs attached to entities.
//! Behavior that touches more than one component lives in systems.

mod cargo;
mod common;
mod ship;

pub use cargo::*;
pub use common::*;
pub use ship::*;
