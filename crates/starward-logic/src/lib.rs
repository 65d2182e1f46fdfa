//! Pure game logic for Starward.
//!
//! This crate contains the parts of ship boarding and mission tracking that
//! are independent of any entity store or UI. Functions take plain data (crew
//! counts, power tables, random generators) and return results, making them
//! unit-testable and reusable from the engine, the headless harness, and
//! benchmarks.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`events`] | Ship-event flag set (destroy, board, capture, land, ...) and NPC trigger keywords |
//! | [`capture_odds`] | Crew power tables and precomputed hand-to-hand capture odds |
//! | [`combat`] | Round resolution, self-destruct checks, enemy stance and displayed odds |
//! | [`plunder`] | Plunder items, value-per-ton ordering, salvage rolls |
//! | [`format`] | Number/credit formatting and `<key>` text substitution |

pub mod capture_odds;
pub mod combat;
pub mod events;
pub mod format;
pub mod plunder;
