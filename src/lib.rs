//! Contact damage for Bevy games.
//!
//! Weapons with fire/reload windows, damageable entities (optionally built
//! from several colliders) and a bridge that keeps applying damage once per
//! fire cycle for as long as a weapon touches a target.
//!
//! Integration tests in `tests/` are compiled as separate crates.
//! A `lib.rs` gives them a stable public API surface to import.

pub mod common;
pub mod game;
pub mod plugins;
