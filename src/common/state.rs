//! Global state machine.
//!
//! Combat systems only run while `InGame`. `Paused` freezes the scheduler
//! clock, so cooldowns and contact cycles resume where they stopped.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    InGame,
    Paused,
}
