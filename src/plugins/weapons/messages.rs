//! Weapon intents and feedback.
//!
//! Producers (input, AI, scripts) only write requests; `process_weapon_requests`
//! is the single writer of `WeaponState` outside the scheduler. Feedback messages
//! are what UI, audio and haptics listen to.

use bevy::prelude::*;

/// Pull the trigger once. Auto-reloads an empty magazine if the weapon allows it.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct FireRequest {
    pub weapon: Entity,
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReloadRequest {
    pub weapon: Entity,
}

/// A round went off. `target` is set when the shot came from a contact cycle.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeaponFired {
    pub weapon: Entity,
    pub target: Option<Entity>,
    pub ammo_in_magazine: u32,
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReloadStarted {
    pub weapon: Entity,
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeaponReloaded {
    pub weapon: Entity,
    pub ammo_in_magazine: u32,
    pub magazines_remaining: i32,
}
