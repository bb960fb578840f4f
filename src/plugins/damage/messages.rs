//! Damage intents and health feedback.

use std::time::Duration;

use bevy::prelude::*;

use crate::common::ids::StableId;

/// Damage from something other than a weapon contact (scripts, area effects).
///
/// `target` may be a composite part; it is resolved to the health holder.
/// Requests from the same `originator` closer together than `dedup_window`
/// are held back until the window passes. `Duration::ZERO` applies every one.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageRequest {
    pub target: Entity,
    pub originator: StableId,
    pub points: i32,
    pub dedup_window: Duration,
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct HealthChanged {
    pub entity: Entity,
    pub hp: i32,
    pub max_hp: i32,
}

/// Terminal. Written exactly once per entity.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Died {
    pub entity: Entity,
}
