use bevy::prelude::*;

use super::bridge::ContactKey;

/// A weapon started a repeating damage cycle against a target.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContactStarted {
    pub key: ContactKey,
    pub weapon: Entity,
    pub target: Entity,
}

/// One collider of `target` stopped touching `weapon`.
///
/// `group_contact_ended` is set once no part of the target is left touching.
/// `all_damagable_contacts_ended` lets owners reset per-weapon state (aim,
/// spin-up, audio loops) when the weapon touches nothing damagable at all.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContactEnded {
    pub key: ContactKey,
    pub weapon: Entity,
    pub target: Entity,
    pub group_contact_ended: bool,
    pub all_damagable_contacts_ended: bool,
}
