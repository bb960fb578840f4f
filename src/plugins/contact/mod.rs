//! Contact plugin: turns weapon/target overlaps into repeating damage.
//!
//! # Data flow
//! ```text
//!  FixedPostUpdate
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │ (A) avian writes CollisionStart / CollisionEnd                        │
//! │                                                                       │
//! │ (B) process_weapon_contacts                                           │
//! │     - TouchingBodies: per-weapon set of touching colliders            │
//! │     - ContactBridge: Idle -> ActiveContact on begin (one per key)     │
//! │                      ActiveContact -> Idle when no part touches       │
//! │     - schedules ContactCycle { key } with zero delay on start         │
//! │                                                                       │
//! │ (C) prune_orphaned_contacts: drop entries whose entities are gone     │
//! │                                                                       │
//! │ (D) run_due_actions -> run_contact_cycle                              │
//! │     fire or reload, apply damage through the target's ledger,         │
//! │     reschedule after rate_of_fire unless the target died              │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cancelling a key removes both the bridge entry and its pending cycle, so
//! no damage is applied after the contact has ended.

use avian2d::collision::narrow_phase::CollisionEventSystems;
use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::damage::Health;
use crate::plugins::scheduler::ActionScheduler;
use crate::plugins::weapons::WeaponState;

pub mod bridge;
pub mod collision;
pub mod cycle;
pub mod messages;
pub mod touching;

pub use bridge::{ActiveContact, ContactBegin, ContactBridge, ContactCensus, ContactEnd, ContactKey};
pub use touching::TouchingBodies;

pub struct ContactPlugin;

impl Plugin for ContactPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ContactBridge>()
            .init_resource::<TouchingBodies>()
            .add_message::<messages::ContactStarted>()
            .add_message::<messages::ContactEnded>();

        app.add_systems(
            FixedPostUpdate,
            collision::process_weapon_contacts
                .after(CollisionEventSystems)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            FixedPostUpdate,
            prune_orphaned_contacts
                .after(collision::process_weapon_contacts)
                .run_if(in_state(GameState::InGame)),
        );
    }
}

/// Drop contacts whose weapon or target no longer exists.
///
/// Despawned entities never send `CollisionEnd` through us once their
/// components are gone, so without this their cycles would linger.
pub fn prune_orphaned_contacts(
    mut bridge: ResMut<ContactBridge>,
    mut touching: ResMut<TouchingBodies>,
    mut scheduler: ResMut<ActionScheduler>,
    q_weapons: Query<(), With<WeaponState>>,
    q_targets: Query<(), With<Health>>,
    q_any: Query<()>,
) {
    let dropped = bridge.cancel_where(&mut *scheduler, |c| {
        !q_weapons.contains(c.weapon) || !q_targets.contains(c.target)
    });
    if dropped > 0 {
        debug!("pruned {dropped} orphaned contact(s)");
    }

    touching.retain_live(|e| q_any.contains(e));
}
