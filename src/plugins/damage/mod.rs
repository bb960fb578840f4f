//! Damage plugin: health pools, composite targets and the damage ledger.
//!
//! FACTS live in components: `Health` and `DamageLedger` on the health holder,
//! `DamagablePart` on each child collider of a composite target. Every health
//! change goes through `ledger::apply_tracked_damage`, whether it comes from a
//! contact cycle (scheduler dispatch) or from a `DamageRequest`.
//!
//! Death is terminal: `Died` is written once, the entity stops colliding, and
//! entities with `DespawnOnDeath` are despawned in PostUpdate.

use bevy::prelude::*;

use crate::common::state::GameState;

pub mod components;
pub mod ledger;
pub mod messages;
pub mod systems;

pub use components::{
    DamagableLookup, DamagablePart, DamageOutcome, Damageable, DespawnOnDeath, Health,
    PendingDespawn,
};
pub use ledger::{apply_tracked_damage, DamageEvent, DamageLedger};

pub fn plugin(app: &mut App) {
    app.add_message::<messages::DamageRequest>()
        .add_message::<messages::HealthChanged>()
        .add_message::<messages::Died>();

    app.add_systems(
        FixedPostUpdate,
        systems::process_damage_requests
            .after(crate::plugins::contact::collision::process_weapon_contacts)
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        FixedPostUpdate,
        systems::handle_deaths
            .after(crate::plugins::scheduler::dispatch::run_due_actions)
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(PostUpdate, systems::despawn_marked);
}
