//! Weapons plugin: fire/reload state machine plus the request consumer.
//!
//! ```text
//!   FireRequest / ReloadRequest ──> process_weapon_requests ──> WeaponState
//!                                           │                      │
//!                                           │ WeaponFired          │ schedules
//!                                           │ ReloadStarted        v
//!                                           v                ActionScheduler
//!                                        listeners                 │
//!                                           ^                      │ due
//!                                           └── WeaponReloaded ── run_due_actions
//! ```

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::scheduler::ActionScheduler;

pub mod components;
pub mod messages;

pub use components::{MagazinePolicy, WeaponAction, WeaponSnapshot, WeaponState};
use messages::{FireRequest, ReloadRequest, ReloadStarted, WeaponFired};

pub fn plugin(app: &mut App) {
    app.add_message::<messages::FireRequest>()
        .add_message::<messages::ReloadRequest>()
        .add_message::<messages::WeaponFired>()
        .add_message::<messages::ReloadStarted>()
        .add_message::<messages::WeaponReloaded>();

    app.add_systems(
        FixedPostUpdate,
        process_weapon_requests
            .after(crate::plugins::contact::collision::process_weapon_contacts)
            .run_if(in_state(GameState::InGame)),
    );
}

/// Consumer: apply fire/reload intents.
///
/// Requests that are not allowed right now (busy, empty, no magazine) are
/// dropped; the weapon's state is the only feedback.
pub fn process_weapon_requests(
    mut fire_requests: MessageReader<FireRequest>,
    mut reload_requests: MessageReader<ReloadRequest>,
    mut scheduler: ResMut<ActionScheduler>,
    mut q_weapons: Query<&mut WeaponState>,
    mut fired: MessageWriter<WeaponFired>,
    mut reload_started: MessageWriter<ReloadStarted>,
) {
    for req in fire_requests.read() {
        let Ok(mut weapon) = q_weapons.get_mut(req.weapon) else {
            debug!("FireRequest for {:?} without a WeaponState", req.weapon);
            continue;
        };

        let on_fired = |w: &WeaponState| {
            fired.write(WeaponFired {
                weapon: req.weapon,
                target: None,
                ammo_in_magazine: w.ammo_in_magazine,
            });
        };

        if weapon.auto_reload {
            weapon.fire_or_auto_reload(req.weapon, &mut *scheduler, on_fired, |_| {
                reload_started.write(ReloadStarted { weapon: req.weapon });
            });
        } else {
            weapon.fire_and_schedule_cooldown(req.weapon, &mut *scheduler, on_fired);
        }
    }

    for req in reload_requests.read() {
        let Ok(mut weapon) = q_weapons.get_mut(req.weapon) else {
            debug!("ReloadRequest for {:?} without a WeaponState", req.weapon);
            continue;
        };

        weapon.reload_and_schedule_completion(req.weapon, &mut *scheduler, |_| {
            reload_started.write(ReloadStarted { weapon: req.weapon });
        });
    }
}
