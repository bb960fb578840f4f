//! Single consumer of the action agenda.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::time::Fixed;

use crate::common::tunables::Tunables;
use crate::plugins::contact::bridge::ContactBridge;
use crate::plugins::contact::cycle::{run_contact_cycle, CycleOutcome};
use crate::plugins::damage::systems::HealthFeedback;
use crate::plugins::damage::{DamageLedger, Health};
use crate::plugins::weapons::messages::{ReloadStarted, WeaponFired, WeaponReloaded};
use crate::plugins::weapons::WeaponState;

use super::{ActionScheduler, ScheduledAction, TimedActionScheduler};

/// Every hook a due action can trigger.
#[derive(SystemParam)]
pub struct CombatFeedback<'w> {
    pub fired: MessageWriter<'w, WeaponFired>,
    pub reload_started: MessageWriter<'w, ReloadStarted>,
    pub reloaded: MessageWriter<'w, WeaponReloaded>,
    pub health: HealthFeedback<'w>,
}

/// Advance the scheduler by one fixed step and run everything that fell due.
///
/// Actions scheduled while dispatching run in the same pass if they are due
/// before the horizon; that is how a zero-delay contact cycle fires on the
/// tick its contact started.
pub fn run_due_actions(
    time: Res<Time<Fixed>>,
    tunables: Res<Tunables>,
    mut scheduler: ResMut<ActionScheduler>,
    mut bridge: ResMut<ContactBridge>,
    mut q_weapons: Query<&mut WeaponState>,
    mut q_targets: Query<(&mut Health, &mut DamageLedger)>,
    mut feedback: CombatFeedback,
) {
    let horizon = scheduler.now().saturating_add(time.delta());

    while let Some(action) = scheduler.pop_due(horizon) {
        match action {
            ScheduledAction::FireCooldownElapsed { weapon, window } => {
                if let Ok(mut w) = q_weapons.get_mut(weapon) {
                    w.complete_cooldown(window);
                }
            }
            ScheduledAction::ReloadComplete { weapon, window } => {
                let Ok(mut w) = q_weapons.get_mut(weapon) else {
                    continue;
                };
                if w.complete_reload(window) {
                    info!(
                        "{weapon:?} reloaded: {} rounds, {} magazines left",
                        w.ammo_in_magazine, w.magazines_remaining
                    );
                    feedback.reloaded.write(WeaponReloaded {
                        weapon,
                        ammo_in_magazine: w.ammo_in_magazine,
                        magazines_remaining: w.magazines_remaining,
                    });
                }
            }
            ScheduledAction::ContactCycle { key } => {
                let outcome = run_contact_cycle(
                    key,
                    &mut bridge,
                    &mut scheduler,
                    &mut q_weapons,
                    &mut q_targets,
                    &mut feedback,
                    tunables.min_cycle_interval,
                );
                if let CycleOutcome::Stopped(reason) = outcome {
                    debug!("contact {key:?} stopped: {reason:?}");
                }
            }
        }
    }

    scheduler.advance_to(horizon);
}
