//! One iteration of a repeating contact damage cycle.

use std::time::Duration;

use bevy::prelude::*;

use crate::plugins::damage::{
    apply_tracked_damage, DamageLedger, DamageOutcome, Damageable, Health,
};
use crate::plugins::scheduler::dispatch::CombatFeedback;
use crate::plugins::scheduler::{ActionScheduler, ScheduledAction, TimedActionScheduler};
use crate::plugins::weapons::messages::{ReloadStarted, WeaponFired};
use crate::plugins::weapons::{WeaponAction, WeaponState};

use super::bridge::{ContactBridge, ContactKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStop {
    /// Cancelled before this iteration ran.
    NotActive,
    WeaponGone,
    TargetGone,
    TargetDead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Stopped(CycleStop),
    /// The cycle ran and, unless `damage` killed the target, is rescheduled.
    Ran {
        action: WeaponAction,
        damage: DamageOutcome,
    },
}

/// Fire (or reload) once against the target of `key`, then wait `rate_of_fire`.
///
/// Guards are re-checked here rather than trusted from scheduling time: the
/// contact may have ended, the target may have died to another source, and
/// either entity may have been despawned since the last iteration.
pub fn run_contact_cycle(
    key: ContactKey,
    bridge: &mut ContactBridge,
    scheduler: &mut ActionScheduler,
    q_weapons: &mut Query<&mut WeaponState>,
    q_targets: &mut Query<(&mut Health, &mut DamageLedger)>,
    feedback: &mut CombatFeedback,
    min_interval: Duration,
) -> CycleOutcome {
    let Some(contact) = bridge.get(key).copied() else {
        return CycleOutcome::Stopped(CycleStop::NotActive);
    };

    let Ok((mut health, mut ledger)) = q_targets.get_mut(contact.target) else {
        bridge.cancel(key, &mut *scheduler);
        return CycleOutcome::Stopped(CycleStop::TargetGone);
    };
    if !health.is_alive() {
        bridge.cancel(key, &mut *scheduler);
        return CycleOutcome::Stopped(CycleStop::TargetDead);
    }
    let Ok(mut weapon) = q_weapons.get_mut(contact.weapon) else {
        bridge.cancel(key, &mut *scheduler);
        return CycleOutcome::Stopped(CycleStop::WeaponGone);
    };

    let now = scheduler.now();
    let mut damage = DamageOutcome::Ignored;

    let on_fired = |w: &WeaponState| {
        damage = apply_tracked_damage(
            &mut health,
            &mut ledger,
            key.weapon,
            w.damage_per_shot,
            now,
            w.rate_of_fire,
        );
        feedback.fired.write(WeaponFired {
            weapon: contact.weapon,
            target: Some(contact.target),
            ammo_in_magazine: w.ammo_in_magazine,
        });
    };

    let action = if weapon.auto_reload {
        weapon.fire_or_auto_reload(contact.weapon, &mut *scheduler, on_fired, |_| {
            feedback.reload_started.write(ReloadStarted {
                weapon: contact.weapon,
            });
        })
    } else if weapon.fire_and_schedule_cooldown(contact.weapon, &mut *scheduler, on_fired) {
        WeaponAction::Fired
    } else {
        WeaponAction::Idle
    };

    feedback.health.report(contact.target, damage, &health);
    debug!("contact {key:?} cycle at {now:?}: {action:?}, {damage:?}");

    if damage == DamageOutcome::Killed {
        // Other weapons on the same target stop on their next iteration.
        bridge.cancel(key, &mut *scheduler);
    } else {
        let interval = weapon.rate_of_fire.max(min_interval);
        scheduler.schedule_once(interval, ScheduledAction::ContactCycle { key });
    }

    CycleOutcome::Ran { action, damage }
}
