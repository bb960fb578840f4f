use avian2d::prelude::*;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::common::ids::StableId;
use crate::plugins::damage::{DamagableLookup, Damageable, Health};
use crate::plugins::scheduler::ActionScheduler;
use crate::plugins::weapons::WeaponState;

use super::bridge::{ContactBegin, ContactBridge, ContactKey};
use super::messages::{ContactEnded, ContactStarted};
use super::touching::TouchingBodies;

#[derive(Clone, Copy, Debug)]
struct CollisionSide {
    collider: Entity,
    body: Option<Entity>,
}

/// Both orientations of a collision pair: `(maybe weapon, other)`.
#[inline]
fn sides(
    collider1: Entity,
    collider2: Entity,
    body1: Option<Entity>,
    body2: Option<Entity>,
) -> [(CollisionSide, CollisionSide); 2] {
    let a = CollisionSide {
        collider: collider1,
        body: body1,
    };
    let b = CollisionSide {
        collider: collider2,
        body: body2,
    };
    [(a, b), (b, a)]
}

/// Which entity carries the weapon for this side, if any.
#[inline]
fn weapon_of(
    side: CollisionSide,
    q_weapons: &Query<&StableId, With<WeaponState>>,
) -> Option<(Entity, StableId)> {
    [Some(side.collider), side.body]
        .into_iter()
        .flatten()
        .find_map(|e| q_weapons.get(e).ok().map(|id| (e, *id)))
}

/// Turn physics contact messages into bridge transitions.
///
/// Both collider orders are checked, so a weapon that is itself damagable can
/// be on either side. Starts are handled before ends: a pair that starts and
/// ends within one step nets out to no running cycle.
pub fn process_weapon_contacts(
    mut started: MessageReader<CollisionStart>,
    mut ended: MessageReader<CollisionEnd>,
    mut touching: ResMut<TouchingBodies>,
    mut bridge: ResMut<ContactBridge>,
    mut scheduler: ResMut<ActionScheduler>,
    q_weapons: Query<&StableId, With<WeaponState>>,
    q_targets: Query<(&StableId, &Health)>,
    lookup: DamagableLookup,
    mut contact_started: MessageWriter<ContactStarted>,
    mut contact_ended: MessageWriter<ContactEnded>,
) {
    for ev in started.read() {
        for (weapon_side, other) in sides(ev.collider1, ev.collider2, ev.body1, ev.body2) {
            let Some((weapon, weapon_id)) = weapon_of(weapon_side, &q_weapons) else {
                continue;
            };
            let target = lookup
                .resolve_contact(other.collider, other.body)
                .filter(|&t| t != weapon);
            touching.insert(weapon, other.collider, target);

            let Some(target) = target else {
                continue;
            };
            let Ok((target_id, health)) = q_targets.get(target) else {
                continue;
            };

            let key = ContactKey::new(weapon_id, *target_id);
            let begin = bridge.on_contact_begin(
                key,
                weapon,
                target,
                health.current_health(),
                &mut *scheduler,
            );
            match begin {
                ContactBegin::Started => {
                    info!("contact {key:?} started: {weapon:?} -> {target:?}");
                    contact_started.write(ContactStarted { key, weapon, target });
                }
                ContactBegin::AlreadyActive => {
                    debug!("contact {key:?} already active (collider {:?})", other.collider);
                }
                ContactBegin::TargetDead => {
                    debug!("contact {key:?} ignored: target {target:?} is dead");
                }
            }
        }
    }

    for ev in ended.read() {
        for (weapon_side, other) in sides(ev.collider1, ev.collider2, ev.body1, ev.body2) {
            let Some((weapon, weapon_id)) = weapon_of(weapon_side, &q_weapons) else {
                continue;
            };
            // Prefer the owner recorded at start: the part may be gone by now.
            let recorded = touching.remove(weapon, other.collider);
            let Some(target) = recorded.or_else(|| {
                lookup
                    .resolve_contact(other.collider, other.body)
                    .filter(|&t| t != weapon)
            }) else {
                continue;
            };

            let Ok((target_id, _)) = q_targets.get(target) else {
                continue;
            };

            let key = ContactKey::new(weapon_id, *target_id);
            let census = touching.census(weapon, target);
            let was_active = bridge.is_active(key);
            let end = bridge.on_contact_end(key, census, &mut *scheduler);

            if end.group_contact_ended && was_active {
                info!("contact {key:?} ended");
            }
            contact_ended.write(ContactEnded {
                key,
                weapon,
                target,
                group_contact_ended: end.group_contact_ended,
                all_damagable_contacts_ended: end.all_damagable_contacts_ended,
            });
        }
    }
}
