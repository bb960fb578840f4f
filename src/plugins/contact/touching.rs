//! Colliders currently touching each weapon.
//!
//! Built from `CollisionStart` / `CollisionEnd` in the same system that feeds
//! the bridge, so counts are always consistent with the notifications the
//! bridge has seen. Each collider remembers the health holder it resolved to
//! when contact started (`None` for walls and other inert colliders).

use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use super::bridge::ContactCensus;

#[derive(Resource, Debug, Default)]
pub struct TouchingBodies {
    by_weapon: HashMap<Entity, HashMap<Entity, Option<Entity>>>,
}

impl TouchingBodies {
    /// Returns false if the pair was already known.
    pub fn insert(&mut self, weapon: Entity, collider: Entity, owner: Option<Entity>) -> bool {
        self.by_weapon
            .entry(weapon)
            .or_default()
            .insert(collider, owner)
            .is_none()
    }

    /// Forget the pair. Returns the owner recorded at contact start, if any.
    pub fn remove(&mut self, weapon: Entity, collider: Entity) -> Option<Entity> {
        let set = self.by_weapon.get_mut(&weapon)?;
        let owner = set.remove(&collider).flatten();
        if set.is_empty() {
            self.by_weapon.remove(&weapon);
        }
        owner
    }

    pub fn contacts(&self, weapon: Entity) -> impl Iterator<Item = Entity> + '_ {
        self.by_weapon.get(&weapon).into_iter().flat_map(|set| set.keys().copied())
    }

    /// Count the weapon's contacts that belong to `target`, and to any target.
    pub fn census(&self, weapon: Entity, target: Entity) -> ContactCensus {
        self.by_weapon
            .get(&weapon)
            .into_iter()
            .flat_map(|set| set.values().flatten())
            .fold(ContactCensus::default(), |mut census, &owner| {
                census.damagable += 1;
                if owner == target {
                    census.target_parts += 1;
                }
                census
            })
    }

    /// Forget weapons, colliders and owners for which `alive` is false.
    pub fn retain_live(&mut self, alive: impl Fn(Entity) -> bool) {
        self.by_weapon.retain(|weapon, set| {
            if !alive(*weapon) {
                return false;
            }
            set.retain(|collider, owner| alive(*collider) && owner.is_none_or(|o| alive(o)));
            !set.is_empty()
        });
    }

    #[inline]
    pub fn weapon_count(&self) -> usize {
        self.by_weapon.len()
    }
}
