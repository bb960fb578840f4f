use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

/// Result of one damage application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Nothing changed: target already dead, non-positive damage, or the
    /// originator is still inside its dedup window.
    Ignored,
    Damaged { remaining: i32 },
    /// Health reached zero. Reported once per target lifetime.
    Killed,
}

/// Anything that can take damage.
pub trait Damageable {
    fn current_health(&self) -> i32;

    fn apply_damage(&mut self, points: i32) -> DamageOutcome;

    #[inline]
    fn is_alive(&self) -> bool {
        self.current_health() > 0
    }
}

/// Health pool of a damageable entity (or of the parent of a composite one).
///
/// `hp` only changes through [`Damageable::apply_damage`], so zero health and
/// death are the same state.
#[derive(Component, Debug, Clone)]
pub struct Health {
    hp: i32,
    pub max_hp: i32,
}

impl Health {
    pub fn new(max_hp: i32) -> Self {
        Self {
            hp: max_hp.max(0),
            max_hp,
        }
    }

    #[inline]
    pub fn hp(&self) -> i32 {
        self.hp
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.hp == 0
    }
}

impl Damageable for Health {
    #[inline]
    fn current_health(&self) -> i32 {
        self.hp
    }

    fn apply_damage(&mut self, points: i32) -> DamageOutcome {
        if self.is_dead() || points <= 0 {
            return DamageOutcome::Ignored;
        }

        let hp = self.hp.saturating_sub(points).max(0);
        self.hp = hp;
        if hp == 0 {
            DamageOutcome::Killed
        } else {
            DamageOutcome::Damaged { remaining: hp }
        }
    }
}

/// Child collider of a composite target.
///
/// Parts hold no health of their own; every hit resolves to `owner`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamagablePart {
    pub owner: Entity,
}

/// Opt-in: despawn the entity once it dies.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct DespawnOnDeath;

/// Marker: entity should be removed from the world.
///
/// We don't despawn in the fixed step; we mark and despawn later in PostUpdate.
#[derive(Component, Debug, Clone, Copy)]
pub struct PendingDespawn;

/// Resolves colliders and bodies to the entity that owns the health pool.
#[derive(SystemParam)]
pub struct DamagableLookup<'w, 's> {
    parts: Query<'w, 's, &'static DamagablePart>,
    holders: Query<'w, 's, (), With<Health>>,
}

impl DamagableLookup<'_, '_> {
    /// Health holder for `entity`: a part's owner, or the entity itself.
    pub fn resolve(&self, entity: Entity) -> Option<Entity> {
        let owner = self.parts.get(entity).map_or(entity, |part| part.owner);
        self.holders.contains(owner).then_some(owner)
    }

    /// Try the collider first, then the body it is attached to.
    pub fn resolve_contact(&self, collider: Entity, body: Option<Entity>) -> Option<Entity> {
        self.resolve(collider).or_else(|| body.and_then(|b| self.resolve(b)))
    }
}
