//! Collision layers.

use avian2d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    #[default]
    Default,
    World,
    Weapon,
    Damagable,
}

/// Weapons only ever look for things they can hurt.
#[inline]
pub fn weapon_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Weapon, [Layer::Damagable])
}

#[inline]
pub fn damagable_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Damagable, [Layer::Weapon, Layer::World])
}

/// Keep the membership but collide with nothing.
#[inline]
pub fn non_interacting_layers(membership: Layer) -> CollisionLayers {
    CollisionLayers::new(membership, [] as [Layer; 0])
}
