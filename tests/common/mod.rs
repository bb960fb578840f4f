//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - we then call `contact_damage::game::configure_headless` to install gameplay plugins.
//!
//! Time is advanced manually by one fixed step per `app.update()`, so the
//! combat pipeline runs once per update.

#![allow(dead_code)]

use std::time::Duration;

use avian2d::prelude::*;
use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use contact_damage::common::ids::StableIds;
use contact_damage::plugins::damage::{DamagablePart, DamageLedger, DespawnOnDeath, Health};
use contact_damage::plugins::weapons::WeaponState;

/// Bevy's default fixed timestep (64 Hz).
pub const STEP: Duration = Duration::from_micros(15_625);

pub fn app_headless() -> App {
    let mut app = App::new();

    // Add AssetPlugin + ScenePlugin so SceneSpawner exists.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(STEP));

    contact_damage::game::configure_headless(&mut app);
    // `App::run` would do this; tests drive `app.update()` by hand.
    app.finish();
    app.cleanup();
    app
}

pub fn tick(app: &mut App, updates: usize) {
    for _ in 0..updates {
        app.update();
    }
}

pub fn spawn_weapon(app: &mut App, weapon: WeaponState) -> Entity {
    let world = app.world_mut();
    let id = world.resource_mut::<StableIds>().allocate();
    world.spawn((id, weapon)).id()
}

/// Composite target: the parent holds health, each part is a collider.
pub fn spawn_composite_target(app: &mut App, hp: i32, parts: usize) -> (Entity, Vec<Entity>) {
    let world = app.world_mut();
    let id = world.resource_mut::<StableIds>().allocate();
    let target = world
        .spawn((id, Health::new(hp), DamageLedger::default(), DespawnOnDeath))
        .id();
    let parts = (0..parts)
        .map(|_| world.spawn(DamagablePart { owner: target }).id())
        .collect();
    (target, parts)
}

pub fn touch(app: &mut App, weapon: Entity, collider: Entity) {
    app.world_mut().write_message(CollisionStart {
        collider1: weapon,
        collider2: collider,
        body1: None,
        body2: None,
    });
}

pub fn untouch(app: &mut App, weapon: Entity, collider: Entity) {
    app.world_mut().write_message(CollisionEnd {
        collider1: collider,
        collider2: weapon,
        body1: None,
        body2: None,
    });
}

pub fn hp(app: &App, target: Entity) -> i32 {
    app.world().get::<Health>(target).expect("target has Health").hp()
}
