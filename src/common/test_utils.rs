//! Test helpers.
//!
//! Systems that use `Commands` enqueue structural changes, so `run_system_once`
//! flushes the world before returning.
//!
//! Combat tests drive the fixed-step pipeline through a persistent `Schedule`
//! rather than `run_system_once`: message readers keep their cursors between
//! runs, so every injected `CollisionStart` is seen exactly once, like in the
//! real app. Message buffers are never rotated, so `read_messages` sees
//! everything written since the world was built.

use std::time::Duration;

use avian2d::prelude::*;
use bevy::ecs::message::{Message, MessageReader, Messages};
use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;

use crate::common::ids::{StableId, StableIds};
use crate::common::tunables::Tunables;
use crate::plugins::contact::{
    self, collision, messages as contact_messages, ContactBridge, TouchingBodies,
};
use crate::plugins::damage::{
    self, messages as damage_messages, DamagablePart, DamageLedger, Health,
};
use crate::plugins::scheduler::{dispatch, ActionScheduler};
use crate::plugins::weapons::{self, messages as weapon_messages, WeaponState};

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

/// Collect every buffered message of type `M`.
pub fn read_messages<M: Message + Clone>(world: &mut World) -> Vec<M> {
    run_system_once(world, |mut reader: MessageReader<M>| {
        reader.read().cloned().collect::<Vec<M>>()
    })
}

/// A fixed clock whose last step was `dt`.
pub fn fixed_time_with_delta(dt: Duration) -> Time<Fixed> {
    let mut t = Time::<Fixed>::default();
    t.advance_by(dt);
    t
}

fn init_messages<M: Message>(world: &mut World) {
    if world.get_resource::<Messages<M>>().is_none() {
        world.init_resource::<Messages<M>>();
    }
}

/// World with every resource and message buffer the combat systems touch.
pub fn combat_world() -> World {
    let mut world = World::new();
    world.init_resource::<Tunables>();
    world.init_resource::<StableIds>();
    world.init_resource::<ActionScheduler>();
    world.init_resource::<ContactBridge>();
    world.init_resource::<TouchingBodies>();
    world.insert_resource(fixed_time_with_delta(Duration::ZERO));

    init_messages::<CollisionStart>(&mut world);
    init_messages::<CollisionEnd>(&mut world);
    init_messages::<weapon_messages::FireRequest>(&mut world);
    init_messages::<weapon_messages::ReloadRequest>(&mut world);
    init_messages::<weapon_messages::WeaponFired>(&mut world);
    init_messages::<weapon_messages::ReloadStarted>(&mut world);
    init_messages::<weapon_messages::WeaponReloaded>(&mut world);
    init_messages::<damage_messages::DamageRequest>(&mut world);
    init_messages::<damage_messages::HealthChanged>(&mut world);
    init_messages::<damage_messages::Died>(&mut world);
    init_messages::<contact_messages::ContactStarted>(&mut world);
    init_messages::<contact_messages::ContactEnded>(&mut world);
    world
}

/// The FixedPostUpdate combat pipeline in app order.
pub fn combat_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            collision::process_weapon_contacts,
            contact::prune_orphaned_contacts,
            weapons::process_weapon_requests,
            damage::systems::process_damage_requests,
            dispatch::run_due_actions,
            damage::systems::handle_deaths,
        )
            .chain(),
    );
    schedule
}

/// Run one fixed step of length `dt`.
pub fn step(world: &mut World, schedule: &mut Schedule, dt: Duration) {
    world.insert_resource(fixed_time_with_delta(dt));
    schedule.run(world);
}

pub fn spawn_weapon(world: &mut World, weapon: WeaponState) -> Entity {
    let id = world.resource_mut::<StableIds>().allocate();
    world.spawn((id, weapon)).id()
}

pub fn spawn_target(world: &mut World, hp: i32) -> Entity {
    let id: StableId = world.resource_mut::<StableIds>().allocate();
    world.spawn((id, Health::new(hp), DamageLedger::default())).id()
}

pub fn spawn_part(world: &mut World, owner: Entity) -> Entity {
    world.spawn(DamagablePart { owner }).id()
}

pub fn write_start(world: &mut World, collider1: Entity, collider2: Entity) {
    world.write_message(CollisionStart {
        collider1,
        collider2,
        body1: None,
        body2: None,
    });
}

pub fn write_end(world: &mut World, collider1: Entity, collider2: Entity) {
    world.write_message(CollisionEnd {
        collider1,
        collider2,
        body1: None,
        body2: None,
    });
}

pub fn hp(world: &World, target: Entity) -> i32 {
    world.get::<Health>(target).expect("target has Health").hp()
}
