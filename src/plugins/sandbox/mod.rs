//! Sandbox scene for `cargo run`: a weapon sensor sweeping across a composite
//! target. Registered only by the full app; it carries no gameplay rules of its
//! own, everything it shows comes from the contact, weapon and damage plugins.

use std::time::Duration;

use avian2d::prelude::*;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::ids::{StableId, StableIds};
use crate::common::layers::{damagable_layers, weapon_layers};
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::contact::messages::{ContactEnded, ContactStarted};
use crate::plugins::damage::messages::{Died, HealthChanged};
use crate::plugins::damage::{DamagablePart, DamageLedger, DespawnOnDeath, Health};
use crate::plugins::weapons::WeaponState;

const SWEEP_HALF_WIDTH: f32 = 320.0;
const SWEEP_SPEED: f32 = 90.0;
const TARGET_HP: i32 = 60;

#[derive(Component)]
struct SweepingWeapon;

#[derive(Component)]
struct SandboxTarget;

pub fn plugin(app: &mut App) {
    app.insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.07)));

    app.add_systems(OnEnter(GameState::InGame), (spawn_camera, spawn_weapon));
    app.add_systems(
        FixedUpdate,
        sweep_weapon.run_if(in_state(GameState::InGame)),
    );
    app.add_systems(
        Update,
        (respawn_target, log_combat).run_if(in_state(GameState::InGame)),
    );
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((Camera2d, DespawnOnExit(GameState::InGame)));
}

fn spawn_weapon(mut commands: Commands, mut ids: ResMut<StableIds>) {
    let weapon = WeaponState::new(7, Duration::from_millis(400))
        .with_magazines(5, 5, 3)
        .with_reload_duration(Duration::from_millis(1500));

    commands.spawn((
        Name::new("SweepingWeapon"),
        SweepingWeapon,
        ids.allocate(),
        weapon,
        Sprite {
            color: Color::srgb(1.0, 0.85, 0.3),
            custom_size: Some(Vec2::splat(24.0)),
            ..default()
        },
        Transform::from_xyz(-SWEEP_HALF_WIDTH, 0.0, 2.0),
        RigidBody::Dynamic,
        Collider::circle(12.0),
        Sensor,
        weapon_layers(),
        LinearVelocity(Vec2::new(SWEEP_SPEED, 0.0)),
        CollisionEventsEnabled,
        DespawnOnExit(GameState::InGame),
    ));
}

/// Spawn a two-part target whenever none is alive.
fn respawn_target(
    mut commands: Commands,
    mut ids: ResMut<StableIds>,
    tunables: Res<Tunables>,
    q_targets: Query<(), With<SandboxTarget>>,
) {
    if !q_targets.is_empty() {
        return;
    }

    let part_sprite = || Sprite {
        color: Color::srgb(0.9, 0.25, 0.25),
        custom_size: Some(Vec2::new(40.0, 40.0)),
        ..default()
    };

    let id: StableId = ids.allocate();
    let owner = commands
        .spawn((
            Name::new(format!("Target{}", id.0)),
            SandboxTarget,
            id,
            Health::new(TARGET_HP),
            DamageLedger::with_max_originators(tunables.ledger_max_originators),
            DespawnOnDeath,
            Transform::from_xyz(0.0, 0.0, 1.0),
            Visibility::default(),
            RigidBody::Static,
            DespawnOnExit(GameState::InGame),
        ))
        .id();

    for x in [-22.0, 22.0] {
        let part = commands
            .spawn((
                Name::new("TargetPart"),
                DamagablePart { owner },
                part_sprite(),
                Transform::from_xyz(x, 0.0, 0.0),
                Collider::rectangle(40.0, 40.0),
                damagable_layers(),
            ))
            .id();
        commands.entity(owner).add_child(part);
    }
}

fn sweep_weapon(mut q: Query<(&Transform, &mut LinearVelocity), With<SweepingWeapon>>) {
    for (tf, mut vel) in &mut q {
        let x = tf.translation.x;
        if (x > SWEEP_HALF_WIDTH && vel.x > 0.0) || (x < -SWEEP_HALF_WIDTH && vel.x < 0.0) {
            vel.x = -vel.x;
        }
    }
}

fn log_combat(
    mut started: MessageReader<ContactStarted>,
    mut ended: MessageReader<ContactEnded>,
    mut changed: MessageReader<HealthChanged>,
    mut died: MessageReader<Died>,
) {
    for ev in started.read() {
        info!("sandbox: {:?} touching {:?}", ev.weapon, ev.target);
    }
    for ev in ended.read().filter(|ev| ev.group_contact_ended) {
        info!("sandbox: {:?} left {:?}", ev.weapon, ev.target);
    }
    for ev in changed.read() {
        info!("sandbox: {:?} at {}/{} hp", ev.entity, ev.hp, ev.max_hp);
    }
    for ev in died.read() {
        info!("sandbox: {:?} destroyed", ev.entity);
    }
}
