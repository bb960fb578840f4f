//! End-to-end: the full headless app, with collision messages written by hand.

mod common;

use std::time::Duration;

use bevy::prelude::*;
use contact_damage::plugins::contact::ContactBridge;
use contact_damage::plugins::damage::messages::Died;
use contact_damage::plugins::weapons::WeaponState;

#[derive(Resource, Default)]
struct Deaths(Vec<Entity>);

fn collect_deaths(mut died: MessageReader<Died>, mut deaths: ResMut<Deaths>) {
    deaths.0.extend(died.read().map(|d| d.entity));
}

#[test]
fn weapon_grinds_a_composite_target_down_while_touching() {
    let mut app = common::app_headless();
    common::tick(&mut app, 2);

    // Long rate of fire: exactly one shot inside this test.
    let weapon = common::spawn_weapon(&mut app, WeaponState::new(10, Duration::from_secs(60)));
    let (target, parts) = common::spawn_composite_target(&mut app, 50, 2);

    for &part in &parts {
        common::touch(&mut app, weapon, part);
    }
    common::tick(&mut app, 4);

    assert_eq!(common::hp(&app, target), 40);
    assert_eq!(app.world().resource::<ContactBridge>().len(), 1);

    common::untouch(&mut app, weapon, parts[0]);
    common::tick(&mut app, 2);
    assert_eq!(app.world().resource::<ContactBridge>().len(), 1);

    common::untouch(&mut app, weapon, parts[1]);
    common::tick(&mut app, 2);
    assert!(app.world().resource::<ContactBridge>().is_empty());
    assert_eq!(common::hp(&app, target), 40);
}

#[test]
fn lethal_contact_kills_once_and_despawns_the_target() {
    let mut app = common::app_headless();
    app.init_resource::<Deaths>().add_systems(Update, collect_deaths);
    common::tick(&mut app, 2);

    let weapon = common::spawn_weapon(&mut app, WeaponState::new(100, Duration::from_millis(50)));
    let (target, parts) = common::spawn_composite_target(&mut app, 30, 1);

    common::touch(&mut app, weapon, parts[0]);
    common::tick(&mut app, 6);

    assert_eq!(app.world().resource::<Deaths>().0, vec![target]);

    assert!(app.world().get_entity(target).is_err(), "DespawnOnDeath target is gone");
    assert!(app.world().resource::<ContactBridge>().is_empty());
}
