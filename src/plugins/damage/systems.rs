use avian2d::prelude::*;
use bevy::ecs::message::MessageReader;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::common::layers::{non_interacting_layers, Layer};
use crate::plugins::contact::bridge::ContactBridge;
use crate::plugins::scheduler::{ActionScheduler, TimedActionScheduler};

use super::components::{
    DamagableLookup, DamagablePart, DamageOutcome, DespawnOnDeath, Health, PendingDespawn,
};
use super::ledger::{apply_tracked_damage, DamageLedger};
use super::messages::{DamageRequest, Died, HealthChanged};

/// Writers for the health hooks (UI, audio, haptics).
#[derive(SystemParam)]
pub struct HealthFeedback<'w> {
    changed: MessageWriter<'w, HealthChanged>,
    died: MessageWriter<'w, Died>,
}

impl HealthFeedback<'_> {
    pub fn report(&mut self, entity: Entity, outcome: DamageOutcome, health: &Health) {
        match outcome {
            DamageOutcome::Ignored => {}
            DamageOutcome::Damaged { remaining } => {
                self.changed.write(HealthChanged {
                    entity,
                    hp: remaining,
                    max_hp: health.max_hp,
                });
            }
            DamageOutcome::Killed => {
                info!("{entity:?} died");
                self.died.write(Died { entity });
            }
        }
    }
}

/// Consumer: apply scripted / area damage through the same ledger as contacts.
pub fn process_damage_requests(
    mut requests: MessageReader<DamageRequest>,
    mut scheduler: ResMut<ActionScheduler>,
    mut bridge: ResMut<ContactBridge>,
    lookup: DamagableLookup,
    mut q_targets: Query<(&mut Health, &mut DamageLedger)>,
    mut feedback: HealthFeedback,
) {
    let now = scheduler.now();

    for req in requests.read() {
        let Some(owner) = lookup.resolve(req.target) else {
            debug!("DamageRequest for {:?}, which is not damagable", req.target);
            continue;
        };
        let Ok((mut health, mut ledger)) = q_targets.get_mut(owner) else {
            continue;
        };

        let outcome = apply_tracked_damage(
            &mut health,
            &mut ledger,
            req.originator,
            req.points,
            now,
            req.dedup_window,
        );
        feedback.report(owner, outcome, &health);

        if outcome == DamageOutcome::Killed {
            bridge.cancel_target(owner, &mut *scheduler);
        }
    }
}

/// Dead entities stop interacting; opted-in ones are marked for despawn.
pub fn handle_deaths(
    mut commands: Commands,
    mut died: MessageReader<Died>,
    q_despawn: Query<(), With<DespawnOnDeath>>,
    q_parts: Query<(Entity, &DamagablePart)>,
    mut q_layers: Query<&mut CollisionLayers>,
) {
    for ev in died.read() {
        // Composite parts carry the colliders, so silence them too.
        let parts = q_parts
            .iter()
            .filter(|(_, part)| part.owner == ev.entity)
            .map(|(e, _)| e);
        for e in std::iter::once(ev.entity).chain(parts) {
            if let Ok(mut layers) = q_layers.get_mut(e) {
                *layers = non_interacting_layers(Layer::Damagable);
            }
        }

        if q_despawn.contains(ev.entity) {
            if let Ok(mut entity) = commands.get_entity(ev.entity) {
                entity.insert(PendingDespawn);
            }
        }
    }
}

/// Despawn entities marked for removal.
///
/// Centralizing despawn in one system keeps structural changes predictable.
pub fn despawn_marked(mut commands: Commands, q: Query<Entity, With<PendingDespawn>>) {
    for e in &q {
        commands.entity(e).despawn();
    }
}
