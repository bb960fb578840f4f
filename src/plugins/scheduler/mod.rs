//! Deferred action scheduler.
//!
//! Firing and reloading open "busy" windows that close later; a contact keeps
//! firing on a fixed cadence until it ends. None of this blocks. Producers
//! enqueue a [`ScheduledAction`] with a delay and a single consumer
//! (`dispatch::run_due_actions`) executes it on a later fixed tick.
//!
//! # Time model
//! The scheduler owns its own clock. Each fixed tick the dispatcher moves the
//! horizon forward by `Time<Fixed>::delta()` and pops due actions one by one,
//! earliest first. While an action runs, `now()` reads that action's due time,
//! so anything it reschedules keeps an exact cadence regardless of how the
//! fixed step divides the delay.
//!
//! # Ordering
//! Actions due at the same instant run in the order they were scheduled.
//! A weapon's cooldown is always scheduled before the contact cycle that
//! fired it, so the cooldown closes first when both fall due together.

use std::collections::BTreeMap;
use std::time::Duration;

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::contact::bridge::ContactKey;

pub mod dispatch;

/// The deferred "callbacks" this crate knows about, expressed as data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledAction {
    /// Close the weapon's firing window number `window`.
    FireCooldownElapsed { weapon: Entity, window: u32 },
    /// Refill the magazine and close the reload window number `window`.
    ReloadComplete { weapon: Entity, window: u32 },
    /// Run one iteration of a repeating contact damage cycle.
    ContactCycle { key: ContactKey },
}

impl ScheduledAction {
    #[inline]
    pub fn contact_key(&self) -> Option<ContactKey> {
        match *self {
            Self::ContactCycle { key } => Some(key),
            _ => None,
        }
    }
}

/// Timer facility consumed by weapons and the contact bridge.
pub trait TimedActionScheduler {
    fn now(&self) -> Duration;

    /// Run `action` once, `delay` after `now()`. Saturates at `Duration::MAX`.
    fn schedule_once(&mut self, delay: Duration, action: ScheduledAction);

    /// Cancel every pending action tied to `key`. Returns how many were dropped.
    fn cancel_scheduled(&mut self, key: ContactKey) -> usize;
}

#[derive(Resource, Debug, Default)]
pub struct ActionScheduler {
    now: Duration,
    next_seq: u64,
    agenda: BTreeMap<(Duration, u64), ScheduledAction>,
}

impl ActionScheduler {
    #[inline]
    pub fn len(&self) -> usize {
        self.agenda.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.agenda.is_empty()
    }

    /// Due time of the earliest pending action.
    pub fn next_due(&self) -> Option<Duration> {
        self.agenda.keys().next().map(|&(due, _)| due)
    }

    pub fn is_scheduled(&self, key: ContactKey) -> bool {
        self.agenda.values().any(|a| a.contact_key() == Some(key))
    }

    /// Iterate pending actions in execution order.
    pub fn pending(&self) -> impl Iterator<Item = (Duration, &ScheduledAction)> {
        self.agenda.iter().map(|(&(due, _), a)| (due, a))
    }

    /// Pop the earliest action due at or before `horizon`.
    ///
    /// The clock jumps to the action's due time (never backwards).
    pub fn pop_due(&mut self, horizon: Duration) -> Option<ScheduledAction> {
        let (&(due, _), _) = self.agenda.first_key_value()?;
        if due > horizon {
            return None;
        }
        let ((due, _), action) = self.agenda.pop_first()?;
        self.now = self.now.max(due);
        Some(action)
    }

    /// Move the clock to `horizon` once every due action has run.
    #[inline]
    pub fn advance_to(&mut self, horizon: Duration) {
        self.now = self.now.max(horizon);
    }
}

impl TimedActionScheduler for ActionScheduler {
    #[inline]
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule_once(&mut self, delay: Duration, action: ScheduledAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        // `Duration::MAX` reads as "never"; it must not overflow the clock.
        self.agenda.insert((self.now.saturating_add(delay), seq), action);
    }

    fn cancel_scheduled(&mut self, key: ContactKey) -> usize {
        let before = self.agenda.len();
        self.agenda.retain(|_, a| a.contact_key() != Some(key));
        before - self.agenda.len()
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<ActionScheduler>();

    app.add_systems(
        FixedPostUpdate,
        dispatch::run_due_actions
            .after(crate::plugins::contact::collision::process_weapon_contacts)
            .after(crate::plugins::contact::prune_orphaned_contacts)
            .after(crate::plugins::weapons::process_weapon_requests)
            .after(crate::plugins::damage::systems::process_damage_requests)
            .run_if(in_state(GameState::InGame)),
    );
}

#[cfg(test)]
mod tests;
