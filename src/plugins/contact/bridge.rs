//! Weapon-to-target contact state machine.
//!
//! Per `(weapon, target)` pair, keyed by [`ContactKey`]:
//!
//! ```text
//!            on_contact_begin (target alive)
//!   Idle ─────────────────────────────────────> ActiveContact
//!    ^                                              │   ^
//!    │   on_contact_end (no part touching)          │   │ ContactCycle:
//!    │   cancel / target dead / entity gone         │   │ fire, wait rate_of_fire
//!    └──────────────────────────────────────────────┘───┘
//! ```
//!
//! The physics layer reports contact begin once per touching collider, and a
//! composite target has several. The key is built from the weapon and the
//! *health holder*, so every part of one target maps to one entry and one
//! repeating cycle.

use std::time::Duration;

use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::common::ids::StableId;
use crate::plugins::scheduler::{ScheduledAction, TimedActionScheduler};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactKey {
    pub weapon: StableId,
    pub target: StableId,
}

impl ContactKey {
    #[inline]
    pub fn new(weapon: StableId, target: StableId) -> Self {
        Self { weapon, target }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveContact {
    pub weapon: Entity,
    pub target: Entity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactBegin {
    Started,
    /// Duplicate notification; the pair already has a running cycle.
    AlreadyActive,
    /// Target has no health left; nothing registered.
    TargetDead,
}

/// Live contacts of one weapon, counted after a contact ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContactCensus {
    /// Colliders of this target still touching the weapon.
    pub target_parts: usize,
    /// Damagable colliders of any target still touching the weapon.
    pub damagable: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEnd {
    /// No part of the target touches the weapon any more; the cycle is gone.
    pub group_contact_ended: bool,
    /// The weapon touches nothing damagable at all.
    pub all_damagable_contacts_ended: bool,
}

#[derive(Resource, Debug, Default)]
pub struct ContactBridge {
    active: HashMap<ContactKey, ActiveContact>,
}

impl ContactBridge {
    #[inline]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    #[inline]
    pub fn is_active(&self, key: ContactKey) -> bool {
        self.active.contains_key(&key)
    }

    #[inline]
    pub fn get(&self, key: ContactKey) -> Option<&ActiveContact> {
        self.active.get(&key)
    }

    /// Register a repeating cycle for `key` unless one exists or the target is dead.
    ///
    /// The first iteration is scheduled with zero delay so the opening shot
    /// lands on the same tick.
    pub fn on_contact_begin(
        &mut self,
        key: ContactKey,
        weapon: Entity,
        target: Entity,
        target_health: i32,
        scheduler: &mut impl TimedActionScheduler,
    ) -> ContactBegin {
        if self.active.contains_key(&key) {
            return ContactBegin::AlreadyActive;
        }
        if target_health <= 0 {
            return ContactBegin::TargetDead;
        }

        self.active.insert(key, ActiveContact { weapon, target });
        scheduler.schedule_once(Duration::ZERO, ScheduledAction::ContactCycle { key });
        ContactBegin::Started
    }

    /// Stop the cycle once no part of the target is touching the weapon.
    pub fn on_contact_end(
        &mut self,
        key: ContactKey,
        census: ContactCensus,
        scheduler: &mut impl TimedActionScheduler,
    ) -> ContactEnd {
        let group_contact_ended = census.target_parts == 0;
        if group_contact_ended {
            self.cancel(key, scheduler);
        }
        ContactEnd {
            group_contact_ended,
            all_damagable_contacts_ended: census.damagable == 0,
        }
    }

    /// Drop the entry and its pending cycle. False if `key` was idle.
    pub fn cancel(&mut self, key: ContactKey, scheduler: &mut impl TimedActionScheduler) -> bool {
        scheduler.cancel_scheduled(key);
        self.active.remove(&key).is_some()
    }

    /// Cancel every cycle aimed at `target`. Returns how many were running.
    pub fn cancel_target(
        &mut self,
        target: Entity,
        scheduler: &mut impl TimedActionScheduler,
    ) -> usize {
        self.cancel_where(scheduler, |c| c.target == target)
    }

    pub fn cancel_where(
        &mut self,
        scheduler: &mut impl TimedActionScheduler,
        mut pred: impl FnMut(&ActiveContact) -> bool,
    ) -> usize {
        let keys: Vec<ContactKey> = self
            .active
            .iter()
            .filter(|(_, c)| pred(c))
            .map(|(k, _)| *k)
            .collect();

        for key in &keys {
            self.cancel(*key, scheduler);
        }
        keys.len()
    }
}
