//! Weapon state machine.
//!
//! Two busy windows, firing and reloading, never open at the same time. The
//! pure transitions (`fire`, `reload`) only touch counters; the orchestration
//! methods open a window, run the synchronous hook and hand the closing of the
//! window to the scheduler.

use std::time::Duration;

use bevy::prelude::*;

use crate::plugins::scheduler::{ScheduledAction, TimedActionScheduler};

/// How `reload` accounts for spare magazines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MagazinePolicy {
    /// Reload whenever the weapon has a magazine at all. `magazines_remaining`
    /// keeps counting down past zero and a negative value reads as
    /// "out of spare magazines".
    #[default]
    Unbounded,
    /// Reload needs a spare magazine; the count never drops below zero.
    Finite,
}

/// What a combined fire/reload attempt ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponAction {
    Fired,
    ReloadStarted,
    Idle,
}

#[derive(Component, Debug, Clone)]
pub struct WeaponState {
    /// Minimum time between shots.
    pub rate_of_fire: Duration,
    pub ammo_in_magazine: u32,
    pub magazine_capacity: u32,
    pub magazines_remaining: i32,
    pub reload_duration: Duration,
    pub damage_per_shot: i32,
    pub infinite_ammo: bool,
    /// Consulted by callers; `fire_or_auto_reload` itself always reloads when empty.
    pub auto_reload: bool,
    pub magazine_policy: MagazinePolicy,
    is_firing: bool,
    is_reloading: bool,
    /// Bumped whenever a busy window opens; completions for older windows are stale.
    window: u32,
}

/// Counters worth showing in a HUD or persisting.
///
/// Busy windows are not part of a snapshot: their timers live in the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponSnapshot {
    pub ammo_in_magazine: u32,
    pub magazine_capacity: u32,
    pub magazines_remaining: i32,
    pub infinite_ammo: bool,
}

impl WeaponState {
    /// An infinite-ammo weapon. Add magazines with [`WeaponState::with_magazines`].
    pub fn new(damage_per_shot: i32, rate_of_fire: Duration) -> Self {
        Self {
            rate_of_fire,
            ammo_in_magazine: 0,
            magazine_capacity: 0,
            magazines_remaining: 0,
            reload_duration: Duration::ZERO,
            damage_per_shot,
            infinite_ammo: true,
            auto_reload: true,
            magazine_policy: MagazinePolicy::default(),
            is_firing: false,
            is_reloading: false,
            window: 0,
        }
    }

    /// Switch to finite ammo: `loaded` rounds in the magazine (capped at capacity)
    /// and `spare` full magazines in reserve.
    pub fn with_magazines(mut self, capacity: u32, loaded: u32, spare: i32) -> Self {
        self.infinite_ammo = false;
        self.magazine_capacity = capacity;
        self.ammo_in_magazine = loaded.min(capacity);
        self.magazines_remaining = spare;
        self
    }

    pub fn with_reload_duration(mut self, reload_duration: Duration) -> Self {
        self.reload_duration = reload_duration;
        self
    }

    pub fn with_auto_reload(mut self, auto_reload: bool) -> Self {
        self.auto_reload = auto_reload;
        self
    }

    pub fn with_magazine_policy(mut self, policy: MagazinePolicy) -> Self {
        self.magazine_policy = policy;
        self
    }

    #[inline]
    pub fn is_firing(&self) -> bool {
        self.is_firing
    }

    #[inline]
    pub fn is_reloading(&self) -> bool {
        self.is_reloading
    }

    #[inline]
    pub fn is_busy(&self) -> bool {
        self.is_firing || self.is_reloading
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.infinite_ammo && self.ammo_in_magazine == 0
    }

    pub fn can_fire(&self) -> bool {
        !self.is_busy() && (self.infinite_ammo || self.ammo_in_magazine > 0)
    }

    pub fn can_reload(&self) -> bool {
        let has_spare = match self.magazine_policy {
            MagazinePolicy::Unbounded => true,
            MagazinePolicy::Finite => self.magazines_remaining > 0,
        };
        self.magazine_capacity > 0 && !self.is_busy() && has_spare
    }

    /// Spend one round. Unguarded; see [`WeaponState::can_fire`].
    #[inline]
    pub fn fire(&mut self) {
        if !self.infinite_ammo {
            self.ammo_in_magazine = self.ammo_in_magazine.saturating_sub(1);
        }
    }

    /// Refill from a spare magazine. Unguarded; see [`WeaponState::can_reload`].
    pub fn reload(&mut self) {
        self.ammo_in_magazine = self.magazine_capacity;
        self.magazines_remaining = match self.magazine_policy {
            MagazinePolicy::Unbounded => self.magazines_remaining - 1,
            MagazinePolicy::Finite => (self.magazines_remaining - 1).max(0),
        };
    }

    /// Fire if allowed, run `on_fired`, and close the firing window after
    /// `rate_of_fire`. Returns whether a shot went off.
    pub fn fire_and_schedule_cooldown(
        &mut self,
        weapon: Entity,
        scheduler: &mut impl TimedActionScheduler,
        on_fired: impl FnOnce(&WeaponState),
    ) -> bool {
        if !self.can_fire() {
            return false;
        }

        self.fire();
        self.is_firing = true;
        let window = self.open_window();
        on_fired(self);
        scheduler.schedule_once(
            self.rate_of_fire,
            ScheduledAction::FireCooldownElapsed { weapon, window },
        );
        true
    }

    /// Open the reload window, run `on_reload_start`, and schedule the refill
    /// after `reload_duration`. Returns whether a reload started.
    pub fn reload_and_schedule_completion(
        &mut self,
        weapon: Entity,
        scheduler: &mut impl TimedActionScheduler,
        on_reload_start: impl FnOnce(&WeaponState),
    ) -> bool {
        if !self.can_reload() {
            return false;
        }

        self.is_reloading = true;
        let window = self.open_window();
        on_reload_start(self);
        scheduler.schedule_once(
            self.reload_duration,
            ScheduledAction::ReloadComplete { weapon, window },
        );
        true
    }

    /// Fire, or reload an empty magazine. Never both.
    pub fn fire_or_auto_reload(
        &mut self,
        weapon: Entity,
        scheduler: &mut impl TimedActionScheduler,
        on_fired: impl FnOnce(&WeaponState),
        on_reload_start: impl FnOnce(&WeaponState),
    ) -> WeaponAction {
        if self.fire_and_schedule_cooldown(weapon, scheduler, on_fired) {
            return WeaponAction::Fired;
        }
        if self.is_empty()
            && self.reload_and_schedule_completion(weapon, scheduler, on_reload_start)
        {
            return WeaponAction::ReloadStarted;
        }
        WeaponAction::Idle
    }

    #[inline]
    fn open_window(&mut self) -> u32 {
        self.window = self.window.wrapping_add(1);
        self.window
    }

    /// Close the firing window `window`. False if that window is not the open one.
    pub fn complete_cooldown(&mut self, window: u32) -> bool {
        if !self.is_firing || self.window != window {
            return false;
        }
        self.is_firing = false;
        true
    }

    /// Refill and close the reload window `window`. False (and no refill) if
    /// that window is not the open one.
    pub fn complete_reload(&mut self, window: u32) -> bool {
        if !self.is_reloading || self.window != window {
            return false;
        }
        self.reload();
        self.is_reloading = false;
        true
    }

    pub fn snapshot(&self) -> WeaponSnapshot {
        WeaponSnapshot {
            ammo_in_magazine: self.ammo_in_magazine,
            magazine_capacity: self.magazine_capacity,
            magazines_remaining: self.magazines_remaining,
            infinite_ammo: self.infinite_ammo,
        }
    }

    /// Restore counters from a snapshot. Open windows are dropped with it.
    pub fn restore(&mut self, snapshot: WeaponSnapshot) {
        self.infinite_ammo = snapshot.infinite_ammo;
        if snapshot.infinite_ammo {
            self.ammo_in_magazine = 0;
            self.magazine_capacity = 0;
            self.magazines_remaining = 0;
        } else {
            self.magazine_capacity = snapshot.magazine_capacity;
            self.ammo_in_magazine = snapshot.ammo_in_magazine.min(snapshot.magazine_capacity);
            self.magazines_remaining = snapshot.magazines_remaining;
        }
        self.is_firing = false;
        self.is_reloading = false;
    }
}
