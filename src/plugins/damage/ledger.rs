//! Per-target record of who dealt damage and when.
//!
//! A damage source that touches a target several times in one window (the
//! physics layer reports contacts every step, composites report once per part)
//! must still only hurt it once per window. Every application goes through
//! [`apply_tracked_damage`], which records an event per originator and only
//! applies it once the originator's window has passed.
//!
//! # Retention
//! Applying an event drops the older applied events of the same originator,
//! so each originator keeps at most its latest applied event plus one pending
//! event. At most `max_originators` originators are tracked; past that the
//! least recently active originator without a pending event is forgotten.

use std::time::Duration;

use bevy::prelude::*;

use crate::common::ids::StableId;

use super::components::{DamageOutcome, Damageable, Health};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageEvent {
    pub originator: StableId,
    pub damage_points: i32,
    pub created_at: Duration,
    applied_at: Option<Duration>,
}

impl DamageEvent {
    pub fn new(originator: StableId, damage_points: i32, created_at: Duration) -> Self {
        Self {
            originator,
            damage_points,
            created_at,
            applied_at: None,
        }
    }

    #[inline]
    pub fn applied_at(&self) -> Option<Duration> {
        self.applied_at
    }

    #[inline]
    pub fn is_applied(&self) -> bool {
        self.applied_at.is_some()
    }

    /// One-way transition. False if the event was already applied.
    pub fn mark_applied(&mut self, at: Duration) -> bool {
        if self.applied_at.is_some() {
            return false;
        }
        self.applied_at = Some(at);
        true
    }

    #[inline]
    fn last_activity(&self) -> Duration {
        self.applied_at.unwrap_or(self.created_at)
    }
}

#[derive(Component, Debug, Clone)]
pub struct DamageLedger {
    events: Vec<DamageEvent>,
    max_originators: usize,
}

impl Default for DamageLedger {
    fn default() -> Self {
        Self::with_max_originators(16)
    }
}

impl DamageLedger {
    pub fn with_max_originators(max_originators: usize) -> Self {
        Self {
            events: Vec::new(),
            max_originators: max_originators.max(1),
        }
    }

    /// Events in insertion order.
    #[inline]
    pub fn events(&self) -> &[DamageEvent] {
        &self.events
    }

    /// Append. No dedup here; see [`apply_tracked_damage`].
    pub fn record(&mut self, event: DamageEvent) {
        self.events.push(event);
        self.evict_excess_originators();
    }

    pub fn most_recent_application_time(&self, originator: StableId) -> Option<Duration> {
        self.events
            .iter()
            .filter(|e| e.originator == originator)
            .filter_map(|e| e.applied_at)
            .max()
    }

    pub fn unapplied_count(&self, originator: StableId) -> usize {
        self.events
            .iter()
            .filter(|e| e.originator == originator && !e.is_applied())
            .count()
    }

    pub fn first_unapplied(&self, originator: StableId) -> Option<&DamageEvent> {
        self.events
            .iter()
            .find(|e| e.originator == originator && !e.is_applied())
    }

    /// Has `originator` applied damage less than `window` before `now`?
    pub fn applied_within(&self, originator: StableId, now: Duration, window: Duration) -> bool {
        self.most_recent_application_time(originator)
            .is_some_and(|at| now.saturating_sub(at) < window)
    }

    /// Mark the originator's oldest pending event as applied at `now` and
    /// return it. Older applied events of that originator are dropped.
    pub fn apply_first_unapplied(
        &mut self,
        originator: StableId,
        now: Duration,
    ) -> Option<DamageEvent> {
        let idx = self
            .events
            .iter()
            .position(|e| e.originator == originator && !e.is_applied())?;

        self.events[idx].mark_applied(now);
        let applied = self.events[idx];

        let mut i = 0;
        self.events.retain(|e| {
            let keep = i == idx || e.originator != originator || !e.is_applied();
            i += 1;
            keep
        });
        Some(applied)
    }

    /// Distinct originators currently tracked.
    pub fn originator_count(&self) -> usize {
        let mut seen: Vec<StableId> = Vec::new();
        for e in &self.events {
            if !seen.contains(&e.originator) {
                seen.push(e.originator);
            }
        }
        seen.len()
    }

    fn evict_excess_originators(&mut self) {
        while self.originator_count() > self.max_originators {
            // Least recently active originator with nothing pending.
            let victim = self
                .events
                .iter()
                .filter(|e| self.unapplied_count(e.originator) == 0)
                .min_by_key(|e| e.last_activity())
                .map(|e| e.originator);

            let Some(victim) = victim else {
                return;
            };
            self.events.retain(|e| e.originator != victim);
        }
    }
}

/// Shared damage path for contact cycles and scripted damage.
///
/// - dead targets are left alone (nothing is recorded);
/// - a new event is recorded only when `originator` has none pending;
/// - the pending event is applied only if `originator` has not applied damage
///   within `window` (a zero window never blocks).
pub fn apply_tracked_damage(
    health: &mut Health,
    ledger: &mut DamageLedger,
    originator: StableId,
    points: i32,
    now: Duration,
    window: Duration,
) -> DamageOutcome {
    if !health.is_alive() {
        return DamageOutcome::Ignored;
    }

    if ledger.unapplied_count(originator) == 0 {
        ledger.record(DamageEvent::new(originator, points, now));
    }

    if ledger.applied_within(originator, now, window) {
        return DamageOutcome::Ignored;
    }

    let Some(event) = ledger.apply_first_unapplied(originator, now) else {
        return DamageOutcome::Ignored;
    };
    health.apply_damage(event.damage_points)
}
