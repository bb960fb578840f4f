use std::time::Duration;

use bevy::prelude::*;

use crate::common::ids::StableId;
use crate::plugins::contact::bridge::ContactKey;

use super::{ActionScheduler, ScheduledAction, TimedActionScheduler};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn key(weapon: u64, target: u64) -> ContactKey {
    ContactKey::new(StableId(weapon), StableId(target))
}

#[test]
fn pops_in_due_order_then_schedule_order() {
    let mut world = World::new();
    let w = world.spawn_empty().id();
    let mut s = ActionScheduler::default();

    s.schedule_once(ms(200), ScheduledAction::ContactCycle { key: key(1, 2) });
    s.schedule_once(ms(100), ScheduledAction::FireCooldownElapsed { weapon: w, window: 1 });
    s.schedule_once(ms(100), ScheduledAction::ContactCycle { key: key(1, 3) });

    assert_eq!(
        s.pop_due(ms(1000)),
        Some(ScheduledAction::FireCooldownElapsed { weapon: w, window: 1 })
    );
    assert_eq!(s.pop_due(ms(1000)), Some(ScheduledAction::ContactCycle { key: key(1, 3) }));
    assert_eq!(s.pop_due(ms(1000)), Some(ScheduledAction::ContactCycle { key: key(1, 2) }));
    assert_eq!(s.pop_due(ms(1000)), None);
}

#[test]
fn respects_horizon_and_moves_clock_to_due_time() {
    let mut s = ActionScheduler::default();
    s.schedule_once(ms(250), ScheduledAction::ContactCycle { key: key(1, 2) });

    assert_eq!(s.pop_due(ms(249)), None);
    assert_eq!(s.now(), Duration::ZERO);

    assert!(s.pop_due(ms(400)).is_some());
    assert_eq!(s.now(), ms(250));

    // Scheduling from inside an action is relative to its due time.
    s.schedule_once(ms(100), ScheduledAction::ContactCycle { key: key(1, 2) });
    assert_eq!(s.next_due(), Some(ms(350)));

    s.advance_to(ms(400));
    assert_eq!(s.now(), ms(400));
    s.advance_to(ms(10));
    assert_eq!(s.now(), ms(400), "clock never runs backwards");
}

#[test]
fn zero_delay_is_due_immediately() {
    let mut s = ActionScheduler::default();
    s.advance_to(ms(500));
    s.schedule_once(Duration::ZERO, ScheduledAction::ContactCycle { key: key(4, 5) });
    assert_eq!(s.pop_due(ms(500)), Some(ScheduledAction::ContactCycle { key: key(4, 5) }));
}

#[test]
fn cancel_drops_only_the_given_key() {
    let mut world = World::new();
    let w = world.spawn_empty().id();
    let mut s = ActionScheduler::default();

    s.schedule_once(ms(10), ScheduledAction::ContactCycle { key: key(1, 2) });
    s.schedule_once(ms(20), ScheduledAction::ContactCycle { key: key(1, 2) });
    s.schedule_once(ms(10), ScheduledAction::ContactCycle { key: key(1, 3) });
    s.schedule_once(ms(10), ScheduledAction::ReloadComplete { weapon: w, window: 1 });

    assert_eq!(s.cancel_scheduled(key(1, 2)), 2);
    assert!(!s.is_scheduled(key(1, 2)));
    assert!(s.is_scheduled(key(1, 3)));
    assert_eq!(s.len(), 2);

    assert_eq!(s.cancel_scheduled(key(9, 9)), 0);
}

#[test]
fn pending_lists_actions_in_execution_order() {
    let mut s = ActionScheduler::default();
    s.schedule_once(ms(30), ScheduledAction::ContactCycle { key: key(1, 3) });
    s.schedule_once(ms(10), ScheduledAction::ContactCycle { key: key(1, 2) });

    let dues: Vec<Duration> = s.pending().map(|(due, _)| due).collect();
    assert_eq!(dues, vec![ms(10), ms(30)]);
    assert!(!s.is_empty());
}

#[test]
fn never_delay_saturates_instead_of_overflowing() {
    let mut s = ActionScheduler::default();
    s.advance_to(ms(16));
    s.schedule_once(Duration::MAX, ScheduledAction::ContactCycle { key: key(1, 2) });
    s.schedule_once(ms(10), ScheduledAction::ContactCycle { key: key(1, 3) });

    assert_eq!(s.next_due(), Some(ms(26)));
    assert_eq!(s.pop_due(ms(1000)), Some(ScheduledAction::ContactCycle { key: key(1, 3) }));
    assert_eq!(s.pop_due(ms(1000)), None);
    assert_eq!(s.pending().map(|(due, _)| due).last(), Some(Duration::MAX));
}
