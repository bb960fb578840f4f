//! Stable entity identifiers.
//!
//! `Entity` values are recycled by the ECS once an entity is despawned, so
//! anything that must stay unique for the lifetime of a contact (ledger
//! originators, contact keys) uses a `StableId` handed out at spawn time.

use bevy::prelude::*;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StableId(pub u64);

/// Monotonic allocator. Ids are never reused.
#[derive(Resource, Debug, Default)]
pub struct StableIds {
    last: u64,
}

impl StableIds {
    pub fn allocate(&mut self) -> StableId {
        self.last += 1;
        StableId(self.last)
    }
}
