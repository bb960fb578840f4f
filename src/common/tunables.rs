//! Tunable gameplay constants.

use std::time::Duration;

use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    pub pixels_per_meter: f32,
    /// Floor for the repeat interval of a contact cycle.
    pub min_cycle_interval: Duration,
    /// Distinct originators a damage ledger keeps before evicting.
    pub ledger_max_originators: usize,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pixels_per_meter: 20.0,
            min_cycle_interval: Duration::from_millis(10),
            ledger_max_originators: 16,
        }
    }
}
