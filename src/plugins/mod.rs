//! Feature plugins.

use bevy::prelude::*;

use crate::plugins::contact::ContactPlugin;

pub mod contact;
pub mod core;
pub mod damage;
pub mod physics;
pub mod scheduler;
pub mod weapons;

// Render-only
pub mod sandbox;

/// Register gameplay plugins that work in headless tests.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    physics::plugin(app);
    scheduler::plugin(app);
    weapons::plugin(app);
    damage::plugin(app);
    app.add_plugins(ContactPlugin);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    sandbox::plugin(app);
}
