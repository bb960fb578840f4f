//! Core plugin: shared resources and global settings.

use crate::common::ids::StableIds;
use crate::common::tunables::Tunables;
use bevy::prelude::*;

pub fn plugin(app: &mut App) {
    app.init_resource::<Tunables>();
    app.init_resource::<StableIds>();
}
