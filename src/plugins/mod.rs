//! Feature plugins.

use bevy::prelude::*;

use crate::plugins::projectiles::ProjectilesPlugin;

pub mod camera;
pub mod character;
pub mod core;
pub mod enemies;
pub mod physics;
pub mod player;
pub mod presentation;
pub mod projectiles;
pub mod world;

/// Phases of one simulation tick, chained in this order inside `FixedUpdate`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    /// Collision detection and resolution.
    Collide,
    /// Enemies learn where the player is.
    Sense,
    /// Character updates and animation.
    Act,
    /// Bullet spawn, flight and sweep.
    Projectiles,
    /// Camera follow, screen culling and level outcome.
    Cull,
}

/// Register every simulation plugin. Works headless; nothing here needs a renderer.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    presentation::plugin(app);
    camera::plugin(app);
    physics::plugin(app);
    world::plugin(app);
    enemies::plugin(app);
    player::plugin(app);
    character::plugin(app);
    app.add_plugins(ProjectilesPlugin);
}
