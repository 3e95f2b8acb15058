//! Game composition root.
//!
//! Provides two public configuration functions:
//! - `configure_full`: DefaultPlugins (window, input, logging) + gameplay.
//! - `configure_headless`: gameplay only, for integration tests and hosts that
//!   bring their own runtime plugins.

use bevy::prelude::*;
use bevy::window::WindowResolution;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins;

pub fn run() {
    App::new().add_plugins(configure_full).run();
}

/// Full configuration with a window sized to the logical viewport.
pub fn configure_full(app: &mut App) {
    let size = Tunables::default().viewport.as_uvec2();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Platformer".into(),
            resolution: WindowResolution::new(size.x, size.y),
            ..default()
        }),
        ..default()
    }));

    configure_game(app);
}

/// Headless configuration.
///
/// Notes:
/// - Do NOT add DefaultPlugins.
/// - The caller provides `MinimalPlugins` and `StatesPlugin` (or equivalents).
pub fn configure_headless(app: &mut App) {
    configure_game(app);
}

/// Configuration shared by both full and headless apps.
fn configure_game(app: &mut App) {
    app.init_state::<GameState>();
    plugins::register_gameplay(app);
}
