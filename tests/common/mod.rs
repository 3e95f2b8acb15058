//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` + `StatesPlugin` provide the ECS runtime.
//! - `platformer_core::game::configure_headless` installs gameplay plugins.
//! - Ticks are driven by running `FixedUpdate` directly, so tests don't depend
//!   on wall-clock time.

#![allow(dead_code)]

use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use platformer_core::common::input::{Control, InputSnapshot};
use platformer_core::common::state::GameState;
use platformer_core::plugins::world::{LevelLayout, LoadLevel};

pub const SIDE: usize = 15;
pub const CELLS: usize = SIDE * SIDE;

/// Tile codes used by the fixtures.
pub const PLAYER: i32 = 1;
pub const CHARGER: i32 = 2;
pub const CLEAR_DOOR: i32 = 7;
pub const FLOOR: i32 = 12;

pub fn app_headless() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    // Frozen clock: `app.update` never runs a fixed tick on its own.
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::ZERO));
    platformer_core::game::configure_headless(&mut app);
    app
}

/// Flat index of a cell in a column-major layout.
pub fn cell(screen: usize, column: usize, row: usize) -> usize {
    screen * CELLS + column * SIDE + row
}

/// `screens` screens with a floor along row 12 and the player at column 2, row 11.
pub fn floor_level(screens: usize) -> Vec<i32> {
    let mut cells = vec![0; screens * CELLS];
    for screen in 0..screens {
        for column in 0..SIDE {
            cells[cell(screen, column, 12)] = FLOOR;
        }
    }
    cells[cell(0, 2, 11)] = PLAYER;
    cells
}

pub fn load(app: &mut App, layout: LevelLayout) {
    app.world_mut().write_message(LoadLevel(layout));
    app.update();
}

pub fn tick(app: &mut App, n: usize) {
    for _ in 0..n {
        app.world_mut().run_schedule(FixedUpdate);
    }
}

pub fn hold(app: &mut App, controls: impl IntoIterator<Item = Control>) {
    app.world_mut().insert_resource(InputSnapshot::with(controls));
}

pub fn release_all(app: &mut App) {
    app.world_mut().insert_resource(InputSnapshot::default());
}

pub fn state(app: &App) -> GameState {
    *app.world().resource::<State<GameState>>().get()
}

pub fn count<C: Component>(app: &mut App) -> usize {
    let world = app.world_mut();
    world.query::<&C>().iter(world).count()
}
