//! Global state machine.

use bevy::prelude::*;

/// Simulation runs only in `InGame`; the other two are level outcomes the
/// host reacts to (menus live outside the core).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    InGame,
    StageClear,
    GameOver,
}
