//! Core plugin: tunables, the fixed clock and the tick phases.

use std::time::Duration;

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::SimSet;
use crate::plugins::camera::Viewport;

pub fn plugin(app: &mut App) {
    // A host may insert its own tunables before registering gameplay.
    app.init_resource::<Tunables>();
    let tunables = app.world().resource::<Tunables>().clone();

    app.insert_resource(Viewport::new(tunables.viewport));
    app.insert_resource(Time::<Fixed>::from_hz(tunables.tick_hz));

    app.configure_sets(
        FixedUpdate,
        (
            SimSet::Collide,
            SimSet::Sense,
            SimSet::Act,
            SimSet::Projectiles,
            SimSet::Cull,
        )
            .chain()
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(OnEnter(GameState::StageClear), log_outcome)
        .add_systems(OnEnter(GameState::GameOver), log_outcome);

    info!(
        "simulation at {} Hz ({:?} per tick), viewport {}x{}",
        tunables.tick_hz,
        Duration::from_secs_f64(1.0 / tunables.tick_hz),
        tunables.viewport.x,
        tunables.viewport.y
    );
}

fn log_outcome(state: Res<State<GameState>>) {
    info!("level finished: {:?}", state.get());
}

#[cfg(test)]
mod tests;
