mod common;

use bevy::prelude::*;
use platformer_core::common::state::GameState;
use platformer_core::plugins::presentation::DrawList;

#[test]
fn boots_and_ticks() {
    let mut app = common::app_headless();

    for _ in 0..3 {
        app.update();
    }
    common::tick(&mut app, 10);

    assert_eq!(common::state(&app), GameState::InGame);
}

#[test]
fn empty_world_draws_nothing() {
    let mut app = common::app_headless();
    app.update();

    let list = app.world().resource::<DrawList>();
    assert!(list.sprites.is_empty());
    assert!(list.texts.is_empty());
}
