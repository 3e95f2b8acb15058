use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::camera::Viewport;
use crate::plugins::core;

fn app() -> App {
    let mut app = App::new();
    app.add_plugins(StatesPlugin).init_state::<GameState>();
    app
}

#[test]
fn inserts_resources() {
    let mut app = app();
    core::plugin(&mut app);
    assert!(app.world().get_resource::<Tunables>().is_some());

    let viewport = app.world().resource::<Viewport>();
    assert_eq!(viewport.size(), IVec2::new(1000, 750));

    let fixed = app.world().resource::<Time<Fixed>>();
    assert!((fixed.timestep().as_secs_f64() - 1.0 / 60.0).abs() < 1e-9);
}

#[test]
fn keeps_host_tunables() {
    let mut app = app();
    app.insert_resource(Tunables {
        tick_hz: 30.0,
        viewport: IVec2::new(640, 480),
        ..default()
    });
    core::plugin(&mut app);

    assert_eq!(app.world().resource::<Tunables>().tick_hz, 30.0);
    assert_eq!(app.world().resource::<Viewport>().size(), IVec2::new(640, 480));
    let fixed = app.world().resource::<Time<Fixed>>();
    assert!((fixed.timestep().as_secs_f64() - 1.0 / 30.0).abs() < 1e-9);
}
