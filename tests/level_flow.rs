//! Whole-level scenarios through the headless app: load, play, finish, reset.

mod common;

use bevy::prelude::*;
use bevy::ecs::message::Messages;
use common::{CELLS, CHARGER, CLEAR_DOOR, PLAYER, cell, floor_level, hold, load, state, tick};
use platformer_core::common::input::Control;
use platformer_core::common::state::GameState;
use platformer_core::plugins::camera::Viewport;
use platformer_core::plugins::character::Character;
use platformer_core::plugins::enemies::Enemy;
use platformer_core::plugins::player::{Loadout, Player};
use platformer_core::common::body::xywh;
use platformer_core::plugins::presentation::{DrawList, Sound, SoundCue, SpriteSheet};
use platformer_core::plugins::projectiles::gun::GunName;
use platformer_core::plugins::world::{
    Collectible, LevelLayout, Platform, ResetLevel, ScreenIndex, Trigger, TriggerSpec,
};

fn player(app: &mut App) -> Character {
    let world = app.world_mut();
    world
        .query_filtered::<&Character, With<Player>>()
        .single(world)
        .expect("one player")
        .clone()
}

#[test]
fn loading_spawns_the_level_and_frames_the_camera() {
    let mut app = common::app_headless();
    load(&mut app, LevelLayout::new(2, floor_level(2)));

    assert_eq!(common::count::<Player>(&mut app), 1);
    assert_eq!(common::count::<Platform>(&mut app), 30);

    let viewport = app.world().resource::<Viewport>();
    assert_eq!(viewport.level_bounds.width(), 1500);
    assert_eq!(viewport.origin(), Vec2::ZERO);

    let index = app.world().resource::<ScreenIndex<Platform>>();
    assert_eq!(index.all().len(), 30);
    assert_eq!(index.off_screen().len(), 10);

    let p = player(&mut app);
    assert_eq!(p.body.position(), Vec2::new(100.0, 550.0));
}

#[test]
fn the_player_settles_on_the_floor() {
    let mut app = common::app_headless();
    load(&mut app, LevelLayout::new(1, floor_level(1)));

    tick(&mut app, 60);

    let p = player(&mut app);
    assert!(p.body.active);
    assert!((550.0..553.0).contains(&p.body.y()), "y = {}", p.body.y());
    assert_eq!(state(&app), GameState::InGame);
}

#[test]
fn walking_into_the_door_clears_the_stage() {
    let mut app = common::app_headless();
    let mut cells = floor_level(1);
    cells[cell(0, 4, 11)] = CLEAR_DOOR;
    load(&mut app, LevelLayout::new(1, cells));

    hold(&mut app, [Control::Right]);
    tick(&mut app, 60);
    app.update();

    assert_eq!(state(&app), GameState::StageClear);
    let cues: Vec<SoundCue> = app
        .world_mut()
        .resource_mut::<Messages<SoundCue>>()
        .drain()
        .collect();
    assert!(cues.iter().any(|c| c.0 == Sound::Pickup));

    // Gameplay is frozen outside InGame.
    let before = player(&mut app).body.position();
    tick(&mut app, 10);
    assert_eq!(player(&mut app).body.position(), before);
}

#[test]
fn falling_out_of_the_level_is_game_over() {
    let mut app = common::app_headless();
    let mut cells = vec![0; CELLS];
    cells[cell(0, 2, 11)] = PLAYER;
    load(&mut app, LevelLayout::new(1, cells));

    tick(&mut app, 90);
    app.update();

    assert!(!player(&mut app).body.active);
    assert_eq!(state(&app), GameState::GameOver);
}

#[test]
fn reset_puts_everything_back() {
    let mut app = common::app_headless();
    let mut cells = floor_level(1);
    cells[cell(0, 4, 11)] = CLEAR_DOOR;
    cells[cell(0, 10, 11)] = CHARGER;
    load(&mut app, LevelLayout::new(1, cells));

    {
        let world = app.world_mut();
        let mut loadout = world
            .query_filtered::<&mut Loadout, With<Player>>()
            .single_mut(world)
            .expect("one player");
        loadout.set_ammo(GunName::Rocket, 0);
    }
    hold(&mut app, [Control::Right]);
    tick(&mut app, 60);
    app.update();
    assert_eq!(state(&app), GameState::StageClear);

    common::release_all(&mut app);
    app.world_mut().write_message(ResetLevel);
    app.update();

    assert_eq!(state(&app), GameState::InGame);
    let p = player(&mut app);
    assert_eq!(p.body.position(), Vec2::new(100.0, 550.0));
    assert_eq!(p.health, p.max_health);

    let world = app.world_mut();
    let rockets = world
        .query_filtered::<&Loadout, With<Player>>()
        .single(world)
        .expect("one player")
        .ammo(GunName::Rocket);
    assert_eq!(rockets, 10);
    assert!(world.query::<&Collectible>().iter(world).all(|c| !c.collected));
    assert!(
        world
            .query_filtered::<&Character, With<Enemy>>()
            .iter(world)
            .all(|c| c.body.position() == Vec2::new(500.0, 550.0))
    );
}

#[test]
fn reloading_replaces_the_previous_level() {
    let mut app = common::app_headless();
    load(&mut app, LevelLayout::new(2, floor_level(2)));
    load(&mut app, LevelLayout::new(1, floor_level(1)));

    assert_eq!(common::count::<Player>(&mut app), 1);
    assert_eq!(common::count::<Platform>(&mut app), 15);
    let index = app.world().resource::<ScreenIndex<Platform>>();
    assert_eq!(index.all().len(), 15);
}

#[test]
fn a_bad_level_leaves_the_current_one_alone() {
    let mut app = common::app_headless();
    load(&mut app, LevelLayout::new(1, floor_level(1)));

    let mut broken = floor_level(1);
    broken[0] = 500;
    load(&mut app, LevelLayout::new(1, broken));

    assert_eq!(common::count::<Platform>(&mut app), 15);
    assert_eq!(common::count::<Player>(&mut app), 1);
}

#[test]
fn standing_in_a_trigger_shows_its_text() {
    let mut app = common::app_headless();
    let hint = TriggerSpec::new(
        xywh(0, 400, 300, 200),
        "Use 'A' or 'D' to move",
    );
    load(
        &mut app,
        LevelLayout::new(1, floor_level(1)).with_triggers(vec![hint]),
    );
    assert_eq!(common::count::<Trigger>(&mut app), 1);

    tick(&mut app, 1);
    app.update();

    let list = app.world().resource::<DrawList>();
    assert_eq!(list.texts.len(), 1);
    assert_eq!(list.texts[0].text, "Use 'A' or 'D' to move");
    assert!(list.sprites.iter().any(|s| s.sheet == SpriteSheet::Player));
    assert_eq!(
        list.sprites.iter().filter(|s| s.sheet == SpriteSheet::Tiles).count(),
        15
    );
}
