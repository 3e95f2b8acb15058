use bevy::prelude::*;

use super::{Loadout, Player, PlayerControl, keep_in_bounds, player_bundle, update_player};
use crate::common::input::{Control, InputFrame, InputSnapshot};
use crate::common::test_utils::{drain_messages, run_system_once, sim_world};
use crate::common::tunables::Tunables;
use crate::plugins::character::{Character, CharacterState};
use crate::plugins::presentation::{Sound, SoundCue};
use crate::plugins::projectiles::components::Faction;
use crate::plugins::projectiles::gun::{Gun, GunName};
use crate::plugins::projectiles::messages::SpawnBullet;

fn world_with_player() -> (World, Entity) {
    let mut world = sim_world();
    world.init_resource::<InputSnapshot>();
    let t = world.resource::<Tunables>().clone();
    let player = world.spawn(player_bundle(IVec2::new(300, 400), &t)).id();
    (world, player)
}

fn ground(world: &mut World, player: Entity) {
    let mut c = world.get_mut::<Character>(player).unwrap();
    c.body.colliding = true;
    c.body.prev_colliding = true;
}

fn hold(world: &mut World, controls: impl IntoIterator<Item = Control>) {
    world.insert_resource(InputSnapshot::with(controls));
}

fn sounds(world: &mut World) -> Vec<Sound> {
    drain_messages::<SoundCue>(world).into_iter().map(|c| c.0).collect()
}

#[test]
fn jump_press_lifts_and_plays_sound() {
    let (mut world, player) = world_with_player();
    ground(&mut world, player);
    hold(&mut world, [Control::Jump]);

    run_system_once(&mut world, update_player);

    let c = world.get::<Character>(player).unwrap();
    assert!(c.body.velocity.y < 0.0);
    assert_eq!(c.state, CharacterState::Jump);
    assert_eq!(sounds(&mut world), vec![Sound::Jump]);
}

#[test]
fn holding_jump_does_not_jump_again() {
    let (mut world, player) = world_with_player();
    ground(&mut world, player);
    world.get_mut::<PlayerControl>(player).unwrap().previous = InputSnapshot::with([Control::Jump]);
    hold(&mut world, [Control::Jump]);

    run_system_once(&mut world, update_player);

    assert!(sounds(&mut world).is_empty());
    assert_ne!(world.get::<Character>(player).unwrap().state, CharacterState::Jump);
}

#[test]
fn down_press_while_airborne_slams() {
    let (mut world, player) = world_with_player();
    hold(&mut world, [Control::Down]);

    run_system_once(&mut world, update_player);

    let c = world.get::<Character>(player).unwrap();
    assert_eq!(c.state, CharacterState::Slam);
    assert!(c.body.velocity.y >= c.slam_speed);
    assert_eq!(sounds(&mut world), vec![Sound::Slam]);
}

#[test]
fn held_down_falls_through_until_released_in_the_air() {
    let (mut world, player) = world_with_player();
    ground(&mut world, player);
    world.get_mut::<PlayerControl>(player).unwrap().previous = InputSnapshot::with([Control::Down]);
    hold(&mut world, [Control::Down]);

    run_system_once(&mut world, update_player);
    assert_eq!(world.get::<Character>(player).unwrap().state, CharacterState::FallThrough);

    hold(&mut world, []);
    run_system_once(&mut world, update_player);
    assert_eq!(world.get::<Character>(player).unwrap().state, CharacterState::Idle);
}

#[test]
fn shotgun_fires_a_spread_and_spends_one_round() {
    let (mut world, player) = world_with_player();
    ground(&mut world, player);
    world.get_mut::<Loadout>(player).unwrap().select(1);
    hold(&mut world, [Control::Shoot]);

    run_system_once(&mut world, update_player);

    let spawned = drain_messages::<SpawnBullet>(&mut world);
    assert_eq!(spawned.len(), 5);
    assert!(spawned.iter().all(|s| s.faction == Faction::Player));
    assert_eq!(world.get::<Loadout>(player).unwrap().ammo(GunName::Shotgun), 9);
    assert_eq!(sounds(&mut world), vec![Sound::Shot]);
    assert_eq!(world.get::<Character>(player).unwrap().state, CharacterState::Shoot);
}

#[test]
fn pistol_never_runs_dry() {
    let (mut world, player) = world_with_player();
    hold(&mut world, [Control::Shoot]);

    run_system_once(&mut world, update_player);

    assert_eq!(drain_messages::<SpawnBullet>(&mut world).len(), 1);
    let t = world.resource::<Tunables>().clone();
    assert_eq!(world.get::<Loadout>(player).unwrap().ammo(GunName::Pistol), t.pistol_ammo);
}

#[test]
fn empty_launcher_does_not_fire() {
    let (mut world, player) = world_with_player();
    {
        let mut loadout = world.get_mut::<Loadout>(player).unwrap();
        loadout.select(2);
        loadout.set_ammo(GunName::Rocket, 0);
    }
    hold(&mut world, [Control::Shoot]);

    run_system_once(&mut world, update_player);

    assert!(drain_messages::<SpawnBullet>(&mut world).is_empty());
    assert!(sounds(&mut world).is_empty());
}

#[test]
fn god_mode_fires_without_ammo_and_flies() {
    let (mut world, player) = world_with_player();
    {
        let mut loadout = world.get_mut::<Loadout>(player).unwrap();
        loadout.select(2);
        loadout.set_ammo(GunName::Rocket, 0);
    }
    hold(&mut world, [Control::GodMode, Control::Shoot, Control::Jump]);

    run_system_once(&mut world, update_player);

    let c = world.get::<Character>(player).unwrap();
    assert!(c.god_mode);
    assert!(c.body.velocity.y < 0.0);
    assert_eq!(drain_messages::<SpawnBullet>(&mut world).len(), 1);
    assert_eq!(world.get::<Loadout>(player).unwrap().ammo(GunName::Rocket), 0);
}

#[test]
fn gun_switching_wraps_in_both_directions() {
    let t = Tunables::default();
    let mut loadout = Loadout::player(&t);
    let idle = InputSnapshot::default();

    let right_click = InputSnapshot::with([Control::CycleGun]);
    for expected in [1, 2, 0] {
        loadout.switch(&InputFrame::new(&right_click, &idle));
        assert_eq!(loadout.equipped_index(), expected);
    }

    let wheel_up = InputSnapshot {
        scroll: 1.0,
        ..default()
    };
    loadout.switch(&InputFrame::new(&wheel_up, &idle));
    assert_eq!(loadout.equipped_index(), 2);

    let slot = InputSnapshot::with([Control::Slot(1)]);
    loadout.switch(&InputFrame::new(&slot, &idle));
    assert_eq!(loadout.equipped_index(), 1);

    let out_of_range = InputSnapshot::with([Control::Slot(7)]);
    loadout.switch(&InputFrame::new(&out_of_range, &idle));
    assert_eq!(loadout.equipped_index(), 1);
}

#[test]
fn restock_refills_and_reequips_the_pistol() {
    let t = Tunables::default();
    let mut loadout = Loadout::player(&t);
    loadout.select(2);
    *loadout.ammo_mut(GunName::Rocket) = 1;

    loadout.restock(t.starting_ammo);

    assert_eq!(loadout.equipped().name, GunName::Pistol);
    assert_eq!(loadout.ammo(GunName::Rocket), t.starting_ammo);
    assert_eq!(loadout.ammo(GunName::Shotgun), t.starting_ammo);
}

#[test]
#[should_panic(expected = "no ammo registered")]
fn unknown_gun_ammo_is_fatal() {
    let loadout = Loadout::new(vec![Gun::pistol(&Tunables::default())]);
    loadout.ammo(GunName::Pistol);
}

#[test]
fn bounds_clamp_sides_and_ceiling_and_kill_below() {
    let (mut world, player) = world_with_player();
    let t = world.resource::<Tunables>().clone();
    let level = IRect::new(0, 0, 1500, 750);
    let mut c = world.get_mut::<Character>(player).unwrap();

    c.body.set_x(-20.0);
    c.body.set_y(-50.0);
    c.body.velocity.y = -1.0;
    keep_in_bounds(&mut c, level, &t);
    assert_eq!(c.body.x(), 0.0);
    assert_eq!(c.body.y(), t.ceiling);
    assert_eq!(c.body.velocity.y, 0.0);

    c.body.set_x(1490.0);
    keep_in_bounds(&mut c, level, &t);
    assert_eq!(c.body.x(), 1450.0);

    c.body.set_y(t.kill_plane + 1.0);
    keep_in_bounds(&mut c, level, &t);
    assert_eq!(c.health, 0);
}

#[test]
fn player_bundle_spawns_one_controllable_player() {
    let (mut world, _) = world_with_player();
    let count = world
        .query_filtered::<(), (With<Player>, With<PlayerControl>, With<Loadout>)>()
        .iter(&world)
        .count();
    assert_eq!(count, 1);
}
