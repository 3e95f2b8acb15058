use bevy::ecs::message::Messages;
use bevy::prelude::*;

use super::*;
use crate::common::body::xywh;
use crate::common::test_utils::{run_system_once, sim_world};
use crate::common::tunables::Tunables;
use crate::plugins::enemies::charger_bundle;
use crate::plugins::player::player_bundle;
use crate::plugins::projectiles::gun::Gun;
use crate::plugins::world::{Collectible, CollectibleKind, Platform, PlatformKind, Trigger};

#[derive(Default)]
struct Recorder {
    sprites: Vec<DrawCommand>,
    texts: Vec<String>,
    sounds: Vec<Sound>,
}

impl DrawSink for Recorder {
    fn draw(&mut self, command: &DrawCommand) {
        self.sprites.push(command.clone());
    }
    fn text(&mut self, command: &TextCommand) {
        self.texts.push(command.text.clone());
    }
}

impl SoundSink for Recorder {
    fn play(&mut self, sound: Sound) {
        self.sounds.push(sound);
    }
}

fn draw_world() -> World {
    let mut world = sim_world();
    world.init_resource::<DrawList>();
    world
}

fn build(world: &mut World) -> Recorder {
    run_system_once(world, build_draw_list);
    let mut sink = Recorder::default();
    world.resource::<DrawList>().submit(&mut sink);
    sink
}

#[test]
fn flashing_hides_every_fourth_step() {
    let hidden: Vec<i32> = (0..40).filter(|&t| !flash_visible(t)).collect();
    assert_eq!(hidden, vec![15, 16, 17, 18, 19, 35, 36, 37, 38, 39]);
}

#[test]
fn characters_draw_centred_with_the_frame_pivot() {
    let mut world = draw_world();
    let t = world.resource::<Tunables>().clone();
    world.spawn(player_bundle(IVec2::new(100, 200), &t));

    let sink = build(&mut world);

    assert_eq!(sink.sprites.len(), 1);
    let cmd = &sink.sprites[0];
    assert_eq!(cmd.sheet, SpriteSheet::Player);
    assert_eq!(cmd.dest, xywh(125, 225, 50, 50));
    assert_eq!(cmd.pivot, Vec2::splat(16.0));
    assert_eq!(cmd.tint, Color::WHITE);
}

#[test]
fn god_mode_tints_the_player() {
    let mut world = draw_world();
    let t = world.resource::<Tunables>().clone();
    let player = world.spawn(player_bundle(IVec2::new(100, 200), &t)).id();
    world.get_mut::<Character>(player).unwrap().god_mode = true;

    let sink = build(&mut world);
    assert_eq!(sink.sprites[0].tint, GOD_TINT);
}

#[test]
fn inactive_and_flashing_characters_are_skipped() {
    let mut world = draw_world();
    let t = world.resource::<Tunables>().clone();
    let dead = world.spawn(charger_bundle(IVec2::new(0, 0), &t)).id();
    world.get_mut::<Character>(dead).unwrap().body.destroy();
    let flashing = world.spawn(player_bundle(IVec2::new(100, 200), &t)).id();
    world.get_mut::<Character>(flashing).unwrap().invincibility_timer = 16;

    let sink = build(&mut world);
    assert!(sink.sprites.is_empty());
}

#[test]
fn enemies_use_their_own_sheet() {
    let mut world = draw_world();
    let t = world.resource::<Tunables>().clone();
    world.spawn(charger_bundle(IVec2::new(0, 0), &t));

    let sink = build(&mut world);
    assert_eq!(sink.sprites[0].sheet, SpriteSheet::Charger);
}

#[test]
fn tiles_draw_back_to_front_and_skip_collected_pickups() {
    let mut world = draw_world();
    let t = world.resource::<Tunables>().clone();
    let kind = PlatformKind::from_index(0).unwrap();
    world.spawn(Platform::new(IVec2::new(0, 500), kind, &t));
    world.spawn(Collectible::new(IVec2::new(50, 450), CollectibleKind::Health, &t));
    let mut taken = Collectible::new(IVec2::new(100, 450), CollectibleKind::Health, &t);
    taken.collect();
    world.spawn(taken);
    world.spawn(player_bundle(IVec2::new(200, 400), &t));

    let sink = build(&mut world);

    let sheets: Vec<SpriteSheet> = sink.sprites.iter().map(|c| c.sheet).collect();
    assert_eq!(
        sheets,
        vec![SpriteSheet::Tiles, SpriteSheet::Tiles, SpriteSheet::Player]
    );
    assert_eq!(sink.sprites[0].dest, xywh(0, 500, 51, 51));
    assert_eq!(sink.sprites[1].pivot, Vec2::ZERO);
}

#[test]
fn bullets_carry_their_rotation() {
    let mut world = draw_world();
    let t = world.resource::<Tunables>().clone();
    let mut gun = Gun::pistol(&t);
    gun.position = Vec2::new(300.0, 300.0);
    gun.aim_at(Vec2::new(300.0, 400.0));
    let bullet = gun.fire().remove(0);
    let rotation = bullet.body.rotation;
    world.spawn(bullet);

    let sink = build(&mut world);
    assert_eq!(sink.sprites.len(), 1);
    assert_eq!(sink.sprites[0].rotation, rotation);
    assert_eq!(sink.sprites[0].pivot, Vec2::splat(16.0));
}

#[test]
fn trigger_text_only_while_touched() {
    let mut world = draw_world();
    let rect = xywh(0, 0, 100, 100);
    world.spawn(Trigger::new(rect, "hidden", None));
    let mut shown = Trigger::new(rect, "shown", Some(Vec2::new(10.0, 10.0)));
    shown.body.colliding = true;
    world.spawn(shown);

    let sink = build(&mut world);
    assert_eq!(sink.texts, vec!["shown".to_string()]);
}

#[test]
fn draw_list_is_rebuilt_each_frame() {
    let mut world = draw_world();
    let t = world.resource::<Tunables>().clone();
    world.spawn(player_bundle(IVec2::new(100, 200), &t));

    build(&mut world);
    let sink = build(&mut world);
    assert_eq!(sink.sprites.len(), 1);
}

#[test]
fn sounds_drain_in_order() {
    let mut world = sim_world();
    {
        let mut cues = world.resource_mut::<Messages<SoundCue>>();
        cues.write(SoundCue(Sound::Shot));
        cues.write(SoundCue(Sound::Explosion));
    }
    let mut sink = Recorder::default();

    assert_eq!(drain_sounds(&mut world, &mut sink), 2);
    assert_eq!(sink.sounds, vec![Sound::Shot, Sound::Explosion]);
    assert_eq!(drain_sounds(&mut world, &mut sink), 0);
}

#[test]
fn draining_without_a_buffer_is_a_no_op() {
    let mut world = World::new();
    let mut sink = Recorder::default();
    assert_eq!(drain_sounds(&mut world, &mut sink), 0);
}
