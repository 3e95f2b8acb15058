//! Presentation plugin: what a renderer and a mixer need from the simulation.
//!
//! Nothing here draws or plays anything. Every frame `build_draw_list` turns
//! final actor state into [`DrawCommand`]s, and gameplay code writes
//! [`SoundCue`] messages. A host drains both into its own backends through the
//! [`DrawSink`] and [`SoundSink`] traits.

use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::body::xywh;
use crate::plugins::camera::Viewport;
use crate::plugins::character::Character;
use crate::plugins::character::animation::FRAME_SIZE;
use crate::plugins::enemies::{Enemy, EnemyKind};
use crate::plugins::player::Player;
use crate::plugins::projectiles::components::Bullet;
use crate::plugins::world::{Collectible, Platform, Trigger};

/// Tint applied to the player while god mode is on.
pub const GOD_TINT: Color = Color::srgb_u8(255, 239, 213);
/// Invincibility flashing: ticks per flash step and steps per cycle.
const FLASH_STEP: i32 = 5;
const FLASH_CYCLE: i32 = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Flip {
    #[default]
    None,
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sound {
    Jump,
    Slam,
    Shot,
    RocketShot,
    Explosion,
    Pickup,
    EnemyHurt,
    EnemyDead,
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SoundCue(pub Sound);

/// Fire-and-forget audio backend.
pub trait SoundSink {
    fn play(&mut self, sound: Sound);
}

/// Hand every pending cue to `sink`, oldest first. Returns how many were played.
pub fn drain_sounds(world: &mut World, sink: &mut impl SoundSink) -> usize {
    let Some(mut cues) = world.get_resource_mut::<Messages<SoundCue>>() else {
        return 0;
    };
    cues.drain().map(|SoundCue(sound)| sink.play(sound)).count()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteSheet {
    Player,
    Charger,
    Shooter,
    /// Platforms, pickups and projectiles.
    Tiles,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawCommand {
    pub sheet: SpriteSheet,
    /// World-space destination.
    pub dest: IRect,
    pub source: IRect,
    pub tint: Color,
    pub rotation: f32,
    /// Rotation origin in source pixels.
    pub pivot: Vec2,
    pub flip: Flip,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextCommand {
    pub text: String,
    pub position: Vec2,
    pub color: Color,
}

pub trait DrawSink {
    fn draw(&mut self, command: &DrawCommand);
    fn text(&mut self, command: &TextCommand);
}

/// One frame of draw parameters, back to front.
#[derive(Resource, Debug, Default)]
pub struct DrawList {
    pub sprites: Vec<DrawCommand>,
    pub texts: Vec<TextCommand>,
    /// World position of the viewport's top-left corner.
    pub camera_origin: Vec2,
}

impl DrawList {
    pub fn clear(&mut self) {
        self.sprites.clear();
        self.texts.clear();
    }

    pub fn submit(&self, sink: &mut impl DrawSink) {
        self.sprites.iter().for_each(|c| sink.draw(c));
        self.texts.iter().for_each(|c| sink.text(c));
    }
}

/// Hidden on every fourth flash step while invincible.
#[inline]
pub fn flash_visible(invincibility_timer: i32) -> bool {
    (invincibility_timer / FLASH_STEP) % FLASH_CYCLE != FLASH_CYCLE - 1
}

/// Characters and bullets are drawn around their centre, so the destination
/// starts half a box further on.
fn centred(bounds: IRect) -> IRect {
    let half = bounds.size() / 2;
    xywh(
        bounds.min.x + half.x,
        bounds.min.y + half.y,
        bounds.width(),
        bounds.height(),
    )
}

fn centre_pivot() -> Vec2 {
    Vec2::splat((FRAME_SIZE / 2) as f32)
}

pub fn character_command(c: &Character, sheet: SpriteSheet) -> Option<DrawCommand> {
    if !c.body.active || !flash_visible(c.invincibility_timer) {
        return None;
    }
    Some(DrawCommand {
        sheet,
        dest: centred(c.body.bounds()),
        source: c.animator.source(),
        tint: if c.god_mode { GOD_TINT } else { Color::WHITE },
        rotation: c.body.rotation,
        pivot: centre_pivot(),
        flip: c.flip,
    })
}

fn tile_command(bounds: IRect, source: IRect) -> DrawCommand {
    DrawCommand {
        sheet: SpriteSheet::Tiles,
        dest: bounds,
        source,
        tint: Color::WHITE,
        rotation: 0.0,
        pivot: Vec2::ZERO,
        flip: Flip::None,
    }
}

pub fn plugin(app: &mut App) {
    app.add_message::<SoundCue>()
        .init_resource::<DrawList>()
        .add_systems(PostUpdate, build_draw_list);
}

#[allow(clippy::too_many_arguments)]
pub fn build_draw_list(
    viewport: Res<Viewport>,
    mut list: ResMut<DrawList>,
    platforms: Query<&Platform>,
    enemies: Query<(&Character, &Enemy), Without<Player>>,
    collectibles: Query<&Collectible>,
    bullets: Query<&Bullet>,
    player: Query<&Character, With<Player>>,
    triggers: Query<&Trigger>,
) {
    list.clear();
    list.camera_origin = viewport.origin();

    for p in &platforms {
        if p.body.active {
            list.sprites.push(tile_command(p.body.bounds(), p.source));
        }
    }

    for (c, enemy) in &enemies {
        let sheet = match enemy.kind {
            EnemyKind::Charger => SpriteSheet::Charger,
            EnemyKind::Shooter => SpriteSheet::Shooter,
        };
        list.sprites.extend(character_command(c, sheet));
    }

    for item in &collectibles {
        if item.body.active && !item.collected {
            list.sprites.push(tile_command(item.body.bounds(), item.source));
        }
    }

    for b in &bullets {
        if !b.body.active {
            continue;
        }
        list.sprites.push(DrawCommand {
            rotation: b.body.rotation,
            pivot: centre_pivot(),
            ..tile_command(centred(b.body.bounds()), b.source)
        });
    }

    for c in &player {
        list.sprites.extend(character_command(c, SpriteSheet::Player));
    }

    for t in &triggers {
        if t.is_shown() {
            list.texts.push(TextCommand {
                text: t.message.clone(),
                position: t.text_position,
                color: Color::BLACK,
            });
        }
    }
}

#[cfg(test)]
mod tests;
