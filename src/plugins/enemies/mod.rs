//! Enemies plugin: the Charger and Shooter brains and the systems that drive them.
//!
//! ---------------------------
//! WHAT AN ENEMY KNOWS
//! ---------------------------
//! An enemy never reads the player entity directly. Once per tick `sense_player`
//! copies the player's centre into [`Enemy::player_center`] and rebuilds the
//! shooter's line-of-sight rectangle. The collision driver then clears
//! [`Enemy::in_sight`] if a solid platform covers too much of that rectangle.
//!
//! ---------------------------
//! DECISIONS
//! ---------------------------
//! - Charger: run at the player while in range, jump when the player is well above.
//! - Shooter: keep a band of distance. Too close or too far means hop away or
//!   toward; inside the band and grounded means fire.
//!
//! Both decisions are plain functions over `(player_center - center)` called by
//! the character state machine through [`Brain`].
//!
//! ---------------------------
//! SYSTEM ORDER (FixedUpdate)
//! ---------------------------
//! `SimSet::Sense`: sense_player
//! `SimSet::Act`:   update_enemies (before the player, matching the frame order
//!                  the collision pass assumes)

use bevy::prelude::*;

use crate::common::body::{Body, xywh};
use crate::common::tunables::Tunables;
use crate::plugins::SimSet;
use crate::plugins::character::{Animator, Brain, Character, CharacterState, Effects};
use crate::plugins::player::{Loadout, Player};
use crate::plugins::presentation::{Sound, SoundCue};
use crate::plugins::projectiles::components::Faction;
use crate::plugins::projectiles::gun::Gun;
use crate::plugins::projectiles::messages::SpawnBullet;
use crate::plugins::world::LevelEntity;

/// Enemies move slower than the player.
pub const ENEMY_SPEED_FACTOR: f32 = 0.75;
pub const ENEMY_IFRAMES: i32 = 50;
/// Nudge added to the sensed player centre so the shooter never aims at itself.
const SENSE_BIAS: Vec2 = Vec2::splat(0.01);
/// Shooter's preferred distance band, as fractions of its view radius.
const RETREAT_BELOW: f32 = 0.25;
const ADVANCE_ABOVE: f32 = 0.75;
/// Chargers jump once the player is this many body heights above.
const CHARGER_JUMP_TRIGGER: f32 = 1.5;
const CHARGER_MAX_JUMP: f32 = 0.9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Charger,
    Shooter,
}

#[derive(Component, Debug, Clone)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub view_radius: f32,
    pub player_center: Vec2,
    /// Cleared by the collision pass when a platform blocks the line of sight.
    pub in_sight: bool,
    /// Axis-aligned box spanning this enemy's centre and the player's.
    pub line_of_sight: IRect,
}

impl Enemy {
    pub fn new(kind: EnemyKind, view_radius: f32) -> Self {
        Self {
            kind,
            view_radius,
            player_center: Vec2::ZERO,
            in_sight: true,
            line_of_sight: IRect::default(),
        }
    }

    /// Record where the player is, as seen from `center`.
    pub fn sense(&mut self, player_center: Vec2, center: Vec2) {
        self.player_center = player_center + SENSE_BIAS;
        let min = self.player_center.min(center);
        let size = (self.player_center - center).abs();
        self.line_of_sight = xywh(min.x as i32, min.y as i32, size.x as i32, size.y as i32);
    }

    #[inline]
    pub fn in_radius(&self, center: Vec2) -> bool {
        self.player_center.distance(center) < self.view_radius
    }
}

/// Whether `wall` covers more than half of the line of sight's extent: the
/// overlap's share of the width plus its share of the height exceeds one.
/// Degenerate lines are never blocked.
pub fn line_of_sight_blocked(line_of_sight: IRect, wall: IRect) -> bool {
    let o = line_of_sight.intersect(wall);
    if o.width() <= 0 || o.height() <= 0 {
        return false;
    }
    let w = o.width() as f32 / line_of_sight.width() as f32;
    let h = o.height() as f32 / line_of_sight.height() as f32;
    w + h > 1.0
}

/// Charger brain.
pub fn charge(c: &mut Character, enemy: &Enemy, fx: &mut Effects) {
    let center = c.body.center();
    if !enemy.in_radius(center) {
        return;
    }
    let to_player = enemy.player_center - center;

    if to_player.x < 0.0 {
        c.move_left();
    } else if to_player.x > 0.0 {
        c.move_right();
    }

    if to_player.y < -(c.body.height() as f32) * CHARGER_JUMP_TRIGGER {
        c.jump_strength = (-to_player.y / 100.0).min(CHARGER_MAX_JUMP);
        c.jump(fx);
    }
}

/// Shooter brain.
pub fn keep_range(c: &mut Character, enemy: &Enemy, loadout: &mut Loadout, fx: &mut Effects) {
    let center = c.body.center();
    if !(enemy.in_radius(center) && enemy.in_sight) {
        return;
    }
    let to_player = enemy.player_center - center;
    let distance = to_player.length();

    if distance < enemy.view_radius * RETREAT_BELOW {
        c.jump(fx);
        if c.state == CharacterState::Jump {
            step(c, -to_player.x);
        }
    } else if distance > enemy.view_radius * ADVANCE_ABOVE {
        c.jump(fx);
        if c.state == CharacterState::Jump {
            step(c, to_player.x);
        }
    } else if c.state != CharacterState::Jump {
        let gun = loadout.equipped_mut();
        gun.aim_at(enemy.player_center);
        let bullets = gun.fire();
        if !bullets.is_empty() {
            fx.sounds.push(Sound::Shot);
        }
        fx.bullets.extend(bullets);
        c.state = CharacterState::Shoot;
    }
}

fn step(c: &mut Character, dx: f32) {
    if dx < 0.0 {
        c.move_left();
    } else {
        c.move_right();
    }
}

fn enemy_character(position: IVec2, t: &Tunables, animator: Animator) -> Character {
    let body = Body::new(position, IVec2::splat(t.tile_size));
    let mut c = Character::new(body, t.enemy_health, animator);
    c.speed *= ENEMY_SPEED_FACTOR;
    c.invincibility_frames = ENEMY_IFRAMES;
    c
}

pub fn charger_bundle(position: IVec2, t: &Tunables) -> impl Bundle {
    (
        Name::new("Charger"),
        enemy_character(position, t, Animator::charger()),
        Enemy::new(EnemyKind::Charger, t.charger_view_radius),
        LevelEntity,
    )
}

pub fn shooter_bundle(position: IVec2, t: &Tunables) -> impl Bundle {
    let mut c = enemy_character(position, t, Animator::shooter());
    c.jump_strength /= 2.0;
    (
        Name::new("Shooter"),
        c,
        Enemy::new(EnemyKind::Shooter, t.shooter_view_radius),
        Loadout::single(Gun::enemy_pistol(t)),
        LevelEntity,
    )
}

pub fn plugin(app: &mut App) {
    app.add_systems(FixedUpdate, sense_player.in_set(SimSet::Sense))
        .add_systems(FixedUpdate, update_enemies.in_set(SimSet::Act));
}

/// Refresh every enemy's view of the player and cool shooters' guns down.
pub fn sense_player(
    player: Query<&Character, With<Player>>,
    mut enemies: Query<(&Character, &mut Enemy, Option<&mut Loadout>), Without<Player>>,
) {
    let Ok(player) = player.single() else {
        return;
    };
    let target = player.body.center();

    for (c, mut enemy, loadout) in &mut enemies {
        if !c.body.active {
            continue;
        }
        let center = c.body.center();
        enemy.sense(target, center);

        if let Some(mut loadout) = loadout {
            let gun = loadout.equipped_mut();
            gun.tick();
            gun.position = center;
        }
    }
}

pub fn update_enemies(
    tunables: Res<Tunables>,
    mut spawns: MessageWriter<SpawnBullet>,
    mut sounds: MessageWriter<SoundCue>,
    mut q: Query<(&mut Character, &Enemy, Option<&mut Loadout>), Without<Player>>,
) {
    let dt = tunables.frame_ms();

    for (mut c, enemy, mut loadout) in &mut q {
        if c.body.active && c.prev_health > c.health {
            let cue = if c.health <= 0 {
                Sound::EnemyDead
            } else {
                Sound::EnemyHurt
            };
            sounds.write(SoundCue(cue));
        }

        let mut fx = Effects::default();
        let brain = match (enemy.kind, loadout.as_deref_mut()) {
            (EnemyKind::Charger, _) => Brain::Charger(enemy),
            (EnemyKind::Shooter, Some(loadout)) => Brain::Shooter(enemy, loadout),
            (EnemyKind::Shooter, None) => {
                warn_once!("shooter without a loadout; it will not act");
                Brain::Inert
            }
        };
        c.tick(dt, brain, &mut fx);

        for bullet in fx.bullets {
            spawns.write(SpawnBullet {
                bullet,
                faction: Faction::Enemy,
            });
        }
        for sound in fx.sounds {
            sounds.write(SoundCue(sound));
        }
    }
}
