//! Rate-limited guns.
//!
//! A gun is a bullet prototype plus a firing pattern. `fire` clones the
//! prototype once per pellet and hands the clones back; it never spawns.

use std::f32::consts::PI;

use bevy::prelude::*;

use super::components::{Bullet, BulletTag};
use crate::common::body::xywh;
use crate::common::tunables::Tunables;
use crate::plugins::character::animation::FRAME_SIZE;

/// Bullets leave the holder this far along the aim.
const MUZZLE_OFFSET: f32 = 16.0;
const SHOTGUN_RECOIL: f32 = 0.8;

/// Key of the ammo table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GunName {
    Pistol,
    Shotgun,
    Rocket,
}

impl From<GunName> for BulletTag {
    fn from(name: GunName) -> Self {
        match name {
            GunName::Pistol => BulletTag::Pistol,
            GunName::Shotgun => BulletTag::Shotgun,
            GunName::Rocket => BulletTag::Rocket,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pattern {
    Single,
    /// `pellets` bullets fanned evenly over `arc` radians, centred on the aim.
    Spread { pellets: u32, arc: f32 },
}

#[derive(Clone, Debug)]
pub struct Gun {
    pub name: GunName,
    pub pattern: Pattern,
    pub fire_rate: i32,
    pub fire_timer: i32,
    pub template: Bullet,
    /// Unit firing direction.
    pub aim: Vec2,
    /// Holder centre, world space.
    pub position: Vec2,
    pub active: bool,
    recoil: Vec2,
}

impl Gun {
    pub fn new(name: GunName, pattern: Pattern, fire_rate: i32, template: Bullet) -> Self {
        Self {
            name,
            pattern,
            fire_rate,
            fire_timer: 0,
            template,
            aim: Vec2::X,
            position: Vec2::ZERO,
            active: true,
            recoil: Vec2::ZERO,
        }
    }

    pub fn pistol(t: &Tunables) -> Self {
        Self::new(GunName::Pistol, Pattern::Single, 20, small_round(t, 0))
    }

    /// Slower pistol for shooters.
    pub fn enemy_pistol(t: &Tunables) -> Self {
        Self::new(GunName::Pistol, Pattern::Single, 25, small_round(t, 0))
    }

    pub fn shotgun(t: &Tunables) -> Self {
        let pattern = Pattern::Spread {
            pellets: 5,
            arc: PI / 12.0,
        };
        Self::new(GunName::Shotgun, pattern, 15, small_round(t, 33))
    }

    pub fn rocket(t: &Tunables) -> Self {
        let size = IVec2::splat((t.tile_size as f32 * 0.8) as i32);
        let source = xywh(66, 33, FRAME_SIZE, FRAME_SIZE);
        let round = Bullet::new(size, t.bullet_speed, t.bullet_lifetime, source);
        Self::new(GunName::Rocket, Pattern::Single, 30, round)
    }

    #[inline]
    pub fn ready(&self) -> bool {
        self.fire_timer == 0
    }

    /// Velocity the holder takes from the last shot.
    #[inline]
    pub fn recoil(&self) -> Vec2 {
        -self.recoil
    }

    /// Count the cooldown down; called once per holder tick.
    pub fn tick(&mut self) {
        if self.active && self.fire_timer > 0 {
            self.fire_timer -= 1;
        }
    }

    /// Point at a world-space target. A target on the muzzle keeps the old aim.
    pub fn aim_at(&mut self, target: Vec2) {
        if let Some(dir) = (target - self.position).try_normalize() {
            self.aim = dir;
        }
    }

    /// Produce this shot's bullets, or nothing while cooling down.
    pub fn fire(&mut self) -> Vec<Bullet> {
        if !self.ready() {
            return Vec::new();
        }
        self.fire_timer = self.fire_rate;

        match self.pattern {
            Pattern::Single => {
                self.recoil = Vec2::ZERO;
                vec![self.load(self.aim)]
            }
            Pattern::Spread { pellets, arc } => {
                self.recoil = self.aim * SHOTGUN_RECOIL;
                let (start, step) = if pellets > 1 {
                    (arc / 2.0, arc / (pellets - 1) as f32)
                } else {
                    (0.0, 0.0)
                };
                (0..pellets)
                    .map(|i| {
                        let dir = Vec2::from_angle(start - step * i as f32).rotate(self.aim);
                        self.load(dir)
                    })
                    .collect()
            }
        }
    }

    fn load(&self, dir: Vec2) -> Bullet {
        let mut bullet = self.template.clone();
        let half = (bullet.body.hitbox().size() / 2).as_vec2();
        let origin = self.position - half + self.aim * MUZZLE_OFFSET;

        bullet.body.respawn_at(origin);
        bullet.body.velocity = dir * bullet.speed;
        bullet.body.rotation = dir.y.atan2(dir.x);
        bullet.tag = self.name.into();
        bullet
    }
}

fn small_round(t: &Tunables, source_x: i32) -> Bullet {
    let size = IVec2::splat(t.tile_size / 2);
    let source = xywh(source_x, 33, FRAME_SIZE, FRAME_SIZE);
    Bullet::new(size, t.bullet_speed, t.bullet_lifetime, source)
}
