use bevy::prelude::*;

use crate::common::body::{overlap, xywh, Body, HasBody};
use crate::plugins::character::animation::FRAME_SIZE;

/// Explosion box relative to the rocket that spawned it.
pub const EXPLOSION_SCALE: f32 = 1.5;
pub const EXPLOSION_LIFETIME: i32 = 12;
/// Added to the shrink step after every explosion tick.
pub const EXPLOSION_SHRINK_GROWTH: f32 = 0.2;

/// Which gun a bullet came out of. Explosions are bullets too.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BulletTag {
    Pistol,
    Shotgun,
    Rocket,
    Explosion,
}

/// Side a bullet fights for; decides what the collision driver tests it against.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Faction {
    Player,
    Enemy,
}

#[derive(Component, Debug, Clone)]
pub struct Bullet {
    pub body: Body,
    /// Travel speed in pixels per tick. For explosions, the horizontal speed of
    /// the rocket, kept for knockback direction.
    pub speed: f32,
    pub tag: BulletTag,
    /// Ticks left before the bullet destroys itself.
    pub lifetime: i32,
    pub source: IRect,
    shrink_step: f32,
    /// Set when a rocket is destroyed; taken by the explosion collector.
    pub explosion: Option<Box<Bullet>>,
}

impl HasBody for Bullet {
    fn body(&self) -> &Body {
        &self.body
    }
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Bullet {
    pub fn new(size: IVec2, speed: f32, lifetime: i32, source: IRect) -> Self {
        Self {
            body: Body::new(IVec2::ZERO, size),
            speed,
            tag: BulletTag::Pistol,
            lifetime,
            source,
            shrink_step: 0.0,
            explosion: None,
        }
    }

    #[inline]
    pub fn is_explosion(&self) -> bool {
        self.tag == BulletTag::Explosion
    }

    #[inline]
    pub fn shrink_step(&self) -> f32 {
        self.shrink_step
    }

    /// Deactivate. Rockets leave their explosion behind for collection.
    pub fn destroy(&mut self) -> bool {
        if !self.body.active {
            return false;
        }
        if self.tag == BulletTag::Rocket && self.explosion.is_none() {
            self.explosion = Some(Box::new(self.explode()));
        }
        self.body.destroy()
    }

    fn explode(&self) -> Bullet {
        let size = (self.body.hitbox().size().as_vec2() * EXPLOSION_SCALE).as_ivec2();
        let corner = (self.body.center() - (size / 2).as_vec2()).floor().as_ivec2();
        let source = xywh(99, 33, FRAME_SIZE, FRAME_SIZE);

        let mut explosion = Bullet::new(size, self.body.velocity.x, EXPLOSION_LIFETIME, source);
        explosion.body.respawn_at(corner.as_vec2());
        explosion.tag = BulletTag::Explosion;
        explosion.shrink_step = size.x as f32 / (2 * EXPLOSION_LIFETIME) as f32;
        explosion
    }

    /// One tick of flight. Leaving `camera` deactivates without exploding.
    pub fn tick(&mut self, camera: IRect) {
        if !self.body.active {
            return;
        }

        let next = self.body.position() + self.body.velocity;
        self.body.set_position(next);

        if overlap(self.body.hitbox(), camera).is_none() {
            self.body.active = false;
            return;
        }

        if self.is_explosion() {
            self.body.shrink(self.shrink_step);
            self.shrink_step += EXPLOSION_SHRINK_GROWTH;
        }

        self.lifetime -= 1;
        if self.lifetime <= 0 {
            self.destroy();
        }
    }
}
