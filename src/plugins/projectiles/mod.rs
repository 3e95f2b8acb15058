//! Projectiles plugin: guns, bullets and rocket explosions.
//!
//! # Data flow
//! ```text
//!  Act set (character ticks)
//!  ┌──────────────────────────────────────────────────────────────┐
//!  │ Gun::fire ─▶ Vec<Bullet> in Effects ─▶ SpawnBullet messages  │
//!  └──────────────────────────────────────────────────────────────┘
//!                  │
//!                  v
//!  Projectiles set (chained)
//!  ┌──────────────────────────────────────────────────────────────┐
//!  │ (A) allocator::spawn_bullets   SpawnBullet ─▶ entities       │
//!  │ (B) fly_bullets                move, cull, age, shrink       │
//!  │ (C) commit::sweep_bullets      explosions in, dead out       │
//!  └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Collision with platforms/characters happens in the physics driver at the
//! top of the next tick, which only flags bullets inactive. (C) is the only
//! structural change to bullets.

pub mod allocator;
pub mod commit;
pub mod components;
pub mod gun;
pub mod messages;

use bevy::prelude::*;

use crate::plugins::camera::Viewport;
use crate::plugins::SimSet;
use components::Bullet;

pub struct ProjectilesPlugin;

impl Plugin for ProjectilesPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<messages::SpawnBullet>();

        app.add_systems(
            FixedUpdate,
            (allocator::spawn_bullets, fly_bullets, commit::sweep_bullets)
                .chain()
                .in_set(SimSet::Projectiles),
        );
    }
}

pub fn fly_bullets(viewport: Res<Viewport>, mut q: Query<&mut Bullet>) {
    let camera = viewport.bounds();
    for mut bullet in &mut q {
        bullet.tick(camera);
    }
}
