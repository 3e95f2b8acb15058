//! Bullet sweep: collect explosions, then drop dead bullets.
//!
//! Resolvers only ever flip `active` off. This is the one place bullet entities
//! leave the world, after the collision pass and flight step are done with
//! them. A rocket destroyed this tick hands its explosion over here, and the
//! explosion becomes a bullet of the same faction before the rocket goes.

use bevy::prelude::*;

use super::components::{Bullet, Faction};
use crate::plugins::presentation::{Sound, SoundCue};
use crate::plugins::world::LevelEntity;

pub fn sweep_bullets(
    mut commands: Commands,
    mut sounds: MessageWriter<SoundCue>,
    mut q: Query<(Entity, &mut Bullet, &Faction)>,
) {
    for (e, mut bullet, faction) in &mut q {
        if let Some(explosion) = bullet.explosion.take() {
            sounds.write(SoundCue(Sound::Explosion));
            commands.spawn((Name::new("Explosion"), *explosion, *faction, LevelEntity));
        }
        if !bullet.body.active {
            commands.entity(e).despawn();
        }
    }
}
