//! Spawn consumer: turn queued shots into bullet entities.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use super::messages::SpawnBullet;
use crate::plugins::world::LevelEntity;

pub fn spawn_bullets(mut commands: Commands, mut reader: MessageReader<SpawnBullet>) {
    for req in reader.read() {
        commands.spawn((
            Name::new("Bullet"),
            req.bullet.clone(),
            req.faction,
            LevelEntity,
        ));
    }
}
