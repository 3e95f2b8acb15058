//! Buffered spawn requests.
//!
//! Characters never spawn entities mid-tick. A firing character returns its new
//! bullets, the calling system turns them into messages, and
//! `allocator::spawn_bullets` is the single consumer that creates entities.

use bevy::prelude::*;

use super::components::{Bullet, Faction};

#[derive(Message, Clone, Debug)]
pub struct SpawnBullet {
    pub bullet: Bullet,
    pub faction: Faction,
}
