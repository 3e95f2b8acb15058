//! Physics plugin: rectangle collision between level actors.
//!
//! ---------------------------
//! ONE COLLISION PASS
//! ---------------------------
//! ```text
//!  shooters: in_sight = true      triggers: colliding = false
//!  for each platform:
//!      player ↔ platform
//!      each enemy ↔ platform      (+ shooter line-of-sight test)
//!      each bullet ↔ platform
//!      each collectible ↔ platform
//!  each collectible ↔ player       (pickup cue)
//!  for each enemy:
//!      player ↔ enemy
//!      each player bullet ↔ enemy
//!  each enemy bullet ↔ player
//!  each trigger ↔ player
//! ```
//!
//! Resolvers only flip `active` and move bodies; nothing is spawned or
//! despawned here. Rocket explosions and dead bullets are handled later by the
//! projectile sweep.

pub mod resolve;

use bevy::prelude::*;

use crate::common::body::Body;
use crate::plugins::SimSet;
use crate::plugins::character::Character;
use crate::plugins::enemies::{Enemy, EnemyKind, line_of_sight_blocked};
use crate::plugins::player::{Loadout, Player};
use crate::plugins::presentation::{Sound, SoundCue};
use crate::plugins::projectiles::components::{Bullet, Faction};
use crate::plugins::world::{Collectible, Platform, Trigger};

pub use resolve::{
    BULLET_RESOLVERS, COLLECTIBLE_RESOLVERS, ENEMY_RESOLVERS, PLAYER_RESOLVERS, Resolver,
};

/// One side of a collision, borrowed from its component.
pub enum Role<'a> {
    Player {
        character: &'a mut Character,
        loadout: &'a mut Loadout,
    },
    Enemy(&'a mut Character),
    Platform(&'a mut Platform),
    Bullet(&'a mut Bullet),
    Collectible(&'a mut Collectible),
    Trigger(&'a mut Trigger),
}

impl<'a> Role<'a> {
    pub fn player(character: &'a mut Character, loadout: &'a mut Loadout) -> Self {
        Self::Player { character, loadout }
    }

    pub fn body(&self) -> &Body {
        match self {
            Role::Player { character, .. } => &character.body,
            Role::Enemy(c) => &c.body,
            Role::Platform(p) => &p.body,
            Role::Bullet(b) => &b.body,
            Role::Collectible(c) => &c.body,
            Role::Trigger(t) => &t.body,
        }
    }

    pub fn body_mut(&mut self) -> &mut Body {
        match self {
            Role::Player { character, .. } => &mut character.body,
            Role::Enemy(c) => &mut c.body,
            Role::Platform(p) => &mut p.body,
            Role::Bullet(b) => &mut b.body,
            Role::Collectible(c) => &mut c.body,
            Role::Trigger(t) => &mut t.body,
        }
    }

    #[inline]
    pub fn is_trigger(&self) -> bool {
        matches!(self, Role::Trigger(_))
    }
}

/// Test `sender` against `other` and run every resolver on a hit.
///
/// Both sides are marked colliding, except that touching a trigger doesn't
/// count as contact for the sender.
pub fn check_collision(sender: &mut Role<'_>, other: &mut Role<'_>, resolvers: &[Resolver]) -> bool {
    let Some(overlap) = sender.body().overlap(other.body()) else {
        return false;
    };

    other.body_mut().colliding = true;
    if !other.is_trigger() {
        sender.body_mut().colliding = true;
    }
    for resolve in resolvers {
        resolve(sender, other, overlap);
    }
    true
}

pub fn plugin(app: &mut App) {
    app.add_systems(FixedUpdate, check_collisions.in_set(SimSet::Collide));
}

#[allow(clippy::too_many_arguments)]
pub fn check_collisions(
    mut players: Query<(&mut Character, &mut Loadout), With<Player>>,
    mut enemies: Query<(&mut Character, &mut Enemy), Without<Player>>,
    mut platforms: Query<&mut Platform>,
    mut bullets: Query<(&mut Bullet, &Faction)>,
    mut collectibles: Query<&mut Collectible>,
    mut triggers: Query<&mut Trigger>,
    mut sounds: MessageWriter<SoundCue>,
) {
    let mut player = players
        .single_mut()
        .ok()
        .map(|(c, l)| (c.into_inner(), l.into_inner()));

    for (_, mut enemy) in &mut enemies {
        enemy.in_sight = true;
    }
    for mut trigger in &mut triggers {
        trigger.body.colliding = false;
    }

    for mut platform in &mut platforms {
        if !platform.body.active {
            continue;
        }

        if let Some((pc, pl)) = player.as_mut() {
            check_collision(
                &mut Role::player(pc, pl),
                &mut Role::Platform(&mut platform),
                PLAYER_RESOLVERS,
            );
        }

        for (mut c, mut enemy) in &mut enemies {
            check_collision(
                &mut Role::Enemy(&mut c),
                &mut Role::Platform(&mut platform),
                ENEMY_RESOLVERS,
            );
            if enemy.kind == EnemyKind::Shooter
                && c.body.active
                && !platform.is_one_way()
                && line_of_sight_blocked(enemy.line_of_sight, platform.body.hitbox())
            {
                enemy.in_sight = false;
            }
        }

        for (mut bullet, _) in &mut bullets {
            check_collision(
                &mut Role::Bullet(&mut bullet),
                &mut Role::Platform(&mut platform),
                BULLET_RESOLVERS,
            );
        }

        for mut item in &mut collectibles {
            check_collision(
                &mut Role::Collectible(&mut item),
                &mut Role::Platform(&mut platform),
                COLLECTIBLE_RESOLVERS,
            );
        }
    }

    let Some((pc, pl)) = player.as_mut() else {
        return;
    };

    for mut item in &mut collectibles {
        let before = item.collected;
        check_collision(
            &mut Role::player(pc, pl),
            &mut Role::Collectible(&mut item),
            PLAYER_RESOLVERS,
        );
        if !before && item.collected {
            debug!(kind = ?item.kind, "picked up");
            sounds.write(SoundCue(Sound::Pickup));
        }
    }

    for (mut c, _) in &mut enemies {
        check_collision(
            &mut Role::player(pc, pl),
            &mut Role::Enemy(&mut c),
            PLAYER_RESOLVERS,
        );
        for (mut bullet, faction) in &mut bullets {
            if *faction != Faction::Player {
                continue;
            }
            check_collision(
                &mut Role::Bullet(&mut bullet),
                &mut Role::Enemy(&mut c),
                BULLET_RESOLVERS,
            );
        }
    }

    for (mut bullet, faction) in &mut bullets {
        if *faction != Faction::Enemy {
            continue;
        }
        check_collision(
            &mut Role::Bullet(&mut bullet),
            &mut Role::player(pc, pl),
            BULLET_RESOLVERS,
        );
    }

    for mut trigger in &mut triggers {
        check_collision(
            &mut Role::player(pc, pl),
            &mut Role::Trigger(&mut trigger),
            PLAYER_RESOLVERS,
        );
    }
}
