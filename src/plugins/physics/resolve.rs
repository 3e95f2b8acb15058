//! Per-pair collision policies.
//!
//! Every resolver receives both parties and their overlap, checks that the
//! roles are the pair it handles and does nothing otherwise. Registration is a
//! static slice per sender role; `check_collision` runs the slice in order.
//!
//! Push-out uses the minimum-translation axis: an overlap no wider than it is
//! tall resolves along X, anything else along Y. Vertical corrections leave a
//! one pixel contact so the mover still reads as grounded next tick.

use bevy::prelude::*;

use super::Role;
use crate::common::body::sign;
use crate::plugins::character::{Character, CharacterState};
use crate::plugins::projectiles::components::BulletTag;
use crate::plugins::projectiles::gun::GunName;
use crate::plugins::world::CollectibleKind;

pub type Resolver = fn(&mut Role<'_>, &mut Role<'_>, IRect);

pub const PLAYER_RESOLVERS: &[Resolver] = &[
    character_platform,
    player_enemy,
    player_collectible,
    player_trigger,
];
pub const ENEMY_RESOLVERS: &[Resolver] = &[character_platform];
pub const BULLET_RESOLVERS: &[Resolver] = &[bullet_platform, bullet_enemy, bullet_player];
pub const COLLECTIBLE_RESOLVERS: &[Resolver] = &[collectible_platform];

const SLAM_BOUNCE: Vec2 = Vec2::new(0.0, -0.5);
const CONTACT_LIFT: f32 = -0.5;
const CONTACT_KNOCKBACK: f32 = 5.0;
const BULLET_KNOCKBACK: f32 = 10.0;
const BULLET_NUDGE: f32 = 0.5;
const EXPLOSION_DAMAGE: i32 = 3;

#[inline]
pub fn resolves_horizontally(overlap: IRect) -> bool {
    overlap.width() <= overlap.height()
}

/// `rect` starts right of `other`'s horizontal centre.
#[inline]
pub fn right_of_center(rect: IRect, other: IRect) -> bool {
    rect.min.x > other.min.x + other.width() / 2
}

/// `rect` starts below `other`'s vertical centre.
#[inline]
pub fn below_center(rect: IRect, other: IRect) -> bool {
    rect.min.y > other.min.y + other.height() / 2
}

/// `rect` starts above `other`'s vertical centre.
#[inline]
pub fn above_center(rect: IRect, other: IRect) -> bool {
    rect.min.y < other.min.y + other.height() / 2
}

fn character_of<'r>(role: &'r mut Role<'_>) -> Option<&'r mut Character> {
    match role {
        Role::Player { character, .. } => Some(&mut **character),
        Role::Enemy(character) => Some(&mut **character),
        _ => None,
    }
}

pub fn character_platform(sender: &mut Role<'_>, other: &mut Role<'_>, overlap: IRect) {
    let Some(c) = character_of(sender) else {
        return;
    };
    let Role::Platform(platform) = other else {
        return;
    };

    c.body.acceleration = Vec2::ZERO;

    if platform.is_lava() && !c.god_mode {
        c.body.destroy();
        return;
    }

    let mut rect = c.body.hitbox();
    let solid = platform.body.hitbox();

    if platform.is_one_way() {
        if c.state == CharacterState::FallThrough || c.god_mode {
            return;
        }
        // Only a landing from above: the feet must be in the top third.
        if !resolves_horizontally(overlap)
            && rect.max.y < solid.min.y + solid.height() / 3
            && c.body.velocity.y > 0.0
        {
            rect.min.y -= overlap.height() - 1;
            c.body.velocity.y = 0.0;
        }
    } else if resolves_horizontally(overlap) {
        rect.min.x += if right_of_center(rect, solid) {
            overlap.width()
        } else {
            -overlap.width()
        };
    } else if below_center(rect, solid) {
        rect.min.y += overlap.height() + 1;
        c.body.velocity.y = c.body.velocity.y.max(0.0);
    } else {
        c.body.velocity.y = 0.0;
        if c.state == CharacterState::Slam || above_center(rect, solid) {
            rect.min.y -= overlap.height() - 1;
        }
    }

    c.body.set_position(rect.min.as_vec2());
}

pub fn collectible_platform(sender: &mut Role<'_>, other: &mut Role<'_>, overlap: IRect) {
    let Role::Collectible(item) = sender else {
        return;
    };
    let Role::Platform(platform) = other else {
        return;
    };

    let mut rect = item.body.hitbox();
    let solid = platform.body.hitbox();

    if resolves_horizontally(overlap) {
        item.body.velocity.x = 0.0;
        rect.min.x += if right_of_center(rect, solid) {
            overlap.width()
        } else {
            -overlap.width()
        };
    } else {
        item.body.velocity.y = 0.0;
        rect.min.y += if below_center(rect, solid) {
            overlap.height() + 1
        } else {
            -(overlap.height() - 1)
        };
    }

    item.body.set_position(rect.min.as_vec2());
}

/// Contact damage one way or the other, then both bodies are pushed apart.
pub fn player_enemy(sender: &mut Role<'_>, other: &mut Role<'_>, overlap: IRect) {
    let Role::Player { character: p, .. } = sender else {
        return;
    };
    let Role::Enemy(e) = other else {
        return;
    };
    let slamming = p.state == CharacterState::Slam;
    if p.god_mode || (p.invincible() && !slamming) {
        return;
    }

    let recoil = if slamming {
        e.take_damage(1);
        SLAM_BOUNCE
    } else {
        p.take_damage(1);
        Vec2::new(e.body.velocity.x * CONTACT_KNOCKBACK, CONTACT_LIFT)
    };

    let (pr, er) = (p.body.hitbox(), e.body.hitbox());
    let (mut pp, mut ep) = (pr.min, er.min);

    if resolves_horizontally(overlap) {
        p.body.velocity.x = 0.0;
        e.body.velocity.x = 0.0;
        let dx = if right_of_center(pr, er) {
            overlap.width()
        } else {
            -overlap.width()
        };
        pp.x += dx;
        ep.x -= dx;
    } else {
        p.body.velocity.y = 0.0;
        e.body.velocity.y = 0.0;
        let dy = if below_center(pr, er) {
            overlap.height()
        } else {
            -overlap.height()
        };
        pp.y += dy;
        ep.y -= dy;
    }

    p.body.velocity = recoil;
    p.body.set_position(pp.as_vec2());
    e.body.set_position(ep.as_vec2());
}

/// A pickup the player can't use stays in the level.
pub fn player_collectible(sender: &mut Role<'_>, other: &mut Role<'_>, _overlap: IRect) {
    let Role::Player { character: p, loadout } = sender else {
        return;
    };
    let Role::Collectible(item) = other else {
        return;
    };
    if item.collected {
        return;
    }

    match item.kind {
        CollectibleKind::Health => {
            if p.health >= p.max_health {
                return;
            }
            p.health += 1;
        }
        CollectibleKind::ShotgunAmmo => *loadout.ammo_mut(GunName::Shotgun) += 1,
        CollectibleKind::RocketAmmo => *loadout.ammo_mut(GunName::Rocket) += 1,
        CollectibleKind::ClearDoor => {}
    }
    item.collect();
}

pub fn player_trigger(sender: &mut Role<'_>, other: &mut Role<'_>, _overlap: IRect) {
    let (Role::Player { .. }, Role::Trigger(trigger)) = (sender, other) else {
        return;
    };
    trigger.body.colliding = true;
}

pub fn bullet_platform(sender: &mut Role<'_>, other: &mut Role<'_>, _overlap: IRect) {
    let Role::Bullet(bullet) = sender else {
        return;
    };
    let Role::Platform(platform) = other else {
        return;
    };

    if bullet.is_explosion() {
        if platform.is_destructible() {
            platform.body.destroy();
        }
    } else if !platform.is_one_way() {
        bullet.destroy();
    }
}

/// Rockets deal no impact damage; their explosion does.
pub fn bullet_enemy(sender: &mut Role<'_>, other: &mut Role<'_>, _overlap: IRect) {
    let Role::Bullet(bullet) = sender else {
        return;
    };
    let Role::Enemy(e) = other else {
        return;
    };

    let explosion = bullet.is_explosion();
    if !explosion {
        bullet.destroy();
    }
    if bullet.tag == BulletTag::Rocket {
        return;
    }

    e.take_damage(if explosion { EXPLOSION_DAMAGE } else { 1 });
    let lifted = e.body.y() - 1.0;
    e.body.set_y(lifted);

    let v = bullet.body.velocity;
    e.body.velocity = if explosion {
        Vec2::new(sign(bullet.speed), 1.0)
    } else {
        Vec2::new(sign(v.x), sign(v.y)) * BULLET_NUDGE
    };
}

pub fn bullet_player(sender: &mut Role<'_>, other: &mut Role<'_>, _overlap: IRect) {
    let Role::Bullet(bullet) = sender else {
        return;
    };
    let Role::Player { character: p, .. } = other else {
        return;
    };

    if !bullet.is_explosion() {
        bullet.destroy();
    }
    if !p.invincible() {
        p.body.velocity.x = sign(bullet.body.velocity.x) * BULLET_KNOCKBACK;
        p.take_damage(1);
    }
}
