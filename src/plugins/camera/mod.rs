//! Camera plugin: the logical viewport the simulation culls and aims against.
//!
//! There is no render camera here. [`Viewport`] is a plain resource holding the
//! world-space top-left corner of the visible window; the spatial indexes,
//! bullets and draw list all read it instead of a global.
//!
//! ```text
//! Cull set: follow_player centres on the player, then clamps to level bounds
//! ```

use bevy::prelude::*;

use crate::common::body::xywh;
use crate::plugins::SimSet;
use crate::plugins::character::Character;
use crate::plugins::player::Player;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Viewport {
    size: IVec2,
    origin: Vec2,
    /// World-space extent of the current level. Empty until a level loads.
    pub level_bounds: IRect,
}

impl Viewport {
    pub fn new(size: IVec2) -> Self {
        Self {
            size,
            origin: Vec2::ZERO,
            level_bounds: IRect::default(),
        }
    }

    #[inline]
    pub fn size(&self) -> IVec2 {
        self.size
    }

    #[inline]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Visible world rectangle.
    pub fn bounds(&self) -> IRect {
        xywh(self.origin.x as i32, self.origin.y as i32, self.size.x, self.size.y)
    }

    #[inline]
    pub fn to_local(&self, world: Vec2) -> Vec2 {
        world - self.origin
    }

    #[inline]
    pub fn to_world(&self, local: Vec2) -> Vec2 {
        local + self.origin
    }

    /// Centre on `focus`, then clamp to the level. When the level is narrower
    /// than the viewport the right edge wins.
    pub fn follow(&mut self, focus: Vec2) {
        self.origin = focus - (self.size / 2).as_vec2();

        if self.level_bounds.is_empty() {
            return;
        }
        let lb = self.level_bounds;
        if self.origin.x < lb.min.x as f32 {
            self.origin.x = lb.min.x as f32;
        }
        if self.origin.x + self.size.x as f32 > lb.max.x as f32 {
            self.origin.x = (lb.max.x - self.size.x) as f32;
        }
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(FixedUpdate, follow_player.in_set(SimSet::Cull));
}

/// Horizontal follow only; the vertical origin stays at the top of the level.
pub fn follow_player(
    mut viewport: ResMut<Viewport>,
    q_player: Query<&Character, With<Player>>,
) {
    let Ok(player) = q_player.single() else {
        return;
    };
    let focus = Vec2::new(player.body.center().x, (viewport.size().y / 2) as f32);
    viewport.follow(focus);
}
