//! Shared actor base: transform, motion and the two rectangles every actor carries.
//!
//! ```text
//!   position (f32) ──floor──▶ hitbox.min          (collision)
//!   position + bounds_offset ──floor──▶ bounds.min (drawing + screen culling)
//! ```
//!
//! Both rectangles are rewritten on every positional write, so nothing outside
//! this module can observe a stale box.

use bevy::prelude::*;

/// Where destroyed bodies are parked. Far enough left and up that the camera
/// never contains them.
pub const OFF_STAGE: Vec2 = Vec2::new(-100.0, -100.0);

/// Build an integer rectangle from its top-left corner and size.
#[inline]
pub fn xywh(x: i32, y: i32, w: i32, h: i32) -> IRect {
    IRect {
        min: IVec2::new(x, y),
        max: IVec2::new(x + w, y + h),
    }
}

/// Overlap of two rectangles, `None` when they only touch or are apart.
#[inline]
pub fn overlap(a: IRect, b: IRect) -> Option<IRect> {
    let o = a.intersect(b);
    (!o.is_empty()).then_some(o)
}

/// `inner` lies entirely inside `outer` (edges may touch).
#[inline]
pub fn contains(outer: IRect, inner: IRect) -> bool {
    outer.min.x <= inner.min.x
        && outer.min.y <= inner.min.y
        && inner.max.x <= outer.max.x
        && inner.max.y <= outer.max.y
}

/// Sign of `v`, with zero mapping to zero (unlike `f32::signum`).
#[inline]
pub fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    position: Vec2,
    pub prev_position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    hitbox: IRect,
    bounds: IRect,
    bounds_offset: Vec2,
    pub active: bool,
    pub colliding: bool,
    pub prev_colliding: bool,
    pub rotation: f32,
    spawn: Vec2,
}

impl Body {
    /// A body whose visual bounds equal its hitbox.
    pub fn new(position: IVec2, size: IVec2) -> Self {
        Self::with_draw_size(position, size, size)
    }

    /// A body whose visual bounds are `draw_size`, centred on the hitbox.
    pub fn with_draw_size(position: IVec2, size: IVec2, draw_size: IVec2) -> Self {
        let hitbox = xywh(position.x, position.y, size.x, size.y);
        let corner = position + size / 2 - draw_size / 2;
        let bounds = xywh(corner.x, corner.y, draw_size.x, draw_size.y);
        let origin = position.as_vec2();

        Self {
            position: origin,
            prev_position: origin,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            hitbox,
            bounds,
            bounds_offset: (bounds.min - hitbox.min).as_vec2(),
            active: true,
            colliding: false,
            prev_colliding: false,
            rotation: 0.0,
            spawn: origin,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.position.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.sync_rects();
    }

    pub fn set_x(&mut self, x: f32) {
        self.set_position(Vec2::new(x, self.position.y));
    }

    pub fn set_y(&mut self, y: f32) {
        self.set_position(Vec2::new(self.position.x, y));
    }

    #[inline]
    pub fn hitbox(&self) -> IRect {
        self.hitbox
    }

    #[inline]
    pub fn bounds(&self) -> IRect {
        self.bounds
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.hitbox.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.hitbox.height()
    }

    /// Hitbox centre, using integer halves of the size.
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.position + (self.hitbox.size() / 2).as_vec2()
    }

    #[inline]
    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    /// Move the spawn point and put the body there.
    pub fn respawn_at(&mut self, spawn: Vec2) {
        self.spawn = spawn;
        self.reset();
    }

    /// A zero-area hitbox never collides.
    #[inline]
    pub fn is_collidable(&self) -> bool {
        !self.hitbox.is_empty()
    }

    /// Overlap with `other` when both bodies are live and collidable.
    pub fn overlap(&self, other: &Body) -> Option<IRect> {
        if !(self.active && other.active && self.is_collidable() && other.is_collidable()) {
            return None;
        }
        overlap(self.hitbox, other.hitbox)
    }

    /// Deactivate and park off stage. Returns false if already inactive.
    pub fn destroy(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        self.set_position(OFF_STAGE);
        true
    }

    /// Back to the spawn point, at rest and active.
    pub fn reset(&mut self) {
        self.set_position(self.spawn);
        self.prev_position = self.spawn;
        self.velocity = Vec2::ZERO;
        self.acceleration = Vec2::ZERO;
        self.colliding = false;
        self.prev_colliding = false;
        self.active = true;
    }

    /// Absorb `other`'s hitbox into this one; `other` stops colliding.
    pub fn absorb_hitbox(&mut self, other: &mut Body) {
        self.hitbox = self.hitbox.union(other.hitbox);
        other.hitbox = IRect::default();
    }

    /// Shrink both rectangles symmetrically by `step` pixels, keeping the centre.
    pub fn shrink(&mut self, step: f32) {
        let half = step / 2.0;
        self.set_position(self.position + Vec2::splat(half));

        let cut = IVec2::splat(step as i32);
        self.hitbox.max = (self.hitbox.max - cut).max(self.hitbox.min);
        self.bounds.max = (self.bounds.max - cut).max(self.bounds.min);
    }

    fn sync_rects(&mut self) {
        let origin = self.position.floor().as_ivec2();
        let size = self.hitbox.size();
        self.hitbox = IRect {
            min: origin,
            max: origin + size,
        };

        let corner = (self.position + self.bounds_offset).floor().as_ivec2();
        let size = self.bounds.size();
        self.bounds = IRect {
            min: corner,
            max: corner + size,
        };
    }
}

/// Access to the embedded body of an actor component.
pub trait HasBody {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;
}
