//! On/off-screen bookkeeping and quadrant buckets for one kind of level entity.
//!
//! ```text
//!   all ── activity test vs camera ──▶ body.active
//!        └ reconcile ─▶ on_screen / off_screen   (a partition of all)
//!                          └─▶ quadrants[0..4]    (on-screen only, viewport-local)
//! ```
//!
//! Quadrants are numbered `0` top-left, `1` top-right, `2` bottom-left,
//! `3` bottom-right. A point on a midline belongs to the left/top side.

use std::marker::PhantomData;

use bevy::prelude::*;

use crate::common::body::{contains, overlap};

/// New activity for something drawn at `bounds` given the camera rectangle.
/// `None` keeps the current flag: a body straddling the camera's right edge
/// doesn't change until it's fully in or out.
pub fn screen_activity(camera: IRect, bounds: IRect) -> Option<bool> {
    if contains(camera, bounds) {
        return Some(true);
    }
    match overlap(camera, bounds) {
        Some(o) if bounds.min.x < o.min.x => Some(true),
        Some(_) => None,
        None => Some(false),
    }
}

#[derive(Resource, Debug)]
pub struct ScreenIndex<M: Send + Sync + 'static> {
    all: Vec<Entity>,
    on_screen: Vec<Entity>,
    off_screen: Vec<Entity>,
    quadrants: [Vec<Entity>; 4],
    /// Quadrant boundaries, viewport-local.
    half: Vec2,
    _marker: PhantomData<M>,
}

impl<M: Send + Sync + 'static> ScreenIndex<M> {
    pub fn new(viewport: IVec2) -> Self {
        Self {
            all: Vec::new(),
            on_screen: Vec::new(),
            off_screen: Vec::new(),
            quadrants: Default::default(),
            half: (viewport / 2).as_vec2(),
            _marker: PhantomData,
        }
    }

    pub fn all(&self) -> &[Entity] {
        &self.all
    }

    pub fn on_screen(&self) -> &[Entity] {
        &self.on_screen
    }

    pub fn off_screen(&self) -> &[Entity] {
        &self.off_screen
    }

    pub fn quadrant(&self, q: usize) -> &[Entity] {
        &self.quadrants[q]
    }

    pub fn insert(&mut self, entity: Entity, active: bool) {
        self.all.push(entity);
        if active {
            self.on_screen.push(entity);
        } else {
            self.off_screen.push(entity);
        }
    }

    pub fn clear(&mut self) {
        self.all.clear();
        self.on_screen.clear();
        self.off_screen.clear();
        self.quadrants.iter_mut().for_each(Vec::clear);
    }

    /// Move entities whose activity flipped to the other list. Order within
    /// each list is kept; migrants go to the back.
    pub fn reconcile(&mut self, is_active: impl Fn(Entity) -> bool) {
        let (stay_on, going_off): (Vec<_>, Vec<_>) =
            self.on_screen.drain(..).partition(|&e| is_active(e));
        let (coming_on, stay_off): (Vec<_>, Vec<_>) =
            self.off_screen.drain(..).partition(|&e| is_active(e));

        self.on_screen = stay_on;
        self.on_screen.extend(coming_on);
        self.off_screen = stay_off;
        self.off_screen.extend(going_off);
    }

    /// Rebuild both lists from scratch.
    pub fn resort(&mut self, is_active: impl Fn(Entity) -> bool) {
        let (on, off): (Vec<_>, Vec<_>) = self.all.iter().copied().partition(|&e| is_active(e));
        self.on_screen = on;
        self.off_screen = off;
    }

    pub fn quadrant_of(&self, local: Vec2) -> usize {
        let right = local.x > self.half.x;
        let bottom = local.y > self.half.y;
        (bottom as usize) * 2 + right as usize
    }

    /// Re-bucket every on-screen entity. Entities without a position are skipped.
    pub fn rebuild_quadrants(&mut self, local_position: impl Fn(Entity) -> Option<Vec2>) {
        self.quadrants.iter_mut().for_each(Vec::clear);
        for i in 0..self.on_screen.len() {
            let e = self.on_screen[i];
            if let Some(p) = local_position(e) {
                let q = self.quadrant_of(p);
                self.quadrants[q].push(e);
            }
        }
    }

    /// Put one extra entity (the player) into the bucket holding `local`.
    pub fn place(&mut self, entity: Entity, local: Vec2) -> usize {
        let q = self.quadrant_of(local);
        self.quadrants[q].push(entity);
        q
    }
}
