//! Per-frame input snapshot and edge detection.
//!
//! The host (or `player::sample_input` when Bevy's input plugin is present)
//! writes an [`InputSnapshot`] once per frame. The player system pairs it with
//! the snapshot it consumed last tick to get an [`InputFrame`], which answers
//! both "is it held" and "was it pressed this tick".

use bevy::platform::collections::HashSet;
use bevy::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    Left,
    Right,
    Jump,
    Down,
    Shoot,
    CycleGun,
    GodMode,
    /// Direct gun selection, zero-based.
    Slot(u8),
}

#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    pub held: HashSet<Control>,
    /// Pointer in viewport-local pixels.
    pub pointer: Vec2,
    /// Accumulated wheel position; only its change between frames matters.
    pub scroll: f32,
}

impl InputSnapshot {
    pub fn with(controls: impl IntoIterator<Item = Control>) -> Self {
        Self {
            held: controls.into_iter().collect(),
            ..default()
        }
    }

    #[inline]
    pub fn is_held(&self, control: Control) -> bool {
        self.held.contains(&control)
    }
}

/// Current and previous snapshot, borrowed for one tick.
#[derive(Clone, Copy, Debug)]
pub struct InputFrame<'a> {
    pub current: &'a InputSnapshot,
    pub previous: &'a InputSnapshot,
}

impl<'a> InputFrame<'a> {
    pub fn new(current: &'a InputSnapshot, previous: &'a InputSnapshot) -> Self {
        Self { current, previous }
    }

    #[inline]
    pub fn down(&self, control: Control) -> bool {
        self.current.is_held(control)
    }

    /// Held now but not last frame.
    #[inline]
    pub fn pressed(&self, control: Control) -> bool {
        self.current.is_held(control) && !self.previous.is_held(control)
    }

    #[inline]
    pub fn scroll_delta(&self) -> f32 {
        self.current.scroll - self.previous.scroll
    }
}
