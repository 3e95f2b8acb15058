//! Sprite-cycle bookkeeping for characters.
//!
//! Clips live in a sheet of 32 px frames separated by a 1 px gutter, one clip
//! per row. Advancing a clip only moves its source rectangle; what the clip
//! means for the character's state is decided by `Character::animate`.

use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::common::body::xywh;

pub const FRAME_SIZE: i32 = 32;
/// Distance between the left edges of neighbouring frames.
pub const FRAME_STRIDE: i32 = FRAME_SIZE + 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Clip {
    Static,
    Idle,
    Walk,
    Slam,
    Jump,
    Land,
    Damage,
    Shoot,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    pub source: IRect,
    pub frame_count: i32,
    pub current_frame: i32,
    pub cycles_per_frame: i32,
    pub interruptible: bool,
}

impl Animation {
    /// A clip starting at the left of sheet row `row_y`.
    pub fn new(row_y: i32, frame_count: i32, cycles_per_frame: i32, interruptible: bool) -> Self {
        Self {
            source: xywh(0, row_y, FRAME_SIZE, FRAME_SIZE),
            frame_count,
            current_frame: 0,
            cycles_per_frame: cycles_per_frame.max(1),
            interruptible,
        }
    }

    #[inline]
    pub fn finished(&self) -> bool {
        self.current_frame >= self.frame_count
    }

    fn rewind(&mut self) {
        self.current_frame = 0;
        self.source.max.x = self.source.width();
        self.source.min.x = 0;
    }

    fn show_current_frame(&mut self) {
        let w = self.source.width();
        self.source.min.x = self.current_frame * FRAME_STRIDE;
        self.source.max.x = self.source.min.x + w;
    }
}

#[derive(Clone, Debug)]
pub struct Animator {
    clips: HashMap<Clip, Animation>,
    current: Clip,
    /// Ticks since the current clip (re)started.
    pub cycle_count: i32,
}

impl Animator {
    /// An animator holding only the single-frame static clip.
    pub fn new(static_source: IRect) -> Self {
        let mut clips = HashMap::default();
        clips.insert(
            Clip::Static,
            Animation {
                source: static_source,
                frame_count: 1,
                current_frame: 0,
                cycles_per_frame: 1,
                interruptible: true,
            },
        );
        Self {
            clips,
            current: Clip::Static,
            cycle_count: 0,
        }
    }

    pub fn with_clip(mut self, clip: Clip, animation: Animation) -> Self {
        self.clips.insert(clip, animation);
        self
    }

    /// Clip set for the player sheet.
    pub fn player() -> Self {
        Self::new(xywh(0, 0, FRAME_SIZE, FRAME_SIZE))
            .with_clip(Clip::Idle, Animation::new(0, 1, 1, true))
            .with_clip(Clip::Walk, Animation::new(33, 10, 4, true))
            .with_clip(Clip::Jump, Animation::new(66, 2, 1, true))
            .with_clip(Clip::Land, Animation::new(99, 2, 5, false))
            .with_clip(Clip::Slam, Animation::new(132, 1, 10, false))
            .with_clip(Clip::Damage, Animation::new(165, 1, 15, false))
            .with_clip(Clip::Shoot, Animation::new(198, 6, 3, false))
    }

    pub fn charger() -> Self {
        Self::new(xywh(0, 0, FRAME_SIZE, FRAME_SIZE))
            .with_clip(Clip::Idle, Animation::new(0, 1, 1, true))
            .with_clip(Clip::Walk, Animation::new(33, 10, 4, true))
            .with_clip(Clip::Jump, Animation::new(66, 2, 1, true))
    }

    /// Shooters reuse their walk cycle while airborne.
    pub fn shooter() -> Self {
        Self::new(xywh(0, 0, FRAME_SIZE, FRAME_SIZE))
            .with_clip(Clip::Idle, Animation::new(0, 1, 1, true))
            .with_clip(Clip::Jump, Animation::new(33, 10, 4, true))
            .with_clip(Clip::Shoot, Animation::new(66, 6, 3, false))
    }

    #[inline]
    pub fn current(&self) -> Clip {
        self.current
    }

    pub fn current_animation(&self) -> Option<&Animation> {
        self.clips.get(&self.current)
    }

    #[inline]
    pub fn has(&self, clip: Clip) -> bool {
        self.clips.contains_key(&clip)
    }

    /// Source rectangle of the frame being shown.
    pub fn source(&self) -> IRect {
        self.current_animation().map(|a| a.source).unwrap_or_default()
    }

    pub fn cycles_per_frame(&self) -> i32 {
        self.current_animation().map_or(1, |a| a.cycles_per_frame)
    }

    pub fn is_interruptible(&self) -> bool {
        self.current_animation().is_none_or(|a| a.interruptible)
    }

    /// Advance `clip` by one frame without wrapping. Returns true when the clip
    /// has run past its last frame; the clip is rewound and the cycle counter
    /// cleared in that case. Unknown clips are ignored.
    pub fn play(&mut self, clip: Clip) -> bool {
        let Some(animation) = self.clips.get_mut(&clip) else {
            return false;
        };
        self.current = clip;
        animation.current_frame += 1;

        if animation.finished() {
            animation.rewind();
            self.cycle_count = 0;
            return true;
        }
        animation.show_current_frame();
        false
    }

    /// Advance `clip` by one frame, wrapping back to the first frame.
    pub fn cycle(&mut self, clip: Clip) {
        let Some(animation) = self.clips.get_mut(&clip) else {
            return;
        };
        self.current = clip;
        animation.current_frame += 1;

        if animation.finished() {
            animation.rewind();
            self.cycle_count = 0;
        }
        animation.show_current_frame();
    }

    /// Rewind every clip and return to the static frame.
    pub fn reset(&mut self) {
        for animation in self.clips.values_mut() {
            animation.rewind();
        }
        self.current = Clip::Static;
        self.cycle_count = 0;
    }
}
