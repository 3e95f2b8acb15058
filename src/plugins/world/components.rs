use bevy::prelude::*;

use crate::common::body::{Body, HasBody, xywh};
use crate::common::tunables::Tunables;
use crate::plugins::character::animation::{FRAME_SIZE, FRAME_STRIDE};

/// Everything spawned from a level; despawned when the next level loads.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct LevelEntity;

/// Platforms are one pixel larger than a tile so neighbours always overlap.
pub const PLATFORM_OVERHANG: i32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Surface {
    Regular,
    Destructible,
    OneWay,
    Lava,
}

/// Horizontal piece of a platform run, for sprite selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    Left,
    Mid,
    Right,
}

/// Vertical piece of a platform stack, for sprite selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tier {
    Float,
    Top,
    Mid,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlatformKind {
    pub surface: Surface,
    pub segment: Segment,
    pub tier: Tier,
}

impl PlatformKind {
    /// Number of distinct platform kinds in level data.
    pub const COUNT: i32 = 22;

    /// Decode a zero-based platform index: nine regular, nine destructible,
    /// three one-way, then lava.
    pub fn from_index(index: i32) -> Option<Self> {
        const SEGMENTS: [Segment; 3] = [Segment::Left, Segment::Mid, Segment::Right];
        const TIERS: [Tier; 3] = [Tier::Float, Tier::Top, Tier::Mid];

        let kind = |surface, i: i32| Self {
            surface,
            segment: SEGMENTS[(i % 3) as usize],
            tier: TIERS[(i / 3) as usize],
        };
        match index {
            0..=8 => Some(kind(Surface::Regular, index)),
            9..=17 => Some(kind(Surface::Destructible, index - 9)),
            18..=20 => Some(kind(Surface::OneWay, index - 18)),
            21 => Some(Self {
                surface: Surface::Lava,
                segment: Segment::Mid,
                tier: Tier::Float,
            }),
            _ => None,
        }
    }

    /// Top-left of this kind's cell on the tile sheet.
    pub fn source_origin(&self) -> IVec2 {
        let column = self.segment as i32 * FRAME_STRIDE;
        let tier = self.tier as i32 * FRAME_STRIDE;
        match self.surface {
            Surface::Regular => IVec2::new(column, 2 * FRAME_STRIDE + tier),
            Surface::Destructible => IVec2::new(column, 5 * FRAME_STRIDE + tier),
            Surface::OneWay => IVec2::new(column, 8 * FRAME_STRIDE),
            Surface::Lava => IVec2::new(3 * FRAME_STRIDE, 2 * FRAME_STRIDE),
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct Platform {
    pub body: Body,
    pub kind: PlatformKind,
    pub source: IRect,
}

impl HasBody for Platform {
    fn body(&self) -> &Body {
        &self.body
    }
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Platform {
    pub fn new(position: IVec2, kind: PlatformKind, t: &Tunables) -> Self {
        let size = IVec2::splat(t.tile_size + PLATFORM_OVERHANG);
        let origin = kind.source_origin();
        Self {
            body: Body::new(position, size),
            kind,
            source: xywh(origin.x, origin.y, FRAME_SIZE, FRAME_SIZE),
        }
    }

    #[inline]
    pub fn is_regular(&self) -> bool {
        self.kind.surface == Surface::Regular
    }

    #[inline]
    pub fn is_destructible(&self) -> bool {
        self.kind.surface == Surface::Destructible
    }

    #[inline]
    pub fn is_one_way(&self) -> bool {
        self.kind.surface == Surface::OneWay
    }

    #[inline]
    pub fn is_lava(&self) -> bool {
        self.kind.surface == Surface::Lava
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollectibleKind {
    RocketAmmo,
    ShotgunAmmo,
    Health,
    /// Collecting it clears the stage.
    ClearDoor,
}

impl CollectibleKind {
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Self::RocketAmmo),
            1 => Some(Self::ShotgunAmmo),
            2 => Some(Self::Health),
            3 => Some(Self::ClearDoor),
            _ => None,
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct Collectible {
    pub body: Body,
    pub kind: CollectibleKind,
    /// Set once picked up. Screen culling toggles `body.active`, never this.
    pub collected: bool,
    pub source: IRect,
}

impl HasBody for Collectible {
    fn body(&self) -> &Body {
        &self.body
    }
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Collectible {
    pub fn new(position: IVec2, kind: CollectibleKind, t: &Tunables) -> Self {
        Self {
            body: Body::new(position, IVec2::splat(t.tile_size)),
            kind,
            collected: false,
            source: xywh(kind as i32 * FRAME_STRIDE, 0, FRAME_SIZE, FRAME_SIZE),
        }
    }

    /// Fall one tick.
    pub fn tick(&mut self, t: &Tunables) {
        if self.collected || !self.body.active {
            return;
        }
        let body = &mut self.body;
        body.prev_position = body.position();
        body.velocity.y = (body.velocity.y + t.collectible_gravity).min(t.collectible_max_fall);
        let next = body.position() + body.velocity;
        body.set_position(next);
    }

    /// Take the pickup out of play.
    pub fn collect(&mut self) {
        self.body.destroy();
        self.collected = true;
    }

    pub fn reset(&mut self) {
        self.body.reset();
        self.collected = false;
    }
}

/// A rectangle that shows `message` while the player stands in it.
#[derive(Component, Debug, Clone)]
pub struct Trigger {
    pub body: Body,
    pub message: String,
    /// World-space anchor of the text.
    pub text_position: Vec2,
}

impl HasBody for Trigger {
    fn body(&self) -> &Body {
        &self.body
    }
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Trigger {
    /// Text anchored at `text_position`, or the rectangle's centre.
    pub fn new(rect: IRect, message: impl Into<String>, text_position: Option<Vec2>) -> Self {
        Self {
            body: Body::new(rect.min, rect.size()),
            message: message.into(),
            text_position: text_position.unwrap_or((rect.min + rect.size() / 2).as_vec2()),
        }
    }

    /// Whether the player overlapped it during the last collision pass.
    #[inline]
    pub fn is_shown(&self) -> bool {
        self.body.colliding
    }
}
