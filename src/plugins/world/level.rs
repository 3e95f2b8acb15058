//! Level data: tile codes, decoding into placements and platform merging.
//!
//! A level is `screens` grids of `screen_tiles × screen_tiles` codes, stored
//! column-major (x outer, y inner). The serialized form is a little-endian
//! `i32` screen count followed by every code in the same order.

use bevy::prelude::*;
use thiserror::Error;

use super::components::{CollectibleKind, Platform, PlatformKind, Trigger};
use crate::common::body::xywh;
use crate::common::tunables::Tunables;
use crate::plugins::enemies::EnemyKind;

/// Player start used when a level has no spawn tile.
pub const DEFAULT_SPAWN: IVec2 = IVec2::new(100, 400);

const COLLECTIBLE_CODES: std::ops::RangeInclusive<i32> = 4..=7;
const FIRST_PLATFORM_CODE: i32 = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("unknown tile code {code} on screen {screen} at column {column}, row {row}")]
    UnknownTile {
        code: i32,
        screen: usize,
        column: usize,
        row: usize,
    },
    #[error("level data holds {found} cells, expected {expected}")]
    GridSize { expected: usize, found: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Empty,
    PlayerSpawn,
    Enemy(EnemyKind),
    Collectible(CollectibleKind),
    Platform(PlatformKind),
}

impl Tile {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Empty),
            1 => Some(Self::PlayerSpawn),
            2 => Some(Self::Enemy(EnemyKind::Charger)),
            3 => Some(Self::Enemy(EnemyKind::Shooter)),
            c if COLLECTIBLE_CODES.contains(&c) => {
                CollectibleKind::from_index(c - COLLECTIBLE_CODES.start()).map(Self::Collectible)
            }
            c => PlatformKind::from_index(c - FIRST_PLATFORM_CODE).map(Self::Platform),
        }
    }
}

/// One thing to spawn, at its world position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    Player(IVec2),
    Enemy(EnemyKind, IVec2),
    Collectible(CollectibleKind, IVec2),
    Platform(PlatformKind, IVec2),
}

/// A text trigger attached to a level.
#[derive(Clone, Debug, PartialEq)]
pub struct TriggerSpec {
    pub rect: IRect,
    pub message: String,
    pub text_position: Option<Vec2>,
}

impl TriggerSpec {
    pub fn new(rect: IRect, message: impl Into<String>) -> Self {
        Self {
            rect,
            message: message.into(),
            text_position: None,
        }
    }

    pub fn with_text_at(mut self, position: Vec2) -> Self {
        self.text_position = Some(position);
        self
    }

    pub fn build(&self) -> Trigger {
        Trigger::new(self.rect, self.message.clone(), self.text_position)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LevelLayout {
    pub screens: usize,
    pub cells: Vec<i32>,
    pub triggers: Vec<TriggerSpec>,
}

impl LevelLayout {
    pub fn new(screens: usize, cells: Vec<i32>) -> Self {
        Self {
            screens,
            cells,
            triggers: Vec::new(),
        }
    }

    pub fn with_triggers(mut self, triggers: Vec<TriggerSpec>) -> Self {
        self.triggers = triggers;
        self
    }

    /// Read the serialized form. Trailing bytes that don't make a whole code
    /// are a size error.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LevelError> {
        if bytes.len() < 4 || bytes.len() % 4 != 0 {
            return Err(LevelError::GridSize {
                expected: 4,
                found: bytes.len(),
            });
        }
        let mut words = bytes
            .chunks_exact(4)
            .map(|w| i32::from_le_bytes([w[0], w[1], w[2], w[3]]));
        let screens = words.next().unwrap_or_default().max(0) as usize;
        Ok(Self::new(screens, words.collect()))
    }

    /// Width in pixels.
    pub fn width(&self, t: &Tunables) -> i32 {
        self.screens as i32 * t.screen_width()
    }

    /// Decode every non-empty cell. The last spawn tile wins.
    pub fn placements(&self, t: &Tunables) -> Result<Vec<Placement>, LevelError> {
        let side = t.screen_tiles as usize;
        let per_screen = side * side;
        let expected = self.screens * per_screen;
        if self.cells.len() != expected {
            return Err(LevelError::GridSize {
                expected,
                found: self.cells.len(),
            });
        }

        let mut out = Vec::new();
        for (i, &code) in self.cells.iter().enumerate() {
            let screen = i / per_screen;
            let column = (i % per_screen) / side;
            let row = i % side;
            let position = IVec2::new(
                column as i32 * t.tile_size + screen as i32 * t.screen_width(),
                row as i32 * t.tile_size,
            );

            let tile = Tile::from_code(code).ok_or(LevelError::UnknownTile {
                code,
                screen,
                column,
                row,
            })?;
            out.push(match tile {
                Tile::Empty => continue,
                Tile::PlayerSpawn => Placement::Player(position),
                Tile::Enemy(kind) => Placement::Enemy(kind, position),
                Tile::Collectible(kind) => Placement::Collectible(kind, position),
                Tile::Platform(kind) => Placement::Platform(kind, position),
            });
        }
        Ok(out)
    }
}

/// Fold vertically stacked regular platforms in the same column into one
/// tall hitbox. Absorbed platforms keep drawing but stop colliding.
pub fn merge_platforms(platforms: &mut [Platform]) {
    for start in 0..platforms.len() {
        if !platforms[start].is_regular() || !platforms[start].body.is_collidable() {
            continue;
        }
        for other in 0..platforms.len() {
            if other == start {
                continue;
            }
            let (a, b) = pair_mut(platforms, start, other);
            if !b.is_regular() || !b.body.is_collidable() {
                continue;
            }
            let top = a.body.hitbox();
            let next = b.body.hitbox();
            if next.min.x == top.min.x && next.min.y == top.max.y - 1 {
                a.body.absorb_hitbox(&mut b.body);
            }
        }
    }
}

fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    if a < b {
        let (lo, hi) = items.split_at_mut(b);
        (&mut lo[a], &mut hi[0])
    } else {
        let (lo, hi) = items.split_at_mut(a);
        (&mut hi[0], &mut lo[b])
    }
}

/// Contextual hints for the first level.
pub fn tutorial_triggers(viewport: IVec2) -> Vec<TriggerSpec> {
    let (w, h) = (viewport.x, viewport.y);
    vec![
        TriggerSpec::new(
            xywh(0, 0, w - 200, h / 2 + 100),
            "Welcome to MANO!\nUse 'A' or 'D' to move left or right\nand use 'W' to jump.",
        ),
        TriggerSpec::new(
            xywh(w - 150, 0, 750, 452),
            "There are 3 weapons that can be cycled through using three methods:\n\
             Number Keys, Scrolling, or Pressing the Right Mouse Button.\n\
             The Shotgun and Rocket Launcher have limited ammo so try not to waste!",
        )
        .with_text_at(Vec2::new((w - 100) as f32, 100.0)),
        TriggerSpec::new(
            xywh(1650, 0, 400, 280),
            "Press and hold 'S' while on\nGreen Platforms to fall through",
        )
        .with_text_at(Vec2::new(1600.0, 126.0)),
        TriggerSpec::new(
            xywh(1850, 350, 700, 400),
            "Red Charger enemies will chase the Player\nwhen it gets too close!\nBe careful out there!",
        )
        .with_text_at(Vec2::new(2000.0, 400.0)),
    ]
}
