//! Tunable gameplay constants.
//!
//! Distances are pixels, speeds are pixels per millisecond for characters and
//! pixels per tick for bullets and pickups.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    /// Fixed simulation rate.
    pub tick_hz: f64,
    pub tile_size: i32,
    /// Cells along each side of one level screen.
    pub screen_tiles: i32,
    /// Logical viewport size in pixels.
    pub viewport: IVec2,
    /// The player can't rise above this line.
    pub ceiling: f32,
    /// Falling below this line kills the player.
    pub kill_plane: f32,
    pub player_health: i32,
    pub enemy_health: i32,
    pub charger_view_radius: f32,
    pub shooter_view_radius: f32,
    pub bullet_speed: f32,
    pub bullet_lifetime: i32,
    pub collectible_gravity: f32,
    pub collectible_max_fall: f32,
    /// Shotgun and rocket rounds granted on every reset.
    pub starting_ammo: i32,
    pub pistol_ammo: i32,
}

impl Tunables {
    /// Milliseconds covered by one simulation tick.
    #[inline]
    pub fn frame_ms(&self) -> f32 {
        (1000.0 / self.tick_hz) as f32
    }

    /// Width in pixels of one level screen.
    #[inline]
    pub fn screen_width(&self) -> i32 {
        self.tile_size * self.screen_tiles
    }
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            tile_size: 50,
            screen_tiles: 15,
            viewport: IVec2::new(1000, 750),
            ceiling: -8.0,
            kill_plane: 680.0,
            player_health: 5,
            enemy_health: 3,
            charger_view_radius: 250.0,
            shooter_view_radius: 500.0,
            bullet_speed: 10.0,
            bullet_lifetime: 120,
            collectible_gravity: 0.5,
            collectible_max_fall: 10.0,
            starting_ammo: 10,
            pistol_ammo: 999,
        }
    }
}
