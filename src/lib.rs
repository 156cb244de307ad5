//! Spielplatz - tile-grid simulation core for a side-scrolling sandbox
//!
//! Core modules:
//! - `sim`: Tile store, collision resolver, world generator, tile breaking
//! - `item`: Item records with optional tool/weapon/placement capabilities
//! - `persistence`: Tilemap JSON save/load (`"x;y"` keyed)
//! - `settings`: Data-driven physics and block tables
//! - `error`: Error types shared across the crate

pub mod error;
pub mod item;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, GenerateError, MapError, TileError};
pub use settings::Settings;

/// Simulation constants that are not part of the loadable settings
pub mod consts {
    /// Neighborhood half-width in cells (window is 5x5)
    pub const NEIGHBOR_RADIUS: i32 = 2;

    /// Walker (player/mob) horizontal tuning, pixels per tick
    pub const WALK_ACCEL: f32 = 0.1;
    pub const WALK_MAX_SPEED: f32 = 2.0;
    pub const WALK_FRICTION: f32 = 0.1;

    /// Drifter (floating item) tuning
    pub const DRIFT_GRAVITY: f32 = 0.05;
    pub const DRIFT_TERMINAL_VELOCITY: f32 = 5.0;
    pub const DRIFT_FRICTION_FACTOR: f32 = 0.96;
    pub const DRIFT_MAX_SPEED: f32 = 2.0;

    /// Player hitbox (sprite is the same size, pivot 0,0)
    pub const PLAYER_WIDTH: i32 = 48;
    pub const PLAYER_HEIGHT: i32 = 48;

    /// Frames in the air before the player counts as airborne
    pub const AIRBORNE_TICKS: u32 = 4;
    pub const JUMP_VELOCITY: f32 = -3.0;
    pub const WALL_JUMP_PUSH: f32 = 3.5;
    pub const WALL_JUMP_VELOCITY: f32 = -2.5;
    pub const WALL_SLIDE_MAX_FALL: f32 = 0.5;
    pub const ADMIN_MAX_JUMPS: u32 = 256;

    /// Dropped items render at half their sprite size
    pub const ITEM_SPRITE_SIZE: i32 = 32;
    pub const ITEM_HITBOX_SIZE: i32 = ITEM_SPRITE_SIZE / 2;
}

/// Floor a pixel coordinate into a cell index
///
/// Floors toward negative infinity so -0.5 lands in cell -1.
#[inline]
pub fn pixel_to_cell(pixel: f32, tile_size: u32) -> i32 {
    (pixel / tile_size as f32).floor() as i32
}
