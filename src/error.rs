//! Error types
//!
//! Load paths that the game treats as recoverable (missing map, bad
//! settings file) log these and fall back; everything else propagates.

use std::path::PathBuf;

use thiserror::Error;

use crate::sim::GridCoord;

/// Tilemap persistence failures
#[derive(Debug, Error)]
pub enum MapError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed tilemap JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bad tile key '{key}' (expected \"<x>;<y>\")")]
    BadKey { key: String },
}

/// Tile store precondition violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TileError {
    #[error("no tile at {0}")]
    NoTile(GridCoord),
}

/// World generation input errors, raised before anything is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("degenerate bounds: x [{x_left}, {x_right}), y [{y_top}, {y_bottom})")]
    DegenerateBounds {
        x_left: i32,
        x_right: i32,
        y_top: i32,
        y_bottom: i32,
    },
}

/// Settings load and validation failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("durability table has no \"_\" default entry")]
    MissingDefaultDurability,

    #[error("tile size must be positive")]
    NonPositiveTileSize,

    #[error("tile size {tile_size} leaves the collision window smaller than a {hitbox} px hitbox")]
    TileSizeTooSmall { tile_size: u32, hitbox: u64 },

    #[error("invalid physics value for {name}: {value}")]
    InvalidPhysics { name: &'static str, value: f32 },
}
