//! Grid coordinates and tile records
//!
//! A cell is addressed by an exact integer pair; a tile is the block kind
//! plus a sprite variant and, once it has been hit, its remaining durability.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::pixel_to_cell;

/// Integer cell address
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell containing a continuous pixel position
    pub fn containing(pos: Vec2, tile_size: u32) -> Self {
        Self::new(pixel_to_cell(pos.x, tile_size), pixel_to_cell(pos.y, tile_size))
    }

    /// Top-left corner of this cell in pixel space
    pub fn to_pixel(self, tile_size: u32) -> Vec2 {
        Vec2::new(
            (self.x as i64 * tile_size as i64) as f32,
            (self.y as i64 * tile_size as i64) as f32,
        )
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Row-major sort key (top row first, then left to right)
    #[inline]
    pub fn row_major(&self) -> (i32, i32) {
        (self.y, self.x)
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.x, self.y)
    }
}

/// Returned when a `"x;y"` key cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCoordError;

impl fmt::Display for ParseCoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected \"<x>;<y>\" with integer halves")
    }
}

impl std::error::Error for ParseCoordError {}

impl FromStr for GridCoord {
    type Err = ParseCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s.split_once(';').ok_or(ParseCoordError)?;
        let x = x.trim().parse().map_err(|_| ParseCoordError)?;
        let y = y.trim().parse().map_err(|_| ParseCoordError)?;
        Ok(Self::new(x, y))
    }
}

/// Block identifier ("dirt", "stone", "oakLeaf", ...)
///
/// Block kinds are data: the settings tables and map files name them, so
/// the set is open rather than a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockKind(String);

impl BlockKind {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn dirt() -> Self {
        Self::new("dirt")
    }

    pub fn stone() -> Self {
        Self::new("stone")
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockKind {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Contents of one occupied cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRecord {
    pub block: BlockKind,
    pub variant: i32,
    /// Absent until the first hit; absent means untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub durability: Option<i32>,
}

impl TileRecord {
    pub fn new(block: impl Into<BlockKind>, variant: i32) -> Self {
        Self {
            block: block.into(),
            variant,
            durability: None,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        matches!(self.durability, Some(d) if d <= 0)
    }
}
