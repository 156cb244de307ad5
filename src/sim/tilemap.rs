//! Sparse tile store with locality queries
//!
//! Absent keys are air. Lookups never fail; removing an empty cell is a
//! caller bug and reported as `TileError::NoTile`.

use std::collections::HashMap;

use glam::Vec2;

use super::rect::Rect;
use super::tile::{BlockKind, GridCoord, TileRecord};
use crate::consts::NEIGHBOR_RADIUS;
use crate::error::TileError;
use crate::pixel_to_cell;

/// A tile pulled out of the map, positioned in pixel space
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedTile {
    /// Top-left corner of the cell in pixels
    pub pixel: Vec2,
    pub tile: TileRecord,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileMap {
    tiles: HashMap<GridCoord, TileRecord>,
}

impl TileMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tile_at(&self, coord: GridCoord) -> Option<&TileRecord> {
        self.tiles.get(&coord)
    }

    pub fn tile_at_mut(&mut self, coord: GridCoord) -> Option<&mut TileRecord> {
        self.tiles.get_mut(&coord)
    }

    pub fn is_tile_at(&self, coord: GridCoord) -> bool {
        self.tiles.contains_key(&coord)
    }

    /// Insert or overwrite
    pub fn insert(&mut self, coord: GridCoord, tile: TileRecord) {
        self.tiles.insert(coord, tile);
    }

    /// Remove an occupied cell
    pub fn remove(&mut self, coord: GridCoord) -> Result<TileRecord, TileError> {
        self.tiles.remove(&coord).ok_or(TileError::NoTile(coord))
    }

    /// Occupied cells within the 5x5 window around the cell containing `pos`
    ///
    /// Cells are yielded row by row, top to bottom.
    pub fn neighborhood(&self, pos: Vec2, tile_size: u32) -> Vec<(GridCoord, &TileRecord)> {
        let center = GridCoord::containing(pos, tile_size);
        let mut found = Vec::new();
        for dy in -NEIGHBOR_RADIUS..=NEIGHBOR_RADIUS {
            for dx in -NEIGHBOR_RADIUS..=NEIGHBOR_RADIUS {
                let coord = center.offset(dx, dy);
                if let Some(tile) = self.tiles.get(&coord) {
                    found.push((coord, tile));
                }
            }
        }
        found
    }

    /// Rectangles of solid tiles near `pos`
    pub fn solid_rects_around<F>(&self, pos: Vec2, tile_size: u32, is_solid: F) -> Vec<Rect>
    where
        F: Fn(&BlockKind) -> bool,
    {
        let size = Vec2::splat(tile_size as f32);
        self.neighborhood(pos, tile_size)
            .into_iter()
            .filter(|(_, tile)| is_solid(&tile.block))
            .map(|(coord, _)| Rect::new(coord.to_pixel(tile_size), size))
            .collect()
    }

    /// Pull out every tile whose (block, variant) is in `id_pairs`
    ///
    /// Returned positions are in pixels, ordered row by row. When `keep` is
    /// false the matched tiles are removed from the map.
    pub fn extract_matching(
        &mut self,
        id_pairs: &[(BlockKind, i32)],
        keep: bool,
        tile_size: u32,
    ) -> Vec<PlacedTile> {
        self.extract_where(
            |tile| {
                id_pairs
                    .iter()
                    .any(|(block, variant)| *block == tile.block && *variant == tile.variant)
            },
            keep,
            tile_size,
        )
    }

    /// Like `extract_matching`, but any variant of `block` matches
    pub fn extract_any_variant(
        &mut self,
        block: &BlockKind,
        keep: bool,
        tile_size: u32,
    ) -> Vec<PlacedTile> {
        self.extract_where(|tile| tile.block == *block, keep, tile_size)
    }

    fn extract_where<F>(&mut self, matches: F, keep: bool, tile_size: u32) -> Vec<PlacedTile>
    where
        F: Fn(&TileRecord) -> bool,
    {
        let mut coords: Vec<GridCoord> = self
            .tiles
            .iter()
            .filter(|(_, tile)| matches(tile))
            .map(|(coord, _)| *coord)
            .collect();
        coords.sort_by_key(GridCoord::row_major);

        let mut out = Vec::with_capacity(coords.len());
        for coord in coords {
            let tile = if keep {
                self.tiles.get(&coord).cloned()
            } else {
                self.tiles.remove(&coord)
            };
            if let Some(tile) = tile {
                out.push(PlacedTile {
                    pixel: coord.to_pixel(tile_size),
                    tile,
                });
            }
        }
        out
    }

    /// Tiles whose cells intersect the viewport, plus one cell of margin
    pub fn visible(
        &self,
        origin: Vec2,
        size: Vec2,
        tile_size: u32,
    ) -> impl Iterator<Item = (GridCoord, &TileRecord)> + '_ {
        let x0 = pixel_to_cell(origin.x, tile_size) - 1;
        let x1 = pixel_to_cell(origin.x + size.x, tile_size) + 1;
        let y0 = pixel_to_cell(origin.y, tile_size) - 1;
        let y1 = pixel_to_cell(origin.y + size.y, tile_size) + 1;
        (y0..=y1).flat_map(move |y| {
            (x0..=x1).filter_map(move |x| {
                let coord = GridCoord::new(x, y);
                self.tiles.get(&coord).map(|tile| (coord, tile))
            })
        })
    }

    /// All tiles in row-major order
    pub fn iter_sorted(&self) -> Vec<(GridCoord, &TileRecord)> {
        let mut all: Vec<_> = self.tiles.iter().map(|(c, t)| (*c, t)).collect();
        all.sort_by_key(|(c, _)| c.row_major());
        all
    }
}

impl FromIterator<(GridCoord, TileRecord)> for TileMap {
    fn from_iter<I: IntoIterator<Item = (GridCoord, TileRecord)>>(iter: I) -> Self {
        Self {
            tiles: iter.into_iter().collect(),
        }
    }
}
