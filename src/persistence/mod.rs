//! Tilemap save/load
//!
//! A map is stored as one JSON object per world alias at
//! `<dir>/<alias>/tilemap.json`, keyed by `"x;y"`:
//!
//! ```json
//! {
//!     "0;5": { "block": "stone", "variant": 0 },
//!     "-2;4": { "block": "dirt", "variant": 1, "durability": 20 }
//! }
//! ```
//!
//! Keys are written in row-major order so the same map always encodes to
//! the same bytes. A missing or corrupt file is not fatal to `load_map`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::ser::SerializeMap;

use crate::error::MapError;
use crate::sim::{GridCoord, TileMap, TileRecord};

pub const MAP_FILE_NAME: &str = "tilemap.json";

/// Serializes a map with its keys in row-major order
struct OrderedTiles<'a>(&'a TileMap);

impl Serialize for OrderedTiles<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tiles = self.0.iter_sorted();
        let mut map = serializer.serialize_map(Some(tiles.len()))?;
        for (coord, tile) in tiles {
            map.serialize_entry(&coord.to_string(), tile)?;
        }
        map.end()
    }
}

/// Pretty JSON (4-space indent)
pub fn encode(map: &TileMap) -> Result<String, MapError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    OrderedTiles(map).serialize(&mut ser)?;
    // serde_json only ever emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn decode(json: &str) -> Result<TileMap, MapError> {
    let raw: HashMap<String, TileRecord> = serde_json::from_str(json)?;
    raw.into_iter()
        .map(|(key, tile)| -> Result<_, MapError> {
            let coord: GridCoord = key.parse().map_err(|_| MapError::BadKey { key })?;
            Ok((coord, tile))
        })
        .collect()
}

pub fn map_path(dir: impl AsRef<Path>, alias: &str) -> PathBuf {
    dir.as_ref().join(alias).join(MAP_FILE_NAME)
}

/// Write the map, creating the alias directory if needed
pub fn save_map(dir: impl AsRef<Path>, alias: &str, map: &TileMap) -> Result<PathBuf, MapError> {
    let path = map_path(dir, alias);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| MapError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = encode(map)?;
    fs::write(&path, json).map_err(|source| MapError::Io {
        path: path.clone(),
        source,
    })?;
    log::info!("Saved {} tiles to {}", map.len(), path.display());
    Ok(path)
}

pub fn try_load_map(dir: impl AsRef<Path>, alias: &str) -> Result<TileMap, MapError> {
    let path = map_path(dir, alias);
    let json = fs::read_to_string(&path).map_err(|source| MapError::Io {
        path: path.clone(),
        source,
    })?;
    decode(&json)
}

/// Load a map, continuing with an empty one if the file is missing or bad
pub fn load_map(dir: impl AsRef<Path>, alias: &str) -> TileMap {
    match try_load_map(dir, alias) {
        Ok(map) => {
            log::info!("Loaded map '{}' ({} tiles)", alias, map.len());
            map
        }
        Err(e) => {
            log::error!("Could not load map '{}', starting empty: {}", alias, e);
            TileMap::new()
        }
    }
}
