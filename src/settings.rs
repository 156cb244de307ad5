//! Game settings and block tables
//!
//! Loaded once at startup from JSON, validated eagerly, then passed by
//! reference into the collision resolver, tile breaker and generator.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{ITEM_HITBOX_SIZE, NEIGHBOR_RADIUS, PLAYER_HEIGHT, PLAYER_WIDTH};
use crate::error::ConfigError;
use crate::item::ToolType;
use crate::sim::BlockKind;

/// Key of the fallback entry in the durability table
pub const DEFAULT_DURABILITY_KEY: &str = "_";

/// Per-block starting durability with a `"_"` fallback entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurabilityTable(BTreeMap<BlockKind, i32>);

impl DurabilityTable {
    pub fn new(entries: BTreeMap<BlockKind, i32>) -> Self {
        Self(entries)
    }

    /// Durability for a block, falling back to the `"_"` entry
    pub fn for_block(&self, block: &BlockKind) -> i32 {
        self.0
            .get(block)
            .or_else(|| self.0.get(&BlockKind::new(DEFAULT_DURABILITY_KEY)))
            .copied()
            .unwrap_or(0)
    }

    pub fn has_default(&self) -> bool {
        self.0.contains_key(&BlockKind::new(DEFAULT_DURABILITY_KEY))
    }
}

impl Default for DurabilityTable {
    fn default() -> Self {
        let entries = [
            (DEFAULT_DURABILITY_KEY, 100),
            ("dirt", 50),
            ("grass", 50),
            ("stone", 120),
            ("iron", 200),
            ("oakLog", 150),
        ];
        Self(
            entries
                .into_iter()
                .map(|(k, v)| (BlockKind::new(k), v))
                .collect(),
        )
    }
}

fn kinds(names: &[&str]) -> BTreeSet<BlockKind> {
    names.iter().map(|n| BlockKind::new(*n)).collect()
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Display ===
    pub window_width: u32,
    pub window_height: u32,
    /// Target tick rate
    pub fps: u32,

    // === World ===
    /// Cell edge length in pixels
    pub tile_size: u32,
    /// Pickup/magnet distance in tiles
    pub reach: f32,

    // === Physics (pixels per tick) ===
    pub gravity: f32,
    pub terminal_velocity: f32,
    /// Block kinds that stop moving bodies
    pub physics_tiles: BTreeSet<BlockKind>,

    // === Breaking ===
    pub durability: DurabilityTable,
    /// Blocks destroyed by a single hit regardless of tool power
    pub instant_mine: BTreeSet<BlockKind>,
    /// Blocks that turn into another block instead of disappearing
    pub transform_on_break: BTreeMap<BlockKind, BlockKind>,
    /// Blocks each tool type is able to break
    pub tool_required: BTreeMap<ToolType, BTreeSet<BlockKind>>,
}

impl Default for Settings {
    fn default() -> Self {
        let tile_size = 32;
        Self {
            window_width: 1280,
            window_height: 720,
            fps: 60,

            tile_size,
            reach: 5.0,

            gravity: 0.1,
            terminal_velocity: tile_size as f32 / 8.0,
            physics_tiles: kinds(&["dirt", "grass", "stone", "iron"]),

            durability: DurabilityTable::default(),
            instant_mine: kinds(&["oakLeaf", "tallGrass"]),
            transform_on_break: [(BlockKind::new("grass"), BlockKind::dirt())]
                .into_iter()
                .collect(),
            tool_required: [
                (
                    ToolType::Pickaxe,
                    kinds(&["dirt", "grass", "stone", "iron", "tallGrass"]),
                ),
                (ToolType::Axe, kinds(&["oakLog", "oakLeaf"])),
            ]
            .into_iter()
            .collect(),
        }
    }
}

impl Settings {
    /// Parse and validate settings JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read and validate a settings file
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings: {}", e);
                Self::default()
            }
        }
    }

    /// Check the tables and physics values the core relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_size == 0 {
            return Err(ConfigError::NonPositiveTileSize);
        }
        // The neighborhood window must cover the largest hitbox
        let window = 2 * NEIGHBOR_RADIUS as u64 * self.tile_size as u64 - 1;
        let hitbox = PLAYER_WIDTH.max(PLAYER_HEIGHT).max(ITEM_HITBOX_SIZE) as u64;
        if window < hitbox {
            return Err(ConfigError::TileSizeTooSmall {
                tile_size: self.tile_size,
                hitbox,
            });
        }
        if !self.durability.has_default() {
            return Err(ConfigError::MissingDefaultDurability);
        }
        for (name, value) in [
            ("gravity", self.gravity),
            ("terminal_velocity", self.terminal_velocity),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidPhysics { name, value });
            }
        }
        if !self.reach.is_finite() || self.reach < 0.0 {
            return Err(ConfigError::InvalidPhysics {
                name: "reach",
                value: self.reach,
            });
        }
        Ok(())
    }

    pub fn is_solid(&self, block: &BlockKind) -> bool {
        self.physics_tiles.contains(block)
    }

    /// Window-sized view centred on `center`, as (top-left, size) in pixels
    pub fn viewport_around(&self, center: Vec2) -> (Vec2, Vec2) {
        let size = Vec2::new(self.window_width as f32, self.window_height as f32);
        (center - size * 0.5, size)
    }

    /// Ticks between throttled diagnostics (once per second)
    pub fn diagnostic_interval(&self) -> u64 {
        self.fps.max(1) as u64
    }
}
