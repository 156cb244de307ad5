//! Tile durability and breaking
//!
//! Untouched tiles carry no durability. The first matching hit seeds it
//! from the durability table (or zero for instant-mine blocks), later hits
//! subtract the tool power. At zero or below the tile either turns into its
//! transform target or leaves the map.

use serde::{Deserialize, Serialize};

use super::tile::{BlockKind, GridCoord};
use super::tilemap::TileMap;
use crate::Settings;
use crate::error::TileError;
use crate::item::{ToolCapability, ToolType};

/// Result of one hit against an occupied cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitOutcome {
    /// Still standing
    Damaged { remaining: i32 },
    /// Cell is now empty
    Broken { block: BlockKind },
    /// Block kind replaced in place, variant kept
    Transformed { from: BlockKind, into: BlockKind },
    /// No tool type of the swing can break this block; nothing changed.
    /// `logged` is set on the hits that emitted the throttled warning.
    Rejected { block: BlockKind, logged: bool },
}

impl HitOutcome {
    /// True when the cell no longer holds the block that was hit
    pub fn is_destroyed(&self) -> bool {
        matches!(self, HitOutcome::Broken { .. } | HitOutcome::Transformed { .. })
    }
}

/// Allows one event per `interval` ticks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Throttle {
    interval: u64,
    last: Option<u64>,
}

impl Throttle {
    pub fn new(interval: u64) -> Self {
        Self { interval, last: None }
    }

    pub fn allow(&mut self, tick: u64) -> bool {
        match self.last {
            Some(last) if tick.saturating_sub(last) < self.interval => false,
            _ => {
                self.last = Some(tick);
                true
            }
        }
    }
}

/// First tool type of the swing (ascending order) able to break `block`
pub fn matching_tool(
    settings: &Settings,
    block: &BlockKind,
    tool: &ToolCapability,
) -> Option<(ToolType, i32)> {
    tool.powers
        .iter()
        .find(|(tool_type, _)| {
            settings
                .tool_required
                .get(tool_type)
                .is_some_and(|blocks| blocks.contains(block))
        })
        .map(|(tool_type, power)| (*tool_type, *power))
}

/// Applies hits to tiles in a map
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TileBreaker {
    rejections: Throttle,
}

impl TileBreaker {
    pub fn new(settings: &Settings) -> Self {
        Self {
            rejections: Throttle::new(settings.diagnostic_interval()),
        }
    }

    /// Hit the tile at `coord` with `tool` during tick `tick`
    ///
    /// An empty cell is a caller error. A tool that cannot break the block
    /// yields `Rejected` and leaves the tile alone.
    pub fn hit(
        &mut self,
        map: &mut TileMap,
        settings: &Settings,
        coord: GridCoord,
        tool: &ToolCapability,
        tick: u64,
    ) -> Result<HitOutcome, TileError> {
        let tile = map.tile_at_mut(coord).ok_or(TileError::NoTile(coord))?;

        let Some((tool_type, power)) = matching_tool(settings, &tile.block, tool) else {
            let logged = self.rejections.allow(tick);
            if logged {
                log::warn!(
                    "Cannot break {} at {} with {}",
                    tile.block,
                    coord,
                    tool.powers
                        .keys()
                        .map(ToolType::as_str)
                        .collect::<Vec<_>>()
                        .join("/")
                );
            }
            return Ok(HitOutcome::Rejected {
                block: tile.block.clone(),
                logged,
            });
        };

        let power = power.max(0);
        let remaining = match tile.durability {
            Some(current) => current - power,
            None if settings.instant_mine.contains(&tile.block) => 0,
            None => settings.durability.for_block(&tile.block) - power,
        };
        tile.durability = Some(remaining);
        log::debug!("{} hit {} at {}: {}", tool_type.as_str(), tile.block, coord, remaining);

        if remaining > 0 {
            return Ok(HitOutcome::Damaged { remaining });
        }

        match settings.transform_on_break.get(&tile.block) {
            Some(into) => {
                let from = std::mem::replace(&mut tile.block, into.clone());
                tile.durability = None;
                Ok(HitOutcome::Transformed {
                    from,
                    into: into.clone(),
                })
            }
            None => {
                let removed = map.remove(coord)?;
                Ok(HitOutcome::Broken {
                    block: removed.block,
                })
            }
        }
    }
}
