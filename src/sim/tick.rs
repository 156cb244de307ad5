//! Fixed timestep simulation tick
//!
//! Moves the player and dropped items, then applies the tool swing queued
//! by the input. Tile mutations happen only at the end of the tick so every
//! body in a tick sees the same map.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::breaking::{HitOutcome, TileBreaker};
use super::floating_item::FloatingItem;
use super::player::Player;
use super::tile::GridCoord;
use super::tilemap::TileMap;
use crate::Settings;
use crate::consts::ITEM_HITBOX_SIZE;
use crate::error::TileError;
use crate::item::{self, ToolCapability};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal move: -1, 0 or 1
    pub movement_x: f32,
    pub jump: bool,
    /// Swing `tool` at this cell
    pub use_tool_at: Option<GridCoord>,
    pub tool: Option<ToolCapability>,
}

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    TileHit { coord: GridCoord, outcome: HitOutcome },
    ItemDropped { item_id: u32, pos: Vec2 },
    ItemCollected { item_id: u32 },
}

/// Everything the simulation owns
#[derive(Debug, Clone)]
pub struct World {
    pub settings: Settings,
    pub map: TileMap,
    pub player: Player,
    /// Dropped items, oldest first
    pub items: Vec<FloatingItem>,
    pub breaker: TileBreaker,
    /// Item IDs picked up by the player, in pickup order
    pub collected: Vec<u32>,
    pub time_ticks: u64,
}

impl World {
    pub fn new(settings: Settings, map: TileMap, spawn: Vec2, admin: bool) -> Self {
        let breaker = TileBreaker::new(&settings);
        Self {
            settings,
            map,
            player: Player::new(spawn, admin),
            items: Vec::new(),
            breaker,
            collected: Vec::new(),
            time_ticks: 0,
        }
    }

    /// Drop an item centred on `center`
    pub fn spawn_item(&mut self, center: Vec2, item_id: u32) -> Vec2 {
        let pos = center - Vec2::splat(ITEM_HITBOX_SIZE as f32 / 2.0);
        self.items.push(FloatingItem::new(pos, item_id));
        pos
    }
}

/// Advance the world by one tick
pub fn tick(world: &mut World, input: &TickInput) -> Result<Vec<WorldEvent>, TileError> {
    let mut events = Vec::new();

    if input.jump {
        world.player.jump();
    }
    world.player.update(&world.map, &world.settings, input.movement_x);

    let player_rect = world.player.body.rect();
    let target = player_rect.center();
    for item in &mut world.items {
        item.update(&world.map, &world.settings, target);
    }

    // Pick up everything touching the player
    let (picked, remaining): (Vec<_>, Vec<_>) = std::mem::take(&mut world.items)
        .into_iter()
        .partition(|item| item.touches(&player_rect));
    world.items = remaining;
    for item in picked {
        world.collected.push(item.item_id);
        events.push(WorldEvent::ItemCollected {
            item_id: item.item_id,
        });
    }

    // Tile mutation point
    if let (Some(coord), Some(tool)) = (input.use_tool_at, input.tool.as_ref()) {
        if world.player.can_use_tool() && world.map.is_tile_at(coord) {
            let outcome = world.breaker.hit(
                &mut world.map,
                &world.settings,
                coord,
                tool,
                world.time_ticks,
            )?;
            if !matches!(outcome, HitOutcome::Rejected { .. }) {
                world.player.start_tool_use(tool.use_time);
            }
            if let HitOutcome::Broken { block } = &outcome {
                if let Some(item_id) = item::loot_for(block) {
                    let ts = world.settings.tile_size as f32;
                    let center = coord.to_pixel(world.settings.tile_size) + Vec2::splat(ts / 2.0);
                    let pos = world.spawn_item(center, item_id);
                    events.push(WorldEvent::ItemDropped { item_id, pos });
                }
            }
            events.push(WorldEvent::TileHit { coord, outcome });
        }
    }

    world.time_ticks += 1;
    Ok(events)
}
