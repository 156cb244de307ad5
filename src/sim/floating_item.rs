//! Dropped items lying in the world
//!
//! Items fall with their own (lighter) motion profile and are pulled toward
//! the player once inside reach.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::body::{Body, Collisions, MotionProfile};
use super::collision::step_body;
use super::rect::Rect;
use super::tilemap::TileMap;
use crate::Settings;
use crate::consts::ITEM_HITBOX_SIZE;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingItem {
    pub item_id: u32,
    pub body: Body,
}

impl FloatingItem {
    pub fn new(pos: Vec2, item_id: u32) -> Self {
        Self {
            item_id,
            body: Body::new(pos, IVec2::ZERO, IVec2::splat(ITEM_HITBOX_SIZE)),
        }
    }

    /// Pull toward `target` in tiles per tick, or zero when out of reach
    ///
    /// Vertical distance counts double so items do not fly up to a player
    /// standing on a ledge far above.
    pub fn magnet(&self, target: Vec2, settings: &Settings) -> Vec2 {
        let ts = settings.tile_size as f32;
        let delta = (target - self.body.center()) / ts;
        let weighted = Vec2::new(delta.x, delta.y * 2.0);
        if weighted.length() <= settings.reach {
            delta
        } else {
            Vec2::ZERO
        }
    }

    /// Advance one tick, drifting toward `target` (the player's centre)
    pub fn update(&mut self, map: &TileMap, settings: &Settings, target: Vec2) -> Collisions {
        let pull = self.magnet(target, settings);
        step_body(&mut self.body, pull, map, settings, &MotionProfile::drifter())
    }

    pub fn touches(&self, other: &Rect) -> bool {
        self.body.rect().intersects(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tile::{GridCoord, TileRecord};

    fn floor(y: i32) -> TileMap {
        (-10..10)
            .map(|x| (GridCoord::new(x, y), TileRecord::new("dirt", 0)))
            .collect()
    }

    #[test]
    fn test_out_of_reach_just_falls() {
        let settings = Settings::default();
        let map = floor(3);
        let mut item = FloatingItem::new(Vec2::new(8.0, 0.0), 2);
        let far = Vec2::new(5000.0, 0.0);
        assert_eq!(item.magnet(far, &settings), Vec2::ZERO);

        for _ in 0..200 {
            item.update(&map, &settings, far);
        }
        assert_eq!(item.body.pos.x, 8.0);
        assert_eq!(item.body.rect().bottom(), 96.0);
    }

    #[test]
    fn test_vertical_distance_counts_double() {
        let settings = Settings::default();
        let item = FloatingItem::new(Vec2::ZERO, 2);
        let center = item.body.center();
        // 4 tiles sideways is in reach, 4 tiles up is 8 weighted
        assert_ne!(item.magnet(center + Vec2::new(128.0, 0.0), &settings), Vec2::ZERO);
        assert_eq!(item.magnet(center - Vec2::new(0.0, 128.0), &settings), Vec2::ZERO);
        assert_eq!(
            item.magnet(center + Vec2::new(64.0, 0.0), &settings),
            Vec2::new(2.0, 0.0)
        );
    }

    #[test]
    fn test_drifts_to_player_in_reach() {
        let settings = Settings::default();
        let map = floor(3);
        let mut item = FloatingItem::new(Vec2::new(-40.0, 80.0), 2);
        let player = Rect::new(Vec2::new(40.0, 48.0), Vec2::splat(48.0));

        let mut caught = false;
        for _ in 0..300 {
            item.update(&map, &settings, player.center());
            if item.touches(&player) {
                caught = true;
                break;
            }
        }
        assert!(caught);
    }
}
