//! Player character
//!
//! A walker body plus the jump budget, wall slide and animation state that
//! are derived from the collision flags after every update.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::body::{Body, Collisions, MotionProfile};
use super::collision::step_body;
use super::tilemap::TileMap;
use crate::Settings;
use crate::consts::*;

/// Animation state picked after each update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerAction {
    #[default]
    Idle,
    Run,
    Jump,
    WallSlide,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Ticks since the last floor contact
    pub air_time: u32,
    pub max_jumps: u32,
    pub jumps: u32,
    pub wall_slide: bool,
    /// Facing left
    pub flip: bool,
    pub action: PlayerAction,
    /// Ticks until the held tool can be used again
    pub tool_cooldown: u32,
}

impl Player {
    /// New player at `pos`; admin mode gets a practically unlimited jump budget
    pub fn new(pos: Vec2, admin: bool) -> Self {
        let max_jumps = if admin { ADMIN_MAX_JUMPS } else { 1 };
        Self {
            body: Body::new(pos, IVec2::ZERO, IVec2::new(PLAYER_WIDTH, PLAYER_HEIGHT)),
            air_time: 0,
            max_jumps,
            jumps: max_jumps,
            wall_slide: false,
            flip: false,
            action: PlayerAction::Idle,
            tool_cooldown: 0,
        }
    }

    /// Advance one tick with horizontal input `movement_x` (-1, 0 or 1)
    pub fn update(&mut self, map: &TileMap, settings: &Settings, movement_x: f32) -> Collisions {
        let profile = MotionProfile::walker(settings);
        let collisions = step_body(&mut self.body, Vec2::new(movement_x, 0.0), map, settings, &profile);

        if movement_x > 0.0 {
            self.flip = false;
        } else if movement_x < 0.0 {
            self.flip = true;
        }

        self.air_time = self.air_time.saturating_add(1);
        if collisions.down {
            self.air_time = 0;
            self.jumps = self.max_jumps;
        }

        self.wall_slide = collisions.horizontal() && self.air_time > AIRBORNE_TICKS;
        if self.wall_slide {
            self.body.velocity.y = self.body.velocity.y.min(WALL_SLIDE_MAX_FALL);
            // Face away from the wall
            self.flip = !collisions.right;
            self.action = PlayerAction::WallSlide;
        } else if self.air_time > AIRBORNE_TICKS {
            self.action = PlayerAction::Jump;
        } else if movement_x != 0.0 {
            self.action = PlayerAction::Run;
        } else {
            self.action = PlayerAction::Idle;
        }

        self.tool_cooldown = self.tool_cooldown.saturating_sub(1);
        collisions
    }

    /// Jump, or kick off the wall while sliding. Returns whether it fired.
    pub fn jump(&mut self) -> bool {
        if self.wall_slide {
            self.body.velocity.x = if self.flip { WALL_JUMP_PUSH } else { -WALL_JUMP_PUSH };
            self.body.velocity.y = WALL_JUMP_VELOCITY;
            self.air_time = AIRBORNE_TICKS + 1;
            self.jumps = self.jumps.saturating_sub(1);
            true
        } else if self.jumps > 0 {
            self.body.velocity.y = JUMP_VELOCITY;
            self.jumps -= 1;
            self.air_time = AIRBORNE_TICKS + 1;
            true
        } else {
            false
        }
    }

    pub fn can_use_tool(&self) -> bool {
        self.tool_cooldown == 0
    }

    /// Start the swing cooldown
    pub fn start_tool_use(&mut self, use_time: u32) {
        self.tool_cooldown = use_time;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tile::{GridCoord, TileRecord};

    fn floor_and_wall() -> TileMap {
        // Floor along y = 4 and a two-tile wall at x = 6
        let mut cells: Vec<(i32, i32)> = (-4..10).map(|x| (x, 4)).collect();
        cells.extend([(6, 2), (6, 3), (6, 1), (6, 0), (6, -1), (6, -2)]);
        cells
            .into_iter()
            .map(|(x, y)| (GridCoord::new(x, y), TileRecord::new("stone", 0)))
            .collect()
    }

    fn settle(player: &mut Player, map: &TileMap, settings: &Settings) {
        for _ in 0..300 {
            player.update(map, settings, 0.0);
        }
    }

    #[test]
    fn test_lands_and_idles() {
        let settings = Settings::default();
        let map = floor_and_wall();
        let mut player = Player::new(Vec2::new(0.0, 0.0), false);
        settle(&mut player, &map, &settings);

        assert_eq!(player.body.rect().bottom(), 128.0);
        assert_eq!(player.action, PlayerAction::Idle);
        assert_eq!(player.jumps, 1);
        assert!(player.air_time <= AIRBORNE_TICKS);
    }

    #[test]
    fn test_lands_flush_at_smallest_tile_size() {
        let settings = Settings::from_json(r#"{"tile_size": 13}"#).unwrap();
        let map: TileMap = (-4..10)
            .map(|x| (GridCoord::new(x, 10), TileRecord::new("stone", 0)))
            .collect();
        let mut player = Player::new(Vec2::new(0.0, 0.0), false);
        settle(&mut player, &map, &settings);
        assert_eq!(player.body.rect().bottom(), 130.0);
    }

    #[test]
    fn test_single_jump_budget() {
        let settings = Settings::default();
        let map = floor_and_wall();
        let mut player = Player::new(Vec2::new(0.0, 0.0), false);
        settle(&mut player, &map, &settings);

        assert!(player.jump());
        assert_eq!(player.body.velocity.y, JUMP_VELOCITY);
        assert!(!player.jump());

        player.update(&map, &settings, 0.0);
        assert!(player.body.pos.y < 80.0);
        assert_eq!(player.action, PlayerAction::Jump);
    }

    #[test]
    fn test_admin_gets_many_jumps() {
        let mut player = Player::new(Vec2::ZERO, true);
        for _ in 0..10 {
            assert!(player.jump());
        }
        assert_eq!(player.jumps, ADMIN_MAX_JUMPS - 10);
    }

    #[test]
    fn test_run_sets_flip_and_action() {
        let settings = Settings::default();
        let map = floor_and_wall();
        let mut player = Player::new(Vec2::new(0.0, 0.0), false);
        settle(&mut player, &map, &settings);

        player.update(&map, &settings, -1.0);
        assert!(player.flip);
        assert_eq!(player.action, PlayerAction::Run);
        player.update(&map, &settings, 1.0);
        assert!(!player.flip);
    }

    #[test]
    fn test_wall_slide_caps_fall_and_wall_jump_pushes_off() {
        let settings = Settings::default();
        let map = floor_and_wall();
        // In the air next to the wall at x = 192
        let mut player = Player::new(Vec2::new(140.0, -60.0), false);
        player.body.velocity.y = 3.0;

        let mut slid = false;
        for _ in 0..20 {
            player.update(&map, &settings, 1.0);
            if player.wall_slide {
                slid = true;
                break;
            }
        }
        assert!(slid);
        assert_eq!(player.action, PlayerAction::WallSlide);
        assert!(player.body.velocity.y <= WALL_SLIDE_MAX_FALL);
        // Touching the right wall faces right
        assert!(!player.flip);

        assert!(player.jump());
        assert_eq!(player.body.velocity.x, -WALL_JUMP_PUSH);
        assert_eq!(player.body.velocity.y, WALL_JUMP_VELOCITY);
    }

    #[test]
    fn test_tool_cooldown_counts_down() {
        let settings = Settings::default();
        let map = TileMap::new();
        let mut player = Player::new(Vec2::ZERO, false);
        assert!(player.can_use_tool());
        player.start_tool_use(2);
        assert!(!player.can_use_tool());
        player.update(&map, &settings, 0.0);
        player.update(&map, &settings, 0.0);
        assert!(player.can_use_tool());
    }
}
