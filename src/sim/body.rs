//! Moving bodies and their motion tuning
//!
//! A body is the physics half of anything that moves through the tile
//! grid (the player, dropped items). Its owner holds it; the collision
//! resolver only reads and writes these fields.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::Settings;
use crate::consts::*;

/// Which sides touched a solid tile during the last update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collisions {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl Collisions {
    pub fn any(&self) -> bool {
        self.left || self.right || self.up || self.down
    }

    pub fn vertical(&self) -> bool {
        self.up || self.down
    }

    pub fn horizontal(&self) -> bool {
        self.left || self.right
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Sprite top-left
    pub pos: Vec2,
    /// Offset from sprite top-left to hitbox top-left
    pub pivot: IVec2,
    /// Hitbox width and height
    pub hitbox: IVec2,
    pub velocity: Vec2,
    /// Flags from the most recent update
    #[serde(skip)]
    pub collisions: Collisions,
}

impl Body {
    pub fn new(pos: Vec2, pivot: IVec2, hitbox: IVec2) -> Self {
        Self {
            pos,
            pivot,
            hitbox,
            velocity: Vec2::ZERO,
            collisions: Collisions::default(),
        }
    }

    /// Hitbox rectangle at the current position
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos + self.pivot.as_vec2(), self.hitbox.as_vec2())
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }
}

/// How horizontal speed builds up under a drive
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Acceleration {
    /// Fixed step per tick
    Constant(f32),
    /// Step divided by the drive magnitude (weak pulls accelerate harder)
    InverseDrive(f32),
}

/// How horizontal speed bleeds off without a drive
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Friction {
    /// Subtract a fixed step toward zero
    Step(f32),
    /// Multiply by a factor each tick
    Factor(f32),
}

/// Speeds under `FRICTION_SNAP` are zeroed
pub const FRICTION_SNAP: f32 = 0.1;

/// Per-kind motion tuning (player vs. dropped item), pixels per tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionProfile {
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub acceleration: Acceleration,
    pub max_speed: f32,
    pub friction: Friction,
}

impl MotionProfile {
    /// Player and mobs
    pub fn walker(settings: &Settings) -> Self {
        Self {
            gravity: settings.gravity,
            terminal_velocity: settings.terminal_velocity,
            acceleration: Acceleration::Constant(WALK_ACCEL),
            max_speed: WALK_MAX_SPEED,
            friction: Friction::Step(WALK_FRICTION),
        }
    }

    /// Dropped items
    pub fn drifter() -> Self {
        Self {
            gravity: DRIFT_GRAVITY,
            terminal_velocity: DRIFT_TERMINAL_VELOCITY,
            acceleration: Acceleration::InverseDrive(WALK_ACCEL),
            max_speed: DRIFT_MAX_SPEED,
            friction: Friction::Factor(DRIFT_FRICTION_FACTOR),
        }
    }

    /// Horizontal velocity after one tick with drive `drive`
    pub fn horizontal(&self, vx: f32, drive: f32, collisions: Collisions) -> f32 {
        let step = |drive: f32| match self.acceleration {
            Acceleration::Constant(a) => a,
            Acceleration::InverseDrive(a) => a / drive.abs(),
        };

        if drive > 0.0 {
            if collisions.right {
                vx
            } else {
                (vx + step(drive)).min(self.max_speed)
            }
        } else if drive < 0.0 {
            if collisions.left {
                vx
            } else {
                (vx - step(drive)).max(-self.max_speed)
            }
        } else {
            match self.friction {
                Friction::Step(s) => {
                    if vx > FRICTION_SNAP {
                        vx - s
                    } else if vx < -FRICTION_SNAP {
                        vx + s
                    } else {
                        0.0
                    }
                }
                Friction::Factor(f) => {
                    if vx.abs() > FRICTION_SNAP {
                        vx * f
                    } else {
                        0.0
                    }
                }
            }
        }
    }

    /// Vertical velocity after one tick; vertical contact cancels it
    pub fn vertical(&self, vy: f32, collisions: Collisions) -> f32 {
        if collisions.vertical() {
            0.0
        } else {
            (vy + self.gravity).min(self.terminal_velocity)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_applies_pivot() {
        let body = Body::new(Vec2::new(10.0, 20.0), IVec2::new(4, 8), IVec2::new(16, 24));
        let r = body.rect();
        assert_eq!(r.pos, Vec2::new(14.0, 28.0));
        assert_eq!(r.center(), Vec2::new(22.0, 40.0));
    }

    #[test]
    fn test_walker_accelerates_and_caps() {
        let p = MotionProfile::walker(&Settings::default());
        let mut vx = 0.0;
        for _ in 0..100 {
            vx = p.horizontal(vx, 1.0, Collisions::default());
        }
        assert_eq!(vx, WALK_MAX_SPEED);

        let blocked = Collisions {
            right: true,
            ..Default::default()
        };
        assert_eq!(p.horizontal(0.5, 1.0, blocked), 0.5);
    }

    #[test]
    fn test_walker_friction_steps_to_zero() {
        let p = MotionProfile::walker(&Settings::default());
        let mut vx = 1.0;
        let mut ticks = 0;
        while vx != 0.0 {
            vx = p.horizontal(vx, 0.0, Collisions::default());
            ticks += 1;
            assert!(ticks < 20);
        }
        assert!(vx == 0.0);
    }

    #[test]
    fn test_drifter_decays_by_factor() {
        let p = MotionProfile::drifter();
        let vx = p.horizontal(1.0, 0.0, Collisions::default());
        assert!((vx - DRIFT_FRICTION_FACTOR).abs() < 1e-6);
        assert_eq!(p.horizontal(0.05, 0.0, Collisions::default()), 0.0);
    }

    #[test]
    fn test_vertical_gravity_and_landing() {
        let p = MotionProfile::walker(&Settings::default());
        assert!((p.vertical(0.0, Collisions::default()) - 0.1).abs() < 1e-6);
        assert_eq!(p.vertical(3.95, Collisions::default()), 4.0);
        let landed = Collisions {
            down: true,
            ..Default::default()
        };
        assert_eq!(p.vertical(3.0, landed), 0.0);
    }
}
