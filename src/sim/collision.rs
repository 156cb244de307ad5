//! Axis-separated collision against the tile grid
//!
//! X is moved and resolved first and committed, then Y. Doing the axes one
//! at a time stops diagonal tunneling; the price is the odd corner catch.
//! Every solid tile is a full grid-aligned square, so clamping against
//! several overlaps in one pass gives the same result in any order.

use glam::Vec2;

use super::body::{Body, Collisions, MotionProfile};
use super::tilemap::TileMap;
use crate::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Move `body` by `frame_movement`, clamping against solid tiles
///
/// Returns the sides that made contact. Only position is written.
pub fn move_and_collide(
    body: &mut Body,
    frame_movement: Vec2,
    map: &TileMap,
    settings: &Settings,
) -> Collisions {
    let mut collisions = Collisions::default();
    resolve_axis(body, Axis::X, frame_movement.x, map, settings, &mut collisions);
    resolve_axis(body, Axis::Y, frame_movement.y, map, settings, &mut collisions);
    collisions
}

fn resolve_axis(
    body: &mut Body,
    axis: Axis,
    delta: f32,
    map: &TileMap,
    settings: &Settings,
    collisions: &mut Collisions,
) {
    match axis {
        Axis::X => body.pos.x += delta,
        Axis::Y => body.pos.y += delta,
    }

    let mut hitbox = body.rect();
    let solids = map.solid_rects_around(hitbox.center(), settings.tile_size, |block| {
        settings.is_solid(block)
    });

    for tile in &solids {
        if !tile.intersects(&hitbox) {
            continue;
        }
        match axis {
            Axis::X => {
                if delta > 0.0 {
                    hitbox.set_right(tile.left());
                    collisions.right = true;
                }
                if delta < 0.0 {
                    hitbox.set_left(tile.right());
                    collisions.left = true;
                }
                body.pos.x = hitbox.left() - body.pivot.x as f32;
            }
            Axis::Y => {
                if delta > 0.0 {
                    hitbox.set_bottom(tile.top());
                    collisions.down = true;
                }
                if delta < 0.0 {
                    hitbox.set_top(tile.bottom());
                    collisions.up = true;
                }
                body.pos.y = hitbox.top() - body.pivot.y as f32;
            }
        }
    }
}

/// One physics tick for a body
///
/// `input` is the externally driven movement for this tick; it is added to
/// the body's own velocity to get the frame movement. Afterwards velocity
/// is updated from the profile and the flags are stored on the body.
pub fn step_body(
    body: &mut Body,
    input: Vec2,
    map: &TileMap,
    settings: &Settings,
    profile: &MotionProfile,
) -> Collisions {
    let frame_movement = input + body.velocity;
    let collisions = move_and_collide(body, frame_movement, map, settings);

    body.velocity.x = profile.horizontal(body.velocity.x, input.x, collisions);
    body.velocity.y = profile.vertical(body.velocity.y, collisions);
    body.collisions = collisions;
    collisions
}
