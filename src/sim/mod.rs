//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Sparse tile store with neighborhood queries
//! - Axis-separated collision for every moving body
//! - Seedable procedural world generation
//! - Tile durability and breaking
//!
//! No rendering or platform dependencies; randomness is always injected.

pub mod body;
pub mod breaking;
pub mod collision;
pub mod floating_item;
pub mod player;
pub mod rect;
pub mod tick;
pub mod tile;
pub mod tilemap;
pub mod worldgen;

pub use body::{Acceleration, Body, Collisions, Friction, MotionProfile};
pub use breaking::{HitOutcome, Throttle, TileBreaker, matching_tool};
pub use collision::{move_and_collide, step_body};
pub use floating_item::FloatingItem;
pub use player::{Player, PlayerAction};
pub use rect::Rect;
pub use tick::{TickInput, World, WorldEvent, tick};
pub use tile::{BlockKind, GridCoord, ParseCoordError, TileRecord};
pub use tilemap::{PlacedTile, TileMap};
pub use worldgen::{Bounds, GeneratedWorld, generate, generate_random, generate_seeded};
