//! Procedural world generation
//!
//! Fills a rectangle with a dirt band over a stone band, then scatters
//! impurity "strokes" into each band: chains of overlapping filled circles
//! that wander sideways and up. Stone strokes in dirt get denser toward the
//! boundary (exponential curve); dirt strokes in stone thin out with depth
//! (cubic decay).
//!
//! All randomness comes from the caller's RNG, so a seeded `Pcg32` gives
//! the same world every time.

use std::f64::consts::{PI, TAU};

use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::tile::{BlockKind, GridCoord, TileRecord};
use super::tilemap::TileMap;
use crate::error::GenerateError;

/// Stone strokes per dirt cell
pub const STONE_IN_DIRT_DENSITY: f64 = 0.003;
/// Dirt strokes per stone cell
pub const DIRT_IN_STONE_DENSITY: f64 = 0.004;
/// Upper bound on circles in one stroke after the first
pub const MAX_PATCHES_IN_STROKE: i64 = 32;
pub const MIN_PATCH_RADIUS: f64 = 1.0;
pub const MAX_PATCH_RADIUS: f64 = 5.0;

/// Ores grouped into tiers; each world gets one ore per tier
pub const ORE_TIERS: [[&str; 2]; 4] = [
    ["copper", "tin"],
    ["iron", "lead"],
    ["silver", "tungsten"],
    ["gold", "platinum"],
];

/// Generation rectangle (right and bottom exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bounds {
    x_left: i32,
    x_right: i32,
    y_top: i32,
    y_bottom: i32,
}

impl Bounds {
    pub fn new(x_left: i32, x_right: i32, y_top: i32, y_bottom: i32) -> Result<Self, GenerateError> {
        if x_right <= x_left || y_bottom <= y_top {
            return Err(GenerateError::DegenerateBounds {
                x_left,
                x_right,
                y_top,
                y_bottom,
            });
        }
        Ok(Self {
            x_left,
            x_right,
            y_top,
            y_bottom,
        })
    }

    pub fn x_left(&self) -> i32 {
        self.x_left
    }

    pub fn x_right(&self) -> i32 {
        self.x_right
    }

    pub fn y_top(&self) -> i32 {
        self.y_top
    }

    pub fn y_bottom(&self) -> i32 {
        self.y_bottom
    }

    pub fn width(&self) -> i64 {
        self.x_right as i64 - self.x_left as i64
    }

    pub fn height(&self) -> i64 {
        self.y_bottom as i64 - self.y_top as i64
    }

    /// First stone row: floor of the vertical midpoint
    pub fn dirt_boundary(&self) -> i32 {
        (self.y_top as i64 + self.y_bottom as i64).div_euclid(2) as i32
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        (self.x_left..self.x_right).contains(&coord.x) && (self.y_top..self.y_bottom).contains(&coord.y)
    }
}

/// Output of a generation run
#[derive(Debug, Clone)]
pub struct GeneratedWorld {
    pub bounds: Bounds,
    pub map: TileMap,
    /// One ore per tier. Not placed in the map yet.
    pub ores: Vec<BlockKind>,
    pub stone_strokes: usize,
    pub dirt_strokes: usize,
    /// Circles drawn across all strokes
    pub patches: usize,
}

/// Scale `n` by a random factor in [0.75, 1.25] (sinusoidally distributed)
pub fn jitter<R: Rng + ?Sized>(rng: &mut R, n: f64) -> f64 {
    (n * (1.0 + (TAU * rng.random::<f64>()).sin() / 4.0)).abs()
}

/// Stroke length curve for stone in dirt; `u` is 0 at the top, 1 at the boundary
pub fn stone_steepness(u: f64) -> f64 {
    2f64.powf(5.0 * (2.0 * u - 1.0))
}

/// Stroke length curve for dirt in stone; `u` is 0 at the boundary, 1 at the bottom
pub fn dirt_steepness(u: f64) -> f64 {
    8.0 * (1.0 - u).powi(3)
}

/// One impurity band: which block is painted into which rows
struct Band {
    block: BlockKind,
    y_start: i32,
    y_end: i32,
    density: f64,
    steepness: fn(f64) -> f64,
}

impl Band {
    fn height(&self) -> i64 {
        self.y_end as i64 - self.y_start as i64
    }
}

/// The dirt-over-stone fill before any strokes are drawn
pub fn base_fill(bounds: Bounds) -> TileMap {
    let boundary = bounds.dirt_boundary();
    let mut map = TileMap::new();
    for x in bounds.x_left..bounds.x_right {
        for y in bounds.y_top..bounds.y_bottom {
            let block = if y < boundary {
                BlockKind::dirt()
            } else {
                BlockKind::stone()
            };
            map.insert(GridCoord::new(x, y), TileRecord::new(block, 0));
        }
    }
    map
}

/// Generate a world from the caller's random source
pub fn generate<R: Rng + ?Sized>(bounds: Bounds, rng: &mut R) -> GeneratedWorld {
    let boundary = bounds.dirt_boundary();
    log::info!("Dirt is generated until: y = {}", boundary);

    let mut map = base_fill(bounds);
    let mut patches = 0;

    let stone_in_dirt = Band {
        block: BlockKind::stone(),
        y_start: bounds.y_top,
        y_end: boundary,
        density: STONE_IN_DIRT_DENSITY,
        steepness: stone_steepness,
    };
    let dirt_in_stone = Band {
        block: BlockKind::dirt(),
        y_start: boundary,
        y_end: bounds.y_bottom,
        density: DIRT_IN_STONE_DENSITY,
        steepness: dirt_steepness,
    };

    let stone_strokes = stroke_count(&stone_in_dirt, bounds, rng);
    log::info!("Stone strokes in dirt: {}", stone_strokes);
    for _ in 0..stone_strokes {
        patches += draw_band_stroke(&mut map, bounds, &stone_in_dirt, rng);
    }

    let dirt_strokes = stroke_count(&dirt_in_stone, bounds, rng);
    log::info!("Dirt strokes in stone: {}", dirt_strokes);
    for _ in 0..dirt_strokes {
        patches += draw_band_stroke(&mut map, bounds, &dirt_in_stone, rng);
    }

    let ores = choose_world_ores(rng);
    log::info!(
        "This world contains the ores: {}",
        ores.iter().map(BlockKind::as_str).collect::<Vec<_>>().join(", ")
    );

    GeneratedWorld {
        bounds,
        map,
        ores,
        stone_strokes,
        dirt_strokes,
        patches,
    }
}

/// Generate with a fixed seed (reproducible)
pub fn generate_seeded(bounds: Bounds, seed: u64) -> GeneratedWorld {
    let mut rng = Pcg32::seed_from_u64(seed);
    generate(bounds, &mut rng)
}

/// Generate from the thread-local entropy source
pub fn generate_random(bounds: Bounds) -> GeneratedWorld {
    generate(bounds, &mut rand::rng())
}

/// Pick one ore from each tier
pub fn choose_world_ores<R: Rng + ?Sized>(rng: &mut R) -> Vec<BlockKind> {
    ORE_TIERS
        .iter()
        .filter_map(|tier| tier.choose(rng).map(|ore| BlockKind::new(*ore)))
        .collect()
}

fn stroke_count<R: Rng + ?Sized>(band: &Band, bounds: Bounds, rng: &mut R) -> usize {
    let area = (bounds.width() * band.height()) as f64;
    jitter(rng, area * band.density) as usize
}

fn draw_band_stroke<R: Rng + ?Sized>(
    map: &mut TileMap,
    bounds: Bounds,
    band: &Band,
    rng: &mut R,
) -> usize {
    if band.height() <= 0 {
        return 0;
    }
    let origin = GridCoord::new(
        rng.random_range(bounds.x_left..bounds.x_right),
        rng.random_range(band.y_start..band.y_end),
    );
    let depth = (origin.y as i64 - band.y_start as i64) as f64 / band.height() as f64;

    let budget = (jitter(rng, (band.steepness)(depth)) as i64).clamp(0, MAX_PATCHES_IN_STROKE);
    draw_stroke(map, bounds, origin, &band.block, budget, rng)
}

/// Draw one stroke of `budget + 1` circles starting at `origin`
///
/// A zero budget draws nothing. Returns the number of circles drawn.
fn draw_stroke<R: Rng + ?Sized>(
    map: &mut TileMap,
    bounds: Bounds,
    origin: GridCoord,
    block: &BlockKind,
    budget: i64,
    rng: &mut R,
) -> usize {
    if budget == 0 {
        return 0;
    }

    let mut radius = (rng.random_range(9..=50) as f64 / rng.random_range(9..=12) as f64).floor();
    let mut center = origin;
    let mut drawn = 0;

    for count in 0..=budget {
        fill_circle(map, bounds, center, radius, block);
        drawn += 1;

        if count < budget {
            // Lower half-plane angle; the horizontal side is re-rolled
            let direction = PI * (1.0 + rng.random::<f64>());
            let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
            let dx = sign * radius / 2.0 * direction.cos();
            let dy = radius / 2.0 * direction.sin();
            center = GridCoord::new(
                (center.x as f64 + dx).floor() as i32,
                (center.y as f64 + dy).floor() as i32,
            );
            radius = jitter(rng, radius).clamp(MIN_PATCH_RADIUS, MAX_PATCH_RADIUS);
        }
    }
    drawn
}

/// Paint every in-bounds cell with squared distance <= ceil(radius^2)
fn fill_circle(map: &mut TileMap, bounds: Bounds, center: GridCoord, radius: f64, block: &BlockKind) {
    let reach = radius.ceil() as i64;
    let limit = (radius * radius).ceil() as i64;
    let (cx, cy) = (center.x as i64, center.y as i64);

    // Scan range clipped to the bounds, in i64 so edge-of-range maps cannot overflow
    let x_range = (cx - reach).max(bounds.x_left as i64)..=(cx + reach).min(bounds.x_right as i64 - 1);
    let y_range = (cy - reach).max(bounds.y_top as i64)..=(cy + reach).min(bounds.y_bottom as i64 - 1);

    for x in x_range {
        for y in y_range.clone() {
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy <= limit {
                // Both halves lie inside the i32 bounds
                map.insert(GridCoord::new(x as i32, y as i32), TileRecord::new(block.clone(), 0));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence;
    use proptest::prelude::*;

    #[test]
    fn test_degenerate_bounds_rejected() {
        assert!(matches!(
            Bounds::new(5, 5, 0, 10),
            Err(GenerateError::DegenerateBounds { .. })
        ));
        assert!(Bounds::new(0, 10, 10, 3).is_err());
        assert!(Bounds::new(-3, -2, -1, 0).is_ok());
    }

    #[test]
    fn test_base_fill_ten_by_ten() {
        let bounds = Bounds::new(0, 10, 0, 10).unwrap();
        assert_eq!(bounds.dirt_boundary(), 5);

        let map = base_fill(bounds);
        assert_eq!(map.len(), 100);
        assert_eq!(map.tile_at(GridCoord::new(0, 0)).unwrap().block, BlockKind::dirt());
        assert_eq!(map.tile_at(GridCoord::new(0, 4)).unwrap().block, BlockKind::dirt());
        assert_eq!(map.tile_at(GridCoord::new(0, 5)).unwrap().block, BlockKind::stone());
        assert_eq!(map.tile_at(GridCoord::new(0, 9)).unwrap().block, BlockKind::stone());

        let world = generate_seeded(bounds, 7);
        assert_eq!(world.map.len(), 100);
    }

    #[test]
    fn test_dirt_boundary_floors_negative() {
        let bounds = Bounds::new(0, 1, -5, 0).unwrap();
        assert_eq!(bounds.dirt_boundary(), -3);
    }

    #[test]
    fn test_jitter_stays_within_quarter() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..1000 {
            let j = jitter(&mut rng, 40.0);
            assert!((30.0..=50.0).contains(&j), "{j}");
        }
        assert_eq!(jitter(&mut rng, 0.0), 0.0);
    }

    #[test]
    fn test_steepness_curves() {
        assert!((stone_steepness(0.0) - 1.0 / 32.0).abs() < 1e-12);
        assert!((stone_steepness(0.5) - 1.0).abs() < 1e-12);
        assert!((stone_steepness(1.0) - 32.0).abs() < 1e-12);
        assert_eq!(dirt_steepness(0.0), 8.0);
        assert_eq!(dirt_steepness(1.0), 0.0);
    }

    #[test]
    fn test_fill_circle_uses_ceiling() {
        let bounds = Bounds::new(-10, 10, -10, 10).unwrap();
        let block = BlockKind::new("marker");
        let count = |radius: f64| {
            let mut map = TileMap::new();
            fill_circle(&mut map, bounds, GridCoord::new(0, 0), radius, &block);
            map.len()
        };
        assert_eq!(count(0.0), 1);
        assert_eq!(count(1.0), 5);
        // ceil(1.5^2) = 3 takes in the diagonals
        assert_eq!(count(1.5), 9);
        assert_eq!(count(2.0), 13);
    }

    #[test]
    fn test_fill_circle_skips_out_of_bounds() {
        let bounds = Bounds::new(0, 3, 0, 3).unwrap();
        let mut map = TileMap::new();
        fill_circle(&mut map, bounds, GridCoord::new(0, 0), 5.0, &BlockKind::stone());
        assert_eq!(map.len(), 9);
        assert!(map.iter_sorted().iter().all(|(c, _)| bounds.contains(*c)));
    }

    #[test]
    fn test_bounds_at_the_edge_of_i32() {
        for bounds in [
            Bounds::new(i32::MAX - 300, i32::MAX, 0, 160).unwrap(),
            Bounds::new(i32::MIN, i32::MIN + 300, i32::MAX - 160, i32::MAX).unwrap(),
        ] {
            let world = generate_seeded(bounds, 2024);
            assert_eq!(world.map.len() as i64, bounds.width() * bounds.height());
            assert!(world.map.iter_sorted().iter().all(|(c, _)| bounds.contains(*c)));
        }
    }

    #[test]
    fn test_fill_circle_at_i32_max_corner() {
        let bounds = Bounds::new(i32::MAX - 3, i32::MAX, i32::MAX - 3, i32::MAX).unwrap();
        let mut map = TileMap::new();
        fill_circle(
            &mut map,
            bounds,
            GridCoord::new(i32::MAX - 1, i32::MAX - 1),
            5.0,
            &BlockKind::stone(),
        );
        assert_eq!(map.len(), 9);
    }

    #[test]
    fn test_zero_budget_draws_nothing() {
        let bounds = Bounds::new(0, 10, 0, 10).unwrap();
        let mut map = TileMap::new();
        let mut rng = Pcg32::seed_from_u64(3);
        let drawn = draw_stroke(&mut map, bounds, GridCoord::new(5, 5), &BlockKind::stone(), 0, &mut rng);
        assert_eq!(drawn, 0);
        assert!(map.is_empty());

        let drawn = draw_stroke(&mut map, bounds, GridCoord::new(5, 5), &BlockKind::stone(), 4, &mut rng);
        assert_eq!(drawn, 5);
        assert!(map.is_tile_at(GridCoord::new(5, 5)));
    }

    #[test]
    fn test_world_ores_one_per_tier() {
        let mut rng = Pcg32::seed_from_u64(11);
        let ores = choose_world_ores(&mut rng);
        assert_eq!(ores.len(), 4);
        for (ore, tier) in ores.iter().zip(ORE_TIERS.iter()) {
            assert!(tier.contains(&ore.as_str()));
        }
    }

    #[test]
    fn test_large_world_gets_impurities() {
        let bounds = Bounds::new(0, 300, 0, 160).unwrap();
        let world = generate_seeded(bounds, 2024);
        assert!(world.stone_strokes > 0);
        assert!(world.dirt_strokes > 0);
        assert_eq!(world.map.len(), 300 * 160);

        let boundary = bounds.dirt_boundary();
        let stone_above = world
            .map
            .iter_sorted()
            .iter()
            .filter(|(c, t)| c.y < boundary && t.block == BlockKind::stone())
            .count();
        let dirt_below = world
            .map
            .iter_sorted()
            .iter()
            .filter(|(c, t)| c.y >= boundary && t.block == BlockKind::dirt())
            .count();
        assert!(stone_above > 0 || dirt_below > 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_every_cell_exactly_once(
            x_left in -40i32..40,
            width in 1i32..40,
            y_top in -40i32..40,
            height in 1i32..40,
            seed in any::<u64>(),
        ) {
            let bounds = Bounds::new(x_left, x_left + width, y_top, y_top + height).unwrap();
            let world = generate_seeded(bounds, seed);
            prop_assert_eq!(world.map.len() as i64, bounds.width() * bounds.height());
            for x in bounds.x_left()..bounds.x_right() {
                for y in bounds.y_top()..bounds.y_bottom() {
                    let tile = world.map.tile_at(GridCoord::new(x, y));
                    prop_assert!(tile.is_some());
                    prop_assert_eq!(tile.map(|t| t.variant), Some(0));
                }
            }
        }

        #[test]
        fn prop_same_seed_same_world(seed in any::<u64>()) {
            let bounds = Bounds::new(-20, 60, 0, 50).unwrap();
            let a = generate_seeded(bounds, seed);
            let b = generate_seeded(bounds, seed);
            prop_assert_eq!(&a.map, &b.map);
            prop_assert_eq!(&a.ores, &b.ores);
            prop_assert_eq!(
                persistence::encode(&a.map).unwrap(),
                persistence::encode(&b.map).unwrap()
            );
        }
    }
}
