//! Spielplatz entry point
//!
//! Generates a procedural world, saves it under an alias, reloads it and
//! drops a player onto the surface as a smoke run of the simulation.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use glam::Vec2;

use spielplatz::Settings;
use spielplatz::persistence;
use spielplatz::sim::{self, Bounds, TickInput, World};

/// Seconds of simulated time for the landing check
const SETTLE_SECONDS: u64 = 5;

/// Generate, save and reload a procedural tile world
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding one sub-directory per map alias
    #[arg(long, value_name = "DIR", default_value = "data/maps")]
    out: PathBuf,

    /// Name the map is saved under
    #[arg(long, value_name = "NAME", default_value = "procedural")]
    alias: String,

    /// Fixed seed; omit for a fresh random world
    #[arg(long)]
    seed: Option<u64>,

    /// World width in tiles
    #[arg(long, value_name = "TILES", default_value_t = 300, value_parser = clap::value_parser!(i32).range(1..))]
    width: i32,

    /// World height in tiles
    #[arg(long, value_name = "TILES", default_value_t = 160, value_parser = clap::value_parser!(i32).range(1..))]
    height: i32,

    /// Settings JSON; defaults are used when omitted or unreadable
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let settings = match &args.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };

    let bounds = Bounds::new(0, args.width, 0, args.height)?;
    let generated = match args.seed {
        Some(seed) => {
            log::info!("Generating {}x{} world with seed {}", args.width, args.height, seed);
            sim::generate_seeded(bounds, seed)
        }
        None => {
            log::info!("Generating {}x{} world", args.width, args.height);
            sim::generate_random(bounds)
        }
    };
    log::info!(
        "{} stone strokes, {} dirt strokes, {} patches",
        generated.stone_strokes,
        generated.dirt_strokes,
        generated.patches
    );

    persistence::save_map(&args.out, &args.alias, &generated.map)?;
    let map = persistence::try_load_map(&args.out, &args.alias)?;
    log::info!("Reloaded '{}' with {} tiles", args.alias, map.len());

    // Drop a player onto the middle of the surface
    let ts = settings.tile_size as f32;
    let spawn = Vec2::new((args.width / 2) as f32 * ts, -3.0 * ts);
    let ticks = SETTLE_SECONDS * settings.fps as u64;
    let mut world = World::new(settings, map, spawn, false);
    for _ in 0..ticks {
        sim::tick(&mut world, &TickInput::default())?;
    }
    let (origin, size) = world.settings.viewport_around(world.player.body.center());
    let on_screen = world
        .map
        .visible(origin, size, world.settings.tile_size)
        .count();
    log::info!("{} tiles in the {}x{} view", on_screen, size.x, size.y);

    let feet = world.player.body.rect().bottom();
    log::info!(
        "Player settled at ({:.1}, {:.1}) after {} ticks{}",
        world.player.body.pos.x,
        world.player.body.pos.y,
        world.time_ticks,
        if world.player.body.collisions.down || world.player.air_time <= 1 {
            format!(", standing on y = {feet}")
        } else {
            String::from(", still falling")
        }
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["spielplatz"]).unwrap();
        assert_eq!(args.out, PathBuf::from("data/maps"));
        assert_eq!(args.alias, "procedural");
        assert_eq!((args.width, args.height), (300, 160));
        assert!(args.seed.is_none());
        assert!(args.settings.is_none());
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "spielplatz", "--seed", "42", "--alias", "cave", "--width", "64", "--settings", "s.json",
        ])
        .unwrap();
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.alias, "cave");
        assert_eq!(args.width, 64);
        assert_eq!(args.settings, Some(PathBuf::from("s.json")));
    }

    #[test]
    fn test_bad_input() {
        assert!(Args::try_parse_from(["spielplatz", "--seed"]).is_err());
        assert!(Args::try_parse_from(["spielplatz", "--width", "wide"]).is_err());
        assert!(Args::try_parse_from(["spielplatz", "--width", "0"]).is_err());
        assert!(Args::try_parse_from(["spielplatz", "--bogus"]).is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
