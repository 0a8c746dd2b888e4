//! Flying Objects entry point
//!
//! Headless host: loads settings and images, builds the world and runs the
//! frame loop with a scripted keyboard, logging what happens. Frames are
//! paced to the target rate unless `--unpaced` is given. A windowed host
//! plugs its own keyboard polling and [`Canvas`] into the same loop.
//!
//! [`Canvas`]: flying_objects::render::Canvas

use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;
use log::{debug, error, info, trace, warn};

use flying_objects::Settings;
use flying_objects::assets::{ImageStore, PLAYER_IMAGE};
use flying_objects::input::{Key, KeyboardState};
use flying_objects::render::{DrawCommand, draw_world};
use flying_objects::settings::DEFAULT_SETTINGS_PATH;
use flying_objects::sim::{SimEvent, World, tick};

/// Bouncing balls, bullets and a steerable player
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Play area width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Play area height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Target frames per second
    #[arg(long)]
    fps: Option<u32>,

    /// Grid cell size in pixels
    #[arg(long)]
    grid: Option<u32>,

    /// RNG seed (0 picks one from the clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 10.0)]
    seconds: f32,

    /// Settings file
    #[arg(long, value_name = "PATH", default_value = DEFAULT_SETTINGS_PATH)]
    settings: PathBuf,

    /// Directory holding the image files
    #[arg(long, value_name = "DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Step frames as fast as possible instead of at the target rate
    #[arg(long)]
    unpaced: bool,

    /// Write the final world as JSON
    #[arg(long, value_name = "PATH")]
    dump: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    info!("Flying Objects (headless) starting...");

    let first_run = !cli.settings.exists();
    let mut settings = Settings::load(&cli.settings);
    if first_run {
        if let Err(err) = settings.save(&cli.settings) {
            warn!("Cannot save {}: {}", cli.settings.display(), err);
        }
    }
    if let Some(width) = cli.width {
        settings.width = width;
    }
    if let Some(height) = cli.height {
        settings.height = height;
    }
    if let Some(fps) = cli.fps {
        settings.fps = fps;
    }
    if let Some(grid) = cli.grid {
        settings.grid = grid;
    }
    if let Some(seed) = cli.seed {
        settings.seed = seed;
    }
    let settings = settings.sanitized();

    let images = match ImageStore::load_required(&cli.data_dir) {
        Ok(images) => images,
        Err(err) => {
            error!("{err}");
            error!(
                "please make sure {} holds the image files",
                cli.data_dir.display()
            );
            std::process::exit(1);
        }
    };
    for image in images.iter() {
        debug!("image {} ({} bytes)", image.name, image.bytes.len());
    }

    let seed = if settings.seed == 0 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(1)
    } else {
        settings.seed
    };
    info!(
        "{}x{} at {} fps, grid {}, seed {}",
        settings.width, settings.height, settings.fps, settings.grid, seed
    );

    let mut world = World::with_size(settings.width, settings.height, settings.grid, seed);
    world.populate_demo_scene();
    if let Some(player) = world.player.and_then(|id| world.lookup_mut(id)) {
        player.sprite = images.index_of(PLAYER_IMAGE);
    }

    let dt = settings.frame_seconds();
    let frame_time = Duration::from_secs_f32(dt);
    let frames = (cli.seconds.max(0.0) * settings.fps as f32).round() as u64;
    let mut keys = KeyboardState::new();
    let mut canvas: Vec<DrawCommand> = Vec::new();

    for frame in 0..frames {
        let started = Instant::now();
        script_keys(&mut keys, frame, settings.fps as u64);
        if keys.quit_requested() {
            info!("Quit requested");
            break;
        }
        let input = keys.to_tick_input();
        keys.end_frame();

        tick(&mut world, &input, dt);
        log_events(world.drain_events());

        canvas.clear();
        draw_world(&world, &mut canvas, settings.trails);
        trace!("frame {}: {} draw commands", world.frame, canvas.len());

        if world.frame % settings.fps as u64 == 0 {
            report(&world);
        }

        if !cli.unpaced {
            if let Some(rest) = frame_time.checked_sub(started.elapsed()) {
                std::thread::sleep(rest);
            }
        }
    }

    info!(
        "Done after {} frames ({:.2}s, seed {}): {} bodies, {} health bars",
        world.frame,
        world.time,
        world.seed,
        world.bodies().len(),
        world.health_bars().len()
    );

    if let Some(path) = &cli.dump {
        match serde_json::to_string_pretty(&world.snapshot()) {
            Ok(json) => match std::fs::write(path, json) {
                Ok(()) => info!("World written to {}", path.display()),
                Err(err) => error!("Cannot write {}: {}", path.display(), err),
            },
            Err(err) => error!("Cannot serialize world: {err}"),
        }
    }
}

/// Demo keyboard: steer around, shoot, add balls and bullets, glide, stop
fn script_keys(keys: &mut KeyboardState, frame: u64, fps: u64) {
    let second = frame / fps;
    let within = frame % fps;

    let thrust = if second % 4 < 2 { Key::W } else { Key::E };
    for key in [Key::W, Key::E] {
        if key != thrust {
            keys.release(key);
        }
    }
    keys.press(thrust);

    if within < fps / 3 {
        keys.press(Key::A);
    } else {
        keys.release(Key::A);
    }

    let taps: &[Key] = match (second, within) {
        (_, 0) => &[Key::Space],
        (2, 5) => &[Key::B],
        (3, 5) => &[Key::C],
        (4, 5) => &[Key::Right],
        (6, 5) => &[Key::Return],
        _ => &[],
    };
    for &key in taps {
        keys.release(key);
        keys.press(key);
    }
    // Taps are released right away so they can repeat
    for key in [Key::Space, Key::B, Key::C, Key::Right, Key::Return] {
        if !taps.contains(&key) {
            keys.release(key);
        }
    }
}

fn log_events(events: Vec<SimEvent>) {
    for event in events {
        match event {
            SimEvent::Spawned { id, kind } => debug!("+ {kind:?} #{id}"),
            SimEvent::HealthBarSpawned { id, owner } => debug!("+ health bar #{id} for #{owner}"),
            SimEvent::Collision { first, second } => trace!("collision #{first} x #{second}"),
            SimEvent::Destroyed { id, reason } => info!("- #{id} ({reason:?})"),
        }
    }
}

fn report(world: &World) {
    let Some(player) = world.player.and_then(|id| world.lookup(id)) else {
        info!("t={:.1}s bodies={} (no player)", world.time, world.bodies().len());
        return;
    };
    let cell = world
        .grid
        .cell_at(player.pos)
        .map_or_else(|| "-".to_string(), |(col, row)| format!("{col},{row}"));
    info!(
        "t={:.1}s bodies={} player: cell {} x {:.2} y {:.2} dx {:.2} dy {:.2} ddx {:.2} ddy {:.2} hp {}",
        world.time,
        world.bodies().len(),
        cell,
        player.pos.x,
        player.pos.y,
        player.vel.x,
        player.vel.y,
        player.acc.x,
        player.acc.y,
        player.hitpoints
    );
}
