//! # Vessels Main Entry Point
//!
//! Parses command line arguments, initializes logging, and runs the
//! macroquad frame loop around the [`SceneManager`].

use clap::Parser;
use macroquad::prelude::*;
use vessels::input::poll_events;
use vessels::{battle_layout, InputEvent, SceneManager, SceneType, VesselsResult};

/// Command line arguments for Vessels.
#[derive(Parser, Debug)]
#[command(name = "vessels")]
#[command(about = "A monster-collecting RPG of dice, scrolls, and tall grass")]
#[command(version)]
struct Args {
    /// Random seed for overworld generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[macroquad::main("Vessels")]
async fn main() -> VesselsResult<()> {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    log::info!("Starting Vessels v{}", vessels::VERSION);
    request_new_screen_size(1024.0, 768.0);
    set_pc_assets_folder("assets");

    let seed = args.seed.unwrap_or(vessels::config::DEFAULT_SEED);
    log::info!("Generating overworld with seed: {}", seed);

    let mut manager = SceneManager::new(seed);
    manager.load().await;

    loop {
        let events = poll_events();
        if manager.scene() == SceneType::Overworld
            && events.iter().any(|e| matches!(e, InputEvent::Cancel))
        {
            log::info!("Player quit the game");
            break;
        }

        let layout = battle_layout(screen_width(), screen_height());
        manager.update(get_time(), get_frame_time(), &events, layout);
        manager.draw();

        next_frame().await;
    }

    Ok(())
}

/// Initializes env_logger at the requested level, overridable via `RUST_LOG`.
fn initialize_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        _ => log::LevelFilter::Info,
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_level(level)
        .init();
}
