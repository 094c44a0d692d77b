//! Headless platformer demo
//!
//! Loads a level and plays a scripted run through it at 60 Hz, logging what
//! a renderer would be told to draw.
//!
//! Usage: `platformer_demo [LEVEL.ron] [CONFIG.toml|CONFIG.ron]`

use platformer_engine::config::{Config, ConfigError, GameConfig};
use platformer_engine::foundation::logging;
use platformer_engine::level::{LevelData, LevelError};
use platformer_engine::movement::InputState;
use platformer_engine::render::RenderCommand;
use platformer_engine::LevelRunner;
use std::sync::Arc;
use thiserror::Error;

const DEFAULT_LEVEL: &str = "assets/level1.ron";
const DEFAULT_CONFIG: &str = "config/game.toml";

/// Frames simulated before the demo gives up
const MAX_FRAMES: u64 = 60 * 60;

#[derive(Error, Debug)]
enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("level error: {0}")]
    Level(#[from] LevelError),
}

/// Scripted input: run right, hop every second, restart once halfway
struct Script;

impl Script {
    fn input(frame: u64) -> InputState {
        InputState {
            left: false,
            right: true,
            up: frame % 60 < 6,
            restart: frame == MAX_FRAMES / 2,
        }
    }
}

#[derive(Debug, Default)]
struct RunSummary {
    frames: u64,
    restarts: u32,
    despawned: usize,
    completed_at: Option<u64>,
}

fn run(runner: &mut LevelRunner, tick_rate: f32) -> Result<RunSummary, AppError> {
    let delta_time = 1.0 / tick_rate;
    let mut summary = RunSummary::default();

    for frame in 0..MAX_FRAMES {
        let report = runner.tick(Script::input(frame), delta_time)?;
        summary.frames += 1;

        for command in &report.commands {
            match command {
                RenderCommand::DespawnEntity(_) => summary.despawned += 1,
                RenderCommand::SetText { text, .. } if !text.is_empty() => log::info!("HUD: {}", text),
                RenderCommand::ShowBanner { text } => log::info!("Banner: {}", text),
                RenderCommand::ResetScene => log::info!("Scene reset at frame {}", frame),
                other => log::trace!("{:?}", other),
            }
        }

        if report.restarted {
            summary.restarts += 1;
        }
        if report.level_complete && summary.completed_at.is_none() {
            summary.completed_at = Some(frame);
        }
    }
    Ok(summary)
}

fn main() -> Result<(), AppError> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let level_path = args.next().unwrap_or_else(|| DEFAULT_LEVEL.to_string());
    let config = match args.next() {
        Some(path) => GameConfig::load_from_file(&path)?,
        None => GameConfig::load_or_default(DEFAULT_CONFIG),
    };

    let tick_rate = config.physics.tick_rate.max(1) as f32;
    let level = Arc::new(LevelData::load(&level_path)?);
    let mut runner = LevelRunner::new(level, Arc::new(config))?;

    log::info!("Running '{}' for {} frames", runner.session().level().name, MAX_FRAMES);
    let summary = run(&mut runner, tick_rate)?;

    log::info!(
        "Finished after {} frames ({:.1}s): {} restarts, {} entities consumed, completed at {:?}",
        summary.frames,
        runner.clock(),
        summary.restarts,
        summary.despawned,
        summary.completed_at
    );
    log::info!(
        "Final session {}: {} coins, key: {}, power-up: {}",
        runner.session().generation(),
        runner.session().tracker().coin_count(),
        runner.session().player().has_key,
        runner.session().tracker().power_up_active()
    );
    Ok(())
}
