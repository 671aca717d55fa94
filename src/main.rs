use std::path::PathBuf;

use anyhow::{bail, Context};
use boomer::config::GameConfig;
use boomer::constants::LOOP_TIME;
use boomer::game::Game;
use boomer::map::generator::MapGenerator;
use boomer::map::level::LevelDescription;
use tracing::{debug, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const USAGE: &str = "usage: boomer [--level <file.json|file.map> | --seed <n>] [--config <file.json>] [--seconds <n>]";

/// Command-line options for the headless runner.
#[derive(Debug, Default)]
struct Options {
    level: Option<PathBuf>,
    seed: Option<u64>,
    config: Option<PathBuf>,
    seconds: f32,
}

fn parse_args() -> anyhow::Result<Options> {
    let mut options = Options {
        seconds: 30.0,
        ..Options::default()
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        let mut value = || args.next().with_context(|| format!("missing value for {arg}\n{USAGE}"));
        match arg.as_str() {
            "--level" => options.level = Some(PathBuf::from(value()?)),
            "--seed" => options.seed = Some(value()?.parse().context("--seed expects an integer")?),
            "--config" => options.config = Some(PathBuf::from(value()?)),
            "--seconds" => options.seconds = value()?.parse().context("--seconds expects a number")?,
            "--help" | "-h" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => bail!("unknown argument {other}\n{USAGE}"),
        }
    }

    Ok(options)
}

pub fn main() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(subscriber)
        .with(ErrorLayer::default())
        .init();

    let options = parse_args()?;

    let mut config = match &options.config {
        Some(path) => GameConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if options.seed.is_some() {
        config.seed = options.seed;
    }

    let description = match (&options.level, options.seed) {
        (Some(path), _) => LevelDescription::load(path).with_context(|| format!("loading level {}", path.display()))?,
        (None, Some(seed)) => MapGenerator::standard(seed)
            .generate_level()
            .context("generating level")?,
        (None, None) => LevelDescription::default_board().context("loading the default board")?,
    };

    let mut game = Game::new(&description, config).context("building level")?;

    let dt = LOOP_TIME.as_secs_f32();
    let ticks = (options.seconds.max(0.0) / dt).ceil() as u64;
    info!(ticks, dt, "Starting headless run");

    for tick in 0..ticks {
        game.tick(dt);
        for event in game.drain_events() {
            debug!(tick, ?event, sound = event.sound_name(), "Game event");
        }
        if game.status() != boomer::systems::GameStatus::Playing {
            break;
        }
    }

    let stats = game.level_stats();
    info!(
        status = game.status().as_ref(),
        kills = stats.kills,
        total_enemies = stats.total_enemies,
        elapsed = stats.elapsed,
        "Run finished"
    );

    Ok(())
}
