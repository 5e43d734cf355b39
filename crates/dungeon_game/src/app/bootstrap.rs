use std::io::{self, Write};

use dungeon_engine::{PersistenceError, World, WorldId, WorldStore};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::config::{ConfigError, GameConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LaunchMode {
    New,
    Load(WorldId),
    List,
    Help,
}

#[derive(Debug, Error)]
pub(crate) enum StartupError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("no save with id {0}")]
    SaveNotFound(WorldId),
    #[error("terminal i/o failed: {0}")]
    Terminal(#[source] io::Error),
}

/// Logs go to stderr so they never interleave with the frame on stdout.
pub(crate) fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

pub(crate) fn parse_args(args: &[String]) -> Result<LaunchMode, StartupError> {
    let Some(command) = args.first() else {
        return Ok(LaunchMode::New);
    };
    let rest = &args[1..];

    match command.as_str() {
        "-h" | "--help" | "help" => Ok(LaunchMode::Help),
        "new" => {
            if !rest.is_empty() {
                return Err(StartupError::Usage("new takes no arguments".to_string()));
            }
            Ok(LaunchMode::New)
        }
        "list" => {
            if !rest.is_empty() {
                return Err(StartupError::Usage("list takes no arguments".to_string()));
            }
            Ok(LaunchMode::List)
        }
        "load" => {
            let [raw_id] = rest else {
                return Err(StartupError::Usage("load requires exactly one save id".to_string()));
            };
            let id = raw_id.parse::<u64>().map_err(|_| {
                StartupError::Usage(format!("invalid save id '{raw_id}' (expected u64)"))
            })?;
            Ok(LaunchMode::Load(WorldId(id)))
        }
        other => Err(StartupError::Usage(format!("unknown subcommand '{other}'"))),
    }
}

pub(crate) fn usage_text() -> String {
    [
        "dungeon_game - turn-based dungeon crawl",
        "",
        "Usage:",
        "  dungeon_game [new]",
        "  dungeon_game load <id>",
        "  dungeon_game list",
        "",
        "Environment:",
        "  DUNGEON_SAVE_DIR    save directory (default: saves)",
        "  DUNGEON_WORLD_SIZE  <w>x<h> for new worlds (default: 60x30)",
        "  DUNGEON_VIEW_SIZE   <w>x<h> viewport (default: 40x20)",
        "  RUST_LOG            log filter (default: info)",
    ]
    .join("\n")
}

pub(crate) fn open_world<S: WorldStore>(
    mode: &LaunchMode,
    config: &GameConfig,
    store: &S,
) -> Result<World, StartupError> {
    match *mode {
        LaunchMode::Load(id) => {
            let mut world = store.load(id)?.ok_or(StartupError::SaveNotFound(id))?;
            world.add_message("Game loaded.");
            Ok(world)
        }
        LaunchMode::New | LaunchMode::List | LaunchMode::Help => {
            let mut world = World::generate(config.world_width, config.world_height);
            info!(
                width = world.width(),
                height = world.height(),
                "new_game_started"
            );
            world.add_message("Welcome to the dungeon. Type ? for help.");
            Ok(world)
        }
    }
}

pub(crate) fn write_save_list<S: WorldStore, W: Write>(
    store: &S,
    output: &mut W,
) -> Result<(), StartupError> {
    let saves = store.list_saves()?;
    let write_all = |output: &mut W| -> io::Result<()> {
        if saves.is_empty() {
            writeln!(output, "no saves")?;
        }
        for save in &saves {
            writeln!(
                output,
                "{:>4}  {}  (saved at unix {})",
                save.id, save.name, save.last_saved_unix_secs
            )?;
        }
        output.flush()
    };
    write_all(output).map_err(StartupError::Terminal)
}
