use std::env;
use std::path::PathBuf;

use dungeon_engine::{DEFAULT_WORLD_HEIGHT, DEFAULT_WORLD_WIDTH, MAX_WORLD_SIDE};
use thiserror::Error;

pub(crate) const SAVE_DIR_ENV_VAR: &str = "DUNGEON_SAVE_DIR";
pub(crate) const WORLD_SIZE_ENV_VAR: &str = "DUNGEON_WORLD_SIZE";
pub(crate) const VIEW_SIZE_ENV_VAR: &str = "DUNGEON_VIEW_SIZE";

const DEFAULT_SAVE_DIR: &str = "saves";
const DEFAULT_VIEW_WIDTH: u32 = 40;
const DEFAULT_VIEW_HEIGHT: u32 = 20;
const MAX_VIEW_SIDE: u32 = 512;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GameConfig {
    pub(crate) save_dir: PathBuf,
    pub(crate) world_width: u32,
    pub(crate) world_height: u32,
    pub(crate) view_width: u32,
    pub(crate) view_height: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from(DEFAULT_SAVE_DIR),
            world_width: DEFAULT_WORLD_WIDTH,
            world_height: DEFAULT_WORLD_HEIGHT,
            view_width: DEFAULT_VIEW_WIDTH,
            view_height: DEFAULT_VIEW_HEIGHT,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ConfigError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("{var} must look like <width>x<height> with both sides in 1..={max}, got '{value}'")]
    InvalidSize {
        var: &'static str,
        value: String,
        max: u32,
    },
    #[error("{var} cannot be empty")]
    EmptyPath { var: &'static str },
}

impl GameConfig {
    pub(crate) fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var))
    }

    fn from_lookup(
        lookup: impl Fn(&'static str) -> Result<String, env::VarError>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = read_var(&lookup, SAVE_DIR_ENV_VAR)? {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(ConfigError::EmptyPath {
                    var: SAVE_DIR_ENV_VAR,
                });
            }
            config.save_dir = PathBuf::from(trimmed);
        }
        if let Some(raw) = read_var(&lookup, WORLD_SIZE_ENV_VAR)? {
            (config.world_width, config.world_height) =
                parse_size(WORLD_SIZE_ENV_VAR, &raw, MAX_WORLD_SIDE)?;
        }
        if let Some(raw) = read_var(&lookup, VIEW_SIZE_ENV_VAR)? {
            (config.view_width, config.view_height) =
                parse_size(VIEW_SIZE_ENV_VAR, &raw, MAX_VIEW_SIDE)?;
        }

        Ok(config)
    }
}

fn read_var(
    lookup: &impl Fn(&'static str) -> Result<String, env::VarError>,
    var: &'static str,
) -> Result<Option<String>, ConfigError> {
    match lookup(var) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(source) => Err(ConfigError::EnvVar { var, source }),
    }
}

fn parse_size(var: &'static str, raw: &str, max: u32) -> Result<(u32, u32), ConfigError> {
    let invalid = || ConfigError::InvalidSize {
        var,
        value: raw.to_string(),
        max,
    };
    let (width, height) = raw.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
    let width = width.trim().parse::<u32>().map_err(|_| invalid())?;
    let height = height.trim().parse::<u32>().map_err(|_| invalid())?;
    let in_range = |side: u32| (1..=max).contains(&side);
    if !in_range(width) || !in_range(height) {
        return Err(invalid());
    }
    Ok((width, height))
}
