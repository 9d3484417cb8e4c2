use std::{
    fs,
    path::{Path, PathBuf},
};

use config::{Config, ConfigError, FileFormat};
use control_tower::{Terminal, TerminalLayout};
use directories::ProjectDirs;
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ApplicationError, ApplicationResult};

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

pub(crate) fn tower_service_project_dir() -> Option<ProjectDirs> {
    ProjectDirs::from("", "meltinglava", "tower_service")
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct TowerConfig {
    /// Used when `RUST_LOG` is not set.
    #[serde(default)]
    log_filter: Option<String>,
    terminal_a: TerminalLayout,
    terminal_b: TerminalLayout,
    terminal_c: TerminalLayout,
    international: TerminalLayout,
    private: TerminalLayout,
}

impl TowerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(config::File::from(path).required(true))
            .build()?
            .try_deserialize()
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(config::File::from_str(raw, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// The configuration the service ships with.
    pub fn embedded_default() -> Result<Self, ConfigError> {
        Self::from_toml_str(DEFAULT_CONFIG)
    }

    pub fn log_filter(&self) -> Option<&str> {
        self.log_filter.as_deref()
    }

    pub fn layouts(&self) -> IndexMap<Terminal, TerminalLayout> {
        IndexMap::from([
            (Terminal::A, self.terminal_a.clone()),
            (Terminal::B, self.terminal_b.clone()),
            (Terminal::C, self.terminal_c.clone()),
            (Terminal::International, self.international.clone()),
            (Terminal::Private, self.private.clone()),
        ])
    }
}

/// Loads the configuration from `explicit_path` if given, otherwise from
/// the per-user config directory (seeding it with the default on first run).
pub(crate) fn find_configuration(
    explicit_path: Option<&Path>,
    clean_config: bool,
) -> ApplicationResult<(TowerConfig, PathBuf)> {
    if let Some(path) = explicit_path {
        debug!(?path, "Using configuration file from the command line");
        return Ok((TowerConfig::load(path)?, path.to_path_buf()));
    }
    let dirs = tower_service_project_dir().ok_or(ApplicationError::NoConfigDirectory)?;
    setup_configuration(dirs.config_dir(), clean_config)
}

fn setup_configuration(
    config_dir: &Path,
    clean_config: bool,
) -> ApplicationResult<(TowerConfig, PathBuf)> {
    let config_file = config_dir.join("config.toml");
    if clean_config || !config_file.exists() {
        debug!(?config_file, clean_config, "Writing default configuration");
        fs::create_dir_all(config_dir)?;
        fs::write(&config_file, DEFAULT_CONFIG)?;
    }
    let config = TowerConfig::load(&config_file)?;
    Ok((config, config_file))
}
