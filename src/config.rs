use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Database path used when neither `DB` nor the config file names one.
const DEFAULT_DB_PATH: &str = "./db/roster.db";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub server: ServerConfig,
  #[serde(default)]
  pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  /// Base URL the terminal UI talks to
  #[serde(default = "default_url")]
  pub url: String,
  /// Address `roster serve` binds
  #[serde(default = "default_listen")]
  pub listen: String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      url: default_url(),
      listen: default_listen(),
    }
  }
}

fn default_url() -> String {
  "http://127.0.0.1:3000".to_string()
}

fn default_listen() -> String {
  "127.0.0.1:3000".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfig {
  pub path: Option<PathBuf>,
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./roster.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/roster/config.yaml
  ///
  /// Every setting has a default, so a missing config file is fine.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("roster.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("roster").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }

  /// The database path the service uses.
  ///
  /// The `DB` environment variable wins over the config file; absent both,
  /// a default relative path is used.
  pub fn database_path(&self) -> PathBuf {
    if let Some(db) = std::env::var_os("DB") {
      return PathBuf::from(db);
    }

    self
      .database
      .path
      .clone()
      .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH))
  }
}
