//! Application configuration and tuning constants.
//!
//! Runtime settings resolve with priority: config.toml > environment (.env) > default.

use serde::Deserialize;
use std::path::PathBuf;

use crate::paths;
use crate::scoring::CheckMode;

// ==================== File Configuration ====================

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
  database: Option<DatabaseSection>,
  server: Option<ServerSection>,
  practice: Option<PracticeSection>,
}

#[derive(Debug, Deserialize)]
struct DatabaseSection {
  path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServerSection {
  port: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct PracticeSection {
  check_mode: Option<String>,
}

/// Resolved runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
  pub database_path: PathBuf,
  pub port: u16,
  pub check_mode: CheckMode,
}

impl Settings {
  /// Load settings from `config.toml` in the working directory, the
  /// environment and built-in defaults.
  pub fn load() -> Self {
    let _ = dotenvy::dotenv();

    let file = match std::fs::read_to_string("config.toml") {
      Ok(contents) => parse_file_config(&contents),
      Err(_) => FileConfig::default(),
    };
    Self::resolve(file, |key| std::env::var(key).ok())
  }

  fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
    let database_path = match file.database.and_then(|d| d.path) {
      Some(path) => {
        tracing::info!("Using database from config.toml: {}", path);
        PathBuf::from(path)
      }
      None => match env("DATABASE_PATH") {
        Some(path) => {
          tracing::info!("Using database from DATABASE_PATH env: {}", path);
          PathBuf::from(path)
        }
        None => PathBuf::from(paths::db_path()),
      },
    };

    let port = file
      .server
      .and_then(|s| s.port)
      .or_else(|| env("PORT").and_then(|p| p.parse().ok()))
      .unwrap_or(DEFAULT_PORT);

    let check_mode = file
      .practice
      .and_then(|p| p.check_mode)
      .or_else(|| env("CHECK_MODE"))
      .and_then(|m| {
        let parsed = CheckMode::from_str(&m);
        if parsed.is_none() {
          tracing::warn!("Unknown check mode '{}', falling back to strict", m);
        }
        parsed
      })
      .unwrap_or_default();

    Self {
      database_path,
      port,
      check_mode,
    }
  }

  /// Full server bind address
  pub fn bind_addr(&self) -> String {
    format!("{}:{}", SERVER_ADDR, self.port)
  }
}

fn parse_file_config(contents: &str) -> FileConfig {
  match toml::from_str::<FileConfig>(contents) {
    Ok(config) => config,
    Err(e) => {
      tracing::warn!("Ignoring malformed config.toml: {}", e);
      FileConfig::default()
    }
  }
}

// ==================== Server Configuration ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Server port when neither config.toml nor PORT set one
pub const DEFAULT_PORT: u16 = 3000;

/// Review and cloze sessions idle longer than this are discarded
pub const SESSION_EXPIRY_HOURS: i64 = 2;

// ==================== Scheduling ====================

/// Interval (days) from which an entry counts as mature
pub const MATURE_INTERVAL_DAYS: u32 = 21;

// ==================== Analytics ====================

/// Daily history records older than this many days are dropped
pub const HISTORY_WINDOW_DAYS: i64 = 30;

/// Days shown in the practice heatmap
pub const HEATMAP_DAYS: i64 = 30;

/// Entries below this accuracy (percent) are weak spots
pub const WEAK_SPOT_ACCURACY: u32 = 70;

/// Minimum attempts before an entry can be a weak spot
pub const WEAK_SPOT_MIN_ATTEMPTS: u64 = 2;

/// Weak spots listed on the analytics view
pub const WEAK_SPOT_LIMIT: usize = 5;

// ==================== Smart Features ====================

/// Similarity at which an existing entry is reported as a duplicate
pub const DUPLICATE_THRESHOLD: f64 = 0.8;

/// Looser threshold used when checking a new entry before it is added
pub const DUPLICATE_THRESHOLD_ON_ADD: f64 = 0.7;

/// Related entries listed per entry
pub const RELATED_LIMIT: usize = 5;

// ==================== Cloze ====================

/// Default share of words hidden in cloze practice (percent)
pub const CLOZE_DEFAULT_DIFFICULTY: u8 = 30;
