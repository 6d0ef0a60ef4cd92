//! Loading the exercise configuration (exercise data, drop policies, toasts) from TOML.
//!
//! Example:
//!
//! ```toml
//! [exercise]
//! paragraph = "The sky is [_input] and the grass is [_input]."
//! blanks = [
//!   { id = 1, correctAnswer = "blue" },
//!   { id = 2, correctAnswer = "green" },
//!   { id = 3, correctAnswer = "red", group = "table", label = "Ripe tomatoes are" },
//! ]
//! words = [{ word = "blue" }, { word = "green", color = "highlighted" }, { word = "red" }]
//!
//! [policy]
//! scoring = "paragraph"          # or "all"
//! accept = { paragraph = "strict", table = "permissive" }
//!
//! [notifications]
//! success_message = "Correct!"
//! auto_close_ms = 2000
//!
//! [sessions]
//! idle_ttl_secs = 1800
//! max_sessions = 10000
//! ```

use std::{path::Path, time::Duration};

use serde::Deserialize;
use tracing::{error, info};

use crate::dnd::GroupPolicies;
use crate::domain::{Blank, Exercise, ExerciseError, WordToken};
use crate::notify::NotificationSettings;
use crate::validation::ScoringScope;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
  /// Falls back to the built-in exercise when absent.
  #[serde(default)]
  pub exercise: Option<ExerciseCfg>,
  #[serde(default)]
  pub policy: PolicyCfg,
  #[serde(default)]
  pub notifications: NotificationSettings,
  #[serde(default)]
  pub sessions: SessionSettings,
}

/// Bounds on the in-memory session map.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionSettings {
  /// Sessions untouched for this long are dropped.
  pub idle_ttl_secs: u64,
  /// Upper bound on live sessions; the least recently used one makes room.
  pub max_sessions: usize,
}

impl Default for SessionSettings {
  fn default() -> Self {
    Self { idle_ttl_secs: 30 * 60, max_sessions: 10_000 }
  }
}

impl SessionSettings {
  pub fn idle_ttl(&self) -> Duration {
    Duration::from_secs(self.idle_ttl_secs)
  }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ExerciseCfg {
  pub paragraph: String,
  #[serde(default)]
  pub blanks: Vec<Blank>,
  #[serde(default)]
  pub words: Vec<WordToken>,
}

impl ExerciseCfg {
  pub fn build(self) -> Result<Exercise, ExerciseError> {
    Exercise::new(self.paragraph, self.blanks, self.words)
  }
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct PolicyCfg {
  #[serde(default)]
  pub accept: GroupPolicies,
  #[serde(default)]
  pub scoring: ScoringScope,
}

pub fn parse_config(s: &str) -> Result<AppConfig, toml::de::Error> {
  toml::from_str::<AppConfig>(s)
}

/// Attempt to load `AppConfig` from EXERCISE_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_from_env() -> Option<AppConfig> {
  let path = std::env::var("EXERCISE_CONFIG_PATH").ok()?;
  load_config_from_path(path)
}

pub fn load_config_from_path(path: impl AsRef<Path>) -> Option<AppConfig> {
  let path = path.as_ref().display().to_string();
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_config(&s) {
      Ok(cfg) => {
        info!(target: "cloze_backend", %path, "Loaded exercise config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "cloze_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "cloze_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
