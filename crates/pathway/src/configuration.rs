//! On-disk configuration for a [`Pathway`](crate::Pathway) instance.
//!
//! A configuration directory (by default `~/.pathway`) holds a single `config.toml`:
//!
//! ```toml
//! database_path = "/home/me/.local/share/pathway/pathway.db"
//! llm_host = "http://localhost:11434"
//! llm_model = "llama3.2:3b"
//! summary_timeout_secs = 30
//! default_weeks = 12
//! hours_per_week = 10
//! difficulty = "intermediate"
//! ```

use super::*;
use crate::{database::Database, generation::Difficulty, llm::Model};

/// File name of the configuration inside its directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Settings shared by the library and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Location of the SQLite database
  pub database_path:        PathBuf,
  /// Base URL of the Ollama service
  pub llm_host:             String,
  /// Model used by both AI collaborators
  pub llm_model:            Model,
  /// Upper bound on a single module summary call
  pub summary_timeout_secs: u64,
  /// Plan length used when a request does not name one
  pub default_weeks:        u32,
  /// Weekly study budget passed to roadmap generation
  pub hours_per_week:       u32,
  /// Default difficulty for generated content
  pub difficulty:           Difficulty,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      database_path:        Database::default_path(),
      llm_host:             llm::DEFAULT_HOST.to_string(),
      llm_model:            Model::default(),
      summary_timeout_secs: 30,
      default_weeks:        12,
      hours_per_week:       10,
      difficulty:           Difficulty::Intermediate,
    }
  }
}

impl Config {
  /// The default configuration directory, `~/.pathway`.
  pub fn default_path() -> Result<PathBuf> {
    dirs::home_dir()
      .map(|home| home.join(".pathway"))
      .ok_or_else(|| PathwayError::Config("could not determine home directory".to_string()))
  }

  /// Reads `config.toml` from the given directory.
  pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
    let path = dir.as_ref().join(CONFIG_FILE);
    debug!("Loading config from {}", path.display());
    let content = std::fs::read_to_string(&path)?;
    Ok(toml::from_str(&content)?)
  }

  /// Writes `config.toml` into the given directory, creating it if needed.
  pub fn save(&self, dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    std::fs::write(dir.join(CONFIG_FILE), toml::to_string_pretty(self)?)?;
    debug!("Saved config to {}", dir.display());
    Ok(())
  }

  /// Moves the database file.
  pub fn with_database_path(mut self, path: &Path) -> Self {
    self.database_path = path.to_path_buf();
    self
  }

  /// Points generation and summaries at another Ollama host.
  pub fn with_llm_host(mut self, host: impl Into<String>) -> Self {
    self.llm_host = host.into();
    self
  }

  /// Selects the chat model.
  pub fn with_llm_model(mut self, model: Model) -> Self {
    self.llm_model = model;
    self
  }

  /// Bounds each module summary call.
  pub fn with_summary_timeout(mut self, timeout: Duration) -> Self {
    self.summary_timeout_secs = timeout.as_secs();
    self
  }

  /// Sets the default plan length.
  pub fn with_default_weeks(mut self, weeks: u32) -> Self {
    self.default_weeks = weeks;
    self
  }

  /// Sets the weekly study budget.
  pub fn with_hours_per_week(mut self, hours: u32) -> Self {
    self.hours_per_week = hours;
    self
  }

  /// Sets the default difficulty.
  pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
    self.difficulty = difficulty;
    self
  }

  /// How long a single module summary may take before it is given up on.
  pub fn summary_timeout(&self) -> Duration { Duration::from_secs(self.summary_timeout_secs) }
}
