use super::*;

pub mod clean;
pub mod generate;
pub mod init;
pub mod library;
pub mod progress;
pub mod remove;

pub use clean::clean;
pub use generate::{generate, GenerateOptions};
pub use init::{init, InitOptions};
pub use library::{clone, list, publish, show, stats, templates, weeks, ListOptions};
pub use progress::{complete, open, rate, skip, summary, time, RateOptions, ResourceTarget};
pub use remove::{remove, RemoveOptions};

/// Available commands for the CLI
#[derive(Subcommand, Clone)]
pub enum Commands {
  /// Create the configuration and the roadmap database
  Init(InitOptions),

  /// Draft a new roadmap for a target role
  Generate(GenerateOptions),

  /// List your roadmaps
  List(ListOptions),

  /// Show a roadmap with all modules and resources
  Show {
    /// Roadmap id
    roadmap: String,
  },

  /// Start working on a resource
  Open(ResourceTarget),

  /// Mark a resource as completed
  Complete(ResourceTarget),

  /// Mark a resource as already known
  Skip(ResourceTarget),

  /// Record the total time spent on a resource
  Time {
    /// The resource to update
    #[command(flatten)]
    target:  ResourceTarget,
    /// Total seconds spent so far, not an increment
    #[arg(allow_negative_numbers = true)]
    seconds: i64,
  },

  /// Rate a resource from 1 to 5
  Rate(RateOptions),

  /// Week by week overview of your latest roadmap
  Weeks,

  /// Learning statistics across all your roadmaps
  Stats,

  /// Progress report and summary for one module
  Summary {
    /// Roadmap id
    roadmap: String,
    /// Module id
    module:  String,
  },

  /// List published templates
  Templates {
    /// Only show templates in this category
    #[arg(long)]
    category: Option<String>,
  },

  /// Publish a roadmap as a template
  Publish {
    /// Roadmap id
    roadmap:  String,
    /// Template category, e.g. "backend"
    #[arg(long)]
    category: Option<String>,
  },

  /// Start a fresh roadmap from a template
  Clone {
    /// Template id
    template: String,
  },

  /// Remove a roadmap
  Remove(RemoveOptions),

  /// Removes the database and configuration after confirmation
  Clean,
}

/// The user commands act for: `--user`, or the default stored by `init`.
pub async fn current_user<I: UserInteraction>(interaction: &mut I, cli: &Cli) -> Result<String> {
  if let Some(user) = &cli.user {
    return Ok(user.clone());
  }
  interaction
    .pathway()
    .database
    .get_config(DEFAULT_USER_KEY)
    .await?
    .ok_or(PathwaydError::MissingUser)
}
