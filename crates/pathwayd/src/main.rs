//! Command line interface for following learning roadmaps with `pathway`.
//!
//! The CLI wraps the [`pathway`] library. It supports:
//! - Setting up a configuration and database
//! - Generating roadmaps, either with a language model or from a JSON skeleton
//! - Opening, completing and skipping resources, tracking study time, and rating resources
//! - Templates that can be published and cloned
//! - Week overviews, module summaries and learning statistics
//!
//! # Usage
//!
//! ```bash
//! # Set up ~/.pathway and a default user
//! pathway init --user alice
//!
//! # Draft a 12 week roadmap
//! pathway generate "Data Engineer" --weeks 12
//!
//! # Work through it
//! pathway show <ROADMAP>
//! pathway complete <ROADMAP> <MODULE> <RESOURCE>
//! pathway weeks
//! ```
//!
//! Destructive operations ask for confirmation unless `--accept-defaults` is given. The
//! `-v` flag raises logging verbosity.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use clap::{builder::ArgAction, Args, Parser, Subcommand};
use console::style;
use pathway::{
  database::{DatabaseInstruction, DeleteMode, Remove, RoadmapFilter},
  error::PathwayError,
  generation::{GeneratedRoadmap, GenerationRequest, InitializeOptions},
  progression::{OpenOutcome, RatingOutcome, TimeUpdate},
  roadmap::{ModuleReport, Roadmap, SkillGap, UserAnalytics, WeeksOverview},
  summary::CompletedModule,
  Config, Pathway,
};
use tracing::{debug, info, trace};
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod error;
pub mod interaction;

use crate::{commands::*, error::*, interaction::*};

/// Database config key holding the user set by `init --user`
pub const DEFAULT_USER_KEY: &str = "default_user";

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(author, version, about = "Follow and track personal learning roadmaps")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Configuration directory. If not specified, `~/.pathway` is used.
  #[arg(long, short, global = true)]
  path: Option<PathBuf>,

  /// Act as this user instead of the default stored by `init`
  #[arg(long, short, global = true)]
  user: Option<String>,

  /// The subcommand to execute
  #[command(subcommand)]
  command: Commands,

  /// Skip all prompts and accept defaults (mostly for testing)
  #[arg(long, hide = true, global = true)]
  accept_defaults: bool,
}

/// Configures the logging system based on the verbosity level
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug
/// - 4+: trace
fn setup_logging(verbosity: u8) {
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_file(true)
    .with_line_number(true)
    .with_thread_ids(true)
    .with_target(true)
    .init();
}

/// Entry point for the `pathway` CLI application
///
/// `init` and `clean` work without an existing configuration. Every other command opens
/// the configured [`Pathway`] first.
///
/// # Errors
///
/// Returns [`PathwaydError`] for library failures, file system errors and failed prompts.
#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  setup_logging(cli.verbose);

  let config_dir = match &cli.path {
    Some(path) => path.clone(),
    None => Config::default_path()?,
  };
  trace!("Using configuration directory {}", config_dir.display());

  match &cli.command {
    Commands::Init(options) => return init(&cli, &config_dir, options.clone()).await,
    Commands::Clean => return clean(&cli, &config_dir),
    _ => {},
  }

  let pathway = match Pathway::from_path(&config_dir).await {
    Ok(pathway) => pathway,
    Err(e) => {
      debug!("Opening pathway failed: {e}");
      eprintln!(
        "{} Failed to open the pathway configuration! Please run `pathway init` first.",
        style(ERROR_PREFIX).red(),
      );
      return Err(PathwaydError::from(PathwayError::Config(
        "Configuration not initialized. Run 'pathway init' first.".to_string(),
      )));
    },
  };
  let mut interaction = Interaction::new(pathway, cli.accept_defaults);

  let outcome = match cli.command.clone() {
    Commands::Init(_) | Commands::Clean => Ok(()),
    Commands::Generate(options) => generate(&mut interaction, &cli, options).await,
    Commands::List(options) => list(&mut interaction, &cli, options).await,
    Commands::Show { roadmap } => show(&mut interaction, &roadmap).await,
    Commands::Open(target) => open(&mut interaction, target).await,
    Commands::Complete(target) => complete(&mut interaction, target).await,
    Commands::Skip(target) => skip(&mut interaction, target).await,
    Commands::Time { target, seconds } => time(&mut interaction, target, seconds).await,
    Commands::Rate(options) => rate(&mut interaction, &cli, options).await,
    Commands::Weeks => weeks(&mut interaction, &cli).await,
    Commands::Stats => stats(&mut interaction, &cli).await,
    Commands::Summary { roadmap, module } => summary(&mut interaction, &roadmap, &module).await,
    Commands::Templates { category } => templates(&mut interaction, category).await,
    Commands::Publish { roadmap, category } => publish(&mut interaction, &roadmap, category).await,
    Commands::Clone { template } => clone(&mut interaction, &cli, &template).await,
    Commands::Remove(options) => remove(&mut interaction, options).await,
  };

  if let Err(e) = outcome {
    interaction.reply(ResponseContent::Error(&e))?;
    return Err(e);
  }
  Ok(())
}
