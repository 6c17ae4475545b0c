//! Error types for the `pathway` command line interface.
//!
//! Library failures are wrapped unchanged so their messages reach the user as they are.

use thiserror::Error;

use super::*;

/// Errors raised by CLI commands
#[derive(Error, Debug)]
pub enum PathwaydError {
  /// A failure inside the `pathway` library
  #[error(transparent)]
  Pathway(#[from] PathwayError),

  /// Reading or writing files failed
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// A prompt could not be shown or answered
  #[error(transparent)]
  Dialoguer(#[from] dialoguer::Error),

  /// A file pattern could not be built
  #[error(transparent)]
  Glob(#[from] glob::PatternError),

  /// An input file was not valid JSON of the expected shape
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// No user was given and no default user is configured
  #[error("No user given. Pass --user or run `pathway init --user <NAME>`")]
  MissingUser,
}

/// Result alias for CLI commands
pub type Result<T> = core::result::Result<T, PathwaydError>;
