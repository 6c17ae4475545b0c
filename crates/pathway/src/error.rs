//! Error types for the pathway library.
//!
//! Every fallible operation in this crate returns [`PathwayError`]. The variants fall into
//! two groups:
//! - Domain failures raised by the progression engine and the store (`NotFound`,
//!   `InvalidInput`, `UpstreamGeneration`, `ConcurrencyConflict`)
//! - Wrapped infrastructure failures (SQLite, JSON, network, file system, TOML)
//!
//! # Examples
//!
//! ```no_run
//! use pathway::{error::PathwayError, Pathway};
//!
//! # async fn example(mut pathway: Pathway) -> Result<(), PathwayError> {
//! match pathway.open_resource("roadmap-id", "module-id", "resource-id").await {
//!   Err(PathwayError::NotFound(entity)) => println!("Nothing matched: {entity}"),
//!   Err(PathwayError::ConcurrencyConflict { .. }) => println!("Stale state, retry"),
//!   Err(e) => return Err(e),
//!   Ok(outcome) => println!("Resource is now {}", outcome.status),
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;

use thiserror::Error;

/// Error type alias used for the [`pathway`](crate) crate.
pub type Result<T> = core::result::Result<T, PathwayError>;

/// The thing a lookup failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
  /// A roadmap by id
  Roadmap(String),
  /// A module by id, inside an already resolved roadmap
  Module(String),
  /// A resource by id, inside an already resolved module
  Resource(String),
  /// A resource by content URL, anywhere inside a roadmap
  ResourceUrl(String),
  /// A template roadmap by id
  Template(String),
  /// Any live roadmap owned by the given user
  UserRoadmap(String),
}

impl fmt::Display for Entity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Entity::Roadmap(id) => write!(f, "roadmap {id}"),
      Entity::Module(id) => write!(f, "module {id}"),
      Entity::Resource(id) => write!(f, "resource {id}"),
      Entity::ResourceUrl(url) => write!(f, "resource with url {url}"),
      Entity::Template(id) => write!(f, "template {id}"),
      Entity::UserRoadmap(user) => write!(f, "roadmap for user {user}"),
    }
  }
}

/// Errors that can occur when working with the pathway library.
#[derive(Error, Debug)]
pub enum PathwayError {
  /// A roadmap, module or resource could not be resolved.
  ///
  /// Surfaced to callers as-is and never retried.
  #[error("Not found: {0}")]
  NotFound(Entity),

  /// The request was rejected before any state was touched.
  ///
  /// This covers:
  /// - Empty identifiers
  /// - Ratings outside `1..=5`
  /// - Negative time values
  /// - A zero-week roadmap duration
  #[error("Invalid input: {0}")]
  InvalidInput(String),

  /// An AI collaborator failed or produced an unusable structure.
  ///
  /// Fatal for roadmap generation (nothing is stored). Module summaries never surface
  /// this variant to callers; they degrade to "no summary" instead.
  #[error("Upstream generation failed: {0}")]
  UpstreamGeneration(String),

  /// The stored roadmap changed since it was read.
  ///
  /// The update carried version `expected`, but the stored document had moved on. Callers
  /// should re-read and retry.
  #[error("Roadmap {id} was modified concurrently (expected version {expected})")]
  ConcurrencyConflict {
    /// Id of the roadmap that failed to update
    id:       String,
    /// Version the writer read before mutating
    expected: u64,
  },

  /// A SQLite operation failed.
  #[error(transparent)]
  Sqlite(#[from] rusqlite::Error),

  /// An async SQLite operation failed.
  #[error(transparent)]
  AsyncSqlite(#[from] tokio_rusqlite::Error),

  /// A roadmap document could not be (de)serialized at the store boundary.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// A network request to the LLM endpoint failed.
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// A file system operation failed.
  #[error(transparent)]
  Path(#[from] std::io::Error),

  /// A configuration file could not be parsed.
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// A configuration could not be written out.
  #[error(transparent)]
  TomlSer(#[from] toml::ser::Error),

  /// A model was not specified for the LLM request.
  #[error("No model was chosen for the LLM.")]
  LLMMissingModel,

  /// No messages were provided in the LLM request.
  #[error("No messages were supplied to send to the LLM.")]
  LLMMissingMessage,

  /// The configuration is missing or unusable.
  #[error("{0}")]
  Config(String),
}

impl PathwayError {
  /// Shorthand for a roadmap [`PathwayError::NotFound`].
  pub fn roadmap_not_found(id: impl Into<String>) -> Self {
    PathwayError::NotFound(Entity::Roadmap(id.into()))
  }
}
