//! Personalized learning roadmaps with gated, tracked progression.
//!
//! `pathway` turns a generated curriculum into a roadmap a learner works through, and keeps
//! its state honest as they study:
//!
//! - Week-gated initialization of modules and resources
//! - Open / complete / skip / time-tracking transitions with automatic unlocking
//! - Time-based auto-completion at 90% of a resource's estimate
//! - Module rollup and roadmap-wide progress
//! - Resource ratings keyed by content URL
//! - SQLite document storage with compare-and-swap updates
//! - Pluggable AI collaborators for roadmap generation and module summaries
//!
//! # Getting Started
//!
//! ```no_run
//! use pathway::{
//!   generation::{GeneratedRoadmap, InitializeOptions},
//!   Config, Pathway,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let mut pathway = Pathway::builder().with_config(Config::default()).build().await?;
//!
//!   let generated = GeneratedRoadmap::from_json(&std::fs::read_to_string("plan.json")?)?;
//!   let roadmap = pathway
//!     .create_roadmap(generated, InitializeOptions::new("user-1", "Backend Engineer", 12))
//!     .await?;
//!
//!   let module = &roadmap.modules[0];
//!   let resource = &module.resources[0];
//!   pathway.open_resource(&roadmap.id, &module.id, &resource.id).await?;
//!   let completed = pathway.complete_resource(&roadmap.id, &module.id, &resource.id).await?;
//!   println!("{} module(s) finished", completed.len());
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`roadmap`]: Resource, module and roadmap records plus read-only projections
//! - [`generation`]: Turning generated curricula into week-gated roadmaps
//! - [`progression`]: The state machine that unlocks, completes and rolls up progress
//! - [`summary`]: Best-effort module summaries with a bounded wait
//! - [`database`]: Document storage and the instructions that operate on it
//! - [`llm`]: Ollama client backing the default AI collaborators
//! - [`prelude`]: Common traits and types for ergonomic imports

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  collections::BTreeMap,
  fmt::Display,
  path::{Path, PathBuf},
  str::FromStr,
  sync::Arc,
  time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod configuration;
pub mod database;
pub mod error;
pub mod generation;
pub mod llm;
pub mod pathway;
pub mod progression;
pub mod roadmap;
pub mod summary;

pub use crate::{configuration::Config, pathway::Pathway};
use crate::{error::*, roadmap::*};

/// Common traits and types for ergonomic imports.
///
/// # Usage
///
/// ```no_run
/// use pathway::{database::Database, prelude::*};
///
/// async fn example() -> Result<()> {
///   let mut db = Database::open(Database::default_path()).await?;
///   let roadmaps = pathway::database::Query::for_user("user-1").execute(&mut db).await?;
///   println!("{} roadmaps", roadmaps.len());
///   Ok(())
/// }
/// ```
pub mod prelude {
  pub use crate::{
    database::DatabaseInstruction,
    error::{PathwayError, Result},
    generation::RoadmapGenerator,
    summary::SummaryGenerator,
  };
}
