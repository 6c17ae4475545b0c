//! Database instruction implementations for roadmap storage.
//!
//! Every operation against the store is a value implementing [`DatabaseInstruction`], so
//! queries can be built up, inspected and reused (a [`Remove`] is built from a [`Query`]).

use super::*;

pub mod add;
pub mod query;
pub mod remove;
pub mod update;

pub use self::{add::*, query::*, remove::*, update::*};

/// A single operation that can be run against a [`Database`].
#[async_trait]
pub trait DatabaseInstruction {
  /// What a successful run produces
  type Output;

  // Take &mut reference to avoid taking ownership and allow multiple operations
  async fn execute(&self, db: &mut Database) -> Result<Self::Output>;
}

/// Column values mirrored out of a roadmap document.
struct RoadmapRow {
  id:                  String,
  user_id:             String,
  target_role:         String,
  category:            Option<String>,
  is_template:         bool,
  is_public:           bool,
  is_deleted:          bool,
  progress_percentage: f64,
  version:             i64,
  created_at:          String,
  updated_at:          String,
  document:            String,
}

impl RoadmapRow {
  fn from_roadmap(roadmap: &Roadmap) -> Result<Self> {
    Ok(Self {
      id:                  roadmap.id.clone(),
      user_id:             roadmap.user_id.clone(),
      target_role:         roadmap.target_role.clone(),
      category:            roadmap.category.clone(),
      is_template:         roadmap.is_template,
      is_public:           roadmap.is_public,
      is_deleted:          roadmap.is_deleted,
      progress_percentage: roadmap.progress_percentage,
      version:             to_sql_version(roadmap.version)?,
      created_at:          timestamp(roadmap.created_at),
      updated_at:          timestamp(roadmap.updated_at),
      document:            serde_json::to_string(roadmap)?,
    })
  }
}

/// The parts of a stored row needed to rebuild a [`Roadmap`].
struct StoredDocument {
  document:   String,
  version:    i64,
  is_deleted: bool,
}

impl StoredDocument {
  const COLUMNS: &'static str = "document, version, is_deleted";

  fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { document: row.get(0)?, version: row.get(1)?, is_deleted: row.get(2)? })
  }

  /// The columns are authoritative for the fields the store itself manages.
  fn into_roadmap(self) -> Result<Roadmap> {
    let mut roadmap: Roadmap = serde_json::from_str(&self.document)?;
    roadmap.version = u64::try_from(self.version).unwrap_or_default();
    roadmap.is_deleted = self.is_deleted;
    Ok(roadmap)
  }
}

fn to_sql_version(version: u64) -> Result<i64> {
  i64::try_from(version)
    .map_err(|_| PathwayError::InvalidInput(format!("version {version} is out of range")))
}
