//! Remove instruction implementation for roadmap deletion.
//!
//! Removal is driven by a [`Query`]: whatever the query matches is deleted. Two modes are
//! supported:
//!
//! - [`DeleteMode::Soft`] flags the roadmap as deleted and bumps its version. The row
//!   stays, but default queries no longer see it.
//! - [`DeleteMode::Hard`] drops the row.
//!
//! # Examples
//!
//! ```no_run
//! use pathway::{database::*, prelude::*};
//!
//! # async fn example() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let mut db = Database::open("roadmaps.db").await?;
//!
//! // Hide a roadmap from its owner
//! Remove::by_id("roadmap-id").execute(&mut db).await?;
//!
//! // Preview which roadmaps a hard delete would drop
//! let roadmaps = Remove::by_user("user-1").hard().dry_run().execute(&mut db).await?;
//! println!("Would remove {} roadmaps", roadmaps.len());
//! # Ok(())
//! # }
//! ```

use super::*;

/// How matched roadmaps are deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteMode {
  /// Set `is_deleted` and keep the row
  #[default]
  Soft,
  /// Delete the row
  Hard,
}

/// Configuration options for roadmap removal.
#[derive(Debug, Default)]
pub struct RemoveOptions {
  /// When true, reports what would be removed without modifying the database
  pub dry_run: bool,
  /// Whether rows are hidden or deleted for good
  pub mode:    DeleteMode,
}

/// Instruction for removing roadmaps from the database.
pub struct Remove<'a> {
  /// The query identifying roadmaps to remove
  query:   Query<'a>,
  /// Configuration options for the removal
  options: RemoveOptions,
}

impl<'a> Remove<'a> {
  /// Creates a remove instruction from an existing query.
  pub fn from_query(query: Query<'a>) -> Self { Self { query, options: RemoveOptions::default() } }

  /// Creates a remove instruction for a single roadmap.
  pub fn by_id(id: &'a str) -> Self { Self::from_query(Query::by_id(id)) }

  /// Creates a remove instruction for every roadmap a user owns.
  pub fn by_user(user_id: &'a str) -> Self { Self::from_query(Query::for_user(user_id)) }

  /// Switches to the given deletion mode.
  pub fn mode(mut self, mode: DeleteMode) -> Self {
    self.options.mode = mode;
    if mode == DeleteMode::Hard {
      // Already soft-deleted rows are fair game for a hard delete
      self.query = self.query.include_deleted();
    }
    self
  }

  /// Drops rows instead of flagging them.
  pub fn hard(self) -> Self { self.mode(DeleteMode::Hard) }

  /// Enables dry run mode: matched roadmaps are returned but nothing is changed.
  pub fn dry_run(mut self) -> Self {
    self.options.dry_run = true;
    self
  }
}

#[async_trait]
impl DatabaseInstruction for Remove<'_> {
  /// The roadmaps that were (or, on a dry run, would be) removed
  type Output = Vec<Roadmap>;

  async fn execute(&self, db: &mut Database) -> Result<Self::Output> {
    let roadmaps = self.query.execute(db).await?;
    if self.options.dry_run || roadmaps.is_empty() {
      return Ok(roadmaps);
    }

    match self.options.mode {
      DeleteMode::Hard => {
        let ids: Vec<String> = roadmaps.iter().map(|r| r.id.clone()).collect();
        db.conn
          .call(move |conn| {
            let tx = conn.transaction()?;
            {
              let mut stmt = tx.prepare_cached("DELETE FROM roadmaps WHERE id = ?1")?;
              for id in &ids {
                stmt.execute([id])?;
              }
            }
            tx.commit()?;
            Ok(())
          })
          .await?;
        info!("Hard deleted {} roadmap(s)", roadmaps.len());
        Ok(roadmaps)
      },
      DeleteMode::Soft => {
        let now = Utc::now();
        let mut flagged = Vec::with_capacity(roadmaps.len());
        let mut rows = Vec::with_capacity(roadmaps.len());
        for roadmap in roadmaps {
          let expected = to_sql_version(roadmap.version)?;
          let mut next = roadmap;
          next.is_deleted = true;
          next.version += 1;
          next.updated_at = now;
          rows.push((RoadmapRow::from_roadmap(&next)?, expected));
          flagged.push(next);
        }

        let changed: Vec<bool> = db
          .conn
          .call(move |conn| {
            let tx = conn.transaction()?;
            let mut changed = Vec::with_capacity(rows.len());
            {
              let mut stmt = tx.prepare_cached(
                "UPDATE roadmaps
                 SET is_deleted = 1, version = ?1, updated_at = ?2, document = ?3
                 WHERE id = ?4 AND version = ?5",
              )?;
              for (row, expected) in &rows {
                let count = stmt.execute(rusqlite::params![
                  row.version,
                  row.updated_at,
                  row.document,
                  row.id,
                  expected,
                ])?;
                changed.push(count > 0);
              }
            }
            tx.commit()?;
            Ok(changed)
          })
          .await?;

        let removed: Vec<Roadmap> =
          flagged.into_iter().zip(changed).filter_map(|(r, changed)| changed.then_some(r)).collect();
        info!("Soft deleted {} roadmap(s)", removed.len());
        Ok(removed)
      },
    }
  }
}
