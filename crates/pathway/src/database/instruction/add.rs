//! Instruction for storing new roadmaps.

use super::*;

/// Inserts a roadmap document.
///
/// The roadmap is stored with whatever version it carries, which is `0` for a freshly
/// initialized one. Storing an id that already exists fails with a SQLite constraint error.
///
/// # Examples
///
/// ```no_run
/// # use pathway::{database::*, prelude::*, roadmap::Roadmap};
/// # async fn example(roadmap: Roadmap) -> std::result::Result<(), Box<dyn std::error::Error>> {
/// let mut db = Database::open_in_memory().await?;
/// let stored = Add::roadmap(roadmap).execute(&mut db).await?;
/// println!("stored {} at version {}", stored.id, stored.version);
/// # Ok(())
/// # }
/// ```
pub struct Add {
  roadmap: Roadmap,
}

impl Add {
  /// Creates an instruction storing `roadmap`.
  pub fn roadmap(roadmap: Roadmap) -> Self { Self { roadmap } }
}

#[async_trait]
impl DatabaseInstruction for Add {
  type Output = Roadmap;

  async fn execute(&self, db: &mut Database) -> Result<Self::Output> {
    let row = RoadmapRow::from_roadmap(&self.roadmap)?;
    db.conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(
          "INSERT INTO roadmaps (
             id, user_id, target_role, category, is_template, is_public, is_deleted,
             progress_percentage, version, created_at, updated_at, document
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        )?;
        stmt.execute(rusqlite::params![
          row.id,
          row.user_id,
          row.target_role,
          row.category,
          row.is_template,
          row.is_public,
          row.is_deleted,
          row.progress_percentage,
          row.version,
          row.created_at,
          row.updated_at,
          row.document,
        ])?;
        Ok(())
      })
      .await?;

    debug!("Stored roadmap {} for user {}", self.roadmap.id, self.roadmap.user_id);
    Ok(self.roadmap.clone())
  }
}
