//! Compare-and-swap writes of mutated roadmaps.
//!
//! A roadmap read from the store carries the version it was read at. [`Update`] only
//! writes it back if the stored row is still at that version, and bumps the version by one
//! when it does. A writer that lost the race gets
//! [`PathwayError::ConcurrencyConflict`] and is expected to re-read and retry.

use super::*;

/// Writes a whole roadmap document back over its stored row.
pub struct Update<'a> {
  roadmap: &'a Roadmap,
}

impl<'a> Update<'a> {
  /// Creates an update writing `roadmap`, expecting the store to hold `roadmap.version`.
  pub fn roadmap(roadmap: &'a Roadmap) -> Self { Self { roadmap } }
}

/// What the store found when a guarded write changed nothing.
enum Missed {
  /// No live row with that id
  Gone,
  /// A live row exists at another version
  Stale,
}

#[async_trait]
impl DatabaseInstruction for Update<'_> {
  /// The roadmap as stored, carrying its new version
  type Output = Roadmap;

  async fn execute(&self, db: &mut Database) -> Result<Self::Output> {
    let expected = self.roadmap.version;
    let mut next = self.roadmap.clone();
    next.version = expected + 1;

    let row = RoadmapRow::from_roadmap(&next)?;
    let id = row.id.clone();
    let expected_sql = to_sql_version(expected)?;

    let outcome = db
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE roadmaps
           SET user_id = ?1, target_role = ?2, category = ?3, is_template = ?4,
               is_public = ?5, progress_percentage = ?6, version = ?7, updated_at = ?8,
               document = ?9
           WHERE id = ?10 AND version = ?11 AND is_deleted = 0",
          rusqlite::params![
            row.user_id,
            row.target_role,
            row.category,
            row.is_template,
            row.is_public,
            row.progress_percentage,
            row.version,
            row.updated_at,
            row.document,
            row.id,
            expected_sql,
          ],
        )?;

        let missed = if changed == 0 {
          let live: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM roadmaps WHERE id = ?1 AND is_deleted = 0)",
            [&row.id],
            |r| r.get(0),
          )?;
          Some(if live { Missed::Stale } else { Missed::Gone })
        } else {
          None
        };

        tx.commit()?;
        Ok(missed)
      })
      .await?;

    match outcome {
      None => {
        trace!("Roadmap {} moved to version {}", id, next.version);
        Ok(next)
      },
      Some(Missed::Gone) => Err(PathwayError::roadmap_not_found(id)),
      Some(Missed::Stale) => {
        warn!("Rejected stale write to roadmap {} at version {}", id, expected);
        Err(PathwayError::ConcurrencyConflict { id, expected })
      },
    }
  }
}
