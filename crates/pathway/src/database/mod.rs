//! Local SQLite storage for roadmap documents.
//!
//! Each roadmap is persisted as one JSON document, next to a handful of columns that
//! queries filter and sort on. The schema is created from `migrations/init.sql` when a
//! database is opened.
//!
//! All reads and writes go through [`DatabaseInstruction`] implementations:
//! - [`Add`] stores a freshly initialized roadmap
//! - [`Query`] looks roadmaps up by id, owner or template category
//! - [`Update`] writes a mutated roadmap back with a compare-and-swap on its version
//! - [`Remove`] soft or hard deletes whatever a query matched
//!
//! # Examples
//!
//! ```no_run
//! use pathway::{database::*, prelude::*};
//!
//! # async fn example() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let mut db = Database::open(Database::default_path()).await?;
//!
//! let mut roadmap = Query::by_id("roadmap-id")
//!   .execute(&mut db)
//!   .await?
//!   .pop()
//!   .ok_or_else(|| PathwayError::roadmap_not_found("roadmap-id"))?;
//! roadmap.target_role = "Platform Engineer".into();
//! let stored = Update::roadmap(&roadmap).execute(&mut db).await?;
//! assert_eq!(stored.version, roadmap.version + 1);
//! # Ok(())
//! # }
//! ```

use chrono::SecondsFormat;
use tokio_rusqlite::Connection;

use super::*;

mod instruction;
#[cfg(test)] mod tests;

pub use self::instruction::*;

/// Config key holding the schema revision written by [`Database::open`].
pub const SCHEMA_VERSION_KEY: &str = "schema_version";

/// Current schema revision.
pub const SCHEMA_VERSION: &str = "1";

/// Handle for interacting with the roadmap database.
///
/// Wraps an async SQLite connection. Instructions take it by `&mut`, so a caller holds
/// exclusive use of the handle while an instruction runs.
pub struct Database {
  /// Async SQLite connection handle
  conn: Connection,
}

impl Database {
  /// Opens an existing database or creates a new one at the specified path.
  ///
  /// Missing parent directories are created, and the schema is initialized if needed.
  ///
  /// # Examples
  ///
  /// ```no_run
  /// # use pathway::database::Database;
  /// # async fn example() -> std::result::Result<(), Box<dyn std::error::Error>> {
  /// let db = Database::open("roadmaps.db").await?;
  /// let db = Database::open(Database::default_path()).await?;
  /// # Ok(())
  /// # }
  /// ```
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
      tokio::fs::create_dir_all(parent).await?;
    }
    debug!("Opening database at {}", path.display());

    let conn = Connection::open(path).await?;
    Self::initialize(conn).await
  }

  /// Opens a private in-memory database, mostly useful for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory().await?;
    Self::initialize(conn).await
  }

  async fn initialize(conn: Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(include_str!(concat!(
          env!("CARGO_MANIFEST_DIR"),
          "/migrations/init.sql"
        )))?;
        Ok(())
      })
      .await?;

    let db = Self { conn };
    db.set_config(SCHEMA_VERSION_KEY, SCHEMA_VERSION).await?;
    Ok(db)
  }

  /// Returns the default path for the database file.
  ///
  /// The path is constructed as follows:
  /// - On Unix: `~/.local/share/pathway/pathway.db`
  /// - On macOS: `~/Library/Application Support/pathway/pathway.db`
  /// - On Windows: `%APPDATA%\pathway\pathway.db`
  /// - Fallback: `./pathway/pathway.db` relative to the current directory
  pub fn default_path() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")).join("pathway").join("pathway.db")
  }

  /// Stores a key/value setting, replacing any previous value.
  pub async fn set_config(&self, key: &str, value: &str) -> Result<()> {
    let key = key.to_string();
    let value = value.to_string();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO config (key, value) VALUES (?1, ?2)
           ON CONFLICT(key) DO UPDATE SET value = excluded.value",
          rusqlite::params![key, value],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Reads a key/value setting.
  pub async fn get_config(&self, key: &str) -> Result<Option<String>> {
    let key = key.to_string();
    Ok(
      self
        .conn
        .call(move |conn| {
          let mut stmt = conn.prepare_cached("SELECT value FROM config WHERE key = ?1")?;
          let mut rows = stmt.query([key])?;
          Ok(match rows.next()? {
            Some(row) => Some(row.get::<_, String>(0)?),
            None => None,
          })
        })
        .await?,
    )
  }
}

/// Fixed-width timestamp text so stored dates sort lexicographically.
pub(crate) fn timestamp(at: DateTime<Utc>) -> String {
  at.to_rfc3339_opts(SecondsFormat::Micros, true)
}
