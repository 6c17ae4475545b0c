//! Roadmap lookups.
//!
//! A [`Query`] selects rows by one of a few [`QueryCriteria`] and then narrows and orders
//! them with a [`RoadmapFilter`]. Soft-deleted roadmaps are invisible unless the query asks
//! for them with [`Query::include_deleted`].
//!
//! # Examples
//!
//! ```no_run
//! use pathway::{database::*, prelude::*};
//!
//! # async fn example() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let mut db = Database::open(Database::default_path()).await?;
//!
//! let filter = RoadmapFilter::default()
//!   .search("rust")
//!   .status(ProgressStatus::InProgress)
//!   .sort(RoadmapSort::Progress);
//! for roadmap in Query::for_user("user-1").with_filter(filter).execute(&mut db).await? {
//!   println!("{} ({}%)", roadmap.target_role, roadmap.progress_percentage);
//! }
//! # Ok(())
//! # }
//! ```

use super::*;

/// Which rows a [`Query`] starts from.
#[derive(Debug, Clone)]
pub enum QueryCriteria<'a> {
  /// A single roadmap by id
  ById(&'a str),
  /// Every roadmap owned by a user
  ByUser(&'a str),
  /// The most recently created roadmap owned by a user
  LatestForUser(&'a str),
  /// Template roadmaps, optionally limited to one category
  Templates(Option<&'a str>),
}

/// Progress bands used to filter roadmap listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStatus {
  /// No resource done yet
  NotStarted,
  /// Some, but not all, resources done
  InProgress,
  /// Every resource done
  Completed,
}

impl ProgressStatus {
  /// Whether a roadmap at `progress` percent falls into this band.
  pub fn matches(self, progress: f64) -> bool {
    match self {
      ProgressStatus::NotStarted => progress <= 0.0,
      ProgressStatus::InProgress => progress > 0.0 && progress < 100.0,
      ProgressStatus::Completed => progress >= 100.0,
    }
  }
}

impl FromStr for ProgressStatus {
  type Err = PathwayError;

  fn from_str(s: &str) -> Result<Self> {
    match s.to_lowercase().replace('-', "_").as_str() {
      "not_started" => Ok(ProgressStatus::NotStarted),
      "in_progress" => Ok(ProgressStatus::InProgress),
      "completed" => Ok(ProgressStatus::Completed),
      other => Err(PathwayError::InvalidInput(format!("unknown progress status `{other}`"))),
    }
  }
}

/// Ordering of roadmap listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoadmapSort {
  /// Newest first
  #[default]
  CreatedAt,
  /// Most recently touched first
  UpdatedAt,
  /// Least progressed first
  Progress,
  /// Alphabetical by target role
  TargetRole,
}

impl FromStr for RoadmapSort {
  type Err = PathwayError;

  fn from_str(s: &str) -> Result<Self> {
    match s.to_lowercase().replace('-', "_").as_str() {
      "created_at" | "created" => Ok(RoadmapSort::CreatedAt),
      "updated_at" | "updated" => Ok(RoadmapSort::UpdatedAt),
      "progress" | "progress_percentage" => Ok(RoadmapSort::Progress),
      "target_role" | "role" => Ok(RoadmapSort::TargetRole),
      other => Err(PathwayError::InvalidInput(format!("unknown sort field `{other}`"))),
    }
  }
}

/// Narrowing and ordering applied after rows are selected.
#[derive(Debug, Clone, Default)]
pub struct RoadmapFilter {
  /// Case-insensitive text matched against the target role and skill names
  pub search: Option<String>,
  /// Keep only roadmaps in this progress band
  pub status: Option<ProgressStatus>,
  /// Result order
  pub sort:   RoadmapSort,
}

impl RoadmapFilter {
  /// Keeps roadmaps whose target role or skills mention `text`.
  pub fn search(mut self, text: impl Into<String>) -> Self {
    self.search = Some(text.into());
    self
  }

  /// Keeps roadmaps in the given progress band.
  pub fn status(mut self, status: ProgressStatus) -> Self {
    self.status = Some(status);
    self
  }

  /// Sets the ordering.
  pub fn sort(mut self, sort: RoadmapSort) -> Self {
    self.sort = sort;
    self
  }

  /// Whether `roadmap` passes the search text and status band.
  pub fn matches(&self, roadmap: &Roadmap) -> bool {
    let status_matches = self.status.map_or(true, |s| s.matches(roadmap.progress_percentage));
    let search_matches = match self.search.as_deref().map(str::trim) {
      None | Some("") => true,
      Some(text) => {
        let needle = text.to_lowercase();
        roadmap.target_role.to_lowercase().contains(&needle)
          || roadmap.skill_gaps.iter().any(|g| g.skill.to_lowercase().contains(&needle))
          || roadmap
            .modules
            .iter()
            .flat_map(|m| &m.skills_covered)
            .any(|s| s.to_lowercase().contains(&needle))
      },
    };
    status_matches && search_matches
  }

  fn apply(&self, mut roadmaps: Vec<Roadmap>) -> Vec<Roadmap> {
    roadmaps.retain(|r| self.matches(r));
    match self.sort {
      RoadmapSort::CreatedAt => roadmaps.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
      RoadmapSort::UpdatedAt => roadmaps.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
      RoadmapSort::Progress =>
        roadmaps.sort_by(|a, b| a.progress_percentage.total_cmp(&b.progress_percentage)),
      RoadmapSort::TargetRole => roadmaps
        .sort_by(|a, b| a.target_role.to_lowercase().cmp(&b.target_role.to_lowercase())),
    }
    roadmaps
  }
}

/// A query for retrieving roadmaps from the database.
#[derive(Debug, Clone)]
pub struct Query<'a> {
  criteria:        QueryCriteria<'a>,
  filter:          RoadmapFilter,
  include_deleted: bool,
}

impl<'a> Query<'a> {
  /// Creates a new query with the given criteria
  pub fn new(criteria: QueryCriteria<'a>) -> Self {
    Self { criteria, filter: RoadmapFilter::default(), include_deleted: false }
  }

  /// Creates a query for a single roadmap
  pub fn by_id(id: &'a str) -> Self { Self::new(QueryCriteria::ById(id)) }

  /// Creates a query for every roadmap a user owns
  pub fn for_user(user_id: &'a str) -> Self { Self::new(QueryCriteria::ByUser(user_id)) }

  /// Creates a query for a user's newest roadmap
  pub fn latest_for_user(user_id: &'a str) -> Self {
    Self::new(QueryCriteria::LatestForUser(user_id))
  }

  /// Creates a query for templates, optionally in one category
  pub fn templates(category: Option<&'a str>) -> Self {
    Self::new(QueryCriteria::Templates(category))
  }

  /// Applies a filter to the selected rows
  pub fn with_filter(mut self, filter: RoadmapFilter) -> Self {
    self.filter = filter;
    self
  }

  /// Makes soft-deleted roadmaps visible to this query
  pub fn include_deleted(mut self) -> Self {
    self.include_deleted = true;
    self
  }

  fn build_sql(&self) -> (String, Vec<String>) {
    let (condition, params, suffix) = match &self.criteria {
      QueryCriteria::ById(id) => ("id = ?1", vec![(*id).to_string()], ""),
      QueryCriteria::ByUser(user) => ("user_id = ?1", vec![(*user).to_string()], ""),
      QueryCriteria::LatestForUser(user) =>
        ("user_id = ?1", vec![(*user).to_string()], " ORDER BY created_at DESC LIMIT 1"),
      QueryCriteria::Templates(None) => ("is_template = 1", Vec::new(), ""),
      QueryCriteria::Templates(Some(category)) =>
        ("is_template = 1 AND category = ?1", vec![(*category).to_string()], ""),
    };

    let deleted = if self.include_deleted { "" } else { " AND is_deleted = 0" };
    (
      format!(
        "SELECT {} FROM roadmaps WHERE {condition}{deleted}{suffix}",
        StoredDocument::COLUMNS
      ),
      params,
    )
  }
}

#[async_trait]
impl DatabaseInstruction for Query<'_> {
  type Output = Vec<Roadmap>;

  async fn execute(&self, db: &mut Database) -> Result<Self::Output> {
    let (sql, params) = self.build_sql();
    trace!("Running roadmap query: {sql}");

    let rows = db
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), StoredDocument::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let roadmaps = rows.into_iter().map(StoredDocument::into_roadmap).collect::<Result<Vec<_>>>()?;
    Ok(self.filter.apply(roadmaps))
  }
}
