use super::*;

/// Share of a resource's estimated duration after which tracked time auto-completes it.
pub const AUTO_COMPLETE_RATIO: f64 = 0.9;

/// Number of seconds in one estimated hour.
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Lifecycle status of a single [`Resource`].
///
/// Resources only ever move forward: a resource that left [`ResourceStatus::Locked`] is
/// never locked again. [`ResourceStatus::Completed`] and [`ResourceStatus::Skipped`] both
/// count as done for progress, but a skip records that the learner already knew the
/// material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceStatus {
  /// Not yet reachable by the learner
  #[default]
  Locked,
  /// Reachable but never opened
  Unlocked,
  /// Opened at least once
  InProgress,
  /// Finished, either explicitly or by tracked time
  Completed,
  /// Marked as already known
  Skipped,
}

impl ResourceStatus {
  /// Whether this status counts towards module and roadmap completion.
  pub fn is_done(self) -> bool {
    match self {
      ResourceStatus::Completed | ResourceStatus::Skipped => true,
      ResourceStatus::Locked | ResourceStatus::Unlocked | ResourceStatus::InProgress => false,
    }
  }

  /// Whether the learner can reach a resource in this status.
  pub fn is_accessible(self) -> bool {
    match self {
      ResourceStatus::Locked => false,
      ResourceStatus::Unlocked
      | ResourceStatus::InProgress
      | ResourceStatus::Completed
      | ResourceStatus::Skipped => true,
    }
  }

  /// The lowercase name used in documents and on the command line.
  pub fn as_str(&self) -> &'static str {
    match self {
      ResourceStatus::Locked => "locked",
      ResourceStatus::Unlocked => "unlocked",
      ResourceStatus::InProgress => "in_progress",
      ResourceStatus::Completed => "completed",
      ResourceStatus::Skipped => "skipped",
    }
  }
}

impl Display for ResourceStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for ResourceStatus {
  type Err = PathwayError;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "locked" => Ok(ResourceStatus::Locked),
      "unlocked" => Ok(ResourceStatus::Unlocked),
      "in_progress" => Ok(ResourceStatus::InProgress),
      "completed" => Ok(ResourceStatus::Completed),
      "skipped" => Ok(ResourceStatus::Skipped),
      other => Err(PathwayError::InvalidInput(format!("unknown resource status `{other}`"))),
    }
  }
}

/// The medium of a learning resource.
///
/// Generators are free to invent new kinds, so anything unrecognized is preserved verbatim
/// in [`ResourceKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceKind {
  /// Video content
  Video,
  /// Written article or blog post
  Article,
  /// Structured course
  Course,
  /// Hands-on exercise
  Practice,
  /// Reference documentation
  Documentation,
  /// Any other medium, kept as given
  Other(String),
}

impl From<String> for ResourceKind {
  fn from(value: String) -> Self {
    match value.trim().to_lowercase().as_str() {
      "video" => ResourceKind::Video,
      "article" => ResourceKind::Article,
      "course" => ResourceKind::Course,
      "practice" => ResourceKind::Practice,
      "documentation" => ResourceKind::Documentation,
      _ => ResourceKind::Other(value),
    }
  }
}

impl From<ResourceKind> for String {
  fn from(kind: ResourceKind) -> Self { kind.to_string() }
}

impl Display for ResourceKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ResourceKind::Video => f.write_str("video"),
      ResourceKind::Article => f.write_str("article"),
      ResourceKind::Course => f.write_str("course"),
      ResourceKind::Practice => f.write_str("practice"),
      ResourceKind::Documentation => f.write_str("documentation"),
      ResourceKind::Other(kind) => f.write_str(kind),
    }
  }
}

/// One learner's rating of a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
  /// The rating user
  pub user_id:    String,
  /// Score in `1..=5`
  pub score:      u8,
  /// Optional free-text comment
  pub comment:    Option<String>,
  /// When this rating was (last) given
  pub created_at: DateTime<Utc>,
}

/// Smallest unit of learning content inside a [`Module`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
  /// Stable unique id, assigned at initialization
  pub id:                 String,
  /// Display title
  pub title:              String,
  /// Content location; also the identity ratings are keyed by
  pub url:                String,
  /// Short description, empty when the generator gave none
  #[serde(default)]
  pub description:        String,
  /// Expected study time in hours
  pub estimated_hours:    f64,
  /// Medium of the resource
  pub resource_type:      ResourceKind,
  /// Current lifecycle status
  #[serde(default)]
  pub status:             ResourceStatus,
  /// Position within the owning module, contiguous from 0
  pub order:              usize,
  /// Absolute tracked study time, overwritten by every time update
  #[serde(default)]
  pub time_spent_seconds: u64,
  /// First time the resource was opened
  #[serde(default)]
  pub opened_at:          Option<DateTime<Utc>>,
  /// When the resource was completed
  #[serde(default)]
  pub completed_at:       Option<DateTime<Utc>>,
  /// When the resource was skipped
  #[serde(default)]
  pub skipped_at:         Option<DateTime<Utc>>,
  /// Mean of `ratings`, rounded to one decimal
  #[serde(default)]
  pub rating:             Option<f64>,
  /// Number of entries in `ratings`
  #[serde(default)]
  pub rating_count:       u32,
  /// One rating per user
  #[serde(default)]
  pub ratings:            Vec<Rating>,
}

impl Resource {
  /// The estimated duration expressed in seconds.
  pub fn estimated_seconds(&self) -> f64 { self.estimated_hours * SECONDS_PER_HOUR }

  /// Tracked seconds at or beyond which the resource auto-completes.
  ///
  /// Rounded to the microsecond so that estimates like 1.1 hours land exactly on their
  /// whole-second boundary instead of just above it.
  pub fn auto_complete_threshold(&self) -> f64 {
    round_to(self.estimated_seconds() * AUTO_COMPLETE_RATIO, 6)
  }

  /// Moves a locked resource to [`ResourceStatus::Unlocked`].
  ///
  /// Returns `true` when the status changed. Resources that are already further along are
  /// left untouched.
  pub fn unlock(&mut self) -> bool {
    if self.status == ResourceStatus::Locked {
      self.status = ResourceStatus::Unlocked;
      true
    } else {
      false
    }
  }

  /// Adds or replaces `user_id`'s rating and recomputes the aggregate.
  pub fn rate(&mut self, user_id: &str, score: u8, comment: Option<String>, now: DateTime<Utc>) {
    let rating = Rating { user_id: user_id.to_string(), score, comment, created_at: now };
    match self.ratings.iter_mut().find(|r| r.user_id == user_id) {
      Some(existing) => *existing = rating,
      None => self.ratings.push(rating),
    }

    let total: u32 = self.ratings.iter().map(|r| u32::from(r.score)).sum();
    self.rating_count = self.ratings.len() as u32;
    self.rating = Some(round_to(f64::from(total) / f64::from(self.rating_count), 1));
  }

  /// Clears all learner-specific progress, keeping content and ratings.
  pub(crate) fn reset_progress(&mut self) {
    self.status = ResourceStatus::Locked;
    self.time_spent_seconds = 0;
    self.opened_at = None;
    self.completed_at = None;
    self.skipped_at = None;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn resource(hours: f64) -> Resource {
    Resource {
      id:                 "r".into(),
      title:              "Ownership in depth".into(),
      url:                "https://example.com/ownership".into(),
      description:        String::new(),
      estimated_hours:    hours,
      resource_type:      ResourceKind::Video,
      status:             ResourceStatus::Locked,
      order:              0,
      time_spent_seconds: 0,
      opened_at:          None,
      completed_at:       None,
      skipped_at:         None,
      rating:             None,
      rating_count:       0,
      ratings:            Vec::new(),
    }
  }

  #[test]
  fn test_status_round_trips_through_strings() {
    for status in [
      ResourceStatus::Locked,
      ResourceStatus::Unlocked,
      ResourceStatus::InProgress,
      ResourceStatus::Completed,
      ResourceStatus::Skipped,
    ] {
      assert_eq!(status.as_str().parse::<ResourceStatus>().unwrap(), status);
    }
    assert!("done".parse::<ResourceStatus>().is_err());
  }

  #[test]
  fn test_status_serializes_snake_case() {
    let json = serde_json::to_string(&ResourceStatus::InProgress).unwrap();
    assert_eq!(json, "\"in_progress\"");
  }

  #[test]
  fn test_unknown_kind_is_preserved() {
    let kind: ResourceKind = serde_json::from_str("\"Podcast\"").unwrap();
    assert_eq!(kind, ResourceKind::Other("Podcast".into()));
    assert_eq!(serde_json::to_string(&kind).unwrap(), "\"Podcast\"");

    let kind: ResourceKind = serde_json::from_str("\"Video\"").unwrap();
    assert_eq!(kind, ResourceKind::Video);
  }

  #[test]
  fn test_unlock_only_moves_locked() {
    let mut r = resource(1.0);
    assert!(r.unlock());
    assert_eq!(r.status, ResourceStatus::Unlocked);

    r.status = ResourceStatus::Completed;
    assert!(!r.unlock());
    assert_eq!(r.status, ResourceStatus::Completed);
  }

  #[test]
  fn test_threshold() {
    let r = resource(2.0);
    assert_eq!(r.estimated_seconds(), 7200.0);
    assert_eq!(r.auto_complete_threshold(), 6480.0);
  }

  #[test]
  fn test_threshold_of_fractional_estimates_is_exact() {
    let estimates = [(1.1, 3564.0), (2.2, 7128.0), (4.4, 14256.0), (8.3, 26892.0), (16.1, 52164.0)];
    for (hours, boundary) in estimates {
      assert_eq!(resource(hours).auto_complete_threshold(), boundary, "estimate of {hours}h");
    }
  }

  #[test]
  fn test_rerating_replaces() {
    let mut r = resource(1.0);
    let now = Utc::now();
    r.rate("alice", 3, None, now);
    r.rate("alice", 5, Some("better on reread".into()), now);
    assert_eq!(r.rating_count, 1);
    assert_eq!(r.rating, Some(5.0));

    r.rate("bob", 2, None, now);
    assert_eq!(r.rating_count, 2);
    assert_eq!(r.rating, Some(3.5));
  }
}
