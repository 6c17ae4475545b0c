//! The roadmap progression state machine.
//!
//! [`ProgressionEngine`] applies learner actions to an in-memory [`Roadmap`]:
//!
//! - **open** moves an unlocked resource to in-progress and stamps `opened_at` once
//! - **complete** and **skip** finish a resource and unlock the next one in its module
//! - **update time** records absolute study time and auto-completes a resource once it
//!   reaches [`AUTO_COMPLETE_RATIO`] of its estimate
//! - **rate** records a learner's score for a resource, found by URL
//!
//! Every transition that can change completion counts ends with [`recalculate`], which
//! rolls resource states up into module completion, unlocks the first resource of the
//! module after a newly completed one, and recomputes the roadmap's progress. Modules are
//! evaluated strictly in order, so the module after `i` is only unlocked once `i` itself
//! has been fully evaluated.
//!
//! The engine never persists anything; see [`Pathway`](crate::Pathway) for the
//! read-modify-write wrapper around it.
//!
//! [`recalculate`]: ProgressionEngine::recalculate

use tracing::Span;

use super::*;
use crate::summary::CompletedModule;

/// Result of opening a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenOutcome {
  /// Status after opening
  pub status:    ResourceStatus,
  /// First time the resource was opened
  pub opened_at: Option<DateTime<Utc>>,
}

/// What a progress recalculation changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recalculation {
  /// Modules that became complete during this pass, in roadmap order
  pub newly_completed:      Vec<String>,
  /// Roadmap progress after this pass
  pub progress_percentage:  f64,
  /// Highest module index the learner can reach
  pub current_module_index: usize,
}

/// Result of recording study time on a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeUpdate {
  /// Whether this update crossed the auto-completion threshold
  pub auto_completed:        bool,
  /// Tracked time as recorded
  pub time_spent_seconds:    u64,
  /// Estimated duration of the resource
  pub estimated_seconds:     f64,
  /// Tracked time over estimated time, as a percentage with two decimals
  pub completion_percentage: f64,
  /// Modules completed as a consequence of an auto-completion
  pub newly_completed:       Vec<String>,
  /// The modules in `newly_completed` with their summaries, filled in once progress is
  /// stored
  #[serde(default)]
  pub completed_modules:     Vec<CompletedModule>,
}

/// Result of rating a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingOutcome {
  /// Title of the rated resource
  pub resource_title: String,
  /// The score just given
  pub your_rating:    u8,
  /// Mean score, rounded to one decimal
  pub average_rating: f64,
  /// Number of learners who rated it
  pub total_ratings:  u32,
}

/// Applies learner actions to roadmaps.
///
/// The engine logs inside the span it was built with, so callers decide where its
/// events end up.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use pathway::{
///   generation::{GeneratedRoadmap, InitializeOptions},
///   progression::ProgressionEngine,
///   roadmap::ResourceStatus,
/// };
///
/// let mut roadmap = GeneratedRoadmap::from_json(
///   r#"{"modules": [{"title": "Basics", "resources": [
///     {"title": "Intro", "url": "https://example.com/a", "estimated_hours": 1},
///     {"title": "Deep dive", "url": "https://example.com/b", "estimated_hours": 2}]}]}"#,
/// )
/// .unwrap()
/// .initialize(InitializeOptions::new("user-1", "Backend Engineer", 1))
/// .unwrap();
///
/// let engine = ProgressionEngine::new();
/// let module_id = roadmap.modules[0].id.clone();
/// let first = roadmap.modules[0].resources[0].id.clone();
///
/// let report = engine.complete(&mut roadmap, &module_id, &first, Utc::now()).unwrap();
/// assert_eq!(report.progress_percentage, 50.0);
/// assert_eq!(roadmap.modules[0].resources[1].status, ResourceStatus::Unlocked);
/// ```
#[derive(Debug, Clone)]
pub struct ProgressionEngine {
  span: Span,
}

impl Default for ProgressionEngine {
  fn default() -> Self { Self::new() }
}

impl ProgressionEngine {
  /// An engine logging under a `progression` span.
  pub fn new() -> Self { Self::with_span(tracing::info_span!("progression")) }

  /// An engine logging under the given span.
  pub fn with_span(span: Span) -> Self { Self { span } }

  /// The span engine events are logged in.
  pub fn span(&self) -> &Span { &self.span }

  /// Marks a resource as being studied.
  ///
  /// Only an unlocked resource changes status. `opened_at` is stamped the first time a
  /// resource is opened, whatever its status, and never moves afterwards. No
  /// recalculation happens since no resource becomes done.
  pub fn open(
    &self,
    roadmap: &mut Roadmap,
    module_id: &str,
    resource_id: &str,
    now: DateTime<Utc>,
  ) -> Result<OpenOutcome> {
    let _entered = self.span.enter();
    let (m, r) = locate(roadmap, module_id, resource_id)?;
    let resource = &mut roadmap.modules[m].resources[r];

    match resource.status {
      ResourceStatus::Unlocked => resource.status = ResourceStatus::InProgress,
      ResourceStatus::Locked => debug!("Opened locked resource {}", resource.id),
      ResourceStatus::InProgress | ResourceStatus::Completed | ResourceStatus::Skipped => {},
    }
    let opened_at = *resource.opened_at.get_or_insert(now);
    let outcome = OpenOutcome { status: resource.status, opened_at: Some(opened_at) };

    roadmap.updated_at = now;
    trace!("Resource {} is {}", resource_id, outcome.status);
    Ok(outcome)
  }

  /// Marks a resource as finished and rolls progress up.
  ///
  /// Completing an already completed resource keeps its original `completed_at`. A
  /// skipped resource is upgraded to completed.
  pub fn complete(
    &self,
    roadmap: &mut Roadmap,
    module_id: &str,
    resource_id: &str,
    now: DateTime<Utc>,
  ) -> Result<Recalculation> {
    let _entered = self.span.enter();
    let (m, r) = locate(roadmap, module_id, resource_id)?;
    let resource = &mut roadmap.modules[m].resources[r];

    if resource.status == ResourceStatus::Completed {
      trace!("Resource {} was already completed", resource.id);
    } else {
      resource.status = ResourceStatus::Completed;
      resource.completed_at = Some(now);
      info!("Completed resource {} ({})", resource.id, resource.title);
    }
    let order = resource.order;

    self.finish_transition(roadmap, m, order, now)
  }

  /// Marks a resource as already known and rolls progress up.
  ///
  /// Skipping is a no-op for completed resources, and a repeated skip keeps the original
  /// `skipped_at`.
  pub fn skip(
    &self,
    roadmap: &mut Roadmap,
    module_id: &str,
    resource_id: &str,
    now: DateTime<Utc>,
  ) -> Result<Recalculation> {
    let _entered = self.span.enter();
    let (m, r) = locate(roadmap, module_id, resource_id)?;
    let resource = &mut roadmap.modules[m].resources[r];

    match resource.status {
      ResourceStatus::Completed => trace!("Not skipping completed resource {}", resource.id),
      ResourceStatus::Skipped => trace!("Resource {} was already skipped", resource.id),
      ResourceStatus::Locked | ResourceStatus::Unlocked | ResourceStatus::InProgress => {
        resource.status = ResourceStatus::Skipped;
        resource.skipped_at = Some(now);
        info!("Skipped resource {} ({})", resource.id, resource.title);
      },
    }
    let order = resource.order;

    self.finish_transition(roadmap, m, order, now)
  }

  /// Records the absolute study time for a resource.
  ///
  /// Reaching the auto-completion threshold (inclusive) completes a resource that is not
  /// completed yet, unlocks the next resource in its module and rolls progress up. Module
  /// boundaries are left to the recalculation.
  pub fn update_time(
    &self,
    roadmap: &mut Roadmap,
    module_id: &str,
    resource_id: &str,
    seconds: i64,
    now: DateTime<Utc>,
  ) -> Result<TimeUpdate> {
    let _entered = self.span.enter();
    let seconds = u64::try_from(seconds).map_err(|_| {
      PathwayError::InvalidInput(format!("time spent must not be negative, got {seconds}"))
    })?;
    let (m, r) = locate(roadmap, module_id, resource_id)?;
    let resource = &mut roadmap.modules[m].resources[r];

    resource.time_spent_seconds = seconds;
    let estimated_seconds = resource.estimated_seconds();
    let completion_percentage = if resource.estimated_hours > 0.0 {
      round_to(seconds as f64 / estimated_seconds * 100.0, 2)
    } else {
      0.0
    };

    let auto_completed = seconds as f64 >= resource.auto_complete_threshold()
      && resource.status != ResourceStatus::Completed;
    trace!(
      "Resource {} at {}s of {}s (threshold {}s)",
      resource.id,
      seconds,
      estimated_seconds,
      resource.auto_complete_threshold()
    );

    let newly_completed = if auto_completed {
      resource.status = ResourceStatus::Completed;
      resource.completed_at = Some(now);
      info!("Auto-completed resource {} after {}s", resource.id, seconds);
      let order = resource.order;
      self.finish_transition(roadmap, m, order, now)?.newly_completed
    } else {
      roadmap.updated_at = now;
      Vec::new()
    };

    Ok(TimeUpdate {
      auto_completed,
      time_spent_seconds: seconds,
      estimated_seconds,
      completion_percentage,
      newly_completed,
      completed_modules: Vec::new(),
    })
  }

  /// Records `user_id`'s score for the first resource, in module order, served from `url`.
  ///
  /// A user rating the same resource again replaces their earlier rating.
  pub fn rate(
    &self,
    roadmap: &mut Roadmap,
    user_id: &str,
    url: &str,
    score: u8,
    comment: Option<String>,
    now: DateTime<Utc>,
  ) -> Result<RatingOutcome> {
    let _entered = self.span.enter();
    require("user id", user_id)?;
    require("resource url", url)?;
    if !(1..=5).contains(&score) {
      return Err(PathwayError::InvalidInput(format!(
        "rating must be between 1 and 5, got {score}"
      )));
    }

    let resource = roadmap
      .modules
      .iter_mut()
      .flat_map(|m| m.resources.iter_mut())
      .find(|r| r.url == url)
      .ok_or_else(|| PathwayError::NotFound(Entity::ResourceUrl(url.to_string())))?;

    resource.rate(user_id, score, comment, now);
    let outcome = RatingOutcome {
      resource_title: resource.title.clone(),
      your_rating:    score,
      average_rating: resource.rating.unwrap_or(f64::from(score)),
      total_ratings:  resource.rating_count,
    };
    debug!(
      "{} rated {} with {} (mean {} over {})",
      user_id, resource.id, score, outcome.average_rating, outcome.total_ratings
    );

    roadmap.updated_at = now;
    Ok(outcome)
  }

  /// Rolls resource states up into module completion and roadmap progress.
  ///
  /// Returns the modules that became complete in this pass. Calling it again without
  /// other changes reports nothing new.
  pub fn recalculate(&self, roadmap: &mut Roadmap) -> Recalculation {
    let _entered = self.span.enter();
    let mut newly_completed = Vec::new();

    for index in 0..roadmap.modules.len() {
      let module = &mut roadmap.modules[index];
      let done = module.all_done();
      let newly = done && !module.is_completed;
      module.is_completed = done;
      if !newly {
        continue;
      }

      info!("Module {} ({}) completed", module.id, module.title);
      newly_completed.push(module.id.clone());
      if let Some(first) = roadmap.modules.get_mut(index + 1).and_then(|m| m.resources.first_mut())
      {
        if first.unlock() {
          debug!("Unlocked first resource {} of module {}", first.id, index + 1);
        }
      }
    }

    roadmap.current_module_index =
      roadmap.modules.iter().rposition(Module::is_accessible).unwrap_or_default();
    roadmap.progress_percentage = round_to(roadmap.computed_progress(), 2);
    debug!(
      "Roadmap {} at {}%, current module {}",
      roadmap.id, roadmap.progress_percentage, roadmap.current_module_index
    );

    Recalculation {
      newly_completed,
      progress_percentage: roadmap.progress_percentage,
      current_module_index: roadmap.current_module_index,
    }
  }

  /// Unlocks the resource after `order` in module `m`, then recalculates.
  fn finish_transition(
    &self,
    roadmap: &mut Roadmap,
    m: usize,
    order: usize,
    now: DateTime<Utc>,
  ) -> Result<Recalculation> {
    if let Some(next) = roadmap.modules[m].unlock_after(order) {
      debug!("Unlocked resource {}", next);
    }
    roadmap.updated_at = now;
    Ok(self.recalculate(roadmap))
  }
}

fn require(what: &str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    Err(PathwayError::InvalidInput(format!("{what} must not be empty")))
  } else {
    Ok(())
  }
}

/// Resolves ids to (module index, resource index).
fn locate(roadmap: &Roadmap, module_id: &str, resource_id: &str) -> Result<(usize, usize)> {
  require("module id", module_id)?;
  require("resource id", resource_id)?;
  let m = roadmap
    .module_index(module_id)
    .ok_or_else(|| PathwayError::NotFound(Entity::Module(module_id.to_string())))?;
  let r = roadmap.modules[m]
    .position_of(resource_id)
    .ok_or_else(|| PathwayError::NotFound(Entity::Resource(resource_id.to_string())))?;
  Ok((m, r))
}
