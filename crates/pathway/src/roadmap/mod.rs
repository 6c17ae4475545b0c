//! Roadmap data model.
//!
//! A [`Roadmap`] exclusively owns its [`Module`]s, and each module exclusively owns its
//! [`Resource`]s. These are plain typed records; they are turned into JSON only at the
//! store boundary (see [`database`](crate::database)).
//!
//! The types here hold state and answer questions about it. Every state *change* goes
//! through the [`ProgressionEngine`](crate::progression::ProgressionEngine).

use super::*;

mod analytics;
mod module;
mod overview;
mod resource;

pub use analytics::*;
pub use module::*;
pub use overview::*;
pub use resource::*;

/// A skill the learner needs for the target role but does not yet sufficiently have.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGap {
  /// Skill name
  pub skill:          String,
  /// Where the learner stands today
  pub current_level:  String,
  /// Level the role asks for
  pub required_level: String,
  /// How far apart the two levels are
  #[serde(alias = "gap_severity")]
  pub severity:       String,
  /// How soon the gap should be closed
  #[serde(alias = "learning_priority")]
  pub priority:       String,
}

/// A learner's personalized plan: ordered modules plus global progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roadmap {
  /// Stable unique id, assigned at initialization
  pub id:                    String,
  /// Owning user
  pub user_id:               String,
  /// Role the roadmap prepares for
  pub target_role:           String,
  /// Gaps the roadmap was generated for
  #[serde(default)]
  pub skill_gaps:            Vec<SkillGap>,
  /// Modules in plan order
  pub modules:               Vec<Module>,
  /// Sum of module estimates
  pub total_estimated_hours: f64,
  /// `created_at` plus the plan length
  pub deadline:              DateTime<Utc>,
  /// Share of done resources, `0.0..=100.0`, two decimals
  #[serde(default)]
  pub progress_percentage:   f64,
  /// Highest module index the learner can reach
  #[serde(default)]
  pub current_module_index:  usize,
  /// When the roadmap was initialized
  pub created_at:            DateTime<Utc>,
  /// Last stored change
  pub updated_at:            DateTime<Utc>,
  /// Whether this roadmap is a template others can clone
  #[serde(default)]
  pub is_template:           bool,
  /// Whether the template is listed publicly
  #[serde(default)]
  pub is_public:             bool,
  /// Soft-deleted roadmaps stay stored but are invisible
  #[serde(default)]
  pub is_deleted:            bool,
  /// Template category, only meaningful when `is_template` is set
  #[serde(default)]
  pub category:              Option<String>,
  /// Compare-and-swap counter, bumped by every stored update
  #[serde(default)]
  pub version:               u64,
}

impl Roadmap {
  /// Looks up a module by id.
  pub fn module(&self, module_id: &str) -> Option<&Module> {
    self.modules.iter().find(|m| m.id == module_id)
  }

  /// Index of a module by id.
  pub fn module_index(&self, module_id: &str) -> Option<usize> {
    self.modules.iter().position(|m| m.id == module_id)
  }

  /// Finds a resource by id inside the given module.
  pub fn resource(&self, module_id: &str, resource_id: &str) -> Option<&Resource> {
    self.module(module_id)?.resource(resource_id)
  }

  /// Total number of resources across all modules.
  pub fn total_resources(&self) -> usize { self.modules.iter().map(|m| m.resources.len()).sum() }

  /// Number of completed or skipped resources across all modules.
  pub fn done_resources(&self) -> usize { self.modules.iter().map(Module::done_count).sum() }

  /// Progress as derived from resource statuses, before rounding.
  pub fn computed_progress(&self) -> f64 {
    match self.total_resources() {
      0 => 0.0,
      total => self.done_resources() as f64 * 100.0 / total as f64,
    }
  }

  /// Groups modules by week.
  pub fn weeks_overview(&self) -> WeeksOverview { WeeksOverview::from(self) }
}

/// Rounds `value` to `places` decimal places.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
  let factor = 10f64.powi(places);
  (value * factor).round() / factor
}
