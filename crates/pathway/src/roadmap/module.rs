use super::*;

/// An ordered group of [`Resource`]s assigned to one week of a roadmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
  /// Stable unique id, assigned at initialization
  pub id:                    String,
  /// Display title
  pub title:                 String,
  /// What the module is about
  pub description:           String,
  /// Names of the skills this module teaches
  #[serde(default)]
  pub skills_covered:        Vec<String>,
  /// Resources in transition order
  pub resources:             Vec<Resource>,
  /// Supplied by the generator, or the sum of resource estimates
  pub estimated_total_hours: f64,
  /// 1-based week of the plan
  pub week_number:           u32,
  /// Position within the roadmap
  pub order:                 usize,
  /// True iff the module has resources and all of them are done
  #[serde(default)]
  pub is_completed:          bool,
  /// Summary written when the module was completed
  #[serde(default)]
  pub completion_summary:    Option<String>,
  /// When `completion_summary` was written
  #[serde(default)]
  pub summary_generated_at:  Option<DateTime<Utc>>,
}

impl Module {
  /// Looks up a resource by id.
  pub fn resource(&self, resource_id: &str) -> Option<&Resource> {
    self.resources.iter().find(|r| r.id == resource_id)
  }

  /// Index of a resource by id.
  pub fn position_of(&self, resource_id: &str) -> Option<usize> {
    self.resources.iter().position(|r| r.id == resource_id)
  }

  /// The entry resource of the module, if it has any.
  pub fn first_resource(&self) -> Option<&Resource> { self.resources.first() }

  /// Number of resources that are completed or skipped.
  pub fn done_count(&self) -> usize { self.resources.iter().filter(|r| r.status.is_done()).count() }

  /// Whether every resource is done.
  ///
  /// A module without resources is never considered done.
  pub fn all_done(&self) -> bool {
    !self.resources.is_empty() && self.done_count() == self.resources.len()
  }

  /// Whether the learner can reach this module.
  pub fn is_accessible(&self) -> bool {
    self.is_completed || self.first_resource().is_some_and(|r| r.status.is_accessible())
  }

  /// Unlocks the resource that follows `order` in transition order, if it is locked.
  ///
  /// Returns the id of the resource that was unlocked.
  pub fn unlock_after(&mut self, order: usize) -> Option<String> {
    let next = self.resources.iter_mut().find(|r| r.order == order + 1)?;
    next.unlock().then(|| next.id.clone())
  }

  /// Aggregate study statistics for this module.
  pub fn progress(&self) -> ModuleProgress {
    let seconds: u64 = self.resources.iter().map(|r| r.time_spent_seconds).sum();
    ModuleProgress {
      time_spent_hours:    round_to(seconds as f64 / SECONDS_PER_HOUR, 1),
      resources_completed: self
        .resources
        .iter()
        .filter(|r| r.status == ResourceStatus::Completed)
        .count(),
      resources_skipped:   self
        .resources
        .iter()
        .filter(|r| r.status == ResourceStatus::Skipped)
        .count(),
    }
  }
}
