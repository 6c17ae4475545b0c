//! Read-only projections over a [`Roadmap`]. Nothing here is stored.

use super::*;

/// Study statistics for a single module, fed to summary generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleProgress {
  /// Tracked time across all resources, in hours with one decimal
  pub time_spent_hours:    f64,
  /// Resources finished by study
  pub resources_completed: usize,
  /// Resources marked as already known
  pub resources_skipped:   usize,
}

/// Compact view of a module inside a [`WeekSummary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleBrief {
  /// Module id
  pub id:              String,
  /// Display title
  pub title:           String,
  /// What the module is about
  pub description:     String,
  /// Names of the skills this module teaches
  pub skills_covered:  Vec<String>,
  /// Estimated hours for the module
  pub estimated_hours: f64,
  /// Whether every resource is done
  pub is_completed:    bool,
  /// Number of resources in the module
  pub resources_count: usize,
}

/// All modules scheduled for one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekSummary {
  /// 1-based week of the plan
  pub week_number:       u32,
  /// Modules scheduled for this week
  pub modules:           Vec<ModuleBrief>,
  /// Sum of module estimates
  pub total_hours:       f64,
  /// How many of `modules` are completed
  pub completed_modules: usize,
}

/// A roadmap grouped by week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeksOverview {
  /// Weeks that have at least one module, in ascending order
  pub weeks:            Vec<WeekSummary>,
  /// Number of entries in `weeks`
  pub total_weeks:      usize,
  /// Role the roadmap prepares for
  pub target_role:      String,
  /// Roadmap progress percentage
  pub overall_progress: f64,
}

impl From<&Roadmap> for WeeksOverview {
  fn from(roadmap: &Roadmap) -> Self {
    let mut weeks: BTreeMap<u32, WeekSummary> = BTreeMap::new();
    for module in &roadmap.modules {
      let week = weeks.entry(module.week_number).or_insert_with(|| WeekSummary {
        week_number:       module.week_number,
        modules:           Vec::new(),
        total_hours:       0.0,
        completed_modules: 0,
      });
      week.modules.push(ModuleBrief {
        id:              module.id.clone(),
        title:           module.title.clone(),
        description:     module.description.clone(),
        skills_covered:  module.skills_covered.clone(),
        estimated_hours: module.estimated_total_hours,
        is_completed:    module.is_completed,
        resources_count: module.resources.len(),
      });
      week.total_hours += module.estimated_total_hours;
      if module.is_completed {
        week.completed_modules += 1;
      }
    }

    let weeks: Vec<WeekSummary> = weeks.into_values().collect();
    Self {
      total_weeks: weeks.len(),
      weeks,
      target_role: roadmap.target_role.clone(),
      overall_progress: roadmap.progress_percentage,
    }
  }
}

/// On-demand report for one module, optionally with an AI-written summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleReport {
  /// Module id
  pub module_id:         String,
  /// Display title
  pub module_title:      String,
  /// Names of the skills this module teaches
  pub skills_covered:    Vec<String>,
  /// Study statistics for the module
  pub progress:          ModuleProgress,
  /// Title of the module that follows, if any
  pub next_module_title: Option<String>,
  /// `None` when the summary generator failed or timed out
  pub ai_summary:        Option<String>,
}
