//! Terminal input and output for CLI commands.
//!
//! Commands talk to the user only through [`UserInteraction`], so they never print or
//! prompt directly.

use console::{style, Emoji};
use dialoguer::{Confirm, Input};
use pathway::roadmap::ResourceStatus;

use super::*;

/// Prefix for informational lines
pub static INFO_PREFIX: &str = "ℹ ";
/// Prefix for successful outcomes
pub static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for errors
pub static ERROR_PREFIX: &str = "✗ ";
/// Prefix for warnings
pub static WARNING_PREFIX: &str = "! ";
/// Prefix for prompts
pub static PROMPT_PREFIX: &str = "❯ ";
/// Tree branch for a list item
pub static ITEM_PREFIX: &str = "├─";
/// Tree branch for the last list item
pub static LAST_ITEM_PREFIX: &str = "└─";
/// Tree continuation under an item
pub static CONTINUE_PREFIX: &str = "│  ";
/// Marker for nested entries
pub static BULLET: &str = "•";
/// Points at what comes next
pub static ARROW: &str = "→";

/// Something a command wants to show the user.
#[derive(Debug)]
pub enum ResponseContent<'a> {
  /// One roadmap as a module tree
  Roadmap(&'a Roadmap),
  /// A list of roadmaps
  Roadmaps(&'a [Roadmap]),
  /// A week by week overview
  Overview(&'a WeeksOverview),
  /// A module report
  Report(&'a ModuleReport),
  /// Learning statistics
  Analytics(&'a UserAnalytics),
  /// Modules that were just completed
  Completed(&'a [CompletedModule]),
  /// The result of opening a resource
  Opened(&'a OpenOutcome),
  /// The result of recording study time
  Time(&'a TimeUpdate),
  /// The result of rating a resource
  Rating(&'a RatingOutcome),
  /// A finished action
  Success(&'a str),
  /// A failed command
  Error(&'a PathwaydError),
  /// Anything else worth telling
  Info(&'a str),
}

/// How commands reach the user and the library.
pub trait UserInteraction {
  /// The library handle commands act on
  fn pathway(&mut self) -> &mut Pathway;
  /// Asks a yes/no question
  fn confirm(&self, message: &str) -> Result<bool>;
  /// Asks for a line of text
  fn prompt(&self, message: &str) -> Result<String>;
  /// Shows a result to the user
  fn reply(&self, content: ResponseContent) -> Result<()>;
}

/// A [`UserInteraction`] on the controlling terminal.
pub struct Interaction {
  pathway:         Pathway,
  accept_defaults: bool,
}

impl Interaction {
  /// Wraps an opened [`Pathway`].
  pub fn new(pathway: Pathway, accept_defaults: bool) -> Self { Self { pathway, accept_defaults } }
}

impl UserInteraction for Interaction {
  fn pathway(&mut self) -> &mut Pathway { &mut self.pathway }

  fn confirm(&self, message: &str) -> Result<bool> {
    if self.accept_defaults {
      return Ok(true);
    }
    Ok(
      Confirm::new()
        .with_prompt(format!("{}{}", style(PROMPT_PREFIX).cyan(), message))
        .default(false)
        .wait_for_newline(true)
        .interact()?,
    )
  }

  fn prompt(&self, message: &str) -> Result<String> {
    Ok(
      Input::<String>::new()
        .with_prompt(format!("{}{}", style(PROMPT_PREFIX).cyan(), message))
        .interact_text()?,
    )
  }

  fn reply(&self, content: ResponseContent) -> Result<()> {
    match content {
      ResponseContent::Roadmap(roadmap) => print_roadmap(roadmap),
      ResponseContent::Roadmaps(roadmaps) => {
        if roadmaps.is_empty() {
          println!("{} No roadmaps found", style(INFO_PREFIX).blue());
        } else {
          println!("{} Found {} roadmaps", style(INFO_PREFIX).blue(), roadmaps.len());
        }
        for (i, roadmap) in roadmaps.iter().enumerate() {
          let prefix = if i + 1 == roadmaps.len() { LAST_ITEM_PREFIX } else { ITEM_PREFIX };
          println!(
            "{} {} {} {}",
            style(prefix).dim(),
            style(&roadmap.target_role).white().bold(),
            style(format!("{:.2}%", roadmap.progress_percentage)).green(),
            style(&roadmap.id).dim()
          );
        }
      },
      ResponseContent::Overview(overview) => {
        println!(
          "{} {} over {} weeks, {:.2}% done",
          style(INFO_PREFIX).blue(),
          style(&overview.target_role).white().bold(),
          overview.total_weeks,
          overview.overall_progress
        );
        for week in &overview.weeks {
          println!(
            "{} Week {} ({:.1}h, {}/{} modules done)",
            style(ITEM_PREFIX).dim(),
            week.week_number,
            week.total_hours,
            week.completed_modules,
            week.modules.len()
          );
          for module in &week.modules {
            let mark = if module.is_completed { SUCCESS_PREFIX } else { BULLET };
            println!(
              "{}  {} {} {}",
              style(CONTINUE_PREFIX).dim(),
              style(mark).green(),
              module.title,
              style(format!("{} resources", module.resources_count)).dim()
            );
          }
        }
      },
      ResponseContent::Analytics(analytics) => {
        println!(
          "{} {} day streak, {:.1}% average progress",
          style(INFO_PREFIX).blue(),
          style(analytics.learning_streak).white().bold(),
          analytics.average_progress
        );
        println!(
          "{} {} completed, {} skipped, {:.1}% completion rate",
          style(ITEM_PREFIX).dim(),
          analytics.total_resources_completed,
          analytics.total_resources_skipped,
          analytics.completion_rate
        );
        println!(
          "{} {} modules completed, {:.1}h tracked",
          style(ITEM_PREFIX).dim(),
          analytics.total_modules_completed,
          analytics.total_time_spent_seconds as f64 / 3600.0
        );
        println!(
          "{} This week: {} resources, {:.1}h",
          style(ITEM_PREFIX).dim(),
          analytics.weekly_summary.resources,
          analytics.weekly_summary.hours
        );
        if let Some(day) = analytics.most_productive_day {
          println!("{} Most productive on {}", style(LAST_ITEM_PREFIX).dim(), day);
        }
      },
      ResponseContent::Report(report) => {
        println!("{} {}", style(INFO_PREFIX).blue(), style(&report.module_title).white().bold());
        println!(
          "{} {:.2}h spent, {} completed, {} skipped",
          style(CONTINUE_PREFIX).dim(),
          report.progress.time_spent_hours,
          report.progress.resources_completed,
          report.progress.resources_skipped
        );
        if !report.skills_covered.is_empty() {
          println!("{} Skills: {}", style(CONTINUE_PREFIX).dim(), report.skills_covered.join(", "));
        }
        if let Some(next) = &report.next_module_title {
          println!("{} Next up {} {}", style(CONTINUE_PREFIX).dim(), ARROW, next);
        }
        match &report.ai_summary {
          Some(summary) => println!("\n{summary}"),
          None => println!("{} No summary available", style(WARNING_PREFIX).yellow()),
        }
      },
      ResponseContent::Completed(modules) =>
        for module in modules {
          println!(
            "{} {} {}",
            style(SUCCESS_PREFIX).green(),
            Emoji("🎉", ""),
            style(format!("Module completed: {}", module.module_title)).green().bold()
          );
          if let Some(summary) = &module.summary {
            println!("{summary}");
          }
        },
      ResponseContent::Opened(outcome) =>
        println!("{} Resource is now {}", style(INFO_PREFIX).blue(), style(outcome.status).cyan()),
      ResponseContent::Time(update) => {
        println!(
          "{} Tracked {}s of {:.0}s ({:.2}%)",
          style(INFO_PREFIX).blue(),
          update.time_spent_seconds,
          update.estimated_seconds,
          update.completion_percentage
        );
        if update.auto_completed {
          println!("{} Resource completed", style(SUCCESS_PREFIX).green());
        }
      },
      ResponseContent::Rating(outcome) => println!(
        "{} Rated {} with {}, average {:.2} over {} ratings",
        style(SUCCESS_PREFIX).green(),
        style(&outcome.resource_title).white().bold(),
        outcome.your_rating,
        outcome.average_rating,
        outcome.total_ratings
      ),
      ResponseContent::Success(message) =>
        println!("{} {}", style(SUCCESS_PREFIX).green(), message),
      ResponseContent::Error(error) => eprintln!("{} {}", style(ERROR_PREFIX).red(), error),
      ResponseContent::Info(message) => println!("{} {}", style(INFO_PREFIX).blue(), message),
    }
    Ok(())
  }
}

/// Prints a roadmap as a module and resource tree.
fn print_roadmap(roadmap: &Roadmap) {
  println!(
    "{} {} {}",
    style(INFO_PREFIX).blue(),
    style(&roadmap.target_role).white().bold(),
    style(&roadmap.id).dim()
  );
  println!(
    "{} {:.2}% done, {:.1}h planned, due {}",
    style(CONTINUE_PREFIX).dim(),
    roadmap.progress_percentage,
    roadmap.total_estimated_hours,
    roadmap.deadline.format("%Y-%m-%d")
  );

  for (m, module) in roadmap.modules.iter().enumerate() {
    let current = if m == roadmap.current_module_index { ARROW } else { " " };
    println!(
      "{} {} Week {}: {} {}",
      style(ITEM_PREFIX).dim(),
      style(current).cyan(),
      module.week_number,
      style(&module.title).white().bold(),
      style(&module.id).dim()
    );
    for resource in &module.resources {
      let status = match resource.status {
        ResourceStatus::Completed | ResourceStatus::Skipped => style(resource.status).green(),
        ResourceStatus::InProgress => style(resource.status).yellow(),
        ResourceStatus::Unlocked => style(resource.status).cyan(),
        ResourceStatus::Locked => style(resource.status).dim(),
      };
      println!(
        "{}  {} {} [{}] {}",
        style(CONTINUE_PREFIX).dim(),
        style(BULLET).dim(),
        resource.title,
        status,
        style(&resource.id).dim()
      );
    }
  }
}
