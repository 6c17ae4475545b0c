//! Per-user learning statistics, derived from the completion and skip timestamps the
//! progression engine records. Nothing here is stored.

use std::collections::BTreeSet;

use chrono::{Datelike, Duration as ChronoDuration, NaiveDate, Weekday};

use super::*;

/// Number of days covered by [`UserAnalytics::daily_activity`], today included.
pub const ACTIVITY_WINDOW_DAYS: i64 = 30;

/// Completions on one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyActivity {
  /// The day
  pub date:               NaiveDate,
  /// Resources completed that day
  pub completed:          usize,
  /// Tracked time on those resources
  pub time_spent_seconds: u64,
}

/// Completions since the most recent Monday.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
  /// Tracked time on resources completed this week, in hours with one decimal
  pub hours:     f64,
  /// Resources completed this week
  pub resources: usize,
}

/// Learning statistics across all of a user's live roadmaps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserAnalytics {
  /// Consecutive days with a completion or skip, ending today or yesterday
  pub learning_streak:           u32,
  /// Tracked time on completed resources
  pub total_time_spent_seconds:  u64,
  /// Resources finished by study
  pub total_resources_completed: usize,
  /// Resources marked as already known
  pub total_resources_skipped:   usize,
  /// Modules whose resources are all done
  pub total_modules_completed:   usize,
  /// Mean roadmap progress, one decimal
  pub average_progress:          f64,
  /// Completed over completed plus skipped, as a percentage with one decimal
  pub completion_rate:           f64,
  /// The last [`ACTIVITY_WINDOW_DAYS`] days, oldest first. Empty without any activity.
  pub daily_activity:            Vec<DailyActivity>,
  /// This week's completions
  pub weekly_summary:            WeeklySummary,
  /// Weekday with the most completions, the earliest weekday on a tie
  pub most_productive_day:       Option<Weekday>,
}

/// A dated completion or skip.
struct Activity {
  /// Calendar day of the transition
  date:               NaiveDate,
  /// False for skips
  completed:          bool,
  /// Tracked time, zero for skips
  time_spent_seconds: u64,
}

impl UserAnalytics {
  /// Computes statistics over `roadmaps` as seen at `now`.
  pub fn from_roadmaps(roadmaps: &[Roadmap], now: DateTime<Utc>) -> Self {
    if roadmaps.is_empty() {
      return Self::default();
    }
    let today = now.date_naive();

    let mut analytics = Self::default();
    let mut activities = Vec::new();
    for module in roadmaps.iter().flat_map(|r| &r.modules) {
      if module.is_completed {
        analytics.total_modules_completed += 1;
      }
      for resource in &module.resources {
        match resource.status {
          ResourceStatus::Completed => {
            analytics.total_resources_completed += 1;
            analytics.total_time_spent_seconds += resource.time_spent_seconds;
            if let Some(at) = resource.completed_at {
              activities.push(Activity {
                date:               at.date_naive(),
                completed:          true,
                time_spent_seconds: resource.time_spent_seconds,
              });
            }
          },
          ResourceStatus::Skipped => {
            analytics.total_resources_skipped += 1;
            if let Some(at) = resource.skipped_at {
              activities.push(Activity {
                date:               at.date_naive(),
                completed:          false,
                time_spent_seconds: 0,
              });
            }
          },
          ResourceStatus::Locked | ResourceStatus::Unlocked | ResourceStatus::InProgress => {},
        }
      }
    }

    let total_progress: f64 = roadmaps.iter().map(|r| r.progress_percentage).sum();
    analytics.average_progress = round_to(total_progress / roadmaps.len() as f64, 1);

    let finished = analytics.total_resources_completed + analytics.total_resources_skipped;
    if finished > 0 {
      analytics.completion_rate =
        round_to(analytics.total_resources_completed as f64 * 100.0 / finished as f64, 1);
    }

    analytics.learning_streak = learning_streak(&activities, today);
    analytics.daily_activity = daily_activity(&activities, today);
    analytics.weekly_summary = weekly_summary(&activities, today);
    analytics.most_productive_day = most_productive_day(&activities);
    analytics
  }
}

/// Consecutive active days ending at the latest one, zero once that is before yesterday.
fn learning_streak(activities: &[Activity], today: NaiveDate) -> u32 {
  let days: BTreeSet<NaiveDate> = activities.iter().map(|a| a.date).collect();
  let Some(&latest) = days.iter().next_back() else { return 0 };
  // A streak survives until the end of the day after its last activity
  if latest != today && latest != today - ChronoDuration::days(1) {
    return 0;
  }

  let mut streak = 0;
  let mut expected = latest;
  for &day in days.iter().rev() {
    if day != expected {
      break;
    }
    streak += 1;
    expected = day - ChronoDuration::days(1);
  }
  streak
}

/// Per-day completions over the activity window.
fn daily_activity(activities: &[Activity], today: NaiveDate) -> Vec<DailyActivity> {
  if activities.is_empty() {
    return Vec::new();
  }
  (0..ACTIVITY_WINDOW_DAYS)
    .rev()
    .map(|offset| {
      let date = today - ChronoDuration::days(offset);
      let (completed, time_spent_seconds) = activities
        .iter()
        .filter(|a| a.completed && a.date == date)
        .fold((0, 0), |(count, secs), a| (count + 1, secs + a.time_spent_seconds));
      DailyActivity { date, completed, time_spent_seconds }
    })
    .collect()
}

/// Completions since Monday of the current week.
fn weekly_summary(activities: &[Activity], today: NaiveDate) -> WeeklySummary {
  let week_start = today - ChronoDuration::days(i64::from(today.weekday().num_days_from_monday()));
  let (resources, seconds) = activities
    .iter()
    .filter(|a| a.completed && a.date >= week_start)
    .fold((0, 0u64), |(count, secs), a| (count + 1, secs + a.time_spent_seconds));
  WeeklySummary { hours: round_to(seconds as f64 / SECONDS_PER_HOUR, 1), resources }
}

/// Weekdays indexed by days from Monday.
const WEEKDAYS: [Weekday; 7] = [
  Weekday::Mon,
  Weekday::Tue,
  Weekday::Wed,
  Weekday::Thu,
  Weekday::Fri,
  Weekday::Sat,
  Weekday::Sun,
];

/// Weekday with the most completions, if any.
fn most_productive_day(activities: &[Activity]) -> Option<Weekday> {
  let mut counts = [0usize; 7];
  for activity in activities.iter().filter(|a| a.completed) {
    counts[activity.date.weekday().num_days_from_monday() as usize] += 1;
  }
  // Reversed so that ties resolve to the earliest weekday
  let (index, &best) = counts.iter().enumerate().rev().max_by_key(|&(_, count)| *count)?;
  (best > 0).then_some(WEEKDAYS[index])
}
