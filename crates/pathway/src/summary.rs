//! Module summaries written by an AI collaborator.
//!
//! Summaries are a courtesy: they are requested after progression state has been stored,
//! every request is bounded by a timeout, and any failure simply means there is no
//! summary.

use super::*;
use crate::{
  configuration::Config,
  llm::{LlamaRequest, Model, OllamaEndpoint, Options},
};

/// A module that became complete, with its summary if one could be written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedModule {
  /// Module id
  pub module_id:    String,
  /// Display title
  pub module_title: String,
  /// Summary, `None` when none could be written in time
  pub summary:      Option<String>,
}

/// Writes a short free-text summary of a learner's work on a module.
#[async_trait]
pub trait SummaryGenerator: Send + Sync {
  async fn summarize(&self, module: &Module, progress: &ModuleProgress) -> Result<String>;
}

/// The instruction sent to a language model for a module summary.
pub fn summary_prompt(module: &Module, progress: &ModuleProgress) -> String {
  format!(
    "Generate a motivational summary for a student who just completed a learning module.

Module: {title}
Skills Covered: {skills}
Time Spent: {hours} hours
Resources Completed: {completed}
Resources Skipped: {skipped}

Create a brief, encouraging summary (3-4 sentences) highlighting what they have \
     accomplished, the skills they have gained, and what comes next.

Return only the summary text.",
    title = module.title,
    skills = module.skills_covered.join(", "),
    hours = progress.time_spent_hours,
    completed = progress.resources_completed,
    skipped = progress.resources_skipped,
  )
}

/// A [`SummaryGenerator`] backed by an Ollama chat model.
#[derive(Debug, Clone)]
pub struct LlmSummaryGenerator {
  host:  String,
  model: Model,
}

impl LlmSummaryGenerator {
  /// A summarizer talking to `model` on the Ollama server at `host`.
  pub fn new(host: impl Into<String>, model: Model) -> Self { Self { host: host.into(), model } }

  /// A summarizer using the configured host and model.
  pub fn from_config(config: &Config) -> Self {
    Self::new(config.llm_host.clone(), config.llm_model.clone())
  }
}

#[async_trait]
impl SummaryGenerator for LlmSummaryGenerator {
  async fn summarize(&self, module: &Module, progress: &ModuleProgress) -> Result<String> {
    let response = LlamaRequest::new()
      .with_host(&self.host)
      .with_endpoint(OllamaEndpoint::Chat)
      .with_model(self.model.clone())
      .with_options(Options::default().with_temperature(0.8).with_max_tokens(512))
      .with_message(&summary_prompt(module, progress))
      .send()
      .await
      .map_err(|e| PathwayError::UpstreamGeneration(e.to_string()))?;

    let summary = response.message.content.trim().to_string();
    if summary.is_empty() {
      return Err(PathwayError::UpstreamGeneration("model returned an empty summary".to_string()));
    }
    Ok(summary)
  }
}

/// Asks `generator` for a summary of `module`, giving up after `limit`.
///
/// Failures and timeouts are logged and yield `None`.
pub async fn summarize_within(
  generator: &dyn SummaryGenerator,
  module: &Module,
  limit: Duration,
) -> Option<String> {
  let progress = module.progress();
  match tokio::time::timeout(limit, generator.summarize(module, &progress)).await {
    Ok(Ok(summary)) => {
      debug!("Summary written for module {}", module.id);
      Some(summary)
    },
    Ok(Err(e)) => {
      warn!("Summary for module {} unavailable: {e}", module.id);
      None
    },
    Err(_) => {
      warn!("Summary for module {} timed out after {:?}", module.id, limit);
      None
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  struct Fixed(&'static str);

  #[async_trait]
  impl SummaryGenerator for Fixed {
    async fn summarize(&self, module: &Module, _: &ModuleProgress) -> Result<String> {
      Ok(format!("{} {}", self.0, module.title))
    }
  }

  struct Failing;

  #[async_trait]
  impl SummaryGenerator for Failing {
    async fn summarize(&self, _: &Module, _: &ModuleProgress) -> Result<String> {
      Err(PathwayError::UpstreamGeneration("service down".into()))
    }
  }

  struct Slow;

  #[async_trait]
  impl SummaryGenerator for Slow {
    async fn summarize(&self, _: &Module, _: &ModuleProgress) -> Result<String> {
      tokio::time::sleep(Duration::from_secs(60)).await;
      Ok("too late".into())
    }
  }

  fn module() -> Module {
    Module {
      id:                    "m-1".into(),
      title:                 "Ownership".into(),
      description:           String::new(),
      skills_covered:        vec!["borrowing".into(), "lifetimes".into()],
      resources:             Vec::new(),
      estimated_total_hours: 3.0,
      week_number:           1,
      order:                 0,
      is_completed:          true,
      completion_summary:    None,
      summary_generated_at:  None,
    }
  }

  #[tokio::test]
  async fn test_summary_passes_through() {
    let summary = summarize_within(&Fixed("Well done on"), &module(), Duration::from_secs(1)).await;
    assert_eq!(summary.as_deref(), Some("Well done on Ownership"));
  }

  #[traced_test]
  #[tokio::test]
  async fn test_failure_degrades_to_none() {
    assert_eq!(summarize_within(&Failing, &module(), Duration::from_secs(1)).await, None);
    assert!(logs_contain("unavailable"));
  }

  #[traced_test]
  #[tokio::test]
  async fn test_timeout_degrades_to_none() {
    assert_eq!(summarize_within(&Slow, &module(), Duration::from_millis(50)).await, None);
    assert!(logs_contain("timed out"));
  }

  #[test]
  fn test_prompt_mentions_progress() {
    let progress =
      ModuleProgress { time_spent_hours: 2.5, resources_completed: 3, resources_skipped: 1 };
    let prompt = summary_prompt(&module(), &progress);
    assert!(prompt.contains("Module: Ownership"));
    assert!(prompt.contains("Skills Covered: borrowing, lifetimes"));
    assert!(prompt.contains("Time Spent: 2.5 hours"));
    assert!(prompt.contains("Resources Completed: 3"));
    assert!(prompt.contains("Resources Skipped: 1"));
  }
}
