use std::{
  error::Error,
  sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
  },
  time::Duration,
};

use async_trait::async_trait;
use pathway::{
  database::{DatabaseInstruction, DeleteMode, RoadmapFilter, Update},
  error::{Entity, PathwayError},
  generation::{
    GeneratedModule, GeneratedResource, GeneratedRoadmap, GenerationRequest, InitializeOptions,
    RoadmapGenerator,
  },
  roadmap::{Module, ModuleProgress, ResourceKind, ResourceStatus, Roadmap},
  summary::SummaryGenerator,
  Config, Pathway,
};
use tempfile::{tempdir, TempDir};
use tracing_test::traced_test;

mod workflows;

pub type TestResult<T> = Result<T, Box<dyn Error>>;

/// Hands out the same skeleton for every request.
pub struct StaticGenerator(pub GeneratedRoadmap);

#[async_trait]
impl RoadmapGenerator for StaticGenerator {
  async fn generate(&self, _: &GenerationRequest) -> pathway::error::Result<GeneratedRoadmap> {
    Ok(self.0.clone())
  }
}

/// Writes a predictable summary and counts how often it was asked.
#[derive(Clone, Default)]
pub struct CountingSummarizer(pub Arc<AtomicUsize>);

#[async_trait]
impl SummaryGenerator for CountingSummarizer {
  async fn summarize(
    &self,
    module: &Module,
    progress: &ModuleProgress,
  ) -> pathway::error::Result<String> {
    self.0.fetch_add(1, Ordering::SeqCst);
    Ok(format!(
      "Finished {} with {} completed and {} skipped",
      module.title, progress.resources_completed, progress.resources_skipped
    ))
  }
}

/// Never answers in time.
pub struct StalledSummarizer;

#[async_trait]
impl SummaryGenerator for StalledSummarizer {
  async fn summarize(&self, _: &Module, _: &ModuleProgress) -> pathway::error::Result<String> {
    tokio::time::sleep(Duration::from_secs(120)).await;
    Ok("unreachable".into())
  }
}

/// A skeleton with one module per entry, each holding resources of the given hours.
pub fn skeleton(modules: &[&[f64]]) -> GeneratedRoadmap {
  GeneratedRoadmap {
    modules: modules
      .iter()
      .enumerate()
      .map(|(m, hours)| GeneratedModule {
        title:           format!("Module {m}"),
        description:     format!("Everything about topic {m}"),
        skills_covered:  vec![format!("skill-{m}")],
        estimated_hours: None,
        resources:       hours
          .iter()
          .enumerate()
          .map(|(r, h)| GeneratedResource {
            title:           format!("Resource {m}.{r}"),
            url:             format!("https://learn.example.com/{m}/{r}"),
            description:     String::new(),
            estimated_hours: *h,
            resource_type:   ResourceKind::Video,
          })
          .collect(),
      })
      .collect(),
  }
}

pub async fn create_test_pathway_with(
  summarizer: impl SummaryGenerator + 'static,
  generated: GeneratedRoadmap,
) -> (Pathway, TempDir, TempDir) {
  let config_dir = tempdir().unwrap();
  let database_dir = tempdir().unwrap();
  let config = Config::default()
    .with_database_path(&database_dir.path().join("pathway.db"))
    .with_summary_timeout(Duration::from_secs(1));
  let pathway = Pathway::builder()
    .with_path(config_dir.path())
    .with_config(config)
    .with_generator(StaticGenerator(generated))
    .with_summarizer(summarizer)
    .build()
    .await
    .unwrap();
  (pathway, config_dir, database_dir)
}

pub async fn create_test_pathway() -> (Pathway, TempDir, TempDir) {
  create_test_pathway_with(CountingSummarizer::default(), skeleton(&[&[1.0, 1.0], &[2.0]])).await
}

/// Ids of a resource as (module id, resource id).
pub fn ids(roadmap: &Roadmap, m: usize, r: usize) -> (String, String) {
  (roadmap.modules[m].id.clone(), roadmap.modules[m].resources[r].id.clone())
}
