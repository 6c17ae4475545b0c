//! The [`Pathway`] facade: storage, progression and AI collaborators in one handle.
//!
//! Every learner action is one read-modify-write cycle against a single roadmap:
//!
//! 1. read the roadmap (and its version) from the [`Database`]
//! 2. apply the action with the [`ProgressionEngine`]
//! 3. write it back with a compare-and-swap [`Update`]
//!
//! A lost race surfaces as [`PathwayError::ConcurrencyConflict`] and nothing is retried.
//! Module summaries for newly completed modules are requested only after step 3, and a
//! summary that cannot be written never undoes the stored progress.
//!
//! # Examples
//!
//! ```no_run
//! use pathway::{generation::GenerationRequest, roadmap::SkillGap, Pathway};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pathway = Pathway::from_path(pathway::Config::default_path()?).await?;
//!
//! let request = GenerationRequest {
//!   skill_gaps:     Vec::<SkillGap>::new(),
//!   target_role:    "Data Engineer".into(),
//!   hours_per_week: pathway.config.hours_per_week,
//!   weeks:          pathway.config.default_weeks,
//!   difficulty:     pathway.config.difficulty,
//! };
//! let roadmap = pathway.generate_roadmap(request, "user-1").await?;
//!
//! let overview = pathway.weeks_overview("user-1").await?;
//! println!("{} weeks planned for {}", overview.total_weeks, roadmap.target_role);
//! # Ok(())
//! # }
//! ```

use tracing::Span;

use super::*;
use crate::{
  database::{Add, Database, DatabaseInstruction, DeleteMode, Query, Remove, RoadmapFilter, Update},
  generation::{
    GeneratedRoadmap, GenerationRequest, InitializeOptions, LlmRoadmapGenerator, RoadmapGenerator,
  },
  progression::{OpenOutcome, ProgressionEngine, RatingOutcome, TimeUpdate},
  summary::{summarize_within, CompletedModule, LlmSummaryGenerator, SummaryGenerator},
};

/// Entry point for working with stored roadmaps.
pub struct Pathway {
  /// Active configuration
  pub config:   Config,
  /// Roadmap storage
  pub database: Database,
  engine:       ProgressionEngine,
  generator:    Arc<dyn RoadmapGenerator>,
  summarizer:   Arc<dyn SummaryGenerator>,
}

/// Builder for [`Pathway`].
///
/// Without an explicit configuration the builder loads `config.toml` from the
/// configuration directory. With one, it writes it there first.
#[derive(Default)]
pub struct PathwayBuilder {
  config_dir: Option<PathBuf>,
  config:     Option<Config>,
  database:   Option<Database>,
  generator:  Option<Arc<dyn RoadmapGenerator>>,
  summarizer: Option<Arc<dyn SummaryGenerator>>,
  span:       Option<Span>,
}

impl PathwayBuilder {
  /// Configuration directory, `~/.pathway` when not set.
  pub fn with_path(mut self, dir: impl AsRef<Path>) -> Self {
    self.config_dir = Some(dir.as_ref().to_path_buf());
    self
  }

  /// Uses `config` and writes it to the configuration directory.
  pub fn with_config(mut self, config: Config) -> Self {
    self.config = Some(config);
    self
  }

  /// Uses an already opened database instead of `config.database_path`.
  pub fn with_database(mut self, database: Database) -> Self {
    self.database = Some(database);
    self
  }

  /// Replaces the language model roadmap generator.
  pub fn with_generator(mut self, generator: impl RoadmapGenerator + 'static) -> Self {
    self.generator = Some(Arc::new(generator));
    self
  }

  /// Replaces the language model summary generator.
  pub fn with_summarizer(mut self, summarizer: impl SummaryGenerator + 'static) -> Self {
    self.summarizer = Some(Arc::new(summarizer));
    self
  }

  /// Span the progression engine logs under.
  pub fn with_span(mut self, span: Span) -> Self {
    self.span = Some(span);
    self
  }

  pub async fn build(self) -> Result<Pathway> {
    let dir = match self.config_dir {
      Some(dir) => dir,
      None => Config::default_path()?,
    };
    let config = match self.config {
      Some(config) => {
        config.save(&dir)?;
        config
      },
      None => Config::load(&dir)?,
    };

    let database = match self.database {
      Some(database) => database,
      None => Database::open(&config.database_path).await?,
    };
    let generator =
      self.generator.unwrap_or_else(|| Arc::new(LlmRoadmapGenerator::from_config(&config)));
    let summarizer =
      self.summarizer.unwrap_or_else(|| Arc::new(LlmSummaryGenerator::from_config(&config)));
    let engine = ProgressionEngine::with_span(
      self.span.unwrap_or_else(|| tracing::info_span!("pathway", db = %config.database_path.display())),
    );

    info!("Pathway ready with database {}", config.database_path.display());
    Ok(Pathway { config, database, engine, generator, summarizer })
  }
}

impl Pathway {
  /// Starts configuring a [`Pathway`].
  pub fn builder() -> PathwayBuilder { PathwayBuilder::default() }

  /// Opens the instance configured in `dir`.
  pub async fn from_path(dir: impl AsRef<Path>) -> Result<Self> {
    Self::builder().with_path(dir).build().await
  }

  /// Stores a roadmap built from an already generated skeleton.
  #[instrument(skip(self, generated), fields(user = %options.user_id))]
  pub async fn create_roadmap(
    &mut self,
    generated: GeneratedRoadmap,
    options: InitializeOptions,
  ) -> Result<Roadmap> {
    let roadmap = generated.initialize(options)?;
    Add::roadmap(roadmap).execute(&mut self.database).await
  }

  /// Asks the configured generator for a roadmap and stores it.
  ///
  /// Nothing is stored when generation fails.
  #[instrument(skip(self, request), fields(role = %request.target_role))]
  pub async fn generate_roadmap(
    &mut self,
    request: GenerationRequest,
    user_id: &str,
  ) -> Result<Roadmap> {
    if request.weeks == 0 {
      return Err(PathwayError::InvalidInput("a roadmap needs at least one week".to_string()));
    }
    let generated = self.generator.generate(&request).await?;
    let options = InitializeOptions::new(user_id, request.target_role, request.weeks)
      .with_skill_gaps(request.skill_gaps);
    self.create_roadmap(generated, options).await
  }

  /// A live roadmap by id.
  pub async fn roadmap(&mut self, roadmap_id: &str) -> Result<Roadmap> {
    Query::by_id(roadmap_id)
      .execute(&mut self.database)
      .await?
      .pop()
      .ok_or_else(|| PathwayError::roadmap_not_found(roadmap_id))
  }

  /// A user's live roadmaps, filtered and sorted.
  pub async fn roadmaps(&mut self, user_id: &str, filter: RoadmapFilter) -> Result<Vec<Roadmap>> {
    Query::for_user(user_id).with_filter(filter).execute(&mut self.database).await
  }

  /// Live templates, optionally in one category.
  pub async fn templates(&mut self, category: Option<&str>) -> Result<Vec<Roadmap>> {
    Query::templates(category).execute(&mut self.database).await
  }

  /// Turns a stored roadmap into a public template.
  #[instrument(skip(self))]
  pub async fn publish_template(
    &mut self,
    roadmap_id: &str,
    category: Option<String>,
  ) -> Result<Roadmap> {
    let mut roadmap = self.roadmap(roadmap_id).await?;
    roadmap.is_template = true;
    roadmap.is_public = true;
    roadmap.category = category;
    roadmap.updated_at = Utc::now();
    Update::roadmap(&roadmap).execute(&mut self.database).await
  }

  /// Creates a fresh roadmap for `user_id` from a template.
  #[instrument(skip(self))]
  pub async fn clone_template(&mut self, template_id: &str, user_id: &str) -> Result<Roadmap> {
    if user_id.trim().is_empty() {
      return Err(PathwayError::InvalidInput("user id must not be empty".to_string()));
    }
    let template = Query::by_id(template_id)
      .execute(&mut self.database)
      .await?
      .into_iter()
      .find(|r| r.is_template)
      .ok_or_else(|| PathwayError::NotFound(Entity::Template(template_id.to_string())))?;

    let roadmap = template.clone_for(user_id, Utc::now());
    info!("Cloned template {} into roadmap {}", template.id, roadmap.id);
    Add::roadmap(roadmap).execute(&mut self.database).await
  }

  /// Deletes a roadmap, softly or for good.
  #[instrument(skip(self))]
  pub async fn delete_roadmap(&mut self, roadmap_id: &str, mode: DeleteMode) -> Result<()> {
    let removed = Remove::by_id(roadmap_id).mode(mode).execute(&mut self.database).await?;
    if removed.is_empty() {
      return Err(PathwayError::roadmap_not_found(roadmap_id));
    }
    Ok(())
  }

  #[instrument(skip(self))]
  pub async fn open_resource(
    &mut self,
    roadmap_id: &str,
    module_id: &str,
    resource_id: &str,
  ) -> Result<OpenOutcome> {
    let (_, outcome) = self
      .transition(roadmap_id, |engine, roadmap, now| {
        engine.open(roadmap, module_id, resource_id, now)
      })
      .await?;
    Ok(outcome)
  }

  /// Completes a resource and returns the modules this finished, with summaries where
  /// available.
  #[instrument(skip(self))]
  pub async fn complete_resource(
    &mut self,
    roadmap_id: &str,
    module_id: &str,
    resource_id: &str,
  ) -> Result<Vec<CompletedModule>> {
    let (roadmap, report) = self
      .transition(roadmap_id, |engine, roadmap, now| {
        engine.complete(roadmap, module_id, resource_id, now)
      })
      .await?;
    Ok(self.summarize_completed(roadmap, &report.newly_completed).await)
  }

  /// Skips a resource and returns the modules this finished.
  #[instrument(skip(self))]
  pub async fn skip_resource(
    &mut self,
    roadmap_id: &str,
    module_id: &str,
    resource_id: &str,
  ) -> Result<Vec<CompletedModule>> {
    let (roadmap, report) = self
      .transition(roadmap_id, |engine, roadmap, now| {
        engine.skip(roadmap, module_id, resource_id, now)
      })
      .await?;
    Ok(self.summarize_completed(roadmap, &report.newly_completed).await)
  }

  /// Records absolute study time for a resource.
  ///
  /// Modules finished by an auto-completion come back in
  /// [`TimeUpdate::completed_modules`], with summaries where available.
  #[instrument(skip(self))]
  pub async fn update_time(
    &mut self,
    roadmap_id: &str,
    module_id: &str,
    resource_id: &str,
    seconds: i64,
  ) -> Result<TimeUpdate> {
    let (roadmap, mut update) = self
      .transition(roadmap_id, |engine, roadmap, now| {
        engine.update_time(roadmap, module_id, resource_id, seconds, now)
      })
      .await?;
    update.completed_modules = self.summarize_completed(roadmap, &update.newly_completed).await;
    Ok(update)
  }

  /// Rates the resource served from `url` in one of `user_id`'s roadmaps.
  #[instrument(skip(self, comment))]
  pub async fn rate_resource(
    &mut self,
    roadmap_id: &str,
    user_id: &str,
    url: &str,
    score: u8,
    comment: Option<String>,
  ) -> Result<RatingOutcome> {
    let (_, outcome) = self
      .transition(roadmap_id, |engine, roadmap, now| {
        if roadmap.user_id != user_id {
          return Err(PathwayError::roadmap_not_found(roadmap_id));
        }
        engine.rate(roadmap, user_id, url, score, comment, now)
      })
      .await?;
    Ok(outcome)
  }

  /// Week-by-week view of the user's most recent roadmap.
  pub async fn weeks_overview(&mut self, user_id: &str) -> Result<WeeksOverview> {
    let roadmap = Query::latest_for_user(user_id)
      .execute(&mut self.database)
      .await?
      .pop()
      .ok_or_else(|| PathwayError::NotFound(Entity::UserRoadmap(user_id.to_string())))?;
    Ok(roadmap.weeks_overview())
  }

  /// Learning statistics across all of `user_id`'s live roadmaps.
  ///
  /// A user without roadmaps gets all-zero statistics rather than an error.
  pub async fn analytics(&mut self, user_id: &str) -> Result<UserAnalytics> {
    let roadmaps = Query::for_user(user_id).execute(&mut self.database).await?;
    trace!("Computing analytics for {} over {} roadmaps", user_id, roadmaps.len());
    Ok(UserAnalytics::from_roadmaps(&roadmaps, Utc::now()))
  }

  /// Progress report for one module.
  ///
  /// A stored completion summary is reused; otherwise the summary generator is asked,
  /// and its answer is not stored.
  #[instrument(skip(self))]
  pub async fn module_summary(&mut self, roadmap_id: &str, module_id: &str) -> Result<ModuleReport> {
    let roadmap = self.roadmap(roadmap_id).await?;
    let index = roadmap
      .module_index(module_id)
      .ok_or_else(|| PathwayError::NotFound(Entity::Module(module_id.to_string())))?;
    let module = &roadmap.modules[index];

    let ai_summary = match &module.completion_summary {
      Some(summary) => Some(summary.clone()),
      None =>
        summarize_within(self.summarizer.as_ref(), module, self.config.summary_timeout()).await,
    };

    Ok(ModuleReport {
      module_id: module.id.clone(),
      module_title: module.title.clone(),
      skills_covered: module.skills_covered.clone(),
      progress: module.progress(),
      next_module_title: roadmap.modules.get(index + 1).map(|m| m.title.clone()),
      ai_summary,
    })
  }

  /// Reads a roadmap, applies `apply`, and writes it back guarded by its version.
  async fn transition<T>(
    &mut self,
    roadmap_id: &str,
    apply: impl FnOnce(&ProgressionEngine, &mut Roadmap, DateTime<Utc>) -> Result<T>,
  ) -> Result<(Roadmap, T)> {
    let mut roadmap = self.roadmap(roadmap_id).await?;
    let outcome = apply(&self.engine, &mut roadmap, Utc::now())?;
    let stored = Update::roadmap(&roadmap).execute(&mut self.database).await?;
    Ok((stored, outcome))
  }

  /// Writes summaries for freshly completed modules, after progress is already stored.
  async fn summarize_completed(
    &mut self,
    mut roadmap: Roadmap,
    module_ids: &[String],
  ) -> Vec<CompletedModule> {
    let limit = self.config.summary_timeout();
    let now = Utc::now();
    let mut completed = Vec::with_capacity(module_ids.len());

    for module_id in module_ids {
      let Some(index) = roadmap.module_index(module_id) else { continue };
      let summary = summarize_within(self.summarizer.as_ref(), &roadmap.modules[index], limit).await;

      let module = &mut roadmap.modules[index];
      if let Some(text) = &summary {
        module.completion_summary = Some(text.clone());
        module.summary_generated_at = Some(now);
      }
      completed.push(CompletedModule {
        module_id: module.id.clone(),
        module_title: module.title.clone(),
        summary,
      });
    }

    if completed.iter().any(|c| c.summary.is_some()) {
      if let Err(e) = Update::roadmap(&roadmap).execute(&mut self.database).await {
        warn!("Dropping module summaries for roadmap {}: {e}", roadmap.id);
      }
    }
    completed
  }
}
