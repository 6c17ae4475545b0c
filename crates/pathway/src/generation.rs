//! Turning generated curricula into week-gated roadmaps.
//!
//! Roadmap content comes from a [`RoadmapGenerator`] as a plain [`GeneratedRoadmap`]: a
//! list of modules, each with a list of resources. [`GeneratedRoadmap::initialize`] then
//! lays the modules out over the plan's weeks and decides what the learner can reach on
//! day one:
//!
//! - module `i` of `n` lands in week `floor(i * weeks / n) + 1`
//! - a module is a *week start* when it is the first module or its week differs from the
//!   previous module's
//! - only the first resource of a week-start module starts unlocked
//!
//! # Examples
//!
//! ```
//! use pathway::{generation::*, roadmap::ResourceStatus};
//!
//! let generated = GeneratedRoadmap::from_json(
//!   r#"{"modules": [
//!     {"title": "Basics", "description": "", "skills_covered": ["rust"],
//!      "resources": [{"title": "Book", "url": "https://doc.rust-lang.org/book",
//!                     "estimated_hours": 4, "resource_type": "documentation"}]},
//!     {"title": "Async", "description": "", "skills_covered": ["tokio"],
//!      "resources": [{"title": "Tutorial", "url": "https://tokio.rs/tokio/tutorial",
//!                     "estimated_hours": 3, "resource_type": "article"}]}
//!   ]}"#,
//! )
//! .unwrap();
//!
//! let roadmap = generated.initialize(InitializeOptions::new("user-1", "Backend Engineer", 4)).unwrap();
//! assert_eq!(roadmap.modules[1].week_number, 3);
//! assert_eq!(roadmap.modules[1].resources[0].status, ResourceStatus::Unlocked);
//! assert_eq!(roadmap.total_estimated_hours, 7.0);
//! ```

use chrono::Duration as ChronoDuration;
use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

use super::*;
use crate::{
  configuration::Config,
  llm::{LlamaRequest, Model, OllamaEndpoint, Options},
};

/// A resource as produced by a generator, before ids and states exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedResource {
  /// Display title
  pub title:           String,
  /// Content location
  pub url:             String,
  /// Short description
  #[serde(default)]
  pub description:     String,
  /// Expected study time in hours
  #[serde(default)]
  pub estimated_hours: f64,
  /// Medium, an article unless stated
  #[serde(default = "default_kind")]
  pub resource_type:   ResourceKind,
}

fn default_kind() -> ResourceKind { ResourceKind::Article }

/// A module as produced by a generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedModule {
  /// Display title
  pub title:           String,
  /// What the module is about
  #[serde(default)]
  pub description:     String,
  /// Names of the skills this module teaches
  #[serde(default)]
  pub skills_covered:  Vec<String>,
  /// When absent, the module's hours are the sum of its resources' hours
  #[serde(default)]
  pub estimated_hours: Option<f64>,
  /// Resources in study order
  #[serde(default)]
  pub resources:       Vec<GeneratedResource>,
}

/// The skeleton a [`RoadmapGenerator`] hands over for initialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedRoadmap {
  /// Modules in plan order
  #[serde(default)]
  pub modules: Vec<GeneratedModule>,
}

/// Who the roadmap is for and how long it runs.
#[derive(Debug, Clone)]
pub struct InitializeOptions {
  /// Owner of the new roadmap
  pub user_id:     String,
  /// Role the roadmap prepares for
  pub target_role: String,
  /// Gaps the roadmap should close
  pub skill_gaps:  Vec<SkillGap>,
  /// Plan length in weeks, at least one
  pub total_weeks: u32,
  /// Creation time; the deadline is `total_weeks` after it
  pub now:         DateTime<Utc>,
}

impl InitializeOptions {
  /// Options for a roadmap created right now.
  pub fn new(user_id: impl Into<String>, target_role: impl Into<String>, total_weeks: u32) -> Self {
    Self {
      user_id: user_id.into(),
      target_role: target_role.into(),
      skill_gaps: Vec::new(),
      total_weeks,
      now: Utc::now(),
    }
  }

  /// Records the skill gaps that motivated the roadmap.
  pub fn with_skill_gaps(mut self, skill_gaps: Vec<SkillGap>) -> Self {
    self.skill_gaps = skill_gaps;
    self
  }

  /// Pins the creation time.
  pub fn at(mut self, now: DateTime<Utc>) -> Self {
    self.now = now;
    self
  }
}

impl GeneratedRoadmap {
  /// Parses a generator reply.
  ///
  /// Anything that is not the expected structure is an upstream failure, since the text
  /// came from outside this crate.
  pub fn from_json(json: &str) -> Result<Self> {
    serde_json::from_str(json)
      .map_err(|e| PathwayError::UpstreamGeneration(format!("unusable roadmap structure: {e}")))
  }

  /// Builds a fresh roadmap from this skeleton.
  ///
  /// # Errors
  ///
  /// - [`PathwayError::InvalidInput`] for a zero-week plan or an empty user id
  /// - [`PathwayError::UpstreamGeneration`] when there are no modules
  pub fn initialize(self, options: InitializeOptions) -> Result<Roadmap> {
    let InitializeOptions { user_id, target_role, skill_gaps, total_weeks, now } = options;
    if user_id.trim().is_empty() {
      return Err(PathwayError::InvalidInput("user id must not be empty".to_string()));
    }
    if total_weeks == 0 {
      return Err(PathwayError::InvalidInput("a roadmap needs at least one week".to_string()));
    }
    if self.modules.is_empty() {
      return Err(PathwayError::UpstreamGeneration("generator returned no modules".to_string()));
    }

    let weeks_per_module = f64::from(total_weeks) / self.modules.len() as f64;
    let mut modules: Vec<Module> = self
      .modules
      .into_iter()
      .enumerate()
      .map(|(index, generated)| {
        let resources: Vec<Resource> = generated
          .resources
          .into_iter()
          .enumerate()
          .map(|(order, r)| Resource {
            id: new_id(),
            title: r.title,
            url: r.url,
            description: r.description,
            estimated_hours: r.estimated_hours,
            resource_type: r.resource_type,
            status: ResourceStatus::Locked,
            order,
            time_spent_seconds: 0,
            opened_at: None,
            completed_at: None,
            skipped_at: None,
            rating: None,
            rating_count: 0,
            ratings: Vec::new(),
          })
          .collect();

        let estimated_total_hours = generated
          .estimated_hours
          .unwrap_or_else(|| resources.iter().map(|r| r.estimated_hours).sum());

        Module {
          id: new_id(),
          title: generated.title,
          description: generated.description,
          skills_covered: generated.skills_covered,
          resources,
          estimated_total_hours,
          week_number: week_for(index, weeks_per_module),
          order: index,
          is_completed: false,
          completion_summary: None,
          summary_generated_at: None,
        }
      })
      .collect();
    apply_week_gates(&mut modules);

    let roadmap = Roadmap {
      id: new_id(),
      user_id,
      target_role,
      skill_gaps,
      total_estimated_hours: modules.iter().map(|m| m.estimated_total_hours).sum(),
      modules,
      deadline: now + ChronoDuration::weeks(i64::from(total_weeks)),
      progress_percentage: 0.0,
      current_module_index: 0,
      created_at: now,
      updated_at: now,
      is_template: false,
      is_public: false,
      is_deleted: false,
      category: None,
      version: 0,
    };
    info!(
      "Initialized roadmap {} with {} modules over {} weeks",
      roadmap.id,
      roadmap.modules.len(),
      total_weeks
    );
    Ok(roadmap)
  }
}

impl Roadmap {
  /// Copies this roadmap for a new owner, as when a template is cloned.
  ///
  /// Content, week layout and ratings are kept. Ids are fresh, all learner progress is
  /// cleared, and the initial lock states are derived again from the week layout. The
  /// deadline keeps the original plan length.
  pub fn clone_for(&self, user_id: &str, now: DateTime<Utc>) -> Roadmap {
    let mut modules = self.modules.clone();
    for module in &mut modules {
      module.id = new_id();
      module.is_completed = false;
      module.completion_summary = None;
      module.summary_generated_at = None;
      for resource in &mut module.resources {
        resource.id = new_id();
        resource.reset_progress();
      }
    }
    apply_week_gates(&mut modules);

    Roadmap {
      id: new_id(),
      user_id: user_id.to_string(),
      target_role: self.target_role.clone(),
      skill_gaps: self.skill_gaps.clone(),
      modules,
      total_estimated_hours: self.total_estimated_hours,
      deadline: now + (self.deadline - self.created_at),
      progress_percentage: 0.0,
      current_module_index: 0,
      created_at: now,
      updated_at: now,
      is_template: false,
      is_public: false,
      is_deleted: false,
      category: None,
      version: 0,
    }
  }
}

/// 1-based week of module `index`.
fn week_for(index: usize, weeks_per_module: f64) -> u32 {
  (index as f64 * weeks_per_module).floor() as u32 + 1
}

/// Sets every resource to its initial lock state from the modules' week numbers.
fn apply_week_gates(modules: &mut [Module]) {
  let mut previous_week = None;
  for module in modules.iter_mut() {
    let week_start = previous_week != Some(module.week_number);
    previous_week = Some(module.week_number);
    for resource in &mut module.resources {
      resource.status = if week_start && resource.order == 0 {
        ResourceStatus::Unlocked
      } else {
        ResourceStatus::Locked
      };
    }
  }
}

fn new_id() -> String { Uuid::new_v4().to_string() }

/// How much hand-holding generated content should assume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
  /// New to the field
  Beginner,
  /// Knows the basics
  #[default]
  Intermediate,
  /// Looking for depth
  Advanced,
}

impl Difficulty {
  /// Instructions given to the generator for this level.
  pub fn guidance(&self) -> &'static str {
    match self {
      Difficulty::Beginner =>
        "Focus on fundamentals and step-by-step tutorials. Include more introductory content, \
         basic concepts, and foundational knowledge. Use beginner-friendly resources with \
         detailed explanations. Start with absolute basics.",
      Difficulty::Intermediate =>
        "Balance between theory and practice. Include intermediate tutorials and hands-on \
         projects. Assume basic programming knowledge. Cover standard industry practices and \
         common patterns.",
      Difficulty::Advanced =>
        "Focus on advanced concepts, best practices, and complex projects. Include deep-dive \
         content, architecture patterns, production-ready implementations, and cutting-edge \
         techniques. Assume strong foundation.",
    }
  }
}

impl Display for Difficulty {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Difficulty::Beginner => write!(f, "beginner"),
      Difficulty::Intermediate => write!(f, "intermediate"),
      Difficulty::Advanced => write!(f, "advanced"),
    }
  }
}

impl FromStr for Difficulty {
  type Err = PathwayError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_lowercase().as_str() {
      "beginner" => Ok(Difficulty::Beginner),
      "intermediate" => Ok(Difficulty::Intermediate),
      "advanced" => Ok(Difficulty::Advanced),
      other => Err(PathwayError::InvalidInput(format!("unknown difficulty `{other}`"))),
    }
  }
}

/// Suggested module count and per-module span for a plan of `weeks` weeks.
pub fn module_guidance(weeks: u32) -> (&'static str, &'static str) {
  match weeks {
    0..=4 => ("2-3", "1-2 weeks"),
    5..=8 => ("3-4", "2 weeks"),
    9..=12 => ("4-6", "2-3 weeks"),
    13..=16 => ("6-8", "2-3 weeks"),
    _ => ("8-12", "2-3 weeks"),
  }
}

lazy_static! {
  static ref LEADING_NUMBER: Regex = Regex::new(r"^\s*(\d+)\b").unwrap();
  static ref JSON_OBJECT: Regex = Regex::new(r"(?s)\{.*\}").unwrap();
}

/// Reads a week count out of a free-form duration such as `"12 weeks"`.
pub fn parse_duration_weeks(duration: &str) -> Option<u32> {
  LEADING_NUMBER.captures(duration)?.get(1)?.as_str().parse().ok()
}

/// The outermost `{...}` span of a model reply, which may wrap JSON in prose or fences.
fn extract_json(reply: &str) -> &str { JSON_OBJECT.find(reply).map_or(reply, |m| m.as_str()) }

/// Everything a generator needs to draft a roadmap.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
  /// Gaps the roadmap should close
  pub skill_gaps:     Vec<SkillGap>,
  /// Role the roadmap prepares for
  pub target_role:    String,
  /// Weekly study budget
  pub hours_per_week: u32,
  /// Plan length in weeks
  pub weeks:          u32,
  /// How much prior knowledge to assume
  pub difficulty:     Difficulty,
}

impl GenerationRequest {
  /// Study hours available over the whole plan.
  pub fn total_hours(&self) -> u32 { self.hours_per_week * self.weeks }

  /// The instruction sent to a language model.
  pub fn prompt(&self) -> String {
    let skills = self.skill_gaps.iter().map(|g| g.skill.as_str()).collect::<Vec<_>>().join(", ");
    let (module_count, module_span) = module_guidance(self.weeks);
    let level = self.difficulty.to_string().to_uppercase();
    let total_hours = self.total_hours();

    format!(
      r#"Create a detailed learning roadmap for someone targeting: {role}

PARAMETERS:
- Skills to learn: {skills}
- Total Duration: {weeks} WEEKS
- Study Time: {hours_per_week} hours/week (Total: {total_hours} hours)
- Difficulty Level: {level}

DIFFICULTY LEVEL REQUIREMENTS ({level}):
{guidance}

Generate a structured learning plan with modules and resources.
Return ONLY a JSON object:
{{
  "modules": [
    {{
      "title": "Module name",
      "description": "What student will learn",
      "skills_covered": ["skill1", "skill2"],
      "estimated_hours": <number>,
      "resources": [
        {{
          "title": "Resource name",
          "url": "https://example.com/resource",
          "description": "Brief description",
          "estimated_hours": <number>,
          "resource_type": "video|article|course|practice"
        }}
      ]
    }}
  ]
}}

CRITICAL REQUIREMENTS:
- Create EXACTLY {module_count} modules to cover {weeks} weeks (each module ~{module_span})
- Distribute the {total_hours} total hours across ALL modules evenly
- Each module should have 3-5 high-quality resources appropriate for {difficulty} level
- Prefer official documentation and reputable, free learning platforms
- Total hours should not exceed {total_hours}
- Order modules logically: basics, then intermediate, then advanced, then practical projects
- Include at least one hands-on project or practice exercise per module"#,
      role = self.target_role,
      weeks = self.weeks,
      hours_per_week = self.hours_per_week,
      guidance = self.difficulty.guidance(),
      difficulty = self.difficulty,
    )
  }
}

/// Produces roadmap skeletons.
#[async_trait]
pub trait RoadmapGenerator: Send + Sync {
  async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedRoadmap>;
}

/// A [`RoadmapGenerator`] backed by an Ollama chat model.
#[derive(Debug, Clone)]
pub struct LlmRoadmapGenerator {
  host:  String,
  model: Model,
}

impl LlmRoadmapGenerator {
  /// A generator talking to `model` on the Ollama server at `host`.
  pub fn new(host: impl Into<String>, model: Model) -> Self { Self { host: host.into(), model } }

  /// A generator using the configured host and model.
  pub fn from_config(config: &Config) -> Self {
    Self::new(config.llm_host.clone(), config.llm_model.clone())
  }
}

#[async_trait]
impl RoadmapGenerator for LlmRoadmapGenerator {
  #[instrument(skip_all, fields(role = %request.target_role, weeks = request.weeks))]
  async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedRoadmap> {
    let response = LlamaRequest::new()
      .with_host(&self.host)
      .with_endpoint(OllamaEndpoint::Chat)
      .with_model(self.model.clone())
      .with_json_format()
      .with_options(Options::default().with_temperature(0.7))
      .with_message(&request.prompt())
      .send()
      .await
      .map_err(|e| PathwayError::UpstreamGeneration(e.to_string()))?;

    let generated = GeneratedRoadmap::from_json(extract_json(&response.message.content))?;
    if generated.modules.is_empty() {
      return Err(PathwayError::UpstreamGeneration("generator returned no modules".to_string()));
    }
    debug!("Generator drafted {} modules", generated.modules.len());
    Ok(generated)
  }
}
