//! Module for drafting new roadmaps.

use super::*;

/// Arguments that can be used for the [`Commands::Generate`]
#[derive(Args, Clone)]
pub struct GenerateOptions {
  /// The role the roadmap should prepare for
  pub role: String,

  /// Plan length in weeks, the configured default when omitted
  #[arg(long)]
  pub weeks: Option<u32>,

  /// Study hours per week, the configured default when omitted
  #[arg(long)]
  pub hours_per_week: Option<u32>,

  /// Difficulty (beginner, intermediate, advanced)
  #[arg(long)]
  pub difficulty: Option<String>,

  /// JSON file with the skill gaps to close
  #[arg(long)]
  pub gaps: Option<PathBuf>,

  /// Build the roadmap from a JSON skeleton instead of asking the model
  #[arg(long)]
  pub from: Option<PathBuf>,
}

/// Function for the [`Commands::Generate`] in the CLI.
pub async fn generate<I: UserInteraction>(
  interaction: &mut I,
  cli: &Cli,
  options: GenerateOptions,
) -> Result<()> {
  let GenerateOptions { role, weeks, hours_per_week, difficulty, gaps, from } = options;
  let user = current_user(interaction, cli).await?;
  let config = interaction.pathway().config.clone();
  let weeks = weeks.unwrap_or(config.default_weeks);

  let skill_gaps: Vec<SkillGap> = match gaps {
    Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
    None => Vec::new(),
  };

  let roadmap = match from {
    Some(path) => {
      let generated = GeneratedRoadmap::from_json(&std::fs::read_to_string(&path)?)?;
      interaction.reply(ResponseContent::Info(&format!(
        "Building roadmap from {}",
        path.display()
      )))?;
      let options = InitializeOptions::new(user, role, weeks).with_skill_gaps(skill_gaps);
      interaction.pathway().create_roadmap(generated, options).await?
    },
    None => {
      let request = GenerationRequest {
        skill_gaps,
        target_role: role,
        hours_per_week: hours_per_week.unwrap_or(config.hours_per_week),
        weeks,
        difficulty: match difficulty {
          Some(difficulty) => difficulty.parse()?,
          None => config.difficulty,
        },
      };
      interaction.reply(ResponseContent::Info(&format!(
        "Drafting a {} week roadmap for {} with {}",
        request.weeks, request.target_role, config.llm_model
      )))?;
      interaction.pathway().generate_roadmap(request, &user).await?
    },
  };

  interaction.reply(ResponseContent::Roadmap(&roadmap))?;
  interaction.reply(ResponseContent::Success("Roadmap created successfully"))
}
