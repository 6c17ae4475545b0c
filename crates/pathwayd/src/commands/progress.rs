//! Commands that move a learner through a roadmap.

use super::*;

/// Addresses one resource of one roadmap.
#[derive(Args, Clone)]
pub struct ResourceTarget {
  /// Roadmap id
  pub roadmap:  String,
  /// Module id
  pub module:   String,
  /// Resource id
  pub resource: String,
}

/// Arguments that can be used for the [`Commands::Rate`]
#[derive(Args, Clone)]
pub struct RateOptions {
  /// Roadmap id
  pub roadmap: String,
  /// URL of the resource to rate
  pub url:     String,
  /// Score from 1 to 5
  pub score:   u8,
  /// Optional comment kept with the rating
  #[arg(long)]
  pub comment: Option<String>,
}

/// Function for the [`Commands::Open`] in the CLI.
pub async fn open<I: UserInteraction>(interaction: &mut I, target: ResourceTarget) -> Result<()> {
  let ResourceTarget { roadmap, module, resource } = target;
  let outcome = interaction.pathway().open_resource(&roadmap, &module, &resource).await?;
  interaction.reply(ResponseContent::Opened(&outcome))
}

/// Function for the [`Commands::Complete`] in the CLI.
pub async fn complete<I: UserInteraction>(
  interaction: &mut I,
  target: ResourceTarget,
) -> Result<()> {
  let ResourceTarget { roadmap, module, resource } = target;
  let finished = interaction.pathway().complete_resource(&roadmap, &module, &resource).await?;
  interaction.reply(ResponseContent::Success("Resource completed"))?;
  interaction.reply(ResponseContent::Completed(&finished))
}

/// Function for the [`Commands::Skip`] in the CLI.
pub async fn skip<I: UserInteraction>(interaction: &mut I, target: ResourceTarget) -> Result<()> {
  let ResourceTarget { roadmap, module, resource } = target;
  let finished = interaction.pathway().skip_resource(&roadmap, &module, &resource).await?;
  interaction.reply(ResponseContent::Success("Resource skipped"))?;
  interaction.reply(ResponseContent::Completed(&finished))
}

/// Function for the [`Commands::Time`] in the CLI.
pub async fn time<I: UserInteraction>(
  interaction: &mut I,
  target: ResourceTarget,
  seconds: i64,
) -> Result<()> {
  let ResourceTarget { roadmap, module, resource } = target;
  let update = interaction.pathway().update_time(&roadmap, &module, &resource, seconds).await?;
  interaction.reply(ResponseContent::Time(&update))?;
  interaction.reply(ResponseContent::Completed(&update.completed_modules))
}

/// Function for the [`Commands::Rate`] in the CLI.
pub async fn rate<I: UserInteraction>(
  interaction: &mut I,
  cli: &Cli,
  options: RateOptions,
) -> Result<()> {
  let RateOptions { roadmap, url, score, comment } = options;
  let user = current_user(interaction, cli).await?;
  let outcome = interaction.pathway().rate_resource(&roadmap, &user, &url, score, comment).await?;
  interaction.reply(ResponseContent::Rating(&outcome))
}

/// Function for the [`Commands::Summary`] in the CLI.
pub async fn summary<I: UserInteraction>(
  interaction: &mut I,
  roadmap_id: &str,
  module_id: &str,
) -> Result<()> {
  let report = interaction.pathway().module_summary(roadmap_id, module_id).await?;
  interaction.reply(ResponseContent::Report(&report))
}
