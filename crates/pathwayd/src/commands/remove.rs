//! Module for removing roadmaps.

use super::*;

/// Arguments that can be used for the [`Commands::Remove`]
#[derive(Args, Clone)]
pub struct RemoveOptions {
  /// Roadmap id
  pub roadmap: String,

  /// Delete the row for good instead of hiding it
  #[arg(long)]
  pub hard: bool,

  /// Only show what would be removed
  #[arg(long)]
  pub dry_run: bool,
}

/// Function for the [`Commands::Remove`] in the CLI.
pub async fn remove<I: UserInteraction>(interaction: &mut I, options: RemoveOptions) -> Result<()> {
  let RemoveOptions { roadmap, hard, dry_run } = options;
  let mode = if hard { DeleteMode::Hard } else { DeleteMode::Soft };

  if dry_run {
    let preview = Remove::by_id(&roadmap)
      .mode(mode)
      .dry_run()
      .execute(&mut interaction.pathway().database)
      .await?;
    interaction.reply(ResponseContent::Info("Dry run, these roadmaps would be removed:"))?;
    return interaction.reply(ResponseContent::Roadmaps(&preview));
  }

  let question = if hard {
    format!("Permanently delete roadmap {roadmap}? This cannot be undone")
  } else {
    format!("Remove roadmap {roadmap}?")
  };
  if !interaction.confirm(&question)? {
    return interaction.reply(ResponseContent::Info("Nothing removed"));
  }

  interaction.pathway().delete_roadmap(&roadmap, mode).await?;
  interaction.reply(ResponseContent::Success("Roadmap removed"))
}
