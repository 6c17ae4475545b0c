//! Commands that read roadmaps or move them between users.

use super::*;

/// Arguments that can be used for the [`Commands::List`]
#[derive(Args, Clone)]
pub struct ListOptions {
  /// Match target role or skills, case-insensitive
  #[arg(long)]
  pub search: Option<String>,

  /// Only roadmaps that are not-started, in-progress or completed
  #[arg(long)]
  pub status: Option<String>,

  /// Order by created-at, updated-at, progress or target-role
  #[arg(long)]
  pub sort: Option<String>,
}

/// Function for the [`Commands::List`] in the CLI.
pub async fn list<I: UserInteraction>(
  interaction: &mut I,
  cli: &Cli,
  options: ListOptions,
) -> Result<()> {
  let ListOptions { search, status, sort } = options;
  let user = current_user(interaction, cli).await?;

  let mut filter = RoadmapFilter::default();
  if let Some(search) = search {
    filter = filter.search(search);
  }
  if let Some(status) = status {
    filter = filter.status(status.parse()?);
  }
  if let Some(sort) = sort {
    filter = filter.sort(sort.parse()?);
  }

  let roadmaps = interaction.pathway().roadmaps(&user, filter).await?;
  interaction.reply(ResponseContent::Roadmaps(&roadmaps))
}

/// Function for the [`Commands::Show`] in the CLI.
pub async fn show<I: UserInteraction>(interaction: &mut I, roadmap_id: &str) -> Result<()> {
  let roadmap = interaction.pathway().roadmap(roadmap_id).await?;
  interaction.reply(ResponseContent::Roadmap(&roadmap))
}

/// Function for the [`Commands::Weeks`] in the CLI.
pub async fn weeks<I: UserInteraction>(interaction: &mut I, cli: &Cli) -> Result<()> {
  let user = current_user(interaction, cli).await?;
  let overview = interaction.pathway().weeks_overview(&user).await?;
  interaction.reply(ResponseContent::Overview(&overview))
}

/// Function for the [`Commands::Stats`] in the CLI.
pub async fn stats<I: UserInteraction>(interaction: &mut I, cli: &Cli) -> Result<()> {
  let user = current_user(interaction, cli).await?;
  let analytics = interaction.pathway().analytics(&user).await?;
  interaction.reply(ResponseContent::Analytics(&analytics))
}

/// Function for the [`Commands::Templates`] in the CLI.
pub async fn templates<I: UserInteraction>(
  interaction: &mut I,
  category: Option<String>,
) -> Result<()> {
  let templates = interaction.pathway().templates(category.as_deref()).await?;
  interaction.reply(ResponseContent::Roadmaps(&templates))
}

/// Function for the [`Commands::Publish`] in the CLI.
pub async fn publish<I: UserInteraction>(
  interaction: &mut I,
  roadmap_id: &str,
  category: Option<String>,
) -> Result<()> {
  if !interaction.confirm("Publish this roadmap as a public template?")? {
    return interaction.reply(ResponseContent::Info("Nothing published"));
  }
  let template = interaction.pathway().publish_template(roadmap_id, category).await?;
  interaction.reply(ResponseContent::Success(&format!("Published template {}", template.id)))
}

/// Function for the [`Commands::Clone`] in the CLI.
pub async fn clone<I: UserInteraction>(
  interaction: &mut I,
  cli: &Cli,
  template_id: &str,
) -> Result<()> {
  let user = current_user(interaction, cli).await?;
  let roadmap = interaction.pathway().clone_template(template_id, &user).await?;
  interaction.reply(ResponseContent::Roadmap(&roadmap))?;
  interaction.reply(ResponseContent::Success("Template cloned successfully"))
}
