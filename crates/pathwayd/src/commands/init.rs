//! Module for setting up a [`pathway`] environment

use pathway::{configuration::CONFIG_FILE, database::Database};

use super::*;

/// Arguments that can be used for the [`Commands::Init`]
#[derive(Args, Clone)]
pub struct InitOptions {
  /// Where to keep the roadmap database
  #[arg(long)]
  pub db_path:        Option<PathBuf>,
  /// Ollama host used for generation and summaries
  #[arg(long)]
  pub llm_host:       Option<String>,
  /// Default plan length in weeks
  #[arg(long)]
  pub weeks:          Option<u32>,
  /// Default study hours per week
  #[arg(long)]
  pub hours_per_week: Option<u32>,
  /// Default difficulty (beginner, intermediate, advanced)
  #[arg(long)]
  pub difficulty:     Option<String>,
}

/// Function for the [`Commands::Init`] in the CLI.
pub async fn init(cli: &Cli, config_dir: &Path, options: InitOptions) -> Result<()> {
  let InitOptions { db_path, llm_host, weeks, hours_per_week, difficulty } = options;
  let confirm = |message: &str| -> Result<bool> {
    if cli.accept_defaults {
      return Ok(true);
    }
    Ok(dialoguer::Confirm::new().with_prompt(message).default(true).interact()?)
  };

  let mut config = match db_path {
    Some(db_path) => Config::default().with_database_path(&db_path),
    None => {
      if !confirm(&format!(
        "Would you like to use the default path {:?} for the roadmap database?",
        Database::default_path(),
      ))? {
        println!(
          "{} Please pass in your intended database path using --db-path",
          style(INFO_PREFIX).blue()
        );
        return Ok(());
      }
      Config::default()
    },
  };

  if config_dir.join(CONFIG_FILE).exists()
    && !confirm("A configuration already exists here, do you want to overwrite it?")?
  {
    println!("{} Keeping the existing configuration", style(INFO_PREFIX).blue());
    return Ok(());
  }

  if let Some(host) = llm_host {
    config = config.with_llm_host(host);
  }
  if let Some(weeks) = weeks {
    config = config.with_default_weeks(weeks);
  }
  if let Some(hours) = hours_per_week {
    config = config.with_hours_per_week(hours);
  }
  if let Some(difficulty) = difficulty {
    config = config.with_difficulty(difficulty.parse()?);
  }

  let pathway = Pathway::builder().with_path(config_dir).with_config(config).build().await?;

  let user = match &cli.user {
    Some(user) => Some(user.clone()),
    None if cli.accept_defaults => None,
    None => {
      let answer: String = dialoguer::Input::new()
        .with_prompt("Default user name (leave empty to always pass --user)")
        .allow_empty(true)
        .interact_text()?;
      Some(answer.trim().to_string()).filter(|a| !a.is_empty())
    },
  };
  if let Some(user) = &user {
    pathway.database.set_config(DEFAULT_USER_KEY, user).await?;
    info!("Default user set to {user}");
  }

  println!(
    "{} Pathway initialized successfully\n{}Config path: {}\n{}Database path: {}",
    style(SUCCESS_PREFIX).green(),
    CONTINUE_PREFIX,
    config_dir.display(),
    CONTINUE_PREFIX,
    pathway.config.database_path.display(),
  );
  Ok(())
}
