//! Module for abstracting the "clean" functionality of the [`pathway`] database.

use pathway::{configuration::CONFIG_FILE, database::Database};

use super::*;

/// Function for the [`Commands::Clean`] in the CLI.
///
/// Works without a readable configuration, falling back to the default database path.
pub fn clean(cli: &Cli, config_dir: &Path) -> Result<()> {
  let path = match Config::load(config_dir) {
    Ok(config) => config.database_path,
    Err(e) => {
      debug!("No usable configuration in {}: {e}", config_dir.display());
      let default_path = Database::default_path();
      println!(
        "{} Using default database path: {}",
        style(INFO_PREFIX).cyan(),
        style(default_path.display()).yellow()
      );
      default_path
    },
  };

  if !path.exists() {
    println!(
      "{} No database found at: {}",
      style(WARNING_PREFIX).yellow(),
      style(path.display()).yellow()
    );
    return Ok(());
  }
  println!(
    "{} Database found at: {}",
    style(WARNING_PREFIX).yellow(),
    style(path.display()).yellow()
  );

  if !cli.accept_defaults {
    if !dialoguer::Confirm::new()
      .with_prompt("Are you sure you want to delete this database?")
      .default(false)
      .wait_for_newline(true)
      .interact()?
    {
      println!("{} Operation cancelled", style(ERROR_PREFIX).red());
      return Ok(());
    }

    let input = dialoguer::Input::<String>::new()
      .with_prompt(format!(
        "{} Type {} to confirm deletion",
        style("⚠️").red(),
        style("DELETE").red().bold()
      ))
      .interact_text()?;
    if input != "DELETE" {
      println!("{} Operation cancelled", style(ERROR_PREFIX).red());
      return Ok(());
    }
  }

  println!(
    "{} Removing database: {}",
    style(WARNING_PREFIX).yellow(),
    style(path.display()).yellow()
  );
  // The database file plus its SQLite journal siblings
  let pattern = format!("{}*", glob::Pattern::escape(&path.display().to_string()));
  for file in glob::glob(&pattern)?.flatten() {
    trace!("Removing {}", file.display());
    std::fs::remove_file(file)?;
  }

  let config_file = config_dir.join(CONFIG_FILE);
  if config_file.exists() {
    std::fs::remove_file(config_file)?;
  }
  println!("{} Database files cleaned", style(SUCCESS_PREFIX).green());
  Ok(())
}
