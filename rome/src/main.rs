use std::io::{self, Write};

use color_eyre::eyre::{Context, Result};
use log::LevelFilter;
use rome::{
  cli::{Cli, Commands},
  commands,
};
use rome_config::Config;

fn main() -> Result<()> {
  color_eyre::install()?;

  // Parse command line arguments
  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  match &cli.command {
    Commands::Init {
      output,
      format,
      force,
    } => commands::init(output, format, *force),

    Commands::Inline {
      source,
      output,
      print,
    } => {
      let config = Config::load(&cli.config_files, &cli.config_overrides)
        .wrap_err("Failed to load configuration")?;
      let result = commands::inline(config, source, output.as_deref())?;

      if result.written.is_none() || *print {
        let mut stdout = io::stdout().lock();
        stdout.write_all(result.html.as_bytes())?;
        stdout.flush()?;
      }
      Ok(())
    },

    Commands::Expand {
      patterns,
      cwd,
      filter,
    } => {
      let paths =
        commands::expand(patterns, cwd.clone(), filter.map(Into::into))?;

      let mut stdout = io::stdout().lock();
      for path in paths {
        writeln!(stdout, "{}", rome_fs::unixify(&path))?;
      }
      Ok(())
    },
  }
}
