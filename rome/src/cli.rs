use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use rome_fs::Filter;

/// Command line interface for rome
#[derive(Parser, Debug)]
#[command(author, version, about = "Rome: inline a page's assets into one file")]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times) Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(
    short = 'c',
    long = "config-file",
    global = true,
    action = clap::ArgAction::Append
  )]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", global = true, action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the rome CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Initialize a new Rome configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "rome.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Inline local scripts, stylesheets and marked images into one document.
  Inline {
    /// The HTML document to bundle.
    source: PathBuf,

    /// Where to write the result, relative to the source document's
    /// directory. Falls back to `output` from the configuration.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the result to stdout even when it is written to a file.
    #[arg(short, long)]
    print: bool,
  },

  /// Expand glob patterns and print the matching paths.
  Expand {
    /// Patterns to expand. Prefix a pattern with `!` to exclude its matches.
    #[arg(required = true)]
    patterns: Vec<String>,

    /// Directory the patterns are relative to.
    #[arg(long)]
    cwd: Option<PathBuf>,

    /// Keep only files or only directories.
    #[arg(long, value_enum)]
    filter: Option<FilterArg>,
  },
}

/// Entry kind accepted by `expand --filter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
  File,
  Dir,
}

impl From<FilterArg> for Filter {
  fn from(arg: FilterArg) -> Self {
    match arg {
      FilterArg::File => Self::File,
      FilterArg::Dir => Self::Dir,
    }
  }
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
