use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for webhelp
#[derive(Parser, Debug)]
#[command(author, version, about = "webhelp: documentation pages and navigation")]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times). Multiple files are merged in order, with later files overriding
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

/// All supported subcommands for the webhelp CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Build the navigation manifest from the summary document.
  Toc,

  /// Render one Markdown page to an HTML body fragment.
  Render {
    /// Markdown file to render.
    file: PathBuf,

    /// Write the fragment here instead of standard output.
    #[arg(short, long)]
    output: Option<PathBuf>,
  },

  /// Initialize a new webhelp configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "webhelp.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::panic, reason = "Fine in tests")]
  use super::*;

  #[test]
  fn test_render_with_overrides() {
    let cli = Cli::try_parse_from([
      "webhelp",
      "-c",
      "base.toml",
      "--config-file",
      "site.json",
      "render",
      "guide.md",
      "-o",
      "guide.html",
      "--config",
      "base_url=/docs/",
      "-v",
    ])
    .unwrap();

    assert!(cli.verbose);
    assert_eq!(cli.config_files, [
      PathBuf::from("base.toml"),
      PathBuf::from("site.json")
    ]);
    assert_eq!(cli.config_overrides, ["base_url=/docs/"]);
    match cli.command {
      Commands::Render { file, output } => {
        assert_eq!(file, PathBuf::from("guide.md"));
        assert_eq!(output, Some(PathBuf::from("guide.html")));
      },
      other => panic!("expected render, got {other:?}"),
    }
  }

  #[test]
  fn test_init_defaults() {
    let cli = Cli::try_parse_from(["webhelp", "init"]).unwrap();
    match cli.command {
      Commands::Init {
        output,
        format,
        force,
      } => {
        assert_eq!(output, PathBuf::from("webhelp.toml"));
        assert_eq!(format, "toml");
        assert!(!force);
      },
      other => panic!("expected init, got {other:?}"),
    }
  }

  #[test]
  fn test_rejects_unknown_format_and_missing_command() {
    assert!(Cli::try_parse_from(["webhelp", "init", "-F", "yaml"]).is_err());
    assert!(Cli::try_parse_from(["webhelp"]).is_err());
  }
}
