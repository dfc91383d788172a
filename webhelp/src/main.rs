use std::{
  fs,
  io::Write,
  path::{Path, PathBuf},
};

use color_eyre::eyre::{Context, Result, bail};
use log::{LevelFilter, debug, info};
use webhelp_config::Config;
use webhelp_markdown::{DocumentRenderer, toc};

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
  color_eyre::install()?;

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

  if let Commands::Init {
    output,
    format,
    force,
  } = &cli.command
  {
    return init_config(output, format, *force);
  }

  let config = Config::load(&cli.config_files, &cli.config_overrides)
    .wrap_err("Failed to load configuration")?;

  match &cli.command {
    Commands::Toc => {
      generate_toc(&config)?;
    },
    Commands::Render { file, output } => {
      let html = render_page(&config, file)?;
      match output {
        Some(path) => write_output(path, &html)?,
        None => {
          std::io::stdout()
            .lock()
            .write_all(html.as_bytes())
            .wrap_err("Failed to write to standard output")?;
        },
      }
    },
    Commands::Init { .. } => {},
  }

  Ok(())
}

/// Write a default configuration file, refusing to clobber one unless forced.
fn init_config(output: &Path, format: &str, force: bool) -> Result<()> {
  if output.exists() && !force {
    bail!(
      "Configuration file already exists: {}. Use --force to overwrite.",
      output.display()
    );
  }

  if let Some(parent) = output.parent()
    && !parent.as_os_str().is_empty()
    && !parent.exists()
  {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory: {}", parent.display())
    })?;
    info!("Created directory: {}", parent.display());
  }

  Config::generate_default_config(format, output).wrap_err_with(|| {
    format!(
      "Failed to generate configuration file: {}",
      output.display()
    )
  })?;

  info!(
    "Configuration file created successfully. Edit it to customize your \
     documentation site."
  );
  Ok(())
}

fn generate_toc(config: &Config) -> Result<PathBuf> {
  let toc_config = config.toc_config();
  toc::generate_toc(&config.source_dir, &config.output_dir, &toc_config)
    .wrap_err_with(|| {
      format!(
        "Failed to build navigation from {}",
        config.source_dir.join(&toc_config.input).display()
      )
    })
}

fn render_page(config: &Config, file: &Path) -> Result<String> {
  let source = fs::read_to_string(file)
    .wrap_err_with(|| format!("Failed to read {}", file.display()))?;

  let renderer = DocumentRenderer::new(config.render_config());
  let rendered = renderer
    .render_markdown(&source)
    .wrap_err_with(|| format!("Failed to render {}", file.display()))?;

  debug!(
    "Rendered {} (title: {:?}, {} TOC entries)",
    file.display(),
    rendered.title,
    rendered.toc.len()
  );
  Ok(rendered.html)
}

fn write_output(path: &Path, html: &str) -> Result<()> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory: {}", parent.display())
    })?;
  }

  fs::write(path, html)
    .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
  info!("Wrote {}", path.display());
  Ok(())
}
