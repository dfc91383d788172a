use std::{
  fs,
  path::{Path, PathBuf},
  sync::OnceLock,
};

use serde::{Deserialize, Serialize};
use webhelp_markdown::{
  HighlightOptions,
  RenderConfig,
  TocConfig,
  toc::{DEFAULT_TOC_INPUT, DEFAULT_TOC_OUTPUT},
};

use crate::error::ConfigError;

/// Configuration for the webhelp site tools.
///
/// Fields are typically loaded from a TOML or JSON config file and can be
/// overridden with `--config KEY=VALUE` on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Directory containing the Markdown sources.
  pub source_dir: PathBuf,

  /// Directory that receives generated files.
  pub output_dir: PathBuf,

  /// Prefix that replaces the leading `/` of root-relative links.
  pub base_url: String,

  /// Summary document, relative to `source_dir`.
  pub toc_input: PathBuf,

  /// Navigation manifest, relative to `output_dir`.
  pub toc_output: PathBuf,

  /// Page rendering options.
  pub markdown: MarkdownConfig,
}

/// Options for rendering Markdown pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
  /// Generate ids for headings without an explicit one.
  pub auto_ids: bool,

  /// Added to every heading level before choosing the `<hN>` tag.
  pub header_offset: i8,

  /// Heading levels recorded in each page's table of contents.
  pub toc_levels: Vec<u8>,

  /// Syntax highlighting options.
  pub highlight: HighlightOptions,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      source_dir: PathBuf::from("."),
      output_dir: PathBuf::from("_site"),
      base_url:   "/".to_string(),
      toc_input:  PathBuf::from(DEFAULT_TOC_INPUT),
      toc_output: PathBuf::from(DEFAULT_TOC_OUTPUT),
      markdown:   MarkdownConfig::default(),
    }
  }
}

impl Default for MarkdownConfig {
  fn default() -> Self {
    Self {
      auto_ids:      true,
      header_offset: 0,
      toc_levels:    (1..=6).collect(),
      highlight:     HighlightOptions::default(),
    }
  }
}

/// Replace `target` unless `value` is still the default.
fn merge_field<T: PartialEq>(target: &mut T, value: T, default: T) {
  if value != default {
    *target = value;
  }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  match value.to_lowercase().as_str() {
    "true" | "yes" | "1" => Ok(true),
    "false" | "no" | "0" => Ok(false),
    _ => {
      Err(ConfigError::Config(format!(
        "Invalid boolean value for '{key}': '{value}'. Expected true/false, \
         yes/no, or 1/0"
      )))
    },
  }
}

fn parse_number<T: std::str::FromStr>(
  key: &str,
  value: &str,
) -> Result<T, ConfigError> {
  value.parse().map_err(|_| {
    ConfigError::Config(format!("Invalid numeric value for '{key}': '{value}'"))
  })
}

impl MarkdownConfig {
  fn merge(&mut self, other: Self) {
    let defaults = Self::default();
    merge_field(&mut self.auto_ids, other.auto_ids, defaults.auto_ids);
    merge_field(
      &mut self.header_offset,
      other.header_offset,
      defaults.header_offset,
    );
    merge_field(&mut self.toc_levels, other.toc_levels, defaults.toc_levels);
    merge_field(
      &mut self.highlight.enable,
      other.highlight.enable,
      defaults.highlight.enable,
    );
    if other.highlight.theme.is_some() {
      self.highlight.theme = other.highlight.theme;
    }
  }
}

impl Config {
  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to read config file: {}: {e}",
        path.display()
      ))
    })?;

    let extension = path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_lowercase);
    match extension.as_deref() {
      Some("json") => {
        serde_json::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse JSON config from {}: {e}",
            path.display()
          ))
        })
      },
      Some("toml") => {
        toml::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse TOML config from {}: {e}",
            path.display()
          ))
        })
      },
      Some(_) => {
        Err(ConfigError::Config(format!(
          "Unsupported config file format: {}",
          path.display()
        )))
      },
      None => {
        Err(ConfigError::Config(format!(
          "Config file has no extension: {}",
          path.display()
        )))
      },
    }
  }

  /// Load configuration from the given files, merged in order, then apply
  /// `KEY=VALUE` overrides.
  ///
  /// Without explicit files a config file is searched for in the current
  /// directory; without one the defaults are used.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded, an override is invalid or
  /// the resulting configuration is inconsistent.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      let mut merged = Self::from_file(first)?;
      for path in rest {
        merged.merge(Self::from_file(path)?);
      }

      if config_files.len() > 1 {
        log::info!("Loaded and merged {} config files", config_files.len());
      }
      merged
    } else if let Some(discovered) = Self::find_config_file() {
      log::info!("Using discovered config file: {}", discovered.display());
      Self::from_file(&discovered)?
    } else {
      log::debug!("No config file found, using defaults");
      Self::default()
    };

    config.apply_overrides(config_overrides)?;
    config.validate()?;
    Ok(config)
  }

  /// Apply configuration overrides from `KEY=VALUE` strings.
  ///
  /// Nested keys use dots, e.g. `markdown.highlight.enable=false`. An empty
  /// value clears `markdown.highlight.theme` and `markdown.toc_levels`.
  ///
  /// # Errors
  ///
  /// Returns an error if an override is not in `KEY=VALUE` format, the key is
  /// unknown or the value cannot be parsed as the expected type.
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  fn apply_override(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
      "source_dir" => self.source_dir = PathBuf::from(value),
      "output_dir" => self.output_dir = PathBuf::from(value),
      "base_url" => self.base_url = value.to_string(),
      "toc_input" => self.toc_input = PathBuf::from(value),
      "toc_output" => self.toc_output = PathBuf::from(value),
      "markdown.auto_ids" => self.markdown.auto_ids = parse_bool(key, value)?,
      "markdown.header_offset" => {
        self.markdown.header_offset = parse_number(key, value)?;
      },
      "markdown.toc_levels" => {
        self.markdown.toc_levels = value
          .split(',')
          .map(str::trim)
          .filter(|level| !level.is_empty())
          .map(|level| parse_number(key, level))
          .collect::<Result<_, _>>()?;
      },
      "markdown.highlight.enable" => {
        self.markdown.highlight.enable = parse_bool(key, value)?;
      },
      "markdown.highlight.theme" => {
        self.markdown.highlight.theme =
          (!value.is_empty()).then(|| value.to_string());
      },
      _ => {
        return Err(ConfigError::Config(format!(
          "Unknown config key: '{key}'"
        )));
      },
    }

    log::debug!("Applied config override: {key}={value}");
    Ok(())
  }

  /// Merge another config into this one, with the other config's values taking
  /// precedence.
  ///
  /// Used when loading several config files: each file is merged into the
  /// accumulated config. A field the other config leaves at its default does
  /// not replace a value set earlier.
  pub fn merge(&mut self, other: Self) {
    let defaults = Self::default();
    merge_field(&mut self.source_dir, other.source_dir, defaults.source_dir);
    merge_field(&mut self.output_dir, other.output_dir, defaults.output_dir);
    merge_field(&mut self.base_url, other.base_url, defaults.base_url);
    merge_field(&mut self.toc_input, other.toc_input, defaults.toc_input);
    merge_field(&mut self.toc_output, other.toc_output, defaults.toc_output);
    self.markdown.merge(other.markdown);
  }

  /// Search for config files in common locations
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    static RESULT: OnceLock<Option<PathBuf>> = OnceLock::new();
    RESULT
      .get_or_init(|| {
        let current_dir = std::env::current_dir().ok()?;
        ["webhelp.toml", "webhelp.json", ".webhelp.toml"]
          .iter()
          .map(|filename| current_dir.join(filename))
          .find(|path| path.exists())
      })
      .clone()
  }

  /// Check values that deserialize fine but cannot be rendered.
  ///
  /// # Errors
  ///
  /// Returns an error for TOC levels outside `1..=6`.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if let Some(level) = self
      .markdown
      .toc_levels
      .iter()
      .find(|level| !(1..=6).contains(*level))
    {
      return Err(ConfigError::Config(format!(
        "Invalid TOC level {level}, expected a heading level between 1 and 6"
      )));
    }

    if !self.base_url.ends_with('/') {
      log::warn!(
        "base_url '{}' does not end with '/', root-relative links will be \
         joined without a separator",
        self.base_url
      );
    }

    Ok(())
  }

  /// Renderer options derived from this configuration.
  #[must_use]
  pub fn render_config(&self) -> RenderConfig {
    RenderConfig {
      base_url: self.base_url.clone(),
      auto_ids: self.markdown.auto_ids,
      header_offset: self.markdown.header_offset,
      toc_levels: self.markdown.toc_levels.clone(),
      highlight: self.markdown.highlight.clone(),
      ..RenderConfig::default()
    }
  }

  /// Summary and manifest locations.
  #[must_use]
  pub fn toc_config(&self) -> TocConfig {
    TocConfig {
      input:  self.toc_input.clone(),
      output: self.toc_output.clone(),
    }
  }

  /// Generate a default configuration file with commented explanations
  ///
  /// # Errors
  ///
  /// Returns an error if the format is not supported or the file cannot be
  /// written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config_content = crate::templates::get_template(format)?;

    fs::write(path, config_content).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to write default config to {}: {e}",
        path.display()
      ))
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}
