//! Syntect-based syntax highlighting backend enhanced with two-face.
//!
//! Syntect uses Sublime Text's syntax definitions (TextMate grammars); two-face
//! adds the extended syntax definitions and themes that power the Bat pager.
//! Output is a sequence of inline-styled `<span>` elements, one source line at
//! a time, so that individual lines can be marked.

use std::sync::OnceLock;

use syntect::{
  easy::HighlightLines as LineHighlighter,
  highlighting::Theme,
  html::{IncludeBackground, styled_line_to_highlighted_html},
  parsing::{SyntaxReference, SyntaxSet},
  util::LinesWithEndings,
};
use two_face::{
  re_exports::syntect::highlighting::ThemeSet,
  theme::{EmbeddedLazyThemeSet, EmbeddedThemeName},
};

use super::{
  error::{SyntaxError, SyntaxResult},
  types::{
    HighlightMode,
    SyntaxConfig,
    SyntaxHighlighter,
    SyntaxManager,
    mark_lines,
  },
};
use crate::directive::HighlightLines;

/// Theme used when none is configured.
pub const DEFAULT_THEME: &str = "InspiredGitHub";

/// Themes bundled by two-face, by the name accepted in configuration.
const EMBEDDED_THEME_NAMES: &[&str] = &[
  "Base16OceanDark",
  "Base16OceanLight",
  "ColdarkCold",
  "ColdarkDark",
  "Dracula",
  "Github",
  "GruvboxDark",
  "GruvboxLight",
  "InspiredGithub",
  "MonokaiExtended",
  "MonokaiExtendedBright",
  "MonokaiExtendedLight",
  "Nord",
  "OneHalfDark",
  "OneHalfLight",
  "SolarizedDark",
  "SolarizedLight",
  "SublimeSnazzy",
  "TwoDark",
  "Zenburn",
];

fn embedded_theme(name: &str) -> Option<EmbeddedThemeName> {
  let theme = match name {
    "Base16OceanDark" => EmbeddedThemeName::Base16OceanDark,
    "Base16OceanLight" => EmbeddedThemeName::Base16OceanLight,
    "ColdarkCold" => EmbeddedThemeName::ColdarkCold,
    "ColdarkDark" => EmbeddedThemeName::ColdarkDark,
    "Dracula" => EmbeddedThemeName::Dracula,
    "Github" => EmbeddedThemeName::Github,
    "GruvboxDark" => EmbeddedThemeName::GruvboxDark,
    "GruvboxLight" => EmbeddedThemeName::GruvboxLight,
    "InspiredGithub" => EmbeddedThemeName::InspiredGithub,
    "MonokaiExtended" => EmbeddedThemeName::MonokaiExtended,
    "MonokaiExtendedBright" => EmbeddedThemeName::MonokaiExtendedBright,
    "MonokaiExtendedLight" => EmbeddedThemeName::MonokaiExtendedLight,
    "Nord" => EmbeddedThemeName::Nord,
    "OneHalfDark" => EmbeddedThemeName::OneHalfDark,
    "OneHalfLight" => EmbeddedThemeName::OneHalfLight,
    "SolarizedDark" => EmbeddedThemeName::SolarizedDark,
    "SolarizedLight" => EmbeddedThemeName::SolarizedLight,
    "SublimeSnazzy" => EmbeddedThemeName::SublimeSnazzy,
    "TwoDark" => EmbeddedThemeName::TwoDark,
    "Zenburn" => EmbeddedThemeName::Zenburn,
    _ => return None,
  };
  Some(theme)
}

/// Syntect-based syntax highlighter
pub struct SyntectHighlighter {
  theme: &'static Theme,
}

impl SyntectHighlighter {
  /// Create a highlighter using the named theme.
  ///
  /// # Errors
  ///
  /// Returns [`SyntaxError::ThemeNotFound`] if neither syntect's default
  /// themes nor two-face provide a theme of that name.
  pub fn new(theme_name: Option<&str>) -> SyntaxResult<Self> {
    let name = theme_name.unwrap_or(DEFAULT_THEME);
    let theme = Self::find_theme(name)
      .ok_or_else(|| SyntaxError::ThemeNotFound(name.to_string()))?;
    Ok(Self { theme })
  }

  /// Get the syntect `SyntaxSet`.
  fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(two_face::syntax::extra_newlines)
  }

  /// Get the `ThemeSet` with extended themes.
  fn theme_set() -> &'static EmbeddedLazyThemeSet {
    static THEME_SET: OnceLock<EmbeddedLazyThemeSet> = OnceLock::new();
    THEME_SET.get_or_init(two_face::theme::extra)
  }

  /// Get the default syntect `ThemeSet`.
  fn default_theme_set() -> &'static ThemeSet {
    static DEFAULT_THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
    DEFAULT_THEME_SET.get_or_init(ThemeSet::load_defaults)
  }

  fn find_theme(name: &str) -> Option<&'static Theme> {
    Self::default_theme_set()
      .themes
      .get(name)
      .or_else(|| embedded_theme(name).map(|t| Self::theme_set().get(t)))
  }

  /// Names of every theme that can be configured.
  #[must_use]
  pub fn available_themes() -> Vec<String> {
    let mut themes: Vec<String> =
      Self::default_theme_set().themes.keys().cloned().collect();
    themes.extend(EMBEDDED_THEME_NAMES.iter().map(ToString::to_string));
    themes.sort();
    themes.dedup();
    themes
  }

  fn syntax_for(language: &str) -> &'static SyntaxReference {
    let syntax_set = Self::syntax_set();
    syntax_set
      .find_syntax_by_token(language)
      .unwrap_or_else(|| syntax_set.find_syntax_plain_text())
  }

  fn highlight_line(
    highlighter: &mut LineHighlighter<'_>,
    line: &str,
  ) -> SyntaxResult<String> {
    let regions = highlighter
      .highlight_line(line, Self::syntax_set())
      .map_err(|e| SyntaxError::HighlightingFailed(e.to_string()))?;
    styled_line_to_highlighted_html(&regions[..], IncludeBackground::No)
      .map_err(|e| SyntaxError::HighlightingFailed(e.to_string()))
  }
}

impl SyntaxHighlighter for SyntectHighlighter {
  fn name(&self) -> &'static str {
    "Syntect"
  }

  fn supported_languages(&self) -> Vec<String> {
    Self::syntax_set()
      .syntaxes()
      .iter()
      .flat_map(|syntax| {
        std::iter::once(syntax.name.to_lowercase())
          .chain(syntax.file_extensions.iter().map(|ext| ext.to_lowercase()))
      })
      .collect()
  }

  fn supports_language(&self, language: &str) -> bool {
    Self::syntax_set().find_syntax_by_token(language).is_some()
  }

  fn highlight(
    &self,
    code: &str,
    language: &str,
    mode: HighlightMode,
    lines: &HighlightLines,
  ) -> SyntaxResult<String> {
    let mut highlighter =
      LineHighlighter::new(Self::syntax_for(language), self.theme);

    match mode {
      HighlightMode::Span => Self::highlight_line(&mut highlighter, code),
      HighlightMode::Block => {
        let rendered = LinesWithEndings::from(code)
          .map(|line| Self::highlight_line(&mut highlighter, line))
          .collect::<SyntaxResult<Vec<_>>>()?;
        Ok(mark_lines(rendered, lines))
      },
    }
  }
}

/// Create a Syntect-based syntax manager using the named theme.
///
/// # Errors
///
/// Returns [`SyntaxError::ThemeNotFound`] for an unknown theme.
pub fn create_syntect_manager(
  theme: Option<&str>,
) -> SyntaxResult<SyntaxManager> {
  let highlighter = Box::new(SyntectHighlighter::new(theme)?);
  Ok(SyntaxManager::new(highlighter, SyntaxConfig::default()))
}
