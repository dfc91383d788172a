//! Core types and traits for syntax highlighting.

use std::collections::HashMap;

use super::error::{SyntaxError, SyntaxResult};
use crate::directive::HighlightLines;

/// How highlighted code is going to be embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightMode {
  /// A multi-line code block; selected lines may be marked.
  Block,
  /// Inline code inside running text.
  Span,
}

/// Trait for syntax highlighting backends.
///
/// Implementations return pre-escaped HTML without an outer `<pre>` or
/// `<code>` wrapper; the renderer supplies those.
pub trait SyntaxHighlighter: Send + Sync {
  /// Get the name of this highlighter backend
  fn name(&self) -> &'static str;

  /// Get a list of supported languages
  fn supported_languages(&self) -> Vec<String>;

  /// Check if a language is supported
  fn supports_language(&self, language: &str) -> bool {
    self
      .supported_languages()
      .iter()
      .any(|lang| lang.eq_ignore_ascii_case(language))
  }

  /// Highlight `code` as `language`.
  ///
  /// In [`HighlightMode::Block`] every line listed in `lines` is wrapped in
  /// `<span class="hll">`. Span mode ignores `lines`.
  fn highlight(
    &self,
    code: &str,
    language: &str,
    mode: HighlightMode,
    lines: &HighlightLines,
  ) -> SyntaxResult<String>;
}

/// Wrap the 1-based `marked` lines of already rendered output.
///
/// Each item of `rendered` is one source line including its newline, if any.
pub(crate) fn mark_lines<I>(rendered: I, marked: &HighlightLines) -> String
where
  I: IntoIterator<Item = String>,
{
  let mut out = String::new();
  for (line_number, line) in (1u32..).zip(rendered) {
    if marked.contains(line_number) {
      out.push_str("<span class=\"hll\">");
      out.push_str(&line);
      out.push_str("</span>");
    } else {
      out.push_str(&line);
    }
  }
  out
}

/// Highlighter that only escapes HTML.
///
/// Used when highlighting is disabled or no backend is compiled in. Accepts
/// every language.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainHighlighter;

impl SyntaxHighlighter for PlainHighlighter {
  fn name(&self) -> &'static str {
    "Plain"
  }

  fn supported_languages(&self) -> Vec<String> {
    vec!["text".to_string()]
  }

  fn supports_language(&self, _language: &str) -> bool {
    true
  }

  fn highlight(
    &self,
    code: &str,
    _language: &str,
    mode: HighlightMode,
    lines: &HighlightLines,
  ) -> SyntaxResult<String> {
    match mode {
      HighlightMode::Span => Ok(html_escape::encode_text(code).into_owned()),
      HighlightMode::Block => {
        Ok(mark_lines(
          code
            .split_inclusive('\n')
            .map(|line| html_escape::encode_text(line).into_owned()),
          lines,
        ))
      },
    }
  }
}

/// Configuration for syntax highlighting
#[derive(Debug, Clone)]
pub struct SyntaxConfig {
  /// Language aliases for mapping common names to supported languages
  pub language_aliases: HashMap<String, String>,

  /// Whether to fall back to plain text for unsupported languages
  pub fallback_to_plain: bool,
}

impl Default for SyntaxConfig {
  fn default() -> Self {
    let language_aliases = [
      ("js", "javascript"),
      ("ts", "typescript"),
      ("py", "python"),
      ("rb", "ruby"),
      ("sh", "bash"),
      ("shell", "bash"),
      ("yml", "yaml"),
      ("md", "markdown"),
      ("cs", "c#"),
      ("csharp", "c#"),
      ("kt", "kotlin"),
    ]
    .into_iter()
    .map(|(alias, language)| (alias.to_string(), language.to_string()))
    .collect();

    Self {
      language_aliases,
      fallback_to_plain: true,
    }
  }
}

/// High-level syntax highlighting manager.
///
/// Wraps a backend with alias resolution and plain-text fallback.
pub struct SyntaxManager {
  highlighter: Box<dyn SyntaxHighlighter>,
  config:      SyntaxConfig,
}

impl SyntaxManager {
  /// Create a new syntax manager with the given highlighter and config
  #[must_use]
  pub fn new(
    highlighter: Box<dyn SyntaxHighlighter>,
    config: SyntaxConfig,
  ) -> Self {
    Self {
      highlighter,
      config,
    }
  }

  /// Create a new syntax manager with the default configuration
  #[must_use]
  pub fn with_highlighter(highlighter: Box<dyn SyntaxHighlighter>) -> Self {
    Self::new(highlighter, SyntaxConfig::default())
  }

  /// A manager that escapes code without colouring it.
  #[must_use]
  pub fn plain() -> Self {
    Self::with_highlighter(Box::new(PlainHighlighter))
  }

  /// Get the underlying highlighter
  #[must_use]
  pub fn highlighter(&self) -> &dyn SyntaxHighlighter {
    self.highlighter.as_ref()
  }

  /// Resolve a language name using aliases
  #[must_use]
  pub fn resolve_language(&self, language: &str) -> String {
    let lowered = language.to_lowercase();
    self
      .config
      .language_aliases
      .get(&lowered)
      .cloned()
      .unwrap_or(lowered)
  }

  /// Highlight code with alias resolution and plain-text fallback.
  ///
  /// # Errors
  ///
  /// Returns [`SyntaxError::UnsupportedLanguage`] when the language is unknown
  /// and fallback is disabled, or the backend's error when highlighting
  /// fails.
  pub fn highlight_code(
    &self,
    code: &str,
    language: &str,
    mode: HighlightMode,
    lines: &HighlightLines,
  ) -> SyntaxResult<String> {
    let resolved = self.resolve_language(language);

    if self.highlighter.supports_language(&resolved) {
      return self.highlighter.highlight(code, &resolved, mode, lines);
    }

    if self.config.fallback_to_plain {
      log::debug!(
        "Language '{resolved}' is not supported by {}, highlighting as plain \
         text",
        self.highlighter.name()
      );
      return self.highlighter.highlight(code, "text", mode, lines);
    }

    Err(SyntaxError::UnsupportedLanguage(resolved))
  }
}
