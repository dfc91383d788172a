//! Type definitions for the document renderer.
//!
//! # Examples
//!
//! ```
//! use webhelp_markdown::{DocumentRenderer, RenderConfig};
//!
//! let config = RenderConfig {
//!   base_url: "/docs/".to_string(),
//!   ..Default::default()
//! };
//!
//! let renderer = DocumentRenderer::new(config);
//! ```

use serde::{Deserialize, Serialize};

use crate::ast::Node;

/// Deepest output heading level that still gets a permalink icon.
pub const MAX_ANCHORED_HEADER_LEVEL: u8 = 3;

/// Options passed through to the syntax highlighter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightOptions {
  /// Colour code with the compiled-in backend. When `false`, code is only
  /// escaped.
  pub enable: bool,

  /// Theme name understood by the backend.
  pub theme: Option<String>,
}

impl Default for HighlightOptions {
  fn default() -> Self {
    Self {
      enable: true,
      theme:  None,
    }
  }
}

/// Rendering options, shared read-only by every conversion of a site build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
  /// Prefix that replaces the leading `/` of root-relative links.
  pub base_url: String,

  /// Generate identifiers for headings without an explicit `id`.
  pub auto_ids: bool,

  /// Added to every heading level before choosing the `<hN>` tag.
  pub header_offset: i8,

  /// Source heading levels that are recorded in the page TOC.
  pub toc_levels: Vec<u8>,

  pub highlight: HighlightOptions,

  /// Output levels up to this one get a permalink icon.
  pub max_anchored_header_level: u8,
}

impl Default for RenderConfig {
  fn default() -> Self {
    Self {
      base_url:                  "/".to_string(),
      auto_ids:                  true,
      header_offset:             0,
      toc_levels:                (1..=6).collect(),
      highlight:                 HighlightOptions::default(),
      max_anchored_header_level: MAX_ANCHORED_HEADER_LEVEL,
    }
  }
}

impl RenderConfig {
  /// Tag level for a source heading level, clamped to `1..=6`.
  #[must_use]
  pub fn output_header_level(&self, level: u8) -> u8 {
    let shifted = i16::from(level) + i16::from(self.header_offset);
    u8::try_from(shifted.clamp(1, 6)).unwrap_or(6)
  }

  /// Whether a heading belongs in the page TOC.
  ///
  /// Headings carrying the `no_toc` class are always left out.
  #[must_use]
  pub fn in_toc(&self, level: u8, class: Option<&str>) -> bool {
    self.toc_levels.contains(&level)
      && !class.is_some_and(|c| c.split_whitespace().any(|w| w == "no_toc"))
  }
}

/// A heading recorded while rendering a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
  /// Source heading level, before any offset.
  pub level:    u8,
  pub id:       String,
  /// Inline content of the heading.
  pub children: Vec<Node>,
}

impl TocEntry {
  /// Plain-text heading content.
  #[must_use]
  pub fn text(&self) -> String {
    self.children.iter().map(Node::inner_text).collect()
  }
}

/// Result of rendering one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
  /// Rendered HTML fragment.
  pub html: String,

  /// Headings that qualified for the page TOC, in document order.
  pub toc: Vec<TocEntry>,

  /// Raw text of the first level-1 heading, if any.
  pub title: Option<String>,
}
