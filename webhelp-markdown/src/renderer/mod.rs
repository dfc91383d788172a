//! Document renderer with site-specific HTML conventions.
//!
//! The renderer is organized into focused submodules:
//!
//! - [`core`]: the renderer, per-document state and generic HTML emission
//! - [`elements`]: headings, code, links and blockquotes
//! - [`types`]: configuration and output types
pub mod core;
mod elements;
pub mod types;

pub use self::core::DocumentRenderer;

pub use types::{
  HighlightOptions,
  MAX_ANCHORED_HEADER_LEVEL,
  RenderConfig,
  RenderOutput,
  TocEntry,
};

use crate::{directive::MalformedDirective, syntax::SyntaxError};

/// Errors that abort the conversion of one document.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
  #[error(transparent)]
  MalformedDirective(#[from] MalformedDirective),

  #[error("Syntax highlighting failed: {0}")]
  Highlight(#[from] SyntaxError),
}
