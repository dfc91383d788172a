//! Pluggable syntax highlighting.
//!
//! The renderer only decides *what* to highlight (language, block or span,
//! marked lines); a [`SyntaxHighlighter`] backend decides how the code is
//! coloured. Currently supported backends:
//! - **Syntect** - Sublime Text syntax definitions, with two-face added for
//!   extended syntax definitions and themes (feature `syntect`)
//! - **Plain** - HTML escaping only, always available

pub mod error;
pub mod types;

pub use error::{SyntaxError, SyntaxResult};
pub use types::{
  HighlightMode,
  PlainHighlighter,
  SyntaxConfig,
  SyntaxHighlighter,
  SyntaxManager,
};

#[cfg(feature = "syntect")] mod syntect;
#[cfg(feature = "syntect")] pub use syntect::*;

/// Create the default syntax manager based on available features.
///
/// # Errors
///
/// Returns [`SyntaxError::ThemeNotFound`] if the theme is unknown to the
/// backend, or [`SyntaxError::NoBackendAvailable`] when no backend feature is
/// enabled.
pub fn create_default_manager(
  theme: Option<&str>,
) -> SyntaxResult<SyntaxManager> {
  #[cfg(feature = "syntect")]
  {
    create_syntect_manager(theme)
  }

  #[cfg(not(feature = "syntect"))]
  {
    let _ = theme;
    Err(SyntaxError::NoBackendAvailable)
  }
}
