//! # webhelp-markdown
//!
//! Markdown rendering and navigation extraction for webhelp documentation
//! sites.
//!
//! Pages are parsed with `comrak` into an owned document tree and rendered
//! with the site's conventions: anchored headings with permalinks, highlighted
//! code with marked lines, rewritten links and admonition blocks. A separate
//! summary document is turned into the JSON navigation manifest.
//!
//! ## Quick Start
//!
//! ```rust
//! use webhelp_markdown::{DocumentRenderer, RenderConfig};
//!
//! let renderer = DocumentRenderer::new(RenderConfig::default());
//! let page = renderer
//!   .render_markdown("# Hello World\n\nSee [setup](/setup.md).")
//!   .expect("page renders");
//!
//! assert!(page.html.contains("href=\"/setup.html\""));
//! assert_eq!(page.title.as_deref(), Some("Hello World"));
//! ```
//!
//! ## Navigation manifest
//!
//! ```rust
//! use webhelp_markdown::{parser, toc};
//!
//! let summary = parser::parse_document("## Guide\n- [Intro](/intro.md)\n");
//! let items = toc::extract_toc(&summary).expect("summary is well formed");
//! let json = toc::toc_to_json(&items).expect("manifest serializes");
//!
//! assert!(json.contains("\"url\":\"intro.html\""));
//! ```

pub mod ast;
pub mod directive;
pub mod ids;
pub mod links;
pub mod parser;
pub mod renderer;
pub mod syntax;
pub mod toc;
pub mod utils;

pub use crate::{
  ast::{Attributes, Node, NodeKind},
  directive::{HighlightLines, MalformedDirective, parse_highlight_lines},
  ids::{HeadingIds, IdGenerator},
  renderer::{
    DocumentRenderer,
    HighlightOptions,
    RenderConfig,
    RenderError,
    RenderOutput,
    TocEntry,
  },
  toc::{TocConfig, TocError, TocItem, TocItemType},
};
