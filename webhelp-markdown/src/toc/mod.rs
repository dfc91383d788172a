//! Site navigation manifest.
//!
//! The page tree of a site is authored as a single summary document: level-2
//! headings separate sections and nested lists of links describe the pages.
//!
//! ```markdown
//! ## Getting Started
//! - [Introduction](/intro.md)
//!   - [Setup](/intro/setup.md)
//! - Coming soon
//! ```
//!
//! [`extract_toc`] turns that document into a list of [`TocItem`]s, which are
//! serialized to the JSON manifest consumed by the site's navigation.
mod extract;
mod types;

pub use extract::{collapse_empty_sections, extract_toc, generate_toc, toc_to_json};
pub use types::{
  DEFAULT_TOC_INPUT,
  DEFAULT_TOC_OUTPUT,
  TocConfig,
  TocError,
  TocItem,
  TocItemType,
};
