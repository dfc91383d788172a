//! Navigation manifest types.

use std::{io, path::PathBuf};

use serde::{Deserialize, Serialize};

/// Summary file read when none is configured.
pub const DEFAULT_TOC_INPUT: &str = "_SUMMARY.md";

/// Manifest file written when none is configured.
pub const DEFAULT_TOC_OUTPUT: &str = "HelpTOC.json";

/// Kind of a non-page TOC entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TocItemType {
  /// Section separator taken from a level-2 heading. Never has pages.
  Header,
  /// Entry without a link target.
  Placeholder,
}

/// One entry of the navigation manifest.
///
/// Linked pages have no `type` and carry `id` and `url`. Unset fields are
/// left out of the JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocItem {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,

  pub title: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,

  #[serde(
    rename = "type",
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub kind: Option<TocItemType>,

  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  pub is_external: bool,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pages: Option<Vec<Self>>,
}

impl TocItem {
  /// A section separator.
  #[must_use]
  pub fn header(title: impl Into<String>) -> Self {
    Self {
      id:          None,
      title:       title.into(),
      url:         None,
      kind:        Some(TocItemType::Header),
      is_external: false,
      pages:       None,
    }
  }

  /// An entry without a page behind it.
  #[must_use]
  pub fn placeholder(title: impl Into<String>) -> Self {
    Self {
      kind: Some(TocItemType::Placeholder),
      ..Self::header(title)
    }
  }

  /// A linked page. `id` is the target path without extension or leading
  /// slash.
  #[must_use]
  pub fn page(id: impl Into<String>, title: impl Into<String>) -> Self {
    let id = id.into();
    Self {
      url: Some(format!("{id}.html")),
      id: Some(id),
      kind: None,
      ..Self::header(title)
    }
  }

  #[must_use]
  pub fn is_header(&self) -> bool {
    self.kind == Some(TocItemType::Header)
  }
}

/// Where the summary is read from and the manifest is written to, relative
/// to the source and output directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocConfig {
  pub input:  PathBuf,
  pub output: PathBuf,
}

impl Default for TocConfig {
  fn default() -> Self {
    Self {
      input:  PathBuf::from(DEFAULT_TOC_INPUT),
      output: PathBuf::from(DEFAULT_TOC_OUTPUT),
    }
  }
}

/// Errors raised while building the navigation manifest.
#[derive(Debug, thiserror::Error)]
pub enum TocError {
  #[error("Invalid summary shape: {0}")]
  InvalidSummaryShape(String),

  #[error("I/O error on {}: {source}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Serde error: {0}")]
  Serde(#[from] serde_json::Error),
}
