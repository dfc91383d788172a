//! Building the navigation manifest from a summary document.

use std::{fs, path::{Path, PathBuf}};

use log::{debug, info};

use super::types::{TocConfig, TocError, TocItem};
use crate::{
  ast::{Node, NodeKind},
  links::{is_external, strip_extension},
  parser,
};

/// Heading level that separates sections of the summary.
const SECTION_LEVEL: u8 = 2;

/// Extract the navigation manifest from a parsed summary document.
///
/// Top-level lists contribute their items, level-2 headings become section
/// separators and everything else is ignored. Separators of sections without
/// entries are collapsed, see [`collapse_empty_sections`].
///
/// # Errors
///
/// Returns [`TocError::InvalidSummaryShape`] for a list item that does not
/// start with plain text or a link.
pub fn extract_toc(root: &Node) -> Result<Vec<TocItem>, TocError> {
  let mut toc = Vec::new();

  for child in &root.children {
    match &child.kind {
      NodeKind::List { .. } => toc.extend(extract_items(child)?),
      NodeKind::Header { level, raw_text } if *level == SECTION_LEVEL => {
        toc.push(TocItem::header(raw_text.trim()));
      },
      other => debug!("Ignoring {other:?} in summary"),
    }
  }

  Ok(collapse_empty_sections(toc))
}

fn extract_items(list: &Node) -> Result<Vec<TocItem>, TocError> {
  list
    .children
    .iter()
    .map(|child| {
      if child.kind == NodeKind::ListItem {
        extract_item(child)
      } else {
        Err(TocError::InvalidSummaryShape(format!(
          "summary list contains {:?}, expected list items",
          child.kind
        )))
      }
    })
    .collect()
}

fn extract_item(item: &Node) -> Result<TocItem, TocError> {
  let lead = item
    .first_child()
    .filter(|child| child.kind == NodeKind::Paragraph)
    .and_then(Node::first_child)
    .ok_or_else(|| {
      TocError::InvalidSummaryShape(
        "list item does not start with a paragraph".to_string(),
      )
    })?;

  let mut entry = match &lead.kind {
    NodeKind::Text(text) => TocItem::placeholder(text.trim()),
    NodeKind::Link => {
      let target = lead.attr("href").unwrap_or_default();
      let stem = strip_extension(target);
      let id = stem.strip_prefix('/').unwrap_or(stem);
      TocItem {
        is_external: is_external(target),
        ..TocItem::page(id, lead.inner_text().trim())
      }
    },
    other => {
      return Err(TocError::InvalidSummaryShape(format!(
        "list item starts with {other:?}, expected text or a link (in '{}')",
        item.inner_text().trim()
      )));
    },
  };

  let mut pages = Vec::new();
  let mut nested = false;
  for child in item.children.iter().skip(1) {
    if matches!(child.kind, NodeKind::List { .. }) {
      nested = true;
      pages.extend(extract_items(child)?);
    }
  }
  if nested {
    entry.pages = Some(pages);
  }

  Ok(entry)
}

/// Drop separators of empty sections.
///
/// Of a run of consecutive headers only the last one is kept. A header at the
/// very end of the manifest stays.
#[must_use]
pub fn collapse_empty_sections(items: Vec<TocItem>) -> Vec<TocItem> {
  let mut out: Vec<TocItem> = Vec::with_capacity(items.len());
  for item in items {
    if item.is_header() && out.last().is_some_and(TocItem::is_header) {
      out.pop();
    }
    out.push(item);
  }
  out
}

/// Serialize the manifest to compact JSON.
///
/// # Errors
///
/// Returns [`TocError::Serde`] if serialization fails.
pub fn toc_to_json(items: &[TocItem]) -> Result<String, TocError> {
  Ok(serde_json::to_string(items)?)
}

/// Read the summary below `source_dir`, build the manifest and write it below
/// `output_dir`.
///
/// Returns the path of the written file.
///
/// # Errors
///
/// Returns [`TocError::Io`] if the summary cannot be read or the manifest
/// cannot be written, and [`TocError::InvalidSummaryShape`] for unsupported
/// list items.
pub fn generate_toc(
  source_dir: &Path,
  output_dir: &Path,
  config: &TocConfig,
) -> Result<PathBuf, TocError> {
  let input = source_dir.join(&config.input);
  let content = fs::read_to_string(&input).map_err(|source| {
    TocError::Io {
      path: input.clone(),
      source,
    }
  })?;

  let toc = extract_toc(&parser::parse_document(&content))?;
  let json = toc_to_json(&toc)?;

  let output = output_dir.join(&config.output);
  if let Some(parent) = output.parent() {
    fs::create_dir_all(parent).map_err(|source| {
      TocError::Io {
        path: parent.to_path_buf(),
        source,
      }
    })?;
  }
  fs::write(&output, json).map_err(|source| {
    TocError::Io {
      path: output.clone(),
      source,
    }
  })?;

  info!(
    "Generated TOC with {} entries: {}",
    toc.len(),
    output.display()
  );
  Ok(output)
}
