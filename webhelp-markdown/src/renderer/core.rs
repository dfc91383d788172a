//! Core implementation of the document renderer.
//!
//! Walks a [`Node`] tree and emits HTML. Headings, code, links and
//! blockquotes follow site-specific rules (see `elements.rs`). Every other
//! kind gets plain HTML: block elements on their own line, nested blocks
//! indented by two spaces.

use log::{debug, trace, warn};

use super::{
  RenderError,
  types::{RenderConfig, RenderOutput, TocEntry},
};
use crate::{
  ast::{Attributes, Node, NodeKind},
  ids::{HeadingIds, IdGenerator},
  parser,
  syntax::{
    SyntaxError,
    SyntaxHighlighter,
    SyntaxManager,
    create_default_manager,
  },
  utils,
};

/// Indentation step for nested block elements.
pub(crate) const INDENT: usize = 2;

/// Renders documents to HTML fragments.
///
/// The renderer itself is immutable; everything that belongs to a single
/// document (heading ids, TOC records, title) lives in a [`RenderState`]
/// created per call.
pub struct DocumentRenderer {
  pub(crate) config: RenderConfig,
  pub(crate) syntax: SyntaxManager,
}

/// Per-document accumulator threaded through one render pass.
pub(crate) struct RenderState<'ids> {
  pub(crate) ids:   &'ids mut dyn IdGenerator,
  pub(crate) toc:   Vec<TocEntry>,
  pub(crate) title: Option<String>,
}

impl DocumentRenderer {
  /// Create a renderer, choosing the highlighter from the configuration.
  ///
  /// An unknown theme falls back to the backend's default theme. Without a
  /// usable backend, or with highlighting disabled, code is only escaped.
  #[must_use]
  pub fn new(config: RenderConfig) -> Self {
    let syntax = if config.highlight.enable {
      let theme = config.highlight.theme.as_deref();
      let manager = match create_default_manager(theme) {
        Err(SyntaxError::ThemeNotFound(name)) => {
          warn!("Theme '{name}' not found, using the default theme");
          create_default_manager(None)
        },
        other => other,
      };
      manager.unwrap_or_else(|e| {
        debug!("{e}, code will not be highlighted");
        SyntaxManager::plain()
      })
    } else {
      SyntaxManager::plain()
    };

    Self { config, syntax }
  }

  /// Replace the syntax highlighting backend.
  #[must_use]
  pub fn with_highlighter(
    mut self,
    highlighter: Box<dyn SyntaxHighlighter>,
  ) -> Self {
    self.syntax = SyntaxManager::with_highlighter(highlighter);
    self
  }

  /// Access renderer options.
  #[must_use]
  pub const fn config(&self) -> &RenderConfig {
    &self.config
  }

  /// Parse Markdown text and render it.
  ///
  /// # Errors
  ///
  /// See [`DocumentRenderer::render`].
  pub fn render_markdown(
    &self,
    markdown: &str,
  ) -> Result<RenderOutput, RenderError> {
    self.render(&parser::parse_document(markdown))
  }

  /// Render a document tree with the default heading identifier policy.
  ///
  /// # Errors
  ///
  /// Returns [`RenderError::MalformedDirective`] for an unparseable
  /// highlight-line directive and [`RenderError::Highlight`] when the
  /// highlighter fails.
  pub fn render(&self, root: &Node) -> Result<RenderOutput, RenderError> {
    self.render_with_ids(root, &mut HeadingIds::new())
  }

  /// Render a document tree, generating heading identifiers with `ids`.
  ///
  /// # Errors
  ///
  /// See [`DocumentRenderer::render`].
  pub fn render_with_ids(
    &self,
    root: &Node,
    ids: &mut dyn IdGenerator,
  ) -> Result<RenderOutput, RenderError> {
    let mut state = RenderState {
      ids,
      toc: Vec::new(),
      title: None,
    };
    let html = self.convert(root, 0, &mut state)?;

    Ok(RenderOutput {
      html,
      toc: state.toc,
      title: state.title,
    })
  }

  /// Convert one node at the given indentation.
  pub(crate) fn convert(
    &self,
    node: &Node,
    indent: usize,
    state: &mut RenderState<'_>,
  ) -> Result<String, RenderError> {
    trace!("Rendering {:?} at indent {indent}", node.kind);

    let html = match &node.kind {
      NodeKind::Document => self.convert_document(node, indent, state)?,
      NodeKind::Header { level, raw_text } => {
        self.convert_header(node, *level, raw_text, indent, state)?
      },
      NodeKind::CodeBlock(code) => self.convert_code_block(node, code)?,
      NodeKind::CodeSpan(code) => self.convert_code_span(node, code)?,
      NodeKind::Link => self.convert_link(node, indent, state)?,
      NodeKind::Blockquote => self.convert_blockquote(node, indent, state)?,
      NodeKind::Paragraph => {
        format_as_block_html(
          "p",
          &node.attributes,
          &self.inner(node, indent, state)?,
          indent,
        )
      },
      NodeKind::List { ordered, start, tight } => {
        self.convert_list(node, *ordered, *start, *tight, indent, state)?
      },
      // Items outside a list are rendered as loose items
      NodeKind::ListItem => self.convert_list_item(node, false, indent, state)?,
      NodeKind::Table => {
        format_as_indented_block_html(
          "table",
          &node.attributes,
          &self.inner(node, indent, state)?,
          indent,
        )
      },
      NodeKind::TableHead => {
        format_as_indented_block_html(
          "thead",
          &node.attributes,
          &self.inner(node, indent, state)?,
          indent,
        )
      },
      NodeKind::TableBody => {
        format_as_indented_block_html(
          "tbody",
          &node.attributes,
          &self.inner(node, indent, state)?,
          indent,
        )
      },
      NodeKind::TableRow => {
        format_as_indented_block_html(
          "tr",
          &node.attributes,
          &self.inner(node, indent, state)?,
          indent,
        )
      },
      NodeKind::TableCell { header } => {
        format_as_block_html(
          if *header { "th" } else { "td" },
          &node.attributes,
          &self.inner(node, indent, state)?,
          indent,
        )
      },
      NodeKind::FootnoteDefinition { name, references } => {
        self.convert_footnote_definition(node, name, *references, indent, state)?
      },
      NodeKind::Text(text) => html_escape::encode_text(text).into_owned(),
      NodeKind::Strong => {
        format_as_span_html(
          "strong",
          &node.attributes,
          &self.inner(node, indent, state)?,
        )
      },
      NodeKind::Emphasis => {
        format_as_span_html("em", &node.attributes, &self.inner(node, indent, state)?)
      },
      NodeKind::Strikethrough => {
        format_as_span_html("del", &node.attributes, &self.inner(node, indent, state)?)
      },
      NodeKind::Anchor => {
        format_as_span_html("a", &node.attributes, &self.inner(node, indent, state)?)
      },
      NodeKind::Image => format!("<img{} />", html_attributes(&node.attributes)),
      NodeKind::Entity(name) => format!("&{name};"),
      NodeKind::HtmlBlock(html) => {
        let mut html = html.clone();
        if !html.ends_with('\n') {
          html.push('\n');
        }
        html
      },
      NodeKind::HtmlInline(html) => html.clone(),
      NodeKind::SoftBreak => "\n".to_string(),
      NodeKind::LineBreak => "<br />\n".to_string(),
      NodeKind::ThematicBreak => {
        format!(
          "{}<hr{} />\n",
          " ".repeat(indent),
          html_attributes(&node.attributes)
        )
      },
    };

    Ok(html)
  }

  /// Render the children of `node` one indentation step deeper.
  pub(crate) fn inner(
    &self,
    node: &Node,
    indent: usize,
    state: &mut RenderState<'_>,
  ) -> Result<String, RenderError> {
    self.convert_children(&node.children, indent + INDENT, state)
  }

  pub(crate) fn convert_children(
    &self,
    children: &[Node],
    indent: usize,
    state: &mut RenderState<'_>,
  ) -> Result<String, RenderError> {
    let mut out = String::new();
    for child in children {
      out.push_str(&self.convert(child, indent, state)?);
    }
    Ok(out)
  }

  /// Render top-level blocks, then the footnote bodies in one section.
  fn convert_document(
    &self,
    node: &Node,
    indent: usize,
    state: &mut RenderState<'_>,
  ) -> Result<String, RenderError> {
    let (notes, blocks): (Vec<&Node>, Vec<&Node>) =
      node.children.iter().partition(|child| {
        matches!(child.kind, NodeKind::FootnoteDefinition { .. })
      });

    let mut out = String::new();
    for block in blocks {
      out.push_str(&self.convert(block, indent, state)?);
    }
    if notes.is_empty() {
      return Ok(out);
    }

    let mut list = String::new();
    for note in notes {
      list.push_str(&self.convert(note, indent + 2 * INDENT, state)?);
    }
    let mut section = Attributes::new();
    section.insert("class".to_string(), "footnotes".to_string());
    out.push_str(&format_as_indented_block_html(
      "section",
      &section,
      &format_as_indented_block_html(
        "ol",
        &Attributes::new(),
        &list,
        indent + INDENT,
      ),
      indent,
    ));
    Ok(out)
  }

  /// Render a footnote body as a list item ending in links back to each
  /// reference.
  fn convert_footnote_definition(
    &self,
    node: &Node,
    name: &str,
    references: u32,
    indent: usize,
    state: &mut RenderState<'_>,
  ) -> Result<String, RenderError> {
    let mut body = self.inner(node, indent, state)?;

    let backrefs: Vec<String> = (1..=references)
      .map(|n| {
        let target = if n == 1 {
          format!("#fnref-{name}")
        } else {
          format!("#fnref-{name}-{n}")
        };
        let mut attributes = Attributes::new();
        attributes.insert("href".to_string(), target);
        attributes.insert("class".to_string(), "footnote-backref".to_string());
        format_as_span_html("a", &attributes, "\u{21a9}")
      })
      .collect();
    if !backrefs.is_empty() {
      body.push_str(&" ".repeat(indent + INDENT));
      body.push_str(&backrefs.join(" "));
      body.push('\n');
    }

    let mut attributes = node.attributes.clone();
    attributes.insert("id".to_string(), format!("fn-{name}"));
    Ok(format_as_indented_block_html("li", &attributes, &body, indent))
  }

  fn convert_list(
    &self,
    node: &Node,
    ordered: bool,
    start: usize,
    tight: bool,
    indent: usize,
    state: &mut RenderState<'_>,
  ) -> Result<String, RenderError> {
    let (name, attributes) = if ordered {
      let mut attributes = node.attributes.clone();
      if start != 1 {
        attributes.insert("start".to_string(), start.to_string());
      }
      ("ol", attributes)
    } else {
      ("ul", node.attributes.clone())
    };

    let mut body = String::new();
    for item in &node.children {
      if item.kind == NodeKind::ListItem {
        body.push_str(&self.convert_list_item(
          item,
          tight,
          indent + INDENT,
          state,
        )?);
      } else {
        body.push_str(&self.convert(item, indent + INDENT, state)?);
      }
    }

    Ok(format_as_indented_block_html(name, &attributes, &body, indent))
  }

  /// Render a list item. Paragraphs of a tight item are transparent.
  fn convert_list_item(
    &self,
    node: &Node,
    tight: bool,
    indent: usize,
    state: &mut RenderState<'_>,
  ) -> Result<String, RenderError> {
    let mut out = format!("{}<li{}>", " ".repeat(indent), html_attributes(&node.attributes));

    let transparent_start = tight
      && node
        .first_child()
        .is_some_and(|child| child.kind == NodeKind::Paragraph);

    if node.children.is_empty() || transparent_start {
      let last = node.children.len().saturating_sub(1);
      for (i, child) in node.children.iter().enumerate() {
        if tight && child.kind == NodeKind::Paragraph {
          out.push_str(&self.inner(child, indent, state)?);
          if i < last {
            out.push('\n');
          }
        } else {
          out.push_str(&self.convert(child, indent + INDENT, state)?);
        }
      }
      if out.ends_with('\n') {
        out.push_str(&" ".repeat(indent));
      }
    } else {
      out.push('\n');
      for child in &node.children {
        if tight && child.kind == NodeKind::Paragraph {
          out.push_str(&" ".repeat(indent + INDENT));
          out.push_str(&self.inner(child, indent, state)?);
          out.push('\n');
        } else {
          out.push_str(&self.convert(child, indent + INDENT, state)?);
        }
      }
      out.push_str(&" ".repeat(indent));
    }

    out.push_str("</li>\n");
    Ok(out)
  }
}

/// Render ` key="value"` pairs in insertion order.
pub(crate) fn html_attributes(attributes: &Attributes) -> String {
  attributes
    .iter()
    .map(|(key, value)| format!(" {key}=\"{}\"", utils::escape_attribute(value)))
    .collect()
}

/// `<name attrs>body</name>` on its own line.
pub(crate) fn format_as_block_html(
  name: &str,
  attributes: &Attributes,
  body: &str,
  indent: usize,
) -> String {
  format!(
    "{}<{name}{}>{body}</{name}>\n",
    " ".repeat(indent),
    html_attributes(attributes)
  )
}

/// `<name attrs>`, the body on the following lines, then `</name>`.
pub(crate) fn format_as_indented_block_html(
  name: &str,
  attributes: &Attributes,
  body: &str,
  indent: usize,
) -> String {
  let padding = " ".repeat(indent);
  format!(
    "{padding}<{name}{}>\n{body}{padding}</{name}>\n",
    html_attributes(attributes)
  )
}

/// `<name attrs>body</name>` inline.
pub(crate) fn format_as_span_html(
  name: &str,
  attributes: &Attributes,
  body: &str,
) -> String {
  format!("<{name}{}>{body}</{name}>", html_attributes(attributes))
}
