//! Document tree consumed by the renderer and the TOC extractor.
//!
//! A [`Node`] owns its children. Payload-carrying [`NodeKind`] variants hold
//! exactly the data that is meaningful for that kind, so a heading always has
//! a level and raw text and a text node always has its literal string.

use indexmap::IndexMap;

/// Insertion-ordered attribute map (`class`, `href`, `id`, ...).
pub type Attributes = IndexMap<String, String>;

/// Kind of a document node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
  /// Root of a parsed document.
  Document,
  /// A heading. `raw_text` is the plain-text content without markup.
  Header { level: u8, raw_text: String },
  Paragraph,
  /// A bullet or numbered list. Items of a tight list render their
  /// paragraphs without `<p>` tags.
  List {
    ordered: bool,
    start:   usize,
    tight:   bool,
  },
  /// A list item. Task items carry the `task-list-item` class and start
  /// with their checkbox.
  ListItem,
  Table,
  TableHead,
  TableBody,
  TableRow,
  /// A table cell. Column alignment lives in the `style` attribute.
  TableCell { header: bool },
  /// A footnote body, rendered in the footnote section at the end of the
  /// document.
  FootnoteDefinition { name: String, references: u32 },
  /// A hyperlink; the target lives in the `href` attribute.
  Link,
  /// An image; `src`, `alt` and `title` live in the attributes.
  Image,
  Text(String),
  Strong,
  Emphasis,
  Strikethrough,
  /// Fenced or indented code. The language lives in the `class` attribute.
  CodeBlock(String),
  CodeSpan(String),
  Blockquote,
  /// An `<a>` element that is not a hyperlink in the source, such as a
  /// heading permalink.
  Anchor,
  /// An unresolved character reference, by name (`amp`, `#8212`, ...).
  Entity(String),
  /// Pre-rendered block-level HTML emitted verbatim.
  HtmlBlock(String),
  /// Pre-rendered inline HTML emitted verbatim.
  HtmlInline(String),
  SoftBreak,
  LineBreak,
  ThematicBreak,
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
  pub kind:       NodeKind,
  pub attributes: Attributes,
  pub children:   Vec<Self>,
}

impl Node {
  #[must_use]
  pub fn new(kind: NodeKind) -> Self {
    Self {
      kind,
      attributes: Attributes::new(),
      children: Vec::new(),
    }
  }

  #[must_use]
  pub fn document(children: Vec<Self>) -> Self {
    Self::new(NodeKind::Document).with_children(children)
  }

  /// Create a heading. The raw text is derived from the children.
  #[must_use]
  pub fn header(level: u8, children: Vec<Self>) -> Self {
    let raw_text = children.iter().map(Self::inner_text).collect();
    Self::new(NodeKind::Header { level, raw_text }).with_children(children)
  }

  #[must_use]
  pub fn paragraph(children: Vec<Self>) -> Self {
    Self::new(NodeKind::Paragraph).with_children(children)
  }

  #[must_use]
  pub fn text(value: impl Into<String>) -> Self {
    Self::new(NodeKind::Text(value.into()))
  }

  #[must_use]
  pub fn link(href: impl Into<String>, children: Vec<Self>) -> Self {
    Self::new(NodeKind::Link)
      .with_attr("href", href)
      .with_children(children)
  }

  #[must_use]
  pub fn strong(children: Vec<Self>) -> Self {
    Self::new(NodeKind::Strong).with_children(children)
  }

  #[must_use]
  pub fn bullet_list(items: Vec<Self>) -> Self {
    Self::new(NodeKind::List {
      ordered: false,
      start:   1,
      tight:   true,
    })
    .with_children(items)
  }

  #[must_use]
  pub fn list_item(children: Vec<Self>) -> Self {
    Self::new(NodeKind::ListItem).with_children(children)
  }

  #[must_use]
  pub fn blockquote(children: Vec<Self>) -> Self {
    Self::new(NodeKind::Blockquote).with_children(children)
  }

  #[must_use]
  pub fn code_block(code: impl Into<String>) -> Self {
    Self::new(NodeKind::CodeBlock(code.into()))
  }

  #[must_use]
  pub fn code_span(code: impl Into<String>) -> Self {
    Self::new(NodeKind::CodeSpan(code.into()))
  }

  /// Set an attribute, replacing any previous value.
  #[must_use]
  pub fn with_attr(
    mut self,
    key: impl Into<String>,
    value: impl Into<String>,
  ) -> Self {
    self.attributes.insert(key.into(), value.into());
    self
  }

  #[must_use]
  pub fn with_children(mut self, children: Vec<Self>) -> Self {
    self.children = children;
    self
  }

  /// Look up an attribute value.
  #[must_use]
  pub fn attr(&self, key: &str) -> Option<&str> {
    self.attributes.get(key).map(String::as_str)
  }

  #[must_use]
  pub fn first_child(&self) -> Option<&Self> {
    self.children.first()
  }

  /// Flatten the subtree into plain text.
  ///
  /// Literal payloads are concatenated in document order and entity nodes are
  /// resolved to the characters they stand for. Markup is dropped.
  #[must_use]
  pub fn inner_text(&self) -> String {
    let mut out = String::new();
    self.push_text(&mut out);
    out
  }

  fn push_text(&self, out: &mut String) {
    match &self.kind {
      NodeKind::Text(t) | NodeKind::CodeSpan(t) | NodeKind::CodeBlock(t) => {
        out.push_str(t);
      },
      NodeKind::Entity(name) => out.push_str(&resolve_entity(name)),
      NodeKind::SoftBreak => out.push(' '),
      NodeKind::LineBreak => out.push('\n'),
      _ => {},
    }
    for child in &self.children {
      child.push_text(out);
    }
  }
}

/// Resolve a named or numeric character reference to its characters.
///
/// Unknown names are returned in their escaped `&name;` form.
#[must_use]
pub fn resolve_entity(name: &str) -> String {
  let reference = format!("&{name};");
  html_escape::decode_html_entities(&reference).into_owned()
}
