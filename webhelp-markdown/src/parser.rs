//! Markdown parsing via comrak.
//!
//! comrak's arena AST is lowered into the owned [`Node`] tree the renderer and
//! the TOC extractor work on. Tables, task items and footnote bodies are
//! lowered so their links and code follow the same rules as everywhere else.
//! The remaining node kinds without a [`NodeKind`] counterpart (footnote
//! references, ...) are rendered by comrak itself and carried along as raw
//! HTML.

use std::sync::LazyLock;

use comrak::{
  Arena,
  nodes::{AstNode, ListType, NodeValue, TableAlignment},
  options::Options,
};
use log::{trace, warn};
use regex::Regex;

use crate::{
  ast::{Node, NodeKind},
  utils::never_matching_regex,
};

/// comrak options used for every document.
#[must_use]
pub fn comrak_options() -> Options<'static> {
  let mut options = Options::default();
  options.extension.table = true;
  options.extension.footnotes = true;
  options.extension.strikethrough = true;
  options.extension.tasklist = true;
  options.extension.autolink = true;
  options.render.r#unsafe = true;
  options
}

/// Parse Markdown text into a document tree.
#[must_use]
pub fn parse_document(markdown: &str) -> Node {
  let arena = Arena::new();
  let options = comrak_options();
  let root = comrak::parse_document(&arena, markdown, &options);
  lower(root, &options)
}

fn lower<'a>(node: &'a AstNode<'a>, options: &Options<'_>) -> Node {
  let children = || -> Vec<Node> {
    node.children().map(|child| lower(child, options)).collect()
  };

  let value = node.data.borrow().value.clone();
  match value {
    NodeValue::Document => Node::document(children()),
    NodeValue::Paragraph => Node::paragraph(children()),
    NodeValue::Heading(heading) => lower_heading(heading.level, children()),
    NodeValue::BlockQuote => Node::blockquote(children()),
    NodeValue::List(list) => {
      Node::new(NodeKind::List {
        ordered: list.list_type == ListType::Ordered,
        start:   list.start,
        tight:   list.tight,
      })
      .with_children(children())
    },
    NodeValue::Item(_) => Node::list_item(children()),
    NodeValue::TaskItem(task) => {
      lower_task_item(task.symbol.is_some(), children())
    },
    NodeValue::Table(table) => lower_table(node, &table.alignments, options),
    NodeValue::FootnoteDefinition(note) => {
      Node::new(NodeKind::FootnoteDefinition {
        name:       note.name,
        references: note.total_references,
      })
      .with_children(children())
    },
    NodeValue::CodeBlock(block) => {
      let code = Node::code_block(block.literal.clone());
      match block.info.split_whitespace().next() {
        Some(language) => code.with_attr("class", format!("language-{language}")),
        None => code,
      }
    },
    NodeValue::Code(code) => Node::code_span(code.literal.clone()),
    NodeValue::Text(text) => Node::text(text.to_string()),
    NodeValue::Emph => Node::new(NodeKind::Emphasis).with_children(children()),
    NodeValue::Strong => Node::strong(children()),
    NodeValue::Strikethrough => {
      Node::new(NodeKind::Strikethrough).with_children(children())
    },
    NodeValue::Link(link) => {
      let mut lowered = Node::link(link.url.clone(), children());
      if !link.title.is_empty() {
        lowered = lowered.with_attr("title", link.title.clone());
      }
      lowered
    },
    NodeValue::Image(link) => {
      let alt: String = children().iter().map(Node::inner_text).collect();
      let mut image = Node::new(NodeKind::Image)
        .with_attr("src", link.url.clone())
        .with_attr("alt", alt);
      if !link.title.is_empty() {
        image = image.with_attr("title", link.title.clone());
      }
      image
    },
    NodeValue::HtmlBlock(block) => Node::new(NodeKind::HtmlBlock(block.literal.clone())),
    NodeValue::HtmlInline(html) => Node::new(NodeKind::HtmlInline(html.clone())),
    NodeValue::SoftBreak => Node::new(NodeKind::SoftBreak),
    NodeValue::LineBreak => Node::new(NodeKind::LineBreak),
    NodeValue::ThematicBreak => Node::new(NodeKind::ThematicBreak),
    other => {
      trace!("Delegating {other:?} to comrak's HTML formatter");
      pre_render(node, other.block(), options)
    },
  }
}

/// Build a heading, turning a trailing `{#id}` marker into an explicit id.
fn lower_heading(level: u8, mut children: Vec<Node>) -> Node {
  static EXPLICIT_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*\{#([A-Za-z][\w.-]*)\}\s*$").unwrap_or_else(|e| {
      log::error!("Failed to compile EXPLICIT_ID_RE regex: {e}");
      never_matching_regex()
    })
  });

  let mut explicit_id = None;
  if let Some(last) = children.last_mut()
    && let NodeKind::Text(text) = &mut last.kind
    && let Some((start, id)) =
      EXPLICIT_ID_RE.captures(text.as_str()).and_then(|caps| {
        Some((caps.get(0)?.start(), caps.get(1)?.as_str().to_string()))
      })
  {
    text.truncate(start);
    explicit_id = Some(id);
  }

  if children
    .last()
    .is_some_and(|last| last.kind == NodeKind::Text(String::new()))
  {
    children.pop();
  }

  let header = Node::header(level, children);
  match explicit_id {
    Some(id) => header.with_attr("id", id),
    None => header,
  }
}

/// Build a list item that starts with a disabled checkbox.
fn lower_task_item(checked: bool, mut children: Vec<Node>) -> Node {
  let checkbox = Node::new(NodeKind::HtmlInline(if checked {
    "<input type=\"checkbox\" checked=\"\" disabled=\"\" /> ".to_string()
  } else {
    "<input type=\"checkbox\" disabled=\"\" /> ".to_string()
  }));

  let starts_with_paragraph = children
    .first()
    .is_some_and(|first| first.kind == NodeKind::Paragraph);
  if !starts_with_paragraph {
    children.insert(0, Node::paragraph(Vec::new()));
  }

  if let Some(paragraph) = children.first_mut() {
    if let Some(Node {
      kind: NodeKind::Text(text),
      ..
    }) = paragraph.children.first_mut()
    {
      *text = text.trim_start().to_string();
    }
    paragraph.children.insert(0, checkbox);
  }

  Node::list_item(children).with_attr("class", "task-list-item")
}

/// Split table rows into head and body and carry column alignment to cells.
fn lower_table<'a>(
  node: &'a AstNode<'a>,
  alignments: &[TableAlignment],
  options: &Options<'_>,
) -> Node {
  let mut head = Vec::new();
  let mut body = Vec::new();

  for row in node.children() {
    let header = matches!(row.data.borrow().value, NodeValue::TableRow(true));
    let cells = row
      .children()
      .enumerate()
      .map(|(column, cell)| {
        let lowered = Node::new(NodeKind::TableCell { header }).with_children(
          cell.children().map(|child| lower(child, options)).collect(),
        );
        match alignments.get(column).copied().and_then(alignment_style) {
          Some(style) => lowered.with_attr("style", style),
          None => lowered,
        }
      })
      .collect();

    let row = Node::new(NodeKind::TableRow).with_children(cells);
    if header {
      head.push(row);
    } else {
      body.push(row);
    }
  }

  let mut sections = vec![Node::new(NodeKind::TableHead).with_children(head)];
  if !body.is_empty() {
    sections.push(Node::new(NodeKind::TableBody).with_children(body));
  }
  Node::new(NodeKind::Table).with_children(sections)
}

const fn alignment_style(alignment: TableAlignment) -> Option<&'static str> {
  match alignment {
    TableAlignment::None => None,
    TableAlignment::Left => Some("text-align: left"),
    TableAlignment::Center => Some("text-align: center"),
    TableAlignment::Right => Some("text-align: right"),
  }
}

fn pre_render<'a>(
  node: &'a AstNode<'a>,
  block: bool,
  options: &Options<'_>,
) -> Node {
  let mut html = String::new();
  if let Err(e) = comrak::format_html(node, options, &mut html) {
    warn!("Failed to render unsupported Markdown node: {e}");
  }

  if block {
    Node::new(NodeKind::HtmlBlock(html))
  } else {
    Node::new(NodeKind::HtmlInline(html))
  }
}
