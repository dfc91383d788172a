//! Site-specific conversions for headings, code, links and blockquotes.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use super::{
  RenderError,
  core::{
    DocumentRenderer,
    INDENT,
    RenderState,
    format_as_block_html,
    format_as_indented_block_html,
    format_as_span_html,
  },
  types::TocEntry,
};
use crate::{
  ast::{Attributes, Node, NodeKind},
  directive::parse_highlight_lines,
  links::{obfuscate, rewrite_link},
  syntax::HighlightMode,
  utils::never_matching_regex,
};

/// Language used when a code element names none.
const DEFAULT_LANGUAGE: &str = "text";

/// Extract the code language from a `class` attribute.
///
/// Anything from the first `{` on is a highlight directive and is ignored.
/// Returns `text` when no `language-` class is present.
pub(crate) fn extract_code_language(class: Option<&str>) -> String {
  static LANGUAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)language-([\w#+.-]+)").unwrap_or_else(|e| {
      log::error!("Failed to compile LANGUAGE_RE regex: {e}");
      never_matching_regex()
    })
  });

  let Some(class) = class else {
    return DEFAULT_LANGUAGE.to_string();
  };
  let class = class.split('{').next().unwrap_or(class);

  LANGUAGE_RE
    .captures(class)
    .and_then(|caps| caps.get(1))
    .map_or_else(
      || {
        debug!("No language in class '{class}', using {DEFAULT_LANGUAGE}");
        DEFAULT_LANGUAGE.to_string()
      },
      |m| m.as_str().to_string(),
    )
}

/// Normalize the bold label of an admonition (`Note:` becomes `note`).
fn admonition_type(label: &str) -> String {
  let label = label.trim().to_lowercase();
  label
    .strip_suffix(':')
    .map_or(label.as_str(), str::trim_end)
    .to_string()
}

/// Drop leading breaks and whitespace left behind by a removed label.
fn trim_leading_inline(mut children: Vec<Node>) -> Vec<Node> {
  while let Some(first) = children.first_mut() {
    match &mut first.kind {
      NodeKind::SoftBreak | NodeKind::LineBreak => {},
      NodeKind::Text(text) => {
        let trimmed = text.trim_start();
        if !trimmed.is_empty() {
          *text = trimmed.to_string();
          break;
        }
      },
      _ => break,
    }
    children.remove(0);
  }
  children
}

impl DocumentRenderer {
  pub(crate) fn convert_header(
    &self,
    node: &Node,
    level: u8,
    raw_text: &str,
    indent: usize,
    state: &mut RenderState<'_>,
  ) -> Result<String, RenderError> {
    let mut attributes = node.attributes.clone();
    let id = match node.attr("id") {
      Some(id) => Some(id.to_string()),
      None if self.config.auto_ids => {
        let id = state.ids.generate(raw_text);
        attributes.insert("id".to_string(), id.clone());
        Some(id)
      },
      None => None,
    };

    if let Some(id) = &id
      && self.config.in_toc(level, node.attr("class"))
    {
      state.toc.push(TocEntry {
        level,
        id: id.clone(),
        children: node.children.clone(),
      });
    }

    if level == 1 && state.title.is_none() {
      state.title = Some(raw_text.trim().to_string());
    }

    let output_level = self.config.output_header_level(level);
    let tag = format!("h{output_level}");
    let mut body = self.inner(node, indent, state)?;

    let Some(id) = id else {
      return Ok(format_as_block_html(&tag, &attributes, &body, indent));
    };

    if output_level <= self.config.max_anchored_header_level {
      let permalink = Node::new(NodeKind::Anchor)
        .with_attr("href", format!("#{id}"))
        .with_attr("class", "anchor-link");
      body.push_str(&format_as_span_html("a", &permalink.attributes, ""));
    }

    let anchor = Node::new(NodeKind::Anchor)
      .with_attr("name", id)
      .with_attr("class", "elem-anchor");
    let mut html = format_as_block_html("a", &anchor.attributes, "", indent);
    html.push_str(&format_as_block_html(&tag, &attributes, &body, indent));
    Ok(html)
  }

  pub(crate) fn convert_code_block(
    &self,
    node: &Node,
    code: &str,
  ) -> Result<String, RenderError> {
    let class = node.attr("class");
    let language = extract_code_language(class);
    let directive = class.and_then(|c| c.find('{').map(|start| &c[start..]));
    let lines = parse_highlight_lines(directive)?;

    let highlighted =
      self
        .syntax
        .highlight_code(code, &language, HighlightMode::Block, &lines)?;

    let mut code_attributes = Attributes::new();
    code_attributes.insert(
      "class".to_string(),
      format!("code-block__wrapper code-block _highlighted lang_{language}"),
    );

    // <pre> content is whitespace-sensitive, so it is never indented
    Ok(format_as_block_html(
      "pre",
      &Attributes::new(),
      &format_as_span_html("code", &code_attributes, &highlighted),
      0,
    ))
  }

  pub(crate) fn convert_code_span(
    &self,
    node: &Node,
    code: &str,
  ) -> Result<String, RenderError> {
    let language = extract_code_language(node.attr("class"));
    let highlighted = self.syntax.highlight_code(
      code,
      &language,
      HighlightMode::Span,
      &Default::default(),
    )?;

    let mut attributes = node.attributes.clone();
    attributes.insert(
      "class".to_string(),
      format!("code highlight language-{language}"),
    );
    Ok(format_as_span_html("code", &attributes, &highlighted))
  }

  pub(crate) fn convert_link(
    &self,
    node: &Node,
    indent: usize,
    state: &mut RenderState<'_>,
  ) -> Result<String, RenderError> {
    let mut label = self.inner(node, indent, state)?;

    let target = node.attr("href").unwrap_or_else(|| {
      debug!("Link without a target, treating it as empty");
      ""
    });
    let link = rewrite_link(target, &self.config.base_url);

    let mut attributes = node.attributes.clone();
    attributes.insert("href".to_string(), link.href);
    if link.external {
      attributes.insert("data-bypass".to_string(), "yes".to_string());
    }
    if link.mail_address.as_deref() == Some(label.as_str()) {
      label = obfuscate(&label);
    }

    Ok(format_as_span_html(
      "a",
      &attributes,
      &format!("<span>{label}</span>"),
    ))
  }

  pub(crate) fn convert_blockquote(
    &self,
    node: &Node,
    indent: usize,
    state: &mut RenderState<'_>,
  ) -> Result<String, RenderError> {
    let admonition = node
      .first_child()
      .filter(|child| child.kind == NodeKind::Paragraph)
      .filter(|paragraph| {
        paragraph
          .first_child()
          .is_some_and(|child| child.kind == NodeKind::Strong)
      });

    let Some(paragraph) = admonition else {
      let body = self.inner(node, indent, state)?;
      return Ok(format_as_indented_block_html(
        "aside",
        &node.attributes,
        &body,
        indent,
      ));
    };

    let label = paragraph
      .first_child()
      .map(Node::inner_text)
      .unwrap_or_default();
    let kind = admonition_type(&label);

    let mut attributes = node.attributes.clone();
    let class = match node.attr("class") {
      Some(existing) if !kind.is_empty() => format!("{kind} {existing}"),
      Some(existing) => existing.to_string(),
      None => kind,
    };
    if !class.is_empty() {
      attributes.insert("class".to_string(), class);
    }

    let mut children = node.children.clone();
    let rest = trim_leading_inline(paragraph.children[1..].to_vec());
    if rest.is_empty() {
      children.remove(0);
    } else {
      children[0] = paragraph.clone().with_children(rest);
    }

    let body = self.convert_children(&children, indent + INDENT, state)?;
    Ok(format_as_indented_block_html("aside", &attributes, &body, indent))
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]
  use super::*;
  use crate::{
    directive::HighlightLines,
    renderer::RenderConfig,
    syntax::{PlainHighlighter, SyntaxHighlighter, SyntaxResult},
  };

  /// Backend that reports what it was asked to do.
  struct EchoHighlighter;

  impl SyntaxHighlighter for EchoHighlighter {
    fn name(&self) -> &'static str {
      "Echo"
    }

    fn supported_languages(&self) -> Vec<String> {
      Vec::new()
    }

    fn supports_language(&self, _language: &str) -> bool {
      true
    }

    fn highlight(
      &self,
      code: &str,
      language: &str,
      mode: HighlightMode,
      lines: &HighlightLines,
    ) -> SyntaxResult<String> {
      Ok(format!("[{language}|{mode:?}|{lines}]{code}"))
    }
  }

  fn renderer_with(config: RenderConfig) -> DocumentRenderer {
    DocumentRenderer::new(config).with_highlighter(Box::new(PlainHighlighter))
  }

  fn renderer() -> DocumentRenderer {
    renderer_with(RenderConfig::default())
  }

  fn render(node: Node) -> String {
    renderer().render(&Node::document(vec![node])).unwrap().html
  }

  #[test]
  fn test_heading_gets_anchor_and_permalink() {
    let out = renderer()
      .render(&Node::document(vec![Node::header(3, vec![Node::text(
        "My Heading",
      )])]))
      .unwrap();
    assert_eq!(
      out.html,
      "<a name=\"my-heading\" class=\"elem-anchor\"></a>\n<h3 \
       id=\"my-heading\">My Heading<a href=\"#my-heading\" \
       class=\"anchor-link\"></a></h3>\n"
    );
    assert_eq!(out.toc.len(), 1);
    assert_eq!(out.toc[0].level, 3);
    assert_eq!(out.toc[0].id, "my-heading");
    assert_eq!(out.toc[0].text(), "My Heading");
  }

  #[test]
  fn test_deep_heading_has_no_permalink() {
    let html = render(Node::header(4, vec![Node::text("Details")]));
    assert!(html.contains("<h4 id=\"details\">Details</h4>"));
    assert!(html.contains("<a name=\"details\" class=\"elem-anchor\"></a>"));
    assert!(!html.contains("anchor-link"));
  }

  #[test]
  fn test_header_offset_moves_permalink_cutoff() {
    let renderer = renderer_with(RenderConfig {
      header_offset: 1,
      ..Default::default()
    });
    let out = renderer
      .render(&Node::document(vec![Node::header(3, vec![Node::text("Deep")])]))
      .unwrap();
    assert!(out.html.contains("<h4 id=\"deep\">Deep</h4>"));
    assert_eq!(out.toc[0].level, 3);
  }

  #[test]
  fn test_explicit_id_wins() {
    let html = render(
      Node::header(2, vec![Node::text("Install")]).with_attr("id", "setup"),
    );
    assert!(html.starts_with("<a name=\"setup\" class=\"elem-anchor\"></a>\n"));
    assert!(html.contains("<h2 id=\"setup\">"));
  }

  #[test]
  fn test_heading_without_id() {
    let renderer = renderer_with(RenderConfig {
      auto_ids: false,
      ..Default::default()
    });
    let out = renderer
      .render(&Node::document(vec![Node::header(2, vec![Node::text("Plain")])]))
      .unwrap();
    assert_eq!(out.html, "<h2>Plain</h2>\n");
    assert!(out.toc.is_empty());
  }

  #[test]
  fn test_no_toc_class_excluded() {
    let out = renderer()
      .render(&Node::document(vec![
        Node::header(2, vec![Node::text("Hidden")]).with_attr("class", "no_toc"),
        Node::header(2, vec![Node::text("Shown")]),
      ]))
      .unwrap();
    let ids: Vec<&str> = out.toc.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["shown"]);
  }

  #[test]
  fn test_duplicate_headings_get_distinct_ids() {
    let out = renderer()
      .render(&Node::document(vec![
        Node::header(2, vec![Node::text("Usage")]),
        Node::header(2, vec![Node::text("Usage")]),
      ]))
      .unwrap();
    let ids: Vec<&str> = out.toc.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["usage", "usage-1"]);
  }

  #[test]
  fn test_title_from_first_level_one_heading() {
    let out = renderer()
      .render(&Node::document(vec![
        Node::header(2, vec![Node::text("Intro")]),
        Node::header(1, vec![Node::text("Guide")]),
        Node::header(1, vec![Node::text("Other")]),
      ]))
      .unwrap();
    assert_eq!(out.title.as_deref(), Some("Guide"));
  }

  #[test]
  fn test_code_block_language_and_lines() {
    let renderer =
      DocumentRenderer::new(RenderConfig::default()).with_highlighter(Box::new(EchoHighlighter));
    let doc = Node::document(vec![
      Node::code_block("a\nb\nc\n").with_attr("class", "language-python{2-3}"),
    ]);
    let html = renderer.render(&doc).unwrap().html;
    assert_eq!(
      html,
      "<pre><code class=\"code-block__wrapper code-block _highlighted \
       lang_python\">[python|Block|2 3]a\nb\nc\n</code></pre>\n"
    );
  }

  #[test]
  fn test_code_block_defaults_to_text() {
    let html = render(Node::code_block("x < y"));
    assert_eq!(
      html,
      "<pre><code class=\"code-block__wrapper code-block _highlighted \
       lang_text\">x &lt; y</code></pre>\n"
    );
  }

  #[test]
  fn test_code_block_is_never_indented() {
    let html = render(Node::blockquote(vec![Node::code_block("x")]));
    assert!(html.contains("\n<pre><code"));
  }

  #[test]
  fn test_malformed_directive_fails() {
    let doc = Node::document(vec![
      Node::code_block("x").with_attr("class", "language-rust{a-b}"),
    ]);
    assert!(matches!(
      renderer().render(&doc),
      Err(RenderError::MalformedDirective(_))
    ));
  }

  #[test]
  fn test_code_span_classes() {
    let html = render(Node::paragraph(vec![Node::code_span("<T>")]));
    assert_eq!(
      html,
      "<p><code class=\"code highlight language-text\">&lt;T&gt;</code></p>\n"
    );

    let renderer =
      DocumentRenderer::new(RenderConfig::default()).with_highlighter(Box::new(EchoHighlighter));
    let doc = Node::document(vec![Node::paragraph(vec![
      Node::code_span("let").with_attr("class", "language-rust"),
    ])]);
    let html = renderer.render(&doc).unwrap().html;
    assert!(html.contains("language-rust\">[rust|Span|]let</code>"));
  }

  #[test]
  fn test_extract_code_language() {
    assert_eq!(extract_code_language(None), "text");
    assert_eq!(extract_code_language(Some("language-csharp{1-3}")), "csharp");
    assert_eq!(extract_code_language(Some("foo language-c++")), "c++");
    assert_eq!(extract_code_language(Some("nolanguage-x")), "text");
  }

  #[test]
  fn test_root_relative_markdown_link() {
    let renderer = renderer_with(RenderConfig {
      base_url: "/docs/".to_string(),
      ..Default::default()
    });
    let doc = Node::document(vec![Node::paragraph(vec![Node::link(
      "/guide/setup.md#step-2",
      vec![Node::text("Setup")],
    )])]);
    assert_eq!(
      renderer.render(&doc).unwrap().html,
      "<p><a href=\"/docs/guide/setup.html#step-2\"><span>Setup</span></a></p>\n"
    );
  }

  #[test]
  fn test_external_link_marked() {
    let html = render(Node::paragraph(vec![Node::link(
      "https://example.com/notes.md",
      vec![Node::text("Notes")],
    )]));
    assert!(html.contains(
      "<a href=\"https://example.com/notes.md\" data-bypass=\"yes\"><span>Notes</span></a>"
    ));
  }

  #[test]
  fn test_mail_link_obfuscated() {
    let html = render(Node::paragraph(vec![Node::link(
      "mailto:a@b.c",
      vec![Node::text("a@b.c")],
    )]));
    let expected_href = format!("{}:{}", obfuscate("mailto"), obfuscate("a@b.c"));
    assert!(html.contains(&format!("href=\"{expected_href}\"")));
    assert!(html.contains(&format!("<span>{}</span>", obfuscate("a@b.c"))));
    assert!(!html.contains("a@b.c"));
  }

  #[test]
  fn test_mail_link_keeps_other_label() {
    let html = render(Node::paragraph(vec![Node::link(
      "mailto:a@b.c",
      vec![Node::text("Write us")],
    )]));
    assert!(html.contains("<span>Write us</span>"));
  }

  #[test]
  fn test_link_without_target() {
    let doc = Node::new(NodeKind::Link).with_children(vec![Node::text("Nowhere")]);
    let html = render(Node::paragraph(vec![doc]));
    assert_eq!(html, "<p><a href=\"\"><span>Nowhere</span></a></p>\n");
  }

  #[test]
  fn test_note_admonition() {
    let quote = Node::blockquote(vec![Node::paragraph(vec![
      Node::strong(vec![Node::text("Note:")]),
      Node::text(" Back up first."),
    ])]);
    assert_eq!(
      render(quote),
      "<aside class=\"note\">\n  <p>Back up first.</p>\n</aside>\n"
    );
  }

  #[test]
  fn test_admonition_merges_existing_class() {
    let quote = Node::blockquote(vec![Node::paragraph(vec![
      Node::strong(vec![Node::text("Warning")]),
      Node::text(" Careful."),
    ])])
    .with_attr("class", "wide");
    assert!(render(quote).starts_with("<aside class=\"warning wide\">\n"));
  }

  #[test]
  fn test_admonition_label_only_paragraph_dropped() {
    let quote = Node::blockquote(vec![
      Node::paragraph(vec![Node::strong(vec![Node::text("Tip")])]),
      Node::paragraph(vec![Node::text("Use the cache.")]),
    ]);
    assert_eq!(
      render(quote),
      "<aside class=\"tip\">\n  <p>Use the cache.</p>\n</aside>\n"
    );
  }

  #[test]
  fn test_plain_blockquote() {
    let quote = Node::blockquote(vec![Node::paragraph(vec![Node::text("Quoted")])]);
    assert_eq!(render(quote), "<aside>\n  <p>Quoted</p>\n</aside>\n");
  }
}
