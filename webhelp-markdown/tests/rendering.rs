#![allow(
  clippy::expect_used,
  clippy::unwrap_used,
  clippy::panic,
  reason = "Fine in tests"
)]
use webhelp_markdown::{
  DocumentRenderer,
  HighlightOptions,
  RenderConfig,
  RenderError,
  links::obfuscate,
  syntax::PlainHighlighter,
};

/// Check if HTML output contains all expected fragments.
fn assert_html_contains(html: &str, expected: &[&str]) {
  for &needle in expected {
    assert!(
      html.contains(needle),
      "Expected HTML to contain '{needle}', but it did not.\nFull \
       HTML:\n{html}"
    );
  }
}

fn plain_renderer(config: RenderConfig) -> DocumentRenderer {
  DocumentRenderer::new(config).with_highlighter(Box::new(PlainHighlighter))
}

fn render(md: &str) -> String {
  plain_renderer(RenderConfig::default())
    .render_markdown(md)
    .expect("document renders")
    .html
}

#[test]
fn test_anchored_heading() {
  assert_eq!(
    render("### My Heading\n"),
    "<a name=\"my-heading\" class=\"elem-anchor\"></a>\n<h3 \
     id=\"my-heading\">My Heading<a href=\"#my-heading\" \
     class=\"anchor-link\"></a></h3>\n"
  );
}

#[test]
fn test_explicit_heading_id() {
  let html = render("## Install the tool {#install}\n");
  assert_html_contains(&html, &[
    "<a name=\"install\" class=\"elem-anchor\"></a>",
    "<h2 id=\"install\">Install the tool<a href=\"#install\" \
     class=\"anchor-link\"></a></h2>",
  ]);
  assert!(!html.contains("{#"));
}

#[test]
fn test_page_toc_and_title() {
  let out = plain_renderer(RenderConfig {
    toc_levels: vec![2, 3],
    ..Default::default()
  })
  .render_markdown("# Guide\n\n## Install\n\n### Linux\n\n#### Debian\n")
  .unwrap();

  assert_eq!(out.title.as_deref(), Some("Guide"));
  let toc: Vec<(u8, &str, String)> = out
    .toc
    .iter()
    .map(|entry| (entry.level, entry.id.as_str(), entry.text()))
    .collect();
  assert_eq!(toc, vec![
    (2, "install", "Install".to_string()),
    (3, "linux", "Linux".to_string()),
  ]);
}

#[test]
fn test_toc_is_per_document() {
  let renderer = plain_renderer(RenderConfig::default());
  let first = renderer.render_markdown("## One\n").unwrap();
  let second = renderer.render_markdown("## One\n").unwrap();
  assert_eq!(first.toc, second.toc);
  assert_eq!(second.toc[0].id, "one");
}

#[test]
fn test_code_block_with_marked_lines() {
  let html = render("```python{2-3}\na = 1\nb = 2\nc = 3\n```\n");
  assert_eq!(
    html,
    "<pre><code class=\"code-block__wrapper code-block _highlighted \
     lang_python\">a = 1\n<span class=\"hll\">b = 2\n</span><span \
     class=\"hll\">c = 3\n</span></code></pre>\n"
  );
}

#[test]
fn test_code_block_without_language() {
  let html = render("```\n<tag>\n```\n");
  assert_eq!(
    html,
    "<pre><code class=\"code-block__wrapper code-block _highlighted \
     lang_text\">&lt;tag&gt;\n</code></pre>\n"
  );
}

#[test]
fn test_malformed_directive_aborts_document() {
  let result = plain_renderer(RenderConfig::default())
    .render_markdown("```rust{1-x}\nfn main() {}\n```\n");
  match result {
    Err(RenderError::MalformedDirective(err)) => {
      assert_eq!(err.directive, "{1-x}");
    },
    other => panic!("expected a malformed directive, got {other:?}"),
  }
}

#[test]
fn test_inline_code() {
  let html = render("Run `make <target>` first.\n");
  assert_eq!(
    html,
    "<p>Run <code class=\"code highlight language-text\">make \
     &lt;target&gt;</code> first.</p>\n"
  );
}

#[test]
fn test_links() {
  let html = plain_renderer(RenderConfig {
    base_url: "/docs/".to_string(),
    ..Default::default()
  })
  .render_markdown(
    "See [setup](/guide/setup.md?os=linux#step), [faq](faq.md) and \
     [upstream](https://example.com/README.md).\n",
  )
  .unwrap()
  .html;

  assert_html_contains(&html, &[
    "<a href=\"/docs/guide/setup.html?os=linux#step\"><span>setup</span></a>",
    "<a href=\"faq.html\"><span>faq</span></a>",
    "<a href=\"https://example.com/README.md\" \
     data-bypass=\"yes\"><span>upstream</span></a>",
  ]);
}

#[test]
fn test_mail_autolink_is_obfuscated() {
  let html = render("Contact <help@example.com>.\n");
  assert_html_contains(&html, &[
    &format!(
      "href=\"{}:{}\"",
      obfuscate("mailto"),
      obfuscate("help@example.com")
    ),
    &format!("<span>{}</span>", obfuscate("help@example.com")),
  ]);
  assert!(!html.contains("help@example.com"));
}

#[test]
fn test_admonition() {
  assert_eq!(
    render("> **Note:** Back up your data first.\n"),
    "<aside class=\"note\">\n  <p>Back up your data first.</p>\n</aside>\n"
  );
  assert_eq!(
    render("> Just a quote.\n"),
    "<aside>\n  <p>Just a quote.</p>\n</aside>\n"
  );
}

#[test]
fn test_nested_list_layout() {
  assert_eq!(
    render("- Intro\n  - Setup\n- Usage\n"),
    "<ul>\n  <li>Intro\n    <ul>\n      <li>Setup</li>\n    </ul>\n  \
     </li>\n  <li>Usage</li>\n</ul>\n"
  );
}

#[test]
fn test_table_layout() {
  let html = render("| a | b |\n|---|--:|\n| 1 | 2 |\n");
  assert_eq!(
    html,
    "<table>\n  <thead>\n    <tr>\n      <th>a</th>\n      <th \
     style=\"text-align: right\">b</th>\n    </tr>\n  </thead>\n  <tbody>\n    \
     <tr>\n      <td>1</td>\n      <td style=\"text-align: \
     right\">2</td>\n    </tr>\n  </tbody>\n</table>\n"
  );
}

#[test]
fn test_links_outside_paragraphs_are_rewritten() {
  let html = plain_renderer(RenderConfig {
    base_url: "/docs/".to_string(),
    ..Default::default()
  })
  .render_markdown(
    "| a |\n|---|\n| [S](/setup.md) `x` |\n\n- [ ] see [S](/setup.md)\n\nText[^n].\n\n[^n]: \
     Also [S](/setup.md).\n",
  )
  .unwrap()
  .html;

  assert_html_contains(&html, &[
    "<td><a href=\"/docs/setup.html\"><span>S</span></a> <code class=\"code \
     highlight language-text\">x</code></td>",
    "<li class=\"task-list-item\"><input type=\"checkbox\" disabled=\"\" /> see \
     <a href=\"/docs/setup.html\"><span>S</span></a></li>",
    "<section class=\"footnotes\">",
    "<li id=\"fn-n\">",
    "<p>Also <a href=\"/docs/setup.html\"><span>S</span></a>.</p>",
  ]);
  assert!(!html.contains("setup.md"));
}

#[test]
fn test_heading_ids_stay_unique() {
  let out = plain_renderer(RenderConfig::default())
    .render_markdown("## Setup\n\n## Setup\n\n## Setup 1\n")
    .unwrap();

  let ids: Vec<&str> = out.toc.iter().map(|entry| entry.id.as_str()).collect();
  assert_eq!(ids, ["setup", "setup-1", "setup-1-1"]);
  assert_eq!(out.html.matches("id=\"setup-1\"").count(), 1);
  assert_eq!(out.html.matches("name=\"setup-1\"").count(), 1);
}

#[test]
fn test_highlighting_disabled_escapes_only() {
  let renderer = DocumentRenderer::new(RenderConfig {
    highlight: HighlightOptions {
      enable: false,
      theme:  None,
    },
    ..Default::default()
  });
  let html = renderer
    .render_markdown("```rust\nlet x = 1 < 2;\n```\n")
    .unwrap()
    .html;
  assert_html_contains(&html, &["lang_rust\">let x = 1 &lt; 2;\n</code>"]);
}

#[test]
fn test_unknown_theme_still_renders() {
  let renderer = DocumentRenderer::new(RenderConfig {
    highlight: HighlightOptions {
      enable: true,
      theme:  Some("NoSuchTheme".to_string()),
    },
    ..Default::default()
  });
  let html = renderer
    .render_markdown("```rust\nfn main() {}\n```\n")
    .unwrap()
    .html;
  assert_html_contains(&html, &["<pre><code", "main"]);
}

#[cfg(feature = "syntect")]
#[test]
fn test_syntect_colours_code() {
  let renderer = DocumentRenderer::new(RenderConfig::default());
  let html = renderer
    .render_markdown("```rust{2}\nfn main() {\n    let x = 1;\n}\n```\n")
    .unwrap()
    .html;
  assert_html_contains(&html, &[
    "lang_rust",
    "<span style=",
    "<span class=\"hll\">",
  ]);
}
