//! Hyperlink classification and rewriting.

use std::path::Path;

/// Schemes that mark a link target as leaving the site.
const EXTERNAL_PREFIXES: [&str; 4] = ["http://", "https://", "ftp://", "//"];

const MAILTO: &str = "mailto";

/// Result of rewriting a link target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenLink {
  /// Final value for the `href` attribute.
  pub href:         String,
  /// Whether the target points outside the site.
  pub external:     bool,
  /// The raw address of a `mailto:` target. Its presence means `href` is
  /// obfuscated.
  pub mail_address: Option<String>,
}

/// Whether a link target points outside the site.
#[must_use]
pub fn is_external(target: &str) -> bool {
  EXTERNAL_PREFIXES
    .iter()
    .any(|prefix| target.starts_with(prefix))
}

/// Encode every character as a decimal character reference.
///
/// The result renders identically in a browser while the literal text never
/// appears in the page source.
#[must_use]
pub fn obfuscate(text: &str) -> String {
  text
    .chars()
    .map(|c| format!("&#{:03};", u32::from(c)))
    .collect()
}

/// Compute the final `href` for a link target.
///
/// - `mailto:` targets are obfuscated and returned as-is otherwise.
/// - Root-relative targets (`/x/y`) are resolved against `base_url`.
/// - Internal targets whose path ends in `.md` point at the `.html` page
///   instead. Query and fragment are kept.
#[must_use]
pub fn rewrite_link(target: &str, base_url: &str) -> RewrittenLink {
  let external = is_external(target);

  if let Some(address) = target.strip_prefix("mailto:") {
    return RewrittenLink {
      href: format!("{}:{}", obfuscate(MAILTO), obfuscate(address)),
      external,
      mail_address: Some(address.to_string()),
    };
  }

  let mut href = match target.strip_prefix('/') {
    Some(rest) if !target.starts_with("//") => format!("{base_url}{rest}"),
    _ => target.to_string(),
  };

  if !external {
    href = remap_markdown_extension(&href);
  }

  RewrittenLink {
    href,
    external,
    mail_address: None,
  }
}

/// Replace a trailing `.md` in the path component with `.html`.
fn remap_markdown_extension(href: &str) -> String {
  let split = href.find(['?', '#']).unwrap_or(href.len());
  let (path, suffix) = href.split_at(split);

  match path.strip_suffix(".md") {
    Some(stem) if has_md_extension(path) => format!("{stem}.html{suffix}"),
    _ => href.to_string(),
  }
}

fn has_md_extension(path: &str) -> bool {
  // `Path` does not treat dotfiles such as `.md` as having an extension
  !path.ends_with('/')
    && Path::new(path).extension().is_some_and(|ext| ext == "md")
}

/// Strip the extension of the last path segment, if any.
///
/// `intro/setup.md` becomes `intro/setup`, `README` is returned unchanged.
#[must_use]
pub fn strip_extension(target: &str) -> &str {
  if target.ends_with('/') {
    return target;
  }
  Path::new(target)
    .extension()
    .and_then(|ext| ext.to_str())
    .map_or(target, |ext| &target[..target.len() - ext.len() - 1])
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_external_detection() {
    assert!(is_external("http://example.com"));
    assert!(is_external("https://example.com/a.md"));
    assert!(is_external("ftp://files.example.com"));
    assert!(is_external("//cdn.example.com/x.js"));
    assert!(!is_external("/intro.md"));
    assert!(!is_external("intro.md"));
    assert!(!is_external("mailto:me@example.com"));
  }

  #[test]
  fn test_root_relative_uses_base_url() {
    let link = rewrite_link("/guide/start", "/docs/");
    assert_eq!(link.href, "/docs/guide/start");
    assert!(!link.external);
  }

  #[test]
  fn test_protocol_relative_is_not_rebased() {
    let link = rewrite_link("//cdn.example.com/a.md", "/docs/");
    assert_eq!(link.href, "//cdn.example.com/a.md");
    assert!(link.external);
  }

  #[test]
  fn test_markdown_extension_remapped() {
    assert_eq!(rewrite_link("/intro.md", "/").href, "/intro.html");
    assert_eq!(rewrite_link("setup.md", "/").href, "setup.html");
    assert_eq!(
      rewrite_link("setup.md?tab=2#install", "/").href,
      "setup.html?tab=2#install"
    );
    assert_eq!(rewrite_link("#section.md", "/").href, "#section.md");
    assert_eq!(rewrite_link("notes.mdx", "/").href, "notes.mdx");
  }

  #[test]
  fn test_external_markdown_kept() {
    let link = rewrite_link("https://example.com/README.md", "/");
    assert_eq!(link.href, "https://example.com/README.md");
    assert!(link.external);
  }

  #[test]
  fn test_mailto_obfuscated() {
    let link = rewrite_link("mailto:a@b.c", "/");
    assert_eq!(link.mail_address.as_deref(), Some("a@b.c"));
    assert_eq!(
      link.href,
      "&#109;&#097;&#105;&#108;&#116;&#111;:&#097;&#064;&#098;&#046;&#099;"
    );
    assert!(!link.href.contains("a@b.c"));
  }

  #[test]
  fn test_obfuscate_non_ascii() {
    assert_eq!(obfuscate("é"), "&#233;");
    assert_eq!(obfuscate(""), "");
  }

  #[test]
  fn test_strip_extension() {
    assert_eq!(strip_extension("/intro/setup.md"), "/intro/setup");
    assert_eq!(strip_extension("intro"), "intro");
    assert_eq!(strip_extension("a.b/c"), "a.b/c");
    assert_eq!(strip_extension("dir/"), "dir/");
  }
}
