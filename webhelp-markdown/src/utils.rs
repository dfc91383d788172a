use std::sync::LazyLock;

use regex::Regex;

/// Slugify a string for use as an anchor ID.
///
/// Converts to lowercase and keeps alphanumerics and `_`. Every run of other
/// characters, `-` included, becomes a single dash between words, so no
/// leading, trailing or doubled dashes remain (`a--b` becomes `a-b`).
#[must_use]
pub fn slugify(text: &str) -> String {
  let mut slug = String::with_capacity(text.len());
  let mut pending_dash = false;
  for c in text.to_lowercase().chars() {
    if c.is_alphanumeric() || c == '_' {
      if pending_dash && !slug.is_empty() {
        slug.push('-');
      }
      pending_dash = false;
      slug.push(c);
    } else {
      pending_dash = true;
    }
  }
  slug
}

/// Escape a value for use inside a double-quoted HTML attribute.
///
/// Character references that are already present (`&#109;`, `&amp;`) are kept
/// so that obfuscated values survive unchanged.
#[must_use]
pub fn escape_attribute(value: &str) -> String {
  static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^&#?[A-Za-z0-9]+;").unwrap_or_else(|e| {
      log::error!("Failed to compile REFERENCE_RE regex: {e}");
      never_matching_regex()
    })
  });

  let mut out = String::with_capacity(value.len());
  for (i, c) in value.char_indices() {
    match c {
      '&' if REFERENCE_RE.is_match(&value[i..]) => out.push('&'),
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      _ => out.push(c),
    }
  }
  out
}

/// Create a regex that never matches anything.
///
/// Used as a fallback pattern when a regex fails to compile.
///
/// # Panics
///
/// Panics if the fallback pattern fails to compile, which should never
/// happen.
#[must_use]
#[allow(clippy::expect_used, reason = "This pattern is guaranteed to be valid")]
pub fn never_matching_regex() -> Regex {
  Regex::new(r"[^\s\S]").expect("regex pattern [^\\s\\S] should always compile")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_slugify() {
    assert_eq!(slugify("My Heading"), "my-heading");
    assert_eq!(slugify("  Install -- Nix!  "), "install-nix");
    assert_eq!(slugify("snake_case_name"), "snake_case_name");
    assert_eq!(slugify("Ünïcode Tëxt"), "ünïcode-tëxt");
    assert_eq!(slugify("???"), "");
    assert_eq!(slugify("a--b_-c"), "a-b_-c");
  }

  #[test]
  fn test_escape_attribute_keeps_references() {
    assert_eq!(escape_attribute("&#109;&#097;"), "&#109;&#097;");
    assert_eq!(escape_attribute("a&b"), "a&amp;b");
    assert_eq!(escape_attribute("say \"hi\" <b>"), "say &quot;hi&quot; &lt;b&gt;");
    assert_eq!(escape_attribute("Q&amp;A"), "Q&amp;A");
  }
}
