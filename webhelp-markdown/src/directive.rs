//! Highlight-line directives attached to code block languages.
//!
//! A fenced block written as ` ```python{2-3,7} ` carries the directive
//! `{2-3,7}`, which selects lines 2, 3 and 7 for highlighting.

use std::fmt;

/// A highlight directive that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Malformed highlight directive '{directive}': {reason}")]
pub struct MalformedDirective {
  pub directive: String,
  pub reason:    String,
}

/// Ordered line numbers selected by a directive.
///
/// Ranges expand in ascending order, tokens keep their authored order and
/// duplicates across tokens are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightLines(Vec<u32>);

impl HighlightLines {
  #[must_use]
  pub const fn new(lines: Vec<u32>) -> Self {
    Self(lines)
  }

  #[must_use]
  pub fn as_slice(&self) -> &[u32] {
    &self.0
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Whether the 1-based line number is selected.
  #[must_use]
  pub fn contains(&self, line: u32) -> bool {
    self.0.contains(&line)
  }
}

/// Whitespace-joined decimal list, the form highlighters expect.
impl fmt::Display for HighlightLines {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, line) in self.0.iter().enumerate() {
      if i > 0 {
        f.write_str(" ")?;
      }
      write!(f, "{line}")?;
    }
    Ok(())
  }
}

/// Parse a directive such as `{1-3,5}` into the lines it selects.
///
/// The surrounding braces are optional. An absent or empty directive selects
/// nothing.
///
/// # Errors
///
/// Returns [`MalformedDirective`] for empty tokens (`{1,,2}`), non-numeric
/// tokens, line number zero and descending ranges (`{5-2}`).
pub fn parse_highlight_lines(
  directive: Option<&str>,
) -> Result<HighlightLines, MalformedDirective> {
  let Some(raw) = directive else {
    return Ok(HighlightLines::default());
  };

  let body = raw.trim();
  let body = body.strip_prefix('{').unwrap_or(body);
  let body = body.strip_suffix('}').unwrap_or(body).trim();
  if body.is_empty() {
    return Ok(HighlightLines::default());
  }

  let malformed = |reason: String| {
    MalformedDirective {
      directive: raw.to_string(),
      reason,
    }
  };

  let mut lines = Vec::new();
  for token in body.split(',').map(str::trim) {
    if token.is_empty() {
      return Err(malformed("empty token".to_string()));
    }

    if let Some((start, end)) = token.split_once('-') {
      let start = parse_line_number(start.trim())
        .ok_or_else(|| malformed(format!("invalid range start in '{token}'")))?;
      let end = parse_line_number(end.trim())
        .ok_or_else(|| malformed(format!("invalid range end in '{token}'")))?;
      if start > end {
        return Err(malformed(format!("descending range '{token}'")));
      }
      lines.extend(start..=end);
    } else {
      let line = parse_line_number(token)
        .ok_or_else(|| malformed(format!("invalid line number '{token}'")))?;
      lines.push(line);
    }
  }

  Ok(HighlightLines(lines))
}

fn parse_line_number(token: &str) -> Option<u32> {
  if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  token.parse().ok().filter(|&n| n > 0)
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]
  use super::*;

  #[test]
  fn test_single_and_range_tokens() {
    let lines = parse_highlight_lines(Some("{1-3,5}")).unwrap();
    assert_eq!(lines.as_slice(), &[1, 2, 3, 5]);
    assert_eq!(lines.to_string(), "1 2 3 5");
  }

  #[test]
  fn test_duplicates_are_kept_in_token_order() {
    let lines = parse_highlight_lines(Some("{4,2-4}")).unwrap();
    assert_eq!(lines.as_slice(), &[4, 2, 3, 4]);
  }

  #[test]
  fn test_absent_and_empty() {
    assert!(parse_highlight_lines(None).unwrap().is_empty());
    assert!(parse_highlight_lines(Some("{}")).unwrap().is_empty());
    assert!(parse_highlight_lines(Some("")).unwrap().is_empty());
  }

  #[test]
  fn test_braces_optional() {
    let lines = parse_highlight_lines(Some("7, 9-10")).unwrap();
    assert_eq!(lines.as_slice(), &[7, 9, 10]);
  }

  #[test]
  fn test_malformed_tokens() {
    for bad in ["{a}", "{1,,2}", "{5-2}", "{1-}", "{-3}", "{0}", "{+1}"] {
      let err = parse_highlight_lines(Some(bad)).unwrap_err();
      assert_eq!(err.directive, bad);
    }
  }
}
