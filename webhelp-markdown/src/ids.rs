//! Heading identifier generation.

use std::collections::{HashMap, HashSet};

use crate::utils;

/// Turns heading text into an identifier, stable within one document.
pub trait IdGenerator {
  fn generate(&mut self, raw_text: &str) -> String;
}

/// Default identifier policy.
///
/// Identifiers are slugs of the heading text. A slug that is empty or does not
/// start with a letter is prefixed with `section`, and repeated slugs get a
/// numeric suffix so that every heading of a document stays addressable.
/// A suffixed id never collides with the slug of another heading.
#[derive(Debug, Default, Clone)]
pub struct HeadingIds {
  /// Next suffix to try for each base slug.
  next_suffix: HashMap<String, usize>,
  issued:      HashSet<String>,
}

impl HeadingIds {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }
}

impl IdGenerator for HeadingIds {
  fn generate(&mut self, raw_text: &str) -> String {
    let slug = utils::slugify(raw_text);
    let base = match slug.chars().next() {
      Some(c) if c.is_alphabetic() => slug,
      Some(_) => format!("section-{slug}"),
      None => "section".to_string(),
    };

    let suffix = self.next_suffix.entry(base.clone()).or_insert(0);
    let id = loop {
      let candidate = if *suffix == 0 {
        base.clone()
      } else {
        format!("{base}-{suffix}")
      };
      *suffix += 1;
      if !self.issued.contains(&candidate) {
        break candidate;
      }
    };

    self.issued.insert(id.clone());
    id
  }
}
