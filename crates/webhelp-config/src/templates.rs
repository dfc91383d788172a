/// Error type for template operations.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
  /// The requested configuration format is not supported.
  #[error("Unsupported config format: {0}")]
  UnsupportedFormat(String),
}

/// Default configuration template in TOML, commented so that a fresh
/// configuration explains itself.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# webhelp configuration file

# Directory containing the Markdown sources
source_dir = "."

# Directory that receives generated files
output_dir = "_site"

# Prefix for root-relative links: "/guide/setup.md" becomes "{base_url}guide/setup.html"
base_url = "/"

# Summary document describing the page tree, relative to source_dir
toc_input = "_SUMMARY.md"

# Navigation manifest written by `webhelp toc`, relative to output_dir
toc_output = "HelpTOC.json"

[markdown]
# Generate ids for headings that have no explicit {#id}
auto_ids = true

# Added to every heading level before choosing the <hN> tag
header_offset = 0

# Heading levels recorded in each page's table of contents
toc_levels = [1, 2, 3, 4, 5, 6]

[markdown.highlight]
# Colour code blocks and spans. When disabled, code is only escaped
enable = true

# Highlighting theme, e.g. "InspiredGitHub", "Nord" or "Dracula"
# theme = "InspiredGitHub"
"#;

/// Default configuration template in JSON format.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "source_dir": ".",
  "output_dir": "_site",
  "base_url": "/",
  "toc_input": "_SUMMARY.md",
  "toc_output": "HelpTOC.json",
  "markdown": {
    "auto_ids": true,
    "header_offset": 0,
    "toc_levels": [1, 2, 3, 4, 5, 6],
    "highlight": {
      "enable": true
    }
  }
}
"#;

/// Get the correct configuration template based on the requested format.
///
/// # Errors
///
/// Returns an error if the requested format is not supported.
pub fn get_template(format: &str) -> Result<&'static str, TemplateError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    _ => Err(TemplateError::UnsupportedFormat(format.to_string())),
  }
}
