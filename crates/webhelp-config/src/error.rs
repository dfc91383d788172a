use thiserror::Error;

/// Error type for webhelp-config operations
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Template error: {0}")]
  Template(#[from] crate::templates::TemplateError),
}
