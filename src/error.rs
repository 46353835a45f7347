//! Error types for the mathdown library.
//!
//! Compilation itself is total and has no error channel. These types cover
//! configuration loading and the math renderer backends, whose failures the
//! typesetter records and swallows.

use thiserror::Error;

/// Result type alias for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid delimiter: {0}")]
    Delimiter(String),
}

/// Errors raised by a math renderer for a single span.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    #[error("Math rendering error: {0}")]
    Math(String),
}
