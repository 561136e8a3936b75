//! Error types

use std::io;
use std::path::PathBuf;

use whitewash_html::ParseError;

/// Whitelist configuration error
///
/// Raised while locating or loading a whitelist, before any document is
/// looked at.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("can't find {file} in any of [{}]", join_dirs(.searched))]
    NotFound { file: String, searched: Vec<PathBuf> },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("whitelist parse error: {0}")]
    Parse(String),

    #[error("invalid pattern for {tag}/{attribute}: {source}")]
    InvalidPattern {
        tag: String,
        attribute: String,
        #[source]
        source: regex::Error,
    },
}

/// Sanitization error
///
/// Filtering content is never an error; only input whose structure cannot
/// be determined is.
#[derive(Debug, thiserror::Error)]
pub enum SanitizeError {
    #[error("invalid HTML detected: {0}")]
    InvalidInput(String),
}

impl From<ParseError> for SanitizeError {
    fn from(error: ParseError) -> Self {
        // Only the first line: the rest is parser internals.
        let message = error.to_string();
        let first = message.lines().next().unwrap_or_default().trim_end();
        SanitizeError::InvalidInput(first.to_string())
    }
}

fn join_dirs(dirs: &[PathBuf]) -> String {
    dirs.iter()
        .map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
