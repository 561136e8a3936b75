//! Whitewash HTML
//!
//! Markup normalization and serialization.
//!
//! A [`Normalizer`] repairs tag soup into a well-formed [`Document`]; the
//! serializer renders a sanitized tree back to text. Two normalizer backends
//! exist: html5ever in-process (the default) and an external HTML Tidy
//! binary. Which one is used is always an explicit choice.

mod parser;
mod serializer;
mod tidy;

use std::path::PathBuf;

pub use parser::Html5everNormalizer;
pub use serializer::{serialize_element, serialize_fragment, VOID_ELEMENTS};
pub use tidy::TidyNormalizer;
pub use whitewash_dom::{Attributes, Document, Element, Node};

/// Repairs raw markup into a well-formed document tree.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, html: &str) -> Result<Document, ParseError>;
}

/// Normalizer selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NormalizerBackend {
    /// In-process html5ever parser
    #[default]
    Html5ever,
    /// External HTML Tidy binary
    Tidy { binary: PathBuf },
}

impl NormalizerBackend {
    /// Instantiate the selected backend
    pub fn build(&self) -> Box<dyn Normalizer> {
        match self {
            NormalizerBackend::Html5ever => Box::new(Html5everNormalizer::new()),
            NormalizerBackend::Tidy { binary } => Box::new(TidyNormalizer::new(binary.clone())),
        }
    }
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read markup: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to run {binary}: {source}")]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Rejected(String),

    #[error("normalizer produced no output")]
    Empty,
}

/// Parse an HTML string with the default backend
pub fn parse(html: &str) -> Result<Document, ParseError> {
    Html5everNormalizer::new().normalize(html)
}
