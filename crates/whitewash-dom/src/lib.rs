//! Whitewash DOM
//!
//! Owned element tree handed from the normalizer to the sanitizer.
//!
//! The tree is deliberately small: elements and text only. Comments,
//! doctypes and processing instructions never reach it.

mod attributes;
mod document;
mod node;

pub use attributes::{Attr, Attributes};
pub use document::Document;
pub use node::{Element, Node};
