//! Whitewash CSS
//!
//! Validation of inline style declarations against a set of allowed
//! property names.

mod parser;

use std::collections::HashSet;

pub use parser::{parse_declaration, parse_style};

/// CSS declaration (property: value)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Declaration<'a> {
    pub property: &'a str,
    pub value: &'a str,
}

/// Declaration parsing error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeclarationError {
    #[error("empty declaration")]
    Empty,

    #[error("expected property name, found {found:?}")]
    MissingProperty { found: Option<char> },

    #[error("expected ':' after property {property}")]
    MissingColon { property: String },

    #[error("property {property} has no value")]
    MissingValue { property: String },

    #[error("'#' without hex digits at offset {offset}")]
    InvalidHexColor { offset: usize },

    #[error("'%' not preceded by a digit at offset {offset}")]
    InvalidPercentage { offset: usize },

    #[error("unexpected {found:?} at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },

    #[error("unexpected end of declaration")]
    UnexpectedEnd,

    #[error("property {0} is not allowed")]
    PropertyNotAllowed(String),
}

/// Check a style string against the allowed property names.
///
/// `None` means no restriction is configured and every style is accepted.
pub fn is_valid_style(allowed: Option<&HashSet<String>>, style: &str) -> bool {
    let Some(allowed) = allowed else {
        return true;
    };

    match check_style(allowed, style) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("rejected style: {e}");
            false
        }
    }
}

/// Like [`is_valid_style`], reporting the first offending declaration.
pub fn check_style(allowed: &HashSet<String>, style: &str) -> Result<(), DeclarationError> {
    for decl in parse_style(style)? {
        if !allowed.contains(decl.property) {
            return Err(DeclarationError::PropertyNotAllowed(
                decl.property.to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unrestricted() {
        assert!(is_valid_style(None, "background: url(javascript:alert(1))"));
        assert!(is_valid_style(None, ";;;"));
    }

    #[test]
    fn test_allowed_properties() {
        let allowed = props(&["color", "text-align"]);
        assert!(is_valid_style(Some(&allowed), "color: red"));
        assert!(is_valid_style(Some(&allowed), "color: red; text-align: center;"));
        assert!(!is_valid_style(Some(&allowed), "color: red; background: blue"));
    }

    #[test]
    fn test_property_names_are_case_sensitive() {
        let allowed = props(&["color"]);
        assert_eq!(
            check_style(&allowed, "COLOR: red"),
            Err(DeclarationError::PropertyNotAllowed("COLOR".into()))
        );
    }

    #[test]
    fn test_empty_style_is_valid() {
        let allowed = props(&[]);
        assert!(is_valid_style(Some(&allowed), ""));
        assert!(!is_valid_style(Some(&allowed), " "));
    }
}
