//! CSS declaration parser
//!
//! Parses the `property: value` declarations of an inline style in explicit
//! stages: leading whitespace, property name, separator, value tokens, end.
//! Only the token shape of a value is checked, never its meaning.

use crate::{Declaration, DeclarationError};

/// Parse a single declaration segment (no `;`).
pub fn parse_declaration(segment: &str) -> Result<Declaration<'_>, DeclarationError> {
    if segment.is_empty() {
        return Err(DeclarationError::Empty);
    }

    let mut cursor = Cursor::new(segment);
    cursor.skip_whitespace();

    let property = cursor.property_name()?;
    cursor.separator(property)?;
    let value_start = cursor.pos;
    cursor.value_tokens(property)?;
    let value = segment[value_start..cursor.pos].trim_end();

    cursor.end()?;

    Ok(Declaration { property, value })
}

/// Parse a whole style string into declarations.
///
/// A single trailing `;` is permitted. Any other empty segment is an error.
/// The empty string yields no declarations.
pub fn parse_style(style: &str) -> Result<Vec<Declaration<'_>>, DeclarationError> {
    if style.is_empty() {
        return Ok(Vec::new());
    }

    let mut segments: Vec<&str> = style.split(';').collect();
    if segments.len() > 1 && segments.last() == Some(&"") {
        segments.pop();
    }

    segments.into_iter().map(parse_declaration).collect()
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.bump();
        }
        &self.input[start..self.pos]
    }

    fn skip_whitespace(&mut self) {
        self.eat_while(|c| c.is_ascii_whitespace());
    }

    fn unexpected(&self) -> DeclarationError {
        match self.peek() {
            Some(found) => DeclarationError::UnexpectedChar {
                found,
                offset: self.pos,
            },
            None => DeclarationError::UnexpectedEnd,
        }
    }

    fn property_name(&mut self) -> Result<&'a str, DeclarationError> {
        let name = self.eat_while(is_property_char);
        if name.is_empty() {
            return Err(DeclarationError::MissingProperty {
                found: self.peek(),
            });
        }
        Ok(name)
    }

    /// The colon must follow the name directly.
    fn separator(&mut self, property: &str) -> Result<(), DeclarationError> {
        if self.peek() != Some(':') {
            return Err(DeclarationError::MissingColon {
                property: property.to_string(),
            });
        }
        self.bump();
        self.skip_whitespace();
        Ok(())
    }

    fn value_tokens(&mut self, property: &str) -> Result<(), DeclarationError> {
        let mut count = 0usize;
        while let Some(c) = self.peek() {
            if c == '#' {
                self.hex_color()?;
            } else if is_word_char(c) {
                self.word()?;
            } else {
                break;
            }
            count += 1;
            self.skip_whitespace();
        }

        if count == 0 {
            return match self.peek() {
                None => Err(DeclarationError::MissingValue {
                    property: property.to_string(),
                }),
                Some(_) => Err(self.unexpected()),
            };
        }
        Ok(())
    }

    fn hex_color(&mut self) -> Result<(), DeclarationError> {
        let start = self.pos;
        self.bump();
        if self.eat_while(|c| c.is_ascii_hexdigit()).is_empty() {
            return Err(DeclarationError::InvalidHexColor { offset: start });
        }
        Ok(())
    }

    /// A word, optionally closed by `%` when it ends in a digit.
    fn word(&mut self) -> Result<(), DeclarationError> {
        let word = self.eat_while(is_word_char);
        if self.peek() == Some('%') {
            if !word.ends_with(|c: char| c.is_ascii_digit()) {
                return Err(DeclarationError::InvalidPercentage { offset: self.pos });
            }
            self.bump();
        }
        Ok(())
    }

    fn end(&self) -> Result<(), DeclarationError> {
        if self.pos < self.input.len() {
            return Err(self.unexpected());
        }
        Ok(())
    }
}

fn is_property_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_declaration() {
        let decl = parse_declaration("color: red").unwrap();
        assert_eq!(decl.property, "color");
        assert_eq!(decl.value, "red");
    }

    #[test]
    fn test_leading_and_trailing_whitespace() {
        let decl = parse_declaration("  margin:0 auto  ").unwrap();
        assert_eq!(decl.property, "margin");
        assert_eq!(decl.value, "0 auto");
    }

    #[test]
    fn test_multiple_value_tokens() {
        let decl = parse_declaration("border: 1px solid #c0ffee").unwrap();
        assert_eq!(decl.value, "1px solid #c0ffee");
    }

    #[test]
    fn test_percentage() {
        assert!(parse_declaration("width: 50%").is_ok());
        assert!(parse_declaration("width: 0.5%").is_ok());
        assert!(matches!(
            parse_declaration("width: 5a%"),
            Err(DeclarationError::InvalidPercentage { .. })
        ));
        assert!(parse_declaration("width: %").is_err());
    }

    #[test]
    fn test_hex_color() {
        assert!(parse_declaration("color: #FFF").is_ok());
        assert!(matches!(
            parse_declaration("color: #"),
            Err(DeclarationError::InvalidHexColor { .. })
        ));
        assert!(matches!(
            parse_declaration("color: #xyz"),
            Err(DeclarationError::InvalidHexColor { .. })
        ));
    }

    #[test]
    fn test_space_before_colon_rejected() {
        assert!(matches!(
            parse_declaration("color : red"),
            Err(DeclarationError::MissingColon { .. })
        ));
    }

    #[test]
    fn test_missing_value() {
        assert!(matches!(
            parse_declaration("color:"),
            Err(DeclarationError::MissingValue { .. })
        ));
        assert!(matches!(
            parse_declaration("color:   "),
            Err(DeclarationError::MissingValue { .. })
        ));
    }

    #[test]
    fn test_function_values_rejected() {
        let err = parse_declaration("background: url(//x/y.js)").unwrap_err();
        assert_eq!(
            err,
            DeclarationError::UnexpectedChar {
                found: '(',
                offset: 15
            }
        );
        assert!(parse_declaration("width: expression(alert(1))").is_err());
    }

    #[test]
    fn test_missing_property() {
        assert!(matches!(
            parse_declaration(": red"),
            Err(DeclarationError::MissingProperty { found: Some(':') })
        ));
        assert!(matches!(
            parse_declaration("   "),
            Err(DeclarationError::MissingProperty { found: None })
        ));
    }

    #[test]
    fn test_style_segments() {
        let decls = parse_style("color: red; font-weight: bold;").unwrap();
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[1].property, "font-weight");

        assert!(parse_style("").unwrap().is_empty());
        assert_eq!(parse_style("color: red;;"), Err(DeclarationError::Empty));
        assert_eq!(parse_style(";color: red"), Err(DeclarationError::Empty));
        assert_eq!(parse_style(";"), Err(DeclarationError::Empty));
    }
}
