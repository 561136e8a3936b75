//! HTML Tidy normalizer
//!
//! Pipes markup through an external `tidy` binary configured for XHTML
//! output, then parses the repaired markup with html5ever. Anything tidy
//! writes to stderr is treated as a rejection of the input.

use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use whitewash_dom::Document;

use crate::{Html5everNormalizer, Normalizer, ParseError};

const TIDY_ARGS: &[&str] = &[
    "--quiet", "yes",
    "--show-warnings", "no",
    "--show-errors", "1",
    "--output-xhtml", "yes",
    "--literal-attributes", "yes",
    "--preserve-entities", "yes",
    "--tidy-mark", "no",
    "--wrap", "0",
    "--char-encoding", "utf8",
];

/// Normalizer backed by an HTML Tidy binary
#[derive(Debug, Clone)]
pub struct TidyNormalizer {
    binary: PathBuf,
}

impl TidyNormalizer {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Run tidy over `html` and return its XHTML output
    pub fn tidy(&self, html: &str) -> Result<String, ParseError> {
        let mut child = Command::new(&self.binary)
            .args(TIDY_ARGS)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ParseError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        // Feed stdin from a separate thread so a large document cannot
        // deadlock against a full stdout pipe.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = html.to_owned();
            thread::spawn(move || stdin.write_all(input.as_bytes()))
        });

        let output = child.wait_with_output()?;

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) if e.kind() == ErrorKind::BrokenPipe => {}
                Ok(Err(e)) => return Err(ParseError::Io(e)),
                Err(_) => {
                    return Err(ParseError::Io(std::io::Error::other(
                        "tidy stdin writer panicked",
                    )));
                }
            }
        }

        let errors = String::from_utf8_lossy(&output.stderr);
        if !errors.trim().is_empty() {
            tracing::debug!(binary = %self.binary.display(), "tidy rejected input");
            return Err(ParseError::Rejected(errors.into_owned()));
        }

        let xhtml = String::from_utf8_lossy(&output.stdout).into_owned();
        if xhtml.is_empty() {
            return Err(ParseError::Empty);
        }
        Ok(xhtml)
    }
}

impl Normalizer for TidyNormalizer {
    fn normalize(&self, html: &str) -> Result<Document, ParseError> {
        let xhtml = self.tidy(html)?;
        Html5everNormalizer::new().normalize(&xhtml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let tidy = TidyNormalizer::new("/nonexistent/bin/tidy");
        let err = tidy.normalize("<p>x</p>").unwrap_err();
        assert!(matches!(err, ParseError::Spawn { .. }));
        assert!(err.to_string().contains("/nonexistent/bin/tidy"));
    }

    #[cfg(unix)]
    fn fake_tidy(dir: &Path, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("tidy");
        std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_stdout_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let tidy = TidyNormalizer::new(fake_tidy(dir.path(), "cat"));

        let doc = tidy.normalize("<p>foo</p>").unwrap();
        assert_eq!(doc.body().unwrap().text_content(), "foo");
    }

    #[cfg(unix)]
    #[test]
    fn test_stderr_rejects_input() {
        let dir = tempfile::tempdir().unwrap();
        let script = "cat > /dev/null\necho 'line 1 column 1 - Error: <xml> is not recognized!' >&2\necho 'second line' >&2";
        let tidy = TidyNormalizer::new(fake_tidy(dir.path(), script));

        match tidy.normalize("<xml>") {
            Err(ParseError::Rejected(msg)) => assert!(msg.starts_with("line 1 column 1")),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_empty_output() {
        let dir = tempfile::tempdir().unwrap();
        let tidy = TidyNormalizer::new(fake_tidy(dir.path(), "cat > /dev/null"));
        assert!(matches!(tidy.normalize("<p>x</p>"), Err(ParseError::Empty)));
    }
}
