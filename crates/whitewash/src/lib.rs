//! Whitewash
//!
//! Whitelist-based HTML sanitizer.
//!
//! Untrusted markup is repaired by a [`Normalizer`], every element is then
//! checked against a [`Whitelist`] of tags, attributes and CSS properties,
//! and the surviving fragment is serialized with canonical double-quoted
//! attributes. Filtering never fails; only markup whose structure cannot
//! be determined produces an error.
//!
//! ```rust,no_run
//! use whitewash::Whitewash;
//!
//! let whitewash = Whitewash::with_default_whitelist()?;
//! let html = whitewash.sanitize(r#"<p onclick="evil()">hello</p>"#)?;
//! assert_eq!(html, "<p>hello</p>");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
pub mod loader;
pub mod sanitizer;
pub mod whitelist;

pub use error::{ConfigError, SanitizeError};
pub use loader::{load_default_whitelist, load_whitelist_from_path, SearchPath, WHITELIST_FILE};
pub use sanitizer::Sanitizer;
pub use whitelist::{AttributeWhitelist, UnknownTagPolicy, ValueMatcher, Whitelist, WhitelistFormat};
pub use whitewash_dom::{Attributes, Element, Node};
pub use whitewash_html::{Normalizer, NormalizerBackend, ParseError};

use whitewash_html::serialize_fragment;

/// Extra rounds spent waiting for the output to stop changing
const MAX_SETTLE_PASSES: usize = 4;

/// Sanitizer front end: normalizer, whitelist and serializer together
pub struct Whitewash {
    whitelist: Whitelist,
    normalizer: Box<dyn Normalizer>,
}

impl Whitewash {
    /// Sanitizer for `whitelist` using the html5ever normalizer
    pub fn new(whitelist: Whitelist) -> Self {
        Self {
            whitelist,
            normalizer: NormalizerBackend::default().build(),
        }
    }

    /// Sanitizer for the whitelist found on the default search path
    pub fn with_default_whitelist() -> Result<Self, ConfigError> {
        Self::builder().build()
    }

    pub fn builder() -> WhitewashBuilder {
        WhitewashBuilder::default()
    }

    pub fn whitelist(&self) -> &Whitelist {
        &self.whitelist
    }

    /// Return sanitized HTML
    pub fn sanitize(&self, html: &str) -> Result<String, SanitizeError> {
        self.sanitize_using(html, &self.whitelist, None::<fn(&mut Element)>)
    }

    /// Return sanitized HTML, invoking `hook` on every element that
    /// survives, after its own attributes and children are sanitized.
    pub fn sanitize_with<H>(&self, html: &str, hook: H) -> Result<String, SanitizeError>
    where
        H: FnMut(&mut Element),
    {
        self.sanitize_using(html, &self.whitelist, Some(hook))
    }

    /// Return HTML sanitized against `whitelist` instead of the configured one
    ///
    /// Unwrapping an unknown element can leave markup that a parser
    /// restructures (`<p>a<button><p>b</p></button></p>` becomes `<p>a<p>b</p></p>`),
    /// so the output is normalized and sanitized again until it no longer
    /// changes. The hook then runs once, over the settled tree.
    pub fn sanitize_using<H>(
        &self,
        html: &str,
        whitelist: &Whitelist,
        hook: Option<H>,
    ) -> Result<String, SanitizeError>
    where
        H: FnMut(&mut Element),
    {
        let sanitizer = Sanitizer::new(whitelist);
        let mut output = self.pass(html, &sanitizer, &mut None::<fn(&mut Element)>)?;

        let mut settled = false;
        for _ in 0..MAX_SETTLE_PASSES {
            let next = self.pass(&output, &sanitizer, &mut None::<fn(&mut Element)>)?;
            if next == output {
                settled = true;
                break;
            }
            output = next;
        }
        if !settled {
            tracing::warn!(
                passes = MAX_SETTLE_PASSES,
                "sanitized output still changing, returning last pass"
            );
        }

        match hook {
            Some(hook) => self.pass(&output, &sanitizer, &mut Some(hook)),
            None => Ok(output),
        }
    }

    /// One normalize, sanitize, serialize round
    fn pass<H>(
        &self,
        html: &str,
        sanitizer: &Sanitizer<'_>,
        hook: &mut Option<H>,
    ) -> Result<String, SanitizeError>
    where
        H: FnMut(&mut Element),
    {
        let mut document = self.normalizer.normalize(html)?;

        let Some(mut body) = document.take_body() else {
            tracing::debug!("no body in normalized document");
            return Ok(String::new());
        };

        let nodes = sanitizer.sanitize_nodes_with(body.take_children(), hook);
        Ok(serialize_fragment(&nodes))
    }
}

impl std::fmt::Debug for Whitewash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Whitewash")
            .field("whitelist", &self.whitelist)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Whitewash`]
#[derive(Debug, Default)]
pub struct WhitewashBuilder {
    whitelist: Option<Whitelist>,
    backend: NormalizerBackend,
    search_path: Option<SearchPath>,
    unknown_tag_policy: Option<UnknownTagPolicy>,
}

impl WhitewashBuilder {
    /// Use this whitelist instead of loading one from the search path
    pub fn whitelist(mut self, whitelist: Whitelist) -> Self {
        self.whitelist = Some(whitelist);
        self
    }

    pub fn backend(mut self, backend: NormalizerBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Directories searched when no whitelist is given
    pub fn search_path(mut self, search_path: SearchPath) -> Self {
        self.search_path = Some(search_path);
        self
    }

    /// Override the whitelist's `_unknown` policy
    pub fn unknown_tag_policy(mut self, policy: UnknownTagPolicy) -> Self {
        self.unknown_tag_policy = Some(policy);
        self
    }

    pub fn build(self) -> Result<Whitewash, ConfigError> {
        let whitelist = match self.whitelist {
            Some(whitelist) => whitelist,
            None => self.search_path.unwrap_or_default().load_whitelist()?,
        };
        let whitelist = match self.unknown_tag_policy {
            Some(policy) => whitelist.with_unknown_tag_policy(policy),
            None => whitelist,
        };

        tracing::debug!(
            backend = ?self.backend,
            unknown = whitelist.unknown_tag_policy().as_str(),
            "whitewash ready"
        );

        Ok(Whitewash {
            whitelist,
            normalizer: self.backend.build(),
        })
    }
}
