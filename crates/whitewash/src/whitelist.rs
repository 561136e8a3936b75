//! Whitelist model
//!
//! Maps tag names to the attributes they may carry, plus the reserved
//! entries `_common` (attributes allowed on every tag), `_css` (allowed
//! style properties) and `_unknown` (what to do with tags that are not
//! listed).

use std::collections::{HashMap, HashSet};

use regex::Regex;
use serde::Deserialize;

use crate::ConfigError;

/// Tag names starting with this marker are reserved and never match.
pub const RESERVED_PREFIX: char = '_';

const COMMON_KEY: &str = "_common";

/// Serialization format of a whitelist file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WhitelistFormat {
    #[default]
    Yaml,
    Json,
}

/// Treatment of elements whose tag is not whitelisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownTagPolicy {
    /// Drop the tag and its attributes, keep its sanitized children
    #[default]
    Unwrap,
    /// Drop the element together with its whole subtree
    Remove,
}

/// Decides whether an attribute value is acceptable
#[derive(Debug, Clone)]
pub enum ValueMatcher {
    Exact(String),
    /// Unanchored search; anchor the pattern to match whole values
    Pattern(Regex),
}

impl ValueMatcher {
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(ValueMatcher::Pattern)
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            ValueMatcher::Exact(expected) => expected == value,
            ValueMatcher::Pattern(re) => re.is_match(value),
        }
    }
}

impl From<&str> for ValueMatcher {
    fn from(value: &str) -> Self {
        ValueMatcher::Exact(value.to_string())
    }
}

/// Attribute name → value matcher
#[derive(Debug, Clone, Default)]
pub struct AttributeWhitelist {
    entries: HashMap<String, ValueMatcher>,
}

impl AttributeWhitelist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow(mut self, name: impl Into<String>, matcher: impl Into<ValueMatcher>) -> Self {
        self.insert(name, matcher);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, matcher: impl Into<ValueMatcher>) {
        self.entries.insert(name.into(), matcher.into());
    }

    pub fn get(&self, name: &str) -> Option<&ValueMatcher> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Whether `name` is listed and `value` satisfies its matcher
    pub fn allows(&self, name: &str, value: &str) -> bool {
        self.get(name).is_some_and(|m| m.matches(value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// `self` layered over `base`: entries of `self` win on collision
    pub fn layered_over(&self, base: &AttributeWhitelist) -> AttributeWhitelist {
        let mut merged = base.clone();
        for (name, matcher) in &self.entries {
            merged.entries.insert(name.clone(), matcher.clone());
        }
        merged
    }
}

/// Declarative policy of allowed tags, attributes and CSS properties
#[derive(Debug, Clone, Default)]
pub struct Whitelist {
    tags: HashMap<String, AttributeWhitelist>,
    common: AttributeWhitelist,
    css: Option<HashSet<String>>,
    unknown: UnknownTagPolicy,
}

impl Whitelist {
    /// Empty whitelist: no tags, no common attributes, CSS unrestricted
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a whitelist document in the given format
    pub fn parse(text: &str, format: WhitelistFormat) -> Result<Self, ConfigError> {
        let raw: RawWhitelist = match format {
            WhitelistFormat::Yaml => serde_yaml::from_str(text)
                .map_err(|e| ConfigError::Parse(format!("failed to parse YAML: {e}")))?,
            WhitelistFormat::Json => serde_json::from_str(text)
                .map_err(|e| ConfigError::Parse(format!("failed to parse JSON: {e}")))?,
        };
        raw.compile()
    }

    pub fn allow_tag(mut self, tag: impl Into<String>, attributes: AttributeWhitelist) -> Self {
        self.tags.insert(tag.into(), attributes);
        self
    }

    pub fn allow_common(mut self, name: impl Into<String>, matcher: impl Into<ValueMatcher>) -> Self {
        self.common.insert(name, matcher);
        self
    }

    pub fn with_css_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.css = Some(properties.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_unknown_tag_policy(mut self, policy: UnknownTagPolicy) -> Self {
        self.unknown = policy;
        self
    }

    /// Per-tag attribute rules; `None` for unknown and reserved names
    pub fn lookup(&self, tag: &str) -> Option<&AttributeWhitelist> {
        if tag.starts_with(RESERVED_PREFIX) {
            return None;
        }
        self.tags.get(tag)
    }

    pub fn is_known(&self, tag: &str) -> bool {
        self.lookup(tag).is_some()
    }

    pub fn common(&self) -> &AttributeWhitelist {
        &self.common
    }

    /// Allowed CSS properties; `None` means CSS is unrestricted
    pub fn css_properties(&self) -> Option<&HashSet<String>> {
        self.css.as_ref()
    }

    pub fn unknown_tag_policy(&self) -> UnknownTagPolicy {
        self.unknown
    }

    /// `_common` merged with the tag's own rules, the tag's rules winning
    pub fn effective_attributes(&self, tag: &str) -> AttributeWhitelist {
        match self.lookup(tag) {
            Some(own) => own.layered_over(&self.common),
            None => self.common.clone(),
        }
    }

    /// Same answer as `effective_attributes(tag).allows(name, value)`
    /// without building the merged map.
    pub fn allows_attribute(&self, tag: &str, name: &str, value: &str) -> bool {
        let own = self.lookup(tag).and_then(|attrs| attrs.get(name));
        match own.or_else(|| self.common.get(name)) {
            Some(matcher) => matcher.matches(value),
            None => false,
        }
    }
}

/// On-disk shape of a whitelist file
#[derive(Debug, Deserialize)]
struct RawWhitelist {
    #[serde(rename = "_common", default)]
    common: Option<HashMap<String, RawMatcher>>,
    #[serde(rename = "_css", default)]
    css: Option<Vec<String>>,
    #[serde(rename = "_unknown", default)]
    unknown: UnknownTagPolicy,
    #[serde(flatten)]
    tags: HashMap<String, Option<HashMap<String, RawMatcher>>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawMatcher {
    Exact(String),
    Pattern { pattern: String },
}

impl RawWhitelist {
    fn compile(self) -> Result<Whitelist, ConfigError> {
        let common = compile_attributes(COMMON_KEY, self.common.unwrap_or_default())?;

        let mut tags = HashMap::with_capacity(self.tags.len());
        for (tag, attrs) in self.tags {
            if tag.starts_with(RESERVED_PREFIX) {
                tracing::warn!("ignoring unrecognised reserved whitelist key {tag}");
                continue;
            }
            let attrs = compile_attributes(&tag, attrs.unwrap_or_default())?;
            tags.insert(tag, attrs);
        }

        tracing::debug!(
            tags = tags.len(),
            css = self.css.is_some(),
            "compiled whitelist"
        );

        Ok(Whitelist {
            tags,
            common,
            css: self.css.map(|props| props.into_iter().collect()),
            unknown: self.unknown,
        })
    }
}

fn compile_attributes(
    tag: &str,
    raw: HashMap<String, RawMatcher>,
) -> Result<AttributeWhitelist, ConfigError> {
    let mut attrs = AttributeWhitelist::new();
    for (name, matcher) in raw {
        let matcher = match matcher {
            RawMatcher::Exact(value) => ValueMatcher::Exact(value),
            RawMatcher::Pattern { pattern } => {
                ValueMatcher::pattern(&pattern).map_err(|source| ConfigError::InvalidPattern {
                    tag: tag.to_string(),
                    attribute: name.clone(),
                    source,
                })?
            }
        };
        attrs.insert(name, matcher);
    }
    Ok(attrs)
}

impl UnknownTagPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnknownTagPolicy::Unwrap => "unwrap",
            UnknownTagPolicy::Remove => "remove",
        }
    }
}
