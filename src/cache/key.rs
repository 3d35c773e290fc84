use std::fmt;

use serde::Serialize;

/// Composite cache key: entity type followed by scope identifiers.
///
/// Keys form a hierarchy; a key covers every key it is a prefix of, so
/// `["games"]` covers `["games", <id>, <user>]` and `["games", "list", …]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    /// Start a key at its entity root.
    pub fn new(root: impl Into<String>) -> Self {
        Self(vec![root.into()])
    }

    /// Append a scope part.
    pub fn push(mut self, part: impl fmt::Display) -> Self {
        self.0.push(part.to_string());
        self
    }

    /// Append several scope parts.
    pub fn extend<I>(mut self, parts: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.0.extend(parts);
        self
    }

    /// True when `prefix` covers this key.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// The raw key parts.
    pub fn parts(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}
