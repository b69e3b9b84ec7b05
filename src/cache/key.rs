//! Key Naming Module
//!
//! Every physical key is `<namespace>:<kind>:<id...>`. The namespace is the
//! cache instance identifier, so independently configured caches can share
//! one key/value service without colliding.

/// Separator between key segments.
pub const SEPARATOR: &str = ":";

/// Segment naming the order index of a namespace.
pub const INDEX_SEGMENT: &str = "cache_key";

// == Key Space ==
/// Builds the physical keys of one cache instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpace {
    namespace: String,
}

impl KeySpace {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Joins the namespace and `parts` with the separator.
    pub fn generate(&self, parts: &[&str]) -> String {
        let mut key = self.namespace.clone();
        for part in parts {
            key.push_str(SEPARATOR);
            key.push_str(part);
        }
        key
    }

    /// Key of the entry for `id` of entity `kind`.
    pub fn entry_key(&self, kind: &str, id: &str) -> String {
        self.generate(&[kind, id])
    }

    /// Key of this namespace's order index.
    pub fn index_key(&self) -> String {
        self.generate(&[INDEX_SEGMENT])
    }
}
