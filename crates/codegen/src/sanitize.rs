//! Identifier sanitization for Terraform resource names.
//!
//! The same function names a resource's own declaration and every reference
//! to it from other resources, so the two always agree.

use std::collections::HashMap;

/// Name used when sanitization leaves nothing behind.
pub const FALLBACK_NAME: &str = "resource";

/// Convert a free-form label into a Terraform identifier.
///
/// The result always matches `^[a-z_][a-z0-9_]*$`:
/// lowercase, every other character replaced with `_`, an `_` prefixed when
/// the first character is a digit, and runs of `_` collapsed. Leading and
/// trailing underscores are kept.
#[must_use]
pub fn sanitize(raw: &str) -> String {
    let replaced: String = raw
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let prefixed = if replaced.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{replaced}")
    } else {
        replaced
    };

    let mut name = String::with_capacity(prefixed.len());
    for c in prefixed.chars() {
        if c == '_' && name.ends_with('_') {
            continue;
        }
        name.push(c);
    }

    if name.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        name
    }
}

/// Memoizes [`sanitize`] for the lifetime of one generation run.
///
/// Labels repeat heavily (every edge into a node re-derives its name), so
/// the generator builds one of these per call and drops it afterwards.
#[derive(Debug, Default)]
pub struct NameCache {
    names: HashMap<String, String>,
}

impl NameCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sanitized form of `raw`, computed at most once.
    pub fn name_for(&mut self, raw: &str) -> String {
        if let Some(name) = self.names.get(raw) {
            return name.clone();
        }
        let name = sanitize(raw);
        self.names.insert(raw.to_string(), name.clone());
        name
    }

    /// Number of distinct raw labels seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing has been sanitized yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
