//! Property bundles and their per-parse scope chain.
//!
//! A bundle is an ordered set of name/value string pairs loaded from a
//! properties resource by `bundle#`/`bundle?`. Bundles are scoped to the
//! template instance that loaded them: lookups walk from the current parse
//! outward through the enclosing parses, so a bundle loaded in a parent is
//! visible in every sub-template, while one loaded in a sub-template is
//! invisible to the parent and to siblings.

use serde_json::Value;

/// An ordered set of name/value pairs loaded from a properties resource.
///
/// Format: one `key=value` per line; blank lines and lines starting with
/// `#` or `!` are skipped; keys and values are trimmed; a line without `=`
/// defines the key with an empty value; later definitions of a key win.
#[derive(Debug, Clone, Default)]
pub struct Bundle {
    entries: Vec<(String, String)>,
}

impl Bundle {
    /// Parses bundle content from raw resource bytes.
    pub fn parse(bytes: &[u8]) -> Self {
        let text = String::from_utf8_lossy(bytes);
        let mut entries = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let (key, value) = line.split_once('=').unwrap_or((line, ""));
            entries.push((key.trim().to_string(), value.trim().to_string()));
        }
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// The bundle-inheritance chain for one parse invocation.
///
/// Each render owns a `Scope`; child renders chain a fresh scope to the
/// current one. The chain is acyclic and finite by construction, bounded by
/// the include nesting depth of the input.
pub(crate) struct Scope<'a> {
    pub(crate) bundle: Option<Bundle>,
    parent: Option<&'a Scope<'a>>,
}

impl<'a> Scope<'a> {
    pub(crate) fn root() -> Self {
        Self {
            bundle: None,
            parent: None,
        }
    }

    pub(crate) fn child(parent: &'a Scope<'a>) -> Self {
        Self {
            bundle: None,
            parent: Some(parent),
        }
    }

    /// Iterative walk outward: the innermost bundle containing the name
    /// wins.
    pub(crate) fn lookup(&self, name: &str) -> Option<Value> {
        let mut current = Some(self);
        while let Some(scope) = current {
            if let Some(bundle) = &scope.bundle
                && let Some(value) = bundle.get(name)
            {
                return Some(Value::String(value.to_string()));
            }
            current = scope.parent;
        }
        None
    }
}
