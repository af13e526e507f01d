//! ResourceProvider trait for abstracting template and bundle loading.
//!
//! A template set lives somewhere, be that a directory on disk or a map in
//! memory. The engine only ever asks for a named fragment relative to that
//! base, so the storage strategy stays behind this trait. A sub-template
//! created during parsing inherits its parent's provider, which is how the
//! base locator and load strategy propagate unchanged through the tree.

use std::fmt::Debug;
use std::sync::Arc;
use thiserror::Error;

/// Error type for resource loading operations.
#[derive(Error, Debug, Clone)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to load resource '{name}': {message}")]
    LoadFailed { name: String, message: String },

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ResourceError {
    fn from(err: std::io::Error) -> Self {
        ResourceError::Io(err.to_string())
    }
}

/// Shared resource data type (reference-counted bytes).
pub type SharedResourceData = Arc<Vec<u8>>;

/// A source of named template and bundle resources.
///
/// Implementations resolve a bare resource name (`"header.html"`,
/// `"labels.properties"`) against whatever base they were constructed with
/// and hand back the raw bytes. The engine treats every load as a one-shot,
/// side-effect-free read; nothing is cached on this side of the seam.
///
/// # Implementations
///
/// - `FilesystemResourceProvider` (tailor-resource): a base directory
/// - [`InMemoryResourceProvider`]: pre-populated map, always available
///
/// A URL-backed provider fits the same contract: resolve the name against a
/// base URL and fetch.
pub trait ResourceProvider: Send + Sync + Debug {
    /// Load a resource by name.
    ///
    /// Returns the raw bytes, or `ResourceError::NotFound` /
    /// `ResourceError::LoadFailed` when the name does not resolve to
    /// readable content.
    fn load(&self, name: &str) -> Result<SharedResourceData, ResourceError>;

    /// Check whether a name resolves to a loadable resource.
    fn exists(&self, name: &str) -> bool;

    /// The base locator names are resolved against, if the provider has one.
    fn base(&self) -> Option<&str> {
        None
    }

    /// A human-readable provider name for logging.
    fn name(&self) -> &'static str;
}

/// An in-memory resource provider.
///
/// Resources are stored in a map and must be populated before parsing
/// begins. Interior mutability lets a store be filled after it has been
/// wrapped in an `Arc` and handed to a template.
#[derive(Debug, Default)]
pub struct InMemoryResourceProvider {
    resources: std::sync::RwLock<std::collections::HashMap<String, SharedResourceData>>,
}

impl InMemoryResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a named resource, replacing any previous content under the
    /// same name.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::LoadFailed` if the internal lock is poisoned.
    pub fn add(&self, name: impl Into<String>, data: Vec<u8>) -> Result<(), ResourceError> {
        let name = name.into();
        let mut resources = self.resources.write().map_err(|_| ResourceError::LoadFailed {
            name: name.clone(),
            message: "resource store lock poisoned".to_string(),
        })?;
        resources.insert(name, Arc::new(data));
        Ok(())
    }

    /// Number of stored resources. Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.resources.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResourceProvider for InMemoryResourceProvider {
    fn load(&self, name: &str) -> Result<SharedResourceData, ResourceError> {
        let resources = self.resources.read().map_err(|_| ResourceError::LoadFailed {
            name: name.to_string(),
            message: "resource store lock poisoned".to_string(),
        })?;
        resources
            .get(name)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(name.to_string()))
    }

    fn exists(&self, name: &str) -> bool {
        self.resources
            .read()
            .map(|r| r.contains_key(name))
            .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "InMemoryResourceProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_provider_add_and_load() {
        let provider = InMemoryResourceProvider::new();
        provider
            .add("greeting.txt", b"Hello %{name}".to_vec())
            .unwrap();

        let data = provider.load("greeting.txt").unwrap();
        assert_eq!(&*data, b"Hello %{name}");
    }

    #[test]
    fn test_in_memory_provider_not_found() {
        let provider = InMemoryResourceProvider::new();
        let result = provider.load("missing.txt");
        assert!(matches!(result, Err(ResourceError::NotFound(_))));
    }

    #[test]
    fn test_in_memory_provider_exists() {
        let provider = InMemoryResourceProvider::new();
        provider.add("row.txt", vec![]).unwrap();

        assert!(provider.exists("row.txt"));
        assert!(!provider.exists("missing.txt"));
    }

    #[test]
    fn test_in_memory_provider_overwrite() {
        let provider = InMemoryResourceProvider::new();
        provider.add("t.txt", b"first".to_vec()).unwrap();
        provider.add("t.txt", b"second".to_vec()).unwrap();

        let data = provider.load("t.txt").unwrap();
        assert_eq!(&*data, b"second");
        assert_eq!(provider.len(), 1);
    }

    #[test]
    fn test_in_memory_provider_no_base() {
        let provider = InMemoryResourceProvider::new();
        assert!(provider.base().is_none());
    }

    #[test]
    fn test_resource_error_display() {
        let err = ResourceError::NotFound("main.txt".to_string());
        assert!(err.to_string().contains("main.txt"));

        let err = ResourceError::LoadFailed {
            name: "labels.properties".to_string(),
            message: "permission denied".to_string(),
        };
        assert!(err.to_string().contains("labels.properties"));
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn test_resource_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: ResourceError = io_err.into();
        assert!(matches!(err, ResourceError::Io(_)));
        assert!(err.to_string().contains("no such file"));
    }
}
