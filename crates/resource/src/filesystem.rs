//! Filesystem-based resource provider.
//!
//! Resolves template and bundle names against a base directory (typically
//! the directory holding the root template), so a template set can name its
//! sub-templates with bare file names.
//!
//! # Confinement
//!
//! Template fragments name further resources (`%{template#...}`), so the
//! names reaching this provider are template-author input. Resolved paths
//! are verified to stay inside the base directory; absolute names and
//! parent-directory escapes resolve to `NotFound`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tailor_traits::{ResourceError, ResourceProvider, SharedResourceData};

/// A resource provider that loads a template set from a local directory.
#[derive(Debug)]
pub struct FilesystemResourceProvider {
    base_dir: PathBuf,
    base_display: String,
    /// Canonicalized base for the confinement check
    canonical_base: Option<PathBuf>,
}

impl FilesystemResourceProvider {
    /// Creates a provider rooted at the given directory.
    ///
    /// All resource names are resolved relative to this directory.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        let base = base_dir.as_ref().to_path_buf();
        let base_display = base.display().to_string();
        // Canonicalization can fail if the directory does not exist yet;
        // the component check below still applies then.
        let canonical = base.canonicalize().ok();
        Self {
            base_dir: base,
            base_display,
            canonical_base: canonical,
        }
    }

    /// Resolves a resource name against the base directory.
    ///
    /// Returns `None` if the name would escape the base directory.
    fn resolve_name(&self, name: &str) -> Option<PathBuf> {
        if Path::new(name).is_absolute() {
            return None;
        }

        let full_path = self.base_dir.join(name);

        if let Ok(canonical) = full_path.canonicalize()
            && let Some(ref base) = self.canonical_base
        {
            if canonical.starts_with(base) {
                return Some(canonical);
            }
            return None;
        }

        // Name did not canonicalize (usually: no such file). Reject any
        // parent-directory component before reporting it missing.
        for component in Path::new(name).components() {
            if let std::path::Component::ParentDir = component {
                return None;
            }
        }

        Some(full_path)
    }
}

impl ResourceProvider for FilesystemResourceProvider {
    fn load(&self, name: &str) -> Result<SharedResourceData, ResourceError> {
        let full_path = self
            .resolve_name(name)
            .ok_or_else(|| ResourceError::NotFound(format!("{name} (outside template set)")))?;

        std::fs::read(&full_path).map(Arc::new).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResourceError::NotFound(name.to_string())
            } else {
                ResourceError::LoadFailed {
                    name: name.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    fn exists(&self, name: &str) -> bool {
        self.resolve_name(name)
            .map(|p| p.is_file())
            .unwrap_or(false)
    }

    fn base(&self) -> Option<&str> {
        Some(&self.base_display)
    }

    fn name(&self) -> &'static str {
        "FilesystemResourceProvider"
    }
}
