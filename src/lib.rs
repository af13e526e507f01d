//! tailor, a text templating engine.
//!
//! A template is an arbitrary text fragment (HTML, config, report) holding
//! `%{...}` tags. Parsing expands every tag against caller-supplied data
//! and returns plain text; anything that goes wrong inside the fragment is
//! embedded in the output as a `{{+++ERROR: ... +++}}` marker rather than
//! aborting the parse.
//!
//! ## Tag syntax
//!
//! - `%{name}` substitutes a variable; `%%` renders a literal `%`.
//! - `%{template#sub.txt}` / `%{template?var}` include a sub-template.
//! - `%{repeat#rows}` renders the sub-template `rows` once per record in
//!   the list held by the `rows` variable, each record overriding the
//!   primary data for its iteration.
//! - `%{bundle#labels.properties}` / `%{bundle?var}` load name/value pairs
//!   scoped to this template and everything it includes.
//! - `%{ifDef#name}` ... `%{fi#}` and `%{ifUnDef#name}` ... `%{fi#}`
//!   conditionally include the enclosed text; nesting is fine.
//! - `%{set#key=value}`, `%{set?key=var}`, `%{unSet#key}` edit the data
//!   map mid-parse.
//! - `%{listData}` dumps the data maps for debugging.
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use std::sync::Arc;
//! use tailor::{InMemoryResourceProvider, Template};
//!
//! let store = InMemoryResourceProvider::new();
//! store.add("main.txt", b"Hello %{name}, items: %{repeat#rows}".to_vec()).unwrap();
//! store.add("rows", b"- %{n}\n".to_vec()).unwrap();
//!
//! let template = Template::new(Arc::new(store), "main.txt").unwrap();
//! let mut data = json!({
//!     "name": "Bob",
//!     "rows": [{"n": "1"}, {"n": "2"}]
//! }).as_object().unwrap().clone();
//!
//! assert_eq!(template.parse(&mut data), "Hello Bob, items: - 1\n- 2\n");
//! ```
//!
//! Templates usually live as files; [`open`] builds a root template from a
//! path and resolves every sub-template and bundle name relative to its
//! directory.

use std::path::Path;
use std::sync::Arc;

pub use tailor_engine::{Bundle, DataMap, ERROR_PREFIX, ERROR_SUFFIX, ParseConfig, Template, TemplateError};
pub use tailor_resource::FilesystemResourceProvider;
pub use tailor_traits::{
    InMemoryResourceProvider, ResourceError, ResourceProvider, SharedResourceData, ValueProvider,
};

/// Opens a file-backed root template.
///
/// The path must name an existing regular file. Sub-templates and bundles
/// referenced by the fragment are loaded from the same directory.
///
/// # Errors
///
/// Fails with [`TemplateError`] when the path is missing, is not a regular
/// file, or cannot be read. Nothing is rendered in that case.
pub fn open(path: impl AsRef<Path>) -> Result<Template, TemplateError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(TemplateError::InvalidPath(format!(
            "[{}] does not exist",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(TemplateError::InvalidPath(format!(
            "[{}] is not a file",
            path.display()
        )));
    }
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| TemplateError::InvalidPath(format!("[{}] has no file name", path.display())))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    log::debug!("opening template set at [{}]", base_dir.display());
    let provider = Arc::new(FilesystemResourceProvider::new(base_dir));
    Template::new(provider, name)
}
