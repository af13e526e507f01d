use tailor_traits::ResourceError;
use thiserror::Error;

/// Fatal, construction-time errors.
///
/// Everything that goes wrong *inside* a fragment is reported inline as an
/// error marker in the output; this type only covers failures that prevent
/// a root template from being built at all.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template resource failed to load: {0}")]
    Resource(#[from] ResourceError),

    #[error("Template name is empty")]
    EmptyName,

    #[error("Template path is invalid: {0}")]
    InvalidPath(String),
}
