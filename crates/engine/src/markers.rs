//! Inline error markers.
//!
//! Parse-time failures are embedded directly in the rendered output so the
//! rest of the fragment still renders. Markers share one recognizable
//! format, and a resolved value that is itself a marker counts as undefined
//! for conditional tags (a propagated error is not presence).

use std::fmt::Display;

/// Opening delimiter of an inline error marker.
pub const ERROR_PREFIX: &str = "{{+++ERROR: ";
/// Closing delimiter of an inline error marker.
pub const ERROR_SUFFIX: &str = " +++}}";

/// Wraps a message in the marker delimiters.
pub(crate) fn marker(message: impl Display) -> String {
    format!("{ERROR_PREFIX}{message}{ERROR_SUFFIX}")
}

/// True if the text starts with the marker prefix.
pub(crate) fn is_marker(text: &str) -> bool {
    text.starts_with(ERROR_PREFIX)
}

pub(crate) fn unterminated_var() -> String {
    marker("SUBSTITUTION VAR NOT TERMINATED")
}

pub(crate) fn empty_var() -> String {
    marker("SUBSTITUTION VAR IS EMPTY")
}

pub(crate) fn unresolved_var(name: &str) -> String {
    marker(format_args!("'{name}' SUBSTITUTION VAR NOT FOUND"))
}

pub(crate) fn string_mode(prefix: &str) -> String {
    marker(format_args!("Cannot use {prefix} in String mode"))
}

pub(crate) fn template_not_found(name: &str) -> String {
    marker(format_args!("Template:{name}:notFound"))
}

pub(crate) fn bundle_not_found(name: &str) -> String {
    marker(format_args!("Bundle:{name}:notFound"))
}

pub(crate) fn repeat_not_found(name: &str) -> String {
    marker(format_args!("Repeat template property:{name}:notFound"))
}

pub(crate) fn repeat_not_a_list(name: &str) -> String {
    marker(format_args!("Repeat template property:{name} must be a list"))
}

pub(crate) fn repeat_not_records(name: &str) -> String {
    marker(format_args!(
        "Repeat template property:{name} must only contain records"
    ))
}

pub(crate) fn invalid_assignment(prefix: &str, expression: &str) -> String {
    marker(format_args!("{prefix} expression {expression} is invalid"))
}
