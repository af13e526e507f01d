//! ValueProvider trait: the application-defined resolution hook.

use serde_json::Value;

/// An optional source of variable values supplied by the embedding
/// application.
///
/// When present, the hook is consulted before every other data source in
/// the resolution chain, so it can shadow caller data and bundles alike.
/// Returning `None` (or `Value::Null`) passes resolution on to the next
/// source.
///
/// Lookups must be side-effect free: a hook may be called for conditional
/// tags inside suppressed regions, where its result affects bookkeeping but
/// never output.
pub trait ValueProvider: Send + Sync {
    /// Resolve a variable name, or `None` to defer to the next source.
    fn get(&self, name: &str) -> Option<Value>;

    /// A human-readable hook name for logging.
    fn name(&self) -> &'static str {
        "ValueProvider"
    }
}
