//! The variable resolution chain.
//!
//! A name is looked up across five sources in fixed precedence order, first
//! hit wins:
//!
//! 1. the application's extension hook,
//! 2. the override map (the current record inside a `repeat#` iteration),
//! 3. the primary data map,
//! 4. the bundle scope chain, innermost first,
//! 5. the injected configuration table.
//!
//! The chain hands back the raw value so dispatch can inspect its type;
//! conversion to text happens only at emission. A `Null` at any source is
//! indistinguishable from an absent key and falls through to the next
//! source.

use crate::bundle::Scope;
use crate::template::Template;
use crate::value::DataMap;
use serde_json::Value;

impl Template {
    pub(crate) fn resolve(
        &self,
        name: &str,
        data: &DataMap,
        overlay: Option<&DataMap>,
        scope: &Scope<'_>,
    ) -> Option<Value> {
        if let Some(hook) = &self.hook {
            match hook.get(name) {
                Some(value) if !value.is_null() => return Some(value),
                _ => {}
            }
        }
        if let Some(map) = overlay {
            match map.get(name) {
                Some(value) if !value.is_null() => return Some(value.clone()),
                _ => {}
            }
        }
        match data.get(name) {
            Some(value) if !value.is_null() => return Some(value.clone()),
            _ => {}
        }
        if let Some(value) = scope.lookup(name) {
            return Some(value);
        }
        self.config.get(name).map(|s| Value::String(s.clone()))
    }

    /// Defined-ness test for `ifDef#`/`ifUnDef#`: resolvable, and not a
    /// propagated error marker.
    pub(crate) fn is_defined(
        &self,
        name: &str,
        data: &DataMap,
        overlay: Option<&DataMap>,
        scope: &Scope<'_>,
    ) -> bool {
        match self.resolve(name, data, overlay, scope) {
            Some(Value::String(s)) => !crate::markers::is_marker(&s),
            Some(_) => true,
            None => false,
        }
    }
}
