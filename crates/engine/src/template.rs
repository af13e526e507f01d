//! The template instance: construction, the tag scanner and directive
//! execution.

use crate::bundle::{Bundle, Scope};
use crate::dispatch::{self, Directive};
use crate::error::TemplateError;
use crate::fragment::Fragment;
use crate::markers;
use crate::suspend::SuspendStack;
use crate::value::{self, DataMap};
use log::{debug, warn};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;
use tailor_traits::{ResourceProvider, ValueProvider};

const ESCAPE: u8 = b'%';

/// Configuration for one parse invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseConfig {
    /// Re-emit an unresolved tag verbatim (`%{name}`) instead of replacing
    /// it with an error marker. The output can then be parsed again once
    /// the missing values exist, so resolution may happen in passes.
    pub ignore_unresolved: bool,
}

/// One template fragment, ready to be parsed against caller data.
///
/// A template is built from a named resource behind a [`ResourceProvider`]
/// (root), from an in-memory string ("string mode"), or internally while
/// dispatching `template#`/`template?`/`repeat#` tags. Children share the
/// parent's provider, hook and configuration, which is how the base locator
/// and load strategy propagate unchanged through the include tree.
///
/// String-mode templates have no provider, and every resource-touching
/// directive inside them reports an inline error instead of loading.
pub struct Template {
    fragment: Fragment,
    name: Option<String>,
    provider: Option<Arc<dyn ResourceProvider>>,
    pub(crate) hook: Option<Arc<dyn ValueProvider>>,
    pub(crate) config: Arc<HashMap<String, String>>,
}

impl Template {
    /// Builds a root template by loading `name` through the provider.
    ///
    /// # Errors
    ///
    /// Fails if the name is empty or the resource cannot be loaded. This is
    /// the fatal tier: nothing is rendered.
    pub fn new(
        provider: Arc<dyn ResourceProvider>,
        name: impl Into<String>,
    ) -> Result<Self, TemplateError> {
        let name = name.into();
        if name.is_empty() {
            return Err(TemplateError::EmptyName);
        }
        let bytes = provider.load(&name)?;
        debug!("loaded root template '{name}' via {}", provider.name());
        Ok(Self {
            fragment: Fragment::new(bytes),
            name: Some(name),
            provider: Some(provider),
            hook: None,
            config: Arc::default(),
        })
    }

    /// Builds a string-mode template directly from fragment text.
    pub fn from_text(text: &str) -> Self {
        Self {
            fragment: Fragment::from_text(text),
            name: None,
            provider: None,
            hook: None,
            config: Arc::default(),
        }
    }

    /// Installs the application resolution hook, consulted before every
    /// other data source.
    pub fn with_hook(mut self, hook: Arc<dyn ValueProvider>) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Installs the configuration table used as the last-resort resolution
    /// source.
    pub fn with_config(mut self, config: HashMap<String, String>) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// The fragment's resource name; `None` in string mode.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The raw fragment text.
    pub fn text(&self) -> Cow<'_, str> {
        self.fragment.text()
    }

    /// True when the template was built from an in-memory string and
    /// resource-touching directives are disabled.
    pub fn is_string_mode(&self) -> bool {
        self.provider.is_none()
    }

    /// Parses the fragment against the data map and returns the rendered
    /// text.
    ///
    /// `data` is mutated in place by `set#`, `set?` and `unSet#`; the edits
    /// remain visible after the call. Failures inside the fragment become
    /// inline `{{+++ERROR: ... +++}}` markers. The include graph named by
    /// the fragment must be finite: a template that includes itself
    /// recurses until the stack runs out.
    pub fn parse(&self, data: &mut DataMap) -> String {
        self.parse_with(data, &ParseConfig::default())
    }

    /// Like [`parse`](Self::parse), with explicit per-call configuration.
    pub fn parse_with(&self, data: &mut DataMap, config: &ParseConfig) -> String {
        let mut scope = Scope::root();
        self.render(data, None, &mut scope, config)
    }

    /// One-shot string-mode parse.
    pub fn parse_text(text: &str, data: &mut DataMap) -> String {
        Self::from_text(text).parse(data)
    }

    /// One-shot string-mode parse with explicit configuration.
    pub fn parse_text_with(text: &str, data: &mut DataMap, config: &ParseConfig) -> String {
        Self::from_text(text).parse_with(data, config)
    }

    /// Builds a sub-template sharing the parent's provider, hook and
    /// configuration.
    fn child(
        parent: &Template,
        provider: &Arc<dyn ResourceProvider>,
        name: &str,
    ) -> Result<Template, TemplateError> {
        if name.is_empty() {
            return Err(TemplateError::EmptyName);
        }
        let bytes = provider.load(name)?;
        debug!("loaded sub-template '{name}'");
        Ok(Template {
            fragment: Fragment::new(bytes),
            name: Some(name.to_string()),
            provider: Some(provider.clone()),
            hook: parent.hook.clone(),
            config: parent.config.clone(),
        })
    }

    /// The scanner: one left-to-right pass over the fragment bytes.
    ///
    /// Output is accumulated as bytes and converted once at the end, so
    /// multi-byte text passes through untouched. Each render owns a fresh
    /// suspension stack; `scope` chains this render's bundle to the
    /// enclosing renders.
    fn render(
        &self,
        data: &mut DataMap,
        overlay: Option<&DataMap>,
        scope: &mut Scope<'_>,
        config: &ParseConfig,
    ) -> String {
        let mut out: Vec<u8> = Vec::with_capacity(self.fragment.len());
        let mut suspend = SuspendStack::new();
        let mut pos = 0;
        while let Some(byte) = self.fragment.get(pos) {
            pos += 1;
            if byte != ESCAPE {
                if suspend.appending() {
                    out.push(byte);
                }
                continue;
            }
            let Some(next) = self.fragment.get(pos) else {
                // Trailing escape with nothing after it
                if suspend.appending() {
                    out.push(ESCAPE);
                }
                break;
            };
            pos += 1;
            match next {
                b'{' => {
                    let Some((name, after)) = self.fragment.scan_name(pos) else {
                        // Hard stop: the rest of the fragment is dropped
                        out.extend_from_slice(markers::unterminated_var().as_bytes());
                        break;
                    };
                    pos = after;
                    self.apply_tag(&name, data, overlay, scope, &mut suspend, config, &mut out);
                }
                ESCAPE => {
                    if suspend.appending() {
                        out.push(ESCAPE);
                    }
                }
                other => {
                    // Pass-through for a stray escape
                    if suspend.appending() {
                        out.push(ESCAPE);
                        out.push(other);
                    }
                }
            }
        }
        String::from_utf8_lossy(&out).into_owned()
    }

    /// Executes one extracted tag.
    ///
    /// Conditional tags always run so that stack depth tracks tag nesting
    /// even inside suppressed regions. Everything else emits text and
    /// applies side effects only while appending, except `listData`, whose
    /// diagnostic dump stays visible regardless.
    #[allow(clippy::too_many_arguments)]
    fn apply_tag(
        &self,
        name: &str,
        data: &mut DataMap,
        overlay: Option<&DataMap>,
        scope: &mut Scope<'_>,
        suspend: &mut SuspendStack,
        config: &ParseConfig,
        out: &mut Vec<u8>,
    ) {
        if name.is_empty() {
            if suspend.appending() {
                emit(out, &markers::empty_var());
            }
            return;
        }
        match dispatch::classify(name) {
            Some(Directive::BundleVar(op)) => {
                if suspend.appending() {
                    emit(out, &self.exec_bundle_var(op, data, overlay, scope, config));
                }
            }
            Some(Directive::BundleRef(op)) => {
                if suspend.appending() {
                    emit(out, &self.exec_bundle_ref(op, scope));
                }
            }
            Some(Directive::Repeat(op)) => {
                if suspend.appending() {
                    emit(out, &self.exec_repeat(op, data, overlay, scope, config));
                }
            }
            Some(Directive::Include(op)) => {
                if suspend.appending() {
                    emit(out, &self.exec_include(op, data, overlay, scope, config));
                }
            }
            Some(Directive::IncludeVar(op)) => {
                if suspend.appending() {
                    emit(out, &self.exec_include_var(op, data, overlay, scope, config));
                }
            }
            Some(Directive::IfUnDef(op)) => {
                suspend.push(!self.is_defined(op, data, overlay, scope));
            }
            Some(Directive::IfDef(op)) => {
                suspend.push(self.is_defined(op, data, overlay, scope));
            }
            Some(Directive::Fi) => suspend.pop(),
            Some(Directive::Set(op)) => {
                if suspend.appending() {
                    emit(out, &exec_set(op, data));
                }
            }
            Some(Directive::SetVar(op)) => {
                if suspend.appending() {
                    emit(out, &self.exec_set_var(op, data, overlay, scope, config));
                }
            }
            Some(Directive::UnSet(op)) => {
                if suspend.appending() {
                    data.remove(op);
                }
            }
            Some(Directive::ListData) => {
                emit(out, &dump_data(data, overlay));
            }
            None => {
                if suspend.appending() {
                    emit(out, &self.exec_substitution(name, data, overlay, scope, config));
                }
            }
        }
    }

    fn exec_substitution(
        &self,
        name: &str,
        data: &DataMap,
        overlay: Option<&DataMap>,
        scope: &Scope<'_>,
        config: &ParseConfig,
    ) -> String {
        match self.resolve(name, data, overlay, scope) {
            Some(resolved) => value::text_of(&resolved),
            None => unresolved(name, config),
        }
    }

    fn exec_bundle_ref(&self, bundle_name: &str, scope: &mut Scope<'_>) -> String {
        let Some(provider) = &self.provider else {
            return markers::string_mode(dispatch::BUNDLE_REF);
        };
        load_bundle(provider, bundle_name, scope)
    }

    fn exec_bundle_var(
        &self,
        var: &str,
        data: &DataMap,
        overlay: Option<&DataMap>,
        scope: &mut Scope<'_>,
        config: &ParseConfig,
    ) -> String {
        let Some(provider) = &self.provider else {
            return markers::string_mode(dispatch::BUNDLE_VAR);
        };
        match self.resolve(var, data, overlay, scope) {
            Some(resolved) => load_bundle(provider, &value::text_of(&resolved), scope),
            None => unresolved(var, config),
        }
    }

    fn exec_include(
        &self,
        sub_name: &str,
        data: &mut DataMap,
        overlay: Option<&DataMap>,
        scope: &Scope<'_>,
        config: &ParseConfig,
    ) -> String {
        let Some(provider) = &self.provider else {
            return markers::string_mode(dispatch::INCLUDE);
        };
        self.include_child(provider, sub_name, data, overlay, scope, config)
    }

    fn exec_include_var(
        &self,
        var: &str,
        data: &mut DataMap,
        overlay: Option<&DataMap>,
        scope: &Scope<'_>,
        config: &ParseConfig,
    ) -> String {
        let Some(provider) = &self.provider else {
            return markers::string_mode(dispatch::INCLUDE_VAR);
        };
        match self.resolve(var, data, overlay, scope) {
            Some(resolved) => {
                let sub_name = value::text_of(&resolved);
                self.include_child(provider, &sub_name, data, overlay, scope, config)
            }
            None => unresolved(var, config),
        }
    }

    /// Renders one sub-template in a scope chained to the current one.
    fn include_child(
        &self,
        provider: &Arc<dyn ResourceProvider>,
        sub_name: &str,
        data: &mut DataMap,
        overlay: Option<&DataMap>,
        scope: &Scope<'_>,
        config: &ParseConfig,
    ) -> String {
        match Self::child(self, provider, sub_name) {
            Ok(sub) => {
                let mut child_scope = Scope::child(scope);
                sub.render(data, overlay, &mut child_scope, config)
            }
            Err(err) => {
                warn!("sub-template '{sub_name}' failed to load: {err}");
                markers::template_not_found(sub_name)
            }
        }
    }

    /// `repeat#name`: the operand names both the list in the data and the
    /// sub-template to render per record. The sub-template is reloaded for
    /// every record; resource reads are idempotent by contract. Any failure
    /// discards the directive's output and yields a single marker.
    fn exec_repeat(
        &self,
        list_name: &str,
        data: &mut DataMap,
        overlay: Option<&DataMap>,
        scope: &Scope<'_>,
        config: &ParseConfig,
    ) -> String {
        let Some(provider) = &self.provider else {
            return markers::string_mode(dispatch::REPEAT);
        };
        let Some(resolved) = self.resolve(list_name, data, overlay, scope) else {
            return markers::repeat_not_found(list_name);
        };
        let Value::Array(records) = resolved else {
            return markers::repeat_not_a_list(list_name);
        };
        let mut rendered = String::new();
        for record in &records {
            let Value::Object(record) = record else {
                return markers::repeat_not_records(list_name);
            };
            let sub = match Self::child(self, provider, list_name) {
                Ok(sub) => sub,
                Err(err) => {
                    warn!("repeat sub-template '{list_name}' failed to load: {err}");
                    return markers::template_not_found(list_name);
                }
            };
            let mut child_scope = Scope::child(scope);
            rendered.push_str(&sub.render(data, Some(record), &mut child_scope, config));
        }
        rendered
    }

    fn exec_set_var(
        &self,
        expression: &str,
        data: &mut DataMap,
        overlay: Option<&DataMap>,
        scope: &Scope<'_>,
        config: &ParseConfig,
    ) -> String {
        let Some((key, var)) = split_assignment(expression) else {
            return markers::invalid_assignment(dispatch::SET_VAR, expression);
        };
        match self.resolve(var, data, overlay, scope) {
            Some(resolved) => {
                data.insert(key.to_string(), resolved);
                String::new()
            }
            None => unresolved(var, config),
        }
    }
}

fn emit(out: &mut Vec<u8>, text: &str) {
    out.extend_from_slice(text.as_bytes());
}

fn unresolved(name: &str, config: &ParseConfig) -> String {
    if config.ignore_unresolved {
        format!("%{{{name}}}")
    } else {
        markers::unresolved_var(name)
    }
}

/// Splits a `set#`/`set?` operand at its last `=`.
fn split_assignment(expression: &str) -> Option<(&str, &str)> {
    let (key, value) = expression.rsplit_once('=')?;
    if key.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Loads a bundle into the current scope. A failed load keeps whatever
/// bundle the scope already has.
fn load_bundle(
    provider: &Arc<dyn ResourceProvider>,
    bundle_name: &str,
    scope: &mut Scope<'_>,
) -> String {
    match provider.load(bundle_name) {
        Ok(bytes) => {
            let bundle = Bundle::parse(&bytes);
            debug!("loaded bundle '{bundle_name}' ({} entries)", bundle.len());
            scope.bundle = Some(bundle);
            String::new()
        }
        Err(err) => {
            warn!("bundle '{bundle_name}' failed to load: {err}");
            markers::bundle_not_found(bundle_name)
        }
    }
}

fn exec_set(expression: &str, data: &mut DataMap) -> String {
    match split_assignment(expression) {
        Some((key, literal)) => {
            data.insert(key.to_string(), Value::String(literal.to_string()));
            String::new()
        }
        None => markers::invalid_assignment(dispatch::SET, expression),
    }
}

/// The `listData` diagnostic dump: override map first, then the primary
/// map, each labeled with its element count.
fn dump_data(data: &DataMap, overlay: Option<&DataMap>) -> String {
    let mut dump = String::new();
    if let Some(map) = overlay {
        dump.push_str("Override data ---------------- Overrides primary data.\n");
        dump.push_str(&format!("Data size = {}\n", map.len()));
        for (key, val) in map {
            dump.push_str(&format!("{key}={}\n", value::text_of(val)));
        }
    }
    dump.push_str("Primary data ----------------\n");
    dump.push_str(&format!("Data size = {}\n", data.len()));
    for (key, val) in data {
        dump.push_str(&format!("{key}={}\n", value::text_of(val)));
    }
    dump.trim_end().to_string()
}
