//! Directive classification.
//!
//! Every extracted tag name is tested against the fixed control prefixes,
//! first match wins; anything left over is a plain variable reference. The
//! order matters: `ifUnDef#` must be tested before `ifDef#` would ever be
//! considered, and `listData` matches only exactly.

pub(crate) const BUNDLE_VAR: &str = "bundle?";
pub(crate) const BUNDLE_REF: &str = "bundle#";
pub(crate) const REPEAT: &str = "repeat#";
pub(crate) const INCLUDE: &str = "template#";
pub(crate) const INCLUDE_VAR: &str = "template?";
pub(crate) const IF_UN_DEF: &str = "ifUnDef#";
pub(crate) const IF_DEF: &str = "ifDef#";
pub(crate) const FI: &str = "fi#";
pub(crate) const SET: &str = "set#";
pub(crate) const SET_VAR: &str = "set?";
pub(crate) const UN_SET: &str = "unSet#";
pub(crate) const LIST_DATA: &str = "listData";

/// A classified control tag with its operand borrowed from the tag name.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Directive<'a> {
    /// `bundle?var`: load the bundle named by a variable
    BundleVar(&'a str),
    /// `bundle#name`: load a literally named bundle
    BundleRef(&'a str),
    /// `repeat#name`: render a sub-template once per record in a list
    Repeat(&'a str),
    /// `template#name`: include a literally named sub-template
    Include(&'a str),
    /// `template?var`: include the sub-template named by a variable
    IncludeVar(&'a str),
    /// `ifUnDef#name`: suspend unless the variable is undefined
    IfUnDef(&'a str),
    /// `ifDef#name`: suspend unless the variable is defined
    IfDef(&'a str),
    /// `fi#`: close the innermost conditional
    Fi,
    /// `set#key=value`: set a literal value in the primary data
    Set(&'a str),
    /// `set?key=var`: set a resolved value in the primary data
    SetVar(&'a str),
    /// `unSet#key`: remove a key from the primary data
    UnSet(&'a str),
    /// `listData`: diagnostic dump of the data maps
    ListData,
}

/// Classifies a tag name, or `None` for a plain variable reference.
pub(crate) fn classify(name: &str) -> Option<Directive<'_>> {
    if let Some(op) = name.strip_prefix(BUNDLE_VAR) {
        return Some(Directive::BundleVar(op));
    }
    if let Some(op) = name.strip_prefix(BUNDLE_REF) {
        return Some(Directive::BundleRef(op));
    }
    if let Some(op) = name.strip_prefix(REPEAT) {
        return Some(Directive::Repeat(op));
    }
    if let Some(op) = name.strip_prefix(INCLUDE) {
        return Some(Directive::Include(op));
    }
    if let Some(op) = name.strip_prefix(INCLUDE_VAR) {
        return Some(Directive::IncludeVar(op));
    }
    if let Some(op) = name.strip_prefix(IF_UN_DEF) {
        return Some(Directive::IfUnDef(op));
    }
    if let Some(op) = name.strip_prefix(IF_DEF) {
        return Some(Directive::IfDef(op));
    }
    if name.starts_with(FI) {
        return Some(Directive::Fi);
    }
    if let Some(op) = name.strip_prefix(SET) {
        return Some(Directive::Set(op));
    }
    if let Some(op) = name.strip_prefix(SET_VAR) {
        return Some(Directive::SetVar(op));
    }
    if let Some(op) = name.strip_prefix(UN_SET) {
        return Some(Directive::UnSet(op));
    }
    if name == LIST_DATA {
        return Some(Directive::ListData);
    }
    None
}
