//! Core engine of the tailor templating system.
//!
//! A [`Template`] wraps one text fragment and expands the `%{...}` tags in
//! it against caller-supplied data, producing plain text. Tags either
//! reference a variable or carry a directive prefix: conditional inclusion
//! (`ifDef#`/`ifUnDef#`/`fi#`), sub-template composition (`template#`,
//! `template?`), repeated sub-sections over a list of records (`repeat#`),
//! scoped property bundles (`bundle#`, `bundle?`) and in-parse data edits
//! (`set#`, `set?`, `unSet#`).
//!
//! Failures inside a fragment never abort the parse; they are embedded in
//! the output as `{{+++ERROR: ... +++}}` markers. Only a missing or
//! unreadable *root* resource fails hard, with a [`TemplateError`].
//!
//! ## Example
//!
//! ```
//! use tailor_engine::Template;
//! use serde_json::json;
//!
//! let mut data = json!({"name": "Bob"}).as_object().unwrap().clone();
//! let out = Template::parse_text("Hello %{name}%{ifDef#title}, %{title}%{fi#}!", &mut data);
//! assert_eq!(out, "Hello Bob!");
//! ```

mod bundle;
mod dispatch;
mod error;
mod fragment;
mod markers;
mod resolve;
mod suspend;
mod template;
mod value;

pub use bundle::Bundle;
pub use error::TemplateError;
pub use markers::{ERROR_PREFIX, ERROR_SUFFIX};
pub use template::{ParseConfig, Template};
pub use value::DataMap;
