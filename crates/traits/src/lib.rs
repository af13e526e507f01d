//! Collaborator traits for the tailor templating engine.
//!
//! The engine never touches storage or application state directly; it goes
//! through the seams defined here.
//!
//! ## Seams
//!
//! - [`ResourceProvider`]: turns a template or bundle name into raw bytes
//! - [`ValueProvider`]: optional application hook consulted first during
//!   variable resolution
//!
//! [`InMemoryResourceProvider`] is always available and is the provider of
//! choice for tests and embedded template sets.

pub mod resource;
pub mod values;

pub use resource::{InMemoryResourceProvider, ResourceError, ResourceProvider, SharedResourceData};
pub use values::ValueProvider;
