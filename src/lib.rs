//! # Localith Library
//!
//! A library for turning one static HTML document into N locale-specific
//! copies at build time. Elements and attributes marked through a selector
//! convention (`data-t`, `data-attr-t`, ...) are substituted with strings
//! looked up in per-locale resource bundles, legacy IE conditional comments
//! are translated recursively, and relative asset paths are rewritten so
//! links stay valid at each locale's output location.
//!
//! ## Module organization
//!
//! - `core` - options, errors and the per-locale processing logic
//! - `parsers` - HTML and inline-CSS transforms
//! - `resources` - resource bundle loading and the lookup context
//! - `utils` - output path patterns and relative path computation

pub mod core;
pub mod parsers;
pub mod resources;
pub mod utils;

// Re-export commonly used items for convenience
pub use crate::core::{
    process, process_dir, process_file, translate, LocalithError, LocalithOptions, Selector,
};
pub use crate::resources::{load_translator, FileFormat, Translator};
