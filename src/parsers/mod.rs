//! Document transforms: HTML tree rewriting and inline-CSS path fixes.

pub mod css;
pub mod html;
