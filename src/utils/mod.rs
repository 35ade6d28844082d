//! Utility functions: output path patterns and relative path computation.

pub mod paths;

// Re-export commonly used items for convenience
pub use paths::{
    is_absolute_reference, output_destination, path_delta, relative_output_path,
    relative_source_path,
};
