//! Output path patterns and relative path computation.
//!
//! Output destinations come from pattern templates with three placeholders:
//! `__lng__` (the locale), `__file__` (the source path relative to the base
//! directory) and `__basename__` (the source file name without extension).
//! The primary locale uses `output_default`, every other locale uses
//! `output_other`, and the override table beats both.

use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::core::{LocalithError, LocalithOptions};

fn scheme_regex() -> &'static Regex {
    static SCHEME: OnceLock<Regex> = OnceLock::new();
    SCHEME.get_or_init(|| Regex::new(r"(?i)^(?:[a-z]+:)?//").unwrap())
}

/// Whether a reference must never be rewritten: rooted (`/...`), scheme
/// qualified (`https://...`) or protocol-relative (`//...`).
pub fn is_absolute_reference(reference: &str) -> bool {
    reference.starts_with('/') || scheme_regex().is_match(reference)
}

fn raw_output_pattern<'a>(file: &str, locale: &str, options: &'a LocalithOptions) -> &'a str {
    if let Some(destination) = options
        .output_override
        .get(locale)
        .and_then(|files| files.get(file))
    {
        destination
    } else if locale == options.locale {
        &options.output_default
    } else {
        &options.output_other
    }
}

/// Output path for one file and locale, relative to the output directory.
pub fn relative_output_path(file: &str, locale: &str, options: &LocalithOptions) -> String {
    let basename = Path::new(file)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("");
    raw_output_pattern(file, locale, options)
        .replace("__lng__", locale)
        .replace("__file__", file)
        .replace("__basename__", basename)
}

/// Absolute destination for one file and locale. Without an output
/// directory the base directory serves as the output root.
pub fn output_destination(file: &str, locale: &str, options: &LocalithOptions) -> PathBuf {
    let outdir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| options.resolved_base_dir().to_path_buf());
    outdir.join(relative_output_path(file, locale, options))
}

/// Source path relative to the base directory, slash-separated.
pub fn relative_source_path(file: &Path, options: &LocalithOptions) -> Result<String, LocalithError> {
    let base = options.resolved_base_dir();
    let relative = match file.strip_prefix(base) {
        Ok(stripped) => stripped,
        Err(_) if file.is_relative() => file,
        Err(_) => {
            return Err(LocalithError::PathOutsideBase {
                file: file.display().to_string(),
                base_dir: base.display().to_string(),
            })
        }
    };
    Ok(to_slash_path(relative))
}

/// Relative path prefix leading from this locale's output directory back to
/// the directory the source file occupies under the base directory.
///
/// Empty when the two directories coincide, which is the usual case for the
/// primary locale's `__file__` pattern. Prepending the delta to a relative
/// reference keeps it resolving to the same asset from the new location.
pub fn path_delta(
    file: &Path,
    locale: &str,
    options: &LocalithOptions,
) -> Result<String, LocalithError> {
    let relative = relative_source_path(file, options)?;
    let output = relative_output_path(&relative, locale, options);
    let output_dir = Path::new(&output).parent().unwrap_or_else(|| Path::new(""));
    let source_dir = Path::new(&relative).parent().unwrap_or_else(|| Path::new(""));
    Ok(relative_between(output_dir, source_dir))
}

/// Relative path from `from` to `to`, both given relative to a common root.
fn relative_between(from: &Path, to: &Path) -> String {
    let from = normal_components(from);
    let to = normal_components(to);
    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::new();
    for _ in common..from.len() {
        parts.push("..");
    }
    parts.extend(to[common..].iter().copied());
    parts.join("/")
}

fn normal_components(path: &Path) -> Vec<&str> {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect()
}

fn to_slash_path(path: &Path) -> String {
    normal_components(path).join("/")
}
