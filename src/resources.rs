//! Resource bundle loading and the locale-bound lookup context.
//!
//! Bundles are plain key/value trees loaded from `locales/__lng__.__fmt__`
//! files (JSON or YAML). A loaded bundle is wrapped in a [`Translator`], an
//! explicit `(locale, bundle)` value passed through the transform; lookups
//! are pure and carry no process-wide state, so nothing prevents two locales
//! from being in flight at once.

use std::fs;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::core::{LocalithError, LocalithOptions};

/// Supported resource bundle formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    #[default]
    Json,
    Yaml,
}

impl FileFormat {
    /// Detect format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Extension substituted for `__fmt__` in the bundle file pattern.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yml",
        }
    }
}

impl std::str::FromStr for FileFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| format!("unsupported resource format: {s}"))
    }
}

fn marker_regex() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"\{\{([^{}]*)\}\}").unwrap())
}

/// Locale-bound lookup context: one locale identifier plus its loaded
/// resource bundle.
#[derive(Debug, Clone)]
pub struct Translator {
    locale: String,
    bundle: Value,
}

impl Translator {
    pub fn new(locale: impl Into<String>, bundle: Value) -> Self {
        Translator {
            locale: locale.into(),
            bundle,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Looks up a dot-separated key in the bundle.
    ///
    /// Misses fall back to the key itself, so an incomplete bundle never
    /// interrupts a transform.
    pub fn translate(&self, key: &str) -> String {
        self.lookup(key).unwrap_or_else(|| key.to_string())
    }

    fn lookup(&self, key: &str) -> Option<String> {
        let mut current = Some(&self.bundle);
        for segment in key.split('.') {
            current = current.and_then(|value| value.get(segment));
        }
        current
            // Keys containing dots may also exist verbatim at the top level
            .or_else(|| self.bundle.get(key))
            .and_then(Value::as_str)
            .map(str::to_owned)
    }

    /// Resolves `{{ key }}` markers via the bundle.
    ///
    /// Single pass: substituted text is never re-scanned for further
    /// markers.
    pub fn interpolate(&self, input: &str) -> String {
        marker_regex()
            .replace_all(input, |caps: &Captures| self.translate(caps[1].trim()))
            .into_owned()
    }
}

/// Loads the resource bundle for one locale and wraps it in a lookup
/// context.
///
/// The bundle path is `locales_path/locale_file` with `__lng__` and
/// `__fmt__` substituted. An absent or unparsable bundle is fatal for the
/// whole locale batch.
pub fn load_translator(
    locale: &str,
    options: &LocalithOptions,
) -> Result<Translator, LocalithError> {
    let path = options
        .resolved_locales_path()
        .join(options.locale_file_name(locale));
    let raw = fs::read_to_string(&path).map_err(|source| LocalithError::MissingResource {
        locale: locale.to_string(),
        path: path.display().to_string(),
        source,
    })?;

    let format = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(FileFormat::from_extension)
        .unwrap_or(options.file_format);
    let mut bundle = parse_bundle(&raw, format).map_err(|message| LocalithError::InvalidResource {
        locale: locale.to_string(),
        message,
    })?;
    if options.locale_root_key {
        bundle = bundle.get(locale).cloned().unwrap_or(Value::Null);
    }

    debug!(locale, path = %path.display(), "loaded resource bundle");
    Ok(Translator::new(locale, bundle))
}

fn parse_bundle(raw: &str, format: FileFormat) -> Result<Value, String> {
    match format {
        FileFormat::Json => serde_json::from_str(raw).map_err(|e| e.to_string()),
        FileFormat::Yaml => serde_yaml::from_str(raw).map_err(|e| e.to_string()),
    }
}
