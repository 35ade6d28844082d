//! Options, errors and the per-locale processing logic.
//!
//! The entry points mirror the three granularities a caller works at:
//! [`translate`] transforms one markup string for one locale, [`process`]
//! fans a document out over every requested locale, and [`process_file`] /
//! [`process_dir`] add file context, output destinations and persistence on
//! top of that.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use markup5ever_rcdom::Handle;
use thiserror::Error;
use tracing::debug;

use crate::parsers::html::{
    decode_bytes, encode_bytes, find_matches, fragment_to_dom, get_node_attr, get_node_name,
    html_to_dom, is_document_markup, rewrite_asset_references, serialize_dom, translate_attributes,
    translate_conditional_comments, translate_node,
};
use crate::resources::{load_translator, FileFormat, Translator};
use crate::utils::paths::{output_destination, path_delta, relative_source_path};

const ANSI_COLOR_RED: &str = "\x1b[31m";
const ANSI_COLOR_RESET: &str = "\x1b[0m";

/// Represents errors that can occur while localizing documents.
///
/// Lookup misses are deliberately not represented here; the
/// [`Translator`](crate::resources::Translator) falls back to the key itself
/// and never interrupts a transform.
#[derive(Error, Debug)]
pub enum LocalithError {
    /// The resource bundle for a locale is absent or unreadable. Fatal for
    /// the whole locale batch of the document being processed.
    #[error("[{locale}] failed to read resource bundle {path}: {source}")]
    MissingResource {
        locale: String,
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The resource bundle exists but is not valid JSON/YAML.
    #[error("[{locale}] failed to parse resource bundle: {message}")]
    InvalidResource { locale: String, message: String },

    /// A source file cannot be expressed relative to the base directory, so
    /// no output location can be computed for it.
    #[error("file {file} is not reachable from base directory {base_dir}")]
    PathOutsideBase { file: String, base_dir: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A selector configuration string, parsed once into its tagged form.
///
/// The bracketed single-attribute form (`[data-t]`) keys extraction off an
/// attribute; plain element and class selectors only ever extract from text
/// content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    /// `[name]` - matches elements carrying the attribute
    Attribute(String),
    /// `.name` - matches elements with the class
    Class(String),
    /// `name` - matches elements by tag name
    Tag(String),
}

impl Selector {
    pub fn parse(selector: &str) -> Selector {
        let trimmed = selector.trim();
        if let Some(inner) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            Selector::Attribute(inner.to_string())
        } else if let Some(class) = trimmed.strip_prefix('.') {
            Selector::Class(class.to_string())
        } else {
            Selector::Tag(trimmed.to_string())
        }
    }

    /// The attribute name of a bracketed selector, `None` for other forms.
    pub fn attribute_name(&self) -> Option<&str> {
        match self {
            Selector::Attribute(name) => Some(name),
            _ => None,
        }
    }

    pub fn matches(&self, node: &Handle) -> bool {
        match self {
            Selector::Attribute(name) => get_node_attr(node, name).is_some(),
            Selector::Class(class) => get_node_attr(node, "class")
                .map_or(false, |v| v.split_ascii_whitespace().any(|c| c == class)),
            Selector::Tag(tag) => get_node_name(node) == Some(tag.as_str()),
        }
    }
}

/// Configuration options controlling how documents are localized.
///
/// Defaults mirror the conventional `data-t` marker scheme: keys live in the
/// `data-t` attribute, suffixed attributes (`value-t`) translate into their
/// unsuffixed counterparts, markers are stripped from the output, and
/// relative asset paths are fixed up for relocated outputs.
#[derive(Clone, Debug)]
pub struct LocalithOptions {
    /// Selector for elements whose content is translated
    pub selector: String,
    /// Selector for elements carrying suffix-marked translatable attributes
    pub attr_selector: String,
    /// Selector marking content translations for `{{key}}` interpolation
    pub interpolate_selector: String,
    /// Selector marking attribute translations for `{{key}}` interpolation
    pub attr_interpolate_selector: String,
    /// Suffix marking an attribute as the translation source of its
    /// unsuffixed sibling
    pub attr_suffix: String,
    /// Suffix enabling interpolation for an element's attribute translations
    pub attr_interpolate_suffix: String,
    /// Read translation keys from the selector attribute
    pub use_attr: bool,
    /// Strip marker attributes from the output
    pub remove_attr: bool,
    /// Replace matched elements wholesale with the translation
    pub replace: bool,
    /// Parse translations as markup instead of escaping them
    pub allow_html: bool,
    /// Translate markup embedded in IE conditional comments
    pub translate_conditional_comments: bool,
    /// Rewrite relative asset paths for relocated outputs
    pub fix_paths: bool,
    /// Locales to generate, in processing order
    pub locales: Vec<String>,
    /// Primary locale; its output uses `output_default`
    pub locale: String,
    /// Base directory for resolving relative paths (defaults to `.`, or to
    /// the directory passed to [`process_dir`])
    pub base_dir: Option<PathBuf>,
    /// Source file being processed; enables path rewriting
    pub file: Option<PathBuf>,
    /// Output directory; `None` keeps results in memory
    pub output_dir: Option<PathBuf>,
    /// Output pattern for the primary locale
    pub output_default: String,
    /// Output pattern for all other locales
    pub output_other: String,
    /// Exact destination overrides: locale -> relative source path -> pattern
    pub output_override: HashMap<String, HashMap<String, String>>,
    /// Directory containing resource bundles (defaults to `base_dir/locales`)
    pub locales_path: Option<PathBuf>,
    /// Bundle file pattern; `__lng__` and `__fmt__` are substituted
    pub locale_file: String,
    /// Bundle format used when the file extension is not recognized
    pub file_format: FileFormat,
    /// Bundles nest their translations under a top-level locale key
    pub locale_root_key: bool,
    /// Character encoding for reading sources and writing outputs
    pub encoding: String,
    /// Relative path prefixes excluded from directory batches
    pub exclude: Vec<String>,
}

impl Default for LocalithOptions {
    fn default() -> Self {
        LocalithOptions {
            selector: "[data-t]".to_string(),
            attr_selector: "[data-attr-t]".to_string(),
            interpolate_selector: "[data-t-interpolate]".to_string(),
            attr_interpolate_selector: "[data-attr-t-interpolate]".to_string(),
            attr_suffix: "-t".to_string(),
            attr_interpolate_suffix: "-t-interpolate".to_string(),
            use_attr: true,
            remove_attr: true,
            replace: false,
            allow_html: false,
            translate_conditional_comments: false,
            fix_paths: true,
            locales: vec!["en".to_string()],
            locale: "en".to_string(),
            base_dir: None,
            file: None,
            output_dir: None,
            output_default: "__file__".to_string(),
            output_other: "__lng__/__file__".to_string(),
            output_override: HashMap::new(),
            locales_path: None,
            locale_file: "__lng__.__fmt__".to_string(),
            file_format: FileFormat::Json,
            locale_root_key: false,
            encoding: "utf-8".to_string(),
            exclude: Vec::new(),
        }
    }
}

impl LocalithOptions {
    pub fn resolved_base_dir(&self) -> &Path {
        self.base_dir.as_deref().unwrap_or_else(|| Path::new("."))
    }

    /// Directory holding the resource bundles; relative paths are anchored
    /// at the base directory.
    pub fn resolved_locales_path(&self) -> PathBuf {
        match &self.locales_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.resolved_base_dir().join(path),
            None => self.resolved_base_dir().join("locales"),
        }
    }

    /// Bundle file name for one locale, with `__lng__` and `__fmt__`
    /// substituted.
    pub fn locale_file_name(&self, locale: &str) -> String {
        self.locale_file
            .replace("__lng__", locale)
            .replace("__fmt__", self.file_format.extension())
    }
}

/// Translates one markup string for one locale.
///
/// This is the pure fragment entry point: it parses a fresh tree from the
/// immutable input, applies conditional-comment translation, attribute and
/// content translation, and path rewriting, then serializes. The
/// conditional-comment translator calls back into this same function for the
/// markup embedded in each comment.
pub fn translate(
    html: &str,
    locale: &str,
    options: &LocalithOptions,
    translator: &Translator,
) -> Result<String, LocalithError> {
    let full_document = is_document_markup(html);
    let dom = if full_document {
        html_to_dom(html)
    } else {
        fragment_to_dom(html, "body")
    };

    if options.translate_conditional_comments {
        translate_conditional_comments(&dom.document, locale, options, translator)?;
    }

    let content_selector = Selector::parse(&options.selector);
    let attr_selector = Selector::parse(&options.attr_selector);

    // Content matches are captured before the attribute pass runs; the
    // attribute pass may rewrite the very attribute the content selector
    // keys on (the dual-role case).
    let content_nodes = find_matches(&dom.document, &content_selector);
    for node in find_matches(&dom.document, &attr_selector) {
        translate_attributes(&node, options, translator);
    }
    for node in &content_nodes {
        translate_node(node, options, translator);
    }

    if options.fix_paths {
        if let Some(file) = options.file.as_deref() {
            let delta = path_delta(file, locale, options)?;
            if !delta.is_empty() {
                rewrite_asset_references(&dom.document, &delta);
            }
        }
    }

    Ok(serialize_dom(&dom, full_document))
}

/// Runs the full transform once per requested locale.
///
/// Each locale pass parses a fresh copy of the raw source, so no locale's
/// mutations leak into another. Locales are visited in list order and the
/// first error aborts the remaining passes; duplicate entries overwrite
/// earlier results. The returned map has one entry per distinct locale.
pub fn process(
    html: &str,
    options: &LocalithOptions,
) -> Result<HashMap<String, String>, LocalithError> {
    let mut results: HashMap<String, String> = HashMap::new();
    for locale in &options.locales {
        let translator = load_translator(locale, options)?;
        debug!(locale, "translating document");
        let output = translate(html, locale, options, &translator)?;
        results.insert(locale.clone(), output);
    }
    Ok(results)
}

/// Processes one file and, when an output directory is configured, persists
/// one copy per locale at its computed destination.
pub fn process_file(
    file: &Path,
    options: &LocalithOptions,
) -> Result<HashMap<String, String>, LocalithError> {
    let mut options = options.clone();
    if options.file.is_none() {
        options.file = Some(file.to_path_buf());
    }

    let data = fs::read(file)?;
    let html = decode_bytes(&data, &options.encoding);
    let results = process(&html, &options)?;

    if options.output_dir.is_some() {
        write_outputs(file, &options, &results)?;
    }
    Ok(results)
}

/// Processes every `.html` file under `dir`, strictly sequentially, keyed by
/// path relative to `dir`.
///
/// Exclusion patterns are matched as prefixes of the path relative to the
/// base directory. The first failing file aborts the batch; outputs already
/// written for earlier files remain on disk.
pub fn process_dir(
    dir: &Path,
    options: &LocalithOptions,
) -> Result<HashMap<String, HashMap<String, String>>, LocalithError> {
    let mut options = options.clone();
    if options.base_dir.is_none() {
        options.base_dir = Some(dir.to_path_buf());
    }

    let mut files: Vec<PathBuf> = Vec::new();
    collect_html_files(dir, &mut files)?;
    files.sort();

    let mut results: HashMap<String, HashMap<String, String>> = HashMap::new();
    for file in files {
        let relative = relative_source_path(&file, &options)?;
        if should_exclude(&relative, &options.exclude) {
            debug!(file = %relative, "skipping excluded file");
            continue;
        }
        let mut file_options = options.clone();
        file_options.file = Some(file.clone());
        let translated = process_file(&file, &file_options)?;
        let key = file
            .strip_prefix(dir)
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or(relative);
        results.insert(key, translated);
    }
    Ok(results)
}

fn write_outputs(
    file: &Path,
    options: &LocalithOptions,
    results: &HashMap<String, String>,
) -> Result<(), LocalithError> {
    let relative = relative_source_path(file, options)?;
    for (locale, content) in results {
        let destination = output_destination(&relative, locale, options);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&destination, encode_bytes(content, &options.encoding))?;
        debug!(locale, destination = %destination.display(), "wrote translated document");
    }
    Ok(())
}

fn collect_html_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), LocalithError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_html_files(&path, files)?;
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| e.eq_ignore_ascii_case("html"))
        {
            files.push(path);
        }
    }
    Ok(())
}

fn should_exclude(relative: &str, exclude: &[String]) -> bool {
    exclude.iter().any(|prefix| relative.starts_with(prefix.as_str()))
}

/// Prints an error message to stderr
pub fn print_error_message(msg: &str) {
    eprintln!("{ANSI_COLOR_RED}{msg}{ANSI_COLOR_RESET}");
}
