use std::collections::HashMap;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use localith::core::{print_error_message, process_dir, LocalithOptions};
use localith::resources::FileFormat;

/// Generate per-locale copies of the static HTML files in a directory
#[derive(Parser, Debug)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// Directory containing the files to translate
    #[arg(value_hint = clap::ValueHint::DirPath)]
    directory: PathBuf,

    /// Primary locale; its outputs use the default pattern
    #[arg(short = 'l', long, default_value = "en")]
    locale: String,

    /// Locales to generate, comma separated (defaults to the primary locale)
    #[arg(short = 'i', long, value_delimiter = ',')]
    locales: Vec<String>,

    /// Content selector (bracketed attribute or plain element form)
    #[arg(short, long)]
    selector: Option<String>,

    /// Attribute-translation selector
    #[arg(long)]
    attr_selector: Option<String>,

    /// Base directory for resolving relative paths (defaults to DIRECTORY)
    #[arg(short = 'd', long, value_hint = clap::ValueHint::DirPath)]
    base_dir: Option<PathBuf>,

    /// Output directory
    #[arg(short = 'o', long, default_value = "i18n", value_hint = clap::ValueHint::DirPath)]
    output_dir: PathBuf,

    /// Output pattern for the primary locale
    #[arg(long)]
    output_default: Option<String>,

    /// Output pattern for the other locales
    #[arg(long)]
    output_other: Option<String>,

    /// JSON override table: locale -> relative file -> destination
    #[arg(long, value_name = "JSON")]
    output_override: Option<String>,

    /// Resource bundle format (json, yml)
    #[arg(short = 't', long, default_value = "json")]
    file_format: FileFormat,

    /// Directory containing the resource bundles (default: BASE_DIR/locales)
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    locales_path: Option<PathBuf>,

    /// Resource bundle file pattern
    #[arg(long)]
    locale_file: Option<String>,

    /// Bundles nest their translations under a top-level locale key
    #[arg(short = 'r', long = "root-key")]
    locale_root_key: bool,

    /// Replace matched elements wholesale with the translation
    #[arg(long)]
    replace: bool,

    /// Parse translations as markup instead of escaping them
    #[arg(long)]
    allow_html: bool,

    /// Translate markup inside IE conditional comments
    #[arg(long)]
    translate_conditional_comments: bool,

    /// Read translation keys from the selector attribute
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false, default_value_t = true)]
    use_attr: bool,

    /// Strip marker attributes from the output
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false, default_value_t = true)]
    remove_attr: bool,

    /// Rewrite relative asset paths for relocated outputs
    #[arg(short = 'f', long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false, default_value_t = true)]
    fix_paths: bool,

    /// Relative path prefixes to skip, comma separated
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<String>,

    /// Document character encoding
    #[arg(long, default_value = "utf-8")]
    encoding: String,
}

fn build_options(cli: &Cli) -> Result<LocalithOptions, String> {
    let mut options = LocalithOptions {
        locale: cli.locale.clone(),
        use_attr: cli.use_attr,
        remove_attr: cli.remove_attr,
        replace: cli.replace,
        allow_html: cli.allow_html,
        translate_conditional_comments: cli.translate_conditional_comments,
        fix_paths: cli.fix_paths,
        base_dir: cli.base_dir.clone(),
        output_dir: Some(cli.output_dir.clone()),
        locales_path: cli.locales_path.clone(),
        file_format: cli.file_format,
        locale_root_key: cli.locale_root_key,
        encoding: cli.encoding.clone(),
        exclude: cli.exclude.clone(),
        ..Default::default()
    };

    options.locales = if cli.locales.is_empty() {
        vec![cli.locale.clone()]
    } else {
        cli.locales.clone()
    };
    if let Some(selector) = &cli.selector {
        options.selector = selector.clone();
    }
    if let Some(attr_selector) = &cli.attr_selector {
        options.attr_selector = attr_selector.clone();
    }
    if let Some(output_default) = &cli.output_default {
        options.output_default = output_default.clone();
    }
    if let Some(output_other) = &cli.output_other {
        options.output_other = output_other.clone();
    }
    if let Some(locale_file) = &cli.locale_file {
        options.locale_file = locale_file.clone();
    }
    if let Some(raw) = &cli.output_override {
        options.output_override =
            serde_json::from_str::<HashMap<String, HashMap<String, String>>>(raw)
                .map_err(|e| format!("invalid --output-override table: {e}"))?;
    }

    Ok(options)
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let options = match build_options(&cli) {
        Ok(options) => options,
        Err(message) => {
            print_error_message(&message);
            process::exit(1);
        }
    };

    if let Err(error) = process_dir(&cli.directory, &options) {
        print_error_message(&format!("An error has occurred: {error}"));
        process::exit(1);
    }
}
