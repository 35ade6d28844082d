// Relative asset references in relocated outputs.

mod common {
    include!("common/mod.rs");
}

use std::path::PathBuf;

use common::sample_translator;
use localith::core::{translate, LocalithOptions};

fn options() -> LocalithOptions {
    LocalithOptions {
        locales: vec!["en".to_string(), "ja".to_string()],
        file: Some(PathBuf::from("index.html")),
        ..Default::default()
    }
}

#[test]
fn primary_locale_output_keeps_references_verbatim() {
    let translator = sample_translator("en");
    let result = translate(
        "<script src=\"foo.js\"></script>",
        "en",
        &options(),
        &translator,
    )
    .unwrap();
    assert_eq!(result, "<script src=\"foo.js\"></script>");
}

#[test]
fn relocated_outputs_climb_back_to_the_source_directory() {
    let translator = sample_translator("ja");
    let result = translate(
        "<script src=\"foo.js\"></script>",
        "ja",
        &options(),
        &translator,
    )
    .unwrap();
    assert_eq!(result, "<script src=\"../foo.js\"></script>");
}

#[test]
fn absolute_and_protocol_relative_references_are_never_touched() {
    let translator = sample_translator("ja");
    let result = translate(
        "<script src=\"//foo.js\"></script><script src=\"/rooted.js\"></script>\
         <script src=\"https://cdn.example.com/lib.js\"></script>",
        "ja",
        &options(),
        &translator,
    )
    .unwrap();
    assert!(result.contains("src=\"//foo.js\""));
    assert!(result.contains("src=\"/rooted.js\""));
    assert!(result.contains("src=\"https://cdn.example.com/lib.js\""));
}

#[test]
fn all_reference_bearing_elements_are_rewritten() {
    let translator = sample_translator("ja");
    let result = translate(
        "<img src=\"pic.png\"><audio src=\"a.ogg\"></audio>\
         <video src=\"v.mp4\"></video><link href=\"style.css\">",
        "ja",
        &options(),
        &translator,
    )
    .unwrap();
    assert!(result.contains("src=\"../pic.png\""));
    assert!(result.contains("src=\"../a.ogg\""));
    assert!(result.contains("src=\"../v.mp4\""));
    assert!(result.contains("href=\"../style.css\""));
}

#[test]
fn inline_style_urls_are_rewritten_with_single_quotes() {
    let translator = sample_translator("ja");
    let result = translate(
        "<div style=\"background: url(bg.jpg)\"></div>",
        "ja",
        &options(),
        &translator,
    )
    .unwrap();
    assert!(result.contains("url('../bg.jpg')"));
}

#[test]
fn inline_style_absolute_urls_keep_their_quoting() {
    let translator = sample_translator("ja");
    let result = translate(
        "<div style='background: url(\"/bg.jpg\")'></div>",
        "ja",
        &options(),
        &translator,
    )
    .unwrap();
    assert!(result.contains("url(&quot;/bg.jpg&quot;)"));
}

#[test]
fn subdirectory_sources_get_a_deeper_delta() {
    let translator = sample_translator("ja");
    let opts = LocalithOptions {
        file: Some(PathBuf::from("sub/index.html")),
        ..options()
    };
    let result = translate(
        "<script src=\"foo.js\"></script>",
        "ja",
        &opts,
        &translator,
    )
    .unwrap();
    assert_eq!(result, "<script src=\"../../sub/foo.js\"></script>");
}

#[test]
fn no_rewriting_without_a_file_context() {
    let translator = sample_translator("ja");
    let opts = LocalithOptions {
        file: None,
        ..options()
    };
    let result = translate(
        "<script src=\"foo.js\"></script>",
        "ja",
        &opts,
        &translator,
    )
    .unwrap();
    assert_eq!(result, "<script src=\"foo.js\"></script>");
}

#[test]
fn fix_paths_can_be_disabled() {
    let translator = sample_translator("ja");
    let opts = LocalithOptions {
        fix_paths: false,
        ..options()
    };
    let result = translate(
        "<script src=\"foo.js\"></script>",
        "ja",
        &opts,
        &translator,
    )
    .unwrap();
    assert_eq!(result, "<script src=\"foo.js\"></script>");
}
