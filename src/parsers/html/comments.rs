//! Translation of markup embedded in legacy IE conditional comments.

use std::sync::OnceLock;

use markup5ever_rcdom::{Handle, NodeData};
use regex::Regex;
use tracing::trace;

use crate::core::{translate, LocalithError, LocalithOptions};
use crate::resources::Translator;

use super::dom::replace_comment_data;

/// Depth-first walk translating every conditional comment under `node`.
///
/// Comments not matching the `[if ...]> ... <![endif]` pattern are left
/// untouched; text and other leaf nodes are skipped.
pub fn translate_conditional_comments(
    node: &Handle,
    locale: &str,
    options: &LocalithOptions,
    translator: &Translator,
) -> Result<(), LocalithError> {
    if let NodeData::Comment { ref contents } = node.data {
        return translate_conditional_comment(node, contents.as_ref(), locale, options, translator);
    }

    // Snapshot first: translating a comment swaps the node out of the
    // child list we would otherwise be iterating.
    let children: Vec<Handle> = node.children.borrow().iter().cloned().collect();
    for child in children {
        translate_conditional_comments(&child, locale, options, translator)?;
    }
    Ok(())
}

fn conditional_regex() -> &'static Regex {
    static CONDITIONAL: OnceLock<Regex> = OnceLock::new();
    CONDITIONAL
        .get_or_init(|| Regex::new(r"(?i)(\s*\[if .*?\]\s*>\s*)(.*?)(\s*<!\s*\[endif\]\s*)").unwrap())
}

fn closing_tag_regex() -> &'static Regex {
    static CLOSING_TAG: OnceLock<Regex> = OnceLock::new();
    CLOSING_TAG.get_or_init(|| Regex::new(r"</.+?>").unwrap())
}

fn translate_conditional_comment(
    node: &Handle,
    contents: &str,
    locale: &str,
    options: &LocalithOptions,
    translator: &Translator,
) -> Result<(), LocalithError> {
    let captures = match conditional_regex().captures(contents) {
        Some(captures) => captures,
        None => return Ok(()),
    };
    let prefix = &captures[1];
    let inner = captures[2].to_string();
    let suffix = &captures[3];

    let mut fragment = translate(&inner, locale, options, translator)?;

    // The secondary parse may auto-close elements the legacy markup
    // intentionally left open; strip closing tags the original comment
    // never contained so the conditional syntax survives.
    let closing_tags: Vec<String> = closing_tag_regex()
        .find_iter(&fragment)
        .map(|m| m.as_str().to_string())
        .collect();
    for tag in closing_tags {
        if !inner.contains(&tag) {
            fragment = fragment.replacen(&tag, "", 1);
        }
    }
    // Likewise for the empty head/body shell a document parse inserts when
    // the comment wraps a bare <html> tag.
    for tag in ["<head>", "<body>"] {
        if !inner.contains(tag) {
            fragment = fragment.replacen(tag, "", 1);
        }
    }

    trace!(locale, "translated conditional comment");
    replace_comment_data(node, &format!("{prefix}{fragment}{suffix}"));
    Ok(())
}
