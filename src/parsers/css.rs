//! Inline-style handling: rewriting `url(...)` references for relocated
//! outputs.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::utils::paths::is_absolute_reference;

fn url_regex() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| Regex::new(r#"(?i)url\( *['"`]?(.+?)['"`]? *\)"#).unwrap())
}

/// Prepend `delta` to every relative `url(...)` reference in an inline
/// style.
///
/// Rewritten values always come out single-quoted; values left untouched
/// (absolute or protocol-relative) keep their original quoting verbatim.
/// The asymmetry is a deliberate contract, not a normalization oversight.
pub fn rewrite_style_urls(style: &str, delta: &str) -> String {
    url_regex()
        .replace_all(style, |caps: &Captures| {
            let reference = &caps[1];
            if is_absolute_reference(reference) {
                caps[0].to_string()
            } else {
                format!("url('{delta}/{reference}')")
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_relative_urls_with_single_quotes() {
        let style = "background-image: url(bg.jpg); background: url(\"bg.jpg\")";
        assert_eq!(
            rewrite_style_urls(style, ".."),
            "background-image: url('../bg.jpg'); background: url('../bg.jpg')"
        );
    }

    #[test]
    fn absolute_urls_keep_their_original_quoting() {
        let style = "background-image: url(//bg.jpg); background: url('//bg.jpg')";
        assert_eq!(rewrite_style_urls(style, ".."), style);
    }

    #[test]
    fn rooted_urls_are_untouched() {
        let style = "background: url(/assets/bg.jpg)";
        assert_eq!(rewrite_style_urls(style, "../.."), style);
    }
}
