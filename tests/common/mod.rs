// Shared helpers for the integration tests.

use localith::resources::Translator;
use serde_json::{json, Value};

pub fn sample_bundle(locale: &str) -> Value {
    let bar = if locale == "ja" { "ja_bar" } else { "bar" };
    json!({
        "foo": { "bar": bar },
        "lang": { "bar": "legacy", "attr": "legacy-attr" },
        "links": { "baseAbsolute": "http://www.example.com/", "extension": "html" },
        "greeting": "{{salutation}} there",
        "salutation": "hi",
        "markup": "<b>bold</b>"
    })
}

pub fn sample_translator(locale: &str) -> Translator {
    Translator::new(locale, sample_bundle(locale))
}
