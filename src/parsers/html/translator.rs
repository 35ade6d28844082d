//! Content and attribute translation for selector-matched elements.

use markup5ever_rcdom::{Handle, NodeData};

use crate::core::{LocalithOptions, Selector};
use crate::resources::Translator;

use super::dom::{
    get_node_attr, node_attrs, node_text, replace_node_with_markup, set_inner_markup,
    set_node_attr, set_node_text,
};

/// Collect, in document order, every element matching the selector.
pub fn find_matches(node: &Handle, selector: &Selector) -> Vec<Handle> {
    let mut found = Vec::new();
    collect_matches(node, selector, &mut found);
    found
}

fn collect_matches(node: &Handle, selector: &Selector, found: &mut Vec<Handle>) {
    if let NodeData::Element { .. } = node.data {
        if selector.matches(node) {
            found.push(node.clone());
        }
    }
    for child in node.children.borrow().iter() {
        collect_matches(child, selector, found);
    }
}

/// Translate the content of one element matched by the content selector.
///
/// The key comes from the selector attribute when `use_attr` is set (the
/// marker is read before it is removed), falling back to the element's text
/// content. An empty key leaves the element untouched.
pub fn translate_node(node: &Handle, options: &LocalithOptions, translator: &Translator) {
    let mut key: Option<String> = None;
    if options.use_attr {
        if let Some(attr) = Selector::parse(&options.selector).attribute_name() {
            key = get_node_attr(node, attr);
            if options.remove_attr {
                set_node_attr(node, attr, None);
            }
        }
    }

    let key = match key.filter(|k| !k.is_empty()) {
        Some(key) => key,
        None => node_text(node),
    };
    if key.is_empty() {
        return;
    }

    let mut trans = translator.translate(&key);
    let interpolate_selector = Selector::parse(&options.interpolate_selector);
    let interpolate = interpolate_selector.matches(node);
    if interpolate {
        trans = translator.interpolate(&trans);
    }

    if options.replace {
        // The element itself is replaced wholesale; marker removal is moot.
        replace_node_with_markup(node, &trans);
        return;
    }
    if options.allow_html {
        set_inner_markup(node, &trans);
    } else {
        set_node_text(node, &trans);
    }

    if options.remove_attr && interpolate {
        if let Some(attr) = interpolate_selector.attribute_name() {
            set_node_attr(node, attr, None);
        }
    }
}

/// Translate the suffix-marked attributes of one element matched by the
/// attribute selector.
///
/// Note the asymmetric marker removal at the end: the attribute-selector
/// marker is only removed under `remove_attr`, while the interpolation
/// marker is always removed. This matches long-standing observed behavior.
pub fn translate_attributes(node: &Handle, options: &LocalithOptions, translator: &Translator) {
    let attr_selector = Selector::parse(&options.attr_selector);
    let selector_attr = attr_selector.attribute_name();
    let interpolate_selector = Selector::parse(&options.attr_interpolate_selector);
    let content_selector = Selector::parse(&options.selector);
    let content_attr = content_selector.attribute_name();

    let attrs = node_attrs(node);
    let interpolate = attrs
        .iter()
        .any(|(name, _)| name.ends_with(&options.attr_interpolate_suffix));

    for (name, value) in &attrs {
        if value.is_empty() || Some(name.as_str()) == selector_attr {
            continue;
        }
        if !name.ends_with(&options.attr_suffix) {
            continue;
        }

        // The content-selector attribute may itself carry the suffix; it
        // then doubles as a content marker and must keep its name.
        let is_data = options.use_attr && content_attr == Some(name.as_str());
        let target = if is_data {
            name.clone()
        } else {
            name[..name.len() - options.attr_suffix.len()].to_string()
        };

        // Interpolation supersedes the plain lookup: markers are resolved
        // against the raw attribute value, not the looked-up translation.
        let trans = if interpolate {
            translator.interpolate(value)
        } else {
            translator.translate(value)
        };
        set_node_attr(node, &target, Some(trans));
        if options.remove_attr && !is_data {
            set_node_attr(node, name, None);
        }
    }

    if let Some(attr) = selector_attr {
        if options.remove_attr {
            set_node_attr(node, attr, None);
        }
    }
    if let Some(attr) = interpolate_selector.attribute_name() {
        set_node_attr(node, attr, None);
    }
}
