//! Rewriting of relative asset references for relocated outputs.

use markup5ever_rcdom::{Handle, NodeData};

use crate::parsers::css::rewrite_style_urls;
use crate::utils::paths::is_absolute_reference;

use super::dom::{get_node_attr, set_node_attr};

/// Element/attribute pairs whose values reference relocatable assets.
const ASSET_REFERENCE_ATTRS: &[(&str, &str)] = &[
    ("audio", "src"),
    ("img", "src"),
    ("link", "href"),
    ("script", "src"),
    ("source", "src"),
    ("video", "src"),
];

/// Prepend `delta` to every relative asset reference under `node`, including
/// `url(...)` values in inline styles. Absolute and protocol-relative
/// references are never touched. The caller guarantees a non-empty delta.
pub fn rewrite_asset_references(node: &Handle, delta: &str) {
    if let NodeData::Element { ref name, .. } = node.data {
        let tag = name.local.as_ref();
        if let Some((_, attr)) = ASSET_REFERENCE_ATTRS.iter().find(|(t, _)| *t == tag) {
            if let Some(value) = get_node_attr(node, attr) {
                if !value.is_empty() && !is_absolute_reference(&value) {
                    set_node_attr(node, attr, Some(format!("{delta}/{value}")));
                }
            }
        }
        if let Some(style) = get_node_attr(node, "style") {
            let rewritten = rewrite_style_urls(&style, delta);
            if rewritten != style {
                set_node_attr(node, "style", Some(rewritten));
            }
        }
    }

    for child in node.children.borrow().iter() {
        rewrite_asset_references(child, delta);
    }
}
