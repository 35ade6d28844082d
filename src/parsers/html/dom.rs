//! rcdom helpers: parsing, attribute access and tree surgery.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::OnceLock;

use encoding_rs::Encoding;
use html5ever::interface::{Attribute, QualName};
use html5ever::tendril::{format_tendril, TendrilSink};
use html5ever::{namespace_url, ns, parse_document, parse_fragment, LocalName, ParseOpts};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom};
use regex::Regex;
use tracing::warn;

/// Decode raw bytes using the given encoding label, falling back to lossy
/// UTF-8 when the label is unknown.
pub fn decode_bytes(data: &[u8], encoding_label: &str) -> String {
    if let Some(encoding) = Encoding::for_label(encoding_label.as_bytes()) {
        let (decoded, _, _) = encoding.decode(data);
        decoded.to_string()
    } else {
        warn!(label = encoding_label, "unknown encoding label, reading as UTF-8");
        String::from_utf8_lossy(data).to_string()
    }
}

fn comment_span_regex() -> &'static Regex {
    static COMMENT_SPAN: OnceLock<Regex> = OnceLock::new();
    COMMENT_SPAN.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").unwrap())
}

fn document_markup_regex() -> &'static Regex {
    static DOCUMENT_MARKUP: OnceLock<Regex> = OnceLock::new();
    DOCUMENT_MARKUP.get_or_init(|| Regex::new(r"(?i)<!doctype|<html[\s>]").unwrap())
}

/// Whether the markup is a complete document rather than a fragment.
///
/// Complete documents keep their html/head/body structure through a parse
/// and serialize round-trip; fragments must not gain one. Markup inside
/// comments is invisible to the sniff, so a bare conditional comment
/// wrapping an `<html>` tag still counts as a fragment.
pub fn is_document_markup(html: &str) -> bool {
    let visible = comment_span_regex().replace_all(html, "");
    document_markup_regex().is_match(&visible)
}

/// Parse a complete HTML document into a DOM.
pub fn html_to_dom(html: &str) -> RcDom {
    parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .unwrap()
}

/// Parse a markup fragment as it would appear inside the given context
/// element. The resulting DOM wraps the fragment in a synthetic root.
pub fn fragment_to_dom(html: &str, context: &str) -> RcDom {
    parse_fragment(
        RcDom::default(),
        ParseOpts::default(),
        QualName::new(None, ns!(html), LocalName::from(context)),
        vec![],
    )
    .from_utf8()
    .read_from(&mut html.as_bytes())
    .unwrap()
}

/// The synthetic root element wrapping a parsed fragment.
pub(crate) fn fragment_root(dom: &RcDom) -> Handle {
    dom.document
        .children
        .borrow()
        .first()
        .cloned()
        .expect("fragment DOM always has a root element")
}

/// Get the value of a node's attribute
pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    if let NodeData::Element { ref attrs, .. } = node.data {
        return attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == attr_name)
            .map(|attr| attr.value.to_string());
    }
    None
}

/// Get a node's element name
pub fn get_node_name(node: &Handle) -> Option<&'_ str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// Snapshot of a node's attributes as (name, value) pairs, in declaration
/// order. Mutating the node afterwards does not disturb the snapshot.
pub fn node_attrs(node: &Handle) -> Vec<(String, String)> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect(),
        _ => Vec::new(),
    }
}

/// Set, overwrite or (with `None`) remove a node's attribute.
pub fn set_node_attr(node: &Handle, attr_name: &str, attr_value: Option<String>) {
    if let NodeData::Element { ref attrs, .. } = node.data {
        let attrs_mut = &mut attrs.borrow_mut();
        match attr_value {
            Some(value) => {
                if let Some(existing) = attrs_mut
                    .iter_mut()
                    .find(|attr| &*attr.name.local == attr_name)
                {
                    existing.value.clear();
                    existing.value.push_slice(&value);
                } else {
                    attrs_mut.push(Attribute {
                        name: QualName::new(None, ns!(), LocalName::from(attr_name)),
                        value: format_tendril!("{}", value),
                    });
                }
            }
            None => attrs_mut.retain(|attr| &*attr.name.local != attr_name),
        }
    }
}

/// Get the parent of a node, if it has one.
pub fn get_parent_node(child: &Handle) -> Option<Handle> {
    let parent = child.parent.take();
    child.parent.set(parent.clone());
    parent.and_then(|weak| weak.upgrade())
}

/// Concatenated text content of all descendant text nodes.
pub fn node_text(node: &Handle) -> String {
    let mut text = String::new();
    collect_text(node, &mut text);
    text
}

fn collect_text(node: &Handle, out: &mut String) {
    if let NodeData::Text { ref contents } = node.data {
        out.push_str(&contents.borrow());
    }
    for child in node.children.borrow().iter() {
        collect_text(child, out);
    }
}

/// Replace the node's children with a single text node. The text is escaped
/// on serialization, never parsed as markup.
pub fn set_node_text(node: &Handle, text: &str) {
    let text_node = Node::new(NodeData::Text {
        contents: RefCell::new(format_tendril!("{}", text)),
    });
    adopt_children(node, vec![text_node]);
}

/// Replace the node's children with markup parsed in the node's own element
/// context.
pub fn set_inner_markup(node: &Handle, markup: &str) {
    let context = get_node_name(node).unwrap_or("body").to_string();
    adopt_children(node, parse_fragment_nodes(markup, &context));
}

/// Whether this element is the document's (or a fragment's synthetic) root.
fn is_root_element(node: &Handle) -> bool {
    get_parent_node(node).map_or(true, |parent| matches!(parent.data, NodeData::Document))
}

/// Replace `node` within its parent by markup parsed as raw content.
pub fn replace_node_with_markup(node: &Handle, markup: &str) {
    let parent = match get_parent_node(node) {
        Some(parent) => parent,
        None => return,
    };
    // The synthetic fragment root is named `html`; parsing the replacement
    // in that context would grow a head/body shell around it.
    let context = if is_root_element(&parent) {
        "body".to_string()
    } else {
        get_node_name(&parent).unwrap_or("body").to_string()
    };
    let replacements = parse_fragment_nodes(markup, &context);

    let mut children = parent.children.borrow_mut();
    if let Some(position) = children.iter().position(|c| Rc::ptr_eq(c, node)) {
        children.remove(position);
        for (offset, new_child) in replacements.into_iter().enumerate() {
            new_child.parent.set(Some(Rc::downgrade(&parent)));
            children.insert(position + offset, new_child);
        }
    }
}

/// Overwrite a comment node's contents by swapping in a fresh comment node
/// (rcdom stores comment text immutably).
pub fn replace_comment_data(node: &Handle, data: &str) {
    let parent = match get_parent_node(node) {
        Some(parent) => parent,
        None => return,
    };
    let replacement = Node::new(NodeData::Comment {
        contents: format_tendril!("{}", data),
    });

    let mut children = parent.children.borrow_mut();
    if let Some(position) = children.iter().position(|c| Rc::ptr_eq(c, node)) {
        replacement.parent.set(Some(Rc::downgrade(&parent)));
        children[position] = replacement;
    }
}

fn parse_fragment_nodes(markup: &str, context: &str) -> Vec<Handle> {
    let dom = fragment_to_dom(markup, context);
    let root = fragment_root(&dom);
    let nodes: Vec<Handle> = root.children.borrow_mut().drain(..).collect();
    nodes
}

fn adopt_children(node: &Handle, new_children: Vec<Handle>) {
    let mut children = node.children.borrow_mut();
    children.clear();
    for child in new_children {
        child.parent.set(Some(Rc::downgrade(node)));
        children.push(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Searches below the synthetic fragment root, which is itself an element.
    fn first_element(dom: &RcDom) -> Handle {
        fn find(node: &Handle) -> Option<Handle> {
            for child in node.children.borrow().iter() {
                if let NodeData::Element { .. } = child.data {
                    return Some(child.clone());
                }
                if let Some(found) = find(child) {
                    return Some(found);
                }
            }
            None
        }
        find(&fragment_root(dom)).expect("fragment contains an element")
    }

    #[test]
    fn document_markup_detection() {
        assert!(is_document_markup("<!DOCTYPE html><html></html>"));
        assert!(is_document_markup("<html class=\"ie\">"));
        assert!(!is_document_markup("<p data-t=\"foo\"></p>"));
    }

    #[test]
    fn markup_inside_comments_does_not_look_like_a_document() {
        assert!(!is_document_markup(
            "<!--[if IE 6]><html class=\"ie\"><![endif]-->"
        ));
        assert!(is_document_markup(
            "<!-- note --><html><body></body></html>"
        ));
    }

    #[test]
    fn attributes_preserve_declaration_order() {
        let dom = fragment_to_dom("<input b=\"2\" a=\"1\" c=\"3\">", "body");
        let input = first_element(&dom);
        let names: Vec<String> = node_attrs(&input).into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn set_node_attr_adds_updates_and_removes() {
        let dom = fragment_to_dom("<p id=\"x\"></p>", "body");
        let p = first_element(&dom);

        set_node_attr(&p, "id", Some("y".to_string()));
        assert_eq!(get_node_attr(&p, "id"), Some("y".to_string()));

        set_node_attr(&p, "lang", Some("ja".to_string()));
        assert_eq!(get_node_attr(&p, "lang"), Some("ja".to_string()));

        set_node_attr(&p, "id", None);
        assert_eq!(get_node_attr(&p, "id"), None);
    }

    #[test]
    fn text_extraction_spans_descendants() {
        let dom = fragment_to_dom("<p>one<span>two</span></p>", "body");
        let p = first_element(&dom);
        assert_eq!(node_text(&p), "onetwo");
    }
}
