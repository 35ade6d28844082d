//! HTML tree transforms: parsing, translation, conditional comments, asset
//! path rewriting and serialization.

mod assets;
mod comments;
mod dom;
mod serializer;
mod translator;

pub use assets::rewrite_asset_references;
pub use comments::translate_conditional_comments;
pub use dom::{
    decode_bytes, fragment_to_dom, get_node_attr, get_node_name, get_parent_node, html_to_dom,
    is_document_markup, node_attrs, node_text, replace_node_with_markup, set_inner_markup,
    set_node_attr, set_node_text,
};
pub use serializer::{encode_bytes, serialize_dom};
pub use translator::{find_matches, translate_attributes, translate_node};
