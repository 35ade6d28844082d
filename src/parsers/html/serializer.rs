//! Serialization of translated DOMs back to markup.

use encoding_rs::Encoding;
use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use markup5ever_rcdom::{RcDom, SerializableHandle};

use super::dom::fragment_root;

/// Serialize a DOM back to markup.
///
/// Fragment DOMs are serialized without the synthetic root wrapper so that
/// fragment input round-trips as a fragment instead of gaining an
/// html/head/body shell.
pub fn serialize_dom(dom: &RcDom, full_document: bool) -> String {
    let mut buf: Vec<u8> = Vec::new();
    if full_document {
        let serializable: SerializableHandle = dom.document.clone().into();
        serialize(&mut buf, &serializable, SerializeOpts::default())
            .expect("Unable to serialize DOM into buffer");
    } else {
        let serializable: SerializableHandle = fragment_root(dom).into();
        let opts = SerializeOpts {
            traversal_scope: TraversalScope::ChildrenOnly(None),
            ..Default::default()
        };
        serialize(&mut buf, &serializable, opts).expect("Unable to serialize DOM into buffer");
    }
    String::from_utf8_lossy(&buf).to_string()
}

/// Encode output using the given encoding label; unknown labels fall back
/// to UTF-8 bytes.
pub fn encode_bytes(content: &str, encoding_label: &str) -> Vec<u8> {
    if let Some(encoding) = Encoding::for_label(encoding_label.as_bytes()) {
        let (encoded, _, _) = encoding.encode(content);
        encoded.to_vec()
    } else {
        content.as_bytes().to_vec()
    }
}
