//! HTML parsing for the kiln converter.
//!
//! Tokenization and tree construction are delegated to `html5ever`, which
//! implements the [WHATWG parsing algorithm](https://html.spec.whatwg.org/multipage/parsing.html)
//! including its error recovery. The reference-counted tree it produces is
//! then copied into a [`DomTree`] arena so the converter can walk it by index.
//!
//! Parsing never fails: malformed markup is repaired the way a browser would,
//! and fragments are wrapped in synthesized `html`/`head`/`body` elements.

use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use kiln_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

/// Parse an HTML document or fragment into an arena DOM.
///
/// # Example
/// ```
/// let tree = kiln_html::parse_html("<h1 class=\"title\">Hello</h1>");
/// let body = tree.body().unwrap();
/// let h1 = tree.element_children(body).next().unwrap();
/// assert_eq!(tree.tag_name(h1), Some("h1"));
/// ```
#[must_use]
pub fn parse_html(html: &str) -> DomTree {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
    into_arena(&dom.document)
}

/// Copy an rcdom tree into the arena, parents before children.
fn into_arena(document: &Handle) -> DomTree {
    let mut tree = DomTree::new();
    let mut stack: Vec<(Handle, NodeId)> = document
        .children
        .borrow()
        .iter()
        .rev()
        .map(|child| (child.clone(), NodeId::ROOT))
        .collect();

    while let Some((handle, parent)) = stack.pop() {
        let node_type = match &handle.data {
            NodeData::Element { name, attrs, .. } => {
                let mut map = AttributesMap::new();
                for attr in attrs.borrow().iter() {
                    let key = match &attr.name.prefix {
                        Some(prefix) => format!("{}:{}", prefix.as_ref(), attr.name.local.as_ref()),
                        None => attr.name.local.as_ref().to_string(),
                    };
                    let _ = map.entry(key).or_insert_with(|| attr.value.to_string());
                }
                NodeType::Element(ElementData {
                    tag_name: name.local.as_ref().to_string(),
                    attrs: map,
                })
            }
            NodeData::Text { contents } => NodeType::Text(contents.borrow().to_string()),
            NodeData::Comment { contents } => NodeType::Comment(contents.to_string()),
            // Doctypes and processing instructions carry nothing we convert.
            _ => continue,
        };

        let id = tree.alloc(node_type);
        tree.append_child(parent, id);
        for child in handle.children.borrow().iter().rev() {
            stack.push((child.clone(), id));
        }
    }
    tree
}
