//! [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)
//!
//! Processors embed markup (heading text with inline tags, SVG source,
//! `pre` blocks) as strings, so the tree needs to turn subtrees back into HTML.

use crate::{DomTree, NodeId, NodeType};

/// "If current node is an area, base, basefont, bgsound, br, col, embed,
/// frame, hr, img, input, keygen, link, meta, param, source, track or wbr
/// element, then continue on to the next child node at this point."
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Elements whose text children are emitted literally.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// Whether `tag` is a void element (no end tag, no children).
#[must_use]
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// "Escaping a string ... in attribute mode": `&`, NBSP and `"`.
#[must_use]
pub fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// "Escaping a string ... not in attribute mode": `&`, NBSP, `<` and `>`.
#[must_use]
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

enum Step {
    Open(NodeId),
    Close(NodeId),
}

impl DomTree {
    /// Serialize the children of `id` (the `innerHTML` getter).
    #[must_use]
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_subtree(child, &mut out);
        }
        out
    }

    /// Serialize `id` itself and its subtree (the `outerHTML` getter).
    #[must_use]
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_subtree(id, &mut out);
        out
    }

    fn write_subtree(&self, root: NodeId, out: &mut String) {
        let mut stack = vec![Step::Open(root)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Close(id) => {
                    if let Some(element) = self.as_element(id) {
                        out.push_str("</");
                        out.push_str(&element.tag_name);
                        out.push('>');
                    }
                }
                Step::Open(id) => {
                    let Some(node) = self.get(id) else { continue };
                    match &node.node_type {
                        NodeType::Document => {
                            stack.extend(node.children.iter().rev().map(|&c| Step::Open(c)));
                        }
                        NodeType::Text(text) => {
                            let raw = self
                                .parent(id)
                                .and_then(|p| self.tag_name(p))
                                .is_some_and(|t| RAW_TEXT_ELEMENTS.contains(&t));
                            if raw {
                                out.push_str(text);
                            } else {
                                out.push_str(&escape_text(text));
                            }
                        }
                        NodeType::Comment(text) => {
                            out.push_str("<!--");
                            out.push_str(text);
                            out.push_str("-->");
                        }
                        NodeType::Element(element) => {
                            out.push('<');
                            out.push_str(&element.tag_name);
                            for (name, value) in &element.attrs {
                                out.push(' ');
                                out.push_str(name);
                                out.push_str("=\"");
                                out.push_str(&escape_attribute(value));
                                out.push('"');
                            }
                            out.push('>');
                            if is_void_element(&element.tag_name) {
                                continue;
                            }
                            stack.push(Step::Close(id));
                            stack.extend(node.children.iter().rev().map(|&c| Step::Open(c)));
                        }
                    }
                }
            }
        }
    }
}
