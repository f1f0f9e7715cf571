//! Lists.

use crate::builder::{BuildContext, ElementProcessor, ElementView, ProcessorResult};
use crate::processors::{is_block_tag, set};

/// `<ul>`, `<ol>`, `<dl>` → `div {tag}` containers.
pub struct ListProcessor;

impl ElementProcessor for ListProcessor {
    fn name(&self) -> &'static str {
        "list"
    }

    fn can_handle(&self, view: &ElementView<'_>) -> bool {
        view.is_any(&["ul", "ol", "dl"])
    }

    fn process(&self, view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ProcessorResult {
        let mut node = ctx.node("div", view.node);
        set(&mut node, "tag", view.tag());
        ProcessorResult::Container {
            node,
            owns_inline: false,
        }
    }
}

/// `<li>`: inline-only items become `text-basic {tag: "li"}`; items with
/// block children become a `div {tag: "li"}` container whose own inline
/// content is folded into `text`.
pub struct ListItemProcessor;

impl ElementProcessor for ListItemProcessor {
    fn name(&self) -> &'static str {
        "list-item"
    }

    fn can_handle(&self, view: &ElementView<'_>) -> bool {
        view.tag() == "li"
    }

    fn process(&self, view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ProcessorResult {
        if !view.has_block_child() {
            let mut node = ctx.node("text-basic", view.node);
            set(&mut node, "tag", "li");
            set(&mut node, "text", view.inner_html());
            return ProcessorResult::Leaf(node);
        }

        let mut node = ctx.node("div", view.node);
        set(&mut node, "tag", "li");
        let inline = inline_html(view);
        if !inline.is_empty() {
            set(&mut node, "text", inline);
        }
        ProcessorResult::Container {
            node,
            owns_inline: true,
        }
    }
}

/// Markup of the element's inline children only.
fn inline_html(view: ElementView<'_>) -> String {
    let tree = view.tree;
    let mut out = String::new();
    for &child in tree.children(view.node) {
        let inline = tree
            .tag_name(child)
            .is_none_or(|tag| !is_block_tag(tag));
        if inline {
            out.push_str(&tree.outer_html(child));
        }
    }
    out.trim().to_string()
}
