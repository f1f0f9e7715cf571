//! Anchors.

use kiln_dom::NodeId;

use crate::builder::{BuildContext, ElementProcessor, ElementView, ProcessorResult};
use crate::output::ElementNode;
use crate::processors::media::image_node;
use crate::processors::{link_setting, set};

/// `<a>` → `text-link`, a linked `image`, or a `div {tag: "a"}` container.
pub struct LinkProcessor;

impl ElementProcessor for LinkProcessor {
    fn name(&self) -> &'static str {
        "link"
    }

    fn can_handle(&self, view: &ElementView<'_>) -> bool {
        view.tag() == "a"
    }

    fn process(&self, view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ProcessorResult {
        match link_node(view, ctx) {
            (node, true) => ProcessorResult::Container {
                node,
                owns_inline: false,
            },
            (node, false) => ProcessorResult::Leaf(node),
        }
    }
}

/// The node for an anchor, and whether its children still need walking.
pub(crate) fn link_node(view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> (ElementNode, bool) {
    let link = link_setting(view);

    if let Some(image) = sole_image(view) {
        let mut node = image_node(image, ctx);
        if let Some(link) = link {
            set(&mut node, "link", link);
        }
        return (node, false);
    }

    if view.has_block_child() {
        let mut node = ctx.node("div", view.node);
        set(&mut node, "tag", "a");
        if let Some(link) = link {
            set(&mut node, "link", link);
        }
        return (node, true);
    }

    let mut node = ctx.node("text-link", view.node);
    set(&mut node, "text", view.inner_html());
    if let Some(link) = link {
        set(&mut node, "link", link);
    }
    (node, false)
}

/// The anchor's only content, when that is an `<img>` or `<picture>`.
fn sole_image(view: ElementView<'_>) -> Option<ElementView<'_>> {
    let tree = view.tree;
    let mut image: Option<NodeId> = None;
    for &child in tree.children(view.node) {
        if let Some(text) = tree.as_text(child) {
            if text.trim().is_empty() {
                continue;
            }
            return None;
        }
        match tree.tag_name(child) {
            Some("img" | "picture") if image.is_none() => image = Some(child),
            Some(_) => return None,
            None => {}
        }
    }
    image.and_then(|node| view.view_of(node))
}
