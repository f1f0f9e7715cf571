//! Fallback for elements no other processor claims.

use crate::builder::{BuildContext, ElementProcessor, ElementView, ProcessorResult};
use crate::processors::set;

/// Text-only elements → `text-basic {tag: "custom", customTag}`; anything
/// else → a `div {tag}` container.
pub struct GenericProcessor;

impl ElementProcessor for GenericProcessor {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn can_handle(&self, _view: &ElementView<'_>) -> bool {
        true
    }

    fn process(&self, view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ProcessorResult {
        let tag = view.tag();
        if view.is_leaf() && view.tree.has_visible_text(view.node) {
            let mut node = ctx.node("text-basic", view.node);
            set(&mut node, "tag", "custom");
            set(&mut node, "customTag", tag);
            set(&mut node, "text", view.inner_html());
            return ProcessorResult::Leaf(node);
        }
        let mut node = ctx.node("div", view.node);
        set(&mut node, "tag", tag);
        ProcessorResult::Container {
            node,
            owns_inline: false,
        }
    }
}
