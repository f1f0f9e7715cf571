//! Headings and text.

use crate::builder::{BuildContext, ElementProcessor, ElementView, ProcessorResult};
use crate::processors::set;

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Inline formatting tags promoted to their own text element when they
/// appear directly in a block container.
const INLINE_FORMATTING: &[&str] = &[
    "strong", "b", "em", "i", "small", "u", "mark", "code", "blockquote", "sub", "sup", "abbr",
    "cite", "q", "s", "del", "ins", "time", "kbd",
];

/// Text-bearing elements that keep their own tag.
const LABEL_TEXT: &[&str] = &["figcaption", "summary", "label", "dt", "dd"];

/// `<h1>`..`<h6>` → `heading {tag, text}`.
pub struct HeadingProcessor;

impl ElementProcessor for HeadingProcessor {
    fn name(&self) -> &'static str {
        "heading"
    }

    fn can_handle(&self, view: &ElementView<'_>) -> bool {
        view.is_any(HEADINGS)
    }

    fn process(&self, view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ProcessorResult {
        let mut node = ctx.node("heading", view.node);
        set(&mut node, "tag", view.tag());
        set(&mut node, "text", view.inner_html());
        ProcessorResult::Leaf(node)
    }
}

/// `<p>` and `<span>` → `text-basic {tag, text}`; dropped when empty.
pub struct TextProcessor;

impl ElementProcessor for TextProcessor {
    fn name(&self) -> &'static str {
        "text"
    }

    fn can_handle(&self, view: &ElementView<'_>) -> bool {
        view.is_any(&["p", "span"])
    }

    fn process(&self, view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ProcessorResult {
        if view.is_empty() {
            return ProcessorResult::Skip;
        }
        let mut node = ctx.node("text-basic", view.node);
        set(&mut node, "tag", view.tag());
        set(&mut node, "text", view.inner_html());
        ProcessorResult::Leaf(node)
    }
}

/// Standalone inline formatting → `text-basic {tag: "custom", customTag}`.
pub struct InlineTextProcessor;

impl ElementProcessor for InlineTextProcessor {
    fn name(&self) -> &'static str {
        "inline-text"
    }

    fn can_handle(&self, view: &ElementView<'_>) -> bool {
        view.is_any(INLINE_FORMATTING)
    }

    fn process(&self, view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ProcessorResult {
        let mut node = ctx.node("text-basic", view.node);
        set(&mut node, "tag", "custom");
        set(&mut node, "customTag", view.tag());
        set(&mut node, "text", view.inner_html());
        ProcessorResult::Leaf(node)
    }
}

/// `<figcaption>`, `<label>`, `<dt>`, ... → `text-basic {tag, text}`.
pub struct LabelTextProcessor;

impl ElementProcessor for LabelTextProcessor {
    fn name(&self) -> &'static str {
        "label-text"
    }

    fn can_handle(&self, view: &ElementView<'_>) -> bool {
        view.is_any(LABEL_TEXT)
    }

    fn process(&self, view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ProcessorResult {
        let mut node = ctx.node("text-basic", view.node);
        set(&mut node, "tag", view.tag());
        set(&mut node, "text", view.inner_html());
        ProcessorResult::Leaf(node)
    }
}
