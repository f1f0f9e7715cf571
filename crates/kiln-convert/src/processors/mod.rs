//! Element processors.
//!
//! Each processor claims elements through
//! [`ElementProcessor::can_handle`] and turns them into output nodes. The
//! default registry checks class-based heuristics first, so an element such
//! as `<div class="alert-success">` reaches the alert processor before the
//! plain `div` one, then tag processors, then a generic fallback.

mod alert;
mod button;
mod form;
mod generic;
mod link;
mod list;
mod media;
mod misc;
mod navigation;
mod structure;
mod table;
mod text;

pub use alert::AlertProcessor;
pub use button::ButtonProcessor;
pub use form::{FormControlProcessor, FormProcessor};
pub use generic::GenericProcessor;
pub use link::LinkProcessor;
pub use list::{ListItemProcessor, ListProcessor};
pub use media::{AudioProcessor, EmbedProcessor, ImageProcessor, VideoProcessor};
pub use misc::{
    DividerProcessor, IconProcessor, PreProcessor, ScriptProcessor, SkipProcessor, SvgProcessor,
};
pub use navigation::NavigationProcessor;
pub use structure::{ContainerProcessor, DivProcessor, SectionProcessor, SemanticBlockProcessor};
pub use table::{TableCellProcessor, TableProcessor};
pub use text::{HeadingProcessor, InlineTextProcessor, LabelTextProcessor, TextProcessor};

use serde_json::{Value, json};

use crate::builder::{ElementView, ProcessorRegistry};
use crate::output::ElementNode;

/// Block-level tags. Anything else counts as inline content.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "audio", "blockquote", "details", "dialog", "div", "dl",
    "fieldset", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hgroup",
    "hr", "iframe", "li", "main", "nav", "ol", "p", "pre", "section", "table", "ul", "video",
];

/// Whether `tag` is block-level.
#[must_use]
pub fn is_block_tag(tag: &str) -> bool {
    BLOCK_TAGS.contains(&tag)
}

/// Registry with every built-in processor in resolution order.
#[must_use]
pub fn default_registry() -> ProcessorRegistry {
    let mut registry = ProcessorRegistry::new();
    // Class heuristics
    registry.register(AlertProcessor);
    registry.register(NavigationProcessor);
    registry.register(IconProcessor);
    registry.register(ButtonProcessor);
    registry.register(ContainerProcessor);
    // Tags
    registry.register(SkipProcessor);
    registry.register(ScriptProcessor);
    registry.register(SectionProcessor);
    registry.register(DivProcessor);
    registry.register(SemanticBlockProcessor);
    registry.register(HeadingProcessor);
    registry.register(TextProcessor);
    registry.register(InlineTextProcessor);
    registry.register(TableProcessor);
    registry.register(TableCellProcessor);
    registry.register(LabelTextProcessor);
    registry.register(LinkProcessor);
    registry.register(ImageProcessor);
    registry.register(ListProcessor);
    registry.register(ListItemProcessor);
    registry.register(FormProcessor);
    registry.register(FormControlProcessor);
    registry.register(VideoProcessor);
    registry.register(AudioProcessor);
    registry.register(EmbedProcessor);
    registry.register(DividerProcessor);
    registry.register(PreProcessor);
    registry.register(SvgProcessor);
    // Everything else
    registry.register(GenericProcessor);
    registry
}

/// Set a setting on a node.
pub(crate) fn set(node: &mut ElementNode, key: &str, value: impl Into<Value>) {
    let _ = node.settings.insert(key.to_string(), value.into());
}

/// `{type, url, newTab, rel?}` from an element's `href`, `target` and `rel`.
pub(crate) fn link_setting(view: ElementView<'_>) -> Option<Value> {
    let url = view.attr("href")?;
    let mut link = json!({
        "type": "external",
        "url": url,
        "newTab": view.attr("target") == Some("_blank"),
    });
    if let (Some(rel), Value::Object(map)) = (view.attr("rel"), &mut link) {
        let _ = map.insert("rel".to_string(), Value::String(rel.to_string()));
    }
    Some(link)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_tags() {
        assert!(is_block_tag("div"));
        assert!(is_block_tag("ul"));
        assert!(!is_block_tag("a"));
        assert!(!is_block_tag("strong"));
    }

    #[test]
    fn test_default_order_puts_heuristics_first() {
        let names = default_registry().names();
        assert_eq!(names.first(), Some(&"alert"));
        assert_eq!(names.last(), Some(&"generic"));
        let position = |n: &str| names.iter().position(|x| *x == n).unwrap();
        assert!(position("container") < position("div"));
        assert!(position("button") < position("link"));
        assert!(position("icon") < position("inline-text"));
    }
}
