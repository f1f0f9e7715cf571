//! Buttons.

use crate::builder::{BuildContext, ElementProcessor, ElementView, ProcessorResult};
use crate::output::ElementNode;
use crate::processors::{link_setting, set};

/// Classes that make an anchor or span a button.
const BUTTON_CLASSES: &[&str] = &["btn", "button", "cta"];

/// Tags the class heuristic applies to.
const BUTTON_LIKE_TAGS: &[&str] = &["a", "button", "span", "input"];

/// Style variants recognized in `btn-*` classes.
const STYLES: &[&str] = &[
    "primary",
    "secondary",
    "light",
    "dark",
    "muted",
    "info",
    "success",
    "warning",
    "danger",
];

/// `<button>`, `<input type=submit|button|reset>` and `.btn`-like anchors →
/// `button {text, tag, style?, size?, link?}`.
pub struct ButtonProcessor;

impl ElementProcessor for ButtonProcessor {
    fn name(&self) -> &'static str {
        "button"
    }

    fn can_handle(&self, view: &ElementView<'_>) -> bool {
        match view.tag() {
            "button" => true,
            "input" => matches!(
                view.attr("type").map(str::to_ascii_lowercase).as_deref(),
                Some("submit" | "button" | "reset")
            ),
            _ => is_button_class_element(view),
        }
    }

    fn process(&self, view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ProcessorResult {
        ProcessorResult::Leaf(button_node(view, ctx))
    }
}

/// Whether the element is button-like by class.
pub(crate) fn is_button_class_element(view: &ElementView<'_>) -> bool {
    view.is_any(BUTTON_LIKE_TAGS)
        && view.any_class(|c| {
            let c = c.to_ascii_lowercase();
            BUTTON_CLASSES.contains(&c.as_str())
                || (c.starts_with("btn-") && c != "btn-group" && c != "btn-toolbar")
        })
}

pub(crate) fn button_node(view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ElementNode {
    let mut node = ctx.node("button", view.node);
    let text = if view.tag() == "input" {
        view.attr("value").unwrap_or("Submit").to_string()
    } else {
        view.inner_html()
    };
    set(&mut node, "text", text);
    set(&mut node, "tag", if view.tag() == "a" { "a" } else { "button" });

    for class in view.classes() {
        let class = class.to_ascii_lowercase();
        let Some(variant) = class.strip_prefix("btn-") else {
            continue;
        };
        let (outline, variant) = variant
            .strip_prefix("outline-")
            .map_or((false, variant), |v| (true, v));
        if STYLES.contains(&variant) {
            set(&mut node, "style", variant);
            if outline {
                set(&mut node, "outline", true);
            }
        } else if matches!(variant, "sm" | "md" | "lg" | "xl") {
            set(&mut node, "size", variant);
        }
    }
    if let Some(link) = link_setting(view) {
        set(&mut node, "link", link);
    }
    node
}
