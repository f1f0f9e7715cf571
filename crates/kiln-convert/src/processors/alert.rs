//! Alerts and notices.

use crate::builder::{BuildContext, ElementProcessor, ElementView, ProcessorResult};
use crate::processors::set;

/// Alert types, as suffixes of `alert-*`-style classes.
const ALERT_TYPES: &[&str] = &["success", "info", "warning", "danger", "muted"];

/// `.alert`, `.alert-*`, `.notice`, `.callout`, `.notification` →
/// `alert {content, type}`.
pub struct AlertProcessor;

impl ElementProcessor for AlertProcessor {
    fn name(&self) -> &'static str {
        "alert"
    }

    fn can_handle(&self, view: &ElementView<'_>) -> bool {
        view.any_class(|c| {
            matches!(c, "alert" | "notice" | "callout" | "notification") || c.starts_with("alert-")
        })
    }

    fn process(&self, view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ProcessorResult {
        let mut node = ctx.node("alert", view.node);
        set(&mut node, "content", view.inner_html());
        set(&mut node, "type", alert_type(&view.classes()));
        ProcessorResult::Leaf(node)
    }
}

/// Type from the last dash-separated part of any class; `error` reads as
/// `danger`. Defaults to `info`.
fn alert_type(classes: &[&str]) -> &'static str {
    for class in classes {
        let suffix = class.rsplit('-').next().unwrap_or(class);
        if suffix == "error" {
            return "danger";
        }
        if let Some(kind) = ALERT_TYPES.iter().copied().find(|t| *t == suffix) {
            return kind;
        }
    }
    "info"
}
