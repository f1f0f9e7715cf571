//! Dividers, icons, code, SVG, scripts and elements that produce nothing.

use serde_json::json;

use crate::builder::{BuildContext, ElementProcessor, ElementView, ProcessorResult};
use crate::output::ElementNode;
use crate::processors::media::code_node;
use crate::processors::set;

/// Elements with no visual counterpart.
pub(crate) const SKIPPED: &[&str] = &[
    "br", "style", "link", "meta", "title", "template", "noscript", "head", "base",
];

/// `<hr>` → `divider`.
pub struct DividerProcessor;

impl ElementProcessor for DividerProcessor {
    fn name(&self) -> &'static str {
        "divider"
    }

    fn can_handle(&self, view: &ElementView<'_>) -> bool {
        view.tag() == "hr"
    }

    fn process(&self, view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ProcessorResult {
        ProcessorResult::Leaf(ctx.node("divider", view.node))
    }
}

/// `<i>`/`<span>` with icon-font classes → `icon {icon {library, icon}}`.
pub struct IconProcessor;

impl ElementProcessor for IconProcessor {
    fn name(&self) -> &'static str {
        "icon"
    }

    fn can_handle(&self, view: &ElementView<'_>) -> bool {
        is_icon(view)
    }

    fn process(&self, view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ProcessorResult {
        ProcessorResult::Leaf(icon_node(view, ctx))
    }
}

/// Whether the element is an icon-font glyph.
pub(crate) fn is_icon(view: &ElementView<'_>) -> bool {
    view.is_any(&["i", "span"]) && icon_library(&view.classes()).is_some()
}

/// Icon library for a class list.
fn icon_library(classes: &[&str]) -> Option<&'static str> {
    let mut library = None;
    for &class in classes {
        let found = match class {
            "fas" | "fa-solid" => Some("fontawesomeSolid"),
            "far" | "fa-regular" => Some("fontawesomeRegular"),
            "fab" | "fa-brands" => Some("fontawesomeBrands"),
            "material-icons" => Some("material"),
            c if c == "bi" || c.starts_with("bi-") => Some("bootstrap"),
            c if c == "fa" || c.starts_with("fa-") => Some("fontawesomeSolid"),
            _ => None,
        };
        match (library, found) {
            // An explicit style class beats the generic `fa`.
            (Some("fontawesomeSolid"), Some(kind)) if kind != "fontawesomeSolid" => {
                library = Some(kind);
            }
            (None, Some(kind)) => library = Some(kind),
            _ => {}
        }
    }
    library
}

pub(crate) fn icon_node(view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ElementNode {
    let classes = view.classes();
    let library = icon_library(&classes).unwrap_or("fontawesomeSolid");
    let icon = if library == "material" {
        view.tree.text_content(view.node).trim().to_string()
    } else {
        classes.join(" ")
    };
    let mut node = ctx.node("icon", view.node);
    set(&mut node, "icon", json!({ "library": library, "icon": icon }));
    node
}

/// `<pre>` → `code {code, language?}`.
pub struct PreProcessor;

impl ElementProcessor for PreProcessor {
    fn name(&self) -> &'static str {
        "pre"
    }

    fn can_handle(&self, view: &ElementView<'_>) -> bool {
        view.tag() == "pre"
    }

    fn process(&self, view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ProcessorResult {
        let tree = view.tree;
        let language = std::iter::once(view)
            .chain(
                tree.element_children(view.node)
                    .filter_map(|n| view.view_of(n))
                    .filter(|c| c.tag() == "code"),
            )
            .flat_map(|v| v.classes())
            .find_map(|c| {
                c.strip_prefix("language-")
                    .or_else(|| c.strip_prefix("lang-"))
            });

        let mut node = ctx.node("code", view.node);
        set(&mut node, "code", tree.text_content(view.node));
        if let Some(language) = language {
            set(&mut node, "language", language);
        }
        ProcessorResult::Leaf(node)
    }
}

/// `<svg>` → terminal `svg {source: "code", code}`.
pub struct SvgProcessor;

impl ElementProcessor for SvgProcessor {
    fn name(&self) -> &'static str {
        "svg"
    }

    fn can_handle(&self, view: &ElementView<'_>) -> bool {
        view.tag().eq_ignore_ascii_case("svg")
    }

    fn process(&self, view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ProcessorResult {
        ProcessorResult::Leaf(svg_node(view, ctx))
    }
}

pub(crate) fn svg_node(view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ElementNode {
    let mut node = ctx.node("svg", view.node);
    set(&mut node, "source", "code");
    set(&mut node, "code", view.outer_html());
    node
}

/// `<script>` → `code`, only when scripts are included or the walk is over
/// `<head>`.
pub struct ScriptProcessor;

impl ElementProcessor for ScriptProcessor {
    fn name(&self) -> &'static str {
        "script"
    }

    fn can_handle(&self, view: &ElementView<'_>) -> bool {
        view.tag() == "script"
    }

    fn process(&self, view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ProcessorResult {
        if ctx.options.include_js || ctx.in_head_fallback() {
            ProcessorResult::Leaf(code_node(view, ctx))
        } else {
            ProcessorResult::Skip
        }
    }
}

/// `<br>`, `<style>`, `<meta>`, ... → nothing.
pub struct SkipProcessor;

impl ElementProcessor for SkipProcessor {
    fn name(&self) -> &'static str {
        "skip"
    }

    fn can_handle(&self, view: &ElementView<'_>) -> bool {
        view.is_any(SKIPPED)
    }

    fn process(&self, _view: ElementView<'_>, _ctx: &mut BuildContext<'_>) -> ProcessorResult {
        ProcessorResult::Skip
    }
}
