//! Layout elements: sections, containers and generic blocks.

use crate::builder::{BuildContext, ElementProcessor, ElementView, ProcessorResult};
use crate::processors::set;

/// Class name segments that mark a `div` as a layout container.
const CONTAINER_HINTS: &[&str] = &["container", "wrapper", "inner", "boxed"];

/// Semantic blocks kept as a `div` carrying their tag.
const SEMANTIC_BLOCKS: &[&str] = &[
    "header", "footer", "main", "article", "aside", "figure", "address", "details", "fieldset",
    "hgroup",
];

/// `<section>` → `section`.
pub struct SectionProcessor;

impl ElementProcessor for SectionProcessor {
    fn name(&self) -> &'static str {
        "section"
    }

    fn can_handle(&self, view: &ElementView<'_>) -> bool {
        view.tag() == "section"
    }

    fn process(&self, view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ProcessorResult {
        ProcessorResult::Container {
            node: ctx.node("section", view.node),
            owns_inline: false,
        }
    }
}

/// `<div class="container">` and friends → `container`.
pub struct ContainerProcessor;

impl ElementProcessor for ContainerProcessor {
    fn name(&self) -> &'static str {
        "container"
    }

    fn can_handle(&self, view: &ElementView<'_>) -> bool {
        view.tag() == "div" && view.any_class(is_container_class)
    }

    fn process(&self, view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ProcessorResult {
        ProcessorResult::Container {
            node: ctx.node("container", view.node),
            owns_inline: false,
        }
    }
}

/// `page-inner` and `main_wrapper` qualify; `spinner` does not.
fn is_container_class(class: &str) -> bool {
    class
        .split(['-', '_'])
        .any(|segment| CONTAINER_HINTS.iter().any(|hint| segment.eq_ignore_ascii_case(hint)))
}

/// `<div>` → `div`. Never pruned, even when empty.
pub struct DivProcessor;

impl ElementProcessor for DivProcessor {
    fn name(&self) -> &'static str {
        "div"
    }

    fn can_handle(&self, view: &ElementView<'_>) -> bool {
        view.tag() == "div"
    }

    fn process(&self, view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ProcessorResult {
        ProcessorResult::Container {
            node: ctx.node("div", view.node),
            owns_inline: false,
        }
    }
}

/// `<header>`, `<article>`, ... → `div` with `tag`.
pub struct SemanticBlockProcessor;

impl ElementProcessor for SemanticBlockProcessor {
    fn name(&self) -> &'static str {
        "semantic-block"
    }

    fn can_handle(&self, view: &ElementView<'_>) -> bool {
        view.is_any(SEMANTIC_BLOCKS)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_class_matches_whole_segments() {
        assert!(is_container_class("container"));
        assert!(is_container_class("page-inner"));
        assert!(is_container_class("Main_Wrapper"));
        assert!(is_container_class("boxed-layout"));
        assert!(!is_container_class("spinner"));
        assert!(!is_container_class("containers"));
        assert!(!is_container_class("dinner-menu"));
    }
}
