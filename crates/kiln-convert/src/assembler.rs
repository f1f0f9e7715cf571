//! Document Assembler.
//!
//! Combines built elements, global classes and the stylesheet's global CSS
//! into the output envelope.

use kiln_common::IdGenerator;
use kiln_css::StyleDeclarationMap;

use crate::classes::GlobalClassRegistry;
use crate::options::ConvertOptions;
use crate::output::{ElementNode, OutputDocument};

/// Class created to carry global CSS when the document has no class.
pub const GLOBAL_STYLES_CLASS: &str = "global-styles";

/// Stylesheet text that belongs to no element: `:root` styles, other
/// at-rules, keyframes and media blocks, in that order.
#[must_use]
pub fn global_css(styles: &StyleDeclarationMap) -> Option<String> {
    let parts: Vec<String> = styles
        .root_css()
        .into_iter()
        .chain(styles.other_at_rules.iter().cloned())
        .chain(styles.keyframes.iter().cloned())
        .chain(styles.media_queries.iter().cloned())
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join("\n\n"))
}

/// Build the output document. Global CSS goes to the first class, which is
/// created as [`GLOBAL_STYLES_CLASS`] when there is none.
#[must_use]
pub fn assemble(
    content: Vec<ElementNode>,
    mut classes: GlobalClassRegistry,
    styles: &StyleDeclarationMap,
    ids: &mut IdGenerator,
    options: &ConvertOptions,
) -> OutputDocument {
    if let Some(css) = global_css(styles) {
        if classes.is_empty() {
            let _ = classes.get_or_create(GLOBAL_STYLES_CLASS, ids);
        }
        if let Some(first) = classes.first_name().map(ToString::to_string) {
            classes.append_custom_css(&first, &css);
        }
    }

    OutputDocument {
        content,
        source: options.source.clone(),
        source_url: options.source_url.clone(),
        version: options.version.clone(),
        global_classes: classes.into_classes(),
        global_elements: Vec::new(),
    }
}
