//! HTML and CSS to site-builder element trees.
//!
//! # Scope
//!
//! This crate provides:
//! - **Element Tree Builder** - processors that turn DOM elements into
//!   builder elements, walked with an explicit stack
//! - **Global Style Class Registry** - one deduplicated class per source class
//! - **Document Assembler** - the output envelope with global CSS attached
//! - **Options** - inline style policy, custom CSS scoping, labels, scripts
//!
//! # Example
//!
//! ```
//! use kiln_convert::{ConvertOptions, convert};
//!
//! let doc = convert(
//!     r#"<h1 class="title">Hello</h1>"#,
//!     ".title { color: #ff0000; font-size: 32px }",
//!     "",
//!     &ConvertOptions::default(),
//! );
//! assert_eq!(doc.content[0].name, "heading");
//! assert_eq!(doc.global_classes[0].name, "title");
//! ```

pub mod assembler;
pub mod builder;
pub mod classes;
pub mod error;
pub mod options;
pub mod output;
pub mod processors;
mod styling;

pub use builder::{BuildContext, ElementProcessor, ElementView, ProcessorRegistry, ProcessorResult};
pub use classes::GlobalClassRegistry;
pub use error::ConvertError;
pub use options::{ConvertOptions, CssSelectorTarget, InlineStyleHandling};
pub use output::{ConversionReport, ElementNode, GlobalStyleClass, OutputDocument};

use kiln_common::warning::{clear_warnings, warn_once};
use kiln_css::{StyleDeclarationMap, try_compile_stylesheet};
use kiln_html::parse_html;
use serde_json::Value;

/// Convert an HTML fragment or document with its stylesheet and script.
///
/// Never fails: malformed CSS converts unstyled, and any declaration or
/// selector that cannot be represented degrades to custom CSS or is skipped.
#[must_use]
pub fn convert(html: &str, css: &str, js: &str, options: &ConvertOptions) -> OutputDocument {
    convert_with_report(html, css, js, options).document
}

/// [`convert`], also returning the issues met along the way. Warnings are
/// deduplicated per call; each listed issue appears once.
#[must_use]
pub fn convert_with_report(
    html: &str,
    css: &str,
    js: &str,
    options: &ConvertOptions,
) -> ConversionReport {
    clear_warnings();
    let tree = parse_html(html);
    let mut issues = Vec::new();
    let styles = try_compile_stylesheet(css).unwrap_or_else(|err| {
        let message = format!("stylesheet ignored: {err}");
        let _ = warn_once("CSS", &message);
        issues.push(message);
        StyleDeclarationMap::default()
    });

    let registry = processors::default_registry();
    let mut ctx = BuildContext::new(&tree, &styles, options);
    let mut content = builder::build(&mut ctx, &registry);

    if options.include_js && !js.trim().is_empty() {
        let mut node = ElementNode::new(ctx.ids.next_id(), "code");
        let _ = node.settings.insert(
            "code".to_string(),
            Value::String(format!("<script>\n{}\n</script>", js.trim())),
        );
        content.push(node);
    }

    issues.extend(ctx.take_issues());
    let BuildContext {
        classes, mut ids, ..
    } = ctx;
    let document = assembler::assemble(content, classes, &styles, &mut ids, options);
    ConversionReport { document, issues }
}
