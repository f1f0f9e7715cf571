//! Stylesheet compiler: CSS text to a [`StyleDeclarationMap`].
//!
//! Only top-level rules are walked. `@media` and `@keyframes` blocks are kept
//! whole as opaque text, and every other at-rule is kept verbatim too.

use indexmap::IndexMap;
use kiln_common::warning::warn_once;

use crate::error::CssError;
use crate::parser::{Declaration, Rule, parse_stylesheet};

/// One selector of one style rule, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleEntry {
    /// A single selector (selector lists are split).
    pub selector: String,
    /// The rule's declarations, shared by every selector in its list.
    pub declarations: Vec<Declaration>,
    /// Index of the rule in the stylesheet; later wins on equal specificity.
    pub source_order: usize,
}

/// Compiled stylesheet. Built once per conversion and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDeclarationMap {
    /// Every selector occurrence in source order.
    pub entries: Vec<RuleEntry>,
    /// Custom properties declared on `:root`.
    pub variables: IndexMap<String, String>,
    /// All `:root` declarations, custom properties included.
    pub root_styles: Vec<Declaration>,
    /// `@keyframes` rules as written.
    pub keyframes: Vec<String>,
    /// `@media` rules as written.
    pub media_queries: Vec<String>,
    /// Other at-rules (`@font-face`, `@import`, `@supports`, ...) as written.
    pub other_at_rules: Vec<String>,
}

impl StyleDeclarationMap {
    /// Whether nothing at all was compiled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
            && self.root_styles.is_empty()
            && self.keyframes.is_empty()
            && self.media_queries.is_empty()
            && self.other_at_rules.is_empty()
    }

    /// Declarations for a selector, concatenated across every rule using it.
    #[must_use]
    pub fn declarations_for(&self, selector: &str) -> Vec<&Declaration> {
        self.entries
            .iter()
            .filter(|e| e.selector == selector)
            .flat_map(|e| e.declarations.iter())
            .collect()
    }

    /// Distinct selectors in first-seen order.
    #[must_use]
    pub fn selectors(&self) -> Vec<&str> {
        let mut seen: IndexMap<&str, ()> = IndexMap::new();
        for entry in &self.entries {
            let _ = seen.insert(entry.selector.as_str(), ());
        }
        seen.into_keys().collect()
    }

    /// `:root { ... }` rebuilt from the root declarations.
    #[must_use]
    pub fn root_css(&self) -> Option<String> {
        if self.root_styles.is_empty() {
            return None;
        }
        let body: Vec<String> = self
            .root_styles
            .iter()
            .map(|d| {
                let important = if d.important { " !important" } else { "" };
                format!("  {}: {}{important};", d.name, d.value)
            })
            .collect();
        Some(format!(":root {{\n{}\n}}", body.join("\n")))
    }
}

/// Compile CSS text, reporting fatal failures.
///
/// # Errors
///
/// Returns the [`CssError`] produced by the parser.
pub fn try_compile_stylesheet(css: &str) -> Result<StyleDeclarationMap, CssError> {
    let sheet = parse_stylesheet(css)?;
    let mut map = StyleDeclarationMap::default();

    for (source_order, rule) in sheet.rules.into_iter().enumerate() {
        match rule {
            Rule::Style(style) => {
                for selector in &style.selectors {
                    if selector == ":root" {
                        for declaration in &style.declarations {
                            if declaration.name.starts_with("--") {
                                let _ = map
                                    .variables
                                    .insert(declaration.name.clone(), declaration.value.clone());
                            }
                            map.root_styles.push(declaration.clone());
                        }
                    }
                    map.entries.push(RuleEntry {
                        selector: selector.clone(),
                        declarations: style.declarations.clone(),
                        source_order,
                    });
                }
            }
            Rule::At(at) => match at.name.as_str() {
                "media" => map.media_queries.push(at.text),
                name if name.ends_with("keyframes") => map.keyframes.push(at.text),
                _ => map.other_at_rules.push(at.text),
            },
        }
    }
    Ok(map)
}

/// Compile CSS text. Never fails: a fatal parse error yields an empty map and
/// a warning, so the rest of the conversion proceeds unstyled.
#[must_use]
pub fn compile_stylesheet(css: &str) -> StyleDeclarationMap {
    try_compile_stylesheet(css).unwrap_or_else(|err| {
        let _ = warn_once("CSS", &format!("stylesheet ignored: {err}"));
        StyleDeclarationMap::default()
    })
}
