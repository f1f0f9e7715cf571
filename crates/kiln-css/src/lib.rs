//! CSS front end of the kiln converter.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   with byte spans, so values can be sliced from the source as written.
//!
//! - **CSS Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - Style rules with split selector lists
//!   - At-rules kept as opaque text
//!   - `!important` declarations
//!
//! - **Stylesheet Compiler**: top-level rules, `:root` variables, keyframes,
//!   media blocks and other at-rules.
//!
//! - **CSS Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, class, ID, universal and attribute selectors
//!   - Structural and interactive pseudo-classes, pseudo-elements
//!   - Combinators, specificity and converter-specific classification
//!
//! - **CSS Cascade** ([CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/))
//!   - Per-class mode for building reusable global classes
//!   - Merge mode with specificity and source-order resolution
//!
//! - **Property Mapper Registry**: CSS declarations to structured settings.
//!
//! # Not Interpreted
//!
//! - `@media`, `@keyframes` and other at-rule contents
//! - Nested rules
//! - Pseudo-elements and pseudo-classes beyond the five interactive states

/// Cascade resolution per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).
pub mod cascade;
/// Stylesheet and mapper errors.
pub mod error;
/// Property Mapper Registry.
pub mod mapping;
/// CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// CSS selector parsing and matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// Stylesheet compiler.
pub mod stylesheet;
/// CSS tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod tokenizer;
/// Value helpers shared by the mappers.
pub mod values;

// Re-exports for convenience
pub use cascade::{CascadeResolver, ClassMatch, ComplexRule, MergedMatch, PseudoDeclarations};
pub use error::{CssError, MapperError};
pub use mapping::{
    CustomRules, LayoutMode, MapContext, MapperFn, NATIVE_PROPERTIES, PropertyMapperRegistry,
    Settings,
};
pub use parser::{
    AtRule, CssParser, Declaration, Rule, StyleRule, Stylesheet, parse_declaration_list,
};
pub use selector::{ParsedSelector, PseudoState, SelectorKind, Specificity, parse_selector};
pub use stylesheet::{RuleEntry, StyleDeclarationMap, compile_stylesheet, try_compile_stylesheet};
pub use tokenizer::{CssToken, CssTokenizer, Token};
