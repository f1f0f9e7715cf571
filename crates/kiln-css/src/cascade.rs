//! Cascade resolution against a compiled stylesheet.
//!
//! Follows [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/)
//! for ordering, but hands results back in two shapes:
//!
//! - [`CascadeResolver::match_classes`] (per-class mode) splits matches by the
//!   class that should own them, so they can become reusable global classes.
//! - [`CascadeResolver::match_merged`] (merge mode) flattens every match into
//!   one winner per property, the way a browser would.

use indexmap::IndexMap;
use kiln_common::warning::warn_once;
use kiln_dom::{DomTree, NodeId};

use crate::parser::Declaration;
use crate::selector::{ParsedSelector, PseudoState, SelectorKind, SimpleSelector, parse_selector};
use crate::stylesheet::StyleDeclarationMap;

/// Declarations grouped by interactive state.
pub type PseudoDeclarations = IndexMap<PseudoState, Vec<Declaration>>;

/// A matched rule that cannot be represented structurally and has to be
/// reproduced as literal CSS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexRule {
    /// Selector text as written.
    pub selector: String,
    /// The rule's declarations.
    pub declarations: Vec<Declaration>,
}

impl ComplexRule {
    /// The rule as CSS text under `selector`, normally its own selector.
    #[must_use]
    pub fn to_css(&self, selector: &str) -> String {
        let body: Vec<String> = self
            .declarations
            .iter()
            .map(|d| {
                let important = if d.important { " !important" } else { "" };
                format!("  {}: {}{important};", d.name, d.value)
            })
            .collect();
        format!("{selector} {{\n{}\n}}", body.join("\n"))
    }
}

/// Per-class match result for one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassMatch {
    /// One entry per class on the element, in attribute order. Each holds the
    /// declarations of selectors that belong to that class, in cascade order.
    pub properties_by_class: IndexMap<String, Vec<Declaration>>,
    /// Declarations from bare type selectors, in cascade order.
    pub common_properties: Vec<Declaration>,
    /// Declarations from bare id selectors, in cascade order. They outrank
    /// every class, so they are applied after class declarations.
    pub id_properties: Vec<Declaration>,
    /// State declarations keyed by the class they belong to.
    pub pseudo_by_class: IndexMap<String, PseudoDeclarations>,
    /// State declarations on type or id selectors (`a:hover`).
    pub common_pseudo: PseudoDeclarations,
    /// Complex and unstructured pseudo rules that matched the element.
    pub complex_rules: Vec<ComplexRule>,
}

/// Merge-mode match result for one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedMatch {
    /// Winning declaration per property.
    pub properties: IndexMap<String, Declaration>,
    /// State declarations whose base selector matched.
    pub pseudo_selectors: PseudoDeclarations,
}

impl MergedMatch {
    /// Value of the winning declaration for `property`.
    #[must_use]
    pub fn value(&self, property: &str) -> Option<&str> {
        self.properties.get(property).map(|d| d.value.as_str())
    }
}

struct CompiledRule<'a> {
    selector: ParsedSelector,
    kind: SelectorKind,
    declarations: &'a [Declaration],
    source_order: usize,
}

/// [§ 6.4 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
///
/// Sort key: specificity, then source order.
fn cascade_order(rules: &mut [&CompiledRule<'_>]) {
    rules.sort_by(|a, b| {
        a.selector
            .specificity
            .cmp(&b.selector.specificity)
            .then(a.source_order.cmp(&b.source_order))
    });
}

/// [§ 6.4.1 Origin and Importance](https://www.w3.org/TR/css-cascade-4/#cascade-origin)
///
/// Flatten already-sorted rules so `!important` declarations come after every
/// normal one, each group keeping cascade order.
fn flatten_declarations(rules: &[&CompiledRule<'_>]) -> Vec<Declaration> {
    let all = rules.iter().flat_map(|r| r.declarations.iter());
    let (important, normal): (Vec<&Declaration>, Vec<&Declaration>) =
        all.partition(|d| d.important);
    normal.into_iter().chain(important).cloned().collect()
}

/// Stylesheet rules with their selectors parsed once.
pub struct CascadeResolver<'a> {
    rules: Vec<CompiledRule<'a>>,
    rejected: Vec<String>,
}

impl<'a> CascadeResolver<'a> {
    /// Parse every selector of `styles`. Selectors that fail to parse are
    /// warned about and left out; `:root` is left to the root styles.
    #[must_use]
    pub fn new(styles: &'a StyleDeclarationMap) -> Self {
        let mut rules = Vec::with_capacity(styles.entries.len());
        let mut rejected = Vec::new();
        for entry in &styles.entries {
            if entry.selector == ":root" {
                continue;
            }
            let Some(selector) = parse_selector(&entry.selector) else {
                let _ = warn_once(
                    "Selector",
                    &format!("unsupported selector '{}' skipped", entry.selector),
                );
                if !rejected.contains(&entry.selector) {
                    rejected.push(entry.selector.clone());
                }
                continue;
            };
            let kind = selector.kind();
            rules.push(CompiledRule {
                selector,
                kind,
                declarations: &entry.declarations,
                source_order: entry.source_order,
            });
        }
        Self { rules, rejected }
    }

    /// Selectors that could not be parsed, in first-seen order.
    #[must_use]
    pub fn rejected_selectors(&self) -> &[String] {
        &self.rejected
    }

    /// Per-class mode.
    ///
    /// A single-class selector belongs to that class. A compound-class
    /// selector (`.btn.primary`) belongs to every one of its classes, so each
    /// global class carries the declarations on its own. Type and id selectors are
    /// common properties, kept apart so callers can order them around class
    /// declarations. Everything else that matches is a [`ComplexRule`]:
    /// its ancestry or attribute conditions would be lost if it were folded
    /// into a class.
    #[must_use]
    pub fn match_classes(&self, tree: &DomTree, node: NodeId) -> ClassMatch {
        let mut result = ClassMatch::default();
        let Some(element) = tree.as_element(node) else {
            return result;
        };
        let classes = element.classes();

        let mut by_class: IndexMap<&str, Vec<&CompiledRule<'a>>> =
            classes.iter().map(|&c| (c, Vec::new())).collect();
        let mut common: Vec<&CompiledRule<'a>> = Vec::new();
        let mut by_id: Vec<&CompiledRule<'a>> = Vec::new();

        for rule in &self.rules {
            match rule.kind {
                SelectorKind::Simple | SelectorKind::CompoundClass => {
                    if !rule.selector.matches_in_tree(tree, node) {
                        continue;
                    }
                    match rule.selector.complex.subject.simple_selectors.as_slice() {
                        [SimpleSelector::Type(_)] => common.push(rule),
                        [SimpleSelector::Id(_)] => by_id.push(rule),
                        [SimpleSelector::Universal] => result.complex_rules.push(complex(rule)),
                        _ => {
                            let mut owners = rule.selector.subject_classes();
                            owners.sort_unstable();
                            owners.dedup();
                            for class in owners {
                                if let Some(list) = by_class.get_mut(class) {
                                    list.push(rule);
                                }
                            }
                        }
                    }
                }
                SelectorKind::Pseudo => route_pseudo(rule, tree, node, &mut result),
                SelectorKind::Complex => {
                    if rule.selector.matches_in_tree(tree, node) {
                        result.complex_rules.push(complex(rule));
                    }
                }
            }
        }

        cascade_order(&mut common);
        result.common_properties = flatten_declarations(&common);
        cascade_order(&mut by_id);
        result.id_properties = flatten_declarations(&by_id);
        for (class, mut rules) in by_class {
            cascade_order(&mut rules);
            let _ = result
                .properties_by_class
                .insert(class.to_string(), flatten_declarations(&rules));
        }
        result
    }

    /// Merge mode: every matching rule, sorted by specificity and source
    /// order, applied so later winners overwrite earlier values. Important
    /// declarations are applied after normal ones.
    #[must_use]
    pub fn match_merged(&self, tree: &DomTree, node: NodeId) -> MergedMatch {
        let mut result = MergedMatch::default();
        let mut matched: Vec<&CompiledRule<'a>> = Vec::new();
        let mut pseudo: Vec<(&CompiledRule<'a>, PseudoState)> = Vec::new();

        for rule in &self.rules {
            if rule.kind == SelectorKind::Pseudo {
                let state = rule.selector.state();
                let base_matches = rule
                    .selector
                    .without_pseudo()
                    .is_some_and(|base| base.matches_in_tree(tree, node));
                if let (Some(state), true) = (state, base_matches) {
                    pseudo.push((rule, state));
                }
            } else if rule.selector.matches_in_tree(tree, node) {
                matched.push(rule);
            }
        }

        cascade_order(&mut matched);
        for declaration in flatten_declarations(&matched) {
            let _ = result
                .properties
                .insert(declaration.name.clone(), declaration);
        }

        pseudo.sort_by(|(a, _), (b, _)| {
            a.selector
                .specificity
                .cmp(&b.selector.specificity)
                .then(a.source_order.cmp(&b.source_order))
        });
        for (rule, state) in pseudo {
            result
                .pseudo_selectors
                .entry(state)
                .or_default()
                .extend(rule.declarations.iter().cloned());
        }
        result
    }
}

/// Route a pseudo rule whose base selector matches the element.
fn route_pseudo(
    rule: &CompiledRule<'_>,
    tree: &DomTree,
    node: NodeId,
    result: &mut ClassMatch,
) {
    let Some(base) = rule.selector.without_pseudo() else {
        return;
    };
    if !base.matches_in_tree(tree, node) {
        return;
    }
    let Some(state) = rule.selector.state() else {
        result.complex_rules.push(complex(rule));
        return;
    };
    let target = match base.complex.subject.simple_selectors.as_slice() {
        [SimpleSelector::Class(class)] => result
            .pseudo_by_class
            .entry(class.clone())
            .or_default()
            .entry(state)
            .or_default(),
        [SimpleSelector::Type(_) | SimpleSelector::Id(_)] => {
            result.common_pseudo.entry(state).or_default()
        }
        _ => {
            result.complex_rules.push(complex(rule));
            return;
        }
    };
    target.extend(rule.declarations.iter().cloned());
}

fn complex(rule: &CompiledRule<'_>) -> ComplexRule {
    ComplexRule {
        selector: rule.selector.text.clone(),
        declarations: rule.declarations.to_vec(),
    }
}
