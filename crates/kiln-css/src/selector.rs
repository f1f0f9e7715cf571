//! CSS selector parsing, classification and matching.
//!
//! This module implements the subset of
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/) that authored
//! page CSS relies on, plus the classification the converter uses to decide
//! whether a rule can become a global class, a pseudo-state variant or only
//! literal custom CSS.

use core::fmt;

use kiln_dom::{DomTree, ElementData, NodeId, NodeType};
use serde::Serialize;

use crate::tokenizer::{is_ident_code_point, is_ident_start_code_point};

/// The interactive states that map to structured pseudo settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PseudoState {
    /// `:hover`
    Hover,
    /// `:focus`
    Focus,
    /// `:active`
    Active,
    /// `:visited`
    Visited,
    /// `:disabled`
    Disabled,
}

impl PseudoState {
    /// Every state, in output order.
    pub const ALL: [Self; 5] = [
        Self::Hover,
        Self::Focus,
        Self::Active,
        Self::Visited,
        Self::Disabled,
    ];

    /// Name without the colon, as used for output keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hover => "hover",
            Self::Focus => "focus",
            Self::Active => "active",
            Self::Visited => "visited",
            Self::Disabled => "disabled",
        }
    }

    /// Parse a pseudo-class name (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for PseudoState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// A simple selector is a single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    ///
    /// Examples: `div`, `p`, `h1`
    Type(String),
    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    ///
    /// Examples: `.highlight`, `.md\:flex`
    Class(String),
    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    Id(String),
    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    Universal,
    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    Attribute(AttributeSelector),
    /// A structural pseudo-class, matched against the tree.
    PseudoClass(PseudoClass),
    /// [§ 4.2 :not()](https://www.w3.org/TR/selectors-4/#negation)
    /// "The negation pseudo-class, :not(), is a functional pseudo-class taking
    /// a selector list as an argument."
    Not(Vec<SimpleSelector>),
    /// One of the interactive states; never matches a static document.
    State(PseudoState),
    /// [§ 11 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements);
    /// never matches an element.
    PseudoElement(String),
    /// Any other pseudo-class (`:focus-visible`, `:has()`, ...), kept as
    /// written; never matches.
    OpaquePseudo(String),
}

impl SimpleSelector {
    /// Parts that only make sense as literal CSS.
    const fn is_pseudo_part(&self) -> bool {
        matches!(
            self,
            Self::State(_) | Self::PseudoElement(_) | Self::OpaquePseudo(_)
        )
    }
}

/// Structural pseudo-classes per [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoClass {
    /// `:root`, the document element.
    Root,
    /// `:first-child`
    FirstChild,
    /// `:last-child`
    LastChild,
    /// `:first-of-type`
    FirstOfType,
    /// `:last-of-type`
    LastOfType,
    /// `:only-child`
    OnlyChild,
    /// `:empty` (whitespace-only text counts as empty)
    Empty,
    /// `:link`, any `a`/`area` with `href`
    Link,
    /// `:enabled`
    Enabled,
    /// `:checked`
    Checked,
    /// [§ 14.1 :nth-child()](https://www.w3.org/TR/selectors-4/#the-nth-child-pseudo)
    /// with the `An+B` coefficients.
    NthChild(i32, i32),
    /// `:nth-last-child(An+B)`
    NthLastChild(i32, i32),
    /// `:nth-of-type(An+B)`
    NthOfType(i32, i32),
}

/// Attribute selectors per [§ 6.4](https://www.w3.org/TR/selectors-4/#attribute-selectors)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeSelector {
    /// `[attr]`
    Exists(String),
    /// `[attr=value]`
    Equals(String, String),
    /// `[attr~=value]`, whitespace-separated word match
    Includes(String, String),
    /// `[attr|=value]`, exact or `value-` prefix
    DashMatch(String, String),
    /// `[attr^=value]`
    PrefixMatch(String, String),
    /// `[attr$=value]`
    SuffixMatch(String, String),
    /// `[attr*=value]`
    SubstringMatch(String, String),
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    /// The simple selectors, in source order.
    pub simple_selectors: Vec<SimpleSelector>,
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `A B`
    Descendant,
    /// `A > B`
    Child,
    /// `A + B`
    NextSibling,
    /// `A ~ B`
    SubsequentSibling,
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// For `A > B C` the subject is `C` and `combinators` is
/// `[(Descendant, B), (Child, A)]`, right to left, the order matching walks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    /// The rightmost compound selector.
    pub subject: CompoundSelector,
    /// `(combinator, compound)` pairs going left from the subject.
    pub combinators: Vec<(Combinator, CompoundSelector)>,
}

/// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
///
/// (ids, classes/attributes/pseudo-classes, types/pseudo-elements).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    /// Create a new specificity with (A, B, C) components.
    #[must_use]
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self(a, b, c)
    }

    /// Single integer weight: `100*A + 10*B + C`.
    #[must_use]
    pub const fn score(self) -> u32 {
        100 * self.0 + 10 * self.1 + self.2
    }

    const fn add(self, other: Self) -> Self {
        Self(self.0 + other.0, self.1 + other.1, self.2 + other.2)
    }
}

/// How the converter treats a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKind {
    /// A single class, id, type or universal selector.
    Simple,
    /// Two or more classes on one element (`.a.b`).
    CompoundClass,
    /// Ends in a pseudo-class or pseudo-element, with no combinators.
    Pseudo,
    /// Combinators, attribute selectors, or any other mix.
    Complex,
}

/// A parsed selector ready for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSelector {
    /// Selector text as written in the stylesheet.
    pub text: String,
    /// The complex selector (compound selectors with combinators).
    pub complex: ComplexSelector,
    /// The specificity of this selector.
    pub specificity: Specificity,
}

impl ParsedSelector {
    /// Check if this is a simple selector (no combinators).
    #[must_use]
    pub const fn is_simple(&self) -> bool {
        self.complex.combinators.is_empty()
    }

    /// Classify the selector.
    #[must_use]
    pub fn kind(&self) -> SelectorKind {
        let subject = &self.complex.subject.simple_selectors;
        let has_attribute = self.all_compounds().any(|c| {
            c.simple_selectors
                .iter()
                .any(|s| matches!(s, SimpleSelector::Attribute(_)))
        });
        if self.is_simple() && !has_attribute && subject.iter().any(SimpleSelector::is_pseudo_part)
        {
            return SelectorKind::Pseudo;
        }
        if !self.is_simple() || has_attribute {
            return SelectorKind::Complex;
        }
        match subject.as_slice() {
            [
                SimpleSelector::Type(_)
                | SimpleSelector::Class(_)
                | SimpleSelector::Id(_)
                | SimpleSelector::Universal,
            ] => SelectorKind::Simple,
            [_, _, ..]
                if subject
                    .iter()
                    .all(|s| matches!(s, SimpleSelector::Class(_))) =>
            {
                SelectorKind::CompoundClass
            }
            _ => SelectorKind::Complex,
        }
    }

    /// The interactive state when the subject ends in exactly one of
    /// `:hover`, `:focus`, `:active`, `:visited` or `:disabled` and carries no
    /// other pseudo part.
    #[must_use]
    pub fn state(&self) -> Option<PseudoState> {
        let subject = &self.complex.subject.simple_selectors;
        let pseudo_parts = subject.iter().filter(|s| s.is_pseudo_part()).count();
        match subject.last() {
            Some(SimpleSelector::State(state)) if pseudo_parts == 1 => Some(*state),
            _ => None,
        }
    }

    /// The selector with every pseudo part removed from its subject
    /// (`.btn:hover` gives `.btn`). `None` when nothing would remain.
    #[must_use]
    pub fn without_pseudo(&self) -> Option<Self> {
        let simple_selectors: Vec<SimpleSelector> = self
            .complex
            .subject
            .simple_selectors
            .iter()
            .filter(|s| !s.is_pseudo_part())
            .cloned()
            .collect();
        if simple_selectors.is_empty() && self.is_simple() {
            return None;
        }
        let simple_selectors = if simple_selectors.is_empty() {
            vec![SimpleSelector::Universal]
        } else {
            simple_selectors
        };
        let complex = ComplexSelector {
            subject: CompoundSelector { simple_selectors },
            combinators: self.complex.combinators.clone(),
        };
        let specificity = complex.calculate_specificity();
        Some(Self {
            text: self.text.clone(),
            complex,
            specificity,
        })
    }

    /// Class names of the subject, in selector order.
    #[must_use]
    pub fn subject_classes(&self) -> Vec<&str> {
        self.complex
            .subject
            .simple_selectors
            .iter()
            .filter_map(|s| match s {
                SimpleSelector::Class(c) => Some(c.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether the subject is exactly one class selector.
    #[must_use]
    pub fn single_class(&self) -> Option<&str> {
        match self.complex.subject.simple_selectors.as_slice() {
            [SimpleSelector::Class(c)] if self.is_simple() => Some(c),
            _ => None,
        }
    }

    fn all_compounds(&self) -> impl Iterator<Item = &CompoundSelector> {
        core::iter::once(&self.complex.subject).chain(self.complex.combinators.iter().map(|(_, c)| c))
    }

    /// [§ 4.1 Selector Matching](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
    ///
    /// Match against an element with full DOM tree context, so combinators
    /// and structural pseudo-classes are honored.
    #[must_use]
    pub fn matches_in_tree(&self, tree: &DomTree, node_id: NodeId) -> bool {
        compound_matches_in_tree(&self.complex.subject, tree, node_id)
            && self.matches_combinators(tree, node_id)
    }

    /// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
    ///
    /// Walk the chain right to left, backtracking over descendant and
    /// subsequent-sibling candidates.
    fn matches_combinators(&self, tree: &DomTree, subject_id: NodeId) -> bool {
        self.match_from(0, tree, subject_id)
    }

    /// Backtracking match of `combinators[index..]` starting at `current`.
    fn match_from(&self, index: usize, tree: &DomTree, current: NodeId) -> bool {
        let Some((combinator, compound)) = self.complex.combinators.get(index) else {
            return true;
        };
        match combinator {
            Combinator::Descendant => tree
                .ancestors(current)
                .filter(|&a| compound_matches_in_tree(compound, tree, a))
                .any(|a| self.match_from(index + 1, tree, a)),
            Combinator::Child => tree.parent(current).is_some_and(|parent| {
                compound_matches_in_tree(compound, tree, parent)
                    && self.match_from(index + 1, tree, parent)
            }),
            Combinator::NextSibling => tree.prev_element_sibling(current).is_some_and(|prev| {
                compound_matches_in_tree(compound, tree, prev)
                    && self.match_from(index + 1, tree, prev)
            }),
            Combinator::SubsequentSibling => tree
                .preceding_siblings(current)
                .filter(|&s| compound_matches_in_tree(compound, tree, s))
                .any(|s| self.match_from(index + 1, tree, s)),
        }
    }
}

impl fmt::Display for ParsedSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn compound_matches_in_tree(compound: &CompoundSelector, tree: &DomTree, node_id: NodeId) -> bool {
    let Some(element) = tree.as_element(node_id) else {
        return false;
    };
    compound
        .simple_selectors
        .iter()
        .all(|simple| simple_matches(simple, tree, node_id, element))
}

fn simple_matches(
    simple: &SimpleSelector,
    tree: &DomTree,
    node_id: NodeId,
    element: &ElementData,
) -> bool {
    match simple {
        SimpleSelector::Type(name) => element.tag_name.eq_ignore_ascii_case(name),
        SimpleSelector::Class(class) => element.has_class(class),
        SimpleSelector::Id(id) => element.id() == Some(id.as_str()),
        SimpleSelector::Universal => true,
        SimpleSelector::Attribute(attr) => attribute_matches(attr, element),
        SimpleSelector::PseudoClass(pc) => pseudo_class_matches(*pc, tree, node_id, element),
        SimpleSelector::Not(inner) => !inner
            .iter()
            .all(|s| simple_matches(s, tree, node_id, element)),
        SimpleSelector::State(_)
        | SimpleSelector::PseudoElement(_)
        | SimpleSelector::OpaquePseudo(_) => false,
    }
}

fn attribute_matches(selector: &AttributeSelector, element: &ElementData) -> bool {
    match selector {
        AttributeSelector::Exists(name) => element.attrs.contains_key(name.as_str()),
        AttributeSelector::Equals(name, val) => element.attr(name) == Some(val.as_str()),
        AttributeSelector::Includes(name, val) => element
            .attr(name)
            .is_some_and(|v| v.split_ascii_whitespace().any(|w| w == val)),
        AttributeSelector::DashMatch(name, val) => element.attr(name).is_some_and(|v| {
            v == val || v.strip_prefix(val.as_str()).is_some_and(|rest| rest.starts_with('-'))
        }),
        AttributeSelector::PrefixMatch(name, val) => element
            .attr(name)
            .is_some_and(|v| !val.is_empty() && v.starts_with(val.as_str())),
        AttributeSelector::SuffixMatch(name, val) => element
            .attr(name)
            .is_some_and(|v| !val.is_empty() && v.ends_with(val.as_str())),
        AttributeSelector::SubstringMatch(name, val) => element
            .attr(name)
            .is_some_and(|v| !val.is_empty() && v.contains(val.as_str())),
    }
}

/// 1-based position among element siblings, and the sibling count.
fn element_position(
    tree: &DomTree,
    node_id: NodeId,
    same_type: Option<&str>,
) -> Option<(usize, usize)> {
    let parent = tree.parent(node_id)?;
    let siblings: Vec<NodeId> = tree
        .element_children(parent)
        .filter(|&c| same_type.is_none_or(|tag| tree.is_tag(c, tag)))
        .collect();
    let index = siblings.iter().position(|&c| c == node_id)?;
    Some((index + 1, siblings.len()))
}

/// [§ 14.1 An+B](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax)
fn nth_matches(a: i32, b: i32, position: usize) -> bool {
    let Ok(position) = i32::try_from(position) else {
        return false;
    };
    if a == 0 {
        return position == b;
    }
    let offset = position - b;
    offset % a == 0 && offset / a >= 0
}

fn pseudo_class_matches(
    pc: PseudoClass,
    tree: &DomTree,
    node_id: NodeId,
    element: &ElementData,
) -> bool {
    let tag = element.tag_name.as_str();
    match pc {
        PseudoClass::Root => tree.document_element() == Some(node_id),
        PseudoClass::FirstChild => element_position(tree, node_id, None).is_some_and(|(i, _)| i == 1),
        PseudoClass::LastChild => {
            element_position(tree, node_id, None).is_some_and(|(i, n)| i == n)
        }
        PseudoClass::FirstOfType => {
            element_position(tree, node_id, Some(tag)).is_some_and(|(i, _)| i == 1)
        }
        PseudoClass::LastOfType => {
            element_position(tree, node_id, Some(tag)).is_some_and(|(i, n)| i == n)
        }
        PseudoClass::OnlyChild => {
            element_position(tree, node_id, None).is_some_and(|(_, n)| n == 1)
        }
        PseudoClass::Empty => tree.children(node_id).iter().all(|&c| {
            match tree.get(c).map(|n| &n.node_type) {
                Some(NodeType::Text(t)) => t.trim().is_empty(),
                Some(NodeType::Comment(_)) => true,
                _ => false,
            }
        }),
        PseudoClass::Link => (tag == "a" || tag == "area") && element.attrs.contains_key("href"),
        PseudoClass::Enabled => !element.attrs.contains_key("disabled"),
        PseudoClass::Checked => element.attrs.contains_key("checked"),
        PseudoClass::NthChild(a, b) => {
            element_position(tree, node_id, None).is_some_and(|(i, _)| nth_matches(a, b, i))
        }
        PseudoClass::NthLastChild(a, b) => element_position(tree, node_id, None)
            .is_some_and(|(i, n)| nth_matches(a, b, n + 1 - i)),
        PseudoClass::NthOfType(a, b) => {
            element_position(tree, node_id, Some(tag)).is_some_and(|(i, _)| nth_matches(a, b, i))
        }
    }
}

impl ComplexSelector {
    /// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
    ///
    /// Sum of the specificity of every compound in the chain.
    #[must_use]
    pub fn calculate_specificity(&self) -> Specificity {
        self.combinators
            .iter()
            .map(|(_, compound)| compound_specificity(&compound.simple_selectors))
            .fold(compound_specificity(&self.subject.simple_selectors), Specificity::add)
    }
}

fn compound_specificity(simple_selectors: &[SimpleSelector]) -> Specificity {
    simple_selectors
        .iter()
        .fold(Specificity::default(), |spec, simple| match simple {
            // "count the number of ID selectors in the selector (= A)"
            SimpleSelector::Id(_) => spec.add(Specificity(1, 0, 0)),
            // "count the number of class selectors, attributes selectors,
            // and pseudo-classes in the selector (= B)"
            SimpleSelector::Class(_)
            | SimpleSelector::Attribute(_)
            | SimpleSelector::PseudoClass(_)
            | SimpleSelector::State(_)
            | SimpleSelector::OpaquePseudo(_) => spec.add(Specificity(0, 1, 0)),
            // "count the number of type selectors and pseudo-elements in the
            // selector (= C)"
            SimpleSelector::Type(_) | SimpleSelector::PseudoElement(_) => {
                spec.add(Specificity(0, 0, 1))
            }
            // ":not() is replaced by the specificity of its argument"
            SimpleSelector::Not(inner) => spec.add(compound_specificity(inner)),
            // "ignore the universal selector"
            SimpleSelector::Universal => spec,
        })
}

/// Parse a raw selector string into a [`ParsedSelector`].
///
/// [§ 4 Selector syntax](https://www.w3.org/TR/selectors-4/#syntax)
///
/// Returns `None` for selectors this engine cannot represent; callers treat
/// those as non-matching.
#[must_use]
pub fn parse_selector(raw: &str) -> Option<ParsedSelector> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    let mut parser = SelectorParser {
        chars: text.chars().collect(),
        position: 0,
    };
    let complex = parser.parse_complex()?;
    let specificity = complex.calculate_specificity();
    Some(ParsedSelector {
        text: text.to_string(),
        complex,
        specificity,
    })
}

struct SelectorParser {
    chars: Vec<char>,
    position: usize,
}

impl SelectorParser {
    /// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
    fn parse_complex(&mut self) -> Option<ComplexSelector> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();
        loop {
            let had_whitespace = self.skip_whitespace();
            let combinator = match self.peek() {
                None => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(_) => return None,
            };
            if combinator != Combinator::Descendant {
                self.position += 1;
                let _ = self.skip_whitespace();
            }
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        let subject = compounds.pop()?;
        let chain = compounds
            .into_iter()
            .zip(combinators)
            .rev()
            .map(|(compound, combinator)| (combinator, compound))
            .collect();
        Some(ComplexSelector {
            subject,
            combinators: chain,
        })
    }

    /// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
    fn parse_compound(&mut self) -> Option<CompoundSelector> {
        let mut simple_selectors = Vec::new();
        loop {
            let simple = match self.peek() {
                Some('*') => {
                    self.position += 1;
                    SimpleSelector::Universal
                }
                Some('.') => {
                    self.position += 1;
                    SimpleSelector::Class(self.ident()?)
                }
                Some('#') => {
                    self.position += 1;
                    SimpleSelector::Id(self.ident()?)
                }
                Some('[') => {
                    self.position += 1;
                    SimpleSelector::Attribute(self.attribute()?)
                }
                Some(':') => {
                    self.position += 1;
                    self.pseudo()?
                }
                Some(c)
                    if simple_selectors.is_empty()
                        && (is_ident_start_code_point(c) || c == '-' || c == '\\') =>
                {
                    SimpleSelector::Type(self.ident()?.to_ascii_lowercase())
                }
                _ => break,
            };
            simple_selectors.push(simple);
        }
        if simple_selectors.is_empty() {
            None
        } else {
            Some(CompoundSelector { simple_selectors })
        }
    }

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors),
    /// after the opening `[`.
    fn attribute(&mut self) -> Option<AttributeSelector> {
        let _ = self.skip_whitespace();
        let name = self.ident()?.to_ascii_lowercase();
        let _ = self.skip_whitespace();
        let operator = match self.next()? {
            ']' => return Some(AttributeSelector::Exists(name)),
            '=' => '=',
            op @ ('~' | '|' | '^' | '$' | '*') if self.next()? == '=' => op,
            _ => return None,
        };
        let _ = self.skip_whitespace();
        let value = match self.peek()? {
            quote @ ('"' | '\'') => {
                self.position += 1;
                let mut value = String::new();
                loop {
                    match self.next()? {
                        c if c == quote => break value,
                        '\\' => value.push(self.next()?),
                        c => value.push(c),
                    }
                }
            }
            _ => self.ident()?,
        };
        let _ = self.skip_whitespace();
        // Case-sensitivity flag
        if matches!(self.peek(), Some('i' | 'I' | 's' | 'S')) {
            self.position += 1;
            let _ = self.skip_whitespace();
        }
        if self.next()? != ']' {
            return None;
        }
        Some(match operator {
            '=' => AttributeSelector::Equals(name, value),
            '~' => AttributeSelector::Includes(name, value),
            '|' => AttributeSelector::DashMatch(name, value),
            '^' => AttributeSelector::PrefixMatch(name, value),
            '$' => AttributeSelector::SuffixMatch(name, value),
            _ => AttributeSelector::SubstringMatch(name, value),
        })
    }

    /// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    /// and [§ 11 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements),
    /// after the first `:`.
    fn pseudo(&mut self) -> Option<SimpleSelector> {
        let start = self.position - 1;
        let is_element = self.peek() == Some(':');
        if is_element {
            self.position += 1;
        }
        let name = self.ident()?.to_ascii_lowercase();
        let args = if self.peek() == Some('(') {
            self.position += 1;
            Some(self.balanced_arguments()?)
        } else {
            None
        };
        let raw: String = self.chars[start..self.position].iter().collect();

        // Legacy single-colon pseudo-elements
        if is_element
            || matches!(
                name.as_str(),
                "before" | "after" | "first-line" | "first-letter"
            )
        {
            return Some(SimpleSelector::PseudoElement(raw));
        }

        let pseudo = match (name.as_str(), args.as_deref()) {
            (state, None) if PseudoState::from_name(state).is_some() => {
                PseudoState::from_name(state).map(SimpleSelector::State)?
            }
            ("root", None) => SimpleSelector::PseudoClass(PseudoClass::Root),
            ("first-child", None) => SimpleSelector::PseudoClass(PseudoClass::FirstChild),
            ("last-child", None) => SimpleSelector::PseudoClass(PseudoClass::LastChild),
            ("first-of-type", None) => SimpleSelector::PseudoClass(PseudoClass::FirstOfType),
            ("last-of-type", None) => SimpleSelector::PseudoClass(PseudoClass::LastOfType),
            ("only-child", None) => SimpleSelector::PseudoClass(PseudoClass::OnlyChild),
            ("empty", None) => SimpleSelector::PseudoClass(PseudoClass::Empty),
            ("link", None) => SimpleSelector::PseudoClass(PseudoClass::Link),
            ("enabled", None) => SimpleSelector::PseudoClass(PseudoClass::Enabled),
            ("checked", None) => SimpleSelector::PseudoClass(PseudoClass::Checked),
            ("nth-child", Some(arg)) => parse_nth(arg).map_or_else(
                || SimpleSelector::OpaquePseudo(raw.clone()),
                |(a, b)| SimpleSelector::PseudoClass(PseudoClass::NthChild(a, b)),
            ),
            ("nth-last-child", Some(arg)) => parse_nth(arg).map_or_else(
                || SimpleSelector::OpaquePseudo(raw.clone()),
                |(a, b)| SimpleSelector::PseudoClass(PseudoClass::NthLastChild(a, b)),
            ),
            ("nth-of-type", Some(arg)) => parse_nth(arg).map_or_else(
                || SimpleSelector::OpaquePseudo(raw.clone()),
                |(a, b)| SimpleSelector::PseudoClass(PseudoClass::NthOfType(a, b)),
            ),
            ("not", Some(arg)) => parse_selector(arg)
                .filter(ParsedSelector::is_simple)
                .map_or_else(
                    || SimpleSelector::OpaquePseudo(raw.clone()),
                    |inner| SimpleSelector::Not(inner.complex.subject.simple_selectors),
                ),
            _ => SimpleSelector::OpaquePseudo(raw.clone()),
        };
        Some(pseudo)
    }

    /// Text up to the matching `)`, which is consumed.
    fn balanced_arguments(&mut self) -> Option<String> {
        let mut depth = 1usize;
        let mut out = String::new();
        loop {
            let c = self.next()?;
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(out.trim().to_string());
                    }
                }
                _ => {}
            }
            out.push(c);
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name),
    /// resolving backslash escapes (`md\:flex`).
    fn ident(&mut self) -> Option<String> {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.position += 1;
                out.push(self.next()?);
            } else if is_ident_code_point(c) {
                self.position += 1;
                out.push(c);
            } else {
                break;
            }
        }
        if out.is_empty() { None } else { Some(out) }
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.position;
        while self.peek().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
        self.position > start
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += 1;
        Some(c)
    }
}

/// `odd`, `even`, `3`, `2n+1`, `-n+3`.
fn parse_nth(arg: &str) -> Option<(i32, i32)> {
    let compact: String = arg
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    match compact.as_str() {
        "odd" => return Some((2, 1)),
        "even" => return Some((2, 0)),
        _ => {}
    }
    let Some((a, b)) = compact.split_once('n') else {
        return compact.parse().ok().map(|b| (0, b));
    };
    let a = match a {
        "" | "+" => 1,
        "-" => -1,
        a => a.parse().ok()?,
    };
    let b = if b.is_empty() { 0 } else { b.parse().ok()? };
    Some((a, b))
}
