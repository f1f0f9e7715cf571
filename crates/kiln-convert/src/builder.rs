//! Element Tree Builder.
//!
//! Walks the DOM in document order with an explicit work stack and asks the
//! first matching [`ElementProcessor`] what each element becomes. Every node
//! a processor returns is decorated (classes, element styles, attributes)
//! and appended to the output exactly once.

use kiln_common::IdGenerator;
use kiln_common::warning::warn_once;
use kiln_css::{CascadeResolver, StyleDeclarationMap};
use kiln_dom::{DomTree, ElementData, NodeId, escape_text};
use serde_json::Value;

use crate::classes::GlobalClassRegistry;
use crate::options::ConvertOptions;
use crate::output::{ElementNode, ROOT_PARENT};
use crate::processors::is_block_tag;
use crate::styling;

/// What a processor made of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessorResult {
    /// A terminal node; the element's subtree is owned by it.
    Leaf(ElementNode),
    /// A node whose DOM children are walked and attached to it. With
    /// `owns_inline`, inline children and text were already folded into the
    /// node's settings and are not walked.
    Container {
        /// The emitted node.
        node: ElementNode,
        /// Whether inline children are already represented.
        owns_inline: bool,
    },
    /// A pre-built subtree in pre-order; the first node is its root and the
    /// rest carry their parent ids already.
    Composite(Vec<ElementNode>),
    /// No node; children attach to the current parent.
    Unwrap,
    /// Nothing is emitted for the element or its subtree.
    Skip,
}

/// A borrowed view of one element, handed to processors.
#[derive(Debug, Clone, Copy)]
pub struct ElementView<'a> {
    /// The tree the element lives in.
    pub tree: &'a DomTree,
    /// The element's node id.
    pub node: NodeId,
    /// The element itself.
    pub element: &'a ElementData,
}

impl<'a> ElementView<'a> {
    /// Tag name (lowercase for HTML elements).
    #[must_use]
    pub fn tag(&self) -> &'a str {
        &self.element.tag_name
    }

    /// Whether the tag is one of `tags`.
    #[must_use]
    pub fn is_any(&self, tags: &[&str]) -> bool {
        tags.contains(&self.tag())
    }

    /// Class list in source order.
    #[must_use]
    pub fn classes(&self) -> Vec<&'a str> {
        self.element.classes()
    }

    /// Whether any class satisfies `predicate`.
    pub fn any_class(&self, predicate: impl Fn(&str) -> bool) -> bool {
        self.element.classes().into_iter().any(predicate)
    }

    /// Attribute value.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.attr(name)
    }

    /// Whether the attribute is present at all.
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.element.attrs.contains_key(name)
    }

    /// Serialized children, trimmed.
    #[must_use]
    pub fn inner_html(&self) -> String {
        self.tree.inner_html(self.node).trim().to_string()
    }

    /// Serialized element, trimmed.
    #[must_use]
    pub fn outer_html(&self) -> String {
        self.tree.outer_html(self.node).trim().to_string()
    }

    /// Whether any child element is block-level.
    #[must_use]
    pub fn has_block_child(&self) -> bool {
        self.tree
            .element_children(self.node)
            .filter_map(|c| self.tree.tag_name(c))
            .any(is_block_tag)
    }

    /// Whether the element has no element children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.tree.element_children(self.node).next().is_none()
    }

    /// Whether the element has no element children and no visible text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.is_leaf() && !self.tree.has_visible_text(self.node)
    }

    /// View of another element in the same tree.
    #[must_use]
    pub fn view_of(&self, node: NodeId) -> Option<Self> {
        Self::of(self.tree, node)
    }

    /// View of `node` if it is an element.
    #[must_use]
    pub fn of(tree: &'a DomTree, node: NodeId) -> Option<Self> {
        tree.as_element(node).map(|element| Self {
            tree,
            node,
            element,
        })
    }
}

/// Turns one kind of element into output nodes.
pub trait ElementProcessor {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Whether this processor takes the element.
    fn can_handle(&self, view: &ElementView<'_>) -> bool;

    /// Build the element's output.
    fn process(&self, view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ProcessorResult;
}

/// Processors in resolution order; the first that can handle an element
/// wins.
#[derive(Default)]
pub struct ProcessorRegistry {
    processors: Vec<Box<dyn ElementProcessor>>,
}

impl ProcessorRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a processor after those already registered.
    pub fn register(&mut self, processor: impl ElementProcessor + 'static) {
        self.processors.push(Box::new(processor));
    }

    /// The processor for an element.
    #[must_use]
    pub fn resolve(&self, view: &ElementView<'_>) -> Option<&dyn ElementProcessor> {
        self.processors
            .iter()
            .find(|p| p.can_handle(view))
            .map(AsRef::as_ref)
    }

    /// Registered processor names in order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.processors.iter().map(|p| p.name()).collect()
    }
}

/// State shared by every processor during one conversion.
pub struct BuildContext<'a> {
    /// The parsed document.
    pub tree: &'a DomTree,
    /// The compiled stylesheet.
    pub styles: &'a StyleDeclarationMap,
    /// Conversion options.
    pub options: &'a ConvertOptions,
    /// Run-scoped id source for elements, classes and attributes.
    pub ids: IdGenerator,
    /// Global classes created so far.
    pub classes: GlobalClassRegistry,
    pub(crate) resolver: CascadeResolver<'a>,
    issues: Vec<String>,
    head_fallback: bool,
}

impl<'a> BuildContext<'a> {
    /// Fresh context; rejected selectors are recorded as issues.
    #[must_use]
    pub fn new(
        tree: &'a DomTree,
        styles: &'a StyleDeclarationMap,
        options: &'a ConvertOptions,
    ) -> Self {
        let resolver = CascadeResolver::new(styles);
        let issues = resolver
            .rejected_selectors()
            .iter()
            .map(|s| format!("selector ignored: {s}"))
            .collect();
        Self {
            tree,
            styles,
            options,
            ids: IdGenerator::new(),
            classes: GlobalClassRegistry::new(),
            resolver,
            issues,
            head_fallback: false,
        }
    }

    /// View of `node` if it is an element.
    #[must_use]
    pub fn view(&self, node: NodeId) -> Option<ElementView<'a>> {
        ElementView::of(self.tree, node)
    }

    /// A new node built from `source`.
    pub fn node(&mut self, name: &str, source: NodeId) -> ElementNode {
        let mut node = ElementNode::new(self.ids.next_id(), name);
        node.source = Some(source);
        node
    }

    /// A `text-basic` node for a bare text run.
    pub fn text_node(&mut self, text: &str) -> ElementNode {
        let mut node = ElementNode::new(self.ids.next_id(), "text-basic");
        let _ = node
            .settings
            .insert("text".to_string(), Value::String(escape_text(text)));
        node
    }

    /// Whether the walk is over `<head>` because `<body>` produced nothing.
    #[must_use]
    pub const fn in_head_fallback(&self) -> bool {
        self.head_fallback
    }

    /// Record a contained failure once per run.
    pub fn issue(&mut self, message: String) {
        if self.issues.contains(&message) {
            return;
        }
        let _ = warn_once("Builder", &message);
        self.issues.push(message);
    }

    /// Collected issues, leaving none behind.
    pub fn take_issues(&mut self) -> Vec<String> {
        std::mem::take(&mut self.issues)
    }
}

struct WorkItem {
    dom: NodeId,
    /// Index into the output of the node children attach to.
    parent: Option<usize>,
    skip_inline: bool,
}

/// Build the element list for the document in pre-order.
///
/// `<body>` children are walked first. When they yield nothing, `<head>`
/// children are walked instead, so a payload that is only a script still
/// converts.
pub fn build(ctx: &mut BuildContext<'_>, registry: &ProcessorRegistry) -> Vec<ElementNode> {
    let tree = ctx.tree;
    let mut content = Vec::new();
    if let Some(body) = tree.body() {
        walk(ctx, registry, tree.children(body), &mut content);
    }
    if content.is_empty() {
        if let Some(head) = tree.head() {
            ctx.head_fallback = true;
            walk(ctx, registry, tree.children(head), &mut content);
            ctx.head_fallback = false;
        }
    }
    content
}

fn walk(
    ctx: &mut BuildContext<'_>,
    registry: &ProcessorRegistry,
    roots: &[NodeId],
    content: &mut Vec<ElementNode>,
) {
    let tree = ctx.tree;
    let mut stack: Vec<WorkItem> = roots
        .iter()
        .rev()
        .map(|&dom| WorkItem {
            dom,
            parent: None,
            skip_inline: false,
        })
        .collect();

    while let Some(item) = stack.pop() {
        if let Some(text) = tree.as_text(item.dom) {
            let text = text.trim();
            if !item.skip_inline && !text.is_empty() {
                let node = ctx.text_node(text);
                let _ = emit(ctx, content, node, item.parent);
            }
            continue;
        }
        let Some(view) = ctx.view(item.dom) else {
            continue;
        };
        if item.skip_inline && !is_block_tag(view.tag()) {
            continue;
        }
        let Some(processor) = registry.resolve(&view) else {
            ctx.issue(format!("no processor for <{}>", view.tag()));
            continue;
        };

        let children = |parent: Option<usize>, skip_inline: bool| {
            tree.children(item.dom).iter().rev().map(move |&dom| WorkItem {
                dom,
                parent,
                skip_inline,
            })
        };
        match processor.process(view, ctx) {
            ProcessorResult::Leaf(node) => {
                let _ = emit(ctx, content, node, item.parent);
            }
            ProcessorResult::Container { node, owns_inline } => {
                let index = emit(ctx, content, node, item.parent);
                stack.extend(children(Some(index), owns_inline));
            }
            ProcessorResult::Composite(nodes) => emit_composite(ctx, content, nodes, item.parent),
            ProcessorResult::Unwrap => stack.extend(children(item.parent, item.skip_inline)),
            ProcessorResult::Skip => {}
        }
    }
}

/// Decorate `node`, link it to its parent and append it. Returns its index.
fn emit(
    ctx: &mut BuildContext<'_>,
    content: &mut Vec<ElementNode>,
    mut node: ElementNode,
    parent: Option<usize>,
) -> usize {
    styling::decorate(ctx, &mut node);
    attach(content, &mut node, parent);
    content.push(node);
    content.len() - 1
}

fn emit_composite(
    ctx: &mut BuildContext<'_>,
    content: &mut Vec<ElementNode>,
    nodes: Vec<ElementNode>,
    parent: Option<usize>,
) {
    for (index, mut node) in nodes.into_iter().enumerate() {
        styling::decorate(ctx, &mut node);
        if index == 0 {
            attach(content, &mut node, parent);
        }
        content.push(node);
    }
}

fn attach(content: &mut [ElementNode], node: &mut ElementNode, parent: Option<usize>) {
    match parent.and_then(|i| content.get_mut(i)) {
        Some(parent) => {
            node.parent.clone_from(&parent.id);
            parent.children.push(node.id.clone());
        }
        None => node.parent = ROOT_PARENT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_html::parse_html;

    #[test]
    fn test_repeated_issue_is_recorded_once() {
        let tree = parse_html("<p>a</p><p>b</p><span>c</span>");
        let styles = StyleDeclarationMap::default();
        let options = ConvertOptions::default();
        let mut ctx = BuildContext::new(&tree, &styles, &options);
        let content = build(&mut ctx, &ProcessorRegistry::new());
        assert!(content.is_empty());
        assert_eq!(
            ctx.take_issues(),
            vec!["no processor for <p>".to_string(), "no processor for <span>".to_string()]
        );
    }
}
