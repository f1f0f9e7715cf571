//! Navigation menus.
//!
//! A menu is emitted as one composite: a `div {tag: "nav"}` wrapper labeled
//! `Navigation` and its own subtree of containers, links, images and
//! buttons.

use kiln_dom::NodeId;

use crate::builder::{BuildContext, ElementProcessor, ElementView, ProcessorResult};
use crate::output::ElementNode;
use crate::processors::button::{button_node, is_button_class_element};
use crate::processors::link::link_node;
use crate::processors::media::image_node;
use crate::processors::misc::{SKIPPED, icon_node, is_icon, svg_node};
use crate::processors::{is_block_tag, set};

/// Classes that mark an element as a menu.
const NAV_CLASSES: &[&str] = &["navbar", "nav-menu", "main-nav", "menu", "navigation"];

/// `<nav>` and menu-classed elements → composite navigation subtree.
pub struct NavigationProcessor;

impl ElementProcessor for NavigationProcessor {
    fn name(&self) -> &'static str {
        "navigation"
    }

    fn can_handle(&self, view: &ElementView<'_>) -> bool {
        view.tag() == "nav" || view.any_class(|c| NAV_CLASSES.contains(&c))
    }

    fn process(&self, view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ProcessorResult {
        let tree = view.tree;
        let mut wrapper = ctx.node("div", view.node);
        set(&mut wrapper, "tag", "nav");
        wrapper.label = Some("Navigation".to_string());
        let mut nodes = vec![wrapper];

        let mut stack: Vec<(NodeId, usize)> =
            tree.children(view.node).iter().rev().map(|&c| (c, 0)).collect();
        while let Some((dom, parent)) = stack.pop() {
            if let Some(text) = tree.as_text(dom) {
                let text = text.trim();
                if !text.is_empty() {
                    let node = ctx.text_node(text);
                    let _ = push(&mut nodes, node, parent);
                }
                continue;
            }
            let Some(child) = view.view_of(dom) else {
                continue;
            };
            if child.is_any(SKIPPED) || child.tag() == "script" {
                continue;
            }
            let (node, descend) = nav_item(child, ctx);
            let index = push(&mut nodes, node, parent);
            if descend {
                stack.extend(tree.children(dom).iter().rev().map(|&c| (c, index)));
            }
        }
        ProcessorResult::Composite(nodes)
    }
}

/// The node for one element inside a menu, and whether to walk into it.
fn nav_item(child: ElementView<'_>, ctx: &mut BuildContext<'_>) -> (ElementNode, bool) {
    if is_button_class_element(&child) || child.tag() == "button" {
        return (button_node(child, ctx), false);
    }
    if is_icon(&child) {
        return (icon_node(child, ctx), false);
    }
    match child.tag() {
        "a" => link_node(child, ctx),
        "img" | "picture" => (image_node(child, ctx), false),
        "svg" => (svg_node(child, ctx), false),
        tag if is_block_tag(tag) || !child.is_leaf() => {
            let mut node = ctx.node("div", child.node);
            if tag != "div" {
                set(&mut node, "tag", tag);
            }
            (node, true)
        }
        tag => {
            let mut node = ctx.node("text-basic", child.node);
            if tag == "span" {
                set(&mut node, "tag", "span");
            } else {
                set(&mut node, "tag", "custom");
                set(&mut node, "customTag", tag);
            }
            set(&mut node, "text", child.inner_html());
            (node, false)
        }
    }
}

/// Append `node` under `nodes[parent]`; returns its index.
fn push(nodes: &mut Vec<ElementNode>, mut node: ElementNode, parent: usize) -> usize {
    if let Some(parent) = nodes.get_mut(parent) {
        node.parent.clone_from(&parent.id);
        parent.children.push(node.id.clone());
    }
    nodes.push(node);
    nodes.len() - 1
}
