//! Tests for arena structure, traversal and serialization.

use kiln_dom::{DomTree, ElementData, NodeId};

/// Helper to create an element under `parent` with an optional class list.
fn make_element(tree: &mut DomTree, parent: NodeId, tag: &str, class: Option<&str>) -> NodeId {
    let mut data = ElementData::new(tag);
    if let Some(class) = class {
        data = data.with_attr("class", class);
    }
    tree.append_element(parent, data)
}

#[test]
fn test_append_child_links_siblings() {
    let mut tree = DomTree::new();
    let parent = make_element(&mut tree, NodeId::ROOT, "div", None);
    let a = make_element(&mut tree, parent, "a", None);
    let b = make_element(&mut tree, parent, "b", None);
    let c = make_element(&mut tree, parent, "c", None);

    assert_eq!(tree.children(parent), &[a, b, c]);
    assert_eq!(tree.prev_sibling(a), None);
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(c), Some(b));
    assert_eq!(tree.parent(b), Some(parent));
}

#[test]
fn test_classes_keep_source_order_and_dedupe() {
    let data = ElementData::new("div").with_attr("class", "  card  featured card\tdark ");
    assert_eq!(data.classes(), vec!["card", "featured", "dark"]);
    assert!(data.has_class("dark"));
    assert!(!data.has_class("car"));
}

#[test]
fn test_empty_id_is_none() {
    let data = ElementData::new("div").with_attr("id", "");
    assert_eq!(data.id(), None);
    let data = ElementData::new("div").with_attr("id", "hero");
    assert_eq!(data.id(), Some("hero"));
}

#[test]
fn test_body_and_head_lookup() {
    let mut tree = DomTree::new();
    let html = make_element(&mut tree, NodeId::ROOT, "html", None);
    let head = make_element(&mut tree, html, "head", None);
    let body = make_element(&mut tree, html, "body", None);
    assert_eq!(tree.document_element(), Some(html));
    assert_eq!(tree.head(), Some(head));
    assert_eq!(tree.body(), Some(body));
}

#[test]
fn test_ancestors_and_preceding_siblings() {
    let mut tree = DomTree::new();
    let outer = make_element(&mut tree, NodeId::ROOT, "div", Some("content"));
    let first = make_element(&mut tree, outer, "h2", None);
    let _ = tree.append_text(outer, "\n");
    let second = make_element(&mut tree, outer, "p", Some("text"));

    let ancestors: Vec<_> = tree.ancestors(second).collect();
    assert_eq!(ancestors, vec![outer, NodeId::ROOT]);
    assert!(tree.is_descendant_of(second, outer));
    assert_eq!(tree.prev_element_sibling(second), Some(first));
}

#[test]
fn test_descendants_pre_order() {
    let mut tree = DomTree::new();
    let root = make_element(&mut tree, NodeId::ROOT, "ul", None);
    let li1 = make_element(&mut tree, root, "li", None);
    let t1 = tree.append_text(li1, "one");
    let li2 = make_element(&mut tree, root, "li", None);
    let order: Vec<_> = tree.descendants(root).collect();
    assert_eq!(order, vec![root, li1, t1, li2]);
}

#[test]
fn test_text_content_and_visibility() {
    let mut tree = DomTree::new();
    let p = make_element(&mut tree, NodeId::ROOT, "p", None);
    let _ = tree.append_text(p, "Hello ");
    let strong = make_element(&mut tree, p, "strong", None);
    let _ = tree.append_text(strong, "world");
    assert_eq!(tree.text_content(p), "Hello world");
    assert!(tree.has_visible_text(p));

    let empty = make_element(&mut tree, NodeId::ROOT, "span", None);
    let _ = tree.append_text(empty, "  \n ");
    assert!(!tree.has_visible_text(empty));
}

#[test]
fn test_inner_html_keeps_attributes_in_order() {
    let mut tree = DomTree::new();
    let h1 = make_element(&mut tree, NodeId::ROOT, "h1", None);
    let _ = tree.append_text(h1, "Fish & ");
    let a = tree.append_element(
        h1,
        ElementData::new("a").with_attr("href", "/x").with_attr("title", "say \"hi\""),
    );
    let _ = tree.append_text(a, "Chips");
    assert_eq!(
        tree.inner_html(h1),
        "Fish &amp; <a href=\"/x\" title=\"say &quot;hi&quot;\">Chips</a>"
    );
}

#[test]
fn test_script_text_is_not_escaped() {
    let mut tree = DomTree::new();
    let script = make_element(&mut tree, NodeId::ROOT, "script", None);
    let _ = tree.append_text(script, "if (a < b) { go(); }");
    assert_eq!(tree.inner_html(script), "if (a < b) { go(); }");
}
