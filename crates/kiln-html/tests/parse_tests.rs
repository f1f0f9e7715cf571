//! Tests for HTML parsing into the arena.

use kiln_dom::{DomTree, NodeId};
use kiln_html::parse_html;

fn body_elements(tree: &DomTree) -> Vec<NodeId> {
    let body = tree.body().expect("parser always synthesizes a body");
    tree.element_children(body).collect()
}

#[test]
fn test_fragment_gets_document_structure() {
    let tree = parse_html("<p>Hello</p>");
    assert!(tree.document_element().is_some());
    assert!(tree.head().is_some());
    let elements = body_elements(&tree);
    assert_eq!(elements.len(), 1);
    assert_eq!(tree.tag_name(elements[0]), Some("p"));
    assert_eq!(tree.text_content(elements[0]), "Hello");
}

#[test]
fn test_attributes_keep_source_order() {
    let tree = parse_html(r#"<a href="/about" class="nav-link active" target="_blank">About</a>"#);
    let a = body_elements(&tree)[0];
    let element = tree.as_element(a).unwrap();
    let names: Vec<&str> = element.attrs.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["href", "class", "target"]);
    assert_eq!(element.classes(), vec!["nav-link", "active"]);
}

#[test]
fn test_children_preserve_dom_order() {
    let tree = parse_html("<ul><li>a</li><li>b</li><li>c</li></ul>");
    let ul = body_elements(&tree)[0];
    let texts: Vec<String> = tree
        .element_children(ul)
        .map(|li| tree.text_content(li))
        .collect();
    assert_eq!(texts, vec!["a", "b", "c"]);
}

#[test]
fn test_bare_script_lands_in_head() {
    let tree = parse_html("<script>console.log(1)</script>");
    let head = tree.head().unwrap();
    let script = tree.element_children(head).next().unwrap();
    assert_eq!(tree.tag_name(script), Some("script"));
    assert!(body_elements(&tree).is_empty());
}

#[test]
fn test_malformed_markup_is_repaired() {
    let tree = parse_html("<div><p>one<p>two</div>");
    let div = body_elements(&tree)[0];
    let paragraphs: Vec<NodeId> = tree.element_children(div).collect();
    assert_eq!(paragraphs.len(), 2);
    assert_eq!(tree.text_content(paragraphs[1]), "two");
}

#[test]
fn test_svg_subtree_is_kept() {
    let tree = parse_html(r#"<svg viewBox="0 0 10 10"><path d="M0 0"/></svg>"#);
    let svg = body_elements(&tree)[0];
    assert_eq!(tree.tag_name(svg), Some("svg"));
    assert!(tree.outer_html(svg).contains("<path d=\"M0 0\">"));
}
