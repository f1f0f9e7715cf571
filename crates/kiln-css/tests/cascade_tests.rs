//! Integration tests for cascade resolution against parsed HTML.

use kiln_css::{CascadeResolver, PseudoState, StyleDeclarationMap, compile_stylesheet};
use kiln_dom::{DomTree, NodeId};
use kiln_html::parse_html;

fn parse_css(css: &str) -> StyleDeclarationMap {
    compile_stylesheet(css)
}

/// First element carrying `id`.
fn find_by_id(tree: &DomTree, id: &str) -> NodeId {
    tree.descendants(tree.root())
        .find(|&n| tree.as_element(n).and_then(|e| e.id()) == Some(id))
        .unwrap()
}

#[test]
fn test_descendant_rule_beats_class_and_type() {
    let styles = parse_css(
        "p { color: black } .text { color: blue } .content .text { color: red; font-weight: bold }",
    );
    let tree = parse_html(r#"<div class="content"><p id="t" class="text">Hi</p></div>"#);
    let merged = CascadeResolver::new(&styles).match_merged(&tree, find_by_id(&tree, "t"));
    assert_eq!(merged.value("color"), Some("red"));
    assert_eq!(merged.value("font-weight"), Some("bold"));
}

#[test]
fn test_id_beats_class_beats_type() {
    let styles = parse_css("p { color: black } .text { color: blue } #x { color: green }");
    let tree = parse_html(r#"<p id="x" class="text">Hi</p>"#);
    let merged = CascadeResolver::new(&styles).match_merged(&tree, find_by_id(&tree, "x"));
    assert_eq!(merged.value("color"), Some("green"));
}

#[test]
fn test_source_order_breaks_ties() {
    let styles = parse_css(".a { color: red } .b { color: blue }");
    let tree = parse_html(r#"<p id="x" class="b a">Hi</p>"#);
    let merged = CascadeResolver::new(&styles).match_merged(&tree, find_by_id(&tree, "x"));
    assert_eq!(merged.value("color"), Some("blue"));
}

#[test]
fn test_descendant_rule_does_not_leak_to_other_instances() {
    let styles = parse_css(".content .text { color: red }");
    let tree = parse_html(r#"<p id="out" class="text">A</p><div class="content"><p id="in" class="text">B</p></div>"#);
    let resolver = CascadeResolver::new(&styles);

    let outside = resolver.match_classes(&tree, find_by_id(&tree, "out"));
    assert!(outside.complex_rules.is_empty());
    assert!(outside.properties_by_class["text"].is_empty());

    let inside = resolver.match_classes(&tree, find_by_id(&tree, "in"));
    assert_eq!(inside.complex_rules.len(), 1);
    assert!(inside.properties_by_class["text"].is_empty());
}

#[test]
fn test_per_class_splits_owners() {
    let styles = parse_css(
        "h2 { margin: 0 } .title { font-size: 2rem } .accent { color: red } \
         .title:hover { color: blue } h2:focus { outline: none }",
    );
    let tree = parse_html(r#"<h2 id="h" class="title accent">Hello</h2>"#);
    let matched = CascadeResolver::new(&styles).match_classes(&tree, find_by_id(&tree, "h"));

    let owners: Vec<&str> = matched.properties_by_class.keys().map(String::as_str).collect();
    assert_eq!(owners, vec!["title", "accent"]);
    assert_eq!(matched.properties_by_class["title"][0].name, "font-size");
    assert_eq!(matched.properties_by_class["accent"][0].name, "color");
    assert_eq!(matched.common_properties[0].name, "margin");
    assert!(matched.pseudo_by_class["title"].contains_key(&PseudoState::Hover));
    assert!(matched.common_pseudo.contains_key(&PseudoState::Focus));
}

#[test]
fn test_id_declarations_are_kept_apart_from_type() {
    let styles = parse_css("p { color: black } #x { color: green } .text { color: blue }");
    let tree = parse_html(r#"<p id="x" class="text">Hi</p>"#);
    let matched = CascadeResolver::new(&styles).match_classes(&tree, find_by_id(&tree, "x"));
    assert_eq!(matched.common_properties[0].value, "black");
    assert_eq!(matched.id_properties[0].value, "green");
    assert_eq!(matched.properties_by_class["text"][0].value, "blue");
}

#[test]
fn test_attribute_and_sibling_rules_are_complex() {
    let styles = parse_css(r#"a[target="_blank"] { color: red } li + li { margin-top: 4px }"#);
    let tree = parse_html(
        r#"<a id="l" href="/" target="_blank">x</a><ul><li id="a">1</li><li id="b">2</li></ul>"#,
    );
    let resolver = CascadeResolver::new(&styles);
    assert_eq!(resolver.match_classes(&tree, find_by_id(&tree, "l")).complex_rules.len(), 1);
    assert!(resolver.match_classes(&tree, find_by_id(&tree, "a")).complex_rules.is_empty());
    assert_eq!(resolver.match_classes(&tree, find_by_id(&tree, "b")).complex_rules.len(), 1);
}

#[test]
fn test_unparseable_selector_is_skipped() {
    let styles = parse_css("> .x { color: red } .y { color: blue }");
    let tree = parse_html(r#"<p id="p" class="x y">Hi</p>"#);
    let resolver = CascadeResolver::new(&styles);
    assert_eq!(resolver.rejected_selectors(), ["> .x".to_string()]);
    let merged = resolver.match_merged(&tree, find_by_id(&tree, "p"));
    assert_eq!(merged.value("color"), Some("blue"));
}
