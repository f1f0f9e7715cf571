//! Integration tests for selector matching on parsed documents.

use kiln_css::selector::{PseudoState, SelectorKind, parse_selector};
use kiln_dom::{DomTree, NodeId};
use kiln_html::parse_html;

fn find_by_id(tree: &DomTree, id: &str) -> NodeId {
    tree.descendants(tree.root())
        .find(|&n| tree.as_element(n).and_then(|e| e.id()) == Some(id))
        .unwrap()
}

fn matches(selector: &str, html: &str, id: &str) -> bool {
    let tree = parse_html(html);
    parse_selector(selector)
        .unwrap()
        .matches_in_tree(&tree, find_by_id(&tree, id))
}

#[test]
fn test_descendant_backtracks() {
    let html = r#"<div class="a"><section><div class="b"><p id="t">x</p></div></section></div>"#;
    assert!(matches(".a .b p", html, "t"));
    assert!(matches(".a > section p", html, "t"));
    assert!(!matches(".a > .b p", html, "t"));
}

#[test]
fn test_sibling_combinators() {
    let html = r#"<ul><li id="one">1</li><li id="two" class="x">2</li><li id="three">3</li></ul>"#;
    assert!(matches("li + .x", html, "two"));
    assert!(matches("#one ~ li", html, "three"));
    assert!(!matches(".x + li + li", html, "three"));
}

#[test]
fn test_structural_pseudo_classes() {
    let html = r#"<ul><li id="one">1</li><li id="two">2</li><li id="three">3</li></ul>"#;
    assert!(matches("li:first-child", html, "one"));
    assert!(matches("li:last-child", html, "three"));
    assert!(matches("li:nth-child(2n)", html, "two"));
    assert!(matches("li:nth-child(odd)", html, "three"));
    assert!(matches("li:not(:first-child)", html, "two"));
    assert!(!matches("li:not(:first-child)", html, "one"));
}

#[test]
fn test_attribute_operators() {
    let html = r#"<a id="l" href="https://example.com/docs.pdf" class="btn btn-lg" lang="en-US">x</a>"#;
    assert!(matches("[href]", html, "l"));
    assert!(matches("a[href^=\"https\"]", html, "l"));
    assert!(matches("a[href$='.pdf']", html, "l"));
    assert!(matches("a[href*=example]", html, "l"));
    assert!(matches("a[class~=btn-lg]", html, "l"));
    assert!(matches("a[lang|=en]", html, "l"));
    assert!(!matches("a[href=x]", html, "l"));
}

#[test]
fn test_state_selectors_never_match_statically() {
    let html = r#"<button id="b" class="btn">x</button>"#;
    assert!(!matches(".btn:hover", html, "b"));
    let parsed = parse_selector(".btn:hover").unwrap();
    assert_eq!(parsed.kind(), SelectorKind::Pseudo);
    assert_eq!(parsed.state(), Some(PseudoState::Hover));
    let tree = parse_html(html);
    assert!(
        parsed
            .without_pseudo()
            .unwrap()
            .matches_in_tree(&tree, find_by_id(&tree, "b"))
    );
}
