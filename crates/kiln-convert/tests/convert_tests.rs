//! End-to-end conversion tests.

use std::collections::HashSet;

use kiln_convert::{
    ConvertOptions, CssSelectorTarget, ElementNode, InlineStyleHandling, OutputDocument, convert,
    convert_with_report,
};
use quickcheck_macros::quickcheck;
use serde_json::{Value, json};

fn run(html: &str, css: &str) -> OutputDocument {
    convert(html, css, "", &ConvertOptions::default())
}

fn run_with(html: &str, css: &str, configure: impl FnOnce(&mut ConvertOptions)) -> OutputDocument {
    let mut options = ConvertOptions::default();
    configure(&mut options);
    convert(html, css, "", &options)
}

fn names(doc: &OutputDocument) -> Vec<&str> {
    doc.content.iter().map(|e| e.name.as_str()).collect()
}

fn class_ids(element: &ElementNode) -> Vec<&str> {
    element
        .settings
        .get("_cssGlobalClasses")
        .and_then(Value::as_array)
        .map(|ids| ids.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

/// Every parent and child reference resolves, ids are unique and each child
/// points back at the node listing it.
fn assert_tree_invariant(doc: &OutputDocument) {
    let ids: HashSet<&str> = doc.content.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids.len(), doc.content.len(), "duplicate element ids");
    for element in &doc.content {
        if element.parent != "0" {
            let parent = doc.element(&element.parent).expect("parent exists");
            assert!(parent.children.contains(&element.id));
        }
        for child in &element.children {
            let child = doc.element(child).expect("child exists");
            assert_eq!(child.parent, element.id);
        }
    }
}

// ===== Core properties =====

#[test]
fn test_heading_end_to_end() {
    let doc = run(
        r#"<h1 class="title">Hello</h1>"#,
        ".title { color: #ff0000; font-size: 32px }",
    );
    assert_eq!(doc.content.len(), 1);
    let heading = &doc.content[0];
    assert_eq!(heading.name, "heading");
    assert_eq!(heading.parent, "0");
    assert_eq!(heading.setting_str("tag"), Some("h1"));
    assert_eq!(heading.setting_str("text"), Some("Hello"));

    assert_eq!(doc.global_classes.len(), 1);
    let title = &doc.global_classes[0];
    assert_eq!(title.name, "title");
    assert_eq!(title.settings["_typography"]["color"], json!({"hex": "#ff0000"}));
    assert_eq!(title.settings["_typography"]["font-size"], json!("32"));
    assert_eq!(class_ids(heading), vec![title.id.as_str()]);
}

#[test]
fn test_empty_paragraph_is_pruned() {
    assert!(run("<p></p>", "").content.is_empty());
    assert!(run("<span>   </span>", "").content.is_empty());
}

#[test]
fn test_empty_div_is_kept() {
    let doc = run("<div></div>", "");
    assert_eq!(names(&doc), vec!["div"]);
}

#[test]
fn test_classes_are_deduplicated() {
    let doc = run(
        r#"<div class="box">a</div><div class="box">b</div>"#,
        ".box { color: red }",
    );
    let boxes: Vec<_> = doc.global_classes.iter().filter(|c| c.name == "box").collect();
    assert_eq!(boxes.len(), 1);
    let divs: Vec<_> = doc.content.iter().filter(|e| e.name == "div").collect();
    assert_eq!(divs.len(), 2);
    assert_eq!(class_ids(divs[0]), class_ids(divs[1]));
}

#[test]
fn test_conversion_is_deterministic() {
    let html = r#"<section class="hero"><div class="container"><h2>Hi</h2><p class="lead">Text</p></div></section>"#;
    let css = ".hero { padding: 40px 20px } .lead { font-size: 18px; zoom: 1.1 } h2 { margin: 0 }";
    let first = run(html, css).to_json().unwrap();
    let second = run(html, css).to_json().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_class_cascade_with_descendant_rule() {
    let doc = run(
        r#"<div class="content"><p class="text">Hi</p></div>"#,
        "p { color: black } .text { color: blue } .content .text { color: red; font-weight: bold }",
    );
    let text = doc.class_named("text").unwrap();
    assert_eq!(text.settings["_typography"]["color"], json!({"hex": "#0000ff"}));
    let css = text.custom_css().unwrap();
    assert!(css.contains(".content .text {"));
    assert!(css.contains("color: red;"));
    assert!(css.contains("font-weight: bold;"));
}

#[test]
fn test_id_outranks_class_in_seeded_class() {
    let doc = run(
        r#"<p id="x" class="text">Hi</p>"#,
        "p { color: black } .text { color: blue } #x { color: green }",
    );
    let text = doc.class_named("text").unwrap();
    assert_eq!(text.settings["_typography"]["color"], json!({"hex": "#008000"}));
    assert_eq!(doc.content[0].setting_str("_cssId"), Some("x"));
}

#[test]
fn test_unmapped_property_becomes_custom_css() {
    let doc = run(r#"<div class="card"></div>"#, ".card { zoom: 2; color: red }");
    let card = doc.class_named("card").unwrap();
    assert_eq!(card.custom_css(), Some(".card {\n  zoom: 2;\n}"));
    assert!(card.settings.contains_key("_typography"));
}

#[test]
fn test_gradient_background() {
    let doc = run(
        r#"<div class="g"></div>"#,
        ".g { background: linear-gradient(45deg, red 0%, blue 100%) }",
    );
    let gradient = &doc.class_named("g").unwrap().settings["_gradient"];
    assert_eq!(gradient["angle"], json!("45"));
    let stops = gradient["colorStops"].as_array().unwrap();
    assert_eq!(stops.len(), 2);
    assert_eq!(stops[0]["stop"], json!("0"));
    assert_eq!(stops[1]["stop"], json!("100"));
}

#[test]
fn test_tree_invariant_on_rich_document() {
    let doc = run(
        r#"<header class="site-header"><nav><ul><li><a href="/">Home</a></li><li><a href="/about">About</a></li></ul></nav></header>
        <section class="hero"><div class="container"><h1>Title</h1><p>Intro <strong>bold</strong></p>
        <a class="btn btn-primary" href="/go">Go</a><img src="a.png" alt="A"></div></section>
        <ul><li>One</li><li>Two<ul><li>Nested</li></ul></li></ul>
        <table><tr><td>1</td><th>2</th></tr></table>
        <form><label for="e">Email</label><input id="e" type="email" required><button type="submit">Join</button></form>"#,
        "",
    );
    assert!(doc.content.len() > 15);
    assert_tree_invariant(&doc);
}

#[quickcheck]
fn prop_tree_invariant_for_arbitrary_nesting(ops: Vec<u8>) -> bool {
    const TAGS: [&str; 15] = [
        "div", "section", "p", "span", "ul", "li", "a", "strong", "h2", "table", "tr", "td",
        "nav", "form", "article",
    ];
    let mut html = String::new();
    let mut open: Vec<&str> = Vec::new();
    for op in ops.into_iter().take(64) {
        if op % 4 == 0 {
            if let Some(tag) = open.pop() {
                html.push_str(&format!("</{tag}>"));
            }
        } else if op % 4 == 1 {
            html.push_str("text");
        } else {
            let tag = TAGS[usize::from(op) % TAGS.len()];
            html.push_str(&format!("<{tag} class=\"c{}\">", op % 3));
            open.push(tag);
        }
    }
    let doc = convert(&html, ".c0 { color: red } .c1 { margin: 4px }", "", &ConvertOptions::default());
    let ids: HashSet<&str> = doc.content.iter().map(|e| e.id.as_str()).collect();
    ids.len() == doc.content.len()
        && doc.content.iter().all(|e| {
            (e.parent == "0" || doc.element(&e.parent).is_some_and(|p| p.children.contains(&e.id)))
                && e.children
                    .iter()
                    .all(|c| doc.element(c).is_some_and(|c| c.parent == e.id))
        })
}

// ===== Processors =====

#[test]
fn test_structure_elements() {
    let doc = run(
        r#"<section><div class="container"><article><p>x</p></article></div></section>"#,
        "",
    );
    assert_eq!(names(&doc), vec!["section", "container", "div", "text-basic"]);
    assert_eq!(doc.content[2].setting_str("tag"), Some("article"));
    assert_eq!(doc.content[3].parent, doc.content[2].id);

    let doc = run(r#"<div class="spinner">a</div><div class="page-inner">b</div>"#, "");
    assert_eq!(names(&doc), vec!["div", "text-basic", "container", "text-basic"]);
}

#[test]
fn test_inline_formatting_at_block_level() {
    let doc = run("<div><strong>Bold</strong> and more</div>", "");
    assert_eq!(names(&doc), vec!["div", "text-basic", "text-basic"]);
    let strong = &doc.content[1];
    assert_eq!(strong.setting_str("tag"), Some("custom"));
    assert_eq!(strong.setting_str("customTag"), Some("strong"));
    assert_eq!(strong.setting_str("text"), Some("Bold"));
    assert_eq!(doc.content[2].setting_str("text"), Some("and more"));
}

#[test]
fn test_paragraph_keeps_inline_markup() {
    let doc = run("<p>Intro <em>now</em></p>", "");
    assert_eq!(doc.content.len(), 1);
    assert_eq!(doc.content[0].setting_str("tag"), Some("p"));
    assert_eq!(doc.content[0].setting_str("text"), Some("Intro <em>now</em>"));
}

#[test]
fn test_link_variants() {
    let doc = run(r#"<a href="/x" target="_blank" rel="noopener">Go</a>"#, "");
    let link = &doc.content[0];
    assert_eq!(link.name, "text-link");
    assert_eq!(link.setting_str("text"), Some("Go"));
    assert_eq!(
        link.settings["link"],
        json!({"type": "external", "url": "/x", "newTab": true, "rel": "noopener"})
    );

    let doc = run(r#"<a href="/x"> <img src="a.png" alt="A"> </a>"#, "");
    assert_eq!(names(&doc), vec!["image"]);
    assert_eq!(doc.content[0].settings["link"]["url"], json!("/x"));
    assert_eq!(doc.content[0].setting_str("altText"), Some("A"));

    let doc = run(r#"<a href="/card"><div>Card</div></a>"#, "");
    assert_eq!(names(&doc), vec!["div", "div", "text-basic"]);
    assert_eq!(doc.content[0].setting_str("tag"), Some("a"));
    assert_eq!(doc.content[0].settings["link"]["url"], json!("/card"));
}

#[test]
fn test_image_settings() {
    let doc = run(r#"<img src="hero.jpg" alt="Hero" loading="lazy" data-role="banner">"#, "");
    let image = &doc.content[0];
    assert_eq!(image.settings["image"], json!({"url": "hero.jpg", "external": true}));
    assert_eq!(image.setting_str("loading"), Some("lazy"));
    let attributes = image.settings["_attributes"].as_array().unwrap();
    assert_eq!(attributes.len(), 1);
    assert_eq!(attributes[0]["name"], json!("data-role"));

    let doc = run(r#"<picture><source srcset="a.webp"><img src="a.jpg" alt=""></picture>"#, "");
    assert_eq!(names(&doc), vec!["image"]);
    assert_eq!(doc.content[0].settings["image"]["url"], json!("a.jpg"));
}

#[test]
fn test_buttons() {
    let doc = run(
        r#"<a class="btn btn-primary btn-lg" href="/go">Go</a><button>Send</button><input type="submit" value="Save">"#,
        "",
    );
    assert_eq!(names(&doc), vec!["button", "button", "button"]);
    let anchor = &doc.content[0];
    assert_eq!(anchor.setting_str("tag"), Some("a"));
    assert_eq!(anchor.setting_str("style"), Some("primary"));
    assert_eq!(anchor.setting_str("size"), Some("lg"));
    assert_eq!(anchor.settings["link"]["url"], json!("/go"));
    assert_eq!(doc.content[1].setting_str("tag"), Some("button"));
    assert_eq!(doc.content[2].setting_str("text"), Some("Save"));
}

#[test]
fn test_table_cells_are_terminal() {
    let doc = run("<table><tr><td>A <b>1</b></td><th>B</th></tr></table>", "");
    let tags: Vec<Option<&str>> = doc.content.iter().map(|e| e.setting_str("tag")).collect();
    assert_eq!(
        tags,
        vec![Some("table"), Some("tbody"), Some("tr"), Some("td"), Some("th")]
    );
    assert_eq!(doc.content[3].setting_str("text"), Some("A <b>1</b>"));
}

#[test]
fn test_list_items() {
    let doc = run("<ul><li>One</li><li>Two<ul><li>Nested</li></ul></li></ul>", "");
    assert_eq!(names(&doc), vec!["div", "text-basic", "div", "div", "text-basic"]);
    assert_eq!(doc.content[1].setting_str("tag"), Some("li"));
    assert_eq!(doc.content[1].setting_str("text"), Some("One"));
    let item = &doc.content[2];
    assert_eq!(item.setting_str("tag"), Some("li"));
    assert_eq!(item.setting_str("text"), Some("Two"));
    assert_eq!(item.children, vec![doc.content[3].id.clone()]);
    assert_eq!(doc.content[4].setting_str("text"), Some("Nested"));
}

#[test]
fn test_form_fields() {
    let doc = run(
        r#"<form action="/subscribe">
            <label for="e">Email</label><input id="e" name="email" type="email" placeholder="you@example.com" required>
            <label><input type="radio" name="plan" value="a"> Basic</label>
            <label><input type="radio" name="plan" value="b"> Pro</label>
            <select name="size"><option>S</option><option>M</option></select>
            <textarea name="msg" placeholder="Message"></textarea>
            <input type="hidden" name="token" value="x">
            <button type="submit">Join</button>
        </form>"#,
        "",
    );
    assert_eq!(names(&doc), vec!["form"]);
    let form = &doc.content[0];
    assert!(form.children.is_empty());
    let fields = form.settings["fields"].as_array().unwrap();
    assert_eq!(fields.len(), 4);
    assert_eq!(fields[0]["type"], json!("email"));
    assert_eq!(fields[0]["label"], json!("Email"));
    assert_eq!(fields[0]["placeholder"], json!("you@example.com"));
    assert_eq!(fields[0]["required"], json!(true));
    assert_eq!(fields[1]["type"], json!("radio"));
    assert_eq!(fields[1]["options"], json!("Basic\nPro"));
    assert_eq!(fields[2]["options"], json!("S\nM"));
    assert_eq!(fields[3]["type"], json!("textarea"));
    assert_eq!(form.setting_str("submitButtonText"), Some("Join"));
    assert_eq!(form.settings["actions"], json!(["email"]));
}

#[test]
fn test_standalone_control_is_code() {
    let doc = run(r#"<div><input type="text" name="q"></div>"#, "");
    assert_eq!(names(&doc), vec!["div", "code"]);
    assert!(doc.content[1].setting_str("code").unwrap().starts_with("<input"));
}

#[test]
fn test_media_elements() {
    let doc = run(
        r#"<video src="clip.mp4" controls muted poster="p.jpg"></video>
        <iframe src="https://www.youtube.com/embed/abc123?rel=0"></iframe>
        <iframe src="https://maps.example.com/embed"></iframe>
        <audio controls><source src="song.mp3"></audio>"#,
        "",
    );
    assert_eq!(names(&doc), vec!["video", "video", "code", "audio"]);
    let video = &doc.content[0];
    assert_eq!(video.setting_str("videoType"), Some("media"));
    assert_eq!(video.settings["media"]["url"], json!("clip.mp4"));
    assert_eq!(video.settings["controls"], json!(true));
    assert_eq!(video.settings["muted"], json!(true));
    assert!(!video.settings.contains_key("autoplay"));
    assert_eq!(video.setting_str("poster"), Some("p.jpg"));
    assert_eq!(doc.content[1].setting_str("youTubeId"), Some("abc123"));
    assert_eq!(doc.content[3].settings["file"]["url"], json!("song.mp3"));
}

#[test]
fn test_navigation_is_composite() {
    let doc = run(
        r#"<nav class="main"><ul><li><a href="/">Home</a></li><li><a class="btn" href="/buy">Buy</a></li></ul></nav>"#,
        "",
    );
    assert_eq!(
        names(&doc),
        vec!["div", "div", "div", "text-link", "div", "button"]
    );
    let wrapper = &doc.content[0];
    assert_eq!(wrapper.setting_str("tag"), Some("nav"));
    assert_eq!(wrapper.label.as_deref(), Some("Navigation"));
    assert_eq!(doc.content[1].setting_str("tag"), Some("ul"));
    assert_eq!(doc.content[3].settings["link"]["url"], json!("/"));
    assert_tree_invariant(&doc);
}

#[test]
fn test_alert_beats_div() {
    let doc = run(r#"<div class="alert alert-success">Saved <b>ok</b></div>"#, "");
    assert_eq!(names(&doc), vec!["alert"]);
    assert_eq!(doc.content[0].setting_str("type"), Some("success"));
    assert_eq!(doc.content[0].setting_str("content"), Some("Saved <b>ok</b>"));
}

#[test]
fn test_misc_elements() {
    let doc = run(
        r#"<div><hr><i class="fas fa-star"></i><pre class="language-rust">fn main() {}</pre>
        <svg viewBox="0 0 10 10"><circle r="5"></circle></svg><br></div>"#,
        "",
    );
    assert_eq!(names(&doc), vec!["div", "divider", "icon", "code", "svg"]);
    assert_eq!(
        doc.content[2].settings["icon"],
        json!({"library": "fontawesomeSolid", "icon": "fas fa-star"})
    );
    assert_eq!(doc.content[3].setting_str("code"), Some("fn main() {}"));
    assert_eq!(doc.content[3].setting_str("language"), Some("rust"));
    assert_eq!(doc.content[4].setting_str("source"), Some("code"));
    assert!(doc.content[4].setting_str("code").unwrap().starts_with("<svg"));
}

#[test]
fn test_unknown_element_falls_back() {
    let doc = run("<my-widget><p>Inside</p></my-widget><x-label>Hi</x-label>", "");
    assert_eq!(names(&doc), vec!["div", "text-basic", "text-basic"]);
    assert_eq!(doc.content[0].setting_str("tag"), Some("my-widget"));
    assert_eq!(doc.content[2].setting_str("customTag"), Some("x-label"));
}

// ===== Scripts =====

#[test]
fn test_script_only_payload_uses_head() {
    let doc = run("<script>var a = 1;</script>", "");
    assert_eq!(names(&doc), vec!["code"]);
    assert!(doc.content[0].setting_str("code").unwrap().contains("var a = 1;"));
}

#[test]
fn test_body_scripts_need_include_js() {
    let html = "<div>x</div><script>track()</script>";
    assert!(!names(&run(html, "")).contains(&"code"));
    let doc = run_with(html, "", |o| o.include_js = true);
    assert!(names(&doc).contains(&"code"));
}

#[test]
fn test_include_js_appends_root_code() {
    let mut options = ConvertOptions::default();
    options.include_js = true;
    let doc = convert("<div></div>", "", "console.log(1)", &options);
    let last = doc.content.last().unwrap();
    assert_eq!(last.name, "code");
    assert_eq!(last.parent, "0");
    assert_eq!(last.setting_str("code"), Some("<script>\nconsole.log(1)\n</script>"));

    let doc = convert("<div></div>", "", "console.log(1)", &ConvertOptions::default());
    assert_eq!(names(&doc), vec!["div"]);
}

// ===== Styling options =====

#[test]
fn test_inline_styles_map_to_element() {
    let doc = run(r#"<div style="color: red; zoom: 2"></div>"#, "");
    let div = &doc.content[0];
    assert_eq!(div.settings["_typography"]["color"], json!({"hex": "#ff0000"}));
    assert_eq!(
        div.setting_str("_cssCustom"),
        Some(format!("#brxe-{} {{\n  zoom: 2;\n}}", div.id).as_str())
    );
    assert!(doc.global_classes.is_empty());
}

#[test]
fn test_inline_styles_skipped() {
    let doc = run_with(r#"<div style="color: red"></div>"#, "", |o| {
        o.inline_style_handling = InlineStyleHandling::Skip;
    });
    assert!(doc.content[0].settings.is_empty());
}

#[test]
fn test_inline_styles_into_class() {
    let doc = run_with(r#"<div class="card" style="color: red"></div>"#, "", |o| {
        o.inline_style_handling = InlineStyleHandling::Class;
    });
    let card = doc.class_named("card").unwrap();
    assert_eq!(card.settings["_typography"]["color"], json!({"hex": "#ff0000"}));
    assert!(!doc.content[0].settings.contains_key("_typography"));

    let doc = run_with(r#"<div style="color: red"></div>"#, "", |o| {
        o.inline_style_handling = InlineStyleHandling::Class;
    });
    let div = &doc.content[0];
    let class = doc.class_named(&format!("div-{}", div.id)).unwrap();
    assert_eq!(class_ids(div), vec![class.id.as_str()]);
}

#[test]
fn test_synthetic_classes_for_classless_elements() {
    let doc = run("<p>One</p><p>Two</p>", "p { color: red }");
    assert_eq!(doc.global_classes.len(), 1);
    let class = doc.class_named("tag-p").unwrap();
    assert_eq!(class.settings["_typography"]["color"], json!({"hex": "#ff0000"}));
    for p in &doc.content {
        assert_eq!(class_ids(p), vec![class.id.as_str()]);
        assert!(!p.settings.contains_key("_typography"));
    }

    let doc = run(r#"<p id="intro">Hi</p>"#, "#intro { margin: 0 }");
    assert!(doc.class_named("p-intro").is_some());
}

#[test]
fn test_common_declarations_seed_first_class_once() {
    let doc = run(
        r#"<p class="a">One</p><p class="a">Two</p><h2 class="a">Three</h2>"#,
        "p { margin: 0 } h2 { padding: 8px } .a { color: red }",
    );
    let a = doc.class_named("a").unwrap();
    assert!(a.settings.contains_key("_margin"));
    assert!(!a.settings.contains_key("_padding"));
    assert!(!doc.content[0].settings.contains_key("_margin"));
    assert!(!doc.content[1].settings.contains_key("_margin"));
    assert!(doc.content[2].settings.contains_key("_padding"));
}

#[test]
fn test_class_rule_beats_tag_rule_on_every_element() {
    let doc = run(
        r#"<p class="text">One</p><p class="text">Two</p>"#,
        "p { color: black } .text { color: blue }",
    );
    let text = doc.class_named("text").unwrap();
    assert_eq!(text.settings["_typography"]["color"], json!({"hex": "#0000ff"}));
    for element in &doc.content {
        assert!(!element.settings.contains_key("_typography"), "{element:?}");
    }
}

#[test]
fn test_losing_tag_rule_stays_off_element_without_merging() {
    let doc = run_with(r#"<p class="a">x</p>"#, "p { color: red } .a { color: blue }", |o| {
        o.merge_non_class_selectors = false;
    });
    let a = doc.class_named("a").unwrap();
    assert_eq!(a.settings["_typography"]["color"], json!({"hex": "#0000ff"}));
    assert!(!doc.content[0].settings.contains_key("_typography"));
}

#[test]
fn test_compound_class_rule_reaches_both_classes() {
    let doc = run(r#"<div class="btn primary">x</div>"#, ".btn.primary { color: white }");
    for name in ["btn", "primary"] {
        let class = doc.class_named(name).unwrap();
        assert_eq!(class.settings["_typography"]["color"], json!({"hex": "#ffffff"}), "{name}");
    }
}

#[test]
fn test_merge_non_class_selectors_disabled() {
    let doc = run_with(r#"<p class="a">x</p>"#, "p { color: red } .a { margin: 0 }", |o| {
        o.merge_non_class_selectors = false;
    });
    let a = doc.class_named("a").unwrap();
    assert!(!a.settings.contains_key("_typography"));
    assert!(a.settings.contains_key("_margin"));
    assert_eq!(doc.content[0].settings["_typography"]["color"], json!({"hex": "#ff0000"}));

    let doc = run_with("<p>x</p>", "p { color: red }", |o| o.merge_non_class_selectors = false);
    assert!(doc.global_classes.is_empty());
}

#[test]
fn test_only_first_class_gets_common() {
    let doc = run(
        r#"<h2 class="title accent">Hi</h2>"#,
        "h2 { margin: 0 } .title { font-size: 2rem } .accent { color: red }",
    );
    let title = doc.class_named("title").unwrap();
    let accent = doc.class_named("accent").unwrap();
    assert!(title.settings.contains_key("_margin"));
    assert!(!accent.settings.contains_key("_margin"));
    assert!(accent.settings.contains_key("_typography"));
    assert_eq!(class_ids(&doc.content[0]), vec![title.id.as_str(), accent.id.as_str()]);
}

#[test]
fn test_selector_target_id() {
    let doc = run_with(
        r#"<div class="card"><p class="t">x</p></div>"#,
        ".card { zoom: 2 } .card .t { color: red }",
        |o| o.css_selector_target = CssSelectorTarget::Id,
    );
    let card_node = &doc.content[0];
    assert!(doc.class_named("card").unwrap().custom_css().is_none());
    let css = card_node.setting_str("_cssCustom").unwrap();
    assert!(css.starts_with(&format!("#brxe-{} {{", card_node.id)));

    let p = &doc.content[1];
    let css = p.setting_str("_cssCustom").unwrap();
    assert!(css.contains(&format!("#brxe-{}", p.id)));
    assert!(!css.contains(".card .t"));
}

#[test]
fn test_pseudo_states_on_class() {
    let doc = run(
        r#"<a class="btn" href="/go">Go</a>"#,
        ".btn { color: white } .btn:hover { color: blue; cursor: pointer }",
    );
    let btn = doc.class_named("btn").unwrap();
    assert_eq!(
        btn.pseudo[&kiln_css::PseudoState::Hover]["_typography"]["color"],
        json!({"hex": "#0000ff"})
    );
    let json: Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
    assert!(json["globalClasses"][0]["pseudo"]["hover"].is_object());
}

#[test]
fn test_show_node_class_labels() {
    let doc = run_with(r#"<div class="card big"></div><div></div>"#, "", |o| {
        o.show_node_class = true;
    });
    assert_eq!(doc.content[0].label.as_deref(), Some("card"));
    assert_eq!(doc.content[1].label, None);
}

#[test]
fn test_global_css_goes_to_first_class() {
    let doc = run(
        r#"<div class="card"></div>"#,
        ":root { --brand: red } .card { color: var(--brand) } \
         @keyframes pulse { to { opacity: .5 } } @media (max-width: 600px) { .card { padding: 0 } }",
    );
    let card = doc.class_named("card").unwrap();
    assert_eq!(card.settings["_typography"]["color"], json!({"hex": "#ff0000"}));
    let css = card.custom_css().unwrap();
    assert!(css.contains(":root {"));
    assert!(css.contains("@keyframes pulse"));
    assert!(css.contains("@media (max-width: 600px)"));

    let doc = run("<div></div>", "@font-face { font-family: X }");
    assert_eq!(doc.global_classes[0].name, "global-styles");
}

#[test]
fn test_attribute_passthrough() {
    let doc = run(
        r#"<div id="main" data-id="7" aria-label="Main" class="x" style="margin: 0"></div><a href="/x" data-track="1">Go</a>"#,
        "",
    );
    let div = &doc.content[0];
    assert_eq!(div.setting_str("_cssId"), Some("main"));
    let names: Vec<&Value> = div.settings["_attributes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| &a["name"])
        .collect();
    assert_eq!(names, vec![&json!("data-id"), &json!("aria-label")]);

    let link = &doc.content[1];
    let attributes = link.settings["_attributes"].as_array().unwrap();
    assert_eq!(attributes.len(), 1);
    assert_eq!(attributes[0]["name"], json!("data-track"));
    assert_eq!(attributes[0]["value"], json!("1"));
}

// ===== Envelope and diagnostics =====

#[test]
fn test_output_envelope() {
    let doc = run(r#"<h1 class="t">Hi</h1>"#, ".t { color: red }");
    let json: Value = serde_json::from_str(&doc.to_json_pretty().unwrap()).unwrap();
    let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["content", "source", "sourceUrl", "version", "globalClasses", "globalElements"]
    );
    assert_eq!(json["source"], json!("bricksCopiedElements"));
    assert_eq!(json["globalElements"], json!([]));
    let element = json["content"][0].as_object().unwrap();
    assert!(!element.contains_key("label"));
    assert!(!element.contains_key("source"));
    assert_eq!(element["parent"], json!("0"));
}

#[test]
fn test_report_collects_issues() {
    let report = convert_with_report(
        "<p>Hi</p>",
        ".a { color: red",
        "",
        &ConvertOptions::default(),
    );
    assert_eq!(report.document.content.len(), 1);
    assert!(report.issues.iter().any(|i| i.starts_with("stylesheet ignored")));

    let report = convert_with_report(
        "<p>Hi</p>",
        "> p { color: red } p { margin: 0 }",
        "",
        &ConvertOptions::default(),
    );
    assert!(report.issues.iter().any(|i| i.contains("selector ignored")));
    assert!(report.document.class_named("tag-p").is_some());
}
