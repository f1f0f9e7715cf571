//! Integration tests for the Property Mapper Registry.

use indexmap::IndexMap;
use kiln_css::mapping::parse_gradient;
use kiln_css::{LayoutMode, MapContext, PropertyMapperRegistry, Settings, parse_declaration_list};
use serde_json::json;

fn map_css(css: &str) -> (Settings, kiln_css::CustomRules) {
    let variables = IndexMap::new();
    let mut settings = Settings::new();
    let custom = PropertyMapperRegistry::global().apply(
        &parse_declaration_list(css),
        &mut settings,
        &MapContext::new(LayoutMode::Flex, &variables),
    );
    (settings, custom)
}

#[test]
fn test_gradient_decomposition() {
    let gradient = parse_gradient("linear-gradient(45deg, red 0%, blue 100%)").unwrap();
    assert_eq!(gradient["angle"], json!("45"));
    assert_eq!(gradient["colorStops"][0]["stop"], json!("0"));
    assert_eq!(gradient["colorStops"][1]["stop"], json!("100"));
}

#[test]
fn test_background_image_gradient_goes_to_gradient_key() {
    let (settings, custom) = map_css("background-image: linear-gradient(to bottom, #fff, #000)");
    assert!(custom.is_empty());
    assert_eq!(settings["_gradient"]["direction"], json!("to bottom"));
}

#[test]
fn test_unmapped_property_is_kept_as_css() {
    let (_, custom) = map_css("clip-path: circle(50%); color: red");
    assert_eq!(custom.get("clip-path"), Some("circle(50%)"));
    assert_eq!(custom.len(), 1);
}

#[test]
fn test_demoted_values_are_kept_as_css() {
    let (settings, custom) = map_css(
        "box-shadow: 0 1px 2px #000, 0 4px 8px #000; filter: drop-shadow(0 0 4px red); \
         background: url(a.png), url(b.png)",
    );
    assert!(settings.is_empty());
    assert_eq!(custom.len(), 3);
}

#[test]
fn test_important_is_preserved_in_custom_css() {
    let (_, custom) = map_css("user-select: none !important");
    assert_eq!(custom.get("user-select"), Some("none !important"));
}

#[test]
fn test_end_to_end_title() {
    let (settings, custom) = map_css("color: #ff0000; font-size: 32px");
    assert!(custom.is_empty());
    assert_eq!(
        settings["_typography"],
        json!({"color": {"hex": "#ff0000"}, "font-size": "32"})
    );
}
