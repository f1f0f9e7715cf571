//! Property Mapper Registry.
//!
//! Maps single CSS declarations onto the structured settings object of the
//! site-builder schema. Each category module contributes a table of
//! `(property, mapper)` pairs; [`PropertyMapperRegistry`] composes them once.
//!
//! Anything a mapper cannot represent ends up in a [`CustomRules`] bucket and
//! is later emitted as literal CSS, so no declaration is ever lost.

mod background;
mod border;
mod box_model;
mod filter;
mod flex;
mod grid;
mod position;
mod shadow;
mod spacing;
mod transform;
mod transition;
mod typography;

use std::collections::HashMap;
use std::sync::OnceLock;

use indexmap::IndexMap;
use kiln_common::warning::warn_once;
use serde_json::map::Entry;
use serde_json::{Map, Value};

use crate::error::MapperError;
use crate::parser::Declaration;
use crate::values::{camel_to_kebab, resolve_vars};

pub use background::parse_gradient;
pub use shadow::{Shadow, parse_shadow};

/// Structured settings object, as serialized into the output document.
pub type Settings = Map<String, Value>;

/// A mapper writes one declaration into `settings`.
///
/// Receives the normalized property name so one function can serve a family
/// of properties (`margin-top`, `margin-left`, ...). Must be idempotent.
pub type MapperFn = fn(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError>;

/// Properties that are left out of the custom-CSS fallback when their mapper
/// fails: a structured field may already be partially set for them.
pub const NATIVE_PROPERTIES: [&str; 5] = ["display", "color", "font-size", "width", "height"];

/// Which family of layout settings the element uses.
///
/// Decided once per element, before mapping, so properties shared by flexbox
/// and grid (`gap`, `align-items`, `order`, ...) are mapped exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// Flexbox (and everything that is not grid).
    #[default]
    Flex,
    /// `display: grid` or `display: inline-grid`.
    Grid,
}

impl LayoutMode {
    /// Layout for a resolved `display` value.
    #[must_use]
    pub fn from_display(display: Option<&str>) -> Self {
        match display.map(str::trim) {
            Some(d) if d.eq_ignore_ascii_case("grid") || d.eq_ignore_ascii_case("inline-grid") => {
                Self::Grid
            }
            _ => Self::Flex,
        }
    }

    /// Layout from the last `display` in a declaration list.
    pub fn from_declarations<'d>(declarations: impl IntoIterator<Item = &'d Declaration>) -> Self {
        let display = declarations
            .into_iter()
            .filter(|d| d.name == "display")
            .last()
            .map(|d| d.value.as_str());
        Self::from_display(display)
    }
}

/// Inputs shared by every declaration mapped for one element.
#[derive(Debug, Clone, Copy)]
pub struct MapContext<'a> {
    /// Grid or flex, decided for the element up front.
    pub layout: LayoutMode,
    /// `:root` custom properties used to resolve `var()`.
    pub variables: &'a IndexMap<String, String>,
}

impl<'a> MapContext<'a> {
    /// Context with the given layout and variables.
    #[must_use]
    pub const fn new(layout: LayoutMode, variables: &'a IndexMap<String, String>) -> Self {
        Self { layout, variables }
    }
}

/// Declarations that could not be mapped, keyed by property name.
///
/// Later declarations of the same property replace earlier ones, which keeps
/// repeated application idempotent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomRules {
    declarations: IndexMap<String, String>,
}

impl CustomRules {
    /// Record `property: value`.
    pub fn insert(&mut self, property: &str, value: &str) {
        let _ = self
            .declarations
            .insert(property.to_string(), value.to_string());
    }

    /// Merge another bucket into this one.
    pub fn extend(&mut self, other: Self) {
        self.declarations.extend(other.declarations);
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Number of recorded properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Recorded value for `property`.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations.get(property).map(String::as_str)
    }

    /// `(property, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The bucket as a CSS rule for `selector`, or `None` when empty.
    #[must_use]
    pub fn to_css(&self, selector: &str) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let body: Vec<String> = self
            .iter()
            .map(|(property, value)| format!("  {property}: {value};"))
            .collect();
        Some(format!("{selector} {{\n{}\n}}", body.join("\n")))
    }
}

/// Normalized property name → mapper.
pub struct PropertyMapperRegistry {
    mappers: HashMap<&'static str, MapperFn>,
    grid_mappers: HashMap<&'static str, MapperFn>,
}

impl Default for PropertyMapperRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyMapperRegistry {
    /// Compose the per-category tables.
    #[must_use]
    pub fn new() -> Self {
        let mut mappers: HashMap<&'static str, MapperFn> = HashMap::new();
        for table in [
            box_model::MAPPERS,
            spacing::MAPPERS,
            position::MAPPERS,
            flex::MAPPERS,
            grid::MAPPERS,
            typography::MAPPERS,
            background::MAPPERS,
            border::MAPPERS,
            shadow::MAPPERS,
            transform::MAPPERS,
            filter::MAPPERS,
            transition::MAPPERS,
        ] {
            mappers.extend(table.iter().copied());
        }
        let grid_mappers = grid::SHARED_MAPPERS.iter().copied().collect();
        Self {
            mappers,
            grid_mappers,
        }
    }

    /// The process-wide registry, built on first use.
    #[must_use]
    pub fn global() -> &'static Self {
        static REGISTRY: OnceLock<PropertyMapperRegistry> = OnceLock::new();
        REGISTRY.get_or_init(Self::new)
    }

    /// Normalize a property name: lowercase kebab-case, converting camelCase
    /// (`backgroundColor`). Custom properties are returned unchanged.
    #[must_use]
    pub fn normalize_name(name: &str) -> String {
        let name = name.trim();
        if name.starts_with("--") {
            return name.to_string();
        }
        camel_to_kebab(name).to_ascii_lowercase()
    }

    /// Mapper for a normalized property name under `layout`.
    #[must_use]
    pub fn lookup(&self, property: &str, layout: LayoutMode) -> Option<MapperFn> {
        if layout == LayoutMode::Grid {
            if let Some(mapper) = self.grid_mappers.get(property) {
                return Some(*mapper);
            }
        }
        self.mappers.get(property).copied()
    }

    /// Whether any mapper exists for the property in either layout.
    #[must_use]
    pub fn is_mapped(&self, property: &str) -> bool {
        self.mappers.contains_key(property) || self.grid_mappers.contains_key(property)
    }

    /// Map `declarations` into `settings`, in order.
    ///
    /// `var()` references are resolved before mapping. Declarations without
    /// a mapper, or whose mapper fails, are returned as custom rules with
    /// their original value, except for [`NATIVE_PROPERTIES`] failures, which
    /// are only logged.
    pub fn apply<'d>(
        &self,
        declarations: impl IntoIterator<Item = &'d Declaration>,
        settings: &mut Settings,
        ctx: &MapContext<'_>,
    ) -> CustomRules {
        let mut custom = CustomRules::default();
        for declaration in declarations {
            let property = Self::normalize_name(&declaration.name);
            let original = if declaration.important {
                format!("{} !important", declaration.value)
            } else {
                declaration.value.clone()
            };
            let Some(mapper) = self.lookup(&property, ctx.layout) else {
                custom.insert(&property, &original);
                continue;
            };
            let value = resolve_vars(&declaration.value, ctx.variables);
            if let Err(err) = mapper(&property, value.trim(), settings) {
                let _ = warn_once("Mapper", &err.to_string());
                if !NATIVE_PROPERTIES.contains(&property.as_str()) {
                    custom.insert(&property, &original);
                }
            }
        }
        custom
    }
}

// ===== Helpers shared by the category modules =====

/// Set a string setting.
pub(crate) fn set_str(settings: &mut Settings, key: &str, value: impl Into<String>) {
    let _ = settings.insert(key.to_string(), Value::String(value.into()));
}

/// Run `f` on the object stored under `key`, creating it (or replacing a
/// non-object value) first. The key keeps its position when it already
/// exists.
pub(crate) fn with_object<R>(
    settings: &mut Settings,
    key: &str,
    f: impl FnOnce(&mut Settings) -> R,
) -> R {
    match settings.entry(key) {
        Entry::Occupied(mut occupied) => {
            if let Value::Object(map) = occupied.get_mut() {
                f(map)
            } else {
                let mut map = Map::new();
                let result = f(&mut map);
                let _ = occupied.insert(Value::Object(map));
                result
            }
        }
        Entry::Vacant(vacant) => {
            let mut map = Map::new();
            let result = f(&mut map);
            let _ = vacant.insert(Value::Object(map));
            result
        }
    }
}

/// Mapper for properties stored verbatim under a fixed key, looked up in
/// `table`.
pub(crate) fn keyword_key<'t>(table: &'t [(&str, &'t str)], property: &str) -> Option<&'t str> {
    table
        .iter()
        .find(|(css, _)| *css == property)
        .map(|(_, key)| *key)
}

/// Sides in output order.
pub(crate) const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_declaration_list;
    use quickcheck_macros::quickcheck;
    use serde_json::json;

    fn map(css: &str, layout: LayoutMode) -> (Settings, CustomRules) {
        let variables = IndexMap::new();
        let declarations = parse_declaration_list(css);
        let mut settings = Settings::new();
        let custom = PropertyMapperRegistry::global().apply(
            &declarations,
            &mut settings,
            &MapContext::new(layout, &variables),
        );
        (settings, custom)
    }

    #[test]
    fn test_unknown_property_goes_to_custom() {
        let (settings, custom) = map("color: red; scroll-snap-type: x mandatory", LayoutMode::Flex);
        assert!(settings.contains_key("_typography"));
        assert_eq!(custom.get("scroll-snap-type"), Some("x mandatory"));
        assert_eq!(
            custom.to_css(".a").unwrap(),
            ".a {\n  scroll-snap-type: x mandatory;\n}"
        );
    }

    #[test]
    fn test_layout_decides_shared_properties() {
        let (flex, _) = map("gap: 20px; align-items: center", LayoutMode::Flex);
        assert_eq!(flex["_rowGap"], json!("20"));
        assert_eq!(flex["_alignItems"], json!("center"));
        assert!(!flex.contains_key("_gridGap"));

        let (grid, _) = map("gap: 20px; align-items: center", LayoutMode::Grid);
        assert_eq!(grid["_gridGap"], json!("20"));
        assert_eq!(grid["_alignItemsGrid"], json!("center"));
        assert!(!grid.contains_key("_rowGap"));
    }

    #[test]
    fn test_camel_case_fallback() {
        assert_eq!(PropertyMapperRegistry::normalize_name("backgroundColor"), "background-color");
        assert_eq!(PropertyMapperRegistry::normalize_name("--brandColor"), "--brandColor");
    }

    #[test]
    fn test_var_resolution() {
        let mut variables = IndexMap::new();
        let _ = variables.insert("--gap".to_string(), "var(--base)".to_string());
        let _ = variables.insert("--base".to_string(), "12px".to_string());
        let declarations = parse_declaration_list("padding: var(--gap)");
        let mut settings = Settings::new();
        let custom = PropertyMapperRegistry::global().apply(
            &declarations,
            &mut settings,
            &MapContext::new(LayoutMode::Flex, &variables),
        );
        assert!(custom.is_empty());
        assert_eq!(settings["_padding"]["top"], json!("12"));
    }

    #[test]
    fn test_native_failure_is_not_duplicated() {
        let (_, custom) = map("width: 10px 20px", LayoutMode::Flex);
        assert!(custom.get("width").is_none());
    }

    #[test]
    fn test_layout_from_declarations() {
        let declarations = parse_declaration_list("display: flex; display: inline-grid");
        assert_eq!(LayoutMode::from_declarations(&declarations), LayoutMode::Grid);
        assert_eq!(LayoutMode::from_display(Some("block")), LayoutMode::Flex);
    }

    #[quickcheck]
    fn prop_apply_is_idempotent(pick: Vec<u8>) -> bool {
        const SAMPLES: [&str; 12] = [
            "margin: 1px 2px",
            "padding-left: 3em",
            "color: #abc",
            "background: #fff url(a.png) no-repeat center / cover",
            "border: 1px solid red",
            "border-radius: 4px 8px",
            "box-shadow: 0 2px 4px rgba(0, 0, 0, .2)",
            "transform: rotate(45deg) scale(1.2)",
            "transition: opacity .3s ease-in",
            "transition-duration: 1s",
            "filter: blur(2px) grayscale(50%)",
            "flex: 1 0 200px",
        ];
        let css: Vec<&str> = pick
            .iter()
            .map(|i| SAMPLES[usize::from(*i) % SAMPLES.len()])
            .collect();
        let declarations = parse_declaration_list(&css.join("; "));
        let variables = IndexMap::new();
        let ctx = MapContext::new(LayoutMode::Flex, &variables);
        let registry = PropertyMapperRegistry::global();

        let mut once = Settings::new();
        let _ = registry.apply(&declarations, &mut once, &ctx);
        let mut twice = once.clone();
        let _ = registry.apply(&declarations, &mut twice, &ctx);
        once == twice
    }
}
