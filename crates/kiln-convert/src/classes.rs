//! Global style class registry.
//!
//! One class per distinct class name, created on first sight and mutated in
//! place by later merges. Custom CSS contributed by different elements is
//! concatenated, never replaced.

use indexmap::IndexMap;
use kiln_common::IdGenerator;
use kiln_css::{CustomRules, Declaration, MapContext, PropertyMapperRegistry, PseudoState};
use serde_json::Value;

use crate::output::GlobalStyleClass;

/// Settings key holding literal CSS.
pub const CUSTOM_CSS_KEY: &str = "_cssCustom";

/// Classes of one conversion run, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct GlobalClassRegistry {
    classes: IndexMap<String, GlobalStyleClass>,
    /// Type and id declarations folded into each class by the element that
    /// seeded it.
    seeds: IndexMap<String, Vec<Declaration>>,
}

impl GlobalClassRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the class called `name`, creating it if needed. The flag is
    /// `true` when this call created it.
    pub fn get_or_create(&mut self, name: &str, ids: &mut IdGenerator) -> (String, bool) {
        if let Some(class) = self.classes.get(name) {
            return (class.id.clone(), false);
        }
        let class = GlobalStyleClass::new(ids.next_id(), name);
        let id = class.id.clone();
        let _ = self.classes.insert(name.to_string(), class);
        (id, true)
    }

    /// Class by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&GlobalStyleClass> {
        self.classes.get(name)
    }

    /// Name of the first class created.
    #[must_use]
    pub fn first_name(&self) -> Option<&str> {
        self.classes.keys().next().map(String::as_str)
    }

    /// Number of classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether no class exists yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Remember that `declarations` from type or id selectors were merged
    /// into the class.
    pub fn record_seed(&mut self, name: &str, declarations: &[Declaration]) {
        if declarations.is_empty() {
            return;
        }
        let seed = self.seeds.entry(name.to_string()).or_default();
        for declaration in declarations {
            if !seed.contains(declaration) {
                seed.push(declaration.clone());
            }
        }
    }

    /// Type and id declarations the class already carries.
    #[must_use]
    pub fn seeded(&self, name: &str) -> &[Declaration] {
        self.seeds.get(name).map_or(&[], Vec::as_slice)
    }

    /// Map `declarations` into the class's settings. Returns what could not
    /// be mapped; the caller decides how to scope it.
    pub fn merge(
        &mut self,
        name: &str,
        declarations: &[Declaration],
        ctx: &MapContext<'_>,
    ) -> CustomRules {
        let Some(class) = self.classes.get_mut(name) else {
            return CustomRules::default();
        };
        PropertyMapperRegistry::global().apply(declarations, &mut class.settings, ctx)
    }

    /// Map `declarations` into the class's settings for `state`.
    pub fn merge_pseudo(
        &mut self,
        name: &str,
        state: PseudoState,
        declarations: &[Declaration],
        ctx: &MapContext<'_>,
    ) -> CustomRules {
        let Some(class) = self.classes.get_mut(name) else {
            return CustomRules::default();
        };
        let settings = class.pseudo.entry(state).or_default();
        PropertyMapperRegistry::global().apply(declarations, settings, ctx)
    }

    /// Append literal CSS to the class. A fragment already present is not
    /// added again.
    pub fn append_custom_css(&mut self, name: &str, css: &str) {
        if let Some(class) = self.classes.get_mut(name) {
            append_css(&mut class.settings, css);
        }
    }

    /// Consume the registry, yielding classes in first-seen order.
    #[must_use]
    pub fn into_classes(self) -> Vec<GlobalStyleClass> {
        self.classes.into_values().collect()
    }
}

/// Append `css` to the `_cssCustom` setting, separated by a blank line.
/// Fragments already present are skipped.
pub fn append_css(settings: &mut kiln_css::Settings, css: &str) {
    let css = css.trim();
    if css.is_empty() {
        return;
    }
    let combined = match settings.get(CUSTOM_CSS_KEY).and_then(Value::as_str) {
        Some(existing) if existing.contains(css) => return,
        Some(existing) if !existing.is_empty() => format!("{existing}\n\n{css}"),
        _ => css.to_string(),
    };
    let _ = settings.insert(CUSTOM_CSS_KEY.to_string(), Value::String(combined));
}
