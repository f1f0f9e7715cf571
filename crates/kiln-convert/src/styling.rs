//! Styling and attribute decoration of built nodes.
//!
//! Runs after a processor has set an element's type-specific settings:
//! resolves its classes through the global class registry, maps element-local
//! declarations, scopes custom CSS and passes the remaining attributes
//! through.

use kiln_css::values::escape_class_name;
use kiln_css::{
    ClassMatch, CustomRules, Declaration, LayoutMode, MapContext, PropertyMapperRegistry,
    PseudoState, parse_declaration_list,
};
use serde_json::{Value, json};

use crate::builder::{BuildContext, ElementView};
use crate::classes::append_css;
use crate::options::{CssSelectorTarget, InlineStyleHandling};
use crate::output::ElementNode;

/// Attributes folded into settings by the element's processor.
fn consumed_attributes(name: &str) -> &'static [&'static str] {
    match name {
        "text-link" | "button" => &["href", "target", "rel", "type", "value"],
        "div" => &["href", "target", "rel"],
        "image" => &[
            "src", "data-src", "alt", "srcset", "sizes", "loading", "width", "height", "href",
            "target", "rel",
        ],
        "video" | "audio" => &[
            "src", "poster", "controls", "autoplay", "loop", "muted", "playsinline", "preload",
            "width", "height", "frameborder", "allow", "allowfullscreen",
        ],
        "form" => &["action", "method"],
        _ => &[],
    }
}

/// Element types whose settings embed the element's markup.
const RAW_MARKUP_ELEMENTS: &[&str] = &["code", "svg"];

/// Attach classes, element styles, label and attributes to `node`.
pub(crate) fn decorate(ctx: &mut BuildContext<'_>, node: &mut ElementNode) {
    let Some(source) = node.source else {
        return;
    };
    let Some(view) = ctx.view(source) else {
        return;
    };
    apply_styles(ctx, view, node);

    if ctx.options.show_node_class && node.label.is_none() {
        node.label = view.classes().first().map(ToString::to_string);
    }
    if let Some(id) = view.element.id() {
        let _ = node
            .settings
            .insert("_cssId".to_string(), Value::String(id.to_string()));
    }
    pass_through_attributes(ctx, view, node);
}

/// `#id` when the element has one, otherwise the builder's default element
/// id selector.
fn element_selector(view: ElementView<'_>, node: &ElementNode) -> String {
    view.element
        .id()
        .map_or_else(|| format!("#brxe-{}", node.id), |id| format!("#{id}"))
}

/// Name for a classless element that needs a class: `{tag}-{id}` with an id
/// attribute, `{tag}-{element id}` for class-mode inline styles, `tag-{tag}`
/// otherwise.
fn synthetic_class(view: ElementView<'_>, node: &ElementNode, inline_into_class: bool) -> String {
    let tag = view.tag();
    match view.element.id() {
        Some(id) => format!("{tag}-{id}"),
        None if inline_into_class => format!("{tag}-{}", node.id),
        None => format!("tag-{tag}"),
    }
}

fn apply_styles(ctx: &mut BuildContext<'_>, view: ElementView<'_>, node: &mut ElementNode) {
    let options = ctx.options;
    let inline = match options.inline_style_handling {
        InlineStyleHandling::Skip => Vec::new(),
        InlineStyleHandling::Inline | InlineStyleHandling::Class => view
            .attr("style")
            .map(parse_declaration_list)
            .unwrap_or_default(),
    };
    let inline_into_class =
        options.inline_style_handling == InlineStyleHandling::Class && !inline.is_empty();

    let merged = ctx.resolver.match_merged(view.tree, view.node);
    let layout = LayoutMode::from_declarations(merged.properties.values().chain(inline.iter()));
    let matched = ctx.resolver.match_classes(view.tree, view.node);
    let styles = ctx.styles;
    let map_ctx = MapContext::new(layout, &styles.variables);
    let selector = element_selector(view, node);

    let has_common = !matched.common_properties.is_empty()
        || !matched.id_properties.is_empty()
        || !matched.common_pseudo.is_empty();
    let mut class_names: Vec<String> = view.classes().iter().map(ToString::to_string).collect();
    let mut synthetic_shared = false;
    if class_names.is_empty()
        && ((has_common && options.merge_non_class_selectors) || inline_into_class)
    {
        let name = synthetic_class(view, node, inline_into_class);
        synthetic_shared = name.starts_with("tag-");
        class_names.push(name);
    }

    let mut class_ids = Vec::with_capacity(class_names.len());
    let mut common_in_class = false;
    for (index, name) in class_names.iter().enumerate() {
        let (class_id, created) = ctx.classes.get_or_create(name, &mut ctx.ids);
        class_ids.push(Value::String(class_id));

        let seeds_common =
            index == 0 && options.merge_non_class_selectors && (created || synthetic_shared);
        let mut declarations: Vec<Declaration> = Vec::new();
        if seeds_common {
            common_in_class = true;
            declarations.extend(matched.common_properties.iter().cloned());
        }
        if let Some(own) = matched.properties_by_class.get(name) {
            declarations.extend(own.iter().cloned());
        }
        if seeds_common {
            declarations.extend(matched.id_properties.iter().cloned());
        }
        if index == 0 && inline_into_class {
            declarations.extend(inline.iter().cloned());
        }
        let custom = ctx.classes.merge(name, &declarations, &map_ctx);
        scope_custom(ctx, node, name, &selector, None, &custom);
        if seeds_common {
            ctx.classes.record_seed(name, &matched.common_properties);
            ctx.classes.record_seed(name, &matched.id_properties);
        }

        let mut pseudo: Vec<(PseudoState, &[Declaration])> = matched
            .pseudo_by_class
            .get(name)
            .map(|states| states.iter().map(|(s, d)| (*s, d.as_slice())).collect())
            .unwrap_or_default();
        if seeds_common {
            pseudo.extend(matched.common_pseudo.iter().map(|(s, d)| (*s, d.as_slice())));
        }
        for (state, declarations) in pseudo {
            let custom = ctx.classes.merge_pseudo(name, state, declarations, &map_ctx);
            scope_custom(ctx, node, name, &selector, Some(state), &custom);
        }
    }
    if !class_ids.is_empty() {
        let _ = node
            .settings
            .insert("_cssGlobalClasses".to_string(), Value::Array(class_ids));
    }

    let mut local: Vec<Declaration> = Vec::new();
    if !common_in_class {
        // Cascade winners the first class does not already carry.
        let seeded = class_names
            .first()
            .map(|name| ctx.classes.seeded(name))
            .unwrap_or_default();
        local.extend(
            matched
                .common_properties
                .iter()
                .chain(&matched.id_properties)
                .filter(|d| merged.properties.get(&d.name) == Some(*d) && !seeded.contains(*d))
                .cloned(),
        );
        for (state, declarations) in &matched.common_pseudo {
            let css = declaration_block(&format!("{selector}:{state}"), declarations);
            append_css(&mut node.settings, &css);
        }
    }
    if options.inline_style_handling == InlineStyleHandling::Inline {
        local.extend(inline);
    }
    if !local.is_empty() {
        let custom = PropertyMapperRegistry::global().apply(&local, &mut node.settings, &map_ctx);
        if let Some(css) = custom.to_css(&selector) {
            append_css(&mut node.settings, &css);
        }
    }

    scope_complex_rules(ctx, node, class_names.first().map(String::as_str), &selector, &matched);
}

/// Unmapped class declarations: on the class as `.name`, or on the element
/// when custom CSS targets ids.
fn scope_custom(
    ctx: &mut BuildContext<'_>,
    node: &mut ElementNode,
    class: &str,
    element_selector: &str,
    state: Option<PseudoState>,
    custom: &CustomRules,
) {
    let suffix = state.map(|s| format!(":{s}")).unwrap_or_default();
    match ctx.options.css_selector_target {
        CssSelectorTarget::Class => {
            let selector = format!(".{}{suffix}", escape_class_name(class));
            if let Some(css) = custom.to_css(&selector) {
                ctx.classes.append_custom_css(class, &css);
            }
        }
        CssSelectorTarget::Id => {
            if let Some(css) = custom.to_css(&format!("{element_selector}{suffix}")) {
                append_css(&mut node.settings, &css);
            }
        }
    }
}

/// Rules only expressible as literal CSS. Under class targeting they keep
/// their own selector and live on the first class (or the element when it
/// has none); under id targeting they are rewritten to the element.
fn scope_complex_rules(
    ctx: &mut BuildContext<'_>,
    node: &mut ElementNode,
    first_class: Option<&str>,
    element_selector: &str,
    matched: &ClassMatch,
) {
    for rule in &matched.complex_rules {
        match (ctx.options.css_selector_target, first_class) {
            (CssSelectorTarget::Class, Some(class)) => {
                ctx.classes
                    .append_custom_css(class, &rule.to_css(&rule.selector));
            }
            (CssSelectorTarget::Class, None) => {
                append_css(&mut node.settings, &rule.to_css(&rule.selector));
            }
            (CssSelectorTarget::Id, _) => {
                append_css(&mut node.settings, &rule.to_css(element_selector));
            }
        }
    }
}

fn declaration_block(selector: &str, declarations: &[Declaration]) -> String {
    let body: Vec<String> = declarations
        .iter()
        .map(|d| {
            let important = if d.important { " !important" } else { "" };
            format!("  {}: {}{important};", d.name, d.value)
        })
        .collect();
    format!("{selector} {{\n{}\n}}", body.join("\n"))
}

/// Remaining attributes as `_attributes: [{id, name, value}]`.
fn pass_through_attributes(ctx: &mut BuildContext<'_>, view: ElementView<'_>, node: &mut ElementNode) {
    if RAW_MARKUP_ELEMENTS.contains(&node.name.as_str()) {
        return;
    }
    let consumed = consumed_attributes(&node.name);
    let mut attributes = Vec::new();
    for (name, value) in &view.element.attrs {
        if matches!(name.as_str(), "class" | "id" | "style") || consumed.contains(&name.as_str()) {
            continue;
        }
        attributes.push(json!({
            "id": ctx.ids.next_id(),
            "name": name,
            "value": value,
        }));
    }
    if !attributes.is_empty() {
        let _ = node
            .settings
            .insert("_attributes".to_string(), Value::Array(attributes));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consumed_attributes_by_element() {
        assert!(consumed_attributes("text-link").contains(&"href"));
        assert!(consumed_attributes("image").contains(&"alt"));
        assert!(consumed_attributes("heading").is_empty());
    }

    #[test]
    fn test_declaration_block_format() {
        let declarations = parse_declaration_list("color: red !important; margin: 0");
        assert_eq!(
            declaration_block("#x:hover", &declarations),
            "#x:hover {\n  color: red !important;\n  margin: 0;\n}"
        );
    }
}
