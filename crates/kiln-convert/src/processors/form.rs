//! Forms and standalone form controls.

use kiln_dom::NodeId;
use serde_json::{Map, Value, json};

use crate::builder::{BuildContext, ElementProcessor, ElementView, ProcessorResult};
use crate::processors::media::code_node;
use crate::processors::set;

const DEFAULT_SUBMIT_TEXT: &str = "Send";

/// `<form>` → terminal `form {fields, submitButtonText, actions}`.
pub struct FormProcessor;

impl ElementProcessor for FormProcessor {
    fn name(&self) -> &'static str {
        "form"
    }

    fn can_handle(&self, view: &ElementView<'_>) -> bool {
        view.tag() == "form"
    }

    fn process(&self, view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ProcessorResult {
        let fields = collect_fields(view, ctx);
        let mut node = ctx.node("form", view.node);
        set(&mut node, "fields", Value::Array(fields));
        set(&mut node, "submitButtonText", submit_text(view));
        set(&mut node, "actions", json!(["email"]));
        ProcessorResult::Leaf(node)
    }
}

/// `<input>`, `<select>`, `<textarea>` outside a form → `code`.
pub struct FormControlProcessor;

impl ElementProcessor for FormControlProcessor {
    fn name(&self) -> &'static str {
        "form-control"
    }

    fn can_handle(&self, view: &ElementView<'_>) -> bool {
        view.is_any(&["input", "select", "textarea"])
    }

    fn process(&self, view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ProcessorResult {
        ProcessorResult::Leaf(code_node(view, ctx))
    }
}

/// Field type for a control, or `None` for controls that are not fields.
fn field_type(control: ElementView<'_>) -> Option<&'static str> {
    match control.tag() {
        "select" => Some("select"),
        "textarea" => Some("textarea"),
        "input" => {
            let kind = control
                .attr("type")
                .map_or_else(|| "text".to_string(), str::to_ascii_lowercase);
            match kind.as_str() {
                "submit" | "button" | "reset" | "hidden" | "image" => None,
                "email" => Some("email"),
                "tel" => Some("tel"),
                "number" | "range" => Some("number"),
                "url" => Some("url"),
                "password" => Some("password"),
                "checkbox" => Some("checkbox"),
                "radio" => Some("radio"),
                "file" => Some("file"),
                "date" | "datetime-local" | "time" | "month" | "week" => Some("datepicker"),
                _ => Some("text"),
            }
        }
        _ => None,
    }
}

/// One field per control; checkboxes and radios sharing a `name` collapse
/// into a single field whose `options` lists each choice.
fn collect_fields(form: ElementView<'_>, ctx: &mut BuildContext<'_>) -> Vec<Value> {
    let tree = form.tree;
    let mut fields: Vec<Map<String, Value>> = Vec::new();

    for node in tree.descendants(form.node) {
        let Some(control) = form.view_of(node) else {
            continue;
        };
        let Some(kind) = field_type(control) else {
            continue;
        };
        let label = field_label(form, control);

        if matches!(kind, "checkbox" | "radio") {
            if let Some(name) = control.attr("name") {
                let existing = fields.iter_mut().find(|f| {
                    f.get("type").and_then(Value::as_str) == Some(kind)
                        && f.get("name").and_then(Value::as_str) == Some(name)
                });
                if let Some(field) = existing {
                    let options = field
                        .get("options")
                        .and_then(Value::as_str)
                        .map_or_else(|| label.clone(), |o| format!("{o}\n{label}"));
                    let _ = field.insert("options".to_string(), Value::String(options));
                    continue;
                }
            }
        }

        let mut field = Map::new();
        let _ = field.insert("id".to_string(), Value::String(ctx.ids.next_id()));
        let _ = field.insert("type".to_string(), Value::String(kind.to_string()));
        let _ = field.insert("label".to_string(), Value::String(label.clone()));
        if let Some(placeholder) = control.attr("placeholder") {
            let _ = field.insert("placeholder".to_string(), json!(placeholder));
        }
        if control.has_attr("required") {
            let _ = field.insert("required".to_string(), Value::Bool(true));
        }
        match kind {
            "select" => {
                let options = select_options(control);
                if !options.is_empty() {
                    let _ = field.insert("options".to_string(), Value::String(options));
                }
            }
            "checkbox" | "radio" => {
                let _ = field.insert("options".to_string(), Value::String(label));
            }
            _ => {}
        }
        if let Some(name) = control.attr("name") {
            let _ = field.insert("name".to_string(), json!(name));
        }
        fields.push(field);
    }
    fields.into_iter().map(Value::Object).collect()
}

/// `<label for=id>` text, else the enclosing `<label>`, else the
/// placeholder, else the name.
fn field_label(form: ElementView<'_>, control: ElementView<'_>) -> String {
    let tree = form.tree;
    let by_for = control.element.id().and_then(|id| {
        tree.descendants(form.node)
            .filter_map(|n| form.view_of(n))
            .find(|v| v.tag() == "label" && v.attr("for") == Some(id))
            .map(|v| v.node)
    });
    let enclosing = || {
        tree.ancestors(control.node)
            .take_while(|&a| a != form.node)
            .find(|&a| tree.is_tag(a, "label"))
    };
    if let Some(label) = by_for.or_else(enclosing) {
        let text = label_text(form, label);
        if !text.is_empty() {
            return text;
        }
    }
    control
        .attr("placeholder")
        .or_else(|| control.attr("name"))
        .unwrap_or_default()
        .to_string()
}

/// Whitespace-collapsed text of a label.
fn label_text(form: ElementView<'_>, label: NodeId) -> String {
    form.tree
        .text_content(label)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Option texts, one per line.
fn select_options(select: ElementView<'_>) -> String {
    let tree = select.tree;
    tree.descendants(select.node)
        .filter(|&n| tree.is_tag(n, "option"))
        .map(|n| tree.text_content(n).trim().to_string())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text of the first submit control.
fn submit_text(form: ElementView<'_>) -> String {
    let tree = form.tree;
    for node in tree.descendants(form.node) {
        let Some(control) = form.view_of(node) else {
            continue;
        };
        let kind = control.attr("type").map(str::to_ascii_lowercase);
        match (control.tag(), kind.as_deref()) {
            ("button", None | Some("submit")) => {
                let text = label_text(form, node);
                if !text.is_empty() {
                    return text;
                }
            }
            ("input", Some("submit")) => {
                if let Some(value) = control.attr("value") {
                    return value.to_string();
                }
            }
            _ => {}
        }
    }
    DEFAULT_SUBMIT_TEXT.to_string()
}
