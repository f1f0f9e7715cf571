//! Transitions, kept as one canonical
//! `property duration timing-function delay` string per layer in
//! `_cssTransition`. Longhands rewrite the matching field of the stored
//! layers.

use super::{MapperFn, Settings, set_str};
use crate::error::MapperError;
use crate::values::{split_commas, split_spaces};

const TIMING_KEYWORDS: [&str; 7] = [
    "ease",
    "linear",
    "ease-in",
    "ease-out",
    "ease-in-out",
    "step-start",
    "step-end",
];

#[derive(Debug, Clone, PartialEq, Eq)]
struct Layer {
    property: String,
    duration: String,
    timing: String,
    delay: String,
}

impl Default for Layer {
    /// Initial values.
    fn default() -> Self {
        Self {
            property: "all".into(),
            duration: "0s".into(),
            timing: "ease".into(),
            delay: "0s".into(),
        }
    }
}

impl Layer {
    fn to_css(&self) -> String {
        format!("{} {} {} {}", self.property, self.duration, self.timing, self.delay)
    }
}

fn is_time(token: &str) -> bool {
    let lower = token.to_ascii_lowercase();
    let number = lower
        .strip_suffix("ms")
        .or_else(|| lower.strip_suffix('s'));
    number.is_some_and(|n| n.parse::<f64>().is_ok())
}

fn is_timing(token: &str) -> bool {
    let lower = token.to_ascii_lowercase();
    TIMING_KEYWORDS.contains(&lower.as_str())
        || lower.starts_with("cubic-bezier(")
        || lower.starts_with("steps(")
}

/// [CSS Transitions § 2.5](https://www.w3.org/TR/css-transitions-1/#transition-shorthand-property)
///
/// The first time is the duration and the second the delay.
fn parse_layer(layer: &str) -> Option<Layer> {
    let mut out = Layer::default();
    let mut times = 0;
    let mut property_seen = false;
    for token in split_spaces(layer) {
        if is_time(token) {
            match times {
                0 => out.duration = token.to_string(),
                1 => out.delay = token.to_string(),
                _ => return None,
            }
            times += 1;
        } else if is_timing(token) {
            out.timing = token.to_string();
        } else if !property_seen {
            out.property = token.to_string();
            property_seen = true;
        } else {
            return None;
        }
    }
    Some(out)
}

fn stored_layers(settings: &Settings) -> Vec<Layer> {
    settings
        .get("_cssTransition")
        .and_then(|v| v.as_str())
        .map(|s| split_commas(s).into_iter().filter_map(parse_layer).collect())
        .unwrap_or_default()
}

fn store(settings: &mut Settings, layers: &[Layer]) {
    let css: Vec<String> = layers.iter().map(Layer::to_css).collect();
    set_str(settings, "_cssTransition", css.join(", "));
}

fn map_shorthand(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    let layers = split_commas(value)
        .into_iter()
        .map(parse_layer)
        .collect::<Option<Vec<Layer>>>()
        .filter(|layers| !layers.is_empty())
        .ok_or_else(|| MapperError::invalid(property, value))?;
    store(settings, &layers);
    Ok(())
}

fn map_longhand(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    let values = split_commas(value);
    let valid = match property {
        "transition-duration" | "transition-delay" => values.iter().all(|v| is_time(v)),
        "transition-timing-function" => values.iter().all(|v| is_timing(v)),
        _ => !values.is_empty(),
    };
    if !valid || values.is_empty() {
        return Err(MapperError::invalid(property, value));
    }

    let mut layers = stored_layers(settings);
    if layers.is_empty() {
        layers.push(Layer::default());
    }
    let count = layers.len().max(values.len());
    let layers: Vec<Layer> = (0..count)
        .map(|i| {
            let mut layer = layers[i % layers.len()].clone();
            let field = values[i % values.len()].to_string();
            match property {
                "transition-property" => layer.property = field,
                "transition-duration" => layer.duration = field,
                "transition-timing-function" => layer.timing = field,
                _ => layer.delay = field,
            }
            layer
        })
        .collect();
    store(settings, &layers);
    Ok(())
}

pub(super) const MAPPERS: &[(&str, MapperFn)] = &[
    ("transition", map_shorthand),
    ("transition-property", map_longhand),
    ("transition-duration", map_longhand),
    ("transition-timing-function", map_longhand),
    ("transition-delay", map_longhand),
];
