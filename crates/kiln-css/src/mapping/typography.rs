//! Text properties, collected under `_typography`, plus `text-shadow`.

use serde_json::Value;

use super::{MapperFn, Settings, parse_shadow, set_str, with_object};
use crate::error::MapperError;
use crate::values::{color_setting, is_length, normalize_length, split_commas, split_spaces};

/// Properties whose value is a length.
const LENGTHS: [&str; 5] = ["font-size", "line-height", "letter-spacing", "word-spacing", "text-indent"];

fn map_typography(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    if value.is_empty() {
        return Err(MapperError::invalid(property, value));
    }
    let setting = if property == "color" {
        color_setting(value)
    } else if LENGTHS.contains(&property) {
        if split_spaces(value).len() != 1 {
            return Err(MapperError::invalid(property, value));
        }
        Value::String(normalize_length(value))
    } else {
        Value::String(value.to_string())
    };
    with_object(settings, "_typography", |typography| {
        let _ = typography.insert(property.to_string(), setting);
    });
    Ok(())
}

/// [CSS Fonts § 2.7](https://www.w3.org/TR/css-fonts-4/#font-prop)
///
/// `[<style> || <variant> || <weight> || <stretch>]? <size> [/ <line-height>]? <family>`
fn map_font(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    let tokens = split_spaces(value);
    let size_index = tokens
        .iter()
        .position(|t| is_length(t.split('/').next().unwrap_or(*t)) && t.parse::<f64>().is_err())
        .ok_or_else(|| MapperError::unsupported(property, "no font size (system font keyword)"))?;

    let mut style = None;
    let mut weight = None;
    for token in &tokens[..size_index] {
        match token.to_ascii_lowercase().as_str() {
            "italic" | "oblique" => style = Some(*token),
            "bold" | "bolder" | "lighter" => weight = Some(*token),
            "normal" | "small-caps" => {}
            t if t.parse::<u16>().is_ok() => weight = Some(*token),
            _ => return Err(MapperError::invalid(property, value)),
        }
    }

    // `16px/1.5`, `16px / 1.5` or `16px /1.5`
    let mut rest = tokens[size_index + 1..].iter().copied().peekable();
    let (size, mut line_height) = match tokens[size_index].split_once('/') {
        Some((size, "")) => (size, rest.next()),
        Some((size, lh)) => (size, Some(lh)),
        None => (tokens[size_index], None),
    };
    if line_height.is_none() {
        if let Some(next) = rest.peek().copied() {
            if next == "/" {
                let _ = rest.next();
                line_height = rest.next();
            } else if let Some(lh) = next.strip_prefix('/') {
                let _ = rest.next();
                line_height = Some(lh);
            }
        }
    }
    let family: Vec<&str> = rest.collect();
    if family.is_empty() {
        return Err(MapperError::invalid(property, value));
    }

    with_object(settings, "_typography", |typography| {
        if let Some(style) = style {
            set_str(typography, "font-style", style);
        }
        if let Some(weight) = weight {
            set_str(typography, "font-weight", weight);
        }
        set_str(typography, "font-size", normalize_length(size));
        if let Some(line_height) = line_height {
            set_str(typography, "line-height", normalize_length(line_height));
        }
        set_str(typography, "font-family", family.join(" "));
    });
    Ok(())
}

fn map_text_shadow(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    if value.eq_ignore_ascii_case("none") {
        let _ = settings.remove("_textShadow");
        return Ok(());
    }
    if split_commas(value).len() > 1 {
        return Err(MapperError::unsupported(property, "multiple shadow layers"));
    }
    let shadow = parse_shadow(value)
        .filter(|s| s.spread.is_none() && !s.inset)
        .ok_or_else(|| MapperError::invalid(property, value))?;
    let _ = settings.insert("_textShadow".into(), shadow.to_setting());
    Ok(())
}

pub(super) const MAPPERS: &[(&str, MapperFn)] = &[
    ("color", map_typography),
    ("font-size", map_typography),
    ("font-weight", map_typography),
    ("font-family", map_typography),
    ("font-style", map_typography),
    ("line-height", map_typography),
    ("letter-spacing", map_typography),
    ("word-spacing", map_typography),
    ("text-align", map_typography),
    ("text-transform", map_typography),
    ("text-decoration", map_typography),
    ("white-space", map_typography),
    ("text-indent", map_typography),
    ("font", map_font),
    ("text-shadow", map_text_shadow),
];
