//! Borders and radius, collected under `_border`.

use serde_json::Value;

use super::{MapperFn, SIDES, Settings, set_str, with_object};
use crate::error::MapperError;
use crate::values::{color_setting, expand_box, is_color, is_length, normalize_length, split_spaces, split_top_level};

const STYLES: [&str; 10] = [
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
];
const WIDTH_KEYWORDS: [&str; 3] = ["thin", "medium", "thick"];

/// Radius corners in output order, keyed like sides: top-left, top-right,
/// bottom-right, bottom-left.
const CORNERS: [(&str, &str); 4] = [
    ("border-top-left-radius", "top"),
    ("border-top-right-radius", "right"),
    ("border-bottom-right-radius", "bottom"),
    ("border-bottom-left-radius", "left"),
];

#[derive(Default)]
struct BorderParts<'a> {
    width: Option<&'a str>,
    style: Option<&'a str>,
    color: Option<&'a str>,
}

/// [CSS Backgrounds § 4.4](https://www.w3.org/TR/css-backgrounds-3/#border-shorthands)
///
/// `<line-width> || <line-style> || <color>`, in any order.
fn parse_border(value: &str) -> Option<BorderParts<'_>> {
    let mut parts = BorderParts::default();
    for token in split_spaces(value) {
        let lower = token.to_ascii_lowercase();
        if STYLES.contains(&lower.as_str()) && parts.style.is_none() {
            parts.style = Some(token);
        } else if (is_length(token) || WIDTH_KEYWORDS.contains(&lower.as_str()))
            && parts.width.is_none()
        {
            parts.width = Some(token);
        } else if is_color(token) && parts.color.is_none() {
            parts.color = Some(token);
        } else {
            return None;
        }
    }
    Some(parts)
}

fn side_of(property: &str) -> Option<&'static str> {
    SIDES
        .into_iter()
        .find(|side| property.trim_start_matches("border-").starts_with(side))
}

fn map_border(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    let parts = parse_border(value).ok_or_else(|| MapperError::invalid(property, value))?;
    let sides: Vec<&str> = match side_of(property) {
        Some(side) => vec![side],
        None => SIDES.to_vec(),
    };
    with_object(settings, "_border", |border| {
        if let Some(width) = parts.width {
            with_object(border, "width", |widths| {
                for side in &sides {
                    set_str(widths, side, normalize_length(width));
                }
            });
        }
        if let Some(style) = parts.style {
            set_str(border, "style", style);
        }
        if let Some(color) = parts.color {
            let _ = border.insert("color".into(), color_setting(color));
        }
    });
    Ok(())
}

/// `border-width` and `border-{side}-width`.
fn map_width(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    let assignments: Vec<(&str, String)> = match side_of(property) {
        Some(side) if split_spaces(value).len() == 1 => vec![(side, value.to_string())],
        Some(_) => return Err(MapperError::invalid(property, value)),
        None => {
            let sides = expand_box(value).ok_or_else(|| MapperError::invalid(property, value))?;
            SIDES.into_iter().zip(sides).collect()
        }
    };
    with_object(settings, "_border", |border| {
        with_object(border, "width", |widths| {
            for (side, width) in assignments {
                set_str(widths, side, normalize_length(&width));
            }
        });
    });
    Ok(())
}

/// `border-style`, `border-color` and their per-side longhands. The schema
/// has one style and one color, so the first value wins.
fn map_style_or_color(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    let first = split_spaces(value)
        .first()
        .copied()
        .ok_or_else(|| MapperError::invalid(property, value))?;
    let setting = if property.ends_with("-color") {
        if !is_color(first) {
            return Err(MapperError::invalid(property, value));
        }
        color_setting(first)
    } else {
        if !STYLES.contains(&first.to_ascii_lowercase().as_str()) {
            return Err(MapperError::invalid(property, value));
        }
        Value::String(first.to_string())
    };
    let key = if property.ends_with("-color") { "color" } else { "style" };
    with_object(settings, "_border", |border| {
        let _ = border.insert(key.into(), setting);
    });
    Ok(())
}

/// One corner value: `8px` gives `8`; an elliptical `8px 4px` is kept as written.
fn corner_value(horizontal: &str, vertical: Option<&str>) -> String {
    match vertical {
        Some(vertical) if vertical != horizontal => format!("{horizontal} {vertical}"),
        _ => normalize_length(horizontal),
    }
}

/// [CSS Backgrounds § 5.1](https://www.w3.org/TR/css-backgrounds-3/#border-radius)
///
/// `<length-percentage>{1,4} [ / <length-percentage>{1,4} ]?`
fn map_radius(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    let halves = split_top_level(value, '/');
    let (horizontal, vertical) = match halves.as_slice() {
        [h] => (expand_box(h), None),
        [h, v] => (expand_box(h), Some(expand_box(v).ok_or_else(|| MapperError::invalid(property, value))?)),
        _ => return Err(MapperError::invalid(property, value)),
    };
    let horizontal = horizontal.ok_or_else(|| MapperError::invalid(property, value))?;
    with_object(settings, "_border", |border| {
        with_object(border, "radius", |radius| {
            for (i, (_, corner)) in CORNERS.iter().enumerate() {
                let v = vertical.as_ref().map(|v| v[i].as_str());
                set_str(radius, corner, corner_value(&horizontal[i], v));
            }
        });
    });
    Ok(())
}

fn map_corner(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    let corner = CORNERS
        .iter()
        .find(|(css, _)| *css == property)
        .map(|(_, key)| *key)
        .ok_or_else(|| MapperError::unsupported(property, "unknown corner"))?;
    let parts = split_spaces(value);
    let value = match parts.as_slice() {
        [h] => corner_value(h, None),
        [h, v] => corner_value(h, Some(v)),
        _ => return Err(MapperError::invalid(property, value)),
    };
    with_object(settings, "_border", |border| {
        with_object(border, "radius", |radius| set_str(radius, corner, value));
    });
    Ok(())
}

pub(super) const MAPPERS: &[(&str, MapperFn)] = &[
    ("border", map_border),
    ("border-top", map_border),
    ("border-right", map_border),
    ("border-bottom", map_border),
    ("border-left", map_border),
    ("border-width", map_width),
    ("border-top-width", map_width),
    ("border-right-width", map_width),
    ("border-bottom-width", map_width),
    ("border-left-width", map_width),
    ("border-style", map_style_or_color),
    ("border-top-style", map_style_or_color),
    ("border-right-style", map_style_or_color),
    ("border-bottom-style", map_style_or_color),
    ("border-left-style", map_style_or_color),
    ("border-color", map_style_or_color),
    ("border-top-color", map_style_or_color),
    ("border-right-color", map_style_or_color),
    ("border-bottom-color", map_style_or_color),
    ("border-left-color", map_style_or_color),
    ("border-radius", map_radius),
    ("border-top-left-radius", map_corner),
    ("border-top-right-radius", map_corner),
    ("border-bottom-right-radius", map_corner),
    ("border-bottom-left-radius", map_corner),
];

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_border_shorthand_any_order() {
        let mut settings = Settings::new();
        map_border("border", "solid rgba(0, 0, 0, .1) 2px", &mut settings).unwrap();
        let border = &settings["_border"];
        assert_eq!(border["width"]["left"], json!("2"));
        assert_eq!(border["style"], json!("solid"));
        assert_eq!(border["color"], json!({"rgb": "rgba(0, 0, 0, .1)"}));
    }

    #[test]
    fn test_side_shorthand_touches_one_width() {
        let mut settings = Settings::new();
        map_border("border-bottom", "1px dashed #ccc", &mut settings).unwrap();
        assert_eq!(settings["_border"]["width"], json!({"bottom": "1"}));
    }

    #[test]
    fn test_radius_expansion() {
        let mut settings = Settings::new();
        map_radius("border-radius", "4px 8px", &mut settings).unwrap();
        assert_eq!(
            settings["_border"]["radius"],
            json!({"top": "4", "right": "8", "bottom": "4", "left": "8"})
        );
    }

    #[test]
    fn test_elliptical_radius() {
        let mut settings = Settings::new();
        map_radius("border-radius", "10px / 20px", &mut settings).unwrap();
        assert_eq!(settings["_border"]["radius"]["top"], json!("10px 20px"));
        map_radius("border-radius", "50% / 50%", &mut settings).unwrap();
        assert_eq!(settings["_border"]["radius"]["top"], json!("50%"));
    }

    #[test]
    fn test_invalid_border_token() {
        let mut settings = Settings::new();
        assert!(map_border("border", "1px wobbly red", &mut settings).is_err());
    }
}
