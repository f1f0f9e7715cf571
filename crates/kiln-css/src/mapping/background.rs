//! Backgrounds, including gradient decomposition into `_gradient`.

use serde_json::{Map, Value, json};

use super::{MapperFn, Settings, keyword_key, set_str, with_object};
use crate::error::MapperError;
use crate::values::{color_setting, is_color, parse_function, split_commas, split_spaces};

const KEYWORDS: &[(&str, &str)] = &[
    ("background-repeat", "repeat"),
    ("background-position", "position"),
    ("background-size", "size"),
    ("background-attachment", "attachment"),
    ("background-origin", "origin"),
    ("background-clip", "clip"),
    ("background-blend-mode", "blendMode"),
];

const REPEAT: [&str; 6] = ["repeat", "repeat-x", "repeat-y", "no-repeat", "space", "round"];
const ATTACHMENT: [&str; 3] = ["scroll", "fixed", "local"];
const BOXES: [&str; 4] = ["border-box", "padding-box", "content-box", "text"];

fn is_gradient(token: &str) -> bool {
    token.to_ascii_lowercase().contains("gradient(")
}

fn is_image_layer(layer: &str) -> bool {
    let lower = layer.to_ascii_lowercase();
    lower.contains("url(") || lower.contains("gradient(")
}

/// `url("a.png")` gives `a.png`.
fn url_of(token: &str) -> Option<String> {
    let (name, args) = parse_function(token)?;
    (name == "url").then(|| args.trim_matches(|c| c == '"' || c == '\'').to_string())
}

fn image_setting(url: &str) -> Value {
    json!({ "url": url, "external": true })
}

/// Angle text without `deg` (`45deg` gives `45`); other angle units are kept.
fn angle_of(token: &str) -> Option<String> {
    let token = token.trim();
    let token = token.strip_prefix("from ").unwrap_or(token).trim();
    for unit in ["deg", "grad", "rad", "turn"] {
        if let Some(number) = token.strip_suffix(unit) {
            if number.parse::<f64>().is_ok() {
                return Some(if unit == "deg" { number } else { token }.to_string());
            }
        }
    }
    None
}

/// [CSS Images § 3](https://www.w3.org/TR/css-images-3/#gradients)
///
/// Decompose a gradient function into
/// `{applyTo, gradientType, angle | direction, colorStops: [{color, stop?}]}`.
/// Stops are percentages without `%`; transition hints are dropped.
#[must_use]
pub fn parse_gradient(value: &str) -> Option<Value> {
    let (name, args) = parse_function(value)?;
    let gradient_type = name.strip_suffix("-gradient")?;
    let mut parts = split_commas(args).into_iter().peekable();

    let mut out = Map::new();
    let _ = out.insert("applyTo".into(), json!("background"));
    let _ = out.insert("gradientType".into(), json!(gradient_type));

    if let Some(first) = parts.peek().copied() {
        let leading = split_spaces(first).first().copied().unwrap_or(first);
        if !is_color(leading) {
            let _ = parts.next();
            match angle_of(first) {
                Some(angle) => {
                    let _ = out.insert("angle".into(), json!(angle));
                }
                None => {
                    let _ = out.insert("direction".into(), json!(first));
                }
            }
        }
    }

    let mut stops = Vec::new();
    for part in parts {
        let tokens = split_spaces(part);
        let Some((&color, positions)) = tokens.split_first() else {
            continue;
        };
        if !is_color(color) {
            continue;
        }
        let mut stop = Map::new();
        let _ = stop.insert("color".into(), color_setting(color));
        if let Some(&position) = positions.first() {
            let position = position.strip_suffix('%').unwrap_or(position);
            let _ = stop.insert("stop".into(), json!(position));
        }
        stops.push(Value::Object(stop));
    }
    if stops.is_empty() {
        return None;
    }
    let _ = out.insert("colorStops".into(), Value::Array(stops));
    Some(Value::Object(out))
}

fn map_color(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    if value.is_empty() {
        return Err(MapperError::invalid(property, value));
    }
    with_object(settings, "_background", |background| {
        let _ = background.insert("color".into(), color_setting(value));
    });
    Ok(())
}

/// Install one image token (`url()` or a gradient).
fn apply_image(property: &str, token: &str, settings: &mut Settings) -> Result<(), MapperError> {
    if is_gradient(token) {
        let gradient = parse_gradient(token).ok_or_else(|| MapperError::invalid(property, token))?;
        let _ = settings.insert("_gradient".into(), gradient);
    } else {
        let url = url_of(token).ok_or_else(|| MapperError::invalid(property, token))?;
        with_object(settings, "_background", |background| {
            let _ = background.insert("image".into(), image_setting(&url));
        });
    }
    Ok(())
}

fn map_image(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    let layers: Vec<&str> = split_commas(value)
        .into_iter()
        .filter(|l| !l.eq_ignore_ascii_case("none"))
        .collect();
    match layers.as_slice() {
        [] => Ok(()),
        [single] => apply_image(property, single, settings),
        _ => Err(MapperError::unsupported(property, "multiple background images")),
    }
}

fn map_keyword(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    let key = keyword_key(KEYWORDS, property)
        .ok_or_else(|| MapperError::unsupported(property, "no settings key"))?;
    if value.is_empty() {
        return Err(MapperError::invalid(property, value));
    }
    with_object(settings, "_background", |background| set_str(background, key, value));
    Ok(())
}

/// [CSS Backgrounds § 3.10](https://www.w3.org/TR/css-backgrounds-3/#background)
///
/// Tokens are classified one by one; position and size are split at `/`.
fn map_shorthand(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    let layers = split_commas(value);
    if layers.iter().filter(|l| is_image_layer(l)).count() > 1 {
        return Err(MapperError::unsupported(property, "multiple background images"));
    }
    for layer in layers {
        map_layer(property, layer, settings)?;
    }
    Ok(())
}

fn map_layer(property: &str, layer: &str, settings: &mut Settings) -> Result<(), MapperError> {
    let mut position: Vec<&str> = Vec::new();
    let mut size: Vec<&str> = Vec::new();
    let mut boxes: Vec<&str> = Vec::new();
    let mut fields: Vec<(&str, &str)> = Vec::new();
    let mut color = None;
    let mut after_slash = false;

    for token in split_spaces(layer) {
        let lower = token.to_ascii_lowercase();
        if lower == "none" {
            continue;
        }
        if lower.starts_with("url(") || is_gradient(&lower) {
            apply_image(property, token, settings)?;
        } else if is_color(token) {
            color = Some(token);
        } else if REPEAT.contains(&lower.as_str()) {
            fields.push(("repeat", token));
        } else if ATTACHMENT.contains(&lower.as_str()) {
            fields.push(("attachment", token));
        } else if BOXES.contains(&lower.as_str()) {
            boxes.push(token);
        } else if let Some((before, after)) = token.split_once('/') {
            if !before.is_empty() {
                position.push(before);
            }
            if !after.is_empty() {
                size.push(after);
            }
            after_slash = true;
        } else if after_slash {
            size.push(token);
        } else {
            position.push(token);
        }
    }

    if let Some(&origin) = boxes.first() {
        fields.push(("origin", origin));
        fields.push(("clip", boxes.get(1).copied().unwrap_or(origin)));
    }
    let position = position.join(" ");
    let size = size.join(" ");
    with_object(settings, "_background", |background| {
        if let Some(color) = color {
            let _ = background.insert("color".into(), color_setting(color));
        }
        for (key, field) in fields {
            set_str(background, key, field);
        }
        if !position.is_empty() {
            set_str(background, "position", position);
        }
        if !size.is_empty() {
            set_str(background, "size", size);
        }
    });
    Ok(())
}

pub(super) const MAPPERS: &[(&str, MapperFn)] = &[
    ("background", map_shorthand),
    ("background-color", map_color),
    ("background-image", map_image),
    ("background-repeat", map_keyword),
    ("background-position", map_keyword),
    ("background-size", map_keyword),
    ("background-attachment", map_keyword),
    ("background-origin", map_keyword),
    ("background-clip", map_keyword),
    ("background-blend-mode", map_keyword),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_gradient_with_angle() {
        let gradient = parse_gradient("linear-gradient(45deg, red 0%, blue 100%)").unwrap();
        assert_eq!(gradient["gradientType"], json!("linear"));
        assert_eq!(gradient["angle"], json!("45"));
        let stops = gradient["colorStops"].as_array().unwrap();
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0]["stop"], json!("0"));
        assert_eq!(stops[1]["stop"], json!("100"));
        assert_eq!(stops[0]["color"], json!({"hex": "#ff0000"}));
    }

    #[test]
    fn test_gradient_direction_and_alpha_stop() {
        let gradient =
            parse_gradient("linear-gradient(to right, #ff000080, transparent)").unwrap();
        assert_eq!(gradient["direction"], json!("to right"));
        let stops = gradient["colorStops"].as_array().unwrap();
        assert_eq!(stops[0]["color"]["rgb"], json!("rgba(255, 0, 0, 0.5)"));
        assert!(stops[1]["color"]["hsl"].is_string());
        assert!(stops[1].get("stop").is_none());
    }

    #[test]
    fn test_radial_without_shape() {
        let gradient = parse_gradient("radial-gradient(#fff, #000)").unwrap();
        assert_eq!(gradient["gradientType"], json!("radial"));
        assert!(gradient.get("direction").is_none());
    }

    #[test]
    fn test_shorthand_tokens() {
        let mut settings = Settings::new();
        map_shorthand(
            "background",
            "#fafafa url(\"img/hero.jpg\") no-repeat center/cover fixed",
            &mut settings,
        )
        .unwrap();
        let background = &settings["_background"];
        assert_eq!(background["color"], json!({"hex": "#fafafa"}));
        assert_eq!(background["image"]["url"], json!("img/hero.jpg"));
        assert_eq!(background["repeat"], json!("no-repeat"));
        assert_eq!(background["position"], json!("center"));
        assert_eq!(background["size"], json!("cover"));
        assert_eq!(background["attachment"], json!("fixed"));
    }

    #[test]
    fn test_multiple_images_are_demoted() {
        let mut settings = Settings::new();
        assert!(map_shorthand("background", "url(a.png), url(b.png)", &mut settings).is_err());
        assert!(map_image("background-image", "url(a.png), linear-gradient(red, blue)", &mut settings).is_err());
        assert!(settings.is_empty());
    }
}
