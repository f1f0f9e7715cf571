//! `transform` decomposed per function, and `transform-origin`.

use super::{MapperFn, Settings, set_str};
use crate::error::MapperError;
use crate::values::{normalize_length, parse_function, split_commas, split_spaces};

/// Function arguments, separated by commas or, failing that, spaces.
fn arguments(args: &str) -> Vec<&str> {
    let by_comma = split_commas(args);
    if by_comma.len() > 1 {
        by_comma
    } else {
        split_spaces(args)
    }
}

/// [CSS Transforms § 9](https://www.w3.org/TR/css-transforms-1/#transform-functions)
///
/// Translations are normalized lengths; scales, angles and matrices are kept
/// as written. Later functions overwrite earlier ones on the same axis.
fn map_transform(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    if value.eq_ignore_ascii_case("none") {
        let _ = settings.remove("_transform");
        return Ok(());
    }
    let mut fields: Vec<(&str, String)> = Vec::new();
    for call in split_spaces(value) {
        let (name, args) =
            parse_function(call).ok_or_else(|| MapperError::invalid(property, value))?;
        let args = arguments(args);
        let length = |i: usize| args.get(i).map(|a| normalize_length(a));
        let raw = |i: usize| args.get(i).map(|a| (*a).to_string());
        let invalid = || MapperError::invalid(property, value);
        match name.as_str() {
            "translate" => {
                fields.push(("translateX", length(0).ok_or_else(invalid)?));
                if let Some(y) = length(1) {
                    fields.push(("translateY", y));
                }
            }
            "translatex" => fields.push(("translateX", length(0).ok_or_else(invalid)?)),
            "translatey" => fields.push(("translateY", length(0).ok_or_else(invalid)?)),
            "translatez" => fields.push(("translateZ", length(0).ok_or_else(invalid)?)),
            "translate3d" => {
                fields.push(("translateX", length(0).ok_or_else(invalid)?));
                fields.push(("translateY", length(1).ok_or_else(invalid)?));
                fields.push(("translateZ", length(2).ok_or_else(invalid)?));
            }
            "scale" => {
                let x = raw(0).ok_or_else(invalid)?;
                let y = raw(1).unwrap_or_else(|| x.clone());
                fields.push(("scaleX", x));
                fields.push(("scaleY", y));
            }
            "scalex" => fields.push(("scaleX", raw(0).ok_or_else(invalid)?)),
            "scaley" => fields.push(("scaleY", raw(0).ok_or_else(invalid)?)),
            "scale3d" => {
                fields.push(("scaleX", raw(0).ok_or_else(invalid)?));
                fields.push(("scaleY", raw(1).ok_or_else(invalid)?));
            }
            "rotate" | "rotatez" => fields.push(("rotateZ", raw(0).ok_or_else(invalid)?)),
            "rotatex" => fields.push(("rotateX", raw(0).ok_or_else(invalid)?)),
            "rotatey" => fields.push(("rotateY", raw(0).ok_or_else(invalid)?)),
            "skew" => {
                fields.push(("skewX", raw(0).ok_or_else(invalid)?));
                if let Some(y) = raw(1) {
                    fields.push(("skewY", y));
                }
            }
            "skewx" => fields.push(("skewX", raw(0).ok_or_else(invalid)?)),
            "skewy" => fields.push(("skewY", raw(0).ok_or_else(invalid)?)),
            "perspective" => fields.push(("perspective", length(0).ok_or_else(invalid)?)),
            "matrix" | "matrix3d" => fields.push(("matrix", args.join(", "))),
            _ => return Err(MapperError::unsupported(property, &format!("{name}()"))),
        }
    }
    if fields.is_empty() {
        return Err(MapperError::invalid(property, value));
    }
    let mut transform = Settings::new();
    for (key, field) in fields {
        set_str(&mut transform, key, field);
    }
    let _ = settings.insert("_transform".into(), transform.into());
    Ok(())
}

fn map_origin(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    if value.is_empty() {
        return Err(MapperError::invalid(property, value));
    }
    set_str(settings, "_transformOrigin", value);
    Ok(())
}

pub(super) const MAPPERS: &[(&str, MapperFn)] = &[
    ("transform", map_transform),
    ("transform-origin", map_origin),
];

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_functions_accumulate() {
        let mut settings = Settings::new();
        map_transform(
            "transform",
            "translate(-50%, 10px) rotate(45deg) scale(1.2)",
            &mut settings,
        )
        .unwrap();
        assert_eq!(
            settings["_transform"],
            json!({
                "translateX": "-50%",
                "translateY": "10",
                "rotateZ": "45deg",
                "scaleX": "1.2",
                "scaleY": "1.2"
            })
        );
    }

    #[test]
    fn test_space_separated_arguments() {
        let mut settings = Settings::new();
        map_transform("transform", "translate3d(1px 2px 3px)", &mut settings).unwrap();
        assert_eq!(settings["_transform"]["translateZ"], json!("3"));
    }

    #[test]
    fn test_unknown_function_is_unsupported() {
        let mut settings = Settings::new();
        let err = map_transform("transform", "wobble(3)", &mut settings).unwrap_err();
        assert!(matches!(err, MapperError::Unsupported { .. }));
    }
}
