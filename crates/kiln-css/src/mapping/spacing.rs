//! `margin` and `padding`, with the 1–4 value box expansion.

use super::{MapperFn, SIDES, Settings, set_str, with_object};
use crate::error::MapperError;
use crate::values::{expand_box, normalize_length, split_spaces};

fn map_spacing(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    let (key, rest) = if let Some(rest) = property.strip_prefix("margin") {
        ("_margin", rest)
    } else if let Some(rest) = property.strip_prefix("padding") {
        ("_padding", rest)
    } else {
        return Err(MapperError::unsupported(property, "not a spacing property"));
    };

    let assignments: Vec<(&str, String)> = match rest {
        "" => {
            let sides = expand_box(value).ok_or_else(|| MapperError::invalid(property, value))?;
            SIDES.into_iter().zip(sides).collect()
        }
        "-inline" | "-block" => {
            let sides: [&str; 2] = if rest == "-inline" {
                ["left", "right"]
            } else {
                ["top", "bottom"]
            };
            let parts = split_spaces(value);
            let (start, end) = match parts.as_slice() {
                [both] => (*both, *both),
                [start, end] => (*start, *end),
                _ => return Err(MapperError::invalid(property, value)),
            };
            vec![(sides[0], start.to_string()), (sides[1], end.to_string())]
        }
        side => {
            let side = side
                .strip_prefix('-')
                .and_then(|s| SIDES.into_iter().find(|known| *known == s))
                .ok_or_else(|| MapperError::unsupported(property, "unknown side"))?;
            if split_spaces(value).len() != 1 {
                return Err(MapperError::invalid(property, value));
            }
            vec![(side, value.to_string())]
        }
    };

    with_object(settings, key, |sides| {
        for (side, side_value) in assignments {
            set_str(sides, side, normalize_length(&side_value));
        }
    });
    Ok(())
}

pub(super) const MAPPERS: &[(&str, MapperFn)] = &[
    ("margin", map_spacing),
    ("margin-top", map_spacing),
    ("margin-right", map_spacing),
    ("margin-bottom", map_spacing),
    ("margin-left", map_spacing),
    ("margin-inline", map_spacing),
    ("margin-block", map_spacing),
    ("padding", map_spacing),
    ("padding-top", map_spacing),
    ("padding-right", map_spacing),
    ("padding-bottom", map_spacing),
    ("padding-left", map_spacing),
    ("padding-inline", map_spacing),
    ("padding-block", map_spacing),
];
