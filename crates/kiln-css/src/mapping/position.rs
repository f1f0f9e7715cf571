//! `position` and its offsets.

use super::{MapperFn, SIDES, Settings, set_str};
use crate::error::MapperError;
use crate::values::{expand_box, normalize_length, split_spaces};

fn map_position(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    if value.is_empty() {
        return Err(MapperError::invalid(property, value));
    }
    set_str(settings, "_position", value);
    Ok(())
}

fn map_offset(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    if split_spaces(value).len() != 1 {
        return Err(MapperError::invalid(property, value));
    }
    set_str(settings, &format!("_{property}"), normalize_length(value));
    Ok(())
}

fn map_inset(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    let sides = expand_box(value).ok_or_else(|| MapperError::invalid(property, value))?;
    for (side, side_value) in SIDES.into_iter().zip(sides) {
        set_str(settings, &format!("_{side}"), normalize_length(&side_value));
    }
    Ok(())
}

pub(super) const MAPPERS: &[(&str, MapperFn)] = &[
    ("position", map_position),
    ("top", map_offset),
    ("right", map_offset),
    ("bottom", map_offset),
    ("left", map_offset),
    ("inset", map_inset),
];
