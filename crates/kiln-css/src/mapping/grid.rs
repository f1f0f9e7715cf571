//! Grid properties.
//!
//! [`SHARED_MAPPERS`] replace the flexbox mappers of the same name when the
//! element's layout is grid; [`MAPPERS`] are grid-only names and always apply.

use super::{MapperFn, Settings, keyword_key, set_str};
use crate::error::MapperError;
use crate::values::{normalize_length, split_spaces};

const SHARED_KEYS: &[(&str, &str)] = &[
    ("align-items", "_alignItemsGrid"),
    ("justify-content", "_justifyContentGrid"),
    ("align-content", "_alignContentGrid"),
    ("order", "_gridItemOrder"),
];

const GRID_KEYS: &[(&str, &str)] = &[
    ("justify-items", "_justifyItemsGrid"),
    ("grid-template-columns", "_gridTemplateColumns"),
    ("grid-template-rows", "_gridTemplateRows"),
    ("grid-template-areas", "_gridTemplateAreas"),
    ("grid-auto-flow", "_gridAutoFlow"),
    ("grid-column", "_gridItemColumnSpan"),
    ("grid-row", "_gridItemRowSpan"),
    ("grid-area", "_gridArea"),
];

fn map_keyword(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    let key = keyword_key(SHARED_KEYS, property)
        .or_else(|| keyword_key(GRID_KEYS, property))
        .ok_or_else(|| MapperError::unsupported(property, "no settings key"))?;
    if value.is_empty() {
        return Err(MapperError::invalid(property, value));
    }
    set_str(settings, key, value);
    Ok(())
}

/// Every length in the value normalized, e.g. `20px 1rem` gives `20 1rem`.
fn normalize_lengths(value: &str) -> String {
    split_spaces(value)
        .into_iter()
        .map(normalize_length)
        .collect::<Vec<_>>()
        .join(" ")
}

fn map_gap(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    let parts = split_spaces(value).len();
    let key = match (property, parts) {
        ("gap" | "grid-gap", 1 | 2) => "_gridGap",
        ("row-gap" | "grid-row-gap", 1) => "_gridRowGap",
        ("column-gap" | "grid-column-gap", 1) => "_gridColumnGap",
        _ => return Err(MapperError::invalid(property, value)),
    };
    set_str(settings, key, normalize_lengths(value));
    Ok(())
}

pub(super) const SHARED_MAPPERS: &[(&str, MapperFn)] = &[
    ("gap", map_gap),
    ("row-gap", map_gap),
    ("column-gap", map_gap),
    ("align-items", map_keyword),
    ("justify-content", map_keyword),
    ("align-content", map_keyword),
    ("order", map_keyword),
];

pub(super) const MAPPERS: &[(&str, MapperFn)] = &[
    ("grid-gap", map_gap),
    ("grid-row-gap", map_gap),
    ("grid-column-gap", map_gap),
    ("justify-items", map_keyword),
    ("grid-template-columns", map_keyword),
    ("grid-template-rows", map_keyword),
    ("grid-template-areas", map_keyword),
    ("grid-auto-flow", map_keyword),
    ("grid-column", map_keyword),
    ("grid-row", map_keyword),
    ("grid-area", map_keyword),
];
