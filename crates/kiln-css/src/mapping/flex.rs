//! Flexbox properties. Grid-capable elements get the variants in
//! [`super::grid`] for the names both layouts share.

use super::{MapperFn, Settings, keyword_key, set_str};
use crate::error::MapperError;
use crate::values::{is_length, normalize_length, split_spaces};

const KEYWORDS: &[(&str, &str)] = &[
    ("flex-direction", "_direction"),
    ("flex-wrap", "_flexWrap"),
    ("justify-content", "_justifyContent"),
    ("align-items", "_alignItems"),
    ("align-content", "_alignContent"),
    ("align-self", "_alignSelf"),
    ("flex-grow", "_flexGrow"),
    ("flex-shrink", "_flexShrink"),
    ("order", "_order"),
];

fn map_keyword(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    let key = keyword_key(KEYWORDS, property)
        .ok_or_else(|| MapperError::unsupported(property, "no settings key"))?;
    if value.is_empty() {
        return Err(MapperError::invalid(property, value));
    }
    set_str(settings, key, value);
    Ok(())
}

fn map_basis(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    if split_spaces(value).len() != 1 {
        return Err(MapperError::invalid(property, value));
    }
    set_str(settings, "_flexBasis", normalize_length(value));
    Ok(())
}

/// `gap: <row> [<column>]`
fn map_gap(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    let parts = split_spaces(value);
    let (row, column) = match (property, parts.as_slice()) {
        ("gap", [both]) => (Some(*both), Some(*both)),
        ("gap", [row, column]) => (Some(*row), Some(*column)),
        ("row-gap", [row]) => (Some(*row), None),
        ("column-gap", [column]) => (None, Some(*column)),
        _ => return Err(MapperError::invalid(property, value)),
    };
    if let Some(row) = row {
        set_str(settings, "_rowGap", normalize_length(row));
    }
    if let Some(column) = column {
        set_str(settings, "_columnGap", normalize_length(column));
    }
    Ok(())
}

/// [CSS Flexbox § 7.1.1](https://www.w3.org/TR/css-flexbox-1/#flex-common)
///
/// `flex: none | [ <grow> <shrink>? || <basis> ]`, expanded into grow,
/// shrink and basis.
fn map_flex(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    let is_number = |t: &str| t.parse::<f64>().is_ok();
    let parts = split_spaces(value);
    let (grow, shrink, basis) = match parts.as_slice() {
        ["none"] => ("0", "0", "auto"),
        ["auto"] => ("1", "1", "auto"),
        ["initial"] => ("0", "1", "auto"),
        [grow] if is_number(grow) => (*grow, "1", "0%"),
        [basis] if is_length(basis) => ("1", "1", *basis),
        [grow, shrink] if is_number(grow) && is_number(shrink) => (*grow, *shrink, "0%"),
        [grow, basis] if is_number(grow) && is_length(basis) => (*grow, "1", *basis),
        [grow, shrink, basis] if is_number(grow) && is_number(shrink) => (*grow, *shrink, *basis),
        _ => return Err(MapperError::invalid(property, value)),
    };
    set_str(settings, "_flexGrow", grow);
    set_str(settings, "_flexShrink", shrink);
    set_str(settings, "_flexBasis", normalize_length(basis));
    Ok(())
}

pub(super) const MAPPERS: &[(&str, MapperFn)] = &[
    ("flex-direction", map_keyword),
    ("flex-wrap", map_keyword),
    ("justify-content", map_keyword),
    ("align-items", map_keyword),
    ("align-content", map_keyword),
    ("align-self", map_keyword),
    ("flex-grow", map_keyword),
    ("flex-shrink", map_keyword),
    ("order", map_keyword),
    ("flex-basis", map_basis),
    ("flex", map_flex),
    ("gap", map_gap),
    ("row-gap", map_gap),
    ("column-gap", map_gap),
];

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flex_shorthand_forms() {
        let mut settings = Settings::new();
        map_flex("flex", "1", &mut settings).unwrap();
        assert_eq!(settings["_flexGrow"], json!("1"));
        assert_eq!(settings["_flexBasis"], json!("0%"));

        map_flex("flex", "0 0 240px", &mut settings).unwrap();
        assert_eq!(settings["_flexShrink"], json!("0"));
        assert_eq!(settings["_flexBasis"], json!("240"));

        map_flex("flex", "none", &mut settings).unwrap();
        assert_eq!(settings["_flexGrow"], json!("0"));
        assert!(map_flex("flex", "wide", &mut settings).is_err());
    }

    #[test]
    fn test_gap_two_values() {
        let mut settings = Settings::new();
        map_gap("gap", "8px 1rem", &mut settings).unwrap();
        assert_eq!(settings["_rowGap"], json!("8"));
        assert_eq!(settings["_columnGap"], json!("1rem"));
    }
}
