//! `filter` decomposed into `_cssFilters`, and `backdrop-filter`.

use super::{MapperFn, Settings, set_str};
use crate::error::MapperError;
use crate::values::{normalize_length, parse_function, split_spaces};

/// CSS function name → settings key.
const FILTERS: [(&str, &str); 9] = [
    ("blur", "blur"),
    ("brightness", "brightness"),
    ("contrast", "contrast"),
    ("grayscale", "grayscale"),
    ("hue-rotate", "hueRotate"),
    ("invert", "invert"),
    ("opacity", "opacity"),
    ("saturate", "saturate"),
    ("sepia", "sepia"),
];

/// [Filter Effects § 13](https://www.w3.org/TR/filter-effects-1/#FilterProperty)
///
/// `drop-shadow()` and `url()` references have no structured form; the whole
/// value is then demoted to custom CSS.
fn map_filter(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    if value.eq_ignore_ascii_case("none") {
        let _ = settings.remove("_cssFilters");
        return Ok(());
    }
    let mut filters = Settings::new();
    for call in split_spaces(value) {
        let (name, args) =
            parse_function(call).ok_or_else(|| MapperError::invalid(property, value))?;
        let key = FILTERS
            .iter()
            .find(|(css, _)| *css == name)
            .map(|(_, key)| *key)
            .ok_or_else(|| MapperError::unsupported(property, &format!("{name}()")))?;
        let amount = if key == "blur" {
            normalize_length(args)
        } else {
            args.to_string()
        };
        set_str(&mut filters, key, amount);
    }
    if filters.is_empty() {
        return Err(MapperError::invalid(property, value));
    }
    let _ = settings.insert("_cssFilters".into(), filters.into());
    Ok(())
}

fn map_backdrop(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    if value.is_empty() {
        return Err(MapperError::invalid(property, value));
    }
    set_str(settings, "_backdropFilter", value);
    Ok(())
}

pub(super) const MAPPERS: &[(&str, MapperFn)] = &[
    ("filter", map_filter),
    ("backdrop-filter", map_backdrop),
];
