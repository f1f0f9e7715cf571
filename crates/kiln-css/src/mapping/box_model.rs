//! Box-level keywords and sizing.

use super::{MapperFn, Settings, keyword_key, set_str};
use crate::error::MapperError;
use crate::values::{normalize_length, split_spaces};

/// Stored verbatim.
const KEYWORDS: &[(&str, &str)] = &[
    ("box-sizing", "_boxSizing"),
    ("display", "_display"),
    ("visibility", "_visibility"),
    ("overflow", "_overflow"),
    ("overflow-x", "_overflowX"),
    ("overflow-y", "_overflowY"),
    ("opacity", "_opacity"),
    ("z-index", "_zIndex"),
    ("cursor", "_cursor"),
    ("object-fit", "_objectFit"),
    ("object-position", "_objectPosition"),
    ("aspect-ratio", "_aspectRatio"),
    ("pointer-events", "_pointerEvents"),
    ("mix-blend-mode", "_mixBlendMode"),
    ("isolation", "_isolation"),
    ("float", "_float"),
    ("clear", "_clear"),
];

/// Single lengths.
const SIZES: &[(&str, &str)] = &[
    ("width", "_width"),
    ("min-width", "_widthMin"),
    ("max-width", "_widthMax"),
    ("height", "_height"),
    ("min-height", "_heightMin"),
    ("max-height", "_heightMax"),
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

fn map_size(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    let key = keyword_key(SIZES, property)
        .ok_or_else(|| MapperError::unsupported(property, "no settings key"))?;
    if split_spaces(value).len() != 1 {
        return Err(MapperError::invalid(property, value));
    }
    set_str(settings, key, normalize_length(value));
    Ok(())
}

pub(super) const MAPPERS: &[(&str, MapperFn)] = &[
    ("box-sizing", map_keyword),
    ("display", map_keyword),
    ("visibility", map_keyword),
    ("overflow", map_keyword),
    ("overflow-x", map_keyword),
    ("overflow-y", map_keyword),
    ("opacity", map_keyword),
    ("z-index", map_keyword),
    ("cursor", map_keyword),
    ("object-fit", map_keyword),
    ("object-position", map_keyword),
    ("aspect-ratio", map_keyword),
    ("pointer-events", map_keyword),
    ("mix-blend-mode", map_keyword),
    ("isolation", map_keyword),
    ("float", map_keyword),
    ("clear", map_keyword),
    ("width", map_size),
    ("min-width", map_size),
    ("max-width", map_size),
    ("height", map_size),
    ("min-height", map_size),
    ("max-height", map_size),
];

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sizes_strip_px_only() {
        let mut settings = Settings::new();
        map_size("width", "320px", &mut settings).unwrap();
        map_size("max-width", "80%", &mut settings).unwrap();
        map_size("height", "calc(100vh - 64px)", &mut settings).unwrap();
        assert_eq!(settings["_width"], json!("320"));
        assert_eq!(settings["_widthMax"], json!("80%"));
        assert_eq!(settings["_height"], json!("calc(100vh - 64px)"));
        assert!(map_size("width", "1px 2px", &mut settings).is_err());
    }

    #[test]
    fn test_every_keyword_is_registered() {
        for (css, _) in KEYWORDS.iter().chain(SIZES) {
            assert!(MAPPERS.iter().any(|(name, _)| name == css), "{css}");
        }
    }
}
