//! `box-shadow`, and the single-shadow parser shared with `text-shadow`.

use serde_json::{Map, Value, json};

use super::{MapperFn, Settings};
use crate::error::MapperError;
use crate::values::{color_setting, is_color, is_length, normalize_length, split_commas, split_spaces};

/// One parsed shadow layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shadow {
    /// Horizontal offset, normalized.
    pub offset_x: String,
    /// Vertical offset, normalized.
    pub offset_y: String,
    /// Blur radius, when given.
    pub blur: Option<String>,
    /// Spread radius, when given (`box-shadow` only).
    pub spread: Option<String>,
    /// Color token as written.
    pub color: Option<String>,
    /// `inset` keyword present.
    pub inset: bool,
}

impl Shadow {
    /// `{offsetX, offsetY, blur?, spread?}`
    fn values(&self) -> Value {
        let mut values = Map::new();
        let _ = values.insert("offsetX".into(), json!(self.offset_x));
        let _ = values.insert("offsetY".into(), json!(self.offset_y));
        if let Some(blur) = &self.blur {
            let _ = values.insert("blur".into(), json!(blur));
        }
        if let Some(spread) = &self.spread {
            let _ = values.insert("spread".into(), json!(spread));
        }
        Value::Object(values)
    }

    /// The structured `_boxShadow` / `_textShadow` object.
    #[must_use]
    pub fn to_setting(&self) -> Value {
        let mut out = Map::new();
        let _ = out.insert("values".into(), self.values());
        if let Some(color) = &self.color {
            let _ = out.insert("color".into(), color_setting(color));
        }
        if self.inset {
            let _ = out.insert("inset".into(), json!(true));
        }
        Value::Object(out)
    }
}

/// [CSS Backgrounds § 6.1](https://www.w3.org/TR/css-backgrounds-3/#box-shadow)
///
/// `<color>? && [<length>{2} <length>? <length>?] && inset?`, one layer.
/// Color functions such as `rgba(0, 0, 0, .2)` stay one token.
#[must_use]
pub fn parse_shadow(value: &str) -> Option<Shadow> {
    let mut shadow = Shadow::default();
    let mut lengths: Vec<String> = Vec::new();
    for token in split_spaces(value) {
        if token.eq_ignore_ascii_case("inset") {
            shadow.inset = true;
        } else if is_color(token) && shadow.color.is_none() {
            shadow.color = Some(token.to_string());
        } else if is_length(token) && lengths.len() < 4 {
            lengths.push(normalize_length(token));
        } else {
            return None;
        }
    }
    let mut lengths = lengths.into_iter();
    shadow.offset_x = lengths.next()?;
    shadow.offset_y = lengths.next()?;
    shadow.blur = lengths.next();
    shadow.spread = lengths.next();
    Some(shadow)
}

fn map_box_shadow(property: &str, value: &str, settings: &mut Settings) -> Result<(), MapperError> {
    if value.eq_ignore_ascii_case("none") {
        let _ = settings.remove("_boxShadow");
        return Ok(());
    }
    let layers = split_commas(value);
    if layers.len() > 1 {
        return Err(MapperError::unsupported(property, "multiple shadow layers"));
    }
    let shadow = parse_shadow(value).ok_or_else(|| MapperError::invalid(property, value))?;
    let _ = settings.insert("_boxShadow".into(), shadow.to_setting());
    Ok(())
}

pub(super) const MAPPERS: &[(&str, MapperFn)] = &[("box-shadow", map_box_shadow)];
