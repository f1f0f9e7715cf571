//! Conversion options.
//!
//! Options deserialize from camelCase JSON with every field defaulted, so a
//! partial object such as `{"includeJs": true}` is valid. Enum options share
//! their spelling between JSON and [`std::str::FromStr`].

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::error::ConvertError;

/// What to do with `style="..."` attributes.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InlineStyleHandling {
    /// Ignore inline styles.
    Skip,
    /// Map inline styles into the element's own settings.
    #[default]
    Inline,
    /// Merge inline styles into the element's first (or synthetic) class.
    Class,
}

/// Where custom CSS for an element is scoped.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CssSelectorTarget {
    /// `.class` rules stored on the global class.
    #[default]
    Class,
    /// `#id` rules stored on the element.
    Id,
}

/// Options for one `convert()` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvertOptions {
    /// Inline `style=` policy.
    pub inline_style_handling: InlineStyleHandling,
    /// Label each element with its first class name.
    pub show_node_class: bool,
    /// Fold tag and id declarations into the first class instead of the
    /// element.
    pub merge_non_class_selectors: bool,
    /// Scope for custom CSS.
    pub css_selector_target: CssSelectorTarget,
    /// Append the `js` input as a root-level code element.
    pub include_js: bool,
    /// `source` field of the output envelope.
    pub source: String,
    /// `sourceUrl` field of the output envelope.
    pub source_url: String,
    /// `version` field of the output envelope.
    pub version: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            inline_style_handling: InlineStyleHandling::default(),
            show_node_class: false,
            merge_non_class_selectors: true,
            css_selector_target: CssSelectorTarget::default(),
            include_js: false,
            source: "bricksCopiedElements".to_string(),
            source_url: String::new(),
            version: "1.9.9".to_string(),
        }
    }
}

impl ConvertOptions {
    /// Parse options from a JSON object. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Json`] for malformed JSON or a value of the
    /// wrong type.
    pub fn from_json(json: &str) -> Result<Self, ConvertError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set one option by its JSON name from a string value.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidOption`] for an unknown name or a
    /// value the option does not accept.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), ConvertError> {
        let invalid = || ConvertError::InvalidOption {
            name: name.to_string(),
            value: value.to_string(),
        };
        match name {
            "inlineStyleHandling" => {
                self.inline_style_handling = value.parse().map_err(|_| invalid())?;
            }
            "cssSelectorTarget" => {
                self.css_selector_target = value.parse().map_err(|_| invalid())?;
            }
            "showNodeClass" => self.show_node_class = parse_bool(value).ok_or_else(invalid)?,
            "mergeNonClassSelectors" => {
                self.merge_non_class_selectors = parse_bool(value).ok_or_else(invalid)?;
            }
            "includeJs" => self.include_js = parse_bool(value).ok_or_else(invalid)?,
            "source" => self.source = value.to_string(),
            "sourceUrl" => self.source_url = value.to_string(),
            "version" => self.version = value.to_string(),
            _ => return Err(invalid()),
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ConvertOptions::default();
        assert_eq!(options.inline_style_handling, InlineStyleHandling::Inline);
        assert_eq!(options.css_selector_target, CssSelectorTarget::Class);
        assert!(options.merge_non_class_selectors);
        assert!(!options.show_node_class);
        assert!(!options.include_js);
        assert_eq!(options.source, "bricksCopiedElements");
        assert_eq!(options.version, "1.9.9");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options =
            ConvertOptions::from_json(r#"{"includeJs": true, "inlineStyleHandling": "class"}"#)
                .unwrap();
        assert!(options.include_js);
        assert_eq!(options.inline_style_handling, InlineStyleHandling::Class);
        assert!(options.merge_non_class_selectors);
    }

    #[test]
    fn test_bad_json_value_is_error() {
        let err = ConvertOptions::from_json(r#"{"cssSelectorTarget": "tag"}"#).unwrap_err();
        assert!(matches!(err, ConvertError::Json(_)));
    }

    #[test]
    fn test_strum_and_serde_share_spelling() {
        assert_eq!(InlineStyleHandling::Skip.to_string(), "skip");
        assert_eq!("id".parse::<CssSelectorTarget>().unwrap(), CssSelectorTarget::Id);
        let json = serde_json::to_string(&CssSelectorTarget::Id).unwrap();
        assert_eq!(json, "\"id\"");
    }

    #[test]
    fn test_set_by_name() {
        let mut options = ConvertOptions::default();
        options.set("showNodeClass", "true").unwrap();
        options.set("inlineStyleHandling", "skip").unwrap();
        assert!(options.show_node_class);
        assert_eq!(options.inline_style_handling, InlineStyleHandling::Skip);

        let err = options.set("inlineStyleHandling", "sometimes").unwrap_err();
        assert!(matches!(err, ConvertError::InvalidOption { ref name, .. } if name == "inlineStyleHandling"));
        assert!(options.set("colour", "red").is_err());
    }
}
