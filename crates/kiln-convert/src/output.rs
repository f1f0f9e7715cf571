//! The site-builder JSON document.

use indexmap::IndexMap;
use kiln_css::{PseudoState, Settings};
use kiln_dom::NodeId;
use serde::Serialize;
use serde_json::Value;

use crate::error::ConvertError;

/// Parent id of root-level elements.
pub const ROOT_PARENT: &str = "0";

/// One element of the output tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementNode {
    /// Run-scoped unique id.
    pub id: String,
    /// Element type (`heading`, `div`, `text-basic`, ...).
    pub name: String,
    /// Parent element id, or [`ROOT_PARENT`].
    pub parent: String,
    /// Child element ids in document order.
    pub children: Vec<String>,
    /// Element settings.
    pub settings: Settings,
    /// Builder-facing label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// DOM element this node was built from. Styling and attributes are
    /// attached from it.
    #[serde(skip)]
    pub source: Option<NodeId>,
}

impl ElementNode {
    /// A root-level node with empty settings.
    #[must_use]
    pub fn new(id: String, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            parent: ROOT_PARENT.to_string(),
            children: Vec::new(),
            settings: Settings::new(),
            label: None,
            source: None,
        }
    }

    /// String setting, if present.
    #[must_use]
    pub fn setting_str(&self, key: &str) -> Option<&str> {
        self.settings.get(key).and_then(Value::as_str)
    }

    /// Whether this node sits at the root of the tree.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent == ROOT_PARENT
    }
}

/// A deduplicated, named bundle of style settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalStyleClass {
    /// Run-scoped unique id.
    pub id: String,
    /// Class name as written in the HTML.
    pub name: String,
    /// Mapped settings.
    pub settings: Settings,
    /// Settings per state pseudo-class.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub pseudo: IndexMap<PseudoState, Settings>,
}

impl GlobalStyleClass {
    /// An empty class.
    #[must_use]
    pub fn new(id: String, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            settings: Settings::new(),
            pseudo: IndexMap::new(),
        }
    }

    /// The class's custom CSS text, if any.
    #[must_use]
    pub fn custom_css(&self) -> Option<&str> {
        self.settings.get("_cssCustom").and_then(Value::as_str)
    }
}

/// The complete conversion result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputDocument {
    /// Elements in pre-order.
    pub content: Vec<ElementNode>,
    /// Envelope source marker.
    pub source: String,
    /// Envelope source URL.
    pub source_url: String,
    /// Envelope schema version.
    pub version: String,
    /// Global classes in first-seen order.
    pub global_classes: Vec<GlobalStyleClass>,
    /// Always empty.
    pub global_elements: Vec<Value>,
}

impl OutputDocument {
    /// Compact JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ConvertError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Indented JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Json`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, ConvertError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Element by id.
    #[must_use]
    pub fn element(&self, id: &str) -> Option<&ElementNode> {
        self.content.iter().find(|e| e.id == id)
    }

    /// Root-level elements in order.
    pub fn roots(&self) -> impl Iterator<Item = &ElementNode> {
        self.content.iter().filter(|e| e.is_root())
    }

    /// Global class by name.
    #[must_use]
    pub fn class_named(&self, name: &str) -> Option<&GlobalStyleClass> {
        self.global_classes.iter().find(|c| c.name == name)
    }
}

/// A document plus the diagnostics collected while building it.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    /// The converted document.
    pub document: OutputDocument,
    /// Contained failures: rejected selectors, ignored stylesheets and the
    /// like.
    pub issues: Vec<String>,
}
