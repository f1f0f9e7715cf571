//! Error types for stylesheet compilation and property mapping.

use thiserror::Error;

/// Blocks nested deeper than this abort stylesheet compilation.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Fatal stylesheet failures.
///
/// These never escape [`crate::compile_stylesheet`]; a failed compile yields
/// an empty [`crate::StyleDeclarationMap`] so the conversion keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CssError {
    /// Blocks, brackets or functions nested past [`MAX_NESTING_DEPTH`].
    #[error("blocks nested {depth} levels deep (limit {MAX_NESTING_DEPTH})")]
    NestingTooDeep {
        /// Depth reached when parsing stopped.
        depth: usize,
    },
    /// The input ended inside an open `{` block.
    #[error("unbalanced block: input ended before a closing '}}'")]
    UnbalancedBlock,
}

/// A property mapper rejected a declaration.
///
/// The registry routes the declaration to custom CSS instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapperError {
    /// The value could not be interpreted for this property.
    #[error("invalid value '{value}' for '{property}'")]
    InvalidValue {
        /// Property name.
        property: String,
        /// Offending value.
        value: String,
    },
    /// The value is valid CSS but has no structured representation.
    #[error("'{property}' cannot be represented structurally: {reason}")]
    Unsupported {
        /// Property name.
        property: String,
        /// Why the value was demoted.
        reason: String,
    },
}

impl MapperError {
    /// Shorthand for [`MapperError::InvalidValue`].
    #[must_use]
    pub fn invalid(property: &str, value: &str) -> Self {
        Self::InvalidValue {
            property: property.to_string(),
            value: value.to_string(),
        }
    }

    /// Shorthand for [`MapperError::Unsupported`].
    #[must_use]
    pub fn unsupported(property: &str, reason: &str) -> Self {
        Self::Unsupported {
            property: property.to_string(),
            reason: reason.to_string(),
        }
    }
}
