use miette::Diagnostic;
use thiserror::Error;

/// An entity notation or record that does not name a valid BEM entity.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("malformed entity `{notation}`: {reason}")]
#[diagnostic(
    code(bemdecl::malformed_entity),
    help("entities look like `block`, `block_mod_val`, `block__elem` or `block__elem_mod_val`")
)]
pub struct MalformedEntity {
    pub notation: String,
    pub reason: String,
}

impl MalformedEntity {
    pub fn new(notation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            notation: notation.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn with_notation(mut self, notation: &str) -> Self {
        self.notation = notation.to_string();
        self
    }
}

/// Failure to decode or encode a declaration.
#[derive(Debug, Error, Diagnostic)]
pub enum DeclError {
    #[error("invalid declaration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Malformed(#[from] MalformedEntity),

    #[error("unrecognized declaration shape: {0}")]
    #[diagnostic(help(
        "expected {{\"blocks\": [...]}}, {{\"deps\": [...]}} or an array of records"
    ))]
    Shape(String),
}
