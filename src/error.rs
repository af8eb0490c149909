//! Errors surfaced by tree configuration, generation and drawing

use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeError {
    #[error("invalid option `{name}`: {reason}")]
    InvalidOption { name: &'static str, reason: String },
    #[error("options parse error: {0}")]
    OptionsParse(String),
    #[error("seeded random sequence exhausted after {drawn} of {capacity} values")]
    SequenceExhausted { drawn: usize, capacity: usize },
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("drawing failed: {0}")]
    Surface(String),
}

impl TreeError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            name,
            reason: reason.into(),
        }
    }
}

impl From<TreeError> for JsValue {
    fn from(err: TreeError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
