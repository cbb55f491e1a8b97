//! Error handling for jsx-template
//!
//! Every fallible operation in this crate returns [`Result<T>`]. Rendering is
//! designed to degrade rather than fail: unknown placeholders and components
//! pass through as literal text, and malformed markup is recovered by the
//! parser. Errors surface only from strict mode, from host components, or
//! from value conversions.
//!
//! # Error Types
//!
//! - [`Error::ParseError`] - markup the parser backend could not turn into a tree
//! - [`Error::RenderError`] - failures raised while building host elements
//! - [`Error::PlaceholderError`] - strict-mode encoder/translator mismatches
//! - [`Error::ComponentError`] - failures raised by a component while rendering
//! - [`Error::JsonError`] - serialization of a value into an object
//!
//! # Memory Efficiency
//!
//! Error messages use `Cow<'static, str>` so static messages never allocate.

use std::borrow::Cow;
use thiserror::Error;

/// Error type for all jsx-template operations
#[derive(Error, Debug)]
pub enum Error {
    /// Markup could not be parsed into a node tree
    #[error("Parse error: {0}")]
    ParseError(Cow<'static, str>),

    /// Building the host element tree failed
    #[error("Render error: {0}")]
    RenderError(Cow<'static, str>),

    /// A token-shaped string could not be claimed from the placeholder pool
    ///
    /// Only raised when [`JsxConfig::strict_placeholders`] is enabled; the
    /// default behavior leaves the token in the output.
    ///
    /// [`JsxConfig::strict_placeholders`]: crate::types::JsxConfig::strict_placeholders
    #[error("Placeholder error: {0}")]
    PlaceholderError(Cow<'static, str>),

    /// A component failed while rendering itself
    #[error("Component error: {0}")]
    ComponentError(Cow<'static, str>),

    /// JSON conversion errors
    ///
    /// Automatically converted from `serde_json::Error` when a serializable
    /// value is turned into an object value.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl Error {
    /// Create a parse error with a static string
    pub fn parse_static(msg: &'static str) -> Self {
        Error::ParseError(Cow::Borrowed(msg))
    }

    /// Create a parse error with an owned string
    pub fn parse_owned(msg: String) -> Self {
        Error::ParseError(Cow::Owned(msg))
    }

    /// Create a render error with a static string
    pub fn render_static(msg: &'static str) -> Self {
        Error::RenderError(Cow::Borrowed(msg))
    }

    /// Create a render error with an owned string
    pub fn render_owned(msg: String) -> Self {
        Error::RenderError(Cow::Owned(msg))
    }

    /// Create a placeholder error with a static string
    pub fn placeholder_static(msg: &'static str) -> Self {
        Error::PlaceholderError(Cow::Borrowed(msg))
    }

    /// Create a placeholder error with an owned string
    ///
    /// ```rust,ignore
    /// use jsx_template::Error;
    ///
    /// let error = Error::placeholder_owned(format!("Unknown token: {}", token));
    /// ```
    pub fn placeholder_owned(msg: String) -> Self {
        Error::PlaceholderError(Cow::Owned(msg))
    }

    /// Create a component error with a static string
    pub fn component_static(msg: &'static str) -> Self {
        Error::ComponentError(Cow::Borrowed(msg))
    }

    /// Create a component error with an owned string
    pub fn component_owned(msg: String) -> Self {
        Error::ComponentError(Cow::Owned(msg))
    }
}

/// Result type alias for jsx-template operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::parse_static("Unexpected end of input");
        assert_eq!(err.to_string(), "Parse error: Unexpected end of input");

        let err = Error::render_static("Failed to render");
        assert_eq!(err.to_string(), "Render error: Failed to render");

        let err = Error::placeholder_static("Token already claimed");
        assert_eq!(err.to_string(), "Placeholder error: Token already claimed");
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::JsonError(_)));
    }

    #[test]
    fn test_owned_variants() {
        let err = Error::placeholder_owned("__jsx_func_0__ was never issued".to_string());
        assert_eq!(
            err.to_string(),
            "Placeholder error: __jsx_func_0__ was never issued"
        );

        let err = Error::component_owned("ListItem failed".to_string());
        assert_eq!(err.to_string(), "Component error: ListItem failed");

        let err = Error::parse_owned("bad markup".to_string());
        assert!(matches!(err, Error::ParseError(Cow::Owned(_))));
    }
}
