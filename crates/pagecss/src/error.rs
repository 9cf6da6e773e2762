//! Error types for selector parsing.

use thiserror::Error;

/// Errors that can occur while parsing a selector list.
///
/// # Examples
///
/// ```rust
/// use pagecss::parser::parse_selectors;
///
/// assert!(parse_selectors(".card, ").is_err());
/// assert!(parse_selectors("").is_err());
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PcssError {
    /// Invalid selector syntax was encountered.
    ///
    /// The string contains details about what was unexpected and where.
    #[error("selector syntax error: {0}")]
    InvalidSyntax(String),
}
