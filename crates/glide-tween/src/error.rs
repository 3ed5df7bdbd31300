//! Error types for glide-tween.

use thiserror::Error;

/// Result type for fallible tween operations.
pub type Result<T> = std::result::Result<T, TweenError>;

/// Errors raised at the edges of the engine.
///
/// The transition engine itself never fails: missing inputs keep it idle.
/// These errors come from resolving easing names and parsing color strings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TweenError {
    /// No easing curve is registered under this name.
    #[error("unknown easing function: {0}")]
    UnknownEasing(String),

    /// A string could not be parsed as a color.
    #[error("invalid color string: {0:?}")]
    InvalidColor(String),
}
