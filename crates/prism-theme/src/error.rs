//! Theme construction errors.

/// Error raised while building colors or themes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ThemeError {
    /// A color string could not be parsed.
    #[error("invalid color {value:?}: {reason}")]
    InvalidColor {
        /// The rejected input.
        value: String,
        /// What was wrong with it.
        reason: &'static str,
    },
    /// A category name is not one of the fixed token categories.
    #[error("unknown token category {0:?}")]
    UnknownCategory(String),
    /// A color mode name is neither `light` nor `dark`.
    #[error("unknown color mode {0:?} (expected \"light\" or \"dark\")")]
    UnknownMode(String),
}
