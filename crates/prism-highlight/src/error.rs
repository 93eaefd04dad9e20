//! Highlighting errors.

/// Problem detected in a highlighter's output or raised by its engine.
///
/// Renderers never surface these; they fall back to unhighlighted output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum HighlightError {
    /// A token reaches past the end of the code, or ends before it starts.
    #[error("token {start}..{end} is outside code of length {len}")]
    OutOfBounds {
        /// Token start offset.
        start: usize,
        /// Token end offset.
        end: usize,
        /// Code length in bytes.
        len: usize,
    },
    /// A token starts before the previous one ended.
    #[error("token starting at {start} overlaps previous token ending at {previous_end}")]
    Overlap {
        /// End offset of the previous token.
        previous_end: usize,
        /// Start offset of the offending token.
        start: usize,
    },
    /// A token boundary splits a UTF-8 character.
    #[error("token boundary {offset} is not on a character boundary")]
    NotCharBoundary {
        /// The offending byte offset.
        offset: usize,
    },
    /// The underlying highlighting engine failed.
    #[error("highlighting engine error: {0}")]
    Engine(String),
}
