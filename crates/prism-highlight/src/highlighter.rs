//! Highlighter trait.

use std::sync::Arc;

use crate::Token;

/// Strategy that tokenizes code for syntax coloring.
///
/// Implementations must be total (never panic, never fail: unsupported input
/// yields an empty list) and pure (identical inputs give identical tokens).
/// Returned tokens must be ascending and non-overlapping; see
/// [`validate_tokens`](crate::validate_tokens).
///
/// Highlighters are shared between concurrent renders, hence `Send + Sync`.
pub trait Highlighter: Send + Sync {
    /// Tokenize `code` written in `language`.
    ///
    /// # Arguments
    ///
    /// * `code` - Literal text of the code block
    /// * `language` - Language tag from the fence info string, if any
    fn tokenize(&self, code: &str, language: Option<&str>) -> Vec<Token>;

    /// Whether `language` is recognized by this highlighter.
    fn supports(&self, language: &str) -> bool;
}

impl<H: Highlighter + ?Sized> Highlighter for Arc<H> {
    fn tokenize(&self, code: &str, language: Option<&str>) -> Vec<Token> {
        (**self).tokenize(code, language)
    }

    fn supports(&self, language: &str) -> bool {
        (**self).supports(language)
    }
}

impl<H: Highlighter + ?Sized> Highlighter for Box<H> {
    fn tokenize(&self, code: &str, language: Option<&str>) -> Vec<Token> {
        (**self).tokenize(code, language)
    }

    fn supports(&self, language: &str) -> bool {
        (**self).supports(language)
    }
}

/// Highlighter that supports no language.
///
/// Useful as an explicit "highlighting off" strategy.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn tokenize(&self, _code: &str, _language: Option<&str>) -> Vec<Token> {
        Vec::new()
    }

    fn supports(&self, _language: &str) -> bool {
        false
    }
}
