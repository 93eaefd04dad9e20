//! Memoizing highlighter wrapper.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::{Highlighter, Token};

/// Default number of distinct `(language, code)` entries kept.
const DEFAULT_CAPACITY: usize = 1024;

type CacheKey = (Option<String>, String);

/// Wraps a [`Highlighter`] and memoizes `tokenize` by `(language, code)`.
///
/// Highlighters are pure, so cached tokens are always equal to fresh ones.
/// When the cache reaches its capacity it is cleared before inserting.
///
/// # Example
///
/// ```
/// use prism_highlight::{CachingHighlighter, Highlighter, LexicalHighlighter};
///
/// let highlighter = CachingHighlighter::new(LexicalHighlighter::new());
/// let first = highlighter.tokenize("let x = 1;", Some("rust"));
/// let second = highlighter.tokenize("let x = 1;", Some("rust"));
/// assert_eq!(first, second);
/// assert_eq!(highlighter.len(), 1);
/// ```
#[derive(Debug)]
pub struct CachingHighlighter<H> {
    inner: H,
    capacity: usize,
    entries: Mutex<HashMap<CacheKey, Vec<Token>>>,
}

impl<H: Highlighter> CachingHighlighter<H> {
    /// Wrap `inner` with the default capacity.
    #[must_use]
    pub fn new(inner: H) -> Self {
        Self::with_capacity(inner, DEFAULT_CAPACITY)
    }

    /// Wrap `inner`, keeping at most `capacity` entries (minimum 1).
    #[must_use]
    pub fn with_capacity(inner: H, capacity: usize) -> Self {
        Self {
            inner,
            capacity: capacity.max(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The wrapped highlighter.
    pub fn inner(&self) -> &H {
        &self.inner
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop all cached entries.
    pub fn clear(&self) {
        self.lock().clear();
    }

    // A poisoned map is still consistent: entries are inserted whole.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, Vec<Token>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<H: Highlighter> Highlighter for CachingHighlighter<H> {
    fn tokenize(&self, code: &str, language: Option<&str>) -> Vec<Token> {
        let key = (language.map(str::to_owned), code.to_owned());
        if let Some(tokens) = self.lock().get(&key) {
            return tokens.clone();
        }

        tracing::debug!(language = ?language, len = code.len(), "Highlight cache miss");
        let tokens = self.inner.tokenize(code, language);

        let mut entries = self.lock();
        if entries.len() >= self.capacity {
            entries.clear();
        }
        entries.insert(key, tokens.clone());
        tokens
    }

    fn supports(&self, language: &str) -> bool {
        self.inner.supports(language)
    }
}
