//! Syntax highlighting for fenced code blocks.
//!
//! A [`Highlighter`] turns code text plus an optional language tag into an
//! ordered list of [`Token`]s, each a byte range tagged with a
//! [`TokenCategory`]. Untagged gaps between tokens are plain text.
//!
//! # Implementations
//!
//! - [`LexicalHighlighter`]: built-in rule-based tokenizer for common languages
//! - [`PlainHighlighter`]: never highlights (every language is unsupported)
//! - [`CachingHighlighter`]: memoizes any highlighter by `(language, code)`
//! - `SyntectHighlighter` (feature `syntect`): `TextMate` grammars via `syntect`
//!
//! # Contract
//!
//! `tokenize` is total and pure: any input yields a (possibly empty) token list,
//! unsupported languages yield an empty list, and identical inputs yield
//! identical output. Consumers that cannot trust a third-party implementation
//! check the output with [`validate_tokens`] before using [`segments`].
//!
//! # Example
//!
//! ```
//! use prism_highlight::{Highlighter, LexicalHighlighter, TokenCategory, segments};
//!
//! let code = "let x = 42;";
//! let tokens = LexicalHighlighter::new().tokenize(code, Some("rust"));
//! assert_eq!(tokens[0].category, TokenCategory::Keyword);
//!
//! let rebuilt: String = segments(code, &tokens).map(|s| s.text).collect();
//! assert_eq!(rebuilt, code);
//! ```

mod cache;
mod error;
mod highlighter;
mod lexical;
#[cfg(feature = "syntect")]
mod syntect;
mod token;

pub use cache::CachingHighlighter;
pub use error::HighlightError;
pub use highlighter::{Highlighter, PlainHighlighter};
pub use lexical::LexicalHighlighter;
pub use prism_theme::TokenCategory;
#[cfg(feature = "syntect")]
pub use self::syntect::SyntectHighlighter;
pub use token::{Segment, Segments, Token, segments, validate_tokens};
