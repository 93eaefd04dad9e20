//! Syntax color themes shared between HTML and native text output.
//!
//! A [`SyntaxTheme`] pairs two [`SyntaxColors`] palettes (light and dark). Each
//! palette maps the fixed set of [`TokenCategory`] values to a [`Color`].
//!
//! The same theme drives both output families:
//! - HTML: [`SyntaxTheme::generate_css`] binds `--syntax-<category>` custom
//!   properties and `.token-<category>` classes
//! - Native text: [`SyntaxTheme::resolve`] returns the concrete color for the
//!   active [`ColorMode`]
//!
//! # Example
//!
//! ```
//! use prism_theme::{ColorMode, SyntaxTheme, TokenCategory};
//!
//! let theme = SyntaxTheme::default();
//! let css = theme.generate_css();
//! assert!(css.contains(".token-keyword { color: var(--syntax-keyword); }"));
//!
//! let color = theme.resolve(ColorMode::Dark, TokenCategory::Keyword);
//! assert_eq!(color, theme.dark().keyword);
//! ```

mod category;
mod color;
mod colors;
mod error;
mod theme;

pub use category::TokenCategory;
pub use color::Color;
pub use colors::SyntaxColors;
pub use error::ThemeError;
pub use theme::{ColorMode, SyntaxTheme};
