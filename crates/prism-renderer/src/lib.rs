//! Markdown rendering with pluggable output formats.
//!
//! [`Document::parse`] turns Markdown into a typed tree of [`Block`]s and
//! [`Inline`]s. A [`Renderer`] turns that tree into one output representation:
//!
//! - [`HtmlRenderer`]: semantic HTML with optional token-span code highlighting
//! - [`PlainTextRenderer`]: unstyled text for search indexes and terminals
//! - [`StyledTextRenderer`]: styled runs for native text views
//!
//! # Architecture
//!
//! Every renderer drives the same depth-first walk ([`walk_document`]) over a
//! format-specific [`RenderBackend`]. The backend receives one hook per node;
//! extension nodes (tables, footnotes, directives, Doxygen commands) have
//! default hooks that fall back to rendering their children, so a new
//! backend only implements the core `CommonMark` hooks.
//!
//! Cross-cutting state (color mode, footnote numbering, heading ids, the
//! table of contents) lives in a [`RenderContext`] supplied by the caller.
//!
//! # Example
//!
//! ```
//! use prism_renderer::{Document, HtmlRenderer, ParseOptions, PlainTextRenderer, Renderer};
//!
//! let document = Document::parse("# Hello\n\n**Bold** text", &ParseOptions::default());
//!
//! let html = HtmlRenderer::new().render(&document);
//! assert!(html.contains("<strong>Bold</strong>"));
//!
//! let text = PlainTextRenderer.render(&document);
//! assert_eq!(text, "Hello\n\nBold text");
//! ```

mod ast;
mod context;
mod html;
mod layout;
mod parse;
mod plain;
mod renderer;
mod styled;
mod walk;

pub use ast::{
    AlertKind, Alignment, Block, BlockDirective, DirectiveAttributes, DirectiveKind, Document,
    DoxygenCommand, Inline, InlineDirective, ListItem, Table, TableCell, plain_text,
};
pub use context::{Container, RenderContext, TocEntry, slugify};
pub use html::{HtmlPage, HtmlRenderer, escape_html};
pub use parse::ParseOptions;
pub use plain::PlainTextRenderer;
pub use prism_highlight::{Highlighter, LexicalHighlighter, PlainHighlighter};
pub use prism_theme::{Color, ColorMode, SyntaxColors, SyntaxTheme, TokenCategory};
pub use renderer::Renderer;
pub use styled::{Baseline, StyledRun, StyledText, StyledTextRenderer, TextStyle};
pub use walk::{
    Flow, ItemMarker, RenderBackend, walk_block, walk_blocks, walk_document, walk_inline,
    walk_inlines,
};
