//! Styled native-text renderer.
//!
//! Produces [`StyledText`]: runs of text with resolved attributes that a host
//! maps onto its own attributed-string type. Layout is shared with the
//! plain-text renderer, so [`StyledText::plain_text`] always equals the
//! [`PlainTextRenderer`](crate::PlainTextRenderer) output for the same document.

use std::fmt;
use std::sync::Arc;

use prism_highlight::Highlighter;
use prism_theme::{Color, ColorMode, SyntaxTheme};

use crate::ast::Document;
use crate::context::RenderContext;
use crate::layout::{CodeColors, TextBackend, TextSink};
use crate::renderer::Renderer;
use crate::walk::walk_document;

/// Relative font size per heading level (1-6).
const HEADING_SCALES: [f32; 6] = [2.0, 1.5, 1.25, 1.1, 1.0, 0.9];

/// Vertical position of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Baseline {
    #[default]
    Normal,
    Superscript,
    Subscript,
}

/// Attributes of a [`StyledRun`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    /// Code spans and code blocks.
    pub monospace: bool,
    pub baseline: Baseline,
    /// Font size relative to body text.
    pub scale: f32,
    /// Text color; `None` uses the host's default.
    pub foreground: Option<Color>,
    /// Link target.
    pub link: Option<String>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
            monospace: false,
            baseline: Baseline::Normal,
            scale: 1.0,
            foreground: None,
            link: None,
        }
    }
}

impl TextStyle {
    /// Relative font size for a heading of `level`.
    #[must_use]
    pub fn heading_scale(level: u8) -> f32 {
        let index = usize::from(level.clamp(1, 6)) - 1;
        HEADING_SCALES[index]
    }
}

/// Text sharing one [`TextStyle`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyledRun {
    pub text: String,
    pub style: TextStyle,
}

/// Ordered styled runs. Adjacent runs always differ in style.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyledText {
    runs: Vec<StyledRun>,
}

impl StyledText {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text`, merging it into the last run when the style matches.
    pub fn push(&mut self, text: &str, style: &TextStyle) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.runs.last_mut()
            && last.style == *style
        {
            last.text.push_str(text);
            return;
        }
        self.runs.push(StyledRun {
            text: text.to_owned(),
            style: style.clone(),
        });
    }

    #[must_use]
    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }

    #[must_use]
    pub fn into_runs(self) -> Vec<StyledRun> {
        self.runs
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Concatenated text of all runs.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

impl TextSink for StyledText {
    fn append(&mut self, text: &str, style: &TextStyle) {
        self.push(text, style);
    }
}

/// Renderer producing [`StyledText`].
///
/// Code block token colors come from the theme palette selected by the
/// context's [`ColorMode`]; [`Renderer::render`] uses the mode set with
/// [`with_mode`](Self::with_mode).
///
/// # Example
///
/// ```
/// use prism_renderer::{Document, ParseOptions, Renderer, StyledTextRenderer};
///
/// let document = Document::parse("**bold** and *em*", &ParseOptions::default());
/// let styled = StyledTextRenderer::default().render(&document);
/// assert_eq!(styled.plain_text(), "bold and em");
/// assert!(styled.runs()[0].style.bold);
/// ```
#[derive(Clone, Default)]
pub struct StyledTextRenderer {
    theme: SyntaxTheme,
    highlighter: Option<Arc<dyn Highlighter>>,
    mode: ColorMode,
}

impl StyledTextRenderer {
    /// Renderer using `theme` for code colors, without highlighting.
    #[must_use]
    pub fn new(theme: SyntaxTheme) -> Self {
        Self {
            theme,
            highlighter: None,
            mode: ColorMode::default(),
        }
    }

    /// Highlight fenced code blocks with `highlighter`.
    #[must_use]
    pub fn with_highlighter(self, highlighter: impl Highlighter + 'static) -> Self {
        self.with_shared_highlighter(Arc::new(highlighter))
    }

    /// Highlight fenced code blocks with a shared highlighter.
    #[must_use]
    pub fn with_shared_highlighter(mut self, highlighter: Arc<dyn Highlighter>) -> Self {
        self.highlighter = Some(highlighter);
        self
    }

    /// Color mode used by [`Renderer::render`].
    #[must_use]
    pub fn with_mode(mut self, mode: ColorMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn theme(&self) -> &SyntaxTheme {
        &self.theme
    }
}

impl fmt::Debug for StyledTextRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyledTextRenderer")
            .field("theme", &self.theme)
            .field("highlighter", &self.highlighter.is_some())
            .field("mode", &self.mode)
            .finish()
    }
}

impl Renderer for StyledTextRenderer {
    type Output = StyledText;

    fn render_with_context(&self, document: &Document, context: &mut RenderContext) -> StyledText {
        tracing::debug!(
            blocks = document.blocks.len(),
            mode = %context.mode(),
            "Rendering styled text"
        );
        let mut backend = TextBackend::new(StyledText::new());
        if let Some(highlighter) = self.highlighter.as_deref() {
            backend = backend.with_code_colors(CodeColors {
                highlighter,
                theme: &self.theme,
                mode: context.mode(),
            });
        }
        walk_document(document, &mut backend, context);
        backend.finish()
    }

    fn render(&self, document: &Document) -> StyledText {
        let mut context = RenderContext::with_mode(self.mode);
        self.render_with_context(document, &mut context)
    }
}
