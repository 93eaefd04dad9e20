//! HTML renderer.
//!
//! Produces an HTML5 fragment. Text and attribute values are escaped exactly
//! once; raw HTML nodes pass through unchanged.

use std::fmt::{self, Write};
use std::sync::Arc;

use prism_highlight::{Highlighter, Token, segments, validate_tokens};

use crate::ast::{AlertKind, Alignment, BlockDirective, Document, Table, plain_text};
use crate::context::{RenderContext, TocEntry};
use crate::renderer::Renderer;
use crate::walk::{Flow, ItemMarker, RenderBackend, walk_document};

/// Rendered page with the metadata collected while rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HtmlPage {
    /// HTML fragment.
    pub html: String,
    /// Text of the first level-1 heading.
    pub title: Option<String>,
    /// Table of contents (all headings except the title).
    pub toc: Vec<TocEntry>,
}

/// HTML renderer with optional syntax highlighting.
///
/// # Example
///
/// ```
/// use prism_renderer::{Document, HtmlRenderer, ParseOptions, Renderer};
///
/// let document = Document::parse("**bold** and *em*", &ParseOptions::default());
/// let html = HtmlRenderer::new().render(&document);
/// assert_eq!(html, "<p><strong>bold</strong> and <em>em</em></p>");
/// ```
#[derive(Clone)]
pub struct HtmlRenderer {
    highlighter: Option<Arc<dyn Highlighter>>,
    heading_anchors: bool,
}

impl HtmlRenderer {
    /// Renderer without highlighting, with heading anchors.
    #[must_use]
    pub fn new() -> Self {
        Self {
            highlighter: None,
            heading_anchors: true,
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

    /// Enable or disable `id` attributes on headings.
    #[must_use]
    pub fn with_heading_anchors(mut self, enabled: bool) -> Self {
        self.heading_anchors = enabled;
        self
    }

    /// Render and also return the title and table of contents.
    #[must_use]
    pub fn render_page(&self, document: &Document) -> HtmlPage {
        let mut context = RenderContext::new();
        let html = self.render_with_context(document, &mut context);
        HtmlPage {
            html,
            title: context.take_title(),
            toc: context.take_toc(),
        }
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HtmlRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlRenderer")
            .field("highlighter", &self.highlighter.is_some())
            .field("heading_anchors", &self.heading_anchors)
            .finish()
    }
}

impl Renderer for HtmlRenderer {
    type Output = String;

    fn render_with_context(&self, document: &Document, context: &mut RenderContext) -> String {
        tracing::debug!(
            blocks = document.blocks.len(),
            highlight = self.highlighter.is_some(),
            "Rendering HTML"
        );
        let mut backend = HtmlBackend {
            out: String::with_capacity(4096),
            highlighter: self.highlighter.as_deref(),
            heading_anchors: self.heading_anchors,
            alert_directives: Vec::new(),
        };
        walk_document(document, &mut backend, context);
        backend.out
    }
}

struct HtmlBackend<'a> {
    out: String,
    highlighter: Option<&'a dyn Highlighter>,
    heading_anchors: bool,
    /// One entry per open directive: whether it was rendered as an alert.
    alert_directives: Vec<bool>,
}

impl HtmlBackend<'_> {
    fn escaped(&mut self, text: &str) {
        push_escaped(&mut self.out, text);
    }

    fn alert_start(&mut self, kind: AlertKind, title: &str) {
        let _ = write!(
            self.out,
            r#"<div class="alert alert-{}"><div class="alert-title">"#,
            kind.name()
        );
        self.escaped(title);
        self.out.push_str(r#"</div><div class="alert-content">"#);
    }

    fn alert_end(&mut self) {
        self.out.push_str("</div></div>");
    }

    /// Valid tokens for `literal`, or `None` to render it plain.
    fn tokens(&self, language: Option<&str>, literal: &str) -> Option<Vec<Token>> {
        let highlighter = self.highlighter?;
        let tokens = highlighter.tokenize(literal, language);
        if tokens.is_empty() {
            tracing::trace!(language = ?language, "No highlighting for code block");
            return None;
        }
        if let Err(e) = validate_tokens(literal, &tokens) {
            tracing::warn!(error = %e, language = ?language, "Invalid highlighter tokens, rendering plain");
            return None;
        }
        Some(tokens)
    }
}

impl RenderBackend for HtmlBackend<'_> {
    fn text(&mut self, text: &str) {
        self.escaped(text);
    }

    fn code(&mut self, code: &str) {
        self.out.push_str("<code>");
        self.escaped(code);
        self.out.push_str("</code>");
    }

    fn soft_break(&mut self) {
        self.out.push('\n');
    }

    fn line_break(&mut self) {
        self.out.push_str("<br>");
    }

    fn emphasis_start(&mut self) {
        self.out.push_str("<em>");
    }

    fn emphasis_end(&mut self) {
        self.out.push_str("</em>");
    }

    fn strong_start(&mut self) {
        self.out.push_str("<strong>");
    }

    fn strong_end(&mut self) {
        self.out.push_str("</strong>");
    }

    fn strikethrough_start(&mut self) {
        self.out.push_str("<s>");
    }

    fn strikethrough_end(&mut self) {
        self.out.push_str("</s>");
    }

    fn superscript_start(&mut self) {
        self.out.push_str("<sup>");
    }

    fn superscript_end(&mut self) {
        self.out.push_str("</sup>");
    }

    fn subscript_start(&mut self) {
        self.out.push_str("<sub>");
    }

    fn subscript_end(&mut self) {
        self.out.push_str("</sub>");
    }

    fn link_start(&mut self, destination: &str, title: &str) {
        self.out.push_str(r#"<a href=""#);
        self.escaped(destination);
        if !title.is_empty() {
            self.out.push_str(r#"" title=""#);
            self.escaped(title);
        }
        self.out.push_str(r#"">"#);
    }

    fn link_end(&mut self) {
        self.out.push_str("</a>");
    }

    fn image(&mut self, source: &str, title: &str, alt: &str) {
        self.out.push_str(r#"<img src=""#);
        self.escaped(source);
        if !title.is_empty() {
            self.out.push_str(r#"" title=""#);
            self.escaped(title);
        }
        self.out.push_str(r#"" alt=""#);
        self.escaped(alt);
        self.out.push_str(r#"">"#);
    }

    fn inline_html(&mut self, html: &str) {
        self.out.push_str(html);
    }

    fn footnote_reference(&mut self, label: &str, number: usize) {
        self.out
            .push_str(r##"<sup class="footnote-reference"><a href="#fn-"##);
        self.escaped(label);
        let _ = write!(self.out, r#"">{number}</a></sup>"#);
    }

    fn paragraph_start(&mut self, tight: bool) {
        if !tight {
            self.out.push_str("<p>");
        }
    }

    fn paragraph_end(&mut self, tight: bool) {
        if !tight {
            self.out.push_str("</p>");
        }
    }

    fn heading_start(&mut self, level: u8, id: &str) {
        let level = level.clamp(1, 6);
        if self.heading_anchors {
            let _ = write!(self.out, "<h{level} id=\"");
            self.escaped(id);
            self.out.push_str("\">");
        } else {
            let _ = write!(self.out, "<h{level}>");
        }
    }

    fn heading_end(&mut self, level: u8) {
        let level = level.clamp(1, 6);
        let _ = write!(self.out, "</h{level}>");
    }

    fn code_block(&mut self, language: Option<&str>, literal: &str) {
        match language {
            Some(lang) => {
                self.out.push_str(r#"<pre><code class="language-"#);
                self.escaped(lang);
                self.out.push_str(r#"">"#);
            }
            None => self.out.push_str("<pre><code>"),
        }

        match self.tokens(language, literal) {
            Some(tokens) => {
                for segment in segments(literal, &tokens) {
                    match segment.category {
                        Some(category) => {
                            let _ = write!(self.out, r#"<span class="{}">"#, category.css_class());
                            self.escaped(segment.text);
                            self.out.push_str("</span>");
                        }
                        None => self.escaped(segment.text),
                    }
                }
            }
            None => self.escaped(literal),
        }

        self.out.push_str("</code></pre>");
    }

    fn list_start(&mut self, start: Option<u64>, _tight: bool) {
        match start {
            None => self.out.push_str("<ul>"),
            Some(1) => self.out.push_str("<ol>"),
            Some(n) => {
                let _ = write!(self.out, r#"<ol start="{n}">"#);
            }
        }
    }

    fn list_end(&mut self, ordered: bool) {
        self.out.push_str(if ordered { "</ol>" } else { "</ul>" });
    }

    fn item_start(&mut self, _marker: ItemMarker, task: Option<bool>) {
        self.out.push_str("<li>");
        match task {
            Some(true) => self
                .out
                .push_str(r#"<input type="checkbox" checked disabled> "#),
            Some(false) => self.out.push_str(r#"<input type="checkbox" disabled> "#),
            None => {}
        }
    }

    fn item_end(&mut self) {
        self.out.push_str("</li>");
    }

    fn block_quote_start(&mut self, alert: Option<AlertKind>) {
        match alert {
            Some(kind) => self.alert_start(kind, kind.title()),
            None => self.out.push_str("<blockquote>"),
        }
    }

    fn block_quote_end(&mut self, alert: Option<AlertKind>) {
        match alert {
            Some(_) => self.alert_end(),
            None => self.out.push_str("</blockquote>"),
        }
    }

    fn thematic_break(&mut self) {
        self.out.push_str("<hr>");
    }

    fn html_block(&mut self, html: &str) {
        self.out.push_str(html);
    }

    fn table_start(&mut self, _table: &Table) -> Flow {
        self.out.push_str("<table>");
        Flow::Children
    }

    fn table_end(&mut self, _table: &Table) {
        self.out.push_str("</tbody></table>");
    }

    fn table_row_start(&mut self, header: bool) {
        self.out
            .push_str(if header { "<thead><tr>" } else { "<tr>" });
    }

    fn table_row_end(&mut self, header: bool) {
        self.out
            .push_str(if header { "</tr></thead><tbody>" } else { "</tr>" });
    }

    fn table_cell_start(&mut self, header: bool, _index: usize, alignment: Alignment) {
        let tag = if header { "th" } else { "td" };
        let style = match alignment {
            Alignment::None => "",
            Alignment::Left => r#" style="text-align:left""#,
            Alignment::Center => r#" style="text-align:center""#,
            Alignment::Right => r#" style="text-align:right""#,
        };
        let _ = write!(self.out, "<{tag}{style}>");
    }

    fn table_cell_end(&mut self, header: bool) {
        self.out.push_str(if header { "</th>" } else { "</td>" });
    }

    fn footnote_definition_start(&mut self, label: &str, number: usize) -> Flow {
        self.out
            .push_str(r#"<div class="footnote-definition" id="fn-"#);
        self.escaped(label);
        let _ = write!(
            self.out,
            r#""><sup class="footnote-definition-label">{number}</sup>"#
        );
        Flow::Children
    }

    fn footnote_definition_end(&mut self, _label: &str, _number: usize) {
        self.out.push_str("</div>");
    }

    fn directive_start(&mut self, directive: &BlockDirective) -> Flow {
        if directive.name.eq_ignore_ascii_case("comment") {
            return Flow::Skip;
        }
        let alert = AlertKind::from_name(&directive.name);
        if let Some(kind) = alert {
            let label = plain_text(&directive.label);
            let title = if label.trim().is_empty() {
                kind.title()
            } else {
                label.trim()
            };
            self.alert_start(kind, title);
        }
        self.alert_directives.push(alert.is_some());
        Flow::Children
    }

    fn directive_end(&mut self, _directive: &BlockDirective) {
        if self.alert_directives.pop() == Some(true) {
            self.alert_end();
        }
    }
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    push_escaped(&mut result, s);
    result
}

fn push_escaped(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
}
