//! Line-oriented text layout shared by the plain-text and styled renderers.
//!
//! Blocks are separated by blank lines (single line breaks inside tight
//! lists), list items carry `- ` / `N. ` markers with their content indented
//! under the marker, and block quotes are prefixed with `> `. Line breaks and
//! gaps are emitted lazily before the next content, so output never ends with
//! a newline.

use prism_highlight::{Highlighter, segments, validate_tokens};
use prism_theme::{ColorMode, SyntaxTheme};

use crate::ast::{AlertKind, Table};
use crate::styled::{Baseline, TextStyle};
use crate::walk::{Flow, ItemMarker, RenderBackend};

/// Destination of laid-out text.
pub(crate) trait TextSink {
    fn append(&mut self, text: &str, style: &TextStyle);
}

impl TextSink for String {
    fn append(&mut self, text: &str, _style: &TextStyle) {
        self.push_str(text);
    }
}

/// Highlighting setup for code blocks.
#[derive(Clone, Copy)]
pub(crate) struct CodeColors<'a> {
    pub highlighter: &'a dyn Highlighter,
    pub theme: &'a SyntaxTheme,
    pub mode: ColorMode,
}

/// Line prefix contributed by an open container.
#[derive(Debug)]
struct Prefix {
    /// Prefix of the container's first line (list marker).
    first: String,
    /// Prefix of every following line.
    rest: String,
    used_first: bool,
}

impl Prefix {
    fn uniform(prefix: &str) -> Self {
        Self {
            first: prefix.to_owned(),
            rest: prefix.to_owned(),
            used_first: false,
        }
    }

    fn hanging(first: String) -> Self {
        let rest = " ".repeat(first.chars().count());
        Self {
            first,
            rest,
            used_first: false,
        }
    }
}

/// Separation requested before the next block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Gap {
    Line = 1,
    Blank = 2,
}

pub(crate) struct TextBackend<'a, S> {
    sink: S,
    prefixes: Vec<Prefix>,
    /// Newlines owed before the next content.
    pending_lines: usize,
    /// Owed newlines that are code content; gaps are added on top.
    code_lines: usize,
    at_line_start: bool,
    started: bool,
    /// Next block continues the line a marker or title just opened.
    fresh: bool,
    /// Tightness of each open list. Quotes and footnotes push `false`.
    tight: Vec<bool>,
    styles: Vec<TextStyle>,
    code_colors: Option<CodeColors<'a>>,
}

impl<'a, S: TextSink> TextBackend<'a, S> {
    pub(crate) fn new(sink: S) -> Self {
        Self {
            sink,
            prefixes: Vec::new(),
            pending_lines: 0,
            code_lines: 0,
            at_line_start: true,
            started: false,
            fresh: false,
            tight: Vec::new(),
            styles: Vec::new(),
            code_colors: None,
        }
    }

    pub(crate) fn with_code_colors(mut self, colors: CodeColors<'a>) -> Self {
        self.code_colors = Some(colors);
        self
    }

    pub(crate) fn finish(self) -> S {
        self.sink
    }

    fn style(&self) -> TextStyle {
        self.styles.last().cloned().unwrap_or_default()
    }

    fn push_style(&mut self, apply: impl FnOnce(&mut TextStyle)) {
        let mut style = self.style();
        apply(&mut style);
        self.styles.push(style);
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    fn request(&mut self, gap: Gap) {
        if self.started {
            self.pending_lines = self.pending_lines.max(self.code_lines + gap as usize);
        }
    }

    fn block_start(&mut self) {
        if self.fresh {
            return;
        }
        let gap = if self.tight.last() == Some(&true) {
            Gap::Line
        } else {
            Gap::Blank
        };
        self.request(gap);
    }

    /// End the current line; consecutive calls produce blank lines.
    fn newline(&mut self) {
        self.pending_lines += 1;
    }

    fn write(&mut self, text: &str) {
        let style = self.style();
        self.write_styled(text, &style);
    }

    fn write_styled(&mut self, text: &str, style: &TextStyle) {
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.newline();
            }
            if !line.is_empty() {
                self.flush_lines();
                if self.at_line_start {
                    self.emit_prefix();
                }
                self.sink.append(line, style);
                self.at_line_start = false;
                self.started = true;
                self.fresh = false;
            }
        }
    }

    fn flush_lines(&mut self) {
        let plain = TextStyle::default();
        self.code_lines = 0;
        for i in 0..std::mem::take(&mut self.pending_lines) {
            if i > 0 {
                let blank = self.blank_prefix();
                self.sink.append(&blank, &plain);
            }
            self.sink.append("\n", &plain);
            self.at_line_start = true;
        }
    }

    fn emit_prefix(&mut self) {
        let prefix = self.take_prefix();
        if !prefix.is_empty() {
            self.sink.append(&prefix, &TextStyle::default());
        }
    }

    /// Prefix of a new content line; marks first-line prefixes as used.
    fn take_prefix(&mut self) -> String {
        let mut prefix = String::new();
        for entry in &mut self.prefixes {
            if entry.used_first {
                prefix.push_str(&entry.rest);
            } else {
                prefix.push_str(&entry.first);
                entry.used_first = true;
            }
        }
        prefix
    }

    /// Prefix of an empty line: quote markers survive, indentation does not.
    fn blank_prefix(&self) -> String {
        let prefix: String = self
            .prefixes
            .iter()
            .filter(|entry| entry.used_first)
            .map(|entry| entry.rest.as_str())
            .collect();
        prefix.trim_end().to_owned()
    }

    fn write_code(&mut self, language: Option<&str>, literal: &str) {
        let base = self.style();
        let Some(colors) = self.code_colors else {
            self.write_styled(literal, &base);
            return;
        };

        let tokens = colors.highlighter.tokenize(literal, language);
        if tokens.is_empty() {
            self.write_styled(literal, &base);
            return;
        }
        if let Err(e) = validate_tokens(literal, &tokens) {
            tracing::warn!(error = %e, language = ?language, "Invalid highlighter tokens, rendering plain");
            self.write_styled(literal, &base);
            return;
        }

        for segment in segments(literal, &tokens) {
            match segment.category {
                Some(category) => {
                    let style = TextStyle {
                        foreground: Some(colors.theme.resolve(colors.mode, category)),
                        italic: base.italic || category.is_italic(),
                        ..base.clone()
                    };
                    self.write_styled(segment.text, &style);
                }
                None => self.write_styled(segment.text, &base),
            }
        }
    }
}

impl<S: TextSink> RenderBackend for TextBackend<'_, S> {
    fn text(&mut self, text: &str) {
        self.write(text);
    }

    fn code(&mut self, code: &str) {
        self.push_style(|style| style.monospace = true);
        self.write(code);
        self.pop_style();
    }

    fn soft_break(&mut self) {
        self.write(" ");
    }

    fn line_break(&mut self) {
        self.newline();
    }

    fn emphasis_start(&mut self) {
        self.push_style(|style| style.italic = true);
    }

    fn emphasis_end(&mut self) {
        self.pop_style();
    }

    fn strong_start(&mut self) {
        self.push_style(|style| style.bold = true);
    }

    fn strong_end(&mut self) {
        self.pop_style();
    }

    fn strikethrough_start(&mut self) {
        self.push_style(|style| style.strikethrough = true);
    }

    fn strikethrough_end(&mut self) {
        self.pop_style();
    }

    fn superscript_start(&mut self) {
        self.push_style(|style| style.baseline = Baseline::Superscript);
    }

    fn superscript_end(&mut self) {
        self.pop_style();
    }

    fn subscript_start(&mut self) {
        self.push_style(|style| style.baseline = Baseline::Subscript);
    }

    fn subscript_end(&mut self) {
        self.pop_style();
    }

    fn link_start(&mut self, destination: &str, _title: &str) {
        self.push_style(|style| {
            style.underline = true;
            style.link = Some(destination.to_owned());
        });
    }

    fn link_end(&mut self) {
        self.pop_style();
    }

    fn image(&mut self, _source: &str, _title: &str, alt: &str) {
        self.write(alt);
    }

    fn paragraph_start(&mut self, _tight: bool) {
        self.block_start();
    }

    fn paragraph_end(&mut self, _tight: bool) {}

    fn heading_start(&mut self, level: u8, _id: &str) {
        self.block_start();
        self.push_style(|style| {
            style.bold = true;
            style.scale = TextStyle::heading_scale(level);
        });
    }

    fn heading_end(&mut self, _level: u8) {
        self.pop_style();
    }

    fn code_block(&mut self, language: Option<&str>, literal: &str) {
        self.block_start();
        self.push_style(|style| style.monospace = true);
        self.write_code(language, literal);
        self.pop_style();
        // Trailing blank lines of the literal are content
        if literal.chars().any(|c| c != '\n') {
            self.code_lines = self.pending_lines;
        }
    }

    fn list_start(&mut self, _start: Option<u64>, tight: bool) {
        self.block_start();
        self.tight.push(tight);
    }

    fn list_end(&mut self, _ordered: bool) {
        self.tight.pop();
    }

    fn item_start(&mut self, marker: ItemMarker, task: Option<bool>) {
        if !self.fresh {
            let gap = if self.tight.last() == Some(&false) {
                Gap::Blank
            } else {
                Gap::Line
            };
            self.request(gap);
        }

        let mut first = match marker {
            ItemMarker::Bullet => "- ".to_owned(),
            ItemMarker::Number(n) => format!("{n}. "),
        };
        let mut prefix = Prefix::hanging(first.clone());
        match task {
            Some(true) => first.push_str("[x] "),
            Some(false) => first.push_str("[ ] "),
            None => {}
        }
        prefix.first = first;
        self.prefixes.push(prefix);
        self.fresh = true;
    }

    fn item_end(&mut self) {
        // Empty item: the marker still gets its line
        if self.prefixes.last().is_some_and(|prefix| !prefix.used_first) {
            self.flush_lines();
            let prefix = self.take_prefix();
            self.sink.append(prefix.trim_end(), &TextStyle::default());
            self.at_line_start = false;
            self.started = true;
        }
        self.prefixes.pop();
        self.fresh = false;
    }

    fn block_quote_start(&mut self, alert: Option<AlertKind>) {
        self.block_start();
        self.prefixes.push(Prefix::uniform("> "));
        self.tight.push(false);
        if let Some(kind) = alert {
            self.push_style(|style| style.bold = true);
            self.write(kind.title());
            self.pop_style();
            self.request(Gap::Line);
            self.fresh = true;
        }
    }

    fn block_quote_end(&mut self, _alert: Option<AlertKind>) {
        self.prefixes.pop();
        self.tight.pop();
        self.fresh = false;
    }

    fn thematic_break(&mut self) {
        self.block_start();
        self.write("---");
    }

    fn table_start(&mut self, _table: &Table) -> Flow {
        self.block_start();
        Flow::Children
    }

    fn table_row_start(&mut self, header: bool) {
        self.request(Gap::Line);
        if header {
            self.push_style(|style| style.bold = true);
        }
    }

    fn table_row_end(&mut self, header: bool) {
        if header {
            self.pop_style();
        }
    }

    fn footnote_definition_start(&mut self, _label: &str, number: usize) -> Flow {
        self.block_start();
        self.prefixes.push(Prefix::hanging(format!("[{number}] ")));
        self.tight.push(false);
        self.fresh = true;
        Flow::Children
    }

    fn footnote_definition_end(&mut self, _label: &str, _number: usize) {
        self.prefixes.pop();
        self.tight.pop();
        self.fresh = false;
    }
}
