//! Per-render mutable state.

use std::collections::HashMap;

use prism_theme::ColorMode;

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor ID for linking.
    pub id: String,
}

/// Open container on the walk path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Container {
    List { tight: bool, ordered: bool },
    Item { tight: bool },
    BlockQuote,
    FootnoteDefinition,
    Directive,
}

/// State threaded through a single render pass.
///
/// Holds the container stack (list depth and tightness), footnote numbers in
/// first-use order, heading anchor de-duplication, the table of contents and
/// the active [`ColorMode`]. A context belongs to one render call; reusing it
/// for another document continues numbering where the previous one stopped.
#[derive(Clone, Debug, Default)]
pub struct RenderContext {
    mode: ColorMode,
    containers: Vec<Container>,
    footnotes: Vec<String>,
    id_counts: HashMap<String, usize>,
    toc: Vec<TocEntry>,
    title: Option<String>,
}

impl RenderContext {
    /// Fresh context in light mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh context with the given color mode.
    #[must_use]
    pub fn with_mode(mode: ColorMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Active color mode.
    #[must_use]
    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    pub(crate) fn push(&mut self, container: Container) {
        self.containers.push(container);
    }

    pub(crate) fn pop(&mut self) {
        self.containers.pop();
    }

    /// Open containers, outermost first.
    #[must_use]
    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    /// Number of lists enclosing the current node.
    #[must_use]
    pub fn list_depth(&self) -> usize {
        self.containers
            .iter()
            .filter(|container| matches!(container, Container::List { .. }))
            .count()
    }

    /// Whether the current node sits directly in a tight list item.
    #[must_use]
    pub fn in_tight_item(&self) -> bool {
        matches!(self.containers.last(), Some(Container::Item { tight: true }))
    }

    /// Tightness of the innermost list, if any.
    #[must_use]
    pub fn current_list_tight(&self) -> Option<bool> {
        self.containers.iter().rev().find_map(|container| match container {
            Container::List { tight, .. } => Some(*tight),
            _ => None,
        })
    }

    /// Number for footnote `label`, allocated on first use starting at 1.
    pub fn footnote_number(&mut self, label: &str) -> usize {
        if let Some(index) = self.footnotes.iter().position(|known| known == label) {
            return index + 1;
        }
        self.footnotes.push(label.to_owned());
        self.footnotes.len()
    }

    /// Register a heading and return its unique anchor id.
    ///
    /// The first level-1 heading becomes the document title and is left out
    /// of the table of contents.
    pub fn register_heading(&mut self, level: u8, text: &str) -> String {
        let id = self.generate_id(text);
        let title = text.trim();

        if level == 1 && self.title.is_none() {
            self.title = Some(title.to_owned());
        } else {
            self.toc.push(TocEntry {
                level,
                title: title.to_owned(),
                id: id.clone(),
            });
        }
        id
    }

    fn generate_id(&mut self, text: &str) -> String {
        let mut base_id = slugify(text);
        if base_id.is_empty() {
            base_id.push_str("section");
        }
        let count = self.id_counts.entry(base_id.clone()).or_default();
        let id = match *count {
            0 => base_id,
            n => format!("{base_id}-{n}"),
        };
        *count += 1;
        id
    }

    /// Table of contents collected so far.
    #[must_use]
    pub fn toc(&self) -> &[TocEntry] {
        &self.toc
    }

    /// Take the table of contents entries.
    pub fn take_toc(&mut self) -> Vec<TocEntry> {
        std::mem::take(&mut self.toc)
    }

    /// Text of the first level-1 heading.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Take the extracted title.
    pub fn take_title(&mut self) -> Option<String> {
        self.title.take()
    }
}

/// Convert text to URL-safe slug.
///
/// Converts to lowercase, replaces whitespace/dashes/underscores with single dashes,
/// and removes other non-alphanumeric characters.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true; // Prevents leading dash

    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("What's New?"), "whats-new");
        assert_eq!(slugify("  Spaces  "), "spaces");
        assert_eq!(slugify("Multiple   Spaces"), "multiple-spaces");
        assert_eq!(slugify("snake_case"), "snake-case");
        assert_eq!(slugify("日本語"), "");
    }

    #[test]
    fn test_heading_ids_are_unique() {
        let mut ctx = RenderContext::new();
        assert_eq!(ctx.register_heading(2, "Setup"), "setup");
        assert_eq!(ctx.register_heading(2, "Setup"), "setup-1");
        assert_eq!(ctx.register_heading(3, "Setup"), "setup-2");
        assert_eq!(ctx.register_heading(2, "?!"), "section");
        assert_eq!(ctx.register_heading(2, "…"), "section-1");
    }

    #[test]
    fn test_first_h1_is_title() {
        let mut ctx = RenderContext::new();
        ctx.register_heading(1, " Guide ");
        ctx.register_heading(2, "Install");
        ctx.register_heading(1, "Appendix");

        assert_eq!(ctx.title(), Some("Guide"));
        assert_eq!(
            ctx.take_toc(),
            vec![
                TocEntry {
                    level: 2,
                    title: "Install".to_owned(),
                    id: "install".to_owned(),
                },
                TocEntry {
                    level: 1,
                    title: "Appendix".to_owned(),
                    id: "appendix".to_owned(),
                },
            ]
        );
        assert!(ctx.toc().is_empty());
    }

    #[test]
    fn test_footnotes_numbered_by_first_use() {
        let mut ctx = RenderContext::new();
        assert_eq!(ctx.footnote_number("b"), 1);
        assert_eq!(ctx.footnote_number("a"), 2);
        assert_eq!(ctx.footnote_number("b"), 1);
    }

    #[test]
    fn test_container_queries() {
        let mut ctx = RenderContext::with_mode(ColorMode::Dark);
        assert_eq!(ctx.mode(), ColorMode::Dark);
        assert_eq!(ctx.list_depth(), 0);
        assert_eq!(ctx.current_list_tight(), None);

        ctx.push(Container::List {
            tight: true,
            ordered: false,
        });
        ctx.push(Container::Item { tight: true });
        assert!(ctx.in_tight_item());
        ctx.push(Container::BlockQuote);
        assert!(!ctx.in_tight_item());
        ctx.push(Container::List {
            tight: false,
            ordered: true,
        });
        assert_eq!(ctx.list_depth(), 2);
        assert_eq!(ctx.current_list_tight(), Some(false));

        ctx.pop();
        ctx.pop();
        assert_eq!(ctx.current_list_tight(), Some(true));
        assert_eq!(ctx.containers().len(), 2);
    }
}
