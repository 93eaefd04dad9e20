//! Plain-text renderer.

use crate::ast::Document;
use crate::context::RenderContext;
use crate::layout::TextBackend;
use crate::renderer::Renderer;
use crate::walk::walk_document;

/// Renders a document as unstyled text.
///
/// Markup is dropped, list markers and quote prefixes are kept, footnote
/// references become `[N]`. Output has no trailing newline.
///
/// # Example
///
/// ```
/// use prism_renderer::{Document, ParseOptions, PlainTextRenderer, Renderer};
///
/// let document = Document::parse("- a\n  - b", &ParseOptions::default());
/// assert_eq!(PlainTextRenderer.render(&document), "- a\n  - b");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainTextRenderer;

impl Renderer for PlainTextRenderer {
    type Output = String;

    fn render_with_context(&self, document: &Document, context: &mut RenderContext) -> String {
        tracing::debug!(blocks = document.blocks.len(), "Rendering plain text");
        let mut backend = TextBackend::new(String::new());
        walk_document(document, &mut backend, context);
        backend.finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ParseOptions;

    fn render(markdown: &str) -> String {
        PlainTextRenderer.render(&Document::parse(markdown, &ParseOptions::default()))
    }

    #[test]
    fn test_inline_markup_dropped() {
        assert_eq!(render("**bold** and *em*"), "bold and em");
        assert_eq!(render("a `b` [c](https://d.e) ~~f~~"), "a b c f");
    }

    #[test]
    fn test_headings_and_paragraphs() {
        assert_eq!(render("# Title\n\nBody text.\n\n## Next"), "Title\n\nBody text.\n\nNext");
    }

    #[test]
    fn test_soft_and_hard_breaks() {
        assert_eq!(render("one\ntwo"), "one two");
        assert_eq!(render("one  \ntwo"), "one\ntwo");
    }

    #[test]
    fn test_nested_list() {
        assert_eq!(render("- a\n  - b"), "- a\n  - b");
        assert_eq!(render("1. a\n2. b"), "1. a\n2. b");
    }

    #[test]
    fn test_loose_list() {
        assert_eq!(render("- a\n\n- b"), "- a\n\n- b");
    }

    #[test]
    fn test_task_list() {
        assert_eq!(render("- [x] done\n- [ ] open"), "- [x] done\n- [ ] open");
    }

    #[test]
    fn test_block_quote() {
        assert_eq!(render("> q\n>\n> r"), "> q\n>\n> r");
    }

    #[test]
    fn test_alert() {
        assert_eq!(render("> [!NOTE]\n> Hi"), "> Note\n> Hi");
    }

    #[test]
    fn test_code_block() {
        assert_eq!(render("Before\n\n```rust\nfn main() {}\n```"), "Before\n\nfn main() {}");
    }

    #[test]
    fn test_code_block_blank_lines_verbatim() {
        assert_eq!(render("```\nx\n\n\n```\n\nafter"), "x\n\n\n\nafter");
        assert_eq!(render("```\na\n\nb\n```"), "a\n\nb");
    }

    #[test]
    fn test_empty_list_item() {
        assert_eq!(render("1. a\n2.\n3. c\n"), "1. a\n2.\n3. c");
        assert_eq!(render("- a\n-\n- c"), "- a\n-\n- c");
    }

    #[test]
    fn test_indented_directive_syntax_stays_literal() {
        let document = Document::parse(
            "Example:\n\n    :::note\n    inside code\n    :::\n",
            &ParseOptions::all(),
        );
        assert_eq!(
            PlainTextRenderer.render(&document),
            "Example:\n\n:::note\ninside code\n:::"
        );
    }

    #[test]
    fn test_footnote() {
        assert_eq!(render("A[^n]\n\n[^n]: Note"), "A[1]\n\n[1] Note");
    }

    #[test]
    fn test_table() {
        assert_eq!(render("| a | b |\n|---|---|\n| 1 | 2 |"), "a\tb\n1\t2");
    }

    #[test]
    fn test_thematic_break_and_image() {
        assert_eq!(render("a\n\n---\n\n![alt *text*](x.png)"), "a\n\n---\n\nalt text");
    }

    #[test]
    fn test_html_dropped() {
        assert_eq!(render("<div>raw</div>\n\nafter"), "after");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(render(""), "");
    }

    #[test]
    fn test_footnote_numbers_continue_in_shared_context() {
        let options = ParseOptions::default();
        let mut context = RenderContext::new();
        let first = Document::parse("x[^a]\n\n[^a]: A", &options);
        let second = Document::parse("y[^b]\n\n[^b]: B", &options);

        PlainTextRenderer.render_with_context(&first, &mut context);
        let out = PlainTextRenderer.render_with_context(&second, &mut context);
        assert_eq!(out, "y[2]\n\n[2] B");
    }

    static_assertions::assert_impl_all!(PlainTextRenderer: Send, Sync);
}
