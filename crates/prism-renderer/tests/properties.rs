//! Cross-renderer properties checked over a shared corpus of documents.

use pretty_assertions::assert_eq;
use prism_highlight::{CachingHighlighter, Highlighter, LexicalHighlighter, segments};
use prism_renderer::{
    ColorMode, Document, HtmlRenderer, ParseOptions, PlainTextRenderer, RenderContext, Renderer,
    StyledTextRenderer, SyntaxTheme, TokenCategory,
};

const CORPUS: &[&str] = &[
    "",
    "plain paragraph",
    "**bold** and *em*",
    "# Title\n\nIntro with `code` and a [link](https://example.com).\n\n## Section\n\nMore.",
    "- a\n- b\n  1. c\n  2. d\n\n> quoted\n>\n> twice",
    "> [!WARNING]\n> Careful <here> & there",
    "| a | b |\n|:--|--:|\n| 1 | 2 |",
    "Text[^n]\n\n[^n]: A note.",
    "```rust\nfn main() {\n    println!(\"hi\"); // greet\n}\n```",
    "```unknownlang\nx=1\n```",
    "line one\nline two  \nline three\n\n---\n\n![alt](img.png)",
    "- [x] done\n- [ ] todo",
    "```\nx\n\n\n```\n\nafter",
    "1. a\n2.\n3. c",
    "Intro\n\n    :::note\n    indented\n    :::",
    ":::note\nSee [docs].\n:::\n\n[docs]: https://example.com",
];

fn documents() -> impl Iterator<Item = Document> {
    let options = ParseOptions::all();
    CORPUS.iter().map(move |source| Document::parse(source, &options))
}

#[test]
fn test_rendering_is_deterministic() {
    let html = HtmlRenderer::new().with_highlighter(LexicalHighlighter::new());
    let styled = StyledTextRenderer::default().with_highlighter(LexicalHighlighter::new());

    for document in documents() {
        assert_eq!(html.render(&document), html.render(&document));
        assert_eq!(PlainTextRenderer.render(&document), PlainTextRenderer.render(&document));
        assert_eq!(styled.render(&document), styled.render(&document));
    }
}

#[test]
fn test_plain_and_styled_text_agree() {
    let styled = StyledTextRenderer::default().with_highlighter(LexicalHighlighter::new());
    for document in documents() {
        assert_eq!(
            styled.render(&document).plain_text(),
            PlainTextRenderer.render(&document)
        );
    }
}

#[test]
fn test_text_content_survives_every_format() {
    let document = Document::parse("**bold** and *em*", &ParseOptions::default());

    assert_eq!(
        HtmlRenderer::new().render(&document),
        "<p><strong>bold</strong> and <em>em</em></p>"
    );
    assert_eq!(PlainTextRenderer.render(&document), "bold and em");

    let styled = StyledTextRenderer::default().render(&document);
    assert_eq!(styled.plain_text(), "bold and em");
    assert!(styled.runs()[0].style.bold);
    assert!(styled.runs().iter().any(|run| run.text == "em" && run.style.italic));
}

#[test]
fn test_reference_links_cross_directive_boundaries() {
    let document = Document::parse(
        "[docs]\n\n:::note\nSee [docs].\n:::\n\n[docs]: https://example.com",
        &ParseOptions::all(),
    );
    let html = HtmlRenderer::new().render(&document);
    assert_eq!(html.matches(r#"<a href="https://example.com">docs</a>"#).count(), 2);
    assert_eq!(PlainTextRenderer.render(&document), "docs\n\nSee docs.");
}

#[test]
fn test_html_escapes_text() {
    let document = Document::parse("a < b & \"c\"", &ParseOptions::default());
    assert_eq!(
        HtmlRenderer::new().render(&document),
        "<p>a &lt; b &amp; &quot;c&quot;</p>"
    );
}

fn unescape(html: &str) -> String {
    html.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

#[test]
fn test_escaping_round_trips() {
    for text in ["a < b", "&amp; already", "\"quoted\" 'single'", "<>&\"'", "plain"] {
        let escaped = prism_renderer::escape_html(text);
        assert!(!escaped.contains('<') && !escaped.contains('"'), "{escaped}");
        assert_eq!(unescape(&escaped), text);
    }
}

#[test]
fn test_html_class_and_styled_color_share_category() {
    let theme = SyntaxTheme::default();
    let document = Document::parse("```rust
fn\n```", &ParseOptions::default());

    let html = HtmlRenderer::new()
        .with_highlighter(LexicalHighlighter::new())
        .render(&document);
    assert!(html.contains(r#"<span class="token-keyword">fn</span>"#), "{html}");

    let css = theme.generate_css();
    assert!(css.contains(&format!(
        "{}: {};",
        TokenCategory::Keyword.css_variable(),
        theme.resolve(ColorMode::Light, TokenCategory::Keyword)
    )));

    let styled = StyledTextRenderer::new(theme)
        .with_highlighter(LexicalHighlighter::new())
        .render(&document);
    assert_eq!(
        styled.runs()[0].style.foreground,
        Some(theme.resolve(ColorMode::Light, TokenCategory::Keyword))
    );
}

#[test]
fn test_unknown_language_renders_plain_code() {
    let document = Document::parse("```unknownlang\nx=1\n```", &ParseOptions::default());
    let html = HtmlRenderer::new()
        .with_highlighter(LexicalHighlighter::new())
        .render(&document);
    assert_eq!(html, r#"<pre><code class="language-unknownlang">x=1</code></pre>"#);
    assert!(!html.contains("token-"));
}

#[test]
fn test_highlighting_preserves_code_text() {
    let highlighter = LexicalHighlighter::new();
    let samples = [
        ("rust", "fn main() {\n    let s = \"é\"; // ünïcode\n}"),
        ("python", "def f(x):\n    return x + 1  # add"),
        ("json", "{\"a\": [1, 2.5, true, null]}"),
        ("shell", "echo \"$HOME\" | grep -v x"),
        ("unknownlang", "x=1"),
    ];

    for (language, code) in samples {
        let tokens = highlighter.tokenize(code, Some(language));
        let rebuilt: String = segments(code, &tokens).map(|segment| segment.text).collect();
        assert_eq!(rebuilt, code, "language {language}");
        assert_eq!(tokens, highlighter.tokenize(code, Some(language)));
    }
    assert!(highlighter.tokenize("x=1", Some("unknownlang")).is_empty());
}

#[test]
fn test_caching_highlighter_matches_inner() {
    let cached = CachingHighlighter::new(LexicalHighlighter::new());
    let code = "let x = 1;";
    let first = cached.tokenize(code, Some("rust"));
    assert_eq!(first, LexicalHighlighter::new().tokenize(code, Some("rust")));
    assert_eq!(cached.tokenize(code, Some("rust")), first);
}

#[test]
fn test_css_covers_every_category() {
    let css = SyntaxTheme::default().generate_css();
    for category in TokenCategory::ALL {
        assert!(css.contains(&format!(".{}", category.css_class())), "{category:?}");
        assert!(css.contains(category.css_variable()), "{category:?}");
    }
}

#[test]
fn test_styled_code_colors_come_from_active_mode() {
    let theme = SyntaxTheme::default();
    let document = Document::parse("```rust\nlet\n```", &ParseOptions::default());
    let renderer = StyledTextRenderer::new(theme).with_highlighter(LexicalHighlighter::new());

    for mode in [ColorMode::Light, ColorMode::Dark] {
        let mut context = RenderContext::with_mode(mode);
        let styled = renderer.render_with_context(&document, &mut context);
        assert_eq!(
            styled.runs()[0].style.foreground,
            Some(theme.resolve(mode, TokenCategory::Keyword))
        );
    }
}

#[test]
fn test_page_title_and_toc() {
    let document = Document::parse("# Guide\n\n## Install\n\n## Use", &ParseOptions::default());
    let page = HtmlRenderer::new().render_page(&document);

    assert_eq!(page.title.as_deref(), Some("Guide"));
    let ids: Vec<_> = page.toc.iter().map(|entry| entry.id.as_str()).collect();
    assert_eq!(ids, ["install", "use"]);
}

static_assertions::assert_impl_all!(Document: Send, Sync);
static_assertions::assert_impl_all!(SyntaxTheme: Send, Sync);
static_assertions::assert_impl_all!(HtmlRenderer: Send, Sync);
static_assertions::assert_impl_all!(PlainTextRenderer: Send, Sync);
static_assertions::assert_impl_all!(StyledTextRenderer: Send, Sync);
