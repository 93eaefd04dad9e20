//! Markdown to [`Document`] adapter over `pulldown-cmark`.

mod builder;
mod directive;
mod doxygen;
mod fence;
mod inline;

use std::fmt::Write;

use pulldown_cmark::{BrokenLink, CowStr, Options, Parser, RefDefs};

use crate::ast::{Block, BlockDirective, DirectiveKind, Document, Inline};
use builder::TreeBuilder;
use directive::{Piece, split_directives};

/// Parser feature flags.
///
/// Flags only decide which node kinds can appear in the tree; every renderer
/// handles every kind regardless.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ParseOptions {
    /// GitHub Flavored Markdown: tables, strikethrough, task lists, alerts.
    pub gfm: bool,
    /// Footnote references and definitions.
    pub footnotes: bool,
    /// YAML (`---`) and TOML (`+++`) front matter.
    pub metadata_blocks: bool,
    /// `:::name` container and `::name` leaf directives.
    pub block_directives: bool,
    /// `:name[content]` inline directives.
    pub inline_directives: bool,
    /// `\param`, `\returns` and similar command paragraphs.
    pub doxygen_commands: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            footnotes: true,
            metadata_blocks: true,
            block_directives: false,
            inline_directives: false,
            doxygen_commands: false,
        }
    }
}

impl ParseOptions {
    /// Plain `CommonMark`: every extension disabled.
    #[must_use]
    pub fn commonmark() -> Self {
        Self {
            gfm: false,
            footnotes: false,
            metadata_blocks: false,
            block_directives: false,
            inline_directives: false,
            doxygen_commands: false,
        }
    }

    /// Every extension enabled.
    #[must_use]
    pub fn all() -> Self {
        Self {
            gfm: true,
            footnotes: true,
            metadata_blocks: true,
            block_directives: true,
            inline_directives: true,
            doxygen_commands: true,
        }
    }

    /// Parser options for `pulldown-cmark`.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        if self.gfm {
            options |= Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM;
        }
        if self.footnotes {
            options |= Options::ENABLE_FOOTNOTES;
        }
        if self.metadata_blocks {
            options |= Options::ENABLE_YAML_STYLE_METADATA_BLOCKS
                | Options::ENABLE_PLUSES_DELIMITED_METADATA_BLOCKS;
        }
        options
    }
}

impl Document {
    /// Parse markdown into a document tree.
    ///
    /// # Example
    ///
    /// ```
    /// use prism_renderer::{Block, Document, ParseOptions};
    ///
    /// let document = Document::parse("# Title\n\nBody", &ParseOptions::default());
    /// assert_eq!(document.blocks.len(), 2);
    /// assert!(matches!(document.blocks[0], Block::Heading { level: 1, .. }));
    /// ```
    #[must_use]
    pub fn parse(markdown: &str, options: &ParseOptions) -> Self {
        let mut blocks = if options.block_directives {
            // Reference definitions resolve across directive boundaries
            let document = Parser::new_ext(markdown, options.parser_options());
            parse_blocks(markdown, options, document.reference_definitions())
        } else {
            parse_markdown(markdown, options, None)
        };
        if options.inline_directives {
            inline::expand_blocks(&mut blocks, options);
        }
        if options.doxygen_commands {
            doxygen::expand_blocks(&mut blocks);
        }
        tracing::trace!(blocks = blocks.len(), "Parsed document");
        Self::new(blocks)
    }
}

const PLACEHOLDER_PREFIX: &str = "<!--prism-directive-";
const PLACEHOLDER_SUFFIX: &str = "-->";

/// Parse markdown containing block directives.
///
/// Each directive is replaced by an HTML comment placeholder, the text is
/// parsed once as a whole, and the directive nodes are spliced back in.
fn parse_blocks(markdown: &str, options: &ParseOptions, refs: &RefDefs<'_>) -> Vec<Block> {
    let mut source = String::with_capacity(markdown.len());
    let mut directives = Vec::new();

    for piece in split_directives(markdown) {
        let directive = match piece {
            Piece::Markdown(text) => {
                source.push_str(&text);
                continue;
            }
            Piece::Leaf {
                name,
                label,
                attributes,
            } => BlockDirective {
                name,
                kind: DirectiveKind::Leaf,
                label: parse_inlines(&label, options),
                attributes,
                children: Vec::new(),
            },
            Piece::Container {
                name,
                label,
                attributes,
                body,
            } => BlockDirective {
                name,
                kind: DirectiveKind::Container,
                label: parse_inlines(&label, options),
                attributes,
                children: parse_blocks(&body, options, refs),
            },
        };
        let _ = write!(
            source,
            "\n{PLACEHOLDER_PREFIX}{}{PLACEHOLDER_SUFFIX}\n\n",
            directives.len()
        );
        directives.push(Some(Block::Directive(directive)));
    }

    let mut blocks = parse_markdown(&source, options, Some(refs));
    splice_directives(&mut blocks, &mut directives);

    let unplaced: Vec<Block> = directives.into_iter().flatten().collect();
    if !unplaced.is_empty() {
        tracing::debug!(count = unplaced.len(), "Directive placeholders not found, appending");
        blocks.extend(unplaced);
    }
    blocks
}

fn placeholder_index(html: &str) -> Option<usize> {
    html.trim()
        .strip_prefix(PLACEHOLDER_PREFIX)?
        .strip_suffix(PLACEHOLDER_SUFFIX)?
        .parse()
        .ok()
}

/// Replace placeholder HTML blocks with their directives.
fn splice_directives(blocks: &mut [Block], directives: &mut [Option<Block>]) {
    for block in blocks {
        if let Block::Html(html) = block {
            let directive = placeholder_index(html)
                .and_then(|index| directives.get_mut(index))
                .and_then(Option::take);
            if let Some(directive) = directive {
                *block = directive;
            }
            continue;
        }
        match block {
            Block::List { items, .. } => {
                for item in items {
                    splice_directives(&mut item.children, directives);
                }
            }
            Block::BlockQuote { children, .. } | Block::FootnoteDefinition { children, .. } => {
                splice_directives(children, directives);
            }
            _ => {}
        }
    }
}

/// Parse plain markdown. Links whose reference is not defined in `markdown`
/// are looked up in `refs`.
fn parse_markdown(markdown: &str, options: &ParseOptions, refs: Option<&RefDefs<'_>>) -> Vec<Block> {
    let callback = |link: BrokenLink| {
        let definition = refs?.get(&link.reference)?;
        let destination: &str = &definition.dest;
        let title = definition.title.as_deref().unwrap_or_default();
        Some((
            CowStr::from(destination.to_owned()),
            CowStr::from(title.to_owned()),
        ))
    };
    TreeBuilder::new()
        .build(Parser::new_with_broken_link_callback(
            markdown,
            options.parser_options(),
            Some(callback),
        ))
        .blocks
}

/// Parse a one-line label (directive brackets) into inline content.
pub(crate) fn parse_inlines(text: &str, options: &ParseOptions) -> Vec<Inline> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let label_options = ParseOptions {
        metadata_blocks: false,
        ..options.clone()
    };
    let mut inlines = Vec::new();
    for block in parse_markdown(text, &label_options, None) {
        if let Block::Paragraph(content) | Block::Heading { content, .. } = block {
            inlines.extend(content);
        }
    }
    // Text that parses as a block construct (`1. x`, `> x`) stays literal
    if inlines.is_empty() {
        inlines.push(Inline::Text(text.to_owned()));
    }
    inlines
}

/// Language tag from a code fence info string: its first word.
pub(crate) fn fence_language(info: &str) -> Option<String> {
    info.split_whitespace().next().map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::{AlertKind, DoxygenCommand};

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_owned())
    }

    #[test]
    fn test_fence_language() {
        assert_eq!(fence_language("rust ignore"), Some("rust".to_owned()));
        assert_eq!(fence_language("  "), None);
        assert_eq!(fence_language(""), None);
    }

    #[test]
    fn test_gfm_flag_controls_tables() {
        let markdown = "| a |\n|---|\n| 1 |\n";
        let gfm = Document::parse(markdown, &ParseOptions::default());
        assert!(matches!(gfm.blocks[0], Block::Table(_)));

        let plain = Document::parse(markdown, &ParseOptions::commonmark());
        assert!(matches!(plain.blocks[0], Block::Paragraph(_)));
    }

    #[test]
    fn test_metadata_block() {
        let document = Document::parse("---\ntitle: Hi\n---\n\nBody\n", &ParseOptions::default());
        assert_eq!(document.blocks[0], Block::Metadata("title: Hi\n".to_owned()));
        assert_eq!(document.blocks[1], Block::Paragraph(vec![text("Body")]));
    }

    #[test]
    fn test_directives_disabled_by_default() {
        let document = Document::parse(":::note\nBody\n:::\n", &ParseOptions::default());
        assert!(
            document
                .blocks
                .iter()
                .all(|block| !matches!(block, Block::Directive(_)))
        );
    }

    #[test]
    fn test_container_directive() {
        let document = Document::parse(
            "Intro\n\n:::warning[Be careful]{#w}\nBody *em*\n\n- item\n:::\n",
            &ParseOptions::all(),
        );
        assert_eq!(document.blocks.len(), 2);
        let Block::Directive(directive) = &document.blocks[1] else {
            panic!("expected directive");
        };
        assert_eq!(directive.name, "warning");
        assert_eq!(directive.kind, DirectiveKind::Container);
        assert_eq!(directive.label, vec![text("Be careful")]);
        assert_eq!(directive.attributes.id.as_deref(), Some("w"));
        assert_eq!(directive.children.len(), 2);
        assert!(matches!(directive.children[1], Block::List { .. }));
    }

    #[test]
    fn test_nested_container_directives() {
        let document = Document::parse("::::tabs\n:::tab[One]\nA\n:::\n::::\n", &ParseOptions::all());
        let Block::Directive(outer) = &document.blocks[0] else {
            panic!("expected directive");
        };
        let Block::Directive(inner) = &outer.children[0] else {
            panic!("expected nested directive");
        };
        assert_eq!(inner.name, "tab");
        assert_eq!(inner.children, vec![Block::Paragraph(vec![text("A")])]);
    }

    #[test]
    fn test_indented_directive_syntax_is_content() {
        let document = Document::parse(
            "Example:\n\n    :::note\n    inside code\n    :::\n",
            &ParseOptions::all(),
        );
        assert_eq!(
            document.blocks,
            vec![
                Block::Paragraph(vec![text("Example:")]),
                Block::CodeBlock {
                    language: None,
                    literal: ":::note\ninside code\n:::".to_owned(),
                },
            ]
        );

        let document = Document::parse("- item\n\n  :::note\n  body\n  :::\n", &ParseOptions::all());
        assert_eq!(document.blocks.len(), 1);
        let Block::List { items, .. } = &document.blocks[0] else {
            panic!("expected list");
        };
        assert_eq!(items[0].children.len(), 2);
    }

    #[test]
    fn test_references_resolve_across_directives() {
        let link = |blocks: &[Block]| match blocks.first() {
            Some(Block::Paragraph(inlines)) => inlines.iter().find_map(|inline| match inline {
                Inline::Link { destination, .. } => Some(destination.clone()),
                _ => None,
            }),
            _ => None,
        };

        let markdown = "See [docs][d].\n\n:::note\nBody\n:::\n\n[d]: https://example.com\n";
        for options in [ParseOptions::default(), ParseOptions::all()] {
            let document = Document::parse(markdown, &options);
            assert_eq!(link(&document.blocks).as_deref(), Some("https://example.com"));
        }

        let document = Document::parse(
            ":::note\nSee [docs][d].\n:::\n\n[d]: https://example.com\n",
            &ParseOptions::all(),
        );
        let Block::Directive(directive) = &document.blocks[0] else {
            panic!("expected directive");
        };
        assert_eq!(link(&directive.children).as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_footnote_definition_after_directive() {
        let document = Document::parse(
            "Text[^n]\n\n:::note\nBody\n:::\n\n[^n]: Note\n",
            &ParseOptions::all(),
        );
        let Block::Paragraph(inlines) = &document.blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(inlines[1], Inline::FootnoteReference("n".to_owned()));
        assert!(matches!(document.blocks[1], Block::Directive(_)));
        assert!(matches!(document.blocks[2], Block::FootnoteDefinition { .. }));
    }

    #[test]
    fn test_leaf_directive() {
        let document = Document::parse("::youtube[Video]{id=abc}\n", &ParseOptions::all());
        assert_eq!(
            document.blocks,
            vec![Block::Directive(BlockDirective {
                name: "youtube".to_owned(),
                kind: DirectiveKind::Leaf,
                label: vec![text("Video")],
                attributes: crate::parse::directive::parse_attributes("id=abc"),
                children: Vec::new(),
            })]
        );
    }

    #[test]
    fn test_inline_directive_in_parsed_text() {
        let document = Document::parse("Press :kbd[Enter] to go.", &ParseOptions::all());
        let Block::Paragraph(inlines) = &document.blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(inlines.len(), 3);
        assert!(matches!(&inlines[1], Inline::Directive(d) if d.name == "kbd"));
    }

    #[test]
    fn test_doxygen_commands() {
        let document = Document::parse(
            "Sum.\n\\param a First\n\\returns Total\n",
            &ParseOptions::all(),
        );
        assert_eq!(
            document.blocks,
            vec![
                Block::Paragraph(vec![text("Sum.")]),
                Block::Command(DoxygenCommand {
                    name: "param".to_owned(),
                    argument: Some("a".to_owned()),
                    content: vec![text("First")],
                }),
                Block::Command(DoxygenCommand {
                    name: "returns".to_owned(),
                    argument: None,
                    content: vec![text("Total")],
                }),
            ]
        );
    }

    #[test]
    fn test_alerts_need_gfm() {
        let markdown = "> [!TIP]\n> Hi\n";
        let gfm = Document::parse(markdown, &ParseOptions::default());
        assert!(matches!(
            gfm.blocks[0],
            Block::BlockQuote {
                alert: Some(AlertKind::Tip),
                ..
            }
        ));
        let plain = Document::parse(markdown, &ParseOptions::commonmark());
        assert!(matches!(plain.blocks[0], Block::BlockQuote { alert: None, .. }));
    }

    #[test]
    fn test_label_that_looks_like_block() {
        assert_eq!(
            parse_inlines("1. first", &ParseOptions::default()),
            vec![text("1. first")]
        );
        assert!(parse_inlines("", &ParseOptions::default()).is_empty());
    }
}
