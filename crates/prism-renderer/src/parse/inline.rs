//! Inline directive expansion (`:name[content]{attrs}`) over parsed text runs.

use crate::ast::{Block, Inline, InlineDirective};
use crate::parse::directive::find_inline;
use crate::parse::{ParseOptions, parse_inlines};

/// Replace inline directive syntax in text runs throughout `blocks`.
///
/// Code spans, code blocks and raw HTML are never touched.
pub(crate) fn expand_blocks(blocks: &mut [Block], options: &ParseOptions) {
    for block in blocks {
        match block {
            Block::Paragraph(content) | Block::Heading { content, .. } => {
                expand_inlines(content, options);
            }
            Block::List { items, .. } => {
                for item in items {
                    expand_blocks(&mut item.children, options);
                }
            }
            Block::BlockQuote { children, .. } | Block::FootnoteDefinition { children, .. } => {
                expand_blocks(children, options);
            }
            Block::Table(table) => {
                for cell in table.header.iter_mut().chain(table.rows.iter_mut().flatten()) {
                    expand_inlines(cell, options);
                }
            }
            Block::Directive(directive) => {
                expand_inlines(&mut directive.label, options);
                expand_blocks(&mut directive.children, options);
            }
            Block::Command(command) => expand_inlines(&mut command.content, options),
            Block::CodeBlock { .. } | Block::ThematicBreak | Block::Html(_) | Block::Metadata(_) => {}
        }
    }
}

fn expand_inlines(inlines: &mut Vec<Inline>, options: &ParseOptions) {
    for inline in inlines.iter_mut() {
        match inline {
            Inline::Emphasis(children)
            | Inline::Strong(children)
            | Inline::Strikethrough(children)
            | Inline::Superscript(children)
            | Inline::Subscript(children)
            | Inline::Link { children, .. } => expand_inlines(children, options),
            _ => {}
        }
    }

    let has_directive = inlines
        .iter()
        .any(|inline| matches!(inline, Inline::Text(text) if find_inline(text).is_some()));
    if !has_directive {
        return;
    }

    let mut expanded = Vec::with_capacity(inlines.len() + 2);
    for inline in inlines.drain(..) {
        match inline {
            Inline::Text(text) => split_text(&text, options, &mut expanded),
            other => expanded.push(other),
        }
    }
    *inlines = expanded;
}

fn split_text(text: &str, options: &ParseOptions, out: &mut Vec<Inline>) {
    let mut rest = text;
    while let Some(found) = find_inline(rest) {
        if found.start > 0 {
            out.push(Inline::Text(rest[..found.start].to_owned()));
        }

        let mut content = parse_inlines(found.head.label.unwrap_or_default(), options);
        expand_inlines(&mut content, options);
        out.push(Inline::Directive(InlineDirective {
            name: found.head.name.to_owned(),
            content,
            attributes: found.head.attributes,
        }));

        rest = &rest[found.end..];
    }
    if !rest.is_empty() {
        out.push(Inline::Text(rest.to_owned()));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::DirectiveAttributes;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_owned())
    }

    fn expand(inlines: Vec<Inline>) -> Vec<Inline> {
        let mut blocks = vec![Block::Paragraph(inlines)];
        expand_blocks(&mut blocks, &ParseOptions::default());
        let Some(Block::Paragraph(inlines)) = blocks.pop() else {
            panic!("expected paragraph");
        };
        inlines
    }

    #[test]
    fn test_splits_text_around_directive() {
        let expanded = expand(vec![text("Press :kbd[Ctrl+C] now")]);
        assert_eq!(
            expanded,
            vec![
                text("Press "),
                Inline::Directive(InlineDirective {
                    name: "kbd".to_owned(),
                    content: vec![text("Ctrl+C")],
                    attributes: DirectiveAttributes::default(),
                }),
                text(" now"),
            ]
        );
    }

    #[test]
    fn test_content_is_markdown() {
        let expanded = expand(vec![text(":abbr[**HTML**]{title=\"Hypertext\"}")]);
        let [Inline::Directive(directive)] = expanded.as_slice() else {
            panic!("expected single directive, got {expanded:?}");
        };
        assert_eq!(directive.content, vec![Inline::Strong(vec![text("HTML")])]);
        assert_eq!(directive.attributes.get("title"), Some("Hypertext"));
    }

    #[test]
    fn test_multiple_and_nested_in_emphasis() {
        let expanded = expand(vec![Inline::Emphasis(vec![text(":a[1] and :b[2]")])]);
        let [Inline::Emphasis(children)] = expanded.as_slice() else {
            panic!("expected emphasis");
        };
        assert_eq!(children.len(), 3);
        assert!(matches!(&children[0], Inline::Directive(d) if d.name == "a"));
        assert_eq!(children[1], text(" and "));
        assert!(matches!(&children[2], Inline::Directive(d) if d.name == "b"));
    }

    #[test]
    fn test_code_is_untouched() {
        let inlines = vec![Inline::Code(":kbd[x]".to_owned()), text("Note: plain")];
        assert_eq!(expand(inlines.clone()), inlines);
    }
}
