//! Depth-first traversal dispatching each node kind to a [`RenderBackend`].
//!
//! The walk emits in document order and keeps the [`RenderContext`] container
//! stack current. Backends only implement the hooks for the core node kinds;
//! extension kinds (tables, footnotes, directives, commands, raw HTML,
//! metadata) have defaults that degrade to plain content or nothing, so a
//! backend never fails on a node it does not know about.

use crate::ast::{
    AlertKind, Alignment, Block, BlockDirective, DirectiveKind, Document, DoxygenCommand, Inline,
    InlineDirective, ListItem, Table, plain_text,
};
use crate::context::{Container, RenderContext};

/// What the walk does after a start hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Walk the node's content, then call the matching end hook.
    Children,
    /// Skip the content and the end hook.
    Skip,
}

/// Marker of a list item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemMarker {
    Bullet,
    /// Ordinal of the item in an ordered list.
    Number(u64),
}

/// Format-specific emission hooks.
///
/// Each renderer owns a backend that writes into its output buffer; the walk
/// calls hooks in document order.
pub trait RenderBackend {
    /// Literal text (not yet escaped).
    fn text(&mut self, text: &str);

    /// Inline code span.
    fn code(&mut self, code: &str);

    fn soft_break(&mut self);

    fn line_break(&mut self);

    fn emphasis_start(&mut self);

    fn emphasis_end(&mut self);

    fn strong_start(&mut self);

    fn strong_end(&mut self);

    fn strikethrough_start(&mut self) {}

    fn strikethrough_end(&mut self) {}

    fn superscript_start(&mut self) {}

    fn superscript_end(&mut self) {}

    fn subscript_start(&mut self) {}

    fn subscript_end(&mut self) {}

    /// Start of a link; `title` is empty when absent.
    fn link_start(&mut self, destination: &str, title: &str);

    fn link_end(&mut self);

    /// Image with its alt text flattened to plain text.
    fn image(&mut self, source: &str, title: &str, alt: &str);

    /// Raw inline HTML. Dropped by default.
    fn inline_html(&mut self, _html: &str) {}

    /// Footnote reference with its number in first-use order.
    ///
    /// Default renders `[N]`.
    fn footnote_reference(&mut self, _label: &str, number: usize) {
        self.text(&format!("[{number}]"));
    }

    /// Inline directive. Default skips `comment` and renders the content of
    /// everything else.
    fn inline_directive_start(&mut self, directive: &InlineDirective) -> Flow {
        default_directive_flow(&directive.name)
    }

    fn inline_directive_end(&mut self, _directive: &InlineDirective) {}

    /// Paragraph start; `tight` is set directly inside a tight list item.
    fn paragraph_start(&mut self, tight: bool);

    fn paragraph_end(&mut self, tight: bool);

    /// Heading start with its de-duplicated anchor id.
    fn heading_start(&mut self, level: u8, id: &str);

    fn heading_end(&mut self, level: u8);

    /// Fenced or indented code block.
    fn code_block(&mut self, language: Option<&str>, literal: &str);

    /// List start; `start` is `Some` for ordered lists.
    fn list_start(&mut self, start: Option<u64>, tight: bool);

    fn list_end(&mut self, ordered: bool);

    /// List item start; `task` carries the task list state.
    fn item_start(&mut self, marker: ItemMarker, task: Option<bool>);

    fn item_end(&mut self);

    fn block_quote_start(&mut self, alert: Option<AlertKind>);

    fn block_quote_end(&mut self, alert: Option<AlertKind>);

    fn thematic_break(&mut self);

    /// Raw HTML block. Dropped by default.
    fn html_block(&mut self, _html: &str) {}

    /// Front matter. Dropped by default.
    fn metadata(&mut self, _raw: &str) {}

    /// Table start. By default rows render as paragraphs with tab-separated cells.
    fn table_start(&mut self, _table: &Table) -> Flow {
        Flow::Children
    }

    fn table_end(&mut self, _table: &Table) {}

    fn table_row_start(&mut self, _header: bool) {
        self.paragraph_start(false);
    }

    fn table_row_end(&mut self, _header: bool) {
        self.paragraph_end(false);
    }

    fn table_cell_start(&mut self, _header: bool, index: usize, _alignment: Alignment) {
        if index > 0 {
            self.text("\t");
        }
    }

    fn table_cell_end(&mut self, _header: bool) {}

    /// Footnote definition, rendered where it appears.
    fn footnote_definition_start(&mut self, _label: &str, _number: usize) -> Flow {
        Flow::Children
    }

    fn footnote_definition_end(&mut self, _label: &str, _number: usize) {}

    /// Block directive. Default skips `comment` and renders the children of
    /// everything else (a leaf directive's label as a paragraph).
    fn directive_start(&mut self, directive: &BlockDirective) -> Flow {
        default_directive_flow(&directive.name)
    }

    fn directive_end(&mut self, _directive: &BlockDirective) {}

    /// Doxygen command. Its content renders as a paragraph, led by the
    /// argument as inline code.
    fn command_start(&mut self, _command: &DoxygenCommand) -> Flow {
        Flow::Children
    }

    fn command_end(&mut self, _command: &DoxygenCommand) {}
}

fn default_directive_flow(name: &str) -> Flow {
    if name.eq_ignore_ascii_case("comment") {
        Flow::Skip
    } else {
        Flow::Children
    }
}

/// Walk a whole document.
pub fn walk_document<B: RenderBackend + ?Sized>(
    document: &Document,
    backend: &mut B,
    ctx: &mut RenderContext,
) {
    walk_blocks(&document.blocks, backend, ctx);
}

/// Walk a sequence of blocks in order.
pub fn walk_blocks<B: RenderBackend + ?Sized>(
    blocks: &[Block],
    backend: &mut B,
    ctx: &mut RenderContext,
) {
    for block in blocks {
        walk_block(block, backend, ctx);
    }
}

/// Walk one block.
pub fn walk_block<B: RenderBackend + ?Sized>(
    block: &Block,
    backend: &mut B,
    ctx: &mut RenderContext,
) {
    match block {
        Block::Paragraph(inlines) => walk_paragraph(inlines, backend, ctx),
        Block::Heading { level, content } => {
            let id = ctx.register_heading(*level, &plain_text(content));
            backend.heading_start(*level, &id);
            walk_inlines(content, backend, ctx);
            backend.heading_end(*level);
        }
        Block::CodeBlock { language, literal } => backend.code_block(language.as_deref(), literal),
        Block::List {
            start,
            tight,
            items,
        } => walk_list(*start, *tight, items, backend, ctx),
        Block::BlockQuote { alert, children } => {
            backend.block_quote_start(*alert);
            ctx.push(Container::BlockQuote);
            walk_blocks(children, backend, ctx);
            ctx.pop();
            backend.block_quote_end(*alert);
        }
        Block::ThematicBreak => backend.thematic_break(),
        Block::Html(html) => backend.html_block(html),
        Block::Table(table) => walk_table(table, backend, ctx),
        Block::FootnoteDefinition { label, children } => {
            let number = ctx.footnote_number(label);
            if backend.footnote_definition_start(label, number) == Flow::Children {
                ctx.push(Container::FootnoteDefinition);
                walk_blocks(children, backend, ctx);
                ctx.pop();
                backend.footnote_definition_end(label, number);
            }
        }
        Block::Metadata(raw) => backend.metadata(raw),
        Block::Directive(directive) => {
            if backend.directive_start(directive) == Flow::Children {
                ctx.push(Container::Directive);
                if directive.kind == DirectiveKind::Leaf && !directive.label.is_empty() {
                    walk_paragraph(&directive.label, backend, ctx);
                }
                walk_blocks(&directive.children, backend, ctx);
                ctx.pop();
                backend.directive_end(directive);
            }
        }
        Block::Command(command) => {
            if backend.command_start(command) == Flow::Children {
                let tight = ctx.in_tight_item();
                backend.paragraph_start(tight);
                if let Some(argument) = &command.argument {
                    backend.code(argument);
                    if !command.content.is_empty() {
                        backend.text(" ");
                    }
                }
                walk_inlines(&command.content, backend, ctx);
                backend.paragraph_end(tight);
                backend.command_end(command);
            }
        }
    }
}

fn walk_paragraph<B: RenderBackend + ?Sized>(
    inlines: &[Inline],
    backend: &mut B,
    ctx: &mut RenderContext,
) {
    let tight = ctx.in_tight_item();
    backend.paragraph_start(tight);
    walk_inlines(inlines, backend, ctx);
    backend.paragraph_end(tight);
}

fn walk_list<B: RenderBackend + ?Sized>(
    start: Option<u64>,
    tight: bool,
    items: &[ListItem],
    backend: &mut B,
    ctx: &mut RenderContext,
) {
    let ordered = start.is_some();
    backend.list_start(start, tight);
    ctx.push(Container::List { tight, ordered });

    for (index, item) in items.iter().enumerate() {
        let marker = match start {
            Some(first) => {
                ItemMarker::Number(first.saturating_add(u64::try_from(index).unwrap_or(u64::MAX)))
            }
            None => ItemMarker::Bullet,
        };
        backend.item_start(marker, item.task);
        ctx.push(Container::Item { tight });
        walk_blocks(&item.children, backend, ctx);
        ctx.pop();
        backend.item_end();
    }

    ctx.pop();
    backend.list_end(ordered);
}

fn walk_table<B: RenderBackend + ?Sized>(table: &Table, backend: &mut B, ctx: &mut RenderContext) {
    if backend.table_start(table) == Flow::Skip {
        return;
    }

    walk_row(table, &table.header, true, backend, ctx);
    for row in &table.rows {
        walk_row(table, row, false, backend, ctx);
    }
    backend.table_end(table);
}

fn walk_row<B: RenderBackend + ?Sized>(
    table: &Table,
    cells: &[Vec<Inline>],
    header: bool,
    backend: &mut B,
    ctx: &mut RenderContext,
) {
    backend.table_row_start(header);
    for (index, cell) in cells.iter().enumerate() {
        backend.table_cell_start(header, index, table.alignment(index));
        walk_inlines(cell, backend, ctx);
        backend.table_cell_end(header);
    }
    backend.table_row_end(header);
}

/// Walk a sequence of inlines in order.
pub fn walk_inlines<B: RenderBackend + ?Sized>(
    inlines: &[Inline],
    backend: &mut B,
    ctx: &mut RenderContext,
) {
    for inline in inlines {
        walk_inline(inline, backend, ctx);
    }
}

/// Walk one inline.
pub fn walk_inline<B: RenderBackend + ?Sized>(
    inline: &Inline,
    backend: &mut B,
    ctx: &mut RenderContext,
) {
    match inline {
        Inline::Text(text) => backend.text(text),
        Inline::Code(code) => backend.code(code),
        Inline::SoftBreak => backend.soft_break(),
        Inline::LineBreak => backend.line_break(),
        Inline::Emphasis(children) => {
            backend.emphasis_start();
            walk_inlines(children, backend, ctx);
            backend.emphasis_end();
        }
        Inline::Strong(children) => {
            backend.strong_start();
            walk_inlines(children, backend, ctx);
            backend.strong_end();
        }
        Inline::Strikethrough(children) => {
            backend.strikethrough_start();
            walk_inlines(children, backend, ctx);
            backend.strikethrough_end();
        }
        Inline::Superscript(children) => {
            backend.superscript_start();
            walk_inlines(children, backend, ctx);
            backend.superscript_end();
        }
        Inline::Subscript(children) => {
            backend.subscript_start();
            walk_inlines(children, backend, ctx);
            backend.subscript_end();
        }
        Inline::Link {
            destination,
            title,
            children,
        } => {
            backend.link_start(destination, title);
            walk_inlines(children, backend, ctx);
            backend.link_end();
        }
        Inline::Image { source, title, alt } => backend.image(source, title, &plain_text(alt)),
        Inline::Html(html) => backend.inline_html(html),
        Inline::FootnoteReference(label) => {
            let number = ctx.footnote_number(label);
            backend.footnote_reference(label, number);
        }
        Inline::Directive(directive) => {
            if backend.inline_directive_start(directive) == Flow::Children {
                walk_inlines(&directive.content, backend, ctx);
                backend.inline_directive_end(directive);
            }
        }
    }
}
