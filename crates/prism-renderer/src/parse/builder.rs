//! Builds the document tree from the pulldown-cmark event stream.
//!
//! Every `Start` event pushes a frame; the matching `End` pops it, turns the
//! collected content into a node and attaches it to the new top frame.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Tag, TagEnd};

use crate::ast::{AlertKind, Alignment, Block, Document, Inline, ListItem, Table, TableCell};
use crate::parse::fence_language;

#[derive(Debug)]
enum FrameKind {
    Root,
    Paragraph,
    Heading(u8),
    BlockQuote(Option<AlertKind>),
    CodeBlock(Option<String>),
    HtmlBlock,
    Metadata,
    List(Option<u64>),
    Item,
    FootnoteDefinition(String),
    Table(Vec<Alignment>),
    TableRow { header: bool },
    TableCell,
    Emphasis,
    Strong,
    Strikethrough,
    Superscript,
    Subscript,
    Link { destination: String, title: String },
    Image { source: String, title: String },
    /// Structure without a node of its own (definition lists).
    Transparent,
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    blocks: Vec<Block>,
    inlines: Vec<Inline>,
    /// Literal content of code, HTML and metadata blocks.
    text: String,
    items: Vec<ListItem>,
    header: Vec<TableCell>,
    rows: Vec<Vec<TableCell>>,
    cells: Vec<TableCell>,
    task: Option<bool>,
    /// Item: content was wrapped in an explicit paragraph. List: some item was.
    loose: bool,
}

impl Frame {
    fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            blocks: Vec::new(),
            inlines: Vec::new(),
            text: String::new(),
            items: Vec::new(),
            header: Vec::new(),
            rows: Vec::new(),
            cells: Vec::new(),
            task: None,
            loose: false,
        }
    }

    /// Wrap pending inline content (tight list item text) into a paragraph.
    fn flush_inlines(&mut self) {
        if !self.inlines.is_empty() {
            let inlines = std::mem::take(&mut self.inlines);
            self.blocks.push(Block::Paragraph(inlines));
        }
    }

    fn push_block(&mut self, block: Block) {
        self.flush_inlines();
        self.blocks.push(block);
    }

    fn push_inline(&mut self, inline: Inline) {
        if let Inline::Text(text) = &inline
            && let Some(Inline::Text(last)) = self.inlines.last_mut()
        {
            last.push_str(text);
            return;
        }
        self.inlines.push(inline);
    }

    fn collects_text(&self) -> bool {
        matches!(
            self.kind,
            FrameKind::CodeBlock(_) | FrameKind::HtmlBlock | FrameKind::Metadata
        )
    }
}

/// Event-driven tree builder.
#[derive(Debug)]
pub(crate) struct TreeBuilder {
    root: Frame,
    stack: Vec<Frame>,
}

impl TreeBuilder {
    pub(crate) fn new() -> Self {
        Self {
            root: Frame::new(FrameKind::Root),
            stack: Vec::new(),
        }
    }

    /// Consume all events and return the finished document.
    pub(crate) fn build<'a>(mut self, events: impl IntoIterator<Item = Event<'a>>) -> Document {
        for event in events {
            self.process_event(event);
        }
        self.finish()
    }

    fn top(&mut self) -> &mut Frame {
        self.stack.last_mut().unwrap_or(&mut self.root)
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => {
                let top = self.top();
                if top.collects_text() {
                    top.text.push_str(&text);
                } else {
                    top.push_inline(Inline::Text(text.into_string()));
                }
            }
            Event::Code(code) | Event::InlineMath(code) | Event::DisplayMath(code) => {
                self.top().push_inline(Inline::Code(code.into_string()));
            }
            Event::Html(html) => {
                let top = self.top();
                if top.collects_text() {
                    top.text.push_str(&html);
                } else {
                    top.push_block(Block::Html(html.into_string()));
                }
            }
            Event::InlineHtml(html) => self.top().push_inline(Inline::Html(html.into_string())),
            Event::FootnoteReference(label) => {
                self.top()
                    .push_inline(Inline::FootnoteReference(label.into_string()));
            }
            Event::SoftBreak => self.top().push_inline(Inline::SoftBreak),
            Event::HardBreak => self.top().push_inline(Inline::LineBreak),
            Event::Rule => self.top().push_block(Block::ThematicBreak),
            Event::TaskListMarker(checked) => {
                if let Some(item) = self
                    .stack
                    .iter_mut()
                    .rev()
                    .find(|frame| matches!(frame.kind, FrameKind::Item))
                {
                    item.task = Some(checked);
                }
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        let kind = match tag {
            Tag::Paragraph => {
                let top = self.top();
                if matches!(top.kind, FrameKind::Item) {
                    top.loose = true;
                }
                FrameKind::Paragraph
            }
            Tag::Heading { level, .. } => FrameKind::Heading(heading_level_to_num(level)),
            Tag::BlockQuote(kind) => FrameKind::BlockQuote(kind.map(AlertKind::from)),
            Tag::CodeBlock(kind) => FrameKind::CodeBlock(match kind {
                CodeBlockKind::Fenced(info) => fence_language(&info),
                CodeBlockKind::Indented => None,
            }),
            Tag::HtmlBlock => FrameKind::HtmlBlock,
            Tag::MetadataBlock(_) => FrameKind::Metadata,
            Tag::List(start) => FrameKind::List(start),
            Tag::Item => FrameKind::Item,
            Tag::FootnoteDefinition(label) => FrameKind::FootnoteDefinition(label.into_string()),
            Tag::Table(alignments) => {
                FrameKind::Table(alignments.into_iter().map(Alignment::from).collect())
            }
            Tag::TableHead => FrameKind::TableRow { header: true },
            Tag::TableRow => FrameKind::TableRow { header: false },
            Tag::TableCell => FrameKind::TableCell,
            Tag::Emphasis => FrameKind::Emphasis,
            Tag::Strong => FrameKind::Strong,
            Tag::Strikethrough => FrameKind::Strikethrough,
            Tag::Superscript => FrameKind::Superscript,
            Tag::Subscript => FrameKind::Subscript,
            Tag::Link {
                dest_url, title, ..
            } => FrameKind::Link {
                destination: dest_url.into_string(),
                title: title.into_string(),
            },
            Tag::Image {
                dest_url, title, ..
            } => FrameKind::Image {
                source: dest_url.into_string(),
                title: title.into_string(),
            },
            Tag::DefinitionList | Tag::DefinitionListTitle | Tag::DefinitionListDefinition => {
                FrameKind::Transparent
            }
        };
        self.stack.push(Frame::new(kind));
    }

    fn end_tag(&mut self, _tag: TagEnd) {
        // Events are balanced, so the end always closes the innermost frame
        if let Some(frame) = self.stack.pop() {
            self.close(frame);
        }
    }

    fn close(&mut self, mut frame: Frame) {
        if matches!(
            frame.kind,
            FrameKind::BlockQuote(_)
                | FrameKind::Item
                | FrameKind::FootnoteDefinition(_)
                | FrameKind::Transparent
        ) {
            frame.flush_inlines();
        }

        let parent = self.top();
        match frame.kind {
            FrameKind::Root => {}
            FrameKind::Paragraph => parent.push_block(Block::Paragraph(frame.inlines)),
            FrameKind::Heading(level) => parent.push_block(Block::Heading {
                level,
                content: frame.inlines,
            }),
            FrameKind::BlockQuote(alert) => parent.push_block(Block::BlockQuote {
                alert,
                children: frame.blocks,
            }),
            FrameKind::CodeBlock(language) => {
                let mut literal = frame.text;
                if literal.ends_with('\n') {
                    literal.pop();
                }
                parent.push_block(Block::CodeBlock { language, literal });
            }
            FrameKind::HtmlBlock => parent.push_block(Block::Html(frame.text)),
            FrameKind::Metadata => parent.push_block(Block::Metadata(frame.text)),
            FrameKind::List(start) => parent.push_block(Block::List {
                start,
                tight: !frame.loose,
                items: frame.items,
            }),
            FrameKind::Item => {
                if frame.loose {
                    parent.loose = true;
                }
                parent.items.push(ListItem {
                    task: frame.task,
                    children: frame.blocks,
                });
            }
            FrameKind::FootnoteDefinition(label) => parent.push_block(Block::FootnoteDefinition {
                label,
                children: frame.blocks,
            }),
            FrameKind::Table(alignments) => parent.push_block(Block::Table(Table {
                alignments,
                header: frame.header,
                rows: frame.rows,
            })),
            FrameKind::TableRow { header: true } => parent.header = frame.cells,
            FrameKind::TableRow { header: false } => parent.rows.push(frame.cells),
            FrameKind::TableCell => parent.cells.push(frame.inlines),
            FrameKind::Emphasis => parent.push_inline(Inline::Emphasis(frame.inlines)),
            FrameKind::Strong => parent.push_inline(Inline::Strong(frame.inlines)),
            FrameKind::Strikethrough => parent.push_inline(Inline::Strikethrough(frame.inlines)),
            FrameKind::Superscript => parent.push_inline(Inline::Superscript(frame.inlines)),
            FrameKind::Subscript => parent.push_inline(Inline::Subscript(frame.inlines)),
            FrameKind::Link { destination, title } => parent.push_inline(Inline::Link {
                destination,
                title,
                children: frame.inlines,
            }),
            FrameKind::Image { source, title } => parent.push_inline(Inline::Image {
                source,
                title,
                alt: frame.inlines,
            }),
            FrameKind::Transparent => {
                for block in frame.blocks {
                    parent.push_block(block);
                }
            }
        }
    }

    fn finish(mut self) -> Document {
        while let Some(frame) = self.stack.pop() {
            self.close(frame);
        }
        self.root.flush_inlines();
        Document::new(self.root.blocks)
    }
}

/// Convert a heading level to its number (1-6).
pub(crate) fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
