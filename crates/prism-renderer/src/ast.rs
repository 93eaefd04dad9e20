//! Immutable Markdown document tree.
//!
//! Documents are produced by [`Document::parse`] or built directly. Every node
//! owns its children; there are no back references. Renderers only ever see
//! `&Document`.

use std::collections::BTreeMap;

/// Root of a Markdown document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    /// Top-level blocks in document order.
    pub blocks: Vec<Block>,
}

impl Document {
    /// Create a document from blocks.
    #[must_use]
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Whether the document has no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Block-level node.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum Block {
    /// Paragraph of inline content.
    Paragraph(Vec<Inline>),
    /// ATX or setext heading.
    Heading {
        /// Heading level (1-6).
        level: u8,
        /// Inline content.
        content: Vec<Inline>,
    },
    /// Fenced or indented code block.
    CodeBlock {
        /// First word of the fence info string.
        language: Option<String>,
        /// Code text without the final line terminator.
        literal: String,
    },
    /// Ordered (`start` is `Some`) or bullet list.
    List {
        /// Number of the first item for ordered lists.
        start: Option<u64>,
        /// Tight lists have no blank lines between items.
        tight: bool,
        /// List items.
        items: Vec<ListItem>,
    },
    /// Block quote, optionally a GitHub alert (`> [!NOTE]`).
    BlockQuote {
        /// Alert kind, if the quote is an alert.
        alert: Option<AlertKind>,
        /// Quoted blocks.
        children: Vec<Block>,
    },
    /// Horizontal rule.
    ThematicBreak,
    /// Raw HTML block.
    Html(String),
    /// GFM table.
    Table(Table),
    /// Footnote definition `[^label]: ...`.
    FootnoteDefinition {
        /// Footnote label.
        label: String,
        /// Definition content.
        children: Vec<Block>,
    },
    /// Front matter metadata block (YAML or TOML), unparsed.
    Metadata(String),
    /// Block directive (`:::name` container or `::name` leaf).
    Directive(BlockDirective),
    /// Doxygen-style command paragraph (`\param`, `\returns`, ...).
    Command(DoxygenCommand),
}

/// Inline-level node.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum Inline {
    /// Literal text.
    Text(String),
    /// Emphasis (`*em*`).
    Emphasis(Vec<Inline>),
    /// Strong emphasis (`**strong**`).
    Strong(Vec<Inline>),
    /// Strikethrough (`~~text~~`).
    Strikethrough(Vec<Inline>),
    /// Superscript.
    Superscript(Vec<Inline>),
    /// Subscript.
    Subscript(Vec<Inline>),
    /// Inline code span.
    Code(String),
    /// Hyperlink.
    Link {
        /// Link target.
        destination: String,
        /// Link title (empty if absent).
        title: String,
        /// Link text.
        children: Vec<Inline>,
    },
    /// Image.
    Image {
        /// Image source.
        source: String,
        /// Image title (empty if absent).
        title: String,
        /// Alternative text.
        alt: Vec<Inline>,
    },
    /// Soft line break.
    SoftBreak,
    /// Hard line break.
    LineBreak,
    /// Raw inline HTML.
    Html(String),
    /// Footnote reference `[^label]`.
    FootnoteReference(String),
    /// Inline directive `:name[content]{attrs}`.
    Directive(InlineDirective),
}

/// One item of a [`Block::List`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListItem {
    /// Task list state: `Some(true)` for `[x]`, `Some(false)` for `[ ]`.
    pub task: Option<bool>,
    /// Item content.
    pub children: Vec<Block>,
}

/// GitHub alert kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AlertKind {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl AlertKind {
    /// Look up an alert kind by (case-insensitive) name, e.g. a directive name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "note" => Some(Self::Note),
            "tip" => Some(Self::Tip),
            "important" => Some(Self::Important),
            "warning" => Some(Self::Warning),
            "caution" => Some(Self::Caution),
            _ => None,
        }
    }

    /// Lowercase name used in CSS classes.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Tip => "tip",
            Self::Important => "important",
            Self::Warning => "warning",
            Self::Caution => "caution",
        }
    }

    /// Default display title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Note => "Note",
            Self::Tip => "Tip",
            Self::Important => "Important",
            Self::Warning => "Warning",
            Self::Caution => "Caution",
        }
    }
}

impl From<pulldown_cmark::BlockQuoteKind> for AlertKind {
    fn from(kind: pulldown_cmark::BlockQuoteKind) -> Self {
        match kind {
            pulldown_cmark::BlockQuoteKind::Note => Self::Note,
            pulldown_cmark::BlockQuoteKind::Tip => Self::Tip,
            pulldown_cmark::BlockQuoteKind::Important => Self::Important,
            pulldown_cmark::BlockQuoteKind::Warning => Self::Warning,
            pulldown_cmark::BlockQuoteKind::Caution => Self::Caution,
        }
    }
}

/// Column alignment of a table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl From<pulldown_cmark::Alignment> for Alignment {
    fn from(alignment: pulldown_cmark::Alignment) -> Self {
        match alignment {
            pulldown_cmark::Alignment::None => Self::None,
            pulldown_cmark::Alignment::Left => Self::Left,
            pulldown_cmark::Alignment::Center => Self::Center,
            pulldown_cmark::Alignment::Right => Self::Right,
        }
    }
}

/// Table cell content.
pub type TableCell = Vec<Inline>;

/// GFM table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    /// Alignment per column.
    pub alignments: Vec<Alignment>,
    /// Header row cells.
    pub header: Vec<TableCell>,
    /// Body rows.
    pub rows: Vec<Vec<TableCell>>,
}

impl Table {
    /// Alignment of column `index`.
    #[must_use]
    pub fn alignment(&self, index: usize) -> Alignment {
        self.alignments.get(index).copied().unwrap_or_default()
    }
}

/// Attributes from a directive's `{#id .class key=value}` braces.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectiveAttributes {
    /// `#id`
    pub id: Option<String>,
    /// `.class` entries in source order.
    pub classes: Vec<String>,
    /// `key=value`, `key="value"` and `key='value'` pairs.
    pub attrs: BTreeMap<String, String>,
}

impl DirectiveAttributes {
    /// Value of attribute `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Whether no id, class or attribute is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.classes.is_empty() && self.attrs.is_empty()
    }
}

/// Shape of a block directive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DirectiveKind {
    /// `:::name` ... `:::` wrapping block content.
    Container,
    /// Single-line `::name[label]`.
    Leaf,
}

/// Block directive.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockDirective {
    /// Directive name.
    pub name: String,
    /// Container or leaf.
    pub kind: DirectiveKind,
    /// Content of the `[label]` brackets.
    pub label: Vec<Inline>,
    /// Attributes from the `{...}` braces.
    pub attributes: DirectiveAttributes,
    /// Body blocks (empty for leaf directives).
    pub children: Vec<Block>,
}

/// Inline directive.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InlineDirective {
    /// Directive name.
    pub name: String,
    /// Content of the `[content]` brackets.
    pub content: Vec<Inline>,
    /// Attributes from the `{...}` braces.
    pub attributes: DirectiveAttributes,
}

/// Doxygen-style command such as `\param name description`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DoxygenCommand {
    /// Command name without the `\` or `@` sigil (`param`, `returns`, ...).
    pub name: String,
    /// Parameter name for `\param`.
    pub argument: Option<String>,
    /// Description following the command.
    pub content: Vec<Inline>,
}

/// Concatenated text of inline nodes, without markup.
///
/// Breaks become spaces, images contribute their alt text, raw HTML and
/// footnote references contribute nothing.
#[must_use]
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut text = String::new();
    collect_text(inlines, &mut text);
    text
}

fn collect_text(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(text) | Inline::Code(text) => out.push_str(text),
            Inline::Emphasis(children)
            | Inline::Strong(children)
            | Inline::Strikethrough(children)
            | Inline::Superscript(children)
            | Inline::Subscript(children)
            | Inline::Link { children, .. }
            | Inline::Image { alt: children, .. } => collect_text(children, out),
            Inline::Directive(directive) => collect_text(&directive.content, out),
            Inline::SoftBreak | Inline::LineBreak => out.push(' '),
            Inline::Html(_) | Inline::FootnoteReference(_) => {}
        }
    }
}
