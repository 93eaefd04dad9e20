//! Generic directive syntax.
//!
//! - Container: `:::name[label]{attrs}` ... `:::` (three or more colons)
//! - Leaf: `::name[label]{attrs}` on a line of its own
//! - Inline: `:name[content]{attrs}` inside text
//!
//! Attributes use `{#id .class key=value key="quoted value"}`.

use crate::ast::DirectiveAttributes;
use crate::parse::fence::FenceTracker;

/// Name, bracket content and attributes following the colons.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct DirectiveHead<'a> {
    pub name: &'a str,
    /// Bracket content; `None` when there were no brackets.
    pub label: Option<&'a str>,
    pub attributes: DirectiveAttributes,
}

/// A line that is directive syntax on its own.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum DirectiveLine<'a> {
    ContainerStart { colons: usize, head: DirectiveHead<'a> },
    ContainerEnd { colons: usize },
    Leaf(DirectiveHead<'a>),
}

/// Markdown split around block directives.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Piece {
    Markdown(String),
    Leaf {
        name: String,
        label: String,
        attributes: DirectiveAttributes,
    },
    Container {
        name: String,
        label: String,
        attributes: DirectiveAttributes,
        body: String,
    },
}

/// An inline directive found in a text run.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct InlineMatch<'a> {
    /// Byte offset of the leading colon.
    pub start: usize,
    /// Byte offset just past the directive.
    pub end: usize,
    pub head: DirectiveHead<'a>,
}

struct OpenContainer {
    name: String,
    label: String,
    attributes: DirectiveAttributes,
    colons: usize,
    body: String,
    /// Colon counts of containers opened inside the body.
    nested: Vec<usize>,
}

impl OpenContainer {
    /// Whether an end line with `colons` closes this container (rather than a nested one).
    fn closed_by(&mut self, colons: usize) -> bool {
        match self.nested.last() {
            Some(&inner) => {
                if colons >= inner {
                    self.nested.pop();
                }
                false
            }
            None => colons >= self.colons,
        }
    }

    fn into_piece(self) -> Piece {
        Piece::Container {
            name: self.name,
            label: self.label,
            attributes: self.attributes,
            body: self.body,
        }
    }
}

/// Split markdown into plain segments and top-level block directives.
///
/// Directive syntax inside fenced code blocks is ignored, and so are indented
/// lines (indented code, list item and block quote content). Container bodies are
/// returned unparsed (nested directives stay in the body). An unclosed container
/// runs to the end of the input.
pub(crate) fn split_directives(markdown: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut text = String::new();
    let mut open: Option<OpenContainer> = None;
    let mut fence = FenceTracker::new();

    for line in markdown.split_inclusive('\n') {
        let fenced = fence.update(line) || fence.in_fence();
        let directive = if fenced { None } else { classify_line(line) };

        if let Some(container) = open.as_mut() {
            let closes = match &directive {
                Some(DirectiveLine::ContainerEnd { colons }) => container.closed_by(*colons),
                Some(DirectiveLine::ContainerStart { colons, .. }) => {
                    container.nested.push(*colons);
                    false
                }
                _ => false,
            };
            if closes {
                if let Some(container) = open.take() {
                    pieces.push(container.into_piece());
                }
            } else {
                container.body.push_str(line);
            }
            continue;
        }

        match directive {
            Some(DirectiveLine::ContainerStart { colons, head }) => {
                flush_markdown(&mut text, &mut pieces);
                open = Some(OpenContainer {
                    name: head.name.to_owned(),
                    label: head.label.unwrap_or_default().to_owned(),
                    attributes: head.attributes,
                    colons,
                    body: String::new(),
                    nested: Vec::new(),
                });
            }
            Some(DirectiveLine::Leaf(head)) => {
                flush_markdown(&mut text, &mut pieces);
                pieces.push(Piece::Leaf {
                    name: head.name.to_owned(),
                    label: head.label.unwrap_or_default().to_owned(),
                    attributes: head.attributes,
                });
            }
            // Stray closing fence
            Some(DirectiveLine::ContainerEnd { .. }) | None => text.push_str(line),
        }
    }

    if let Some(container) = open {
        tracing::debug!(name = %container.name, "Unclosed directive container");
        pieces.push(container.into_piece());
    }
    flush_markdown(&mut text, &mut pieces);
    pieces
}

fn flush_markdown(text: &mut String, pieces: &mut Vec<Piece>) {
    if !text.trim().is_empty() {
        pieces.push(Piece::Markdown(std::mem::take(text)));
    }
    text.clear();
}

/// Classify a whole line as container start/end or leaf directive.
///
/// Directive lines start at column 0.
pub(crate) fn classify_line(line: &str) -> Option<DirectiveLine<'_>> {
    let trimmed = line.trim_end();
    let colons = trimmed.chars().take_while(|&c| c == ':').count();

    match colons {
        0 | 1 => None,
        2 => {
            let (head, consumed) = parse_head(&trimmed[2..])?;
            trimmed[2 + consumed..]
                .trim()
                .is_empty()
                .then_some(DirectiveLine::Leaf(head))
        }
        _ => {
            let after = trimmed[colons..].trim_start();
            if after.is_empty() {
                return Some(DirectiveLine::ContainerEnd { colons });
            }
            let (head, _) = parse_head(after)?;
            Some(DirectiveLine::ContainerStart { colons, head })
        }
    }
}

/// Find the first inline directive in `text`.
///
/// The colon must not follow an alphanumeric character or another colon, and
/// bracket content is required, so times (`12:30`), URLs and prose such as
/// `Note: text` are left alone.
pub(crate) fn find_inline(text: &str) -> Option<InlineMatch<'_>> {
    for (start, _) in text.match_indices(':') {
        let preceded = text[..start]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == ':');
        let rest = &text[start + 1..];
        if preceded || rest.starts_with(':') {
            continue;
        }
        if let Some((head, consumed)) = parse_head(rest)
            && head.label.is_some()
        {
            return Some(InlineMatch {
                start,
                end: start + 1 + consumed,
                head,
            });
        }
    }
    None
}

/// Parse `name[label]{attrs}` at the start of `s`.
///
/// Returns the head and the number of bytes consumed.
fn parse_head(s: &str) -> Option<(DirectiveHead<'_>, usize)> {
    let name_end = s
        .find(|c: char| c == '[' || c == '{' || c.is_whitespace())
        .unwrap_or(s.len());
    let name = &s[..name_end];
    if !is_valid_name(name) {
        return None;
    }

    let mut pos = name_end;
    let mut label = None;
    if let Some((content, consumed)) = parse_delimited(&s[pos..], '[', ']') {
        label = Some(content);
        pos += consumed;
    }
    let mut attrs = "";
    if let Some((content, consumed)) = parse_delimited(&s[pos..], '{', '}') {
        attrs = content;
        pos += consumed;
    }

    Some((
        DirectiveHead {
            name,
            label,
            attributes: parse_attributes(attrs),
        },
        pos,
    ))
}

/// Valid names contain only alphanumerics, hyphens and underscores.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

/// Content between balanced `open`/`close` delimiters at the start of `s`.
///
/// Returns `(content, bytes_consumed)`, or `None` if `s` does not start with
/// `open` or the delimiter is never closed.
fn parse_delimited(s: &str, open: char, close: char) -> Option<(&str, usize)> {
    if !s.starts_with(open) {
        return None;
    }

    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some((&s[1..i], i + 1));
            }
        }
    }
    None
}

/// Parse the inside of `{...}` into structured attributes.
pub(crate) fn parse_attributes(attrs: &str) -> DirectiveAttributes {
    let mut parsed = DirectiveAttributes::default();
    let mut remaining = attrs.trim();

    while !remaining.is_empty() {
        remaining = remaining.trim_start();

        if let Some(rest) = remaining.strip_prefix('#') {
            let end = selector_end(rest);
            parsed.id = Some(rest[..end].to_owned());
            remaining = &rest[end..];
        } else if let Some(rest) = remaining.strip_prefix('.') {
            let end = selector_end(rest);
            if end > 0 {
                parsed.classes.push(rest[..end].to_owned());
            }
            remaining = &rest[end..];
        } else if let Some((key, value, rest)) = parse_key_value(remaining) {
            parsed.attrs.insert(key.to_owned(), value.to_owned());
            remaining = rest;
        } else {
            // Skip one unrecognized character
            let mut chars = remaining.chars();
            chars.next();
            remaining = chars.as_str();
        }
    }

    parsed
}

fn selector_end(s: &str) -> usize {
    s.find(|c: char| c.is_whitespace() || c == '.' || c == '#')
        .unwrap_or(s.len())
}

/// Parse `key="value"`, `key='value'` or `key=value`.
///
/// Returns `(key, value, rest)`.
fn parse_key_value(s: &str) -> Option<(&str, &str, &str)> {
    let eq_pos = s.find('=')?;
    let key = s[..eq_pos].trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }

    let after_eq = &s[eq_pos + 1..];
    for quote in ['"', '\''] {
        if let Some(quoted) = after_eq.strip_prefix(quote) {
            let end = quoted.find(quote)?;
            return Some((key, &quoted[..end], &quoted[end + 1..]));
        }
    }

    let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
    Some((key, &after_eq[..end], &after_eq[end..]))
}
