//! Doxygen-style commands in paragraphs.
//!
//! A line starting with `\param name`, `\returns`, `\return`, `\note`,
//! `\discussion` or `\abstract` (or the `@` forms) starts a command that runs
//! until the next command line or the end of the paragraph.

use crate::ast::{Block, DoxygenCommand, Inline};

const COMMANDS: &[&str] = &["param", "returns", "return", "note", "discussion", "abstract"];

/// Split paragraphs containing command lines into `Command` blocks.
pub(crate) fn expand_blocks(blocks: &mut Vec<Block>) {
    let mut expanded = Vec::with_capacity(blocks.len());
    for mut block in blocks.drain(..) {
        match &mut block {
            Block::Paragraph(inlines) if has_command(inlines) => {
                expanded.extend(split_paragraph(std::mem::take(inlines)));
                continue;
            }
            Block::List { items, .. } => {
                for item in items {
                    expand_blocks(&mut item.children);
                }
            }
            Block::BlockQuote { children, .. }
            | Block::FootnoteDefinition { children, .. } => expand_blocks(children),
            Block::Directive(directive) => expand_blocks(&mut directive.children),
            _ => {}
        }
        expanded.push(block);
    }
    *blocks = expanded;
}

fn has_command(inlines: &[Inline]) -> bool {
    let mut at_line_start = true;
    for inline in inlines {
        if at_line_start && command_at(inline).is_some() {
            return true;
        }
        at_line_start = matches!(inline, Inline::SoftBreak);
    }
    false
}

/// Command name and the byte length of `\name` if `inline` starts with one.
fn command_at(inline: &Inline) -> Option<(&'static str, usize)> {
    let Inline::Text(text) = inline else {
        return None;
    };
    let rest = text.strip_prefix('\\').or_else(|| text.strip_prefix('@'))?;
    let word_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let word = &rest[..word_end];
    // Ends before the separating whitespace, whatever its width
    let len = text.len() - rest.len() + word_end;
    COMMANDS
        .iter()
        .find(|name| **name == word)
        .map(|name| (*name, len))
}

struct Group {
    command: Option<(&'static str, Option<String>)>,
    inlines: Vec<Inline>,
}

impl Group {
    fn into_block(self) -> Option<Block> {
        match self.command {
            Some((name, argument)) => Some(Block::Command(DoxygenCommand {
                name: if name == "return" { "returns" } else { name }.to_owned(),
                argument,
                content: self.inlines,
            })),
            None if self.inlines.is_empty() => None,
            None => Some(Block::Paragraph(self.inlines)),
        }
    }
}

fn split_paragraph(inlines: Vec<Inline>) -> Vec<Block> {
    let mut lines: Vec<Vec<Inline>> = vec![Vec::new()];
    for inline in inlines {
        if matches!(inline, Inline::SoftBreak) {
            lines.push(Vec::new());
        } else if let Some(line) = lines.last_mut() {
            line.push(inline);
        }
    }

    let mut blocks = Vec::new();
    let mut group = Group {
        command: None,
        inlines: Vec::new(),
    };

    for mut line in lines {
        if let Some((name, len)) = line.first().and_then(command_at) {
            blocks.extend(std::mem::replace(&mut group, start_group(name, len, &mut line)).into_block());
            group.inlines.append(&mut line);
        } else {
            if !group.inlines.is_empty() {
                group.inlines.push(Inline::SoftBreak);
            }
            group.inlines.append(&mut line);
        }
    }
    blocks.extend(group.into_block());
    blocks
}

/// Strip `\name` (and the `\param` argument) from the start of `line`.
fn start_group(name: &'static str, len: usize, line: &mut Vec<Inline>) -> Group {
    let mut argument = None;
    if let Some(Inline::Text(text)) = line.first_mut() {
        let mut rest = text.get(len..).unwrap_or_default().trim_start();
        if name == "param" {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            if end > 0 {
                argument = Some(rest[..end].to_owned());
            }
            rest = rest[end..].trim_start();
        }
        *text = rest.to_owned();
        if text.is_empty() {
            line.remove(0);
        }
    }

    Group {
        command: Some((name, argument)),
        inlines: Vec::new(),
    }
}
