//! Tokens and the segment view over highlighted code.

use std::ops::Range;

use prism_theme::TokenCategory;

use crate::HighlightError;

/// A categorized byte range of a code block.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    /// Half-open byte range into the code text.
    pub range: Range<usize>,
    /// Syntax category of the covered text.
    pub category: TokenCategory,
}

impl Token {
    /// Create a token.
    #[must_use]
    pub fn new(range: Range<usize>, category: TokenCategory) -> Self {
        Self { range, category }
    }

    /// Text covered by this token, or `None` if the range does not fit `code`.
    #[must_use]
    pub fn text<'a>(&self, code: &'a str) -> Option<&'a str> {
        code.get(self.range.clone())
    }
}

/// Check that tokens are in bounds, ascending, non-overlapping and on char boundaries.
///
/// # Errors
///
/// Returns the first violation found.
pub fn validate_tokens(code: &str, tokens: &[Token]) -> Result<(), HighlightError> {
    let mut previous_end = 0;

    for token in tokens {
        let Range { start, end } = token.range;
        if start > end || end > code.len() {
            return Err(HighlightError::OutOfBounds {
                start,
                end,
                len: code.len(),
            });
        }
        if start < previous_end {
            return Err(HighlightError::Overlap {
                previous_end,
                start,
            });
        }
        for offset in [start, end] {
            if !code.is_char_boundary(offset) {
                return Err(HighlightError::NotCharBoundary { offset });
            }
        }
        previous_end = end;
    }

    Ok(())
}

/// A run of code text, tagged if it came from a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment<'a> {
    /// The text of this run.
    pub text: &'a str,
    /// Category of the covering token; `None` for gaps.
    pub category: Option<TokenCategory>,
}

/// Split code into alternating gap and token segments.
///
/// Concatenating the segment texts reproduces `code` exactly when the tokens
/// pass [`validate_tokens`]. Tokens that would break that guarantee (empty,
/// overlapping, misaligned) are skipped rather than panicking.
#[must_use]
pub fn segments<'a>(code: &'a str, tokens: &'a [Token]) -> Segments<'a> {
    Segments {
        code,
        tokens: tokens.iter(),
        pending: None,
        pos: 0,
    }
}

/// Iterator returned by [`segments`].
#[derive(Debug)]
pub struct Segments<'a> {
    code: &'a str,
    tokens: std::slice::Iter<'a, Token>,
    pending: Option<&'a Token>,
    pos: usize,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(token) = self.pending.take().or_else(|| self.tokens.next()) else {
                // Trailing gap
                if self.pos < self.code.len() {
                    let text = &self.code[self.pos..];
                    self.pos = self.code.len();
                    return Some(Segment {
                        text,
                        category: None,
                    });
                }
                return None;
            };

            let Range { start, end } = token.range;
            if start < self.pos || start >= end {
                continue;
            }

            if start > self.pos {
                let Some(gap) = self.code.get(self.pos..start) else {
                    continue;
                };
                self.pending = Some(token);
                self.pos = start;
                return Some(Segment {
                    text: gap,
                    category: None,
                });
            }

            let Some(text) = self.code.get(start..end) else {
                continue;
            };
            self.pos = end;
            return Some(Segment {
                text,
                category: Some(token.category),
            });
        }
    }
}
