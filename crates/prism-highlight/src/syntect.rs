//! `TextMate` grammar highlighter backed by `syntect`.

use std::ops::Range;

use ::syntect::parsing::{ParseState, Scope, ScopeStack, SyntaxReference, SyntaxSet};
use ::syntect::util::LinesWithEndings;
use prism_theme::TokenCategory;

use crate::{HighlightError, Highlighter, Token};

/// Scope prefixes that color everything nested inside them.
const ENCLOSING: &[(&str, TokenCategory)] = &[
    ("comment", TokenCategory::Comment),
    ("string", TokenCategory::String),
];

/// Scope prefixes checked from the innermost scope outwards. Order matters:
/// more specific prefixes come first.
const RULES: &[(&str, TokenCategory)] = &[
    ("constant.numeric", TokenCategory::Number),
    ("constant.language", TokenCategory::Keyword),
    ("keyword.operator", TokenCategory::Operator),
    ("keyword", TokenCategory::Keyword),
    ("storage", TokenCategory::Keyword),
    ("entity.name.function", TokenCategory::Function),
    ("support.function", TokenCategory::Function),
    ("variable.function", TokenCategory::Function),
    ("support.type.property-name", TokenCategory::Property),
    ("variable.other.member", TokenCategory::Property),
    ("variable.other.property", TokenCategory::Property),
    ("entity.other.attribute-name", TokenCategory::Attribute),
    ("meta.attribute", TokenCategory::Attribute),
    ("meta.annotation", TokenCategory::Attribute),
    ("entity.name", TokenCategory::Type),
    ("support.type", TokenCategory::Type),
    ("support.class", TokenCategory::Type),
    ("variable", TokenCategory::Variable),
    ("punctuation", TokenCategory::Punctuation),
];

/// Highlighter using the `syntect` default syntax set.
///
/// Language tags are looked up by file extension first, then by
/// case-insensitive syntax name. Engine failures are logged and yield no
/// tokens.
#[derive(Debug)]
pub struct SyntectHighlighter {
    syntaxes: SyntaxSet,
}

impl SyntectHighlighter {
    /// Load the bundled default syntaxes.
    #[must_use]
    pub fn new() -> Self {
        Self::with_syntax_set(SyntaxSet::load_defaults_newlines())
    }

    /// Use a custom syntax set. Syntaxes must be built for newline-terminated lines.
    #[must_use]
    pub fn with_syntax_set(syntaxes: SyntaxSet) -> Self {
        Self { syntaxes }
    }

    fn find_syntax(&self, language: &str) -> Option<&SyntaxReference> {
        self.syntaxes.find_syntax_by_token(language.trim())
    }

    fn highlight(&self, code: &str, syntax: &SyntaxReference) -> Result<Vec<Token>, HighlightError> {
        let mut state = ParseState::new(syntax);
        let mut stack = ScopeStack::new();
        let mut tokens = Vec::new();
        let mut offset = 0;

        for line in LinesWithEndings::from(code) {
            let ops = state
                .parse_line(line, &self.syntaxes)
                .map_err(|e| HighlightError::Engine(format!("{e:?}")))?;

            let mut cursor = 0;
            for (pos, op) in ops {
                push_run(&mut tokens, code, offset + cursor..offset + pos, stack.as_slice());
                stack
                    .apply(&op)
                    .map_err(|e| HighlightError::Engine(format!("{e:?}")))?;
                cursor = pos;
            }
            push_run(&mut tokens, code, offset + cursor..offset + line.len(), stack.as_slice());
            offset += line.len();
        }

        Ok(tokens)
    }
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for SyntectHighlighter {
    fn tokenize(&self, code: &str, language: Option<&str>) -> Vec<Token> {
        let Some(syntax) = language.and_then(|lang| self.find_syntax(lang)) else {
            return Vec::new();
        };

        match self.highlight(code, syntax) {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::debug!(error = %e, syntax = %syntax.name, "Syntect highlighting failed");
                Vec::new()
            }
        }
    }

    fn supports(&self, language: &str) -> bool {
        self.find_syntax(language).is_some()
    }
}

/// Append a run of text under `scopes`, merging with an adjacent same-category token.
fn push_run(tokens: &mut Vec<Token>, code: &str, range: Range<usize>, scopes: &[Scope]) {
    let Some(text) = code.get(range.clone()) else {
        return;
    };
    if text.trim().is_empty() {
        return;
    }
    let Some(category) = classify(scopes) else {
        return;
    };

    if let Some(last) = tokens.last_mut()
        && last.category == category
        && last.range.end == range.start
    {
        last.range.end = range.end;
    } else {
        tokens.push(Token::new(range, category));
    }
}

fn classify(scopes: &[Scope]) -> Option<TokenCategory> {
    let names: Vec<String> = scopes.iter().map(|scope| scope.build_string()).collect();

    for (prefix, category) in ENCLOSING {
        if names.iter().any(|name| has_prefix(name, prefix)) {
            return Some(*category);
        }
    }

    names.iter().rev().find_map(|name| {
        RULES
            .iter()
            .find(|(prefix, _)| has_prefix(name, prefix))
            .map(|(_, category)| *category)
    })
}

/// Dotted-segment prefix match: `keyword` matches `keyword.control` but not `keywords`.
fn has_prefix(scope: &str, prefix: &str) -> bool {
    scope
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate_tokens;

    #[test]
    fn test_has_prefix_respects_segments() {
        assert!(has_prefix("keyword.control.rust", "keyword"));
        assert!(has_prefix("string", "string"));
        assert!(!has_prefix("storage.type", "string"));
        assert!(!has_prefix("keywords", "keyword"));
    }

    #[test]
    fn test_rust_comment_and_keyword() {
        let code = "// hi\nfn main() {}\n";
        let tokens = SyntectHighlighter::new().tokenize(code, Some("rust"));

        assert_eq!(validate_tokens(code, &tokens), Ok(()));
        assert!(
            tokens
                .iter()
                .any(|t| t.category == TokenCategory::Comment && code[t.range.clone()].starts_with("// hi"))
        );
        assert!(
            tokens
                .iter()
                .any(|t| t.category == TokenCategory::Keyword && &code[t.range.clone()] == "fn")
        );
    }

    #[test]
    fn test_unknown_language_is_empty() {
        let highlighter = SyntectHighlighter::new();
        assert!(highlighter.tokenize("x", Some("unknownlang")).is_empty());
        assert!(highlighter.tokenize("x", None).is_empty());
        assert!(!highlighter.supports("unknownlang"));
        assert!(highlighter.supports("rs"));
    }
}
