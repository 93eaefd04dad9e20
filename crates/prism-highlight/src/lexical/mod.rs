//! Built-in rule-based highlighter.
//!
//! A single byte scanner parameterized by [`LanguageDef`] tables. Every token
//! starts on an ASCII byte and ends either after an ASCII byte or at a line
//! end, so boundaries never split a UTF-8 character.

mod languages;

use prism_theme::TokenCategory;

use self::languages::{AttributeSyntax, LanguageDef};
use crate::{Highlighter, Token};

const OPERATOR_BYTES: &[u8] = b"+-*/%=<>!&|^~?:";
const PUNCTUATION_BYTES: &[u8] = b"(){}[];,.";

/// Lexical highlighter for a fixed set of common languages.
///
/// Supported: Rust, Swift, Python, JavaScript, TypeScript, C, Go, JSON, shell
/// and TOML (plus common aliases such as `rs`, `py`, `js`, `ts`, `sh`, `bash`).
/// Language tags are matched case-insensitively.
#[derive(Clone, Copy, Debug, Default)]
pub struct LexicalHighlighter;

impl LexicalHighlighter {
    /// Create a highlighter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Canonical names of the supported languages.
    pub fn languages() -> impl Iterator<Item = &'static str> {
        languages::LANGUAGES.iter().map(|def| def.name)
    }
}

impl Highlighter for LexicalHighlighter {
    fn tokenize(&self, code: &str, language: Option<&str>) -> Vec<Token> {
        let Some(def) = language.and_then(languages::find) else {
            tracing::trace!(language = ?language, "No lexical rules for language");
            return Vec::new();
        };
        Scanner::new(code, def).run()
    }

    fn supports(&self, language: &str) -> bool {
        languages::find(language).is_some()
    }
}

struct Scanner<'a> {
    code: &'a str,
    bytes: &'a [u8],
    def: &'static LanguageDef,
    pos: usize,
    /// Only whitespace seen since the last newline.
    line_start: bool,
    tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
    fn new(code: &'a str, def: &'static LanguageDef) -> Self {
        Self {
            code,
            bytes: code.as_bytes(),
            def,
            pos: 0,
            line_start: true,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Token> {
        while let Some(&byte) = self.bytes.get(self.pos) {
            if byte == b'\n' {
                self.line_start = true;
                self.pos += 1;
                continue;
            }
            if byte.is_ascii_whitespace() {
                self.pos += 1;
                continue;
            }

            let start = self.pos;
            let category = self
                .comment()
                .or_else(|| self.attribute())
                .or_else(|| self.string())
                .or_else(|| self.number())
                .or_else(|| self.variable())
                .or_else(|| self.identifier())
                .or_else(|| self.operator())
                .or_else(|| self.punctuation());

            self.line_start = false;
            match category {
                Some(category) => self.tokens.push(Token::new(start..self.pos, category)),
                // Unclassified byte (including UTF-8 continuation bytes)
                None => self.pos += 1,
            }
        }
        self.tokens
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.bytes[self.pos..].starts_with(prefix.as_bytes())
    }

    /// Byte offset of `needle` at or after `from`.
    fn find_from(&self, from: usize, needle: &str) -> Option<usize> {
        self.code
            .get(from..)
            .and_then(|rest| rest.find(needle))
            .map(|idx| from + idx)
    }

    fn line_end(&self) -> usize {
        self.find_from(self.pos, "\n").unwrap_or(self.bytes.len())
    }

    /// Next byte after `from` that is not a space or tab.
    fn next_significant(&self, from: usize) -> Option<u8> {
        self.bytes[from..]
            .iter()
            .copied()
            .find(|b| *b != b' ' && *b != b'\t')
    }

    fn previous_significant(&self, before: usize) -> Option<(usize, u8)> {
        self.bytes[..before]
            .iter()
            .copied()
            .enumerate()
            .rev()
            .find(|(_, b)| !b.is_ascii_whitespace())
    }

    fn comment(&mut self) -> Option<TokenCategory> {
        if self.def.line_comments.iter().any(|p| self.starts_with(p)) {
            self.pos = self.line_end();
            return Some(TokenCategory::Comment);
        }
        if let Some((open, close)) = self.def.block_comment
            && self.starts_with(open)
        {
            self.pos = self
                .find_from(self.pos + open.len(), close)
                .map_or(self.bytes.len(), |idx| idx + close.len());
            return Some(TokenCategory::Comment);
        }
        None
    }

    fn attribute(&mut self) -> Option<TokenCategory> {
        let byte = self.peek(0)?;
        match self.def.attributes {
            AttributeSyntax::At if byte == b'@' && self.peek(1).is_some_and(is_ident_start) => {
                self.pos += 1;
                self.consume_while(|b| is_ident_continue(b) || b == b'.');
            }
            AttributeSyntax::Brackets if self.starts_with("#[") || self.starts_with("#![") => {
                let mut depth = 0usize;
                while let Some(b) = self.peek(0) {
                    self.pos += 1;
                    match b {
                        b'[' => depth += 1,
                        b']' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                }
            }
            AttributeSyntax::Preprocessor if byte == b'#' && self.line_start => {
                self.pos += 1;
                self.consume_while(|b| b == b' ' || b == b'\t');
                self.consume_while(is_ident_continue);
            }
            _ => return None,
        }
        Some(TokenCategory::Attribute)
    }

    fn string(&mut self) -> Option<TokenCategory> {
        let quote = self.peek(0)?;
        if !self.def.quotes.contains(&quote) {
            return None;
        }

        if self.def.triple_quotes && self.bytes[self.pos..].starts_with(&[quote; 3]) {
            let fence = &self.code[self.pos..self.pos + 3];
            self.pos = self
                .find_from(self.pos + 3, fence)
                .map_or(self.bytes.len(), |idx| idx + 3);
        } else {
            self.pos += 1;
            while let Some(b) = self.peek(0) {
                if b == b'\\' {
                    self.pos = (self.pos + 2).min(self.bytes.len());
                } else if b == quote {
                    self.pos += 1;
                    break;
                } else if b == b'\n' && quote != b'`' {
                    break;
                } else {
                    self.pos += 1;
                }
            }
        }

        // Quoted keys: `"name": 1` in JSON, `"a b" = 1` in TOML
        if let Some(separator) = self.def.key_separator
            && self.next_significant(self.pos) == Some(separator)
        {
            return Some(TokenCategory::Property);
        }
        Some(TokenCategory::String)
    }

    fn number(&mut self) -> Option<TokenCategory> {
        if !self.peek(0)?.is_ascii_digit() {
            return None;
        }
        while let Some(b) = self.peek(0) {
            let fraction = b == b'.' && self.peek(1).is_some_and(|n| n.is_ascii_digit());
            if b.is_ascii_alphanumeric() || b == b'_' || fraction {
                self.pos += 1;
            } else {
                break;
            }
        }
        Some(TokenCategory::Number)
    }

    fn variable(&mut self) -> Option<TokenCategory> {
        let sigil = self.def.variable_sigil?;
        if self.peek(0)? != sigil {
            return None;
        }
        self.pos += 1;
        match self.peek(0) {
            Some(b'{') => {
                self.pos = self
                    .find_from(self.pos, "}")
                    .map_or_else(|| self.line_end(), |idx| idx + 1);
            }
            Some(b) if is_ident_start(b) => self.consume_while(is_ident_continue),
            Some(b) if b.is_ascii_digit() || b"#?@*!$-".contains(&b) => self.pos += 1,
            _ => {}
        }
        Some(TokenCategory::Variable)
    }

    fn identifier(&mut self) -> Option<TokenCategory> {
        if !is_ident_start(self.peek(0)?) {
            return None;
        }
        let start = self.pos;
        let extra = self.def.ident_extra;
        self.consume_while(|b| is_ident_continue(b) || extra.contains(&b));
        let word = &self.code[start..self.pos];

        if self.def.keywords.contains(&word) {
            return Some(TokenCategory::Keyword);
        }
        if self.next_significant(self.pos) == Some(b'(') {
            return Some(TokenCategory::Function);
        }
        if self.def.bang_macros
            && self.peek(0) == Some(b'!')
            && matches!(self.peek(1), Some(b'(' | b'[' | b'{'))
        {
            self.pos += 1;
            return Some(TokenCategory::Function);
        }
        if let Some((idx, b'.')) = self.previous_significant(start)
            && (idx == 0 || self.bytes[idx - 1] != b'.')
        {
            return Some(TokenCategory::Property);
        }
        if self.def.types.contains(&word)
            || (self.def.capitalized_types && word.as_bytes()[0].is_ascii_uppercase())
        {
            return Some(TokenCategory::Type);
        }
        if let Some(separator) = self.def.key_separator
            && self.next_significant(self.pos) == Some(separator)
        {
            return Some(TokenCategory::Property);
        }
        Some(TokenCategory::Variable)
    }

    fn operator(&mut self) -> Option<TokenCategory> {
        if !OPERATOR_BYTES.contains(&self.peek(0)?) {
            return None;
        }
        self.consume_while(|b| OPERATOR_BYTES.contains(&b));
        Some(TokenCategory::Operator)
    }

    fn punctuation(&mut self) -> Option<TokenCategory> {
        if !PUNCTUATION_BYTES.contains(&self.peek(0)?) {
            return None;
        }
        self.pos += 1;
        Some(TokenCategory::Punctuation)
    }

    fn consume_while(&mut self, mut accept: impl FnMut(u8) -> bool) {
        while self.peek(0).is_some_and(&mut accept) {
            self.pos += 1;
        }
    }
}

fn is_ident_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

fn is_ident_continue(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{segments, validate_tokens};
    use pretty_assertions::assert_eq;

    use TokenCategory::{
        Attribute, Comment, Function, Keyword, Number, Operator, Property, Punctuation, String,
        Type, Variable,
    };

    fn categorize<'a>(code: &'a str, language: &str) -> Vec<(&'a str, TokenCategory)> {
        LexicalHighlighter::new()
            .tokenize(code, Some(language))
            .into_iter()
            .map(|t| (&code[t.range], t.category))
            .collect()
    }

    #[test]
    fn test_rust_let_binding() {
        assert_eq!(
            categorize("let x = 42;", "rust"),
            vec![
                ("let", Keyword),
                ("x", Variable),
                ("=", Operator),
                ("42", Number),
                (";", Punctuation),
            ]
        );
    }

    #[test]
    fn test_rust_function_and_macro() {
        assert_eq!(
            categorize(r#"fn main() { println!("hi"); }"#, "rust"),
            vec![
                ("fn", Keyword),
                ("main", Function),
                ("(", Punctuation),
                (")", Punctuation),
                ("{", Punctuation),
                ("println!", Function),
                ("(", Punctuation),
                ("\"hi\"", String),
                (")", Punctuation),
                (";", Punctuation),
                ("}", Punctuation),
            ]
        );
    }

    #[test]
    fn test_rust_attribute_types_and_comments() {
        let code = "#[derive(Debug)]\nstruct Point { x: f64 } // origin";
        assert_eq!(
            categorize(code, "rs"),
            vec![
                ("#[derive(Debug)]", Attribute),
                ("struct", Keyword),
                ("Point", Type),
                ("{", Punctuation),
                ("x", Variable),
                (":", Operator),
                ("f64", Type),
                ("}", Punctuation),
                ("// origin", Comment),
            ]
        );
    }

    #[test]
    fn test_property_after_dot() {
        let tokens = categorize("self.count.len()", "rust");
        assert_eq!(tokens[2], ("count", Property));
        assert_eq!(tokens[4], ("len", Function));
    }

    #[test]
    fn test_python_decorator_and_docstring() {
        let code = "@dataclass\nclass Point:\n    \"\"\"A point.\"\"\"\n    x: int = 0\n";
        assert_eq!(
            categorize(code, "Python"),
            vec![
                ("@dataclass", Attribute),
                ("class", Keyword),
                ("Point", Type),
                (":", Operator),
                ("\"\"\"A point.\"\"\"", String),
                ("x", Variable),
                (":", Operator),
                ("int", Type),
                ("=", Operator),
                ("0", Number),
            ]
        );
    }

    #[test]
    fn test_json_keys_are_properties() {
        assert_eq!(
            categorize(r#"{"name": "prism", "count": 2, "ok": true}"#, "json"),
            vec![
                ("{", Punctuation),
                ("\"name\"", Property),
                (":", Operator),
                ("\"prism\"", String),
                (",", Punctuation),
                ("\"count\"", Property),
                (":", Operator),
                ("2", Number),
                (",", Punctuation),
                ("\"ok\"", Property),
                (":", Operator),
                ("true", Keyword),
                ("}", Punctuation),
            ]
        );
    }

    #[test]
    fn test_toml_bare_keys() {
        let tokens = categorize("cache-highlighting = true", "toml");
        assert_eq!(
            tokens,
            vec![
                ("cache-highlighting", Property),
                ("=", Operator),
                ("true", Keyword),
            ]
        );
    }

    #[test]
    fn test_shell_variables_and_comments() {
        assert_eq!(
            categorize("echo \"$HOME\" $USER ${PATH} # done", "bash"),
            vec![
                ("echo", Variable),
                ("\"$HOME\"", String),
                ("$USER", Variable),
                ("${PATH}", Variable),
                ("# done", Comment),
            ]
        );
    }

    #[test]
    fn test_c_preprocessor_only_at_line_start() {
        let tokens = categorize("#include <stdio.h>\nint main(void) { return 0; }", "c");
        assert_eq!(tokens[0], ("#include", Attribute));
        assert!(tokens.contains(&("int", Type)));
        assert!(tokens.contains(&("main", Function)));
        assert!(tokens.contains(&("return", Keyword)));
    }

    #[test]
    fn test_unterminated_constructs_run_to_end() {
        assert_eq!(
            categorize("/* open", "c"),
            vec![("/* open", Comment)]
        );
        assert_eq!(
            categorize("s = \"open\nnext", "python"),
            vec![
                ("s", Variable),
                ("=", Operator),
                ("\"open", String),
                ("next", Variable),
            ]
        );
    }

    #[test]
    fn test_unsupported_language_is_empty() {
        let highlighter = LexicalHighlighter::new();
        assert!(highlighter.tokenize("let x = 1;", Some("unknownlang")).is_empty());
        assert!(highlighter.tokenize("let x = 1;", None).is_empty());
        assert!(!highlighter.supports("unknownlang"));
        assert!(highlighter.supports("TypeScript"));
    }

    #[test]
    fn test_empty_code() {
        assert!(LexicalHighlighter::new().tokenize("", Some("rust")).is_empty());
    }

    #[test]
    fn test_tokens_are_valid_for_every_language() {
        let samples = [
            "let s = \"héllo wörld\"; // ünïcode ✓\nfn f() -> u8 { 0x1F }",
            "x = 'naïve' # ☃\nprint(x)",
            "const π = 3.14; /* ∑ */ `tmpl ${π}`",
            "{\"ключ\": [1, 2.5e3, null]}",
            "echo ${HOME} \"日本\" $# && ls -la",
            "\\ \"\\",
        ];
        let highlighter = LexicalHighlighter::new();
        for language in LexicalHighlighter::languages() {
            for code in samples {
                let tokens = highlighter.tokenize(code, Some(language));
                assert_eq!(validate_tokens(code, &tokens), Ok(()), "{language}: {code}");
                let rebuilt: std::string::String =
                    segments(code, &tokens).map(|s| s.text).collect();
                assert_eq!(rebuilt, code);
            }
        }
    }

    #[test]
    fn test_tokenize_is_deterministic() {
        let code = "fn add(a: i32, b: i32) -> i32 { a + b }";
        let highlighter = LexicalHighlighter::new();
        assert_eq!(
            highlighter.tokenize(code, Some("rust")),
            highlighter.tokenize(code, Some("rust"))
        );
    }
}
