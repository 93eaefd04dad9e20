//! Built-in language definitions for the lexical highlighter.

/// How a language spells attributes/annotations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AttributeSyntax {
    None,
    /// `@name` (Swift, Python, JavaScript decorators).
    At,
    /// `#[...]` and `#![...]` (Rust).
    Brackets,
    /// `#name` at the start of a line (C preprocessor).
    Preprocessor,
}

/// Lexical rules for one language.
#[derive(Debug)]
pub(crate) struct LanguageDef {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub keywords: &'static [&'static str],
    pub types: &'static [&'static str],
    pub line_comments: &'static [&'static str],
    pub block_comment: Option<(&'static str, &'static str)>,
    pub quotes: &'static [u8],
    /// `"""` / `'''` strings spanning lines.
    pub triple_quotes: bool,
    pub attributes: AttributeSyntax,
    /// Identifiers starting with an uppercase letter are types.
    pub capitalized_types: bool,
    /// `name!(...)` is a macro call.
    pub bang_macros: bool,
    /// Prefix of variable references (`$` in shells).
    pub variable_sigil: Option<u8>,
    /// Keys followed by this byte are properties (`:` in JSON, `=` in TOML).
    pub key_separator: Option<u8>,
    /// Extra bytes allowed inside identifiers.
    pub ident_extra: &'static [u8],
}

impl LanguageDef {
    pub(crate) fn matches(&self, tag: &str) -> bool {
        self.name.eq_ignore_ascii_case(tag)
            || self.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(tag))
    }
}

const BASE: LanguageDef = LanguageDef {
    name: "",
    aliases: &[],
    keywords: &[],
    types: &[],
    line_comments: &[],
    block_comment: None,
    quotes: b"\"",
    triple_quotes: false,
    attributes: AttributeSyntax::None,
    capitalized_types: false,
    bang_macros: false,
    variable_sigil: None,
    key_separator: None,
    ident_extra: &[],
};

const C_COMMENT: Option<(&str, &str)> = Some(("/*", "*/"));

pub(crate) static LANGUAGES: &[LanguageDef] = &[
    LanguageDef {
        name: "rust",
        aliases: &["rs"],
        keywords: &[
            "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
            "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod",
            "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super",
            "trait", "true", "type", "union", "unsafe", "use", "where", "while", "yield",
        ],
        types: &[
            "bool", "char", "str", "u8", "u16", "u32", "u64", "u128", "usize", "i8", "i16", "i32",
            "i64", "i128", "isize", "f32", "f64",
        ],
        line_comments: &["//"],
        block_comment: C_COMMENT,
        attributes: AttributeSyntax::Brackets,
        capitalized_types: true,
        bang_macros: true,
        ..BASE
    },
    LanguageDef {
        name: "swift",
        aliases: &[],
        keywords: &[
            "any", "associatedtype", "async", "await", "break", "case", "catch", "class",
            "continue", "default", "defer", "deinit", "do", "else", "enum", "extension",
            "fallthrough", "false", "fileprivate", "for", "func", "guard", "if", "import", "in",
            "init", "inout", "internal", "is", "let", "nil", "open", "operator", "private",
            "protocol", "public", "repeat", "rethrows", "return", "self", "Self", "some", "static",
            "struct", "subscript", "super", "switch", "throw", "throws", "true", "try",
            "typealias", "var", "where", "while",
        ],
        line_comments: &["//"],
        block_comment: C_COMMENT,
        triple_quotes: true,
        attributes: AttributeSyntax::At,
        capitalized_types: true,
        ..BASE
    },
    LanguageDef {
        name: "python",
        aliases: &["py", "python3"],
        keywords: &[
            "False", "None", "True", "and", "as", "assert", "async", "await", "break", "case",
            "class", "continue", "def", "del", "elif", "else", "except", "finally", "for", "from",
            "global", "if", "import", "in", "is", "lambda", "match", "nonlocal", "not", "or",
            "pass", "raise", "return", "self", "try", "while", "with", "yield",
        ],
        types: &[
            "bool", "bytes", "dict", "float", "int", "list", "object", "set", "str", "tuple",
        ],
        line_comments: &["#"],
        quotes: b"\"'",
        triple_quotes: true,
        attributes: AttributeSyntax::At,
        capitalized_types: true,
        ..BASE
    },
    LanguageDef {
        name: "javascript",
        aliases: &["js", "jsx", "mjs", "cjs"],
        keywords: &[
            "async", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
            "default", "delete", "do", "else", "export", "extends", "false", "finally", "for",
            "from", "function", "if", "import", "in", "instanceof", "let", "new", "null", "of",
            "return", "static", "super", "switch", "this", "throw", "true", "try", "typeof",
            "undefined", "var", "void", "while", "with", "yield",
        ],
        line_comments: &["//"],
        block_comment: C_COMMENT,
        quotes: b"\"'`",
        attributes: AttributeSyntax::At,
        capitalized_types: true,
        ..BASE
    },
    LanguageDef {
        name: "typescript",
        aliases: &["ts", "tsx"],
        keywords: &[
            "abstract", "as", "async", "await", "break", "case", "catch", "class", "const",
            "continue", "declare", "default", "delete", "do", "else", "enum", "export", "extends",
            "false", "finally", "for", "from", "function", "if", "implements", "import", "in",
            "instanceof", "interface", "keyof", "let", "namespace", "new", "null", "of",
            "private", "protected", "public", "readonly", "return", "static", "super", "switch",
            "this", "throw", "true", "try", "type", "typeof", "undefined", "var", "void",
            "while", "yield",
        ],
        types: &[
            "any", "bigint", "boolean", "never", "number", "object", "string", "symbol",
            "unknown",
        ],
        line_comments: &["//"],
        block_comment: C_COMMENT,
        quotes: b"\"'`",
        attributes: AttributeSyntax::At,
        capitalized_types: true,
        ..BASE
    },
    LanguageDef {
        name: "c",
        aliases: &["h"],
        keywords: &[
            "NULL", "auto", "break", "case", "const", "continue", "default", "do", "else", "enum",
            "extern", "false", "for", "goto", "if", "inline", "register", "restrict", "return",
            "sizeof", "static", "struct", "switch", "true", "typedef", "union", "volatile",
            "while",
        ],
        types: &[
            "bool", "char", "double", "float", "int", "int16_t", "int32_t", "int64_t", "int8_t",
            "long", "short", "signed", "size_t", "uint16_t", "uint32_t", "uint64_t", "uint8_t",
            "unsigned", "void",
        ],
        line_comments: &["//"],
        block_comment: C_COMMENT,
        quotes: b"\"'",
        attributes: AttributeSyntax::Preprocessor,
        ..BASE
    },
    LanguageDef {
        name: "go",
        aliases: &["golang"],
        keywords: &[
            "break", "case", "chan", "const", "continue", "default", "defer", "else",
            "fallthrough", "false", "for", "func", "go", "goto", "if", "import", "interface",
            "iota", "map", "nil", "package", "range", "return", "select", "struct", "switch",
            "true", "type", "var",
        ],
        types: &[
            "any", "bool", "byte", "complex128", "complex64", "error", "float32", "float64",
            "int", "int16", "int32", "int64", "int8", "rune", "string", "uint", "uint16",
            "uint32", "uint64", "uint8", "uintptr",
        ],
        line_comments: &["//"],
        block_comment: C_COMMENT,
        quotes: b"\"'`",
        ..BASE
    },
    LanguageDef {
        name: "json",
        aliases: &["jsonc", "json5"],
        keywords: &["false", "null", "true"],
        line_comments: &["//"],
        block_comment: C_COMMENT,
        key_separator: Some(b':'),
        ..BASE
    },
    LanguageDef {
        name: "shell",
        aliases: &["sh", "bash", "zsh", "console", "shell-session"],
        keywords: &[
            "break", "case", "continue", "do", "done", "elif", "else", "esac", "export", "fi",
            "for", "function", "if", "in", "local", "readonly", "return", "then", "unset",
            "until", "while",
        ],
        line_comments: &["#"],
        quotes: b"\"'",
        variable_sigil: Some(b'$'),
        ..BASE
    },
    LanguageDef {
        name: "toml",
        aliases: &[],
        keywords: &["false", "true"],
        line_comments: &["#"],
        quotes: b"\"'",
        triple_quotes: true,
        key_separator: Some(b'='),
        ident_extra: b"-",
        ..BASE
    },
];

/// Find the definition for a fence language tag.
pub(crate) fn find(tag: &str) -> Option<&'static LanguageDef> {
    let tag = tag.trim();
    LANGUAGES.iter().find(|def| def.matches(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_name_and_alias() {
        assert_eq!(find("rust").map(|d| d.name), Some("rust"));
        assert_eq!(find("RS").map(|d| d.name), Some("rust"));
        assert_eq!(find("bash").map(|d| d.name), Some("shell"));
        assert_eq!(find(" ts ").map(|d| d.name), Some("typescript"));
        assert!(find("unknownlang").is_none());
        assert!(find("").is_none());
    }

    #[test]
    fn test_keyword_lists_have_no_duplicates() {
        for def in LANGUAGES {
            let mut keywords = def.keywords.to_vec();
            keywords.sort_unstable();
            keywords.dedup();
            assert_eq!(keywords.len(), def.keywords.len(), "{}", def.name);
        }
    }
}
