//! Token categories for syntax coloring.

use std::fmt;
use std::str::FromStr;

use crate::ThemeError;

/// Category assigned to a highlighted token.
///
/// The set is closed: every theme colors exactly these eleven categories, and
/// the CSS names derived from them (`token-<name>`, `--syntax-<name>`) are fixed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TokenCategory {
    Keyword,
    String,
    Comment,
    Number,
    Function,
    Type,
    Variable,
    Operator,
    Punctuation,
    Property,
    Attribute,
}

impl TokenCategory {
    /// All categories in canonical order.
    pub const ALL: [Self; 11] = [
        Self::Keyword,
        Self::String,
        Self::Comment,
        Self::Number,
        Self::Function,
        Self::Type,
        Self::Variable,
        Self::Operator,
        Self::Punctuation,
        Self::Property,
        Self::Attribute,
    ];

    /// Lowercase category name (`keyword`, `string`, ...).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::String => "string",
            Self::Comment => "comment",
            Self::Number => "number",
            Self::Function => "function",
            Self::Type => "type",
            Self::Variable => "variable",
            Self::Operator => "operator",
            Self::Punctuation => "punctuation",
            Self::Property => "property",
            Self::Attribute => "attribute",
        }
    }

    /// CSS class applied to highlighted spans (`token-keyword`).
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Keyword => "token-keyword",
            Self::String => "token-string",
            Self::Comment => "token-comment",
            Self::Number => "token-number",
            Self::Function => "token-function",
            Self::Type => "token-type",
            Self::Variable => "token-variable",
            Self::Operator => "token-operator",
            Self::Punctuation => "token-punctuation",
            Self::Property => "token-property",
            Self::Attribute => "token-attribute",
        }
    }

    /// CSS custom property holding the category color (`--syntax-keyword`).
    #[must_use]
    pub const fn css_variable(self) -> &'static str {
        match self {
            Self::Keyword => "--syntax-keyword",
            Self::String => "--syntax-string",
            Self::Comment => "--syntax-comment",
            Self::Number => "--syntax-number",
            Self::Function => "--syntax-function",
            Self::Type => "--syntax-type",
            Self::Variable => "--syntax-variable",
            Self::Operator => "--syntax-operator",
            Self::Punctuation => "--syntax-punctuation",
            Self::Property => "--syntax-property",
            Self::Attribute => "--syntax-attribute",
        }
    }

    /// Whether the category is rendered in italics (comments).
    #[must_use]
    pub const fn is_italic(self) -> bool {
        matches!(self, Self::Comment)
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TokenCategory {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ThemeError::UnknownCategory(s.to_owned()))
    }
}
