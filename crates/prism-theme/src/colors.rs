//! Per-category color palette.

use crate::{Color, TokenCategory};

/// Colors for each of the eleven token categories.
///
/// Fields are public so custom palettes can be written out in full; use
/// [`with`](Self::with) to tweak a preset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyntaxColors {
    pub keyword: Color,
    pub string: Color,
    pub comment: Color,
    pub number: Color,
    pub function: Color,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub type_: Color,
    pub variable: Color,
    pub operator: Color,
    pub punctuation: Color,
    pub property: Color,
    pub attribute: Color,
}

impl SyntaxColors {
    /// Palette tuned for light backgrounds.
    #[must_use]
    pub const fn light() -> Self {
        Self {
            keyword: Color::rgb(0x9B, 0x23, 0x93),
            string: Color::rgb(0xC4, 0x1A, 0x16),
            comment: Color::rgb(0x5D, 0x6C, 0x79),
            number: Color::rgb(0x1C, 0x00, 0xCF),
            function: Color::rgb(0x32, 0x6D, 0x74),
            type_: Color::rgb(0x0B, 0x4F, 0x79),
            variable: Color::rgb(0x0F, 0x68, 0xA0),
            operator: Color::rgb(0x3A, 0x3A, 0x3A),
            punctuation: Color::rgb(0x6C, 0x6C, 0x6C),
            property: Color::rgb(0x4B, 0x21, 0xB0),
            attribute: Color::rgb(0x81, 0x5F, 0x03),
        }
    }

    /// Palette tuned for dark backgrounds.
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            keyword: Color::rgb(0xFF, 0x7A, 0xB2),
            string: Color::rgb(0xFC, 0x6A, 0x5D),
            comment: Color::rgb(0x7F, 0x8C, 0x98),
            number: Color::rgb(0xD9, 0xC9, 0x7C),
            function: Color::rgb(0x67, 0xB7, 0xA4),
            type_: Color::rgb(0x5D, 0xD8, 0xFF),
            variable: Color::rgb(0x41, 0xA1, 0xC0),
            operator: Color::rgb(0xDF, 0xDF, 0xE0),
            punctuation: Color::rgb(0xA3, 0xA3, 0xA6),
            property: Color::rgb(0xA1, 0x67, 0xE6),
            attribute: Color::rgb(0xCC, 0x97, 0x68),
        }
    }

    /// Color assigned to a category.
    #[must_use]
    pub const fn get(&self, category: TokenCategory) -> Color {
        match category {
            TokenCategory::Keyword => self.keyword,
            TokenCategory::String => self.string,
            TokenCategory::Comment => self.comment,
            TokenCategory::Number => self.number,
            TokenCategory::Function => self.function,
            TokenCategory::Type => self.type_,
            TokenCategory::Variable => self.variable,
            TokenCategory::Operator => self.operator,
            TokenCategory::Punctuation => self.punctuation,
            TokenCategory::Property => self.property,
            TokenCategory::Attribute => self.attribute,
        }
    }

    /// Replace the color of one category.
    pub fn set(&mut self, category: TokenCategory, color: Color) {
        let slot = match category {
            TokenCategory::Keyword => &mut self.keyword,
            TokenCategory::String => &mut self.string,
            TokenCategory::Comment => &mut self.comment,
            TokenCategory::Number => &mut self.number,
            TokenCategory::Function => &mut self.function,
            TokenCategory::Type => &mut self.type_,
            TokenCategory::Variable => &mut self.variable,
            TokenCategory::Operator => &mut self.operator,
            TokenCategory::Punctuation => &mut self.punctuation,
            TokenCategory::Property => &mut self.property,
            TokenCategory::Attribute => &mut self.attribute,
        };
        *slot = color;
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, category: TokenCategory, color: Color) -> Self {
        self.set(category, color);
        self
    }

    /// Iterate `(category, color)` pairs in canonical category order.
    pub fn iter(&self) -> impl Iterator<Item = (TokenCategory, Color)> + '_ {
        TokenCategory::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }
}

impl Default for SyntaxColors {
    fn default() -> Self {
        Self::light()
    }
}
