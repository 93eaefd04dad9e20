//! Light/dark theme pair and CSS generation.

use std::fmt::{self, Write};
use std::str::FromStr;

use crate::{Color, SyntaxColors, ThemeError, TokenCategory};

/// Which palette of a [`SyntaxTheme`] is active.
///
/// Host appearance detection belongs to the caller; renderers only read the
/// mode they are given.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ColorMode {
    #[default]
    Light,
    Dark,
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Light => "light",
            Self::Dark => "dark",
        })
    }
}

impl FromStr for ColorMode {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(ThemeError::UnknownMode(s.to_owned())),
        }
    }
}

/// Immutable pair of light and dark palettes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyntaxTheme {
    light: SyntaxColors,
    dark: SyntaxColors,
}

impl SyntaxTheme {
    /// Create a theme from two palettes.
    #[must_use]
    pub const fn new(light: SyntaxColors, dark: SyntaxColors) -> Self {
        Self { light, dark }
    }

    /// Palette used in light mode.
    #[must_use]
    pub const fn light(&self) -> &SyntaxColors {
        &self.light
    }

    /// Palette used in dark mode.
    #[must_use]
    pub const fn dark(&self) -> &SyntaxColors {
        &self.dark
    }

    /// Palette for the given mode.
    #[must_use]
    pub const fn colors(&self, mode: ColorMode) -> &SyntaxColors {
        match mode {
            ColorMode::Light => &self.light,
            ColorMode::Dark => &self.dark,
        }
    }

    /// Concrete color of a category under the given mode.
    ///
    /// This is the value the `--syntax-<category>` custom property carries in
    /// the same mode, so native and HTML output agree.
    #[must_use]
    pub const fn resolve(&self, mode: ColorMode, category: TokenCategory) -> Color {
        self.colors(mode).get(category)
    }

    /// Generate the stylesheet for highlighted HTML.
    ///
    /// Output layout:
    /// - `:root` block binding `--syntax-<category>` to the light palette
    /// - `@media (prefers-color-scheme: dark)` block rebinding them to the dark palette
    /// - one `.token-<category>` rule per category (comments are also italic)
    #[must_use]
    pub fn generate_css(&self) -> String {
        let mut css = String::with_capacity(2048);

        css.push_str(":root {\n");
        write_variables(&mut css, &self.light, "  ");
        css.push_str("}\n\n");

        css.push_str("@media (prefers-color-scheme: dark) {\n  :root {\n");
        write_variables(&mut css, &self.dark, "    ");
        css.push_str("  }\n}\n\n");

        for category in TokenCategory::ALL {
            let _ = write!(
                css,
                ".{} {{ color: var({});",
                category.css_class(),
                category.css_variable()
            );
            if category.is_italic() {
                css.push_str(" font-style: italic;");
            }
            css.push_str(" }\n");
        }

        css
    }
}

impl Default for SyntaxTheme {
    fn default() -> Self {
        Self::new(SyntaxColors::light(), SyntaxColors::dark())
    }
}

fn write_variables(css: &mut String, colors: &SyntaxColors, indent: &str) {
    for (category, color) in colors.iter() {
        let _ = writeln!(css, "{indent}{}: {color};", category.css_variable());
    }
}
