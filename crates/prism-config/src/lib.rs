//! Configuration management for Prism.
//!
//! Parses `prism.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! Programmatic settings can be applied during load via [`Overrides`].
//!
//! ## Example file
//!
//! ```toml
//! [parse]
//! block_directives = true
//!
//! [render]
//! mode = "dark"
//! highlight = true
//!
//! [theme.light]
//! keyword = "#9B2393"
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use prism_highlight::{CachingHighlighter, Highlighter, LexicalHighlighter};
use prism_renderer::{HtmlRenderer, ParseOptions, StyledTextRenderer};
use prism_theme::{Color, ColorMode, SyntaxColors, SyntaxTheme, ThemeError, TokenCategory};
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "prism.toml";

/// Settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct Overrides {
    /// Override color mode.
    pub mode: Option<ColorMode>,
    /// Override code highlighting flag.
    pub highlight: Option<bool>,
    /// Override heading anchors flag.
    pub heading_anchors: Option<bool>,
    /// Override highlight caching flag.
    pub cache_highlighting: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Parser extensions.
    pub parse: ParseConfig,
    /// Renderer settings.
    pub render: RenderConfig,
    /// Syntax color overrides.
    pub theme: ThemeConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Parser extension flags, mirroring [`ParseOptions`].
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools)]
pub struct ParseConfig {
    pub gfm: bool,
    pub footnotes: bool,
    pub metadata_blocks: bool,
    pub block_directives: bool,
    pub inline_directives: bool,
    pub doxygen_commands: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        let options = ParseOptions::default();
        Self {
            gfm: options.gfm,
            footnotes: options.footnotes,
            metadata_blocks: options.metadata_blocks,
            block_directives: options.block_directives,
            inline_directives: options.inline_directives,
            doxygen_commands: options.doxygen_commands,
        }
    }
}

/// Renderer settings.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Color mode for styled output.
    pub mode: ColorMode,
    /// Whether fenced code blocks are highlighted.
    pub highlight: bool,
    /// Whether HTML headings carry `id` attributes.
    pub heading_anchors: bool,
    /// Whether highlighter output is memoized.
    pub cache_highlighting: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: ColorMode::Light,
            highlight: true,
            heading_anchors: true,
            cache_highlighting: true,
        }
    }
}

/// Per-mode color overrides.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    pub light: PaletteOverrides,
    pub dark: PaletteOverrides,
}

/// `#RRGGBB` overrides for any subset of the token categories.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaletteOverrides {
    pub keyword: Option<String>,
    pub string: Option<String>,
    pub comment: Option<String>,
    pub number: Option<String>,
    pub function: Option<String>,
    #[serde(rename = "type")]
    pub type_: Option<String>,
    pub variable: Option<String>,
    pub operator: Option<String>,
    pub punctuation: Option<String>,
    pub property: Option<String>,
    pub attribute: Option<String>,
}

impl PaletteOverrides {
    fn entries(&self) -> [(TokenCategory, Option<&str>); 11] {
        [
            (TokenCategory::Keyword, self.keyword.as_deref()),
            (TokenCategory::String, self.string.as_deref()),
            (TokenCategory::Comment, self.comment.as_deref()),
            (TokenCategory::Number, self.number.as_deref()),
            (TokenCategory::Function, self.function.as_deref()),
            (TokenCategory::Type, self.type_.as_deref()),
            (TokenCategory::Variable, self.variable.as_deref()),
            (TokenCategory::Operator, self.operator.as_deref()),
            (TokenCategory::Punctuation, self.punctuation.as_deref()),
            (TokenCategory::Property, self.property.as_deref()),
            (TokenCategory::Attribute, self.attribute.as_deref()),
        ]
    }

    /// Apply the overrides on top of `base`.
    fn apply(&self, base: SyntaxColors, section: &str) -> Result<SyntaxColors, ConfigError> {
        let mut colors = base;
        for (category, value) in self.entries() {
            if let Some(value) = value {
                let color = Color::from_hex(value).map_err(|source| ConfigError::Theme {
                    field: format!("theme.{section}.{}", category.name()),
                    source,
                })?;
                colors.set(category, color);
            }
        }
        Ok(colors)
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Invalid theme color.
    #[error("Invalid color in {field}: {source}")]
    Theme {
        /// Config field path (e.g., "`theme.dark.keyword`").
        field: String,
        source: ThemeError,
    },
}

impl Config {
    /// Load configuration from file with optional overrides.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `prism.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// Overrides are applied after loading, taking precedence over file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, or if reading,
    /// parsing or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        overrides: Option<&Overrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            tracing::debug!("No config file found, using defaults");
            Self::default()
        };

        if let Some(overrides) = overrides {
            config.apply_overrides(overrides);
        }

        Ok(config)
    }

    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(mode) = overrides.mode {
            self.render.mode = mode;
        }
        if let Some(highlight) = overrides.highlight {
            self.render.highlight = highlight;
        }
        if let Some(heading_anchors) = overrides.heading_anchors {
            self.render.heading_anchors = heading_anchors;
        }
        if let Some(cache_highlighting) = overrides.cache_highlighting {
            self.render.cache_highlighting = cache_highlighting;
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading
        config.validate()?;

        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Unknown keys are already rejected while parsing; this checks the
    /// theme colors. Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Theme` for a malformed color.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.theme().map(|_| ())
    }

    /// Parser options from the `[parse]` section.
    #[must_use]
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            gfm: self.parse.gfm,
            footnotes: self.parse.footnotes,
            metadata_blocks: self.parse.metadata_blocks,
            block_directives: self.parse.block_directives,
            inline_directives: self.parse.inline_directives,
            doxygen_commands: self.parse.doxygen_commands,
        }
    }

    /// Default palettes with the `[theme.*]` overrides applied.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Theme` for a malformed color.
    pub fn theme(&self) -> Result<SyntaxTheme, ConfigError> {
        let light = self.theme.light.apply(SyntaxColors::light(), "light")?;
        let dark = self.theme.dark.apply(SyntaxColors::dark(), "dark")?;
        Ok(SyntaxTheme::new(light, dark))
    }

    /// Configured color mode.
    #[must_use]
    pub fn mode(&self) -> ColorMode {
        self.render.mode
    }

    /// Highlighter for code blocks, or `None` when highlighting is disabled.
    #[must_use]
    pub fn highlighter(&self) -> Option<Arc<dyn Highlighter>> {
        if !self.render.highlight {
            return None;
        }
        if self.render.cache_highlighting {
            Some(Arc::new(CachingHighlighter::new(LexicalHighlighter::new())))
        } else {
            Some(Arc::new(LexicalHighlighter::new()))
        }
    }

    /// HTML renderer configured from the `[render]` section.
    #[must_use]
    pub fn html_renderer(&self) -> HtmlRenderer {
        let renderer = HtmlRenderer::new().with_heading_anchors(self.render.heading_anchors);
        match self.highlighter() {
            Some(highlighter) => renderer.with_shared_highlighter(highlighter),
            None => renderer,
        }
    }

    /// Styled-text renderer using the configured theme and mode.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Theme` for a malformed color.
    pub fn styled_renderer(&self) -> Result<StyledTextRenderer, ConfigError> {
        let renderer = StyledTextRenderer::new(self.theme()?).with_mode(self.mode());
        Ok(match self.highlighter() {
            Some(highlighter) => renderer.with_shared_highlighter(highlighter),
            None => renderer,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use prism_renderer::{Document, Renderer};

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.parse_options(), ParseOptions::default());
        assert_eq!(config.mode(), ColorMode::Light);
        assert!(config.render.highlight);
        assert!(config.render.heading_anchors);
        assert_eq!(config.theme().unwrap(), SyntaxTheme::default());
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.parse_options(), ParseOptions::default());
        assert_eq!(config.mode(), ColorMode::Light);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r##"
[parse]
gfm = false
block_directives = true
doxygen_commands = true

[render]
mode = "dark"
highlight = false
heading_anchors = false

[theme.light]
keyword = "#010203"

[theme.dark]
type = "#0A0B0C"
"##;
        let config: Config = toml::from_str(toml).unwrap();
        let options = config.parse_options();
        assert!(!options.gfm);
        assert!(options.footnotes);
        assert!(options.block_directives);
        assert!(options.doxygen_commands);
        assert_eq!(config.mode(), ColorMode::Dark);
        assert!(config.highlighter().is_none());

        let theme = config.theme().unwrap();
        assert_eq!(theme.light().keyword, Color::rgb(1, 2, 3));
        assert_eq!(theme.dark().type_, Color::rgb(10, 11, 12));
        assert_eq!(theme.light().string, SyntaxColors::light().string);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let toml = r##"
[theme.light]
keywords = "#010203"
"##;
        let err = toml::from_str::<Config>(toml).unwrap_err();
        assert!(err.to_string().contains("keywords"), "{err}");
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(toml::from_str::<Config>("[render]\nmode = \"sepia\"").is_err());
    }

    #[test]
    fn test_invalid_color_rejected() {
        let config: Config = toml::from_str("[theme.dark]\ncomment = \"#12\"").unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Theme { ref field, .. } if field == "theme.dark.comment"));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[render]\nmode = \"dark\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.mode(), ColorMode::Dark);
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_load_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prism.toml");
        fs::write(&path, "[theme.light]\nkeyword = \"red\"\n").unwrap();
        assert!(matches!(
            Config::load(Some(&path), None),
            Err(ConfigError::Theme { .. })
        ));

        fs::write(&path, "[render\n").unwrap();
        assert!(matches!(
            Config::load(Some(&path), None),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_discover_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(
            Config::discover_config(&nested),
            Some(dir.path().join(CONFIG_FILENAME))
        );
    }

    #[test]
    fn test_overrides_take_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prism.toml");
        fs::write(&path, "[render]\nmode = \"dark\"\nhighlight = false\n").unwrap();

        let overrides = Overrides {
            mode: Some(ColorMode::Light),
            highlight: Some(true),
            ..Overrides::default()
        };
        let config = Config::load(Some(&path), Some(&overrides)).unwrap();
        assert_eq!(config.mode(), ColorMode::Light);
        assert!(config.highlighter().is_some());
    }

    #[test]
    fn test_html_renderer_follows_config() {
        let config: Config = toml::from_str("[render]\nheading_anchors = false").unwrap();
        let document = Document::parse("## Hi", &config.parse_options());
        assert_eq!(config.html_renderer().render(&document), "<h2>Hi</h2>");
    }

    #[test]
    fn test_styled_renderer_uses_theme_and_mode() {
        let toml = r##"
[render]
mode = "dark"

[theme.dark]
keyword = "#010203"
"##;
        let config: Config = toml::from_str(toml).unwrap();
        let document = Document::parse("```rust\nlet\n```", &config.parse_options());
        let styled = config.styled_renderer().unwrap().render(&document);
        assert_eq!(styled.runs()[0].style.foreground, Some(Color::rgb(1, 2, 3)));
    }
}
