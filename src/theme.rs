use std::fmt;
use std::fs;
use std::ops::BitOr;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ColorError, ThemeError};

static LIGHT_THEME: &str = include_str!("../themes/light.toml");
static DARK_THEME: &str = include_str!("../themes/dark.toml");

/// An sRGB color with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("transparent") {
            return Ok(Self::TRANSPARENT);
        }
        let err = || ColorError(s.to_string());
        let hex = trimmed.strip_prefix('#').ok_or_else(err)?;
        if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        let alpha = if hex.len() == 8 { channel(6)? } else { 0xFF };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 0xFF {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Bold/italic flags. Combining with `|` only ever adds flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct FontAttributes {
    pub bold: bool,
    pub italic: bool,
}

impl FontAttributes {
    pub const NONE: FontAttributes = FontAttributes {
        bold: false,
        italic: false,
    };
    pub const BOLD: FontAttributes = FontAttributes {
        bold: true,
        italic: false,
    };
    pub const ITALIC: FontAttributes = FontAttributes {
        bold: false,
        italic: true,
    };

    pub fn is_empty(&self) -> bool {
        !self.bold && !self.italic
    }
}

impl BitOr for FontAttributes {
    type Output = FontAttributes;

    fn bitor(self, rhs: Self) -> Self::Output {
        FontAttributes {
            bold: self.bold || rhs.bold,
            italic: self.italic || rhs.italic,
        }
    }
}

/// Visual properties for one semantic role.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Style {
    pub font_family: Option<String>,
    pub attributes: FontAttributes,
    pub foreground_color: Color,
    pub background_color: Color,
    pub font_size: f32,
    pub line_height: f32,
    pub border_size: f32,
    pub border_color: Color,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            font_family: None,
            attributes: FontAttributes::NONE,
            foreground_color: Color::BLACK,
            background_color: Color::TRANSPARENT,
            font_size: 12.0,
            line_height: 1.0,
            border_size: 0.0,
            border_color: Color::TRANSPARENT,
        }
    }
}

/// The semantic roles a theme provides styles for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Heading(u8),
    Paragraph,
    Quote,
    Code,
    Link,
    Separator,
}

/// A complete style sheet. Swapped wholesale; nothing cascades between roles.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default = "Theme::unstyled")]
pub struct Theme {
    pub margin: f32,
    pub background_color: Color,
    pub heading1: Style,
    pub heading2: Style,
    pub heading3: Style,
    pub heading4: Style,
    pub heading5: Style,
    pub heading6: Style,
    pub paragraph: Style,
    pub quote: Style,
    pub code: Style,
    pub link: Style,
    pub separator: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    /// The bundled light theme.
    pub fn light() -> Self {
        toml::from_str(LIGHT_THEME).expect("bundled light theme is valid")
    }

    /// The bundled dark theme.
    pub fn dark() -> Self {
        toml::from_str(DARK_THEME).expect("bundled dark theme is valid")
    }

    /// Every role at `Style::default()`. Fills gaps in the bundled themes.
    fn unstyled() -> Self {
        Self {
            margin: 10.0,
            background_color: Color::rgb(0xFF, 0xFF, 0xFF),
            heading1: Style::default(),
            heading2: Style::default(),
            heading3: Style::default(),
            heading4: Style::default(),
            heading5: Style::default(),
            heading6: Style::default(),
            paragraph: Style::default(),
            quote: Style::default(),
            code: Style::default(),
            link: Style::default(),
            separator: Style::default(),
        }
    }

    /// Parse a theme from TOML.
    ///
    /// The document is layered over the bundled light theme key by key, so a
    /// file that only sets `[link] foreground_color` keeps every other light
    /// value, including the rest of the link style.
    pub fn from_toml_str(content: &str) -> Result<Self, ThemeError> {
        let mut base: toml::Table = LIGHT_THEME.parse()?;
        let overrides: toml::Table = content.parse()?;
        merge_tables(&mut base, overrides);
        Ok(toml::Value::Table(base).try_into()?)
    }

    /// Load a theme from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ThemeError> {
        let content = fs::read_to_string(path).map_err(|source| ThemeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Get the style for a heading level. Levels past 5 (and 0) use `heading6`.
    pub fn heading(&self, level: u8) -> &Style {
        match level {
            1 => &self.heading1,
            2 => &self.heading2,
            3 => &self.heading3,
            4 => &self.heading4,
            5 => &self.heading5,
            _ => &self.heading6,
        }
    }

    pub fn style_for(&self, role: Role) -> &Style {
        match role {
            Role::Heading(level) => self.heading(level),
            Role::Paragraph => &self.paragraph,
            Role::Quote => &self.quote,
            Role::Code => &self.code,
            Role::Link => &self.link,
            Role::Separator => &self.separator,
        }
    }
}

fn merge_tables(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(inner)), toml::Value::Table(value)) => {
                merge_tables(inner, value);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_themes_parse() {
        let light = Theme::light();
        let dark = Theme::dark();
        assert_eq!(light.margin, 10.0);
        assert_eq!(light.background_color, Color::rgb(0xFF, 0xFF, 0xFF));
        assert_ne!(light.paragraph.foreground_color, dark.paragraph.foreground_color);
        assert_eq!(dark.code.font_family.as_deref(), Some("monospace"));
    }

    #[test]
    fn heading_levels_clamp_to_heading6() {
        let theme = Theme::light();
        assert_eq!(theme.style_for(Role::Heading(1)).font_size, 26.0);
        assert_eq!(theme.style_for(Role::Heading(5)).font_size, 16.0);
        assert_eq!(theme.style_for(Role::Heading(6)).font_size, 14.0);
        assert_eq!(theme.style_for(Role::Heading(9)), &theme.heading6);
    }

    #[test]
    fn parses_colors() {
        assert_eq!("#0366d6".parse::<Color>(), Ok(Color::rgb(0x03, 0x66, 0xD6)));
        assert_eq!(
            "#11223344".parse::<Color>(),
            Ok(Color::rgba(0x11, 0x22, 0x33, 0x44))
        );
        assert_eq!("Transparent".parse::<Color>(), Ok(Color::TRANSPARENT));
        assert!("0366d6".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("#zzzzzz".parse::<Color>().is_err());
    }

    #[test]
    fn color_display_round_trips_through_hex() {
        let color = Color::rgba(1, 2, 3, 4);
        assert_eq!(color.to_string(), "#01020304");
        assert_eq!(Color::rgb(255, 0, 16).to_string(), "#FF0010");
    }

    #[test]
    fn partial_theme_falls_back_to_light() {
        let theme = Theme::from_toml_str(
            "margin = 4.0\n[separator]\nborder_size = 0.0\n",
        )
        .unwrap();
        assert_eq!(theme.margin, 4.0);
        assert_eq!(theme.separator.border_size, 0.0);
        assert_eq!(theme.heading1, Theme::light().heading1);
        assert_eq!(theme.separator.border_color, Theme::light().separator.border_color);
    }

    #[test]
    fn rejects_bad_color_in_theme() {
        let err = Theme::from_toml_str("background_color = \"white\"\n").unwrap_err();
        assert!(matches!(err, ThemeError::Parse(_)));
        assert!(err.to_string().contains("white"));
    }

    #[test]
    fn attributes_combine_by_union() {
        assert_eq!(
            FontAttributes::BOLD | FontAttributes::ITALIC,
            FontAttributes::ITALIC | FontAttributes::BOLD
        );
        assert_eq!(FontAttributes::BOLD | FontAttributes::BOLD, FontAttributes::BOLD);
        assert!(FontAttributes::NONE.is_empty());
    }
}
