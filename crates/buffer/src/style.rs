// Chunk: docs/chunks/color_palette - Display styles resolved from ColorIds

//! Display styling types.
//!
//! The color grid stores small integer ids; a theme resolves each id to one
//! of these styles when a line is drawn. Rendering itself lives outside this
//! workspace, so only the attributes a terminal front end needs are kept.

/// The 16 standard ANSI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

/// Terminal color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// Default foreground/background (terminal decides).
    #[default]
    Default,
    /// Named ANSI colors (0-15).
    Named(NamedColor),
    /// 256-color palette index.
    Indexed(u8),
    /// 24-bit RGB color.
    Rgb { r: u8, g: u8, b: u8 },
}

impl Color {
    /// Builds an RGB color from a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Color::Rgb {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }
}

/// Text attributes for one color bucket.
///
/// The default style is unstyled text: default colors, no attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Style {
    /// A style with only a foreground color set.
    pub const fn fg(color: Color) -> Self {
        Self {
            fg: color,
            bg: Color::Default,
            bold: false,
            italic: false,
            underline: false,
        }
    }

    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_splits_channels() {
        assert_eq!(Color::hex(0xcba6f7), Color::Rgb { r: 0xcb, g: 0xa6, b: 0xf7 });
    }

    #[test]
    fn builders_set_attributes() {
        let s = Style::fg(Color::Named(NamedColor::Red)).italic();
        assert!(s.italic);
        assert!(!s.bold);
        assert_eq!(s.fg, Color::Named(NamedColor::Red));
    }
}
