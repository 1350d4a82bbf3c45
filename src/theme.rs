//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use gemcascade::Token;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Theme key, fallback key and One Dark default for each token kind.
const TOKEN_KEYS: [(&str, &str, &str); 6] = [
    ("mem_box", "cpu_start", "#98C379"), // green
    ("title", "cpu_mid", "#E5C07B"),     // yellow
    ("cpu_end", "temp_end", "#E06C75"),  // red
    ("cpu_box", "cpu_box", "#61AFEF"),   // blue
    ("net_box", "net_box", "#C678DD"),   // magenta
    ("hi_fg", "proc_misc", "#56B6C2"),   // cyan
];

const HIGH_CONTRAST: [Color; 6] = [
    Color::Rgb(0x00, 0xFF, 0x00),
    Color::Rgb(0xFF, 0xFF, 0x00),
    Color::Rgb(0xFF, 0x00, 0x00),
    Color::Rgb(0x00, 0x88, 0xFF),
    Color::Rgb(0xFF, 0x00, 0xFF),
    Color::Rgb(0x00, 0xFF, 0xFF),
];

/// Avoids red/green pairs; every kind also has its own letter on the board.
const COLORBLIND: [Color; 6] = [
    Color::Rgb(0x00, 0x77, 0xBB),
    Color::Rgb(0xEE, 0x77, 0x33),
    Color::Rgb(0x00, 0x99, 0x88),
    Color::Rgb(0xCC, 0x33, 0x11),
    Color::Rgb(0xEE, 0x33, 0x77),
    Color::Rgb(0xBB, 0xBB, 0x00),
];

/// Token and UI colours.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Token colours (kind 0..=5).
    pub tokens: [Color; 6],
    /// Board background.
    pub bg: Color,
    /// Border.
    pub div_line: Color,
    /// Text (score, moves).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Secondary text (key help).
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_map(&HashMap::new())
    }
}

impl Theme {
    /// Load from a btop-style file. A missing path (or `None`) gives One Dark.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let mut theme = match path {
            Some(p) if p.exists() => Self::from_map(&parse_theme_file(&std::fs::read_to_string(p)?)),
            _ => Self::default(),
        };
        theme.apply_palette(palette);
        Ok(theme)
    }

    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => self.tokens = HIGH_CONTRAST,
            crate::Palette::Colorblind => self.tokens = COLORBLIND,
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let color = |keys: &[&str], default: Color| {
            keys.iter()
                .find_map(|k| map.get(*k).and_then(|v| parse_hex(v).ok()))
                .unwrap_or(default)
        };
        let tokens = TOKEN_KEYS.map(|(key, fallback, default)| {
            color(&[key, fallback], parse_hex(default).unwrap_or(Color::White))
        });
        Self {
            tokens,
            bg: color(&["meter_bg"], Color::Rgb(0x31, 0x35, 0x3F)),
            div_line: color(&["div_line"], Color::Rgb(0x3F, 0x44, 0x4F)),
            main_fg: color(&["main_fg"], Color::Rgb(0xAB, 0xB2, 0xBF)),
            title: color(&["title"], Color::Rgb(0xE5, 0xC0, 0x7B)),
            inactive_fg: color(&["inactive_fg"], Color::Rgb(0x5C, 0x63, 0x70)),
        }
    }

    /// Colour for a token kind; kinds past the palette wrap around.
    #[inline]
    pub fn token_color(&self, token: Token) -> Color {
        self.tokens[(token.0 as usize) % self.tokens.len()]
    }
}

/// Parse btop-style theme file into key -> value map. Blank lines and `#` comments are skipped.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    s.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let rest = line.strip_prefix("theme[")?;
            let (key, rest) = rest.split_once(']')?;
            let (_, value) = rest.split_once('=')?;
            let value = value.trim().trim_matches('"').trim_matches('\'');
            (!value.is_empty()).then(|| (key.trim().to_string(), value.to_string()))
        })
        .collect()
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let hex = s.trim().trim_matches('"').trim_matches('\'').trim_start_matches('#');
    let bad = || ThemeError::InvalidHex(hex.to_string());
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(bad)
    };
    match hex.len() {
        6 => Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        3 => Ok(Color::Rgb(
            channel(0..1)? * 17,
            channel(1..2)? * 17,
            channel(2..3)? * 17,
        )),
        _ => Err(bad()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6() {
        let c = parse_hex("#98C379").unwrap();
        assert!(matches!(c, Color::Rgb(0x98, 0xC3, 0x79)));
    }

    #[test]
    fn test_parse_hex_3() {
        let c = parse_hex("#FFF").unwrap();
        assert!(matches!(c, Color::Rgb(255, 255, 255)));
    }

    #[test]
    fn test_parse_hex_rejects_bad_length() {
        assert!(matches!(parse_hex("#12345"), Err(ThemeError::InvalidHex(_))));
        assert!(parse_hex("#GGGGGG").is_err());
    }

    #[test]
    fn test_parse_theme_line() {
        let map = parse_theme_file(r##"theme[meter_bg]="#31353F""##);
        assert_eq!(map.get("meter_bg"), Some(&"#31353F".to_string()));
    }

    #[test]
    fn test_theme_file_overrides_token_colour() {
        let map = parse_theme_file("# comment\ntheme[mem_box]=\"#010203\"\n");
        let theme = Theme::from_map(&map);
        assert!(matches!(theme.tokens[0], Color::Rgb(1, 2, 3)));
        assert!(matches!(theme.tokens[1], Color::Rgb(0xE5, 0xC0, 0x7B)));
    }

    #[test]
    fn test_token_color_wraps() {
        let t = Theme::default();
        assert_eq!(t.token_color(Token(0)), t.token_color(Token(6)));
        assert_ne!(t.token_color(Token(0)), t.token_color(Token(1)));
    }

    #[test]
    fn test_colorblind_palette_overrides_tokens() {
        let mut t = Theme::default();
        t.apply_palette(crate::Palette::Colorblind);
        assert_eq!(t.tokens, COLORBLIND);
    }
}
