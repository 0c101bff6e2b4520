use bevy::prelude::*;

use crate::console::Category;

/// Colours used by the console UI.
#[derive(Resource, Debug, Clone)]
pub struct ConsoleTheme {
    pub background: Color,
    pub panel: Color,
    pub button: Color,
    pub entry_background: Color,
    pub text: Color,
    pub muted_text: Color,
    pub info: Color,
    pub warn: Color,
    pub error: Color,
    pub server: Color,
    pub client: Color,
}

impl Default for ConsoleTheme {
    fn default() -> Self {
        Self {
            background: Color::srgb(0.08, 0.09, 0.11),
            panel: Color::srgb(0.13, 0.14, 0.17),
            button: Color::srgb(0.22, 0.24, 0.29),
            entry_background: Color::srgb(0.11, 0.12, 0.15),
            text: Color::srgb(0.9, 0.9, 0.92),
            muted_text: Color::srgb(0.55, 0.57, 0.62),
            info: Color::srgb(0.35, 0.6, 1.0),
            warn: Color::srgb(1.0, 0.75, 0.2),
            error: Color::srgb(1.0, 0.35, 0.35),
            server: Color::srgb(0.4, 0.85, 0.5),
            client: Color::srgb(0.75, 0.5, 1.0),
        }
    }
}

impl ConsoleTheme {
    /// Accent colour for a log category.
    pub fn category_color(&self, category: Category) -> Color {
        match category {
            Category::Info => self.info,
            Category::Warn => self.warn,
            Category::Error => self.error,
            Category::Server => self.server,
            Category::Client => self.client,
        }
    }

    /// Override a category colour with a CSS colour string.
    /// Unparsable values keep the current colour.
    pub fn with_category_color(mut self, category: Category, css: &str) -> Self {
        let Some(color) = parse_color(css) else {
            return self;
        };

        match category {
            Category::Info => self.info = color,
            Category::Warn => self.warn = color,
            Category::Error => self.error = color,
            Category::Server => self.server = color,
            Category::Client => self.client = color,
        }
        self
    }
}

/// Parse a CSS hex colour: `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
pub fn parse_color(value: &str) -> Option<Color> {
    let color = value
        .trim()
        .strip_prefix('#')
        .and_then(parse_hex_color);
    if color.is_none() {
        log::warn!("Unknown color format: '{}'", value);
    }
    color
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }

    // Expand #RGB / #RGBA shorthand to one byte per channel
    let expanded: String = match hex.len() {
        3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => hex.to_string(),
        _ => return None,
    };

    let channel = |i: usize| u8::from_str_radix(&expanded[i * 2..i * 2 + 2], 16).ok();
    let r = channel(0)?;
    let g = channel(1)?;
    let b = channel(2)?;
    let a = if expanded.len() == 8 { channel(3)? } else { 255 };

    Some(Color::srgba_u8(r, g, b, a))
}
