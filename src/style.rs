// ABOUTME: Style resolution for the slidecraft application
// ABOUTME: Layers region settings over template defaults over built-in defaults

use crate::template::{GlobalStyle, ShapeConfig};
use log::warn;

pub const DEFAULT_FONT_SIZE: f64 = 14.0;
pub const DEFAULT_TEXT_COLOR: &str = "000000";
pub const DEFAULT_FONT_FACE: &str = "Arial";
pub const DEFAULT_BORDER_COLOR: &str = "999999";

/// Resolve a setting as region > global > built-in.
pub fn layered<T>(region: Option<T>, global: Option<T>, builtin: T) -> T {
    region.or(global).unwrap_or(builtin)
}

/// Font size with the usual precedence; non-positive sizes count as unset.
pub fn font_size(region: Option<f64>, global: &GlobalStyle) -> f64 {
    let positive = |size: Option<f64>| size.filter(|s| *s > 0.0);
    layered(positive(region), positive(global.font_size), DEFAULT_FONT_SIZE)
}

/// Normalize a color to six uppercase hex digits, accepting `#RGB`, `RGB`,
/// `#RRGGBB` and `RRGGBB`.
pub fn hex_color(raw: &str) -> Option<String> {
    let digits = raw.trim().trim_start_matches('#');
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        warn!("Ignoring unsupported color value '{}'", raw);
        return None;
    }
    match digits.len() {
        6 => Some(digits.to_uppercase()),
        3 => Some(digits.chars().flat_map(|c| [c, c]).collect::<String>().to_uppercase()),
        _ => {
            warn!("Ignoring unsupported color value '{}'", raw);
            None
        }
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Align {
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(|n| n.trim().to_lowercase()).as_deref() {
            Some("center") | Some("centre") | Some("ctr") => Align::Center,
            Some("right") | Some("r") => Align::Right,
            Some("justify") | Some("just") => Align::Justify,
            _ => Align::Left,
        }
    }

    /// DrawingML paragraph alignment value.
    pub fn ooxml(&self) -> &'static str {
        match self {
            Align::Left => "l",
            Align::Center => "ctr",
            Align::Right => "r",
            Align::Justify => "just",
        }
    }
}

/// Fully resolved text style for one text block.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
    pub align: Align,
    pub color: String,
    pub font_face: String,
}

impl TextStyle {
    pub fn resolve(region: &ShapeConfig, global: &GlobalStyle) -> Self {
        Self {
            font_size: font_size(region.font_size, global),
            bold: region.bold.unwrap_or(false),
            italic: region.italic.unwrap_or(false),
            align: Align::from_name(region.align.as_deref()),
            color: layered(
                region.color.as_deref().and_then(hex_color),
                global.text_color.as_deref().and_then(hex_color),
                DEFAULT_TEXT_COLOR.to_string(),
            ),
            font_face: layered(
                region.font_face.clone(),
                global.font_family.clone(),
                DEFAULT_FONT_FACE.to_string(),
            ),
        }
    }
}
