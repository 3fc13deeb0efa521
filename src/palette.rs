// ABOUTME: Dominant-color estimation for the slidecraft application
// ABOUTME: Derives a gradient backdrop from the most frequent mid-brightness colors of an image

use crate::errors::Result;
use crate::utils::validate_file_exists;
use image::RgbImage;
use indexmap::IndexMap;
use std::path::Path;

/// Pixels darker than this (sum of channels) carry no color information.
const MIN_BRIGHTNESS: u32 = 50;
/// Pixels brighter than this are treated as near-white.
const MAX_BRIGHTNESS: u32 = 660;
const TOP_COLORS: usize = 3;

/// Background derived from an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backdrop {
    /// Plain white, used when no pixel survives filtering.
    Fallback,
    /// Diagonal gradient through up to three colors, most frequent first.
    Gradient(Vec<[u8; 3]>),
}

impl Backdrop {
    pub fn to_css(&self) -> String {
        match self {
            Backdrop::Fallback => "white".to_string(),
            Backdrop::Gradient(colors) => {
                let stops: Vec<String> = colors
                    .iter()
                    .map(|[r, g, b]| format!("rgb({}, {}, {})", r, g, b))
                    .collect();
                format!("linear-gradient(to bottom right, {})", stops.join(", "))
            }
        }
    }

    /// The dominant color as six hex digits, usable as a slide background.
    pub fn primary_hex(&self) -> String {
        match self {
            Backdrop::Fallback => "FFFFFF".to_string(),
            Backdrop::Gradient(colors) => colors
                .first()
                .map(|[r, g, b]| format!("{:02X}{:02X}{:02X}", r, g, b))
                .unwrap_or_else(|| "FFFFFF".to_string()),
        }
    }
}

/// Rank the colors of an image by frequency, ignoring near-black and near-white
/// pixels. Ties keep first-encounter order.
pub fn estimate(image: &RgbImage) -> Backdrop {
    let mut counts: IndexMap<[u8; 3], usize> = IndexMap::new();

    for pixel in image.pixels() {
        let [r, g, b] = pixel.0;
        let brightness = r as u32 + g as u32 + b as u32;
        if !(MIN_BRIGHTNESS..=MAX_BRIGHTNESS).contains(&brightness) {
            continue;
        }
        *counts.entry([r, g, b]).or_insert(0) += 1;
    }

    if counts.is_empty() {
        return Backdrop::Fallback;
    }

    let mut ranked: Vec<([u8; 3], usize)> = counts.into_iter().collect();
    // Stable sort keeps encounter order among equal counts.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    Backdrop::Gradient(ranked.into_iter().take(TOP_COLORS).map(|(rgb, _)| rgb).collect())
}

/// Decode an encoded image (PNG, JPEG, ...) and estimate its backdrop.
pub fn estimate_from_bytes(bytes: &[u8]) -> Result<Backdrop> {
    let image = image::load_from_memory(bytes)?;
    Ok(estimate(&image.to_rgb8()))
}

pub fn estimate_from_file(path: &Path) -> Result<Backdrop> {
    validate_file_exists(path)?;
    let image = image::open(path)?;
    Ok(estimate(&image.to_rgb8()))
}
