// ABOUTME: Deck assembly module for the slidecraft application
// ABOUTME: Renders every slide of a content map against a template and packages the result

use crate::errors::{DeckError, Result};
use crate::model::ContentMap;
use crate::pptx::{write_presentation, PptxConfig};
use crate::render::{RenderedSlide, SlideRenderer};
use crate::resources::AssetResolver;
use crate::style::hex_color;
use crate::template::Template;
use crate::utils::{sanitize_file_name, validate_directory_writable};
use log::{info, warn};
use std::path::{Path, PathBuf};

pub const DEFAULT_DECK_NAME: &str = "Generated_Presentation";

/// A finished presentation ready to be saved or streamed.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// File name including the `.pptx` extension.
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub slide_count: usize,
}

impl Artifact {
    /// Write the presentation into `dir`, returning the full path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        validate_directory_writable(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes).map_err(DeckError::FileReadError)?;
        info!("Wrote {} slides to {:?}", self.slide_count, path);
        Ok(path)
    }
}

/// Base name for the output file: the topic, else the first slide's title, else a
/// fixed default. Characters that are invalid in file names become `_`.
pub fn derive_file_name(content_map: &ContentMap) -> String {
    let base = content_map
        .topic()
        .or_else(|| content_map.slides.first().and_then(|s| s.title()))
        .unwrap_or(DEFAULT_DECK_NAME);
    sanitize_file_name(base)
}

/// Render all slides that have a matching layout, in content-map order.
pub fn render_slides(
    content_map: &ContentMap,
    template: &Template,
    resolver: &AssetResolver,
) -> Vec<RenderedSlide> {
    let renderer = SlideRenderer::new(&template.style, resolver);
    let background = template.style.bg_color.as_deref().and_then(hex_color);

    content_map
        .slides
        .iter()
        .enumerate()
        .filter_map(|(i, slide)| {
            let Some(layout) = template.layout(slide.layout()) else {
                warn!(
                    "Template '{}' has no '{}' layout, skipping slide {}",
                    template.label(),
                    slide.layout(),
                    i + 1
                );
                return None;
            };
            let mut rendered = renderer.render(slide, layout);
            rendered.background = background.clone();
            Some(rendered)
        })
        .collect()
}

/// Build a complete presentation from a content map and a template.
pub fn assemble(
    content_map: &ContentMap,
    template: &Template,
    resolver: &AssetResolver,
) -> Result<Artifact> {
    info!(
        "Assembling {} slides with template '{}'",
        content_map.slides.len(),
        template.label()
    );

    let slides = render_slides(content_map, template, resolver);
    let base = derive_file_name(content_map);

    let config = PptxConfig {
        title: content_map.topic().unwrap_or(&base).to_string(),
        ..PptxConfig::default()
    };
    let bytes = write_presentation(&slides, &config)?;

    Ok(Artifact {
        file_name: format!("{}.pptx", base),
        bytes,
        slide_count: slides.len(),
    })
}
