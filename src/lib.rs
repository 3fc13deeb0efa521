// ABOUTME: Library module for the slidecraft program.
// ABOUTME: Contains the pipeline that turns content maps and templates into PPTX decks.

pub mod config;
pub mod deck;
pub mod errors;
pub mod model;
pub mod outline;
pub mod palette;
pub mod pptx;
pub mod render;
pub mod resources;
pub mod search;
pub mod style;
pub mod template;
pub mod utils;

// Reexport common types and functions
pub use config::Config;
pub use deck::{assemble, derive_file_name, render_slides, Artifact};
pub use errors::{DeckError, Result};
pub use model::{Body, ContentMap, Slide, SlideFields};
pub use outline::{finalize_content_map, parse_outline_response, OutlineItem};
pub use palette::Backdrop;
pub use pptx::{write_presentation, PptxConfig};
pub use render::{DrawInstruction, RenderedSlide, SlideRenderer};
pub use resources::{AssetResolver, ImageFetcher, ImagePayload, ResolverConfig};
pub use search::{enrich_images, GoogleImageSearch, ImageProvider, ImageSearch};
pub use template::{normalize_layouts, Template, TemplateCatalog};

#[cfg(test)]
mod tests;
